pub mod url_validator;

/// Random alphanumeric code (short links, generated secrets)
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// Short codes accepted by the redirect endpoint
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty() && code.len() <= 255 && code.chars().all(|c| c.is_ascii_alphanumeric())
}
