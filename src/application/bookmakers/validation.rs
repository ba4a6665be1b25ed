use crate::application::core::ValidationErrors;

pub const NAME_MAX_LENGTH: usize = 100;
pub const LOGO_URL_MAX_LENGTH: usize = 500;

/// Rules shared by create and update
pub fn validate_bookmaker_fields(errors: &mut ValidationErrors, name: &str, logo_url: Option<&str>) {
    errors
        .field("name", name)
        .not_empty("Name is required")
        .max_length(NAME_MAX_LENGTH, "Name must not exceed 100 characters");

    errors
        .optional_field("logoUrl", logo_url)
        .max_length(LOGO_URL_MAX_LENGTH, "Logo URL must not exceed 500 characters")
        .url("Logo URL must be a valid http(s) URL");
}
