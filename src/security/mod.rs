pub mod jwt;
pub mod password;
pub mod user_accessor;

pub use jwt::{Claims, JwtService, TokenKind, TokenPair};
pub use user_accessor::{FALLBACK_ROLE, UserAccessor, UserInfo};
