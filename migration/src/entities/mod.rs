pub mod affiliate_code;
pub mod bookmaker;
pub mod generated_link;
pub mod generated_link_utm;
pub mod original_link;
pub mod role;
pub mod telegram;
pub mod user;
pub mod user_role;
pub mod utm;

pub use affiliate_code::Entity as AffiliateCodeEntity;
pub use bookmaker::Entity as BookmakerEntity;
pub use generated_link::Entity as GeneratedLinkEntity;
pub use generated_link_utm::Entity as GeneratedLinkUtmEntity;
pub use original_link::Entity as OriginalLinkEntity;
pub use role::Entity as RoleEntity;
pub use telegram::Entity as TelegramEntity;
pub use user::Entity as UserEntity;
pub use user_role::Entity as UserRoleEntity;
pub use utm::Entity as UtmEntity;
