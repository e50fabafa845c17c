pub mod permissions;
pub mod user;
