// Database entities - SeaORM models
pub mod item;
pub mod item_list;
pub mod list_access;
pub mod user;

pub use user::Role;
