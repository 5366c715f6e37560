// Stores layer - typed repositories over the database
pub mod item_list_store;
pub mod item_store;
pub mod user_store;

pub use item_list_store::ItemListStore;
pub use item_store::ItemStore;
pub use user_store::UserStore;
