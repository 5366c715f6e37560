// Services layer - business logic and orchestration
pub mod crypto;
pub mod item_list_service;
pub mod item_service;
pub mod token_service;
pub mod user_service;

pub use item_list_service::ItemListService;
pub use item_service::ItemService;
pub use token_service::TokenService;
pub use user_service::UserService;
