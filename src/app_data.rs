use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Settings;
use crate::services::{ItemListService, ItemService, TokenService, UserService};
use crate::stores::{ItemListStore, ItemStore, UserStore};

/// Centralized application data following the main-owned stores pattern.
///
/// All dependencies are created once at startup and shared across
/// resolvers; there is no module-level singleton. Stores are created
/// first, then the services that orchestrate them.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, settings)
///   ↓ creates once
///   ├─ user_store / item_store / item_list_store
///   ├─ token_service
///   ├─ user_service
///   ├─ item_service
///   └─ item_list_service
///   ↓ wrapped in Arc<AppData>
///   └─ handed to the GraphQL context per request
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub user_store: Arc<UserStore>,
    pub item_store: Arc<ItemStore>,
    pub item_list_store: Arc<ItemListStore>,
    pub token_service: Arc<TokenService>,
    pub user_service: Arc<UserService>,
    pub item_service: Arc<ItemService>,
    pub item_list_service: Arc<ItemListService>,
}

impl AppData {
    /// Wire up stores and services. The database should be connected
    /// and migrated before calling this.
    pub fn init(db: DatabaseConnection, settings: &Settings) -> Self {
        tracing::debug!("Initializing AppData...");

        let user_store = Arc::new(UserStore::new(db.clone()));
        let item_store = Arc::new(ItemStore::new(db.clone()));
        let item_list_store = Arc::new(ItemListStore::new(db.clone()));

        let token_service = Arc::new(TokenService::new(
            settings.jwt_secret.clone(),
            settings.token_expiry_minutes,
        ));

        let user_service = Arc::new(UserService::new(
            db.clone(),
            Arc::clone(&user_store),
            Arc::clone(&token_service),
        ));
        let item_service = Arc::new(ItemService::new(
            db.clone(),
            Arc::clone(&item_store),
            Arc::clone(&user_store),
            Arc::clone(&item_list_store),
        ));
        let item_list_service = Arc::new(ItemListService::new(
            db.clone(),
            Arc::clone(&item_list_store),
            Arc::clone(&item_store),
            Arc::clone(&user_store),
        ));

        tracing::debug!("AppData initialization complete");

        Self {
            db,
            user_store,
            item_store,
            item_list_store,
            token_service,
            user_service,
            item_service,
            item_list_service,
        }
    }
}
