// Common test utilities for integration tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

use wishlist_backend::config::Settings;
use wishlist_backend::types::db::{item, item_list, user, Role};
use wishlist_backend::AppData;

/// Creates a fully wired AppData against an in-memory SQLite database
/// with migrations applied.
pub async fn setup_app() -> Arc<AppData> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let settings = Settings {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret-key-minimum-32-characters-long".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        token_expiry_minutes: 60,
    };

    Arc::new(AppData::init(db, &settings))
}

/// Seed a user through the domain service (password optional).
pub async fn create_user(app: &AppData, name: &str, username: &str, password: Option<&str>) -> user::Model {
    app.user_service
        .insert(
            name.to_string(),
            username.to_string(),
            Role::User,
            password.map(str::to_string),
        )
        .await
        .expect("Failed to seed user")
}

/// Seed an item list owned by `owner_id`.
pub async fn create_list(app: &AppData, owner_id: &str, name: &str) -> item_list::Model {
    app.item_list_service
        .insert(name.to_string(), "test-list".to_string(), owner_id)
        .await
        .expect("Failed to seed itemlist")
}

/// Seed an item into a list as the list owner.
pub async fn create_item(app: &AppData, list_id: &str, owner_id: &str, title: &str) -> item::Model {
    app.item_service
        .insert(list_id, title.to_string(), None, None, owner_id)
        .await
        .expect("Failed to seed item")
}

/// Grant a non-owner user access to a list (the reserve/release
/// permission).
pub async fn grant_access(app: &AppData, user_id: &str, list_id: &str) {
    app.user_store
        .grant_list_access(&app.db, user_id, list_id)
        .await
        .expect("Failed to grant list access");
}
