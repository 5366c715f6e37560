use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use poem::listener::TcpListener;
use poem::{get, post, EndpointExt, Route, Server};
use sea_orm::{Database, DatabaseConnection};

use wishlist_backend::api::schema::schema;
use wishlist_backend::api::{graphiql, graphql};
use wishlist_backend::config::{init_logging, Settings};
use wishlist_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Loaded {}", settings);

    let db: DatabaseConnection = match Database::connect(&settings.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Connected to database: {}", settings.database_url);

    if let Err(e) = Migrator::up(&db, None).await {
        tracing::error!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Database migrations completed");

    let app_data = Arc::new(AppData::init(db, &settings));
    let root_node = Arc::new(schema());

    let app = Route::new()
        .at("/graphql", post(graphql).get(graphiql))
        .at("/graphiql", get(graphiql))
        .data(app_data)
        .data(root_node);

    tracing::info!("Starting server on http://{}", settings.bind_addr);
    tracing::info!("GraphiQL available at http://{}/graphiql", settings.bind_addr);

    Server::new(TcpListener::bind(settings.bind_addr))
        .run(app)
        .await
}
