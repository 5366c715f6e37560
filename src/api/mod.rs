// API layer - GraphQL schema, request context, HTTP handlers
pub mod context;
pub mod schema;
pub mod types;

use std::sync::Arc;

use poem::http::HeaderMap;
use poem::web::{Data, Html, Json};
use poem::handler;

use crate::app_data::AppData;
use crate::types::internal::auth::Identity;
use context::ApiContext;
use schema::Schema;

/// Extract the raw token from an `authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").or_else(|| value.strip_prefix("bearer "))?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Resolve the caller identity for a request.
///
/// Any failure along the way (missing header, bad token, expired
/// token, token subject no longer existing) degrades to an
/// unauthenticated request rather than a hard error; mutations that
/// need identity fail later with the Unauthenticated domain error.
pub async fn resolve_caller(app: &AppData, headers: &HeaderMap) -> Option<Identity> {
    let token = bearer_token(headers)?;
    let claims = app.token_service.decode(token).ok()?;

    // The token subject must still resolve to an existing user.
    match app.user_store.find_by_id(&claims.sub).await {
        Ok(Some(_)) => Some(Identity::from(claims)),
        Ok(None) => {
            tracing::debug!(user_id = %claims.sub, "token subject no longer exists");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "caller lookup failed");
            None
        }
    }
}

#[handler]
pub async fn graphql(
    req: Json<juniper::http::GraphQLRequest>,
    headers: &HeaderMap,
    schema: Data<&Arc<Schema>>,
    app: Data<&Arc<AppData>>,
) -> Json<serde_json::Value> {
    let caller = resolve_caller(&app, headers).await;
    let ctx = ApiContext::new(Arc::clone(&app), caller);

    let response = req.0.execute(&schema, &ctx).await;
    let body = serde_json::to_value(&response).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to serialize GraphQL response");
        serde_json::json!({
            "errors": [{ "message": "Internal server error" }]
        })
    });
    Json(body)
}

#[handler]
pub async fn graphiql() -> Html<String> {
    Html(juniper::http::graphiql::graphiql_source("/graphql", None))
}
