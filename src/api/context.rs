use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::DomainError;
use crate::types::internal::auth::Identity;

/// The context accessible to every resolver: the service graph plus
/// the caller identity (if the request carried a valid bearer token).
pub struct ApiContext {
    pub app: Arc<AppData>,
    pub caller: Option<Identity>,
}

impl ApiContext {
    pub fn new(app: Arc<AppData>, caller: Option<Identity>) -> Self {
        Self { app, caller }
    }

    /// Authentication gate for mutations.
    pub fn require_caller(&self) -> Result<&Identity, DomainError> {
        self.caller.as_ref().ok_or(DomainError::Unauthenticated)
    }
}

impl juniper::Context for ApiContext {}
