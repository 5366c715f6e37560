// Internal types shared across layers
pub mod auth;
