// Errors layer - domain error taxonomy
pub mod domain;

pub use domain::DomainError;
