//! Credential models for OAuth 1.0a user-context requests.

pub mod credentials;
pub mod secret;

pub use credentials::*;
pub use secret::*;
