pub mod auth;
pub mod config;
pub mod error;
pub mod form;
pub mod observability;
pub mod overlay;
pub mod pages;
pub mod prelude;
pub mod session;

#[cfg(test)]
mod test_public_api;

pub use config::AppConfig;
pub use error::{AuthError, AuthFailure, FormError, SubmitError};
