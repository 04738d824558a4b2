//! Tubely API Library
//!
//! HTTP handlers, authentication, the upload pipeline and application setup.

mod api_doc;
mod handlers;
mod services;
pub mod setup;
mod telemetry;

pub mod auth;
pub mod error;
pub mod state;

pub use error::ErrorResponse;
