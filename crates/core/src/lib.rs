//! Core business logic for studydeck.

pub mod services;

pub use services::*;
