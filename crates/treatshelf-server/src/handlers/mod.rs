//! HTTP handlers

pub mod health;
pub mod treats;

pub use health::health;
