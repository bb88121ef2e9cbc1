//! Core domain types

pub mod treat;

pub use treat::*;
