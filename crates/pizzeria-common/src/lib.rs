//! Common utilities for pizzeria
//!
//! This crate provides the error type shared by the pizzeria crates.

pub mod error;

pub use error::{PizzeriaError, Result};
