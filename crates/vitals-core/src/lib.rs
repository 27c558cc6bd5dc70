//! Core types and trait definitions for the vitals report pipeline.
//!
//! This crate is deliberately free of I/O. Every other crate depends on it;
//! it depends on nothing but serde, strum and thiserror.

pub mod country;
pub mod error;
pub mod fact;
pub mod resolver;
pub mod table;

pub use error::{Error, Result};
