//! HTTP handlers for the person API.

pub mod person;
pub use person::*;
