//! Type definitions for spotscout

mod deals;
mod error;

pub use deals::*;
pub use error::*;
