//! Type definitions module.
//!
//! Contains shared types used across the application.

pub mod chain;
pub mod token;

pub use chain::*;
pub use token::*;
