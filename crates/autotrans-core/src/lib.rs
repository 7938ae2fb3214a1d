//! Domain types and collaborator contracts for autotrans.

pub mod clock;
pub mod error;
pub mod message;
pub mod session;
pub mod settings;
pub mod translation;
pub mod view;

// Re-export common error type
pub use error::{Result, TranslateError};
