//! Core error and identifier types for guidelog.
//!
//! This crate provides:
//! - [`Error`] - Rich error types with context
//! - [`RuleId`] - Identifiers assigned to rules by the instrumenter
//! - [`ClauseId`] - Dotted guideline clause identifiers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod id;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use id::{ClauseId, RuleId};
