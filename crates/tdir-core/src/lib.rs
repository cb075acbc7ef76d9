//! # tdir-core
//!
//! Placeholder substitution for note and folder templates.
//!
//! This crate is pure string work, apart from loading [`Settings`]:
//! - [`resolve`] — expands fixed tokens (`{{date}}`, `{{uuid}}`, ...)
//! - [`allocate`] — picks the next free `{{+Number}}` for a set of sibling names
//! - [`substitute`] — composes the two
//! - [`validate_name`] — rejects names that are unsafe to create on disk
//! - Error hierarchy ([`TdirError`], [`NameError`])

pub mod error;
pub mod sequence;
pub mod settings;
pub mod substitute;
pub mod validate;
pub mod variables;

pub use error::{NameError, Result, TdirError};
pub use sequence::{allocate, Allocation, NUMBER_TOKEN};
pub use settings::{DisplayMode, MenuStyle, MoveDirection, Settings, TemplateConfig};
pub use substitute::{substitute, substitute_detailed, Substitution};
pub use validate::{validate_name, NameVerdict};
pub use variables::resolve;
