//! Shared type definitions for the Open Supply Hub client workspace.
//!
//! This crate holds the data model every other crate builds on:
//!
//! - [`ResourceDescriptor`] and its schema/context building blocks
//! - [`FlatRecord`], the normalized output shape
//! - [`Error`], the error taxonomy shared across the workspace

pub mod error;
pub mod record;
pub mod resource;

pub use error::Error;
pub use record::{FlatRecord, FlatValue};
pub use resource::{ContextSpec, FieldSchema, FieldSpec, InputSchema, ResourceDescriptor};
