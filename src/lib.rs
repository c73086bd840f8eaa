//! mlrdoc — assemble Miller's manual page and reference documents from the
//! `mlr` executable's own help output.
//!
//! The pipeline runs one way: a [`driver::Generator`] pulls item lists and
//! help text through an [`introspect::Introspector`], builds a
//! [`model::Document`], and an [`render::Encoder`] turns it into troff,
//! Markdown or reStructuredText.

pub mod driver;
pub mod error;
pub mod introspect;
pub mod model;
pub mod names;
pub mod render;

pub use error::{Error, Result};
