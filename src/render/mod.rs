//! Encoder module — trait-based format dispatch.

pub mod grid;
pub mod markup;
pub mod troff;

use crate::error::Result;
use crate::model::Document;
use anyhow::anyhow;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Target markup syntax. Decides both the encoder and how item names are
/// pre-escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Troff,
    Markdown,
    Rst,
}

/// Trait for rendering a Document into a specific output format.
pub trait Encoder {
    fn encode(&self, doc: &Document) -> Result<String>;
    fn dialect(&self) -> Dialect;
    fn file_extension(&self) -> &str;
}

/// Create an encoder for the given format name.
pub fn create_encoder(format: &str) -> anyhow::Result<Box<dyn Encoder>> {
    match format {
        "troff" | "man" => Ok(Box::new(troff::TroffEncoder)),
        "markdown" | "md" => Ok(Box::new(markup::MarkupEncoder::markdown())),
        "rst" => Ok(Box::new(markup::MarkupEncoder::rst())),
        _ => Err(anyhow!(
            "unknown format: {}. Use troff, markdown, or rst",
            format
        )),
    }
}

/// Where an encoded document goes.
///
/// An existing directory gets `<stem>.<extension>` inside it, any other path
/// is the file itself, and `None` is stdout.
pub fn output_path(output: Option<&Path>, stem: &str, encoder: &dyn Encoder) -> Option<PathBuf> {
    output.map(|path| {
        if path.is_dir() {
            path.join(format!("{}.{}", stem, encoder.file_extension()))
        } else {
            path.to_path_buf()
        }
    })
}

/// Write a fully encoded document to `path`, or to stdout when `None`.
pub fn write_document(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => fs::write(path, text)?,
        None => {
            let mut out = io::stdout().lock();
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}
