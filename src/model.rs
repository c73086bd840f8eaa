//! Document model for generated manuals, format-agnostic.

use crate::error::{Error, Result};
use crate::names::NameEntry;
use std::collections::HashSet;

/// A complete document, built once per run and rendered once.
#[derive(Debug, Default)]
pub struct Document {
    pub title: String,
    /// Man-page section number
    pub manual_section: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Program name recorded in generated-file headers
    pub generator: String,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Section {
        title: String,
        children: Vec<Node>,
    },
    Subsection {
        title: String,
        /// Set only when the title differs from its link anchor
        anchor: Option<String>,
        children: Vec<Node>,
    },
    Paragraph(String),
    CodeBlock(String),
    Table(TableModel),
    LinkList(Vec<NameEntry>),
}

/// Header row plus body rows. Arity is checked at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableModel {
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        TableModel {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn arity(&self) -> usize {
        self.header.len()
    }

    /// Fails if any body row has a different cell count than the header.
    pub fn check_arity(&self) -> Result<()> {
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.arity() {
                return Err(Error::structural(format!(
                    "table row {} has {} cells, header has {}",
                    i + 1,
                    row.len(),
                    self.arity()
                )));
            }
        }
        Ok(())
    }
}

/// Item names in order of first appearance, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemList {
    names: Vec<String>,
}

impl ItemList {
    /// Build from raw introspection lines. Surrounding whitespace and blank
    /// lines are dropped; later duplicates are dropped silently.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for line in lines {
            let name = line.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if seen.insert(name.to_string()) {
                names.push(name.to_string());
            }
        }
        ItemList { names }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Assembles a [`Document`] in call order.
///
/// Content blocks go into the innermost open container: the open subsection,
/// else the open section, else the document root.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    doc: Document,
    section: Option<OpenSection>,
}

#[derive(Debug)]
struct OpenSection {
    title: String,
    children: Vec<Node>,
    subsection: Option<OpenSubsection>,
}

#[derive(Debug)]
struct OpenSubsection {
    title: String,
    anchor: Option<String>,
    children: Vec<Node>,
}

impl OpenSubsection {
    fn close(self) -> Node {
        Node::Subsection {
            title: self.title,
            anchor: self.anchor,
            children: self.children,
        }
    }
}

impl OpenSection {
    fn close(mut self) -> Node {
        if let Some(sub) = self.subsection.take() {
            self.children.push(sub.close());
        }
        Node::Section {
            title: self.title,
            children: self.children,
        }
    }
}

impl DocumentBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        DocumentBuilder {
            doc: Document {
                title: title.into(),
                manual_section: "1".to_string(),
                ..Document::default()
            },
            section: None,
        }
    }

    pub fn manual_section(mut self, section: impl Into<String>) -> Self {
        self.doc.manual_section = section.into();
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.doc.date = date.into();
        self
    }

    pub fn generator(mut self, generator: impl Into<String>) -> Self {
        self.doc.generator = generator.into();
        self
    }

    /// Open a new top-level section, closing any open one.
    pub fn add_section(&mut self, title: impl Into<String>) {
        self.close_section();
        self.section = Some(OpenSection {
            title: title.into(),
            children: Vec::new(),
            subsection: None,
        });
    }

    /// Open a subsection inside the current section.
    pub fn add_subsection(&mut self, title: impl Into<String>) -> Result<()> {
        self.open_subsection(title.into(), None)
    }

    /// Open a subsection titled with an item's display name, carrying the
    /// item's anchor when it differs from the title.
    pub fn add_anchored_subsection(&mut self, name: &NameEntry) -> Result<()> {
        let anchor = name.needs_anchor().then(|| name.anchor.clone());
        self.open_subsection(name.display.clone(), anchor)
    }

    fn open_subsection(&mut self, title: String, anchor: Option<String>) -> Result<()> {
        let section = self.section.as_mut().ok_or_else(|| {
            Error::structural(format!("subsection \"{}\" added outside of a section", title))
        })?;
        if let Some(prev) = section.subsection.take() {
            section.children.push(prev.close());
        }
        section.subsection = Some(OpenSubsection {
            title,
            anchor,
            children: Vec::new(),
        });
        Ok(())
    }

    pub fn add_paragraph(&mut self, text: impl Into<String>) {
        self.push(Node::Paragraph(text.into()));
    }

    pub fn add_code_block(&mut self, text: impl Into<String>) {
        self.push(Node::CodeBlock(text.into()));
    }

    pub fn add_table(&mut self, table: TableModel) {
        self.push(Node::Table(table));
    }

    pub fn add_link_list(&mut self, entries: Vec<NameEntry>) {
        self.push(Node::LinkList(entries));
    }

    pub fn finish(mut self) -> Document {
        self.close_section();
        self.doc
    }

    fn push(&mut self, node: Node) {
        match self.section.as_mut() {
            Some(OpenSection {
                subsection: Some(sub),
                ..
            }) => sub.children.push(node),
            Some(section) => section.children.push(node),
            None => self.doc.nodes.push(node),
        }
    }

    fn close_section(&mut self) {
        if let Some(section) = self.section.take() {
            self.doc.nodes.push(section.close());
        }
    }
}
