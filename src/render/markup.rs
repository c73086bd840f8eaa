//! Markdown and reStructuredText encoder.
//!
//! Both flavors share grid tables and the overall walk; they differ in
//! headings, anchors, links and literal blocks.

use crate::error::Result;
use crate::model::{Document, Node};
use crate::names::{escape_display, NameEntry};
use crate::render::grid::{self, Cell};
use crate::render::{Dialect, Encoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Markdown,
    Rst,
}

pub struct MarkupEncoder {
    flavor: Flavor,
}

impl MarkupEncoder {
    pub fn markdown() -> Self {
        MarkupEncoder {
            flavor: Flavor::Markdown,
        }
    }

    pub fn rst() -> Self {
        MarkupEncoder { flavor: Flavor::Rst }
    }
}

impl Encoder for MarkupEncoder {
    fn encode(&self, doc: &Document) -> Result<String> {
        let mut blocks: Vec<String> = Vec::new();
        if !doc.title.is_empty() {
            blocks.push(self.heading(&doc.title, 0));
        }
        for node in &doc.nodes {
            self.encode_node(&mut blocks, node)?;
        }

        Ok(blocks.join("\n"))
    }

    fn dialect(&self) -> Dialect {
        match self.flavor {
            Flavor::Markdown => Dialect::Markdown,
            Flavor::Rst => Dialect::Rst,
        }
    }

    fn file_extension(&self) -> &str {
        match self.flavor {
            Flavor::Markdown => "md",
            Flavor::Rst => "rst",
        }
    }
}

impl MarkupEncoder {
    /// Append one newline-terminated block per node; blocks are later joined
    /// with blank lines.
    fn encode_node(&self, blocks: &mut Vec<String>, node: &Node) -> Result<()> {
        match node {
            Node::Section { title, children } => {
                blocks.push(self.heading(title, 1));
                for child in children {
                    self.encode_node(blocks, child)?;
                }
            }
            Node::Subsection {
                title,
                anchor,
                children,
            } => {
                if let Some(anchor) = anchor {
                    blocks.push(self.anchor_marker(anchor));
                }
                blocks.push(self.heading(title, 2));
                for child in children {
                    self.encode_node(blocks, child)?;
                }
            }
            Node::Paragraph(text) => blocks.push(terminated(text)),
            Node::CodeBlock(text) => blocks.push(self.literal_block(text)),
            Node::Table(table) => {
                // Cells are measured after escaping: the grid is read as source.
                let dialect = self.dialect();
                let cell = |raw: &str| Cell::plain(&escape_display(raw, dialect));
                blocks.push(grid::render(table, &cell)?);
            }
            Node::LinkList(entries) => {
                if !entries.is_empty() {
                    blocks.push(self.link_list(entries));
                }
            }
        }
        Ok(())
    }

    /// Depth 0 is the document title, 1 a section, 2 a subsection.
    fn heading(&self, title: &str, depth: usize) -> String {
        match self.flavor {
            Flavor::Markdown => format!("{} {}\n", "#".repeat(depth + 1), title),
            Flavor::Rst => {
                let rule = match depth {
                    0 | 1 => "=",
                    _ => "-",
                }
                .repeat(title.chars().count().max(1));
                if depth == 0 {
                    format!("{rule}\n{title}\n{rule}\n")
                } else {
                    format!("{title}\n{rule}\n")
                }
            }
        }
    }

    fn anchor_marker(&self, anchor: &str) -> String {
        match self.flavor {
            Flavor::Markdown => format!("<a id=\"{}\"></a>\n", anchor),
            Flavor::Rst => format!(".. _{}:\n", anchor),
        }
    }

    fn link(&self, entry: &NameEntry) -> String {
        match self.flavor {
            Flavor::Markdown => format!("[{}](#{})", entry.display, entry.anchor),
            Flavor::Rst => format!("`{} <{}_>`_", entry.display, entry.anchor),
        }
    }

    fn link_list(&self, entries: &[NameEntry]) -> String {
        let links: Vec<String> = entries.iter().map(|e| self.link(e)).collect();
        terminated(&links.join(", "))
    }

    fn literal_block(&self, text: &str) -> String {
        match self.flavor {
            Flavor::Markdown => {
                let fence = "`".repeat(longest_backtick_run(text).max(2) + 1);
                format!("{fence}\n{}{fence}\n", terminated(text))
            }
            Flavor::Rst => {
                let mut out = String::from("::\n\n");
                for line in text.lines() {
                    if line.is_empty() {
                        out.push('\n');
                    } else {
                        out.push_str("    ");
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                out
            }
        }
    }
}

fn terminated(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}\n", text)
    }
}

/// Length of the longest run of consecutive backticks in `text`.
fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
