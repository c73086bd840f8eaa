//! troff manual-page encoder for the `man` macro package.
//!
//! View the output with `mlrdoc | groff -man -Tascii | less`.

use crate::error::Result;
use crate::model::{Document, Node};
use crate::names::escape_display;
use crate::render::grid::{self, Cell};
use crate::render::{Dialect, Encoder};
use regex::Regex;
use std::sync::LazyLock;

pub struct TroffEncoder;

static RE_CONTROL_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([.'])").unwrap());

impl Encoder for TroffEncoder {
    fn encode(&self, doc: &Document) -> Result<String> {
        let mut out = preamble(doc);
        for node in &doc.nodes {
            encode_node(&mut out, node)?;
        }
        Ok(out)
    }

    fn dialect(&self) -> Dialect {
        Dialect::Troff
    }

    fn file_extension(&self) -> &str {
        "1"
    }
}

fn encode_node(out: &mut String, node: &Node) -> Result<()> {
    match node {
        Node::Section { title, children } => {
            out.push_str(&format!(".SH \"{}\"\n", title));
            for child in children {
                encode_node(out, child)?;
            }
        }
        Node::Subsection {
            title, children, ..
        } => {
            out.push_str(&format!(".SS \"{}\"\n", title));
            for child in children {
                encode_node(out, child)?;
            }
        }
        Node::Paragraph(text) => {
            out.push_str(".sp\n");
            push_terminated(out, &escape_text(text));
        }
        Node::CodeBlock(text) => no_fill(out, &escape_text(text)),
        // No native tables: keep the columns aligned in a no-fill block.
        // Grid lines start with `+` or `|`, so only the cells need escaping.
        Node::Table(table) => no_fill(out, &grid::render(table, &table_cell)?),
        Node::LinkList(entries) => {
            let names: Vec<&str> = entries.iter().map(|e| e.display.as_str()).collect();
            out.push_str(".sp\n");
            push_terminated(out, &names.join(", "));
        }
    }
    Ok(())
}

/// Verbatim block of already escaped text: indentation reset on nroff
/// devices, fill mode off.
fn no_fill(out: &mut String, escaped: &str) {
    out.push_str(".if n \\{\\\n");
    out.push_str(".RS 0\n");
    out.push_str(".\\}\n");
    out.push_str(".nf\n");
    push_terminated(out, escaped);
    out.push_str(".fi\n");
    out.push_str(".if n \\{\\\n");
    out.push_str(".RE\n");
    out.push_str(".\\}\n");
}

/// Table cells are escaped like item names and padded by their printed
/// width: `\-` and `\e` print one character, `\&` none.
fn table_cell(raw: &str) -> Cell {
    Cell {
        text: escape_display(raw, Dialect::Troff),
        width: raw.chars().count(),
    }
}

fn push_terminated(out: &mut String, text: &str) {
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
}

// -- Text escaping ------------------------------------------------------------
//
// The two steps must run in this order: `\&` inserted by the second step would
// otherwise be rewritten to `\e&` by the first.

/// Escape raw text for use as troff body text.
pub fn escape_text(text: &str) -> String {
    protect_control_lines(&escape_backslashes(text))
}

/// Replace every backslash with `\e`, the printable escape character.
///
/// Any input. Afterwards every backslash in the result starts an `\e`.
pub fn escape_backslashes(text: &str) -> String {
    text.replace('\\', "\\e")
}

/// Insert the zero-width `\&` before a `.` or `'` in column one so the line
/// is not read as a request. The rest of the line is unchanged.
///
/// Expects backslashes to be escaped already.
pub fn protect_control_lines(text: &str) -> String {
    RE_CONTROL_LINE.replace_all(text, r"\&${1}").into_owned()
}

/// Header comments, `.TH`, and default formatting requests.
fn preamble(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str("'\\\" t\n");
    out.push_str(&format!(".\\\"     Title: {}\n", doc.title.to_lowercase()));
    out.push_str(".\\\"    Author: [see the \"AUTHOR\" section]\n");
    out.push_str(&format!(".\\\" Generator: {}\n", doc.generator));
    out.push_str(&format!(".\\\"      Date: {}\n", doc.date));
    out.push_str(".\\\"    Manual: \\ \\&\n");
    out.push_str(".\\\"    Source: \\ \\&\n");
    out.push_str(".\\\"  Language: English\n");
    out.push_str(".\\\"\n");
    out.push_str(&format!(
        ".TH \"{}\" \"{}\" \"{}\" \"\\ \\&\" \"\\ \\&\"\n",
        doc.title.to_uppercase(),
        doc.manual_section,
        doc.date
    ));
    out.push_str(RULE);
    out.push_str(".\\\" * Portability definitions\n");
    out.push_str(".\\\" ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~\n");
    out.push_str(".\\\" http://bugs.debian.org/507673\n");
    out.push_str(".\\\" http://lists.gnu.org/archive/html/groff/2009-02/msg00013.html\n");
    out.push_str(".\\\" ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~\n");
    out.push_str(".ie \\n(.g .ds Aq \\(aq\n");
    out.push_str(".el       .ds Aq '\n");
    out.push_str(RULE);
    out.push_str(".\\\" * set default formatting\n");
    out.push_str(RULE);
    out.push_str(".\\\" disable hyphenation\n");
    out.push_str(".nh\n");
    out.push_str(".\\\" disable justification (adjust text to left margin only)\n");
    out.push_str(".ad l\n");
    out.push_str(RULE);
    out
}

const RULE: &str = ".\\\" -----------------------------------------------------------------\n";
