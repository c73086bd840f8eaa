//! Document driver: turns introspection answers into a [`Document`].
//!
//! Each [`Page`] is a fixed plan of queries. Item lists are de-duplicated,
//! every item gets a subsection titled with its resolved display name, and
//! its help text goes verbatim into a code block.

use crate::error::{Error, Result};
use crate::introspect::Introspector;
use crate::model::{Document, DocumentBuilder, ItemList, TableModel};
use crate::names::{NameEntry, NameResolver};

const GENERATOR: &str = env!("CARGO_PKG_NAME");

const NAME: &str =
    "miller - like awk, sed, cut, join, and sort for name-indexed data such as CSV and tabular JSON.";

const DESCRIPTION: &str = "Miller operates on key-value-pair data while the familiar Unix tools operate
on integer-indexed fields: if the natural data structure for the latter is the
array, then Miller's natural data structure is the insertion-ordered hash map.
This encompasses a variety of data formats, including but not limited to the
familiar CSV, TSV, and JSON.  (Miller can handle positionally-indexed data as
a special case.)";

const AUTHOR: &[&str] = &[
    "Miller is written by John Kerl <kerl.john.r@gmail.com>.",
    "This manual page has been composed from Miller's help output by Eric MSP Veith <eveith@veith-m.de>.",
];

const SEE_ALSO: &str = "awk(1), sed(1), cut(1), join(1), sort(1), RFC 4180: Common Format and MIME Type for \
Comma-Separated Values (CSV) Files, the Miller docsite https://miller.readthedocs.io";

/// Which document to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Page {
    /// The complete manual page
    Manpage,
    /// Reference for every verb
    Verbs,
    /// Reference for every DSL built-in function
    Functions,
    /// Reference for every DSL keyword
    Keywords,
    /// Reference for every main flag, grouped by flag section
    Flags,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Manpage => "miller",
            Page::Verbs => "Verbs Reference",
            Page::Functions => "Built-in Functions Reference",
            Page::Keywords => "DSL Keywords Reference",
            Page::Flags => "Main Flags Reference",
        }
    }

    /// File name, without extension, used when writing into a directory.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Page::Manpage => "mlr",
            Page::Verbs => "reference-verbs",
            Page::Functions => "reference-dsl-builtin-functions",
            Page::Keywords => "reference-dsl-keywords",
            Page::Flags => "reference-main-flag-list",
        }
    }
}

/// What to do when the help query for a single item fails.
///
/// Failing list queries always abort the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemErrorPolicy {
    /// Stop the whole run
    #[default]
    Abort,
    /// Log a warning and leave the item out
    Skip,
}

pub struct Generator<'a> {
    client: &'a dyn Introspector,
    resolver: &'a NameResolver,
    item_errors: ItemErrorPolicy,
    date: String,
}

impl<'a> Generator<'a> {
    pub fn new(client: &'a dyn Introspector, resolver: &'a NameResolver) -> Self {
        Generator {
            client,
            resolver,
            item_errors: ItemErrorPolicy::default(),
            date: String::new(),
        }
    }

    pub fn with_item_errors(mut self, policy: ItemErrorPolicy) -> Self {
        self.item_errors = policy;
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn build(&self, page: Page) -> Result<Document> {
        tracing::info!(?page, "building document");
        let mut b = DocumentBuilder::new(page.title())
            .date(self.date.as_str())
            .generator(GENERATOR);
        match page {
            Page::Manpage => self.manpage(&mut b)?,
            Page::Verbs => self.verbs(&mut b)?,
            Page::Functions => self.functions(&mut b)?,
            Page::Keywords => self.keywords(&mut b)?,
            Page::Flags => self.flags(&mut b)?,
        }
        Ok(b.finish())
    }

    // -- Pages ----------------------------------------------------------------

    fn manpage(&self, b: &mut DocumentBuilder) -> Result<()> {
        b.add_section("NAME");
        b.add_paragraph(NAME);

        b.add_section("SYNOPSIS");
        b.add_paragraph(self.client.query_text(&["--help"])?);

        let version = self.client.query_text(&["--version"])?;
        b.add_section("DESCRIPTION");
        b.add_paragraph(format!(
            "{} This manpage documents {}.",
            DESCRIPTION,
            version.trim_end()
        ));

        let overviews: [(&str, &[&str]); 5] = [
            ("EXAMPLES", &["help", "basic-examples"]),
            ("DATA FORMATS", &["help", "data-formats"]),
            ("HELP OPTIONS", &["help", "topics"]),
            ("VERB LIST", &["help", "list-verbs-as-paragraph"]),
            ("FUNCTION LIST", &["help", "list-functions-as-paragraph"]),
        ];
        for (title, query) in overviews {
            b.add_section(title);
            b.add_code_block(self.client.query_text(query)?);
        }

        for section in self.list(&["help", "list-flag-sections"])?.iter() {
            let Some(text) = self.detail(section, &["help", "show-help-for-section", section])? else {
                continue;
            };
            b.add_section(section.to_uppercase());
            b.add_code_block(text);
        }

        let extras: [(&str, &[&str]); 3] = [
            ("AUXILIARY COMMANDS", &["aux-list"]),
            ("MLRRC", &["help", "mlrrc"]),
            ("REPL", &["repl", "-h"]),
        ];
        for (title, query) in extras {
            b.add_section(title);
            b.add_code_block(self.client.query_text(query)?);
        }

        let verbs = self.list(&["help", "list-verbs"])?;
        b.add_section("VERBS");
        add_items(b, self.collect(&verbs, |verb| self.client.query_text(&[verb, "-h"]))?)?;

        let functions = self.list(&["help", "list-functions"])?;
        b.add_section("FUNCTIONS FOR FILTER/PUT");
        add_items(b, self.collect(&functions, |f| self.function_help(f))?)?;

        let keywords = self.list(&["help", "list-keywords"])?;
        b.add_section("KEYWORDS FOR PUT AND FILTER");
        add_items(b, self.collect(&keywords, |k| self.keyword_help(k))?)?;

        b.add_section("AUTHOR");
        for line in AUTHOR {
            b.add_paragraph(*line);
        }
        b.add_section("SEE ALSO");
        b.add_paragraph(SEE_ALSO);
        Ok(())
    }

    fn verbs(&self, b: &mut DocumentBuilder) -> Result<()> {
        let verbs = self.list(&["help", "list-verbs"])?;
        let items = self.collect(&verbs, |verb| self.client.query_text(&[verb, "--help"]))?;

        b.add_section("Verb list");
        b.add_link_list(link_index(&items));
        b.add_section("Verbs");
        add_items(b, items)
    }

    fn functions(&self, b: &mut DocumentBuilder) -> Result<()> {
        let summary = self.function_table()?;
        let functions = self.list(&["help", "list-functions"])?;
        let items = self.collect(&functions, |f| self.function_help(f))?;

        b.add_section("Summary");
        b.add_table(summary);
        b.add_section("Function list");
        b.add_link_list(link_index(&items));
        b.add_section("Functions");
        add_items(b, items)
    }

    fn keywords(&self, b: &mut DocumentBuilder) -> Result<()> {
        let keywords = self.list(&["help", "list-keywords"])?;
        let items = self.collect(&keywords, |k| self.keyword_help(k))?;

        b.add_section("Keyword list");
        b.add_link_list(link_index(&items));
        b.add_section("Keywords");
        add_items(b, items)
    }

    fn flags(&self, b: &mut DocumentBuilder) -> Result<()> {
        for section in self.list(&["help", "list-flag-sections"])?.iter() {
            let flags = self.list(&["help", "list-flags-for-section", section])?;
            let items = self.collect(&flags, |flag| {
                self.client.query_text(&["help", "show-help-for-flag", flag])
            })?;

            b.add_section(section);
            b.add_link_list(link_index(&items));
            add_items(b, items)?;
        }
        Ok(())
    }

    // -- Helpers --------------------------------------------------------------

    fn list(&self, query: &[&str]) -> Result<ItemList> {
        let items = ItemList::from_lines(self.client.query(query)?);
        tracing::debug!(count = items.len(), "listed items");
        Ok(items)
    }

    /// Run a per-item query, applying the item error policy.
    fn detail(&self, item: &str, query: &[&str]) -> Result<Option<String>> {
        self.detail_with(item, || self.client.query_text(query))
    }

    fn detail_with<F>(&self, item: &str, fetch: F) -> Result<Option<String>>
    where
        F: FnOnce() -> Result<String>,
    {
        match fetch() {
            Ok(text) => Ok(Some(text)),
            Err(e) if self.item_errors == ItemErrorPolicy::Skip => {
                tracing::warn!(item, error = %e, "skipping item");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve every item and fetch its help text, in list order. Items
    /// skipped under [`ItemErrorPolicy::Skip`] are left out.
    fn collect<F>(&self, items: &ItemList, help: F) -> Result<Vec<(NameEntry, String)>>
    where
        F: Fn(&str) -> Result<String>,
    {
        let mut collected = Vec::with_capacity(items.len());
        for item in items.iter() {
            if let Some(text) = self.detail_with(item, || help(item))? {
                collected.push((self.resolver.resolve(item), text));
            }
        }
        Ok(collected)
    }

    fn keyword_help(&self, name: &str) -> Result<String> {
        self.client.query_text(&["help", "keyword", name])
    }

    /// Function help starts by echoing the function name; drop that echo.
    fn function_help(&self, name: &str) -> Result<String> {
        let text = self.client.query_text(&["help", "function", name])?;
        Ok(text.replacen(&format!("{} ", name), "", 1))
    }

    /// `Name Class Args` summary. Every line must split into as many
    /// whitespace-separated cells as the header line. Cells stay raw; each
    /// encoder escapes them for its own table layout.
    fn function_table(&self) -> Result<TableModel> {
        let query = ["help", "list-functions-as-table"];
        let lines = self.client.query(&query)?;
        let mut rows = lines.iter().filter(|l| !l.trim().is_empty());

        let header = rows
            .next()
            .ok_or_else(|| malformed(&query, "no header line"))?;
        let mut table = TableModel::new(header.split_whitespace());
        for line in rows {
            let cells: Vec<&str> = line.split_whitespace().collect();
            if cells.len() != table.arity() {
                return Err(malformed(
                    &query,
                    &format!("expected {} columns in line {:?}", table.arity(), line),
                ));
            }
            table.push_row(cells);
        }
        Ok(table)
    }
}

/// One subsection plus code block per item.
fn add_items(b: &mut DocumentBuilder, items: Vec<(NameEntry, String)>) -> Result<()> {
    for (name, text) in items {
        b.add_anchored_subsection(&name)?;
        b.add_code_block(text);
    }
    Ok(())
}

fn link_index(items: &[(NameEntry, String)]) -> Vec<NameEntry> {
    items.iter().map(|(name, _)| name.clone()).collect()
}

fn malformed(query: &[&str], detail: &str) -> Error {
    Error::external(query.join(" "), Some(0), format!("malformed output: {}", detail))
}
