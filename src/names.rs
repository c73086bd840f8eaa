//! Item name resolution: raw verb/function/keyword names to display names and
//! link anchors.
//!
//! Operator-like function names (`*`, `.+`, `|`, `-` ...) collide with markup
//! syntax in every dialect, so each dialect gets its own table of pre-escaped
//! display names. Anything not in the table maps to itself.

use crate::render::Dialect;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static RE_NON_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9-]+").unwrap());

/// Operator spellings and the anchors they link to. `?:` and `?` share one.
const OPERATOR_ANCHORS: &[(&str, &str)] = &[
    ("+", "plus"),
    ("-", "minus"),
    ("*", "times"),
    ("/", "slash"),
    ("//", "slashslash"),
    ("**", "exponentiation"),
    (".+", "dotplus"),
    (".-", "dotminus"),
    (".*", "dottimes"),
    ("./", "dotslash"),
    ("%", "percent"),
    ("~", "bitwise-not"),
    ("&", "bitwise-and"),
    ("|", "bitwise-or"),
    ("^", "bitwise-xor"),
    ("<<", "left-shift"),
    (">>", "signed-right-shift"),
    (">>>", "unsigned-right-shift"),
    ("!", "logical-not"),
    ("==", "equals"),
    ("!=", "not-equals"),
    (">", "greater-than"),
    (">=", "greater-than-or-equals"),
    ("<=>", "spaceship"),
    ("<", "less-than"),
    ("<=", "less-than-or-equals"),
    ("=~", "regmatch"),
    ("!=~", "regnotmatch"),
    ("&&", "logical-and"),
    ("||", "logical-or"),
    ("^^", "logical-xor"),
    ("??", "absent-coalescing"),
    ("???", "absent-empty-coalescing"),
    ("?:", "question-mark-colon"),
    ("?", "question-mark-colon"),
    (".", "dot"),
];

/// Display form and link anchor for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub display: String,
    pub anchor: String,
}

impl NameEntry {
    pub fn new(display: impl Into<String>, anchor: impl Into<String>) -> Self {
        NameEntry {
            display: display.into(),
            anchor: anchor.into(),
        }
    }

    /// Whether the heading needs an explicit anchor marker to be linkable.
    pub fn needs_anchor(&self) -> bool {
        self.display != self.anchor
    }
}

/// Immutable lookup table keyed by exact raw name.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    entries: HashMap<String, NameEntry>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The operator table with display names escaped for `dialect`.
    pub fn builtin(dialect: Dialect) -> Self {
        let mut table = NameTable::new();
        for (raw, anchor) in OPERATOR_ANCHORS {
            table.insert(raw, escape_display(raw, dialect), anchor);
        }
        table
    }

    /// Add an entry. The anchor is reduced to letters, digits and hyphens.
    pub fn insert(&mut self, raw: &str, display: impl Into<String>, anchor: &str) {
        self.entries
            .insert(raw.to_string(), NameEntry::new(display, sanitize_anchor(anchor)));
    }

    pub fn get(&self, raw: &str) -> Option<&NameEntry> {
        self.entries.get(raw)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves raw names against a [`NameTable`]. Total: unknown names map to
/// themselves.
#[derive(Debug, Clone)]
pub struct NameResolver {
    table: NameTable,
}

impl NameResolver {
    pub fn new(table: NameTable) -> Self {
        NameResolver { table }
    }

    pub fn resolve(&self, raw: &str) -> NameEntry {
        match self.table.get(raw) {
            Some(entry) => entry.clone(),
            None => NameEntry::new(raw, raw),
        }
    }
}

/// Reduce an anchor to a link-safe token.
///
/// `"dot plus"` → `"dot-plus"`, `"--x--"` → `"x"`
pub fn sanitize_anchor(anchor: &str) -> String {
    RE_NON_ANCHOR
        .replace_all(anchor, "-")
        .trim_matches('-')
        .to_string()
}

/// Escape a name so it reads literally in `dialect`.
pub fn escape_display(raw: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::Troff => escape_troff_name(raw),
        Dialect::Markdown => backslash_escape(raw, "\\`*_{}[]()#+-.!|<>~^"),
        Dialect::Rst => escape_rst_name(raw),
    }
}

/// Inline markup characters are escaped everywhere. A leading punctuation
/// character is escaped too: alone on a line or at the start of a table cell,
/// `-`, `+`, `>>>`, `..` and the like open lists, blocks or comments.
fn escape_rst_name(raw: &str) -> String {
    let escaped = backslash_escape(raw, "\\`*_|");
    match escaped.chars().next() {
        Some(c) if c.is_ascii_punctuation() && c != '\\' => format!("\\{}", escaped),
        _ => escaped,
    }
}

fn escape_troff_name(raw: &str) -> String {
    let escaped = raw.replace('\\', "\\e").replace('-', "\\-");
    if escaped.starts_with('.') || escaped.starts_with('\'') {
        format!("\\&{}", escaped)
    } else {
        escaped
    }
}

fn backslash_escape(raw: &str, special: &str) -> String {
    let mut out = String::with_capacity(raw.len() * 2);
    for c in raw.chars() {
        if special.contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minus_resolves_for_troff() {
        let resolver = NameResolver::new(NameTable::builtin(Dialect::Troff));
        assert_eq!(resolver.resolve("-"), NameEntry::new("\\-", "minus"));
    }

    #[test]
    fn dot_operators_for_troff() {
        let resolver = NameResolver::new(NameTable::builtin(Dialect::Troff));
        assert_eq!(resolver.resolve(".+").display, "\\&.+");
        assert_eq!(resolver.resolve(".-").display, "\\&.\\-");
    }

    #[test]
    fn markdown_escapes_markup_characters() {
        let resolver = NameResolver::new(NameTable::builtin(Dialect::Markdown));
        assert_eq!(resolver.resolve("**"), NameEntry::new("\\*\\*", "exponentiation"));
        assert_eq!(resolver.resolve("|"), NameEntry::new("\\|", "bitwise-or"));
        assert_eq!(resolver.resolve("."), NameEntry::new("\\.", "dot"));
    }

    #[test]
    fn rst_escapes_inline_markup_and_leading_markers() {
        let resolver = NameResolver::new(NameTable::builtin(Dialect::Rst));
        assert_eq!(resolver.resolve("-").display, "\\-");
        assert_eq!(resolver.resolve("+").display, "\\+");
        assert_eq!(resolver.resolve(".+").display, "\\.+");
        assert_eq!(resolver.resolve(">>>").display, "\\>>>");
        assert_eq!(resolver.resolve("*").display, "\\*");
        assert_eq!(resolver.resolve("**").display, "\\*\\*");
        assert_eq!(resolver.resolve("<=>").display, "\\<=>");
    }

    #[test]
    fn rst_leaves_inner_punctuation_alone() {
        assert_eq!(escape_display("a-b", Dialect::Rst), "a-b");
        assert_eq!(escape_display("1,2", Dialect::Rst), "1,2");
        assert_eq!(escape_display("strlen", Dialect::Rst), "strlen");
    }

    #[test]
    fn unknown_names_map_to_themselves() {
        let resolver = NameResolver::new(NameTable::builtin(Dialect::Markdown));
        assert_eq!(
            resolver.resolve("clean_whitespace"),
            NameEntry::new("clean_whitespace", "clean_whitespace")
        );
        assert_eq!(resolver.resolve(""), NameEntry::new("", ""));
    }

    #[test]
    fn conditional_spellings_share_an_anchor() {
        let resolver = NameResolver::new(NameTable::builtin(Dialect::Markdown));
        assert_eq!(resolver.resolve("?:").anchor, resolver.resolve("?").anchor);
    }

    #[test]
    fn every_builtin_anchor_is_link_safe() {
        for dialect in [Dialect::Troff, Dialect::Markdown, Dialect::Rst] {
            let table = NameTable::builtin(dialect);
            assert!(!table.is_empty());
            for (raw, _) in OPERATOR_ANCHORS {
                let entry = table.get(raw).unwrap();
                assert!(entry
                    .anchor
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-'));
            }
        }
    }

    #[test]
    fn fixture_table_substitution() {
        let mut table = NameTable::new();
        table.insert("sec2gmt", "sec2gmt()", "time to string");
        let resolver = NameResolver::new(table);
        assert_eq!(
            resolver.resolve("sec2gmt"),
            NameEntry::new("sec2gmt()", "time-to-string")
        );
        assert_eq!(resolver.resolve("-"), NameEntry::new("-", "-"));
    }

    #[test]
    fn sanitize_collapses_and_trims() {
        assert_eq!(sanitize_anchor("dot plus"), "dot-plus");
        assert_eq!(sanitize_anchor("--x--"), "x");
        assert_eq!(sanitize_anchor("a::b"), "a-b");
    }

    #[test]
    fn needs_anchor_only_when_names_differ() {
        assert!(NameEntry::new("\\-", "minus").needs_anchor());
        assert!(!NameEntry::new("strlen", "strlen").needs_anchor());
    }
}
