//! Local symbol resolution
//!
//! A name is local when the fragment binds it: assignment targets, loop
//! variables, `with ... as` targets, walrus targets and `del` targets.
//! Attribute and subscript targets bind nothing.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};
use tree_sitter::{Node, Parser, Tree};

use crate::repair::repair;

lazy_static! {
    static ref ASSIGNED_NAMES: Regex =
        Regex::new(r"^(\s*[_a-zA-Z][_a-zA-Z0-9]*\s*)(,\s*[_a-zA-Z][_a-zA-Z0-9]*\s*)*=").unwrap();
    static ref LOOP_NAMES: Regex = Regex::new(
        r"\bfor\s+([_a-zA-Z][_a-zA-Z0-9]*\s*(?:,\s*[_a-zA-Z][_a-zA-Z0-9]*)*)\s+in\b"
    )
    .unwrap();
    static ref IDENTIFIER: Regex = Regex::new(r"^[_\p{Alphabetic}][_\p{Alphabetic}\d]*$").unwrap();
}

/// Node kinds whose named children are themselves binding targets
const TARGET_CONTAINERS: &[&str] = &[
    "pattern_list",
    "tuple_pattern",
    "list_pattern",
    "list_splat_pattern",
    "tuple",
    "list",
    "list_splat",
    "parenthesized_expression",
    "expression_list",
    "as_pattern_target",
];

/// Identifiers local to one fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSet(BTreeSet<String>);

impl SymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Extend<String> for SymbolSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<S: Into<String>> FromIterator<S> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for SymbolSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Resolved symbols and whether only the heuristic path succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub symbols: SymbolSet,
    pub degraded: bool,
}

/// Resolve the local symbols of `code`
///
/// Tries a structural parse of the fragment, then of its transcript-repaired
/// text, then falls back to line heuristics on the original. Never fails.
pub fn resolve(code: &str) -> Resolution {
    if let Some(symbols) = parse_bindings(code) {
        return Resolution {
            symbols,
            degraded: false,
        };
    }

    let repaired = repair(code);
    if let Some(symbols) = parse_bindings(&repaired.text) {
        debug!(strategy = ?repaired.strategy, "symbols resolved from repaired transcript");
        return Resolution {
            symbols,
            degraded: false,
        };
    }

    debug!("structural parse failed, using heuristic symbol resolution");
    Resolution {
        symbols: heuristic_bindings(code),
        degraded: true,
    }
}

/// Bindings of `source` if it parses without syntax errors
pub fn parse_bindings(source: &str) -> Option<SymbolSet> {
    let tree = parse(source)?;
    let root = tree.root_node();
    if root.has_error() {
        return None;
    }
    let mut symbols = SymbolSet::new();
    collect_bindings(root, source.as_bytes(), &mut symbols);
    Some(symbols)
}

/// Line-based fallback for fragments that do not parse as a whole
///
/// Shrinks the window of non-blank lines from the end until a prefix
/// parses, then handles every remaining line alone: structurally if it
/// parses by itself, by pattern otherwise.
pub fn heuristic_bindings(code: &str) -> SymbolSet {
    let lines: Vec<&str> = code
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();

    let mut end = lines.len();
    let mut symbols = loop {
        match parse_bindings(&lines[..end].join("\n")) {
            Some(found) => break found,
            None if end == 0 => break SymbolSet::new(),
            None => end -= 1,
        }
    };

    for line in &lines[end..] {
        let line = line.trim();
        match parse_bindings(line) {
            Some(found) => symbols.extend(found),
            None => symbols.extend(pattern_bindings(line)),
        }
    }
    symbols
}

/// Names bound by `a, b =` at the start of a line or `for a, b in` anywhere
fn pattern_bindings(line: &str) -> Vec<String> {
    let mut names = Vec::new();
    if let Some(found) = ASSIGNED_NAMES.find(line) {
        let targets = found.as_str().trim_end_matches('=');
        names.extend(split_names(targets));
    }
    if let Some(captures) = LOOP_NAMES.captures(line) {
        if let Some(targets) = captures.get(1) {
            names.extend(split_names(targets.as_str()));
        }
    }
    names
}

fn split_names(targets: &str) -> impl Iterator<Item = String> + '_ {
    targets
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn parse(source: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
    if let Err(err) = parser.set_language(&language) {
        warn!("python grammar rejected by tree-sitter: {err}");
        return None;
    }
    parser.parse(source, None)
}

fn collect_bindings(node: Node<'_>, source: &[u8], symbols: &mut SymbolSet) {
    match node.kind() {
        "assignment" | "augmented_assignment" | "for_statement" | "for_in_clause" => {
            if let Some(left) = node.child_by_field_name("left") {
                collect_targets(left, source, symbols);
            }
        }
        "named_expression" => {
            if let Some(name) = node.child_by_field_name("name") {
                collect_targets(name, source, symbols);
            }
        }
        "delete_statement" => {
            let mut cursor = node.walk();
            for target in node.named_children(&mut cursor) {
                collect_targets(target, source, symbols);
            }
        }
        "as_pattern" if node.parent().is_some_and(|parent| parent.kind() == "with_item") => {
            if let Some(alias) = node.child_by_field_name("alias") {
                collect_targets(alias, source, symbols);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_bindings(child, source, symbols);
    }
}

fn collect_targets(node: Node<'_>, source: &[u8], symbols: &mut SymbolSet) {
    let kind = node.kind();
    if kind == "identifier" {
        if let Ok(name) = node.utf8_text(source) {
            symbols.insert(name);
        }
        return;
    }
    if !TARGET_CONTAINERS.contains(&kind) {
        return;
    }
    if node.named_child_count() == 0 {
        // An aliased target can wrap a bare name without a child node.
        if let Ok(text) = node.utf8_text(source) {
            if IDENTIFIER.is_match(text) {
                symbols.insert(text);
            }
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_targets(child, source, symbols);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(symbols: &SymbolSet) -> Vec<&str> {
        symbols.iter().collect()
    }

    #[test]
    fn test_assignment_targets() {
        let symbols = parse_bindings("a, (b, *c) = f()\nd += 1\ne: int = 2\nx.attr = 3\ny[0] = 4").unwrap();
        assert_eq!(names(&symbols), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_loop_and_comprehension_targets() {
        let symbols = parse_bindings("for i, j in pairs:\n    pass\nsquares = [k * k for k in nums]").unwrap();
        assert_eq!(names(&symbols), vec!["i", "j", "k", "squares"]);
    }

    #[test]
    fn test_with_walrus_and_del_targets() {
        let symbols = parse_bindings(
            "with open(p) as fh:\n    pass\nif (n := len(xs)) > 1:\n    del tmp\ntry:\n    pass\nexcept E as err:\n    pass",
        )
        .unwrap();
        assert_eq!(names(&symbols), vec!["fh", "n", "tmp"]);
    }

    #[test]
    fn test_reads_are_not_bindings() {
        let symbols = parse_bindings("print(total)\nobj.method(arg)").unwrap();
        assert!(symbols.is_empty());
    }

    #[test]
    fn test_syntax_error_is_not_parsed() {
        assert!(parse_bindings("def broken(:\n  x = 1").is_none());
    }

    #[test]
    fn test_for_bound_name_survives_parse_failure() {
        let resolution = resolve("for item in items:\n    total += item\n    print(total");
        assert!(resolution.degraded);
        assert!(resolution.symbols.contains("item"));
        assert!(resolution.symbols.contains("total"));
    }

    #[test]
    fn test_pattern_fallback_on_single_broken_line() {
        let symbols = heuristic_bindings("for i in range(10) print(i)");
        assert_eq!(names(&symbols), vec!["i"]);
        let symbols = heuristic_bindings("a, b = 1, 2 )");
        assert_eq!(names(&symbols), vec!["a", "b"]);
    }

    #[test]
    fn test_repaired_transcript_is_used_before_heuristics() {
        let resolution = resolve(">>> value = compute()\n>>> value");
        assert!(!resolution.degraded);
        assert_eq!(names(&resolution.symbols), vec!["value"]);
    }

    #[test]
    fn test_empty_fragment() {
        let resolution = resolve("");
        assert!(resolution.symbols.is_empty());
        assert!(!resolution.degraded);
    }
}
