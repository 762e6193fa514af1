//! Category walks over the query tree
//!
//! The walks run in a fixed order and each one only refines what the
//! previous ones decided: whitespace removal, literal classification,
//! subquery marking, function marking, table marking.

use serde::{Deserialize, Serialize};

use crate::keywords::TABLE_SCOPE_CLOSERS;
use crate::tree::{Group, GroupKind, LeafKind, Node};

/// Semantic category of a query tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryCategory {
    Keyword,
    Function,
    Table,
    Column,
    Integer,
    Float,
    Hex,
    String,
    Wildcard,
    Subquery,
    Other,
    Blank,
    Internal,
    /// Not yet classified
    Dud,
}

impl QueryCategory {
    /// Fixed replacement text for numeric literals
    pub fn literal_code(self) -> Option<&'static str> {
        match self {
            QueryCategory::Integer => Some("CODINT"),
            QueryCategory::Float => Some("CODFLO"),
            QueryCategory::Hex => Some("CODHEX"),
            _ => None,
        }
    }
}

/// Run every walk over `root` in order
pub fn classify(root: &mut Group) {
    strip_whitespace(root);
    classify_literals(root);
    root.category = QueryCategory::Subquery;
    mark_subqueries(root);
    FunctionWalk::default().walk(root);
    mark_tables(root, &mut Vec::new());
}

pub fn strip_whitespace(group: &mut Group) {
    group.children.retain(|child| {
        !matches!(child, Node::Leaf(leaf) if leaf.kind == LeafKind::Whitespace)
    });
    for child in &mut group.children {
        if let Node::Group(inner) = child {
            strip_whitespace(inner);
        }
    }
}

pub fn classify_literals(group: &mut Group) {
    group.category = QueryCategory::Internal;
    for child in &mut group.children {
        match child {
            Node::Group(inner) => classify_literals(inner),
            Node::Leaf(leaf) => {
                leaf.category = match leaf.kind {
                    LeafKind::Keyword => QueryCategory::Keyword,
                    LeafKind::Integer => QueryCategory::Integer,
                    LeafKind::Float => QueryCategory::Float,
                    LeafKind::Hex => QueryCategory::Hex,
                    LeafKind::String | LeafKind::StringSymbol => QueryCategory::String,
                    LeafKind::Wildcard => QueryCategory::Wildcard,
                    LeafKind::Name | LeafKind::Placeholder => QueryCategory::Column,
                    LeafKind::Whitespace => QueryCategory::Blank,
                    LeafKind::Builtin | LeafKind::Punctuation | LeafKind::Operator => {
                        QueryCategory::Other
                    }
                };
            }
        }
    }
}

/// Tag parenthesis groups containing `select` at any depth; returns whether
/// `group` itself contains one
pub fn mark_subqueries(group: &mut Group) -> bool {
    let mut found = false;
    for child in &mut group.children {
        match child {
            Node::Leaf(leaf) => found |= leaf.is_keyword("select"),
            Node::Group(inner) => {
                let nested = mark_subqueries(inner);
                if nested && inner.kind == GroupKind::Parenthesis {
                    inner.category = QueryCategory::Subquery;
                }
                found |= nested;
            }
        }
    }
    found
}

/// Tags a function node and its name; the flag drops at the function's
/// parenthesis group
#[derive(Debug, Default)]
struct FunctionWalk {
    within_function: bool,
}

impl FunctionWalk {
    fn walk(&mut self, group: &mut Group) {
        for child in &mut group.children {
            if let Node::Group(inner) = child {
                match inner.kind {
                    GroupKind::Function => self.within_function = true,
                    GroupKind::Parenthesis => self.within_function = false,
                    GroupKind::Statement => {}
                }
            }
            if self.within_function {
                child.set_category(QueryCategory::Function);
            }
            if let Node::Group(inner) = child {
                self.walk(inner);
            }
        }
    }
}

/// Promote COLUMN nodes to TABLE inside `from` clauses and on the left of
/// qualified names
pub fn mark_tables(group: &mut Group, scopes: &mut Vec<bool>) {
    let scoped = group.category == QueryCategory::Subquery;
    if scoped {
        scopes.push(false);
    }

    for idx in 0..group.children.len() {
        let qualifies_previous = idx > 0
            && is_punctuation(&group.children[idx], ".")
            && group.children[idx - 1].category() == QueryCategory::Column;

        if qualifies_previous {
            group.children[idx - 1].set_category(QueryCategory::Table);
        } else if let Some(leaf) = group.children[idx].as_leaf() {
            if leaf.is_keyword("from") {
                set_scope(scopes, true);
            } else if TABLE_SCOPE_CLOSERS.iter().any(|word| leaf.is_keyword(word)) {
                set_scope(scopes, false);
            }
        }

        let in_from = scopes.last().copied().unwrap_or(false);
        match &mut group.children[idx] {
            Node::Group(inner) => mark_tables(inner, scopes),
            Node::Leaf(leaf) if in_from && leaf.category == QueryCategory::Column => {
                leaf.category = QueryCategory::Table;
            }
            Node::Leaf(_) => {}
        }
    }

    if scoped {
        scopes.pop();
    }
}

fn is_punctuation(node: &Node, text: &str) -> bool {
    node.as_leaf().is_some_and(|leaf| leaf.is_punctuation(text))
}

fn set_scope(scopes: &mut [bool], value: bool) {
    if let Some(top) = scopes.last_mut() {
        *top = value;
    }
}
