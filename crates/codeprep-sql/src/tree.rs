//! Structural tree over the lexed fragment
//!
//! The flat token stream from `sqlparser` is grouped into nested nodes:
//! a statement at the root, parenthesis groups for every balanced pair and
//! function groups for a name directly followed by a parenthesis. Only the
//! first statement of a fragment is kept.

use codeprep_common::{NormalizeError, NormalizeResult};
use sqlparser::dialect::GenericDialect;
use sqlparser::tokenizer::{Token, Tokenizer};
use tracing::trace;

use crate::classify::QueryCategory;
use crate::keywords::{is_builtin_type, is_keyword};

/// Lexical kind of a leaf, before classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Keyword,
    Name,
    /// Built-in type name such as `int` or `varchar`
    Builtin,
    Integer,
    Float,
    Hex,
    String,
    /// Double-quoted text
    StringSymbol,
    Wildcard,
    Placeholder,
    Punctuation,
    Operator,
    Whitespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Statement,
    Parenthesis,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub kind: LeafKind,
    pub text: String,
    pub category: QueryCategory,
}

impl Leaf {
    fn new(kind: LeafKind, text: String) -> Self {
        let category = if kind == LeafKind::Whitespace {
            QueryCategory::Blank
        } else {
            QueryCategory::Dud
        };
        Self {
            kind,
            text,
            category,
        }
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == LeafKind::Keyword && self.text == word
    }

    pub fn is_punctuation(&self, text: &str) -> bool {
        self.kind == LeafKind::Punctuation && self.text == text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub kind: GroupKind,
    pub children: Vec<Node>,
    pub category: QueryCategory,
}

impl Group {
    fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            category: QueryCategory::Dud,
        }
    }

    /// Leaves in source order
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Leaf>) {
        for child in &self.children {
            match child {
                Node::Leaf(leaf) => out.push(leaf),
                Node::Group(group) => group.collect_leaves(out),
            }
        }
    }

    /// Attach a closed parenthesis group, folding a preceding name into a
    /// function group
    fn attach_parenthesis(&mut self, paren: Group) {
        let name_at = self
            .children
            .iter()
            .rposition(|child| !matches!(child, Node::Leaf(leaf) if leaf.kind == LeafKind::Whitespace));
        let is_call = name_at.is_some_and(|idx| {
            matches!(&self.children[idx], Node::Leaf(leaf) if leaf.kind == LeafKind::Name)
        });

        match name_at {
            Some(idx) if is_call => {
                let mut function = Group::new(GroupKind::Function);
                function.children = self.children.split_off(idx);
                function.children.push(Node::Group(paren));
                self.children.push(Node::Group(function));
            }
            _ => self.children.push(Node::Group(paren)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(Leaf),
    Group(Group),
}

impl Node {
    pub fn category(&self) -> QueryCategory {
        match self {
            Node::Leaf(leaf) => leaf.category,
            Node::Group(group) => group.category,
        }
    }

    pub fn set_category(&mut self, category: QueryCategory) {
        match self {
            Node::Leaf(leaf) => leaf.category = category,
            Node::Group(group) => group.category = category,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Group(_) => None,
        }
    }
}

/// Lex a sanitized fragment into leaves
///
/// Lexer errors surface as [`NormalizeError::Query`] carrying the lexer's
/// message.
pub fn lex(sql: &str) -> NormalizeResult<Vec<Leaf>> {
    let dialect = GenericDialect {};
    let tokens = Tokenizer::new(&dialect, sql)
        .tokenize()
        .map_err(|err| NormalizeError::Query(err.to_string()))?;

    let mut leaves: Vec<Leaf> = tokens
        .into_iter()
        .filter(|token| !matches!(token, Token::EOF))
        .map(leaf_from_token)
        .collect();

    demote_qualified_keywords(&mut leaves);
    trace!(count = leaves.len(), "lexed sql fragment");
    Ok(leaves)
}

/// Lex and group a sanitized fragment
pub fn parse(sql: &str) -> NormalizeResult<Group> {
    Ok(build(lex(sql)?))
}

/// Group leaves into a statement tree, stopping after the first top-level
/// `;`
pub fn build(leaves: Vec<Leaf>) -> Group {
    let mut stack = vec![Group::new(GroupKind::Statement)];

    for leaf in leaves {
        if leaf.is_punctuation("(") {
            let mut paren = Group::new(GroupKind::Parenthesis);
            paren.children.push(Node::Leaf(leaf));
            stack.push(paren);
        } else if leaf.is_punctuation(")") && stack.len() > 1 {
            if let Some(mut paren) = stack.pop() {
                paren.children.push(Node::Leaf(leaf));
                if let Some(parent) = stack.last_mut() {
                    parent.attach_parenthesis(paren);
                }
            }
        } else if leaf.is_punctuation(";") && stack.len() == 1 {
            stack[0].children.push(Node::Leaf(leaf));
            break;
        } else if let Some(current) = stack.last_mut() {
            current.children.push(Node::Leaf(leaf));
        }
    }

    // Unbalanced `(` close at the end of input.
    while stack.len() > 1 {
        if let Some(paren) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.attach_parenthesis(paren);
            }
        }
    }

    stack.pop().unwrap_or_else(|| Group::new(GroupKind::Statement))
}

fn leaf_from_token(token: Token) -> Leaf {
    let text = token.to_string();
    let kind = match &token {
        Token::Word(word) => match word.quote_style {
            Some('"') => LeafKind::StringSymbol,
            Some(_) => LeafKind::Name,
            None if is_keyword(&word.value.to_lowercase()) => LeafKind::Keyword,
            None if is_builtin_type(&word.value.to_lowercase()) => LeafKind::Builtin,
            None => LeafKind::Name,
        },
        Token::Number(value, _) => number_kind(value),
        Token::HexStringLiteral(_) => LeafKind::Hex,
        Token::SingleQuotedString(_)
        | Token::DoubleQuotedString(_)
        | Token::NationalStringLiteral(_)
        | Token::EscapedStringLiteral(_)
        | Token::SingleQuotedByteStringLiteral(_)
        | Token::DoubleQuotedByteStringLiteral(_)
        | Token::DollarQuotedString(_) => LeafKind::String,
        Token::Placeholder(_) => LeafKind::Placeholder,
        Token::Mul => LeafKind::Wildcard,
        Token::Whitespace(_) => LeafKind::Whitespace,
        Token::Period | Token::Comma | Token::SemiColon | Token::LParen | Token::RParen => {
            LeafKind::Punctuation
        }
        _ => LeafKind::Operator,
    };
    Leaf::new(kind, text)
}

fn number_kind(value: &str) -> LeafKind {
    if value.starts_with("0x") || value.starts_with("0X") {
        LeafKind::Hex
    } else if value.contains(&['.', 'e', 'E'][..]) {
        LeafKind::Float
    } else {
        LeafKind::Integer
    }
}

/// A keyword next to `.` is part of a qualified name
fn demote_qualified_keywords(leaves: &mut [Leaf]) {
    let solid: Vec<usize> = leaves
        .iter()
        .enumerate()
        .filter(|(_, leaf)| leaf.kind != LeafKind::Whitespace)
        .map(|(idx, _)| idx)
        .collect();

    for (pos, &idx) in solid.iter().enumerate() {
        if leaves[idx].kind != LeafKind::Keyword {
            continue;
        }
        let before = pos.checked_sub(1).map(|p| solid[p]);
        let after = solid.get(pos + 1).copied();
        let qualified = [before, after]
            .into_iter()
            .flatten()
            .any(|neighbor| leaves[neighbor].is_punctuation("."));
        if qualified {
            leaves[idx].kind = LeafKind::Name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(sql: &str) -> Vec<(LeafKind, String)> {
        lex(sql)
            .unwrap()
            .into_iter()
            .filter(|leaf| leaf.kind != LeafKind::Whitespace)
            .map(|leaf| (leaf.kind, leaf.text))
            .collect()
    }

    #[test]
    fn test_leaf_kinds() {
        let leaves = kinds("select a , 1 , 2.5 , 'x' , \"y\" , * from t ;");
        let expected = vec![
            (LeafKind::Keyword, "select"),
            (LeafKind::Name, "a"),
            (LeafKind::Punctuation, ","),
            (LeafKind::Integer, "1"),
            (LeafKind::Punctuation, ","),
            (LeafKind::Float, "2.5"),
            (LeafKind::Punctuation, ","),
            (LeafKind::String, "'x'"),
            (LeafKind::Punctuation, ","),
            (LeafKind::StringSymbol, "\"y\""),
            (LeafKind::Punctuation, ","),
            (LeafKind::Wildcard, "*"),
            (LeafKind::Keyword, "from"),
            (LeafKind::Name, "t"),
            (LeafKind::Punctuation, ";"),
        ];
        let expected: Vec<(LeafKind, String)> = expected
            .into_iter()
            .map(|(kind, text)| (kind, text.to_string()))
            .collect();
        assert_eq!(leaves, expected);
    }

    #[test]
    fn test_builtin_types_and_qualified_keywords() {
        let leaves = kinds("cast ( x as varchar ) , t . key ;");
        assert_eq!(leaves[4], (LeafKind::Builtin, "varchar".to_string()));
        assert_eq!(leaves[9], (LeafKind::Name, "key".to_string()));
    }

    #[test]
    fn test_function_groups() {
        let tree = parse("select count ( x ) from t ;").unwrap();
        let function = tree
            .children
            .iter()
            .find_map(|child| match child {
                Node::Group(group) if group.kind == GroupKind::Function => Some(group),
                _ => None,
            })
            .unwrap();
        assert_eq!(function.children[0].as_leaf().unwrap().text, "count");
        assert!(matches!(
            function.children.last(),
            Some(Node::Group(group)) if group.kind == GroupKind::Parenthesis
        ));
    }

    #[test]
    fn test_keyword_before_parenthesis_is_not_a_function() {
        let tree = parse("select a from t where a in ( 1 , 2 ) ;").unwrap();
        assert!(tree.children.iter().all(|child| !matches!(
            child,
            Node::Group(group) if group.kind == GroupKind::Function
        )));
    }

    #[test]
    fn test_only_first_statement_is_kept() {
        let tree = parse("select a ; select b ;").unwrap();
        let texts: Vec<&str> = tree.leaves().iter().map(|leaf| leaf.text.as_str()).collect();
        assert_eq!(texts, vec!["select", " ", "a", " ", ";"]);
    }

    #[test]
    fn test_unbalanced_parenthesis_closes_at_end() {
        let tree = parse("select ( a ;").unwrap();
        assert_eq!(tree.leaves().len(), 7);
        assert!(matches!(tree.children.last(), Some(Node::Group(_))));
    }

    #[test]
    fn test_lexer_error_carries_message() {
        let err = parse("select ' unterminated ;").unwrap_err();
        match err {
            NormalizeError::Query(message) => assert!(message.contains("Unterminated")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
