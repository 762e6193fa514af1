//! Word lists used to classify unquoted SQL words

use std::collections::HashSet;

use lazy_static::lazy_static;

lazy_static! {
    /// Reserved words treated as keywords; aggregate and scalar function
    /// names are deliberately absent so `count(x)` groups as a function.
    pub static ref KEYWORDS: HashSet<&'static str> = [
        "add", "after", "all", "alter", "and", "any", "as", "asc", "auto_increment", "before",
        "begin", "between", "by", "cascade", "case", "cast", "check", "close", "collate",
        "column", "commit", "constraint", "create", "cross", "cursor", "database", "declare",
        "default", "delete", "desc", "distinct", "do", "drop", "each", "else", "end", "escape",
        "except", "exec", "execute", "exists", "false", "fetch", "first", "following", "for",
        "foreign", "from", "full", "go", "grant", "group", "having", "identity", "if", "ilike",
        "in", "inner", "insert", "instead", "intersect", "interval", "into", "is", "join", "key",
        "last", "lateral", "left", "like", "limit", "loop", "matched", "merge", "modify",
        "natural", "next", "not", "nothing", "null", "nulls", "of", "offset", "on", "only",
        "open", "or", "order", "outer", "over", "partition", "preceding", "primary", "procedure",
        "recursive", "references", "regexp", "rename", "returning", "returns", "revoke", "right",
        "rollback", "rows", "schema", "select", "set", "some", "then", "to", "top",
        "transaction", "trigger", "true", "truncate", "unbounded", "union", "unique", "update",
        "use", "using", "values", "view", "when", "where", "while", "with",
    ]
    .into_iter()
    .collect();

    /// Built-in type names; neither keywords nor renameable names
    pub static ref BUILTIN_TYPES: HashSet<&'static str> = [
        "bigint", "binary", "bit", "blob", "bool", "boolean", "char", "clob", "date", "datetime",
        "decimal", "double", "float", "int", "integer", "json", "jsonb", "money", "nchar",
        "numeric", "nvarchar", "real", "serial", "smallint", "time", "timestamp", "tinyint",
        "uuid", "varbinary", "varchar",
    ]
    .into_iter()
    .collect();
}

/// Keywords that switch the table-name flag off inside a scope
pub const TABLE_SCOPE_CLOSERS: &[&str] = &["where", "on", "group", "order", "union"];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(word)
}

pub fn is_builtin_type(word: &str) -> bool {
    BUILTIN_TYPES.contains(word)
}
