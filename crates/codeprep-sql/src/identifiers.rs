//! Positional placeholders for tables and columns

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Name to placeholder assignments for one fragment, plus the inverse map
///
/// Numbering is dense and first-seen per kind: the first table gets `tab0`,
/// the next new table `tab1`, and the same name always gets the same
/// placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierMap {
    tables: HashMap<String, String>,
    columns: HashMap<String, String>,
    originals: HashMap<String, String>,
}

impl IdentifierMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder for table `name`, assigning the next `tabN` if new
    pub fn table(&mut self, name: &str) -> String {
        Self::assign(&mut self.tables, &mut self.originals, "tab", name)
    }

    /// Placeholder for column `name`, assigning the next `colN` if new
    pub fn column(&mut self, name: &str) -> String {
        Self::assign(&mut self.columns, &mut self.originals, "col", name)
    }

    fn assign(
        names: &mut HashMap<String, String>,
        originals: &mut HashMap<String, String>,
        prefix: &str,
        name: &str,
    ) -> String {
        if let Some(placeholder) = names.get(name) {
            return placeholder.clone();
        }
        let placeholder = format!("{prefix}{}", names.len());
        names.insert(name.to_string(), placeholder.clone());
        originals.insert(placeholder.clone(), name.to_string());
        placeholder
    }

    /// Original name behind `placeholder`
    pub fn original(&self, placeholder: &str) -> Option<&str> {
        self.originals.get(placeholder).map(String::as_str)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }
}
