//! # Variables
//!
//! `@name = value` declarations scanned from a request-definition file, and
//! `{{name}}` interpolation of request targets against them.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@(\w+)\s*=\s*(.*)$").expect("valid declaration pattern"));

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("valid reference pattern"));

/// Declared variables, last declaration wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    values: BTreeMap<String, String>,
}

/// Outcome of scanning a file for declarations. `malformed` holds the
/// 1-based line numbers of `@` lines that declare nothing.
#[derive(Debug, Clone, Default)]
pub struct VariableScan {
    pub table: VariableTable,
    pub malformed: Vec<usize>,
}

/// Text after interpolation, plus the references nothing resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolated {
    pub text: String,
    pub unresolved: Vec<String>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace every `{{name}}` with its value in a single pass. Values are
    /// not re-scanned, and unknown references stay literal.
    pub fn interpolate(&self, text: &str) -> Interpolated {
        let mut unresolved = Vec::new();
        let replaced = REFERENCE.replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            match self.values.get(name) {
                Some(value) => value.clone(),
                None => {
                    if !unresolved.iter().any(|seen| seen == name) {
                        unresolved.push(name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });

        Interpolated {
            text: replaced.into_owned(),
            unresolved,
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = VariableTable::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

/// Scan raw text for variable declarations.
pub fn extract_variables(text: &str) -> VariableScan {
    let mut scan = VariableScan::default();

    for (index, line) in text.lines().enumerate() {
        if !line.trim_start().starts_with('@') {
            continue;
        }

        let declared = DECLARATION.captures(line).and_then(|caps| {
            let value = caps[2].trim();
            (!value.is_empty()).then(|| (caps[1].to_string(), value.to_string()))
        });

        match declared {
            Some((name, value)) => scan.table.insert(name, value),
            None => scan.malformed.push(index + 1),
        }
    }

    scan
}
