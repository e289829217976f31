//! Toolkit reports for the command line: label/value tables built from
//! the encode/decode pipeline

pub mod decode;
pub mod encode;
pub mod selector;

use std::fmt;

/// Result of a toolkit operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub title: String,
    pub content: Vec<(String, String)>, // (label, value) pairs
}

impl ToolResult {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    pub fn add(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.content.push((label.into(), value.into()));
        self
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.content
            .iter()
            .find(|(k, _)| k == label)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ToolResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        let width = self.content.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (label, value) in &self.content {
            writeln!(f, "  {:<width$}  {}", label, value, width = width)?;
        }
        Ok(())
    }
}
