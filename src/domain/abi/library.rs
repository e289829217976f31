//! ABI library - stored contract ABIs selectable as encode targets

use serde::{Deserialize, Serialize};

use super::{function_options, parse_abi, AbiEntry, FunctionOption};
use crate::core::Result;

/// One stored ABI as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiRecord {
    pub id: u64,
    pub name: String,
    /// Raw ABI JSON array text
    pub abi_content: String,
}

impl AbiRecord {
    pub fn new(id: u64, name: impl Into<String>, abi_content: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            abi_content: abi_content.into(),
        }
    }

    pub fn entries(&self) -> Result<Vec<AbiEntry>> {
        parse_abi(&self.abi_content)
    }

    /// Encodable functions of this ABI; unparseable content offers none.
    pub fn function_options(&self) -> Vec<FunctionOption> {
        match self.entries() {
            Ok(entries) => function_options(&entries),
            Err(err) => {
                tracing::warn!(abi = %self.name, error = %err, "cannot parse ABI content");
                Vec::new()
            }
        }
    }
}

/// Ordered collection of ABI records
#[derive(Debug, Default, Clone)]
pub struct AbiLibrary {
    records: Vec<AbiRecord>,
    /// Number of files scanned
    pub scanned_files: usize,
    /// Scan errors
    pub errors: Vec<String>,
    /// Scan duration in milliseconds
    pub scan_ms: u128,
}

impl AbiLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<AbiRecord>) -> Self {
        let mut library = Self::new();
        for record in records {
            library.insert(record);
        }
        library
    }

    /// Insert a record
    ///
    /// Note: first record for a given id wins (no overwrite)
    pub fn insert(&mut self, record: AbiRecord) {
        if self.get(record.id).is_none() {
            self.records.push(record);
        }
    }

    pub fn get(&self, id: u64) -> Option<&AbiRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&AbiRecord> {
        self.records.iter().find(|record| record.name == name)
    }

    /// Next free id, for records that do not carry one
    pub fn next_id(&self) -> u64 {
        self.records.iter().map(|r| r.id).max().map_or(1, |id| id + 1)
    }

    pub fn records(&self) -> &[AbiRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Merge another library into this one, renumbering colliding ids
    pub fn merge(&mut self, other: Self) {
        self.scanned_files = self.scanned_files.saturating_add(other.scanned_files);
        self.errors.extend(other.errors);
        for mut record in other.records {
            if self.get(record.id).is_some() {
                record.id = self.next_id();
            }
            self.records.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERC20_ABI: &str = r#"[
        {"type":"function","name":"approve","stateMutability":"nonpayable","inputs":[
            {"name":"spender","type":"address"},{"name":"amount","type":"uint256"}
        ]},
        {"type":"function","name":"totalSupply","stateMutability":"view","inputs":[]}
    ]"#;

    #[test]
    fn test_library_insert_lookup() {
        let mut library = AbiLibrary::new();
        library.insert(AbiRecord::new(7, "ERC20", ERC20_ABI));

        assert_eq!(library.len(), 1);
        assert!(library.get(7).is_some());
        assert_eq!(library.find_by_name("ERC20").map(|r| r.id), Some(7));
        assert_eq!(library.next_id(), 8);
    }

    #[test]
    fn test_first_wins() {
        let mut library = AbiLibrary::new();
        library.insert(AbiRecord::new(1, "first", "[]"));
        library.insert(AbiRecord::new(1, "second", "[]"));

        assert_eq!(library.len(), 1);
        assert_eq!(library.get(1).unwrap().name, "first");
    }

    #[test]
    fn test_merge_renumbers() {
        let mut library = AbiLibrary::from_records(vec![AbiRecord::new(1, "a", "[]")]);
        let mut other = AbiLibrary::from_records(vec![AbiRecord::new(1, "b", "[]")]);
        other.scanned_files = 2;
        library.merge(other);

        assert_eq!(library.len(), 2);
        assert_eq!(library.find_by_name("b").unwrap().id, 2);
        assert_eq!(library.scanned_files, 2);
    }

    #[test]
    fn test_function_options() {
        let record = AbiRecord::new(1, "ERC20", ERC20_ABI);
        let options = record.function_options();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "approve(address,uint256)");

        let broken = AbiRecord::new(2, "broken", "{not json");
        assert!(broken.function_options().is_empty());
    }
}
