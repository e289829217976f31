//! ABI file scanner - builds an ABI library from JSON files on disk

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use walkdir::WalkDir;

use crate::domain::abi::{parse_abi, AbiLibrary, AbiRecord};

/// Files above this size are not ABI files worth loading
const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// ABI file scanner
pub struct AbiScanner;

impl AbiScanner {
    /// Scan a single root directory for ABI files
    pub fn scan(root: impl AsRef<Path>) -> AbiLibrary {
        let started = Instant::now();
        let root = root.as_ref();
        let mut library = AbiLibrary::new();
        let mut scanned_files = 0;
        let mut errors = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !Self::is_ignored_dir(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    errors.push(err.to_string());
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(meta) => meta,
                Err(err) => {
                    errors.push(format!("{}: {}", path.display(), err));
                    continue;
                }
            };
            if metadata.len() > MAX_FILE_BYTES {
                continue;
            }

            scanned_files += 1;

            match Self::load_abi_file(path) {
                Ok(Some((name, abi_content))) => {
                    let id = library.next_id();
                    library.insert(AbiRecord::new(id, name, abi_content));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping ABI file");
                    errors.push(format!("{}: {:#}", path.display(), err));
                }
            }
        }

        library.scanned_files = scanned_files;
        library.errors = errors;
        library.scan_ms = started.elapsed().as_millis();

        tracing::debug!(
            root = %root.display(),
            abis = library.len(),
            scanned = library.scanned_files,
            "scanned ABI directory"
        );
        library
    }

    /// Scan multiple root directories
    pub fn scan_roots(roots: &[PathBuf]) -> AbiLibrary {
        let started = Instant::now();
        let mut library = AbiLibrary::new();

        for root in roots {
            library.merge(Self::scan(root));
        }

        library.scan_ms = started.elapsed().as_millis();
        library
    }

    /// Load one file: a raw ABI array or an artifact with an `abi` field.
    /// Returns the record name (file stem) and the ABI array text.
    fn load_abi_file(path: &Path) -> anyhow::Result<Option<(String, String)>> {
        let content = fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        let abi_value = if value.is_array() {
            value
        } else if let Some(abi) = value.get("abi") {
            abi.clone()
        } else {
            return Ok(None); // not an ABI, skip silently
        };

        let abi_content = abi_value.to_string();
        parse_abi(&abi_content).context("malformed ABI entries")?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("abi")
            .to_string();
        Ok(Some((name, abi_content)))
    }

    /// Check if a path should be ignored
    fn is_ignored_dir(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| {
                matches!(
                    name,
                    ".git" | "target" | "node_modules" | ".next" | "dist" | "cache"
                )
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_ABI: &str = r#"[{"type":"function","name":"approve","stateMutability":"nonpayable",
        "inputs":[{"name":"spender","type":"address"},{"name":"amount","type":"uint256"}]}]"#;

    #[test]
    fn test_is_ignored_dir() {
        assert!(AbiScanner::is_ignored_dir(Path::new(".git")));
        assert!(AbiScanner::is_ignored_dir(Path::new("node_modules")));
        assert!(!AbiScanner::is_ignored_dir(Path::new("abis")));
        assert!(!AbiScanner::is_ignored_dir(Path::new("out")));
    }

    #[test]
    fn test_scan_raw_and_artifact_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Token.json"), TOKEN_ABI).unwrap();
        fs::create_dir(dir.path().join("out")).unwrap();
        fs::write(
            dir.path().join("out").join("Vault.json"),
            format!(r#"{{"abi": {TOKEN_ABI}, "bytecode": "0x"}}"#),
        )
        .unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": "demo"}"#).unwrap();
        fs::write(dir.path().join("broken.json"), "[{").unwrap();
        fs::write(dir.path().join("notes.txt"), TOKEN_ABI).unwrap();

        let library = AbiScanner::scan(dir.path());
        let names: Vec<&str> = library.records().iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec!["Token", "Vault"]);
        assert_eq!(library.scanned_files, 4);
        assert_eq!(library.errors.len(), 1);
        assert_eq!(
            library.find_by_name("Vault").unwrap().function_options()[0].value,
            "approve(address,uint256)"
        );
    }
}
