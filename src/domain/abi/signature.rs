//! Function signature resolution and signature-text parsing

use alloy_primitives::keccak256;
use serde::{Deserialize, Serialize};

use super::{AbiEntry, FunctionEntry};
use crate::core::{CodecError, Result};

/// A selectable function as offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionOption {
    /// Selection key, `name(type1,type2)`
    pub value: String,
    pub label: String,
}

/// Functions that can be encoded as a timelock target: mutating functions
/// only, in ABI order.
pub fn encodable_functions(entries: &[AbiEntry]) -> impl Iterator<Item = &FunctionEntry> {
    entries
        .iter()
        .filter_map(AbiEntry::as_function)
        .filter(|function| function.is_encodable())
}

pub fn function_options(entries: &[AbiEntry]) -> Vec<FunctionOption> {
    encodable_functions(entries)
        .map(|function| FunctionOption {
            value: function.selection_key(),
            label: function.name.clone(),
        })
        .collect()
}

/// Find the encodable function whose selection key equals `signature`.
///
/// Overloads differ in their key by construction; should two entries share
/// a key the first one in ABI order wins.
pub fn resolve_function<'a>(entries: &'a [AbiEntry], signature: &str) -> Option<&'a FunctionEntry> {
    let wanted = signature.trim();
    encodable_functions(entries).find(|function| function.selection_key() == wanted)
}

/// Like [`resolve_function`] but reports a miss as [`CodecError::SignatureNotFound`]
pub fn require_function<'a>(entries: &'a [AbiEntry], signature: &str) -> Result<&'a FunctionEntry> {
    resolve_function(entries, signature)
        .ok_or_else(|| CodecError::SignatureNotFound(signature.to_string()))
}

/// 4-byte selector of a canonical signature
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

pub fn selector_hex(signature: &str) -> String {
    format!("0x{}", hex::encode(selector(signature)))
}

/// One parameter fragment of a signature text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParam {
    /// Type text with any parameter name removed
    pub ty: String,
    /// Trailing name token, when the signature carries names
    pub name: Option<String>,
}

/// Parsed `name(type1 name1, type2, ...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSignature {
    pub name: String,
    pub params: Vec<SignatureParam>,
}

impl ParsedSignature {
    pub fn parse(signature: &str) -> Result<Self> {
        let signature = signature.trim();
        let open = signature
            .find('(')
            .ok_or_else(|| CodecError::decoding(format!("missing '(' in '{signature}'")))?;
        let close = matching_paren(signature, open).ok_or_else(|| {
            CodecError::decoding(format!("unbalanced parentheses in '{signature}'"))
        })?;

        let name = signature[..open].trim().to_string();
        let params = split_top_level(&signature[open + 1..close])
            .into_iter()
            .map(parse_fragment)
            .collect();

        Ok(Self { name, params })
    }

    pub fn types(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.ty.as_str()).collect()
    }

    /// Display names: the embedded name or `param{idx}`
    pub fn display_names(&self) -> Vec<String> {
        self.params
            .iter()
            .enumerate()
            .map(|(idx, p)| p.name.clone().unwrap_or_else(|| format!("param{idx}")))
            .collect()
    }

    /// `name(type1,type2)` without parameter names or whitespace
    pub fn canonical(&self) -> String {
        format!("{}({})", self.name, self.types().join(","))
    }
}

fn parse_fragment(fragment: &str) -> SignatureParam {
    let fragment = fragment.trim();
    // the name is the last whitespace token, unless that token closes a tuple
    match fragment.rsplit_once(char::is_whitespace) {
        Some((ty, name)) if !name.contains([')', ']']) && !ty.trim().is_empty() => {
            SignatureParam {
                ty: bare_type(strip_location(ty.trim())),
                name: Some(name.to_string()),
            }
        }
        _ => SignatureParam {
            ty: bare_type(fragment),
            name: None,
        },
    }
}

/// Type text without whitespace or component names, recursing into tuples
fn bare_type(ty: &str) -> String {
    let ty = ty.trim();
    let compact = || ty.replace(char::is_whitespace, "");
    let Some(open) = ty.find('(') else {
        return compact();
    };
    let Some(close) = matching_paren(ty, open) else {
        return compact();
    };

    let components: Vec<String> = split_top_level(&ty[open + 1..close])
        .into_iter()
        .map(|component| parse_fragment(component).ty)
        .collect();
    format!(
        "{}({}){}",
        ty[..open].replace(char::is_whitespace, ""),
        components.join(","),
        ty[close + 1..].replace(char::is_whitespace, "")
    )
}

/// Drop a trailing data-location keyword (`bytes memory data`)
fn strip_location(ty: &str) -> &str {
    for keyword in ["memory", "calldata", "storage", "indexed"] {
        if let Some(rest) = ty.strip_suffix(keyword) {
            if rest.ends_with(char::is_whitespace) {
                return rest.trim_end();
            }
        }
    }
    ty
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices().skip_while(|(idx, _)| *idx < open) {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested inside parentheses or brackets
pub fn split_top_level(list: &str) -> Vec<&str> {
    if list.trim().is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (idx, ch) in list.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&list[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts.into_iter().map(str::trim).filter(|p| !p.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::parse_abi;

    const OVERLOADED_ABI: &str = r#"[
        {"type":"function","name":"safeTransferFrom","stateMutability":"nonpayable","inputs":[
            {"name":"from","type":"address"},{"name":"to","type":"address"},{"name":"tokenId","type":"uint256"}
        ]},
        {"type":"function","name":"safeTransferFrom","stateMutability":"nonpayable","inputs":[
            {"name":"from","type":"address"},{"name":"to","type":"address"},{"name":"tokenId","type":"uint256"},{"name":"data","type":"bytes"}
        ]},
        {"type":"function","name":"balanceOf","stateMutability":"view","inputs":[{"name":"owner","type":"address"}]},
        {"type":"function","name":"setApprovalForAll","stateMutability":"nonpayable","inputs":[
            {"name":"operator","type":"address"},{"name":"approved","type":"bool"}
        ]}
    ]"#;

    #[test]
    fn test_overloads_resolve_by_exact_types() {
        let entries = parse_abi(OVERLOADED_ABI).unwrap();

        let three =
            resolve_function(&entries, "safeTransferFrom(address,address,uint256)").unwrap();
        assert_eq!(three.inputs.len(), 3);

        let four =
            resolve_function(&entries, "safeTransferFrom(address,address,uint256,bytes)").unwrap();
        assert_eq!(four.inputs.len(), 4);
        assert_eq!(four.inputs[3].name, "data");
    }

    #[test]
    fn test_view_functions_are_not_encodable() {
        let entries = parse_abi(OVERLOADED_ABI).unwrap();
        assert!(resolve_function(&entries, "balanceOf(address)").is_none());
        assert!(matches!(
            require_function(&entries, "balanceOf(address)"),
            Err(CodecError::SignatureNotFound(_))
        ));

        let options = function_options(&entries);
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "safeTransferFrom(address,address,uint256)",
                "safeTransferFrom(address,address,uint256,bytes)",
                "setApprovalForAll(address,bool)",
            ]
        );
        assert_eq!(options[0].label, "safeTransferFrom");
    }

    #[test]
    fn test_duplicate_keys_first_wins() {
        let abi = r#"[
            {"type":"function","name":"poke","stateMutability":"nonpayable","inputs":[{"name":"first","type":"uint256"}]},
            {"type":"function","name":"poke","stateMutability":"payable","inputs":[{"name":"second","type":"uint256"}]}
        ]"#;
        let entries = parse_abi(abi).unwrap();
        let found = resolve_function(&entries, "poke(uint256)").unwrap();
        assert_eq!(found.inputs[0].name, "first");
    }

    #[test]
    fn test_selector() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector_hex("approve(address,uint256)"), "0x095ea7b3");
    }

    #[test]
    fn test_parse_signature_with_names() {
        let parsed = ParsedSignature::parse("approve(address spender, uint256 amount)").unwrap();
        assert_eq!(parsed.name, "approve");
        assert_eq!(parsed.types(), vec!["address", "uint256"]);
        assert_eq!(parsed.display_names(), vec!["spender", "amount"]);
        assert_eq!(parsed.canonical(), "approve(address,uint256)");
    }

    #[test]
    fn test_parse_signature_without_names() {
        let parsed = ParsedSignature::parse("approve(address,uint256)").unwrap();
        assert_eq!(parsed.display_names(), vec!["param0", "param1"]);

        let empty = ParsedSignature::parse("accept()").unwrap();
        assert!(empty.params.is_empty());
    }

    #[test]
    fn test_parse_signature_with_tuples() {
        let parsed =
            ParsedSignature::parse("submit((address,uint256[2])[] orders, bytes memory data, bool)")
                .unwrap();
        assert_eq!(parsed.types(), vec!["(address,uint256[2])[]", "bytes", "bool"]);
        assert_eq!(parsed.display_names(), vec!["orders", "data", "param2"]);
    }

    #[test]
    fn test_parse_signature_strips_component_names() {
        let parsed = ParsedSignature::parse(
            "fill((address maker, (uint256 amount, bool partial) terms)[] orders, (bytes32,uint8))",
        )
        .unwrap();
        assert_eq!(parsed.types(), vec!["(address,(uint256,bool))[]", "(bytes32,uint8)"]);
        assert_eq!(parsed.display_names(), vec!["orders", "param1"]);
    }

    #[test]
    fn test_parse_signature_rejects_garbage() {
        assert!(ParsedSignature::parse("nothing here").is_err());
        assert!(ParsedSignature::parse("broken(address").is_err());
    }
}
