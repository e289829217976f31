//! Listings of selectable timelock methods, ABI functions and ABIs

use super::ToolResult;
use crate::domain::abi::{encodable_functions, selector_hex, AbiEntry, AbiLibrary};
use crate::domain::timelock::{timelock_method_options, TimelockOperation};

/// Timelock methods with their selectors
pub fn methods() -> ToolResult {
    timelock_method_options()
        .into_iter()
        .fold(ToolResult::new("Timelock Methods"), |result, option| {
            let label = match option.value.parse::<TimelockOperation>() {
                Ok(op) => format!("{} ({})", op, selector_hex(op.signature())),
                Err(_) => option.label,
            };
            result.add(label, option.value)
        })
}

/// Encodable functions of an ABI; the value is the selection key and the
/// selector of the canonical signature.
pub fn functions(entries: &[AbiEntry]) -> ToolResult {
    encodable_functions(entries).fold(ToolResult::new("Functions"), |result, function| {
        let selector = function
            .canonical_signature()
            .map(|sig| selector_hex(&sig))
            .unwrap_or_else(|_| "??".to_string());
        result.add(selector, function.selection_key())
    })
}

pub fn abis(library: &AbiLibrary) -> ToolResult {
    let title = format!("ABIs ({})", library.len());
    let mut result = library
        .records()
        .iter()
        .fold(ToolResult::new(title), |result, record| {
            let count = record.function_options().len();
            result.add(record.id.to_string(), format!("{} ({count} functions)", record.name))
        });
    for error in &library.errors {
        result = result.add("error", error.clone());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::{parse_abi, AbiRecord};

    #[test]
    fn test_methods_listing() {
        let result = methods();
        assert_eq!(result.content.len(), 3);
        assert_eq!(
            result.get("queueTransaction (0x3a66f901)"),
            Some("queueTransaction(address,uint256,string,bytes,uint256)")
        );
    }

    #[test]
    fn test_functions_listing() {
        let entries = parse_abi(
            r#"[
                {"type":"function","name":"approve","stateMutability":"nonpayable","inputs":[
                    {"name":"spender","type":"address"},{"name":"amount","type":"uint256"}]},
                {"type":"function","name":"balanceOf","stateMutability":"view","inputs":[
                    {"name":"owner","type":"address"}]}
            ]"#,
        )
        .unwrap();
        let result = functions(&entries);
        assert_eq!(
            result.content,
            vec![("0x095ea7b3".to_string(), "approve(address,uint256)".to_string())]
        );
    }

    #[test]
    fn test_abis_listing() {
        let library = AbiLibrary::from_records(vec![AbiRecord::new(4, "Empty", "[]")]);
        let result = abis(&library);
        assert_eq!(result.title, "ABIs (1)");
        assert_eq!(result.get("4"), Some("Empty (0 functions)"));
    }
}
