//! Typed view of contract ABI JSON
//!
//! Entries are tagged on their `type` field. Parameter types are resolved
//! into a recursive [`ParamType`] so tuple components and array nesting are
//! explicit instead of being re-parsed from strings at every use.

use std::fmt;

use alloy_dyn_abi::DynSolType;
use serde::{Deserialize, Serialize};

use crate::core::{CodecError, Result};

/// State mutability of a function entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    #[default]
    Nonpayable,
    Payable,
}

impl StateMutability {
    /// Whether calling the function can change on-chain state
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::Pure | Self::View)
    }
}

/// One item of a contract ABI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AbiEntry {
    Function(FunctionEntry),
    Event(EventEntry),
    Constructor(ConstructorEntry),
    Error(ErrorEntry),
    Fallback,
    Receive,
    #[serde(other)]
    Other,
}

impl AbiEntry {
    pub fn as_function(&self) -> Option<&FunctionEntry> {
        match self {
            Self::Function(function) => Some(function),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEntry {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
    #[serde(default)]
    pub outputs: Vec<Param>,
    #[serde(default)]
    pub state_mutability: StateMutability,
}

impl FunctionEntry {
    /// Key used to identify the selected function: `name(type1,type2,...)`
    /// built from the raw `type` fields, so tuple inputs appear as `tuple`.
    pub fn selection_key(&self) -> String {
        let types: Vec<&str> = self.inputs.iter().map(|p| p.ty.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// Canonical signature with tuple components expanded, as hashed into
    /// the function selector.
    pub fn canonical_signature(&self) -> Result<String> {
        let types = self
            .inputs
            .iter()
            .map(|p| p.param_type().map(|ty| ty.canonical()))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("{}({})", self.name, types.join(",")))
    }

    pub fn param_types(&self) -> Result<Vec<ParamType>> {
        self.inputs.iter().map(Param::param_type).collect()
    }

    pub fn is_encodable(&self) -> bool {
        self.state_mutability.is_mutating()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
    #[serde(default)]
    pub anonymous: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorEntry {
    #[serde(default)]
    pub inputs: Vec<Param>,
    #[serde(default)]
    pub state_mutability: StateMutability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
}

/// A function/event parameter as it appears in ABI JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            internal_type: None,
            components: Vec::new(),
            indexed: None,
        }
    }

    /// Resolve the `type` string (plus `components` for tuples) into a [`ParamType`]
    pub fn param_type(&self) -> Result<ParamType> {
        let ty = self.ty.trim();
        let (base, dims) = split_array_suffix(ty)?;

        let mut resolved = if base == "tuple" {
            let components = self
                .components
                .iter()
                .map(|c| {
                    Ok(Component {
                        name: c.name.clone(),
                        kind: c.param_type()?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            ParamType::Tuple(components)
        } else if base.starts_with('(') {
            // already-canonical tuple text, e.g. from a signature string
            ParamType::from_sol_type(&parse_sol_type(base)?)
        } else {
            // normalizes aliases such as `uint` -> `uint256`
            ParamType::Elementary(parse_sol_type(base)?.sol_type_name().into_owned())
        };

        for dim in dims {
            resolved = ParamType::Array(Box::new(resolved), dim);
        }
        Ok(resolved)
    }
}

/// Named member of a tuple type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub name: String,
    pub kind: ParamType,
}

/// Recursive parameter type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// `address`, `uint256`, `bool`, `bytes32`, `string`, ...
    Elementary(String),
    Tuple(Vec<Component>),
    /// Dynamic (`None`) or fixed-size array
    Array(Box<ParamType>, Option<usize>),
}

impl ParamType {
    /// Canonical ABI type text, e.g. `(address,uint256)[]`
    pub fn canonical(&self) -> String {
        match self {
            Self::Elementary(name) => name.clone(),
            Self::Tuple(components) => {
                let inner: Vec<String> = components.iter().map(|c| c.kind.canonical()).collect();
                format!("({})", inner.join(","))
            }
            Self::Array(inner, None) => format!("{}[]", inner.canonical()),
            Self::Array(inner, Some(len)) => format!("{}[{}]", inner.canonical(), len),
        }
    }

    pub fn sol_type(&self) -> Result<DynSolType> {
        match self {
            Self::Elementary(name) => parse_sol_type(name),
            Self::Tuple(components) => components
                .iter()
                .map(|c| c.kind.sol_type())
                .collect::<Result<Vec<_>>>()
                .map(DynSolType::Tuple),
            Self::Array(inner, None) => Ok(DynSolType::Array(Box::new(inner.sol_type()?))),
            Self::Array(inner, Some(len)) => {
                Ok(DynSolType::FixedArray(Box::new(inner.sol_type()?), *len))
            }
        }
    }

    /// Build from a parsed coder type; tuple members get positional names.
    pub fn from_sol_type(ty: &DynSolType) -> Self {
        match ty {
            DynSolType::Tuple(types) => Self::Tuple(
                types
                    .iter()
                    .enumerate()
                    .map(|(idx, ty)| Component {
                        name: format!("field{idx}"),
                        kind: Self::from_sol_type(ty),
                    })
                    .collect(),
            ),
            DynSolType::Array(inner) => Self::Array(Box::new(Self::from_sol_type(inner)), None),
            DynSolType::FixedArray(inner, len) => {
                Self::Array(Box::new(Self::from_sol_type(inner)), Some(*len))
            }
            other => Self::Elementary(other.sol_type_name().into_owned()),
        }
    }

    /// Whether a raw argument for this type is entered as JSON text
    pub fn takes_json(&self) -> bool {
        !matches!(self, Self::Elementary(_))
    }

    /// Types for which an empty string is a meaningful value
    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Elementary(name) if name == "string" || name == "bytes")
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

fn parse_sol_type(text: &str) -> Result<DynSolType> {
    DynSolType::parse(text)
        .map_err(|e| CodecError::encoding(format!("unsupported type '{text}': {e}")))
}

/// Split `tuple[2][]` into (`tuple`, [Some(2), None]) keeping dimension order
/// innermost first.
fn split_array_suffix(ty: &str) -> Result<(&str, Vec<Option<usize>>)> {
    let mut dims = Vec::new();
    let mut rest = ty;
    while let Some(stripped) = rest.strip_suffix(']') {
        let open = stripped
            .rfind('[')
            .ok_or_else(|| CodecError::encoding(format!("malformed array type '{ty}'")))?;
        let len = &stripped[open + 1..];
        let dim = if len.is_empty() {
            None
        } else {
            Some(len.parse::<usize>().map_err(|_| {
                CodecError::encoding(format!("malformed array length in '{ty}'"))
            })?)
        };
        dims.push(dim);
        rest = &stripped[..open];
    }
    dims.reverse();
    Ok((rest, dims))
}

/// Parse ABI JSON text into entries, keeping array order
pub fn parse_abi(json: &str) -> Result<Vec<AbiEntry>> {
    serde_json::from_str(json).map_err(|e| CodecError::InvalidJson(e.to_string()))
}
