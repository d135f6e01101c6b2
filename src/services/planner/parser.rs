//! Response Parser
//!
//! Strict parsing of model replies into planner records. Failures are typed
//! so callers can tell a reply with no JSON apart from one with the wrong
//! shape.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::utils::json::extract_json_object;

use super::types::{DecomposedStep, FunctionCallFromLlm};

/// Why a model reply could not be turned into a structured record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseParseError {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("response does not match the {schema} schema: {message}")]
    SchemaMismatch {
        schema: &'static str,
        message: String,
    },
}

pub type ParseResult<T> = Result<T, ResponseParseError>;

fn parse_structured<T: DeserializeOwned>(text: &str, schema: &'static str) -> ParseResult<T> {
    let json_str = extract_json_object(text).ok_or(ResponseParseError::NoJsonObject)?;

    let value: Value =
        serde_json::from_str(&json_str).map_err(|e| ResponseParseError::InvalidJson {
            message: e.to_string(),
        })?;

    serde_json::from_value(value).map_err(|e| ResponseParseError::SchemaMismatch {
        schema,
        message: e.to_string(),
    })
}

/// Parse a decomposition reply.
pub fn parse_decomposed_step(text: &str) -> ParseResult<DecomposedStep> {
    parse_structured(text, "DecomposedStep")
}

/// Parse a next-instruction reply. The function name must be non-empty.
pub fn parse_instruction(text: &str) -> ParseResult<FunctionCallFromLlm> {
    let inst: FunctionCallFromLlm = parse_structured(text, "Instruction")?;
    if inst.function.trim().is_empty() {
        return Err(ResponseParseError::SchemaMismatch {
            schema: "Instruction",
            message: "function name is empty".to_string(),
        });
    }
    Ok(inst)
}
