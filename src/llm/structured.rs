//! Structured output parser - extracts JSON blocks from model responses

use crate::error::StructuredOutputError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

static JSON_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```json[ \t]*\r?\n([\s\S]*?)```").expect("json block pattern is valid")
});

/// Return the body of the first ```` ```json ```` fenced block, if any
pub fn extract_json_block(text: &str) -> Option<&str> {
    JSON_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Deserialize the first fenced JSON block of a model response
pub fn parse_json_block<T: DeserializeOwned>(text: &str) -> Result<T, StructuredOutputError> {
    let block = extract_json_block(text).ok_or(StructuredOutputError::MissingBlock)?;
    Ok(serde_json::from_str(block)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        value: u32,
    }

    #[test]
    fn test_extract_block() {
        let text = "Thinking...\n```json\n{\"value\": 3}\n```\nDone.";
        assert_eq!(extract_json_block(text), Some("{\"value\": 3}"));
    }

    #[test]
    fn test_first_block_wins() {
        let text = "```json\n{\"value\": 1}\n```\n```json\n{\"value\": 2}\n```";
        assert_eq!(parse_json_block::<Payload>(text).unwrap(), Payload { value: 1 });
    }

    #[test]
    fn test_missing_block() {
        let err = parse_json_block::<Payload>("{\"value\": 1}").unwrap_err();
        assert!(matches!(err, StructuredOutputError::MissingBlock));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_json_block::<Payload>("```json\n{value: }\n```").unwrap_err();
        assert!(matches!(err, StructuredOutputError::InvalidJson(_)));
    }
}
