//! WASM bindings for rhythm-core
//!
//! Provides JavaScript-accessible functions for parsing, formatting and
//! analyzing pattern expressions.

#[cfg(feature = "wasm")]
use crate::analysis::analyze;
use crate::format::format_compact;
#[cfg(feature = "wasm")]
use crate::parser::parse;
use crate::types::ParsedPattern;
#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

/// Flat view of a parse result for the editor
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternSummary {
    pub kind: String,
    pub name: Option<String>,
    pub binary: String,
    pub onsets: Vec<usize>,
    pub step_count: usize,
    /// Step indices where stringed parts begin
    pub dividers: Vec<usize>,
    pub accent: Option<String>,
    pub compact: String,
}

pub fn summarize(parsed: &ParsedPattern) -> PatternSummary {
    let pattern = parsed.pattern();
    PatternSummary {
        kind: parsed.kind().to_string(),
        name: parsed.name().map(str::to_string),
        binary: pattern.to_binary_string(),
        onsets: pattern.onsets(),
        step_count: pattern.step_count(),
        dividers: parsed.dividers().to_vec(),
        accent: parsed.accent().map(|a| a.to_binary_string()),
        compact: format_compact(pattern),
    }
}

// ============================================================================
// WASM Bindings
// ============================================================================

#[cfg(feature = "wasm")]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ParseResult {
    pub parsed: ParsedPattern,
    pub summary: PatternSummary,
}

/// Parse an expression into its full parse tree plus a flat summary
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn parse_pattern(input: &str) -> Result<JsValue, JsError> {
    let parsed = parse(input).map_err(|e| JsError::new(&e.to_string()))?;
    let summary = summarize(&parsed);
    serde_wasm_bindgen::to_value(&ParseResult { parsed, summary })
        .map_err(|e| JsError::new(&e.to_string()))
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn analyze_pattern(input: &str) -> Result<JsValue, JsError> {
    let parsed = parse(input).map_err(|e| JsError::new(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&analyze(parsed.pattern()))
        .map_err(|e| JsError::new(&e.to_string()))
}

/// `format_compact` of the parsed expression
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn format_pattern(input: &str) -> Result<String, JsError> {
    let parsed = parse(input).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(format_compact(parsed.pattern()))
}

/// Analysis as a JSON string, for hosts without serde-wasm-bindgen support
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn analyze_json(input: &str) -> Result<String, JsError> {
    let parsed = parse(input).map_err(|e| JsError::new(&e.to_string()))?;
    serde_json::to_string(&analyze(parsed.pattern())).map_err(|e| JsError::new(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::parser::Parser;

    #[test]
    fn test_summary_of_stringed_pattern() {
        let parsed = Parser::new(&EngineConfig::new())
            .parse("groove = E(3,8) tri{1}")
            .unwrap();
        let summary = summarize(&parsed);
        assert_eq!(summary.kind, "stringed");
        assert_eq!(summary.name.as_deref(), Some("groove"));
        assert_eq!(summary.binary, "10010010111");
        assert_eq!(summary.dividers, vec![8]);
        assert_eq!(summary.accent.as_deref(), Some("1"));
        assert!(summary.compact.starts_with("b10010010111 |"));
    }
}
