//! Context-free grammar of the compact token
//!
//! ```text
//! G = (V, Σ, P, S)
//! V = {TOKEN, HEADER, PAYLOAD, SIGNATURE, SEGMENT}
//! Σ = {[A-Za-z0-9_-], .}
//! S = TOKEN
//! ```

use serde::Serialize;

pub const START_SYMBOL: &str = "TOKEN";

pub const NON_TERMINALS: [&str; 5] = ["TOKEN", "HEADER", "PAYLOAD", "SIGNATURE", "SEGMENT"];

pub const TERMINALS: [&str; 2] = ["[A-Za-z0-9_-]", "."];

pub const PRODUCTIONS: [&str; 5] = [
    "TOKEN → HEADER . PAYLOAD . SIGNATURE",
    "HEADER → SEGMENT",
    "PAYLOAD → SEGMENT",
    "SIGNATURE → SEGMENT",
    "SEGMENT → [A-Za-z0-9_-]+",
];

/// Static description of the grammar, for introspection output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarInfo {
    pub kind: &'static str,
    pub parser_type: &'static str,
    pub start_symbol: &'static str,
    pub non_terminals: Vec<&'static str>,
    pub terminals: Vec<&'static str>,
    pub productions: Vec<&'static str>,
}

impl GrammarInfo {
    pub fn compact_token() -> Self {
        Self {
            kind: "context-free",
            parser_type: "LL(1) recursive descent",
            start_symbol: START_SYMBOL,
            non_terminals: NON_TERMINALS.to_vec(),
            terminals: TERMINALS.to_vec(),
            productions: PRODUCTIONS.to_vec(),
        }
    }
}
