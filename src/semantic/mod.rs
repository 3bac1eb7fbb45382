//! Semantic analysis of decoded header and payload claims
//!
//! Four checks run over every input, each adding to one shared diagnostic
//! list so a single pass reports as much as possible:
//!
//! 1. header: `alg` present and allowed, `typ` as expected
//! 2. payload: registered claims have their registered types
//! 3. types: header field types and integer temporal claims
//! 4. temporal: `exp`/`nbf`/`iat` against `now`, and `iat <= nbf <= exp`
//!
//! The time is passed in explicitly; nothing here reads the wall clock.

mod rules;
mod symbols;

pub use rules::{
    ClaimRule, ExpectedType, HeaderRules, PayloadRules, RuleDescription, RuleSet, TEMPORAL_CLAIMS,
};
pub use symbols::{Claim, ClaimType, Classification, Scope, SymbolTable};

use crate::report::{Diagnostic, DiagnosticKind, Phase, StageReport};
use serde::Serialize;
use serde_json::{Map, Value};

/// JSON object holding header fields or payload claims
pub type ClaimMap = Map<String, Value>;

/// Header fields whose type is fixed
const TYPED_HEADER_FIELDS: [&str; 2] = ["typ", "alg"];

/// Per-check validity flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validations {
    pub header: bool,
    pub payload: bool,
    pub types: bool,
    pub temporal: bool,
}

/// Claim counts by classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticStatistics {
    pub total_claims: usize,
    pub standard_claims: usize,
    pub private_claims: usize,
}

/// Phase-specific payload of the semantic report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticDetails {
    pub symbol_table: SymbolTable,
    pub validations: Validations,
    pub statistics: SemanticStatistics,
}

/// Semantic analyzer bound to a rule set
#[derive(Debug, Clone, Copy)]
pub struct SemanticAnalyzer<'r> {
    rules: &'r RuleSet,
}

impl<'r> SemanticAnalyzer<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// Analyze decoded claims as of the Unix timestamp `now`
    pub fn analyze(
        &self,
        header: &ClaimMap,
        payload: &ClaimMap,
        now: i64,
    ) -> StageReport<SemanticDetails> {
        let symbol_table = self.build_symbol_table(header, payload);

        let mut diagnostics = Vec::new();
        let validations = Validations {
            header: self.validate_header(header, &mut diagnostics),
            payload: self.validate_payload(payload, &mut diagnostics),
            types: self.validate_types(header, payload, &mut diagnostics),
            temporal: self.validate_temporal(payload, now, &mut diagnostics),
        };

        let statistics = SemanticStatistics {
            total_claims: symbol_table.len(),
            standard_claims: symbol_table.count(Classification::Standard),
            private_claims: symbol_table.count(Classification::Private),
        };

        tracing::debug!(
            claims = statistics.total_claims,
            diagnostics = diagnostics.len(),
            ?validations,
            "semantic analysis finished"
        );

        StageReport::new(
            Phase::Semantic,
            diagnostics,
            SemanticDetails {
                symbol_table,
                validations,
                statistics,
            },
        )
    }

    /// Header entries first, then payload entries
    pub fn build_symbol_table(&self, header: &ClaimMap, payload: &ClaimMap) -> SymbolTable {
        let mut table = SymbolTable::new();

        for (name, value) in header {
            let classification = if self.rules.is_standard_header_field(name) {
                Classification::Standard
            } else {
                Classification::Private
            };
            table.insert(name, value, classification, Scope::Header);
        }

        for (name, value) in payload {
            let classification = if self.rules.is_standard_claim(name) {
                Classification::Standard
            } else {
                Classification::Private
            };
            table.insert(name, value, classification, Scope::Payload);
        }

        table
    }

    fn validate_header(&self, header: &ClaimMap, diagnostics: &mut Vec<Diagnostic>) -> bool {
        let mut valid = true;
        let expected_typ = self.rules.typ();

        match header.get("typ") {
            None => diagnostics.push(Diagnostic::warning(
                DiagnosticKind::Advisory,
                format!("Header field 'typ' is missing (recommended: '{expected_typ}')"),
            )),
            Some(Value::String(typ)) if typ == expected_typ => {}
            Some(other) => diagnostics.push(Diagnostic::warning(
                DiagnosticKind::Advisory,
                format!(
                    "Header field 'typ' is {}, expected '{expected_typ}'",
                    quoted(other)
                ),
            )),
        }

        match header.get("alg") {
            None => {
                diagnostics.push(Diagnostic::error(
                    DiagnosticKind::MissingRequiredField,
                    "Required header field 'alg' is missing",
                ));
                valid = false;
            }
            Some(alg) => {
                let allowed = alg
                    .as_str()
                    .and_then(|name| self.rules.algorithm_policy().allows(name));
                if allowed.is_none() {
                    diagnostics.push(Diagnostic::error(
                        DiagnosticKind::UnknownAlgorithm,
                        format!(
                            "Algorithm {} is not recognized. Allowed algorithms: [{}]",
                            quoted(alg),
                            self.rules.algorithm_policy().names().join(", ")
                        ),
                    ));
                    valid = false;
                }
            }
        }

        valid
    }

    fn validate_payload(&self, payload: &ClaimMap, diagnostics: &mut Vec<Diagnostic>) -> bool {
        let mut valid = true;

        if payload.is_empty() {
            diagnostics.push(Diagnostic::warning(
                DiagnosticKind::Advisory,
                "Payload is empty: no claims",
            ));
        }

        for rule in self.rules.claim_rules() {
            let Some(value) = payload.get(&rule.name) else {
                continue;
            };
            if !rule.expected.accepts(value) {
                diagnostics.push(Diagnostic::error(
                    DiagnosticKind::TypeMismatch,
                    format!(
                        "Claim '{}' has type {}, expected {}",
                        rule.name,
                        ClaimType::of(value),
                        rule.expected
                    ),
                ));
                valid = false;
            }
        }

        valid
    }

    fn validate_types(
        &self,
        header: &ClaimMap,
        payload: &ClaimMap,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> bool {
        let mut valid = true;

        for field in TYPED_HEADER_FIELDS {
            let Some(value) = header.get(field) else {
                continue;
            };
            if !value.is_string() {
                diagnostics.push(Diagnostic::error(
                    DiagnosticKind::TypeMismatch,
                    format!(
                        "Header field '{field}' has type {}, expected string",
                        ClaimType::of(value)
                    ),
                ));
                valid = false;
            }
        }

        for claim in TEMPORAL_CLAIMS {
            let Some(value) = payload.get(claim) else {
                continue;
            };
            if timestamp(value).is_none() {
                diagnostics.push(not_a_timestamp(claim, value));
                valid = false;
            }
        }

        valid
    }

    fn validate_temporal(
        &self,
        payload: &ClaimMap,
        now: i64,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> bool {
        let mut valid = true;

        let exp = payload.get("exp");
        let nbf = payload.get("nbf");
        let iat = payload.get("iat");

        match exp {
            None => diagnostics.push(Diagnostic::warning(
                DiagnosticKind::Advisory,
                "Token has no 'exp' claim: expiration cannot be checked",
            )),
            Some(value) => match timestamp(value) {
                Some(exp) if exp < now => {
                    diagnostics.push(Diagnostic::error(
                        DiagnosticKind::TemporalViolation,
                        format!("Token expired: exp={exp}, now={now}"),
                    ));
                    valid = false;
                }
                Some(_) => {}
                None => {
                    diagnostics.push(not_a_timestamp("exp", value));
                    valid = false;
                }
            },
        }

        if let Some(value) = nbf {
            match timestamp(value) {
                Some(nbf) if nbf > now => {
                    diagnostics.push(Diagnostic::error(
                        DiagnosticKind::TemporalViolation,
                        format!("Token not yet valid: nbf={nbf}, now={now}"),
                    ));
                    valid = false;
                }
                Some(_) => {}
                None => {
                    diagnostics.push(not_a_timestamp("nbf", value));
                    valid = false;
                }
            }
        }

        if let Some(value) = iat {
            match timestamp(value) {
                // A future iat is advisory only
                Some(iat) if iat > now => diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::TemporalViolation,
                    format!("Claim 'iat' is in the future: iat={iat}, now={now}"),
                )),
                Some(_) => {}
                None => {
                    diagnostics.push(not_a_timestamp("iat", value));
                    valid = false;
                }
            }
        }

        let ordered = (
            iat.and_then(timestamp),
            nbf.and_then(timestamp),
            exp.and_then(timestamp),
        );
        if let (Some(iat), Some(nbf), Some(exp)) = ordered {
            if !(iat <= nbf && nbf <= exp) {
                diagnostics.push(Diagnostic::error(
                    DiagnosticKind::TemporalViolation,
                    format!(
                        "Invalid temporal order: iat <= nbf <= exp must hold, found iat={iat}, nbf={nbf}, exp={exp}"
                    ),
                ));
                valid = false;
            }
        }

        valid
    }
}

/// Integer claim value as a Unix timestamp; values above `i64::MAX` saturate
fn timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_u64().map(|_| i64::MAX)),
        _ => None,
    }
}

fn not_a_timestamp(claim: &str, value: &Value) -> Diagnostic {
    Diagnostic::error(
        DiagnosticKind::TypeMismatch,
        format!(
            "Temporal claim '{claim}' must be an integer Unix timestamp, found {}",
            ClaimType::of(value)
        ),
    )
}

/// String values in single quotes, anything else as compact JSON
fn quoted(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}
