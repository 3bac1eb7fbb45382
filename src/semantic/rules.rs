//! Rule configuration for semantic analysis
//!
//! A [`RuleSet`] is a plain value handed to the analyzer. The default mirrors
//! RFC 7519: `alg` is required, `typ` should be `"JWT"`, and the registered
//! claims have fixed types.

use super::symbols::ClaimType;
use crate::algorithm::AlgorithmPolicy;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Temporal claims, checked for type and ordering
pub const TEMPORAL_CLAIMS: [&str; 3] = ["exp", "nbf", "iat"];

/// Expected type of a registered claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedType {
    String,
    Integer,
    StringOrArray,
}

impl ExpectedType {
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, ClaimType::of(value)) {
            (ExpectedType::String, ClaimType::String) => true,
            (ExpectedType::Integer, ClaimType::Integer) => true,
            (ExpectedType::StringOrArray, ClaimType::String | ClaimType::Array) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedType::String => f.write_str("string"),
            ExpectedType::Integer => f.write_str("integer"),
            ExpectedType::StringOrArray => f.write_str("string or array"),
        }
    }
}

/// A registered payload claim and its expected type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRule {
    pub name: String,
    pub expected: ExpectedType,
    pub description: String,
}

impl ClaimRule {
    pub fn new(
        name: impl Into<String>,
        expected: ExpectedType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            expected,
            description: description.into(),
        }
    }
}

/// Configuration for semantic analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    header_fields: Vec<String>,
    expected_typ: String,
    algorithms: AlgorithmPolicy,
    claims: Vec<ClaimRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            header_fields: vec!["typ".into(), "alg".into(), "kid".into()],
            expected_typ: "JWT".into(),
            algorithms: AlgorithmPolicy::registered(),
            claims: vec![
                ClaimRule::new("iss", ExpectedType::String, "Issuer"),
                ClaimRule::new("sub", ExpectedType::String, "Subject"),
                ClaimRule::new("aud", ExpectedType::StringOrArray, "Audience"),
                ClaimRule::new("exp", ExpectedType::Integer, "Expiration Time"),
                ClaimRule::new("nbf", ExpectedType::Integer, "Not Before"),
                ClaimRule::new("iat", ExpectedType::Integer, "Issued At"),
                ClaimRule::new("jti", ExpectedType::String, "JWT ID"),
            ],
        }
    }
}

impl RuleSet {
    /// Create a rule set with the registered defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the algorithm allow-list
    pub fn algorithms(mut self, policy: AlgorithmPolicy) -> Self {
        self.algorithms = policy;
        self
    }

    /// Set the value `typ` is expected to carry
    pub fn expected_typ(mut self, typ: impl Into<String>) -> Self {
        self.expected_typ = typ.into();
        self
    }

    /// Register an additional (or replacement) payload claim rule
    pub fn claim(mut self, rule: ClaimRule) -> Self {
        self.claims.retain(|existing| existing.name != rule.name);
        self.claims.push(rule);
        self
    }

    /// Register an additional standard header field
    pub fn header_field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.header_fields.contains(&name) {
            self.header_fields.push(name);
        }
        self
    }

    pub fn algorithm_policy(&self) -> &AlgorithmPolicy {
        &self.algorithms
    }

    pub fn typ(&self) -> &str {
        &self.expected_typ
    }

    pub fn claim_rules(&self) -> &[ClaimRule] {
        &self.claims
    }

    pub fn claim_rule(&self, name: &str) -> Option<&ClaimRule> {
        self.claims.iter().find(|rule| rule.name == name)
    }

    pub fn is_standard_header_field(&self, name: &str) -> bool {
        self.header_fields.iter().any(|field| field == name)
    }

    pub fn is_standard_claim(&self, name: &str) -> bool {
        self.claim_rule(name).is_some()
    }

    /// Describe the rules for documentation output
    pub fn describe(&self) -> RuleDescription {
        RuleDescription {
            header: HeaderRules {
                required_fields: vec!["alg"],
                standard_fields: self.header_fields.clone(),
                typ_expected: self.expected_typ.clone(),
                alg_allowed: self.algorithms.names(),
            },
            payload: PayloadRules {
                standard_claims: self.claims.clone(),
                temporal_claims: TEMPORAL_CLAIMS.to_vec(),
                temporal_order: "iat <= nbf <= exp",
            },
        }
    }
}

/// Serializable summary of a [`RuleSet`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDescription {
    pub header: HeaderRules,
    pub payload: PayloadRules,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderRules {
    pub required_fields: Vec<&'static str>,
    pub standard_fields: Vec<String>,
    pub typ_expected: String,
    pub alg_allowed: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadRules {
    pub standard_claims: Vec<ClaimRule>,
    pub temporal_claims: Vec<&'static str>,
    pub temporal_order: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expected_type_accepts() {
        assert!(ExpectedType::String.accepts(&json!("x")));
        assert!(!ExpectedType::String.accepts(&json!(1)));
        assert!(ExpectedType::Integer.accepts(&json!(1)));
        assert!(!ExpectedType::Integer.accepts(&json!(1.5)));
        assert!(!ExpectedType::Integer.accepts(&json!(true)));
        assert!(!ExpectedType::Integer.accepts(&json!("1")));
        assert!(ExpectedType::StringOrArray.accepts(&json!("api")));
        assert!(ExpectedType::StringOrArray.accepts(&json!(["a", "b"])));
        assert!(!ExpectedType::StringOrArray.accepts(&json!({"a": 1})));
    }

    #[test]
    fn test_default_rules() {
        let rules = RuleSet::default();
        assert!(rules.is_standard_header_field("kid"));
        assert!(!rules.is_standard_header_field("cty"));
        assert!(rules.is_standard_claim("jti"));
        assert!(!rules.is_standard_claim("role"));
        assert_eq!(rules.typ(), "JWT");
    }

    #[test]
    fn test_claim_replaces_existing_rule() {
        let rules = RuleSet::new().claim(ClaimRule::new("aud", ExpectedType::String, "Audience"));
        assert_eq!(rules.claim_rules().len(), 7);
        assert_eq!(rules.claim_rule("aud").unwrap().expected, ExpectedType::String);

        let rules = rules.claim(ClaimRule::new("scope", ExpectedType::String, "Scope"));
        assert!(rules.is_standard_claim("scope"));
    }

    #[test]
    fn test_describe() {
        let description = RuleSet::new()
            .algorithms(AlgorithmPolicy::hmac_any())
            .describe();
        assert_eq!(description.header.alg_allowed, vec!["HS256", "HS384", "HS512"]);
        assert_eq!(description.payload.temporal_order, "iat <= nbf <= exp");
        assert_eq!(description.payload.standard_claims.len(), 7);
    }

    #[test]
    fn test_header_field_registers_once() {
        let rules = RuleSet::new().header_field("cty").header_field("cty");
        assert!(rules.is_standard_header_field("cty"));
        assert_eq!(
            rules.describe().header.standard_fields,
            vec!["typ", "alg", "kid", "cty"]
        );
    }
}
