use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Runtime type of a claim value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl ClaimType {
    /// Infer the type of a JSON value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ClaimType::Null,
            Value::Bool(_) => ClaimType::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => ClaimType::Integer,
            Value::Number(_) => ClaimType::Float,
            Value::String(_) => ClaimType::String,
            Value::Array(_) => ClaimType::Array,
            Value::Object(_) => ClaimType::Object,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Null => "null",
            ClaimType::Boolean => "boolean",
            ClaimType::Integer => "integer",
            ClaimType::Float => "float",
            ClaimType::String => "string",
            ClaimType::Array => "array",
            ClaimType::Object => "object",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a claim name is registered by the token format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Standard,
    Private,
}

/// Where a claim was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    Header,
    Payload,
}

/// A symbol table entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub name: String,
    pub value: Value,
    pub declared_type: ClaimType,
    pub classification: Classification,
    pub scope: Scope,
}

/// Claims of one analysis, keyed by name
///
/// Entries keep their first insertion position. Inserting an existing name
/// replaces the entry, so a payload claim shadows a header field of the same
/// name. Serializes as a sequence of claims in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    claims: IndexMap<String, Claim>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: &str,
        value: &Value,
        classification: Classification,
        scope: Scope,
    ) {
        let claim = Claim {
            name: name.to_string(),
            value: value.clone(),
            declared_type: ClaimType::of(value),
            classification,
            scope,
        };
        self.claims.insert(claim.name.clone(), claim);
    }

    pub fn get(&self, name: &str) -> Option<&Claim> {
        self.claims.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Claim> {
        self.claims.values()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn count(&self, classification: Classification) -> usize {
        self.claims
            .values()
            .filter(|c| c.classification == classification)
            .count()
    }
}

impl Serialize for SymbolTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.claims.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claim_type_inference() {
        assert_eq!(ClaimType::of(&json!(null)), ClaimType::Null);
        assert_eq!(ClaimType::of(&json!(true)), ClaimType::Boolean);
        assert_eq!(ClaimType::of(&json!(-5)), ClaimType::Integer);
        assert_eq!(ClaimType::of(&json!(u64::MAX)), ClaimType::Integer);
        assert_eq!(ClaimType::of(&json!(1.5)), ClaimType::Float);
        assert_eq!(ClaimType::of(&json!("x")), ClaimType::String);
        assert_eq!(ClaimType::of(&json!([1])), ClaimType::Array);
        assert_eq!(ClaimType::of(&json!({"a": 1})), ClaimType::Object);
    }

    #[test]
    fn test_later_insert_wins_in_place() {
        let mut table = SymbolTable::new();
        table.insert("typ", &json!("JWT"), Classification::Standard, Scope::Header);
        table.insert("alg", &json!("HS256"), Classification::Standard, Scope::Header);
        table.insert("typ", &json!(7), Classification::Private, Scope::Payload);

        assert_eq!(table.len(), 2);
        let typ = table.get("typ").unwrap();
        assert_eq!(typ.scope, Scope::Payload);
        assert_eq!(typ.declared_type, ClaimType::Integer);
        assert_eq!(table.iter().next().unwrap().name, "typ");
        assert_eq!(table.count(Classification::Standard), 1);
        assert_eq!(table.count(Classification::Private), 1);
    }

    #[test]
    fn test_many_claims_with_collisions() {
        let mut table = SymbolTable::new();
        for i in 0..50_000 {
            let name = format!("claim_{i}");
            table.insert(&name, &json!(i), Classification::Private, Scope::Header);
        }
        for i in (0..50_000).step_by(2) {
            let name = format!("claim_{i}");
            table.insert(&name, &json!("shadowed"), Classification::Private, Scope::Payload);
        }

        assert_eq!(table.len(), 50_000);
        assert_eq!(table.get("claim_0").unwrap().scope, Scope::Payload);
        assert_eq!(table.get("claim_1").unwrap().scope, Scope::Header);
        assert_eq!(table.get("claim_49998").unwrap().declared_type, ClaimType::String);
        let names: Vec<&str> = table.iter().take(3).map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["claim_0", "claim_1", "claim_2"]);
    }

    #[test]
    fn test_serializes_as_sequence_in_table_order() {
        let mut table = SymbolTable::new();
        table.insert("alg", &json!("HS256"), Classification::Standard, Scope::Header);
        table.insert("sub", &json!("user"), Classification::Standard, Scope::Payload);
        table.insert("alg", &json!("none"), Classification::Private, Scope::Payload);

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json[0]["name"], "alg");
        assert_eq!(json[0]["value"], "none");
        assert_eq!(json[0]["declaredType"], "string");
        assert_eq!(json[1]["scope"], "PAYLOAD");
        assert_eq!(json.as_array().unwrap().len(), 2);
    }
}
