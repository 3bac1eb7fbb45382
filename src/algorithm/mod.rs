//! Registered `alg` header values and the allow-list checked against them

use crate::error::{Error, Result};
use serde::Serialize;

/// Algorithm identifier from the token header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AlgorithmId {
    /// HMAC with SHA-256
    HS256,
    /// HMAC with SHA-384
    HS384,
    /// HMAC with SHA-512
    HS512,
    /// RSA PKCS#1 v1.5 with SHA-256
    RS256,
    /// RSA PKCS#1 v1.5 with SHA-384
    RS384,
    /// RSA PKCS#1 v1.5 with SHA-512
    RS512,
    /// ECDSA with P-256 and SHA-256
    ES256,
    /// ECDSA with P-384 and SHA-384
    ES384,
    /// ECDSA with P-521 and SHA-512
    ES512,
    /// Unsecured token
    #[serde(rename = "none")]
    None,
}

impl AlgorithmId {
    /// Every registered identifier, in allow-list order
    pub const ALL: [AlgorithmId; 10] = [
        AlgorithmId::HS256,
        AlgorithmId::HS384,
        AlgorithmId::HS512,
        AlgorithmId::RS256,
        AlgorithmId::RS384,
        AlgorithmId::RS512,
        AlgorithmId::ES256,
        AlgorithmId::ES384,
        AlgorithmId::ES512,
        AlgorithmId::None,
    ];

    /// Look up an algorithm by its header name (case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| alg.as_str() == name)
    }

    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::HS256 => "HS256",
            AlgorithmId::HS384 => "HS384",
            AlgorithmId::HS512 => "HS512",
            AlgorithmId::RS256 => "RS256",
            AlgorithmId::RS384 => "RS384",
            AlgorithmId::RS512 => "RS512",
            AlgorithmId::ES256 => "ES256",
            AlgorithmId::ES384 => "ES384",
            AlgorithmId::ES512 => "ES512",
            AlgorithmId::None => "none",
        }
    }
}

impl std::fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy for allowed algorithms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmPolicy {
    allowed: Vec<AlgorithmId>,
}

impl Default for AlgorithmPolicy {
    fn default() -> Self {
        Self::registered()
    }
}

impl AlgorithmPolicy {
    /// Create a policy that allows only specific algorithms
    pub fn allow_only(algorithms: Vec<AlgorithmId>) -> Self {
        Self {
            allowed: algorithms,
        }
    }

    /// Policy that allows every registered algorithm, including `none`
    pub fn registered() -> Self {
        Self::allow_only(AlgorithmId::ALL.to_vec())
    }

    /// Policy that allows any HMAC algorithm (HS256, HS384, HS512)
    pub fn hmac_any() -> Self {
        Self::allow_only(vec![
            AlgorithmId::HS256,
            AlgorithmId::HS384,
            AlgorithmId::HS512,
        ])
    }

    /// Policy that allows every registered algorithm except `none`
    pub fn signed_only() -> Self {
        Self::allow_only(
            AlgorithmId::ALL
                .into_iter()
                .filter(|alg| *alg != AlgorithmId::None)
                .collect(),
        )
    }

    /// Build a policy from header names such as `["HS256", "RS256"]`
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut allowed = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim();
            let alg = AlgorithmId::from_name(name).ok_or_else(|| {
                Error::ConfigurationInvalid(format!("unknown algorithm '{name}'"))
            })?;
            if !allowed.contains(&alg) {
                allowed.push(alg);
            }
        }

        if allowed.is_empty() {
            return Err(Error::ConfigurationInvalid(
                "algorithm allow-list must not be empty".into(),
            ));
        }

        Ok(Self { allowed })
    }

    /// Return the algorithm named `name` if the policy allows it
    pub fn allows(&self, name: &str) -> Option<AlgorithmId> {
        AlgorithmId::from_name(name).filter(|alg| self.allowed.contains(alg))
    }

    /// Allowed algorithm names, in policy order
    pub fn names(&self) -> Vec<&'static str> {
        self.allowed.iter().map(AlgorithmId::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_name() {
        assert_eq!(AlgorithmId::from_name("HS256"), Some(AlgorithmId::HS256));
        assert_eq!(AlgorithmId::from_name("ES512"), Some(AlgorithmId::ES512));
        assert_eq!(AlgorithmId::from_name("none"), Some(AlgorithmId::None));
        assert_eq!(AlgorithmId::from_name("hs256"), None);
        assert_eq!(AlgorithmId::from_name("NONE"), None);
        assert_eq!(AlgorithmId::from_name("XX999"), None);
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(format!("{}", AlgorithmId::RS384), "RS384");
        assert_eq!(format!("{}", AlgorithmId::None), "none");
    }

    #[test]
    fn test_registered_policy() {
        let policy = AlgorithmPolicy::default();
        assert_eq!(
            policy.names(),
            vec![
                "HS256", "HS384", "HS512", "RS256", "RS384", "RS512", "ES256", "ES384", "ES512",
                "none"
            ]
        );
        assert_eq!(policy.allows("none"), Some(AlgorithmId::None));
    }

    #[test]
    fn test_restricted_policies() {
        let policy = AlgorithmPolicy::hmac_any();
        assert!(policy.allows("HS384").is_some());
        assert!(policy.allows("RS256").is_none());

        let policy = AlgorithmPolicy::signed_only();
        assert!(policy.allows("none").is_none());
        assert!(policy.allows("ES256").is_some());
    }

    #[test]
    fn test_from_names() {
        let policy = AlgorithmPolicy::from_names(&["HS256", " RS256", "HS256"]).unwrap();
        assert_eq!(policy.names(), vec!["HS256", "RS256"]);

        assert!(matches!(
            AlgorithmPolicy::from_names(&["HS256", "XX999"]),
            Err(Error::ConfigurationInvalid(_))
        ));
        assert!(matches!(
            AlgorithmPolicy::from_names::<&str>(&[]),
            Err(Error::ConfigurationInvalid(_))
        ));
    }
}
