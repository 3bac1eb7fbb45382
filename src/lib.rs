//! # jwtscan - JWT Well-Formedness Analysis
//!
//! **jwtscan** treats a compact JSON Web Token as a sentence of a tiny formal
//! language and analyzes it the way a compiler front end would. It does not
//! verify signatures. It tells you *whether* a token is well-formed and, if
//! not, *where* and *why* it is not.
//!
//! ## Pipeline
//!
//! ```text
//! raw string
//!     │ Lexer: split on '.', classify segments against the Base64URL alphabet
//!     ▼
//! tokens  [HEADER DOT PAYLOAD DOT SIGNATURE END]
//!     │ Parser: LL(1) recursive descent, builds a derivation tree
//!     ▼
//! derivation tree
//!     │ decode header and payload (Base64URL + JSON object)
//!     ▼
//! claim maps
//!     │ SemanticAnalyzer: symbol table, required fields, types, time
//!     ▼
//! AnalysisReport
//! ```
//!
//! A stage runs only if the previous one succeeded. The report keeps every
//! stage that ran together with its diagnostics, so a failed analysis always
//! says how far it got.
//!
//! ## Quick Start
//!
//! ```
//! use jwtscan::{AlgorithmPolicy, FixedClock, RuleSet, TokenAnalyzer};
//!
//! let analyzer = TokenAnalyzer::new()
//!     .rules(RuleSet::new().algorithms(AlgorithmPolicy::hmac_any()))
//!     .clock(FixedClock(1_516_239_022));
//!
//! let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9\
//!              .eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ\
//!              .SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";
//! let report = analyzer.analyze(token);
//!
//! assert!(report.overall_success);
//! for diagnostic in report.diagnostics() {
//!     println!("{diagnostic}");
//! }
//! ```
//!
//! ## Diagnostics
//!
//! Findings are data, not errors. Each [`Diagnostic`] has a [`Severity`] and
//! a [`DiagnosticKind`]; only error-severity diagnostics make a stage fail.
//! [`Error`] is reserved for the fallible helpers (segment decoding and rule
//! configuration).
//!
//! ## Time
//!
//! Temporal checks (`exp`, `nbf`, `iat`) read the current time from a
//! [`Clock`]. [`SystemClock`] is the default; [`FixedClock`] makes results
//! reproducible.

pub mod algorithm;
pub mod clock;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod semantic;
pub mod utils;

pub use algorithm::{AlgorithmId, AlgorithmPolicy};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parser::{DerivationNode, ParseOutcome, Parser, Symbol, parse};
pub use pipeline::{AnalysisReport, DecodedToken, TokenAnalyzer};
pub use report::{Diagnostic, DiagnosticKind, Phase, Severity, StageReport};
pub use semantic::{
    Claim, ClaimRule, ClaimType, Classification, ExpectedType, RuleSet, Scope, SemanticAnalyzer,
    SymbolTable,
};
