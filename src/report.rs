//! Diagnostics and per-phase reports shared by all analysis stages

use serde::Serialize;
use std::fmt;

/// How serious a diagnostic is
///
/// Only errors make a stage fail. Warnings are informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Error,
    Warning,
}

/// Classification of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticKind {
    // Lexical
    IncompleteToken,
    Structure,
    MalformedAlphabet,

    // Syntactic
    UnexpectedTokenKind,
    TrailingContent,

    // Semantic
    MissingRequiredField,
    TypeMismatch,
    TemporalViolation,
    UnknownAlgorithm,
    Advisory,
}

/// A single finding produced by one of the stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    /// Create an error-level diagnostic
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
        }
    }

    /// Create a warning-level diagnostic
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}: {}", self.message)
    }
}

/// Analysis phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Lexical,
    Syntactic,
    Semantic,
}

impl Phase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Phase::Lexical => "lexical",
            Phase::Syntactic => "syntactic",
            Phase::Semantic => "semantic",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one phase
///
/// `details` carries the phase-specific payload (tokens, derivation tree or
/// symbol table).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageReport<T> {
    pub phase: Phase,
    pub success: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub details: T,
}

impl<T> StageReport<T> {
    pub(crate) fn new(phase: Phase, diagnostics: Vec<Diagnostic>, details: T) -> Self {
        let success = !diagnostics.iter().any(Diagnostic::is_error);
        Self {
            phase,
            success,
            diagnostics,
            details,
        }
    }

    /// Error-level diagnostics, in the order they were recorded
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Warning-level diagnostics, in the order they were recorded
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Whether any diagnostic of the given kind was recorded
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }
}
