//! End-to-end analysis: lexer, parser, segment decoding, semantic analyzer
//!
//! Each stage runs only if the previous one succeeded. Whatever ran is kept
//! in the [`AnalysisReport`], so a failed analysis still says how far it got
//! and why it stopped.

use crate::clock::{Clock, SystemClock};
use crate::lexer::{LexicalDetails, Lexer};
use crate::parser::{Parser, Symbol, SyntacticDetails};
use crate::report::{Diagnostic, Phase, StageReport};
use crate::semantic::{ClaimMap, RuleSet, SemanticAnalyzer, SemanticDetails};
use crate::utils::decode_object;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Header, payload and raw signature of a token whose segments decoded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedToken {
    pub header: ClaimMap,
    pub payload: ClaimMap,
    pub signature: String,
}

/// Aggregated result of one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub lexical: StageReport<LexicalDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntactic: Option<StageReport<SyntacticDetails>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decode_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic: Option<StageReport<SemanticDetails>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<DecodedToken>,
    pub overall_success: bool,
    /// First phase that did not succeed; a decode failure stops before the
    /// semantic phase and is reported as [`Phase::Semantic`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<Phase>,
    pub summary: String,
}

impl AnalysisReport {
    fn new(lexical: StageReport<LexicalDetails>) -> Self {
        Self {
            lexical,
            syntactic: None,
            decode_error: None,
            semantic: None,
            decoded: None,
            overall_success: false,
            stopped_at: None,
            summary: String::new(),
        }
    }

    /// Every diagnostic of the executed phases, in phase order
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        let syntactic = self.syntactic.iter().flat_map(|r| r.diagnostics.iter());
        let semantic = self.semantic.iter().flat_map(|r| r.diagnostics.iter());
        self.lexical.diagnostics.iter().chain(syntactic).chain(semantic)
    }

    /// Phases that actually ran
    pub fn phases(&self) -> Vec<Phase> {
        let mut phases = vec![Phase::Lexical];
        if self.syntactic.is_some() {
            phases.push(Phase::Syntactic);
        }
        if self.semantic.is_some() {
            phases.push(Phase::Semantic);
        }
        phases
    }

    fn finish(mut self) -> Self {
        let executed = [
            Some(self.lexical.success),
            self.syntactic.as_ref().map(|r| r.success),
            self.semantic.as_ref().map(|r| r.success),
        ];
        self.overall_success =
            self.decode_error.is_none() && executed.into_iter().flatten().all(|ok| ok);

        self.stopped_at = if self.overall_success {
            None
        } else if !self.lexical.success {
            Some(Phase::Lexical)
        } else if !self.syntactic.as_ref().is_some_and(|r| r.success) {
            Some(Phase::Syntactic)
        } else {
            Some(Phase::Semantic)
        };

        self.summary = self.describe();
        self
    }

    fn describe(&self) -> String {
        let errors = self.diagnostics().filter(|d| d.is_error()).count();
        let warnings = self.diagnostics().filter(|d| !d.is_error()).count();

        if let Some(error) = &self.decode_error {
            return format!("Segment decoding failed: {error}");
        }

        match self.stopped_at {
            None if warnings == 0 => "Token is well-formed: all phases passed".to_string(),
            None => format!(
                "Token is well-formed: all phases passed with {warnings} {}",
                plural(warnings, "warning")
            ),
            Some(phase) => format!(
                "Token is not well-formed: {phase} analysis failed with {errors} {}",
                plural(errors, "error")
            ),
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

/// Runs the full pipeline with a rule set and a clock
///
/// Cheap to clone and safe to share between threads.
///
/// ```
/// use jwtscan::{FixedClock, TokenAnalyzer};
///
/// let analyzer = TokenAnalyzer::new().clock(FixedClock(1_700_000_000));
/// let report = analyzer.analyze("abc.def");
/// assert!(!report.overall_success);
/// assert!(report.syntactic.is_none());
/// ```
#[derive(Clone)]
pub struct TokenAnalyzer {
    rules: RuleSet,
    clock: Arc<dyn Clock>,
}

impl Default for TokenAnalyzer {
    fn default() -> Self {
        Self {
            rules: RuleSet::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl fmt::Debug for TokenAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAnalyzer")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl TokenAnalyzer {
    /// Analyzer with the default rules and the system clock
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the semantic rules
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the time source used for temporal checks
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    /// Analyze one candidate token
    pub fn analyze(&self, token: &str) -> AnalysisReport {
        let lexical = Lexer::new(token).analyze();
        let tokens = lexical.details.tokens.clone();
        let mut report = AnalysisReport::new(lexical);

        if !report.lexical.success {
            tracing::debug!("stopping after lexical phase");
            return report.finish();
        }

        let syntactic = Parser::new(&tokens).analyze();
        let segments = syntactic.details.tree.as_ref().and_then(|tree| {
            Some((
                tree.segment(Symbol::Header)?.to_string(),
                tree.segment(Symbol::Payload)?.to_string(),
                tree.segment(Symbol::Signature)?.to_string(),
            ))
        });
        let parsed = syntactic.success;
        report.syntactic = Some(syntactic);

        let Some((header, payload, signature)) = segments.filter(|_| parsed) else {
            tracing::debug!("stopping after syntactic phase");
            return report.finish();
        };

        let decoded = decode_object(&header, "header")
            .and_then(|header| Ok((header, decode_object(&payload, "payload")?)));
        let (header, payload) = match decoded {
            Ok(maps) => maps,
            Err(error) => {
                tracing::warn!(%error, "segment decoding failed");
                report.decode_error = Some(error.to_string());
                return report.finish();
            }
        };

        let now = self.clock.now();
        report.semantic = Some(SemanticAnalyzer::new(&self.rules).analyze(&header, &payload, now));
        report.decoded = Some(DecodedToken {
            header,
            payload,
            signature,
        });

        let report = report.finish();
        tracing::debug!(
            success = report.overall_success,
            now,
            "analysis finished"
        );
        report
    }
}
