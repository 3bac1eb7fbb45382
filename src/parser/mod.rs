//! Syntactic analysis
//!
//! LL(1) recursive-descent recognizer for the compact token grammar (see
//! [`grammar`]). Every production that succeeds contributes a node to the
//! derivation tree. A production that fails records a diagnostic and returns
//! `None`, which aborts every enclosing production: the grammar is
//! unambiguous, so there is nothing to backtrack to.

pub mod grammar;
mod tree;

pub use grammar::GrammarInfo;
pub use tree::{DerivationNode, Symbol};

use crate::lexer::{Token, TokenKind};
use crate::report::{Diagnostic, DiagnosticKind, Phase, StageReport};
use serde::Serialize;

/// Result of a parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Root of the derivation tree, present only when the start production
    /// completed
    pub tree: Option<DerivationNode>,
    pub diagnostics: Vec<Diagnostic>,
    pub success: bool,
    pub tokens_consumed: usize,
}

/// Phase-specific payload of the syntactic report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntacticDetails {
    pub tree: Option<DerivationNode>,
    pub grammar: GrammarInfo,
    pub tokens_consumed: usize,
}

/// Recursive-descent parser over a lexer token sequence
pub struct Parser<'t> {
    tokens: &'t [Token],
    current: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Parse the whole token sequence
    pub fn parse(mut self) -> ParseOutcome {
        let tree = self.parse_token();
        let success = self.diagnostics.is_empty() && tree.is_some();

        ParseOutcome {
            tree,
            diagnostics: self.diagnostics,
            success,
            tokens_consumed: self.current,
        }
    }

    /// Run the syntactic phase and wrap the result in a stage report
    pub fn analyze(self) -> StageReport<SyntacticDetails> {
        let outcome = self.parse();

        tracing::debug!(
            success = outcome.success,
            consumed = outcome.tokens_consumed,
            "syntactic analysis finished"
        );

        let mut report = StageReport::new(
            Phase::Syntactic,
            outcome.diagnostics,
            SyntacticDetails {
                tree: outcome.tree,
                grammar: GrammarInfo::compact_token(),
                tokens_consumed: outcome.tokens_consumed,
            },
        );
        report.success = outcome.success;
        report
    }

    /// TOKEN → HEADER . PAYLOAD . SIGNATURE
    fn parse_token(&mut self) -> Option<DerivationNode> {
        let header = self.parse_segment(TokenKind::Header, Symbol::Header)?;
        let first_dot = self.parse_dot("first", TokenKind::Header)?;
        let payload = self.parse_segment(TokenKind::Payload, Symbol::Payload)?;
        let second_dot = self.parse_dot("second", TokenKind::Payload)?;
        let signature = self.parse_segment(TokenKind::Signature, Symbol::Signature)?;
        self.parse_end()?;

        Some(DerivationNode::non_terminal(
            Symbol::Token,
            vec![header, first_dot, payload, second_dot, signature],
        ))
    }

    /// HEADER → SEGMENT, PAYLOAD → SEGMENT, SIGNATURE → SEGMENT
    fn parse_segment(&mut self, expected: TokenKind, symbol: Symbol) -> Option<DerivationNode> {
        let position = self.position();

        match self.current_kind() {
            kind if kind == expected => {
                let text = self.tokens[self.current].text.clone();
                self.current += 1;
                Some(DerivationNode::non_terminal(
                    symbol,
                    vec![DerivationNode::terminal(Symbol::Segment, text)],
                ))
            }
            TokenKind::Invalid => {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::MalformedAlphabet,
                    format!("{expected} at offset {position} contains non-alphabet characters"),
                ));
                self.current += 1;
                None
            }
            found => {
                self.unexpected(expected, found, position, None);
                None
            }
        }
    }

    fn parse_dot(&mut self, ordinal: &str, after: TokenKind) -> Option<DerivationNode> {
        let position = self.position();
        match self.current_kind() {
            TokenKind::Dot => {
                self.current += 1;
                Some(DerivationNode::terminal(Symbol::Dot, "."))
            }
            found => {
                let context = format!("missing {ordinal} '.' separator after {after}");
                self.unexpected(TokenKind::Dot, found, position, Some(&context));
                None
            }
        }
    }

    fn parse_end(&mut self) -> Option<()> {
        let position = self.position();
        match self.current_kind() {
            TokenKind::End => {
                self.current = (self.current + 1).min(self.tokens.len());
                Some(())
            }
            found => {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::TrailingContent,
                    format!(
                        "Unexpected trailing content at offset {position}: expected END, found {found}"
                    ),
                ));
                None
            }
        }
    }

    fn unexpected(
        &mut self,
        expected: TokenKind,
        found: TokenKind,
        position: usize,
        context: Option<&str>,
    ) {
        let mut message =
            format!("Syntax error at offset {position}: expected {expected}, found {found}");
        if let Some(context) = context {
            message.push_str(&format!(" ({context})"));
        }
        self.diagnostics
            .push(Diagnostic::error(DiagnosticKind::UnexpectedTokenKind, message));
    }

    /// Kind of the lookahead token; reading past the sequence yields END
    fn current_kind(&self) -> TokenKind {
        self.tokens
            .get(self.current)
            .map_or(TokenKind::End, |token| token.kind)
    }

    /// Offset of the lookahead token, or the end of the last token
    fn position(&self) -> usize {
        match self.tokens.get(self.current) {
            Some(token) => token.offset,
            None => self
                .tokens
                .last()
                .map_or(0, |token| token.offset + token.len()),
        }
    }
}

/// Parse `tokens` in one call
pub fn parse(tokens: &[Token]) -> ParseOutcome {
    Parser::new(tokens).parse()
}
