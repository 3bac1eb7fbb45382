//! Lexical analysis
//!
//! Splits the raw input on `.` and classifies each of the first three parts
//! against the Base64URL alphabet:
//!
//! ```text
//! HEADER DOT PAYLOAD DOT SIGNATURE END
//! ```
//!
//! A part outside the alphabet becomes an `INVALID` token. The lexer never
//! fails hard except when the input has fewer than three parts, in which case
//! no tokens are produced at all.

pub mod alphabet;
mod token;

pub use alphabet::AlphabetInfo;
pub use token::{Token, TokenKind};

use crate::report::{Diagnostic, DiagnosticKind, Phase, StageReport};
use serde::Serialize;

/// Number of segments in a compact token
pub const SEGMENT_COUNT: usize = 3;

const SEGMENT_KINDS: [TokenKind; SEGMENT_COUNT] =
    [TokenKind::Header, TokenKind::Payload, TokenKind::Signature];

/// Segment length statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalStatistics {
    pub header_length: usize,
    pub payload_length: usize,
    pub signature_length: usize,
    pub total_length: usize,
}

/// Phase-specific payload of the lexical report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalDetails {
    pub tokens: Vec<Token>,
    pub token_count: usize,
    pub alphabet: AlphabetInfo,
    pub statistics: LexicalStatistics,
}

/// Lexer over a single candidate token string
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Produce the token sequence and any lexical diagnostics
    pub fn tokenize(&self) -> (Vec<Token>, Vec<Diagnostic>) {
        let parts: Vec<&str> = self.input.split(alphabet::DELIMITER).collect();
        let mut tokens = Vec::with_capacity(2 * SEGMENT_COUNT);
        let mut diagnostics = Vec::new();

        if parts.len() < SEGMENT_COUNT {
            diagnostics.push(Diagnostic::error(
                DiagnosticKind::IncompleteToken,
                format!(
                    "Incomplete token: expected {SEGMENT_COUNT} parts, found {}",
                    parts.len()
                ),
            ));
            return (tokens, diagnostics);
        }

        if parts.len() > SEGMENT_COUNT {
            diagnostics.push(Diagnostic::warning(
                DiagnosticKind::Structure,
                format!(
                    "Malformed token: found {} parts, expected {SEGMENT_COUNT}; trailing parts are ignored",
                    parts.len()
                ),
            ));
        }

        let mut offset = 0;
        for (index, (part, kind)) in parts.iter().zip(SEGMENT_KINDS).enumerate() {
            if index > 0 {
                tokens.push(Token::dot(offset));
                offset += 1;
            }

            if alphabet::is_segment(part) {
                tokens.push(Token::new(kind, *part, offset));
            } else {
                tokens.push(Token::new(TokenKind::Invalid, *part, offset));
                diagnostics.push(Self::invalid_segment(kind, part, offset));
            }
            tracing::trace!(kind = %kind, offset, length = part.len(), "classified segment");

            offset += part.len();
        }

        tokens.push(Token::end(offset));
        (tokens, diagnostics)
    }

    /// Run the lexical phase and wrap the result in a stage report
    pub fn analyze(&self) -> StageReport<LexicalDetails> {
        let (tokens, diagnostics) = self.tokenize();
        let statistics = self.statistics(&tokens);

        tracing::debug!(
            tokens = tokens.len(),
            diagnostics = diagnostics.len(),
            "lexical analysis finished"
        );

        StageReport::new(
            Phase::Lexical,
            diagnostics,
            LexicalDetails {
                token_count: tokens.len(),
                tokens,
                alphabet: AlphabetInfo::base64url(),
                statistics,
            },
        )
    }

    fn statistics(&self, tokens: &[Token]) -> LexicalStatistics {
        let length_at = |index: usize| tokens.get(index).map_or(0, Token::len);
        LexicalStatistics {
            header_length: length_at(0),
            payload_length: length_at(2),
            signature_length: length_at(4),
            total_length: self.input.len(),
        }
    }

    fn invalid_segment(kind: TokenKind, part: &str, offset: usize) -> Diagnostic {
        let message = if part.is_empty() {
            format!("{kind} segment at offset {offset} is empty")
        } else {
            format!(
                "{kind} contains invalid characters at offset {offset}: {:?}",
                alphabet::invalid_symbols(part)
            )
        };
        Diagnostic::error(DiagnosticKind::MalformedAlphabet, message)
    }
}

/// Tokenize `input` in one call
pub fn tokenize(input: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    Lexer::new(input).tokenize()
}
