use serde::Serialize;
use std::fmt;

/// Kind of a lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Header,
    Payload,
    Signature,
    Dot,
    Invalid,
    End,
}

impl TokenKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Header => "HEADER",
            TokenKind::Payload => "PAYLOAD",
            TokenKind::Signature => "SIGNATURE",
            TokenKind::Dot => "DOT",
            TokenKind::Invalid => "INVALID",
            TokenKind::End => "END",
        }
    }

    /// Whether tokens of this kind carry segment text
    pub const fn is_segment(&self) -> bool {
        matches!(
            self,
            TokenKind::Header | TokenKind::Payload | TokenKind::Signature
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified, positioned piece of the input
///
/// `offset` is the byte offset where the token starts in the original string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    pub(crate) fn dot(offset: usize) -> Self {
        Self::new(TokenKind::Dot, ".", offset)
    }

    pub(crate) fn end(offset: usize) -> Self {
        Self::new(TokenKind::End, "", offset)
    }

    /// Length of the token text in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
