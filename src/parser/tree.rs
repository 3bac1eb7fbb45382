use serde::Serialize;
use std::fmt::{self, Write};

/// Grammar symbol labelling a derivation node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Symbol {
    Token,
    Header,
    Payload,
    Signature,
    Segment,
    Dot,
}

impl Symbol {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Symbol::Token => "TOKEN",
            Symbol::Header => "HEADER",
            Symbol::Payload => "PAYLOAD",
            Symbol::Signature => "SIGNATURE",
            Symbol::Segment => "SEGMENT",
            Symbol::Dot => "DOT",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node of the derivation tree
///
/// Terminals (`SEGMENT`, `DOT`) carry their text and have no children.
/// Non-terminals carry empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivationNode {
    pub symbol: Symbol,
    pub text: String,
    pub children: Vec<DerivationNode>,
}

impl DerivationNode {
    pub(crate) fn non_terminal(symbol: Symbol, children: Vec<DerivationNode>) -> Self {
        Self {
            symbol,
            text: String::new(),
            children,
        }
    }

    pub(crate) fn terminal(symbol: Symbol, text: impl Into<String>) -> Self {
        Self {
            symbol,
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    /// Text of the segment derived by the `HEADER`, `PAYLOAD` or `SIGNATURE`
    /// child of this node
    pub fn segment(&self, symbol: Symbol) -> Option<&str> {
        self.children
            .iter()
            .find(|child| child.symbol == symbol)
            .and_then(|child| child.children.first())
            .filter(|leaf| leaf.symbol == Symbol::Segment)
            .map(|leaf| leaf.text.as_str())
    }

    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DerivationNode::node_count)
            .sum::<usize>()
    }

    /// Render the tree as an indented outline
    ///
    /// ```text
    /// TOKEN
    ///   HEADER
    ///     SEGMENT "eyJ..."
    ///   DOT "."
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        // Writing to a String cannot fail
        let _ = if self.is_terminal() {
            writeln!(out, "{indent}{} {:?}", self.symbol, self.text)
        } else {
            writeln!(out, "{indent}{}", self.symbol)
        };
        for child in &self.children {
            child.render_into(out, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DerivationNode {
        let segment = |symbol, text| {
            DerivationNode::non_terminal(
                symbol,
                vec![DerivationNode::terminal(Symbol::Segment, text)],
            )
        };
        DerivationNode::non_terminal(
            Symbol::Token,
            vec![
                segment(Symbol::Header, "h"),
                DerivationNode::terminal(Symbol::Dot, "."),
                segment(Symbol::Payload, "p"),
                DerivationNode::terminal(Symbol::Dot, "."),
                segment(Symbol::Signature, "s"),
            ],
        )
    }

    #[test]
    fn test_segment_lookup() {
        let tree = sample();
        assert_eq!(tree.segment(Symbol::Header), Some("h"));
        assert_eq!(tree.segment(Symbol::Signature), Some("s"));
        assert_eq!(tree.segment(Symbol::Dot), None);
    }

    #[test]
    fn test_node_count() {
        assert_eq!(sample().node_count(), 9);
    }

    #[test]
    fn test_render() {
        let rendered = sample().render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "TOKEN");
        assert_eq!(lines[1], "  HEADER");
        assert_eq!(lines[2], "    SEGMENT \"h\"");
        assert_eq!(lines[3], "  DOT \".\"");
        assert_eq!(lines.len(), 9);
    }
}
