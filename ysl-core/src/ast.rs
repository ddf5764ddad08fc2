//! Node trees for the transpiler.
//!
//! Two tagged unions cover the pipeline. `Raw` is the provisional tree
//! handed over by the external document parser; it carries the two
//! structural tags (`Pairs`, `Forms`) that only exist on the way into
//! the constructor. `Node` is the canonical tree: the closed tag set
//! the printer renders. Keeping them as separate types means a
//! provisional node can never leak past the constructor.

/// Canonical AST node. The printer is total over this set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Empty,
    Lst(Vec<Node>),
    Vec(Vec<Node>),
    Map(Vec<Node>),
    Str(String),
    Chr(String),
    Spc(String),
    Sym(String),
    Tok(String),
    Key(String),
    Int(String),
    Flt(String),
    Bln(bool),
    Nil,
}

impl Node {
    pub fn sym(name: impl Into<String>) -> Node {
        Node::Sym(name.into())
    }

    pub fn is_sym(&self, name: &str) -> bool {
        matches!(self, Node::Sym(s) if s == name)
    }

    /// First child of a call form, when this node is a non-empty list.
    pub fn head(&self) -> Option<&Node> {
        match self {
            Node::Lst(items) => items.first(),
            _ => None,
        }
    }
}

/// Provisional node as produced by the external parser.
///
/// `Pairs` payloads alternate key/value; `Forms` payloads are an
/// implicit statement sequence. Both are eliminated by the
/// constructor and never reach the printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Raw {
    Empty,
    Pairs(Vec<Raw>),
    Forms(Vec<Raw>),
    Lst(Vec<Raw>),
    Vec(Vec<Raw>),
    Map(Vec<Raw>),
    Str(String),
    Chr(String),
    Spc(String),
    Sym(String),
    Tok(String),
    Key(String),
    Int(String),
    Flt(String),
    Bln(bool),
    Nil,
}

impl Raw {
    pub fn sym(name: impl Into<String>) -> Raw {
        Raw::Sym(name.into())
    }

    pub fn is_sym(&self, name: &str) -> bool {
        matches!(self, Raw::Sym(s) if s == name)
    }
}

/// Canonical AST root: the ordered sequence of top-level forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Top(pub Vec<Node>);
