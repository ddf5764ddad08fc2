//! Core of the ysl transpiler.
//!
//! This crate provides the front-end/back-end core that turns a
//! YAML-embedded scripting document into source text of the target
//! expression language. The pipeline is roughly:
//!
//!   external document parser
//!     -> decode     (provisional node tree)
//!     -> construct  (canonical AST)
//!     -> print      (target text)
//!     -> external layout engine
//!
//! Higher-level tools (CLI, editors, etc.) should depend on this crate
//! rather than reimplementing the pipeline.

// ---------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------

pub mod error;

// ---------------------------------------------------------------------
// Lexical grammar: named, composable pattern matchers
// ---------------------------------------------------------------------

pub mod grammar;

// ---------------------------------------------------------------------
// Node trees and the constructor
// ---------------------------------------------------------------------

pub mod ast;
pub mod construct;
pub mod decode;

// ---------------------------------------------------------------------
// Back-end: printing
// ---------------------------------------------------------------------

pub mod print;

// ---------------------------------------------------------------------
// Adjacent environment contract
// ---------------------------------------------------------------------

pub mod loadpath;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use ast::{Node, Raw, Top};
pub use construct::construct;
pub use decode::{decode, decode_str};
pub use error::CoreError;
pub use grammar::Grammar;
pub use print::{Layout, LayoutOptions, PassthroughLayout, print, print_formatted};
