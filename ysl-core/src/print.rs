//! Renders the canonical AST to target source text.
//!
//! The printer is pure and total over the canonical tag set; layout is
//! not its job. Final indentation belongs to an external formatting
//! collaborator reached through the [`Layout`] seam, always invoked
//! with the same fixed options.

use crate::ast::{Node, Top};
use crate::error::CoreError;

/// Options handed to the external layout engine: a fixed style
/// identifier and the "treat input as a full program" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    pub style: &'static str,
    pub parse_all: bool,
}

impl LayoutOptions {
    pub fn fixed() -> LayoutOptions {
        LayoutOptions {
            style: "indent-only",
            parse_all: true,
        }
    }
}

/// Seam to the external code-formatting collaborator.
pub trait Layout {
    fn reformat(&self, source: &str, options: &LayoutOptions) -> Result<String, CoreError>;
}

/// Layout that emits the printer's text unchanged, for callers that
/// run the external formatter out of process.
pub struct PassthroughLayout;

impl Layout for PassthroughLayout {
    fn reformat(&self, source: &str, _options: &LayoutOptions) -> Result<String, CoreError> {
        Ok(source.to_string())
    }
}

/// Render the top-level forms, newline-joined.
pub fn print(top: &Top) -> String {
    top.0
        .iter()
        .map(print_node)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render and pass the result through the layout collaborator with
/// the fixed option set.
pub fn print_formatted(top: &Top, layout: &dyn Layout) -> Result<String, CoreError> {
    layout.reformat(&print(top), &LayoutOptions::fixed())
}

pub fn print_node(node: &Node) -> String {
    match node {
        Node::Empty => String::new(),
        Node::Lst(items) => format!("({})", join_spaced(items)),
        Node::Vec(items) => format!("[{}]", join_spaced(items)),
        Node::Map(items) => format!("{{{}}}", join_map(items)),
        Node::Str(text) => format!("\"{}\"", escape_string(text)),
        Node::Chr(text) => format!("\\{text}"),
        Node::Spc(text) => text.replace("::", "."),
        Node::Sym(text) | Node::Tok(text) | Node::Key(text) | Node::Int(text)
        | Node::Flt(text) => text.clone(),
        Node::Bln(value) => value.to_string(),
        Node::Nil => "nil".to_string(),
    }
}

fn join_spaced(items: &[Node]) -> String {
    items
        .iter()
        .map(print_node)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map children two at a time, each pair rendered as `key value`.
fn join_map(items: &[Node]) -> String {
    items
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(print_node)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Exactly three escapes; every other character passes through.
fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_literal_nodes_exactly() {
        assert_eq!(print_node(&Node::Nil), "nil");
        assert_eq!(print_node(&Node::Int("42".into())), "42");
        assert_eq!(print_node(&Node::Flt("3.14".into())), "3.14");
        assert_eq!(print_node(&Node::Bln(true)), "true");
        assert_eq!(print_node(&Node::Bln(false)), "false");
        assert_eq!(print_node(&Node::Empty), "");
        assert_eq!(print_node(&Node::Key(":name".into())), ":name");
        assert_eq!(print_node(&Node::Tok("%1".into())), "%1");
    }

    #[test]
    fn escapes_only_backslash_quote_and_newline() {
        let node = Node::Str("a\"b\\c\nd".into());
        assert_eq!(print_node(&node), "\"a\\\"b\\\\c\\nd\"");

        let tab = Node::Str("a\tb".into());
        assert_eq!(print_node(&tab), "\"a\tb\"");
    }

    #[test]
    fn renders_char_as_backslash_plus_raw_text() {
        assert_eq!(print_node(&Node::Chr("newline".into())), "\\newline");
        assert_eq!(print_node(&Node::Chr("x".into())), "\\x");
    }

    #[test]
    fn rewrites_namespace_separators_in_spc() {
        assert_eq!(print_node(&Node::Spc("str::util::join".into())), "str.util.join");
    }

    #[test]
    fn renders_collections() {
        let call = Node::Lst(vec![
            Node::sym("add"),
            Node::Int("1".into()),
            Node::Int("2".into()),
        ]);
        assert_eq!(print_node(&call), "(add 1 2)");

        let vector = Node::Vec(vec![Node::Int("1".into()), Node::Nil]);
        assert_eq!(print_node(&vector), "[1 nil]");

        let map = Node::Map(vec![
            Node::Key(":a".into()),
            Node::Int("1".into()),
            Node::Key(":b".into()),
            Node::Int("2".into()),
        ]);
        assert_eq!(print_node(&map), "{:a 1, :b 2}");
    }

    #[test]
    fn joins_top_level_forms_with_newlines() {
        let top = Top(vec![
            Node::Lst(vec![Node::sym("ns"), Node::sym("my-app")]),
            Node::Lst(vec![Node::sym("prn"), Node::Int("1".into())]),
        ]);
        assert_eq!(print(&top), "(ns my-app)\n(prn 1)");
    }

    #[test]
    fn printing_is_deterministic() {
        let top = Top(vec![Node::Map(vec![
            Node::Key(":z".into()),
            Node::Int("1".into()),
            Node::Key(":a".into()),
            Node::Int("2".into()),
        ])]);
        assert_eq!(print(&top), print(&top));
    }

    #[test]
    fn formatted_output_goes_through_the_layout_seam() {
        struct Upcase;
        impl Layout for Upcase {
            fn reformat(&self, source: &str, options: &LayoutOptions) -> Result<String, CoreError> {
                assert_eq!(options, &LayoutOptions::fixed());
                Ok(source.to_uppercase())
            }
        }
        let top = Top(vec![Node::sym("abc")]);
        assert_eq!(print_formatted(&top, &Upcase).expect("reformat"), "ABC");
    }
}
