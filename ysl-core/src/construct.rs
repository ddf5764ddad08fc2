//! Lowers the provisional node tree into the canonical AST.
//!
//! Three normalization passes carry the language's semantics: nested
//! mappings become call forms (with let-binding extraction), names
//! referenced before their defining form get a synthetic declaration,
//! and a top-level `main` gets an implicit invocation appended.

use std::collections::HashSet;

use crate::ast::{Node, Raw, Top};
use crate::error::CoreError;

/// Key that opens a let-group inside a mapping.
const LET_MARKER: &str = "let";
/// Connective separator symbol with no standalone value.
const ARROW: &str = "=>";

/// Traversal context threaded through the lowering walk.
#[derive(Debug, Clone, Copy)]
struct Ctx {
    depth: usize,
}

impl Ctx {
    fn top() -> Ctx {
        Ctx { depth: 0 }
    }

    fn deeper(self) -> Ctx {
        Ctx {
            depth: self.depth + 1,
        }
    }
}

/// Result of lowering one provisional node: a single canonical node,
/// or a sequence the parent splices in with an explicit one-level
/// flatten.
enum Lowered {
    One(Node),
    Many(Vec<Node>),
}

impl Lowered {
    fn splice_into(self, out: &mut Vec<Node>) {
        match self {
            Lowered::One(node) => out.push(node),
            Lowered::Many(nodes) => out.extend(nodes),
        }
    }

    fn into_forms(self) -> Vec<Node> {
        match self {
            Lowered::One(node) => vec![node],
            Lowered::Many(nodes) => nodes,
        }
    }
}

/// Build the canonical AST from the external parser's provisional tree.
pub fn construct(root: &Raw) -> Result<Top, CoreError> {
    let forms = lower(root, Ctx::top())?.into_forms();
    let forms = insert_forward_declarations(forms);
    let forms = append_entry_point(forms);
    Ok(Top(forms))
}

fn lower(node: &Raw, ctx: Ctx) -> Result<Lowered, CoreError> {
    match node {
        Raw::Pairs(seq) => lower_pairs(seq, ctx),
        Raw::Forms(seq) => {
            let mut out = Vec::new();
            for child in seq {
                match lower(child, ctx.deeper())? {
                    // A lone arrow is a connective token, not a form.
                    Lowered::One(node) if node.is_sym(ARROW) => {}
                    other => other.splice_into(&mut out),
                }
            }
            Ok(Lowered::Many(out))
        }
        Raw::Lst(seq) => Ok(Lowered::One(Node::Lst(lower_children(seq, ctx)?))),
        Raw::Vec(seq) => Ok(Lowered::One(Node::Vec(lower_children(seq, ctx)?))),
        Raw::Map(seq) => Ok(Lowered::One(Node::Map(lower_children(seq, ctx)?))),
        Raw::Empty => Ok(Lowered::One(Node::Empty)),
        Raw::Str(text) => Ok(Lowered::One(Node::Str(text.clone()))),
        Raw::Chr(text) => Ok(Lowered::One(Node::Chr(text.clone()))),
        Raw::Spc(text) => Ok(Lowered::One(Node::Spc(text.clone()))),
        Raw::Sym(text) => Ok(Lowered::One(Node::Sym(text.clone()))),
        Raw::Tok(text) => Ok(Lowered::One(Node::Tok(text.clone()))),
        Raw::Key(text) => Ok(Lowered::One(Node::Key(text.clone()))),
        Raw::Int(text) => Ok(Lowered::One(Node::Int(text.clone()))),
        Raw::Flt(text) => Ok(Lowered::One(Node::Flt(text.clone()))),
        Raw::Bln(value) => Ok(Lowered::One(Node::Bln(*value))),
        Raw::Nil => Ok(Lowered::One(Node::Nil)),
    }
}

fn lower_children(seq: &[Raw], ctx: Ctx) -> Result<Vec<Node>, CoreError> {
    let mut out = Vec::new();
    for child in seq {
        lower(child, ctx.deeper())?.splice_into(&mut out);
    }
    Ok(out)
}

fn lower_pairs(seq: &[Raw], ctx: Ctx) -> Result<Lowered, CoreError> {
    let pairs = split_pairs(seq, ctx)?;
    let (lets, rest): (Vec<_>, Vec<_>) = pairs
        .into_iter()
        .partition(|(key, _)| key.is_sym(LET_MARKER));

    if !lets.is_empty() {
        return lower_let_groups(&lets, &rest, ctx);
    }

    let mut out = Vec::new();
    for &(key, value) in &rest {
        lower_pair(key, value, ctx)?.splice_into(&mut out);
    }
    if rest.len() == 1 && out.len() == 1 {
        return Ok(Lowered::One(out.remove(0)));
    }
    Ok(Lowered::Many(out))
}

/// Check the alternating key/value contract of a `Pairs` payload.
/// An odd payload means the upstream parser broke the contract.
fn split_pairs<'a>(seq: &'a [Raw], ctx: Ctx) -> Result<Vec<(&'a Raw, &'a Raw)>, CoreError> {
    if seq.len() % 2 != 0 {
        return Err(CoreError::Internal(format!(
            "pairs payload at depth {} has odd length {}",
            ctx.depth,
            seq.len()
        )));
    }
    Ok(seq.chunks(2).map(|pair| (&pair[0], &pair[1])).collect())
}

/// Collapse every let-group into one `(let [bindings...] body...)`
/// call. Bindings flatten the groups' key/value terms; the non-let
/// remainder becomes the body through the ordinary pair rule.
fn lower_let_groups(
    lets: &[(&Raw, &Raw)],
    rest: &[(&Raw, &Raw)],
    ctx: Ctx,
) -> Result<Lowered, CoreError> {
    let mut bindings = Vec::new();
    for &(key, value) in lets {
        for term in binding_terms(key).into_iter().chain(binding_terms(value)) {
            // A `Pairs` binding value recurses into its own call form
            // here; it is never left as a raw mapping literal.
            lower(term, ctx.deeper())?.splice_into(&mut bindings);
        }
    }

    let mut call = vec![Node::sym(LET_MARKER), Node::Vec(bindings)];
    for &(key, value) in rest {
        lower_pair(key, value, ctx)?.splice_into(&mut call);
    }
    Ok(Lowered::One(Node::Lst(call)))
}

/// Flatten one let-group term a single level, dropping stray `let`
/// marker tokens.
fn binding_terms(raw: &Raw) -> Vec<&Raw> {
    let terms: Vec<&Raw> = match raw {
        Raw::Lst(seq) | Raw::Forms(seq) => seq.iter().collect(),
        other => vec![other],
    };
    terms
        .into_iter()
        .filter(|term| !term.is_sym(LET_MARKER))
        .collect()
}

fn lower_pair(key: &Raw, value: &Raw, ctx: Ctx) -> Result<Lowered, CoreError> {
    let key = lower(key, ctx.deeper())?;

    // An arrow key is a connective: only the value carries meaning.
    if let Lowered::One(node) = &key {
        if node.is_sym(ARROW) {
            return lower(value, ctx.deeper());
        }
    }

    let value = lower(value, ctx.deeper())?;

    // A string key with no value stands alone.
    if let (Lowered::One(bare @ Node::Str(_)), Lowered::One(Node::Empty)) = (&key, &value) {
        return Ok(Lowered::One(bare.clone()));
    }

    let mut items = Vec::new();
    key.splice_into(&mut items);
    value.splice_into(&mut items);
    Ok(Lowered::One(Node::Lst(items)))
}

/// Predeclare every symbol referenced before its own top-level `defn`
/// with a single synthetic `(declare ...)` form, placed after a
/// leading namespace declaration when one exists.
fn insert_forward_declarations(forms: Vec<Node>) -> Vec<Node> {
    let defined: HashSet<String> = forms.iter().filter_map(defn_name).collect();
    if defined.is_empty() {
        return forms;
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut forward: Vec<String> = Vec::new();
    for form in &forms {
        if let Some(name) = defn_name(form) {
            seen.insert(name);
        }
        collect_forward_refs(form, &defined, &seen, &mut forward);
    }
    if forward.is_empty() {
        return forms;
    }

    let mut call = vec![Node::sym("declare")];
    call.extend(forward.into_iter().map(Node::Sym));

    let mut forms = forms;
    let at = if forms.first().is_some_and(is_ns_form) {
        1
    } else {
        0
    };
    forms.insert(at, Node::Lst(call));
    forms
}

fn collect_forward_refs(
    node: &Node,
    defined: &HashSet<String>,
    seen: &HashSet<String>,
    forward: &mut Vec<String>,
) {
    match node {
        Node::Sym(name) => {
            if defined.contains(name) && !seen.contains(name) && !forward.contains(name) {
                forward.push(name.clone());
            }
        }
        Node::Lst(items) | Node::Vec(items) | Node::Map(items) => {
            for item in items {
                collect_forward_refs(item, defined, seen, forward);
            }
        }
        _ => {}
    }
}

/// Apply `main` to the program's invocation arguments as the final
/// top-level form, when a top-level `main` is defined.
fn append_entry_point(mut forms: Vec<Node>) -> Vec<Node> {
    let has_main = forms
        .iter()
        .any(|form| defn_name(form).is_some_and(|name| name == "main"));
    if has_main {
        forms.push(Node::Lst(vec![
            Node::sym("apply"),
            Node::sym("main"),
            Node::sym("ARGS"),
        ]));
    }
    forms
}

fn defn_name(form: &Node) -> Option<String> {
    match form {
        Node::Lst(items) => match items.as_slice() {
            [head, Node::Sym(name), ..] if head.is_sym("defn") => Some(name.clone()),
            _ => None,
        },
        _ => None,
    }
}

fn is_ns_form(form: &Node) -> bool {
    form.head().is_some_and(|head| head.is_sym("ns"))
}
