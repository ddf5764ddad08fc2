//! Pattern library: the lexical grammar as named, composable matchers.
//!
//! Patterns are regex templates that may reference previously defined
//! patterns with `$name`. References resolve strictly backward, so the
//! name table is built once, in definition order, and resolution is a
//! plain lookup. Because every stored definition is already fully
//! expanded, splicing cannot introduce new references and interpolation
//! terminates by construction.

use regex::Regex;

use crate::error::CoreError;

struct PatternDef {
    name: String,
    /// Fully expanded template text, spliced verbatim into later
    /// definitions that reference this pattern.
    expanded: String,
    matcher: Regex,
}

/// Ordered table of named patterns with their compiled matchers.
pub struct Grammar {
    defs: Vec<PatternDef>,
}

/// Captures of the `dfnk` line-shape pattern: the function name and
/// the optional parenthesized parameter list (without the parens).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefnSignature {
    pub name: String,
    pub params: Option<String>,
}

impl Grammar {
    pub fn new() -> Grammar {
        Grammar { defs: Vec::new() }
    }

    /// Expand and compile `template`, then register it under `name`.
    ///
    /// An unresolved `$name` reference is a grammar-authoring defect
    /// and fails the whole definition.
    pub fn define(&mut self, name: &str, template: &str) -> Result<(), CoreError> {
        let expanded = self.expand(template)?;
        let matcher = Regex::new(&expanded).map_err(|source| CoreError::BadPattern {
            name: name.to_string(),
            source,
        })?;
        self.defs.push(PatternDef {
            name: name.to_string(),
            expanded,
            matcher,
        });
        Ok(())
    }

    /// Resolve every `$identifier` token in `template` by splicing the
    /// referenced pattern's literal definition text, repeating until
    /// none remain.
    pub fn expand(&self, template: &str) -> Result<String, CoreError> {
        let mut text = template.to_string();
        while let Some((start, end, name)) = find_reference(&text) {
            let name = name.to_string();
            let def = self
                .lookup(&name)
                .ok_or_else(|| CoreError::UnresolvedPattern {
                    name: name.clone(),
                    template: template.to_string(),
                })?;
            text.replace_range(start..end, def);
        }
        Ok(text)
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        self.defs
            .iter()
            .find(|def| def.name == name)
            .map(|def| def.expanded.as_str())
    }

    /// Compiled matcher for a named pattern.
    pub fn matcher(&self, name: &str) -> Option<&Regex> {
        self.defs
            .iter()
            .find(|def| def.name == name)
            .map(|def| &def.matcher)
    }

    /// Report match/no-match of a named pattern against a candidate
    /// substring. Unknown pattern names report no-match.
    pub fn is_match(&self, name: &str, candidate: &str) -> bool {
        self.matcher(name).is_some_and(|re| re.is_match(candidate))
    }

    /// True when the named pattern matches the entire candidate, as a
    /// tokenizer classifying a single lexeme needs.
    pub fn full_match(&self, name: &str, candidate: &str) -> bool {
        self.matcher(name)
            .and_then(|re| re.find(candidate))
            .is_some_and(|m| m.start() == 0 && m.end() == candidate.len())
    }

    /// Captures of the `defk` line shape: the name bound by a
    /// `def`/`let` pair line.
    pub fn capture_def(&self, line: &str) -> Option<String> {
        let caps = self.matcher("defk")?.captures(line)?;
        Some(caps.get(1)?.as_str().to_string())
    }

    /// Captures of the `dfnk` line shape: a `defn` signature line.
    pub fn capture_defn(&self, line: &str) -> Option<DefnSignature> {
        let caps = self.matcher("dfnk")?.captures(line)?;
        Some(DefnSignature {
            name: caps.get(1)?.as_str().to_string(),
            params: caps.get(2).map(|m| m.as_str().to_string()),
        })
    }

    /// The complete lexical grammar consumed by the external tokenizer.
    pub fn lexicon() -> Result<Grammar, CoreError> {
        let mut g = Grammar::new();

        // Character literals: named escapes, else any single character.
        g.define("char", r"\\(?:newline|space|tab|formfeed|backspace|return|.)")?;
        // Comments and ignorable runs, including a leading hashbang line.
        g.define("comm", r";[^\n]*")?;
        g.define("ignr", r"(?:#!.*\n?|[\s,]+|$comm\n?)*")?;
        // Numeric literals. The float exponent reuses the integer pattern.
        g.define("inum", r"-?\d+")?;
        g.define("xnum", r"$inum\.\d*(?:[eE]$inum)?")?;
        // Operators: the two-character range operator, then generic
        // operator-symbol runs of one to three characters.
        g.define("dotr", r"\.\.")?;
        g.define("oper", r"[-+*/<=>.!&|%]{1,3}")?;
        // Anonymous-function start marker and numbered positional args.
        g.define("anon", r"\\\(")?;
        g.define("narg", r"%\d+")?;
        // Slash-delimited regex literals: escaped or any non-slash,
        // non-newline character.
        g.define("regx", r"/(?:\\.|[^\\/\n])*/")?;
        // String literals. Single-quoted strings escape a quote by
        // doubling it.
        g.define("dstr", r#""(?:\\.|[^\\"])*""#)?;
        g.define("sstr", r"'(?:''|[^'])*'")?;
        // Symbol words: alphanumeric runs joined by single hyphens.
        g.define("symw", r"\w+(?:-\w+)*")?;
        // Path keys and dotted lookup paths.
        g.define("pkey", r"(?:$symw|\d+|$dstr|$sstr)")?;
        g.define("path", r"$pkey(?:\.$pkey)+")?;
        // Keywords, namespaced symbols, fully qualified symbols.
        g.define("keyw", r":$symw")?;
        g.define("nspc", r"$symw(?:::$symw)+")?;
        g.define("fsym", r"(?:$nspc|$symw)/$symw")?;
        // Call-site detection: a symbol immediately followed by `(`.
        g.define("psym", r"$symw\(")?;
        // Earmuff special variables.
        g.define("ssym", r"\*$symw\*")?;
        // Balanced parens, hand-bounded to a fixed nesting depth of
        // three rather than unbounded recursion. Deeper inputs simply
        // fail to match.
        g.define("bpara", r"[^()]*")?;
        g.define("bparb", r"(?:[^()]|\($bpara\))*")?;
        g.define("bparc", r"(?:[^()]|\($bparb\))*")?;
        g.define("bpar", r"(?:[^()]|\($bparc\))*")?;
        // Capturing line shapes: def/let pair lines and defn signature
        // lines.
        g.define("defk", r"^(?:def|let) +($symw) *=$")?;
        g.define("dfnk", r"^defn +($symw)(?: *\(($bpar)\))? *$")?;

        Ok(g)
    }
}

impl Default for Grammar {
    fn default() -> Grammar {
        Grammar::new()
    }
}

/// Find the next `$identifier` token: a dollar sign followed by one or
/// more ASCII letters, taken maximal-munch so a longer pattern name is
/// never misread as a shorter prefix.
fn find_reference(text: &str) -> Option<(usize, usize, &str)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_alphabetic() {
                end += 1;
            }
            if end > start {
                return Some((i, end, &text[start..end]));
            }
        }
        i += 1;
    }
    None
}
