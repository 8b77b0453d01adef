//! Markup-to-tree and markup-to-expression conversion.
//!
//! Parsing is built on html5ever's RcDom. Fragment inputs are unwrapped
//! from the synthetic html/head/body shell the parser inserts; document
//! inputs (leading doctype or `<html>`) keep their root. Failure handling
//! is selected per call through [`Strictness`], with an optional curative
//! fallback chain in [`crate::recover`].

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use tagforge_dom::{AttrValue, Child, Element, ForgeConfig, ForgeError, config};
use tagforge_validate::{Validator, allowlist, resolve_mode};

use crate::expr;
use crate::recover;

/// Failure handling for the conversion entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Return an empty result on failure, silently.
    Ignore,
    /// Propagate a [`ForgeError`] carrying remediation steps.
    Raise,
    /// Log and return a result annotated with a warning prefix.
    #[default]
    Warn,
    /// Run the curative fallback chain, then behave like `Warn`.
    Heal,
}

/// Per-call knobs for a single conversion. `None` fields defer to the
/// process-wide [`ForgeConfig`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Emit attributes before children in generated expressions.
    pub attrs_first: bool,
    /// Run the validator over the resulting tree. Defaults to
    /// `enable_validation` from the active config.
    pub validate: Option<bool>,
    /// Allow the curative fallback chain on parse failure.
    /// `Strictness::Heal` implies it.
    pub heal_parsing: Option<bool>,
    /// Failure handling mode.
    pub strictness: Strictness,
    /// Treat embedded text as pre-escaped instead of re-escaping it.
    pub raw_embedded: bool,
    /// Suppress the unsafe-tag warning.
    pub quiet_unsafe: bool,
}

/// Result of a tree conversion: nothing, a single root, or an ordered
/// tuple of top-level siblings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedMarkup {
    Empty,
    One(Child),
    Many(Vec<Child>),
}

impl ParsedMarkup {
    pub(crate) fn from_roots(mut roots: Vec<Child>) -> Self {
        match roots.len() {
            0 => ParsedMarkup::Empty,
            1 => ParsedMarkup::One(roots.remove(0)),
            _ => ParsedMarkup::Many(roots),
        }
    }

    /// All roots in document order.
    pub fn into_roots(self) -> Vec<Child> {
        match self {
            ParsedMarkup::Empty => Vec::new(),
            ParsedMarkup::One(child) => vec![child],
            ParsedMarkup::Many(roots) => roots,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ParsedMarkup::Empty)
    }
}

/// Convert markup to a builder expression using the process-wide config.
pub fn markup_to_expr(html: &str, opts: &ParseOptions) -> Result<String, ForgeError> {
    markup_to_expr_with(&config::current(), html, opts)
}

pub fn markup_to_expr_with(
    cfg: &ForgeConfig,
    html: &str,
    opts: &ParseOptions,
) -> Result<String, ForgeError> {
    match convert(cfg, html, opts)? {
        Outcome::Roots(roots) => {
            let found_unsafe = warn_unsafe(&roots, opts);
            let body = expr::roots_to_expr(&roots, opts.attrs_first);
            if found_unsafe && opts.strictness == Strictness::Warn {
                let mut out = String::from(
                    "# WARNING: Unsafe tags detected (e.g., script/iframe); review for security.\n",
                );
                out.push_str(&body);
                Ok(out)
            } else {
                Ok(body)
            }
        }
        Outcome::EmptyInput => Ok(String::new()),
        Outcome::Failed { annotate: true } => {
            Ok("# WARNING: Parsing failed; empty result.\n()".to_string())
        }
        Outcome::Failed { annotate: false } => Ok("()".to_string()),
    }
}

/// Convert markup to an element tree using the process-wide config.
pub fn markup_to_tree(html: &str, opts: &ParseOptions) -> Result<ParsedMarkup, ForgeError> {
    markup_to_tree_with(&config::current(), html, opts)
}

pub fn markup_to_tree_with(
    cfg: &ForgeConfig,
    html: &str,
    opts: &ParseOptions,
) -> Result<ParsedMarkup, ForgeError> {
    match convert(cfg, html, opts)? {
        Outcome::Roots(roots) => {
            warn_unsafe(&roots, opts);
            let roots = if opts.validate.unwrap_or(cfg.enable_validation) {
                let validator = Validator::new(cfg);
                let mut kept = Vec::with_capacity(roots.len());
                for root in roots {
                    let mode = resolve_mode(&root, cfg);
                    if let Some(child) = validator.validate_and_heal(root, mode)? {
                        kept.push(child);
                    }
                }
                kept
            } else {
                roots
            };
            Ok(ParsedMarkup::from_roots(roots))
        }
        Outcome::EmptyInput | Outcome::Failed { .. } => Ok(ParsedMarkup::Empty),
    }
}

/// Decode UTF-8 bytes and convert to a builder expression.
pub fn bytes_to_expr(bytes: &[u8], opts: &ParseOptions) -> Result<String, ForgeError> {
    bytes_to_expr_with(&config::current(), bytes, opts)
}

pub fn bytes_to_expr_with(
    cfg: &ForgeConfig,
    bytes: &[u8],
    opts: &ParseOptions,
) -> Result<String, ForgeError> {
    markup_to_expr_with(cfg, decode_utf8(bytes)?, opts)
}

/// Decode UTF-8 bytes and convert to an element tree.
pub fn bytes_to_tree(bytes: &[u8], opts: &ParseOptions) -> Result<ParsedMarkup, ForgeError> {
    bytes_to_tree_with(&config::current(), bytes, opts)
}

pub fn bytes_to_tree_with(
    cfg: &ForgeConfig,
    bytes: &[u8],
    opts: &ParseOptions,
) -> Result<ParsedMarkup, ForgeError> {
    markup_to_tree_with(cfg, decode_utf8(bytes)?, opts)
}

fn decode_utf8(bytes: &[u8]) -> Result<&str, ForgeError> {
    std::str::from_utf8(bytes).map_err(|e| {
        ForgeError::decode(
            format!("Bytes decoding failed: {e}"),
            "1. Provide UTF-8 encoded bytes.\n2. Specify a different encoding if known.\n3. Convert to a string before calling.",
        )
    })
}

enum Outcome {
    Roots(Vec<Child>),
    EmptyInput,
    Failed { annotate: bool },
}

fn convert(cfg: &ForgeConfig, html: &str, opts: &ParseOptions) -> Result<Outcome, ForgeError> {
    let trimmed = html.trim();
    if trimmed.is_empty() {
        return match opts.strictness {
            Strictness::Raise => Err(ForgeError::parse(
                "Invalid input: markup must be a non-empty string.",
                "1. Provide valid markup.\n2. Check for empty inputs.",
            )),
            Strictness::Warn => {
                tracing::warn!("Empty or invalid input; returning nothing");
                Ok(Outcome::EmptyInput)
            }
            Strictness::Ignore | Strictness::Heal => Ok(Outcome::EmptyInput),
        };
    }

    let cause = match parse_roots(trimmed, opts.raw_embedded) {
        Ok(roots) if !roots.is_empty() => return Ok(Outcome::Roots(roots)),
        Ok(_) => "input parsed to no content".to_string(),
        Err(e) => e.message().to_string(),
    };

    if effective_heal(cfg, opts) {
        tracing::warn!("Parsing failed: {}. Attempting curative fallback", cause);
        if let Some(roots) = recover::recover_parse(cfg, trimmed, opts) {
            if !roots.is_empty() {
                return Ok(Outcome::Roots(roots));
            }
        }
    }
    failure_outcome(opts.strictness, &cause)
}

fn effective_heal(cfg: &ForgeConfig, opts: &ParseOptions) -> bool {
    if opts.strictness == Strictness::Heal {
        return true;
    }
    match opts.heal_parsing {
        Some(flag) => flag,
        None => {
            if cfg.auto_heal {
                tracing::warn!(
                    "Global auto_heal is true, but heal_parsing not set; ignoring healing for parsing"
                );
            }
            false
        }
    }
}

fn failure_outcome(strictness: Strictness, cause: &str) -> Result<Outcome, ForgeError> {
    match strictness {
        Strictness::Raise => Err(ForgeError::parse(
            format!("Markup parsing failed: {cause}."),
            detailed_prescription(),
        )),
        Strictness::Warn | Strictness::Heal => {
            tracing::warn!("Markup parsing failed: {}; returning annotated empty result", cause);
            Ok(Outcome::Failed { annotate: true })
        }
        Strictness::Ignore => Ok(Outcome::Failed { annotate: false }),
    }
}

/// Parse `html` and collect top-level roots as [`Child`] values.
pub(crate) fn parse_roots(html: &str, raw_embedded: bool) -> Result<Vec<Child>, ForgeError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| ForgeError::parse(e.to_string(), detailed_prescription()))?;
    Ok(collect_roots(&dom.document, is_document_input(html), raw_embedded))
}

/// Document inputs start with a doctype or an `<html>` tag; everything
/// else is treated as a fragment.
fn is_document_input(html: &str) -> bool {
    let head: String = html.chars().take(9).collect::<String>().to_ascii_lowercase();
    if head.starts_with("<!doctype") {
        return true;
    }
    if head.starts_with("<html") {
        return match html.as_bytes().get(5) {
            None | Some(b'>') => true,
            Some(b) => b.is_ascii_whitespace(),
        };
    }
    false
}

fn collect_roots(document: &Handle, document_input: bool, raw_embedded: bool) -> Vec<Child> {
    let children = document.children.borrow();
    let html_el = children.iter().find(|node| {
        matches!(&node.data, RcNodeData::Element { name, .. } if name.local.as_ref() == "html")
    });
    let Some(html_el) = html_el else {
        return Vec::new();
    };
    if document_input {
        return convert_node(html_el, raw_embedded).into_iter().collect();
    }
    // Fragments get wrapped in an html/head/body shell by the parser;
    // unwrap the synthetic sections and keep their children as roots.
    let mut roots = Vec::new();
    for section in html_el.children.borrow().iter() {
        match &section.data {
            RcNodeData::Element { name, .. }
                if matches!(name.local.as_ref(), "head" | "body") =>
            {
                roots.extend(convert_children(section, raw_embedded));
            }
            _ => {
                if let Some(child) = convert_node(section, raw_embedded) {
                    roots.push(child);
                }
            }
        }
    }
    roots
}

fn convert_children(handle: &Handle, raw_embedded: bool) -> Vec<Child> {
    let mut out = Vec::new();
    for child in handle.children.borrow().iter() {
        if let Some(converted) = convert_node(child, raw_embedded) {
            out.push(converted);
        }
    }
    // <template> content lives in a separate fragment, not in children.
    if let RcNodeData::Element { template_contents, .. } = &handle.data {
        if let Some(contents) = template_contents.borrow().as_ref() {
            out.extend(convert_children(contents, raw_embedded));
        }
    }
    out
}

fn convert_node(handle: &Handle, raw_embedded: bool) -> Option<Child> {
    match &handle.data {
        RcNodeData::Text { contents } => {
            let text = contents.borrow();
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else if raw_embedded {
                Some(Child::Safe(trimmed.to_string()))
            } else {
                Some(Child::Text(trimmed.to_string()))
            }
        }
        RcNodeData::Element { name, attrs: dom_attrs, .. } => {
            let mut el = Element::new(name.local.as_ref());
            for attr in dom_attrs.borrow().iter() {
                if attr.value.is_empty() {
                    el.set_attr(attr.name.local.as_ref(), AttrValue::Bool(true));
                } else {
                    el.set_attr(attr.name.local.as_ref(), attr.value.to_string());
                }
            }
            el.children = convert_children(handle, raw_embedded);
            Some(Child::Element(el))
        }
        // Comments, doctypes and processing instructions are stripped.
        _ => None,
    }
}

/// Log a warning per injection-prone tag present anywhere in `roots`.
/// Returns whether any was found.
fn warn_unsafe(roots: &[Child], opts: &ParseOptions) -> bool {
    if opts.quiet_unsafe {
        return false;
    }
    let mut found = false;
    for tag in allowlist::UNSAFE_TAGS {
        if roots.iter().any(|root| contains_tag(root, tag)) {
            tracing::warn!(
                "Unsafe tag '{}' detected in markup; potential security risk if output is rendered dynamically",
                tag
            );
            found = true;
        }
    }
    found
}

fn contains_tag(child: &Child, tag: &str) -> bool {
    match child {
        Child::Element(el) => {
            el.tag == tag || el.children.iter().any(|c| contains_tag(c, tag))
        }
        Child::Fragment(children) => children.iter().any(|c| contains_tag(c, tag)),
        _ => false,
    }
}

fn detailed_prescription() -> &'static str {
    concat!(
        "1. Verify markup syntax.\n",
        "2. Enable heal_parsing for fallback recovery.\n",
        "3. Simplify the input.\n",
        "Common scenarios:\n",
        " - Unbalanced tags: add missing closing tags (e.g., </div>).\n",
        " - Invalid characters: encode special entities (e.g., & to &amp;).\n",
        " - Nested errors: check for improper nesting (e.g., <div> inside <p>).\n",
        " - Attribute syntax: fix invalid attributes (e.g., missing quotes around values).\n",
        " - Doctype issues: add or correct <!DOCTYPE html>.\n",
        " - General: validate input at https://validator.w3.org/ or simplify the markup."
    )
}
