//! Markup serialization
//!
//! Depth-first pre-order emission of element trees. Plain text is escaped by
//! default, safe values pass through verbatim, void elements self-close and
//! never render children. Failure handling is best-effort under `auto_heal`:
//! an unrenderable node is logged and skipped, not patched.

use tagforge_dom::{Child, Element, ForgeConfig, ForgeError, attrs, config};
use tagforge_validate::{Validator, resolve_mode};

use crate::parse::{self, ParseOptions, Strictness};

/// Serializer bound to one configuration snapshot.
pub struct Renderer<'cfg> {
    cfg: &'cfg ForgeConfig,
    validate: bool,
}

impl<'cfg> Renderer<'cfg> {
    pub fn new(cfg: &'cfg ForgeConfig) -> Self {
        Self {
            cfg,
            validate: false,
        }
    }

    /// A renderer that passes each top-level input through the validator
    /// first; nodes healed away are excluded from the output.
    pub fn with_validation(cfg: &'cfg ForgeConfig, validate: bool) -> Self {
        Self { cfg, validate }
    }

    pub fn render(&self, child: &Child) -> Result<String, ForgeError> {
        self.render_all(std::slice::from_ref(child))
    }

    /// Render several roots, joined with newlines.
    pub fn render_all(&self, children: &[Child]) -> Result<String, ForgeError> {
        let mut parts = Vec::with_capacity(children.len());
        if self.validate {
            let validator = Validator::new(self.cfg);
            for child in children {
                let mode = resolve_mode(child, self.cfg);
                if let Some(kept) = validator.validate_and_heal(child.clone(), mode)? {
                    parts.push(self.render_root(&kept)?);
                }
            }
        } else {
            for child in children {
                parts.push(self.render_root(child)?);
            }
        }
        // A healed-away root leaves no blank line behind.
        parts.retain(|part| !part.is_empty());
        Ok(parts.join("\n"))
    }

    pub fn render_element(&self, el: &Element) -> Result<String, ForgeError> {
        if self.validate {
            let mode = el.validate_mode.unwrap_or(self.cfg.validate_mode);
            let validator = Validator::new(self.cfg);
            return match validator.validate_element(el.clone(), mode)? {
                Some(kept) => self.render_root(&Child::Element(kept)),
                None => Ok(String::new()),
            };
        }
        let mut out = String::new();
        self.guard(&mut out, |renderer, buf| renderer.emit_element(el, 0, buf))?;
        Ok(out)
    }

    fn render_root(&self, child: &Child) -> Result<String, ForgeError> {
        let mut out = String::new();
        self.emit_guarded(child, 0, &mut out)?;
        Ok(out)
    }

    /// Failure boundary around one node: on error the node's partial output
    /// is discarded, and under `auto_heal` rendering continues without it.
    fn emit_guarded(&self, child: &Child, depth: usize, out: &mut String) -> Result<(), ForgeError> {
        self.guard(out, |renderer, buf| renderer.emit_child(child, depth, buf))
    }

    fn guard<F>(&self, out: &mut String, emit: F) -> Result<(), ForgeError>
    where
        F: FnOnce(&Self, &mut String) -> Result<(), ForgeError>,
    {
        let mut buf = String::new();
        match emit(self, &mut buf) {
            Ok(()) => {
                out.push_str(&buf);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Rendering error: {}", e.message());
                if self.cfg.auto_heal {
                    tracing::info!("Healing: skipping unrenderable node");
                    Ok(())
                } else {
                    Err(e)
                }
            }
        }
    }

    fn emit_child(&self, child: &Child, depth: usize, out: &mut String) -> Result<(), ForgeError> {
        match child {
            Child::Element(el) => self.emit_element(el, depth, out),
            Child::Safe(markup) => {
                out.push_str(markup);
                Ok(())
            }
            Child::Text(text) => {
                self.emit_text(text, out);
                Ok(())
            }
            Child::Bytes(bytes) => {
                let text = str::from_utf8(bytes).map_err(|e| {
                    ForgeError::decode(
                        format!("Bytes decoding failed: {e}"),
                        "1. Provide UTF-8 encoded bytes.\n\
                         2. Re-encode the input if the source encoding is known.\n\
                         3. Convert to a string before building the tree.",
                    )
                })?;
                self.emit_text(text, out);
                Ok(())
            }
            Child::Json(map) => {
                out.push_str(&json_pairs(map));
                Ok(())
            }
            Child::Fragment(children) => {
                for child in children {
                    self.emit_guarded(child, depth, out)?;
                }
                Ok(())
            }
        }
    }

    fn emit_text(&self, text: &str, out: &mut String) {
        if self.cfg.escape_by_default {
            out.push_str(&escape_text(text));
        } else {
            out.push_str(text);
        }
    }

    fn emit_element(&self, el: &Element, depth: usize, out: &mut String) -> Result<(), ForgeError> {
        if self.cfg.pretty_print && depth > 0 {
            out.push('\n');
            out.push_str(&" ".repeat(depth * self.cfg.indent_size));
        }
        out.push('<');
        out.push_str(&el.tag);
        let attr_str = attrs::to_attrs(&el.attrs);
        if !attr_str.is_empty() {
            out.push(' ');
            out.push_str(&attr_str);
        }
        if el.void {
            out.push_str(" />");
            return Ok(());
        }
        out.push('>');
        let had_elements = el.children.iter().any(Child::is_element);
        for child in &el.children {
            self.emit_guarded(child, depth + 1, out)?;
        }
        if self.cfg.pretty_print && had_elements {
            out.push('\n');
            out.push_str(&" ".repeat(depth * self.cfg.indent_size));
        }
        out.push_str("</");
        out.push_str(&el.tag);
        out.push('>');
        Ok(())
    }
}

/// Render one child under the current global configuration.
pub fn render(child: &Child) -> Result<String, ForgeError> {
    let cfg = config::current();
    Renderer::new(&cfg).render(child)
}

/// Render several roots under the current global configuration, joined with
/// newlines.
pub fn render_all(children: &[Child]) -> Result<String, ForgeError> {
    let cfg = config::current();
    Renderer::new(&cfg).render_all(children)
}

/// [`render_all`] with validation forced on.
pub fn render_validated(children: &[Child]) -> Result<String, ForgeError> {
    let cfg = config::current();
    Renderer::with_validation(&cfg, true).render_all(children)
}

/// Serialization views of a tree node, using the current global
/// configuration.
pub trait Markup {
    /// Markup text for this node.
    fn to_markup(&self) -> Result<String, ForgeError>;
    /// Builder-expression text for this node.
    fn to_expr(&self) -> Result<String, ForgeError>;
}

impl Markup for Element {
    fn to_markup(&self) -> Result<String, ForgeError> {
        let cfg = config::current();
        Renderer::new(&cfg).render_element(self)
    }

    fn to_expr(&self) -> Result<String, ForgeError> {
        Ok(crate::expr::element_to_expr(self, false))
    }
}

impl Markup for Child {
    fn to_markup(&self) -> Result<String, ForgeError> {
        render(self)
    }

    fn to_expr(&self) -> Result<String, ForgeError> {
        Ok(crate::expr::roots_to_expr(std::slice::from_ref(self), false))
    }
}

/// Re-serialize `html` pretty-printed. Parses strictly, then renders with
/// `pretty_print` forced on; under `auto_heal` a failed parse returns the
/// input unchanged.
pub fn tidy(html: &str) -> Result<String, ForgeError> {
    tidy_with(&config::current(), html)
}

pub fn tidy_with(cfg: &ForgeConfig, html: &str) -> Result<String, ForgeError> {
    if html.trim().is_empty() {
        return Ok(String::new());
    }
    let opts = ParseOptions {
        strictness: Strictness::Raise,
        validate: Some(false),
        heal_parsing: Some(false),
        ..Default::default()
    };
    match parse::markup_to_tree_with(cfg, html, &opts) {
        Ok(parsed) => {
            let mut pretty_cfg = cfg.clone();
            pretty_cfg.pretty_print = true;
            Renderer::new(&pretty_cfg).render_all(&parsed.into_roots())
        }
        Err(e) if cfg.auto_heal => {
            tracing::warn!("Tidy failed; returning input unchanged: {}", e.message());
            Ok(html.to_string())
        }
        Err(e) => Err(ForgeError::parse(
            format!("Error during tidy operation: {}", e.message()),
            "Ensure the markup is valid or simplify it before tidying.",
        )),
    }
}

/// Five-character markup escape.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Flat `key:value; key:value` join of a JSON mapping. String values render
/// bare; everything else renders as compact JSON.
pub(crate) fn json_pairs(map: &serde_json::Map<String, serde_json::Value>) -> String {
    map.iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(s) => format!("{key}:{s}"),
            other => format!("{key}:{other}"),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
