//! Curative fallback parsing.
//!
//! An ordered chain of capability-checked strategies; the first one that
//! produces content wins. Runs only when healing is requested for a parse
//! that yielded nothing.

use tagforge_dom::{Child, ForgeConfig, ForgeError, ValidateMode};
use tagforge_validate::ServiceChecker;

use crate::parse::{self, ParseOptions};

/// One lenient parsing strategy in the recovery chain.
trait ParseStrategy {
    fn name(&self) -> &'static str;
    fn available(&self, cfg: &ForgeConfig) -> bool;
    fn try_parse(
        &self,
        cfg: &ForgeConfig,
        html: &str,
        opts: &ParseOptions,
    ) -> Result<Vec<Child>, ForgeError>;
}

const STRATEGIES: &[&dyn ParseStrategy] = &[&DocumentReparse, &TagSoup, &ServiceReparse];

/// Run the fallback chain over `html`. `None` means every strategy was
/// unavailable, empty, or failed.
pub(crate) fn recover_parse(
    cfg: &ForgeConfig,
    html: &str,
    opts: &ParseOptions,
) -> Option<Vec<Child>> {
    for strategy in STRATEGIES {
        if !strategy.available(cfg) {
            tracing::debug!("Fallback strategy '{}' unavailable; skipping", strategy.name());
            continue;
        }
        match strategy.try_parse(cfg, html, opts) {
            Ok(roots) if !roots.is_empty() => {
                tracing::info!("Fallback strategy '{}' recovered the input", strategy.name());
                return Some(roots);
            }
            Ok(_) => {
                tracing::debug!("Fallback strategy '{}' produced no content", strategy.name());
            }
            Err(e) => {
                tracing::warn!("Fallback strategy '{}' failed: {}", strategy.name(), e.message());
            }
        }
    }
    None
}

/// Reparse as a full document, keeping the html root. Wins when the
/// fragment path unwraps an input down to nothing.
struct DocumentReparse;

impl ParseStrategy for DocumentReparse {
    fn name(&self) -> &'static str {
        "document-reparse"
    }

    fn available(&self, _cfg: &ForgeConfig) -> bool {
        true
    }

    fn try_parse(
        &self,
        _cfg: &ForgeConfig,
        html: &str,
        opts: &ParseOptions,
    ) -> Result<Vec<Child>, ForgeError> {
        let doc = format!("<!DOCTYPE html>{html}");
        let roots = parse::parse_roots(&doc, opts.raw_embedded)?;
        if roots.iter().any(has_content) {
            Ok(roots)
        } else {
            Ok(Vec::new())
        }
    }
}

/// Non-whitespace text anywhere, or any element beyond the
/// html/head/body scaffolding.
fn has_content(child: &Child) -> bool {
    match child {
        Child::Element(el) => {
            if !matches!(el.tag.as_str(), "html" | "head" | "body") {
                return true;
            }
            el.children.iter().any(has_content)
        }
        Child::Fragment(children) => children.iter().any(has_content),
        Child::Text(text) | Child::Safe(text) => !text.trim().is_empty(),
        Child::Bytes(bytes) => !bytes.is_empty(),
        Child::Json(map) => !map.is_empty(),
    }
}

/// Strip tag spans and keep the remaining text. Last-resort local
/// strategy for inputs the tree parser rejects outright.
struct TagSoup;

impl ParseStrategy for TagSoup {
    fn name(&self) -> &'static str {
        "tag-soup"
    }

    fn available(&self, _cfg: &ForgeConfig) -> bool {
        true
    }

    fn try_parse(
        &self,
        _cfg: &ForgeConfig,
        html: &str,
        _opts: &ParseOptions,
    ) -> Result<Vec<Child>, ForgeError> {
        let text = strip_tags(html);
        if text.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![Child::Text(text)])
        }
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ask the external validation service about the input, then retry the
/// plain parse if the service reports it clean.
struct ServiceReparse;

impl ParseStrategy for ServiceReparse {
    fn name(&self) -> &'static str {
        "service-reparse"
    }

    fn available(&self, cfg: &ForgeConfig) -> bool {
        cfg.validate_mode == ValidateMode::ServiceCheck
    }

    fn try_parse(
        &self,
        _cfg: &ForgeConfig,
        html: &str,
        opts: &ParseOptions,
    ) -> Result<Vec<Child>, ForgeError> {
        let errors = ServiceChecker::new().check(html)?;
        if !errors.is_empty() {
            return Err(ForgeError::validation(
                format!("Validation service reported: {}", errors.join("; ")),
                "1. Fix the reported issues in your markup.\n2. Re-run conversion after corrections.\n3. Switch to a different validation mode for tolerant parsing.",
            ));
        }
        parse::parse_roots(html, opts.raw_embedded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_keeps_outside_text() {
        assert_eq!(strip_tags("a <unclosed b"), "a");
        assert_eq!(strip_tags("<b>bold</b> plain"), "bold plain");
        assert_eq!(strip_tags("<!-- x -->"), "");
    }

    #[test]
    fn test_tag_soup_recovers_stray_text() {
        let roots = TagSoup
            .try_parse(&ForgeConfig::new(), "a <unclosed b", &ParseOptions::default())
            .unwrap();
        assert_eq!(roots, vec![Child::Text("a".into())]);
    }

    #[test]
    fn test_document_reparse_finds_content() {
        let roots = DocumentReparse
            .try_parse(&ForgeConfig::new(), "<div>x</div>", &ParseOptions::default())
            .unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].as_element().unwrap().tag, "html");
    }

    #[test]
    fn test_document_reparse_rejects_bare_scaffolding() {
        let roots = DocumentReparse
            .try_parse(&ForgeConfig::new(), "<!-- c -->", &ParseOptions::default())
            .unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn test_chain_exhausts_to_none() {
        let cfg = ForgeConfig::new();
        assert!(recover_parse(&cfg, "<!-- c -->", &ParseOptions::default()).is_none());
    }

    #[test]
    fn test_chain_first_success_wins() {
        let cfg = ForgeConfig::new();
        let roots = recover_parse(&cfg, "<div>x</div>", &ParseOptions::default()).unwrap();
        assert_eq!(roots[0].as_element().unwrap().tag, "html");
    }

    #[test]
    fn test_service_strategy_gated_by_mode() {
        let mut cfg = ForgeConfig::new();
        assert!(!ServiceReparse.available(&cfg));
        cfg.validate_mode = ValidateMode::ServiceCheck;
        assert!(ServiceReparse.available(&cfg));
    }
}
