//! Tree validation and healing
//!
//! Walks a tree checking tags against the known-tag table and attributes
//! against the active mode's checker. Without auto-heal every violation is
//! reported and the node kept; with auto-heal unknown tags are dropped and
//! invalid attributes are dropped or fuzzy-repaired.

use html5ever::tendril::TendrilSink;
use html5ever::tokenizer::TokenizerOpts;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use tagforge_dom::{AttrList, Child, Element, ForgeConfig, ForgeError, ValidateMode, tags};

use crate::allowlist;
use crate::service::{DEFAULT_SERVICE_URL, ServiceChecker};

/// Minimum Jaro-Winkler similarity for a fuzzy attribute repair.
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Validation mode for `child`: the element's own override, or the
/// configured global mode.
pub fn resolve_mode(child: &Child, cfg: &ForgeConfig) -> ValidateMode {
    match child {
        Child::Element(el) => el.validate_mode.unwrap_or(cfg.validate_mode),
        _ => cfg.validate_mode,
    }
}

/// Validator bound to one configuration snapshot.
pub struct Validator<'cfg> {
    cfg: &'cfg ForgeConfig,
    service_url: String,
}

impl<'cfg> Validator<'cfg> {
    pub fn new(cfg: &'cfg ForgeConfig) -> Self {
        Self::with_service_url(cfg, DEFAULT_SERVICE_URL)
    }

    pub fn with_service_url(cfg: &'cfg ForgeConfig, service_url: &str) -> Self {
        Self {
            cfg,
            service_url: service_url.to_string(),
        }
    }

    /// Validate one child under `mode`. `Ok(None)` means the node was healed
    /// away and the parent should drop it.
    pub fn validate_and_heal(
        &self,
        child: Child,
        mode: ValidateMode,
    ) -> Result<Option<Child>, ForgeError> {
        if mode == ValidateMode::None {
            return Ok(Some(child));
        }
        match child {
            Child::Element(el) => Ok(self.validate_element(el, mode)?.map(Child::Element)),
            Child::Fragment(children) => {
                let mut kept = Vec::with_capacity(children.len());
                for child in children {
                    if let Some(child) = self.validate_and_heal(child, mode)? {
                        kept.push(child);
                    }
                }
                Ok(Some(Child::Fragment(kept)))
            }
            other => Ok(Some(other)),
        }
    }

    /// Validate an element and its subtree under `mode`.
    pub fn validate_element(
        &self,
        mut el: Element,
        mode: ValidateMode,
    ) -> Result<Option<Element>, ForgeError> {
        if mode == ValidateMode::None {
            return Ok(Some(el));
        }

        if !tags::is_known(&el.tag) {
            tracing::warn!("Invalid tag '{}' detected", el.tag);
            if self.cfg.auto_heal {
                tracing::info!("Healing: dropping invalid tag '{}'", el.tag);
                return Ok(None);
            }
        }

        let mut kept = AttrList::new();
        for (key, value) in std::mem::take(&mut el.attrs) {
            if self.is_valid_attr(&key, &el.tag, mode)? {
                kept.set(key, value);
            } else if self.cfg.auto_heal {
                match self.fuzzy_heal_attr(&key, &el.tag) {
                    Some(better) => {
                        tracing::info!(
                            "Healing: replaced '{}' with fuzzy match '{}' in '{}'",
                            key,
                            better,
                            el.tag
                        );
                        kept.set(better.to_string(), value);
                    }
                    None => {
                        tracing::info!(
                            "Healing: dropped invalid attribute '{}' from '{}'",
                            key,
                            el.tag
                        );
                    }
                }
            } else {
                tracing::warn!("Invalid attribute '{}' in '{}'", key, el.tag);
                kept.set(key, value);
            }
        }
        el.attrs = kept;

        for child in std::mem::take(&mut el.children) {
            if let Some(child) = self.validate_and_heal(child, mode)? {
                el.children.push(child);
            }
        }
        Ok(Some(el))
    }

    fn is_valid_attr(&self, attr: &str, tag: &str, mode: ValidateMode) -> Result<bool, ForgeError> {
        if attr.starts_with("data-") || allowlist::is_global(attr) {
            return Ok(true);
        }
        match mode {
            ValidateMode::None => Ok(true),
            ValidateMode::Static => {
                Ok(allowlist::tag_attrs(tag).is_some_and(|attrs| attrs.contains(&attr)))
            }
            ValidateMode::FragmentCheck => Ok(fragment_check(attr, tag)),
            ValidateMode::ServiceCheck => self.service_check(attr, tag),
        }
    }

    fn service_check(&self, attr: &str, tag: &str) -> Result<bool, ForgeError> {
        let probe = probe_markup(attr, tag);
        let document = if tag == "html" {
            format!("<!DOCTYPE html>{probe}")
        } else {
            format!(
                "<!DOCTYPE html><html lang=\"en\"><head><title>probe</title></head><body>{probe}</body></html>"
            )
        };
        let checker = ServiceChecker::with_base_url(&self.service_url);
        match checker.check(&document) {
            Ok(errors) => Ok(errors.is_empty()),
            Err(e) if self.cfg.auto_heal => {
                tracing::warn!(
                    "Healing: falling back to static validation; service unavailable: {}",
                    e.message()
                );
                self.is_valid_attr(attr, tag, ValidateMode::Static)
            }
            Err(e) => Err(e),
        }
    }

    /// Best allowlisted replacement for `attr`, if fuzzy healing is enabled
    /// and a candidate clears the similarity threshold. Ties keep the first
    /// candidate in allowlist order.
    fn fuzzy_heal_attr(&self, attr: &str, tag: &str) -> Option<&'static str> {
        if !self.cfg.heal_fuzzy_attr {
            return None;
        }
        let candidates = allowlist::tag_attrs(tag)
            .unwrap_or(&[])
            .iter()
            .chain(allowlist::GLOBAL_ATTRS.iter())
            .copied();
        let mut best: Option<(&'static str, f64)> = None;
        for candidate in candidates {
            let score = strsim::jaro_winkler(attr, candidate);
            if score >= SIMILARITY_THRESHOLD && best.is_none_or(|(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }
        best.map(|(name, _)| name)
    }
}

/// Strict round-trip probe: serialize a minimal element carrying the
/// attribute, reparse with exact errors on, and require the attribute to
/// survive. Parse errors or a mangled attribute mean invalid.
fn fragment_check(attr: &str, tag: &str) -> bool {
    let probe = format!("<!DOCTYPE html>{}", probe_markup(attr, tag));
    let opts = ParseOpts {
        tokenizer: TokenizerOpts {
            exact_errors: true,
            ..Default::default()
        },
        tree_builder: TreeBuilderOpts {
            exact_errors: true,
            ..Default::default()
        },
    };
    let dom = match parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut probe.as_bytes())
    {
        Ok(dom) => dom,
        Err(_) => return false,
    };
    if !dom.errors.borrow().is_empty() {
        return false;
    }
    attr_survives(&dom.document, tag, &attr.to_ascii_lowercase())
}

fn probe_markup(attr: &str, tag: &str) -> String {
    if tags::is_void(tag) {
        format!("<{tag} {attr}=\"test\">")
    } else {
        format!("<{tag} {attr}=\"test\"></{tag}>")
    }
}

fn attr_survives(handle: &Handle, tag: &str, attr: &str) -> bool {
    if let RcNodeData::Element { name, attrs, .. } = &handle.data {
        if name.local.as_ref() == tag
            && attrs
                .borrow()
                .iter()
                .any(|a| a.name.local.as_ref() == attr && a.value.as_ref() == "test")
        {
            return true;
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .any(|child| attr_survives(child, tag, attr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cfg() -> ForgeConfig {
        ForgeConfig::new()
    }

    fn healing_cfg() -> ForgeConfig {
        ForgeConfig {
            auto_heal: true,
            heal_fuzzy_attr: true,
            ..ForgeConfig::new()
        }
    }

    #[test]
    fn test_none_mode_is_identity() {
        let cfg = base_cfg();
        let validator = Validator::new(&cfg);
        let el = Element::new("madeup").attr("bogus", "x");
        let out = validator
            .validate_element(el.clone(), ValidateMode::None)
            .unwrap();
        assert_eq!(out, Some(el));
    }

    #[test]
    fn test_report_only_keeps_unknown_tag_and_attr() {
        let cfg = base_cfg();
        let validator = Validator::new(&cfg);
        let el = Element::new("madeup").attr("bogus", "x");
        let out = validator
            .validate_element(el, ValidateMode::Static)
            .unwrap()
            .unwrap();
        assert_eq!(out.tag, "madeup");
        assert!(out.attrs.contains("bogus"));
    }

    #[test]
    fn test_heal_drops_unknown_tag() {
        let cfg = ForgeConfig {
            auto_heal: true,
            ..ForgeConfig::new()
        };
        let validator = Validator::new(&cfg);
        let out = validator
            .validate_element(Element::new("madeup"), ValidateMode::Static)
            .unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn test_heal_drops_invalid_attr_without_fuzzy() {
        let cfg = ForgeConfig {
            auto_heal: true,
            ..ForgeConfig::new()
        };
        let validator = Validator::new(&cfg);
        let el = Element::new("div").attr("bogusname", "x").attr("id", "keep");
        let out = validator
            .validate_element(el, ValidateMode::Static)
            .unwrap()
            .unwrap();
        assert!(!out.attrs.contains("bogusname"));
        assert!(out.attrs.contains("id"));
    }

    #[test]
    fn test_fuzzy_heals_misspelled_attr() {
        let cfg = healing_cfg();
        let validator = Validator::new(&cfg);
        let el = Element::new("img").attr("sr", "pic.png").attr("clas", "x");
        let out = validator
            .validate_element(el, ValidateMode::Static)
            .unwrap()
            .unwrap();
        assert!(out.attrs.contains("src"));
        assert!(out.attrs.contains("class"));
        assert!(!out.attrs.contains("sr"));
        assert!(!out.attrs.contains("clas"));
    }

    #[test]
    fn test_fuzzy_rejects_dissimilar_attr() {
        let cfg = healing_cfg();
        let validator = Validator::new(&cfg);
        assert_eq!(validator.fuzzy_heal_attr("qqqq", "div"), None);
    }

    #[test]
    fn test_data_attrs_always_valid() {
        let cfg = base_cfg();
        let validator = Validator::new(&cfg);
        assert!(
            validator
                .is_valid_attr("data-anything", "div", ValidateMode::Static)
                .unwrap()
        );
        assert!(
            validator
                .is_valid_attr("data-x", "div", ValidateMode::FragmentCheck)
                .unwrap()
        );
    }

    #[test]
    fn test_static_attr_membership() {
        let cfg = base_cfg();
        let validator = Validator::new(&cfg);
        assert!(
            validator
                .is_valid_attr("href", "a", ValidateMode::Static)
                .unwrap()
        );
        assert!(
            !validator
                .is_valid_attr("href", "div", ValidateMode::Static)
                .unwrap()
        );
        assert!(
            validator
                .is_valid_attr("class", "div", ValidateMode::Static)
                .unwrap()
        );
    }

    #[test]
    fn test_recursion_filters_healed_children() {
        let cfg = ForgeConfig {
            auto_heal: true,
            ..ForgeConfig::new()
        };
        let validator = Validator::new(&cfg);
        let el = Element::new("div")
            .child(Element::new("madeup").child("inner"))
            .child(Element::new("span").child("ok"));
        let out = validator
            .validate_element(el, ValidateMode::Static)
            .unwrap()
            .unwrap();
        assert_eq!(out.children.len(), 1);
        assert_eq!(out.children[0].as_element().map(|e| e.tag.as_str()), Some("span"));
    }

    #[test]
    fn test_static_heal_is_idempotent() {
        let cfg = healing_cfg();
        let validator = Validator::new(&cfg);
        let el = Element::new("div")
            .attr("clas", "hero")
            .child(Element::new("madeup"))
            .child("text");
        let once = validator
            .validate_element(el, ValidateMode::Static)
            .unwrap()
            .unwrap();
        let twice = validator
            .validate_element(once.clone(), ValidateMode::Static)
            .unwrap()
            .unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fragment_check_accepts_wellformed() {
        assert!(fragment_check("class", "div"));
        assert!(fragment_check("href", "a"));
        assert!(fragment_check("src", "img"));
    }

    #[test]
    fn test_unreachable_service_falls_back_to_static_when_healing() {
        let cfg = ForgeConfig {
            auto_heal: true,
            ..ForgeConfig::new()
        };
        let validator = Validator::with_service_url(&cfg, "http://127.0.0.1:9/nu/");
        // Static accepts href on <a> and rejects it on <div>.
        assert!(
            validator
                .is_valid_attr("href", "a", ValidateMode::ServiceCheck)
                .unwrap()
        );
        assert!(
            !validator
                .is_valid_attr("href", "div", ValidateMode::ServiceCheck)
                .unwrap()
        );
    }

    #[test]
    fn test_unreachable_service_errors_without_healing() {
        let cfg = base_cfg();
        let validator = Validator::with_service_url(&cfg, "http://127.0.0.1:9/nu/");
        let err = validator
            .is_valid_attr("href", "a", ValidateMode::ServiceCheck)
            .unwrap_err();
        assert!(err.message().contains("unreachable"));
    }

    #[test]
    fn test_resolve_mode_prefers_node_override() {
        let cfg = ForgeConfig {
            validate_mode: ValidateMode::Static,
            ..ForgeConfig::new()
        };
        let plain = Child::from(Element::new("div"));
        assert_eq!(resolve_mode(&plain, &cfg), ValidateMode::Static);
        let overridden = Child::from(Element::new("div").with_validate_mode(ValidateMode::None));
        assert_eq!(resolve_mode(&overridden, &cfg), ValidateMode::None);
        assert_eq!(resolve_mode(&Child::from("text"), &cfg), ValidateMode::Static);
    }
}
