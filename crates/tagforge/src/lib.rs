//! tagforge
//!
//! A document-tree toolkit: build element trees in code, render them to
//! markup, parse existing markup back into trees or builder expressions,
//! and validate or heal elements against a tag/attribute allowlist.
//!
//! # Example
//! ```
//! use tagforge::{Markup, tags};
//!
//! let page = tags::div()
//!     .attr("cls", "hero")
//!     .child(tags::h1().child("Hello"));
//! assert_eq!(
//!     page.to_markup().unwrap(),
//!     r#"<div class="hero"><h1>Hello</h1></div>"#
//! );
//! ```
//!
//! Process-wide defaults live in [`config`]; every renderer, parser and
//! validator entry point also has a `_with` variant taking an explicit
//! [`ForgeConfig`] for isolated call sites.

pub use tagforge_dom::{
    AttrList, AttrValue, Child, DEFAULT_KEEP_ATTRS, Element, ForgeConfig, ForgeError,
    ValidateMode, attrs, config, flatten, tags,
};
pub use tagforge_html::{
    Markup, ParseOptions, ParsedMarkup, Renderer, Strictness, bytes_to_expr, bytes_to_expr_with,
    bytes_to_tree, bytes_to_tree_with, element_to_expr, eval_expr, markup_to_expr,
    markup_to_expr_with, markup_to_tree, markup_to_tree_with, render, render_all,
    render_validated, roots_to_expr, tidy, tidy_with,
};
pub use tagforge_validate::{
    DEFAULT_SERVICE_URL, SIMILARITY_THRESHOLD, ServiceChecker, Validator, allowlist, resolve_mode,
};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
