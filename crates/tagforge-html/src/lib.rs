//! Markup serialization and ingestion for tagforge trees.
//!
//! The render side walks a tree depth-first and emits markup text, with
//! optional validation and pretty-printing. The parse side converts
//! existing markup back into element trees or builder expressions, with
//! per-call strictness and a curative fallback chain for broken input.

mod eval;
mod expr;
mod parse;
mod recover;
mod render;

pub use eval::eval_expr;
pub use expr::{element_to_expr, roots_to_expr};
pub use parse::{
    ParseOptions, ParsedMarkup, Strictness, bytes_to_expr, bytes_to_expr_with, bytes_to_tree,
    bytes_to_tree_with, markup_to_expr, markup_to_expr_with, markup_to_tree, markup_to_tree_with,
};
pub use render::{Markup, Renderer, render, render_all, render_validated, tidy, tidy_with};
