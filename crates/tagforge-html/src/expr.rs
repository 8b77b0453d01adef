//! Builder-expression generation.
//!
//! Turns element trees into the textual constructor form
//! `TagName(child, key=value, **exotic)`. Tag names are capitalized,
//! attribute keys use underscores, string values are single-quoted
//! literals. Multi-child elements span lines with four-space indentation;
//! a lone text child collapses to an inline call.

use tagforge_dom::{AttrValue, Child, Element, attrs};

use crate::render::{escape_text, json_pairs};

pub(crate) const INDENT: usize = 4;

/// Expression form of an ordered sequence of roots. Multiple roots become
/// a parenthesized tuple.
pub fn roots_to_expr(roots: &[Child], attrs_first: bool) -> String {
    let mut parts: Vec<String> = roots
        .iter()
        .map(|c| child_to_expr(c, 1, attrs_first))
        .filter(|s| !s.is_empty())
        .collect();
    match parts.len() {
        0 => "()".to_string(),
        1 => parts.pop().unwrap_or_default(),
        _ => format!("({})", parts.join(", ")),
    }
}

/// Expression form of a single element.
pub fn element_to_expr(el: &Element, attrs_first: bool) -> String {
    element_expr(el, 1, attrs_first)
}

fn child_to_expr(child: &Child, lvl: usize, attrs_first: bool) -> String {
    match child {
        Child::Element(el) => element_expr(el, lvl, attrs_first),
        Child::Text(text) => quoted_text(text, true),
        Child::Safe(text) => quoted_text(text, false),
        // Lossy decode; U+FFFD marks undecodable bytes.
        Child::Bytes(bytes) => quoted_text(&String::from_utf8_lossy(bytes), true),
        Child::Json(map) => quote(&json_pairs(map)),
        Child::Fragment(children) => {
            let parts: Vec<String> = children
                .iter()
                .map(|c| child_to_expr(c, lvl, attrs_first))
                .filter(|s| !s.is_empty())
                .collect();
            parts.join(", ")
        }
    }
}

fn quoted_text(text: &str, escape: bool) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        String::new()
    } else if escape {
        quote(&escape_text(trimmed))
    } else {
        quote(trimmed)
    }
}

fn element_expr(el: &Element, lvl: usize, attrs_first: bool) -> String {
    let tag_name = expr_tag_name(&el.tag);
    let children: Vec<String> = el
        .children
        .iter()
        .map(|c| child_to_expr(c, lvl + 1, attrs_first))
        .filter(|s| !s.is_empty())
        .collect();
    let attrs = format_attrs(el);

    // A lone text child keeps the call on one line.
    let only_child = el.children.is_empty()
        || (el.children.len() == 1
            && matches!(el.children[0], Child::Text(_) | Child::Safe(_)));

    if only_child {
        if attrs_first {
            let child = children.first().map(String::as_str).unwrap_or("");
            return format!("{}({})({})", tag_name, attrs.join(", "), child);
        }
        let mut parts = children;
        parts.extend(attrs);
        return format!("{}({})", tag_name, parts.join(", "));
    }

    let spc = " ".repeat(lvl * INDENT);
    let close = " ".repeat((lvl - 1) * INDENT);
    let joiner = format!(",\n{spc}");

    if !attrs_first || attrs.is_empty() {
        let mut parts = children;
        parts.extend(attrs);
        return format!("{}(\n{}{}\n{})", tag_name, spc, parts.join(&joiner), close);
    }

    format!(
        "{}({})(\n{}{}\n{})",
        tag_name,
        attrs.join(", "),
        spc,
        children.join(&joiner),
        close
    )
}

/// Attribute expressions in stored order, except `class` sorts last.
/// Keys that fail the identifier pattern collect into a `**{...}` spread.
fn format_attrs(el: &Element) -> Vec<String> {
    let mut entries: Vec<(&str, &AttrValue)> = el.attrs.iter().collect();
    entries.sort_by_key(|(key, _)| *key == "class");

    let mut named = Vec::new();
    let mut exotic = Vec::new();
    for (key, value) in entries {
        let mapped = attrs::keymap_reverse(key);
        if is_valid_key(&mapped) {
            named.push(format!(
                "{}={}",
                mapped.replace('-', "_"),
                attr_value_expr(value)
            ));
        } else {
            exotic.push(format!("{}: {}", quote(&mapped), attr_value_expr(value)));
        }
    }
    if !exotic.is_empty() {
        named.push(format!("**{{{}}}", exotic.join(", ")));
    }
    named
}

fn attr_value_expr(value: &AttrValue) -> String {
    match value {
        AttrValue::Absent | AttrValue::Bool(false) => "False".to_string(),
        AttrValue::Bool(true) => "True".to_string(),
        AttrValue::Text(s) if s.is_empty() => "True".to_string(),
        AttrValue::Text(s) | AttrValue::Safe(s) => quote(s),
        AttrValue::Map(pairs) => {
            let joined: Vec<String> =
                pairs.iter().map(|(k, v)| format!("{k}:{v}")).collect();
            quote(&joined.join("; "))
        }
        AttrValue::List(items) => quote(&items.join(" ")),
    }
}

/// Single-quoted literal with backslash escapes.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// `my-widget` becomes `My_widget`.
fn expr_tag_name(tag: &str) -> String {
    let mut chars = tag.chars();
    let capitalized = match chars.next() {
        Some(first) => {
            first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
        }
        None => String::new(),
    };
    capitalized.replace('-', "_")
}

fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '-' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
