//! Attribute key canonicalization and stringification
//!
//! Canonical keys are the markup-side names (`class`, `data-id`). Builder
//! code may use the reserved-word alias `cls` and underscore separators;
//! [`keymap`] folds both into canonical form. The same mapping runs on the
//! parser's read path so round-trips are stable, and [`keymap_reverse`]
//! restores the builder alias when emitting expression text.

use crate::AttrValue;

const SPECIAL_CHARS: [char; 3] = ['-', ':', '.'];

/// Canonicalize a builder attribute key to its markup form.
///
/// Empty keys map to the placeholder `_`; one leading underscore (the
/// internal-use marker) is stripped; `cls` becomes `class`; keys already
/// containing `-`, `:` or `.` pass through; otherwise underscores become
/// hyphens.
pub fn keymap(key: &str) -> String {
    if key.is_empty() {
        return "_".to_string();
    }
    let key = key.strip_prefix('_').unwrap_or(key);
    if key == "cls" {
        return "class".to_string();
    }
    if key.contains(SPECIAL_CHARS) {
        return key.to_string();
    }
    key.replace('_', "-")
}

/// Map a canonical markup key back to its builder alias.
///
/// Only `class` has an alias; everything else passes through. Composes with
/// [`keymap`] to the identity, which keeps expression output evaluable.
pub fn keymap_reverse(key: &str) -> String {
    if key == "class" {
        return "cls".to_string();
    }
    key.to_string()
}

/// Canonicalize every key in a pair sequence.
///
/// Insertion order is preserved; when two keys collide after mapping the
/// last value wins but the first position is kept.
pub fn attrmap<K, V, I>(pairs: I) -> AttrList
where
    K: AsRef<str>,
    V: Into<AttrValue>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut out = AttrList::new();
    for (key, value) in pairs {
        out.set(keymap(key.as_ref()), value.into());
    }
    out
}

/// Render one attribute as `key`, `key="value"` or nothing.
///
/// `Absent`, `false` and empty text suppress the attribute; `true` emits the
/// bare name. Text is entity-escaped inside the quotes; safe values are
/// quoted verbatim.
pub fn stringify_attr(key: &str, value: &AttrValue) -> Option<String> {
    let val = match value {
        AttrValue::Absent | AttrValue::Bool(false) => return None,
        AttrValue::Bool(true) => return Some(key.to_string()),
        AttrValue::Text(s) => escape_attr_value(s),
        AttrValue::Safe(s) => s.clone(),
        AttrValue::Map(pairs) => {
            let joined = pairs
                .iter()
                .map(|(k, v)| format!("{k}:{v}"))
                .collect::<Vec<_>>()
                .join("; ");
            escape_attr_value(&joined)
        }
        AttrValue::List(items) => escape_attr_value(&items.join(" ")),
    };
    if val.is_empty() {
        return None;
    }
    Some(format!("{key}=\"{val}\""))
}

/// Space-joined attribute string for a whole attribute list.
pub fn to_attrs(attrs: &AttrList) -> String {
    attrs
        .iter()
        .filter_map(|(key, value)| stringify_attr(key, value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_attr_value(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Ordered attribute map with unique canonical keys
#[derive(Debug, Clone, Default)]
pub struct AttrList {
    entries: Vec<(String, AttrValue)>,
}

impl AttrList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Set an attribute. An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: AttrValue) {
        let key = key.into();
        for entry in self.entries.iter_mut() {
            if entry.0 == key {
                entry.1 = value;
                return;
            }
        }
        self.entries.push((key, value));
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

/// Order-insensitive comparison; attributes form a set of unique keys.
impl PartialEq for AttrList {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k) == Some(v))
    }
}

impl IntoIterator for AttrList {
    type Item = (String, AttrValue);
    type IntoIter = std::vec::IntoIter<(String, AttrValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, AttrValue)> for AttrList {
    fn from_iter<I: IntoIterator<Item = (String, AttrValue)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (k, v) in iter {
            out.set(k, v);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_rules() {
        assert_eq!(keymap(""), "_");
        assert_eq!(keymap("cls"), "class");
        assert_eq!(keymap("_cls"), "class");
        assert_eq!(keymap("_type"), "type");
        assert_eq!(keymap("data_id"), "data-id");
        assert_eq!(keymap("data-id"), "data-id");
        assert_eq!(keymap("xml:lang"), "xml:lang");
        assert_eq!(keymap("v.bind"), "v.bind");
        assert_eq!(keymap("hx_get"), "hx-get");
    }

    #[test]
    fn test_keymap_reverse_round_trip() {
        for key in ["class", "id", "data-id", "aria-label"] {
            assert_eq!(keymap(&keymap_reverse(key)), key);
        }
    }

    #[test]
    fn test_attrmap_last_wins_keeps_position() {
        let attrs = attrmap([("cls", "a"), ("id", "x"), ("class", "b")]);
        let keys: Vec<&str> = attrs.keys().collect();
        assert_eq!(keys, ["class", "id"]);
        assert_eq!(attrs.get("class"), Some(&AttrValue::Text("b".into())));
    }

    #[test]
    fn test_stringify_suppression() {
        assert_eq!(stringify_attr("x", &AttrValue::Absent), None);
        assert_eq!(stringify_attr("x", &AttrValue::Bool(false)), None);
        assert_eq!(stringify_attr("x", &AttrValue::Text(String::new())), None);
        assert_eq!(stringify_attr("x", &AttrValue::List(Vec::new())), None);
        assert_eq!(stringify_attr("x", &AttrValue::Map(Vec::new())), None);
    }

    #[test]
    fn test_stringify_bare_and_quoted() {
        assert_eq!(
            stringify_attr("required", &AttrValue::Bool(true)),
            Some("required".to_string())
        );
        assert_eq!(
            stringify_attr("id", &AttrValue::Text("main".into())),
            Some("id=\"main\"".to_string())
        );
    }

    #[test]
    fn test_stringify_escapes_quotes() {
        assert_eq!(
            stringify_attr("title", &AttrValue::Text("say \"hi\" & go".into())),
            Some("title=\"say &quot;hi&quot; &amp; go\"".to_string())
        );
    }

    #[test]
    fn test_stringify_map_and_list() {
        let style = AttrValue::Map(vec![
            ("color".into(), "red".into()),
            ("width".into(), "10px".into()),
        ]);
        assert_eq!(
            stringify_attr("style", &style),
            Some("style=\"color:red; width:10px\"".to_string())
        );
        let classes = AttrValue::List(vec!["btn".into(), "btn-large".into()]);
        assert_eq!(
            stringify_attr("class", &classes),
            Some("class=\"btn btn-large\"".to_string())
        );
    }

    #[test]
    fn test_safe_value_not_escaped() {
        assert_eq!(
            stringify_attr("onclick", &AttrValue::Safe("a < b".into())),
            Some("onclick=\"a < b\"".to_string())
        );
    }

    #[test]
    fn test_to_attrs_filters_suppressed() {
        let attrs = attrmap([
            ("id", AttrValue::Text("x".into())),
            ("hidden", AttrValue::Bool(true)),
            ("title", AttrValue::Absent),
        ]);
        assert_eq!(to_attrs(&attrs), "id=\"x\" hidden");
    }

    #[test]
    fn test_attr_list_set_semantics() {
        let a = attrmap([("id", "x"), ("cls", "c")]);
        let b = attrmap([("class", "c"), ("id", "x")]);
        assert_eq!(a, b);
        let c = attrmap([("id", "y"), ("class", "c")]);
        assert_ne!(a, c);
    }
}
