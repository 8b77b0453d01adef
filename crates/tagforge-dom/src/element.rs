//! Element tree node
//!
//! Elements are plain owned values: clone one to reuse it under several
//! parents. There are no parent back-pointers, so traversals never depend on
//! exclusive ownership.

use std::ops::{Index, Range};

use crate::attrs::{self, AttrList, attrmap};
use crate::node::{AttrValue, Child, flatten};
use crate::{ValidateMode, tags};

/// Attribute keys preserved by [`Element::replace`].
pub const DEFAULT_KEEP_ATTRS: &[&str] = &["id", "name"];

/// A markup element
#[derive(Debug, Clone)]
pub struct Element {
    /// Canonical lowercase tag name
    pub tag: String,
    /// Ordered children, flattened at insertion
    pub children: Vec<Child>,
    /// Canonical attributes, insertion order preserved
    pub attrs: AttrList,
    /// Serializes self-closing, children ignored
    pub void: bool,
    /// Per-node validation mode; `None` uses the global mode
    pub validate_mode: Option<ValidateMode>,
}

impl Element {
    /// Create an element; `void` is derived from the tag table.
    pub fn new(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        let void = tags::is_void(&tag);
        Self {
            tag,
            children: Vec::new(),
            attrs: AttrList::new(),
            void,
            validate_mode: None,
        }
    }

    /// Create an element with an explicit void flag.
    ///
    /// A flag that disagrees with the tag table is a caller choice, not a
    /// fault: it is honored but logged as a correctness warning.
    pub fn with_void(tag: &str, void: bool) -> Self {
        let mut el = Self::new(tag);
        if void != el.void {
            tracing::warn!(
                "Tag '{}' is {}, but void={} was specified. This may produce invalid HTML.",
                el.tag,
                if el.void { "void" } else { "not void" },
                void
            );
        }
        el.void = void;
        el
    }

    /// Append one child, flattening fragments.
    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.push_children([child.into()]);
        self
    }

    /// Append children from an iterator, flattening fragments.
    pub fn with_children<C>(mut self, children: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<Child>,
    {
        self.push_children(children.into_iter().map(Into::into));
        self
    }

    /// Set one attribute; the key is canonicalized via the attribute mapper.
    pub fn attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Set the per-node validation mode override.
    pub fn with_validate_mode(mut self, mode: ValidateMode) -> Self {
        self.validate_mode = Some(mode);
        self
    }

    /// Append children and merge attributes, last write wins per key.
    ///
    /// Mutates and returns the same node for chained decoration.
    pub fn apply<C, K, V, A>(&mut self, children: C, attrs: A) -> &mut Self
    where
        C: IntoIterator,
        C::Item: Into<Child>,
        K: AsRef<str>,
        V: Into<AttrValue>,
        A: IntoIterator<Item = (K, V)>,
    {
        self.append(children).merge_attrs(attrs)
    }

    /// Append children, flattening fragments.
    pub fn append<C>(&mut self, children: C) -> &mut Self
    where
        C: IntoIterator,
        C::Item: Into<Child>,
    {
        self.push_children(children.into_iter().map(Into::into));
        self
    }

    /// Merge attributes into the existing set, last write wins per key.
    pub fn merge_attrs<K, V, A>(&mut self, attrs: A) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<AttrValue>,
        A: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in attrmap(attrs) {
            self.attrs.set(key, value);
        }
        self
    }

    /// Replace children and attributes wholesale, preserving
    /// [`DEFAULT_KEEP_ATTRS`] from the prior attribute set.
    pub fn replace<C, K, V, A>(&mut self, children: C, attrs: A) -> &mut Self
    where
        C: IntoIterator,
        C::Item: Into<Child>,
        K: AsRef<str>,
        V: Into<AttrValue>,
        A: IntoIterator<Item = (K, V)>,
    {
        self.replace_keeping(children, DEFAULT_KEEP_ATTRS, attrs)
    }

    /// [`Element::replace`] with an explicit keep set.
    pub fn replace_keeping<C, K, V, A>(&mut self, children: C, keep: &[&str], attrs: A) -> &mut Self
    where
        C: IntoIterator,
        C::Item: Into<Child>,
        K: AsRef<str>,
        V: Into<AttrValue>,
        A: IntoIterator<Item = (K, V)>,
    {
        self.children = flatten(children.into_iter().map(Into::into));
        let mut preserved = AttrList::new();
        for key in keep {
            if let Some(value) = self.attrs.get(key) {
                preserved.set((*key).to_string(), value.clone());
            }
        }
        for (key, value) in attrmap(attrs) {
            preserved.set(key, value);
        }
        self.attrs = preserved;
        self
    }

    /// Attribute lookup through the key mapper, so `get_attr("cls")` finds
    /// `class`.
    pub fn get_attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(&attrs::keymap(key))
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.attrs.set(attrs::keymap(key), value.into());
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<AttrValue> {
        self.attrs.remove(&attrs::keymap(key))
    }

    pub fn get(&self, idx: usize) -> Option<&Child> {
        self.children.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Child> {
        self.children.get_mut(idx)
    }

    /// Replace the child at `idx`, splicing in a flattened value.
    pub fn set_child(&mut self, idx: usize, child: impl Into<Child>) {
        self.splice(idx..idx + 1, child);
    }

    /// Replace a child range with a flattened value.
    pub fn splice(&mut self, range: Range<usize>, child: impl Into<Child>) {
        let items = flatten([child.into()]);
        self.children.splice(range, items);
    }

    fn push_children<I>(&mut self, children: I)
    where
        I: IntoIterator<Item = Child>,
    {
        let items = flatten(children);
        if self.void && !items.is_empty() {
            tracing::warn!(
                "Attaching children to void element '{}'; they will not be rendered",
                self.tag
            );
        }
        self.children.extend(items);
    }
}

/// Structural equality: tag, void flag, ordered children and the attribute
/// set. The `validate_mode` annotation is not content and is ignored.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.void == other.void
            && self.children == other.children
            && self.attrs == other.attrs
    }
}

impl Index<usize> for Element {
    type Output = Child;

    fn index(&self, idx: usize) -> &Child {
        &self.children[idx]
    }
}

impl<'a> IntoIterator for &'a Element {
    type Item = &'a Child;
    type IntoIter = std::slice::Iter<'a, Child>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_lowercases_and_derives_void() {
        let el = Element::new("DIV");
        assert_eq!(el.tag, "div");
        assert!(!el.void);
        assert!(Element::new("br").void);
        assert!(Element::new("IMG").void);
    }

    #[test]
    fn test_with_void_honors_explicit_flag() {
        let el = Element::with_void("div", true);
        assert!(el.void);
        let el = Element::with_void("br", false);
        assert!(!el.void);
    }

    #[test]
    fn test_builder_chain() {
        let el = Element::new("div")
            .attr("cls", "hero")
            .child("Hello")
            .child(Element::new("span").child("!"));
        assert_eq!(el.attrs.get("class"), Some(&AttrValue::Text("hero".into())));
        assert_eq!(el.children.len(), 2);
        assert_eq!(el.children[0], Child::Text("Hello".into()));
    }

    #[test]
    fn test_child_flattens_fragments() {
        let el = Element::new("ul").child(Child::Fragment(vec![
            Child::Element(Element::new("li").child("a")),
            Child::Element(Element::new("li").child("b")),
        ]));
        assert_eq!(el.children.len(), 2);
        assert!(el.children.iter().all(Child::is_element));
    }

    #[test]
    fn test_apply_appends_and_merges() {
        let mut el = Element::new("div").attr("id", "x").child("one");
        el.apply([Child::from("two")], [("cls", "c"), ("id", "y")]);
        assert_eq!(el.children.len(), 2);
        assert_eq!(el.attrs.get("id"), Some(&AttrValue::Text("y".into())));
        assert_eq!(el.attrs.get("class"), Some(&AttrValue::Text("c".into())));
    }

    #[test]
    fn test_replace_preserves_id_and_name() {
        let mut el = Element::new("input")
            .attr("id", "field")
            .attr("name", "q")
            .attr("placeholder", "old");
        el.replace(Vec::<Child>::new(), [("type", "text")]);
        assert_eq!(el.attrs.get("id"), Some(&AttrValue::Text("field".into())));
        assert_eq!(el.attrs.get("name"), Some(&AttrValue::Text("q".into())));
        assert_eq!(el.attrs.get("placeholder"), None);
        assert_eq!(el.attrs.get("type"), Some(&AttrValue::Text("text".into())));
    }

    #[test]
    fn test_replace_keeping_custom_set() {
        let mut el = Element::new("div").attr("id", "x").attr("title", "t");
        el.replace_keeping([Child::from("new")], &["title"], [("cls", "c")]);
        assert_eq!(el.attrs.get("id"), None);
        assert_eq!(el.attrs.get("title"), Some(&AttrValue::Text("t".into())));
        assert_eq!(el.children, vec![Child::Text("new".into())]);
    }

    #[test]
    fn test_set_child_splices_flattened() {
        let mut el = Element::new("div")
            .child("a")
            .child("b")
            .child("c");
        el.set_child(
            1,
            Child::Fragment(vec![Child::from("x"), Child::from("y")]),
        );
        let texts: Vec<&str> = el.children.iter().filter_map(Child::as_text).collect();
        assert_eq!(texts, ["a", "x", "y", "c"]);
    }

    #[test]
    fn test_index_and_iter() {
        let el = Element::new("p").child("only");
        assert_eq!(el[0], Child::Text("only".into()));
        assert_eq!((&el).into_iter().count(), 1);
    }

    #[test]
    fn test_attr_access_through_keymap() {
        let mut el = Element::new("div");
        el.set_attr("cls", "a");
        assert_eq!(el.get_attr("class"), el.get_attr("cls"));
        assert!(el.remove_attr("cls").is_some());
        assert_eq!(el.get_attr("class"), None);
    }

    #[test]
    fn test_equality_ignores_attr_order_and_mode() {
        let a = Element::new("div").attr("id", "x").attr("cls", "c");
        let b = Element::new("div")
            .attr("cls", "c")
            .attr("id", "x")
            .with_validate_mode(ValidateMode::Static);
        assert_eq!(a, b);
        let c = Element::new("div").attr("id", "y").attr("cls", "c");
        assert_ne!(a, c);
    }

    #[test]
    fn test_shared_subtree_via_clone() {
        let badge = Element::new("span").attr("cls", "badge").child("new");
        let left = Element::new("div").child(badge.clone());
        let right = Element::new("div").child(badge);
        assert_eq!(left, right);
    }
}
