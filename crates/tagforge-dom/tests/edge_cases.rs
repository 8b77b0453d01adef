//! Edge case tests for tagforge-dom
//!
//! Boundary conditions for key mapping, attribute storage and tree
//! structure.

use tagforge_dom::{AttrList, AttrValue, Child, Element, attrs, tags};

// ============================================================================
// KEY MAPPING EDGE CASES
// ============================================================================

#[test]
fn test_keymap_empty_and_marker_keys() {
    assert_eq!(attrs::keymap(""), "_");
    assert_eq!(attrs::keymap("_type"), "type");
    assert_eq!(attrs::keymap("cls"), "class");
    assert_eq!(attrs::keymap("data_id"), "data-id");
}

#[test]
fn test_keymap_passes_special_characters_through() {
    assert_eq!(attrs::keymap("xml:lang"), "xml:lang");
    assert_eq!(attrs::keymap("aria-label"), "aria-label");
    assert_eq!(attrs::keymap("x.y"), "x.y");
    assert_eq!(attrs::keymap("@click"), "@click");
    assert_eq!(attrs::keymap("hx_swap_oob"), "hx-swap-oob");
}

#[test]
fn test_keymap_reverse_composes_to_identity() {
    for canonical in ["class", "data-x", "for", "href", "aria-hidden"] {
        assert_eq!(
            attrs::keymap(&attrs::keymap_reverse(canonical)),
            canonical,
            "round-trip broke for {canonical}"
        );
    }
}

// ============================================================================
// UNICODE AND SPECIAL CONTENT
// ============================================================================

#[test]
fn test_unicode_text_children() {
    let el = tags::span().child("héllo 世界 🚀");
    assert_eq!(el.children[0].as_text(), Some("héllo 世界 🚀"));
}

#[test]
fn test_unicode_attr_values_stringify() {
    assert_eq!(
        attrs::stringify_attr("title", &AttrValue::Text("fête 🎉".into())),
        Some("title=\"fête 🎉\"".to_string())
    );
}

#[test]
fn test_scalar_children_stringify() {
    assert_eq!(Child::from(true), Child::Text("true".into()));
    assert_eq!(Child::from(false), Child::Text("false".into()));
    assert_eq!(Child::from(-7_i64), Child::Text("-7".into()));
    assert_eq!(Child::from(2.5_f32), Child::Text("2.5".into()));
}

// ============================================================================
// STRUCTURE STRESS
// ============================================================================

#[test]
fn test_thousand_children() {
    let el = tags::ul().with_children((0..1000).map(|i| tags::li().child(i)));
    assert_eq!(el.children.len(), 1000);
    assert_eq!(
        el.children[999].as_element().and_then(|li| li.children[0].as_text()),
        Some("999")
    );
}

#[test]
fn test_deep_nesting_clone_equality() {
    let mut el = tags::span().child("leaf");
    for _ in 0..100 {
        el = tags::div().child(el);
    }
    let copy = el.clone();
    assert_eq!(el, copy);
}

#[test]
fn test_clone_divergence_breaks_equality() {
    let original = tags::div().child(tags::p().child("same"));
    let mut copy = original.clone();
    if let Some(Child::Element(p)) = copy.get_mut(0) {
        p.append(["more"]);
    }
    assert_ne!(original, copy);
}

// ============================================================================
// ATTRIBUTE LIST BOUNDARIES
// ============================================================================

#[test]
fn test_empty_attrlist_renders_nothing() {
    assert_eq!(attrs::to_attrs(&AttrList::new()), "");
}

#[test]
fn test_remove_then_reinsert_moves_to_end() {
    let mut list = AttrList::new();
    list.set("a".to_string(), AttrValue::Text("1".into()));
    list.set("b".to_string(), AttrValue::Text("2".into()));
    list.set("c".to_string(), AttrValue::Text("3".into()));
    list.remove("b");
    list.set("b".to_string(), AttrValue::Text("4".into()));
    let keys: Vec<&str> = list.keys().collect();
    assert_eq!(keys, ["a", "c", "b"]);
    assert_eq!(list.get("b"), Some(&AttrValue::Text("4".into())));
}

#[test]
fn test_overwrite_keeps_position() {
    let mut list = AttrList::new();
    list.set("class".to_string(), AttrValue::Text("x".into()));
    list.set("id".to_string(), AttrValue::Text("y".into()));
    list.set("class".to_string(), AttrValue::Text("z".into()));
    let keys: Vec<&str> = list.keys().collect();
    assert_eq!(keys, ["class", "id"]);
    assert_eq!(list.get("class"), Some(&AttrValue::Text("z".into())));
    assert_eq!(list.len(), 2);
}

// ============================================================================
// VOID ELEMENTS
// ============================================================================

#[test]
fn test_void_element_stores_children_anyway() {
    // The attach is warned but recorded; the serializer is what ignores it.
    let el = tags::br().child("invisible");
    assert!(el.void);
    assert_eq!(el.children.len(), 1);
}

#[test]
fn test_tag_case_folding() {
    let el = Element::new("DIV");
    assert_eq!(el.tag, "div");
    assert!(!el.void);
    let br = Element::new("BR");
    assert!(br.void);
}
