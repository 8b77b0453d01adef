//! Static attribute allowlists
//!
//! Per-tag attribute sets from MDN/WHATWG, plus the global attributes legal
//! on every element. `data-*` keys are accepted by prefix and never listed.

/// Attributes allowed on all elements.
pub const GLOBAL_ATTRS: &[&str] = &[
    "accesskey",
    "class",
    "contenteditable",
    "dir",
    "draggable",
    "hidden",
    "id",
    "lang",
    "spellcheck",
    "style",
    "tabindex",
    "title",
    "translate",
];

/// Tags flagged when found in parsed markup. `link` covers `rel="import"`.
pub const UNSAFE_TAGS: &[&str] = &["script", "iframe", "object", "embed", "link"];

/// Per-tag attribute allowlist. Tags absent here accept only global and
/// `data-*` attributes under static validation.
pub const VALID_ATTRS: &[(&str, &[&str])] = &[
    (
        "a",
        &["download", "href", "hreflang", "ping", "referrerpolicy", "rel", "target", "type"],
    ),
    (
        "area",
        &["alt", "coords", "download", "href", "ping", "referrerpolicy", "rel", "shape", "target"],
    ),
    (
        "audio",
        &["autoplay", "controls", "crossorigin", "loop", "muted", "preload", "src"],
    ),
    ("base", &["href", "target"]),
    ("blockquote", &["cite"]),
    (
        "button",
        &[
            "autofocus",
            "disabled",
            "form",
            "formaction",
            "formenctype",
            "formmethod",
            "formnovalidate",
            "formtarget",
            "name",
            "type",
            "value",
        ],
    ),
    ("canvas", &["height", "width"]),
    ("col", &["span"]),
    ("colgroup", &["span"]),
    ("data", &["value"]),
    ("del", &["cite", "datetime"]),
    ("details", &["open"]),
    ("dialog", &["open"]),
    ("div", &[]),
    ("embed", &["height", "src", "type", "width"]),
    ("fieldset", &["disabled", "form", "name"]),
    (
        "form",
        &[
            "accept-charset",
            "action",
            "autocomplete",
            "enctype",
            "method",
            "name",
            "novalidate",
            "rel",
            "target",
        ],
    ),
    (
        "iframe",
        &[
            "allow",
            "allowfullscreen",
            "height",
            "loading",
            "name",
            "referrerpolicy",
            "sandbox",
            "src",
            "srcdoc",
            "width",
        ],
    ),
    (
        "img",
        &[
            "alt",
            "crossorigin",
            "decoding",
            "height",
            "ismap",
            "loading",
            "referrerpolicy",
            "sizes",
            "src",
            "srcset",
            "usemap",
            "width",
        ],
    ),
    (
        "input",
        &[
            "accept",
            "alt",
            "autocomplete",
            "autofocus",
            "capture",
            "checked",
            "dirname",
            "disabled",
            "form",
            "formaction",
            "formenctype",
            "formmethod",
            "formnovalidate",
            "formtarget",
            "height",
            "list",
            "max",
            "maxlength",
            "min",
            "minlength",
            "multiple",
            "name",
            "pattern",
            "placeholder",
            "readonly",
            "required",
            "size",
            "src",
            "step",
            "type",
            "value",
            "width",
        ],
    ),
    ("ins", &["cite", "datetime"]),
    ("label", &["for", "form"]),
    ("li", &["value"]),
    (
        "link",
        &[
            "as",
            "crossorigin",
            "href",
            "hreflang",
            "imagesizes",
            "imagesrcset",
            "integrity",
            "media",
            "prefetch",
            "referrerpolicy",
            "rel",
            "sizes",
            "title",
            "type",
        ],
    ),
    ("meta", &["charset", "content", "http-equiv", "name"]),
    ("meter", &["form", "high", "low", "max", "min", "optimum", "value"]),
    (
        "object",
        &["data", "form", "height", "name", "type", "usemap", "width"],
    ),
    ("ol", &["reversed", "start", "type"]),
    ("optgroup", &["disabled", "label"]),
    ("option", &["disabled", "label", "selected", "value"]),
    ("output", &["for", "form", "name"]),
    ("progress", &["max", "value"]),
    ("q", &["cite"]),
    (
        "script",
        &[
            "async",
            "charset",
            "crossorigin",
            "defer",
            "integrity",
            "nomodule",
            "nonce",
            "referrerpolicy",
            "src",
            "type",
        ],
    ),
    (
        "select",
        &["autocomplete", "autofocus", "disabled", "form", "multiple", "name", "required", "size"],
    ),
    (
        "source",
        &["height", "media", "sizes", "src", "srcset", "type", "width"],
    ),
    ("td", &["colspan", "headers", "rowspan"]),
    (
        "textarea",
        &[
            "autocomplete",
            "autofocus",
            "cols",
            "dirname",
            "disabled",
            "form",
            "maxlength",
            "minlength",
            "name",
            "placeholder",
            "readonly",
            "required",
            "rows",
            "wrap",
        ],
    ),
    ("th", &["abbr", "colspan", "headers", "rowspan", "scope"]),
    ("time", &["datetime"]),
    ("track", &["default", "kind", "label", "src", "srclang"]),
    (
        "video",
        &[
            "autoplay",
            "controls",
            "crossorigin",
            "height",
            "loop",
            "muted",
            "playsinline",
            "poster",
            "preload",
            "src",
            "width",
        ],
    ),
];

/// Tag-specific allowlist, if the tag has one.
pub fn tag_attrs(tag: &str) -> Option<&'static [&'static str]> {
    VALID_ATTRS.iter().find(|(t, _)| *t == tag).map(|(_, a)| *a)
}

/// Whether `attr` is legal on every element.
#[inline]
pub fn is_global(attr: &str) -> bool {
    GLOBAL_ATTRS.contains(&attr)
}

/// Whether `tag` is in the unsafe set.
#[inline]
pub fn is_unsafe(tag: &str) -> bool {
    UNSAFE_TAGS.contains(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_sorted() {
        assert!(GLOBAL_ATTRS.windows(2).all(|w| w[0] < w[1]));
        assert!(VALID_ATTRS.windows(2).all(|w| w[0].0 < w[1].0));
        for (_, attrs) in VALID_ATTRS {
            assert!(attrs.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_tag_attrs_lookup() {
        assert!(tag_attrs("img").is_some_and(|a| a.contains(&"src")));
        assert!(tag_attrs("a").is_some_and(|a| a.contains(&"href")));
        assert_eq!(tag_attrs("div"), Some(&[] as &[&str]));
        assert_eq!(tag_attrs("span"), None);
    }

    #[test]
    fn test_globals_and_unsafe() {
        assert!(is_global("class"));
        assert!(is_global("id"));
        assert!(!is_global("href"));
        assert!(is_unsafe("script"));
        assert!(is_unsafe("iframe"));
        assert!(!is_unsafe("div"));
    }
}
