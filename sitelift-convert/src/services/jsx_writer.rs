//! JSX serialization of parsed HTML
//!
//! Walks a `scraper` document tree and writes JSX directly from the nodes instead
//! of patching markup text, so output is deterministic and a rule can never fire
//! twice on the same attribute.
//!
//! Rules:
//! - `class` → `className`, `for` → `htmlFor`
//! - hyphenated attribute names are camel-cased (`data-foo` → `dataFoo`)
//! - attribute values are copied as-is (escaped for a JSX string)
//! - comments, doctypes and processing instructions are dropped
//! - boolean attributes with an empty value are written bare (`disabled`)
//! - void elements are written self-closing (`<br />`)
//! - text is escaped so braces and angle brackets stay literal
//! - text inside `<pre>` becomes a string expression, and `<textarea>` content
//!   becomes `defaultValue`, so whitespace survives JSX collapsing and
//!   indentation of the surrounding markup

use scraper::{ElementRef, Node};
use std::borrow::Cow;

/// HTML elements that never have children
pub const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// HTML attributes whose presence alone means true
pub const BOOLEAN_ATTRIBUTES: [&str; 23] = [
    "allowfullscreen", "async", "autofocus", "autoplay", "checked", "controls", "default",
    "defer", "disabled", "formnovalidate", "hidden", "ismap", "loop", "multiple", "muted",
    "nomodule", "novalidate", "open", "playsinline", "readonly", "required", "reversed",
    "selected",
];

pub fn is_boolean_attribute(name: &str) -> bool {
    BOOLEAN_ATTRIBUTES.contains(&name)
}

/// JS string literal for a JSX expression container
fn string_expression(text: &str) -> String {
    let literal = serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string());
    format!("{{{}}}", literal)
}

/// JSX name for an HTML attribute
///
/// Idempotent: feeding the result back in returns it unchanged.
pub fn jsx_attribute_name(name: &str) -> Cow<'_, str> {
    match name {
        "class" => Cow::Borrowed("className"),
        "for" => Cow::Borrowed("htmlFor"),
        n if n.contains('-') => Cow::Owned(to_camel_case(n)),
        n => Cow::Borrowed(n),
    }
}

/// `data-foo-bar` → `dataFooBar`; a hyphen not followed by a lowercase letter stays
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '-' {
            if let Some(next) = chars.peek().copied().filter(|c| c.is_ascii_lowercase()) {
                out.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// Escape a text node for use as JSX children
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '{' => out.push_str("{'{'}"),
            '}' => out.push_str("{'}'}"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape an attribute value for a double-quoted JSX string
pub fn escape_attribute_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Render the children of `parent` as JSX, leaving out any element in `skip`
/// together with its subtree
pub fn render_children<'a>(parent: ElementRef<'a>, skip: &[ElementRef<'a>]) -> String {
    let mut writer = JsxWriter {
        skip,
        out: String::new(),
        preformatted: 0,
    };
    writer.write_children(parent);
    writer.out.trim().to_string()
}

struct JsxWriter<'s, 'a> {
    skip: &'s [ElementRef<'a>],
    out: String,
    /// Depth of enclosing `<pre>` elements
    preformatted: usize,
}

impl<'s, 'a> JsxWriter<'s, 'a> {
    fn write_children(&mut self, parent: ElementRef<'a>) {
        for child in parent.children() {
            match child.value() {
                Node::Text(text) if self.preformatted > 0 => {
                    if !text.text.is_empty() {
                        self.out.push_str(&string_expression(&text.text));
                    }
                }
                Node::Text(text) => self.out.push_str(&escape_text(&text.text)),
                Node::Element(_) => {
                    if let Some(element) = ElementRef::wrap(child) {
                        if !self.is_skipped(element) {
                            self.write_element(element);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn is_skipped(&self, element: ElementRef<'a>) -> bool {
        self.skip.iter().any(|s| s.id() == element.id())
    }

    fn write_element(&mut self, element: ElementRef<'a>) {
        let name = element.value().name();

        self.out.push('<');
        self.out.push_str(name);
        for (attr, value) in element.value().attrs() {
            self.out.push(' ');
            self.out.push_str(&jsx_attribute_name(attr));
            if value.is_empty() && is_boolean_attribute(attr) {
                continue;
            }
            self.out.push_str("=\"");
            self.out.push_str(&escape_attribute_value(value));
            self.out.push('"');
        }

        if name == "textarea" {
            let content: String = element.text().collect();
            if !content.is_empty() {
                self.out.push_str(" defaultValue=");
                self.out.push_str(&string_expression(&content));
            }
            self.out.push_str(" />");
            return;
        }

        if is_void_element(name) {
            self.out.push_str(" />");
            return;
        }

        self.out.push('>');
        if name == "pre" {
            self.preformatted += 1;
            self.write_children(element);
            self.preformatted -= 1;
        } else {
            self.write_children(element);
        }
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }
}
