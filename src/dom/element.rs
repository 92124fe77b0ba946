use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of a DOM element as seen when it received focus
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ElementNode {
    /// HTML tag name (e.g., "div", "button", "input")
    pub tag_name: String,

    /// Element attributes (e.g., id, aria-label, type, role)
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Text nodes directly owned by this element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// Child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,

    /// Resolved `tabIndex` property, when the snapshot captured it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_index: Option<i32>,

    /// Whether a click handler property is attached
    #[serde(default)]
    pub has_click_handler: bool,

    /// Whether this element is the document's active element
    #[serde(default)]
    pub is_focused: bool,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }

    /// Builder method: set attributes
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method: add a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<ElementNode>) -> Self {
        self.children = children;
        self
    }

    /// Builder method: set the resolved tab index
    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    /// Builder method: mark the element as having a click handler
    pub fn with_click_handler(mut self, has_handler: bool) -> Self {
        self.has_click_handler = has_handler;
        self
    }

    /// Builder method: mark the element as focused
    pub fn focused(mut self) -> Self {
        self.is_focused = true;
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a child element
    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(child);
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Get an attribute only when it holds something other than whitespace
    pub fn non_empty_attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Get element ID
    pub fn id(&self) -> Option<&String> {
        self.attributes.get("id")
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Heading level for `h1`..`h6`
    pub fn heading_level(&self) -> Option<u8> {
        let tag = self.tag_name.as_bytes();
        if tag.len() == 2 && tag[0].eq_ignore_ascii_case(&b'h') && (b'1'..=b'6').contains(&tag[1]) {
            Some(tag[1] - b'0')
        } else {
            None
        }
    }

    /// Rendered text of the element and its descendants with whitespace collapsed
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text_content {
            for word in text.split_whitespace() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(word);
            }
        }

        for child in &self.children {
            if !matches!(child.tag_name.as_str(), "script" | "style" | "noscript") {
                child.collect_text(out);
            }
        }
    }

    /// Tab index from the snapshot, falling back to the `tabindex` attribute
    pub fn effective_tab_index(&self) -> Option<i32> {
        self.tab_index.or_else(|| {
            self.get_attribute("tabindex")
                .and_then(|v| v.trim().parse().ok())
        })
    }

    /// Whether the element takes part in keyboard focus or reacts to clicks
    pub fn is_interactive(&self) -> bool {
        let focusable = self.effective_tab_index().is_some_and(|i| i >= 0);
        focusable || self.has_click_handler || self.attributes.contains_key("onclick")
    }

    /// Visible text of the option a `<select>` currently shows.
    ///
    /// A single-choice select shows the last option marked `selected`, as
    /// browsers do when the markup marks more than one.
    pub fn selected_option_text(&self) -> Option<String> {
        let mut options = Vec::new();
        self.collect_options(&mut options);

        let is_selected = |o: &&&ElementNode| o.attributes.contains_key("selected");
        let chosen = if self.attributes.contains_key("multiple") {
            options.iter().find(is_selected)?
        } else {
            options
                .iter()
                .rev()
                .find(is_selected)
                .or_else(|| options.first())?
        };

        let text = chosen.inner_text();
        if text.is_empty() { None } else { Some(text) }
    }

    fn collect_options<'a>(&'a self, out: &mut Vec<&'a ElementNode>) {
        for child in &self.children {
            if child.is_tag("option") {
                out.push(child);
            } else {
                child.collect_options(out);
            }
        }
    }

    /// Find the focused element in this subtree
    pub fn find_focused(&self) -> Option<&ElementNode> {
        if self.is_focused {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_focused())
    }

    /// Simplify element by removing unnecessary children (like scripts, styles)
    pub fn simplify(&mut self) {
        self.children.retain(|child| {
            !matches!(child.tag_name.as_str(), "script" | "style" | "noscript")
        });

        for child in &mut self.children {
            child.simplify();
        }
    }

    /// Convert to a simplified string representation
    pub fn to_simple_string(&self) -> String {
        let mut parts = vec![format!("<{}", self.tag_name)];

        if let Some(id) = self.id() {
            parts.push(format!(" id=\"{}\"", id));
        }

        if let Some(role) = self.get_attribute("role") {
            parts.push(format!(" role=\"{}\"", role));
        }

        if let Some(tab_index) = self.effective_tab_index() {
            parts.push(format!(" tabindex=\"{}\"", tab_index));
        }

        parts.push(">".to_string());

        let text = self.inner_text();
        if !text.is_empty() {
            parts.push(text);
        }

        parts.join("")
    }
}
