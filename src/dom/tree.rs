use crate::dom::element::ElementNode;
use crate::error::{ReaderError, Result};
use headless_chrome::Tab;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Snapshot of a page's document, with the focused element marked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomTree {
    /// Root element of the DOM tree (normally `<body>`)
    pub root: ElementNode,

    /// Language tag declared on `<html lang="...">`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Language reported by the browser (`navigator.language`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_lang: Option<String>,
}

impl DomTree {
    /// Create a new DomTree without language information
    pub fn new(root: ElementNode) -> Self {
        Self {
            root,
            lang: None,
            browser_lang: None,
        }
    }

    /// Builder method: set the page-declared language
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Builder method: set the browser language
    pub fn with_browser_lang(mut self, lang: impl Into<String>) -> Self {
        self.browser_lang = Some(lang.into());
        self
    }

    /// Parse a snapshot produced by the in-page snapshot script
    pub fn from_json(json: &str) -> Result<Self> {
        let mut tree: Self = serde_json::from_str(json)
            .map_err(|e| ReaderError::DomParseFailed(format!("Failed to parse DOM JSON: {}", e)))?;
        tree.simplify();
        Ok(tree)
    }

    /// Snapshot the DOM of a browser tab
    pub fn from_tab(tab: &Arc<Tab>) -> Result<Self> {
        let js_code = include_str!("snapshot_dom.js");

        let result = tab.evaluate(js_code, false).map_err(|e| {
            ReaderError::DomParseFailed(format!("Failed to execute DOM snapshot script: {}", e))
        })?;

        let json_value = result
            .value
            .ok_or_else(|| ReaderError::DomParseFailed("No value returned from DOM snapshot".to_string()))?;

        // The script returns a JSON string rather than an object
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| ReaderError::DomParseFailed(format!("Failed to get JSON string: {}", e)))?;

        Self::from_json(&json_str)
    }

    /// The element currently holding focus, if any
    pub fn focused(&self) -> Option<&ElementNode> {
        self.root.find_focused()
    }

    /// Find the `<label>` whose `for` attribute references `id`
    pub fn find_label_for(&self, id: &str) -> Option<&ElementNode> {
        Self::find_label_recursive(&self.root, id)
    }

    fn find_label_recursive<'a>(node: &'a ElementNode, id: &str) -> Option<&'a ElementNode> {
        if node.is_tag("label") && node.get_attribute("for").map(String::as_str) == Some(id) {
            return Some(node);
        }

        node.children
            .iter()
            .find_map(|child| Self::find_label_recursive(child, id))
    }

    /// Text of the label associated with an element, by id reference
    pub fn label_text_for(&self, element: &ElementNode) -> Option<String> {
        let id = element.id().filter(|id| !id.is_empty())?;
        let text = self.find_label_for(id)?.inner_text();
        if text.is_empty() { None } else { Some(text) }
    }

    /// Simplify the DOM tree by removing unnecessary elements
    pub fn simplify(&mut self) {
        self.root.simplify();
    }

    /// Convert the DOM tree to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReaderError::DomParseFailed(format!("Failed to serialize DOM to JSON: {}", e)))
    }

    /// Count total elements in the tree
    pub fn count_elements(&self) -> usize {
        Self::count_elements_recursive(&self.root)
    }

    fn count_elements_recursive(node: &ElementNode) -> usize {
        1 + node.children.iter().map(Self::count_elements_recursive).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tree() -> ElementNode {
        let mut root = ElementNode::new("body");

        let mut form = ElementNode::new("form");
        form.add_child(
            ElementNode::new("label")
                .with_attribute("for", "email")
                .with_text("Correo"),
        );
        form.add_child(
            ElementNode::new("input")
                .with_attribute("id", "email")
                .with_attribute("type", "email")
                .focused(),
        );

        let mut main = ElementNode::new("main");
        main.add_child(ElementNode::new("a").with_attribute("href", "/page").with_text("Inicio"));

        root.add_child(form);
        root.add_child(main);
        root
    }

    #[test]
    fn test_dom_tree_creation() {
        let tree = DomTree::new(create_test_tree()).with_lang("es-ES");

        assert_eq!(tree.root.tag_name, "body");
        assert_eq!(tree.root.children.len(), 2);
        assert_eq!(tree.lang.as_deref(), Some("es-ES"));
    }

    #[test]
    fn test_focused() {
        let tree = DomTree::new(create_test_tree());
        let focused = tree.focused().unwrap();
        assert!(focused.is_tag("input"));
        assert_eq!(focused.id(), Some(&"email".to_string()));
    }

    #[test]
    fn test_label_lookup() {
        let tree = DomTree::new(create_test_tree());
        let input = tree.focused().unwrap();

        assert!(tree.find_label_for("email").is_some());
        assert!(tree.find_label_for("missing").is_none());
        assert_eq!(tree.label_text_for(input), Some("Correo".to_string()));
    }

    #[test]
    fn test_label_lookup_without_id() {
        let tree = DomTree::new(create_test_tree());
        let orphan = ElementNode::new("input");
        assert_eq!(tree.label_text_for(&orphan), None);
    }

    #[test]
    fn test_count_elements() {
        let tree = DomTree::new(create_test_tree());
        // body, form, label, input, main, a
        assert_eq!(tree.count_elements(), 6);
    }

    #[test]
    fn test_simplify() {
        let mut root = ElementNode::new("body");
        root.add_child(ElementNode::new("p").with_text("Content"));
        root.add_child(ElementNode::new("script").with_text("alert('test')"));
        root.add_child(ElementNode::new("style").with_text(".test {}"));

        let mut tree = DomTree::new(root);
        tree.simplify();

        assert_eq!(tree.root.children.len(), 1);
        assert!(tree.root.children[0].is_tag("p"));
    }

    #[test]
    fn test_from_json_snapshot() {
        let json = r#"{
            "root": {
                "tag_name": "body",
                "attributes": {},
                "children": [
                    {"tag_name": "button", "attributes": {"id": "go"}, "text_content": "Enviar",
                     "tab_index": 0, "has_click_handler": false, "is_focused": true}
                ],
                "tab_index": -1
            },
            "lang": "es-MX",
            "browser_lang": null
        }"#;

        let tree = DomTree::from_json(json).unwrap();
        assert_eq!(tree.lang.as_deref(), Some("es-MX"));
        assert_eq!(tree.browser_lang, None);
        assert_eq!(tree.focused().unwrap().inner_text(), "Enviar");
    }

    #[test]
    fn test_from_json_drops_scripts() {
        let json = r#"{
            "root": {
                "tag_name": "body",
                "attributes": {},
                "children": [
                    {"tag_name": "script", "attributes": {}, "text_content": "track()"},
                    {"tag_name": "a", "attributes": {"href": "/inicio"}, "text_content": "Inicio"}
                ]
            }
        }"#;

        let tree = DomTree::from_json(json).unwrap();
        assert_eq!(tree.count_elements(), 2);
        assert!(tree.root.children[0].is_tag("a"));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = DomTree::from_json("not json").unwrap_err();
        assert!(matches!(err, ReaderError::DomParseFailed(_)));
    }

    #[test]
    fn test_to_json() {
        let root = ElementNode::new("div")
            .with_attribute("id", "container")
            .with_children(vec![ElementNode::new("span").with_text("Hello")]);

        let tree = DomTree::new(root);
        let json = tree.to_json().unwrap();

        assert!(json.contains("\"tag_name\": \"div\""));
        assert!(json.contains("\"id\": \"container\""));
        assert!(json.contains("Hello"));
    }
}
