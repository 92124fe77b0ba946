//! Text extraction for focused elements
//!
//! [`TextExtractor::extract`] turns whatever element received focus into the
//! sentence a screen reader would say for it. Rules are tried in priority
//! order and the first match wins:
//!
//! 1. `aria-label`
//! 2. `title`
//! 3. `<input>` / `<textarea>`: label, placeholder, name or a generic phrase, plus the field type
//! 4. `<select>`: label or name, "selection menu", and the current option
//! 5. `<button>`
//! 6. `<a>`, with a "link" suffix unless the text already says so
//! 7. `<img>` alt text
//! 8. elements with a `role`
//! 9. headings, with their level
//! 10. list items
//! 11. other focusable or clickable elements
//! 12. the element's own text
//!
//! An empty result falls back to a noun for the tag, then to a fixed phrase,
//! and the final sentence is capped at [`MAX_DESCRIPTION_CHARS`].

pub mod vocabulary;

pub use vocabulary::Vocabulary;

use crate::dom::{DomTree, ElementNode};

/// Longest description handed to speech, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 200;

const ELLIPSIS: &str = "...";

/// Cut `text` to `max_chars` characters, appending an ellipsis when anything was removed
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Cut `text` to at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Describes focused elements in words
#[derive(Debug, Clone)]
pub struct TextExtractor {
    vocabulary: Vocabulary,
    max_chars: usize,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor {
    /// Create an extractor with the Spanish vocabulary
    pub fn new() -> Self {
        Self::with_vocabulary(Vocabulary::default())
    }

    pub fn with_vocabulary(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            max_chars: MAX_DESCRIPTION_CHARS,
        }
    }

    /// Builder method: change the description length cap
    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Full description of `element`: classification, fallbacks and truncation.
    /// Never empty.
    pub fn extract(&self, element: &ElementNode, document: &DomTree) -> String {
        let mut text = self.classify(element, document);

        if text.is_empty() {
            let tag = element.tag_name.to_ascii_lowercase();
            text = self
                .vocabulary
                .tag(&tag)
                .map(str::to_string)
                .unwrap_or(tag);
        }

        if text.is_empty() {
            text = self.vocabulary.focused_element.clone();
        }

        truncate_with_ellipsis(&text, self.max_chars)
    }

    /// Apply the priority rules only. May return an empty string.
    pub fn classify(&self, element: &ElementNode, document: &DomTree) -> String {
        let vocab = &self.vocabulary;

        let text = if let Some(label) = element.non_empty_attribute("aria-label") {
            label.to_string()
        } else if let Some(title) = element.non_empty_attribute("title") {
            title.to_string()
        } else if element.is_tag("input") || element.is_tag("textarea") {
            self.describe_input(element, document)
        } else if element.is_tag("select") {
            self.describe_select(element, document)
        } else if element.is_tag("button") {
            non_empty_or(element.inner_text(), &vocab.button)
        } else if element.is_tag("a") {
            let text = non_empty_or(element.inner_text(), &vocab.link);
            append_unless_mentioned(text, &vocab.link_suffix)
        } else if element.is_tag("img") {
            match element.non_empty_attribute("alt") {
                Some(alt) => alt.to_string(),
                None => vocab.image_without_description.clone(),
            }
        } else if let Some(role) = element.non_empty_attribute("role") {
            let role_name = vocab.role(role.trim());
            let text = non_empty_or(element.inner_text(), role_name);
            append_unless_mentioned(text, role_name)
        } else if let Some(level) = element.heading_level() {
            prefixed(&format!("{} {}", vocab.heading_level, level), element.inner_text())
        } else if element.is_tag("li") {
            prefixed(&vocab.list_item, element.inner_text())
        } else if element.is_interactive() {
            prefixed(&vocab.interactive_element, element.inner_text())
        } else {
            element.inner_text()
        };

        text.trim().to_string()
    }

    fn describe_input(&self, element: &ElementNode, document: &DomTree) -> String {
        let vocab = &self.vocabulary;

        let name = document
            .label_text_for(element)
            .or_else(|| element.non_empty_attribute("placeholder").map(str::to_string))
            .or_else(|| element.non_empty_attribute("name").map(str::to_string))
            .unwrap_or_else(|| vocab.input_field.clone());

        let input_type = if element.is_tag("textarea") {
            "textarea".to_string()
        } else {
            element
                .non_empty_attribute("type")
                .map(|t| t.trim().to_ascii_lowercase())
                .unwrap_or_else(|| "text".to_string())
        };

        format!("{}, {} {}", name, vocab.field_of, vocab.input_type(&input_type))
    }

    fn describe_select(&self, element: &ElementNode, document: &DomTree) -> String {
        let vocab = &self.vocabulary;

        let name = document
            .label_text_for(element)
            .or_else(|| element.non_empty_attribute("name").map(str::to_string))
            .unwrap_or_else(|| vocab.selector.clone());

        let mut text = format!("{}, {}", name, vocab.selection_menu);
        if let Some(option) = element.selected_option_text() {
            text.push_str(", ");
            text.push_str(&option);
        }
        text
    }
}

fn non_empty_or(text: String, fallback: &str) -> String {
    if text.is_empty() { fallback.to_string() } else { text }
}

/// Append ", {noun}" unless the text already contains the noun (case-insensitive)
fn append_unless_mentioned(text: String, noun: &str) -> String {
    if text.to_lowercase().contains(&noun.to_lowercase()) {
        text
    } else {
        format!("{}, {}", text, noun)
    }
}

/// "{prefix}, {text}", or nothing when there is no text to announce
fn prefixed(prefix: &str, text: String) -> String {
    if text.is_empty() {
        text
    } else {
        format!("{}, {}", prefix, text)
    }
}
