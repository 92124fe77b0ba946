use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Words and phrases the text extractor speaks
///
/// The default is Spanish. Other locales can be supplied as JSON with the same
/// field names; missing fields fall back to the Spanish defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Vocabulary {
    /// Name for an input with no label, placeholder or name
    pub input_field: String,
    /// Joins an input description to its type noun: "{text}, {field_of} {type}"
    pub field_of: String,
    /// Input `type` → spoken noun; unknown types are spoken verbatim
    pub input_types: IndexMap<String, String>,
    /// Name for a select with no label or name
    pub selector: String,
    pub selection_menu: String,
    pub button: String,
    /// Name for an empty link
    pub link: String,
    /// Suffix appended to links
    pub link_suffix: String,
    pub image_without_description: String,
    /// ARIA role → spoken noun; unknown roles are spoken verbatim
    pub roles: IndexMap<String, String>,
    pub heading_level: String,
    pub list_item: String,
    pub interactive_element: String,
    /// Tag name → noun, used when nothing else describes the element
    pub tags: IndexMap<String, String>,
    pub focused_element: String,
}

fn table(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Vocabulary {
    /// Spanish vocabulary
    pub fn spanish() -> Self {
        Self {
            input_field: "Campo de entrada".to_string(),
            field_of: "campo de".to_string(),
            input_types: table(&[
                ("text", "texto"),
                ("email", "correo electrónico"),
                ("password", "contraseña"),
                ("tel", "teléfono"),
                ("number", "número"),
                ("search", "búsqueda"),
                ("url", "URL"),
                ("date", "fecha"),
                ("time", "hora"),
                ("textarea", "área de texto"),
            ]),
            selector: "Selector".to_string(),
            selection_menu: "menú de selección".to_string(),
            button: "Botón".to_string(),
            link: "Enlace".to_string(),
            link_suffix: "enlace".to_string(),
            image_without_description: "Imagen sin descripción".to_string(),
            roles: table(&[
                ("button", "botón"),
                ("link", "enlace"),
                ("checkbox", "casilla de verificación"),
                ("radio", "botón de radio"),
                ("tab", "pestaña"),
                ("tabpanel", "panel de pestaña"),
                ("menuitem", "elemento de menú"),
                ("option", "opción"),
                ("combobox", "cuadro combinado"),
                ("textbox", "cuadro de texto"),
                ("searchbox", "cuadro de búsqueda"),
                ("slider", "deslizador"),
                ("spinbutton", "selector numérico"),
                ("progressbar", "barra de progreso"),
                ("alert", "alerta"),
                ("dialog", "diálogo"),
                ("navigation", "navegación"),
                ("main", "contenido principal"),
                ("banner", "banner"),
                ("contentinfo", "información de contenido"),
                ("complementary", "complementario"),
                ("form", "formulario"),
                ("search", "búsqueda"),
                ("region", "región"),
            ]),
            heading_level: "Encabezado nivel".to_string(),
            list_item: "Elemento de lista".to_string(),
            interactive_element: "Elemento interactivo".to_string(),
            tags: table(&[
                ("div", "División"),
                ("span", "Texto"),
                ("p", "Párrafo"),
                ("section", "Sección"),
                ("article", "Artículo"),
                ("header", "Encabezado de página"),
                ("footer", "Pie de página"),
                ("nav", "Navegación"),
                ("aside", "Contenido lateral"),
                ("main", "Contenido principal"),
            ]),
            focused_element: "Elemento enfocado".to_string(),
        }
    }

    /// Parse a vocabulary from JSON; absent fields keep the Spanish wording
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a vocabulary file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    /// Spoken noun for an input type
    pub fn input_type<'a>(&'a self, input_type: &'a str) -> &'a str {
        self.input_types
            .get(input_type)
            .map(String::as_str)
            .unwrap_or(input_type)
    }

    /// Spoken noun for an ARIA role
    pub fn role<'a>(&'a self, role: &'a str) -> &'a str {
        self.roles.get(role).map(String::as_str).unwrap_or(role)
    }

    /// Spoken noun for a bare tag, if the table knows it
    pub fn tag(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag).map(String::as_str)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::spanish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups_pass_unknown_through() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.input_type("email"), "correo electrónico");
        assert_eq!(vocab.input_type("color"), "color");
        assert_eq!(vocab.role("slider"), "deslizador");
        assert_eq!(vocab.role("treeitem"), "treeitem");
        assert_eq!(vocab.tag("nav"), Some("Navegación"));
        assert_eq!(vocab.tag("table"), None);
    }

    #[test]
    fn test_role_table_covers_landmarks() {
        let vocab = Vocabulary::spanish();
        assert_eq!(vocab.roles.len(), 24);
        for role in ["navigation", "main", "banner", "contentinfo", "complementary", "region"] {
            assert!(vocab.roles.contains_key(role), "missing role {}", role);
        }
    }

    #[test]
    fn test_partial_json_overrides() {
        let vocab: Vocabulary = serde_json::from_str(r#"{"button": "Button", "link_suffix": "link"}"#).unwrap();
        assert_eq!(vocab.button, "Button");
        assert_eq!(vocab.link_suffix, "link");
        assert_eq!(vocab.selection_menu, "menú de selección");
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en.json");
        std::fs::write(&path, r#"{"button": "Button", "heading_level": "Heading level"}"#).unwrap();

        let vocab = Vocabulary::load(&path).await.unwrap();
        assert_eq!(vocab.heading_level, "Heading level");
        assert_eq!(vocab.link, "Enlace");

        assert!(Vocabulary::load(dir.path().join("missing.json")).await.is_err());
        assert!(Vocabulary::from_json("[1, 2]").is_err());
    }
}
