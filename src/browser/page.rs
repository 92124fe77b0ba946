use crate::error::{ReaderError, Result};
use crate::page::{PageAdapter, SKIP_LINK_ID};
use crate::settings::ColorTheme;
use headless_chrome::Tab;
use log::warn;
use std::sync::Arc;

/// [`PageAdapter`] that applies its effects to a Chrome tab
pub struct ChromePage {
    tab: Arc<Tab>,
}

impl ChromePage {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }

    fn run(&self, script: &str) -> Result<()> {
        self.tab
            .evaluate(script, false)
            .map_err(|e| ReaderError::EvaluationFailed(e.to_string()))?;
        Ok(())
    }

    fn run_logged(&self, what: &str, script: &str) {
        if let Err(e) = self.run(script) {
            warn!("Failed to {}: {}", what, e);
        }
    }
}

/// Quote a string as a JavaScript literal
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn font_scale_script(scale: f32) -> String {
    format!("document.documentElement.style.fontSize = '{}rem';", scale)
}

fn theme_script(theme: ColorTheme) -> String {
    format!(
        "document.body.setAttribute('data-theme', {});",
        js_string(theme.as_str())
    )
}

fn highlight_links_script(enabled: bool) -> String {
    format!(
        "document.documentElement.setAttribute('data-highlight-links', '{}');",
        if enabled { "1" } else { "0" }
    )
}

fn stylesheet_script(path: &str) -> String {
    format!(
        r#"(function() {{
            const href = {href};
            if (document.querySelector('link[data-wau-style="' + href + '"]')) return;
            const link = document.createElement('link');
            link.rel = 'stylesheet';
            link.href = href;
            link.dataset.wauStyle = href;
            (document.head || document.documentElement).appendChild(link);
        }})()"#,
        href = js_string(path)
    )
}

fn skip_link_script() -> String {
    format!(
        r##"(function() {{
            if (document.getElementById({id})) return;
            const link = document.createElement('a');
            link.id = {id};
            link.href = '#main';
            link.textContent = 'Saltar al contenido principal';
            link.className = 'wau-skip-link';
            document.body.insertBefore(link, document.body.firstChild);
        }})()"##,
        id = js_string(SKIP_LINK_ID)
    )
}

const SCROLL_FOCUSED_SCRIPT: &str = r#"(function() {
    const el = document.activeElement;
    if (el && el !== document.body) {
        el.scrollIntoView({ behavior: 'smooth', block: 'center' });
    }
})()"#;

impl PageAdapter for ChromePage {
    fn apply_font_scale(&self, scale: f32) {
        self.run_logged("apply font scale", &font_scale_script(scale));
    }

    fn apply_theme(&self, theme: ColorTheme) {
        self.run_logged("apply theme", &theme_script(theme));
    }

    fn apply_highlight_links(&self, enabled: bool) {
        self.run_logged("toggle link highlighting", &highlight_links_script(enabled));
    }

    fn inject_stylesheet(&self, path: &str) {
        self.run_logged("inject stylesheet", &stylesheet_script(path));
    }

    fn inject_skip_link(&self) {
        self.run_logged("inject skip link", &skip_link_script());
    }

    fn scroll_focused_into_view(&self) {
        self.run_logged("scroll focused element", SCROLL_FOCUSED_SCRIPT);
    }
}
