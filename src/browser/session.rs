use crate::browser::config::LaunchOptions;
use crate::dom::DomTree;
use crate::error::{ReaderError, Result};
use headless_chrome::{Browser, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

/// A browser with one tab whose focus is being read
pub struct PageSession {
    /// Kept alive for as long as the tab is used
    _browser: Browser,
    tab: Arc<Tab>,
}

impl PageSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Reading a page can sit idle for a long time between key presses
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.sandbox = options.sandbox;

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        let browser = Browser::new(launch_opts).map_err(|e| ReaderError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| ReaderError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { _browser: browser, tab })
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Navigate and wait for the load to finish
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| ReaderError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| ReaderError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Move focus to the next element in tab order
    pub fn press_tab(&self) -> Result<()> {
        self.tab
            .press_key("Tab")
            .map_err(|e| ReaderError::EvaluationFailed(format!("Failed to press Tab: {}", e)))?;
        Ok(())
    }

    /// Snapshot the tab's DOM, focused element included
    pub fn snapshot(&self) -> Result<DomTree> {
        DomTree::from_tab(&self.tab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests (require Chrome to be installed)
    #[test]
    #[ignore] // Ignore by default, run with: cargo test -- --ignored
    fn test_launch_browser() {
        let result = PageSession::launch(LaunchOptions::new().headless(true));
        assert!(result.is_ok());
    }

    #[test]
    #[ignore]
    fn test_tab_moves_focus() {
        let session = PageSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");
        session
            .navigate("data:text/html,<html><body><button>Uno</button><button>Dos</button></body></html>")
            .expect("Failed to navigate");

        session.press_tab().expect("Failed to press Tab");
        let dom = session.snapshot().expect("Failed to snapshot");

        let focused = dom.focused().expect("Nothing focused");
        assert_eq!(focused.tag_name, "button");
        assert_eq!(focused.inner_text(), "Uno");
    }
}
