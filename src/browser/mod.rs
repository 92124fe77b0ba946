//! Live pages in Chrome
//!
//! [`PageSession`] drives a real browser tab: it moves focus with Tab and takes
//! DOM snapshots for the focus pipeline. [`ChromePage`] applies the page-side
//! effects (font scale, theme, injected assets) to that tab.

pub mod config;
pub mod page;
pub mod session;

pub use config::LaunchOptions;
pub use page::ChromePage;
pub use session::PageSession;
