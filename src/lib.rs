//! # focus-reader
//!
//! Focus-driven screen reading for web pages. When focus lands on an element,
//! a short spoken description is built from its accessible name, role and
//! type, repeats are debounced, and the result is handed to a speech engine
//! with recovery for the ways speech synthesis fails.
//!
//! ## Features
//!
//! - **Text extraction**: priority rules over ARIA attributes, labels, element types and roles
//! - **Speech dispatch**: voice selection, preemption, audio unlock and a host-mediated fallback
//! - **Settings**: a persisted record with partial updates pushed to open pages
//! - **Keyboard shortcuts**: configurable speech toggle and font size steps
//! - **Live pages**: walk a page's focus order in Chrome via `headless_chrome`
//!
//! ## Usage
//!
//! ### Describing an element
//!
//! ```rust
//! use focus_reader::{DomTree, ElementNode, TextExtractor};
//!
//! let email = ElementNode::new("input")
//!     .with_attribute("id", "email")
//!     .with_attribute("type", "email");
//! let label = ElementNode::new("label")
//!     .with_attribute("for", "email")
//!     .with_text("Correo");
//! let document = DomTree::new(ElementNode::new("body").with_children(vec![label, email.clone()]));
//!
//! let text = TextExtractor::new().extract(&email, &document);
//! assert_eq!(text, "Correo, campo de correo electrónico");
//! ```
//!
//! ### Reading a live page
//!
//! ```rust,no_run
//! use focus_reader::{LaunchOptions, PageSession, TextExtractor};
//!
//! # fn main() -> focus_reader::Result<()> {
//! let session = PageSession::launch(LaunchOptions::default())?;
//! session.navigate("https://example.com")?;
//!
//! session.press_tab()?;
//! let document = session.snapshot()?;
//! if let Some(element) = document.focused() {
//!     println!("{}", TextExtractor::new().extract(element, &document));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: element and document snapshots
//! - [`extract`]: the text extractor and its vocabulary
//! - [`focus`]: the focus pipeline with repeat suppression
//! - [`speech`]: engines, voice selection and the dispatcher
//! - [`keyboard`]: shortcut parsing and key routing
//! - [`settings`]: the settings record and its storage
//! - [`relay`]: messages between the host, pages and settings surfaces
//! - [`page`]: per-page content logic
//! - [`browser`]: Chrome harness
//! - [`error`]: error types and result aliases

pub mod browser;
pub mod dom;
pub mod error;
pub mod extract;
pub mod focus;
pub mod keyboard;
pub mod page;
pub mod relay;
pub mod settings;
pub mod speech;

pub use browser::{LaunchOptions, PageSession};
pub use dom::{DomTree, ElementNode};
pub use error::{ReaderError, Result};
pub use extract::{TextExtractor, Vocabulary};
pub use focus::{FocusOutcome, FocusPipeline};
pub use page::ContentAgent;
pub use relay::{Ack, Message, MessageBus};
pub use settings::{Settings, SettingsStore};
pub use speech::{SpeechDispatcher, SpeechEngine};
