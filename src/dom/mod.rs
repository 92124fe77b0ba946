//! DOM snapshot module
//!
//! Focus handling works on plain snapshots of the page rather than live nodes:
//! - ElementNode: a DOM element with the state the text extractor reads
//! - DomTree: the document snapshot, used for label lookup and the page language

pub mod element;
pub mod tree;

pub use element::ElementNode;
pub use tree::DomTree;
