//! Committed document tree for Notewell's post-render passes.
//!
//! The viewer engine produces an HTML fragment; the host commits it to
//! the page and then runs DOM passes over the result (diagram
//! mounting). This crate is the tree those passes operate on: an arena
//! of element and text nodes addressed by stable [`NodeId`] handles,
//! with the small set of operations the passes need — class and
//! attribute access, visibility toggling, insertion before a node,
//! subtree removal and descendant queries.
//!
//! [`Dom::parse_fragment`] builds a tree from the renderer's own output,
//! which serializes void elements self-closed precisely so the committed
//! fragment stays well-formed.
//!
//! # Example
//!
//! ```
//! use nw_dom::Dom;
//!
//! let dom = Dom::parse_fragment(r#"<p class="x">hi &amp; bye</p>"#).unwrap();
//! let p = dom.elements_by_class(dom.root(), "x")[0];
//! assert_eq!(dom.text_content(p), "hi & bye");
//! ```

mod parse;
mod tree;

pub use parse::DomError;
pub use tree::{Dom, NodeId};
