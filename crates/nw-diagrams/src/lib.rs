//! Interactive diagram mounting for Notewell.
//!
//! Fenced `mermaid` blocks are rendered by the viewer as plain code
//! blocks; after the HTML is committed, [`MountManager::refresh`]
//! replaces each one with a live interactive component. A refresh is
//! atomic: full cleanup of the previous pass, then a full re-scan — it
//! never diffs against earlier state, so the set of mounted instances
//! always mirrors the diagram blocks currently in the container.
//!
//! The interactive component itself is a collaborator behind
//! [`DiagramViewFactory`]; the manager only creates and destroys
//! instances and owns the wrapper nodes they live in.

mod consts;
mod manager;
mod view;

pub use consts::{DIAGRAM_BLOCK_CLASS, DIAGRAM_BLOCK_TAG, PROCESSED_ATTR, WRAPPER_CLASS};
pub use manager::MountManager;
pub use view::{DiagramView, DiagramViewFactory};
