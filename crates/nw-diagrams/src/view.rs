//! Diagram viewer collaborator boundary.

use nw_dom::{Dom, NodeId};

/// A live interactive diagram instance.
///
/// An instance manages its own internals once mounted; the mount
/// manager only signals teardown.
pub trait DiagramView {
    /// Called exactly once, when the manager discards the instance.
    fn unmount(&mut self) {}
}

/// Creates diagram instances inside manager-owned wrapper nodes.
pub trait DiagramViewFactory {
    /// Mount a new instance into `wrapper`, using the code block's raw
    /// text as the diagram source.
    fn mount(&self, dom: &mut Dom, wrapper: NodeId, diagram_text: &str) -> Box<dyn DiagramView>;
}
