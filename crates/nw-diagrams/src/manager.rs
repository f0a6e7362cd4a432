//! Mount manager for interactive diagram views.

use std::collections::HashMap;

use nw_dom::{Dom, NodeId};
use tracing::debug;

use crate::consts::{DIAGRAM_BLOCK_CLASS, DIAGRAM_BLOCK_TAG, PROCESSED_ATTR, WRAPPER_CLASS};
use crate::view::{DiagramView, DiagramViewFactory};

/// Owns every live diagram instance inside one container.
///
/// The record table maps wrapper node identity to the instance mounted
/// in it; nothing else may hold an instance. One manager operates on a
/// given container at a time, and refreshes run to completion before
/// control returns — the host render pipeline serializes calls.
pub struct MountManager {
    factory: Box<dyn DiagramViewFactory>,
    records: HashMap<NodeId, Box<dyn DiagramView>>,
}

impl MountManager {
    /// Manager creating instances through `factory`.
    #[must_use]
    pub fn new<F: DiagramViewFactory + 'static>(factory: F) -> Self {
        Self {
            factory: Box::new(factory),
            records: HashMap::new(),
        }
    }

    /// Number of currently mounted instances.
    #[must_use]
    pub fn mounted_count(&self) -> usize {
        self.records.len()
    }

    /// Atomic refresh of `container`: unmount and remove everything
    /// from the previous pass, then mount a fresh instance for every
    /// qualifying diagram block.
    ///
    /// A detached or removed container is a guarded no-op.
    pub fn refresh(&mut self, dom: &mut Dom, container: NodeId) {
        if !dom.is_attached(container) {
            debug!("diagram refresh skipped: container not attached");
            return;
        }

        let unmounted = self.cleanup(dom, container);
        let mounted = self.scan(dom, container);
        debug!(unmounted, mounted, "diagram refresh");
    }

    /// Unmount everything without touching the tree, for host document
    /// teardown.
    pub fn teardown(&mut self) {
        let count = self.records.len();
        for (_, mut view) in self.records.drain() {
            view.unmount();
        }
        if count > 0 {
            debug!(count, "diagram teardown");
        }
    }

    fn cleanup(&mut self, dom: &mut Dom, container: NodeId) -> usize {
        let mut unmounted = 0;

        for wrapper in dom.elements_by_class(container, WRAPPER_CLASS) {
            if let Some(mut view) = self.records.remove(&wrapper) {
                view.unmount();
                unmounted += 1;
            }
            dom.remove(wrapper);
        }

        // Records whose wrappers were removed behind our back still own
        // live instances; a refresh must not leak them.
        for (_, mut view) in self.records.drain() {
            view.unmount();
            unmounted += 1;
        }

        for block in dom.elements_with_attribute(container, PROCESSED_ATTR) {
            dom.remove_attribute(block, PROCESSED_ATTR);
            dom.set_hidden(block, false);
        }

        unmounted
    }

    fn scan(&mut self, dom: &mut Dom, container: NodeId) -> usize {
        let blocks = dom.elements_by_tag_and_class(container, DIAGRAM_BLOCK_TAG, DIAGRAM_BLOCK_CLASS);
        let mut mounted = 0;

        for block in blocks {
            let diagram_text = dom.text_content(block);
            if diagram_text.trim().is_empty() {
                continue;
            }

            // The raw text stays in the hidden block for future re-scans.
            dom.set_attribute(block, PROCESSED_ATTR, "true");
            dom.set_hidden(block, true);

            let wrapper = dom.create_element("div");
            dom.add_class(wrapper, WRAPPER_CLASS);
            dom.insert_before(wrapper, block);

            let view = self.factory.mount(dom, wrapper, &diagram_text);
            self.records.insert(wrapper, view);
            mounted += 1;
        }

        mounted
    }
}
