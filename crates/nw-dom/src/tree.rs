//! Arena-backed element tree.

use std::collections::BTreeMap;

/// Stable handle to a node in a [`Dom`].
///
/// Handles stay valid for the lifetime of the tree; a removed node's
/// handle simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct ElementData {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    /// Display suppressed (`display: none`).
    hidden: bool,
}

#[derive(Debug)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An element tree with stable node identity.
#[derive(Debug)]
pub struct Dom {
    /// Arena slots; removed nodes become tombstones.
    nodes: Vec<Option<Node>>,
    root: NodeId,
}

impl Dom {
    /// Empty tree with a `div` container as root.
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            data: NodeData::Element(ElementData {
                tag: "div".to_owned(),
                classes: Vec::new(),
                attrs: BTreeMap::new(),
                hidden: false,
            }),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
        }
    }

    /// The container element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.node_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.push_node(Node {
            data: NodeData::Element(ElementData {
                tag: tag.into(),
                classes: Vec::new(),
                attrs: BTreeMap::new(),
                hidden: false,
            }),
            parent: None,
            children: Vec::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push_node(Node {
            data: NodeData::Text(text.into()),
            parent: None,
            children: Vec::new(),
        })
    }

    /// Whether the handle still resolves to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Whether the node is live and reachable from the root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.node(current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Append `child` as the last child of `parent`. No-op if either
    /// node is gone.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.element(parent).is_none() || !self.contains(child) {
            return;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Insert `new` immediately before `reference` under the same
    /// parent. No-op if `reference` is detached or gone.
    pub fn insert_before(&mut self, new: NodeId, reference: NodeId) {
        let Some(parent) = self.node(reference).and_then(|n| n.parent) else {
            return;
        };
        if !self.contains(new) {
            return;
        }
        self.detach(new);
        if let Some(node) = self.node_mut(parent) {
            if let Some(pos) = node.children.iter().position(|&c| c == reference) {
                node.children.insert(pos, new);
            } else {
                return;
            }
        }
        if let Some(node) = self.node_mut(new) {
            node.parent = Some(parent);
        }
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Remove a node and its whole subtree. The root cannot be removed.
    /// No-op if the node is already gone.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        self.detach(id);
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                pending.extend(node.children);
            }
        }
    }

    /// Tag name of an element node.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    /// Child node ids, in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Parent node id, if attached to one.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Whether an element carries the given class.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    /// Add a class to an element (no duplicates).
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        if let Some(el) = self.element_mut(id) {
            el.classes.push(class.to_owned());
        }
    }

    /// Remove a class from an element.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Attribute value of an element.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|el| el.attrs.get(name).map(String::as_str))
    }

    /// Set an attribute on an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.element_mut(id) {
            el.attrs.insert(name.to_owned(), value.into());
        }
    }

    /// Remove an attribute from an element.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(el) = self.element_mut(id) {
            el.attrs.remove(name);
        }
    }

    /// Suppress or restore an element's display.
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        if let Some(el) = self.element_mut(id) {
            el.hidden = hidden;
        }
    }

    /// Whether the element's display is suppressed.
    #[must_use]
    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|el| el.hidden)
    }

    /// Element descendants of `id` in document order, excluding `id`.
    #[must_use]
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut pending: Vec<NodeId> = self.children(id).to_vec();
        pending.reverse();
        while let Some(current) = pending.pop() {
            if self.element(current).is_some() {
                result.push(current);
            }
            let mut children = self.children(current).to_vec();
            children.reverse();
            pending.extend(children);
        }
        result
    }

    /// Element descendants carrying the given class.
    #[must_use]
    pub fn elements_by_class(&self, id: NodeId, class: &str) -> Vec<NodeId> {
        self.descendant_elements(id)
            .into_iter()
            .filter(|&el| self.has_class(el, class))
            .collect()
    }

    /// Element descendants with the given tag and class.
    #[must_use]
    pub fn elements_by_tag_and_class(&self, id: NodeId, tag: &str, class: &str) -> Vec<NodeId> {
        self.descendant_elements(id)
            .into_iter()
            .filter(|&el| self.tag(el) == Some(tag) && self.has_class(el, class))
            .collect()
    }

    /// Element descendants carrying the given attribute.
    #[must_use]
    pub fn elements_with_attribute(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.descendant_elements(id)
            .into_iter()
            .filter(|&el| self.attribute(el, name).is_some())
            .collect()
    }

    /// Concatenated text of the node's subtree.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        self.collect_text(id, &mut text);
        text
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Text(t)) => out.push_str(t),
            Some(NodeData::Element(_)) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            None => {}
        }
    }

    /// Append text to `parent`, merging with a trailing text child.
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.children(parent).last() {
            if let Some(node) = self.node_mut(last) {
                if let NodeData::Text(existing) = &mut node.data {
                    existing.push_str(text);
                    return;
                }
            }
        }
        let id = self.create_text(text);
        self.append_child(parent, id);
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> (Dom, NodeId, NodeId) {
        let mut dom = Dom::new();
        let pre = dom.create_element("pre");
        dom.add_class(pre, "lang-mermaid");
        let code = dom.create_element("code");
        let text = dom.create_text("graph TD;");
        dom.append_child(code, text);
        dom.append_child(pre, code);
        dom.append_child(dom.root(), pre);
        (dom, pre, code)
    }

    #[test]
    fn test_append_and_text_content() {
        let (dom, pre, _) = sample();
        assert_eq!(dom.text_content(pre), "graph TD;");
        assert_eq!(dom.text_content(dom.root()), "graph TD;");
    }

    #[test]
    fn test_queries() {
        let (dom, pre, code) = sample();
        assert_eq!(dom.elements_by_class(dom.root(), "lang-mermaid"), vec![pre]);
        assert_eq!(
            dom.elements_by_tag_and_class(dom.root(), "pre", "lang-mermaid"),
            vec![pre]
        );
        assert_eq!(dom.descendant_elements(dom.root()), vec![pre, code]);
    }

    #[test]
    fn test_insert_before() {
        let (mut dom, pre, _) = sample();
        let wrapper = dom.create_element("div");
        dom.insert_before(wrapper, pre);
        assert_eq!(dom.children(dom.root()), &[wrapper, pre]);
        assert_eq!(dom.parent(wrapper), Some(dom.root()));
    }

    #[test]
    fn test_insert_before_detached_reference_is_noop() {
        let mut dom = Dom::new();
        let detached = dom.create_element("pre");
        let wrapper = dom.create_element("div");
        dom.insert_before(wrapper, detached);
        assert_eq!(dom.parent(wrapper), None);
    }

    #[test]
    fn test_remove_subtree() {
        let (mut dom, pre, code) = sample();
        dom.remove(pre);
        assert!(!dom.contains(pre));
        assert!(!dom.contains(code));
        assert!(dom.children(dom.root()).is_empty());
        // Removing again is a no-op.
        dom.remove(pre);
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut dom = Dom::new();
        let root = dom.root();
        dom.remove(root);
        assert!(dom.contains(root));
    }

    #[test]
    fn test_attachment() {
        let (mut dom, pre, code) = sample();
        assert!(dom.is_attached(code));
        dom.remove(pre);
        assert!(!dom.is_attached(code));
        let loose = dom.create_element("div");
        assert!(!dom.is_attached(loose));
    }

    #[test]
    fn test_attributes_and_visibility() {
        let (mut dom, pre, _) = sample();
        dom.set_attribute(pre, "data-diagram-processed", "true");
        assert_eq!(dom.attribute(pre, "data-diagram-processed"), Some("true"));
        assert_eq!(dom.elements_with_attribute(dom.root(), "data-diagram-processed"), vec![pre]);

        dom.set_hidden(pre, true);
        assert!(dom.is_hidden(pre));
        dom.remove_attribute(pre, "data-diagram-processed");
        dom.set_hidden(pre, false);
        assert_eq!(dom.attribute(pre, "data-diagram-processed"), None);
        assert!(!dom.is_hidden(pre));
    }

    #[test]
    fn test_add_class_no_duplicates() {
        let (mut dom, pre, _) = sample();
        dom.add_class(pre, "lang-mermaid");
        dom.add_class(pre, "extra");
        assert!(dom.has_class(pre, "extra"));
        assert_eq!(dom.elements_by_class(dom.root(), "lang-mermaid").len(), 1);

        dom.remove_class(pre, "lang-mermaid");
        assert!(!dom.has_class(pre, "lang-mermaid"));
        assert!(dom.has_class(pre, "extra"));
    }

    #[test]
    fn test_append_text_merges() {
        let mut dom = Dom::new();
        let p = dom.create_element("p");
        dom.append_child(dom.root(), p);
        dom.append_text(p, "a");
        dom.append_text(p, "b");
        assert_eq!(dom.children(p).len(), 1);
        assert_eq!(dom.text_content(p), "ab");
    }
}
