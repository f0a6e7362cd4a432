//! Full pipeline: render a note, commit the fragment, mount diagrams.

use nw_diagrams::{DiagramView, DiagramViewFactory, MountManager, WRAPPER_CLASS};
use nw_dom::{Dom, NodeId};
use nw_renderer::ViewerOptions;
use nw_routes::{Location, Router};

struct StubView;

impl DiagramView for StubView {}

struct StubFactory;

impl DiagramViewFactory for StubFactory {
    fn mount(&self, dom: &mut Dom, wrapper: NodeId, diagram_text: &str) -> Box<dyn DiagramView> {
        let svg = dom.create_element("svg");
        dom.set_attribute(svg, "data-source-len", diagram_text.len().to_string());
        dom.append_child(wrapper, svg);
        Box::new(StubView)
    }
}

fn render(markdown: &str) -> String {
    let location = Location::parse("/note/Pipeline").unwrap();
    ViewerOptions::base(Router::new(), location)
        .build()
        .render_markdown(markdown)
        .html
}

#[test]
fn test_rendered_note_mounts_diagram_blocks() {
    let markdown = "# Pipeline\n\nintro with [[Other Note]] and #tag\n\n\
                    ```mermaid\ngraph TD; A-->B;\n```\n\n\
                    ```rust\nfn main() {}\n```\n";
    let html = render(markdown);

    let mut dom = Dom::parse_fragment(&html).expect("renderer output is well-formed");
    let root = dom.root();
    let mut manager = MountManager::new(StubFactory);
    manager.refresh(&mut dom, root);

    // Only the mermaid block qualifies; the rust block stays visible.
    assert_eq!(manager.mounted_count(), 1);
    let wrappers = dom.elements_by_class(root, WRAPPER_CLASS);
    assert_eq!(wrappers.len(), 1);
    assert_eq!(dom.children(wrappers[0]).len(), 1);

    let mermaid = dom.elements_by_tag_and_class(root, "pre", "lang-mermaid");
    assert!(dom.is_hidden(mermaid[0]));
    let rust = dom.elements_by_tag_and_class(root, "pre", "lang-rust");
    assert!(!dom.is_hidden(rust[0]));

    // The raw diagram source survived rendering and parsing.
    assert_eq!(dom.text_content(mermaid[0]), "graph TD; A-->B;\n");
}

#[test]
fn test_refresh_after_content_change() {
    let html = render("```mermaid\ngraph TD;\n```\n");
    let mut dom = Dom::parse_fragment(&html).expect("renderer output is well-formed");
    let root = dom.root();
    let mut manager = MountManager::new(StubFactory);

    manager.refresh(&mut dom, root);
    assert_eq!(manager.mounted_count(), 1);

    // The note now has no diagram blocks.
    let block = dom.elements_by_tag_and_class(root, "pre", "lang-mermaid")[0];
    dom.remove(block);
    manager.refresh(&mut dom, root);

    assert_eq!(manager.mounted_count(), 0);
    assert!(dom.elements_by_class(root, WRAPPER_CLASS).is_empty());
}

#[test]
fn test_annotated_fragment_round_trips_through_dom() {
    let html = render("see www.example.com/q?a=1&b=2 and [[Other]]\n");
    let dom = Dom::parse_fragment(&html).expect("renderer output is well-formed");
    let root = dom.root();

    // Escaped ampersands in hrefs parse back to the literal URL.
    let anchors: Vec<_> = dom
        .descendant_elements(root)
        .into_iter()
        .filter(|&el| dom.tag(el) == Some("a"))
        .collect();
    assert_eq!(anchors.len(), 2);
    assert_eq!(
        dom.attribute(anchors[0], "href"),
        Some("http://www.example.com/q?a=1&b=2")
    );
    assert_eq!(dom.attribute(anchors[1], "href"), Some("/note/Other"));
}
