//! Document abstraction and the page-ready routine.
//!
//! ```text
//!   page ready ──► on_ready(doc)
//!                    ├─ every `.lazyload` parent: min-height = width × √2
//!                    └─ `#fragment` present ──► scroll target into view
//!
//!   build_line_chart ──► mount_canvas(doc, container, height)
//! ```

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use crate::error::ChartError;

/// Class carried by image placeholders that load lazily.
pub const LAZYLOAD_CLASS: &str = "lazyload";

/// Height-to-width ratio of an A4 sheet.
pub const A4_RATIO: f64 = std::f64::consts::SQRT_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

// ---------------------------------------------------------------------------
// DocumentHandle – what the page glue needs from a document
// ---------------------------------------------------------------------------

pub trait DocumentHandle {
    fn element_by_id(&self, id: &str) -> Option<ElementId>;
    fn elements_by_class(&self, class: &str) -> Vec<ElementId>;
    fn parent(&self, element: ElementId) -> Option<ElementId>;
    /// Rendered width in CSS pixels.
    fn offset_width(&self, element: ElementId) -> f64;
    fn set_style(&mut self, element: ElementId, property: &str, value: String);
    fn set_attribute(&mut self, element: ElementId, name: &str, value: String);
    fn create_element(&mut self, tag: &str) -> ElementId;
    fn append_child(&mut self, parent: ElementId, child: ElementId);
    /// Location fragment without the leading `#`; `None` when empty.
    fn location_hash(&self) -> Option<String>;
    fn scroll_into_view(&mut self, element: ElementId);
}

// ---------------------------------------------------------------------------
// Page-ready routine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadyReport {
    /// Placeholder parents whose minimum height was set.
    pub resized: usize,
    pub scrolled_to: Option<String>,
}

/// Reserve A4-shaped space for lazy images and honor the location fragment.
pub fn on_ready<D: DocumentHandle + ?Sized>(doc: &mut D) -> Result<ReadyReport, ChartError> {
    let placeholders = doc.elements_by_class(LAZYLOAD_CLASS);
    let mut report = ReadyReport::default();

    for el in &placeholders {
        let Some(parent) = doc.parent(*el) else {
            warn!("lazyload element {el:?} has no parent, skipping");
            continue;
        };
        let min_height = doc.offset_width(parent) * A4_RATIO;
        doc.set_style(parent, "min-height", format!("{min_height}px"));
        report.resized += 1;
    }

    if !placeholders.is_empty() {
        if let Some(hash) = doc.location_hash() {
            let target = doc
                .element_by_id(&hash)
                .ok_or_else(|| ChartError::MissingFragmentTarget(hash.clone()))?;
            doc.scroll_into_view(target);
            report.scrolled_to = Some(hash);
        }
    }

    debug!("page ready: {report:?}");
    Ok(report)
}

// ---------------------------------------------------------------------------
// Canvas mounting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub element: ElementId,
    pub height: u32,
}

/// Create a `<canvas>` of `height` pixels under `container_id`.
pub fn mount_canvas<D: DocumentHandle + ?Sized>(
    doc: &mut D,
    container_id: &str,
    height: u32,
) -> Result<Canvas, ChartError> {
    let container = doc
        .element_by_id(container_id)
        .ok_or_else(|| ChartError::MissingContainer(container_id.to_string()))?;
    let canvas = doc.create_element("canvas");
    doc.set_attribute(canvas, "height", height.to_string());
    doc.set_style(canvas, "height", format!("{height}px"));
    doc.append_child(container, canvas);
    Ok(Canvas {
        element: canvas,
        height,
    })
}

// ---------------------------------------------------------------------------
// MemoryDocument – arena-backed document for tests and headless export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    width: f64,
}

#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    root: ElementId,
    id_index: HashMap<String, ElementId>,
    hash: Option<String>,
    scrolled: Vec<ElementId>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// A document holding only `<body>`.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                tag: "body".to_string(),
                ..Node::default()
            }],
            root: ElementId(0),
            id_index: HashMap::new(),
            hash: None,
            scrolled: Vec::new(),
        }
    }

    pub fn body(&self) -> ElementId {
        self.root
    }

    /// Create `tag` under `parent` and return it.
    pub fn add(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let el = self.create_element(tag);
        self.append_child(parent, el);
        el
    }

    pub fn set_id(&mut self, element: ElementId, id: &str) {
        self.set_attribute(element, "id", id.to_string());
    }

    pub fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.classes.push(class.to_string());
        }
    }

    pub fn set_width(&mut self, element: ElementId, width: f64) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.width = width;
        }
    }

    /// Accepts the fragment with or without the leading `#`.
    pub fn set_location_hash(&mut self, hash: &str) {
        let hash = hash.trim_start_matches('#');
        self.hash = (!hash.is_empty()).then(|| hash.to_string());
    }

    pub fn tag(&self, element: ElementId) -> Option<&str> {
        self.nodes.get(element.0).map(|n| n.tag.as_str())
    }

    pub fn children(&self, element: ElementId) -> &[ElementId] {
        self.nodes
            .get(element.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn style(&self, element: ElementId, property: &str) -> Option<&str> {
        self.nodes.get(element.0)?.style.get(property).map(String::as_str)
    }

    pub fn attribute(&self, element: ElementId, name: &str) -> Option<&str> {
        self.nodes
            .get(element.0)?
            .attributes
            .get(name)
            .map(String::as_str)
    }

    /// Elements scrolled into view, oldest first.
    pub fn scrolled(&self) -> &[ElementId] {
        &self.scrolled
    }
}

impl DocumentHandle for MemoryDocument {
    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.id_index.get(id).copied()
    }

    fn elements_by_class(&self, class: &str) -> Vec<ElementId> {
        // Document order: depth-first from the root.
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(el) = stack.pop() {
            let node = &self.nodes[el.0];
            if node.classes.iter().any(|c| c == class) {
                out.push(el);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(element.0)?.parent
    }

    fn offset_width(&self, element: ElementId) -> f64 {
        self.nodes.get(element.0).map(|n| n.width).unwrap_or(0.0)
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: String) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.style.insert(property.to_string(), value);
        }
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: String) {
        let Some(node) = self.nodes.get_mut(element.0) else {
            return;
        };
        let previous = node.attributes.insert(name.to_string(), value.clone());
        if name != "id" {
            return;
        }
        if let Some(old) = previous.filter(|old| *old != value) {
            // Only drop the entry this element owns; a duplicate id keeps resolving.
            if self.id_index.get(&old) == Some(&element) {
                self.id_index.remove(&old);
                let holder = self
                    .nodes
                    .iter()
                    .position(|n| n.attributes.get("id") == Some(&old));
                if let Some(holder) = holder {
                    self.id_index.insert(old, ElementId(holder));
                }
            }
        }
        self.id_index.insert(value, element);
    }

    fn create_element(&mut self, tag: &str) -> ElementId {
        self.nodes.push(Node {
            tag: tag.to_string(),
            ..Node::default()
        });
        ElementId(self.nodes.len() - 1)
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() {
            return;
        }
        // The child must not be the parent or one of its ancestors.
        let mut cursor = Some(parent);
        while let Some(el) = cursor {
            if el == child {
                warn!("refusing to append {child:?} under its own descendant {parent:?}");
                return;
            }
            cursor = self.nodes[el.0].parent;
        }
        if let Some(old) = self.nodes[child.0].parent.take() {
            self.nodes[old.0].children.retain(|c| *c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn location_hash(&self) -> Option<String> {
        self.hash.clone()
    }

    fn scroll_into_view(&mut self, element: ElementId) {
        self.scrolled.push(element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `<body><div id="a" width=100><img.lazyload></div><p id="target"></body>`
    fn page() -> (MemoryDocument, ElementId, ElementId) {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let wrapper = doc.add(body, "div");
        doc.set_width(wrapper, 100.0);
        let img = doc.add(wrapper, "img");
        doc.add_class(img, LAZYLOAD_CLASS);
        let target = doc.add(body, "p");
        doc.set_id(target, "target");
        (doc, wrapper, target)
    }

    #[test]
    fn placeholder_parents_get_a4_min_height() {
        let (mut doc, wrapper, _) = page();
        let report = on_ready(&mut doc).unwrap();
        assert_eq!(report.resized, 1);
        let expected = format!("{}px", 100.0 * A4_RATIO);
        assert_eq!(doc.style(wrapper, "min-height"), Some(expected.as_str()));
        assert!(doc.scrolled().is_empty());
    }

    #[test]
    fn fragment_scrolls_when_placeholders_exist() {
        let (mut doc, _, target) = page();
        doc.set_location_hash("#target");
        let report = on_ready(&mut doc).unwrap();
        assert_eq!(report.scrolled_to.as_deref(), Some("target"));
        assert_eq!(doc.scrolled(), &[target]);
    }

    #[test]
    fn fragment_is_ignored_without_placeholders() {
        let mut doc = MemoryDocument::new();
        doc.set_location_hash("nowhere");
        let report = on_ready(&mut doc).unwrap();
        assert_eq!(report, ReadyReport::default());
    }

    #[test]
    fn missing_fragment_target_is_an_error() {
        let (mut doc, _, _) = page();
        doc.set_location_hash("nowhere");
        let err = on_ready(&mut doc).unwrap_err();
        assert_eq!(err, ChartError::MissingFragmentTarget("nowhere".into()));
    }

    #[test]
    fn orphan_placeholder_is_skipped() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        doc.add_class(body, LAZYLOAD_CLASS);
        assert_eq!(on_ready(&mut doc).unwrap().resized, 0);
    }

    #[test]
    fn canvas_is_mounted_under_container() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let host = doc.add(body, "div");
        doc.set_id(host, "chart");
        let canvas = mount_canvas(&mut doc, "chart", 120).unwrap();
        assert_eq!(doc.children(host), &[canvas.element]);
        assert_eq!(doc.tag(canvas.element), Some("canvas"));
        assert_eq!(doc.attribute(canvas.element, "height"), Some("120"));
        assert_eq!(doc.style(canvas.element, "height"), Some("120px"));
    }

    #[test]
    fn missing_container_is_an_error() {
        let mut doc = MemoryDocument::new();
        let err = mount_canvas(&mut doc, "chart", 50).unwrap_err();
        assert_eq!(err, ChartError::MissingContainer("chart".into()));
    }

    #[test]
    fn reassigning_an_id_updates_the_index() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let el = doc.add(body, "div");
        doc.set_id(el, "old");
        doc.set_id(el, "new");
        assert_eq!(doc.element_by_id("old"), None);
        assert_eq!(doc.element_by_id("new"), Some(el));
    }

    #[test]
    fn renaming_one_of_two_elements_sharing_an_id_keeps_the_other() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let a = doc.add(body, "div");
        let b = doc.add(body, "div");
        doc.set_id(a, "x");
        doc.set_id(b, "x");
        doc.set_id(a, "y");
        assert_eq!(doc.element_by_id("x"), Some(b));
        assert_eq!(doc.element_by_id("y"), Some(a));

        // `b` leaving `x` must not drop the entry `a` now owns.
        doc.set_id(a, "x");
        doc.set_id(b, "z");
        assert_eq!(doc.element_by_id("x"), Some(a));
    }

    #[test]
    fn appending_an_ancestor_under_its_descendant_is_ignored() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let outer = doc.add(body, "div");
        let inner = doc.add(outer, "div");
        doc.add_class(inner, LAZYLOAD_CLASS);

        doc.append_child(inner, outer);
        doc.append_child(inner, inner);

        assert_eq!(doc.parent(outer), Some(body));
        assert!(doc.children(inner).is_empty());
        assert_eq!(doc.elements_by_class(LAZYLOAD_CLASS), vec![inner]);
    }
}
