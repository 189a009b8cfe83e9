use crate::document::{Document, Node};
use crate::error::{Error, Result};

/// Data of an element, stored in [`Document`].
#[derive(Debug)]
pub struct ElementData {
    name: String,
    attributes: Vec<(String, String)>, // insertion order kept for stable serialization
    parent: Option<Element>,
    children: Vec<Node>,
}

/// Represents an XML element.
///
/// This struct only contains a unique `usize` id and implements trait `Copy`.
/// So you do not need to bother with having a reference.
///
/// Because the actual data of the element is stored in [`Document`],
/// most methods take `&Document` or `&mut Document` as their first argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    id: usize,
}

impl Element {
    /// Create a new empty element with name.
    pub fn new<S: Into<String>>(document: &mut Document, name: S) -> Element {
        Self::with_data(document, name.into(), Vec::new())
    }

    pub(crate) fn with_data(
        document: &mut Document,
        name: String,
        attributes: Vec<(String, String)>,
    ) -> Element {
        let elem = Element {
            id: document.counter,
        };
        let elem_data = ElementData {
            name,
            attributes,
            parent: None,
            children: vec![],
        };
        document.store.push(elem_data);
        document.counter += 1;
        elem
    }

    pub(crate) fn container() -> (Element, ElementData) {
        let elem_data = ElementData {
            name: String::new(),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        };
        let elem = Element { id: 0 };
        (elem, elem_data)
    }

    pub fn is_container(&self) -> bool {
        self.id == 0
    }
}

impl Element {
    fn data<'a>(&self, document: &'a Document) -> &'a ElementData {
        document.store.get(self.id).unwrap()
    }

    fn mut_data<'a>(&self, document: &'a mut Document) -> &'a mut ElementData {
        document.store.get_mut(self.id).unwrap()
    }

    /// Get the raw name of the element, as written in the document
    /// (namespace prefix included, e.g. `<p:item>` -> `"p:item"`).
    pub fn name<'a>(&self, document: &'a Document) -> &'a str {
        &self.data(document).name
    }

    /// Get attributes of the element, in document order.
    pub fn attributes<'a>(&self, document: &'a Document) -> &'a Vec<(String, String)> {
        &self.data(document).attributes
    }

    pub(crate) fn mut_attributes<'a>(
        &self,
        document: &'a mut Document,
    ) -> &'a mut Vec<(String, String)> {
        &mut self.mut_data(document).attributes
    }

    pub fn parent(&self, document: &Document) -> Option<Element> {
        self.data(document).parent
    }

    pub fn children<'a>(&self, document: &'a Document) -> &'a Vec<Node> {
        &self.data(document).children
    }

    fn _children_recursive<'a>(&self, document: &'a Document, nodes: &mut Vec<&'a Node>) {
        for node in self.children(document) {
            nodes.push(node);
            if let Node::Element(elem) = &node {
                elem._children_recursive(document, nodes);
            }
        }
    }

    pub fn children_recursive<'a>(&self, document: &'a Document) -> Vec<&'a Node> {
        let mut nodes = Vec::new();
        self._children_recursive(document, &mut nodes);
        nodes
    }

    pub fn has_children(&self, document: &Document) -> bool {
        !self.children(document).is_empty()
    }

    pub fn child_elements(&self, document: &Document) -> Vec<Element> {
        self.children(document)
            .iter()
            .filter_map(|node| node.as_element())
            .collect()
    }

    /// All descendant elements (any depth), in document order,
    /// whose raw name equals `name`.
    ///
    /// This is the only lookup the crate offers; `name` is compared against
    /// the name as written, so a prefixed element only matches its
    /// prefixed form.
    pub fn find_all(&self, document: &Document, name: &str) -> Vec<Element> {
        self.children_recursive(document)
            .iter()
            .filter_map(|node| node.as_element())
            .filter(|elem| elem.name(document) == name)
            .collect()
    }

    /// The element's text: concatenation of its direct text nodes,
    /// or `None` if it has no text node at all.
    ///
    /// `<a></a>` parses with an empty text node by default
    /// (see [`ReadOptions::empty_text_node`](crate::ReadOptions)),
    /// so its text is `Some("")`, while `<a />`'s is `None`.
    pub fn text(&self, document: &Document) -> Option<String> {
        let mut buf = String::new();
        let mut found = false;
        for node in self.children(document) {
            match node {
                Node::Text(text) | Node::CData(text) => {
                    buf.push_str(text);
                    found = true;
                }
                _ => {}
            }
        }
        if found {
            Some(buf)
        } else {
            None
        }
    }

    /// Replace the element's text: all direct text nodes are removed and
    /// `text` is inserted as the first child. Child elements are untouched.
    pub fn set_text<S: Into<String>>(&self, document: &mut Document, text: S) {
        let children = &mut self.mut_data(document).children;
        children.retain(|node| !matches!(node, Node::Text(_) | Node::CData(_)));
        children.insert(0, Node::Text(text.into()));
    }

    /// Equivalent to `vec.push()`.
    ///
    /// # Errors
    ///
    /// - [`Error::HasAParent`]: If node is an element, it must not already
    /// have a parent.
    pub fn push_child(&self, document: &mut Document, node: Node) -> Result<()> {
        if let Node::Element(elem) = node {
            if elem.is_container() {
                return Err(Error::ContainerCannotMove);
            }
            let data = elem.mut_data(document);
            if data.parent.is_some() {
                return Err(Error::HasAParent);
            }
            data.parent = Some(*self);
        }
        self.mut_data(document).children.push(node);
        Ok(())
    }
}
