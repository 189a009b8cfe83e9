use crate::element::{Element, ElementData};
use crate::encoding;
use crate::error::Result;
use crate::parser::DocumentParser;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Options for parsing XML text.
///
/// `empty_text_node`: `<tag></tag>` will have a `Node::Text("")` as its child,
/// while `<tag />` won't. This is how an element with empty text is told apart
/// from one with no text.
///
/// `trim_text`: trim leading and trailing whitespace of text nodes. Off by
/// default so that whitespace between elements survives a read-write round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    pub empty_text_node: bool,
    pub trim_text: bool,
}

impl ReadOptions {
    pub fn default() -> ReadOptions {
        ReadOptions {
            empty_text_node: true,
            trim_text: false,
        }
    }
}

#[derive(Debug)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
    PI(String),
    DocType(String),
}

impl Node {
    pub fn as_element(&self) -> Option<Element> {
        match self {
            Self::Element(elem) => Some(*elem),
            _ => None,
        }
    }
}

/// Represents an XML document.
///
/// The actual data of every element is stored here; [`Element`] is a cheap
/// `Copy` id into the store. A synthetic container element with id 0 owns the
/// root-level nodes, so comments or processing instructions next to the root
/// element are kept.
///
/// # Examples
/// ```
/// use xml_batch_edit::Document;
///
/// let mut doc = Document::parse_str(r#"<?xml version="1.0" encoding="UTF-8"?>
/// <package><author>Lewis Carol</author></package>"#).unwrap();
/// let author = doc.root_element().unwrap().find_all(&doc, "author")[0];
/// author.set_text(&mut doc, "Lewis Carroll");
/// let xml = doc.write_str().unwrap();
/// assert!(xml.contains("Lewis Carroll"));
/// ```
#[derive(Debug)]
pub struct Document {
    pub read_opts: ReadOptions,
    pub(crate) counter: usize, // == self.store.len()
    pub(crate) store: Vec<ElementData>,
    container: Element,

    pub(crate) version: String,
    pub(crate) standalone: bool,
}

impl Document {
    /// Create a blank new xml document.
    pub fn new() -> Document {
        let (container, container_data) = Element::container();
        Document {
            read_opts: ReadOptions::default(),
            counter: 1, // because container is id 0
            store: vec![container_data],
            container,
            version: String::new(), // set when a declaration is parsed
            standalone: false,
        }
    }

    pub fn container(&self) -> Element {
        self.container
    }

    /// Get the first (root) element of the document.
    pub fn root_element(&self) -> Option<Element> {
        self.container.child_elements(self).get(0).copied()
    }

    /// Get all root-level nodes of the document.
    pub fn root_nodes(&self) -> &Vec<Node> {
        self.container.children(self)
    }

    /// Parses an xml string.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedXML`](crate::Error::MalformedXML): Could not parse XML.
    pub fn parse_str(str: &str) -> Result<Document> {
        DocumentParser::parse_str(str, ReadOptions::default())
    }

    pub fn parse_str_with_opts(str: &str, opts: ReadOptions) -> Result<Document> {
        DocumentParser::parse_str(str, opts)
    }
}

// Write
impl Document {
    /// Writes the document as an xml string, with a UTF-8 declaration.
    pub fn write_str(&self) -> Result<String> {
        self.serialize("UTF-8")
    }

    /// Write the document to `writer` in UTF-8.
    pub fn write(&self, writer: &mut impl Write) -> Result<()> {
        let xml = self.serialize("UTF-8")?;
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }

    /// Write the document to `writer`, encoded as `label`.
    ///
    /// The declaration's encoding attribute is `label` and the output bytes
    /// are produced by the matching [`encoding_rs`] encoder, so the document
    /// goes back to disk in the same encoding it was read with. Characters
    /// the encoding cannot represent become numeric character references.
    ///
    /// # Errors
    ///
    /// - [`Error::CannotDecode`](crate::Error::CannotDecode): `label` is not
    /// a known encoding.
    /// - [`Error::Io`](crate::Error::Io)
    pub fn write_with_encoding(&self, writer: &mut impl Write, label: &str) -> Result<()> {
        let encoding = encoding::resolve(label)?;
        let xml = self.serialize(label)?;
        let (bytes, _, _) = encoding.encode(&xml);
        writer.write_all(&bytes)?;
        Ok(())
    }

    fn serialize(&self, encoding_label: &str) -> Result<String> {
        let mut buf: Vec<u8> = Vec::with_capacity(200);
        let mut writer = Writer::new(&mut buf);
        self.write_decl(&mut writer, encoding_label)?;
        self.write_nodes(&mut writer, self.container.children(self))?;
        writer.write_event(Event::Eof)?;
        Ok(String::from_utf8(buf)?)
    }

    fn write_decl(&self, writer: &mut Writer<impl Write>, encoding_label: &str) -> Result<()> {
        let version = if self.version.is_empty() {
            "1.0"
        } else {
            self.version.as_str()
        };
        let standalone = match self.standalone {
            true => Some("yes".as_bytes()),
            false => None,
        };
        writer.write_event(Event::Decl(BytesDecl::new(
            version.as_bytes(),
            Some(encoding_label.as_bytes()),
            standalone,
        )))?;
        Ok(())
    }

    fn write_nodes(&self, writer: &mut Writer<impl Write>, nodes: &[Node]) -> Result<()> {
        for node in nodes {
            match node {
                Node::Element(eid) => self.write_element(writer, *eid)?,
                Node::Text(text) => {
                    writer.write_event(Event::Text(BytesText::from_plain_str(text)))?
                }
                Node::DocType(text) => {
                    writer.write_event(Event::DocType(BytesText::from_plain_str(text)))?
                }
                // Comment, CData, and PI content is not escaped.
                Node::Comment(text) => {
                    writer.write_event(Event::Comment(BytesText::from_escaped_str(text)))?
                }
                Node::CData(text) => {
                    writer.write_event(Event::CData(BytesText::from_escaped_str(text)))?
                }
                Node::PI(text) => {
                    writer.write_event(Event::PI(BytesText::from_escaped_str(text)))?
                }
            };
        }
        Ok(())
    }

    fn write_element(&self, writer: &mut Writer<impl Write>, element: Element) -> Result<()> {
        let name_bytes = element.name(self).as_bytes();
        let mut start = BytesStart::borrowed_name(name_bytes);
        for (key, val) in element.attributes(self) {
            start.push_attribute((key.as_bytes(), val.as_bytes()));
        }
        if element.has_children(self) {
            writer.write_event(Event::Start(start))?;
            self.write_nodes(writer, element.children(self))?;
            writer.write_event(Event::End(BytesEnd::borrowed(name_bytes)))?;
        } else {
            writer.write_event(Event::Empty(start))?;
        }
        Ok(())
    }
}
