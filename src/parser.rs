use crate::document::{Document, Node, ReadOptions};
use crate::element::Element;
use crate::error::{Error, Result};
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;

/// Textually decode XML character entities: named references
/// (`&amp;` `&lt;` `&gt;` `&quot;` `&apos;`) and numeric references
/// (`&#38;`, `&#x26;`) become their characters, anything unrecognized or
/// malformed stays verbatim. Single pass, not recursive.
///
/// Loaded files often carry entity-escaped embedded markup; running this
/// over the raw text before parsing is what turns `&lt;inner&gt;` back
/// into parseable elements.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let resolved = tail[1..]
            .find(';')
            .and_then(|end| Some((end, resolve_entity(&tail[1..end + 1])?)));
        match resolved {
            Some((end, ch)) => {
                out.push(ch);
                rest = &tail[end + 2..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let value = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            num.parse::<u32>().ok()?
        };
        return std::char::from_u32(value);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

pub(crate) struct DocumentParser {
    document: Document,
    read_opts: ReadOptions,
}

impl DocumentParser {
    pub(crate) fn parse_str(str: &str, opts: ReadOptions) -> Result<Document> {
        let mut document = Document::new();
        document.read_opts = opts.clone();
        let mut parser = DocumentParser {
            document,
            read_opts: opts,
        };
        parser.parse(str)?;
        Ok(parser.document)
    }

    fn handle_decl(&mut self, ev: &BytesDecl) -> Result<()> {
        self.document.version = String::from_utf8(ev.version()?.to_vec())?;
        // The encoding attribute is deliberately not read here:
        // the caller decoded the bytes before parsing and owns the label.
        self.document.standalone = match ev.standalone() {
            Some(res) => {
                let val = std::str::from_utf8(&*res?)?.to_lowercase();
                if val == "yes" {
                    true
                } else if val == "no" {
                    false
                } else {
                    return Err(Error::MalformedXML(
                        "Standalone Document Declaration has non boolean value".to_string(),
                    ));
                }
            }
            None => false,
        };
        Ok(())
    }

    fn handle_bytes_start(
        &mut self,
        element_stack: &[Element],
        ev: &BytesStart,
    ) -> Result<Element> {
        let mut_doc = &mut self.document;
        let name = String::from_utf8(ev.name().to_vec())?;
        let element = Element::new(mut_doc, name);
        let attributes = element.mut_attributes(mut_doc);
        for attr in ev.attributes() {
            let attr = attr?;
            let key = String::from_utf8(attr.key.to_vec())?;
            let value = String::from_utf8(attr.unescaped_value()?.to_vec())?;
            attributes.push((key, value));
        }
        let parent = *element_stack.last().unwrap();
        parent.push_child(mut_doc, Node::Element(element)).unwrap();
        Ok(element)
    }

    // Returns whether document parsing is finished.
    fn handle_event(&mut self, element_stack: &mut Vec<Element>, event: Event) -> Result<bool> {
        let mut_doc = &mut self.document;
        match event {
            Event::Start(ref ev) => {
                let element = self.handle_bytes_start(element_stack, ev)?;
                element_stack.push(element);
                Ok(false)
            }
            Event::End(_) => {
                let elem = element_stack.pop().unwrap(); // quick-xml checks if tag names match for us
                if self.read_opts.empty_text_node {
                    // distinguish <tag></tag> and <tag />
                    if !elem.has_children(&self.document) {
                        elem.push_child(&mut self.document, Node::Text(String::new()))
                            .unwrap();
                    }
                }
                Ok(false)
            }
            Event::Empty(ref ev) => {
                self.handle_bytes_start(element_stack, ev)?;
                Ok(false)
            }
            Event::Text(ev) => {
                let content = String::from_utf8(ev.unescaped()?.to_vec())?;
                // quick-xml emits zero-length text events between sibling
                // tags when trimming is off; empty text nodes come only
                // from the `empty_text_node` insertion on `Event::End`.
                if !content.is_empty() {
                    let node = Node::Text(content);
                    let elem = *element_stack.last().unwrap();
                    elem.push_child(mut_doc, node).unwrap();
                }
                Ok(false)
            }
            Event::DocType(ev) => {
                let content = String::from_utf8(ev.to_vec())?;
                let node = Node::DocType(content);
                let elem = *element_stack.last().unwrap();
                elem.push_child(mut_doc, node).unwrap();
                Ok(false)
            }
            // Comment, CData, and PI content is not escaped.
            Event::Comment(ev) => {
                let content = String::from_utf8(ev.unescaped()?.to_vec())?;
                let node = Node::Comment(content);
                let elem = *element_stack.last().unwrap();
                elem.push_child(mut_doc, node).unwrap();
                Ok(false)
            }
            Event::CData(ev) => {
                let content = String::from_utf8(ev.unescaped()?.to_vec())?;
                let node = Node::CData(content);
                let elem = *element_stack.last().unwrap();
                elem.push_child(mut_doc, node).unwrap();
                Ok(false)
            }
            Event::PI(ev) => {
                let content = String::from_utf8(ev.unescaped()?.to_vec())?;
                let node = Node::PI(content);
                let elem = *element_stack.last().unwrap();
                elem.push_child(mut_doc, node).unwrap();
                Ok(false)
            }
            Event::Decl(ev) => {
                self.handle_decl(&ev)?;
                Ok(false)
            }
            Event::Eof => {
                if element_stack.len() != 1 {
                    return Err(Error::MalformedXML(
                        "Unexpected end of file: unclosed elements remain".to_string(),
                    ));
                }
                Ok(true)
            }
        }
    }

    fn parse(&mut self, str: &str) -> Result<()> {
        let mut reader = Reader::from_str(str);
        reader.trim_text(self.read_opts.trim_text);
        let mut buf = Vec::with_capacity(200); // reduce time increasing capacity at start.
        let mut element_stack: Vec<Element> = vec![self.document.container()];

        loop {
            let ev = reader.read_event(&mut buf)?;
            if self.handle_event(&mut element_stack, ev)? {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::decode_entities;

    #[test]
    fn test_decode_named_and_numeric() {
        assert_eq!(decode_entities("&lt;a&gt;1&lt;/a&gt;"), "<a>1</a>");
        assert_eq!(decode_entities("&amp;amp;"), "&amp;");
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("no entities"), "no entities");
    }

    #[test]
    fn test_decode_tolerates_malformed() {
        assert_eq!(decode_entities("a & b"), "a & b");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
        assert_eq!(decode_entities("&#xGG;"), "&#xGG;");
        assert_eq!(decode_entities("dangling &"), "dangling &");
        assert_eq!(decode_entities("&& &lt;"), "&& <");
    }
}
