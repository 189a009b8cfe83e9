use pretty_assertions::assert_eq;
use xml_batch_edit::{decode_entities, Document, Error, ReadOptions};

#[test]
fn test_structure() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?><shop><item id="1">first</item><item id="2">second</item></shop>"#;
    let doc = Document::parse_str(xml).unwrap();
    let shop = doc.root_element().unwrap();
    assert_eq!(shop.name(&doc), "shop");
    let items = shop.child_elements(&doc);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].attributes(&doc), &vec![("id".to_string(), "1".to_string())]);
    assert_eq!(items[1].text(&doc).unwrap(), "second");
}

#[test]
fn test_empty_text_node_vs_self_closing() {
    let doc = Document::parse_str("<r><a></a><b /></r>").unwrap();
    let root = doc.root_element().unwrap();
    let elems = root.child_elements(&doc);
    assert_eq!(elems[0].text(&doc), Some(String::new()));
    assert_eq!(elems[1].text(&doc), None);

    let mut opts = ReadOptions::default();
    opts.empty_text_node = false;
    let doc = Document::parse_str_with_opts("<r><a></a></r>", opts).unwrap();
    let a = doc.root_element().unwrap().child_elements(&doc)[0];
    assert_eq!(a.text(&doc), None);
}

#[test]
fn test_no_empty_text_between_sibling_tags() {
    let doc = Document::parse_str("<outer>lead<middle><inner>in</inner>tail</middle><after>x</after></outer>").unwrap();
    let outer = doc.root_element().unwrap();
    // lead text, middle, after: no phantom empty text nodes in the gaps
    assert_eq!(outer.children(&doc).len(), 3);
    let middle = outer.child_elements(&doc)[0];
    assert_eq!(middle.children(&doc).len(), 2);
    // an element whose children leave no room for text has none at all
    let doc = Document::parse_str("<r><a><b>1</b></a></r>").unwrap();
    let a = doc.root_element().unwrap().child_elements(&doc)[0];
    assert_eq!(a.text(&doc), None);
}

#[test]
fn test_trim_text_option() {
    let xml = "<r><a>  padded  </a></r>";
    let doc = Document::parse_str(xml).unwrap();
    let a = doc.root_element().unwrap().child_elements(&doc)[0];
    assert_eq!(a.text(&doc).unwrap(), "  padded  ");

    let mut opts = ReadOptions::default();
    opts.trim_text = true;
    let doc = Document::parse_str_with_opts(xml, opts).unwrap();
    let a = doc.root_element().unwrap().child_elements(&doc)[0];
    assert_eq!(a.text(&doc).unwrap(), "padded");
}

#[test]
fn test_malformed() {
    // closing tag mismatch
    let err = Document::parse_str("<a><img>Te</a>xt</img>").unwrap_err();
    assert!(matches!(err, Error::MalformedXML(_)));

    // unclosed element at end of input
    let err = Document::parse_str("<img>").unwrap_err();
    assert!(matches!(err, Error::MalformedXML(_)));

    // no opening tag
    let err = Document::parse_str("</abc>").unwrap_err();
    assert!(matches!(err, Error::MalformedXML(_)));
}

#[test]
fn test_text_entities_unescaped_on_parse() {
    let doc = Document::parse_str("<a>1 &amp; 2 &#60; 3</a>").unwrap();
    let a = doc.root_element().unwrap();
    assert_eq!(a.text(&doc).unwrap(), "1 & 2 < 3");
}

#[test]
fn test_round_trip() {
    let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root a=\"1\" b=\"two\">\n  <item>5 &amp; 6</item>\n  <!-- note -->\n  <empty/>\n</root>";
    let doc = Document::parse_str(xml).unwrap();
    assert_eq!(doc.write_str().unwrap(), xml);
}

#[test]
fn test_round_trip_standalone_decl() {
    let xml = "<?xml version=\"1.1\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<r/>";
    let doc = Document::parse_str(xml).unwrap();
    assert_eq!(doc.write_str().unwrap(), xml);
}

#[test]
fn test_decl_added_when_missing() {
    let doc = Document::parse_str("<r>x</r>").unwrap();
    assert_eq!(
        doc.write_str().unwrap(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><r>x</r>"
    );
}

#[test]
fn test_entity_pass_exposes_embedded_markup() {
    // entity-escaped markup becomes parseable elements after the pre-pass
    let raw = "<root>&lt;inner&gt;41&lt;/inner&gt;</root>";
    let doc = Document::parse_str(&decode_entities(raw)).unwrap();
    let inner = doc.root_element().unwrap().find_all(&doc, "inner");
    assert_eq!(inner.len(), 1);
    assert_eq!(inner[0].text(&doc).unwrap(), "41");
}
