//! Owned XML element tree.
//!
//! Parsing goes through `roxmltree`, whose borrowed document cannot be
//! edited, so the tree is copied into owned nodes that can be filtered and
//! serialized back out.

use indexmap::IndexMap;
use roxmltree::{NodeType, ParsingOptions};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
const XML_DECLARATION: &str = "<?xml version='1.0' encoding='UTF-8'?>";

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style child element append.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set an attribute, keeping its original position if it already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Iterate over the child elements, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Iterate over the child elements with the given tag name.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |element| element.name == name)
    }

    pub fn elements_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> {
        self.children.iter_mut().filter_map(move |node| match node {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// First child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|element| element.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// Parse a document and return its root element.
    pub fn parse(text: &str) -> Result<Self, roxmltree::Error> {
        let options = ParsingOptions { allow_dtd: true, ..ParsingOptions::default() };
        let document = roxmltree::Document::parse_with_options(text, options)?;
        Ok(Self::from_node(document.root_element()))
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut element = Element::new(node.tag_name().name());
        for attr in node.attributes() {
            let name = match attr.namespace() {
                Some(XML_NAMESPACE) => format!("xml:{}", attr.name()),
                _ => attr.name().to_string(),
            };
            element.attributes.insert(name, attr.value().to_string());
        }
        for child in node.children() {
            match child.node_type() {
                NodeType::Element => element.children.push(Node::Element(Self::from_node(child))),
                NodeType::Text => {
                    if let Some(text) = child.text() {
                        element.children.push(Node::Text(text.to_string()));
                    }
                }
                NodeType::Comment => {
                    if let Some(text) = child.text() {
                        element.children.push(Node::Comment(text.to_string()));
                    }
                }
                _ => {}
            }
        }
        element
    }

    /// Serialize this element (and its subtree) without an XML declaration.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    /// Serialize as a complete document, declaration included.
    pub fn to_document_string(&self) -> String {
        let mut out = String::from(XML_DECLARATION);
        out.push('\n');
        self.write_xml(&mut out);
        out.push('\n');
        out
    }

    fn write_xml(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(out, value, true);
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_xml(out),
                Node::Text(text) => escape_into(out, text, false),
                Node::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\t' if attribute => out.push_str("&#09;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_round_trip_keeps_attribute_order() {
        let xml = r#"<instance stylename="Bold" filename="a.ufo" familyname="Test" />"#;
        let element = Element::parse(xml).unwrap();
        let names: Vec<&str> = element.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, ["stylename", "filename", "familyname"]);
        assert_eq!(element.to_xml(), xml);
    }

    #[test]
    fn test_text_and_comments_survive() {
        let xml = "<lib>\n  <!-- note -->\n  <dict><key>a &amp; b</key></dict>\n</lib>";
        let element = Element::parse(xml).unwrap();
        assert_eq!(element.to_xml(), xml);
    }

    #[test]
    fn test_attribute_escaping() {
        let element = Element::new("instance").with_attribute("name", "A \"quoted\" <name> & co");
        assert_eq!(
            element.to_xml(),
            r#"<instance name="A &quot;quoted&quot; &lt;name&gt; &amp; co" />"#
        );
        let parsed = Element::parse(&element.to_xml()).unwrap();
        assert_eq!(parsed.attribute("name"), Some("A \"quoted\" <name> & co"));
    }

    #[test]
    fn test_xml_namespace_attribute() {
        let element = Element::parse(r#"<stylename xml:lang="fr">Gras</stylename>"#).unwrap();
        assert_eq!(element.attribute("xml:lang"), Some("fr"));
    }

    #[test]
    fn test_child_lookup() {
        let root = Element::new("designspace")
            .with_child(Element::new("sources"))
            .with_child(Element::new("instances").with_child(Element::new("instance")));
        assert!(root.child("sources").is_some());
        assert_eq!(root.child("instances").unwrap().elements_named("instance").count(), 1);
        assert!(root.child("rules").is_none());
    }

    #[test]
    fn test_document_string_has_declaration() {
        let out = Element::new("designspace").to_document_string();
        assert!(out.starts_with("<?xml version='1.0' encoding='UTF-8'?>\n<designspace />"));
    }
}
