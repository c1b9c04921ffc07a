//! Generic attributed XML tree.
//!
//! Every package part is parsed once into a [`Node`] tree and then queried by
//! qualified element name (`p:sp`, `a:solidFill`). Lookups never panic: a
//! missing path is simply `None`, which is how optional OOXML content is
//! expressed throughout the converter.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use std::str::FromStr;

/// An XML element with its attributes, ordered children and text content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
    text: String,
}

impl Node {
    /// Create an empty element with the given qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Parse an XML document and return its root element.
    pub fn parse(xml: &str) -> Result<Node> {
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<Node> = Vec::new();
        let mut root: Option<Node> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    stack.push(Self::from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let node = Self::from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => root = Some(node),
                    }
                }
                Ok(Event::End(_)) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| Error::XmlParse("unbalanced end tag".to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => root = Some(node),
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(top) = stack.last_mut() {
                        let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                        top.text.push_str(&text);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
        }

        root.ok_or_else(|| Error::XmlParse("document has no root element".to_string()))
    }

    fn from_start(e: &BytesStart<'_>) -> Result<Node> {
        let mut node = Node::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            node.attrs.push((key, value));
        }
        Ok(node)
    }

    /// Qualified element name, e.g. `p:sp`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Text content of the element (not including descendants).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All child elements in document order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// First child with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Whether a child with the given qualified name exists.
    pub fn has(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// All children with the given qualified name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a path of qualified child names.
    pub fn get(&self, path: &[&str]) -> Option<&Node> {
        let mut current = self;
        for segment in path {
            current = current.child(segment)?;
        }
        Some(current)
    }

    /// Attribute of the element at `path`.
    pub fn get_attr(&self, path: &[&str], key: &str) -> Option<&str> {
        self.get(path)?.attr(key)
    }

    /// Raw attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute parsed into `T`; malformed values read as absent.
    pub fn attr_parse<T: FromStr>(&self, key: &str) -> Option<T> {
        self.attr(key)?.trim().parse().ok()
    }

    /// Numeric attribute as `f64`.
    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        self.attr_parse::<f64>(key)
    }

    /// Integer attribute as `i64`.
    pub fn attr_i64(&self, key: &str) -> Option<i64> {
        self.attr_parse::<i64>(key)
    }

    /// OOXML boolean attribute (`1`, `true`, `on`).
    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        self.attr(key)
            .map(|v| matches!(v.trim(), "1" | "true" | "on"))
    }

    /// All attributes in document order.
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    /// Depth-first search for every descendant with the given qualified name.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Node> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a Node>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.collect_named(name, out);
        }
    }

    /// Copy of this tree with every element prefix `from:` renamed to `to:`.
    ///
    /// Attributes keep their names; only element names are rewritten.
    pub fn rename_prefix(&self, from: &str, to: &str) -> Node {
        let name = match self.name.strip_prefix(from) {
            Some(rest) if rest.starts_with(':') => format!("{}{}", to, rest),
            _ => self.name.clone(),
        };
        Node {
            name,
            attrs: self.attrs.clone(),
            children: self
                .children
                .iter()
                .map(|c| c.rename_prefix(from, to))
                .collect(),
            text: self.text.clone(),
        }
    }
}
