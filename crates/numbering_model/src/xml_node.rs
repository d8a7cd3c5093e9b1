//! Parsed XML element tree
//!
//! The container reader hands the engine already-parsed parts (body, numbering,
//! styles) as `XmlNode` trees. Names keep their namespace prefix as written in
//! the source (`w:p`); lookups accept either the bare local name or any prefix,
//! mirroring how WordprocessingML attributes are usually matched.

use serde::{Deserialize, Serialize};

/// A single XML element with its attributes, children and direct text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XmlNode {
    /// Qualified element name (e.g. "w:p")
    pub name: String,
    /// Attributes in document order as (qualified name, value)
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<XmlNode>,
    /// Concatenated character data directly inside this element
    pub text: String,
}

impl XmlNode {
    /// Create an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder: add a child element
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: set direct text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Element name without namespace prefix
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Check if the element has the given local name
    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    /// Get an attribute by local name, ignoring any namespace prefix
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| local_part(name) == local)
            .map(|(_, value)| value.as_str())
    }

    /// Get the `val` attribute, the common carrier for property values
    pub fn val(&self) -> Option<&str> {
        self.attr("val")
    }

    /// First direct child with the given local name
    pub fn child(&self, local: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.is(local))
    }

    /// All direct children with the given local name
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.is(local))
    }

    /// Follow a path of local names through first matching children
    pub fn path(&self, locals: &[&str]) -> Option<&XmlNode> {
        locals.iter().try_fold(self, |node, local| node.child(local))
    }

    /// First descendant (depth-first, pre-order, excluding self) with the given local name
    pub fn find(&self, local: &str) -> Option<&XmlNode> {
        for child in &self.children {
            if child.is(local) {
                return Some(child);
            }
            if let Some(found) = child.find(local) {
                return Some(found);
            }
        }
        None
    }
}

fn local_part(name: &str) -> &str {
    match name.rfind(':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}
