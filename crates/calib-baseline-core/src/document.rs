//! Owned tree model for calibration result documents.
//!
//! Result files are small XML trees of named elements with numeric
//! attributes. The parsed `roxmltree` document borrows its input buffer, so
//! the model converts it into an owned tree at load time and is read-only
//! afterwards.

use std::fs;
use std::path::Path;

/// Errors raised while loading a result document.
#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Xml(#[from] roxmltree::Error),
}

/// Attribute value with the numeric interpretation resolved at parse time.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Scalar(f64),
    Vector(Vec<f64>),
    Text(String),
}

impl AttributeValue {
    fn parse(raw: &str) -> Self {
        let numbers: Result<Vec<f64>, _> = raw.split_whitespace().map(str::parse).collect();
        match numbers.as_deref() {
            Ok([value]) => Self::Scalar(*value),
            Ok(values) if !values.is_empty() => Self::Vector(values.to_vec()),
            _ => Self::Text(raw.to_string()),
        }
    }
}

/// One named node: attributes plus an ordered list of child nodes.
///
/// Sibling names are not required to be unique; lookups return the first
/// match in document order.
#[derive(Clone, Debug, Default)]
pub struct Node {
    pub name: String,
    attributes: Vec<(String, AttributeValue)>,
    children: Vec<Node>,
}

impl Node {
    /// Single-level lookup by exact name, first match wins.
    pub fn find_child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value)
    }

    /// Scalar attribute lookup; `None` if absent or not a single number.
    pub fn scalar_attribute(&self, name: &str) -> Option<f64> {
        match self.attribute(name)? {
            AttributeValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    /// Vector attribute lookup; `None` if absent or the declared length
    /// differs from `len`.
    pub fn vector_attribute(&self, name: &str, len: usize) -> Option<Vec<f64>> {
        match self.attribute(name)? {
            AttributeValue::Vector(values) if values.len() == len => Some(values.clone()),
            AttributeValue::Scalar(value) if len == 1 => Some(vec![*value]),
            _ => None,
        }
    }

    fn from_xml(element: roxmltree::Node<'_, '_>) -> Self {
        Self {
            name: element.tag_name().name().to_string(),
            attributes: element
                .attributes()
                .map(|a| (a.name().to_string(), AttributeValue::parse(a.value())))
                .collect(),
            children: element
                .children()
                .filter(roxmltree::Node::is_element)
                .map(Self::from_xml)
                .collect(),
        }
    }
}

/// An immutable result document: the root node of the parsed tree.
#[derive(Clone, Debug)]
pub struct ResultDocument {
    root: Node,
}

impl ResultDocument {
    /// Load and parse a result document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let raw = fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    /// Parse a result document from an XML string.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let doc = roxmltree::Document::parse(text)?;
        Ok(Self {
            root: Node::from_xml(doc.root_element()),
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }
}
