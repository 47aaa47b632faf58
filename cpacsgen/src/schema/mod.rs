//! The normalized schema catalog produced by the XSD front-end.

mod parser;

pub use parser::{parse_schema, parse_schema_str};

use std::collections::HashMap;

/// Marker for `maxOccurs="unbounded"`.
pub const UNBOUNDED: u32 = u32::MAX;

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct Attribute {
    pub xpath: String,
    pub name: String,
    pub r#type: String,
    pub optional: bool,
    pub default_value: String,
    pub fixed: String,
    pub documentation: String,
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct Element {
    pub xpath: String,
    pub name: String,
    pub r#type: String,
    pub min_occurs: u32,
    pub max_occurs: u32,
    pub default_value: String,
    pub documentation: String,
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct Any {
    pub xpath: String,
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct All {
    pub xpath: String,
    pub elements: Vec<Element>,
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct Sequence {
    pub xpath: String,
    pub items: Vec<SequenceItem>,
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct Choice {
    pub xpath: String,
    pub items: Vec<SequenceItem>,
    pub min_occurs: u32,
}

/// A child of a sequence or choice, in document order.
#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub enum SequenceItem {
    Element(Element),
    Choice(Box<Choice>),
    Sequence(Box<Sequence>),
    Any(Any),
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct SimpleContent {
    pub xpath: String,
    pub r#type: String,
}

/// The body of a complex type.
#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub enum ContentModel {
    Empty,
    All(All),
    Sequence(Sequence),
    Choice(Choice),
    SimpleContent(SimpleContent),
    Any(Any),
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct ComplexType {
    pub xpath: String,
    pub name: String,
    /// Empty when the type has no base.
    pub base: String,
    pub content: ContentModel,
    pub attributes: Vec<Attribute>,
    pub documentation: String,
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct SimpleType {
    pub xpath: String,
    pub name: String,
    pub base: String,
    /// Non-empty means the type is an enumeration.
    pub restriction_values: Vec<String>,
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub enum SchemaType {
    Complex(ComplexType),
    Simple(SimpleType),
}

impl SchemaType {
    pub fn name(&self) -> &str {
        match self {
            SchemaType::Complex(c) => &c.name,
            SchemaType::Simple(s) => &s.name,
        }
    }
}

/// The catalog of named types plus the root element type names.
#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Default)]
pub struct SchemaTypes {
    pub roots: Vec<String>,
    pub types: HashMap<String, SchemaType>,
}

/// Strip a trailing `Type` from a type name.
pub fn strip_type_suffix(name: &str) -> &str {
    name.strip_suffix("Type").unwrap_or(name)
}

/// Strip a trailing `_SimpleContent` from a type name.
pub fn strip_simple_content_suffix(name: &str) -> &str {
    name.strip_suffix("_SimpleContent").unwrap_or(name)
}
