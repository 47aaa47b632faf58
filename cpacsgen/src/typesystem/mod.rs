//! The resolved type system: a graph of classes and enums with name-keyed
//! dependency back-edges.

mod builder;

pub use builder::{build_type_system, make_class_name};
pub(crate) use builder::capitalize_first;

use std::collections::BTreeMap;
use std::fmt;

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Optional,
    Mandatory,
    Vector,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Optional => write!(f, "Optional"),
            Cardinality::Mandatory => write!(f, "Mandatory"),
            Cardinality::Vector => write!(f, "Vector"),
        }
    }
}

/// How a field appears in the XML document.
#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlConstruct {
    Element,
    Attribute,
    SimpleContent,
    FundamentalTypeBase,
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct Field {
    pub origin_xpath: String,
    pub cpacs_name: String,
    /// Resolved type name.
    pub type_name: String,
    /// The original XSD type name.
    pub xml_type_name: String,
    pub xml_type: XmlConstruct,
    pub min_occurs: u32,
    pub max_occurs: u32,
    pub default_value: String,
    pub name_postfix: String,
    pub documentation: String,
}

impl Field {
    pub fn cardinality(&self) -> Cardinality {
        if self.min_occurs == 0 && self.max_occurs == 1 {
            Cardinality::Optional
        } else if self.min_occurs == 1 && self.max_occurs == 1 {
            Cardinality::Mandatory
        } else if self.max_occurs > 1 {
            Cardinality::Vector
        } else {
            // rejected by the builder before a field enters the type system
            panic!(
                "Invalid cardinalities, min: {}, max: {}",
                self.min_occurs, self.max_occurs
            )
        }
    }

    pub fn name(&self) -> String {
        let mut n = self.cpacs_name.clone();
        // append "s" to vector fields
        if self.cardinality() == Cardinality::Vector && !n.ends_with('s') && !n.is_empty() {
            n.push('s');
        }
        n + &self.name_postfix
    }

    pub fn name_without_vector_s(&self) -> String {
        format!("{}{}", self.cpacs_name, self.name_postfix)
    }

    pub fn field_name(&self) -> String {
        format!("m_{}", self.name())
    }
}

/// Name-keyed dependency back-edges, sorted and duplicate-free.
#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone, Default)]
pub struct ClassDependencies {
    // in the context of inheritance
    pub bases: Vec<String>,
    pub deriveds: Vec<String>,

    // in the context of the XML tree
    pub parents: Vec<String>,
    pub children: Vec<String>,
    pub enum_children: Vec<String>,
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub enum ChoiceItem {
    Leaf {
        field_index: usize,
        /// Whether the field was optional on its own, before the choice
        /// forced it optional.
        optional_before: bool,
    },
    Nested(Choice),
}

pub type ChoiceElements = Vec<ChoiceItem>;

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct Choice {
    pub options: Vec<ChoiceElements>,
    pub min_occurs: u32,
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct Class {
    pub origin_xpath: String,
    pub name: String,
    /// Empty or a resolved class name.
    pub base: String,
    pub fields: Vec<Field>,
    pub choices: ChoiceElements,
    pub contains_sequence: bool,
    pub pruned: bool,
    pub deps: ClassDependencies,
    pub documentation: String,
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone, Default)]
pub struct EnumValue {
    pub cpacs_name: String,
    pub custom_name: String,
}

impl EnumValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            cpacs_name: name.into(),
            custom_name: String::new(),
        }
    }

    /// The effective name, `custom_name` when set.
    pub fn name(&self) -> &str {
        if !self.custom_name.is_empty() {
            &self.custom_name
        } else {
            &self.cpacs_name
        }
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for EnumValue {}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone, Default)]
pub struct EnumDependencies {
    pub parents: Vec<String>,
}

#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct Enum {
    pub origin_xpath: String,
    pub name: String,
    pub values: Vec<EnumValue>,
    pub pruned: bool,
    pub deps: EnumDependencies,
    pub documentation: String,
}

/// The complete type system. `BTreeMap` keeps every iteration
/// deterministic, which the emitted files rely on.
#[cfg_attr(feature = "ser", derive(serde::Serialize))]
#[derive(Debug, Default)]
pub struct TypeSystem {
    pub classes: BTreeMap<String, Class>,
    pub enums: BTreeMap<String, Enum>,
}

impl TypeSystem {
    pub fn is_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }
}
