//! Typed model of the XSD grammar subset understood by the generator.
//!
//! Loading is lenient: constructs the generator rejects (groups, lists,
//! unions, ...) are still represented here so the schema front-end can
//! report them with a proper location instead of a bare parse failure.
//! Each model type reads itself from its schema element; the `from_node`
//! constructors return `None` for children that belong to another branch
//! of the grammar, which keeps mixed child lists in document order.

use std::sync::OnceLock;

use regex::Regex;
use roxmltree::{Document, Node, NodeType};

use crate::error::XsdError;

/// Load an XSD schema from document text.
pub fn load_xsd_schema(document: &str) -> Result<XsdSchema, XsdError> {
    let document = Document::parse(document)?;
    let root = document.root();
    let schema = first_xsd_child(&root, "schema")
        .ok_or_else(|| XsdError::missing_child(&root, "schema"))?;
    XsdSchema::load(&schema)
}

/// Children carrying the given XSD local name, namespace prefix ignored.
fn xsd_children<'a, 'input>(
    node: &Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn first_xsd_child<'a, 'input>(node: &Node<'a, 'input>, name: &'static str) -> Option<Node<'a, 'input>> {
    xsd_children(node, name).next()
}

fn req_attr(node: &Node<'_, '_>, name: &'static str) -> Result<String, XsdError> {
    node.attribute(name)
        .map(str::to_owned)
        .ok_or_else(|| XsdError::missing_attribute(node, name))
}

fn opt_attr(node: &Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_owned)
}

/// An occurrence count (`minOccurs` or a plain `maxOccurs`). Negative
/// values are kept, rejecting them is the front-end's job.
fn occurs_attr(node: &Node<'_, '_>, name: &'static str) -> Result<Option<i64>, XsdError> {
    match node.attribute(name) {
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| XsdError::invalid_attribute(node, name, v)),
        None => Ok(None),
    }
}

fn max_occurs_attr(node: &Node<'_, '_>) -> Result<Option<MaxOccurs>, XsdError> {
    match node.attribute("maxOccurs") {
        Some("unbounded") => Ok(Some(MaxOccurs::Unbounded)),
        Some(v) => v
            .parse()
            .map(|count| Some(MaxOccurs::Count(count)))
            .map_err(|_| XsdError::invalid_attribute(node, "maxOccurs", v)),
        None => Ok(None),
    }
}

/// A boolean schema attribute, absent means false.
fn bool_attr(node: &Node<'_, '_>, name: &'static str) -> Result<bool, XsdError> {
    match node.attribute(name) {
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(v) => Err(XsdError::invalid_attribute(node, name, v)),
        None => Ok(false),
    }
}

#[derive(Debug)]
/// Value of a restriction facet.
pub struct FacetValue {
    pub value: String,
    pub fixed: bool,
}

impl FacetValue {
    fn load(node: &Node<'_, '_>) -> Result<Self, XsdError> {
        Ok(Self {
            value: req_attr(node, "value")?,
            fixed: bool_attr(node, "fixed")?,
        })
    }
}

#[derive(Debug)]
/// A restriction facet. Only `Enumeration` affects generated code, the
/// rest is reported as unchecked by the front-end.
pub enum Facet {
    MinExclusive(FacetValue),
    MinInclusive(FacetValue),
    MaxExclusive(FacetValue),
    MaxInclusive(FacetValue),
    TotalDigits(FacetValue),
    FractionDigits(FacetValue),
    Length(FacetValue),
    MinLength(FacetValue),
    MaxLength(FacetValue),
    Enumeration(FacetValue),
    WhiteSpace(FacetValue),
    Pattern(FacetValue),
}

impl Facet {
    /// The facet's XSD element name.
    pub fn name(&self) -> &'static str {
        match self {
            Facet::MinExclusive(_) => "minExclusive",
            Facet::MinInclusive(_) => "minInclusive",
            Facet::MaxExclusive(_) => "maxExclusive",
            Facet::MaxInclusive(_) => "maxInclusive",
            Facet::TotalDigits(_) => "totalDigits",
            Facet::FractionDigits(_) => "fractionDigits",
            Facet::Length(_) => "length",
            Facet::MinLength(_) => "minLength",
            Facet::MaxLength(_) => "maxLength",
            Facet::Enumeration(_) => "enumeration",
            Facet::WhiteSpace(_) => "whiteSpace",
            Facet::Pattern(_) => "pattern",
        }
    }

    fn from_node(node: &Node<'_, '_>) -> Result<Option<Self>, XsdError> {
        Ok(Some(match node.tag_name().name() {
            "minExclusive" => Facet::MinExclusive(FacetValue::load(node)?),
            "minInclusive" => Facet::MinInclusive(FacetValue::load(node)?),
            "maxExclusive" => Facet::MaxExclusive(FacetValue::load(node)?),
            "maxInclusive" => Facet::MaxInclusive(FacetValue::load(node)?),
            "totalDigits" => Facet::TotalDigits(FacetValue::load(node)?),
            "fractionDigits" => Facet::FractionDigits(FacetValue::load(node)?),
            "length" => Facet::Length(FacetValue::load(node)?),
            "minLength" => Facet::MinLength(FacetValue::load(node)?),
            "maxLength" => Facet::MaxLength(FacetValue::load(node)?),
            "enumeration" => Facet::Enumeration(FacetValue::load(node)?),
            "whiteSpace" => Facet::WhiteSpace(FacetValue::load(node)?),
            "pattern" => Facet::Pattern(FacetValue::load(node)?),
            _ => return Ok(None),
        }))
    }
}

#[derive(Debug)]
/// A restriction of some base type.
pub struct Restriction {
    pub base: Option<String>,
    pub facets: Vec<Facet>,
    /// Inline simple type, not supported by the generator.
    pub content: Option<SimpleType>,
    pub particle: Option<TypeDefParticle>,
    pub attributes: Vec<Attribute>,
}

impl Restriction {
    /// The enumeration facet values, in document order.
    pub fn enumeration_values(&self) -> Vec<String> {
        self.facets
            .iter()
            .filter_map(|f| match f {
                Facet::Enumeration(v) => Some(v.value.clone()),
                _ => None,
            })
            .collect()
    }

    fn load(node: &Node<'_, '_>) -> Result<Self, XsdError> {
        let mut facets = Vec::new();
        for child in node.children() {
            if let Some(facet) = Facet::from_node(&child)? {
                facets.push(facet);
            }
        }

        Ok(Self {
            base: opt_attr(node, "base"),
            facets,
            particle: TypeDefParticle::first_in(node)?,
            attributes: Attribute::load_all(node)?,
            content: first_xsd_child(node, "simpleType")
                .map(|n| SimpleType::load(&n))
                .transpose()?,
        })
    }
}

#[derive(Debug)]
/// `xsd:list`, kept only so it can be rejected with a location.
pub struct List {
    pub item_type: Option<String>,
}

#[derive(Debug)]
/// `xsd:union`, kept only so it can be rejected with a location.
pub struct Union {
    pub member_types: Option<Vec<String>>,
}

#[derive(Debug)]
pub enum SimpleDerivation {
    Restriction(Box<Restriction>),
    List(Box<List>),
    Union(Box<Union>),
}

impl SimpleDerivation {
    fn from_node(node: &Node<'_, '_>) -> Result<Option<Self>, XsdError> {
        Ok(Some(match node.tag_name().name() {
            "restriction" => SimpleDerivation::Restriction(Box::new(Restriction::load(node)?)),
            "list" => SimpleDerivation::List(Box::new(List {
                item_type: opt_attr(node, "itemType"),
            })),
            "union" => SimpleDerivation::Union(Box::new(Union {
                member_types: opt_attr(node, "memberTypes")
                    .map(|v| v.split_whitespace().map(str::to_owned).collect()),
            })),
            _ => return Ok(None),
        }))
    }
}

#[derive(Debug)]
pub struct SimpleType {
    pub name: Option<String>,
    pub content: Option<SimpleDerivation>,
    pub has_id: bool,
}

impl SimpleType {
    fn load(node: &Node<'_, '_>) -> Result<Self, XsdError> {
        let mut content = None;
        for child in node.children() {
            if let Some(derivation) = SimpleDerivation::from_node(&child)? {
                content = Some(derivation);
                break;
            }
        }
        Ok(Self {
            name: opt_attr(node, "name"),
            content,
            has_id: node.attribute("id").is_some(),
        })
    }
}

#[derive(Debug)]
/// The `xsd:any` wildcard.
pub struct Any {
    pub min_occurs: Option<i64>,
    pub max_occurs: Option<MaxOccurs>,
}

impl Any {
    fn load(node: &Node<'_, '_>) -> Result<Self, XsdError> {
        Ok(Self {
            min_occurs: occurs_attr(node, "minOccurs")?,
            max_occurs: max_occurs_attr(node)?,
        })
    }
}

#[derive(Debug)]
/// A particle that can occur inside a sequence or choice.
pub enum NestedParticle {
    Element(Element),
    Choice(Group),
    Sequence(Group),
    /// A `xsd:group` reference, not supported by the generator.
    GroupRef(GroupRef),
    Any(Any),
}

impl NestedParticle {
    fn from_node(node: &Node<'_, '_>) -> Result<Option<Self>, XsdError> {
        Ok(Some(match node.tag_name().name() {
            "element" => NestedParticle::Element(Element::load(node)?),
            "choice" => NestedParticle::Choice(Group::load(node)?),
            "sequence" => NestedParticle::Sequence(Group::load(node)?),
            "group" => NestedParticle::GroupRef(GroupRef {
                r#ref: opt_attr(node, "ref"),
            }),
            "any" => NestedParticle::Any(Any::load(node)?),
            _ => return Ok(None),
        }))
    }
}

#[derive(Debug)]
pub struct GroupRef {
    pub r#ref: Option<String>,
}

#[derive(Debug)]
/// A group of nested particles (`all`, `choice` or `sequence` body).
pub struct Group {
    pub content: Vec<NestedParticle>,
    pub min_occurs: Option<i64>,
    pub max_occurs: Option<MaxOccurs>,
}

impl Group {
    fn load(node: &Node<'_, '_>) -> Result<Self, XsdError> {
        let mut content = Vec::new();
        for child in node.children() {
            if let Some(particle) = NestedParticle::from_node(&child)? {
                content.push(particle);
            }
        }
        Ok(Self {
            content,
            min_occurs: occurs_attr(node, "minOccurs")?,
            max_occurs: max_occurs_attr(node)?,
        })
    }
}

#[derive(Debug)]
pub enum TypeDefParticle {
    All(Group),
    Choice(Group),
    Sequence(Group),
    GroupRef(GroupRef),
    Any(Any),
}

impl TypeDefParticle {
    fn from_node(node: &Node<'_, '_>) -> Result<Option<Self>, XsdError> {
        Ok(Some(match node.tag_name().name() {
            "all" => TypeDefParticle::All(Group::load(node)?),
            "choice" => TypeDefParticle::Choice(Group::load(node)?),
            "sequence" => TypeDefParticle::Sequence(Group::load(node)?),
            "group" => TypeDefParticle::GroupRef(GroupRef {
                r#ref: opt_attr(node, "ref"),
            }),
            "any" => TypeDefParticle::Any(Any::load(node)?),
            _ => return Ok(None),
        }))
    }

    /// The first particle child of a type body, if any.
    fn first_in(node: &Node<'_, '_>) -> Result<Option<Self>, XsdError> {
        for child in node.children() {
            if let Some(particle) = Self::from_node(&child)? {
                return Ok(Some(particle));
            }
        }
        Ok(None)
    }
}

#[derive(Debug)]
/// A type extending another type.
pub struct Extension {
    pub base: String,
    pub content: Option<TypeDefParticle>,
    pub attributes: Vec<Attribute>,
}

impl Extension {
    fn load(node: &Node<'_, '_>) -> Result<Self, XsdError> {
        Ok(Self {
            base: req_attr(node, "base")?,
            content: TypeDefParticle::first_in(node)?,
            attributes: Attribute::load_all(node)?,
        })
    }
}

#[derive(Debug)]
pub enum SimpleContent {
    Restriction(Restriction),
    Extension(Extension),
}

impl SimpleContent {
    fn from_node(node: &Node<'_, '_>) -> Result<Option<Self>, XsdError> {
        Ok(Some(match node.tag_name().name() {
            "restriction" => SimpleContent::Restriction(Restriction::load(node)?),
            "extension" => SimpleContent::Extension(Extension::load(node)?),
            _ => return Ok(None),
        }))
    }
}

#[derive(Debug)]
pub enum ComplexContent {
    Restriction(Restriction),
    Extension(Extension),
}

impl ComplexContent {
    fn from_node(node: &Node<'_, '_>) -> Result<Option<Self>, XsdError> {
        Ok(Some(match node.tag_name().name() {
            "restriction" => ComplexContent::Restriction(Restriction::load(node)?),
            "extension" => ComplexContent::Extension(Extension::load(node)?),
            _ => return Ok(None),
        }))
    }
}

#[derive(Debug)]
pub enum ComplexTypeContents {
    Simple(SimpleContent),
    Complex(ComplexContent),
}

impl ComplexTypeContents {
    fn from_node(node: &Node<'_, '_>) -> Result<Option<Self>, XsdError> {
        match node.tag_name().name() {
            "simpleContent" => {
                for child in node.children() {
                    if let Some(content) = SimpleContent::from_node(&child)? {
                        return Ok(Some(ComplexTypeContents::Simple(content)));
                    }
                }
                Err(XsdError::missing_child(node, "restriction or extension"))
            }
            "complexContent" => {
                for child in node.children() {
                    if let Some(content) = ComplexContent::from_node(&child)? {
                        return Ok(Some(ComplexTypeContents::Complex(content)));
                    }
                }
                Err(XsdError::missing_child(node, "restriction or extension"))
            }
            _ => Ok(None),
        }
    }
}

#[derive(Debug)]
pub struct ComplexType {
    pub name: Option<String>,
    pub content: Option<ComplexTypeContents>,
    pub particle: Option<TypeDefParticle>,
    pub attributes: Vec<Attribute>,
    pub documentation: Option<String>,
    pub has_id: bool,
    pub is_abstract: bool,
    pub is_mixed: bool,
    pub has_block: bool,
    pub has_final: bool,
    pub has_attribute_group: bool,
}

impl ComplexType {
    fn load(node: &Node<'_, '_>) -> Result<Self, XsdError> {
        let mut content = None;
        for child in node.children() {
            if let Some(c) = ComplexTypeContents::from_node(&child)? {
                content = Some(c);
                break;
            }
        }

        // attributes may sit on the type itself or on the inner
        // restriction/extension of its content
        let mut attributes = Attribute::load_all(node)?;
        let mut has_attribute_group = first_xsd_child(node, "attributeGroup").is_some();
        for content_node in xsd_children(node, "simpleContent")
            .chain(xsd_children(node, "complexContent"))
        {
            for inner in xsd_children(&content_node, "restriction")
                .chain(xsd_children(&content_node, "extension"))
            {
                attributes.extend(Attribute::load_all(&inner)?);
                has_attribute_group |= first_xsd_child(&inner, "attributeGroup").is_some();
            }
        }

        Ok(Self {
            name: opt_attr(node, "name"),
            content,
            particle: TypeDefParticle::first_in(node)?,
            attributes,
            documentation: schema_doc(node),
            has_id: node.attribute("id").is_some(),
            is_abstract: node.attribute("abstract").is_some(),
            is_mixed: node.attribute("mixed").is_some(),
            has_block: node.attribute("block").is_some(),
            has_final: node.attribute("final").is_some(),
            has_attribute_group,
        })
    }
}

#[derive(Debug)]
pub enum ElementContents {
    SimpleType(SimpleType),
    ComplexType(ComplexType),
}

impl ElementContents {
    fn from_node(node: &Node<'_, '_>) -> Result<Option<Self>, XsdError> {
        Ok(Some(match node.tag_name().name() {
            "simpleType" => ElementContents::SimpleType(SimpleType::load(node)?),
            "complexType" => ElementContents::ComplexType(ComplexType::load(node)?),
            _ => return Ok(None),
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    Count(i64),
    Unbounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeUse {
    Prohibited,
    Optional,
    Required,
}

impl AttributeUse {
    fn from_attr(node: &Node<'_, '_>) -> Result<Option<Self>, XsdError> {
        match node.attribute("use") {
            Some("prohibited") => Ok(Some(Self::Prohibited)),
            Some("optional") => Ok(Some(Self::Optional)),
            Some("required") => Ok(Some(Self::Required)),
            Some(v) => Err(XsdError::invalid_attribute(node, "use", v)),
            None => Ok(None),
        }
    }
}

#[derive(Debug)]
pub struct Attribute {
    /// Inline type definition.
    pub content: Option<SimpleType>,
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub r#use: Option<AttributeUse>,
    pub default: Option<String>,
    pub fixed: Option<String>,
    pub documentation: Option<String>,
}

impl Attribute {
    fn load(node: &Node<'_, '_>) -> Result<Self, XsdError> {
        Ok(Self {
            content: first_xsd_child(node, "simpleType")
                .map(|n| SimpleType::load(&n))
                .transpose()?,
            name: opt_attr(node, "name"),
            r#type: opt_attr(node, "type"),
            r#use: AttributeUse::from_attr(node)?,
            default: opt_attr(node, "default"),
            fixed: opt_attr(node, "fixed"),
            documentation: annotation_doc(node),
        })
    }

    /// All `xsd:attribute` children of a type or extension body.
    fn load_all(node: &Node<'_, '_>) -> Result<Vec<Self>, XsdError> {
        xsd_children(node, "attribute")
            .map(|n| Self::load(&n))
            .collect()
    }
}

#[derive(Debug)]
pub struct Element {
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub default: Option<String>,
    pub contents: Option<Box<ElementContents>>,
    pub min_occurs: Option<i64>,
    pub max_occurs: Option<MaxOccurs>,
    pub documentation: Option<String>,
}

impl Element {
    fn load(node: &Node<'_, '_>) -> Result<Self, XsdError> {
        let mut contents = None;
        for child in node.children() {
            if let Some(c) = ElementContents::from_node(&child)? {
                contents = Some(Box::new(c));
                break;
            }
        }
        Ok(Self {
            name: opt_attr(node, "name"),
            r#type: opt_attr(node, "type"),
            default: opt_attr(node, "default"),
            contents,
            min_occurs: occurs_attr(node, "minOccurs")?,
            max_occurs: max_occurs_attr(node)?,
            documentation: annotation_doc(node),
        })
    }
}

#[derive(Debug)]
pub enum XsdItem {
    SimpleType(SimpleType),
    ComplexType(ComplexType),
    Element(Element),
}

impl XsdItem {
    fn from_node(node: &Node<'_, '_>) -> Result<Option<Self>, XsdError> {
        Ok(Some(match node.tag_name().name() {
            "simpleType" => XsdItem::SimpleType(SimpleType::load(node)?),
            "complexType" => XsdItem::ComplexType(ComplexType::load(node)?),
            "element" => XsdItem::Element(Element::load(node)?),
            _ => return Ok(None),
        }))
    }
}

#[derive(Debug)]
/// A full XSD schema file.
pub struct XsdSchema {
    pub items: Vec<XsdItem>,
    pub target_namespace: Option<String>,
    pub version: Option<String>,
}

impl XsdSchema {
    fn load(node: &Node<'_, '_>) -> Result<Self, XsdError> {
        let mut items = Vec::new();
        for child in node.children() {
            if let Some(item) = XsdItem::from_node(&child)? {
                items.push(item);
            }
        }
        Ok(Self {
            items,
            target_namespace: opt_attr(node, "targetNamespace"),
            version: opt_attr(node, "version"),
        })
    }
}

fn leading_ws() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[ \t]+").unwrap())
}

/// Flatten an annotation subtree into documentation text.
///
/// Leading whitespace is removed from every line, interior line breaks are
/// preserved. `ddue:summary` becomes `@brief`, `ddue:mediaLink` images
/// become `@see` references.
pub fn flatten_doc(node: &Node<'_, '_>) -> String {
    let mut result = String::new();
    append_doc(node, &mut result);
    result
}

fn append_doc(node: &Node<'_, '_>, result: &mut String) {
    for child in node.children() {
        match child.node_type() {
            NodeType::Text => {
                let raw = child.text().unwrap_or("");
                let text = leading_ws().replace_all(raw, "");
                let text = text.trim_end();
                if text.is_empty() {
                    continue;
                }
                if !result.is_empty() && !result.ends_with('\n') {
                    result.push(' ');
                }
                result.push_str(text);
            }
            NodeType::Element => match child.tag_name().name() {
                "summary" => {
                    result.push_str("@brief");
                    append_doc(&child, result);
                    result.push('\n');
                }
                "para" | "title" => {
                    append_doc(&child, result);
                    result.push('\n');
                }
                "code" => {
                    result.push('\n');
                    append_doc(&child, result);
                    result.push('\n');
                }
                "mediaLink" => {
                    if let Some(image) = first_xsd_child(&child, "image") {
                        if let Some(href) = image.attribute("href") {
                            result.push_str("@see ");
                            result.push_str(href);
                            result.push('\n');
                        }
                    }
                }
                _ => append_doc(&child, result),
            },
            _ => {}
        }
    }
}

/// Documentation from `xsd:annotation/xsd:documentation`.
fn annotation_doc(node: &Node<'_, '_>) -> Option<String> {
    let annotation = first_xsd_child(node, "annotation")?;
    let documentation = first_xsd_child(&annotation, "documentation")?;
    let doc = flatten_doc(&documentation);
    (!doc.is_empty()).then_some(doc)
}

/// Documentation from `xsd:annotation/xsd:appinfo/sd:schemaDoc`, used on
/// complex types.
fn schema_doc(node: &Node<'_, '_>) -> Option<String> {
    let annotation = first_xsd_child(node, "annotation")?;
    let appinfo = first_xsd_child(&annotation, "appinfo")?;
    let schema_doc = first_xsd_child(&appinfo, "schemaDoc")?;
    let doc = flatten_doc(&schema_doc);
    (!doc.is_empty()).then_some(doc)
}
