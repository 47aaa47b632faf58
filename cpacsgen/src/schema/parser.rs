//! The XSD front-end: lowers the raw XSD document model into the
//! normalized type catalog.
//!
//! Inline anonymous types are registered under synthesized names, simple
//! content restrictions are folded into auxiliary enum types, and
//! constructs outside the supported subset are rejected with the location
//! of the offending node.

use std::path::Path;

use cpacsgen_xml::schema::xsd::{self as raw, MaxOccurs};
use log::warn;

use crate::error::CodeGenError;

use super::{
    strip_type_suffix, All, Any, Attribute, Choice, ComplexType, ContentModel, Element,
    SchemaType, SchemaTypes, Sequence, SequenceItem, SimpleContent, SimpleType, UNBOUNDED,
};

const SIMPLE_CONTENT_TYPE_SUFFIX: &str = "_SimpleContentType";

/// Parse the XSD file at `path` into a schema catalog.
pub fn parse_schema(path: &Path) -> Result<SchemaTypes, CodeGenError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CodeGenError::io("Failed to read schema", e))
        .map_err(|e| e.in_file(path.display().to_string()))?;
    parse_schema_str(&text).map_err(|e| e.in_file(path.display().to_string()))
}

/// Parse XSD document text into a schema catalog.
pub fn parse_schema_str(text: &str) -> Result<SchemaTypes, CodeGenError> {
    let schema = cpacsgen_xml::load_xsd_schema(text)?;
    SchemaParser::default().run(&schema)
}

#[derive(Default)]
struct SchemaParser {
    types: SchemaTypes,
}

impl SchemaParser {
    fn run(mut self, schema: &raw::XsdSchema) -> Result<SchemaTypes, CodeGenError> {
        let mut simple_index = 0;
        for item in &schema.items {
            if let raw::XsdItem::SimpleType(st) = item {
                simple_index += 1;
                let xpath = format!("/xsd:schema/xsd:simpleType[{simple_index}]");
                self.read_simple_type(st, &xpath, "")?;
            }
        }

        let mut complex_index = 0;
        for item in &schema.items {
            if let raw::XsdItem::ComplexType(ct) = item {
                complex_index += 1;
                let xpath = format!("/xsd:schema/xsd:complexType[{complex_index}]");
                self.read_complex_type(ct, &xpath, "")?;
            }
        }

        let mut element_index = 0;
        for item in &schema.items {
            if let raw::XsdItem::Element(e) = item {
                element_index += 1;
                let xpath = format!("/xsd:schema/xsd:element[{element_index}]");
                let element = self.read_element(e, &xpath, "")?;
                self.types.roots.push(element.r#type);
            }
        }

        Ok(self.types)
    }

    fn read_simple_type(
        &mut self,
        st: &raw::SimpleType,
        xpath: &str,
        name_hint: &str,
    ) -> Result<String, CodeGenError> {
        let name = match &st.name {
            Some(name) => name.clone(),
            None => self.generate_unique_type_name(name_hint),
        };

        if st.has_id {
            return Err(CodeGenError::not_implemented("XSD simpleType id", xpath));
        }
        if self.types.types.contains_key(&name) {
            return Err(CodeGenError::build(format!(
                "Type with name {name} already exists"
            )));
        }

        let mut ty = SimpleType {
            xpath: xpath.to_owned(),
            name: name.clone(),
            base: String::new(),
            restriction_values: Vec::new(),
        };

        match &st.content {
            Some(raw::SimpleDerivation::Restriction(r)) => {
                read_restriction(r, &format!("{xpath}/xsd:restriction"), &mut ty)?
            }
            Some(raw::SimpleDerivation::List(_)) => {
                return Err(CodeGenError::not_implemented("XSD simpleType list", xpath))
            }
            Some(raw::SimpleDerivation::Union(_)) => {
                return Err(CodeGenError::not_implemented("XSD simpleType union", xpath))
            }
            None => {}
        }

        // only simple types with restrictions become named types (enums),
        // otherwise the use site resolves to the underlying type
        if !ty.restriction_values.is_empty() {
            self.types.types.insert(name.clone(), SchemaType::Simple(ty));
            Ok(name)
        } else {
            Ok(ty.base)
        }
    }

    fn read_complex_type(
        &mut self,
        ct: &raw::ComplexType,
        xpath: &str,
        name_hint: &str,
    ) -> Result<String, CodeGenError> {
        let name = match &ct.name {
            Some(name) => name.clone(),
            None => self.generate_unique_type_name(name_hint),
        };

        if ct.has_id {
            return Err(CodeGenError::not_implemented("XSD complextype id", xpath));
        }
        if ct.is_abstract {
            return Err(CodeGenError::not_implemented(
                "XSD complextype abstract",
                xpath,
            ));
        }
        if ct.is_mixed {
            return Err(CodeGenError::not_implemented("XSD complextype mixed", xpath));
        }
        if ct.has_block {
            return Err(CodeGenError::not_implemented("XSD complextype block", xpath));
        }
        if ct.has_final {
            return Err(CodeGenError::not_implemented("XSD complextype final", xpath));
        }
        if ct.has_attribute_group {
            return Err(CodeGenError::not_implemented(
                "XSD complexType attributeGroup",
                xpath,
            ));
        }
        if self.types.types.contains_key(&name) {
            return Err(CodeGenError::build(format!(
                "Type with name {name} already exists"
            )));
        }

        let mut ty = ComplexType {
            xpath: xpath.to_owned(),
            name: name.clone(),
            base: String::new(),
            content: ContentModel::Empty,
            attributes: Vec::new(),
            documentation: ct.documentation.clone().unwrap_or_default(),
        };

        if let Some(particle) = &ct.particle {
            ty.content = self.read_particle(particle, xpath, strip_type_suffix(&name))?;
        }

        match &ct.content {
            Some(raw::ComplexTypeContents::Complex(raw::ComplexContent::Restriction(_))) => {
                return Err(CodeGenError::not_implemented(
                    "XSD complexType complexContent restriction",
                    format!("{xpath}/xsd:complexContent"),
                ))
            }
            Some(raw::ComplexTypeContents::Complex(raw::ComplexContent::Extension(ext))) => {
                ty.base = ext.base.clone();
                if let Some(particle) = &ext.content {
                    ty.content = self.read_particle(
                        particle,
                        &format!("{xpath}/xsd:complexContent/xsd:extension"),
                        strip_type_suffix(&name),
                    )?;
                }
            }
            Some(raw::ComplexTypeContents::Simple(sc)) => {
                self.read_simple_content(sc, &format!("{xpath}/xsd:simpleContent"), &mut ty)?;
            }
            None => {}
        }

        for (i, a) in ct.attributes.iter().enumerate() {
            let attribute_xpath = format!("{xpath}/xsd:attribute[{}]", i + 1);
            let attribute = self.read_attribute(a, &attribute_xpath, &name)?;
            ty.attributes.push(attribute);
        }

        // try to inline simple contents: a type carrying nothing but a
        // simple content dissolves into the type behind that content
        if ty.attributes.is_empty() && ty.base.is_empty() {
            if let ContentModel::SimpleContent(sc) = &ty.content {
                enum Fold {
                    PromoteEnum,
                    CopyComplex(ComplexType),
                    Keep,
                }

                let sc_type = sc.r#type.clone();
                let fold = match self.types.types.get(&sc_type) {
                    Some(SchemaType::Simple(inner)) if !inner.restriction_values.is_empty() => {
                        Fold::PromoteEnum
                    }
                    Some(SchemaType::Complex(inner)) => Fold::CopyComplex(inner.clone()),
                    _ => Fold::Keep,
                };

                match fold {
                    Fold::PromoteEnum => {
                        // the inner enum takes over the outer name
                        let Some(SchemaType::Simple(mut inner)) = self.types.types.remove(&sc_type)
                        else {
                            unreachable!()
                        };
                        let stripped = sc_type
                            .strip_suffix(SIMPLE_CONTENT_TYPE_SUFFIX)
                            .ok_or_else(|| {
                                CodeGenError::schema(
                                    format!(
                                        "Expected type of simple content type to have {} suffix",
                                        SIMPLE_CONTENT_TYPE_SUFFIX
                                    ),
                                    xpath,
                                )
                            })?;
                        let new_name = format!("{stripped}Type");
                        inner.name = new_name.clone();
                        self.types
                            .types
                            .insert(new_name.clone(), SchemaType::Simple(inner));
                        return Ok(new_name);
                    }
                    Fold::CopyComplex(mut copy) => {
                        // restriction of a complex type, reuse its body
                        copy.name = name.clone();
                        self.types.types.insert(name, SchemaType::Complex(copy));
                        return Ok(sc_type);
                    }
                    Fold::Keep => {
                        // primitive simple content, keep the wrapper type
                    }
                }
            }
        }

        self.types.types.insert(name.clone(), SchemaType::Complex(ty));
        Ok(name)
    }

    fn read_particle(
        &mut self,
        particle: &raw::TypeDefParticle,
        xpath: &str,
        containing_type_name: &str,
    ) -> Result<ContentModel, CodeGenError> {
        Ok(match particle {
            raw::TypeDefParticle::All(g) => ContentModel::All(self.read_all(
                g,
                &format!("{xpath}/xsd:all"),
                containing_type_name,
            )?),
            raw::TypeDefParticle::Sequence(g) => ContentModel::Sequence(self.read_sequence(
                g,
                &format!("{xpath}/xsd:sequence"),
                containing_type_name,
            )?),
            raw::TypeDefParticle::Choice(g) => ContentModel::Choice(self.read_choice(
                g,
                &format!("{xpath}/xsd:choice"),
                containing_type_name,
            )?),
            raw::TypeDefParticle::GroupRef(_) => {
                return Err(CodeGenError::not_implemented(
                    "XSD group",
                    format!("{xpath}/xsd:group"),
                ))
            }
            raw::TypeDefParticle::Any(_) => ContentModel::Any(Any {
                xpath: format!("{xpath}/xsd:any"),
            }),
        })
    }

    fn read_all(
        &mut self,
        group: &raw::Group,
        xpath: &str,
        containing_type_name: &str,
    ) -> Result<All, CodeGenError> {
        let mut all = All {
            xpath: xpath.to_owned(),
            elements: Vec::new(),
        };
        let mut element_index = 0;
        for item in &group.content {
            if let raw::NestedParticle::Element(e) = item {
                element_index += 1;
                let element_xpath = format!("{xpath}/xsd:element[{element_index}]");
                all.elements
                    .push(self.read_element(e, &element_xpath, containing_type_name)?);
            }
        }
        Ok(all)
    }

    fn read_nested_items(
        &mut self,
        group: &raw::Group,
        xpath: &str,
        containing_type_name: &str,
    ) -> Result<Vec<SequenceItem>, CodeGenError> {
        let mut items = Vec::new();
        let mut element_index = 0;
        let mut choice_index = 0;
        let mut sequence_index = 0;
        let mut any_index = 0;
        for item in &group.content {
            match item {
                raw::NestedParticle::Element(e) => {
                    element_index += 1;
                    let p = format!("{xpath}/xsd:element[{element_index}]");
                    items.push(SequenceItem::Element(self.read_element(
                        e,
                        &p,
                        containing_type_name,
                    )?));
                }
                raw::NestedParticle::Choice(c) => {
                    choice_index += 1;
                    let p = format!("{xpath}/xsd:choice[{choice_index}]");
                    items.push(SequenceItem::Choice(Box::new(self.read_choice(
                        c,
                        &p,
                        containing_type_name,
                    )?)));
                }
                raw::NestedParticle::Sequence(s) => {
                    sequence_index += 1;
                    let p = format!("{xpath}/xsd:sequence[{sequence_index}]");
                    items.push(SequenceItem::Sequence(Box::new(self.read_sequence(
                        s,
                        &p,
                        containing_type_name,
                    )?)));
                }
                raw::NestedParticle::GroupRef(_) => {
                    return Err(CodeGenError::not_implemented(
                        "XSD group",
                        format!("{xpath}/xsd:group"),
                    ))
                }
                raw::NestedParticle::Any(_) => {
                    any_index += 1;
                    items.push(SequenceItem::Any(Any {
                        xpath: format!("{xpath}/xsd:any[{any_index}]"),
                    }));
                }
            }
        }
        Ok(items)
    }

    fn read_sequence(
        &mut self,
        group: &raw::Group,
        xpath: &str,
        containing_type_name: &str,
    ) -> Result<Sequence, CodeGenError> {
        Ok(Sequence {
            xpath: xpath.to_owned(),
            items: self.read_nested_items(group, xpath, containing_type_name)?,
        })
    }

    fn read_choice(
        &mut self,
        group: &raw::Group,
        xpath: &str,
        containing_type_name: &str,
    ) -> Result<Choice, CodeGenError> {
        let min_occurs = match group.min_occurs {
            None => 1,
            Some(v) if v < 0 => {
                return Err(CodeGenError::schema("minOccurs is negative", xpath));
            }
            Some(v) if v > 1 => {
                return Err(CodeGenError::not_implemented(
                    "support for minOccurs>1 for choices",
                    xpath,
                ));
            }
            Some(v) => v as u32,
        };

        Ok(Choice {
            xpath: xpath.to_owned(),
            items: self.read_nested_items(group, xpath, containing_type_name)?,
            min_occurs,
        })
    }

    fn read_simple_content(
        &mut self,
        sc: &raw::SimpleContent,
        xpath: &str,
        ty: &mut ComplexType,
    ) -> Result<(), CodeGenError> {
        match sc {
            raw::SimpleContent::Restriction(r) => {
                if !r.enumeration_values().is_empty() {
                    // generate an additional type for this enum
                    let aux_name = format!(
                        "{}{}",
                        strip_type_suffix(&ty.name),
                        SIMPLE_CONTENT_TYPE_SUFFIX
                    );
                    let mut aux = SimpleType {
                        xpath: xpath.to_owned(),
                        name: aux_name.clone(),
                        base: String::new(),
                        restriction_values: Vec::new(),
                    };
                    read_restriction(r, &format!("{xpath}/xsd:restriction"), &mut aux)?;
                    self.types
                        .types
                        .insert(aux_name.clone(), SchemaType::Simple(aux));
                    ty.content = ContentModel::SimpleContent(SimpleContent {
                        xpath: xpath.to_owned(),
                        r#type: aux_name,
                    });
                } else {
                    // simplify by creating a field for the content value
                    let base = r.base.clone().ok_or_else(|| {
                        CodeGenError::schema("simpleContent restriction has no base", xpath)
                    })?;
                    ty.content = ContentModel::SimpleContent(SimpleContent {
                        xpath: xpath.to_owned(),
                        r#type: base,
                    });
                }
            }
            raw::SimpleContent::Extension(ext) => {
                // simplify by creating a field for the content value
                ty.content = ContentModel::SimpleContent(SimpleContent {
                    xpath: xpath.to_owned(),
                    r#type: ext.base.clone(),
                });
            }
        }
        Ok(())
    }

    fn read_attribute(
        &mut self,
        a: &raw::Attribute,
        xpath: &str,
        containing_type_name: &str,
    ) -> Result<Attribute, CodeGenError> {
        let name = a
            .name
            .clone()
            .ok_or_else(|| CodeGenError::schema("Attribute has no name", xpath))?;

        let r#type = match &a.r#type {
            Some(t) => t.clone(),
            None => {
                // type defined inline
                let hint = format!("{containing_type_name}_{name}");
                let Some(content) = &a.content else {
                    return Err(CodeGenError::schema(
                        "Unexpected type or no type at attribute",
                        xpath,
                    ));
                };
                self.read_simple_type(content, &format!("{xpath}/xsd:simpleType"), &hint)?
            }
        };

        let optional = match a.r#use {
            None | Some(raw::AttributeUse::Optional) => true,
            Some(raw::AttributeUse::Required) => false,
            Some(raw::AttributeUse::Prohibited) => {
                return Err(CodeGenError::schema(
                    "Invalid value for optional attribute",
                    xpath,
                ));
            }
        };

        Ok(Attribute {
            xpath: xpath.to_owned(),
            name,
            r#type,
            optional,
            default_value: a.default.clone().unwrap_or_default(),
            fixed: a.fixed.clone().unwrap_or_default(),
            documentation: a.documentation.clone().unwrap_or_default(),
        })
    }

    fn read_element(
        &mut self,
        e: &raw::Element,
        xpath: &str,
        containing_type_name: &str,
    ) -> Result<Element, CodeGenError> {
        let name = e
            .name
            .clone()
            .ok_or_else(|| CodeGenError::schema("Element has no name", xpath))?;

        let min_occurs = match e.min_occurs {
            None => 1,
            Some(v) if v < 0 => {
                return Err(CodeGenError::schema("minOccurs is negative", xpath));
            }
            Some(v) => v as u32,
        };

        let max_occurs = match e.max_occurs {
            None => 1,
            Some(MaxOccurs::Unbounded) => UNBOUNDED,
            Some(MaxOccurs::Count(v)) if v < 0 => {
                return Err(CodeGenError::schema("maxOccurs is negative", xpath));
            }
            Some(MaxOccurs::Count(v)) => v as u32,
        };

        let r#type = match &e.r#type {
            Some(t) => t.clone(),
            None => {
                let hint = if containing_type_name.is_empty() {
                    name.clone()
                } else {
                    format!("{containing_type_name}_{name}")
                };
                match e.contents.as_deref() {
                    Some(raw::ElementContents::ComplexType(ct)) => {
                        self.read_complex_type(ct, &format!("{xpath}/xsd:complexType"), &hint)?
                    }
                    Some(raw::ElementContents::SimpleType(st)) => {
                        self.read_simple_type(st, &format!("{xpath}/xsd:simpleType"), &hint)?
                    }
                    None => {
                        return Err(CodeGenError::schema("Unexpected type or no type", xpath));
                    }
                }
            }
        };

        Ok(Element {
            xpath: xpath.to_owned(),
            name,
            r#type,
            min_occurs,
            max_occurs,
            default_value: e.default.clone().unwrap_or_default(),
            documentation: e.documentation.clone().unwrap_or_default(),
        })
    }

    fn generate_unique_type_name(&self, suggestion: &str) -> String {
        let mut id = 0u32;
        loop {
            let candidate = if id == 0 {
                format!("{suggestion}Type")
            } else {
                format!("{suggestion}Type_{id}")
            };
            if !self.types.types.contains_key(&candidate) {
                return candidate;
            }
            id += 1;
        }
    }
}

fn read_restriction(
    r: &raw::Restriction,
    xpath: &str,
    ty: &mut SimpleType,
) -> Result<(), CodeGenError> {
    ty.base = r
        .base
        .clone()
        .ok_or_else(|| CodeGenError::schema("restriction has no base", xpath))?;
    ty.restriction_values = r.enumeration_values();

    if r.content.is_some() {
        return Err(CodeGenError::not_implemented(
            "XSD restriction simpleType",
            xpath,
        ));
    }

    for facet in &r.facets {
        if !matches!(facet, raw::Facet::Enumeration(_)) {
            warn!(
                "XSD restriction {} is not implemented. No restrictions will be checked by generated code",
                facet.name()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> SchemaTypes {
        parse_schema_str(text).unwrap()
    }

    #[test]
    fn roots_and_named_types() {
        let types = parse(
            r#"<?xml version="1.0"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="wingType">
        <xsd:sequence>
            <xsd:element name="span" type="xsd:double"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="wing" type="wingType"/>
</xsd:schema>"#,
        );
        assert_eq!(types.roots, vec!["wingType"]);
        assert!(matches!(
            types.types.get("wingType"),
            Some(SchemaType::Complex(_))
        ));
    }

    #[test]
    fn element_cardinality_defaults_and_unbounded() {
        let types = parse(
            r#"<?xml version="1.0"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="vecType">
        <xsd:sequence>
            <xsd:element name="a" type="xsd:int"/>
            <xsd:element name="b" type="xsd:int" minOccurs="0" maxOccurs="unbounded"/>
        </xsd:sequence>
    </xsd:complexType>
</xsd:schema>"#,
        );
        let Some(SchemaType::Complex(ct)) = types.types.get("vecType") else {
            panic!("missing type");
        };
        let ContentModel::Sequence(seq) = &ct.content else {
            panic!("expected sequence");
        };
        let SequenceItem::Element(a) = &seq.items[0] else {
            panic!("expected element");
        };
        assert_eq!((a.min_occurs, a.max_occurs), (1, 1));
        let SequenceItem::Element(b) = &seq.items[1] else {
            panic!("expected element");
        };
        assert_eq!((b.min_occurs, b.max_occurs), (0, UNBOUNDED));
    }

    #[test]
    fn negative_min_occurs_is_rejected() {
        let err = parse_schema_str(
            r#"<?xml version="1.0"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="badType">
        <xsd:sequence>
            <xsd:element name="a" type="xsd:int" minOccurs="-1"/>
        </xsd:sequence>
    </xsd:complexType>
</xsd:schema>"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("minOccurs is negative"));
    }

    #[test]
    fn inline_types_get_synthesized_names() {
        let types = parse(
            r#"<?xml version="1.0"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="fuselageType">
        <xsd:sequence>
            <xsd:element name="section">
                <xsd:complexType>
                    <xsd:sequence>
                        <xsd:element name="name" type="xsd:string"/>
                    </xsd:sequence>
                </xsd:complexType>
            </xsd:element>
        </xsd:sequence>
    </xsd:complexType>
</xsd:schema>"#,
        );
        assert!(types.types.contains_key("fuselage_sectionType"));
        let Some(SchemaType::Complex(ct)) = types.types.get("fuselageType") else {
            panic!("missing type");
        };
        let ContentModel::Sequence(seq) = &ct.content else {
            panic!("expected sequence");
        };
        let SequenceItem::Element(section) = &seq.items[0] else {
            panic!("expected element");
        };
        assert_eq!(section.r#type, "fuselage_sectionType");
    }

    #[test]
    fn simple_type_without_restriction_values_dissolves() {
        let types = parse(
            r#"<?xml version="1.0"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="holderType">
        <xsd:sequence>
            <xsd:element name="value">
                <xsd:simpleType>
                    <xsd:restriction base="xsd:double"/>
                </xsd:simpleType>
            </xsd:element>
        </xsd:sequence>
    </xsd:complexType>
</xsd:schema>"#,
        );
        let Some(SchemaType::Complex(ct)) = types.types.get("holderType") else {
            panic!("missing type");
        };
        let ContentModel::Sequence(seq) = &ct.content else {
            panic!("expected sequence");
        };
        let SequenceItem::Element(value) = &seq.items[0] else {
            panic!("expected element");
        };
        assert_eq!(value.r#type, "xsd:double");
        assert_eq!(types.types.len(), 1);
    }

    #[test]
    fn restriction_only_simple_content_promotes_to_outer_name() {
        let types = parse(
            r#"<?xml version="1.0"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="modeType">
        <xsd:simpleContent>
            <xsd:restriction base="xsd:string">
                <xsd:enumeration value="auto"/>
                <xsd:enumeration value="manual"/>
            </xsd:restriction>
        </xsd:simpleContent>
    </xsd:complexType>
</xsd:schema>"#,
        );
        assert_eq!(types.types.len(), 1);
        let Some(SchemaType::Simple(st)) = types.types.get("modeType") else {
            panic!("expected promoted simple type");
        };
        assert_eq!(st.restriction_values, vec!["auto", "manual"]);
    }

    #[test]
    fn simple_content_with_attributes_keeps_wrapper_class() {
        let types = parse(
            r#"<?xml version="1.0"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="valueType">
        <xsd:simpleContent>
            <xsd:extension base="xsd:string">
                <xsd:attribute name="unit" type="xsd:string"/>
            </xsd:extension>
        </xsd:simpleContent>
    </xsd:complexType>
</xsd:schema>"#,
        );
        let Some(SchemaType::Complex(ct)) = types.types.get("valueType") else {
            panic!("expected wrapper class");
        };
        let ContentModel::SimpleContent(sc) = &ct.content else {
            panic!("expected simple content");
        };
        assert_eq!(sc.r#type, "xsd:string");
        assert_eq!(ct.attributes.len(), 1);
        assert_eq!(ct.attributes[0].name, "unit");
        assert!(ct.attributes[0].optional);
    }

    #[test]
    fn unsupported_constructs_are_not_implemented() {
        for schema in [
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:simpleType name="listType"><xsd:list itemType="xsd:int"/></xsd:simpleType>
</xsd:schema>"#,
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:simpleType name="unionType"><xsd:union memberTypes="xsd:int xsd:string"/></xsd:simpleType>
</xsd:schema>"#,
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="groupedType">
        <xsd:sequence><xsd:group ref="someGroup"/></xsd:sequence>
    </xsd:complexType>
</xsd:schema>"#,
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="absType" abstract="true"><xsd:sequence/></xsd:complexType>
</xsd:schema>"#,
        ] {
            let err = parse_schema_str(schema).unwrap_err();
            assert!(err.is_not_implemented(), "expected not implemented: {err}");
        }
    }

    #[test]
    fn choice_min_occurs_is_read() {
        let types = parse(
            r#"<?xml version="1.0"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="eitherType">
        <xsd:sequence>
            <xsd:choice minOccurs="0">
                <xsd:element name="a" type="xsd:int"/>
                <xsd:element name="b" type="xsd:int"/>
            </xsd:choice>
        </xsd:sequence>
    </xsd:complexType>
</xsd:schema>"#,
        );
        let Some(SchemaType::Complex(ct)) = types.types.get("eitherType") else {
            panic!("missing type");
        };
        let ContentModel::Sequence(seq) = &ct.content else {
            panic!("expected sequence");
        };
        let SequenceItem::Choice(choice) = &seq.items[0] else {
            panic!("expected choice");
        };
        assert_eq!(choice.min_occurs, 0);
        assert_eq!(choice.items.len(), 2);
    }
}
