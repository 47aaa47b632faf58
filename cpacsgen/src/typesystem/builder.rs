//! Lowers the schema catalog into the type system.
//!
//! Phases, in order: lowering of every named type, enum collapsing, enum
//! value disambiguation, dependency back-edges, prune sweep. Each phase
//! leaves the structure consistent for the next one.

use std::collections::{HashMap, HashSet};

use log::{info, warn};

use crate::error::CodeGenError;
use crate::schema::{
    self, strip_simple_content_suffix, strip_type_suffix, ContentModel, SchemaType, SchemaTypes,
    SequenceItem,
};
use crate::tables::Tables;

use super::{
    Cardinality, Choice, ChoiceElements, ChoiceItem, Class, ClassDependencies, Enum,
    EnumDependencies, EnumValue, Field, TypeSystem, XmlConstruct,
};

pub fn build_type_system(schema: SchemaTypes, tables: &Tables) -> Result<TypeSystem, CodeGenError> {
    info!("Creating type system");

    let mut types = TypeSystem::default();
    Lowering { schema: &schema, tables }.lower_into(&mut types)?;

    collapse_enums(&mut types);
    disambiguate_enum_values(&mut types)?;
    build_dependencies(&mut types, false)?;
    run_prune_list(&mut types, &schema.roots, tables)?;

    Ok(types)
}

pub(crate) fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Translate an XSD type name into the generated class name.
pub fn make_class_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let capitalized = capitalize_first(name);
    let stripped = strip_type_suffix(&capitalized);
    format!("CPACS{stripped}")
}

struct Lowering<'a> {
    schema: &'a SchemaTypes,
    tables: &'a Tables,
}

impl Lowering<'_> {
    fn lower_into(&self, types: &mut TypeSystem) -> Result<(), CodeGenError> {
        let mut names: Vec<&String> = self.schema.types.keys().collect();
        names.sort();

        for name in names {
            match &self.schema.types[name] {
                SchemaType::Complex(ct) => {
                    let class = self.lower_complex(ct)?;
                    if types.enums.contains_key(&class.name)
                        || types.classes.contains_key(&class.name)
                    {
                        return Err(CodeGenError::build(format!(
                            "Duplicate type name {}",
                            class.name
                        )));
                    }
                    types.classes.insert(class.name.clone(), class);
                }
                SchemaType::Simple(st) => {
                    let e = self.lower_simple(st);
                    if types.classes.contains_key(&e.name) || types.enums.contains_key(&e.name) {
                        return Err(CodeGenError::build(format!("Duplicate type name {}", e.name)));
                    }
                    types.enums.insert(e.name.clone(), e);
                }
            }
        }

        Ok(())
    }

    fn lower_simple(&self, st: &schema::SimpleType) -> Enum {
        Enum {
            origin_xpath: st.xpath.clone(),
            name: make_class_name(&st.name),
            values: st
                .restriction_values
                .iter()
                .map(|v| EnumValue::new(v.clone()))
                .collect(),
            pruned: false,
            deps: EnumDependencies::default(),
            documentation: String::new(),
        }
    }

    fn lower_complex(&self, ct: &schema::ComplexType) -> Result<Class, CodeGenError> {
        let name = make_class_name(&ct.name);

        let mut fields = Vec::new();
        let mut choices = ChoiceElements::new();

        for a in &ct.attributes {
            fields.push(Field {
                origin_xpath: a.xpath.clone(),
                cpacs_name: a.name.clone(),
                type_name: self.resolve_type(&a.r#type)?,
                xml_type_name: a.r#type.clone(),
                xml_type: XmlConstruct::Attribute,
                min_occurs: if a.optional { 0 } else { 1 },
                max_occurs: 1,
                default_value: if !a.default_value.is_empty() {
                    a.default_value.clone()
                } else {
                    a.fixed.clone()
                },
                name_postfix: String::new(),
                documentation: a.documentation.clone(),
            });
        }

        self.lower_content(&ct.content, &mut fields, &mut choices)?;

        let mut base = String::new();
        if !ct.base.is_empty() {
            base = self.resolve_type(&ct.base)?;

            // make base a field if fundamental type
            if self.tables.fundamental_types.contains(&base) {
                warn!(
                    "Type {} has base class {} which is a fundamental type. Generated field 'base' instead",
                    ct.name, base
                );
                fields.insert(
                    0,
                    Field {
                        origin_xpath: ct.xpath.clone(),
                        cpacs_name: "base".to_owned(),
                        type_name: base.clone(),
                        xml_type_name: ct.base.clone(),
                        xml_type: XmlConstruct::FundamentalTypeBase,
                        min_occurs: 1,
                        max_occurs: 1,
                        default_value: String::new(),
                        name_postfix: String::new(),
                        documentation: String::new(),
                    },
                );
                base.clear();

                // the synthetic field shifts every choice leaf by one
                shift_choice_indices(&mut choices, 1);
            }
        }

        Ok(Class {
            origin_xpath: ct.xpath.clone(),
            name,
            base,
            contains_sequence: content_contains_sequence(&ct.content),
            fields,
            choices,
            pruned: false,
            deps: ClassDependencies::default(),
            documentation: ct.documentation.clone(),
        })
    }

    fn resolve_type(&self, name: &str) -> Result<String, CodeGenError> {
        if self.schema.types.contains_key(name) {
            return Ok(match self.tables.type_substitutions.find(name) {
                Some(substitution) => substitution.clone(),
                None => make_class_name(name),
            });
        }

        // predefined xml schema types, possibly overridden
        if let Some(substitution) = self.tables.type_substitutions.find(name) {
            return Ok(substitution.clone());
        }
        if let Some(mapped) = self.tables.xsd_types.find(name) {
            return Ok(mapped.clone());
        }

        Err(CodeGenError::build(format!("Unknown type: {name}")))
    }

    fn lower_content(
        &self,
        content: &ContentModel,
        fields: &mut Vec<Field>,
        choices: &mut ChoiceElements,
    ) -> Result<(), CodeGenError> {
        match content {
            ContentModel::Empty => {}
            ContentModel::All(all) => {
                for e in &all.elements {
                    if let Some(f) = self.lower_element(e)? {
                        fields.push(f);
                    }
                }
            }
            ContentModel::Sequence(s) => self.lower_sequence_items(&s.items, fields, choices)?,
            ContentModel::Choice(c) => self.lower_top_level_choice(c, fields, choices)?,
            ContentModel::SimpleContent(sc) => fields.push(Field {
                origin_xpath: sc.xpath.clone(),
                cpacs_name: "simpleContent".to_owned(),
                type_name: self.resolve_type(&sc.r#type)?,
                xml_type_name: sc.r#type.clone(),
                xml_type: XmlConstruct::SimpleContent,
                min_occurs: 1,
                max_occurs: 1,
                default_value: String::new(),
                name_postfix: String::new(),
                documentation: String::new(),
            }),
            ContentModel::Any(a) => {
                return Err(CodeGenError::not_implemented(
                    "Generating fields for any",
                    &a.xpath,
                ))
            }
        }
        Ok(())
    }

    fn lower_sequence_items(
        &self,
        items: &[SequenceItem],
        fields: &mut Vec<Field>,
        choices: &mut ChoiceElements,
    ) -> Result<(), CodeGenError> {
        for item in items {
            match item {
                SequenceItem::Element(e) => {
                    if let Some(f) = self.lower_element(e)? {
                        fields.push(f);
                    }
                }
                SequenceItem::Sequence(s) => {
                    self.lower_sequence_items(&s.items, fields, choices)?
                }
                SequenceItem::Choice(c) => self.lower_top_level_choice(c, fields, choices)?,
                SequenceItem::Any(a) => {
                    return Err(CodeGenError::not_implemented(
                        "Generating fields for any",
                        &a.xpath,
                    ))
                }
            }
        }
        Ok(())
    }

    fn lower_top_level_choice(
        &self,
        c: &schema::Choice,
        fields: &mut Vec<Field>,
        choices: &mut ChoiceElements,
    ) -> Result<(), CodeGenError> {
        let lowered = self.lower_choice(c, &[], fields)?;
        check_choice_consistency(&lowered, fields);
        choices.push(ChoiceItem::Nested(lowered));
        Ok(())
    }

    fn lower_choice(
        &self,
        c: &schema::Choice,
        prefix: &[usize],
        fields: &mut Vec<Field>,
    ) -> Result<Choice, CodeGenError> {
        let mut options = Vec::new();
        for (i, item) in c.items.iter().enumerate() {
            let mut path = prefix.to_vec();
            path.push(i + 1);

            let mut option = ChoiceElements::new();
            self.lower_choice_option(item, &path, fields, &mut option)?;
            options.push(option);
        }
        Ok(Choice {
            options,
            min_occurs: c.min_occurs,
        })
    }

    fn lower_choice_option(
        &self,
        item: &SequenceItem,
        path: &[usize],
        fields: &mut Vec<Field>,
        option: &mut ChoiceElements,
    ) -> Result<(), CodeGenError> {
        match item {
            SequenceItem::Element(e) => {
                if let Some(mut f) = self.lower_element(e)? {
                    let optional_before = f.min_occurs == 0;
                    // fields inside a choice become optional, presence is
                    // checked by the choice validator
                    if f.cardinality() == Cardinality::Mandatory {
                        f.min_occurs = 0;
                    }
                    f.name_postfix = format!("_choice{}", join_path(path));
                    fields.push(f);
                    option.push(ChoiceItem::Leaf {
                        field_index: fields.len() - 1,
                        optional_before,
                    });
                }
            }
            SequenceItem::Sequence(s) => {
                for sub in &s.items {
                    self.lower_choice_option(sub, path, fields, option)?;
                }
            }
            SequenceItem::Choice(inner) => {
                option.push(ChoiceItem::Nested(self.lower_choice(inner, path, fields)?));
            }
            SequenceItem::Any(a) => {
                return Err(CodeGenError::not_implemented(
                    "Generating fields for any",
                    &a.xpath,
                ))
            }
        }
        Ok(())
    }

    fn lower_element(&self, e: &schema::Element) -> Result<Option<Field>, CodeGenError> {
        if e.min_occurs == 0 && e.max_occurs == 0 {
            warn!(
                "Element {} with type {} was omitted as minOccurs and maxOccurs are both zero",
                e.name, e.r#type
            );
            return Ok(None);
        }

        let valid = (e.min_occurs == 0 && e.max_occurs == 1)
            || (e.min_occurs == 1 && e.max_occurs == 1)
            || e.max_occurs > 1;
        if !valid {
            return Err(CodeGenError::build(format!(
                "Invalid cardinalities, min: {}, max: {}",
                e.min_occurs, e.max_occurs
            )));
        }

        Ok(Some(Field {
            origin_xpath: e.xpath.clone(),
            cpacs_name: e.name.clone(),
            type_name: self.resolve_type(&e.r#type)?,
            xml_type_name: e.r#type.clone(),
            xml_type: XmlConstruct::Element,
            min_occurs: e.min_occurs,
            max_occurs: e.max_occurs,
            default_value: e.default_value.clone(),
            name_postfix: String::new(),
            documentation: e.documentation.clone(),
        }))
    }
}

fn content_contains_sequence(content: &ContentModel) -> bool {
    match content {
        ContentModel::Sequence(_) => true,
        ContentModel::Choice(c) => items_contain_sequence(&c.items),
        _ => false,
    }
}

fn items_contain_sequence(items: &[SequenceItem]) -> bool {
    items.iter().any(|item| match item {
        SequenceItem::Sequence(_) => true,
        SequenceItem::Choice(c) => items_contain_sequence(&c.items),
        _ => false,
    })
}

fn join_path(path: &[usize]) -> String {
    path.iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("_")
}

fn shift_choice_indices(items: &mut ChoiceElements, by: usize) {
    for item in items {
        match item {
            ChoiceItem::Leaf { field_index, .. } => *field_index += by,
            ChoiceItem::Nested(c) => {
                for option in &mut c.options {
                    shift_choice_indices(option, by);
                }
            }
        }
    }
}

fn collect_leaf_indices(choice: &Choice, out: &mut Vec<usize>) {
    for option in &choice.options {
        collect_leaf_indices_of(option, out);
    }
}

fn collect_leaf_indices_of(items: &ChoiceElements, out: &mut Vec<usize>) {
    for item in items {
        match item {
            ChoiceItem::Leaf { field_index, .. } => out.push(*field_index),
            ChoiceItem::Nested(c) => collect_leaf_indices(c, out),
        }
    }
}

/// Two fields with the same name but different types or cardinality inside
/// one choice make presence checks ambiguous.
fn check_choice_consistency(choice: &Choice, fields: &[Field]) {
    let mut indices = Vec::new();
    collect_leaf_indices(choice, &mut indices);

    for (n, &i) in indices.iter().enumerate() {
        for &j in &indices[n + 1..] {
            let f1 = &fields[i];
            let f2 = &fields[j];
            if f1.cpacs_name == f2.cpacs_name
                && (f1.cardinality() != f2.cardinality() || f1.type_name != f2.type_name)
            {
                warn!("Elements with same name but different cardinality or type inside choice");
                for f in [f1, f2] {
                    warn!("{} {} {}", f.cpacs_name, f.cardinality(), f.type_name);
                }
            }
        }
    }
}

fn sort_unique(v: &mut Vec<String>) {
    v.sort();
    v.dedup();
}

/// Rebuild all dependency back-edges. With `only_unpruned`, pruned classes
/// contribute no edges, so surviving classes never point at pruned ones.
pub(crate) fn build_dependencies(
    types: &mut TypeSystem,
    only_unpruned: bool,
) -> Result<(), CodeGenError> {
    info!("Building dependencies");

    for c in types.classes.values_mut() {
        c.deps = ClassDependencies::default();
    }
    for e in types.enums.values_mut() {
        e.deps = EnumDependencies::default();
    }

    let mut base_edges = Vec::new();
    let mut child_edges = Vec::new();
    let mut enum_edges = Vec::new();

    for (name, c) in &types.classes {
        if only_unpruned && c.pruned {
            continue;
        }

        if !c.base.is_empty() {
            if types.classes.contains_key(&c.base) {
                base_edges.push((name.clone(), c.base.clone()));
            } else {
                // this should be prevented by earlier phases
                return Err(CodeGenError::build(format!(
                    "Class {} has non-class base: {}",
                    name, c.base
                )));
            }
        }

        for f in &c.fields {
            if types.enums.contains_key(&f.type_name) {
                enum_edges.push((name.clone(), f.type_name.clone()));
            } else if types.classes.contains_key(&f.type_name) {
                child_edges.push((name.clone(), f.type_name.clone()));
            }
        }
    }

    for (derived, base) in base_edges {
        types
            .classes
            .get_mut(&derived)
            .unwrap()
            .deps
            .bases
            .push(base.clone());
        types.classes.get_mut(&base).unwrap().deps.deriveds.push(derived);
    }
    for (parent, child) in child_edges {
        types
            .classes
            .get_mut(&parent)
            .unwrap()
            .deps
            .children
            .push(child.clone());
        types.classes.get_mut(&child).unwrap().deps.parents.push(parent);
    }
    for (parent, e) in enum_edges {
        types
            .classes
            .get_mut(&parent)
            .unwrap()
            .deps
            .enum_children
            .push(e.clone());
        types.enums.get_mut(&e).unwrap().deps.parents.push(parent);
    }

    for c in types.classes.values_mut() {
        sort_unique(&mut c.deps.bases);
        sort_unique(&mut c.deps.deriveds);
        sort_unique(&mut c.deps.parents);
        sort_unique(&mut c.deps.children);
        sort_unique(&mut c.deps.enum_children);
    }
    for e in types.enums.values_mut() {
        sort_unique(&mut e.deps.parents);
    }

    Ok(())
}

/// Normalization applied to enum names before collapsing. Synthesized
/// names are of the form `<containing type>_<element>[_SimpleContent][_<n>]`.
fn strip_number(name: &str) -> String {
    let mut name = name
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .to_owned();
    if name.ends_with('_') {
        name.pop();
    }

    let name = strip_simple_content_suffix(&name);

    // if the name contains an underscore, remove the preceding part
    let name = match name.rfind('_') {
        Some(pos) => &name[pos + 1..],
        None => name,
    };

    let capitalized = capitalize_first(name);
    let stripped = strip_type_suffix(&capitalized);

    if stripped.starts_with("CPACS") {
        stripped.to_owned()
    } else {
        format!("CPACS{stripped}")
    }
}

/// Merge enums that carry the same values under compatible names.
fn collapse_enums(types: &mut TypeSystem) {
    info!("Collapsing enums");

    let mut enum_vec: Vec<Enum> = types.enums.values().cloned().collect();
    let mut replaced: HashMap<String, String> = HashMap::new();

    let mut i = 0;
    while i < enum_vec.len() {
        let mut j = i + 1;
        while j < enum_vec.len() {
            let matches = enum_vec[i].values.len() == enum_vec[j].values.len()
                && strip_number(&enum_vec[i].name) == strip_number(&enum_vec[j].name)
                && enum_vec[i].values == enum_vec[j].values;

            if matches {
                let stripped = strip_number(&enum_vec[i].name);
                // if the stripped name is not already taken, use it,
                // otherwise take the smaller of the two enum names
                let new_name = if !types.classes.contains_key(&stripped)
                    && !types.enums.contains_key(&stripped)
                {
                    stripped
                } else {
                    enum_vec[i].name.clone().min(enum_vec[j].name.clone())
                };

                if enum_vec[i].name != new_name {
                    replaced.insert(enum_vec[i].name.clone(), new_name.clone());
                }
                if enum_vec[j].name != new_name {
                    replaced.insert(enum_vec[j].name.clone(), new_name.clone());
                }

                info!(
                    "\t{} and {} to {}",
                    enum_vec[i].name, enum_vec[j].name, new_name
                );

                enum_vec.remove(j);
                enum_vec[i].name = new_name;
            } else {
                j += 1;
            }
        }
        i += 1;
    }

    // resolve replacement chains created by repeated merges
    let keys: Vec<String> = replaced.keys().cloned().collect();
    for k in keys {
        let mut target = replaced[&k].clone();
        let mut seen = HashSet::new();
        while let Some(next) = replaced.get(&target) {
            if !seen.insert(target.clone()) {
                break;
            }
            target = next.clone();
        }
        replaced.insert(k, target);
    }

    types.enums.clear();
    for e in enum_vec {
        types.enums.insert(e.name.clone(), e);
    }

    for c in types.classes.values_mut() {
        for f in &mut c.fields {
            if let Some(r) = replaced.get(&f.type_name) {
                f.type_name = r.clone();
            }
        }
    }
}

/// Give values shared between distinct enums an enum-qualified name.
fn disambiguate_enum_values(types: &mut TypeSystem) -> Result<(), CodeGenError> {
    let mut owners: HashMap<String, HashSet<String>> = HashMap::new();
    for (name, e) in &types.enums {
        for v in &e.values {
            owners
                .entry(v.cpacs_name.clone())
                .or_default()
                .insert(name.clone());
        }
    }

    for (value, enum_names) in &owners {
        if enum_names.len() < 2 {
            continue;
        }
        for enum_name in enum_names {
            let e = types.enums.get_mut(enum_name).unwrap();
            for v in &mut e.values {
                if v.cpacs_name == *value {
                    v.custom_name = format!("{}_{}", e.name, v.cpacs_name);
                }
            }
        }
    }

    for e in types.enums.values() {
        let mut seen = HashSet::new();
        for v in &e.values {
            if !seen.insert(v.name().to_owned()) {
                return Err(CodeGenError::build(format!(
                    "Duplicate value {} in enum {}",
                    v.name(),
                    e.name
                )));
            }
        }
    }

    Ok(())
}

/// Mark every type pruned, then keep everything reachable from the root
/// types, halting at prune-listed names.
fn run_prune_list(
    types: &mut TypeSystem,
    roots: &[String],
    tables: &Tables,
) -> Result<(), CodeGenError> {
    info!("Running prune list");

    for c in types.classes.values_mut() {
        c.pruned = true;
    }
    for e in types.enums.values_mut() {
        e.pruned = true;
    }

    for root in roots {
        let root_name = make_class_name(root);
        if !types.classes.contains_key(&root_name) {
            return Err(CodeGenError::build(format!(
                "Could not find root element. Expected: {root_name}"
            )));
        }

        let mut stack = vec![root_name];
        while let Some(name) = stack.pop() {
            if let Some(c) = types.classes.get_mut(&name) {
                if !c.pruned {
                    continue;
                }
                // a prune-listed class stays pruned together with
                // everything only it reaches
                if tables.prune_list.contains(&name) {
                    continue;
                }
                c.pruned = false;
                stack.extend(c.deps.bases.iter().cloned());
                stack.extend(c.deps.children.iter().cloned());
                stack.extend(c.deps.enum_children.iter().cloned());
            } else if let Some(e) = types.enums.get_mut(&name) {
                if !e.pruned {
                    continue;
                }
                if tables.prune_list.contains(&name) {
                    continue;
                }
                e.pruned = false;
            }
        }
    }

    let mut pruned_report: Vec<String> = types
        .classes
        .values()
        .filter(|c| c.pruned)
        .map(|c| format!("Class: {}", c.name))
        .chain(
            types
                .enums
                .values()
                .filter(|e| e.pruned)
                .map(|e| format!("Enum: {}", e.name)),
        )
        .collect();
    pruned_report.sort();
    if !pruned_report.is_empty() {
        info!("The following types have been pruned:");
        for name in &pruned_report {
            info!("\t{name}");
        }
    }

    let pruned_names: HashSet<String> = types
        .classes
        .values()
        .filter(|c| c.pruned)
        .map(|c| c.name.clone())
        .chain(
            types
                .enums
                .values()
                .filter(|e| e.pruned)
                .map(|e| e.name.clone()),
        )
        .collect();

    // remove fields of pruned types and clear bases pointing at them,
    // keeping choice leaf indices in sync
    for c in types.classes.values_mut() {
        let mut index_map = Vec::with_capacity(c.fields.len());
        let mut next = 0usize;
        for f in &c.fields {
            if pruned_names.contains(&f.type_name) {
                index_map.push(None);
            } else {
                index_map.push(Some(next));
                next += 1;
            }
        }

        c.fields.retain(|f| !pruned_names.contains(&f.type_name));
        remap_choice_indices(&mut c.choices, &index_map);

        if pruned_names.contains(&c.base) {
            c.base.clear();
        }
    }

    build_dependencies(types, true)
}

fn remap_choice_indices(items: &mut ChoiceElements, index_map: &[Option<usize>]) {
    items.retain_mut(|item| match item {
        ChoiceItem::Leaf { field_index, .. } => match index_map[*field_index] {
            Some(new_index) => {
                *field_index = new_index;
                true
            }
            None => false,
        },
        ChoiceItem::Nested(c) => {
            for option in &mut c.options {
                remap_choice_indices(option, index_map);
            }
            c.options.retain(|o| !o.is_empty());
            !c.options.is_empty()
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_schema_str;

    fn build(text: &str) -> TypeSystem {
        let schema = parse_schema_str(text).unwrap();
        build_type_system(schema, &Tables::default()).unwrap()
    }

    #[test]
    fn class_names_are_mangled() {
        assert_eq!(make_class_name("wingType"), "CPACSWing");
        assert_eq!(make_class_name("wing"), "CPACSWing");
        assert_eq!(make_class_name(""), "");
    }

    #[test]
    fn lowers_sequence_to_fields_in_order() {
        let types = build(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="pointType">
        <xsd:sequence>
            <xsd:element name="x" type="xsd:double"/>
            <xsd:element name="y" type="xsd:double" minOccurs="0"/>
            <xsd:element name="tag" type="xsd:string" minOccurs="0" maxOccurs="unbounded"/>
        </xsd:sequence>
        <xsd:attribute name="uID" type="xsd:ID" use="required"/>
    </xsd:complexType>
    <xsd:element name="point" type="pointType"/>
</xsd:schema>"#,
        );

        let c = &types.classes["CPACSPoint"];
        let names: Vec<String> = c.fields.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["uID", "x", "y", "tags"]);
        assert_eq!(c.fields[0].cardinality(), Cardinality::Mandatory);
        assert_eq!(c.fields[2].cardinality(), Cardinality::Optional);
        assert_eq!(c.fields[3].cardinality(), Cardinality::Vector);
        assert!(c.contains_sequence);
        assert!(!c.pruned);
    }

    #[test]
    fn choice_fields_become_optional_with_postfixes() {
        let types = build(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:choice>
                <xsd:element name="left" type="xsd:string"/>
                <xsd:element name="right" type="xsd:string"/>
            </xsd:choice>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        );

        let c = &types.classes["CPACSRoot"];
        assert_eq!(c.fields.len(), 2);
        assert_eq!(c.fields[0].name(), "left_choice1");
        assert_eq!(c.fields[1].name(), "right_choice2");
        assert_eq!(c.fields[0].cardinality(), Cardinality::Optional);
        assert_eq!(c.fields[1].cardinality(), Cardinality::Optional);

        assert_eq!(c.choices.len(), 1);
        let ChoiceItem::Nested(choice) = &c.choices[0] else {
            panic!("expected nested choice");
        };
        assert_eq!(choice.options.len(), 2);
        assert_eq!(choice.min_occurs, 1);
        let ChoiceItem::Leaf {
            field_index,
            optional_before,
        } = &choice.options[0][0]
        else {
            panic!("expected leaf");
        };
        assert_eq!(*field_index, 0);
        assert!(!optional_before);
    }

    #[test]
    fn nested_choice_paths_join_indices() {
        let types = build(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:choice>
                <xsd:element name="a" type="xsd:string"/>
                <xsd:choice>
                    <xsd:element name="b" type="xsd:string" minOccurs="0"/>
                    <xsd:element name="c" type="xsd:string"/>
                </xsd:choice>
            </xsd:choice>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        );

        let c = &types.classes["CPACSRoot"];
        let names: Vec<String> = c.fields.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a_choice1", "b_choice2_1", "c_choice2_2"]);

        let ChoiceItem::Nested(outer) = &c.choices[0] else {
            panic!("expected nested choice");
        };
        let ChoiceItem::Nested(inner) = &outer.options[1][0] else {
            panic!("expected inner choice");
        };
        let ChoiceItem::Leaf {
            optional_before, ..
        } = &inner.options[0][0]
        else {
            panic!("expected leaf");
        };
        assert!(*optional_before);
    }

    #[test]
    fn simple_content_emits_content_field() {
        let types = build(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="namedType">
        <xsd:simpleContent>
            <xsd:extension base="xsd:string">
                <xsd:attribute name="unit" type="xsd:string"/>
            </xsd:extension>
        </xsd:simpleContent>
    </xsd:complexType>
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="named" type="namedType"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        );

        let c = &types.classes["CPACSNamed"];
        // attributes are lowered ahead of the content field
        let names: Vec<String> = c.fields.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["unit", "simpleContent"]);
        assert_eq!(c.fields[1].xml_type, XmlConstruct::SimpleContent);
        assert_eq!(c.fields[1].cardinality(), Cardinality::Mandatory);
        assert_eq!(c.fields[1].type_name, "std::string");
    }

    #[test]
    fn extension_of_fundamental_type_folds_base_field() {
        let types = build(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="derivedType">
        <xsd:complexContent>
            <xsd:extension base="xsd:string">
                <xsd:sequence>
                    <xsd:element name="extra" type="xsd:double"/>
                </xsd:sequence>
            </xsd:extension>
        </xsd:complexContent>
    </xsd:complexType>
    <xsd:element name="derived" type="derivedType"/>
</xsd:schema>"#,
        );

        let derived = &types.classes["CPACSDerived"];
        assert!(derived.base.is_empty());
        assert_eq!(derived.fields[0].name(), "base");
        assert_eq!(derived.fields[0].xml_type, XmlConstruct::FundamentalTypeBase);
        assert_eq!(derived.fields[0].type_name, "std::string");
        assert_eq!(derived.fields[1].name(), "extra");
    }

    #[test]
    fn class_base_keeps_inheritance_edges() {
        let types = build(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="baseType">
        <xsd:sequence>
            <xsd:element name="value" type="xsd:double"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="derivedType">
        <xsd:complexContent>
            <xsd:extension base="baseType">
                <xsd:sequence>
                    <xsd:element name="extra" type="xsd:double"/>
                </xsd:sequence>
            </xsd:extension>
        </xsd:complexContent>
    </xsd:complexType>
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="derived" type="derivedType"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        );

        let derived = &types.classes["CPACSDerived"];
        assert_eq!(derived.base, "CPACSBase");
        assert_eq!(derived.deps.bases, vec!["CPACSBase"]);
        assert_eq!(types.classes["CPACSBase"].deps.deriveds, vec!["CPACSDerived"]);
        assert!(!types.classes["CPACSBase"].pruned);
    }

    #[test]
    fn enums_collapse_and_fields_are_rewritten() {
        let types = build(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="aType">
        <xsd:sequence>
            <xsd:element name="mode">
                <xsd:simpleType>
                    <xsd:restriction base="xsd:string">
                        <xsd:enumeration value="on"/>
                        <xsd:enumeration value="off"/>
                    </xsd:restriction>
                </xsd:simpleType>
            </xsd:element>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="bType">
        <xsd:sequence>
            <xsd:element name="mode">
                <xsd:simpleType>
                    <xsd:restriction base="xsd:string">
                        <xsd:enumeration value="on"/>
                        <xsd:enumeration value="off"/>
                    </xsd:restriction>
                </xsd:simpleType>
            </xsd:element>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="a" type="aType"/>
            <xsd:element name="b" type="bType"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        );

        // a_modeType and b_modeType collapse into CPACSMode
        assert_eq!(types.enums.len(), 1);
        let e = types.enums.values().next().unwrap();
        assert_eq!(e.name, "CPACSMode");
        assert!(!e.pruned);

        for class in ["CPACSA", "CPACSB"] {
            let c = &types.classes[class];
            assert_eq!(c.fields[0].type_name, "CPACSMode");
            assert_eq!(c.deps.enum_children, vec!["CPACSMode"]);
        }
        assert_eq!(e.deps.parents, vec!["CPACSA", "CPACSB"]);
    }

    #[test]
    fn shared_enum_values_get_custom_names() {
        let types = build(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:simpleType name="leftRightType">
        <xsd:restriction base="xsd:string">
            <xsd:enumeration value="left"/>
            <xsd:enumeration value="right"/>
        </xsd:restriction>
    </xsd:simpleType>
    <xsd:simpleType name="sideType">
        <xsd:restriction base="xsd:string">
            <xsd:enumeration value="left"/>
            <xsd:enumeration value="right"/>
            <xsd:enumeration value="both"/>
        </xsd:restriction>
    </xsd:simpleType>
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="lr" type="leftRightType"/>
            <xsd:element name="side" type="sideType"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        );

        let lr = &types.enums["CPACSLeftRight"];
        assert_eq!(lr.values[0].name(), "CPACSLeftRight_left");
        assert_eq!(lr.values[0].cpacs_name, "left");
        let side = &types.enums["CPACSSide"];
        assert_eq!(side.values[1].name(), "CPACSSide_right");
        // value unique to one enum keeps its plain name
        assert_eq!(side.values[2].name(), "both");
    }

    #[test]
    fn unreachable_types_are_pruned_and_unreferenced() {
        let types = build(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="used" type="usedType"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="usedType">
        <xsd:sequence>
            <xsd:element name="value" type="xsd:double"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="unusedType">
        <xsd:sequence>
            <xsd:element name="value" type="xsd:double"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        );

        assert!(!types.classes["CPACSRoot"].pruned);
        assert!(!types.classes["CPACSUsed"].pruned);
        assert!(types.classes["CPACSUnused"].pruned);

        // no surviving class references the pruned one
        for c in types.classes.values().filter(|c| !c.pruned) {
            assert!(c.fields.iter().all(|f| f.type_name != "CPACSUnused"));
            assert!(!c.deps.children.contains(&"CPACSUnused".to_owned()));
        }
    }

    #[test]
    fn prune_sweep_is_idempotent() {
        let text = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="a" type="aType" minOccurs="0"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="aType">
        <xsd:sequence>
            <xsd:element name="root" type="rootType" minOccurs="0"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="unusedType">
        <xsd:sequence/>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#;
        let schema = parse_schema_str(text).unwrap();
        let roots = schema.roots.clone();
        let tables = Tables::default();
        let mut types = build_type_system(schema, &tables).unwrap();

        let first: Vec<(String, bool)> = types
            .classes
            .iter()
            .map(|(n, c)| (n.clone(), c.pruned))
            .collect();

        run_prune_list(&mut types, &roots, &tables).unwrap();

        let second: Vec<(String, bool)> = types
            .classes
            .iter()
            .map(|(n, c)| (n.clone(), c.pruned))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_root_is_fatal() {
        let schema = parse_schema_str(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:element name="root" type="xsd:string"/>
</xsd:schema>"#,
        )
        .unwrap();
        let err = build_type_system(schema, &Tables::default()).unwrap_err();
        assert!(err.to_string().contains("Could not find root element"));
    }

    #[test]
    fn unknown_type_reference_is_fatal() {
        let schema = parse_schema_str(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="a" type="nowhereType"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        )
        .unwrap();
        let err = build_type_system(schema, &Tables::default()).unwrap_err();
        assert!(err.to_string().contains("Unknown type: nowhereType"));
    }

    #[test]
    fn dependency_lists_are_sorted_and_unique() {
        let types = build(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="childType">
        <xsd:sequence>
            <xsd:element name="v" type="xsd:double"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="first" type="childType"/>
            <xsd:element name="second" type="childType"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        );

        let root = &types.classes["CPACSRoot"];
        assert_eq!(root.deps.children, vec!["CPACSChild"]);
        assert_eq!(types.classes["CPACSChild"].deps.parents, vec!["CPACSRoot"]);
    }
}
