//! The emitter: walks the resolved type system and produces one C++
//! declaration/implementation pair per class and one declaration per enum.

mod choicegen;
mod classgen;
mod enumgen;
mod graphviz;
mod includes;
mod readwrite;
mod writer;

pub use graphviz::write_graph_vis_file;
pub use writer::IndentingWriter;

use std::collections::HashSet;
use std::path::Path;

use crate::error::CodeGenError;
use crate::fs::Filesystem;
use crate::tables::Tables;
use crate::typesystem::{Cardinality, Class, Enum, Field, TypeSystem, XmlConstruct};

pub(crate) const TIXI_NAMESPACE: &str = "tixi";
pub(crate) const UID_MANAGER_CLASS: &str = "CTiglUIDManager";
pub(crate) const UNBOUNDED_CONSTANT: &str = "tixi::xsdUnbounded";
pub(crate) const UID_REF_TYPE: &str = "stringUIDBaseType";

/// Switches steering the shape of the generated code.
pub struct GeneratorOptions {
    /// Generate C++11 scoped enums instead of plain ones.
    pub scoped_enums: bool,
    /// Case-sensitive `stringTo<Enum>` conversion. The default is
    /// case-insensitive, some existing data sets rely on it.
    pub case_sensitive_string_to_enum: bool,
    /// Guard reads of optional class fields with try/catch, resetting the
    /// field on failure.
    pub try_catch_around_optional_class_reads: bool,
    /// Also generate default constructors for parent-pointered types.
    pub default_ctors_for_parent_pointer_types: bool,
    /// Give every class a parent pointer, not just the listed ones.
    pub all_types_get_parent_pointer: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            scoped_enums: false,
            case_sensitive_string_to_enum: false,
            try_catch_around_optional_class_reads: true,
            default_ctors_for_parent_pointer_types: false,
            all_types_get_parent_pointer: false,
        }
    }
}

/// Generate all files for `types` into `output_dir` through `fs`.
pub fn generate_code(
    output_dir: &Path,
    types: &TypeSystem,
    namespace: &str,
    tables: &Tables,
    options: &GeneratorOptions,
    fs: &mut Filesystem,
) -> Result<(), CodeGenError> {
    let generator = CodeGen {
        types,
        namespace: namespace.to_owned(),
        tables,
        options,
    };
    generator.write_files(output_dir, fs)
}

pub(crate) struct CodeGen<'a> {
    pub(crate) types: &'a TypeSystem,
    pub(crate) namespace: String,
    pub(crate) tables: &'a Tables,
    pub(crate) options: &'a GeneratorOptions,
}

impl CodeGen<'_> {
    fn write_files(&self, output_dir: &Path, fs: &mut Filesystem) -> Result<(), CodeGenError> {
        for c in self.types.classes.values() {
            let hpp_path = output_dir.join(format!("{}.h", c.name));
            let cpp_path = output_dir.join(format!("{}.cpp", c.name));
            if c.pruned {
                fs.remove_if_exists(&hpp_path)?;
                fs.remove_if_exists(&cpp_path)?;
                continue;
            }

            let mut hpp = IndentingWriter::new();
            let mut cpp = IndentingWriter::new();
            self.write_class(&mut hpp, &mut cpp, c)?;
            fs.new_file(hpp_path, hpp.into_string());
            fs.new_file(cpp_path, cpp.into_string());
        }

        for e in self.types.enums.values() {
            let hpp_path = output_dir.join(format!("{}.h", e.name));
            if e.pruned {
                fs.remove_if_exists(&hpp_path)?;
                continue;
            }

            let mut hpp = IndentingWriter::new();
            self.write_enum(&mut hpp, e);
            fs.new_file(hpp_path, hpp.into_string());
        }

        Ok(())
    }

    pub(crate) fn custom_replaced_type<'a>(&'a self, name: &'a str) -> &'a str {
        match self.tables.custom_types.find(name) {
            Some(replaced) => replaced.as_str(),
            None => name,
        }
    }

    pub(crate) fn custom_replaced_field_type<'a>(&'a self, field: &'a Field) -> &'a str {
        self.custom_replaced_type(&field.type_name)
    }

    pub(crate) fn requires_parent_pointer(&self, c: &Class) -> bool {
        !c.deps.parents.is_empty()
            && (self.tables.parent_pointers.contains(&c.name)
                || self.options.all_types_get_parent_pointer)
    }

    pub(crate) fn getter_setter_type(&self, field: &Field) -> String {
        let type_name = self.custom_replaced_field_type(field);
        match field.cardinality() {
            Cardinality::Optional => format!("boost::optional<{type_name}>"),
            Cardinality::Mandatory => type_name.to_owned(),
            Cardinality::Vector => {
                if self.types.is_class(&field.type_name) {
                    format!("std::vector<std::unique_ptr<{type_name}>>")
                } else {
                    format!("std::vector<{type_name}>")
                }
            }
        }
    }

    pub(crate) fn field_type(&self, field: &Field) -> String {
        self.getter_setter_type(field)
    }

    pub(crate) fn vector_inner_type(&self, field: &Field) -> Result<String, CodeGenError> {
        if field.cardinality() != Cardinality::Vector {
            return Err(CodeGenError::emit(
                "Requested vector inner type for non-vector type",
            ));
        }
        Ok(self.custom_replaced_field_type(field).to_owned())
    }

    pub(crate) fn enum_to_string_func(&self, e: &Enum) -> String {
        format!("{}ToString", self.custom_replaced_type(&e.name))
    }

    pub(crate) fn string_to_enum_func(&self, e: &Enum) -> String {
        format!(
            "stringTo{}",
            crate::typesystem::capitalize_first(self.custom_replaced_type(&e.name))
        )
    }

    pub(crate) fn uid_reference_fields<'c>(&self, c: &'c Class) -> Vec<&'c Field> {
        c.fields
            .iter()
            .filter(|f| f.xml_type_name == UID_REF_TYPE)
            .collect()
    }

    pub(crate) fn has_uid_field(&self, c: &Class) -> bool {
        c.fields.iter().any(|f| f.name() == "uID")
    }

    pub(crate) fn has_uid_ref_field(&self, c: &Class) -> bool {
        !self.uid_reference_fields(c).is_empty()
    }

    pub(crate) fn has_mandatory_uid_field(&self, c: &Class) -> bool {
        c.fields
            .iter()
            .any(|f| f.name() == "uID" && f.cardinality() == Cardinality::Mandatory)
    }

    pub(crate) fn has_inherited_uid_field(&self, c: &Class) -> bool {
        let mut visited = HashSet::new();
        self.has_inherited_uid_field_impl(c, &mut visited)
    }

    fn has_inherited_uid_field_impl(&self, c: &Class, visited: &mut HashSet<String>) -> bool {
        for base in &c.deps.bases {
            if !visited.insert(base.clone()) {
                continue;
            }
            if let Some(base_class) = self.types.classes.get(base) {
                if self.has_uid_field(base_class)
                    || self.has_inherited_uid_field_impl(base_class, visited)
                {
                    return true;
                }
            }
        }
        false
    }

    /// The uid manager is threaded through every class which has a uid or
    /// uid reference field itself or anywhere below itself.
    pub(crate) fn requires_uid_manager(&self, c: &Class) -> bool {
        let mut visited = HashSet::new();
        self.requires_uid_manager_impl(c, &mut visited)
    }

    fn requires_uid_manager_impl(&self, c: &Class, visited: &mut HashSet<String>) -> bool {
        if !visited.insert(c.name.clone()) {
            return false;
        }
        if self.has_uid_field(c) || self.has_uid_ref_field(c) {
            return true;
        }
        for name in c.deps.bases.iter().chain(c.deps.children.iter()) {
            if let Some(other) = self.types.classes.get(name) {
                if self.requires_uid_manager_impl(other, visited) {
                    return true;
                }
            }
        }
        false
    }

    pub(crate) fn requires_uid_manager_field(&self, c: &Class) -> bool {
        self.requires_uid_manager(c) && !self.has_inherited_uid_field(c)
    }

    pub(crate) fn format_max_occurs(&self, max_occurs: u32) -> String {
        if max_occurs == crate::schema::UNBOUNDED {
            UNBOUNDED_CONSTANT.to_owned()
        } else {
            max_occurs.to_string()
        }
    }

    /// Child element names, used for writing elements in sequence order.
    pub(crate) fn element_names(&self, c: &Class) -> Vec<String> {
        c.fields
            .iter()
            .filter(|f| f.xml_type == XmlConstruct::Element)
            .map(|f| f.cpacs_name.clone())
            .collect()
    }

    pub(crate) fn unique_child_elements(&self, c: &Class) -> bool {
        let names = self.element_names(c);
        let unique: HashSet<&String> = names.iter().collect();
        unique.len() == names.len()
    }

    pub(crate) fn is_attribute(&self, construct: XmlConstruct) -> bool {
        matches!(construct, XmlConstruct::Attribute)
    }

    pub(crate) fn xml_construct_to_string(&self, construct: XmlConstruct) -> &'static str {
        match construct {
            XmlConstruct::Attribute => "attribute",
            XmlConstruct::Element => "element",
            XmlConstruct::SimpleContent => "simpleContent",
            XmlConstruct::FundamentalTypeBase => "fundamental type base class",
        }
    }

    /// Constructor arguments for building a field of type `c` inside
    /// `parent_class`.
    pub(crate) fn ctor_argument_list(&self, c: &Class, parent_class: &Class) -> String {
        let mut arguments = Vec::new();
        if self.requires_parent_pointer(c) {
            arguments.push(self.parent_pointer_this(parent_class));
        }
        if self.requires_uid_manager(c) {
            arguments.push("m_uidMgr".to_owned());
        }
        arguments.join(", ")
    }

    pub(crate) fn parent_pointer_this(&self, c: &Class) -> String {
        match self.tables.custom_types.find(&c.name) {
            Some(custom) => format!("reinterpret_cast<{custom}*>(this)"),
            None => "this".to_owned(),
        }
    }
}
