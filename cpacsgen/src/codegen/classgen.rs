//! Emission of the per-class declaration and implementation files.

use crate::error::CodeGenError;
use crate::typesystem::{capitalize_first, Cardinality, Class, Field, XmlConstruct};

use super::includes::Includes;
use super::writer::IndentingWriter;
use super::{CodeGen, UID_MANAGER_CLASS, UID_REF_TYPE};

impl CodeGen<'_> {
    pub(crate) fn write_class(
        &self,
        hpp: &mut IndentingWriter,
        cpp: &mut IndentingWriter,
        c: &Class,
    ) -> Result<(), CodeGenError> {
        let includes = self.resolve_includes(c);
        self.write_header(hpp, c, &includes)?;
        self.write_source(cpp, c, &includes)?;
        Ok(())
    }

    pub(crate) fn write_license_header(&self, w: &mut IndentingWriter) {
        w.line("// Copyright (c) 2020 RISC Software GmbH");
        w.line("//");
        w.line("// This file was generated by CPACSGen from CPACS XML Schema (c) German Aerospace Center (DLR/SC).");
        w.line("// Do not edit, all changes are lost when files are re-generated.");
        w.line("//");
        w.line("// Licensed under the Apache License, Version 2.0 (the \"License\")");
        w.line("// you may not use this file except in compliance with the License.");
        w.line("// You may obtain a copy of the License at");
        w.line("//");
        w.line("//     http://www.apache.org/licenses/LICENSE-2.0");
        w.line("//");
        w.line("// Unless required by applicable law or agreed to in writing, software");
        w.line("// distributed under the License is distributed on an \"AS IS\" BASIS,");
        w.line("// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.");
        w.line("// See the License for the specific language governing permissions and");
        w.line("// limitations under the License.");
        w.empty_line();
    }

    pub(crate) fn write_documentation(&self, w: &mut IndentingWriter, documentation: &str) {
        if documentation.is_empty() {
            return;
        }
        for line in documentation.split('\n') {
            w.line(format!("/// {line}"));
        }
    }

    fn write_header(
        &self,
        hpp: &mut IndentingWriter,
        c: &Class,
        includes: &Includes,
    ) -> Result<(), CodeGenError> {
        self.write_license_header(hpp);

        hpp.line("#pragma once");
        hpp.empty_line();

        for inc in &includes.hpp_includes {
            hpp.line(format!("#include {inc}"));
        }
        if !includes.hpp_includes.is_empty() {
            hpp.empty_line();
        }

        hpp.line("namespace tigl");
        hpp.line("{");

        for fwd in &includes.hpp_custom_forwards {
            hpp.line(format!("class {fwd};"));
        }
        if !includes.hpp_custom_forwards.is_empty() {
            hpp.empty_line();
        }

        hpp.line("namespace generated");
        hpp.line("{");
        hpp.indent();

        if !self.namespace.is_empty() {
            hpp.line(format!("namespace {}", self.namespace));
            hpp.line("{");
            hpp.indent();
        }

        for fwd in &includes.hpp_forwards {
            hpp.line(format!("class {fwd};"));
        }
        if !includes.hpp_forwards.is_empty() {
            hpp.empty_line();
        }

        // meta information from schema
        hpp.line("// This class is used in:");
        for parent in &c.deps.parents {
            hpp.line(format!("// {parent}"));
        }
        if !c.deps.parents.is_empty() {
            hpp.empty_line();
        }

        self.write_documentation(hpp, &c.documentation);

        let mut base_clause = Vec::new();
        if !c.base.is_empty() {
            base_clause.push(format!("public {}", c.base));
        }
        if self.has_uid_field(c) {
            base_clause.push(format!(
                "public {}",
                if self.has_mandatory_uid_field(c) {
                    "CTiglReqUIDObject"
                } else {
                    "CTiglOptUIDObject"
                }
            ));
        }
        if self.has_uid_ref_field(c) {
            base_clause.push("public ITiglUIDRefObject".to_owned());
        }
        if base_clause.is_empty() {
            hpp.line(format!("class {}", c.name));
        } else {
            hpp.line(format!("class {} : {}", c.name, base_clause.join(", ")));
        }
        hpp.line("{");
        hpp.line("public:");
        hpp.scope(|hpp| -> Result<(), CodeGenError> {
            self.write_ctors(hpp, c);
            self.write_dtor(hpp, c);
            self.write_parent_pointer_getters(hpp, c);
            self.write_uid_manager_getters(hpp, c);
            self.write_io_declarations(hpp);
            self.write_choice_validator_declaration(hpp, c);
            self.write_accessor_declarations(hpp, c)?;
            self.write_tree_manipulator_declarations(hpp, c)?;
            Ok(())
        })?;
        hpp.line("protected:");
        hpp.scope(|hpp| {
            self.write_parent_pointer_fields(hpp, c);
            self.write_uid_manager_fields(hpp, c);
            self.write_fields(hpp, c);
        });
        hpp.line("private:");
        hpp.scope(|hpp| {
            if self.has_uid_ref_field(c) {
                self.write_uid_ref_object_function_declarations(hpp);
            }
            self.write_deleted_ctor_and_assign(hpp, c);
        });
        hpp.line("};");

        if !self.namespace.is_empty() {
            hpp.outdent();
            hpp.line("}");
        }

        hpp.outdent();
        hpp.line("} // namespace generated");
        hpp.empty_line();

        // export non-custom types into the tigl namespace
        let generated_ns = if self.namespace.is_empty() {
            "generated".to_owned()
        } else {
            format!("generated::{}", self.namespace)
        };

        let mut exported_types = Vec::new();
        match self.tables.custom_types.find(&c.name) {
            Some(custom) => {
                hpp.line(format!(
                    "// {} is customized, use type {} directly",
                    c.name, custom
                ));
                if !includes.hpp_forwards.is_empty() {
                    hpp.empty_line();
                }
            }
            None => exported_types.push(c.name.clone()),
        }
        for fwd in &includes.hpp_forwards {
            exported_types.push(fwd.clone());
        }

        if !exported_types.is_empty() {
            hpp.line("// Aliases in tigl namespace");

            if !self.namespace.is_empty() {
                hpp.line(format!("namespace {}", self.namespace));
                hpp.line("{");
                hpp.indent();
            }
            for name in &exported_types {
                hpp.line(format!("using C{name} = {generated_ns}::{name};"));
            }
            if !self.namespace.is_empty() {
                hpp.outdent();
                hpp.line("}");
            }
        }

        hpp.line("} // namespace tigl");
        hpp.empty_line();
        Ok(())
    }

    fn write_source(
        &self,
        cpp: &mut IndentingWriter,
        c: &Class,
        includes: &Includes,
    ) -> Result<(), CodeGenError> {
        self.write_license_header(cpp);

        for inc in &includes.cpp_includes {
            cpp.line(format!("#include {inc}"));
        }
        if !includes.cpp_includes.is_empty() {
            cpp.empty_line();
        }

        cpp.line("namespace tigl");
        cpp.line("{");
        cpp.line("namespace generated");
        cpp.line("{");
        cpp.indent();

        if !self.namespace.is_empty() {
            cpp.line(format!("namespace {}", self.namespace));
            cpp.line("{");
            cpp.indent();
        }

        self.write_ctor_implementations(cpp, c);
        self.write_dtor_implementation(cpp, c);
        self.write_parent_pointer_getter_implementation(cpp, c);
        self.write_uid_manager_getter_implementation(cpp, c);
        self.write_read_implementation(cpp, c)?;
        self.write_write_implementation(cpp, c)?;
        self.write_choice_validator_implementation(cpp, c)?;
        self.write_accessor_implementations(cpp, c)?;
        self.write_tree_manipulator_implementations(cpp, c)?;
        if self.has_uid_ref_field(c) {
            self.write_uid_ref_object_function_implementations(cpp, c);
        }

        if !self.namespace.is_empty() {
            cpp.outdent();
            cpp.line("}");
        }

        cpp.outdent();
        cpp.line("} // namespace generated");
        cpp.line("} // namespace tigl");
        cpp.empty_line();
        Ok(())
    }

    fn write_ctors(&self, hpp: &mut IndentingWriter, c: &Class) {
        let has_uid = self.requires_uid_manager(c);
        let uid_arg = if has_uid {
            format!("{UID_MANAGER_CLASS}* uidMgr")
        } else {
            String::new()
        };
        if self.requires_parent_pointer(c) {
            if self.options.default_ctors_for_parent_pointer_types {
                hpp.line(format!("TIGL_EXPORT {}({uid_arg});", c.name));
            }
            for parent in &c.deps.parents {
                let parent_type = self.custom_replaced_type(parent);
                let uid_part = if has_uid {
                    format!(", {UID_MANAGER_CLASS}* uidMgr")
                } else {
                    String::new()
                };
                hpp.line(format!(
                    "TIGL_EXPORT {}({parent_type}* parent{uid_part});",
                    c.name
                ));
            }
            hpp.empty_line();
        } else {
            hpp.line(format!("TIGL_EXPORT {}({uid_arg});", c.name));
        }
    }

    fn write_dtor(&self, hpp: &mut IndentingWriter, c: &Class) {
        hpp.line(format!("TIGL_EXPORT virtual ~{}();", c.name));
        hpp.empty_line();
    }

    fn initialization_list(&self, c: &Class) -> Vec<String> {
        let mut initializers = Vec::new();

        for base in &c.deps.bases {
            if let Some(base_class) = self.types.classes.get(base) {
                if self.requires_uid_manager(base_class) {
                    initializers.push(format!("{base}(uidMgr)"));
                }
            }
        }
        if self.requires_uid_manager_field(c) {
            initializers.push("m_uidMgr(uidMgr)".to_owned());
        }
        for f in &c.fields {
            if f.cardinality() != Cardinality::Mandatory {
                continue;
            }
            if self.tables.fundamental_types.contains(&f.type_name) {
                let mut args = f.default_value.clone();
                if !args.is_empty() && f.type_name == "std::string" {
                    args = format!("\"{args}\"");
                } else if args.is_empty() && f.type_name != "std::string" {
                    // zero-initialize non-string fundamentals
                    args = "0".to_owned();
                }
                if !args.is_empty() {
                    initializers.push(format!("{}({args})", f.field_name()));
                }
            } else if let Some(field_class) = self.types.classes.get(&f.type_name) {
                let args = self.ctor_argument_list(field_class, c);
                if !args.is_empty() {
                    initializers.push(format!("{}({args})", f.field_name()));
                }
            }
        }

        initializers
    }

    fn write_initialization_list(&self, cpp: &mut IndentingWriter, c: &Class) {
        let initializers = self.initialization_list(c);
        cpp.scope(|cpp| {
            for (i, init) in initializers.iter().enumerate() {
                if i == 0 {
                    cpp.line(format!(": {init}"));
                } else {
                    cpp.line(format!(", {init}"));
                }
            }
        });
    }

    fn write_ctor_implementations(&self, cpp: &mut IndentingWriter, c: &Class) {
        let has_uid_argument = self.requires_uid_manager(c);
        let uid_arg = if has_uid_argument {
            format!("{UID_MANAGER_CLASS}* uidMgr")
        } else {
            String::new()
        };

        if self.requires_parent_pointer(c) {
            if self.options.default_ctors_for_parent_pointer_types {
                cpp.line(format!("{}::{}({uid_arg})", c.name, c.name));
                self.write_initialization_list(cpp, c);
                cpp.line("{");
                cpp.scope(|cpp| {
                    cpp.line("m_parent = NULL;");
                    if c.deps.parents.len() > 1 {
                        cpp.line("m_parentType = NULL;");
                    }
                });
                cpp.line("}");
                cpp.empty_line();
            }
            for parent in &c.deps.parents {
                let parent_type = self.custom_replaced_type(parent).to_owned();
                let uid_part = if has_uid_argument {
                    format!(", {UID_MANAGER_CLASS}* uidMgr")
                } else {
                    String::new()
                };
                cpp.line(format!(
                    "{}::{}({parent_type}* parent{uid_part})",
                    c.name, c.name
                ));
                self.write_initialization_list(cpp, c);
                cpp.line("{");
                cpp.scope(|cpp| {
                    cpp.line("//assert(parent != NULL);");
                    cpp.line("m_parent = parent;");
                    if c.deps.parents.len() > 1 {
                        cpp.line(format!("m_parentType = &typeid({parent_type});"));
                    }
                });
                cpp.line("}");
                cpp.empty_line();
            }
        } else {
            cpp.line(format!("{}::{}({uid_arg})", c.name, c.name));
            self.write_initialization_list(cpp, c);
            cpp.line("{");
            cpp.line("}");
            cpp.empty_line();
        }
    }

    fn write_dtor_implementation(&self, cpp: &mut IndentingWriter, c: &Class) {
        cpp.line(format!("{}::~{}()", c.name, c.name));
        cpp.line("{");
        cpp.scope(|cpp| {
            if self.has_uid_field(c) {
                if self.has_mandatory_uid_field(c) {
                    cpp.line("if (m_uidMgr) m_uidMgr->TryUnregisterObject(m_uID);");
                } else {
                    cpp.line("if (m_uidMgr && m_uID) m_uidMgr->TryUnregisterObject(*m_uID);");
                }
            }

            let uid_ref_fields = self.uid_reference_fields(c);
            if !uid_ref_fields.is_empty() {
                cpp.line("if (m_uidMgr) {");
                cpp.scope(|cpp| {
                    for f in &uid_ref_fields {
                        let field = f.field_name();
                        match f.cardinality() {
                            Cardinality::Optional => cpp.line(format!(
                                "if ({field} && !{field}->empty()) m_uidMgr->TryUnregisterReference(*{field}, *this);"
                            )),
                            Cardinality::Vector => {
                                cpp.line(format!(
                                    "for (std::vector<{}>::iterator it = {field}.begin(); it != {field}.end(); ++it) {{",
                                    f.type_name
                                ));
                                cpp.scope(|cpp| {
                                    cpp.line("if (!it->empty()) m_uidMgr->TryUnregisterReference(*it, *this);");
                                });
                                cpp.line("}");
                            }
                            Cardinality::Mandatory => cpp.line(format!(
                                "if (!{field}.empty()) m_uidMgr->TryUnregisterReference({field}, *this);"
                            )),
                        }
                    }
                });
                cpp.line("}");
            }
        });
        cpp.line("}");
        cpp.empty_line();
    }

    fn write_parent_pointer_getters(&self, hpp: &mut IndentingWriter, c: &Class) {
        if !self.requires_parent_pointer(c) {
            return;
        }

        if c.deps.parents.len() > 1 {
            hpp.line("template<typename P>");
            hpp.line("bool IsParent() const");
            hpp.line("{");
            hpp.scope(|hpp| {
                hpp.line("return m_parentType != NULL && *m_parentType == typeid(P);");
            });
            hpp.line("}");
            hpp.empty_line();
        }

        for is_const in [false, true] {
            if c.deps.parents.len() > 1 {
                hpp.line("template<typename P>");
                if is_const {
                    hpp.line("const P* GetParent() const");
                } else {
                    hpp.line("P* GetParent()");
                }
                hpp.line("{");
                hpp.scope(|hpp| {
                    let condition = c
                        .deps
                        .parents
                        .iter()
                        .map(|p| format!("std::is_same<P, {}>::value", self.custom_replaced_type(p)))
                        .collect::<Vec<_>>()
                        .join(" || ");
                    hpp.line(format!(
                        "static_assert({condition}, \"template argument for P is not a parent class of {}\");",
                        c.name
                    ));
                    if self.options.default_ctors_for_parent_pointer_types {
                        hpp.line("if (m_parent == NULL) {");
                        hpp.scope(|hpp| {
                            hpp.line("return NULL;");
                        });
                        hpp.line("}");
                    }
                    hpp.line("if (!IsParent<P>()) {");
                    hpp.scope(|hpp| {
                        hpp.line("throw CTiglError(\"bad parent\");");
                    });
                    hpp.line("}");
                    hpp.line("return static_cast<P*>(m_parent);");
                });
                hpp.line("}");
            } else {
                let parent_type = self.custom_replaced_type(&c.deps.parents[0]);
                if is_const {
                    hpp.line(format!("TIGL_EXPORT const {parent_type}* GetParent() const;"));
                } else {
                    hpp.line(format!("TIGL_EXPORT {parent_type}* GetParent();"));
                }
            }
            hpp.empty_line();
        }
    }

    fn write_parent_pointer_getter_implementation(&self, cpp: &mut IndentingWriter, c: &Class) {
        if !self.requires_parent_pointer(c) || c.deps.parents.len() != 1 {
            return;
        }

        let parent_type = self.custom_replaced_type(&c.deps.parents[0]).to_owned();
        for is_const in [true, false] {
            if is_const {
                cpp.line(format!(
                    "const {parent_type}* {}::GetParent() const",
                    c.name
                ));
            } else {
                cpp.line(format!("{parent_type}* {}::GetParent()", c.name));
            }
            cpp.line("{");
            cpp.scope(|cpp| {
                cpp.line("return m_parent;");
            });
            cpp.line("}");
            cpp.empty_line();
        }
    }

    fn write_uid_manager_getters(&self, hpp: &mut IndentingWriter, c: &Class) {
        hpp.line("TIGL_EXPORT virtual CTiglUIDObject* GetNextUIDParent();");
        hpp.line("TIGL_EXPORT virtual const CTiglUIDObject* GetNextUIDParent() const;");
        hpp.empty_line();
        if self.requires_uid_manager_field(c) {
            hpp.line(format!("TIGL_EXPORT {UID_MANAGER_CLASS}& GetUIDManager();"));
            hpp.line(format!(
                "TIGL_EXPORT const {UID_MANAGER_CLASS}& GetUIDManager() const;"
            ));
            hpp.empty_line();
        }
    }

    fn write_uid_manager_getter_implementation(&self, cpp: &mut IndentingWriter, c: &Class) {
        for is_const in [true, false] {
            if is_const {
                cpp.line(format!(
                    "const CTiglUIDObject* {}::GetNextUIDParent() const",
                    c.name
                ));
            } else {
                cpp.line(format!("CTiglUIDObject* {}::GetNextUIDParent()", c.name));
            }
            cpp.line("{");
            cpp.scope(|cpp| {
                let parents = &c.deps.parents;
                if parents.is_empty() || !self.requires_parent_pointer(c) {
                    cpp.line("return nullptr;");
                } else if parents.len() == 1 {
                    let parent = &self.types.classes[&parents[0]];
                    if self.has_mandatory_uid_field(parent) {
                        cpp.line("return m_parent;");
                    } else {
                        cpp.line("if (m_parent) {");
                        cpp.scope(|cpp| {
                            if self.has_uid_field(parent) {
                                cpp.line("if (m_parent->GetUID())");
                                cpp.scope(|cpp| {
                                    cpp.line("return m_parent;");
                                });
                                cpp.line("else");
                                cpp.scope(|cpp| {
                                    cpp.line("return m_parent->GetNextUIDParent();");
                                });
                            } else {
                                cpp.line("return m_parent->GetNextUIDParent();");
                            }
                        });
                        cpp.line("}");
                        cpp.line("return nullptr;");
                    }
                } else {
                    cpp.line("if (m_parent) {");
                    cpp.scope(|cpp| {
                        for parent_name in parents {
                            let parent = &self.types.classes[parent_name];
                            let parent_type = self.custom_replaced_type(parent_name);
                            cpp.line(format!("if (IsParent<{parent_type}>()) {{"));
                            cpp.scope(|cpp| {
                                if self.has_mandatory_uid_field(parent) {
                                    cpp.line(format!("return GetParent<{parent_type}>();"));
                                } else if self.has_uid_field(parent) {
                                    cpp.line(format!("if (GetParent<{parent_type}>()->GetUID())"));
                                    cpp.scope(|cpp| {
                                        cpp.line(format!("return GetParent<{parent_type}>();"));
                                    });
                                    cpp.line("else");
                                    cpp.scope(|cpp| {
                                        cpp.line(format!(
                                            "return GetParent<{parent_type}>()->GetNextUIDParent();"
                                        ));
                                    });
                                } else {
                                    cpp.line(format!(
                                        "return GetParent<{parent_type}>()->GetNextUIDParent();"
                                    ));
                                }
                            });
                            cpp.line("}");
                        }
                    });
                    cpp.line("}");
                    cpp.line("return nullptr;");
                }
            });
            cpp.line("}");
            cpp.empty_line();
        }

        if self.requires_uid_manager_field(c) {
            for is_const in [false, true] {
                if is_const {
                    cpp.line(format!(
                        "const {UID_MANAGER_CLASS}& {}::GetUIDManager() const",
                        c.name
                    ));
                } else {
                    cpp.line(format!("{UID_MANAGER_CLASS}& {}::GetUIDManager()", c.name));
                }
                cpp.line("{");
                cpp.scope(|cpp| {
                    cpp.line("if (!m_uidMgr) {");
                    cpp.scope(|cpp| {
                        cpp.line("throw CTiglError(\"UIDManager is null\");");
                    });
                    cpp.line("}");
                    cpp.line("return *m_uidMgr;");
                });
                cpp.line("}");
                cpp.empty_line();
            }
        }
    }

    fn write_io_declarations(&self, hpp: &mut IndentingWriter) {
        hpp.line("TIGL_EXPORT virtual void ReadCPACS(const TixiDocumentHandle& tixiHandle, const std::string& xpath);");
        hpp.line("TIGL_EXPORT virtual void WriteCPACS(const TixiDocumentHandle& tixiHandle, const std::string& xpath) const;");
        hpp.empty_line();
    }

    fn write_choice_validator_declaration(&self, hpp: &mut IndentingWriter, c: &Class) {
        if !c.choices.is_empty() {
            hpp.line("TIGL_EXPORT bool ValidateChoices() const;");
            hpp.empty_line();
        }
    }

    fn write_accessor_declarations(
        &self,
        hpp: &mut IndentingWriter,
        c: &Class,
    ) -> Result<(), CodeGenError> {
        for f in &c.fields {
            let getter_type = self.getter_setter_type(f);
            let name = capitalize_first(&f.name());
            hpp.line(format!(
                "TIGL_EXPORT virtual const {getter_type}& Get{name}() const;"
            ));

            let is_class_type = self.types.is_class(&f.type_name);
            if !is_class_type && f.cardinality() != Cardinality::Vector {
                // setters only for fundamental and enum types
                hpp.line(format!(
                    "TIGL_EXPORT virtual void Set{name}(const {getter_type}& value);"
                ));
            } else if f.cardinality() == Cardinality::Vector && f.xml_type_name != UID_REF_TYPE {
                let inner = self.vector_inner_type(f)?;
                let element_name = capitalize_first(&f.cpacs_name);
                hpp.line(format!("TIGL_EXPORT virtual {getter_type}& Get{name}();"));
                hpp.line(format!("TIGL_EXPORT int Get{element_name}Count() const;"));
                hpp.line(format!(
                    "TIGL_EXPORT {inner}& Get{element_name}(int index) const;"
                ));
            } else if f.cardinality() == Cardinality::Vector && f.xml_type_name == UID_REF_TYPE {
                let inner = self.vector_inner_type(f)?;
                hpp.line(format!(
                    "TIGL_EXPORT virtual void AddTo{name}(const {inner}& value);"
                ));
                hpp.line(format!(
                    "TIGL_EXPORT virtual bool RemoveFrom{name}(const {inner}& value);"
                ));
            } else {
                hpp.line(format!("TIGL_EXPORT virtual {getter_type}& Get{name}();"));
            }
            hpp.empty_line();
        }
        Ok(())
    }

    fn write_uid_setter_registration(&self, cpp: &mut IndentingWriter, f: &Field) {
        if f.name() != "uID" {
            return;
        }
        let is_optional = f.cardinality() == Cardinality::Optional;
        cpp.line("if (m_uidMgr && value != m_uID) {");
        cpp.scope(|cpp| {
            if is_optional {
                cpp.line("if (!m_uID && value) {");
                cpp.scope(|cpp| {
                    cpp.line("m_uidMgr->RegisterObject(*value, *this);");
                });
                cpp.line("}");
                cpp.line("else if (m_uID && !value) {");
                cpp.scope(|cpp| {
                    cpp.line("m_uidMgr->TryUnregisterObject(*m_uID);");
                });
                cpp.line("}");
                cpp.line("else if (m_uID && value) {");
                cpp.scope(|cpp| {
                    cpp.line("m_uidMgr->UpdateObjectUID(*m_uID, *value);");
                });
                cpp.line("}");
            } else {
                cpp.line("if (m_uID.empty()) {");
                cpp.scope(|cpp| {
                    cpp.line("m_uidMgr->RegisterObject(value, *this);");
                });
                cpp.line("}");
                cpp.line("else {");
                cpp.scope(|cpp| {
                    cpp.line("m_uidMgr->UpdateObjectUID(m_uID, value);");
                });
                cpp.line("}");
            }
        });
        cpp.line("}");
    }

    fn write_uid_reference_setter_registration(&self, cpp: &mut IndentingWriter, f: &Field) {
        if f.xml_type_name != UID_REF_TYPE {
            return;
        }
        let field = f.field_name();
        let is_optional = f.cardinality() == Cardinality::Optional;
        cpp.line("if (m_uidMgr) {");
        cpp.scope(|cpp| {
            if is_optional {
                cpp.line(format!(
                    "if ({field} && !{field}->empty()) m_uidMgr->TryUnregisterReference(*{field}, *this);"
                ));
                cpp.line("if (value && !value->empty()) m_uidMgr->RegisterReference(*value, *this);");
            } else {
                cpp.line(format!(
                    "if (!{field}.empty()) m_uidMgr->TryUnregisterReference({field}, *this);"
                ));
                cpp.line("if (!value.empty()) m_uidMgr->RegisterReference(value, *this);");
            }
        });
        cpp.line("}");
    }

    fn write_accessor_implementations(
        &self,
        cpp: &mut IndentingWriter,
        c: &Class,
    ) -> Result<(), CodeGenError> {
        for f in &c.fields {
            let getter_type = self.getter_setter_type(f);
            let name = capitalize_first(&f.name());
            let field = f.field_name();

            cpp.line(format!(
                "const {getter_type}& {}::Get{name}() const",
                c.name
            ));
            cpp.line("{");
            cpp.scope(|cpp| {
                cpp.line(format!("return {field};"));
            });
            cpp.line("}");
            cpp.empty_line();

            let is_class_type = self.types.is_class(&f.type_name);
            if !is_class_type && f.cardinality() != Cardinality::Vector {
                cpp.line(format!(
                    "void {}::Set{name}(const {getter_type}& value)",
                    c.name
                ));
                cpp.line("{");
                cpp.scope(|cpp| {
                    self.write_uid_setter_registration(cpp, f);
                    self.write_uid_reference_setter_registration(cpp, f);
                    cpp.line(format!("{field} = value;"));
                });
                cpp.line("}");
            } else if f.cardinality() == Cardinality::Vector && f.xml_type_name != UID_REF_TYPE {
                let inner = self.vector_inner_type(f)?;
                let element_name = capitalize_first(&f.cpacs_name);

                cpp.line(format!("{getter_type}& {}::Get{name}()", c.name));
                cpp.line("{");
                cpp.scope(|cpp| {
                    cpp.line(format!("return {field};"));
                });
                cpp.line("}");
                cpp.empty_line();

                cpp.line(format!("int {}::Get{element_name}Count() const", c.name));
                cpp.line("{");
                cpp.scope(|cpp| {
                    cpp.line(format!("return static_cast<int>({field}.size());"));
                });
                cpp.line("}");
                cpp.empty_line();

                cpp.line(format!(
                    "{inner}& {}::Get{element_name}(int index) const",
                    c.name
                ));
                cpp.line("{");
                cpp.scope(|cpp| {
                    cpp.line("index--;");
                    cpp.line(format!(
                        "if (index < 0 || index >= Get{element_name}Count()) {{"
                    ));
                    cpp.scope(|cpp| {
                        cpp.line(format!(
                            "throw CTiglError(\"Invalid index in {getter_type}::Get{element_name}\", TIGL_INDEX_ERROR);"
                        ));
                    });
                    cpp.line("}");
                    if is_class_type {
                        cpp.line(format!("return *{field}[index];"));
                    } else {
                        cpp.line(format!("return {field}[index];"));
                    }
                });
                cpp.line("}");
            } else if f.cardinality() == Cardinality::Vector && f.xml_type_name == UID_REF_TYPE {
                let inner = self.vector_inner_type(f)?;
                cpp.line(format!(
                    "void {}::AddTo{name}(const {inner}& value)",
                    c.name
                ));
                cpp.line("{");
                cpp.scope(|cpp| {
                    cpp.line("if (m_uidMgr) {");
                    cpp.scope(|cpp| {
                        cpp.line("if (!value.empty()) m_uidMgr->RegisterReference(value, *this);");
                    });
                    cpp.line("}");
                    cpp.line(format!("{field}.push_back(value);"));
                });
                cpp.line("}");
                cpp.empty_line();
                cpp.line(format!(
                    "bool {}::RemoveFrom{name}(const {inner}& value)",
                    c.name
                ));
                cpp.line("{");
                cpp.scope(|cpp| {
                    cpp.line(format!(
                        "const auto it = std::find({field}.begin(), {field}.end(), value);"
                    ));
                    cpp.line(format!("if (it != {field}.end()) {{"));
                    cpp.scope(|cpp| {
                        cpp.line("if (m_uidMgr && !it->empty()) {");
                        cpp.scope(|cpp| {
                            cpp.line("m_uidMgr->TryUnregisterReference(*it, *this);");
                        });
                        cpp.line("}");
                        cpp.line(format!("{field}.erase(it);"));
                        cpp.line("return true;");
                    });
                    cpp.line("}");
                    cpp.line("return false;");
                });
                cpp.line("}");
            } else {
                cpp.line(format!("{getter_type}& {}::Get{name}()", c.name));
                cpp.line("{");
                cpp.scope(|cpp| {
                    cpp.line(format!("return {field};"));
                });
                cpp.line("}");
            }
            cpp.empty_line();
        }
        Ok(())
    }

    fn write_tree_manipulator_declarations(
        &self,
        hpp: &mut IndentingWriter,
        c: &Class,
    ) -> Result<(), CodeGenError> {
        for f in &c.fields {
            if !self.types.is_class(&f.type_name) {
                continue;
            }
            if f.xml_type == XmlConstruct::Attribute
                || f.xml_type == XmlConstruct::FundamentalTypeBase
            {
                return Err(CodeGenError::emit(
                    "fields of class type cannot be attributes or fundamental type bases",
                ));
            }

            let field_type = self.custom_replaced_field_type(f);
            match f.cardinality() {
                Cardinality::Optional => {
                    let name = capitalize_first(&f.name());
                    hpp.line(format!(
                        "TIGL_EXPORT virtual {field_type}& Get{name}(CreateIfNotExistsTag);"
                    ));
                    hpp.line(format!("TIGL_EXPORT virtual void Remove{name}();"));
                    hpp.empty_line();
                }
                Cardinality::Vector => {
                    let name = capitalize_first(&f.name_without_vector_s());
                    hpp.line(format!("TIGL_EXPORT virtual {field_type}& Add{name}();"));
                    hpp.line(format!(
                        "TIGL_EXPORT virtual void Remove{name}({field_type}& ref);"
                    ));
                    hpp.empty_line();
                }
                Cardinality::Mandatory => {}
            }
        }
        Ok(())
    }

    fn write_tree_manipulator_implementations(
        &self,
        cpp: &mut IndentingWriter,
        c: &Class,
    ) -> Result<(), CodeGenError> {
        for f in &c.fields {
            let Some(field_class) = self.types.classes.get(&f.type_name) else {
                continue;
            };
            if f.xml_type == XmlConstruct::Attribute
                || f.xml_type == XmlConstruct::FundamentalTypeBase
            {
                return Err(CodeGenError::emit(
                    "fields of class type cannot be attributes or fundamental type bases",
                ));
            }

            let field_type = self.custom_replaced_field_type(f).to_owned();
            let field = f.field_name();
            let args = self.ctor_argument_list(field_class, c);
            match f.cardinality() {
                Cardinality::Optional => {
                    let name = capitalize_first(&f.name());
                    cpp.line(format!(
                        "{field_type}& {}::Get{name}(CreateIfNotExistsTag)",
                        c.name
                    ));
                    cpp.line("{");
                    cpp.scope(|cpp| {
                        cpp.line(format!("if (!{field})"));
                        cpp.scope(|cpp| {
                            cpp.line(format!("{field} = boost::in_place({args});"));
                        });
                        cpp.line(format!("return *{field};"));
                    });
                    cpp.line("}");
                    cpp.empty_line();
                    cpp.line(format!("void {}::Remove{name}()", c.name));
                    cpp.line("{");
                    cpp.scope(|cpp| {
                        cpp.line(format!("{field} = boost::none;"));
                    });
                    cpp.line("}");
                    cpp.empty_line();
                }
                Cardinality::Vector => {
                    let name = capitalize_first(&f.name_without_vector_s());
                    cpp.line(format!("{field_type}& {}::Add{name}()", c.name));
                    cpp.line("{");
                    cpp.scope(|cpp| {
                        cpp.line(format!(
                            "{field}.push_back(make_unique<{field_type}>({args}));"
                        ));
                        cpp.line(format!("return *{field}.back();"));
                    });
                    cpp.line("}");
                    cpp.empty_line();
                    cpp.line(format!(
                        "void {}::Remove{name}({field_type}& ref)",
                        c.name
                    ));
                    cpp.line("{");
                    cpp.scope(|cpp| {
                        cpp.line(format!("for (std::size_t i = 0; i < {field}.size(); i++) {{"));
                        cpp.scope(|cpp| {
                            cpp.line(format!("if ({field}[i].get() == &ref) {{"));
                            cpp.scope(|cpp| {
                                cpp.line(format!("{field}.erase({field}.begin() + i);"));
                                cpp.line("return;");
                            });
                            cpp.line("}");
                        });
                        cpp.line("}");
                        cpp.line("throw CTiglError(\"Element not found\");");
                    });
                    cpp.line("}");
                    cpp.empty_line();
                }
                Cardinality::Mandatory => {}
            }
        }
        Ok(())
    }

    fn write_uid_ref_object_function_declarations(&self, hpp: &mut IndentingWriter) {
        hpp.line("TIGL_EXPORT const CTiglUIDObject* GetNextUIDObject() const final;");
        hpp.line(
            "TIGL_EXPORT void NotifyUIDChange(const std::string& oldUid, const std::string& newUid) final;",
        );
        hpp.empty_line();
    }

    fn write_uid_ref_object_function_implementations(&self, cpp: &mut IndentingWriter, c: &Class) {
        cpp.line(format!(
            "const CTiglUIDObject* {}::GetNextUIDObject() const",
            c.name
        ));
        cpp.line("{");
        cpp.scope(|cpp| {
            if self.has_uid_field(c) {
                cpp.line("return this;");
            } else {
                cpp.line("return GetNextUIDParent();");
            }
        });
        cpp.line("}");
        cpp.empty_line();
        cpp.line(format!(
            "void {}::NotifyUIDChange(const std::string& oldUid, const std::string& newUid)",
            c.name
        ));
        cpp.line("{");
        cpp.scope(|cpp| {
            for f in self.uid_reference_fields(c) {
                let field = f.field_name();
                match f.cardinality() {
                    Cardinality::Vector => {
                        cpp.line(format!("for (auto& entry : {field}) {{"));
                        cpp.scope(|cpp| {
                            cpp.line("if (entry == oldUid) {");
                            cpp.scope(|cpp| {
                                cpp.line("entry = newUid;");
                            });
                            cpp.line("}");
                        });
                        cpp.line("}");
                    }
                    Cardinality::Optional => {
                        cpp.line(format!("if ({field} && *{field} == oldUid) {{"));
                        cpp.scope(|cpp| {
                            cpp.line(format!("{field} = newUid;"));
                        });
                        cpp.line("}");
                    }
                    Cardinality::Mandatory => {
                        cpp.line(format!("if ({field} == oldUid) {{"));
                        cpp.scope(|cpp| {
                            cpp.line(format!("{field} = newUid;"));
                        });
                        cpp.line("}");
                    }
                }
            }
        });
        cpp.line("}");
        cpp.empty_line();
    }

    fn write_parent_pointer_fields(&self, hpp: &mut IndentingWriter, c: &Class) {
        if !self.requires_parent_pointer(c) {
            return;
        }
        if c.deps.parents.len() > 1 {
            hpp.line("void* m_parent;");
            hpp.line("const std::type_info* m_parentType;");
        } else {
            hpp.line(format!(
                "{}* m_parent;",
                self.custom_replaced_type(&c.deps.parents[0])
            ));
        }
        hpp.empty_line();
    }

    fn write_uid_manager_fields(&self, hpp: &mut IndentingWriter, c: &Class) {
        if self.requires_uid_manager_field(c) {
            hpp.line(format!("{UID_MANAGER_CLASS}* m_uidMgr;"));
            hpp.empty_line();
        }
    }

    fn write_fields(&self, hpp: &mut IndentingWriter, c: &Class) {
        let width = c
            .fields
            .iter()
            .map(|f| self.field_type(f).len())
            .max()
            .unwrap_or(0);

        let have_any_documentation = c.fields.iter().any(|f| !f.documentation.is_empty());
        for (i, f) in c.fields.iter().enumerate() {
            self.write_documentation(hpp, &f.documentation);
            hpp.line(format!(
                "{:<width$} {};",
                self.field_type(f),
                f.field_name()
            ));
            if have_any_documentation || i + 1 == c.fields.len() {
                hpp.empty_line();
            }
        }
    }

    fn write_deleted_ctor_and_assign(&self, hpp: &mut IndentingWriter, c: &Class) {
        hpp.line(format!("{}(const {}&) = delete;", c.name, c.name));
        hpp.line(format!("{}& operator=(const {}&) = delete;", c.name, c.name));
        hpp.empty_line();
        hpp.line(format!("{}({}&&) = delete;", c.name, c.name));
        hpp.line(format!("{}& operator=({}&&) = delete;", c.name, c.name));
    }

    pub(crate) fn write_child_elem_order(&self, cpp: &mut IndentingWriter, c: &Class) {
        let quoted: Vec<String> = self
            .element_names(c)
            .iter()
            .map(|e| format!("\"{e}\""))
            .collect();
        cpp.line(format!(
            "const std::vector<std::string> childElemOrder = {{ {} }};",
            quoted.join(", ")
        ));
        cpp.empty_line();
    }
}
