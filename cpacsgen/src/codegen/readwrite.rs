//! Generated `ReadCPACS`/`WriteCPACS` bodies.

use crate::error::CodeGenError;
use crate::typesystem::{Cardinality, Class, Field, XmlConstruct};

use super::writer::IndentingWriter;
use super::{CodeGen, TIXI_NAMESPACE, UID_REF_TYPE};

impl CodeGen<'_> {
    /// The xpath expression locating the field relative to the class xpath.
    /// SimpleContent and fundamental bases live on the class element itself.
    fn field_xpath_suffix(&self, f: &Field) -> String {
        let empty =
            f.xml_type == XmlConstruct::SimpleContent || f.xml_type == XmlConstruct::FundamentalTypeBase;
        if empty {
            String::new()
        } else {
            format!(" + \"/{}\"", f.cpacs_name)
        }
    }

    fn write_read_field(
        &self,
        cpp: &mut IndentingWriter,
        c: &Class,
        f: &Field,
    ) -> Result<(), CodeGenError> {
        let is_att = self.is_attribute(f.xml_type);
        let field = f.field_name();
        let suffix = self.field_xpath_suffix(f);

        // fundamental types
        if self.tables.fundamental_types.contains(&f.type_name) {
            match f.cardinality() {
                Cardinality::Optional | Cardinality::Mandatory => {
                    if is_att {
                        cpp.line(format!(
                            "{field} = {TIXI_NAMESPACE}::TixiGetAttribute<{}>(tixiHandle, xpath, \"{}\");",
                            f.type_name, f.cpacs_name
                        ));
                    } else {
                        cpp.line(format!(
                            "{field} = {TIXI_NAMESPACE}::TixiGetElement<{}>(tixiHandle, xpath{suffix});",
                            f.type_name
                        ));
                    }

                    // empty strings are suspicious for both mandatory and
                    // optional fields
                    if f.type_name == "std::string" {
                        let construct = if is_att { "attribute " } else { "element " };
                        match f.cardinality() {
                            Cardinality::Mandatory => {
                                cpp.line(format!("if ({field}.empty()) {{"));
                                cpp.scope(|cpp| {
                                    cpp.line(format!(
                                        "LOG(WARNING) << \"Required {construct}{} is empty at xpath \" << xpath;",
                                        f.cpacs_name
                                    ));
                                });
                                cpp.line("}");
                            }
                            Cardinality::Optional => {
                                cpp.line(format!("if ({field}->empty()) {{"));
                                cpp.scope(|cpp| {
                                    cpp.line(format!(
                                        "LOG(WARNING) << \"Optional {construct}{} is present but empty at xpath \" << xpath;",
                                        f.cpacs_name
                                    ));
                                });
                                cpp.line("}");
                            }
                            Cardinality::Vector => {}
                        }
                    }

                    // register uid references
                    if f.xml_type_name == UID_REF_TYPE {
                        if f.cardinality() == Cardinality::Optional {
                            cpp.line(format!(
                                "if (m_uidMgr && !{field}->empty()) m_uidMgr->RegisterReference(*{field}, *this);"
                            ));
                        } else {
                            cpp.line(format!(
                                "if (m_uidMgr && !{field}.empty()) m_uidMgr->RegisterReference({field}, *this);"
                            ));
                        }
                    }
                }
                Cardinality::Vector => {
                    if f.xml_type != XmlConstruct::Element {
                        return Err(CodeGenError::emit(
                            "Attributes, simpleContents and bases cannot be vectors",
                        ));
                    }
                    cpp.line(format!(
                        "{TIXI_NAMESPACE}::TixiReadElements(tixiHandle, xpath + \"/{}\", {field}, {}, {});",
                        f.cpacs_name,
                        f.min_occurs,
                        self.format_max_occurs(f.max_occurs)
                    ));
                    if f.xml_type_name == UID_REF_TYPE {
                        cpp.line("if (m_uidMgr) {");
                        cpp.scope(|cpp| {
                            cpp.line(format!(
                                "for (std::vector<{}>::iterator it = {field}.begin(); it != {field}.end(); ++it) {{",
                                f.type_name
                            ));
                            cpp.scope(|cpp| {
                                cpp.line("if (!it->empty()) m_uidMgr->RegisterReference(*it, *this);");
                            });
                            cpp.line("}");
                        });
                        cpp.line("}");
                    }
                }
            }
            return Ok(());
        }

        // enums
        if let Some(e) = self.types.enums.get(&f.type_name) {
            let read_func = self.string_to_enum_func(e);
            match f.cardinality() {
                Cardinality::Optional | Cardinality::Mandatory => {
                    if is_att {
                        cpp.line(format!(
                            "{field} = {read_func}({TIXI_NAMESPACE}::TixiGetAttribute<std::string>(tixiHandle, xpath, \"{}\"));",
                            f.cpacs_name
                        ));
                    } else {
                        cpp.line(format!(
                            "{field} = {read_func}({TIXI_NAMESPACE}::TixiGetElement<std::string>(tixiHandle, xpath + \"/{}\"));",
                            f.cpacs_name
                        ));
                    }
                }
                Cardinality::Vector => {
                    return Err(CodeGenError::not_implemented(
                        "Reading enum vectors",
                        &f.origin_xpath,
                    ));
                }
            }
            return Ok(());
        }

        // classes
        if let Some(field_class) = self.types.classes.get(&f.type_name) {
            if f.xml_type == XmlConstruct::Attribute
                || f.xml_type == XmlConstruct::FundamentalTypeBase
            {
                return Err(CodeGenError::emit(
                    "fields of class type cannot be attributes or fundamental type bases",
                ));
            }

            match f.cardinality() {
                Cardinality::Optional => {
                    let args = self.ctor_argument_list(field_class, c);
                    cpp.line(format!("{field} = boost::in_place({args});"));
                    if self.options.try_catch_around_optional_class_reads {
                        cpp.line("try {");
                        cpp.scope(|cpp| {
                            cpp.line(format!(
                                "{field}->ReadCPACS(tixiHandle, xpath + \"/{}\");",
                                f.cpacs_name
                            ));
                        });
                        cpp.line("} catch(const std::exception& e) {");
                        cpp.scope(|cpp| {
                            cpp.line(format!(
                                "LOG(ERROR) << \"Failed to read {} at xpath \" << xpath << \": \" << e.what();",
                                f.cpacs_name
                            ));
                            cpp.line(format!("{field} = boost::none;"));
                        });
                        cpp.line("}");
                    } else {
                        cpp.line(format!(
                            "{field}->ReadCPACS(tixiHandle, xpath + \"/{}\");",
                            f.cpacs_name
                        ));
                    }
                }
                Cardinality::Mandatory => {
                    cpp.line(format!(
                        "{field}.ReadCPACS(tixiHandle, xpath + \"/{}\");",
                        f.cpacs_name
                    ));
                }
                Cardinality::Vector => {
                    let more_args = self.ctor_argument_list(field_class, c);
                    let trailing = if more_args.is_empty() {
                        String::new()
                    } else {
                        format!(", {more_args}")
                    };
                    cpp.line(format!(
                        "{TIXI_NAMESPACE}::TixiReadElements(tixiHandle, xpath + \"/{}\", {field}, {}, {}{trailing});",
                        f.cpacs_name,
                        f.min_occurs,
                        self.format_max_occurs(f.max_occurs)
                    ));
                }
            }
            return Ok(());
        }

        Err(CodeGenError::emit(format!(
            "No read function provided for type {}",
            f.type_name
        )))
    }

    fn write_write_field(
        &self,
        cpp: &mut IndentingWriter,
        f: &Field,
        in_sequence: bool,
    ) -> Result<(), CodeGenError> {
        let is_att = self.is_attribute(f.xml_type);
        let empty = f.xml_type == XmlConstruct::SimpleContent
            || f.xml_type == XmlConstruct::FundamentalTypeBase;
        let field = f.field_name();
        let suffix = self.field_xpath_suffix(f);

        let create_element = |cpp: &mut IndentingWriter| {
            if !empty && !is_att {
                if in_sequence {
                    cpp.line(format!(
                        "{TIXI_NAMESPACE}::TixiCreateSequenceElementIfNotExists(tixiHandle, xpath + \"/{}\", childElemOrder);",
                        f.cpacs_name
                    ));
                } else {
                    cpp.line(format!(
                        "{TIXI_NAMESPACE}::TixiCreateElementIfNotExists(tixiHandle, xpath + \"/{}\");",
                        f.cpacs_name
                    ));
                }
            }
        };

        // optional fields are removed from the document when absent so
        // writing stays idempotent
        let write_optional =
            |cpp: &mut IndentingWriter, write_value: &dyn Fn(&mut IndentingWriter)| {
                cpp.line(format!("if ({field}) {{"));
                cpp.scope(|cpp| {
                    create_element(cpp);
                    write_value(cpp);
                });
                cpp.line("}");
                cpp.line("else {");
                cpp.scope(|cpp| {
                    if is_att {
                        cpp.line(format!(
                            "if ({TIXI_NAMESPACE}::TixiCheckAttribute(tixiHandle, xpath, \"{}\")) {{",
                            f.cpacs_name
                        ));
                    } else {
                        cpp.line(format!(
                            "if ({TIXI_NAMESPACE}::TixiCheckElement(tixiHandle, xpath{suffix})) {{"
                        ));
                    }
                    cpp.scope(|cpp| {
                        if is_att {
                            cpp.line(format!(
                                "{TIXI_NAMESPACE}::TixiRemoveAttribute(tixiHandle, xpath, \"{}\");",
                                f.cpacs_name
                            ));
                        } else {
                            cpp.line(format!(
                                "{TIXI_NAMESPACE}::TixiRemoveElement(tixiHandle, xpath{suffix});"
                            ));
                        }
                    });
                    cpp.line("}");
                });
                cpp.line("}");
            };

        // fundamental types
        if self.tables.fundamental_types.contains(&f.type_name) {
            match f.cardinality() {
                Cardinality::Optional => {
                    write_optional(cpp, &|cpp| {
                        if is_att {
                            cpp.line(format!(
                                "{TIXI_NAMESPACE}::TixiSaveAttribute(tixiHandle, xpath, \"{}\", *{field});",
                                f.cpacs_name
                            ));
                        } else {
                            cpp.line(format!(
                                "{TIXI_NAMESPACE}::TixiSaveElement(tixiHandle, xpath{suffix}, *{field});"
                            ));
                        }
                    });
                }
                Cardinality::Mandatory => {
                    create_element(cpp);
                    if is_att {
                        cpp.line(format!(
                            "{TIXI_NAMESPACE}::TixiSaveAttribute(tixiHandle, xpath, \"{}\", {field});",
                            f.cpacs_name
                        ));
                    } else {
                        cpp.line(format!(
                            "{TIXI_NAMESPACE}::TixiSaveElement(tixiHandle, xpath{suffix}, {field});"
                        ));
                    }
                }
                Cardinality::Vector => {
                    if f.xml_type != XmlConstruct::Element {
                        return Err(CodeGenError::emit(
                            "Attributes, simpleContents and bases cannot be vectors",
                        ));
                    }
                    cpp.line(format!(
                        "{TIXI_NAMESPACE}::TixiSaveElements(tixiHandle, xpath + \"/{}\", {field});",
                        f.cpacs_name
                    ));
                }
            }
            return Ok(());
        }

        // enums
        if let Some(e) = self.types.enums.get(&f.type_name) {
            let to_string = self.enum_to_string_func(e);
            match f.cardinality() {
                Cardinality::Optional => {
                    write_optional(cpp, &|cpp| {
                        if is_att {
                            cpp.line(format!(
                                "{TIXI_NAMESPACE}::TixiSaveAttribute(tixiHandle, xpath, \"{}\", {to_string}(*{field}));",
                                f.cpacs_name
                            ));
                        } else {
                            cpp.line(format!(
                                "{TIXI_NAMESPACE}::TixiSaveElement(tixiHandle, xpath + \"/{}\", {to_string}(*{field}));",
                                f.cpacs_name
                            ));
                        }
                    });
                }
                Cardinality::Mandatory => {
                    create_element(cpp);
                    if is_att {
                        cpp.line(format!(
                            "{TIXI_NAMESPACE}::TixiSaveAttribute(tixiHandle, xpath, \"{}\", {to_string}({field}));",
                            f.cpacs_name
                        ));
                    } else {
                        cpp.line(format!(
                            "{TIXI_NAMESPACE}::TixiSaveElement(tixiHandle, xpath + \"/{}\", {to_string}({field}));",
                            f.cpacs_name
                        ));
                    }
                }
                Cardinality::Vector => {
                    return Err(CodeGenError::not_implemented(
                        "Writing enum vectors",
                        &f.origin_xpath,
                    ));
                }
            }
            return Ok(());
        }

        // classes
        if f.xml_type != XmlConstruct::Attribute && f.xml_type != XmlConstruct::FundamentalTypeBase
        {
            if self.types.is_class(&f.type_name) {
                match f.cardinality() {
                    Cardinality::Optional => {
                        write_optional(cpp, &|cpp| {
                            cpp.line(format!(
                                "{field}->WriteCPACS(tixiHandle, xpath + \"/{}\");",
                                f.cpacs_name
                            ));
                        });
                    }
                    Cardinality::Mandatory => {
                        create_element(cpp);
                        cpp.line(format!(
                            "{field}.WriteCPACS(tixiHandle, xpath + \"/{}\");",
                            f.cpacs_name
                        ));
                    }
                    Cardinality::Vector => {
                        cpp.line(format!(
                            "{TIXI_NAMESPACE}::TixiSaveElements(tixiHandle, xpath + \"/{}\", {field});",
                            f.cpacs_name
                        ));
                    }
                }
                return Ok(());
            }
        }

        Err(CodeGenError::emit(format!(
            "No write function provided for type {}",
            f.type_name
        )))
    }

    fn write_read_base(&self, cpp: &mut IndentingWriter, base: &str) -> Result<(), CodeGenError> {
        if self.tables.fundamental_types.contains(base) {
            // prevented by the type system builder
            return Err(CodeGenError::emit(
                "fundamental types cannot be base classes",
            ));
        }
        if self.types.is_class(base) {
            cpp.line(format!("{base}::ReadCPACS(tixiHandle, xpath);"));
            return Ok(());
        }
        Err(CodeGenError::emit(format!(
            "No read function provided for type {base}"
        )))
    }

    fn write_write_base(&self, cpp: &mut IndentingWriter, base: &str) -> Result<(), CodeGenError> {
        if self.tables.fundamental_types.contains(base) {
            cpp.line(format!(
                "{TIXI_NAMESPACE}::TixiSaveElement(tixiHandle, xpath, *this);"
            ));
            return Ok(());
        }
        if self.types.is_class(base) {
            cpp.line(format!("{base}::WriteCPACS(tixiHandle, xpath);"));
            return Ok(());
        }
        Err(CodeGenError::emit(format!(
            "No write function provided for type {base}"
        )))
    }

    pub(crate) fn write_read_implementation(
        &self,
        cpp: &mut IndentingWriter,
        c: &Class,
    ) -> Result<(), CodeGenError> {
        cpp.line(format!(
            "void {}::ReadCPACS(const TixiDocumentHandle& tixiHandle, const std::string& xpath)",
            c.name
        ));
        cpp.line("{");
        cpp.scope(|cpp| -> Result<(), CodeGenError> {
            if !c.base.is_empty() {
                cpp.line("// read base");
                self.write_read_base(cpp, &c.base)?;
                cpp.empty_line();
            }

            for f in &c.fields {
                let construct = self.xml_construct_to_string(f.xml_type);
                let is_att = self.is_attribute(f.xml_type);
                cpp.line(format!("// read {construct} {}", f.cpacs_name));
                if is_att {
                    cpp.line(format!(
                        "if ({TIXI_NAMESPACE}::TixiCheckAttribute(tixiHandle, xpath, \"{}\")) {{",
                        f.cpacs_name
                    ));
                } else {
                    cpp.line(format!(
                        "if ({TIXI_NAMESPACE}::TixiCheckElement(tixiHandle, xpath{})) {{",
                        self.field_xpath_suffix(f)
                    ));
                }
                cpp.scope(|cpp| self.write_read_field(cpp, c, f))?;
                cpp.line("}");
                if f.cardinality() == Cardinality::Mandatory {
                    // a missing mandatory node is logged, reading continues
                    cpp.line("else {");
                    cpp.scope(|cpp| {
                        cpp.line(format!(
                            "LOG(ERROR) << \"Required {construct} {} is missing at xpath \" << xpath;",
                            f.cpacs_name
                        ));
                    });
                    cpp.line("}");
                }
                cpp.empty_line();
            }

            if self.has_uid_field(c) {
                if self.has_mandatory_uid_field(c) {
                    cpp.line("if (m_uidMgr && !m_uID.empty()) m_uidMgr->RegisterObject(m_uID, *this);");
                } else {
                    cpp.line("if (m_uidMgr && m_uID) m_uidMgr->RegisterObject(*m_uID, *this);");
                }
            }

            if !c.choices.is_empty() {
                cpp.line("if (!ValidateChoices()) {");
                cpp.scope(|cpp| {
                    cpp.line("LOG(ERROR) << \"Invalid choice configuration at xpath \" << xpath;");
                });
                cpp.line("}");
            }
            Ok(())
        })?;
        cpp.line("}");
        cpp.empty_line();
        Ok(())
    }

    pub(crate) fn write_write_implementation(
        &self,
        cpp: &mut IndentingWriter,
        c: &Class,
    ) -> Result<(), CodeGenError> {
        cpp.line(format!(
            "void {}::WriteCPACS(const TixiDocumentHandle& tixiHandle, const std::string& xpath) const",
            c.name
        ));
        cpp.line("{");
        cpp.scope(|cpp| -> Result<(), CodeGenError> {
            // the element order is only enforceable when choices cannot
            // make the same element appear in multiple positions
            let handle_sequence =
                c.contains_sequence && (c.choices.is_empty() || self.unique_child_elements(c));
            if handle_sequence {
                self.write_child_elem_order(cpp, c);
            }

            if !c.base.is_empty() {
                cpp.line("// write base");
                self.write_write_base(cpp, &c.base)?;
                cpp.empty_line();
            }

            for f in &c.fields {
                let construct = self.xml_construct_to_string(f.xml_type);
                cpp.line(format!("// write {construct} {}", f.cpacs_name));
                self.write_write_field(cpp, f, handle_sequence)?;
                cpp.empty_line();
            }
            Ok(())
        })?;
        cpp.line("}");
        cpp.empty_line();
        Ok(())
    }
}
