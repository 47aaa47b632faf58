//! Emission of the per-enum declaration file with string conversions.

use crate::typesystem::Enum;

use super::writer::IndentingWriter;
use super::CodeGen;

impl CodeGen<'_> {
    /// Mangle an enum value into a valid C++ identifier.
    pub(crate) fn enum_cpp_name(&self, name: &str) -> String {
        let mut name = name.to_owned();
        if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            name = format!("_{name}");
        }
        if name.starts_with('-') && name.chars().nth(1).is_some_and(|c| c.is_ascii_digit()) {
            name = format!("_neg{}", &name[1..]);
        }

        let mut mangled: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();

        if self.tables.reserved_names.contains(&mangled) {
            mangled = format!("_{mangled}");
        }

        mangled
    }

    pub(crate) fn write_enum(&self, hpp: &mut IndentingWriter, e: &Enum) {
        self.write_license_header(hpp);

        hpp.line("#pragma once");
        hpp.empty_line();

        hpp.line("#include <string>");
        if !self.options.case_sensitive_string_to_enum {
            hpp.line("#include <cctype>");
        }
        hpp.empty_line();
        hpp.line("#include \"CTiglError.h\"");
        hpp.line("#include \"to_string.h\"");
        hpp.empty_line();

        hpp.line("namespace tigl");
        hpp.line("{");
        hpp.line("namespace generated");
        hpp.line("{");
        hpp.indent();

        if !self.namespace.is_empty() {
            hpp.line(format!("namespace {}", self.namespace));
            hpp.line("{");
            hpp.indent();
        }

        // meta information from schema
        hpp.line("// This enum is used in:");
        for parent in &e.deps.parents {
            hpp.line(format!("// {parent}"));
        }
        hpp.empty_line();

        self.write_documentation(hpp, &e.documentation);

        let scoped = self.options.scoped_enums;
        hpp.line(format!(
            "enum {}{}",
            if scoped { "class " } else { "" },
            e.name
        ));
        hpp.line("{");
        hpp.scope(|hpp| {
            for (i, v) in e.values.iter().enumerate() {
                let separator = if i + 1 < e.values.len() { "," } else { "" };
                hpp.line(format!("{}{separator}", self.enum_cpp_name(v.name())));
            }
        });
        hpp.line("};");
        hpp.empty_line();

        let prefix = if scoped {
            format!("{}::", e.name)
        } else {
            String::new()
        };

        hpp.line(format!(
            "inline std::string {}(const {}& value)",
            self.enum_to_string_func(e),
            e.name
        ));
        hpp.line("{");
        hpp.scope(|hpp| {
            hpp.line("switch(value) {");
            for v in &e.values {
                hpp.line(format!(
                    "case {prefix}{}: return \"{}\";",
                    self.enum_cpp_name(v.name()),
                    v.cpacs_name
                ));
            }
            hpp.line(format!(
                "default: throw CTiglError(\"Invalid enum value \\\"\" + std_to_string(static_cast<int>(value)) + \"\\\" for enum type {}\");",
                e.name
            ));
            hpp.line("}");
        });
        hpp.line("}");

        hpp.line(format!(
            "inline {} {}(const std::string& value)",
            e.name,
            self.string_to_enum_func(e)
        ));
        hpp.line("{");
        hpp.scope(|hpp| {
            if self.options.case_sensitive_string_to_enum {
                for v in &e.values {
                    hpp.line(format!(
                        "if (value == \"{}\") return {prefix}{};",
                        v.cpacs_name,
                        self.enum_cpp_name(v.name())
                    ));
                }
            } else {
                hpp.line("auto toLower = [](std::string str) { for (char& c : str) { c = std::tolower(c); } return str; };");
                for v in &e.values {
                    hpp.line(format!(
                        "if (toLower(value) == \"{}\") {{ return {prefix}{}; }}",
                        v.cpacs_name.to_lowercase(),
                        self.enum_cpp_name(v.name())
                    ));
                }
            }
            hpp.line(format!(
                "throw CTiglError(\"Invalid string value \\\"\" + value + \"\\\" for enum type {}\");",
                e.name
            ));
        });
        hpp.line("}");

        if !self.namespace.is_empty() {
            hpp.outdent();
            hpp.line("}");
        }

        hpp.outdent();
        hpp.line("} // namespace generated");
        hpp.empty_line();

        let generated_ns = if self.namespace.is_empty() {
            "generated".to_owned()
        } else {
            format!("generated::{}", self.namespace)
        };

        match self.tables.custom_types.find(&e.name) {
            Some(custom) => {
                hpp.line(format!(
                    "// {} is customized, use type {} directly",
                    e.name, custom
                ));
            }
            None => {
                hpp.line("// Aliases in tigl namespace");
                if !self.namespace.is_empty() {
                    hpp.line(format!("namespace {}", self.namespace));
                    hpp.line("{");
                    hpp.indent();
                }
                hpp.line(format!("using E{} = {generated_ns}::{};", e.name, e.name));
                if !self.namespace.is_empty() {
                    hpp.outdent();
                    hpp.line("}");
                }
            }
        }

        hpp.line("} // namespace tigl");
        hpp.empty_line();
    }
}
