//! Compiles the choice tree of a class into the `ValidateChoices` body, a
//! single boolean expression.

use crate::error::CodeGenError;
use crate::typesystem::{Cardinality, Choice, ChoiceElements, ChoiceItem, Class, Field};

use super::writer::IndentingWriter;
use super::CodeGen;

fn write_is_field_there(cpp: &mut IndentingWriter, f: &Field) -> Result<(), CodeGenError> {
    match f.cardinality() {
        Cardinality::Optional => cpp.line(format!("{}.is_initialized()", f.field_name())),
        Cardinality::Vector => cpp.line(format!("!{}.empty()", f.field_name())),
        Cardinality::Mandatory => {
            return Err(CodeGenError::emit(
                "elements inside choice can only be optional or vector",
            ))
        }
    }
    Ok(())
}

fn collect_item_indices(items: &ChoiceElements, out: &mut Vec<usize>) {
    for item in items {
        match item {
            ChoiceItem::Leaf { field_index, .. } => out.push(*field_index),
            ChoiceItem::Nested(c) => collect_choice_indices(c, out),
        }
    }
}

fn collect_choice_indices(choice: &Choice, out: &mut Vec<usize>) {
    for option in &choice.options {
        collect_item_indices(option, out);
    }
}

fn unique(v: &mut Vec<usize>) {
    v.sort_unstable();
    v.dedup();
}

fn write_presence_disjunction(
    cpp: &mut IndentingWriter,
    c: &Class,
    indices: &[usize],
) -> Result<(), CodeGenError> {
    if indices.is_empty() {
        cpp.line("false");
        return Ok(());
    }
    for (i, index) in indices.iter().enumerate() {
        write_is_field_there(cpp, &c.fields[*index])?;
        if i + 1 < indices.len() {
            cpp.line("||");
        }
    }
    Ok(())
}

impl CodeGen<'_> {
    pub(crate) fn write_choice_validator_implementation(
        &self,
        cpp: &mut IndentingWriter,
        c: &Class,
    ) -> Result<(), CodeGenError> {
        if c.choices.is_empty() {
            return Ok(());
        }

        cpp.line(format!("bool {}::ValidateChoices() const", c.name));
        cpp.line("{");
        cpp.scope(|cpp| -> Result<(), CodeGenError> {
            cpp.line("return");
            self.write_choice_elements(cpp, c, &c.choices, None)?;
            cpp.line(";");
            Ok(())
        })?;
        cpp.line("}");
        cpp.empty_line();
        Ok(())
    }

    fn write_choice(
        &self,
        cpp: &mut IndentingWriter,
        c: &Class,
        choice: &Choice,
    ) -> Result<(), CodeGenError> {
        cpp.line("(");
        cpp.scope(|cpp| -> Result<(), CodeGenError> {
            let mut extra_close = false;
            if choice.min_occurs == 0 {
                cpp.line("// all uninitialized is valid since choice is optional!");
                cpp.line("!(");
                cpp.scope(|cpp| -> Result<(), CodeGenError> {
                    let mut all = Vec::new();
                    collect_choice_indices(choice, &mut all);
                    unique(&mut all);
                    write_presence_disjunction(cpp, c, &all)
                })?;
                cpp.line(")");
                cpp.line("||");
                cpp.line("(");
                cpp.indent();
                extra_close = true;
            }

            // exactly one option may score
            for (i, option) in choice.options.iter().enumerate() {
                self.write_choice_elements(cpp, c, option, Some(choice))?;
                if i + 1 < choice.options.len() {
                    cpp.line("+");
                }
            }
            cpp.line("== 1");

            if extra_close {
                cpp.outdent();
                cpp.line(")");
            }
            Ok(())
        })?;
        cpp.line(")");
        Ok(())
    }

    fn write_choice_elements(
        &self,
        cpp: &mut IndentingWriter,
        c: &Class,
        items: &ChoiceElements,
        parent_choice: Option<&Choice>,
    ) -> Result<(), CodeGenError> {
        cpp.line("(");
        cpp.scope(|cpp| -> Result<(), CodeGenError> {
            if parent_choice.is_some() {
                cpp.line("// mandatory elements of this choice must be there");
            }
            for (i, item) in items.iter().enumerate() {
                match item {
                    ChoiceItem::Leaf {
                        field_index,
                        optional_before,
                    } => {
                        let f = &c.fields[*field_index];
                        if *optional_before {
                            cpp.line(format!("true // {} is optional in choice", f.field_name()));
                        } else {
                            write_is_field_there(cpp, f)?;
                        }
                    }
                    ChoiceItem::Nested(nested) => self.write_choice(cpp, c, nested)?,
                }
                if i + 1 < items.len() {
                    cpp.line("&&");
                }
            }

            if let Some(parent) = parent_choice {
                cpp.line("&&");
                cpp.line("// elements of other choices must not be there");
                cpp.line("!(");
                cpp.scope(|cpp| -> Result<(), CodeGenError> {
                    let mut all = Vec::new();
                    collect_choice_indices(parent, &mut all);
                    unique(&mut all);

                    let mut child = Vec::new();
                    collect_item_indices(items, &mut child);
                    unique(&mut child);

                    // a field appearing in multiple options must not count
                    // against any of them
                    all.retain(|ai| {
                        !child.iter().any(|ci| {
                            ci == ai || c.fields[*ci].cpacs_name == c.fields[*ai].cpacs_name
                        })
                    });

                    write_presence_disjunction(cpp, c, &all)
                })?;
                cpp.line(")");
            }
            Ok(())
        })?;
        cpp.line(")");
        Ok(())
    }
}
