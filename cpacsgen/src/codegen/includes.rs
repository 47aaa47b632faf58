//! Include and forward declaration resolution for generated classes.

use crate::typesystem::{Cardinality, Class};

use super::{CodeGen, UID_MANAGER_CLASS};

/// The include directives and forward declarations of one class.
#[derive(Default)]
pub(crate) struct Includes {
    pub hpp_includes: Vec<String>,
    pub hpp_forwards: Vec<String>,
    pub hpp_custom_forwards: Vec<String>,
    pub cpp_includes: Vec<String>,
}

impl CodeGen<'_> {
    pub(crate) fn resolve_includes(&self, c: &Class) -> Includes {
        let mut deps = Includes::default();

        deps.hpp_includes.push("<tixi.h>".to_owned());
        deps.hpp_includes.push("<string>".to_owned());
        deps.hpp_includes.push("\"tigl_internal.h\"".to_owned());

        let mut vector_header = false;
        let mut make_unique = false;
        let mut optional_header = false;
        let mut create_if_not_exists_header = false;
        let mut time_header = false;
        for f in &c.fields {
            match f.cardinality() {
                Cardinality::Optional => {
                    optional_header = true;
                    if self.types.is_class(&f.type_name) {
                        create_if_not_exists_header = true;
                    }
                }
                Cardinality::Vector => {
                    vector_header = true;
                    if self.types.is_class(&f.type_name) {
                        make_unique = true;
                    }
                }
                Cardinality::Mandatory => {}
            }
            if f.type_name == "std::time_t" {
                time_header = true;
            }
        }
        if vector_header {
            deps.hpp_includes.push("<vector>".to_owned());
            if make_unique {
                deps.hpp_includes.push("\"UniquePtr.h\"".to_owned());
            }
        }
        if optional_header {
            deps.hpp_includes.push("<boost/optional.hpp>".to_owned());
            deps.hpp_includes
                .push("<boost/utility/in_place_factory.hpp>".to_owned());
            if create_if_not_exists_header {
                deps.hpp_includes.push("\"CreateIfNotExists.h\"".to_owned());
            }
        }
        if time_header {
            deps.hpp_includes.push("<ctime>".to_owned());
        }
        if c.deps.parents.len() > 1 {
            deps.hpp_includes.push("\"CTiglError.h\"".to_owned());
            deps.hpp_includes.push("<typeinfo>".to_owned());
        }
        if self.requires_uid_manager(c) {
            deps.hpp_custom_forwards.push(UID_MANAGER_CLASS.to_owned());
            deps.cpp_includes
                .push(format!("\"{UID_MANAGER_CLASS}.h\""));
        }
        if self.has_uid_ref_field(c) {
            deps.hpp_includes.push("\"ITiglUIDRefObject.h\"".to_owned());
        }
        if self.has_uid_field(c) {
            deps.hpp_includes.push("\"CTiglUIDObject.h\"".to_owned());
        } else {
            deps.hpp_custom_forwards.push("CTiglUIDObject".to_owned());
            deps.cpp_includes.push("\"CTiglUIDObject.h\"".to_owned());
        }

        // base class
        if !c.base.is_empty() && self.types.is_class(&c.base) {
            deps.hpp_includes.push(format!("\"{}.h\"", c.base));
        }

        // fields
        for f in &c.fields {
            if !self.types.is_enum(&f.type_name) && !self.types.is_class(&f.type_name) {
                continue;
            }

            match self.tables.custom_types.find(&f.type_name) {
                None => match f.cardinality() {
                    Cardinality::Optional | Cardinality::Mandatory => {
                        deps.hpp_includes.push(format!("\"{}.h\"", f.type_name));
                    }
                    Cardinality::Vector => {
                        deps.hpp_forwards.push(f.type_name.clone());
                        deps.cpp_includes.push(format!("\"{}.h\"", f.type_name));
                    }
                },
                Some(custom) => {
                    // custom types resolve through external include paths
                    match f.cardinality() {
                        Cardinality::Optional | Cardinality::Mandatory => {
                            deps.hpp_includes.push(format!("<{custom}.h>"));
                        }
                        Cardinality::Vector => {
                            deps.hpp_custom_forwards.push(custom.clone());
                            deps.cpp_includes.push(format!("<{custom}.h>"));
                        }
                    }
                }
            }
        }

        // parent pointers
        if self.requires_parent_pointer(c) {
            deps.cpp_includes.push("<cassert>".to_owned());
            for parent in &c.deps.parents {
                match self.tables.custom_types.find(parent) {
                    Some(custom) => {
                        deps.hpp_custom_forwards.push(custom.clone());
                        deps.cpp_includes.push(format!("\"{custom}.h\""));
                    }
                    None => {
                        deps.hpp_forwards.push(parent.clone());
                        deps.cpp_includes.push(format!("\"{parent}.h\""));
                    }
                }
            }
        }

        deps.cpp_includes.push("\"TixiHelper.h\"".to_owned());
        deps.cpp_includes.push("\"CTiglLogging.h\"".to_owned());
        deps.cpp_includes.push("\"CTiglError.h\"".to_owned());
        deps.cpp_includes.push(format!("\"{}.h\"", c.name));

        order_includes(&mut deps.hpp_includes);
        order_includes(&mut deps.cpp_includes);

        deps
    }
}

/// System includes first, then local ones, each group sorted
/// case-insensitively and deduplicated.
fn order_includes(includes: &mut Vec<String>) {
    let (mut system, mut local): (Vec<String>, Vec<String>) =
        includes.drain(..).partition(|s| s.starts_with('<'));

    let icmp = |a: &String, b: &String| a.to_lowercase().cmp(&b.to_lowercase());
    system.sort_by(icmp);
    system.dedup();
    local.sort_by(icmp);
    local.dedup();

    includes.extend(system);
    includes.extend(local);
}
