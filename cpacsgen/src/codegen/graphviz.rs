//! GraphViz DOT output of the resolved type graph.

use std::path::Path;

use log::info;

use crate::error::CodeGenError;
use crate::typesystem::TypeSystem;

pub fn write_graph_vis_file(types: &TypeSystem, path: &Path) -> Result<(), CodeGenError> {
    info!("Writing type system graph vis file to {}", path.display());

    let mut out = String::from("digraph typesystem {\n");
    for c in types.classes.values() {
        if c.pruned {
            out.push_str(&format!("\t{} [color=gray]\n", c.name));
        }
        for base in &c.deps.bases {
            out.push_str(&format!("\t{} -> {};\n", c.name, base));
        }
        for child in &c.deps.children {
            out.push_str(&format!("\t{} -> {};\n", c.name, child));
        }
        for e in &c.deps.enum_children {
            out.push_str(&format!("\t{} -> {};\n", c.name, e));
        }
    }
    // enums have no further dependencies
    out.push_str("}\n");

    std::fs::write(path, out)
        .map_err(|e| CodeGenError::io("Failed to write graph vis file", e))
        .map_err(|e| e.in_file(path.display().to_string()))
}
