//! CPACSGen generates the CPACS C++ object model, together with XML
//! readers and writers, from the CPACS XML Schema.
//!
//! The pipeline runs tables -> schema front-end -> type-system builder ->
//! emitter -> file sink, strictly in that order.

pub mod codegen;
pub mod error;
pub mod fs;
pub mod schema;
pub mod tables;
pub mod typesystem;

use std::path::Path;

use log::info;

pub use codegen::{generate_code, write_graph_vis_file, GeneratorOptions};
pub use error::{CodeGenError, CodeGenErrorKind};
pub use fs::Filesystem;
pub use schema::{parse_schema, parse_schema_str, SchemaTypes};
pub use tables::Tables;
pub use typesystem::{build_type_system, TypeSystem};

const SCHEMA_FILE_NAME: &str = "cpacs_schema.xsd";

const RUNTIME_FILES: [&str; 3] = ["TixiHelper.h", "TixiHelper.cpp", "UniquePtr.h"];

/// Run the full generator.
///
/// `config_dir` holds the schema, the table files and optionally one level
/// of subdirectories generated as sub-namespaces. `runtime_src_dir` holds
/// the hand-written support files copied into `output_dir`.
pub fn run_generator(
    config_dir: &Path,
    runtime_src_dir: &Path,
    output_dir: &Path,
    graph_output_path: Option<&Path>,
) -> Result<(), CodeGenError> {
    let mut fs = Filesystem::new();

    run_single(config_dir, output_dir, "", graph_output_path, &mut fs)?;

    // nested config directories become sub-namespaces, one level deep
    let mut subdirs = Vec::new();
    if let Ok(entries) = std::fs::read_dir(config_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && path.join(SCHEMA_FILE_NAME).is_file() {
                subdirs.push(path);
            }
        }
    }
    subdirs.sort();
    for subdir in subdirs {
        let Some(name) = subdir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        run_single(&subdir, &output_dir.join(name), name, None, &mut fs)?;
    }

    info!("Copying runtime");
    for file in RUNTIME_FILES {
        let source = runtime_src_dir.join(file);
        let content = std::fs::read_to_string(&source)
            .map_err(|e| CodeGenError::io("Failed to read runtime file", e))
            .map_err(|e| e.in_file(source.display().to_string()))?;
        fs.new_file(output_dir.join(file), content);
    }

    fs.flush_to_disk()?;

    info!("\tWrote   {:5} new files", fs.created);
    info!("\tUpdated {:5} existing files", fs.overwritten);
    info!("\tSkipped {:5} files, no changes", fs.skipped);
    info!("\tDeleted {:5} files of pruned types", fs.deleted);

    Ok(())
}

fn run_single(
    config_dir: &Path,
    output_dir: &Path,
    namespace: &str,
    graph_output_path: Option<&Path>,
    fs: &mut Filesystem,
) -> Result<(), CodeGenError> {
    let tables = Tables::load(config_dir);

    let schema_path = config_dir.join(SCHEMA_FILE_NAME);
    info!("Parsing {}", schema_path.display());
    let schema = parse_schema(&schema_path)?;

    let types = build_type_system(schema, &tables)?;

    if let Some(graph_path) = graph_output_path {
        write_graph_vis_file(&types, graph_path)?;
    }

    std::fs::create_dir_all(output_dir)
        .map_err(|e| CodeGenError::io("Failed to create output directory", e))
        .map_err(|e| e.in_file(output_dir.display().to_string()))?;

    info!("Generating classes");
    generate_code(
        output_dir,
        &types,
        namespace,
        &tables,
        &GeneratorOptions::default(),
        fs,
    )
}
