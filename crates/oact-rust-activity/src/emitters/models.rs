use log::debug;
use minijinja::context;
use oact_core::GeneratedFile;
use oact_core::error::GeneratorError;
use oact_core::ir::{IrModel, IrSpec};

use super::{header, render};
use crate::type_mapper::{
    doc_lines, escape_keyword, ir_type_to_rust_field, is_optional_field, rust_ident, snake_name,
    string_literal,
};

/// Directory the model files are written to, relative to the output directory.
pub const MODELS_DIR: &str = "models";

/// Emit one `models/<name>.rs` per component schema with properties, plus
/// `models/mod.rs`. Returns no files when no schema has properties.
///
/// Schemas without properties are enumerations or aliases and get no struct.
pub fn emit_models(ir: &IrSpec) -> Result<Vec<GeneratedFile>, GeneratorError> {
    let mut files = Vec::new();
    let mut modules = Vec::new();

    for model in &ir.models {
        if model.fields.is_empty() {
            debug!("skipping model {} without properties", model.name);
            continue;
        }

        let module = snake_name(&model.name.pascal_case);
        files.push(GeneratedFile {
            path: format!("{MODELS_DIR}/{module}.rs"),
            content: emit_model(ir, model)?,
        });
        modules.push(context! {
            module => escape_keyword(&module),
            name => model.name.pascal_case.clone(),
        });
    }

    if modules.is_empty() {
        return Ok(files);
    }

    let content = render(
        "models_mod.rs.j2",
        include_str!("../../templates/models_mod.rs.j2"),
        context! {
            header => header(ir),
            modules => modules,
        },
    )?;
    files.push(GeneratedFile {
        path: format!("{MODELS_DIR}/mod.rs"),
        content,
    });

    Ok(files)
}

fn emit_model(ir: &IrSpec, model: &IrModel) -> Result<String, GeneratorError> {
    let name = &model.name.pascal_case;
    let fields: Vec<minijinja::Value> = model
        .fields
        .iter()
        .map(|f| {
            let snake = snake_name(&f.field_name);
            context! {
                ident => escape_keyword(&snake),
                setter => format!("set_{}", snake.trim_start_matches('_')),
                rename => string_literal(&f.original_name),
                type_str => ir_type_to_rust_field(&f.field_type, name),
                optional => is_optional_field(&f.field_type, name),
                docs => f.description.as_deref().map(doc_lines).unwrap_or_default(),
            }
        })
        .collect();

    let params: Vec<String> = model
        .fields
        .iter()
        .map(|f| {
            format!(
                "{}: {}",
                rust_ident(&f.field_name),
                ir_type_to_rust_field(&f.field_type, name)
            )
        })
        .collect();

    render(
        "model.rs.j2",
        include_str!("../../templates/model.rs.j2"),
        context! {
            header => header(ir),
            name => name,
            docs => model.description.as_deref().map(doc_lines).unwrap_or_default(),
            fields => fields,
            params => params,
        },
    )
}
