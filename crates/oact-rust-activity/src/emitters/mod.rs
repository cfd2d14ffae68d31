pub mod contract;
pub mod implementation;
pub mod models;

use minijinja::{Environment, Value};
use oact_core::error::GeneratorError;
use oact_core::ir::IrSpec;

/// Render `source` registered as `name` with the shared environment settings.
pub(crate) fn render(name: &str, source: &str, ctx: Value) -> Result<String, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_template(name, source)
        .map_err(|err| template_error(name, &err))?;
    env.get_template(name)
        .and_then(|tmpl| tmpl.render(ctx))
        .map_err(|err| template_error(name, &err))
}

fn template_error(name: &str, err: &minijinja::Error) -> GeneratorError {
    GeneratorError::Template {
        name: name.to_string(),
        message: err.to_string(),
    }
}

/// First line of every generated file.
pub(crate) fn header(ir: &IrSpec) -> String {
    format!(
        "Generated by oact from `{}` {}. Do not edit.",
        ir.info.title, ir.info.version
    )
}
