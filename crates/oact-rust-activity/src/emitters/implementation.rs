use minijinja::context;
use oact_core::GeneratedFile;
use oact_core::config::OactConfig;
use oact_core::error::GeneratorError;
use oact_core::ir::{IrOperation, IrSpec};

use super::contract::{contract_module, method_name, parameters, return_type};
use super::{header, render};
use crate::type_mapper::{escape_keyword, rust_ident, snake_name};

/// Emit `<contract>_impl.rs`: `<Contract>Impl`, which runs every activity by
/// calling the generated HTTP client and wraps its failures.
pub fn emit_implementation(
    ir: &IrSpec,
    config: &OactConfig,
) -> Result<GeneratedFile, GeneratorError> {
    let operations: Vec<minijinja::Value> = ir.operations.iter().map(operation_ctx).collect();
    let module = contract_module(config);

    let mut imports = vec!["API_ERROR", "ActivityFailure", config.contract_name.as_str()];
    if ir.operations.iter().any(IrOperation::uses_request_object) {
        imports.push("requests");
    }
    let contract_use = format!(
        "use {}::{}::{{{}}};",
        config.package,
        escape_keyword(&module),
        imports.join(", ")
    );

    let content = render(
        "implementation.rs.j2",
        include_str!("../../templates/implementation.rs.j2"),
        context! {
            header => header(ir),
            contract_use => contract_use,
            contract_name => config.contract_name.clone(),
            client_namespace => config.client_namespace.clone(),
            operations => operations,
        },
    )?;

    Ok(GeneratedFile {
        path: format!("{module}_impl.rs"),
        content,
    })
}

/// Client module for the operation's first tag, e.g. `pets_api`.
pub fn client_module(op: &IrOperation) -> String {
    escape_keyword(&format!("{}_api", snake_name(op.client_group())))
}

/// Arguments passed to the client function, in contract order.
pub fn call_arguments(op: &IrOperation) -> Vec<String> {
    let flattened = op.uses_request_object();
    op.arguments()
        .iter()
        .map(|arg| {
            let ident = rust_ident(&arg.field_name);
            if flattened {
                format!("request.{ident}")
            } else {
                ident
            }
        })
        .collect()
}

fn operation_ctx(op: &IrOperation) -> minijinja::Value {
    context! {
        method => method_name(op),
        params => parameters(op),
        return_type => return_type(op),
        client_module => client_module(op),
        call_args => call_arguments(op),
        is_void => op.return_type().is_none(),
    }
}
