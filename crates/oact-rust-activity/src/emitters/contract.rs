use minijinja::context;
use oact_core::GeneratedFile;
use oact_core::config::OactConfig;
use oact_core::error::GeneratorError;
use oact_core::ir::{IrArgument, IrOperation, IrSpec, SCHEDULE_TO_CLOSE_TIMEOUT_SECS};

use super::{header, render};
use crate::type_mapper::{doc_lines, ir_type_to_rust, rust_ident, snake_name, string_literal};

/// Emit `<contract>.rs`: the activity trait, its request objects, per-activity
/// options and the failure type.
pub fn emit_contract(ir: &IrSpec, config: &OactConfig) -> Result<GeneratedFile, GeneratorError> {
    let operations: Vec<minijinja::Value> = ir.operations.iter().map(operation_ctx).collect();

    let requests: Vec<minijinja::Value> = ir
        .operations
        .iter()
        .filter(|op| op.uses_request_object())
        .map(|op| {
            let fields: Vec<minijinja::Value> = op
                .arguments()
                .iter()
                .map(|arg| {
                    context! {
                        ident => rust_ident(&arg.field_name),
                        type_str => ir_type_to_rust(&arg.arg_type),
                        docs => arg.description.as_deref().map(doc_lines).unwrap_or_default(),
                    }
                })
                .collect();
            context! {
                name => op.request_type_name(),
                method => method_name(op),
                fields => fields,
            }
        })
        .collect();

    let content = render(
        "contract.rs.j2",
        include_str!("../../templates/contract.rs.j2"),
        context! {
            header => header(ir),
            title => ir.info.title.clone(),
            docs => ir.info.description.as_deref().map(doc_lines).unwrap_or_default(),
            contract_name => config.contract_name.clone(),
            schedule_to_close_secs => SCHEDULE_TO_CLOSE_TIMEOUT_SECS,
            operations => operations,
            requests => requests,
        },
    )?;

    Ok(GeneratedFile {
        path: format!("{}.rs", contract_module(config)),
        content,
    })
}

/// Module name of the contract file, e.g. `api_activity`. Not keyword-escaped.
pub fn contract_module(config: &OactConfig) -> String {
    snake_name(&config.contract_name)
}

/// Method name shared by the trait, the implementation and the client call.
pub fn method_name(op: &IrOperation) -> String {
    rust_ident(&op.name.snake_case)
}

/// Rendered return type of an operation's method, `()` when it returns nothing.
pub fn return_type(op: &IrOperation) -> String {
    op.return_type()
        .map(ir_type_to_rust)
        .unwrap_or_else(|| "()".to_string())
}

/// The method's parameter list after `&self`.
///
/// Flattened operations take their request object; the others take one
/// parameter per argument in [`IrOperation::arguments`] order.
pub fn parameters(op: &IrOperation) -> Vec<String> {
    if op.uses_request_object() {
        return vec![format!("request: requests::{}", op.request_type_name())];
    }
    op.arguments().iter().map(parameter).collect()
}

fn parameter(arg: &IrArgument) -> String {
    format!("{}: {}", rust_ident(&arg.field_name), ir_type_to_rust(&arg.arg_type))
}

fn operation_ctx(op: &IrOperation) -> minijinja::Value {
    let policy = op.retry_policy;
    context! {
        id => string_literal(&op.name.original),
        method => method_name(op),
        options_const => op.name.screaming_snake.clone(),
        params => parameters(op),
        return_type => return_type(op),
        docs => operation_docs(op),
        deprecated => op.deprecated,
        initial_interval_secs => policy.initial_interval_secs,
        maximum_interval_secs => policy.maximum_interval_secs,
        backoff_coefficient => format!("{:?}", policy.backoff_coefficient),
        maximum_attempts => policy.maximum_attempts,
    }
}

fn operation_docs(op: &IrOperation) -> Vec<String> {
    let mut blocks: Vec<Vec<String>> = Vec::new();
    if let Some(summary) = &op.summary {
        blocks.push(doc_lines(summary));
    }
    if let Some(description) = &op.description {
        blocks.push(doc_lines(description));
    }
    blocks.push(vec![format!(" `{} {}`", op.method.as_str(), op.path)]);
    blocks.push(vec![if op.idempotent {
        " Idempotent: safe to retry.".to_string()
    } else {
        " Not idempotent: retry with caution.".to_string()
    }]);

    let mut lines = Vec::new();
    for block in blocks.into_iter().filter(|b| !b.is_empty()) {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(block);
    }
    lines
}
