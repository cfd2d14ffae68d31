use log::debug;
use minijinja::context;
use oact_core::config::OactConfig;
use oact_core::error::GeneratorError;
use oact_core::ir::IrSpec;
use oact_core::{CodeGenerator, GeneratedFile};

use crate::emitters::{self, contract::contract_module, header, render};
use crate::type_mapper::escape_keyword;

/// Generates the activity contract, its client-backed implementation and the
/// data models as Rust source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityGenerator;

impl CodeGenerator for ActivityGenerator {
    fn generate(
        &self,
        ir: &IrSpec,
        config: &OactConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let mut files = vec![emitters::contract::emit_contract(ir, config)?];

        if config.generate_implementation {
            files.push(emitters::implementation::emit_implementation(ir, config)?);
        }

        let mut has_models = false;
        if config.generate_models {
            let models = emitters::models::emit_models(ir)?;
            has_models = !models.is_empty();
            files.extend(models);
        }

        files.push(emit_mod(ir, config, has_models)?);

        debug!(
            "{} files for {} operations",
            files.len(),
            ir.operations.len()
        );
        Ok(files)
    }
}

/// Emit `mod.rs` mounting the generated modules under `config.package`.
fn emit_mod(
    ir: &IrSpec,
    config: &OactConfig,
    has_models: bool,
) -> Result<GeneratedFile, GeneratorError> {
    let module = contract_module(config);
    let content = render(
        "mod.rs.j2",
        include_str!("../templates/mod.rs.j2"),
        context! {
            header => header(ir),
            contract_ident => escape_keyword(&module),
            contract_module => module,
            contract_name => config.contract_name.clone(),
            has_impl => config.generate_implementation,
            has_models => has_models,
        },
    )?;
    Ok(GeneratedFile {
        path: "mod.rs".to_string(),
        content,
    })
}
