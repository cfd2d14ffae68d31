pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod pipeline;
pub mod transform;

/// A generated file with a path relative to the output directory, and its content.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for code generators that produce files from an IR spec.
///
/// Generators are pure: they only read the IR and return files. Writing them
/// is left to [`pipeline::run`].
pub trait CodeGenerator {
    fn generate(
        &self,
        ir: &ir::IrSpec,
        config: &config::OactConfig,
    ) -> Result<Vec<GeneratedFile>, error::GeneratorError>;
}
