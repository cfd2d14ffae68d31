//! The generation step a host build runs: load the document, build the IR,
//! render every artifact and write it under the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::OactConfig;
use crate::error::{PipelineError, TransformError};
use crate::ir::IrSpec;
use crate::transform::{self, TransformOptions};
use crate::{CodeGenerator, parse};

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Every file written, in generation order.
    pub written: Vec<PathBuf>,
    pub operations: usize,
    pub models: usize,
}

/// Read and transform the document at `path`.
pub fn load_ir(path: &Path, options: &TransformOptions) -> Result<IrSpec, PipelineError> {
    if !path.is_file() {
        return Err(PipelineError::SpecNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let transform_err = |source: TransformError| PipelineError::Transform {
        path: path.to_path_buf(),
        source,
    };
    let spec = parse::from_path_contents(path, &content)
        .map_err(|e| transform_err(e.into()))?;
    transform::transform_with_options(&spec, options).map_err(transform_err)
}

/// Run one generation with `generator`.
///
/// The document is checked before the output directory is touched. Files are
/// written in the order the generator returns them; the first failure aborts
/// the run.
pub fn run(
    config: &OactConfig,
    generator: &dyn CodeGenerator,
) -> Result<GenerationReport, PipelineError> {
    let input = PathBuf::from(&config.input);
    let ir = load_ir(&input, &config.transform_options())?;
    info!(
        "{}: {} operations, {} models",
        input.display(),
        ir.operations.len(),
        ir.models.len()
    );

    let files = generator.generate(&ir, config)?;

    let output_dir = PathBuf::from(&config.output);
    create_dir(&output_dir)?;

    let mut written = Vec::with_capacity(files.len());
    for file in &files {
        let path = output_dir.join(&file.path);
        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }
        fs::write(&path, &file.content).map_err(|source| PipelineError::Write {
            path: path.clone(),
            source,
        })?;
        debug!("wrote {}", path.display());
        written.push(path);
    }

    info!("wrote {} files to {}", written.len(), output_dir.display());

    Ok(GenerationReport {
        written,
        operations: ir.operations.len(),
        models: ir.models.len(),
    })
}

fn create_dir(path: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(path).map_err(|source| PipelineError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
