use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::transform::TransformOptions;
use crate::transform::spec_to_ir::DEFAULT_MODEL_NAMESPACE;

/// Project configuration loaded from `.oact.yaml`.
///
/// Every field has a default, so a partial file (or no file at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OactConfig {
    /// Path of the OpenAPI document. `.json` is read as JSON, anything else as YAML.
    pub input: String,
    /// Directory the generated files are written to.
    pub output: String,
    /// Module path the generated files are mounted at.
    pub package: String,
    /// Name of the generated trait; the implementation is `<contract_name>Impl`.
    pub contract_name: String,
    /// Module path of the generated HTTP client the implementation delegates to.
    pub client_namespace: String,
    /// Module path that component schema references are qualified with.
    pub model_namespace: String,
    pub generate_implementation: bool,
    pub generate_models: bool,
    pub strict_refs: bool,
}

impl Default for OactConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: "src/generated".to_string(),
            package: "crate::generated".to_string(),
            contract_name: "ApiActivity".to_string(),
            client_namespace: "crate::client".to_string(),
            model_namespace: DEFAULT_MODEL_NAMESPACE.to_string(),
            generate_implementation: true,
            generate_models: true,
            strict_refs: true,
        }
    }
}

impl OactConfig {
    /// The transform options this configuration implies.
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            model_namespace: self.model_namespace.clone(),
            strict_refs: self.strict_refs,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oact.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OactConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: OactConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oact configuration
input: openapi.yaml
output: src/generated
package: crate::generated             # module path the output directory is mounted at

contract_name: ApiActivity            # trait name; the implementation is ApiActivityImpl
client_namespace: crate::client       # generated HTTP client (apis::<tag>_api, apis::configuration)
model_namespace: crate::client::models

generate_implementation: true
generate_models: true

# Fail on $ref targets missing from components/schemas.
# When false the reference is emitted by name and a warning is logged.
strict_refs: true
"#
}
