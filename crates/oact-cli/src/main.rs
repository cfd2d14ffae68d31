use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;

use oact_core::config::{self, CONFIG_FILE_NAME, OactConfig};
use oact_core::ir::IrSpec;
use oact_core::pipeline;
use oact_rust_activity::ActivityGenerator;
use oact_rust_activity::emitters::contract::return_type;
use oact_rust_activity::emitters::implementation::client_module;

#[derive(Parser)]
#[command(
    name = "oact",
    about = "Generate typed, retryable activities from an OpenAPI 3.x spec",
    version
)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the activity contract, implementation and models
    Generate(GenerateArgs),

    /// Validate an OpenAPI spec
    Validate {
        /// Path to the OpenAPI spec file (defaults to `input` from the config)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Inspect the operations and models parsed from an OpenAPI spec
    Inspect {
        /// Path to the OpenAPI spec file (defaults to `input` from the config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new oact configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Flags overriding values from the config file.
#[derive(Args)]
struct GenerateArgs {
    /// Path to the OpenAPI spec file (YAML or JSON)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Module path the output directory is mounted at
    #[arg(long)]
    package: Option<String>,

    /// Name of the generated activity trait
    #[arg(long)]
    contract_name: Option<String>,

    /// Module path of the generated HTTP client
    #[arg(long)]
    client_namespace: Option<String>,

    /// Module path component schema references resolve to
    #[arg(long)]
    model_namespace: Option<String>,

    /// Skip the client-backed implementation
    #[arg(long)]
    no_implementation: bool,

    /// Skip the data models
    #[arg(long)]
    no_models: bool,

    /// Warn instead of failing on dangling schema references
    #[arg(long)]
    lenient_refs: bool,
}

impl GenerateArgs {
    fn apply(self, cfg: &mut OactConfig) {
        if let Some(input) = self.input {
            cfg.input = input.display().to_string();
        }
        if let Some(output) = self.output {
            cfg.output = output.display().to_string();
        }
        if let Some(package) = self.package {
            cfg.package = package;
        }
        if let Some(name) = self.contract_name {
            cfg.contract_name = name;
        }
        if let Some(ns) = self.client_namespace {
            cfg.client_namespace = ns;
        }
        if let Some(ns) = self.model_namespace {
            cfg.model_namespace = ns;
        }
        if self.no_implementation {
            cfg.generate_implementation = false;
        }
        if self.no_models {
            cfg.generate_models = false;
        }
        if self.lenient_refs {
            cfg.strict_refs = false;
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => cmd_generate(&cli.config, args),

        Commands::Validate { input } => cmd_validate(&cli.config, input),

        Commands::Inspect { input, format } => cmd_inspect(&cli.config, input, format),

        Commands::Init { force } => cmd_init(&cli.config, force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oact", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the project config file, falling back to defaults when it is absent.
fn load_config(path: &Path) -> Result<OactConfig> {
    match config::load_config(path).map_err(|e| anyhow::anyhow!(e))? {
        Some(cfg) => {
            debug!("loaded config from {}", path.display());
            Ok(cfg)
        }
        None => {
            debug!("no config at {}, using defaults", path.display());
            Ok(OactConfig::default())
        }
    }
}

fn load_ir(cfg: &OactConfig, input: Option<PathBuf>) -> Result<IrSpec> {
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    pipeline::load_ir(&input, &cfg.transform_options())
        .with_context(|| format!("failed to load {}", input.display()))
}

fn cmd_generate(config_path: &Path, args: GenerateArgs) -> Result<()> {
    let mut cfg = load_config(config_path)?;
    args.apply(&mut cfg);

    eprintln!("Generating {} from {} → {}", cfg.contract_name, cfg.input, cfg.output);
    let report = pipeline::run(&cfg, &ActivityGenerator).context("generation failed")?;

    for path in &report.written {
        eprintln!("  wrote {}", path.display());
    }
    eprintln!(
        "Generated {} files ({} operations, {} models) in {}",
        report.written.len(),
        report.operations,
        report.models,
        cfg.output
    );
    eprintln!("\nThe generated directory should not be edited manually; changes will be overwritten.");
    Ok(())
}

fn cmd_validate(config_path: &Path, input: Option<PathBuf>) -> Result<()> {
    let cfg = load_config(config_path)?;
    let ir = load_ir(&cfg, input)?;

    eprintln!("Valid OpenAPI spec: {}", ir.info.title);
    eprintln!("  Version: {}", ir.info.version);
    eprintln!("  Operations: {}", ir.operations.len());
    eprintln!(
        "  Request objects: {}",
        ir.operations
            .iter()
            .filter(|op| op.uses_request_object())
            .count()
    );
    eprintln!("  Models: {}", ir.models.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(config_path: &Path, input: Option<PathBuf>, format: InspectFormat) -> Result<()> {
    let cfg = load_config(config_path)?;
    let ir = load_ir(&cfg, input)?;

    let summary = build_inspect_summary(&ir);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(ir: &IrSpec) -> serde_json::Value {
    let models: Vec<serde_json::Value> = ir
        .models
        .iter()
        .map(|m| {
            serde_json::json!({
                "name": m.name.pascal_case,
                "fields": m.fields.iter().map(|f| &f.original_name).collect::<Vec<_>>(),
                "generated": !m.fields.is_empty(),
            })
        })
        .collect();

    let operations: Vec<serde_json::Value> = ir
        .operations
        .iter()
        .map(|op| {
            let policy = op.retry_policy;
            serde_json::json!({
                "name": op.name.original,
                "method": op.method.as_str(),
                "path": op.path,
                "client": client_module(op),
                "parameters": op.parameters.iter().map(|p| &p.original_name).collect::<Vec<_>>(),
                "request_object": op.uses_request_object().then(|| op.request_type_name()),
                "returns": return_type(op),
                "idempotent": op.idempotent,
                "retry": {
                    "initial_interval_secs": policy.initial_interval_secs,
                    "maximum_interval_secs": policy.maximum_interval_secs,
                    "backoff_coefficient": policy.backoff_coefficient,
                    "maximum_attempts": policy.maximum_attempts,
                },
                "deprecated": op.deprecated,
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": ir.info.title,
            "version": ir.info.version,
        },
        "operations": operations,
        "models": models,
    })
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
