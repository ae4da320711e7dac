mod registry;
mod settings;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use registry::{RunContext, init_run_logging, start_run, write_report};
use settings::{OptionOverrides, Settings, SettingsError, load_settings};
use thiserror::Error;
use uuid::Uuid;
use xmlseed_core::{CompiledSchema, SCHEMA_VERSION};
use xmlseed_generate::{GenerationEngine, GenerationError};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "xmlseed", version, about = "Sample XML documents from compiled schemas")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one sample document from a compiled schema (JSON).
    Generate(GenerateArgs),
    /// Print the JSON Schema of the compiled schema model.
    JsonSchema(JsonSchemaArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Compiled schema set (JSON).
    #[arg(value_name = "SCHEMA_JSON")]
    schema: PathBuf,
    /// Output path for the sample document; defaults to the run directory.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Local name of the root element; defaults to the first concrete global element.
    #[arg(long)]
    root: Option<String>,
    /// Namespace of the root element.
    #[arg(long, requires = "root")]
    root_namespace: Option<String>,
    /// Occurrence count used for unbounded and large maxOccurs.
    #[arg(long)]
    repetition_cap: Option<u64>,
    /// Item count for list values without length facets.
    #[arg(long)]
    list_length: Option<usize>,
    /// TOML settings file with option defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long)]
    run_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct JsonSchemaArgs {
    /// Write to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::JsonSchema(args) => run_json_schema(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        schema: schema_path,
        out,
        root,
        root_namespace,
        repetition_cap,
        list_length,
        config,
        run_dir,
    } = args;

    let settings = match &config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    let options = settings.resolve_options(&OptionOverrides {
        root,
        root_namespace,
        repetition_cap,
        list_length,
    })?;
    let run_dir = run_dir
        .or_else(|| settings.run_dir.clone())
        .unwrap_or_else(|| PathBuf::from("runs"));

    let schema: CompiledSchema = serde_json::from_reader(File::open(&schema_path)?)?;
    if schema.schema_version != SCHEMA_VERSION {
        return Err(CliError::InvalidConfig(format!(
            "unsupported schema_version {} (expected {SCHEMA_VERSION})",
            schema.schema_version
        )));
    }

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        schema_path: schema_path.clone(),
        schema_version: schema.schema_version.clone(),
        schema_fingerprint: schema.schema_fingerprint.clone(),
        settings_path: config,
        run_dir,
        out,
        options: options.clone(),
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        schema = %schema_path.display()
    );

    let timer = Instant::now();
    let engine = GenerationEngine::new(options).with_run_id(run_id.clone());
    let mut writer = BufWriter::new(File::create(&run_paths.output_path)?);
    let result = engine.generate_to_writer(&schema, &mut writer);
    writer.flush()?;
    let report = result?;

    tracing::info!(
        event = "sample_written",
        path = %run_paths.output_path.display(),
        bytes = report.bytes_written
    );

    write_report(&run_paths, &report)?;
    tracing::info!(event = "report_written", path = %run_paths.report_path.display());

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(
        event = "run_finished",
        status = "success",
        warnings = report.warnings.len(),
        duration_ms = duration_ms
    );

    println!("{}", run_paths.output_path.display());
    Ok(())
}

fn run_json_schema(args: JsonSchemaArgs) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(&CompiledSchema::json_schema())?;
    match args.out {
        Some(path) => std::fs::write(path, format!("{json}\n"))?,
        None => println!("{json}"),
    }
    Ok(())
}
