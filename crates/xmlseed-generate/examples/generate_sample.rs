use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use xmlseed_core::{CompiledSchema, QName};
use xmlseed_generate::{GenerateOptions, GenerationEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let mut schema_path: Option<PathBuf> = None;
    let mut options = GenerateOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--root" => options.root_element = args.next().map(QName::local),
            "--cap" => {
                let value = args.next().ok_or("missing --cap value")?;
                options.repetition_cap = value.parse()?;
            }
            _ => {
                if schema_path.is_none() {
                    schema_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let schema_path = schema_path.ok_or("missing schema path")?;
    let schema_json = std::fs::read_to_string(&schema_path)?;
    let schema: CompiledSchema = serde_json::from_str(&schema_json)?;

    let engine = GenerationEngine::new(options);
    let (xml, report) = engine.generate_string(&schema)?;

    print!("{xml}");
    eprintln!(
        "elements={} attributes={} warnings={}",
        report.emitted.elements,
        report.emitted.attributes,
        report.warnings.len()
    );
    Ok(())
}
