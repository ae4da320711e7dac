use std::io::Write;
use std::time::Instant;

use tracing::{info, warn};

use xmlseed_core::{CompiledSchema, SchemaIndex, validate_schema};

use crate::builder::InstanceTreeBuilder;
use crate::emitter::{InstanceTreeEmitter, emit_diagnostic_document};
use crate::errors::GenerationError;
use crate::generators::IdRegistry;
use crate::model::{GenerateOptions, GenerationIssue, GenerationReport};
use crate::output::{DocumentSink, XmlDocumentWriter};

const NO_ROOT_COMMENT: &str = "No usable root element found in the schema set";

/// Entry point for generating sample documents from a compiled schema set.
#[derive(Debug, Clone, Default)]
pub struct GenerationEngine {
    options: GenerateOptions,
    run_id: Option<String>,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self {
            options,
            run_id: None,
        }
    }

    /// Tag every run of this engine with `run_id` instead of a fresh uuid.
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Build the instance tree for `schema` and drive `sink` with it.
    ///
    /// Every run uses a fresh ID registry, so independent runs never share
    /// identifiers.
    pub fn run<S: DocumentSink + ?Sized>(
        &self,
        schema: &CompiledSchema,
        sink: &mut S,
    ) -> Result<GenerationReport, GenerationError> {
        let start = Instant::now();
        let run_id = self
            .run_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let diagnostics = match validate_schema(schema) {
            Ok(diagnostics) => diagnostics,
            Err(xmlseed_core::Error::EmptySchema) => {
                return Err(GenerationError::InvalidConfig(
                    "compiled schema set is empty".to_string(),
                ));
            }
            Err(err) => return Err(err.into()),
        };

        let mut report = GenerationReport::new(run_id.clone());
        for diagnostic in diagnostics {
            warn!(run_id = %run_id, code = diagnostic.code, "{}", diagnostic.message);
            report.record_warning(GenerationIssue::warning(
                diagnostic.code,
                diagnostic.message,
                None,
            ));
        }

        info!(
            run_id = %run_id,
            elements = schema.elements.len(),
            types = schema.types.len(),
            repetition_cap = self.options.repetition_cap,
            "generation started"
        );

        let index = SchemaIndex::new(schema);
        let builder = InstanceTreeBuilder::new(&index, &self.options, IdRegistry::shared());
        let mut output = match builder.build() {
            Ok(output) => output,
            Err(GenerationError::NoRootElement) => {
                warn!(run_id = %run_id, "no usable root element");
                emit_diagnostic_document(sink, NO_ROOT_COMMENT)?;
                return Err(GenerationError::NoRootElement);
            }
            Err(err) => return Err(err),
        };

        for issue in output.issues.drain(..) {
            report.record_warning(issue);
        }
        report.root = Some(output.root.clone());
        report.instance_nodes = output.tree.len();

        let summary = InstanceTreeEmitter::new(&mut output.tree).emit(sink)?;
        report.emitted = summary.stats;
        report.generator_usage = summary.generator_usage;
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            run_id = %run_id,
            root = %output.root,
            elements = report.emitted.elements,
            attributes = report.emitted.attributes,
            warnings = report.warnings.len(),
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(report)
    }

    /// Generate one XML document into `writer`.
    pub fn generate_to_writer<W: Write>(
        &self,
        schema: &CompiledSchema,
        writer: W,
    ) -> Result<GenerationReport, GenerationError> {
        let mut sink = XmlDocumentWriter::new(writer);
        let mut report = self.run(schema, &mut sink)?;
        report.bytes_written = sink.bytes_written();
        Ok(report)
    }

    /// Generate one XML document as a string.
    pub fn generate_string(
        &self,
        schema: &CompiledSchema,
    ) -> Result<(String, GenerationReport), GenerationError> {
        let mut buffer = Vec::new();
        let report = self.generate_to_writer(schema, &mut buffer)?;
        let xml = String::from_utf8(buffer)
            .map_err(|err| GenerationError::Xml(format!("output is not valid UTF-8: {err}")))?;
        Ok((xml, report))
    }
}
