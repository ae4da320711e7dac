//! Sample XML document generation for xmlseed.
//!
//! This crate consumes a compiled schema set and produces one sample instance
//! document: the builder walks the schema into an instance tree, value
//! generators fill in deterministic, facet-respecting values, and the emitter
//! drives a document sink (XML writer or event recorder).

pub mod builder;
pub mod emitter;
pub mod engine;
pub mod errors;
pub mod facets;
pub mod generators;
pub mod instance;
pub mod model;
pub mod output;

pub use builder::{BuildOutput, InstanceTreeBuilder};
pub use emitter::{EmitSummary, InstanceTreeEmitter};
pub use engine::GenerationEngine;
pub use errors::GenerationError;
pub use generators::{GeneratorFactory, IdRegistry, ValueGenerator};
pub use instance::{InstanceTree, NodeId};
pub use model::{EmitStats, GenerateOptions, GenerationIssue, GenerationReport};
pub use output::{DocumentEvent, DocumentSink, EventRecorder, XmlDocumentWriter};
