//! Core contracts for xmlseed.
//!
//! This crate defines the compiled schema model consumed by the sample
//! generator, the facet view of simple types, and lookup helpers shared by the
//! generator and the CLI.

pub mod error;
pub mod facets;
pub mod graph;
pub mod qname;
pub mod schema;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use facets::{Bound, Facets};
pub use graph::{ResolvedType, SchemaIndex};
pub use qname::{QName, XML_NAMESPACE, XSI_NAMESPACE, XS_NAMESPACE};
pub use schema::{
    AttributeDecl, AttributeUsage, AttributeUse, CompiledSchema, ComplexTypeDef, ContentType,
    Derivation, ElementDecl, Form, NamespaceConstraint, Occurs, Particle, ProcessContents,
    SimpleTypeDef, SimpleVariety, Term, TypeDefinition, Wildcard,
};
pub use types::{Builtin, WhiteSpace};
pub use validation::{DiagnosticSeverity, SchemaDiagnostic, validate_schema};

/// Current contract version for compiled schema artifacts.
pub const SCHEMA_VERSION: &str = "0.1";
