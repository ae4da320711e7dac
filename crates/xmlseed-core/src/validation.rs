use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::graph::SchemaIndex;
use crate::qname::QName;
use crate::schema::{CompiledSchema, ContentType, Particle, SimpleVariety, Term, TypeDefinition};

/// Severity of a schema diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Warning,
}

/// Non-fatal finding about a compiled schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDiagnostic {
    pub severity: DiagnosticSeverity,
    pub code: &'static str,
    pub message: String,
}

impl SchemaDiagnostic {
    fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            code,
            message: message.into(),
        }
    }
}

/// Validate internal consistency of a compiled schema set.
///
/// Hard errors:
/// - an empty schema set
/// - duplicate global element, type or attribute names
///
/// Dangling references and abstract types without a concrete derivation are
/// reported as diagnostics; generation skips what it cannot resolve.
pub fn validate_schema(schema: &CompiledSchema) -> Result<Vec<SchemaDiagnostic>> {
    if schema.is_empty() {
        return Err(Error::EmptySchema);
    }

    let mut seen = BTreeSet::new();
    for element in &schema.elements {
        if !seen.insert(&element.name) {
            return Err(Error::InvalidSchema(format!(
                "duplicate global element: {}",
                element.name
            )));
        }
    }

    let mut seen = BTreeSet::new();
    for definition in &schema.types {
        if !seen.insert(definition.name()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate global type: {}",
                definition.name()
            )));
        }
    }

    let mut seen = BTreeSet::new();
    for attribute in &schema.attributes {
        if !seen.insert(&attribute.name) {
            return Err(Error::InvalidSchema(format!(
                "duplicate global attribute: {}",
                attribute.name
            )));
        }
    }

    let index = SchemaIndex::new(schema);
    let mut diagnostics = Vec::new();

    for element in &schema.elements {
        check_type_ref(&index, element.type_name.as_ref(), &element.name, &mut diagnostics);
        if let Some(head) = &element.substitution_group
            && index.element(head).is_none()
        {
            diagnostics.push(SchemaDiagnostic::warning(
                "missing_substitution_head",
                format!("element {} names unknown substitution head {}", element.name, head),
            ));
        }
    }

    for attribute in &schema.attributes {
        check_type_ref(&index, attribute.type_name.as_ref(), &attribute.name, &mut diagnostics);
    }

    for definition in &schema.types {
        match definition {
            TypeDefinition::Simple(def) => match &def.variety {
                SimpleVariety::Atomic { .. } => {}
                SimpleVariety::List { item_type } => {
                    check_type_ref(&index, Some(item_type), &def.name, &mut diagnostics);
                }
                SimpleVariety::Union { member_types } => {
                    for member in member_types {
                        check_type_ref(&index, Some(member), &def.name, &mut diagnostics);
                    }
                }
            },
            TypeDefinition::Complex(def) => {
                match &def.content {
                    ContentType::Empty => {}
                    ContentType::Simple { type_name } => {
                        check_type_ref(&index, Some(type_name), &def.name, &mut diagnostics);
                    }
                    ContentType::Elements { particle } => {
                        check_particle(&index, particle, &def.name, &mut diagnostics);
                    }
                }
                for attribute_use in &def.attributes {
                    check_type_ref(
                        &index,
                        attribute_use.attribute.type_name.as_ref(),
                        &attribute_use.attribute.name,
                        &mut diagnostics,
                    );
                }
                if def.is_abstract && index.concrete_derived_type(&def.name).is_none() {
                    diagnostics.push(SchemaDiagnostic::warning(
                        "abstract_type_without_derivation",
                        format!("abstract type {} has no concrete derived type", def.name),
                    ));
                }
            }
        }
    }

    Ok(diagnostics)
}

fn check_type_ref(
    index: &SchemaIndex<'_>,
    type_name: Option<&QName>,
    owner: &QName,
    diagnostics: &mut Vec<SchemaDiagnostic>,
) {
    if let Some(type_name) = type_name
        && index.resolve_type(type_name).is_none()
    {
        diagnostics.push(SchemaDiagnostic::warning(
            "unresolved_type",
            format!("{owner} references unknown type {type_name}"),
        ));
    }
}

fn check_particle(
    index: &SchemaIndex<'_>,
    particle: &Particle,
    owner: &QName,
    diagnostics: &mut Vec<SchemaDiagnostic>,
) {
    match &particle.term {
        Term::Element(decl) => {
            check_type_ref(index, decl.type_name.as_ref(), &decl.name, diagnostics);
        }
        Term::ElementRef { name } => {
            if index.element(name).is_none() {
                diagnostics.push(SchemaDiagnostic::warning(
                    "unresolved_element",
                    format!("{owner} references unknown element {name}"),
                ));
            }
        }
        Term::Sequence { particles } | Term::Choice { particles } | Term::All { particles } => {
            for child in particles {
                check_particle(index, child, owner, diagnostics);
            }
        }
        Term::Any(_) => {}
    }
}
