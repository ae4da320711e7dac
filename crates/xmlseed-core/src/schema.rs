use schemars::schema::RootSchema;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};

use crate::facets::Facets;
use crate::qname::QName;
use crate::types::Builtin;

/// Compiled schema set handed over by a schema compiler.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompiledSchema {
    /// Contract version for this schema format.
    pub schema_version: String,
    /// Global element declarations in declaration order.
    #[serde(default)]
    pub elements: Vec<ElementDecl>,
    /// Global simple and complex type definitions.
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
    /// Global attribute declarations.
    #[serde(default)]
    pub attributes: Vec<AttributeDecl>,
    /// Optional fingerprint of the source schema documents.
    #[serde(default)]
    pub schema_fingerprint: Option<String>,
}

impl CompiledSchema {
    pub fn new(schema_version: impl Into<String>) -> Self {
        Self {
            schema_version: schema_version.into(),
            elements: Vec::new(),
            types: Vec::new(),
            attributes: Vec::new(),
            schema_fingerprint: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.types.is_empty() && self.attributes.is_empty()
    }

    /// JSON Schema of the compiled schema artifact, as accepted by the CLI.
    pub fn json_schema() -> RootSchema {
        schema_for!(CompiledSchema)
    }
}

/// Element declaration, global or local.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ElementDecl {
    pub name: QName,
    /// Declared type; `None` stands for `xs:anyType`.
    #[serde(default)]
    pub type_name: Option<QName>,
    #[serde(default)]
    pub nillable: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub fixed: Option<String>,
    /// Head of the substitution group this element belongs to.
    #[serde(default)]
    pub substitution_group: Option<QName>,
    #[serde(default)]
    pub form: Form,
}

impl ElementDecl {
    pub fn new(name: QName, type_name: Option<QName>) -> Self {
        Self {
            name,
            type_name,
            nillable: false,
            is_abstract: false,
            default: None,
            fixed: None,
            substitution_group: None,
            form: Form::default(),
        }
    }
}

/// Whether a local declaration is namespace qualified in instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Form {
    Qualified,
    #[default]
    Unqualified,
}

/// Global type definition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDefinition {
    Simple(SimpleTypeDef),
    Complex(ComplexTypeDef),
}

impl TypeDefinition {
    pub fn name(&self) -> &QName {
        match self {
            TypeDefinition::Simple(def) => &def.name,
            TypeDefinition::Complex(def) => &def.name,
        }
    }

    pub fn base(&self) -> Option<&QName> {
        match self {
            TypeDefinition::Simple(def) => def.base.as_ref(),
            TypeDefinition::Complex(def) => def.base.as_ref(),
        }
    }
}

/// Simple type with its effective facets.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SimpleTypeDef {
    pub name: QName,
    #[serde(default)]
    pub base: Option<QName>,
    pub variety: SimpleVariety,
    #[serde(default)]
    pub facets: Facets,
}

/// Atomic, list or union variety of a simple type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimpleVariety {
    /// Restriction of a built-in primitive or derived datatype.
    Atomic { primitive: Builtin },
    List { item_type: QName },
    Union { member_types: Vec<QName> },
}

/// Complex type definition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ComplexTypeDef {
    pub name: QName,
    #[serde(default)]
    pub base: Option<QName>,
    #[serde(default)]
    pub derivation: Derivation,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub mixed: bool,
    #[serde(default)]
    pub content: ContentType,
    #[serde(default)]
    pub attributes: Vec<AttributeUse>,
    #[serde(default)]
    pub attribute_wildcard: Option<Wildcard>,
}

impl ComplexTypeDef {
    pub fn new(name: QName, content: ContentType) -> Self {
        Self {
            name,
            base: None,
            derivation: Derivation::default(),
            is_abstract: false,
            mixed: false,
            content,
            attributes: Vec::new(),
            attribute_wildcard: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Derivation {
    Extension,
    #[default]
    Restriction,
}

/// Content model of a complex type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Empty,
    /// Simple content whose value space is described by `type_name`.
    Simple { type_name: QName },
    /// Element-only or mixed content.
    Elements { particle: Particle },
}

/// Upper occurrence bound of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Occurs {
    Bounded(u64),
    Unbounded,
}

impl Default for Occurs {
    fn default() -> Self {
        Occurs::Bounded(1)
    }
}

fn default_min_occurs() -> u64 {
    1
}

/// Content-model particle with occurrence bounds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Particle {
    #[serde(default = "default_min_occurs")]
    pub min_occurs: u64,
    #[serde(default)]
    pub max_occurs: Occurs,
    pub term: Term,
}

impl Particle {
    pub fn new(term: Term) -> Self {
        Self {
            min_occurs: 1,
            max_occurs: Occurs::Bounded(1),
            term,
        }
    }

    pub fn element(decl: ElementDecl) -> Self {
        Self::new(Term::Element(decl))
    }

    pub fn element_ref(name: QName) -> Self {
        Self::new(Term::ElementRef { name })
    }

    pub fn sequence(particles: Vec<Particle>) -> Self {
        Self::new(Term::Sequence { particles })
    }

    pub fn choice(particles: Vec<Particle>) -> Self {
        Self::new(Term::Choice { particles })
    }

    pub fn all(particles: Vec<Particle>) -> Self {
        Self::new(Term::All { particles })
    }

    pub fn any(wildcard: Wildcard) -> Self {
        Self::new(Term::Any(wildcard))
    }

    pub fn with_occurs(mut self, min_occurs: u64, max_occurs: Occurs) -> Self {
        self.min_occurs = min_occurs;
        self.max_occurs = max_occurs;
        self
    }
}

/// Term of a particle.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Term {
    /// Local element declaration.
    Element(ElementDecl),
    /// Reference to a global element declaration.
    ElementRef { name: QName },
    Sequence { particles: Vec<Particle> },
    Choice { particles: Vec<Particle> },
    All { particles: Vec<Particle> },
    Any(Wildcard),
}

/// Element or attribute wildcard.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Wildcard {
    #[serde(default)]
    pub namespace: NamespaceConstraint,
    #[serde(default)]
    pub process_contents: ProcessContents,
    /// Target namespace of the schema document that declared the wildcard.
    #[serde(default)]
    pub schema_namespace: String,
}

impl Wildcard {
    pub fn new(namespace: NamespaceConstraint, process_contents: ProcessContents) -> Self {
        Self {
            namespace,
            process_contents,
            schema_namespace: String::new(),
        }
    }
}

/// Namespace constraint of a wildcard.
///
/// `List` entries are namespace URIs or the `##targetNamespace` / `##local`
/// tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceConstraint {
    #[default]
    Any,
    Other,
    TargetNamespace,
    Local,
    List(Vec<String>),
}

impl std::fmt::Display for NamespaceConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamespaceConstraint::Any => f.write_str("##any"),
            NamespaceConstraint::Other => f.write_str("##other"),
            NamespaceConstraint::TargetNamespace => f.write_str("##targetNamespace"),
            NamespaceConstraint::Local => f.write_str("##local"),
            NamespaceConstraint::List(entries) => f.write_str(&entries.join(" ")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProcessContents {
    #[default]
    Strict,
    Lax,
    Skip,
}

impl ProcessContents {
    /// `lax` and `skip` do not require a matching declaration.
    pub fn is_lenient(self) -> bool {
        matches!(self, ProcessContents::Lax | ProcessContents::Skip)
    }
}

/// Attribute declaration, global or local.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AttributeDecl {
    pub name: QName,
    #[serde(default)]
    pub type_name: Option<QName>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub fixed: Option<String>,
    #[serde(default)]
    pub form: Form,
}

impl AttributeDecl {
    pub fn new(name: QName, type_name: Option<QName>) -> Self {
        Self {
            name,
            type_name,
            default: None,
            fixed: None,
            form: Form::default(),
        }
    }
}

/// Attribute declaration as used by a complex type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AttributeUse {
    pub attribute: AttributeDecl,
    #[serde(default, rename = "use")]
    pub usage: AttributeUsage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttributeUsage {
    #[default]
    Optional,
    Required,
    Prohibited,
}
