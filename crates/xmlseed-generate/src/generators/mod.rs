//! Deterministic value generators for simple types.
//!
//! Every generator is a small state machine: successive calls walk the value
//! space of its datatype, touching the facet boundaries early, so repeated
//! elements show a spread of valid values instead of one constant.

pub mod binary;
pub mod boundary;
pub mod composite;
pub mod factory;
pub mod identity;
pub mod numeric;
pub mod temporal;
pub mod text;

pub use binary::{BinaryEncoding, BinaryGenerator};
pub use boundary::{BoundaryCycle, CycleDomain};
pub use composite::{ListGenerator, UnionGenerator};
pub use factory::GeneratorFactory;
pub use identity::{IdGenerator, IdRefGenerator, IdRegistry, IdRegistryHandle};
pub use numeric::{DecimalGenerator, FloatGenerator, FloatWidth, IntegerGenerator};
pub use temporal::{DurationGenerator, TemporalGenerator, TemporalKind};
pub use text::{BooleanGenerator, EnumCycle, TextFlavor, TextGenerator};

/// Value generator attached to an element, attribute or simple content.
#[derive(Debug, Clone)]
pub enum ValueGenerator {
    Enumerated(EnumCycle),
    Text(TextGenerator),
    Boolean(BooleanGenerator),
    Integer(IntegerGenerator),
    Decimal(DecimalGenerator),
    Float(FloatGenerator),
    Duration(DurationGenerator),
    Temporal(TemporalGenerator),
    Binary(BinaryGenerator),
    Id(IdGenerator),
    IdRef(IdRefGenerator),
    Union(UnionGenerator),
    List(ListGenerator),
}

impl ValueGenerator {
    pub fn next_value(&mut self) -> String {
        match self {
            ValueGenerator::Enumerated(generator) => generator.next_value(),
            ValueGenerator::Text(generator) => generator.next_value(),
            ValueGenerator::Boolean(generator) => generator.next_value(),
            ValueGenerator::Integer(generator) => generator.next_value(),
            ValueGenerator::Decimal(generator) => generator.next_value(),
            ValueGenerator::Float(generator) => generator.next_value(),
            ValueGenerator::Duration(generator) => generator.next_value(),
            ValueGenerator::Temporal(generator) => generator.next_value(),
            ValueGenerator::Binary(generator) => generator.next_value(),
            ValueGenerator::Id(generator) => generator.next_value(),
            ValueGenerator::IdRef(generator) => generator.next_value(),
            ValueGenerator::Union(generator) => generator.next_value(),
            ValueGenerator::List(generator) => generator.next_value(),
        }
    }

    /// Set the naming prefix used by string-like and identity generators.
    pub fn set_prefix(&mut self, prefix: &str) {
        match self {
            ValueGenerator::Text(generator) => generator.set_prefix(prefix),
            ValueGenerator::Id(generator) => generator.set_prefix(prefix),
            ValueGenerator::IdRef(generator) => generator.set_prefix(prefix),
            ValueGenerator::Union(generator) => generator.set_prefix(prefix),
            ValueGenerator::List(generator) => generator.set_prefix(prefix),
            _ => {}
        }
    }

    /// Stable identifier used in generation reports.
    pub fn id(&self) -> &'static str {
        match self {
            ValueGenerator::Enumerated(_) => "enumeration",
            ValueGenerator::Text(generator) => match generator.flavor() {
                TextFlavor::Plain => "text",
                TextFlavor::Uri => "text.uri",
                TextFlavor::Universal => "text.any",
            },
            ValueGenerator::Boolean(_) => "boolean",
            ValueGenerator::Integer(_) => "integer",
            ValueGenerator::Decimal(_) => "decimal",
            ValueGenerator::Float(generator) => match generator.width() {
                FloatWidth::Single => "float",
                FloatWidth::Double => "double",
            },
            ValueGenerator::Duration(_) => "duration",
            ValueGenerator::Temporal(generator) => generator.kind().id(),
            ValueGenerator::Binary(generator) => match generator.encoding() {
                BinaryEncoding::Hex => "binary.hex",
                BinaryEncoding::Base64 => "binary.base64",
            },
            ValueGenerator::Id(_) => "id",
            ValueGenerator::IdRef(_) => "idref",
            ValueGenerator::Union(_) => "union",
            ValueGenerator::List(_) => "list",
        }
    }
}
