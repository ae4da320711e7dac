use tracing::debug;

use xmlseed_core::{Builtin, Facets, QName, ResolvedType, SchemaIndex, SimpleTypeDef, SimpleVariety};

use crate::generators::{
    BinaryEncoding, BinaryGenerator, BooleanGenerator, DecimalGenerator, DurationGenerator,
    EnumCycle, FloatGenerator, FloatWidth, IdGenerator, IdRefGenerator, IdRegistryHandle,
    IntegerGenerator, ListGenerator, TemporalGenerator, TemporalKind, TextFlavor, TextGenerator,
    UnionGenerator, ValueGenerator,
};

/// Union and list members may name each other; deeper chains fall back to text.
const MAX_TYPE_DEPTH: usize = 16;

/// Maps simple types and built-ins to fresh value generators.
pub struct GeneratorFactory<'a> {
    index: &'a SchemaIndex<'a>,
    list_length: usize,
    registry: IdRegistryHandle,
}

impl<'a> GeneratorFactory<'a> {
    pub fn new(index: &'a SchemaIndex<'a>, list_length: usize, registry: IdRegistryHandle) -> Self {
        Self {
            index,
            list_length,
            registry,
        }
    }

    /// Generator for untyped content and unresolved types.
    pub fn universal(&self, prefix: &str) -> ValueGenerator {
        let mut generator = ValueGenerator::Text(TextGenerator::universal());
        generator.set_prefix(prefix);
        generator
    }

    /// Generator for a named simple type or built-in.
    ///
    /// `None` when the name is unknown or names a complex type.
    pub fn for_type(&self, type_name: &QName, prefix: &str) -> Option<ValueGenerator> {
        let mut generator = self.resolve(type_name, 0)?;
        generator.set_prefix(prefix);
        Some(generator)
    }

    pub fn for_simple_type(&self, def: &SimpleTypeDef, prefix: &str) -> ValueGenerator {
        let mut generator = self.simple(def, 0);
        generator.set_prefix(prefix);
        generator
    }

    fn resolve(&self, type_name: &QName, depth: usize) -> Option<ValueGenerator> {
        if depth > MAX_TYPE_DEPTH {
            debug!(type_name = %type_name, "simple type chain too deep, using text");
            return Some(ValueGenerator::Text(TextGenerator::plain(&Facets::default())));
        }
        match self.index.resolve_type(type_name)? {
            ResolvedType::Builtin(builtin) => Some(self.builtin(builtin, &Facets::default(), depth)),
            ResolvedType::Simple(def) => Some(self.simple(def, depth)),
            ResolvedType::Complex(_) => None,
        }
    }

    fn simple(&self, def: &SimpleTypeDef, depth: usize) -> ValueGenerator {
        if let Some(cycle) = EnumCycle::new(&def.facets.enumeration) {
            return ValueGenerator::Enumerated(cycle);
        }
        match &def.variety {
            SimpleVariety::Atomic { primitive } => self.builtin(*primitive, &def.facets, depth),
            SimpleVariety::List { item_type } => {
                let item = self
                    .resolve(item_type, depth + 1)
                    .unwrap_or_else(|| ValueGenerator::Text(TextGenerator::universal()));
                ValueGenerator::List(ListGenerator::new(item, &def.facets, self.list_length))
            }
            SimpleVariety::Union { member_types } => {
                let members: Vec<ValueGenerator> = member_types
                    .iter()
                    .filter_map(|member| self.resolve(member, depth + 1))
                    .collect();
                if members.is_empty() {
                    ValueGenerator::Text(TextGenerator::universal())
                } else {
                    ValueGenerator::Union(UnionGenerator::new(members))
                }
            }
        }
    }

    /// Generator for a built-in restricted by `facets`.
    pub fn builtin(&self, builtin: Builtin, facets: &Facets, depth: usize) -> ValueGenerator {
        if let Some(cycle) = EnumCycle::new(&facets.enumeration) {
            return ValueGenerator::Enumerated(cycle);
        }
        if let Some(item) = builtin.list_item() {
            let item = self.builtin(item, &Facets::default(), depth + 1);
            return ValueGenerator::List(ListGenerator::new(item, facets, self.list_length));
        }

        match builtin {
            Builtin::AnyType | Builtin::AnySimpleType => {
                ValueGenerator::Text(TextGenerator::universal())
            }
            Builtin::String
            | Builtin::NormalizedString
            | Builtin::Token
            | Builtin::Name
            | Builtin::NcName
            | Builtin::NmToken
            | Builtin::Entity
            | Builtin::QName
            | Builtin::Notation
            | Builtin::IdRefs
            | Builtin::NmTokens
            | Builtin::Entities => ValueGenerator::Text(TextGenerator::plain(facets)),
            Builtin::Language => ValueGenerator::Enumerated(EnumCycle::language()),
            Builtin::AnyUri => ValueGenerator::Text(TextGenerator::new(TextFlavor::Uri, facets)),
            Builtin::Id => ValueGenerator::Id(IdGenerator::new(self.registry.clone())),
            Builtin::IdRef => ValueGenerator::IdRef(IdRefGenerator::new(self.registry.clone())),
            Builtin::Boolean => ValueGenerator::Boolean(BooleanGenerator::default()),
            Builtin::Decimal => ValueGenerator::Decimal(DecimalGenerator::new(facets)),
            Builtin::Integer
            | Builtin::NonPositiveInteger
            | Builtin::NegativeInteger
            | Builtin::Long
            | Builtin::Int
            | Builtin::Short
            | Builtin::Byte
            | Builtin::NonNegativeInteger
            | Builtin::PositiveInteger
            | Builtin::UnsignedLong
            | Builtin::UnsignedInt
            | Builtin::UnsignedShort
            | Builtin::UnsignedByte => ValueGenerator::Integer(IntegerGenerator::new(builtin, facets)),
            Builtin::Float => ValueGenerator::Float(FloatGenerator::new(FloatWidth::Single, facets)),
            Builtin::Double => {
                ValueGenerator::Float(FloatGenerator::new(FloatWidth::Double, facets))
            }
            Builtin::Duration => ValueGenerator::Duration(DurationGenerator::new(facets)),
            Builtin::DateTime
            | Builtin::Date
            | Builtin::Time
            | Builtin::GYear
            | Builtin::GYearMonth
            | Builtin::GMonth
            | Builtin::GMonthDay
            | Builtin::GDay => TemporalKind::from_builtin(builtin)
                .and_then(|kind| TemporalGenerator::new(kind, facets))
                .map(ValueGenerator::Temporal)
                .unwrap_or_else(|| {
                    debug!(builtin = builtin.local_name(), "no temporal range, using text");
                    ValueGenerator::Text(TextGenerator::plain(facets))
                }),
            Builtin::HexBinary => {
                ValueGenerator::Binary(BinaryGenerator::new(BinaryEncoding::Hex, facets))
            }
            Builtin::Base64Binary => {
                ValueGenerator::Binary(BinaryGenerator::new(BinaryEncoding::Base64, facets))
            }
        }
    }
}
