use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::qname::{QName, XS_NAMESPACE};

/// Built-in XML Schema datatypes a compiled simple type can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Builtin {
    AnyType,
    AnySimpleType,
    String,
    NormalizedString,
    Token,
    Language,
    Name,
    #[serde(rename = "NCName")]
    NcName,
    #[serde(rename = "ID")]
    Id,
    #[serde(rename = "IDREF")]
    IdRef,
    #[serde(rename = "IDREFS")]
    IdRefs,
    #[serde(rename = "ENTITY")]
    Entity,
    #[serde(rename = "ENTITIES")]
    Entities,
    #[serde(rename = "NMTOKEN")]
    NmToken,
    #[serde(rename = "NMTOKENS")]
    NmTokens,
    #[serde(rename = "anyURI")]
    AnyUri,
    #[serde(rename = "QName")]
    QName,
    #[serde(rename = "NOTATION")]
    Notation,
    Boolean,
    Decimal,
    Integer,
    NonPositiveInteger,
    NegativeInteger,
    Long,
    Int,
    Short,
    Byte,
    NonNegativeInteger,
    PositiveInteger,
    UnsignedLong,
    UnsignedInt,
    UnsignedShort,
    UnsignedByte,
    Float,
    Double,
    Duration,
    DateTime,
    Date,
    Time,
    #[serde(rename = "gYear")]
    GYear,
    #[serde(rename = "gYearMonth")]
    GYearMonth,
    #[serde(rename = "gMonth")]
    GMonth,
    #[serde(rename = "gMonthDay")]
    GMonthDay,
    #[serde(rename = "gDay")]
    GDay,
    HexBinary,
    Base64Binary,
}

const BUILTIN_NAMES: &[(&str, Builtin)] = &[
    ("anyType", Builtin::AnyType),
    ("anySimpleType", Builtin::AnySimpleType),
    ("string", Builtin::String),
    ("normalizedString", Builtin::NormalizedString),
    ("token", Builtin::Token),
    ("language", Builtin::Language),
    ("Name", Builtin::Name),
    ("NCName", Builtin::NcName),
    ("ID", Builtin::Id),
    ("IDREF", Builtin::IdRef),
    ("IDREFS", Builtin::IdRefs),
    ("ENTITY", Builtin::Entity),
    ("ENTITIES", Builtin::Entities),
    ("NMTOKEN", Builtin::NmToken),
    ("NMTOKENS", Builtin::NmTokens),
    ("anyURI", Builtin::AnyUri),
    ("QName", Builtin::QName),
    ("NOTATION", Builtin::Notation),
    ("boolean", Builtin::Boolean),
    ("decimal", Builtin::Decimal),
    ("integer", Builtin::Integer),
    ("nonPositiveInteger", Builtin::NonPositiveInteger),
    ("negativeInteger", Builtin::NegativeInteger),
    ("long", Builtin::Long),
    ("int", Builtin::Int),
    ("short", Builtin::Short),
    ("byte", Builtin::Byte),
    ("nonNegativeInteger", Builtin::NonNegativeInteger),
    ("positiveInteger", Builtin::PositiveInteger),
    ("unsignedLong", Builtin::UnsignedLong),
    ("unsignedInt", Builtin::UnsignedInt),
    ("unsignedShort", Builtin::UnsignedShort),
    ("unsignedByte", Builtin::UnsignedByte),
    ("float", Builtin::Float),
    ("double", Builtin::Double),
    ("duration", Builtin::Duration),
    ("dateTime", Builtin::DateTime),
    ("date", Builtin::Date),
    ("time", Builtin::Time),
    ("gYear", Builtin::GYear),
    ("gYearMonth", Builtin::GYearMonth),
    ("gMonth", Builtin::GMonth),
    ("gMonthDay", Builtin::GMonthDay),
    ("gDay", Builtin::GDay),
    ("hexBinary", Builtin::HexBinary),
    ("base64Binary", Builtin::Base64Binary),
];

impl Builtin {
    /// Resolve a built-in from its local name in the XML Schema namespace.
    pub fn from_local_name(name: &str) -> Option<Self> {
        BUILTIN_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, builtin)| *builtin)
    }

    /// Resolve a built-in from a qualified type name.
    pub fn from_qname(name: &QName) -> Option<Self> {
        if name.namespace != XS_NAMESPACE {
            return None;
        }
        Self::from_local_name(&name.name)
    }

    pub fn local_name(self) -> &'static str {
        BUILTIN_NAMES
            .iter()
            .find(|(_, builtin)| *builtin == self)
            .map(|(name, _)| *name)
            .unwrap_or("anySimpleType")
    }

    /// Item type of the built-in list types (`NMTOKENS`, `IDREFS`, `ENTITIES`).
    pub fn list_item(self) -> Option<Builtin> {
        match self {
            Builtin::NmTokens => Some(Builtin::NmToken),
            Builtin::IdRefs => Some(Builtin::IdRef),
            Builtin::Entities => Some(Builtin::Entity),
            _ => None,
        }
    }
}

/// Whitespace handling declared by the `whiteSpace` facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WhiteSpace {
    Preserve,
    Replace,
    Collapse,
}
