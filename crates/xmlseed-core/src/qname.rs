use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Namespace of the XML Schema built-in datatypes.
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
/// Namespace of the `xsi:type` and `xsi:nil` instance attributes.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// Namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Qualified name: a local name plus an optional namespace URI.
///
/// An empty `namespace` means the name is unqualified.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct QName {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

impl QName {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Unqualified name.
    pub fn local(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }

    /// Name in the XML Schema namespace (`xs:string`, `xs:anyType`, ...).
    pub fn xs(name: impl Into<String>) -> Self {
        Self::new(name, XS_NAMESPACE)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.name)
        }
    }
}
