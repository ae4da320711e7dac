//! Document sinks driven by the emitter.

pub mod xml;

use xmlseed_core::QName;

use crate::errors::GenerationError;

pub use xml::XmlDocumentWriter;

/// Structural document calls made by the emitter.
///
/// Attributes, namespace declarations and derived-type tags always follow
/// `start_element` directly, before any text, comment or child element.
pub trait DocumentSink {
    fn start_document(&mut self) -> Result<(), GenerationError>;
    fn end_document(&mut self) -> Result<(), GenerationError>;
    fn start_element(&mut self, name: &QName) -> Result<(), GenerationError>;
    fn end_element(&mut self) -> Result<(), GenerationError>;
    /// Bind `prefix` (or the default namespace when `None`) on the open element.
    fn namespace_declaration(
        &mut self,
        prefix: Option<&str>,
        namespace: &str,
    ) -> Result<(), GenerationError>;
    fn attribute(&mut self, name: &QName, value: &str) -> Result<(), GenerationError>;
    /// Tag the open element with the concrete type it was built from.
    fn derived_type(&mut self, type_name: &QName) -> Result<(), GenerationError>;
    fn text(&mut self, text: &str) -> Result<(), GenerationError>;
    fn comment(&mut self, comment: &str) -> Result<(), GenerationError>;
}

/// Owned copy of one sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    StartDocument,
    EndDocument,
    StartElement(QName),
    EndElement,
    NamespaceDeclaration {
        prefix: Option<String>,
        namespace: String,
    },
    Attribute {
        name: QName,
        value: String,
    },
    DerivedType(QName),
    Text(String),
    Comment(String),
}

/// In-memory sink recording every call.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Vec<DocumentEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[DocumentEvent] {
        &self.events
    }

    /// Local names of started elements, in document order.
    pub fn element_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DocumentEvent::StartElement(name) => Some(name.name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Text content of each element named `local_name`, in document order.
    ///
    /// Elements without direct text contribute nothing.
    pub fn texts_of(&self, local_name: &str) -> Vec<&str> {
        let mut texts = Vec::new();
        for (position, event) in self.events.iter().enumerate() {
            let DocumentEvent::StartElement(name) = event else {
                continue;
            };
            if name.name != local_name {
                continue;
            }
            let text = self.events[position + 1..]
                .iter()
                .take_while(|event| {
                    !matches!(event, DocumentEvent::StartElement(_) | DocumentEvent::EndElement)
                })
                .find_map(|event| match event {
                    DocumentEvent::Text(text) => Some(text.as_str()),
                    _ => None,
                });
            texts.extend(text);
        }
        texts
    }

    /// Values of attributes named `local_name`, in document order.
    pub fn attribute_values(&self, local_name: &str) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DocumentEvent::Attribute { name, value } if name.name == local_name => {
                    Some(value.as_str())
                }
                _ => None,
            })
            .collect()
    }

    pub fn comments(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DocumentEvent::Comment(comment) => Some(comment.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DocumentSink for EventRecorder {
    fn start_document(&mut self) -> Result<(), GenerationError> {
        self.events.push(DocumentEvent::StartDocument);
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), GenerationError> {
        self.events.push(DocumentEvent::EndDocument);
        Ok(())
    }

    fn start_element(&mut self, name: &QName) -> Result<(), GenerationError> {
        self.events.push(DocumentEvent::StartElement(name.clone()));
        Ok(())
    }

    fn end_element(&mut self) -> Result<(), GenerationError> {
        self.events.push(DocumentEvent::EndElement);
        Ok(())
    }

    fn namespace_declaration(
        &mut self,
        prefix: Option<&str>,
        namespace: &str,
    ) -> Result<(), GenerationError> {
        self.events.push(DocumentEvent::NamespaceDeclaration {
            prefix: prefix.map(str::to_string),
            namespace: namespace.to_string(),
        });
        Ok(())
    }

    fn attribute(&mut self, name: &QName, value: &str) -> Result<(), GenerationError> {
        self.events.push(DocumentEvent::Attribute {
            name: name.clone(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn derived_type(&mut self, type_name: &QName) -> Result<(), GenerationError> {
        self.events.push(DocumentEvent::DerivedType(type_name.clone()));
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), GenerationError> {
        self.events.push(DocumentEvent::Text(text.to_string()));
        Ok(())
    }

    fn comment(&mut self, comment: &str) -> Result<(), GenerationError> {
        self.events.push(DocumentEvent::Comment(comment.to_string()));
        Ok(())
    }
}
