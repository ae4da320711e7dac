use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use xmlseed_core::{QName, XML_NAMESPACE, XSI_NAMESPACE};

use crate::errors::GenerationError;
use crate::output::DocumentSink;

/// Namespace scope of one open element.
#[derive(Debug)]
struct Scope {
    tag: String,
    default_namespace: String,
    bindings: Vec<(String, String)>,
}

/// Indented XML writer over any `Write`.
///
/// Start tags stay pending until content arrives so attributes and namespace
/// declarations can still be added; elements that end while pending are
/// written as empty elements.
pub struct XmlDocumentWriter<W: Write> {
    writer: Writer<CountingWriter<W>>,
    pending: Option<BytesStart<'static>>,
    scopes: Vec<Scope>,
    next_prefix: usize,
}

impl<W: Write> XmlDocumentWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(CountingWriter::new(inner), b' ', 2),
            pending: None,
            scopes: Vec::new(),
            next_prefix: 0,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.writer.get_ref().bytes_written()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().inner
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), GenerationError> {
        self.writer
            .write_event(event)
            .map_err(|err| GenerationError::Xml(err.to_string()))
    }

    fn flush_pending(&mut self) -> Result<(), GenerationError> {
        if let Some(start) = self.pending.take() {
            self.write(Event::Start(start))?;
        }
        Ok(())
    }

    fn pending_mut(&mut self, what: &str) -> Result<&mut BytesStart<'static>, GenerationError> {
        self.pending
            .as_mut()
            .ok_or_else(|| GenerationError::Xml(format!("{what} outside of a start tag")))
    }

    fn current_default_namespace(&self) -> &str {
        self.scopes
            .last()
            .map(|scope| scope.default_namespace.as_str())
            .unwrap_or("")
    }

    fn bound_prefix(&self, namespace: &str) -> Option<&str> {
        self.scopes.iter().rev().find_map(|scope| {
            scope
                .bindings
                .iter()
                .find(|(_, uri)| uri == namespace)
                .map(|(prefix, _)| prefix.as_str())
        })
    }

    fn prefix_in_use(&self, prefix: &str) -> bool {
        self.scopes
            .iter()
            .any(|scope| scope.bindings.iter().any(|(bound, _)| bound == prefix))
    }

    /// Prefix bound to `namespace`, declaring one on the pending element when
    /// the namespace is not yet in scope.
    fn prefix_for(&mut self, namespace: &str) -> Result<String, GenerationError> {
        if namespace == XML_NAMESPACE {
            return Ok("xml".to_string());
        }
        if let Some(prefix) = self.bound_prefix(namespace) {
            return Ok(prefix.to_string());
        }

        let prefix = if namespace == XSI_NAMESPACE && !self.prefix_in_use("xsi") {
            "xsi".to_string()
        } else {
            self.fresh_prefix()
        };
        self.bind(&prefix, namespace)?;
        Ok(prefix)
    }

    fn fresh_prefix(&mut self) -> String {
        loop {
            self.next_prefix += 1;
            let candidate = format!("ns{}", self.next_prefix);
            if !self.prefix_in_use(&candidate) {
                return candidate;
            }
        }
    }

    /// Move the pending element onto a prefix and reset the default namespace
    /// to none, so unqualified QName values resolve to no namespace.
    fn clear_default_namespace(&mut self) -> Result<(), GenerationError> {
        let namespace = self.current_default_namespace().to_string();
        let prefix = self.fresh_prefix();
        let start = self.pending_mut("namespace reset")?;

        let mut kept = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|err| GenerationError::Xml(err.to_string()))?;
            if attribute.key.as_ref() == b"xmlns" {
                continue;
            }
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|err| GenerationError::Xml(err.to_string()))?
                .into_owned();
            kept.push((key, value));
        }

        let scope = self
            .scopes
            .last_mut()
            .ok_or_else(|| GenerationError::Xml("namespace reset outside of an element".to_string()))?;
        scope.tag = format!("{prefix}:{}", scope.tag);
        scope.default_namespace.clear();
        scope.bindings.push((prefix.clone(), namespace.clone()));

        let tag = scope.tag.clone();
        let start = self.pending_mut("namespace reset")?;
        start.clear_attributes();
        start.set_name(tag.as_bytes());
        start.push_attribute(("xmlns", ""));
        start.push_attribute((format!("xmlns:{prefix}").as_str(), namespace.as_str()));
        for (key, value) in &kept {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        Ok(())
    }

    fn bind(&mut self, prefix: &str, namespace: &str) -> Result<(), GenerationError> {
        let start = self.pending_mut("namespace declaration")?;
        start.push_attribute((format!("xmlns:{prefix}").as_str(), namespace));
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.push((prefix.to_string(), namespace.to_string()));
        }
        Ok(())
    }
}

impl<W: Write> DocumentSink for XmlDocumentWriter<W> {
    fn start_document(&mut self) -> Result<(), GenerationError> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn end_document(&mut self) -> Result<(), GenerationError> {
        self.flush_pending()?;
        if let Some(scope) = self.scopes.last() {
            return Err(GenerationError::Xml(format!(
                "document ended with <{}> still open",
                scope.tag
            )));
        }
        self.writer
            .get_mut()
            .write_all(b"\n")
            .map_err(GenerationError::Io)?;
        self.writer.get_mut().flush().map_err(GenerationError::Io)
    }

    fn start_element(&mut self, name: &QName) -> Result<(), GenerationError> {
        self.flush_pending()?;
        let mut start = BytesStart::new(name.name.clone());
        let inherited = self.current_default_namespace();
        if inherited != name.namespace {
            start.push_attribute(("xmlns", name.namespace.as_str()));
        }
        self.scopes.push(Scope {
            tag: name.name.clone(),
            default_namespace: name.namespace.clone(),
            bindings: Vec::new(),
        });
        self.pending = Some(start);
        Ok(())
    }

    fn end_element(&mut self) -> Result<(), GenerationError> {
        let scope = self
            .scopes
            .pop()
            .ok_or_else(|| GenerationError::Xml("end of element without a start".to_string()))?;
        match self.pending.take() {
            Some(start) => self.write(Event::Empty(start)),
            None => self.write(Event::End(BytesEnd::new(scope.tag))),
        }
    }

    fn namespace_declaration(
        &mut self,
        prefix: Option<&str>,
        namespace: &str,
    ) -> Result<(), GenerationError> {
        match prefix {
            // The start tag already carries the element's own namespace.
            None if self.current_default_namespace() == namespace => Ok(()),
            None => Err(GenerationError::Xml(format!(
                "default namespace {namespace} conflicts with the element namespace"
            ))),
            Some(prefix) if self.bound_prefix(namespace) == Some(prefix) => Ok(()),
            Some(prefix) => self.bind(prefix, namespace),
        }
    }

    fn attribute(&mut self, name: &QName, value: &str) -> Result<(), GenerationError> {
        let key = if name.namespace.is_empty() {
            name.name.clone()
        } else {
            let prefix = self.prefix_for(&name.namespace)?;
            format!("{prefix}:{}", name.name)
        };
        let start = self.pending_mut("attribute")?;
        start.push_attribute((key.as_str(), value));
        Ok(())
    }

    fn derived_type(&mut self, type_name: &QName) -> Result<(), GenerationError> {
        // A prefix cannot be bound to no namespace.
        if type_name.namespace.is_empty() && !self.current_default_namespace().is_empty() {
            self.clear_default_namespace()?;
        }
        let value = if type_name.namespace == self.current_default_namespace() {
            type_name.name.clone()
        } else {
            let prefix = self.prefix_for(&type_name.namespace)?;
            format!("{prefix}:{}", type_name.name)
        };
        self.attribute(&QName::new("type", XSI_NAMESPACE), &value)
    }

    fn text(&mut self, text: &str) -> Result<(), GenerationError> {
        self.flush_pending()?;
        self.write(Event::Text(BytesText::new(text)))
    }

    fn comment(&mut self, comment: &str) -> Result<(), GenerationError> {
        self.flush_pending()?;
        self.write(Event::Comment(BytesText::from_escaped(comment_body(comment))))
    }
}

/// Comment text padded with spaces and with a space between adjacent hyphens,
/// so the body never contains `--` or ends in `-`.
fn comment_body(comment: &str) -> String {
    let mut body = String::with_capacity(comment.len() + 2);
    body.push(' ');
    for ch in comment.chars() {
        if ch == '-' && body.ends_with('-') {
            body.push(' ');
        }
        body.push(ch);
    }
    body.push(' ');
    body
}

/// Byte-counting pass-through writer.
struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(build: impl FnOnce(&mut XmlDocumentWriter<Vec<u8>>) -> Result<(), GenerationError>) -> String {
        let mut writer = XmlDocumentWriter::new(Vec::new());
        build(&mut writer).expect("write document");
        String::from_utf8(writer.into_inner()).expect("utf-8")
    }

    #[test]
    fn collapses_empty_elements_and_declares_namespaces() {
        let xml = render(|w| {
            w.start_document()?;
            w.start_element(&QName::new("order", "urn:shop"))?;
            w.namespace_declaration(None, "urn:shop")?;
            w.start_element(&QName::new("note", ""))?;
            w.end_element()?;
            w.start_element(&QName::new("line", "urn:shop"))?;
            w.attribute(&QName::new("nil", XSI_NAMESPACE), "true")?;
            w.end_element()?;
            w.end_element()?;
            w.end_document()
        });

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<order xmlns=\"urn:shop\">"));
        assert!(xml.contains("<note xmlns=\"\"/>"));
        assert!(xml.contains("<line xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:nil=\"true\"/>"));
        assert!(xml.trim_end().ends_with("</order>"));
    }

    #[test]
    fn escapes_text_and_comments() {
        let xml = render(|w| {
            w.start_document()?;
            w.start_element(&QName::local("note"))?;
            w.comment("a -- b")?;
            w.text("1 < 2 & 3")?;
            w.end_element()?;
            w.end_document()
        });

        assert!(xml.contains("<!-- a - - b -->"));
        assert_eq!(comment_body("a---b-"), " a- - -b- ");
        assert!(!comment_body("----").contains("--"));
        assert!(xml.contains("1 &lt; 2 &amp; 3"));
    }

    #[test]
    fn unqualified_derived_type_resets_the_default_namespace() {
        let xml = render(|w| {
            w.start_document()?;
            w.start_element(&QName::new("vehicle", "urn:fleet"))?;
            w.derived_type(&QName::local("Car"))?;
            w.attribute(&QName::local("plate"), "AB & C")?;
            w.start_element(&QName::new("wheels", "urn:fleet"))?;
            w.end_element()?;
            w.end_element()?;
            w.end_document()
        });

        assert!(xml.contains(
            "<ns1:vehicle xmlns=\"\" xmlns:ns1=\"urn:fleet\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:type=\"Car\" plate=\"AB &amp; C\">"
        ));
        assert!(!xml.contains("xmlns:ns1=\"\""));
        assert!(xml.contains("<wheels xmlns=\"urn:fleet\"/>"));
        assert!(xml.trim_end().ends_with("</ns1:vehicle>"));
    }

    #[test]
    fn attribute_after_content_is_rejected() {
        let mut writer = XmlDocumentWriter::new(Vec::new());
        writer.start_document().expect("declaration");
        writer.start_element(&QName::local("note")).expect("start");
        writer.text("body").expect("text");
        let err = writer
            .attribute(&QName::local("late"), "x")
            .expect_err("attribute after text");
        assert!(matches!(err, GenerationError::Xml(_)));
    }
}
