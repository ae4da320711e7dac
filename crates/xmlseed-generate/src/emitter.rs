//! Drives a [`DocumentSink`] from a built instance tree.

use std::collections::{BTreeMap, HashSet};

use xmlseed_core::{AttributeUsage, QName, XSI_NAMESPACE};

use crate::errors::GenerationError;
use crate::instance::{GeneratorId, InstanceNode, InstanceTree, NodeId};
use crate::model::EmitStats;
use crate::output::DocumentSink;

/// Text token written into mixed-content elements.
const MIXED_TEXT: &str = "text";

/// Counters and generator usage of one emission.
#[derive(Debug, Clone, Default)]
pub struct EmitSummary {
    pub stats: EmitStats,
    pub generator_usage: BTreeMap<String, u64>,
}

pub struct InstanceTreeEmitter<'t> {
    tree: &'t mut InstanceTree,
    /// Elements currently open on the emission stack.
    active: HashSet<NodeId>,
    summary: EmitSummary,
}

impl<'t> InstanceTreeEmitter<'t> {
    pub fn new(tree: &'t mut InstanceTree) -> Self {
        Self {
            tree,
            active: HashSet::new(),
            summary: EmitSummary::default(),
        }
    }

    /// Emit the whole document. Generator state advances, so a second call
    /// continues the value sequences.
    pub fn emit<S: DocumentSink + ?Sized>(
        mut self,
        sink: &mut S,
    ) -> Result<EmitSummary, GenerationError> {
        sink.start_document()?;
        if let Some(root) = self.tree.root() {
            self.emit_root(root, sink)?;
        }
        sink.end_document()?;
        Ok(self.summary)
    }

    fn emit_root<S: DocumentSink + ?Sized>(
        &mut self,
        root: NodeId,
        sink: &mut S,
    ) -> Result<(), GenerationError> {
        let Some(name) = self.tree.element(root).map(|element| element.name.clone()) else {
            return Ok(());
        };
        self.active.insert(root);
        sink.start_element(&name)?;
        if !name.namespace.is_empty() {
            sink.namespace_declaration(None, &name.namespace)?;
        }
        self.emit_occurrence(root, sink)?;
        sink.end_element()?;
        self.active.remove(&root);
        Ok(())
    }

    fn emit_node<S: DocumentSink + ?Sized>(
        &mut self,
        id: NodeId,
        sink: &mut S,
    ) -> Result<(), GenerationError> {
        match self.tree.node(id) {
            InstanceNode::Element(_) => self.emit_element(id, sink),
            InstanceNode::Group(_) => self.emit_group(id, sink),
        }
    }

    fn emit_element<S: DocumentSink + ?Sized>(
        &mut self,
        id: NodeId,
        sink: &mut S,
    ) -> Result<(), GenerationError> {
        let Some(element) = self.tree.element(id) else {
            return Ok(());
        };
        let name = element.name.clone();
        for _ in 0..element.occurs {
            if self.active.contains(&id) {
                self.summary.stats.skipped_reentrant += 1;
                continue;
            }
            self.active.insert(id);
            sink.start_element(&name)?;
            self.emit_occurrence(id, sink)?;
            sink.end_element()?;
            self.active.remove(&id);
        }
        Ok(())
    }

    fn emit_group<S: DocumentSink + ?Sized>(
        &mut self,
        id: NodeId,
        sink: &mut S,
    ) -> Result<(), GenerationError> {
        let (occurs, is_choice) = match self.tree.node(id) {
            InstanceNode::Group(group) => (group.occurs, group.is_choice),
            InstanceNode::Element(_) => return Ok(()),
        };
        let branches = self.tree.children(id).len();
        if branches == 0 {
            return Ok(());
        }

        if is_choice {
            for pick in 0..occurs {
                let index = usize::try_from(pick % branches as u64).unwrap_or(0);
                let child = self.tree.children(id)[index];
                self.emit_node(child, sink)?;
            }
        } else {
            for _ in 0..occurs {
                for index in 0..branches {
                    let child = self.tree.children(id)[index];
                    self.emit_node(child, sink)?;
                }
            }
        }
        Ok(())
    }

    /// Body of one element occurrence, after its start tag.
    fn emit_occurrence<S: DocumentSink + ?Sized>(
        &mut self,
        id: NodeId,
        sink: &mut S,
    ) -> Result<(), GenerationError> {
        self.summary.stats.elements += 1;
        let Some(element) = self.tree.element_mut(id) else {
            return Ok(());
        };
        let xsi_type = element.xsi_type.clone();
        let comment = element.comment.clone();
        let mixed = element.mixed;
        let nil = element.nillable && element.gen_nil;
        if element.nillable {
            element.gen_nil = !element.gen_nil;
        }

        if let Some(type_name) = &xsi_type {
            sink.derived_type(type_name)?;
        }
        self.emit_attributes(id, sink)?;
        if nil {
            sink.attribute(&QName::new("nil", XSI_NAMESPACE), "true")?;
            self.summary.stats.nil_elements += 1;
        }
        if let Some(comment) = &comment {
            sink.comment(comment)?;
            self.summary.stats.comments += 1;
        }
        if nil {
            return Ok(());
        }
        if mixed {
            sink.text(MIXED_TEXT)?;
        }

        match self.leaf_value(id) {
            Some(value) => sink.text(&value),
            None => {
                let children = self.tree.children(id).len();
                for index in 0..children {
                    let child = self.tree.children(id)[index];
                    self.emit_node(child, sink)?;
                }
                Ok(())
            }
        }
    }

    fn emit_attributes<S: DocumentSink + ?Sized>(
        &mut self,
        id: NodeId,
        sink: &mut S,
    ) -> Result<(), GenerationError> {
        let count = self
            .tree
            .element(id)
            .map(|element| element.attributes.len())
            .unwrap_or(0);
        for index in 0..count {
            let Some(attribute) = self
                .tree
                .element_mut(id)
                .and_then(|element| element.attributes.get_mut(index))
            else {
                continue;
            };
            if attribute.usage == AttributeUsage::Prohibited {
                continue;
            }
            let name = attribute.name.clone();
            let generator = attribute.generator;
            let preset = if attribute.fixed.is_some() {
                attribute.fixed.clone()
            } else if attribute.default.is_some() && !attribute.default_used {
                attribute.default_used = true;
                attribute.default.clone()
            } else {
                None
            };
            let value = preset.or_else(|| generator.map(|generator| self.generate(generator)));
            if let Some(value) = value {
                sink.attribute(&name, &value)?;
                self.summary.stats.attributes += 1;
            }
        }
        Ok(())
    }

    /// Fixed value, else the default once, else the next generated value.
    fn leaf_value(&mut self, id: NodeId) -> Option<String> {
        let element = self.tree.element_mut(id)?;
        if let Some(fixed) = &element.fixed {
            return Some(fixed.clone());
        }
        if let Some(default) = &element.default
            && !element.default_used
        {
            let default = default.clone();
            element.default_used = true;
            return Some(default);
        }
        let generator = element.generator?;
        Some(self.generate(generator))
    }

    fn generate(&mut self, generator: GeneratorId) -> String {
        let id = self.tree.generator(generator).id();
        *self.summary.generator_usage.entry(id.to_string()).or_insert(0) += 1;
        self.tree.next_value(generator)
    }
}

/// Document holding only a diagnostic comment, used when nothing can be
/// generated.
pub fn emit_diagnostic_document<S: DocumentSink + ?Sized>(
    sink: &mut S,
    message: &str,
) -> Result<(), GenerationError> {
    sink.start_document()?;
    sink.comment(message)?;
    sink.end_document()
}
