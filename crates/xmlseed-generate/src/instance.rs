//! Arena-backed instance model: the exact document to emit, detached from the
//! schema.

use xmlseed_core::{AttributeUsage, Form, QName};

use crate::generators::ValueGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorId(usize);

/// Attribute of an instance element.
#[derive(Debug, Clone)]
pub struct InstanceAttribute {
    pub name: QName,
    /// Use from the declaring complex type; wildcard matches are optional.
    pub usage: AttributeUsage,
    pub form: Form,
    pub fixed: Option<String>,
    pub default: Option<String>,
    pub generator: Option<GeneratorId>,
    /// Set once the schema default has been written for this node.
    pub default_used: bool,
}

impl InstanceAttribute {
    pub fn new(name: QName, usage: AttributeUsage, form: Form) -> Self {
        Self {
            name,
            usage,
            form,
            fixed: None,
            default: None,
            generator: None,
            default_used: false,
        }
    }
}

/// Element node; `occurs` is already clamped to the repetition cap.
#[derive(Debug, Clone)]
pub struct InstanceElement {
    pub name: QName,
    pub occurs: u64,
    pub nillable: bool,
    pub mixed: bool,
    pub fixed: Option<String>,
    pub default: Option<String>,
    /// Concrete type used in place of an abstract declared type.
    pub xsi_type: Option<QName>,
    pub comment: Option<String>,
    pub generator: Option<GeneratorId>,
    pub attributes: Vec<InstanceAttribute>,
    pub children: Vec<NodeId>,
    /// Whether the next nillable occurrence is emitted as nil.
    pub gen_nil: bool,
    pub default_used: bool,
}

impl InstanceElement {
    pub fn new(name: QName, occurs: u64) -> Self {
        Self {
            name,
            occurs,
            nillable: false,
            mixed: false,
            fixed: None,
            default: None,
            xsi_type: None,
            comment: None,
            generator: None,
            attributes: Vec::new(),
            children: Vec::new(),
            gen_nil: true,
            default_used: false,
        }
    }

    pub fn has_attribute(&self, name: &QName) -> bool {
        self.attributes.iter().any(|attribute| &attribute.name == name)
    }
}

/// Sequence, choice or all group.
#[derive(Debug, Clone)]
pub struct InstanceGroup {
    pub occurs: u64,
    pub is_choice: bool,
    pub children: Vec<NodeId>,
}

impl InstanceGroup {
    pub fn new(occurs: u64, is_choice: bool) -> Self {
        Self {
            occurs,
            is_choice,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum InstanceNode {
    Element(InstanceElement),
    Group(InstanceGroup),
}

impl InstanceNode {
    pub fn occurs(&self) -> u64 {
        match self {
            InstanceNode::Element(element) => element.occurs,
            InstanceNode::Group(group) => group.occurs,
        }
    }

    fn set_occurs(&mut self, occurs: u64) {
        match self {
            InstanceNode::Element(element) => element.occurs = occurs,
            InstanceNode::Group(group) => group.occurs = occurs,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            InstanceNode::Element(element) => &element.children,
            InstanceNode::Group(group) => &group.children,
        }
    }

    fn children_mut(&mut self) -> &mut Vec<NodeId> {
        match self {
            InstanceNode::Element(element) => &mut element.children,
            InstanceNode::Group(group) => &mut group.children,
        }
    }

    pub fn as_element(&self) -> Option<&InstanceElement> {
        match self {
            InstanceNode::Element(element) => Some(element),
            InstanceNode::Group(_) => None,
        }
    }
}

/// Instance model for one document.
#[derive(Debug, Default)]
pub struct InstanceTree {
    nodes: Vec<InstanceNode>,
    generators: Vec<ValueGenerator>,
    root: Option<NodeId>,
}

impl InstanceTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_node(&mut self, node: InstanceNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn add_element(&mut self, element: InstanceElement) -> NodeId {
        self.add_node(InstanceNode::Element(element))
    }

    pub fn add_group(&mut self, group: InstanceGroup) -> NodeId {
        self.add_node(InstanceNode::Group(group))
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children_mut().push(child);
    }

    pub fn node(&self, id: NodeId) -> &InstanceNode {
        &self.nodes[id.0]
    }

    pub fn element(&self, id: NodeId) -> Option<&InstanceElement> {
        self.nodes[id.0].as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut InstanceElement> {
        match &mut self.nodes[id.0] {
            InstanceNode::Element(element) => Some(element),
            InstanceNode::Group(_) => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes[id.0].children()
    }

    pub fn add_generator(&mut self, generator: ValueGenerator) -> GeneratorId {
        let id = GeneratorId(self.generators.len());
        self.generators.push(generator);
        id
    }

    pub fn generator(&self, id: GeneratorId) -> &ValueGenerator {
        &self.generators[id.0]
    }

    pub fn next_value(&mut self, id: GeneratorId) -> String {
        self.generators[id.0].next_value()
    }

    /// Deep-copy the subtree under `id`, giving the copy's root `occurs`.
    ///
    /// Copies are detached from any parent and share value generators with
    /// the source.
    pub fn clone_subtree(&mut self, id: NodeId, occurs: u64) -> NodeId {
        let copy = self.copy_node(id);
        self.nodes[copy.0].set_occurs(occurs);
        copy
    }

    fn copy_node(&mut self, id: NodeId) -> NodeId {
        let mut node = self.nodes[id.0].clone();
        let children = std::mem::take(node.children_mut());
        let copies: Vec<NodeId> = children.into_iter().map(|child| self.copy_node(child)).collect();
        *node.children_mut() = copies;
        self.add_node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_subtree_copies_structure_with_new_occurs() {
        let mut tree = InstanceTree::new();
        let parent = tree.add_element(InstanceElement::new(QName::local("order"), 1));
        let group = tree.add_group(InstanceGroup::new(2, false));
        let leaf = tree.add_element(InstanceElement::new(QName::local("line"), 3));
        tree.append_child(parent, group);
        tree.append_child(group, leaf);

        let copy = tree.clone_subtree(parent, 4);

        assert_ne!(copy, parent);
        assert_eq!(tree.node(copy).occurs(), 4);
        let copied_group = tree.children(copy)[0];
        assert_ne!(copied_group, group);
        assert_eq!(tree.node(copied_group).occurs(), 2);
        let copied_leaf = tree.children(copied_group)[0];
        assert_ne!(copied_leaf, leaf);
        assert_eq!(tree.node(copied_leaf).occurs(), 3);
        assert_eq!(tree.len(), 6);
    }
}
