//! Walks the compiled schema from the root declaration and builds the
//! instance tree.

use std::collections::HashMap;

use tracing::{debug, warn};

use xmlseed_core::{
    AttributeDecl, AttributeUsage, Builtin, ComplexTypeDef, ContentType, ElementDecl,
    NamespaceConstraint, Occurs, Particle, QName, ResolvedType, SchemaIndex, Term, Wildcard,
};

use crate::errors::GenerationError;
use crate::generators::{GeneratorFactory, IdRegistryHandle, ValueGenerator};
use crate::instance::{InstanceAttribute, InstanceElement, InstanceGroup, InstanceTree, NodeId};
use crate::model::{GenerateOptions, GenerationIssue};

const ANY_ELEMENT_NAME: &str = "any_element";
const ANY_ATTRIBUTE_NAME: &str = "any_attr";
/// Namespace for placeholders standing in for `##other` wildcards.
pub const OTHER_NAMESPACE: &str = "urn:xmlseed:other";

/// Result of a build: the tree plus the issues found while walking.
#[derive(Debug)]
pub struct BuildOutput {
    pub tree: InstanceTree,
    pub root: QName,
    pub issues: Vec<GenerationIssue>,
}

pub struct InstanceTreeBuilder<'a> {
    index: &'a SchemaIndex<'a>,
    factory: GeneratorFactory<'a>,
    repetition_cap: u64,
    root_element: Option<QName>,
    tree: InstanceTree,
    /// Declaration to the first instance element built for it.
    built: HashMap<*const ElementDecl, NodeId>,
    /// Elements whose content is being built, innermost last.
    open_elements: Vec<NodeId>,
    root_name: QName,
    issues: Vec<GenerationIssue>,
}

impl<'a> InstanceTreeBuilder<'a> {
    pub fn new(
        index: &'a SchemaIndex<'a>,
        options: &GenerateOptions,
        registry: IdRegistryHandle,
    ) -> Self {
        Self {
            index,
            factory: GeneratorFactory::new(index, options.list_length, registry),
            repetition_cap: options.repetition_cap,
            root_element: options.root_element.clone(),
            tree: InstanceTree::new(),
            built: HashMap::new(),
            open_elements: Vec::new(),
            root_name: QName::default(),
            issues: Vec::new(),
        }
    }

    pub fn build(mut self) -> Result<BuildOutput, GenerationError> {
        let decl = self.select_root().ok_or(GenerationError::NoRootElement)?;
        self.root_name = decl.name.clone();
        debug!(root = %decl.name, "building instance tree");

        let root = self.tree.add_element(InstanceElement::new(decl.name.clone(), 1));
        self.tree.set_root(root);
        self.built.insert(decl as *const ElementDecl, root);
        self.fill_element(root, decl);

        Ok(BuildOutput {
            tree: self.tree,
            root: self.root_name,
            issues: self.issues,
        })
    }

    fn select_root(&self) -> Option<&'a ElementDecl> {
        match &self.root_element {
            Some(name) => self.index.element(name).filter(|decl| !decl.is_abstract),
            None => self.index.first_concrete_element(),
        }
    }

    fn occurs(&self, particle: &Particle) -> u64 {
        let max = match particle.max_occurs {
            Occurs::Bounded(max) => max.min(self.repetition_cap),
            Occurs::Unbounded => self.repetition_cap,
        };
        max.max(particle.min_occurs)
    }

    fn walk_particle(&mut self, parent: NodeId, particle: &Particle) {
        let occurs = self.occurs(particle);
        match &particle.term {
            Term::Element(decl) => self.place_element(parent, decl, particle, false),
            Term::ElementRef { name } => match self.index.element(name) {
                Some(decl) => self.place_element(parent, decl, particle, false),
                None => {
                    debug!(element = %name, "skipping unresolved element reference");
                    self.record_issue(
                        "unresolved_element",
                        format!("unknown element reference {name}"),
                    );
                }
            },
            Term::Sequence { particles } => {
                let group = self.tree.add_group(InstanceGroup::new(occurs, false));
                self.tree.append_child(parent, group);
                for child in particles {
                    self.walk_particle(group, child);
                }
            }
            Term::Choice { particles } => {
                if particle.max_occurs == Occurs::Bounded(1) && particles.len() == 1 {
                    self.walk_particle(parent, &particles[0]);
                } else {
                    let group = self.tree.add_group(InstanceGroup::new(occurs, true));
                    self.tree.append_child(parent, group);
                    for child in particles {
                        self.walk_particle(group, child);
                    }
                }
            }
            Term::All { particles } => {
                for child in particles {
                    self.walk_particle(parent, child);
                }
            }
            Term::Any(wildcard) => {
                if particle.min_occurs > 0 {
                    self.place_wildcard(parent, wildcard, particle);
                }
            }
        }
    }

    fn place_element(
        &mut self,
        parent: NodeId,
        decl: &ElementDecl,
        particle: &Particle,
        from_wildcard: bool,
    ) {
        if decl.is_abstract {
            self.place_substitutes(parent, decl, particle);
            return;
        }

        let occurs = self.occurs(particle);
        let key = decl as *const ElementDecl;
        if let Some(&existing) = self.built.get(&key) {
            if particle.min_occurs > 0 && !from_wildcard {
                let copy = self.tree.clone_subtree(existing, occurs);
                self.tree.append_child(parent, copy);
            }
            return;
        }

        let node = self
            .tree
            .add_element(InstanceElement::new(decl.name.clone(), occurs));
        self.tree.append_child(parent, node);
        self.built.insert(key, node);
        self.fill_element(node, decl);
    }

    /// An abstract head stands for a choice over its concrete members.
    fn place_substitutes(&mut self, parent: NodeId, head: &ElementDecl, particle: &Particle) {
        let members = self.index.substitution_members(&head.name);
        if members.is_empty() {
            debug!(element = %head.name, "abstract element without substitutes");
            return;
        }
        let branches = members
            .into_iter()
            .map(|member| Particle::element_ref(member.name.clone()))
            .collect();
        let choice = Particle::choice(branches).with_occurs(particle.min_occurs, particle.max_occurs);
        self.walk_particle(parent, &choice);
    }

    fn fill_element(&mut self, node: NodeId, decl: &ElementDecl) {
        if let Some(element) = self.tree.element_mut(node) {
            element.nillable = decl.nillable;
            element.fixed = decl.fixed.clone();
            element.default = decl.default.clone();
        }

        self.open_elements.push(node);
        let prefix = decl.name.name.clone();
        match &decl.type_name {
            None => self.attach_universal(node, &prefix),
            Some(type_name) => match self.index.resolve_type(type_name) {
                Some(ResolvedType::Complex(def)) => self.fill_complex(node, def, &prefix),
                Some(ResolvedType::Builtin(Builtin::AnyType)) => {
                    self.attach_universal(node, &prefix)
                }
                Some(_) => {
                    let generator = self
                        .factory
                        .for_type(type_name, &prefix)
                        .unwrap_or_else(|| self.factory.universal(&prefix));
                    self.attach_generator(node, generator);
                }
                None => {
                    self.record_issue(
                        "unresolved_type",
                        format!("element {} has unknown type {type_name}", decl.name),
                    );
                    self.attach_universal(node, &prefix);
                }
            },
        }
        self.open_elements.pop();
    }

    fn fill_complex(&mut self, node: NodeId, declared: &'a ComplexTypeDef, prefix: &str) {
        let def = if declared.is_abstract {
            match self.index.concrete_derived_type(&declared.name) {
                Some(concrete) => {
                    if let Some(element) = self.tree.element_mut(node) {
                        element.xsi_type = Some(concrete.name.clone());
                    }
                    concrete
                }
                None => {
                    let message = format!("No concrete type derived from abstract type {}", declared.name);
                    self.add_comment(node, &message);
                    self.record_issue("abstract_type_without_derivation", message);
                    declared
                }
            }
        } else {
            declared
        };

        if let Some(element) = self.tree.element_mut(node) {
            element.mixed = def.mixed;
        }

        match &def.content {
            ContentType::Empty => {}
            ContentType::Simple { type_name } => {
                let generator = self
                    .factory
                    .for_type(type_name, prefix)
                    .unwrap_or_else(|| self.factory.universal(prefix));
                self.attach_generator(node, generator);
            }
            ContentType::Elements { particle } => self.walk_particle(node, particle),
        }

        for attribute_use in &def.attributes {
            self.place_attribute(node, &attribute_use.attribute, attribute_use.usage);
        }
        if let Some(wildcard) = &def.attribute_wildcard {
            self.place_attribute_wildcard(node, wildcard);
        }
    }

    fn place_attribute(&mut self, node: NodeId, decl: &AttributeDecl, usage: AttributeUsage) {
        let already_present = self
            .tree
            .element(node)
            .is_some_and(|element| element.has_attribute(&decl.name));
        if already_present {
            return;
        }
        if usage == AttributeUsage::Prohibited {
            // Kept so wildcards cannot reintroduce the name; never emitted.
            let attribute = InstanceAttribute::new(decl.name.clone(), usage, decl.form);
            if let Some(element) = self.tree.element_mut(node) {
                element.attributes.push(attribute);
            }
            return;
        }

        let prefix = decl.name.name.as_str();
        let generator = match &decl.type_name {
            None => self.factory.universal(prefix),
            Some(type_name) => match self.factory.for_type(type_name, prefix) {
                Some(generator) => generator,
                None => {
                    debug!(attribute = %decl.name, type_name = %type_name, "skipping attribute without a simple type");
                    return;
                }
            },
        };

        let generator = self.tree.add_generator(generator);
        let mut attribute = InstanceAttribute::new(decl.name.clone(), usage, decl.form);
        attribute.fixed = decl.fixed.clone();
        attribute.default = decl.default.clone();
        attribute.generator = Some(generator);
        if let Some(element) = self.tree.element_mut(node) {
            element.attributes.push(attribute);
        }
    }

    fn place_wildcard(&mut self, parent: NodeId, wildcard: &Wildcard, particle: &Particle) {
        let lenient = wildcard.process_contents.is_lenient();
        if lenient && let Some(namespace) = self.placeholder_namespace(&wildcard.namespace) {
            self.place_placeholder(parent, QName::new(ANY_ELEMENT_NAME, namespace), particle);
            return;
        }

        if let Some(decl) = self.find_wildcard_element(wildcard) {
            self.place_element(parent, decl, particle, true);
            return;
        }

        if lenient && let Some(namespace) = self.first_listed_namespace(&wildcard.namespace) {
            self.place_placeholder(parent, QName::new(ANY_ELEMENT_NAME, namespace), particle);
            return;
        }

        let message = format!(
            "Could not find element for any with namespace {}",
            wildcard.namespace
        );
        warn!(namespace = %wildcard.namespace, "unmatched element wildcard");
        if let Some(&enclosing) = self.open_elements.last() {
            self.add_comment(enclosing, &message);
        }
        self.record_issue("unmatched_wildcard", message);
    }

    fn place_placeholder(&mut self, parent: NodeId, name: QName, particle: &Particle) {
        let prefix = name.name.clone();
        let occurs = self.occurs(particle);
        let node = self.tree.add_element(InstanceElement::new(name, occurs));
        self.tree.append_child(parent, node);
        self.attach_universal(node, &prefix);
    }

    fn place_attribute_wildcard(&mut self, node: NodeId, wildcard: &Wildcard) {
        let lenient = wildcard.process_contents.is_lenient();
        let placeholder = lenient
            .then(|| self.placeholder_namespace(&wildcard.namespace))
            .flatten();
        if let Some(namespace) = placeholder {
            self.place_any_attribute(node, namespace);
            return;
        }

        if let Some(decl) = self.find_wildcard_attribute(node, wildcard) {
            self.place_attribute(node, decl, AttributeUsage::Optional);
            return;
        }

        if lenient && let Some(namespace) = self.first_listed_namespace(&wildcard.namespace) {
            self.place_any_attribute(node, namespace);
            return;
        }

        let message = format!(
            "Could not find attribute for anyAttribute with namespace {}",
            wildcard.namespace
        );
        warn!(namespace = %wildcard.namespace, "unmatched attribute wildcard");
        self.add_comment(node, &message);
        self.record_issue("unmatched_attribute_wildcard", message);
    }

    fn place_any_attribute(&mut self, node: NodeId, namespace: String) {
        let decl = AttributeDecl::new(QName::new(ANY_ATTRIBUTE_NAME, namespace), None);
        self.place_attribute(node, &decl, AttributeUsage::Optional);
    }

    /// Namespace for a lenient placeholder; `None` for explicit lists, which
    /// search the declarations first.
    fn placeholder_namespace(&self, constraint: &NamespaceConstraint) -> Option<String> {
        match constraint {
            NamespaceConstraint::Any | NamespaceConstraint::TargetNamespace => {
                Some(self.root_name.namespace.clone())
            }
            NamespaceConstraint::Local => Some(String::new()),
            NamespaceConstraint::Other => Some(OTHER_NAMESPACE.to_string()),
            NamespaceConstraint::List(_) => None,
        }
    }

    fn first_listed_namespace(&self, constraint: &NamespaceConstraint) -> Option<String> {
        match constraint {
            NamespaceConstraint::List(entries) => {
                entries.first().map(|entry| self.list_entry_namespace(entry))
            }
            _ => None,
        }
    }

    fn list_entry_namespace(&self, entry: &str) -> String {
        match entry {
            "##targetNamespace" => self.root_name.namespace.clone(),
            "##local" => String::new(),
            other => other.to_string(),
        }
    }

    fn namespace_matches(&self, wildcard: &Wildcard, namespace: &str) -> bool {
        match &wildcard.namespace {
            NamespaceConstraint::Any | NamespaceConstraint::TargetNamespace => {
                namespace == self.root_name.namespace
            }
            NamespaceConstraint::Other => {
                !namespace.is_empty() && namespace != wildcard.schema_namespace
            }
            NamespaceConstraint::Local => namespace.is_empty(),
            NamespaceConstraint::List(_) => false,
        }
    }

    fn find_wildcard_element(&self, wildcard: &Wildcard) -> Option<&'a ElementDecl> {
        let root = &self.root_name;
        let candidates = || {
            self.index
                .global_elements()
                .filter(move |decl| &decl.name != root && !decl.is_abstract)
        };
        match &wildcard.namespace {
            NamespaceConstraint::List(entries) => entries.iter().find_map(|entry| {
                let namespace = self.list_entry_namespace(entry);
                candidates().find(|decl| decl.name.namespace == namespace)
            }),
            _ => candidates().find(|decl| self.namespace_matches(wildcard, &decl.name.namespace)),
        }
    }

    fn find_wildcard_attribute(&self, node: NodeId, wildcard: &Wildcard) -> Option<&'a AttributeDecl> {
        let element = self.tree.element(node)?;
        let candidates = || {
            self.index
                .global_attributes()
                .filter(move |decl| !element.has_attribute(&decl.name))
        };
        match &wildcard.namespace {
            NamespaceConstraint::List(entries) => entries.iter().find_map(|entry| {
                let namespace = self.list_entry_namespace(entry);
                candidates().find(|decl| decl.name.namespace == namespace)
            }),
            _ => candidates().find(|decl| self.namespace_matches(wildcard, &decl.name.namespace)),
        }
    }

    fn attach_universal(&mut self, node: NodeId, prefix: &str) {
        let generator = self.factory.universal(prefix);
        self.attach_generator(node, generator);
    }

    fn attach_generator(&mut self, node: NodeId, generator: ValueGenerator) {
        let id = self.tree.add_generator(generator);
        if let Some(element) = self.tree.element_mut(node) {
            element.generator = Some(id);
        }
    }

    fn add_comment(&mut self, node: NodeId, message: &str) {
        if let Some(element) = self.tree.element_mut(node) {
            match &mut element.comment {
                Some(existing) => {
                    existing.push_str("; ");
                    existing.push_str(message);
                }
                None => element.comment = Some(message.to_string()),
            }
        }
    }

    fn record_issue(&mut self, code: &str, message: String) {
        let element = self.open_elements.last().and_then(|id| self.tree.element(*id));
        let issue = GenerationIssue::warning(code, message, element.map(|element| &element.name));
        self.issues.push(issue);
    }
}
