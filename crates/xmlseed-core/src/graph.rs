use std::collections::{BTreeMap, HashMap, HashSet};

use crate::qname::QName;
use crate::schema::{AttributeDecl, CompiledSchema, ComplexTypeDef, ElementDecl, SimpleTypeDef, TypeDefinition};
use crate::types::Builtin;

/// A type reference resolved against the schema set and the built-ins.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedType<'a> {
    Builtin(Builtin),
    Simple(&'a SimpleTypeDef),
    Complex(&'a ComplexTypeDef),
}

/// Lookup tables, substitution groups and derivation chains of a schema set.
#[derive(Debug)]
pub struct SchemaIndex<'a> {
    schema: &'a CompiledSchema,
    elements: HashMap<&'a QName, &'a ElementDecl>,
    types: HashMap<&'a QName, &'a TypeDefinition>,
    attributes: HashMap<&'a QName, &'a AttributeDecl>,
    substitutions: BTreeMap<&'a QName, Vec<&'a ElementDecl>>,
}

impl<'a> SchemaIndex<'a> {
    pub fn new(schema: &'a CompiledSchema) -> Self {
        let mut elements = HashMap::new();
        let mut substitutions: BTreeMap<&'a QName, Vec<&'a ElementDecl>> = BTreeMap::new();
        for element in &schema.elements {
            elements.entry(&element.name).or_insert(element);
            if let Some(head) = &element.substitution_group {
                substitutions.entry(head).or_default().push(element);
            }
        }

        let mut types = HashMap::new();
        for definition in &schema.types {
            types.entry(definition.name()).or_insert(definition);
        }

        let mut attributes = HashMap::new();
        for attribute in &schema.attributes {
            attributes.entry(&attribute.name).or_insert(attribute);
        }

        Self {
            schema,
            elements,
            types,
            attributes,
            substitutions,
        }
    }

    /// Global element declarations in declaration order.
    pub fn global_elements(&self) -> impl Iterator<Item = &'a ElementDecl> + 'a {
        self.schema.elements.iter()
    }

    /// Global attribute declarations in declaration order.
    pub fn global_attributes(&self) -> impl Iterator<Item = &'a AttributeDecl> + 'a {
        self.schema.attributes.iter()
    }

    pub fn element(&self, name: &QName) -> Option<&'a ElementDecl> {
        self.elements.get(name).copied()
    }

    pub fn attribute(&self, name: &QName) -> Option<&'a AttributeDecl> {
        self.attributes.get(name).copied()
    }

    pub fn type_definition(&self, name: &QName) -> Option<&'a TypeDefinition> {
        self.types.get(name).copied()
    }

    /// First global element that can stand as a document root.
    pub fn first_concrete_element(&self) -> Option<&'a ElementDecl> {
        self.schema.elements.iter().find(|element| !element.is_abstract)
    }

    /// Resolve a type name against user definitions first, then the built-ins.
    pub fn resolve_type(&self, name: &QName) -> Option<ResolvedType<'a>> {
        match self.type_definition(name) {
            Some(TypeDefinition::Simple(def)) => Some(ResolvedType::Simple(def)),
            Some(TypeDefinition::Complex(def)) => Some(ResolvedType::Complex(def)),
            None => Builtin::from_qname(name).map(ResolvedType::Builtin),
        }
    }

    /// Concrete members of the substitution group headed by `head`.
    ///
    /// Members that head a group of their own contribute their members instead
    /// of themselves. Abstract members are left out.
    pub fn substitution_members(&self, head: &QName) -> Vec<&'a ElementDecl> {
        let mut visited = HashSet::new();
        visited.insert(head.clone());
        let mut members = Vec::new();
        self.collect_members(head, &mut visited, &mut members);
        members
    }

    fn collect_members(
        &self,
        head: &QName,
        visited: &mut HashSet<QName>,
        members: &mut Vec<&'a ElementDecl>,
    ) {
        let Some(direct) = self.substitutions.get(head) else {
            return;
        };
        for member in direct {
            if !visited.insert(member.name.clone()) {
                continue;
            }
            if self.substitutions.contains_key(&member.name) {
                self.collect_members(&member.name, visited, members);
            } else if !member.is_abstract {
                members.push(member);
            }
        }
    }

    /// True when `derived` reaches `base` through its chain of base types.
    pub fn is_derived_from(&self, derived: &QName, base: &QName) -> bool {
        let mut visited = HashSet::new();
        let mut current = self.type_definition(derived).and_then(TypeDefinition::base);
        while let Some(name) = current {
            if name == base {
                return true;
            }
            if !visited.insert(name) {
                return false;
            }
            current = self.type_definition(name).and_then(TypeDefinition::base);
        }
        false
    }

    /// First non-abstract global complex type derived from `base`.
    pub fn concrete_derived_type(&self, base: &QName) -> Option<&'a ComplexTypeDef> {
        self.schema.types.iter().find_map(|definition| match definition {
            TypeDefinition::Complex(def)
                if !def.is_abstract && &def.name != base && self.is_derived_from(&def.name, base) =>
            {
                Some(def)
            }
            _ => None,
        })
    }
}
