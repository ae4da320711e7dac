use xmlseed_core::Facets;

use crate::facets::LengthLimits;
use crate::generators::ValueGenerator;

/// Union types: one member generator per call, in member order.
#[derive(Debug, Clone)]
pub struct UnionGenerator {
    members: Vec<ValueGenerator>,
    calls: usize,
}

impl UnionGenerator {
    pub fn new(members: Vec<ValueGenerator>) -> Self {
        Self { members, calls: 0 }
    }

    pub fn set_prefix(&mut self, prefix: &str) {
        for member in &mut self.members {
            member.set_prefix(prefix);
        }
    }

    pub fn next_value(&mut self) -> String {
        if self.members.is_empty() {
            return String::new();
        }
        let index = self.calls % self.members.len();
        self.calls = self.calls.wrapping_add(1);
        self.members[index].next_value()
    }
}

/// List types: space-separated items from one item generator.
#[derive(Debug, Clone)]
pub struct ListGenerator {
    item: Box<ValueGenerator>,
    count: usize,
}

impl ListGenerator {
    /// Item count: `length`, else `minLength`, else `maxLength`, else the
    /// configured default.
    pub fn new(item: ValueGenerator, facets: &Facets, default_count: usize) -> Self {
        let limits = LengthLimits::from_facets(facets);
        let count = limits
            .exact
            .or(limits.min)
            .or(limits.max)
            .unwrap_or(default_count);
        Self {
            item: Box::new(item),
            count,
        }
    }

    pub fn set_prefix(&mut self, prefix: &str) {
        self.item.set_prefix(prefix);
    }

    pub fn next_value(&mut self) -> String {
        let items: Vec<String> = (0..self.count).map(|_| self.item.next_value()).collect();
        items.join(" ").trim().to_string()
    }
}
