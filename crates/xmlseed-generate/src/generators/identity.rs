use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Registry shared by every ID and IDREF generator of one run.
pub type IdRegistryHandle = Rc<RefCell<IdRegistry>>;

/// Issued `xs:ID` values, in issue order, plus the IDREF cursor.
#[derive(Debug, Default)]
pub struct IdRegistry {
    values: Vec<String>,
    issued: HashSet<String>,
    counter: u64,
    cursor: usize,
}

impl IdRegistry {
    pub fn shared() -> IdRegistryHandle {
        Rc::new(RefCell::new(IdRegistry::default()))
    }

    /// Issue a document-unique ID value starting with `prefix`.
    pub fn issue(&mut self, prefix: &str) -> String {
        loop {
            self.counter += 1;
            let candidate = format!("{}{}", id_prefix(prefix), self.counter);
            if self.issued.insert(candidate.clone()) {
                self.values.push(candidate.clone());
                return candidate;
            }
        }
    }

    /// Next reference to an issued ID. Seeds one ID when nothing was issued yet.
    pub fn next_reference(&mut self, prefix: &str) -> String {
        if self.values.is_empty() {
            self.issue(prefix);
        }
        let value = self.values[self.cursor % self.values.len()].clone();
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }

    pub fn issued(&self) -> &[String] {
        &self.values
    }
}

/// IDs must be NCNames; an empty prefix still needs a leading letter.
fn id_prefix(prefix: &str) -> &str {
    if prefix.is_empty() { "id" } else { prefix }
}

#[derive(Debug, Clone)]
pub struct IdGenerator {
    registry: IdRegistryHandle,
    prefix: String,
}

impl IdGenerator {
    pub fn new(registry: IdRegistryHandle) -> Self {
        Self {
            registry,
            prefix: String::new(),
        }
    }

    pub fn set_prefix(&mut self, prefix: &str) {
        self.prefix = prefix.to_string();
    }

    pub fn next_value(&mut self) -> String {
        self.registry.borrow_mut().issue(&self.prefix)
    }
}

#[derive(Debug, Clone)]
pub struct IdRefGenerator {
    registry: IdRegistryHandle,
    prefix: String,
}

impl IdRefGenerator {
    pub fn new(registry: IdRegistryHandle) -> Self {
        Self {
            registry,
            prefix: String::new(),
        }
    }

    pub fn set_prefix(&mut self, prefix: &str) {
        self.prefix = prefix.to_string();
    }

    pub fn next_value(&mut self) -> String {
        self.registry.borrow_mut().next_reference(&self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_cycle_through_issued_ids() {
        let registry = IdRegistry::shared();
        let mut ids = IdGenerator::new(registry.clone());
        ids.set_prefix("item");
        let mut refs = IdRefGenerator::new(registry.clone());
        refs.set_prefix("ref");

        assert_eq!(ids.next_value(), "item1");
        assert_eq!(ids.next_value(), "item2");
        assert_eq!(refs.next_value(), "item1");
        assert_eq!(refs.next_value(), "item2");
        assert_eq!(refs.next_value(), "item1");
    }

    #[test]
    fn first_reference_seeds_an_id() {
        let registry = IdRegistry::shared();
        let mut refs = IdRefGenerator::new(registry.clone());
        refs.set_prefix("owner");
        assert_eq!(refs.next_value(), "owner1");
        assert_eq!(registry.borrow().issued(), ["owner1".to_string()]);
    }
}
