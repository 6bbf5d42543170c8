use std::collections::HashMap;

/// Assigns each distinct speaker name a dense index in first-seen order.
#[derive(Debug, Default)]
pub struct NameRegistry {
    indices: HashMap<String, usize>,
    names: Vec<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index previously assigned to `name`, assigning the next
    /// free one if the name has not been seen yet.
    pub fn resolve(&mut self, name: &str) -> usize {
        if let Some(&index) = self.indices.get(name) {
            return index;
        }

        let index = self.names.len();
        self.names.push(name.to_owned());
        self.indices.insert(name.to_owned(), index);
        index
    }

    /// All `(index, name)` pairs in ascending index order.
    pub fn all_entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| (index, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
