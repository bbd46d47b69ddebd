use crate::error::Error;
use indexmap::IndexMap;

/// Symbol name -> resolved value, in declaration order.
///
/// The value may be a function id, a constant, a heap offset, an extern
/// address or a jump label id; the table does not record which.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels(IndexMap<String, i64>);

impl Labels {
    pub fn new() -> Self {
        Labels(IndexMap::new())
    }

    /// Bind `name`, returning the value it replaced
    pub fn insert(&mut self, name: &str, value: i64) -> Option<i64> {
        self.0.insert(name.to_string(), value)
    }

    pub fn get(&self, name: &str) -> Result<i64, Error> {
        self.get_val(name)
            .ok_or_else(|| Error::UndefinedLabel(name.to_string(), None))
    }

    pub fn get_val(&self, name: &str) -> Option<i64> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(name, val)| (name.as_str(), *val))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
