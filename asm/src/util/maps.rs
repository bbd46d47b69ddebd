use crate::assemble::labels::Labels;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LabelMapEntry {
    pub value: i64,
}

/// Label name -> value, for debuggers and linkers
#[derive(Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct LabelMap(pub BTreeMap<String, LabelMapEntry>);

impl LabelMap {
    pub fn new(labels: &Labels) -> Self {
        let map = labels
            .iter()
            .map(|(name, value)| (name.to_string(), LabelMapEntry { value }))
            .collect();
        LabelMap(map)
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.0.get(name).map(|entry| entry.value)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.0)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml).map(LabelMap)
    }
}
