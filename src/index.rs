// Label index for HttpClient metrics
// Maps each metric label name to the request parameter that populates it
//
// Numan Thabit 2025 Nov

use crate::labels::{HOST, METHOD};
use crate::mapping::ParameterMapping;
use std::collections::HashMap;

/// Immutable label name -> parameter name table, built once per metric from
/// an already validated parameter set.
#[derive(Debug, Clone)]
pub struct LabelIndex {
    map: HashMap<String, String>,
}

impl LabelIndex {
    pub fn build(parameters: &[ParameterMapping]) -> Self {
        let mut map = HashMap::with_capacity(parameters.len() + 2);

        // Defaults are hardcoded.
        map.insert(METHOD.to_string(), METHOD.to_string());
        map.insert(HOST.to_string(), HOST.to_string());

        for entry in parameters {
            map.insert(
                entry.label_name().to_string(),
                entry.parameter_name().to_string(),
            );
        }

        Self { map }
    }

    pub fn parameter_for(&self, label_name: &str) -> Option<&str> {
        self.map.get(label_name).map(String::as_str)
    }

    pub fn contains(&self, label_name: &str) -> bool {
        self.map.contains_key(label_name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
