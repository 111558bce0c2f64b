//! Stage registry
//!
//! Fixed mapping from stage identifier to definition. The registry is a
//! plain value owned by the caller; hosts build one at startup from the
//! built-in definitions and optionally merge user files over them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::{loader, StageDefinition, StageError};

/// Stock stage definitions shipped with the crate
const BUILT_IN_STAGES: &str = include_str!("../../stages/high_dragons.toml");

/// Lookup table from stage id to definition, preserving insertion order
/// for listings.
#[derive(Debug, Clone, Default)]
pub struct StageRegistry {
    stages: HashMap<String, Arc<StageDefinition>>,
    order: Vec<String>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the stock stages embedded in the crate.
    pub fn built_in() -> Self {
        let stages = loader::load_stages_from_str(BUILT_IN_STAGES, Path::new("<built-in>"))
            .expect("built-in stage definitions must parse");

        let mut registry = Self::new();
        for stage in stages {
            registry.insert(stage);
        }
        registry
    }

    /// Insert a definition, replacing any existing stage with the same id.
    pub fn insert(&mut self, stage: StageDefinition) {
        let id = stage.id.clone();
        if !self.stages.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.stages.insert(id, Arc::new(stage));
    }

    pub fn get(&self, id: &str) -> Option<Arc<StageDefinition>> {
        self.stages.get(id).cloned()
    }

    /// Stage ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Definitions in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<StageDefinition>> {
        self.order.iter().filter_map(|id| self.stages.get(id))
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Merge definitions from a directory over the current contents.
    /// Returns how many definitions were loaded.
    pub fn extend_from_dir(&mut self, dir: &Path) -> Result<usize, StageError> {
        let stages = loader::load_stages_from_dir(dir)?;
        let count = stages.len();
        for stage in stages {
            self.insert(stage);
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_stages_parse() {
        let registry = StageRegistry::built_in();
        let ids: Vec<_> = registry.ids().collect();
        assert_eq!(ids, ["hbh", "hms", "hmc"]);
    }

    #[test]
    fn built_in_brunhilda_carries_break_tables() {
        let registry = StageRegistry::built_in();
        let hbh = registry.get("hbh").expect("hbh missing");

        assert_eq!(hbh.name, "High Brunhilda");
        assert!(!hbh.moves.is_empty());
        assert_eq!(hbh.break_timeline.len(), 2);
        assert_eq!(hbh.break_timeline[0].label, "Break");
        assert_eq!(hbh.break_timeline[1].duration_ms(), 1_000);
        assert_eq!(hbh.final_break_ms(142_000), Some(7_000));
        assert_eq!(hbh.final_break_ms(137_000), Some(1_500));
    }

    #[test]
    fn insert_replaces_without_reordering() {
        let mut registry = StageRegistry::built_in();
        let mut replacement = (*registry.get("hms").unwrap()).clone();
        replacement.name = "High Midgardsormr (custom)".to_string();
        registry.insert(replacement);

        let ids: Vec<_> = registry.ids().collect();
        assert_eq!(ids, ["hbh", "hms", "hmc"]);
        assert_eq!(
            registry.get("hms").unwrap().name,
            "High Midgardsormr (custom)"
        );
    }

    #[test]
    fn get_unknown_id_is_none() {
        let registry = StageRegistry::built_in();
        assert!(registry.get("nope").is_none());
    }
}
