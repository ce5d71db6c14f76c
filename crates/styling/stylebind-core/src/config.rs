//! Core configuration for stylebind-core.

use serde::{Deserialize, Serialize};

/// Capacity hints used when a styling context is created.
/// None of these limit growth; they only size the initial allocations, so zero
/// is as valid as any other value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Expected number of entries (single + multi) per element.
    pub entry_capacity: usize,
    /// Expected number of directives with styling on one element (template included).
    pub directive_capacity: usize,
    /// Expected number of initial style/class values per element.
    pub initial_value_capacity: usize,
    /// Expected number of player builder slots once players are in use.
    pub player_slot_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry_capacity: 16,
            directive_capacity: 2,
            initial_value_capacity: 4,
            player_slot_capacity: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "entry_capacity": 64 }"#).unwrap();
        assert_eq!(cfg.entry_capacity, 64);
        assert_eq!(cfg.directive_capacity, Config::default().directive_capacity);
    }

    #[test]
    fn zero_capacities_still_build_a_working_context() {
        use crate::context::StylingContext;
        use crate::ids::ElementId;

        let cfg = Config {
            entry_capacity: 0,
            directive_capacity: 0,
            initial_value_capacity: 0,
            player_slot_capacity: 0,
        };
        let mut template = StylingContext::new(cfg.clone(), None);
        assert_eq!(template.directives().len(), 1);
        template.update_context_with_bindings(None, &["on"], &["width"], None, false);
        let mut ctx = template.alloc(Some(ElementId(1)));
        assert_eq!(ctx.config(), &cfg);
        ctx.update_style_prop(0, "1px", None).unwrap();
        assert!(ctx.is_context_dirty());
    }
}
