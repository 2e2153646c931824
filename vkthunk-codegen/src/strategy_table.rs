// Strategy lookup: which marshaling policy applies to which parameter.

use std::collections::HashMap;

use crate::config::MarshalConfig;
use crate::context::TypeRegistry;
use crate::marshal::{DirectStrategy, MapMemoryStrategy, MarshalStrategy, StructInStrategy};
use crate::schema::{VkFunction, VkParam};

/// One strategy instance per policy for the whole run, plus per-call-site overrides.
pub struct StrategyTable {
    direct: DirectStrategy,
    struct_in: StructInStrategy,
    /// (function, param) → acquire/report strategy.
    map_memory: HashMap<(String, String), MapMemoryStrategy>,
}

/// A resolved parameter, for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub function: String,
    pub param: String,
    pub strategy: &'static str,
}

impl StrategyTable {
    pub fn new(config: &MarshalConfig) -> Self {
        let map_memory = config
            .map_memory
            .iter()
            .map(|entry| {
                (
                    (entry.function.clone(), entry.param.clone()),
                    MapMemoryStrategy::from_entry(entry),
                )
            })
            .collect();
        StrategyTable {
            direct: DirectStrategy,
            struct_in: StructInStrategy::new(config.excluded_types.iter().cloned()),
            map_memory,
        }
    }

    /// Register an acquire/report call site.
    pub fn with_map_memory(mut self, function: &str, param: &str, strategy: MapMemoryStrategy) -> Self {
        self.map_memory
            .insert((function.to_string(), param.to_string()), strategy);
        self
    }

    pub fn struct_in(&self) -> &StructInStrategy {
        &self.struct_in
    }

    /// Pick the strategy for a parameter. Lookup uses the parameter's declared
    /// name, so call it before any hook has renamed the parameter.
    pub fn resolve(&self, function: &str, param: &VkParam, registry: &TypeRegistry) -> &dyn MarshalStrategy {
        let key = (function.to_string(), param.name.clone());
        if let Some(strategy) = self.map_memory.get(&key) {
            return strategy;
        }

        if param.is_pointer && !param.is_double_pointer {
            if self.struct_in.is_excluded(&param.param_type) {
                return &self.struct_in;
            }
            let has_layout = registry
                .get(&param.param_type)
                .is_some_and(|t| t.category.has_layout());
            if has_layout {
                return &self.struct_in;
            }
        }

        &self.direct
    }

    /// Resolve every parameter of every function without emitting anything.
    pub fn plan(&self, functions: &[VkFunction], registry: &TypeRegistry) -> Vec<PlanEntry> {
        let mut entries = Vec::new();
        for func in functions {
            for param in &func.params {
                entries.push(PlanEntry {
                    function: func.name().to_string(),
                    param: param.name.clone(),
                    strategy: self.resolve(func.name(), param, registry).name(),
                });
            }
        }
        entries
    }
}
