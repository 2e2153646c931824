// Generation context: the type registry plus emit settings, shared by every hook.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::EmitSettings;
use crate::schema::{TypeCategory, TypeInfo};

/// Registry entry for one Vulkan type.
#[derive(Debug, Clone)]
pub struct RegisteredType {
    pub name: String,
    pub category: TypeCategory,
    need_marshal_in: bool,
}

impl RegisteredType {
    pub fn needs_marshal_in(&self) -> bool {
        self.need_marshal_in
    }
}

/// All known types, keyed by name. Sorted so downstream output is deterministic.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, RegisteredType>,
}

impl TypeRegistry {
    pub fn new(types: impl IntoIterator<Item = TypeInfo>) -> Self {
        let types = types
            .into_iter()
            .map(|t| {
                let entry = RegisteredType {
                    name: t.name.clone(),
                    category: t.category,
                    need_marshal_in: false,
                };
                (t.name, entry)
            })
            .collect();
        TypeRegistry { types }
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredType> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Flag a type as needing a marshal-in routine. Set-once: the flag is never
    /// cleared. Returns `false` if the type is not registered.
    pub fn mark_marshal_in(&mut self, name: &str) -> bool {
        match self.types.get_mut(name) {
            Some(t) => {
                t.need_marshal_in = true;
                true
            }
            None => false,
        }
    }

    pub fn needs_marshal_in(&self, name: &str) -> bool {
        self.types.get(name).is_some_and(|t| t.need_marshal_in)
    }

    /// Names of every flagged type, in name order.
    pub fn marshal_in_types(&self) -> impl Iterator<Item = &str> {
        self.types
            .values()
            .filter(|t| t.need_marshal_in)
            .map(|t| t.name.as_str())
    }
}

/// Central context threaded through every strategy hook.
pub struct CodegenContext {
    pub registry: TypeRegistry,
    pub settings: EmitSettings,
    /// Marshal-in requests from the function being emitted. They reach the
    /// registry only if the whole function is emitted.
    staged: BTreeSet<String>,
}

impl CodegenContext {
    pub fn new(types: impl IntoIterator<Item = TypeInfo>, settings: EmitSettings) -> Self {
        CodegenContext {
            registry: TypeRegistry::new(types),
            settings,
            staged: BTreeSet::new(),
        }
    }

    /// Request a marshal-in routine for `name` on behalf of the current function.
    pub fn stage_marshal_in(&mut self, name: &str) {
        self.staged.insert(name.to_string());
    }

    pub fn is_staged(&self, name: &str) -> bool {
        self.staged.contains(name)
    }

    /// Move every staged request into the registry.
    pub fn commit_staged(&mut self) {
        for name in std::mem::take(&mut self.staged) {
            if !self.registry.mark_marshal_in(&name) {
                tracing::debug!(type_name = %name, "staged marshal-in for unregistered type");
            }
        }
    }

    /// Drop staged requests from a function that was not emitted.
    pub fn discard_staged(&mut self) {
        self.staged.clear();
    }
}
