//! Modifier set canonicalization and numbering.

use crate::domain::modifier::{
    Modifier, ModifierComponent, ModifierCounters, ModifierRegistry, ModifierSetKey,
};

/// Builds the modifier registry of one parse.
///
/// Owns the counter state, so two resolvers never influence each other's
/// numbering.
#[derive(Debug, Clone, Default)]
pub struct ModifierResolver {
    counters: ModifierCounters,
    registry: ModifierRegistry,
}

impl ModifierResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the canonical set key of `components`, registering the set on
    /// first encounter.
    ///
    /// Each component gets a record under its own spec numbered from its
    /// device's counter.  Composite sets also get a record under the full key.
    /// That record reuses the number of the last component (in sorted order)
    /// rather than drawing a fresh one; previously generated cards depend on
    /// it.  Only the last component's counter advances.
    pub fn resolve(&mut self, mut components: Vec<ModifierComponent>) -> ModifierSetKey {
        components.sort_by_cached_key(ModifierComponent::spec);
        let Some(last) = components.last() else {
            return ModifierSetKey::unmodified();
        };
        let set_key = ModifierSetKey::from_components(&components);

        self.registry.ensure_spec(set_key.as_str());
        if self.registry.contains_set(&set_key) {
            return set_key;
        }

        for component in &components {
            self.registry.push(
                component.spec(),
                Modifier {
                    set_key: set_key.clone(),
                    number: self.counters.current(&component.device),
                    component: Some(component.clone()),
                },
            );
        }
        if set_key.is_composite() {
            self.registry.push(
                set_key.as_str().to_string(),
                Modifier {
                    set_key: set_key.clone(),
                    number: self.counters.current(&last.device),
                    component: None,
                },
            );
        }
        self.counters.advance(&last.device);
        set_key
    }

    pub fn registry(&self) -> &ModifierRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> ModifierRegistry {
        self.registry
    }
}
