//! Emitter registry.
//!
//! Maps each [`ConversionKind`] to the emitter that renders it, so adding a
//! conversion means registering one more emitter.

use std::collections::BTreeMap;
use std::fmt;

use super::json::JsonEmitter;
use super::string::StringEmitter;
use super::traits::{ConversionEmitter, EmitConfig, GeneratedUnit};
use crate::error::GeneratorError;
use crate::ir::{ConversionKind, EnumDeclaration};

/// Registry of conversion emitters.
pub struct EmitterRegistry {
    emitters: BTreeMap<ConversionKind, Box<dyn ConversionEmitter>>,
}

impl fmt::Debug for EmitterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.emitters.iter().map(|(kind, e)| (kind, e.name())))
            .finish()
    }
}

impl Default for EmitterRegistry {
    /// Registry with the built-in string and JSON emitters.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(StringEmitter::new());
        registry.register(JsonEmitter::new());
        registry
    }
}

impl EmitterRegistry {
    /// Registry with the built-in emitters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with no emitter.
    pub fn empty() -> Self {
        Self {
            emitters: BTreeMap::new(),
        }
    }

    /// Register an emitter, replacing any previous one for the same kind.
    pub fn register(&mut self, emitter: impl ConversionEmitter + 'static) {
        self.emitters.insert(emitter.kind(), Box::new(emitter));
    }

    /// Emitter for a conversion kind.
    pub fn get(&self, kind: ConversionKind) -> Option<&dyn ConversionEmitter> {
        self.emitters.get(&kind).map(|emitter| emitter.as_ref())
    }

    /// Whether an emitter is registered for `kind`.
    pub fn contains(&self, kind: ConversionKind) -> bool {
        self.emitters.contains_key(&kind)
    }

    /// Number of registered emitters.
    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    /// Whether no emitter is registered.
    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    /// Render every conversion `decl` requests, in [`ConversionKind`] order.
    pub fn emit(
        &self,
        decl: &EnumDeclaration,
        config: &EmitConfig,
    ) -> Result<Vec<GeneratedUnit>, GeneratorError> {
        decl.requested_conversions
            .iter()
            .map(|&kind| {
                let emitter = self.get(kind).ok_or(GeneratorError::MissingEmitter(kind))?;
                tracing::trace!(path = %decl.qualified_path, emitter = emitter.name(), "emitting");
                emitter.emit(decl, config)
            })
            .collect()
    }
}
