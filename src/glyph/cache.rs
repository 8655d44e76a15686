//! Build-once cache of character holders.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::holder::CharacterHolder;
use super::render::{GlyphRenderer, RenderParams};
use crate::error::Result;

/// Cache key: rendering parameters plus the optional fixed subset.
///
/// A key with a subset never equals a key without one, so fixed-subset and
/// full-range holders are kept apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HolderKey {
    pub params: RenderParams,
    pub subset: Option<String>,
}

impl HolderKey {
    pub fn new(params: &RenderParams, subset: Option<&str>) -> Self {
        Self {
            params: params.clone(),
            subset: subset.map(str::to_string),
        }
    }
}

/// Holders built so far, keyed by [`HolderKey`].
///
/// Lookup-or-build runs under one lock so two callers asking for the same
/// key never build it twice. Built holders are immutable and handed out as
/// `Arc`s. A failed build leaves nothing behind.
#[derive(Debug, Default)]
pub struct HolderCache {
    holders: Mutex<HashMap<HolderKey, Arc<CharacterHolder>>>,
}

impl HolderCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<HolderKey, Arc<CharacterHolder>>> {
        // Holders are inserted fully built, so a poisoned map is still consistent.
        self.holders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached holder for (`params`, `subset`), building it on first use.
    ///
    /// # Errors
    /// Propagates glyph creation and normalization failures from the build.
    pub fn get_or_build(
        &self,
        params: &RenderParams,
        subset: Option<&str>,
        renderer: &dyn GlyphRenderer,
    ) -> Result<Arc<CharacterHolder>> {
        let key = HolderKey::new(params, subset);
        let mut holders = self.lock();
        if let Some(holder) = holders.get(&key) {
            log::debug!("Holder cache hit for {} subset={:?}", params, subset);
            return Ok(Arc::clone(holder));
        }

        log::debug!("Holder cache miss for {} subset={:?}, building", params, subset);
        let holder = Arc::new(CharacterHolder::build(params, subset, renderer)?);
        holders.insert(key, Arc::clone(&holder));
        Ok(holder)
    }

    /// Cached holder for a key, without building.
    pub fn get(&self, params: &RenderParams, subset: Option<&str>) -> Option<Arc<CharacterHolder>> {
        self.lock().get(&HolderKey::new(params, subset)).cloned()
    }

    pub fn contains(&self, params: &RenderParams, subset: Option<&str>) -> bool {
        self.lock().contains_key(&HolderKey::new(params, subset))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every cached holder. Outstanding `Arc`s stay valid.
    pub fn clear(&self) {
        self.lock().clear();
    }
}
