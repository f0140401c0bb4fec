//! The authoritative resource registry.
//!
//! The registry owns every asset, format, and effect in a document, keyed by
//! identifier. Its counter only ever advances, so identifiers are never
//! reused within a document's lifetime — not even when the transaction that
//! reserved them rolls back.

use std::collections::{BTreeMap, HashMap};

use cutplan_core::{ResourceId, Span};
use tracing::debug;

use crate::error::ResourceError;
use crate::resource::{MediaKind, Resource};

/// Owns the document's resources and issues identifiers.
///
/// `register` is the only mutation path; every resource passes its structural
/// validation before insertion, so nothing outside this API can corrupt the
/// set.
#[derive(Debug)]
pub struct Registry {
    next_index: u32,
    resources: BTreeMap<ResourceId, Resource>,
    assets_by_path: HashMap<String, ResourceId>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            next_index: 1,
            resources: BTreeMap::new(),
            assets_by_path: HashMap::new(),
        }
    }

    /// Atomically advance the counter and return `n` never-before-issued
    /// identifiers. Reserved identifiers stay retired even if unused.
    pub fn reserve_ids(&mut self, n: usize) -> Vec<ResourceId> {
        let mut ids = Vec::with_capacity(n);
        for _ in 0..n {
            // next_index starts at 1 and only increases, so new is infallible.
            let id = ResourceId::new(self.next_index).expect("identifier counter is positive");
            self.next_index += 1;
            ids.push(id);
        }
        debug!(count = n, next = self.next_index, "reserved identifiers");
        ids
    }

    /// Insert a resource keyed by its identifier.
    ///
    /// The resource's structural invariants are checked first; an identifier
    /// already present fails with `DuplicateIdentifier` without mutating
    /// anything.
    pub fn register(&mut self, resource: Resource) -> Result<(), ResourceError> {
        resource.validate()?;
        let id = resource.id();
        if self.resources.contains_key(&id) {
            return Err(ResourceError::DuplicateIdentifier { id });
        }
        // Keep the counter ahead of externally constructed identifiers.
        if id.index() >= self.next_index {
            self.next_index = id.index() + 1;
        }
        if let Some(path) = resource.source_path() {
            self.assets_by_path.insert(path.to_string(), id);
        }
        debug!(%id, name = resource.name(), "registered resource");
        self.resources.insert(id, resource);
        Ok(())
    }

    /// Look up or create an asset for a source path.
    ///
    /// Returns `(id, true)` when the path was already registered, otherwise
    /// registers a new asset and returns `(id, false)`.
    pub fn get_or_create_asset(
        &mut self,
        source_path: &str,
        name: &str,
        media_kind: MediaKind,
        duration: Span,
    ) -> Result<(ResourceId, bool), ResourceError> {
        if let Some(&id) = self.assets_by_path.get(source_path) {
            return Ok((id, true));
        }
        let id = self.reserve_ids(1)[0];
        self.register(Resource::asset(id, name, source_path, media_kind, duration))?;
        Ok((id, false))
    }

    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(&id)
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.resources.contains_key(&id)
    }

    /// Identifier registered for a source path, if any.
    pub fn asset_for_path(&self, source_path: &str) -> Option<ResourceId> {
        self.assets_by_path.get(source_path).copied()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resources in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }
}
