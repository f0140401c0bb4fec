//! Transactional, all-or-nothing resource creation.
//!
//! Resource creation frequently fails mid-batch (bad duration, bad path).
//! A `Transaction` stages resources against an exclusively borrowed
//! [`Registry`] and either merges them all in one commit or discards them
//! all, leaving the registry exactly as it was. Identifier reservation is
//! deliberately *not* undone by rollback: once issued, an identifier is
//! permanently retired so no two transactions can ever collide, even under
//! rollback and retry.

use tracing::debug;

use cutplan_core::{ResourceId, Span};

use crate::error::ResourceError;
use crate::registry::Registry;
use crate::resource::{FormatKind, MediaKind, Resource};

/// Lifecycle state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    /// Accumulating reserved identifiers and staged resources.
    Open,
    /// Staged resources merged into the registry. Terminal.
    Committed,
    /// Staged resources discarded, registry untouched. Terminal.
    RolledBack,
}

impl TxState {
    fn name(self) -> &'static str {
        match self {
            TxState::Open => "open",
            TxState::Committed => "committed",
            TxState::RolledBack => "rolled back",
        }
    }
}

/// A staged batch of registry mutations.
///
/// Holds the registry borrow for its whole lifetime, so staged state is never
/// observable from outside and no other writer can interleave.
#[derive(Debug)]
pub struct Transaction<'r> {
    registry: &'r mut Registry,
    reserved: Vec<ResourceId>,
    next_reserved: usize,
    staged: Vec<Resource>,
    state: TxState,
}

impl<'r> Transaction<'r> {
    /// Open a transaction, reserving `reserve` identifiers up front.
    ///
    /// Further identifiers are reserved on demand if the batch outgrows the
    /// initial reservation.
    pub fn new(registry: &'r mut Registry, reserve: usize) -> Self {
        let reserved = registry.reserve_ids(reserve);
        Self {
            registry,
            reserved,
            next_reserved: 0,
            staged: Vec::new(),
            state: TxState::Open,
        }
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    /// Identifiers reserved by this transaction, in issue order.
    pub fn reserved_ids(&self) -> &[ResourceId] {
        &self.reserved
    }

    /// Number of staged, not-yet-committed resources.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    fn ensure_open(&self) -> Result<(), ResourceError> {
        if self.state == TxState::Open {
            Ok(())
        } else {
            Err(ResourceError::TransactionClosed {
                state: self.state.name(),
            })
        }
    }

    fn take_id(&mut self) -> ResourceId {
        if self.next_reserved < self.reserved.len() {
            let id = self.reserved[self.next_reserved];
            self.next_reserved += 1;
            id
        } else {
            let id = self.registry.reserve_ids(1)[0];
            self.reserved.push(id);
            self.next_reserved = self.reserved.len();
            id
        }
    }

    fn stage(&mut self, resource: Resource) -> Result<ResourceId, ResourceError> {
        resource.validate()?;
        let id = resource.id();
        self.staged.push(resource);
        Ok(id)
    }

    /// Validate and stage a media asset. On failure nothing is staged.
    pub fn create_asset(
        &mut self,
        name: &str,
        source_path: &str,
        media_kind: MediaKind,
        duration: Span,
    ) -> Result<ResourceId, ResourceError> {
        self.ensure_open()?;
        let id = self.take_id();
        self.stage(Resource::asset(id, name, source_path, media_kind, duration))
    }

    /// Validate and stage a format. On failure nothing is staged.
    pub fn create_format(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        kind: FormatKind,
        frame_duration: Option<Span>,
    ) -> Result<ResourceId, ResourceError> {
        self.ensure_open()?;
        let id = self.take_id();
        self.stage(Resource::format(
            id,
            name,
            width,
            height,
            kind,
            frame_duration,
        ))
    }

    /// Validate and stage an effect. On failure nothing is staged.
    pub fn create_effect(
        &mut self,
        name: &str,
        effect_uid: &str,
    ) -> Result<ResourceId, ResourceError> {
        self.ensure_open()?;
        let id = self.take_id();
        self.stage(Resource::effect(id, name, effect_uid))
    }

    /// Merge every staged resource into the registry in one step.
    ///
    /// If any staged identifier now conflicts with the registry, the whole
    /// commit fails and the registry is left untouched; the transaction stays
    /// open so `rollback` remains available.
    pub fn commit(&mut self) -> Result<(), ResourceError> {
        self.ensure_open()?;

        // Pre-flight every staged id so the merge below cannot fail halfway.
        for resource in &self.staged {
            if self.registry.contains(resource.id()) {
                return Err(ResourceError::DuplicateIdentifier {
                    id: resource.id(),
                });
            }
        }

        let staged = std::mem::take(&mut self.staged);
        let count = staged.len();
        for resource in staged {
            // Validated at staging and ids pre-flighted above.
            self.registry.register(resource)?;
        }
        self.state = TxState::Committed;
        debug!(count, "transaction committed");
        Ok(())
    }

    /// Discard staged resources, leaving the registry untouched.
    ///
    /// Safe to call repeatedly and after a failed commit. Reserved
    /// identifiers stay retired. Rolling back a committed transaction is an
    /// error.
    pub fn rollback(&mut self) -> Result<(), ResourceError> {
        match self.state {
            TxState::Open => {
                let count = self.staged.len();
                self.staged.clear();
                self.state = TxState::RolledBack;
                debug!(count, "transaction rolled back");
                Ok(())
            }
            TxState::RolledBack => Ok(()),
            TxState::Committed => Err(ResourceError::TransactionClosed {
                state: TxState::Committed.name(),
            }),
        }
    }
}
