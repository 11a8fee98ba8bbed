use crate::foundation::error::{ComposeError, ComposeResult};

/// Which scene slot a load request targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Photo,
    Frame,
}

/// What a slot shows while a newer load is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotPolicy {
    /// Keep drawing the previous content until the new one lands.
    KeepWhileLoading,
    /// Stop drawing the slot until the new content lands.
    HideWhileLoading,
}

/// Handle for one in-flight load. Only the most recent ticket of a slot may complete it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use = "a load ticket must be passed back to finish the load"]
pub struct LoadTicket {
    pub slot: SlotKind,
    pub generation: u64,
}

#[derive(Debug)]
pub enum LoadOutcome {
    Applied,
    /// A newer request superseded this one; the result was dropped.
    Stale,
    Failed(ComposeError),
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// An asset slot with a readiness flag and a generation counter.
///
/// Readiness is distinct from presence: with [`SlotPolicy::HideWhileLoading`] the slot keeps its
/// previous value but reports not-ready until the pending load resolves.
#[derive(Clone, Debug)]
pub struct AssetSlot<T> {
    kind: SlotKind,
    policy: SlotPolicy,
    current: Option<T>,
    ready: bool,
    generation: u64,
    pending: Option<u64>,
}

impl<T> AssetSlot<T> {
    pub fn new(kind: SlotKind, policy: SlotPolicy) -> Self {
        Self {
            kind,
            policy,
            current: None,
            ready: false,
            generation: 0,
            pending: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready && self.current.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The drawable value, if the slot is ready.
    pub fn ready_value(&self) -> Option<&T> {
        if self.ready { self.current.as_ref() } else { None }
    }

    pub fn value(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.pending = Some(self.generation);
        if self.policy == SlotPolicy::HideWhileLoading {
            self.ready = false;
        }
        LoadTicket {
            slot: self.kind,
            generation: self.generation,
        }
    }

    /// Resolve a load. Stale tickets are discarded without touching the slot; failures restore
    /// the slot to what it showed before the load began.
    pub fn finish(&mut self, ticket: LoadTicket, result: ComposeResult<T>) -> LoadOutcome {
        if ticket.slot != self.kind {
            return LoadOutcome::Failed(ComposeError::validation(format!(
                "{:?} ticket passed to {:?} slot",
                ticket.slot, self.kind
            )));
        }
        if self.pending != Some(ticket.generation) {
            return LoadOutcome::Stale;
        }
        self.pending = None;
        match result {
            Ok(value) => {
                self.current = Some(value);
                self.ready = true;
                LoadOutcome::Applied
            }
            Err(err) => {
                self.ready = self.current.is_some();
                LoadOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/slot.rs"]
mod tests;
