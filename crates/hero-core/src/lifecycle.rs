//! Loop state and bookkeeping for GPU resources acquired by a mounted scene.

use fnv::FnvHashMap;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Shared switch between the frame callback and the unmount path.
///
/// A tick that was already queued when `stop` ran checks the gate first and
/// returns without touching the scene or rescheduling.
#[derive(Clone, Debug)]
pub struct FrameGate(Rc<Cell<LoopState>>);

impl Default for FrameGate {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameGate {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(LoopState::Running)))
    }

    pub fn state(&self) -> LoopState {
        self.0.get()
    }

    pub fn is_running(&self) -> bool {
        self.0.get() == LoopState::Running
    }

    /// Returns `true` only for the call that actually stopped the loop.
    pub fn stop(&self) -> bool {
        self.0.replace(LoopState::Stopped) == LoopState::Running
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Buffer,
    Texture,
    Sampler,
    BindGroup,
    Pipeline,
    Surface,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u32);

#[derive(Clone, Debug)]
struct ResourceEntry {
    kind: ResourceKind,
    label: String,
    released: bool,
}

/// Records every acquired resource so teardown can release each exactly once.
#[derive(Debug, Default)]
pub struct ResourceLedger {
    next: u32,
    entries: FnvHashMap<ResourceId, ResourceEntry>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&mut self, kind: ResourceKind, label: impl Into<String>) -> ResourceId {
        let id = ResourceId(self.next);
        self.next += 1;
        self.entries.insert(
            id,
            ResourceEntry {
                kind,
                label: label.into(),
                released: false,
            },
        );
        id
    }

    /// Mark a resource released. Returns `false` if it was unknown or already
    /// released, in which case the caller must not free it again.
    pub fn release(&mut self, id: ResourceId) -> bool {
        match self.entries.get_mut(&id) {
            Some(e) if !e.released => {
                e.released = true;
                log::debug!("[ledger] released {:?} `{}`", e.kind, e.label);
                true
            }
            _ => false,
        }
    }

    /// Release everything still live, returning the ids in acquisition order.
    pub fn release_all(&mut self) -> Vec<ResourceId> {
        let mut ids: Vec<ResourceId> = self
            .entries
            .iter()
            .filter(|(_, e)| !e.released)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        for id in &ids {
            self.release(*id);
        }
        ids
    }

    pub fn is_live(&self, id: ResourceId) -> bool {
        self.entries.get(&id).is_some_and(|e| !e.released)
    }

    pub fn live_count(&self) -> usize {
        self.entries.values().filter(|e| !e.released).count()
    }

    pub fn live_of_kind(&self, kind: ResourceKind) -> usize {
        self.entries
            .values()
            .filter(|e| !e.released && e.kind == kind)
            .count()
    }

    pub fn acquired_count(&self) -> usize {
        self.entries.len()
    }
}

/// Runs a teardown closure at most once.
#[derive(Debug, Default)]
pub struct DisposeOnce {
    done: bool,
}

impl DisposeOnce {
    pub fn is_disposed(&self) -> bool {
        self.done
    }

    pub fn run(&mut self, f: impl FnOnce()) -> bool {
        if self.done {
            return false;
        }
        self.done = true;
        f();
        true
    }
}
