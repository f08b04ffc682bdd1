//! Batch orchestration: fan conversions out over all inputs, settle results
//! into ordered slots, and keep artifact handles from leaking across runs.

use std::sync::Arc;

use rayon::prelude::*;

use crate::convert::{ConvertedItem, InputItem, convert_item};
use crate::error::ConvertError;
use crate::intake::Selection;
use crate::logger::ProgressLine;
use crate::options::ConversionOptions;
use crate::store::ArtifactStore;

/// Per-input state holder. Terminal once `Converted` or `Failed`.
#[derive(Debug)]
pub enum Slot {
    Pending,
    Converted(ConvertedItem),
    Failed(String),
}

impl Slot {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Whole-batch phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    Idle,
    Converting,
    Settled,
}

/// Ordered batch of inputs with one result slot per input.
///
/// Slot `i` always corresponds to input `i`, regardless of the completion
/// order of the underlying conversions. Each run is stamped with an epoch;
/// results from a superseded run are discarded and their handles released,
/// so an old batch can never corrupt the slots of a new one.
pub struct Batch {
    store: Arc<ArtifactStore>,
    inputs: Vec<InputItem>,
    slots: Vec<Slot>,
    phase: BatchPhase,
    epoch: u64,
}

impl Batch {
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self {
            store,
            inputs: Vec::new(),
            slots: Vec::new(),
            phase: BatchPhase::Idle,
            epoch: 0,
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn inputs(&self) -> &[InputItem] {
        &self.inputs
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Seed the batch from a fresh selection.
    ///
    /// Implicitly clears any previous batch first: prior handles are
    /// released and in-flight results of the old run become stale.
    pub fn select(&mut self, selection: Selection) {
        self.clear();
        if selection.items.is_empty() {
            return;
        }
        self.slots = selection.items.iter().map(|_| Slot::Pending).collect();
        self.inputs = selection.items;
    }

    /// Drop all inputs and results and release every artifact handle.
    pub fn clear(&mut self) {
        for slot in self.slots.drain(..) {
            if let Slot::Converted(item) = slot {
                self.store.release(item.handle);
            }
        }
        self.inputs.clear();
        self.phase = BatchPhase::Idle;
        self.epoch += 1;
    }

    /// Convert every input under a snapshot of the given options.
    ///
    /// All conversions run to completion independently; one item's failure
    /// neither cancels nor fails the others. Handles from the previous run
    /// are released before any new one is allocated.
    pub fn convert_all(&mut self, options: &ConversionOptions, progress: Option<&ProgressLine>) {
        if self.inputs.is_empty() {
            return;
        }

        let epoch = self.begin_run();
        let snapshot = *options;
        let store = &self.store;
        let results: Vec<_> = self
            .inputs
            .par_iter()
            .map(|item| {
                let result = convert_item(item, &snapshot, store);
                if let Some(p) = progress {
                    p.inc("images");
                }
                result
            })
            .collect();

        for (index, result) in results.into_iter().enumerate() {
            self.commit(epoch, index, result);
        }
        self.phase = BatchPhase::Settled;
    }

    /// Start a new run: release prior handles, reset slots, bump the epoch.
    fn begin_run(&mut self) -> u64 {
        for slot in self.slots.iter_mut() {
            if let Slot::Converted(item) = std::mem::replace(slot, Slot::Pending) {
                self.store.release(item.handle);
            }
        }
        self.phase = BatchPhase::Converting;
        self.epoch += 1;
        self.epoch
    }

    /// Settle one result into its slot.
    ///
    /// Results stamped with a stale epoch belong to a superseded run and are
    /// discarded; a successful stale result's handle is released so nothing
    /// leaks.
    fn commit(&mut self, epoch: u64, index: usize, result: Result<ConvertedItem, ConvertError>) {
        if epoch != self.epoch || index >= self.slots.len() {
            if let Ok(item) = result {
                self.store.release(item.handle);
            }
            return;
        }

        match result {
            Ok(item) => {
                // At most one live handle per slot: retire the old one first.
                if let Slot::Converted(prev) =
                    std::mem::replace(&mut self.slots[index], Slot::Pending)
                {
                    self.store.release(prev.handle);
                }
                self.slots[index] = Slot::Converted(item);
            }
            Err(err) => {
                self.slots[index] = Slot::Failed(err.to_string());
            }
        }
    }

    /// The currently successful set, in input order.
    pub fn converted(&self) -> Vec<&ConvertedItem> {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Converted(item) => Some(item),
                _ => None,
            })
            .collect()
    }

    /// Aggregate status is an error only when every item failed.
    pub fn all_failed(&self) -> bool {
        !self.slots.is_empty()
            && self
                .slots
                .iter()
                .all(|slot| matches!(slot, Slot::Failed(_)))
    }

    /// Representative failure message: the last failed slot's reason.
    pub fn last_error(&self) -> Option<&str> {
        self.slots.iter().rev().find_map(|slot| match slot {
            Slot::Failed(reason) => Some(reason.as_str()),
            _ => None,
        })
    }
}

impl Drop for Batch {
    // Session end releases everything the batch still owns.
    fn drop(&mut self) {
        self.clear();
    }
}
