use std::{future::Future, ops::ControlFlow, sync::Arc};

use opsync_types::{Operation, OperationList};
use tracing::debug;

use super::{LOG_OBSERVER, ReconcileObserver, same_op};

/// Builds operation lists with the minimal diff against the cached list
///
/// `records` are handed over oldest first and walked from the last index down
/// to the first, so the merged list comes out most recent first. Operations
/// that did not change keep their `Arc`, and when nothing changed at all the
/// cached list itself is returned.
#[derive(Clone, Copy)]
pub struct OperationsBuilder<'o> {
    observer: &'o dyn ReconcileObserver,
}

/// Merge state, fed one freshly built operation at a time
struct MergeState<'o> {
    /// current view of the cached list, replaced wholesale on a mismatch
    existing: OperationList,
    operations: Vec<Arc<Operation>>,
    immutable_op_cmp_done: bool,
    observer: &'o dyn ReconcileObserver,
}

impl Default for OperationsBuilder<'static> {
    fn default() -> Self {
        Self { observer: &LOG_OBSERVER }
    }
}

impl<'o> OperationsBuilder<'o> {
    pub fn new(observer: &'o dyn ReconcileObserver) -> Self {
        Self { observer }
    }

    pub fn build_sync<R, E, F>(
        &self,
        existing: &OperationList,
        records: &[R],
        mut build_op: F,
    ) -> Result<OperationList, E>
    where
        F: FnMut(&R) -> Result<Option<Arc<Operation>>, E>,
    {
        if existing.is_empty() && records.is_empty() {
            return Ok(existing.clone());
        }

        let mut state = MergeState::new(existing, self.observer);
        for (index, record) in records.iter().enumerate().rev() {
            let Some(new_op) = build_op(record)? else { continue };

            if let ControlFlow::Break(operations) = state.step(index + 1, new_op) {
                return Ok(operations);
            }
        }

        Ok(state.finish())
    }

    /// Same merge as [`Self::build_sync`] for conversions that need async work
    ///
    /// Each conversion is awaited before the next one starts, a step depends on
    /// the cached list as left by the previous step.
    pub async fn build<'r, R, E, F, Fut>(
        &self,
        existing: &OperationList,
        records: &'r [R],
        mut build_op: F,
    ) -> Result<OperationList, E>
    where
        F: FnMut(&'r R) -> Fut,
        Fut: Future<Output = Result<Option<Arc<Operation>>, E>>,
    {
        if existing.is_empty() && records.is_empty() {
            return Ok(existing.clone());
        }

        let mut state = MergeState::new(existing, self.observer);
        for (index, record) in records.iter().enumerate().rev() {
            let Some(new_op) = build_op(record).await? else { continue };

            if let ControlFlow::Break(operations) = state.step(index + 1, new_op) {
                return Ok(operations);
            }
        }

        Ok(state.finish())
    }
}

impl<'o> MergeState<'o> {
    fn new(existing: &OperationList, observer: &'o dyn ReconcileObserver) -> Self {
        Self {
            existing: existing.clone(),
            operations: Vec::new(),
            immutable_op_cmp_done: false,
            observer,
        }
    }

    /// `remaining` counts the records still to walk, this one included
    fn step(&mut self, remaining: usize, new_op: Arc<Operation>) -> ControlFlow<OperationList> {
        let Some(index) = self.existing.position(&new_op.id) else {
            self.operations.push(new_op);
            return ControlFlow::Continue(());
        };

        if !self.immutable_op_cmp_done {
            let existing_op = &self.existing[index];

            // still being confirmed, height is the only field allowed to move
            if existing_op.block_height != new_op.block_height {
                self.operations.push(new_op);
                return ControlFlow::Continue(());
            }

            // only the most recent overlapping operation gets the full check
            self.immutable_op_cmp_done = true;
            if !same_op(existing_op, &new_op) {
                self.observer.operation_mismatch(existing_op, &new_op);
                self.existing = OperationList::empty();
                self.operations.push(new_op);
                return ControlFlow::Continue(());
            }
        }

        let rest = &self.existing[index..];
        if rest.len() != remaining {
            // lists disagree on the number of operations, we don't know where the
            // hole is yet but this one can be kept
            self.operations.push(self.existing[index].clone());
            return ControlFlow::Continue(());
        }

        // both lists line up from here to the oldest operation
        if self.operations.is_empty() && index == 0 {
            debug!("operations unchanged, keeping the cached list");
            return ControlFlow::Break(self.existing.clone());
        }

        debug!("reusing {} cached operations", rest.len());
        let mut operations = std::mem::take(&mut self.operations);
        operations.extend_from_slice(rest);

        ControlFlow::Break(operations.into())
    }

    fn finish(self) -> OperationList {
        self.operations.into()
    }
}

/// Synchronous minimal diff merge, see [`OperationsBuilder`]
pub fn minimal_operations_builder_sync<R, E, F>(
    existing: &OperationList,
    records: &[R],
    build_op: F,
) -> Result<OperationList, E>
where
    F: FnMut(&R) -> Result<Option<Arc<Operation>>, E>,
{
    OperationsBuilder::default().build_sync(existing, records, build_op)
}

/// Async minimal diff merge, see [`OperationsBuilder::build`]
pub async fn minimal_operations_builder<'r, R, E, F, Fut>(
    existing: &OperationList,
    records: &'r [R],
    build_op: F,
) -> Result<OperationList, E>
where
    F: FnMut(&'r R) -> Fut,
    Fut: Future<Output = Result<Option<Arc<Operation>>, E>>,
{
    OperationsBuilder::default().build(existing, records, build_op).await
}
