use std::sync::Arc;

use opsync_types::Operation;

/// Whether two operations with the same id carry the same immutable content
///
/// `block_height` is left out, it is the one field allowed to change.
pub fn same_op(a: &Arc<Operation>, b: &Arc<Operation>) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }

    a.id == b.id
        && a.date == b.date
        && a.fee == b.fee
        && a.value == b.value
        && a.senders == b.senders
        && a.recipients == b.recipients
}
