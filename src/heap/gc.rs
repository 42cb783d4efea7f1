//! Tracing mark-and-sweep collector.
//!
//! Marking starts from a caller-supplied list of root offsets and follows candidate pointers
//! found in the first `min(pointer_count * pointer_width, size)` bytes of each reachable object's
//! payload. A candidate is only followed if it equals the *starting* offset of some live
//! record — interior offsets are never recognized, so this is a conservative-ish rather than a
//! fully conservative collector. Sweeping then frees every record that marking never reached.

use crate::heap::codec::read_u16;
use crate::heap::config::HeapConfig;
use crate::heap::dealloc;
use crate::heap::table::{self, AllocationRecord};

pub(super) fn collect(memory: &mut [u8], config: &HeapConfig, roots: &[u16]) -> u16 {
    let snapshot = table::records(memory);
    if snapshot.is_empty() {
        return 0;
    }

    let marks = mark(memory, config, &snapshot, roots);
    sweep(memory, config, &snapshot, &marks)
}

/// Build a mark bitmap (indexed the same as `snapshot`) by tracing from `roots` with an explicit
/// work stack, rather than recursing as the reference does — this bounds native call-stack usage
/// at a single frame regardless of how long the live-pointer chain is.
fn mark(memory: &[u8], config: &HeapConfig, snapshot: &[AllocationRecord], roots: &[u16]) -> Vec<bool> {
    let mut marked = vec![false; snapshot.len()];
    let mut work = Vec::new();

    for &root in roots {
        if let Some(index) = index_of(snapshot, root) {
            if !marked[index] {
                marked[index] = true;
                work.push(index);
            }
        }
    }

    while let Some(index) = work.pop() {
        let record = snapshot[index];
        let slot_width = config.pointer_width as u16;
        let max_scan_bytes = (record.pointer_count as u32 * slot_width as u32).min(record.size as u32) as u16;

        let mut slot = 0u16;
        while slot + slot_width <= max_scan_bytes {
            if let Some(candidate) = read_candidate(memory, record.offset + slot, slot_width) {
                if let Some(child_index) = index_of(snapshot, candidate) {
                    if !marked[child_index] {
                        marked[child_index] = true;
                        work.push(child_index);
                    }
                }
            }
            slot += slot_width;
        }
    }

    marked
}

/// Read a `width`-byte candidate address at `pos` and interpret it as a heap offset. Only the low
/// two bytes carry a meaningful offset; with the default `pointer_width` of 2 this is just
/// `read_u16`. Wider configured widths are supported for bindings that store candidates in
/// native-pointer-sized fields: any byte above the low two must be zero or the candidate is
/// rejected outright (it cannot name an offset that fits in `u16`).
fn read_candidate(memory: &[u8], pos: u16, width: u16) -> Option<u16> {
    let pos = pos as usize;
    let width = width as usize;
    if pos + width > memory.len() {
        return None;
    }
    if memory[pos..pos + width - 2].iter().any(|&b| b != 0) {
        return None;
    }
    let candidate = read_u16(memory, pos + width - 2);
    if candidate == 0 {
        None
    } else {
        Some(candidate)
    }
}

fn index_of(snapshot: &[AllocationRecord], offset: u16) -> Option<usize> {
    snapshot.iter().position(|r| r.offset == offset)
}

/// Sweep unmarked records, walking the immutable `snapshot` (and its parallel `marks` bitmap) in
/// reverse index order rather than re-scanning the live, mutating table.
///
/// `table::delete_at` only ever shifts records *after* the deleted one left by one slot; a record
/// at a lower offset never moves when a higher-offset record is freed. Offsets are also a live
/// record's stable identity regardless of its current table position, so freeing highest-offset
/// first (snapshot is already in ascending-offset table order, so this is just `.rev()`) means
/// every later `dealloc::free` call still finds its target by offset without the snapshot index
/// and the table's actual layout ever disagreeing about what remains unprocessed.
fn sweep(memory: &mut [u8], config: &HeapConfig, snapshot: &[AllocationRecord], marks: &[bool]) -> u16 {
    let mut freed = 0u16;

    for (record, &marked) in snapshot.iter().zip(marks.iter()).rev() {
        if !marked {
            dealloc::free(memory, config, record.offset);
            freed += 1;
        }
    }

    freed
}
