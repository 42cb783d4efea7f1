//! Explicit deallocation.
//!
//! Freeing zeroes the object's payload and removes its record from the table, restoring density.
//! Freeing an offset that does not name a live record is a silent no-op, which is what lets the
//! collector (see [`super::gc`]) call this function unconditionally while sweeping.

use crate::heap::codec::read_u16;
use crate::heap::config::RECORD_SIZE;
use crate::heap::table;

pub(super) fn free(memory: &mut [u8], config: &crate::heap::config::HeapConfig, offset: u16) {
    let Some(record) = table::find_record(memory, config, offset) else {
        return;
    };

    let start = record.offset as usize;
    let end = start + record.size as usize;
    memory[start..end].fill(0);

    let cursor = locate_cursor(memory, offset);
    table::delete_at(memory, cursor);
}

/// Byte position of the record whose offset field equals `offset`. Only called after
/// `find_record` has already confirmed the record exists.
fn locate_cursor(memory: &[u8], offset: u16) -> usize {
    let mut cursor = 0usize;
    while read_u16(memory, cursor) != offset {
        cursor += RECORD_SIZE as usize;
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::Heap;

    #[test]
    fn free_zeroes_payload_and_removes_record() {
        let mut heap = Heap::create();
        let a = heap.alloc(16, 0).unwrap();
        heap.payload_mut(a).unwrap().copy_from_slice(&[0xaau8; 16]);

        heap.free(a);

        assert_eq!(heap.num_allocs(), 0);
        assert!(heap.payload(a).is_none());
    }

    #[test]
    fn freeing_unknown_offset_is_a_no_op() {
        let mut heap = Heap::create();
        heap.alloc(16, 0).unwrap();
        let before = heap.records();

        heap.free(9999);

        assert_eq!(heap.records(), before);
    }

    #[test]
    fn allocation_roundtrip_restores_prior_record_set() {
        let mut heap = Heap::create();
        heap.alloc(16, 0).unwrap();
        let before = heap.records();

        let tmp = heap.alloc(32, 0).unwrap();
        heap.free(tmp);

        assert_eq!(heap.records(), before);
    }
}
