//! Property-style integration tests driving a [`Heap`] through realistic allocation/free/gc
//! sequences and checking the invariants from the design document after each step.

use pheap::heap::{Heap, HeapConfig};

fn assert_invariants(heap: &Heap) {
    let config = heap.config();
    let records = heap.records();

    for window in records.windows(2) {
        let (a, b) = (window[0], window[1]);
        assert!(a.offset < b.offset, "ordering violated: {:?} then {:?}", a, b);
        assert!(a.offset + a.size <= b.offset, "overlap: {:?} and {:?}", a, b);
    }

    for record in &records {
        assert!(record.offset >= config.dynamic_start, "record below dynamic start: {:?}", record);
        assert!((record.offset + record.size) as u32 <= config.capacity, "record exceeds capacity: {:?}", record);
        assert!(record.size >= 8 && record.size % 8 == 0, "misaligned size: {:?}", record);
    }

    let spans = heap.free_spans();
    let occupied: u32 = records.iter().map(|r| r.size as u32).sum();
    let free: u32 = spans.iter().map(|s| s.size as u32).sum();
    assert_eq!(
        occupied + free,
        config.capacity - config.dynamic_start as u32,
        "records and free spans do not partition the dynamic region"
    );

    let mut spans_sorted = spans.clone();
    spans_sorted.sort_by_key(|s| s.start);
    for window in spans_sorted.windows(2) {
        assert!(
            window[0].start + window[0].size < window[1].start
                || window[0].start + window[0].size == window[1].start,
            "free spans overlap"
        );
    }
}

#[test]
fn alloc_free_alloc_cycle_preserves_invariants() {
    let mut heap = Heap::create();
    let mut live = Vec::new();

    for round in 0..20 {
        let offset = heap.alloc(8 + (round % 5) * 8, (round % 3) as u8);
        if let Some(offset) = offset {
            live.push(offset);
        }
        assert_invariants(&heap);

        if round % 3 == 0 && !live.is_empty() {
            let victim = live.remove(round as usize % live.len());
            heap.free(victim);
            assert_invariants(&heap);
        }
    }
}

#[test]
fn gc_preserves_invariants_across_a_branching_graph() {
    let mut heap = Heap::create();
    let root = heap.alloc(32, 2).unwrap();
    let a = heap.alloc(16, 1).unwrap();
    let b = heap.alloc(16, 0).unwrap();
    let dangling = heap.alloc(16, 0).unwrap();

    heap.payload_mut(root).unwrap()[0..2].copy_from_slice(&a.to_be_bytes());
    heap.payload_mut(root).unwrap()[2..4].copy_from_slice(&b.to_be_bytes());
    heap.payload_mut(a).unwrap()[0..2].copy_from_slice(&b.to_be_bytes());
    let _ = dangling;

    let freed = heap.gc(&[root]);
    assert_eq!(freed, 1);
    assert_invariants(&heap);
    assert!(heap.payload(root).is_some());
    assert!(heap.payload(a).is_some());
    assert!(heap.payload(b).is_some());
}

#[test]
fn free_of_unknown_offset_is_a_no_op_and_preserves_invariants() {
    let mut heap = Heap::create();
    heap.alloc(16, 0).unwrap();
    let before = heap.records();

    heap.free(60000);

    assert_eq!(heap.records(), before);
    assert_invariants(&heap);
}

#[test]
fn rejects_configurations_with_no_room_for_a_record_plus_sentinel() {
    let config = HeapConfig { capacity: 100, dynamic_start: 1, pointer_width: 2 };
    assert!(Heap::with_config(config).is_err());

    let config = HeapConfig { capacity: 100, dynamic_start: 100, pointer_width: 2 };
    assert!(Heap::with_config(config).is_err());
}

#[test]
fn accepts_a_smaller_custom_layout() {
    let config = HeapConfig { capacity: 256, dynamic_start: 32, pointer_width: 2 };
    let mut heap = Heap::with_config(config).unwrap();
    let a = heap.alloc(16, 0).unwrap();
    assert_eq!(a, 32);
    assert_invariants(&heap);
}
