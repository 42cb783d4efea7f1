//! A bounded, byte-addressable managed heap.
//!
//! This module contains a single contiguous byte buffer ([`Heap`]) partitioned into a metadata
//! region holding a packed table of allocation records ([`table`]), and a dynamic region holding
//! object payloads. A first-fit [`alloc`]ator places objects and keeps the table dense; [`dealloc`]
//! reclaims them explicitly; [`gc`] reclaims them transitively, tracing from caller-supplied root
//! offsets. [`free_span`] derives the heap's unoccupied ranges from the same table, and
//! [`diagnostics`] renders it for humans and for `--json` consumers.
//!
//! Start with [`Heap::create`] to get a heap with the reference configuration (64 KiB capacity,
//! 4 KiB metadata region), or [`Heap::with_config`] to override it via [`config::HeapConfig`].

pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod free_span;
pub mod gc;
pub mod table;

mod alloc;
mod dealloc;

pub use alloc::AllocError;
pub use config::HeapConfig;
pub use free_span::FreeSpan;
pub use table::AllocationRecord;

use crate::HeapError;

/// A bounded, byte-addressable managed heap with explicit alloc/free and a tracing collector.
///
/// The heap owns a single `Vec<u8>` buffer of `config.capacity` bytes. Bytes `[0, dynamic_start)`
/// hold the allocation table (see [`table`]); bytes `[dynamic_start, capacity)` hold object
/// payloads. Every method that mutates the heap takes `&mut self`, so the borrow checker enforces
/// the "exclusive resource" contract that the reference implementation only documents informally.
pub struct Heap {
    memory: Vec<u8>,
    config: HeapConfig,
}

impl Heap {
    /// Create a new, zeroed heap using the reference configuration (capacity 65536, dynamic
    /// region starting at 4096).
    pub fn create() -> Heap {
        Self::with_config(HeapConfig::default()).expect("default configuration is always valid")
    }

    /// Create a new, zeroed heap with an explicit configuration.
    ///
    /// Returns [`HeapError::Config`] if `config` cannot hold even the sentinel record, or if
    /// `dynamic_start >= capacity`.
    pub fn with_config(config: HeapConfig) -> Result<Heap, HeapError> {
        config.validate()?;
        Ok(Heap {
            memory: vec![0u8; config.capacity as usize],
            config,
        })
    }

    /// The heap's effective configuration.
    pub fn config(&self) -> HeapConfig {
        self.config
    }

    /// Number of live allocation records currently in the table.
    pub fn num_allocs(&self) -> u16 {
        table::count(&self.memory)
    }

    /// Allocate `num_bytes` bytes (rounded up to a multiple of 8, minimum 8) with `num_pointers`
    /// leading pointer-sized slots that the collector will scan. Returns the offset of the new
    /// object, or `None` if no sufficiently large gap exists in the dynamic region, or the table
    /// itself has no room for another record.
    pub fn alloc(&mut self, num_bytes: u16, num_pointers: u8) -> Option<u16> {
        alloc::alloc(&mut self.memory, &self.config, num_bytes, num_pointers).ok()
    }

    /// Like [`Heap::alloc`], but additionally zeroes `count * size` payload bytes. The product is
    /// computed before rounding and passed to `alloc` verbatim; returns `None` if `alloc` would,
    /// including when `count * size` overflows a `u16`.
    pub fn calloc(&mut self, count: u16, size: u16, num_pointers: u8) -> Option<u16> {
        let total = u16::try_from(count as u32 * size as u32).ok()?;
        let offset = self.alloc(total, num_pointers)?;
        let record = table::find_record(&self.memory, &self.config, offset)?;
        let start = offset as usize;
        self.memory[start..start + record.size as usize].fill(0);
        Some(offset)
    }

    /// Free the object at `offset`. A silent no-op if `offset` does not name a live record.
    pub fn free(&mut self, offset: u16) {
        dealloc::free(&mut self.memory, &self.config, offset);
    }

    /// Trace from `roots`, freeing every record not transitively reachable. Returns the number of
    /// records freed.
    pub fn gc(&mut self, roots: &[u16]) -> u16 {
        gc::collect(&mut self.memory, &self.config, roots)
    }

    /// Enumerate the maximal free spans within the dynamic region, in ascending order.
    pub fn free_spans(&self) -> Vec<FreeSpan> {
        free_span::enumerate(&self.memory, &self.config)
    }

    /// Borrow an object's payload bytes. Returns `None` if `offset` does not name a live record.
    pub fn payload(&self, offset: u16) -> Option<&[u8]> {
        let record = table::find_record(&self.memory, &self.config, offset)?;
        let start = offset as usize;
        Some(&self.memory[start..start + record.size as usize])
    }

    /// Mutably borrow an object's payload bytes. Returns `None` if `offset` does not name a live
    /// record.
    pub fn payload_mut(&mut self, offset: u16) -> Option<&mut [u8]> {
        let record = table::find_record(&self.memory, &self.config, offset)?;
        let size = record.size as usize;
        let start = offset as usize;
        Some(&mut self.memory[start..start + size])
    }

    /// Snapshot the live allocation records, in table order.
    pub fn records(&self) -> Vec<AllocationRecord> {
        table::records(&self.memory)
    }

    /// Human-readable diagnostic listing of the allocation table.
    pub fn allocation_list_show(&self, color: bool) -> String {
        diagnostics::render_text(self, color)
    }

    /// Structured diagnostic listing of the allocation table, for `--json` output.
    pub fn allocation_list_json(&self) -> serde_json::Value {
        diagnostics::render_json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_heap_has_no_allocations() {
        let heap = Heap::create();
        assert_eq!(heap.num_allocs(), 0);
        assert_eq!(heap.free_spans(), vec![FreeSpan { start: 4096, size: 61440 }]);
    }

    #[test]
    fn first_allocation_rounds_up_and_lands_at_dynamic_start() {
        let mut heap = Heap::create();
        let a = heap.alloc(7, 0).unwrap();
        assert_eq!(a, 4096);
        assert_eq!(heap.records()[0].size, 8);

        let b = heap.alloc(9, 0).unwrap();
        assert_eq!(b, 4104);
        assert_eq!(heap.records()[1].size, 16);
    }

    #[test]
    fn calloc_zeroes_payload() {
        let mut heap = Heap::create();
        let a = heap.alloc(16, 0).unwrap();
        heap.payload_mut(a).unwrap().copy_from_slice(&[0xffu8; 16]);
        heap.free(a);

        let b = heap.calloc(4, 4, 0).unwrap();
        assert_eq!(heap.payload(b).unwrap(), &[0u8; 16]);
    }

    #[test]
    fn calloc_overflow_fails() {
        let mut heap = Heap::create();
        assert!(heap.calloc(u16::MAX, u16::MAX, 0).is_none());
    }
}
