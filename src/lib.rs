//! A bounded, byte-addressable managed heap.
//!
//! `pheap` models a fixed-capacity byte arena split into a metadata region (a packed table of
//! allocation records) and a dynamic region (object payloads), with a first-fit allocator,
//! explicit deallocation, and a tracing mark-and-sweep collector driven by caller-supplied root
//! offsets. It is a from-scratch reimplementation of the allocator found in embedded and
//! garbage-collection textbooks, where objects are named by `u16` byte offset rather than by
//! native pointer.
//!
//! # CLI Reference
//!
//! Install the `pheap` binary and use its subcommands to exercise a heap from the command line.
//!
//! ## Subcommands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | [`pheap demo`](cli::app::Commands::Demo) | Run the canonical allocator/collector scenarios and report pass/fail |
//! | [`pheap script`](cli::app::Commands::Script) | Drive a heap through a line-oriented script file |
//! | [`pheap fuzz`](cli::app::Commands::Fuzz) | Randomized alloc/free/gc churn with invariant checking |
//!
//! ## Global options
//!
//! All subcommands accept `--color <auto|always|never>` and `--output <file>`. `script` and
//! `fuzz` additionally accept `--json` for machine-readable output and `--capacity`/
//! `--dynamic-start` to override the heap's layout.
//!
//! See the [`cli`] module for full details.
//!
//! # Library API
//!
//! ## Quick example
//!
//! ```
//! use pheap::heap::Heap;
//!
//! let mut heap = Heap::create();
//! let a = heap.alloc(24, 1).unwrap();
//! let b = heap.alloc(16, 0).unwrap();
//! heap.payload_mut(a).unwrap()[0..2].copy_from_slice(&b.to_be_bytes());
//!
//! // B is reachable from A, so both survive a collection rooted at A.
//! assert_eq!(heap.gc(&[a]), 0);
//! assert_eq!(heap.gc(&[]), 2);
//! ```
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`heap`] | The `Heap` type and its public operations |
//! | [`heap::codec`] | Big-endian field reads/writes |
//! | [`heap::config`] | `HeapConfig` and the record/sentinel size constants |
//! | [`heap::table`] | The packed, sentinel-terminated allocation record table |
//! | [`heap::alloc`] (private) | First-fit placement |
//! | [`heap::dealloc`] (private) | Explicit free |
//! | [`heap::free_span`] | Free-span enumeration derived from the table |
//! | [`heap::gc`] | Mark-and-sweep collection |
//! | [`heap::diagnostics`] | Human and JSON rendering of the allocation table |

pub mod heap;

#[cfg(feature = "cli")]
pub mod cli;

use thiserror::Error;

/// Errors returned by the ambient CLI/script layer. The core [`heap`] API never throws; it
/// reports failure through return values (`Option`, counts, silent no-ops) as the reference
/// allocator does.
#[derive(Error, Debug)]
pub enum HeapError {
    /// An I/O error occurred (reading a script file, creating the `--output` file).
    #[error("I/O error: {0}")]
    Io(String),

    /// A script line could not be parsed or executed (unknown verb, wrong arity, bad number).
    #[error("script error: {0}")]
    Script(String),

    /// An invalid [`heap::config::HeapConfig`] was supplied.
    #[error("invalid configuration: {0}")]
    Config(String),
}
