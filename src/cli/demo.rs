//! `pheap demo` — replays the canonical allocator/collector scenarios and reports pass/fail.

use std::io::Write;

use serde::Serialize;
use serde_json::json;

use crate::cli::{wprint, wprintln};
use crate::heap::Heap;
use crate::HeapError;

/// Options for the `pheap demo` subcommand.
pub struct Options {
    /// Emit output as JSON.
    pub json: bool,
}

#[derive(Serialize)]
struct ScenarioResult {
    name: String,
    passed: bool,
    detail: String,
}

/// Run every scenario in [`SCENARIOS`] and print a pass/fail line for each.
pub fn execute(opts: &Options, writer: &mut dyn Write) -> Result<(), HeapError> {
    let results: Vec<ScenarioResult> = SCENARIOS.iter().map(|s| (s.run)()).collect();
    let all_passed = results.iter().all(|r| r.passed);

    if opts.json {
        let value = json!({
            "all_passed": all_passed,
            "scenarios": results,
        });
        wprintln!(writer, "{}", serde_json::to_string_pretty(&value).unwrap())?;
    } else {
        for result in &results {
            let mark = if result.passed { "ok" } else { "FAIL" };
            wprint!(writer, "[{}] {}", mark, result.name)?;
            if !result.passed {
                wprint!(writer, " — {}", result.detail)?;
            }
            wprintln!(writer)?;
        }
        wprintln!(
            writer,
            "{}/{} scenarios passed",
            results.iter().filter(|r| r.passed).count(),
            results.len()
        )?;
    }

    if !all_passed {
        return Err(HeapError::Script("one or more demo scenarios failed".to_string()));
    }
    Ok(())
}

struct Scenario {
    run: fn() -> ScenarioResult,
}

const SCENARIOS: &[Scenario] = &[
    Scenario { run: empty_heap },
    Scenario { run: first_allocation_alignment },
    Scenario { run: gap_reuse_first_fit },
    Scenario { run: gc_retains_reachable_chain },
    Scenario { run: gc_collects_unreachable },
    Scenario { run: gc_ignores_interior_pointers },
];

fn check(name: &str, ok: bool, detail: impl Into<String>) -> ScenarioResult {
    ScenarioResult { name: name.to_string(), passed: ok, detail: detail.into() }
}

fn empty_heap() -> ScenarioResult {
    let heap = Heap::create();
    let spans = heap.free_spans();
    let ok = heap.num_allocs() == 0
        && spans.len() == 1
        && spans[0].start == 4096
        && spans[0].size == 61440;
    check("empty heap", ok, format!("num_allocs={} free_spans={:?}", heap.num_allocs(), spans))
}

fn first_allocation_alignment() -> ScenarioResult {
    let mut heap = Heap::create();
    let a = heap.alloc(7, 0);
    let b = heap.alloc(9, 0);
    let ok = a == Some(4096)
        && heap.records()[0].size == 8
        && b == Some(4104)
        && heap.records()[1].size == 16;
    check("first allocation alignment", ok, format!("a={:?} b={:?}", a, b))
}

fn gap_reuse_first_fit() -> ScenarioResult {
    let mut heap = Heap::create();
    let a = heap.alloc(16, 0).unwrap();
    let b = heap.alloc(16, 0).unwrap();
    let _c = heap.alloc(16, 0).unwrap();
    heap.free(b);
    let d = heap.alloc(8, 0);
    let ok = a == 4096 && d == Some(4112);
    check("gap reuse (first-fit)", ok, format!("a={} d={:?}", a, d))
}

fn gc_retains_reachable_chain() -> ScenarioResult {
    let mut heap = Heap::create();
    let a = heap.alloc(24, 1).unwrap();
    let b = heap.alloc(16, 0).unwrap();
    heap.payload_mut(a).unwrap()[0..2].copy_from_slice(&b.to_be_bytes());
    let freed = heap.gc(&[a]);
    let ok = freed == 0 && heap.num_allocs() == 2;
    check("gc retains reachable chain", ok, format!("freed={}", freed))
}

fn gc_collects_unreachable() -> ScenarioResult {
    let mut heap = Heap::create();
    let a = heap.alloc(24, 1).unwrap();
    let b = heap.alloc(16, 0).unwrap();
    heap.payload_mut(a).unwrap()[0..2].copy_from_slice(&b.to_be_bytes());
    let freed = heap.gc(&[]);
    let ok = freed == 2 && heap.num_allocs() == 0;
    check("gc collects unreachable", ok, format!("freed={}", freed))
}

fn gc_ignores_interior_pointers() -> ScenarioResult {
    let mut heap = Heap::create();
    let o = heap.alloc(16, 1).unwrap();
    let p = heap.alloc(16, 1).unwrap();
    let interior = o + 4;
    heap.payload_mut(p).unwrap()[0..2].copy_from_slice(&interior.to_be_bytes());
    let freed = heap.gc(&[p]);
    let ok = freed == 1 && heap.payload(o).is_none() && heap.payload(p).is_some();
    check("gc ignores interior pointers", ok, format!("freed={}", freed))
}
