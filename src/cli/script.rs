//! `pheap script` — drives a single [`Heap`] through a line-oriented script file.
//!
//! One operation per non-empty, non-comment line:
//!
//! ```text
//! alloc <bytes> <pointers>        # -> offset <n>
//! calloc <count> <size> <pointers># -> offset <n>
//! free <offset>
//! gc [root ...]                   # -> freed <n>
//! list                            # prints the allocation table
//! free-spans                      # prints the free spans
//! ```
//!
//! Lines starting with `#` and blank lines are skipped. Numbers are plain decimal.

use std::fs;
use std::io::Write;

use serde_json::json;

use crate::cli::{configured_heap, wprintln};
use crate::heap::Heap;
use crate::HeapError;

/// Options for the `pheap script` subcommand.
pub struct Options {
    /// Path to the script file.
    pub file: String,
    /// Emit output as JSON.
    pub json: bool,
    /// Override the heap's total capacity.
    pub capacity: Option<u16>,
    /// Override where the dynamic region begins.
    pub dynamic_start: Option<u16>,
}

enum StepOutcome {
    Allocated(Option<u16>),
    Freed(u16),
    Collected(u16),
    Listing(String),
    FreeSpans(Vec<(u16, u16)>),
}

pub fn execute(opts: &Options, writer: &mut dyn Write) -> Result<(), HeapError> {
    let mut heap = configured_heap(opts.capacity, opts.dynamic_start)?;
    let contents = fs::read_to_string(&opts.file).map_err(|e| HeapError::Io(e.to_string()))?;

    let mut steps = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let outcome = run_step(&mut heap, line)
            .map_err(|e| HeapError::Script(format!("line {}: {}", lineno + 1, e)))?;
        steps.push((line.to_string(), outcome));
    }

    if opts.json {
        let rendered: Vec<serde_json::Value> = steps
            .iter()
            .map(|(line, outcome)| json!({ "line": line, "result": describe(outcome) }))
            .collect();
        let value = json!({
            "steps": rendered,
            "final": crate::heap::diagnostics::render_json(&heap),
        });
        wprintln!(writer, "{}", serde_json::to_string_pretty(&value).unwrap())?;
    } else {
        for (line, outcome) in &steps {
            wprintln!(writer, "{} -> {}", line, describe(outcome))?;
        }
    }

    Ok(())
}

fn describe(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Allocated(Some(offset)) => format!("offset {}", offset),
        StepOutcome::Allocated(None) => "failed".to_string(),
        StepOutcome::Freed(offset) => format!("freed {}", offset),
        StepOutcome::Collected(freed) => format!("gc freed {}", freed),
        StepOutcome::Listing(text) => text.clone(),
        StepOutcome::FreeSpans(spans) => spans
            .iter()
            .map(|(start, size)| format!("[{}, {})", start, start + size))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn run_step(heap: &mut Heap, line: &str) -> Result<StepOutcome, String> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().ok_or("empty line")?;

    match verb {
        "alloc" => {
            let bytes = next_u16(&mut parts, "bytes")?;
            let pointers = next_u8(&mut parts, "pointers")?;
            Ok(StepOutcome::Allocated(heap.alloc(bytes, pointers)))
        }
        "calloc" => {
            let count = next_u16(&mut parts, "count")?;
            let size = next_u16(&mut parts, "size")?;
            let pointers = next_u8(&mut parts, "pointers")?;
            Ok(StepOutcome::Allocated(heap.calloc(count, size, pointers)))
        }
        "free" => {
            let offset = next_u16(&mut parts, "offset")?;
            heap.free(offset);
            Ok(StepOutcome::Freed(offset))
        }
        "gc" => {
            let roots: Result<Vec<u16>, String> = parts
                .map(|p| p.parse::<u16>().map_err(|_| format!("invalid root offset: {}", p)))
                .collect();
            let roots = roots?;
            Ok(StepOutcome::Collected(heap.gc(&roots)))
        }
        "list" => Ok(StepOutcome::Listing(heap.allocation_list_show(false))),
        "free-spans" => Ok(StepOutcome::FreeSpans(
            heap.free_spans().into_iter().map(|s| (s.start, s.size)).collect(),
        )),
        other => Err(format!("unknown verb '{}'", other)),
    }
}

fn next_u16<'a>(parts: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<u16, String> {
    parts
        .next()
        .ok_or_else(|| format!("missing {}", what))?
        .parse()
        .map_err(|_| format!("invalid {}", what))
}

fn next_u8<'a>(parts: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<u8, String> {
    parts
        .next()
        .ok_or_else(|| format!("missing {}", what))?
        .parse()
        .map_err(|_| format!("invalid {}", what))
}
