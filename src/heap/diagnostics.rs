//! Renders the allocation table for humans and for `--json` consumers.
//!
//! The reference's `allocation_list_show` prints one `offset size pointers` line per live record
//! with no further structure. This module keeps that line shape for [`render_text`] (optionally
//! colorized, the way this crate family colors other tabular CLI output) and adds [`render_json`]
//! for scripted consumers, alongside the free spans that the reference never printed but that
//! `pheap script`'s `free-spans` verb needs to show.

use serde_json::json;

use crate::heap::Heap;

/// Render the allocation table as `offset size pointers` lines, matching the reference's
/// `allocation list:` header and one-line-per-record body. When `color` is set and the `cli`
/// feature is enabled, the header is bolded and offsets are cyan, the way this crate family
/// colors other diagnostic listings; without the `cli` feature `color` is accepted but ignored,
/// so the core library never pulls in a terminal-coloring dependency.
pub fn render_text(heap: &Heap, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&colorize_header("allocation list:", color));
    out.push('\n');

    for record in heap.records() {
        out.push_str(&colorize_record(record.offset, record.size, record.pointer_count, color));
        out.push('\n');
    }

    out
}

#[cfg(feature = "cli")]
fn colorize_header(header: &str, color: bool) -> String {
    use colored::Colorize;
    if color { header.bold().to_string() } else { header.to_string() }
}

#[cfg(not(feature = "cli"))]
fn colorize_header(header: &str, _color: bool) -> String {
    header.to_string()
}

#[cfg(feature = "cli")]
fn colorize_record(offset: u16, size: u16, pointer_count: u8, color: bool) -> String {
    use colored::Colorize;
    if color {
        format!("offset {} size {} pointers {}", offset.to_string().cyan(), size, pointer_count)
    } else {
        format!("offset {} size {} pointers {}", offset, size, pointer_count)
    }
}

#[cfg(not(feature = "cli"))]
fn colorize_record(offset: u16, size: u16, pointer_count: u8, _color: bool) -> String {
    format!("offset {} size {} pointers {}", offset, size, pointer_count)
}

/// Render the allocation table and free spans as a JSON value, for `pheap script --json` and
/// `pheap fuzz --json`.
pub fn render_json(heap: &Heap) -> serde_json::Value {
    let records: Vec<serde_json::Value> = heap
        .records()
        .iter()
        .map(|r| {
            json!({
                "offset": r.offset,
                "size": r.size,
                "pointer_count": r.pointer_count,
            })
        })
        .collect();

    let free_spans: Vec<serde_json::Value> = heap
        .free_spans()
        .iter()
        .map(|s| json!({ "start": s.start, "size": s.size }))
        .collect();

    json!({
        "num_allocs": heap.num_allocs(),
        "allocations": records,
        "free_spans": free_spans,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_listing_has_one_line_per_record() {
        let mut heap = Heap::create();
        heap.alloc(16, 0).unwrap();
        heap.alloc(8, 1).unwrap();

        let text = render_text(&heap, false);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("allocation list:"));
        assert_eq!(lines.next(), Some("offset 4096 size 16 pointers 0"));
        assert_eq!(lines.next(), Some("offset 4112 size 8 pointers 1"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_heap_renders_header_only() {
        let heap = Heap::create();
        assert_eq!(render_text(&heap, false), "allocation list:\n");
    }

    #[test]
    fn json_listing_reports_allocations_and_free_spans() {
        let mut heap = Heap::create();
        let a = heap.alloc(16, 0).unwrap();
        heap.free(a);

        let value = render_json(&heap);
        assert_eq!(value["num_allocs"], 0);
        assert_eq!(value["allocations"].as_array().unwrap().len(), 0);
        assert_eq!(value["free_spans"][0]["start"], 4096);
    }
}
