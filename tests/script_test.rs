#![cfg(feature = "cli")]
//! Integration tests for `pheap script`.

use std::io::Write;

use pheap::cli::script::{execute, Options};
use tempfile::NamedTempFile;

fn write_script(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn human_output_reports_each_step() {
    let script = write_script(
        "# allocate two objects, link them, then collect\n\
         alloc 24 1\n\
         alloc 16 0\n\
         list\n\
         gc\n\
         list\n",
    );

    let mut buf = Vec::new();
    let opts = Options {
        file: script.path().to_string_lossy().into_owned(),
        json: false,
        capacity: None,
        dynamic_start: None,
    };
    execute(&opts, &mut buf).unwrap();

    let output = String::from_utf8(buf).unwrap();
    assert!(output.contains("alloc 24 1 -> offset 4096"));
    assert!(output.contains("alloc 16 0 -> offset 4120"));
    assert!(output.contains("gc -> gc freed 2"));
}

#[test]
fn json_output_reports_final_heap_state() {
    let script = write_script("alloc 16 0\nfree 4096\n");

    let mut buf = Vec::new();
    let opts = Options {
        file: script.path().to_string_lossy().into_owned(),
        json: true,
        capacity: None,
        dynamic_start: None,
    };
    execute(&opts, &mut buf).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(value["final"]["num_allocs"], 0);
    assert_eq!(value["steps"].as_array().unwrap().len(), 2);
}

#[test]
fn unknown_verb_surfaces_a_script_error() {
    let script = write_script("bogus 1 2 3\n");

    let mut buf = Vec::new();
    let opts = Options {
        file: script.path().to_string_lossy().into_owned(),
        json: false,
        capacity: None,
        dynamic_start: None,
    };
    let result = execute(&opts, &mut buf);
    assert!(result.is_err());
}

#[test]
fn custom_layout_is_honored() {
    let script = write_script("alloc 16 0\n");

    let mut buf = Vec::new();
    let opts = Options {
        file: script.path().to_string_lossy().into_owned(),
        json: false,
        capacity: Some(256),
        dynamic_start: Some(64),
    };
    execute(&opts, &mut buf).unwrap();

    let output = String::from_utf8(buf).unwrap();
    assert!(output.contains("offset 64"));
}
