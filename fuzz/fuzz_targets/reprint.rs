#![no_main]

use gogen::{matches, Node};
use gogen_syntax::{parse_source, print_node};
use libfuzzer_sys::fuzz_target;

// Whatever parses must print, and the printed text must parse back to a
// matching tree.
fuzz_target!(|data: &[u8]| {
    let Ok(src) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(first) = parse_source(src) else {
        return;
    };

    let printed = print_node(&first.arena, Node::File(first.file)).expect("parsed tree prints");
    let second = parse_source(&printed).expect("printed source parses");
    assert!(matches(
        &first.arena,
        Node::File(first.file),
        &second.arena,
        Node::File(second.file),
    ));
});
