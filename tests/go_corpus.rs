use gogen::{matches, Node};
use gogen_syntax::{parse_source, print_node};
use walkdir::WalkDir;

/// Parses, prints and reparses every Go file under `$GOGEN_CORPUS`, and
/// checks the reparsed tree matches the first one.
#[test]
fn reprints_go_corpus_if_configured() {
    let Some(root) = std::env::var_os("GOGEN_CORPUS") else {
        eprintln!("GOGEN_CORPUS not set; skipping corpus test");
        return;
    };

    let mut total = 0usize;
    let mut unsupported = 0usize;

    for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("go")
        {
            continue;
        }
        if path.to_string_lossy().contains("testdata") {
            continue;
        }
        let Ok(src) = std::fs::read_to_string(path) else {
            continue;
        };

        total += 1;
        // Type parameters and other unsupported syntax are counted, not failed.
        let Ok(first) = parse_source(&src) else {
            unsupported += 1;
            continue;
        };

        let printed = print_node(&first.arena, Node::File(first.file))
            .unwrap_or_else(|e| panic!("{}: print failed: {e}", path.display()));
        let second = parse_source(&printed).unwrap_or_else(|f| {
            panic!("{}: reprinted source does not parse: {:?}", path.display(), f.diags)
        });
        assert!(
            matches(
                &first.arena,
                Node::File(first.file),
                &second.arena,
                Node::File(second.file)
            ),
            "{}: reprinted tree differs",
            path.display()
        );
    }

    eprintln!("Reprinted {} of {total} Go files ({unsupported} unsupported).", total - unsupported);
}
