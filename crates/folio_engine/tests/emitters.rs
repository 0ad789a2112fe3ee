use std::fs;

use folio_engine::{
    create_emitter, Cover, CsvEmitter, Emitter, OutputFormat, PdfLayout, TextEmitter,
};
use tempfile::TempDir;

#[test]
fn every_variant_emits_one_unit_per_append() {
    let temp = TempDir::new().unwrap();
    for format in OutputFormat::ALL {
        for n in [0usize, 1, 5] {
            let mut emitter = create_emitter(format, None, &PdfLayout::default());
            emitter.begin().unwrap();
            for i in 0..n {
                emitter.append(&format!("f{i}.txt"), "body").unwrap();
            }
            let path = temp.path().join(format!("out{n}.{}", format.extension()));
            let written = emitter.finish(&path).unwrap();
            assert_eq!(emitter.units(), n, "{format} with {n} files");
            assert!(written.exists());
        }
    }
}

#[test]
fn csv_rows_are_quoted_per_rfc_4180() {
    let temp = TempDir::new().unwrap();
    let mut emitter = CsvEmitter::new();
    emitter.begin().unwrap();
    emitter.append("plain.txt", "hello").unwrap();
    emitter.append("q.txt", "a \"b\", c\nd").unwrap();
    let path = emitter.finish(&temp.path().join("out.csv")).unwrap();

    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "plain.txt,hello\r\nq.txt,\"a \"\"b\"\", c\nd\"\r\n"
    );
}

#[test]
fn text_cover_lists_root_and_tree() {
    let temp = TempDir::new().unwrap();
    let cover = Cover {
        title: "/home/me/project".to_string(),
        tree: vec!["- a.txt".to_string()],
    };
    let mut emitter = TextEmitter::new(Some(cover));
    emitter.begin().unwrap();
    emitter.append("a.txt", "hi").unwrap();
    let path = emitter.finish(&temp.path().join("out.txt")).unwrap();

    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "# Project tree\n/home/me/project\n- a.txt\n\n===== a.txt (2 bytes) =====\nhi\n"
    );
}

#[test]
#[should_panic(expected = "begin() called while Began")]
fn beginning_twice_panics() {
    let mut emitter = CsvEmitter::new();
    emitter.begin().unwrap();
    let _ = emitter.begin();
}

#[test]
#[should_panic(expected = "append() called while Finished")]
fn append_after_finish_panics() {
    let temp = TempDir::new().unwrap();
    let mut emitter = TextEmitter::new(None);
    emitter.begin().unwrap();
    emitter.finish(&temp.path().join("out.txt")).unwrap();
    let _ = emitter.append("late.txt", "too late");
}
