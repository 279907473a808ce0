use std::collections::HashSet;

use embed_serve::{
    assets::{SAMPLE1_JSON, SampleFiles, SampleJsonFiles},
    prelude::*,
};

fn expected() -> Sample1 {
    Sample1 {
        hoge: 1,
        fuga: "2".into(),
    }
}

fn names(entries: &[DirEntry]) -> HashSet<&str> {
    entries.iter().map(|e| e.name()).collect()
}

#[test]
fn decode_single_embedded_file() {
    let sample = Sample1::from_slice(SAMPLE1_JSON).unwrap();
    assert_eq!(sample, expected());
}

#[test]
fn read_file_by_full_path() {
    let bundle = Bundle::<SampleFiles>::new();
    let bytes = bundle.read_file("file/sample1.json").unwrap();
    assert_eq!(Sample1::from_slice(&bytes).unwrap(), expected());
    assert_eq!(&*bytes, SAMPLE1_JSON);
}

#[test]
fn sub_view_reads_the_same_bytes() {
    let bundle = Bundle::<SampleFiles>::new();
    let full = bundle.read_file("file/sample1.json").unwrap();
    let sub = bundle.sub("file").unwrap();
    let relative = sub.read_file("sample1.json").unwrap();
    assert_eq!(full, relative);

    let sample: Sample1 = sub.decode("sample1.json").unwrap();
    assert_eq!(sample, expected());
}

#[test]
fn list_all_files() {
    let entries = Bundle::<SampleFiles>::new().read_dir("file").unwrap();
    assert_eq!(
        names(&entries),
        HashSet::from(["sample1.json", "sample1.txt"])
    );
    assert!(entries.iter().all(|e| !e.is_dir()));
}

#[test]
fn list_json_only() {
    let entries = Bundle::<SampleJsonFiles>::new().read_dir("file").unwrap();
    assert_eq!(names(&entries), HashSet::from(["sample1.json"]));
}

#[test]
fn sub_view_lists_its_root() {
    let sub = Bundle::<SampleFiles>::new().sub("file").unwrap();
    let entries = sub.read_dir(".").unwrap();
    assert_eq!(
        names(&entries),
        HashSet::from(["sample1.json", "sample1.txt"])
    );
}

#[test]
fn excluded_file_is_not_found() {
    let bundle = Bundle::<SampleJsonFiles>::new();
    let err = bundle.read_file("file/sample1.txt").unwrap_err();
    assert!(err.is_not_found(), "{err}");
    assert!(!bundle.exists("file/sample1.txt"));
}

#[test]
fn missing_paths_are_not_found_never_decode_faults() {
    let bundle = Bundle::<SampleFiles>::new();

    let err = bundle.read_file("file/missing.json").unwrap_err();
    assert!(matches!(err, EmbedError::NotFound(ref p) if p == "file/missing.json"));

    let err = bundle.decode::<Sample1>("file/missing.json").unwrap_err();
    assert!(err.is_not_found());

    let err = bundle.read_dir("nope").unwrap_err();
    assert!(err.is_not_found());

    let empty = bundle.sub("nope").unwrap();
    assert!(empty.read_file("sample1.json").unwrap_err().is_not_found());
    assert!(empty.read_dir(".").unwrap_err().is_not_found());
}

#[test]
fn decoding_a_non_json_file_is_a_decode_fault() {
    let bundle = Bundle::<SampleFiles>::new();
    let err = bundle.decode::<Sample1>("file/sample1.txt").unwrap_err();
    assert!(matches!(err, EmbedError::Decode(_)));
}

#[test]
fn directories_and_files_are_not_interchangeable() {
    let bundle = Bundle::<SampleFiles>::new();

    let err = bundle.read_file("file").unwrap_err();
    assert!(matches!(err, EmbedError::IsDir(_)));

    let err = bundle.read_dir("file/sample1.json").unwrap_err();
    assert!(matches!(err, EmbedError::NotDir(_)));

    assert!(bundle.is_dir("file"));
    assert!(!bundle.is_dir("file/sample1.json"));
}

#[test]
fn malformed_paths_are_rejected() {
    let bundle = Bundle::<SampleFiles>::new();
    for path in ["/file/sample1.json", "file/../file/sample1.json", "file//sample1.json", ""] {
        let err = bundle.read_file(path).unwrap_err();
        assert!(matches!(err, EmbedError::InvalidPath(_)), "{path}: {err}");
    }
}

#[test]
fn embedded_files_carry_metadata() {
    let file = Bundle::<SampleFiles>::new()
        .open("file/sample1.json")
        .unwrap();
    assert_eq!(&*file.data, SAMPLE1_JSON);
    assert_eq!(file.metadata.sha256_hash().len(), 32);
}
