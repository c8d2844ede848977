use std::fs;
use std::io::Write;
use tempfile::TempDir;

use famdocs_core::config::ChunkingSettings;
use famdocs_core::ingest::{DataProcessor, Provenance};

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("Sem-1.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "SGPA 7.90").unwrap();

    let processor = DataProcessor::new();
    let docs = processor.process_directory(dir, &Provenance::default()).expect("process");

    assert_eq!(docs.len(), 1, "one small file becomes one document");
    assert_eq!(docs[0].chunks.len(), 1);
    assert_eq!(docs[0].chunks[0].content.trim(), "SGPA 7.90");
    assert_eq!(docs[0].metadata.filename, "Sem-1.txt");
}

#[test]
fn process_directory_walks_subdirectories_and_skips_other_extensions() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("school")).unwrap();
    fs::write(dir.join("school/Sem-2.txt"), "SGPA 8.12").unwrap();
    fs::write(dir.join("notes.md"), "insurance renewal due in May").unwrap();
    fs::write(dir.join("scan.pdf"), "%PDF-1.4").unwrap();

    let provenance = Provenance { sender: "mum@example.com".into(), subject: "docs".into() };
    let docs = DataProcessor::new().process_directory(dir, &provenance).expect("process");

    let mut names: Vec<_> = docs.iter().map(|d| d.metadata.filename.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["Sem-2.txt", "notes.md"]);
    assert!(docs.iter().all(|d| d.metadata.sender == "mum@example.com"));
}

#[test]
fn long_file_is_split_with_overlap() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("report.txt");
    fs::write(&path, "x".repeat(25)).unwrap();

    let processor = DataProcessor::with_chunking(ChunkingSettings { size: 10, overlap: 2 }).unwrap();
    let doc = processor.process_file(&path, &Provenance::default()).unwrap().expect("document");

    // windows start at 0, 8, 16, 24
    assert_eq!(doc.chunks.len(), 4);
    assert!(doc.chunks.iter().all(|c| c.total_chunks == 4));
    assert_eq!(doc.metadata.chunk_count, 4);
}
