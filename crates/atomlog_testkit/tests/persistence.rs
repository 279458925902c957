//! Streams stored as files survive reopening.

use atomlog_core::{AtomEventStorage, FeedId, FileStorage};
use atomlog_testkit::prelude::*;
use tempfile::TempDir;

#[test]
fn stream_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let id = FeedId::new_id();
    {
        let stream = reopen(dir.path(), id, 2);
        for n in 0..5 {
            stream.append(Tick { n }).unwrap();
        }
    }

    let stream = reopen(dir.path(), id, 2);
    let ticks: Vec<u64> = stream
        .forward()
        .iter()
        .map(|p| p.unwrap().downcast_ref::<Tick>().unwrap().n)
        .collect();
    assert_eq!(ticks, vec![0, 1, 2, 3, 4]);

    stream.append(Tick { n: 5 }).unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    assert_eq!(page_sizes(&storage, id), vec![2, 2, 2]);
    assert_chain(&storage, id, 2);
}

#[test]
fn one_file_per_document() {
    let test = TestStream::file(2);
    for n in 0..3 {
        test.append(Tick { n }).unwrap();
    }
    let path = test.path().unwrap();
    let mut names: Vec<String> = std::fs::read_dir(&path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.len(), 3);
    assert!(names.iter().all(|n| n.ends_with(".xml")));
    assert!(names.contains(&format!("{}.xml", test.id().href())));
}

#[test]
fn stored_documents_are_atom_xml() {
    let test = TestStream::file(2);
    test.append(user_created("ada")).unwrap();
    let document = test.storage.read_feed(&test.id().href()).unwrap();
    assert!(document.starts_with(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#));
    assert!(document.contains(r#"rel="first""#));
    assert!(document.contains(r#"rel="last""#));

    let first = index(test.storage.as_ref(), test.id());
    let href = first
        .link(atomlog_core::model::rel::FIRST)
        .unwrap()
        .href()
        .to_string();
    let page = test.storage.read_feed(&href).unwrap();
    assert!(page.contains(r#"<content type="application/xml">"#));
    assert!(page.contains(r#"<user-created xmlns="urn:atomlog-testkit:events">"#));
    assert!(page.contains("<title type=\"text\">Changeset "));
}

#[test]
fn indexed_streams_are_enumerable() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    let ids = [FeedId::new_id(), FeedId::new_id()];
    for id in ids {
        storage
            .write_feed(&format!("index/{}", id.href()), "<feed/>")
            .unwrap();
    }
    let mut expected = ids.to_vec();
    expected.sort();
    assert_eq!(storage.feed_ids("index").unwrap(), expected);
}
