//! Integration tests for the persisted file store.

use mdlex::{load_editor_state, Error, FileStore, JsonFileStore, Mdlex};
use tempfile::TempDir;

#[test]
fn test_store_persists_across_opens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("store.json");

    {
        let mut store = JsonFileStore::open(&path).unwrap();
        assert!(store.list().is_empty());
        assert_eq!(store.selected(), None);

        assert_eq!(store.add("notes.md", "# Notes\n\nHello").unwrap(), 1);
        assert_eq!(store.add("todo.md", "- a\n- b\n").unwrap(), 2);
        store.select(2).unwrap();
    }
    assert!(path.exists());

    let mut store = JsonFileStore::open(&path).unwrap();
    let names: Vec<String> = store.list().into_iter().map(|r| r.filename).collect();
    assert_eq!(names, vec!["notes.md", "todo.md"]);
    assert_eq!(store.selected(), Some(2));

    store.delete(2).unwrap();
    assert_eq!(store.add("later.md", "x").unwrap(), 3);
}

#[test]
fn test_open_selects_first_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");

    {
        let mut store = JsonFileStore::open(&path).unwrap();
        store.add("a.md", "A").unwrap();
        store.add("b.md", "B").unwrap();
        store.clear_selection().unwrap();
    }

    let store = JsonFileStore::open(&path).unwrap();
    assert_eq!(store.selected_record().unwrap().filename, "a.md");
}

#[test]
fn test_invalid_operations() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonFileStore::open(dir.path().join("store.json")).unwrap();

    assert!(matches!(store.add(" ", "x"), Err(Error::InvalidFilename)));
    assert!(matches!(store.delete(1), Err(Error::RecordNotFound(1))));
    assert!(matches!(store.select(1), Err(Error::RecordNotFound(1))));
    assert!(store.get(1).is_none());
}

#[test]
fn test_corrupt_store_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(JsonFileStore::open(&path), Err(Error::Json(_))));
}

#[test]
fn test_selected_record_renders() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonFileStore::open(dir.path().join("store.json")).unwrap();

    // Nothing selected: the viewer shows its placeholder.
    let json = store.selected_record().map(|record| {
        Mdlex::new()
            .with_highlight(false)
            .convert_markdown(&record.content)
            .to_json()
            .unwrap()
    });
    assert!(!load_editor_state(json.as_deref()).is_ready());

    let id = store.add("doc.md", "# Heading\n\nBody text").unwrap();
    store.select(id).unwrap();
    let record = store.selected_record().unwrap();
    let json = Mdlex::new()
        .with_highlight(false)
        .convert_markdown(&record.content)
        .to_json()
        .unwrap();

    let view = load_editor_state(Some(&json));
    assert!(view.is_ready());
    assert_eq!(view.state().root.plain_text(), "Heading\n\nBody text");
}
