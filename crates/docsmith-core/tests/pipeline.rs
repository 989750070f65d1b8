//! End-to-end tests for the content pipeline.

use std::fs;
use std::path::Path;

use docsmith_core::navigation::flatten;
use docsmith_core::{
    Docsmith, DocsmithError, DocsmithOptions, HookBundle, RawProcessor, TreeItem, snapshot,
};
use pretty_assertions::assert_eq;

fn create_test_dir() -> tempfile::TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(temp_dir.path().join("docs")).unwrap();
    temp_dir
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join("docs").join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn docsmith() -> Docsmith {
    Docsmith::builder().processor(RawProcessor).build().unwrap()
}

fn item_summary(item: &TreeItem) -> (String, String, &'static str) {
    let kind = match item {
        TreeItem::Doc(_) => "doc",
        TreeItem::Group(_) => "group",
    };
    (item.name().to_owned(), item.label().to_owned(), kind)
}

#[test]
fn test_ordered_tree_with_labels() {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();
    write(root, "a.md", "Plain");
    write(root, "b/c.md", "---\ntitle: C\n---\n# Hi");
    write(root, "_directory.config.json", r#"{"order": ["b", "a"]}"#);

    let mut docsmith = docsmith();
    docsmith.initialize(root).unwrap();
    let data = docsmith.get_docs_data().unwrap();

    let top: Vec<_> = data.tree.iter().map(item_summary).collect();
    assert_eq!(
        top,
        vec![
            ("b".to_owned(), "b".to_owned(), "group"),
            ("a".to_owned(), "a".to_owned(), "doc"),
        ]
    );
    let TreeItem::Group(b) = &data.tree[0] else {
        panic!("expected group");
    };
    assert_eq!(b.items.iter().map(item_summary).collect::<Vec<_>>(), vec![(
        "c".to_owned(),
        "C".to_owned(),
        "doc"
    )]);
}

#[test]
fn test_front_matter_title_beats_directory_label() {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();
    write(root, "b/c.md", "---\ntitle: C\n---\n");
    write(root, "b/d.md", "no title");
    write(
        root,
        "b/_directory.config.json",
        r#"{"directoryLabels": {"c": "Custom C", "d": "Custom D"}}"#,
    );
    write(root, "docs.config.json", r#"{"directoryLabels": {"b": "Section B"}}"#);

    let mut docsmith = docsmith();
    docsmith.initialize(root).unwrap();
    let data = docsmith.get_docs_data().unwrap();

    let TreeItem::Group(b) = &data.tree[0] else {
        panic!("expected group");
    };
    assert_eq!(b.label, "Section B");
    let labels: Vec<&str> = b.items.iter().map(TreeItem::label).collect();
    assert_eq!(labels, vec!["C", "Custom D"]);
}

#[test]
fn test_slugs_strip_extension_and_are_unique() {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();
    write(root, "guide/intro.mdx", "mdx");
    write(root, "guide/setup.md", "md");
    write(root, "guide/setup.mdx", "duplicate");

    let mut docsmith = docsmith();
    docsmith.initialize(root).unwrap();
    let data = docsmith.get_docs_data().unwrap();

    let slugs: Vec<&str> = data.docs.iter().map(|d| d.slug.as_str()).collect();
    assert_eq!(slugs, vec!["guide/intro", "guide/setup"]);
    assert!(data.docs[0].is_mdx);
}

#[test]
fn test_hook_composition_in_registration_order() {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();
    write(root, "a.md", "---\ntitle: shout\n---\n\n   hello world\n");

    let mut docsmith = Docsmith::builder()
        .processor(RawProcessor)
        .plugin(HookBundle::new("upper").before_parse(|raw| Ok(raw.to_uppercase())))
        .plugin(HookBundle::new("trim").after_parse(|body| Ok(body.trim_start().to_owned())))
        .build()
        .unwrap();
    docsmith.initialize(root).unwrap();

    let doc = docsmith.get_doc("a").unwrap();
    assert_eq!(doc.content, "HELLO WORLD\n");
    assert_eq!(doc.content, doc.content.to_uppercase());
}

#[test]
fn test_navigation_follows_flattened_tree() {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();
    for rel in ["a.md", "b/x.md", "b/y.md", "c.md"] {
        write(root, rel, "text");
    }
    write(root, "b/_directory.config.json", r#"{"order": ["y"]}"#);

    let mut docsmith = docsmith();
    docsmith.initialize(root).unwrap();
    let data = docsmith.get_docs_data().unwrap();

    let order: Vec<&str> = flatten(&data.tree).iter().map(|d| d.slug.as_str()).collect();
    assert_eq!(order, vec!["a", "b/y", "b/x", "c"]);

    for (i, slug) in order.iter().enumerate() {
        let doc = data.docs.iter().find(|d| d.slug == *slug).unwrap();
        let prev = doc.navigation.previous.as_ref().map(|l| l.slug.as_str());
        let next = doc.navigation.next.as_ref().map(|l| l.slug.as_str());
        assert_eq!(prev, i.checked_sub(1).map(|p| order[p]));
        assert_eq!(next, order.get(i + 1).copied());
    }
}

#[test]
fn test_get_docs_data_is_idempotent() {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();
    write(root, "a.md", "# A\n\n## Part");
    write(root, "z/b.md", "---\ntitle: B\ntags: [x, y]\n---\n");
    write(root, "docs.config.json", r#"{"order": ["z"]}"#);

    let mut docsmith = docsmith();
    docsmith.initialize(root).unwrap();

    let first = docsmith.get_docs_data().unwrap();
    let second = docsmith.get_docs_data().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_incremental_update_then_relink() {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();
    write(root, "a.md", "a");

    let mut docsmith = docsmith();
    docsmith.initialize(root).unwrap();

    write(root, "b.md", "---\ntitle: Bee\n---\n");
    docsmith.process_file(root, Path::new("docs/b.md")).unwrap();
    let data = docsmith.get_docs_data().unwrap();

    assert_eq!(data.docs.len(), 2);
    let a = docsmith.get_doc("a").unwrap();
    let next = a.navigation.next.as_ref().unwrap();
    assert_eq!(next.slug, "b");
    assert_eq!(next.title, "Bee");
}

#[test]
fn test_failed_reinitialize_keeps_snapshot() {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();
    write(root, "a.md", "a");

    let mut docsmith = Docsmith::builder()
        .processor(RawProcessor)
        .plugin(HookBundle::new("guard").before_parse(|raw| {
            if raw.contains("FORBIDDEN") {
                Err("forbidden content".into())
            } else {
                Ok(raw)
            }
        }))
        .build()
        .unwrap();
    docsmith.initialize(root).unwrap();
    let before = docsmith.get_docs_data().unwrap();

    write(root, "b.md", "FORBIDDEN");
    let err = docsmith.initialize(root).unwrap_err();
    assert!(matches!(err, DocsmithError::Plugin { .. }));

    assert_eq!(docsmith.get_docs_data().unwrap(), before);
}

#[test]
fn test_lookup_miss_is_none() {
    let temp_dir = create_test_dir();
    let mut docsmith = docsmith();
    docsmith.initialize(temp_dir.path()).unwrap();
    assert!(docsmith.get_doc("missing").is_none());
}

#[test]
fn test_multiple_folders_and_exclude() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("guides/drafts")).unwrap();
    fs::create_dir_all(root.join("reference")).unwrap();
    fs::write(root.join("guides/start.md"), "start").unwrap();
    fs::write(root.join("guides/drafts/wip.md"), "wip").unwrap();
    fs::write(root.join("reference/api.md"), "api").unwrap();

    let options = DocsmithOptions {
        folders: vec!["guides".into(), "reference".into()],
        exclude: vec!["drafts/**".to_owned(), "drafts".to_owned()],
        ..DocsmithOptions::default()
    };
    let mut docsmith = Docsmith::builder()
        .options(options)
        .processor(RawProcessor)
        .build()
        .unwrap();
    docsmith.initialize(root).unwrap();

    let slugs: Vec<&str> = docsmith.docs().map(|d| d.slug.as_str()).collect();
    assert_eq!(slugs, vec!["api", "start"]);
}

#[test]
fn test_snapshot_written_from_docs_data() {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();
    write(root, "a.md", "# A");

    let mut docsmith = docsmith();
    docsmith.initialize(root).unwrap();
    let data = docsmith.get_docs_data().unwrap();

    let out = root.join(".docsmith");
    snapshot::write(&data, &out, &[snapshot::SnapshotFormat::Json]).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("docsmith-data.json")).unwrap()).unwrap();
    assert_eq!(json["docs"][0]["slug"], "a");
    assert_eq!(json["tree"][0]["type"], "doc");
    assert_eq!(json["docs"][0]["navigation"]["next"], serde_json::Value::Null);
}
