use folio_core::db::migrations::{current_user_version, latest_version};
use folio_core::db::{open_db, open_db_in_memory, DbError};
use folio_core::{
    ContentError, ContentManager, Project, RecordId, SectionSettings, Section, SqliteStore, Store,
    StoreError,
};

#[test]
fn bootstrap_sets_latest_user_version() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.sqlite3");
    {
        let conn = open_db(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
            .unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaTooNew { found, .. } if found == latest_version() + 1
    ));
}

#[test]
fn get_set_remove_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::new(&conn);

    assert_eq!(store.get("k").unwrap(), None);
    assert!(!store.contains("k").unwrap());

    store.set("k", "v1").unwrap();
    store.set("k", "v2").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    assert!(store.contains("k").unwrap());
    assert_eq!(store.keys().unwrap(), vec!["k".to_string()]);

    store.remove("k").unwrap();
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn content_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteStore::new(&conn);
        let mut projects = ContentManager::<Project, _>::open(&store).unwrap();
        projects.add(Project::new("x", "T")).unwrap();
        projects.update(Project::new("x", "T2")).unwrap();

        let mut sections = SectionSettings::open(&store).unwrap();
        sections.set(Section::Contact, false).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteStore::new(&conn);
    let projects = ContentManager::<Project, _>::open(&store).unwrap();
    assert_eq!(projects.len(), 3);
    assert_eq!(projects.get(&RecordId::from("x")).unwrap().title, "T2");

    let sections = SectionSettings::open(&store).unwrap();
    assert!(!sections.is_visible(Section::Contact));
}

#[test]
fn failed_write_leaves_memory_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    let mut projects = ContentManager::<Project, _>::open(&store).unwrap();
    let before = projects.items().to_vec();

    conn.execute_batch("DROP TABLE kv_entries;").unwrap();

    let err = projects.add(Project::new("x", "T")).unwrap_err();
    assert!(matches!(err, ContentError::Store(StoreError::Db(_))));
    assert_eq!(projects.items(), before.as_slice());

    let err = projects.update(Project::new("1", "Changed")).unwrap_err();
    assert!(matches!(err, ContentError::Store(StoreError::Db(_))));
    assert_eq!(projects.items(), before.as_slice());

    let err = projects.delete(&RecordId::from("1")).unwrap_err();
    assert!(matches!(err, ContentError::Store(_)));
    assert_eq!(projects.len(), 2);
}
