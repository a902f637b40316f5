use dialbook_core::domain::{ContactDraft, ContactId, SearchField};
use dialbook_core::CoreError;
use dialbook_store::error::{StoreError, StoreErrorKind};
use dialbook_store::Store;
use tempfile::TempDir;

const NOW: i64 = 1_700_000_000;

fn store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

fn draft(name: &str, phone: &str, email: Option<&str>) -> ContactDraft {
    ContactDraft::new(name, phone, email.map(str::to_string))
}

#[test]
fn contact_crud_roundtrip() {
    let store = store();

    let contact = store
        .contacts()
        .add(NOW, draft("Ada Lovelace", "(415) 555-1212", Some("Ada@Example.com")))
        .expect("add contact");
    assert_eq!(contact.phone, "+1-415-555-1212");
    assert_eq!(contact.email.as_deref(), Some("ada@example.com"));
    assert_eq!(contact.created_at, NOW);

    let fetched = store
        .contacts()
        .get(contact.id)
        .expect("get contact")
        .expect("contact exists");
    assert_eq!(fetched, contact);

    let updated = store
        .contacts()
        .update_phone(NOW + 10, contact.id, "415.555.9999")
        .expect("update phone");
    assert_eq!(updated.phone, "+1-415-555-9999");
    assert_eq!(updated.updated_at, NOW + 10);
    assert_eq!(updated.created_at, NOW);

    store.contacts().delete(contact.id).expect("delete contact");
    let missing = store.contacts().get(contact.id).expect("get contact");
    assert!(missing.is_none());
}

#[test]
fn add_then_search_by_phone_returns_same_fields() {
    let store = store();
    store
        .contacts()
        .add(NOW, draft("Grace Hopper", "212-555-0101", Some("grace@navy.mil")))
        .expect("add contact");

    let found = store
        .contacts()
        .search(SearchField::Phone, "(212) 555 0101")
        .expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Grace Hopper");
    assert_eq!(found[0].email.as_deref(), Some("grace@navy.mil"));
}

#[test]
fn add_duplicate_phone_fails() {
    let store = store();
    store
        .contacts()
        .add(NOW, draft("Ada Lovelace", "415-555-1212", None))
        .expect("add contact");

    let err = store
        .contacts()
        .add(NOW, draft("Someone Else", "+1 (415) 555-1212", None))
        .expect_err("duplicate phone");
    assert_eq!(err.kind(), StoreErrorKind::Duplicate);
    assert!(matches!(err, StoreError::Duplicate(ref phone) if phone == "+1-415-555-1212"));
    assert_eq!(store.contacts().count().expect("count"), 1);
}

#[test]
fn add_rejects_invalid_phone() {
    let store = store();
    let err = store
        .contacts()
        .add(NOW, draft("Ada Lovelace", "555-12", None))
        .expect_err("invalid phone");
    assert!(matches!(err, StoreError::Core(CoreError::InvalidPhone(_))));
    assert!(!err.is_connection());
}

#[test]
fn update_phone_to_taken_number_is_duplicate() {
    let store = store();
    let ada = store
        .contacts()
        .add(NOW, draft("Ada Lovelace", "415-555-1212", None))
        .expect("add ada");
    store
        .contacts()
        .add(NOW, draft("Grace Hopper", "212-555-0101", None))
        .expect("add grace");

    let err = store
        .contacts()
        .update_phone(NOW, ada.id, "212 555 0101")
        .expect_err("taken phone");
    assert_eq!(err.kind(), StoreErrorKind::Duplicate);
}

#[test]
fn update_phone_missing_contact_is_not_found() {
    let store = store();
    let err = store
        .contacts()
        .update_phone(NOW, ContactId(404), "415-555-1212")
        .expect_err("missing");
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[test]
fn delete_missing_contact_is_not_found() {
    let store = store();
    let err = store.contacts().delete(ContactId(404)).expect_err("missing");
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[test]
fn delete_by_phone_returns_removed_contact() {
    let store = store();
    let ada = store
        .contacts()
        .add(NOW, draft("Ada Lovelace", "415-555-1212", None))
        .expect("add contact");

    let removed = store
        .contacts()
        .delete_by_phone("4155551212")
        .expect("delete by phone");
    assert_eq!(removed.id, ada.id);

    let err = store
        .contacts()
        .delete_by_phone("4155551212")
        .expect_err("already removed");
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[test]
fn list_orders_by_name_case_insensitively() {
    let store = store();
    for (name, phone) in [
        ("charlie", "415-555-0003"),
        ("Alice", "415-555-0001"),
        ("bob", "415-555-0002"),
    ] {
        store
            .contacts()
            .add(NOW, draft(name, phone, None))
            .expect("add contact");
    }

    let names: Vec<String> = store
        .contacts()
        .list()
        .expect("list")
        .into_iter()
        .map(|contact| contact.name)
        .collect();
    assert_eq!(names, ["Alice", "bob", "charlie"]);
}

#[test]
fn search_by_name_and_email_normalizes_input() {
    let store = store();
    store
        .contacts()
        .add(NOW, draft("Ada Lovelace", "415-555-1212", Some("ada@example.com")))
        .expect("add contact");
    store
        .contacts()
        .add(NOW, draft("Ada Lovelace", "415-555-3434", None))
        .expect("add namesake");

    let by_name = store
        .contacts()
        .search(SearchField::Name, "  ada lovelace ")
        .expect("search name");
    assert_eq!(by_name.len(), 2);

    let by_email = store
        .contacts()
        .search(SearchField::Email, "ADA@example.COM")
        .expect("search email");
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].phone, "+1-415-555-1212");

    let blank = store
        .contacts()
        .search(SearchField::Email, "   ")
        .expect("search blank");
    assert!(blank.is_empty());
}

#[test]
fn update_details_keeps_phone() {
    let store = store();
    let ada = store
        .contacts()
        .add(NOW, draft("Ada", "415-555-1212", None))
        .expect("add contact");

    let updated = store
        .contacts()
        .update_details(NOW + 5, ada.id, "Ada Lovelace", Some("ada@example.com"))
        .expect("update details");
    assert_eq!(updated.name, "Ada Lovelace");
    assert_eq!(updated.email.as_deref(), Some("ada@example.com"));
    assert_eq!(updated.phone, ada.phone);
}

#[test]
fn file_store_persists_between_opens() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("contacts.sqlite3");

    {
        let store = Store::open(&db_path).expect("open store");
        store.migrate().expect("migrate");
        store
            .contacts()
            .add(NOW, draft("Ada Lovelace", "415-555-1212", None))
            .expect("add contact");
    }

    let reopened = Store::open(&db_path).expect("reopen store");
    reopened.migrate().expect("migrate");
    let contacts = reopened.contacts().list().expect("list");
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Ada Lovelace");
}

#[test]
fn file_store_is_owner_only_with_rollback_journal() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("contacts.sqlite3");
    let store = Store::open(&db_path).expect("open store");
    store.migrate().expect("migrate");
    store
        .contacts()
        .add(NOW, draft("Ada Lovelace", "415-555-1212", None))
        .expect("add contact");

    let mode: String = store
        .connection()
        .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
        .expect("journal mode");
    assert_eq!(mode, "delete");
    assert!(!temp.path().join("contacts.sqlite3-wal").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::metadata(&db_path).expect("metadata").permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }
}
