use crate::error::{Result, StoreError};
use dialbook_core::domain::{
    normalize_email, normalize_name, normalize_phone, Contact, ContactDraft, ContactId,
    SearchField, ValidContact,
};
use rusqlite::{ffi, params, Connection, OptionalExtension, ToSql};

const CONTACT_COLUMNS: &str = "id, name, phone, email, created_at, updated_at";

pub struct ContactsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> ContactsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Validates and inserts a new contact. A phone number that is already
    /// stored fails with [`StoreError::Duplicate`].
    pub fn add(&self, now_utc: i64, draft: ContactDraft) -> Result<Contact> {
        let valid = draft.validate()?;
        self.insert(now_utc, valid)
    }

    pub fn insert(&self, now_utc: i64, contact: ValidContact) -> Result<Contact> {
        let sql = format!(
            "INSERT INTO contacts (name, phone, email, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             RETURNING {CONTACT_COLUMNS};"
        );
        self.conn
            .query_row(
                &sql,
                params![contact.name, contact.phone, contact.email, now_utc],
                contact_from_row,
            )
            .map_err(|err| map_write_error(err, &contact.phone))
    }

    pub fn get(&self, id: ContactId) -> Result<Option<Contact>> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1;");
        let contact = self
            .conn
            .query_row(&sql, [id.as_i64()], contact_from_row)
            .optional()?;
        Ok(contact)
    }

    pub fn find_by_phone(&self, phone: &str) -> Result<Option<Contact>> {
        let phone = normalize_phone(phone)?;
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE phone = ?1;");
        let contact = self
            .conn
            .query_row(&sql, [phone], contact_from_row)
            .optional()?;
        Ok(contact)
    }

    pub fn list(&self) -> Result<Vec<Contact>> {
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             ORDER BY name COLLATE NOCASE ASC, id ASC;"
        );
        self.query_contacts(&sql, &[])
    }

    /// Exact-match lookup on one column. The value goes through the same
    /// normalization as stored data; a blank value matches nothing.
    pub fn search(&self, field: SearchField, value: &str) -> Result<Vec<Contact>> {
        if value.trim().is_empty() {
            return Ok(Vec::new());
        }

        let (column, key) = match field {
            SearchField::Name => ("name COLLATE NOCASE", normalize_name(value)?),
            SearchField::Email => match normalize_email(value)? {
                Some(email) => ("email", email),
                None => return Ok(Vec::new()),
            },
            SearchField::Phone => ("phone", normalize_phone(value)?),
        };

        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE {column} = ?1
             ORDER BY name COLLATE NOCASE ASC, id ASC;"
        );
        self.query_contacts(&sql, &[&key])
    }

    pub fn update_phone(&self, now_utc: i64, id: ContactId, new_phone: &str) -> Result<Contact> {
        let phone = normalize_phone(new_phone)?;
        let sql = format!(
            "UPDATE contacts SET phone = ?1, updated_at = ?2
             WHERE id = ?3
             RETURNING {CONTACT_COLUMNS};"
        );
        self.conn
            .query_row(&sql, params![phone, now_utc, id.as_i64()], contact_from_row)
            .optional()
            .map_err(|err| map_write_error(err, &phone))?
            .ok_or_else(|| not_found(id))
    }

    /// Replaces name and email of an existing contact, leaving the phone key
    /// untouched.
    pub fn update_details(
        &self,
        now_utc: i64,
        id: ContactId,
        name: &str,
        email: Option<&str>,
    ) -> Result<Contact> {
        let name = normalize_name(name)?;
        let email = match email {
            Some(raw) => normalize_email(raw)?,
            None => None,
        };
        let sql = format!(
            "UPDATE contacts SET name = ?1, email = ?2, updated_at = ?3
             WHERE id = ?4
             RETURNING {CONTACT_COLUMNS};"
        );
        self.conn
            .query_row(
                &sql,
                params![name, email, now_utc, id.as_i64()],
                contact_from_row,
            )
            .optional()?
            .ok_or_else(|| not_found(id))
    }

    pub fn delete(&self, id: ContactId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id.as_i64()])?;
        if deleted == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Deletes the contact holding `phone` and returns it.
    pub fn delete_by_phone(&self, phone: &str) -> Result<Contact> {
        let phone = normalize_phone(phone)?;
        let sql = format!("DELETE FROM contacts WHERE phone = ?1 RETURNING {CONTACT_COLUMNS};");
        self.conn
            .query_row(&sql, [&phone], contact_from_row)
            .optional()?
            .ok_or_else(|| StoreError::NotFound(format!("contact with phone {phone}")))
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn query_contacts(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(contact_from_row(row)?);
        }
        Ok(contacts)
    }
}

fn not_found(id: ContactId) -> StoreError {
    StoreError::NotFound(format!("contact {id}"))
}

fn map_write_error(err: rusqlite::Error, phone: &str) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::Duplicate(phone.to_string())
    } else {
        StoreError::Sql(err)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn contact_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: ContactId(row.get(0)?),
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
