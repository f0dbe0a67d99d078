//! Storage layer for festreg.
//!
//! This module provides `SQLite`-based persistent storage for participant
//! registrations, keyed by registration ID.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::types::Type;
use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::participant::{Department, ParticipantRecord, ParticipantSummary};
use crate::validation::validate_registration_id;

const SELECT_PARTICIPANT: &str = r"
SELECT RegistrationID, ParticipantName, Department, DancingPartner,
       ContactNumber, EmailAddress, UniversityIDImage
FROM Participants WHERE RegistrationID = ?1
";

/// Persistent store of participant registrations.
///
/// Owns a single long-lived connection. Every operation is one statement,
/// prepared and finalized inside the call.
#[derive(Debug)]
pub struct ParticipantStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl ParticipantStore {
    /// Open or create a participant database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// and the Participants table if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a new participant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the record is malformed,
    /// [`Error::DuplicateKey`] if the registration ID is taken (the existing
    /// row is left untouched), or [`Error::DatabaseQuery`] on any other failure.
    pub fn insert(&self, record: &ParticipantRecord) -> Result<()> {
        record.validate()?;

        let result = self.conn.execute(
            r"
            INSERT INTO Participants (RegistrationID, ParticipantName, Department,
                DancingPartner, ContactNumber, EmailAddress, UniversityIDImage)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                record.registration_id,
                record.name,
                record.department.name(),
                record.dancing_partner,
                record.contact_number,
                record.email_address,
                record.id_image,
            ],
        );

        match result {
            Ok(_) => {
                info!("Registered participant {}", record.registration_id);
                Ok(())
            }
            Err(e) if is_key_violation(&e) => {
                warn!(
                    "Registration ID {} already exists, insert rejected",
                    record.registration_id
                );
                Err(Error::duplicate_key(&record.registration_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a participant by registration ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no row matches, [`Error::Validation`] if
    /// the ID is blank or padded, or [`Error::DatabaseQuery`] on failure.
    pub fn find_by_id(&self, registration_id: &str) -> Result<ParticipantRecord> {
        validate_registration_id(registration_id)?;

        let record = self
            .conn
            .query_row(SELECT_PARTICIPANT, [registration_id], Self::row_to_record)
            .optional()?;

        record.ok_or_else(|| {
            debug!("No participant with registration ID {}", registration_id);
            Error::not_found(registration_id)
        })
    }

    /// Overwrite every field except the key for the participant `registration_id`.
    ///
    /// The record's own `registration_id` is neither checked nor stored; the
    /// key never changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no row matched (nothing is created),
    /// [`Error::Validation`] if `registration_id` or any other field is
    /// malformed, or [`Error::DatabaseQuery`] on failure.
    pub fn update(&self, registration_id: &str, record: &ParticipantRecord) -> Result<()> {
        validate_registration_id(registration_id)?;
        record.validate_fields()?;

        let affected = self.conn.execute(
            r"
            UPDATE Participants SET ParticipantName = ?1, Department = ?2,
                DancingPartner = ?3, ContactNumber = ?4, EmailAddress = ?5,
                UniversityIDImage = ?6
            WHERE RegistrationID = ?7
            ",
            params![
                record.name,
                record.department.name(),
                record.dancing_partner,
                record.contact_number,
                record.email_address,
                record.id_image,
                registration_id,
            ],
        )?;

        if affected == 0 {
            return Err(Error::not_found(registration_id));
        }
        info!("Updated participant {}", registration_id);
        Ok(())
    }

    /// Delete the participant with the given registration ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no row matched, [`Error::Validation`] if
    /// the ID is blank or padded, or [`Error::DatabaseQuery`] on failure.
    pub fn delete_by_id(&self, registration_id: &str) -> Result<()> {
        validate_registration_id(registration_id)?;

        let affected = self.conn.execute(
            "DELETE FROM Participants WHERE RegistrationID = ?1",
            [registration_id],
        )?;

        if affected == 0 {
            return Err(Error::not_found(registration_id));
        }
        info!("Deleted participant {}", registration_id);
        Ok(())
    }

    /// List every participant ordered by registration ID, without photo bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list(&self) -> Result<Vec<ParticipantSummary>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT RegistrationID, ParticipantName, Department, DancingPartner,
                   ContactNumber, EmailAddress, length(UniversityIDImage)
            FROM Participants ORDER BY RegistrationID
            ",
        )?;

        let participants = stmt
            .query_map([], Self::row_to_summary)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(participants)
    }

    /// Count registered participants.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Participants", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ParticipantRecord> {
        Ok(ParticipantRecord {
            registration_id: row.get(0)?,
            name: row.get(1)?,
            department: department_column(row, 2)?,
            dancing_partner: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            contact_number: row.get(4)?,
            email_address: row.get(5)?,
            id_image: row.get(6)?,
        })
    }

    fn row_to_summary(row: &rusqlite::Row) -> rusqlite::Result<ParticipantSummary> {
        let image_len: Option<i64> = row.get(6)?;
        Ok(ParticipantSummary {
            registration_id: row.get(0)?,
            name: row.get(1)?,
            department: department_column(row, 2)?,
            dancing_partner: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            contact_number: row.get(4)?,
            email_address: row.get(5)?,
            image_len: image_len.and_then(|n| usize::try_from(n).ok()),
        })
    }
}

/// Stored departments outside the catalog are reported, not masked.
fn department_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Department> {
    let value: String = row.get(idx)?;
    value.parse().map_err(|err| {
        warn!("Stored department {:?} is not in the catalog", value);
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
    })
}

/// True when SQLite rejected a write because the key already exists.
fn is_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Field, ValidationReason};
    use proptest::prelude::*;

    fn create_test_store() -> ParticipantStore {
        ParticipantStore::open_in_memory().expect("failed to create test store")
    }

    fn create_test_record(id: &str) -> ParticipantRecord {
        ParticipantRecord {
            registration_id: id.to_string(),
            name: "Alex Lee".to_string(),
            department: Department::Engineering,
            dancing_partner: String::new(),
            contact_number: "0400111222".to_string(),
            email_address: "a@vu.edu.au".to_string(),
            id_image: None,
        }
    }

    #[test]
    fn test_open_in_memory() {
        let store = ParticipantStore::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_insert_and_find() {
        let store = create_test_store();
        let record = create_test_record("R001");

        store.insert(&record).unwrap();
        let found = store.find_by_id("R001").unwrap();

        assert_eq!(found, record);
    }

    #[test]
    fn test_insert_and_find_with_image() {
        let store = create_test_store();
        let mut record = create_test_record("R010");
        record.dancing_partner = "Sam Park".to_string();
        record.department = Department::ComputerScienceIt;
        record.id_image = Some(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]);

        store.insert(&record).unwrap();
        let found = store.find_by_id("R010").unwrap();

        assert_eq!(found, record);
        assert_eq!(found.image_len(), Some(6));
    }

    #[test]
    fn test_insert_duplicate_key() {
        let store = create_test_store();
        let original = create_test_record("R001");
        store.insert(&original).unwrap();

        let mut clash = create_test_record("R001");
        clash.name = "Someone Else".to_string();
        let err = store.insert(&clash).unwrap_err();

        assert!(err.is_duplicate_key());
        assert_eq!(store.find_by_id("R001").unwrap(), original);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_insert_rejects_padded_key() {
        let store = create_test_store();
        store.insert(&create_test_record("R001")).unwrap();

        let err = store.insert(&create_test_record(" R001 ")).unwrap_err();
        match err {
            Error::Validation(v) => {
                assert_eq!(v.field, Field::RegistrationId);
                assert_eq!(v.reason, ValidationReason::SurroundingWhitespace);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_insert_rejects_padded_name() {
        let store = create_test_store();
        let mut record = create_test_record("R001");
        record.name = " Alex Lee".to_string();

        assert!(store.insert(&record).unwrap_err().is_validation());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_padded_id_lookups_are_rejected() {
        let store = create_test_store();
        store.insert(&create_test_record("R001")).unwrap();

        assert!(store.find_by_id("R001 ").unwrap_err().is_validation());
        assert!(store.delete_by_id(" R001").unwrap_err().is_validation());
        assert!(store
            .update(" R001 ", &create_test_record("R001"))
            .unwrap_err()
            .is_validation());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_insert_rejects_invalid_record() {
        let store = create_test_store();
        let mut record = create_test_record("R001");
        record.contact_number = "abc123".to_string();

        let err = store.insert(&record).unwrap_err();
        match err {
            Error::Validation(v) => assert_eq!(v.field, Field::ContactNumber),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_find_nonexistent() {
        let store = create_test_store();
        let err = store.find_by_id("NOPE").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_find_blank_id() {
        let store = create_test_store();
        match store.find_by_id("  ").unwrap_err() {
            Error::Validation(v) => {
                assert_eq!(v.field, Field::RegistrationId);
                assert_eq!(v.reason, ValidationReason::Required);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_update_existing() {
        let store = create_test_store();
        store.insert(&create_test_record("R001")).unwrap();

        let mut changed = create_test_record("R001");
        changed.name = "Alex Lim".to_string();
        changed.department = Department::Law;
        changed.id_image = Some(vec![1, 2, 3]);
        store.update("R001", &changed).unwrap();

        let found = store.find_by_id("R001").unwrap();
        assert_eq!(found, changed);
    }

    #[test]
    fn test_update_nonexistent_creates_nothing() {
        let store = create_test_store();
        let err = store
            .update("GHOST", &create_test_record("GHOST"))
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_update_does_not_change_key() {
        let store = create_test_store();
        store.insert(&create_test_record("R001")).unwrap();

        let mut changed = create_test_record("R999");
        changed.name = "Renamed".to_string();
        store.update("R001", &changed).unwrap();

        assert_eq!(store.find_by_id("R001").unwrap().name, "Renamed");
        assert!(store.find_by_id("R999").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_ignores_record_key() {
        let store = create_test_store();
        store.insert(&create_test_record("R001")).unwrap();

        for ignored in ["", "   ", "R001-WITH-A-KEY-FAR-TOO-LONG"] {
            let mut changed = create_test_record(ignored);
            changed.department = Department::Education;
            store.update("R001", &changed).unwrap();
        }

        let found = store.find_by_id("R001").unwrap();
        assert_eq!(found.registration_id, "R001");
        assert_eq!(found.department, Department::Education);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_update_clears_image() {
        let store = create_test_store();
        let mut record = create_test_record("R001");
        record.id_image = Some(vec![9; 16]);
        store.insert(&record).unwrap();

        record.id_image = None;
        store.update("R001", &record).unwrap();

        assert!(store.find_by_id("R001").unwrap().id_image.is_none());
    }

    #[test]
    fn test_delete_existing() {
        let store = create_test_store();
        store.insert(&create_test_record("R001")).unwrap();
        store.insert(&create_test_record("R002")).unwrap();

        store.delete_by_id("R001").unwrap();

        assert!(store.find_by_id("R001").unwrap_err().is_not_found());
        assert!(store.find_by_id("R002").is_ok());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_delete_nonexistent() {
        let store = create_test_store();
        assert!(store.delete_by_id("NOPE").unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_orders_by_id_and_omits_image() {
        let store = create_test_store();
        let mut with_image = create_test_record("R002");
        with_image.id_image = Some(vec![0; 128]);
        store.insert(&with_image).unwrap();
        store.insert(&create_test_record("R001")).unwrap();

        let list = store.list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].registration_id, "R001");
        assert_eq!(list[0].image_len, None);
        assert_eq!(list[1].registration_id, "R002");
        assert_eq!(list[1].image_len, Some(128));
    }

    #[test]
    fn test_list_empty() {
        let store = create_test_store();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_count() {
        let store = create_test_store();
        assert_eq!(store.count().unwrap(), 0);

        store.insert(&create_test_record("R001")).unwrap();
        store.insert(&create_test_record("R002")).unwrap();

        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_unknown_stored_department_is_an_error() {
        let store = create_test_store();
        store
            .conn
            .execute(
                "INSERT INTO Participants (RegistrationID, ParticipantName, Department, \
                 ContactNumber, EmailAddress) VALUES ('R1', 'A', 'Astrology', '1', 'a@b.c')",
                [],
            )
            .unwrap();

        let err = store.find_by_id("R1").unwrap_err();
        assert!(matches!(err, Error::DatabaseQuery(_)));
    }

    #[test]
    fn test_null_partner_reads_as_empty() {
        let store = create_test_store();
        store
            .conn
            .execute(
                "INSERT INTO Participants (RegistrationID, ParticipantName, Department, \
                 DancingPartner, ContactNumber, EmailAddress) \
                 VALUES ('R1', 'A', 'Law', NULL, '1', 'a@b.c')",
                [],
            )
            .unwrap();

        assert_eq!(store.find_by_id("R1").unwrap().dancing_partner, "");
    }

    #[test]
    fn test_registration_lifecycle() {
        let store = create_test_store();
        let record = create_test_record("R001");

        store.insert(&record).unwrap();
        assert_eq!(store.find_by_id("R001").unwrap(), record);

        let mut renamed = record.clone();
        renamed.name = "Alex Lim".to_string();
        store.update("R001", &renamed).unwrap();
        assert_eq!(store.find_by_id("R001").unwrap().name, "Alex Lim");

        store.delete_by_id("R001").unwrap();
        assert!(store.find_by_id("R001").unwrap_err().is_not_found());
    }

    #[test]
    fn test_path() {
        let store = create_test_store();
        assert_eq!(store.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_file_based_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("participants.db");

        {
            let store = ParticipantStore::open(&db_path).unwrap();
            store.insert(&create_test_record("R001")).unwrap();
            assert_eq!(store.path(), db_path);
        }

        let reopened = ParticipantStore::open(&db_path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
        assert_eq!(reopened.find_by_id("R001").unwrap().name, "Alex Lee");
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/participants.db");

        let store = ParticipantStore::open(&nested_path).unwrap();
        assert!(nested_path.exists());
        drop(store);
    }

    fn arb_record() -> impl Strategy<Value = ParticipantRecord> {
        (
            "[A-Za-z0-9-]{1,20}",
            "[A-Za-z][A-Za-z .'-]{0,40}[A-Za-z]",
            prop::sample::select(Department::ALL.to_vec()),
            prop_oneof![Just(String::new()), "[A-Za-z][A-Za-z ]{0,30}[A-Za-z]"],
            "[0-9+(][0-9 +()-]{0,17}[0-9)]",
            "[a-z0-9._+-]{1,30}@[a-z0-9-]{1,20}\\.[a-z]{2,6}",
            prop::option::of(prop::collection::vec(any::<u8>(), 1..512)),
        )
            .prop_map(
                |(registration_id, name, department, dancing_partner, contact, email, image)| {
                    ParticipantRecord {
                        registration_id,
                        name,
                        department,
                        dancing_partner,
                        contact_number: contact,
                        email_address: email,
                        id_image: image,
                    }
                },
            )
    }

    proptest! {
        /// Property: every valid record reads back exactly as inserted
        #[test]
        fn prop_insert_then_find_roundtrip(record in arb_record()) {
            let store = create_test_store();
            prop_assert!(record.validate().is_ok());

            store.insert(&record).unwrap();
            let found = store.find_by_id(&record.registration_id).unwrap();

            prop_assert_eq!(&found, &record);
            prop_assert_eq!(store.count().unwrap(), 1);
        }

        /// Property: a second insert under the same key never changes the row
        #[test]
        fn prop_duplicate_insert_keeps_original(first in arb_record(), second in arb_record()) {
            let store = create_test_store();
            let mut second = second;
            second.registration_id.clone_from(&first.registration_id);

            store.insert(&first).unwrap();
            prop_assert!(store.insert(&second).unwrap_err().is_duplicate_key());
            prop_assert_eq!(&store.find_by_id(&first.registration_id).unwrap(), &first);
        }
    }
}
