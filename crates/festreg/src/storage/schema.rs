//! `SQLite` schema definitions for festreg.
//!
//! Column names follow the registration desk's original Participants table.

/// SQL statement to create the participants table.
pub const CREATE_PARTICIPANTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS Participants (
    RegistrationID TEXT PRIMARY KEY NOT NULL,
    ParticipantName TEXT NOT NULL,
    Department TEXT NOT NULL,
    DancingPartner TEXT,
    ContactNumber TEXT NOT NULL,
    EmailAddress TEXT NOT NULL,
    UniversityIDImage BLOB
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_PARTICIPANTS_TABLE, CREATE_METADATA_TABLE];
