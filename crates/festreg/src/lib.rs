//! `festreg` - Participant registration store for festival staff
//!
//! This library validates participant registration payloads and keeps them in
//! a local `SQLite` table keyed by registration ID. The `festreg` binary is a
//! thin command-line front end over [`ParticipantStore`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod image;
pub mod logging;
pub mod participant;
pub mod storage;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use participant::{Department, ParticipantForm, ParticipantRecord, ParticipantSummary};
pub use storage::ParticipantStore;
pub use validation::{Field, ValidationError, ValidationReason};
