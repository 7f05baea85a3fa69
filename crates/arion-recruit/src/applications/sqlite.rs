//! SQLite-backed registration storage.
//!
//! One row per application in `applications`; set-valued answers are stored as JSON
//! arrays of their labels. `reg_no` carries a `UNIQUE` constraint, which is what turns a
//! colliding registration number into [`RepositoryError::Conflict`].

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::ffi::ErrorCode;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::catalog::Vertical;
use super::payload::Applicant;
use super::registration::RegistrationCode;
use super::repository::{RegistrationRecord, RegistrationRepository, RepositoryError};

pub struct SqliteRegistrationRepository {
    db: Mutex<Connection>,
}

impl SqliteRegistrationRepository {
    const SCHEMA: &'static str = r"
        CREATE TABLE IF NOT EXISTS applications (
            id INTEGER PRIMARY KEY,
            reg_no TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            usn TEXT NOT NULL,
            phone TEXT NOT NULL,
            branch TEXT NOT NULL,
            year TEXT NOT NULL,
            motivation TEXT NOT NULL,
            verticals TEXT NOT NULL,
            question_types TEXT NOT NULL,
            residence_type TEXT NOT NULL,
            experience TEXT NOT NULL,
            links TEXT NOT NULL,
            gdpr_consent INTEGER NOT NULL,
            terms_consent INTEGER NOT NULL,
            resume_url TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_applications_created_at
        ON applications(created_at);
    ";

    const SELECT_COLUMNS: &'static str = "reg_no, name, email, usn, phone, branch, year, \
        motivation, verticals, question_types, residence_type, experience, links, \
        gdpr_consent, terms_consent, resume_url, created_at";

    /// Open or create the database at `path`, creating parent directories as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                RepositoryError::Unavailable(format!(
                    "failed to create directory {}: {err}",
                    parent.display()
                ))
            })?;
        }

        let db = Connection::open(path).map_err(|err| {
            RepositoryError::Unavailable(format!(
                "failed to open database at {}: {err}",
                path.display()
            ))
        })?;
        Self::initialize(db)
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        let db = Connection::open_in_memory().map_err(unavailable)?;
        Self::initialize(db)
    }

    fn initialize(db: Connection) -> Result<Self, RepositoryError> {
        db.execute_batch("PRAGMA synchronous=FULL;")
            .map_err(unavailable)?;
        db.execute_batch(Self::SCHEMA).map_err(unavailable)?;
        Ok(Self { db: Mutex::new(db) })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.db
            .lock()
            .map_err(|_| RepositoryError::Unavailable("connection mutex poisoned".to_string()))
    }
}

impl RegistrationRepository for SqliteRegistrationRepository {
    fn insert(&self, record: RegistrationRecord) -> Result<RegistrationRecord, RepositoryError> {
        let applicant = &record.applicant;
        let verticals = serde_json::to_string(&applicant.verticals)
            .map_err(|err| RepositoryError::Corrupt(err.to_string()))?;
        let question_types = serde_json::to_string(&applicant.question_types)
            .map_err(|err| RepositoryError::Corrupt(err.to_string()))?;

        let db = self.connection()?;
        db.execute(
            "INSERT INTO applications (
                reg_no, name, email, usn, phone, branch, year, motivation, verticals,
                question_types, residence_type, experience, links, gdpr_consent,
                terms_consent, resume_url, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                record.reg_no.as_str(),
                &applicant.full_name,
                &applicant.email,
                &applicant.usn,
                &applicant.phone,
                applicant.branch.label(),
                applicant.year.label(),
                &applicant.motivation,
                verticals,
                question_types,
                applicant.residence.label(),
                &applicant.experience,
                &applicant.links,
                applicant.consent_gdpr,
                applicant.consent_terms,
                &record.resume_url,
                record.created_at.to_rfc3339(),
            ],
        )
        .map_err(|err| match err {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                RepositoryError::Conflict
            }
            other => unavailable(other),
        })?;

        Ok(record)
    }

    fn fetch(
        &self,
        reg_no: &RegistrationCode,
    ) -> Result<Option<RegistrationRecord>, RepositoryError> {
        let db = self.connection()?;
        let sql = format!(
            "SELECT {} FROM applications WHERE reg_no = ?1",
            Self::SELECT_COLUMNS
        );
        let raw = db
            .query_row(&sql, params![reg_no.as_str()], RawRow::from_row)
            .optional()
            .map_err(unavailable)?;

        raw.map(RawRow::into_record).transpose()
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        let db = self.connection()?;
        let count: i64 = db
            .query_row("SELECT COUNT(*) FROM applications", [], |row| row.get(0))
            .map_err(unavailable)?;
        usize::try_from(count).map_err(|err| RepositoryError::Corrupt(err.to_string()))
    }
}

fn unavailable(err: rusqlite::Error) -> RepositoryError {
    RepositoryError::Unavailable(err.to_string())
}

/// Column values as stored, before catalog labels are parsed back.
struct RawRow {
    reg_no: String,
    name: String,
    email: String,
    usn: String,
    phone: String,
    branch: String,
    year: String,
    motivation: String,
    verticals: String,
    question_types: String,
    residence: String,
    experience: String,
    links: String,
    gdpr_consent: bool,
    terms_consent: bool,
    resume_url: Option<String>,
    created_at: String,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            reg_no: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            usn: row.get(3)?,
            phone: row.get(4)?,
            branch: row.get(5)?,
            year: row.get(6)?,
            motivation: row.get(7)?,
            verticals: row.get(8)?,
            question_types: row.get(9)?,
            residence: row.get(10)?,
            experience: row.get(11)?,
            links: row.get(12)?,
            gdpr_consent: row.get(13)?,
            terms_consent: row.get(14)?,
            resume_url: row.get(15)?,
            created_at: row.get(16)?,
        })
    }

    fn into_record(self) -> Result<RegistrationRecord, RepositoryError> {
        let corrupt = |err: &dyn std::fmt::Display| RepositoryError::Corrupt(err.to_string());

        let verticals: BTreeSet<Vertical> =
            serde_json::from_str(&self.verticals).map_err(|err| corrupt(&err))?;
        let question_types: Vec<String> =
            serde_json::from_str(&self.question_types).map_err(|err| corrupt(&err))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|err| corrupt(&err))?
            .with_timezone(&Utc);

        Ok(RegistrationRecord {
            reg_no: RegistrationCode::parse(&self.reg_no).map_err(|err| corrupt(&err))?,
            applicant: Applicant {
                full_name: self.name,
                email: self.email,
                usn: self.usn,
                phone: self.phone,
                branch: self.branch.parse().map_err(|err| corrupt(&err))?,
                year: self.year.parse().map_err(|err| corrupt(&err))?,
                motivation: self.motivation,
                verticals,
                question_types,
                residence: self.residence.parse().map_err(|err| corrupt(&err))?,
                experience: self.experience,
                links: self.links,
                consent_gdpr: self.gdpr_consent,
                consent_terms: self.terms_consent,
            },
            resume_url: self.resume_url,
            created_at,
        })
    }
}
