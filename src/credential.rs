//! Turning a solved challenge into the three cookies the origin expects, and
//! the host seam that persists them and triggers the reload.
use crate::config::ChallengeConfig;
use crate::error::Result;
use crate::solver::Solution;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::time::Duration;
use tracing::debug;

/// Proof that the puzzle was solved: `(seed, nonce, tag)` plus the lifetime
/// of the records that carry it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub seed_hex: String,
    pub nonce_hex: String,
    pub authentication_tag: String,
    pub ttl: Duration,
}

impl Credential {
    pub fn new(config: &ChallengeConfig, solution: &Solution) -> Self {
        Self {
            seed_hex: config.seed_hex.clone(),
            nonce_hex: solution.nonce_hex(),
            authentication_tag: config.authentication_tag.clone(),
            ttl: config.credential_ttl(),
        }
    }
}

/// One persisted key/value record. Every record is site-wide, secure-only and
/// same-site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialRecord {
    pub name: String,
    pub value: String,
    pub max_age: Duration,
}

impl CredentialRecord {
    pub const PATH: &'static str = "/";
    pub const SAME_SITE: &'static str = "Lax";
}

impl Display for CredentialRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}={}; Path={}; Max-Age={}; SameSite={}; Secure",
            self.name,
            self.value,
            Self::PATH,
            self.max_age.as_secs(),
            Self::SAME_SITE
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("record {name} rejected: {reason}")]
    Rejected { name: String, reason: String },
    #[error("reload failed: {0}")]
    Reload(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The environment the credential is handed to.
pub trait CredentialHost {
    fn persist(&mut self, record: &CredentialRecord) -> Result<(), HostError>;

    /// Resubmit the current navigation so the records reach the origin.
    /// Fire-and-forget: acceptance is not observed.
    fn reload(&mut self) -> Result<(), HostError>;
}

/// Writes the three records, then triggers exactly one reload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialEmitter {
    seed_cookie_name: String,
    solution_cookie_name: String,
    mac_cookie_name: String,
}

impl CredentialEmitter {
    pub fn new(
        seed_cookie_name: impl Into<String>,
        solution_cookie_name: impl Into<String>,
        mac_cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            seed_cookie_name: seed_cookie_name.into(),
            solution_cookie_name: solution_cookie_name.into(),
            mac_cookie_name: mac_cookie_name.into(),
        }
    }

    pub fn from_config(config: &ChallengeConfig) -> Self {
        Self::new(
            config.seed_cookie_name.clone(),
            config.solution_cookie_name.clone(),
            config.mac_cookie_name.clone(),
        )
    }

    /// Records in emission order: seed, solution, tag.
    pub fn records(&self, credential: &Credential) -> [CredentialRecord; 3] {
        let record = |name: &str, value: &str| CredentialRecord {
            name: name.to_owned(),
            value: value.to_owned(),
            max_age: credential.ttl,
        };
        [
            record(&self.seed_cookie_name, &credential.seed_hex),
            record(&self.solution_cookie_name, &credential.nonce_hex),
            record(&self.mac_cookie_name, &credential.authentication_tag),
        ]
    }

    /// Persist every record, then reload. The first host error aborts the
    /// emission; no reload is triggered after a failed write.
    pub fn emit<H: CredentialHost + ?Sized>(
        &self,
        credential: &Credential,
        host: &mut H,
    ) -> Result<()> {
        for record in self.records(credential) {
            host.persist(&record)?;
            debug!(name = %record.name, "credential record persisted");
        }
        host.reload()?;
        debug!("reload triggered");
        Ok(())
    }
}

/// In-memory cookie jar. A record with an existing name replaces it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryHost {
    pub records: Vec<CredentialRecord>,
    pub reloads: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&CredentialRecord> {
        self.records.iter().find(|r| r.name == name)
    }
}

impl CredentialHost for MemoryHost {
    fn persist(&mut self, record: &CredentialRecord) -> Result<(), HostError> {
        match self.records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => *existing = record.clone(),
            None => self.records.push(record.clone()),
        }
        Ok(())
    }

    fn reload(&mut self) -> Result<(), HostError> {
        self.reloads += 1;
        Ok(())
    }
}

/// Emits records as HTTP response header lines: one `Set-Cookie` per record
/// and a `Refresh: 0` for the reload.
#[derive(Debug)]
pub struct WriterHost<W: Write> {
    writer: W,
}

impl<W: Write> WriterHost<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CredentialHost for WriterHost<W> {
    fn persist(&mut self, record: &CredentialRecord) -> Result<(), HostError> {
        writeln!(self.writer, "Set-Cookie: {record}")?;
        Ok(())
    }

    fn reload(&mut self) -> Result<(), HostError> {
        writeln!(self.writer, "Refresh: 0")?;
        self.writer.flush()?;
        Ok(())
    }
}
