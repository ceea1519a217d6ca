//! File-backed claim store.
//!
//! One text file holds one claim per line. Reads parse the whole file;
//! creates append a single line; updates and deletes read the whole file,
//! transform it, and replace it atomically (temp file + rename). Every
//! operation runs under the store's lock, so a single `ClaimStore` never
//! interleaves two read-modify-write cycles.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::Mutex;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::codec::LineCodec;
use crate::config::{IdStrategy, StoreConfig};
use crate::error::{Result, StoreError};
use crate::traits::ClaimLog;
use crate::types::{Claim, ClaimFields, ClaimId};

/// A claim store backed by a single append-and-rewrite text file.
#[derive(Debug)]
pub struct ClaimStore {
    config: StoreConfig,
    codec: Box<dyn LineCodec>,
    /// Serializes every access to the file.
    lock: Mutex<()>,
}

impl ClaimStore {
    /// Creates a store from a validated configuration.
    ///
    /// The file is not touched until the first operation; a missing file is
    /// an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        info!(
            path = %config.path.display(),
            format = %config.format,
            id_strategy = %config.id_strategy,
            "opening claim store"
        );
        Ok(Self {
            codec: config.format.codec(),
            config,
            lock: Mutex::new(()),
        })
    }

    /// Creates a store for the given file with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::new(StoreConfig::new(path))
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the store file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Reads and parses every claim in file order.
    ///
    /// Lines that do not decode, including lines that are not valid UTF-8,
    /// are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn list(&self) -> Result<Vec<Claim>> {
        let _guard = self.lock.lock();
        Ok(self
            .read_content()?
            .map(|content| self.parse_content(&content))
            .unwrap_or_default())
    }

    /// Returns the first claim with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn get(&self, id: ClaimId) -> Result<Option<Claim>> {
        Ok(self.list()?.into_iter().find(|claim| claim.id == id))
    }

    /// Appends a new claim with a freshly assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for missing or unencodable fields,
    /// or an I/O error if the append fails.
    pub fn append(&self, fields: ClaimFields) -> Result<Claim> {
        fields.validate()?;

        let _guard = self.lock.lock();
        let claim = Claim::new(self.next_id()?, fields);
        let line = self.codec.encode(&claim, Utc::now())?;

        self.ensure_parent_dir()?;
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.config.path)?;

        let mut buf = String::with_capacity(line.len() + 2);
        if Self::missing_final_newline(&mut file)? {
            buf.push('\n');
        }
        buf.push_str(&line);
        buf.push('\n');

        file.write_all(buf.as_bytes())?;
        file.flush()?;

        debug!(id = %claim.id, path = %self.config.path.display(), "appended claim");
        Ok(claim)
    }

    /// Rewrites the first line holding `id` with new fields and a fresh
    /// timestamp. Every other line is written back unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the file is absent or no line has
    /// the id; the file is not written in that case.
    pub fn update_by_id(&self, id: ClaimId, fields: ClaimFields) -> Result<Claim> {
        fields.validate()?;

        let _guard = self.lock.lock();
        let content = self.read_content()?.ok_or(StoreError::NotFound(id))?;
        let lines: Vec<&[u8]> = split_lines(&content).collect();

        let position = lines
            .iter()
            .position(|raw| self.line_has_id(raw, id))
            .ok_or(StoreError::NotFound(id))?;

        let claim = Claim::new(id, fields);
        let mut replacement = self.codec.encode(&claim, Utc::now())?;
        replacement.push('\n');

        let rewritten = lines
            .iter()
            .enumerate()
            .map(|(i, raw)| if i == position { replacement.as_bytes() } else { *raw });
        self.rewrite(rewritten)?;

        debug!(%id, line = position + 1, "updated claim");
        Ok(claim)
    }

    /// Removes every line holding `id` and rewrites the rest.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the file is absent or no line has
    /// the id; the file is not written in that case.
    pub fn delete_by_id(&self, id: ClaimId) -> Result<()> {
        let _guard = self.lock.lock();
        let content = self.read_content()?.ok_or(StoreError::NotFound(id))?;

        let total = split_lines(&content).count();
        let kept: Vec<&[u8]> = split_lines(&content)
            .filter(|raw| !self.line_has_id(raw, id))
            .collect();

        if kept.len() == total {
            return Err(StoreError::NotFound(id));
        }

        self.rewrite(kept.iter().copied())?;

        debug!(%id, removed = total - kept.len(), "deleted claim");
        Ok(())
    }

    // ========== Internal Methods ==========

    /// Reads the whole file as bytes. `None` means the file does not exist.
    fn read_content(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.config.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn parse_content(&self, content: &[u8]) -> Vec<Claim> {
        let mut claims = Vec::new();
        for (index, raw) in split_lines(content).enumerate() {
            let text = line_text(raw);
            if text.is_some_and(|line| line.trim().is_empty()) {
                continue;
            }
            match text.and_then(|line| self.codec.decode(line)) {
                Some(claim) => claims.push(claim),
                None => warn!(
                    path = %self.config.path.display(),
                    line = index + 1,
                    format = %self.codec.format(),
                    utf8 = text.is_some(),
                    "dropping unparseable claim line"
                ),
            }
        }
        claims
    }

    fn line_has_id(&self, raw: &[u8], id: ClaimId) -> bool {
        line_text(raw)
            .and_then(|line| self.codec.decode(line))
            .is_some_and(|claim| claim.id == id)
    }

    /// Must be called with the lock held.
    fn next_id(&self) -> Result<ClaimId> {
        match self.config.id_strategy {
            IdStrategy::Random => Ok(ClaimId(
                rand::thread_rng().gen_range(0..self.config.id_range),
            )),
            IdStrategy::Sequential => {
                let highest = self
                    .read_content()?
                    .map(|content| self.parse_content(&content))
                    .unwrap_or_default()
                    .iter()
                    .map(|claim| claim.id)
                    .max();
                Ok(highest.map_or(ClaimId(0), |id| ClaimId(id.0.saturating_add(1))))
            }
        }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// True when the file is non-empty and its last byte is not `\n`.
    fn missing_final_newline(file: &mut File) -> Result<bool> {
        if file.metadata()?.len() == 0 {
            return Ok(false);
        }
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.config.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Replaces the file with `lines`, written back as read. A final line
    /// without a terminator gets a `\n`.
    fn rewrite<'a>(&self, lines: impl Iterator<Item = &'a [u8]>) -> Result<()> {
        let tmp = self.temp_path();
        let result = Self::write_lines(&tmp, lines)
            .and_then(|()| fs::rename(&tmp, &self.config.path).map_err(StoreError::from));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    fn write_lines<'a>(path: &Path, lines: impl Iterator<Item = &'a [u8]>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for raw in lines {
            writer.write_all(raw)?;
            if !raw.ends_with(b"\n") {
                writer.write_all(b"\n")?;
            }
        }
        let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.sync_all()?;
        Ok(())
    }
}

/// Splits file content into raw lines, each keeping its terminator.
fn split_lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    content.split_inclusive(|&byte| byte == b'\n')
}

/// The text of a raw line without `\n` or `\r\n`. `None` for invalid UTF-8.
fn line_text(raw: &[u8]) -> Option<&str> {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    std::str::from_utf8(line).ok()
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl ClaimLog for ClaimStore {
    fn list(&self) -> Result<Vec<Claim>> {
        ClaimStore::list(self)
    }

    fn get(&self, id: ClaimId) -> Result<Option<Claim>> {
        ClaimStore::get(self, id)
    }

    fn append(&self, fields: ClaimFields) -> Result<Claim> {
        ClaimStore::append(self, fields)
    }

    fn update_by_id(&self, id: ClaimId, fields: ClaimFields) -> Result<Claim> {
        ClaimStore::update_by_id(self, id, fields)
    }

    fn delete_by_id(&self, id: ClaimId) -> Result<()> {
        ClaimStore::delete_by_id(self, id)
    }
}
