// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Spotlight line placement.
//!
//! The profile README stays under the user's control except for exactly one
//! line, located by a fixed leading marker string. Plumage owns everything
//! after the marker on that line and nothing else.
//!
//! # Marker Discipline
//!
//! The marker must appear on exactly one line of the document. A document
//! with no marker has nowhere to put the fragment, and a document with the
//! marker on several lines gives no way to tell which one is meant. Both
//! cases surface as typed errors rather than silently picking a line,
//! since a wrong pick would clobber content the user wrote by hand.
//!
//! # Idempotence
//!
//! [`SpotlightFile::apply`] compares the marked line byte-for-byte before
//! touching the file. An unchanged fragment leaves the document untouched
//! on disk, and the caller learns whether anything happened from the
//! returned flag. All other lines pass through the rewrite verbatim.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs::{read_to_string, write},
    path::PathBuf,
};
use tracing::debug;

/// Default leading marker for the spotlight line.
pub const DEFAULT_MARKER: &str = "🔭 Recently hacking on:";

/// Handle on the README file that carries the spotlight line.
#[derive(Debug, Clone)]
pub struct SpotlightFile {
    path: PathBuf,
}

impl SpotlightFile {
    /// Construct new spotlight file handle.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Place the fragment on the marked line, if it differs.
    ///
    /// Reads the document, swaps the fragment into the marked line, and
    /// writes the document back only when that line actually changed.
    /// Returns whether a write happened.
    ///
    /// # Errors
    ///
    /// - Return [`Error::ReadDocument`] if the document cannot be read.
    /// - Return [`Error::MissingMarker`] if no line carries the marker.
    /// - Return [`Error::AmbiguousMarker`] if several lines carry the marker.
    /// - Return [`Error::WriteDocument`] if the document cannot be written.
    pub fn apply(&self, marker: &str, fragment: &str) -> Result<bool> {
        let content = read_to_string(&self.path).map_err(|err| Error::ReadDocument {
            source: err,
            path: self.path.clone(),
        })?;

        let mut document = Document::from(content.as_str());
        if !document.set_fragment(marker, fragment)? {
            debug!("spotlight line already up to date in {:?}", self.path);
            return Ok(false);
        }

        write(&self.path, document.to_string().as_bytes()).map_err(|err| {
            Error::WriteDocument {
                source: err,
                path: self.path.clone(),
            }
        })?;

        Ok(true)
    }
}

/// Line-oriented view of a README document.
///
/// # Invariant
///
/// - Lines other than the marked one come back out byte-for-byte.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Place the fragment on the marked line.
    ///
    /// The marked line becomes `{marker} {fragment}`. Returns whether the
    /// line differs from what was already there.
    ///
    /// # Errors
    ///
    /// - Return [`Error::MissingMarker`] if no line carries the marker.
    /// - Return [`Error::AmbiguousMarker`] if several lines carry the marker.
    pub fn set_fragment(&mut self, marker: &str, fragment: &str) -> Result<bool> {
        let index = self.marker_line(marker)?;
        let line = format!("{marker} {fragment}");
        if self.lines[index] == line {
            return Ok(false);
        }

        self.lines[index] = line;
        Ok(true)
    }

    fn marker_line(&self, marker: &str) -> Result<usize> {
        let hits: Vec<usize> = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.starts_with(marker))
            .map(|(index, _)| index)
            .collect();

        match hits.as_slice() {
            [] => Err(Error::MissingMarker {
                marker: marker.to_string(),
            }),
            [index] => Ok(*index),
            _ => Err(Error::AmbiguousMarker {
                marker: marker.to_string(),
                count: hits.len(),
            }),
        }
    }
}

impl Display for Document {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.lines.join("\n").as_str())
    }
}

impl From<String> for Document {
    fn from(content: String) -> Self {
        Document::from(content.as_str())
    }
}

impl From<&str> for Document {
    fn from(content: &str) -> Self {
        Self {
            lines: content.split('\n').map(str::to_owned).collect(),
        }
    }
}

/// Spotlight placement error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// README document cannot be read from.
    #[error("failed to read document at {:?}", path.display())]
    ReadDocument {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// README document cannot be written to.
    #[error("failed to write document at {:?}", path.display())]
    WriteDocument {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// No line carries the marker.
    #[error("marker {marker:?} missing from document")]
    MissingMarker { marker: String },

    /// Several lines carry the marker.
    #[error("marker {marker:?} found on {count} lines, expected exactly one")]
    AmbiguousMarker { marker: String, count: usize },
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;
