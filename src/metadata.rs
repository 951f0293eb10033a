//! Metadata describing where a generated project came from.

use crate::constants::METADATA_FILE;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Short name of the template, taken from its directory name.
    pub tag: String,
    /// Where the template was read from.
    pub repository: String,
    /// When the template (or the generated project) was created, if known.
    pub created: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Describes the template rooted at `root`, which must be absolute.
    ///
    /// `created` is the directory's birth time on platforms that record one.
    pub fn for_template<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let stat = std::fs::metadata(root).map_err(|e| Error::path("stat", root, e))?;
        let tag = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            tag,
            repository: root.display().to_string(),
            created: stat.created().ok().map(DateTime::<Utc>::from),
        })
    }
}

/// Writes `metadata` into `dir`, stamped with the current time.
///
/// # Returns
/// * `Result<PathBuf>` - Path of the written metadata file
pub fn persist<P: AsRef<Path>>(dir: P, metadata: &Metadata) -> Result<PathBuf> {
    let path = dir.as_ref().join(METADATA_FILE);
    let record = Metadata { created: Some(Utc::now()), ..metadata.clone() };

    debug!("Writing metadata to {}", path.display());
    let file = File::create(&path).map_err(|e| Error::path("create", &path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &record)
        .map_err(|e| Error::path("write", &path, e.into()))?;
    writer.flush().map_err(|e| Error::path("write", &path, e))?;
    Ok(path)
}

/// Reads back a metadata record written by [`persist`].
pub fn read<P: AsRef<Path>>(dir: P) -> Result<Metadata> {
    let path = dir.as_ref().join(METADATA_FILE);
    let content = std::fs::read_to_string(&path).map_err(|e| Error::path("read", &path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::path("parse", &path, e.into()))
}
