//! Delivery of finished PDF bytes.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{ReportError, Result};

/// Where a finished document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Save to this file
    Download(PathBuf),
    /// Hand the bytes back for inline viewing; nothing is written
    Preview,
}

#[derive(Debug)]
pub enum Output {
    Saved(PathBuf),
    Preview(PreviewStream),
}

/// In-memory PDF ready to be shown.
#[derive(Clone, PartialEq, Eq)]
pub struct PreviewStream {
    bytes: Vec<u8>,
}

impl PreviewStream {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// `data:application/pdf;base64,...`, openable by a browser.
    pub fn to_data_url(&self) -> String {
        format!("data:application/pdf;base64,{}", STANDARD.encode(&self.bytes))
    }
}

impl std::fmt::Debug for PreviewStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewStream")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Sends `bytes` to `target`.
pub fn deliver(bytes: Vec<u8>, target: &OutputTarget) -> Result<Output> {
    match target {
        OutputTarget::Download(path) => {
            save_file(&bytes, path)?;
            log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
            Ok(Output::Saved(path.clone()))
        }
        OutputTarget::Preview => Ok(Output::Preview(PreviewStream { bytes })),
    }
}

/// Writes through a sibling `.part` file and renames it into place, so a
/// failed save never leaves a truncated document behind.
fn save_file(bytes: &[u8], path: &Path) -> Result<()> {
    let mut part_name = path.file_name().map(|n| n.to_os_string()).ok_or_else(|| {
        ReportError::DeliveryError(format!("{}: not a file path", path.display()))
    })?;
    part_name.push(".part");
    let part = path.with_file_name(part_name);

    let written = write_file(bytes, &part).and_then(|()| fs::rename(&part, path));
    if let Err(e) = written {
        fs::remove_file(&part).ok();
        return Err(ReportError::DeliveryError(format!("{}: {}", path.display(), e)));
    }
    Ok(())
}

fn write_file(bytes: &[u8], path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}
