//! Attachment validation and sandbox-bypass staging.
//!
//! Messages.app can only read attachments from a handful of locations when it
//! is driven through AppleScript. Anything outside those locations is copied
//! into a staging directory (by default `~/Pictures`) for the duration of the
//! send and removed afterwards.
//!
//! CHANGELOG:
//! - 02/14/2026 - Staged copies are released through `StagedAttachments`
//! - 02/12/2026 - Initial implementation

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::debug;

use crate::error::{ImsgError, Result};
use crate::paths::{expand_home, resolve_absolute, temp_name_parts};

const MIB: f64 = 1024.0 * 1024.0;

/// Directory segments Messages.app is known to read from.
pub const DEFAULT_ALLOWED_SEGMENTS: &[&str] = &["Pictures", "Downloads", "Documents"];

/// Which attachment locations the scripting sandbox can read directly.
///
/// A path is readable when it contains `/<segment>/` for any allowed segment.
/// Everything else gets staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxPolicy {
    allowed_segments: Vec<String>,
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_SEGMENTS.iter().copied())
    }
}

impl SandboxPolicy {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.trim().is_empty())
                .collect(),
        }
    }

    pub fn allowed_segments(&self) -> &[String] {
        &self.allowed_segments
    }

    /// True when `path` is outside every allowed segment.
    pub fn needs_staging(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        let sep = std::path::MAIN_SEPARATOR;
        !self
            .allowed_segments
            .iter()
            .any(|segment| path.contains(&format!("{sep}{segment}{sep}")))
    }
}

/// A validated attachment ready to be referenced from a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentInfo {
    pub path: PathBuf,
    /// Seconds to wait after sending, so Messages.app can finish the upload.
    pub delay_seconds: u32,
}

/// Upload wait for an attachment of `size_bytes`.
pub fn delay_seconds_for_size(size_bytes: u64) -> u32 {
    let size_mb = size_bytes as f64 / MIB;
    if size_mb < 1.0 {
        2
    } else if size_mb < 10.0 {
        3
    } else {
        5
    }
}

/// A temporary copy of an attachment inside the staging directory.
///
/// The file is removed when this is released or dropped.
#[derive(Debug)]
pub struct StagedCopy {
    source: PathBuf,
    temp: TempPath,
}

impl StagedCopy {
    pub fn path(&self) -> &Path {
        &self.temp
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    fn release(self) -> io::Result<()> {
        self.temp.close()
    }
}

/// Attachments for one send plus the staged copies they depend on.
///
/// Copies are released in staging order, either explicitly through
/// [`StagedAttachments::cleanup`] or silently on drop.
#[derive(Debug, Default)]
pub struct StagedAttachments {
    attachments: Vec<AttachmentInfo>,
    copies: Vec<StagedCopy>,
}

impl StagedAttachments {
    pub fn attachments(&self) -> &[AttachmentInfo] {
        &self.attachments
    }

    pub fn copies(&self) -> &[StagedCopy] {
        &self.copies
    }

    /// Remove every staged copy. Failures are logged in debug mode, never returned.
    pub fn cleanup(self, debug: bool) {
        for copy in self.copies {
            let path = copy.path().to_path_buf();
            if let Err(e) = copy.release() {
                if debug {
                    debug!(path = %path.display(), error = %e, "imsg: cleanup failed");
                }
            }
        }
    }
}

/// Validates attachment paths and stages the ones the sandbox can't read.
#[derive(Debug, Clone, Default)]
pub struct AttachmentStager {
    policy: SandboxPolicy,
    staging_dir: Option<PathBuf>,
}

impl AttachmentStager {
    /// `staging_dir` of `None` means `~/Pictures`.
    pub fn new(policy: SandboxPolicy, staging_dir: Option<PathBuf>) -> Self {
        Self {
            policy,
            staging_dir,
        }
    }

    /// Validate and, where needed, stage every path in order.
    ///
    /// On error, copies staged for earlier paths are removed before returning.
    pub fn stage(&self, paths: &[String]) -> Result<StagedAttachments> {
        let mut staged = StagedAttachments {
            attachments: Vec::with_capacity(paths.len()),
            copies: Vec::new(),
        };

        for raw in paths {
            let info = self.stage_one(raw, &mut staged.copies)?;
            staged.attachments.push(info);
        }

        Ok(staged)
    }

    fn stage_one(&self, raw: &str, copies: &mut Vec<StagedCopy>) -> Result<AttachmentInfo> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ImsgError::AttachmentPathEmpty);
        }

        let expanded = expand_home(trimmed)?;
        let absolute = resolve_absolute(&expanded)?;

        let metadata =
            fs::metadata(&absolute).map_err(|e| ImsgError::io("attachment", &absolute, e))?;
        if metadata.is_dir() {
            return Err(ImsgError::AttachmentIsDirectory { path: absolute });
        }

        let delay_seconds = delay_seconds_for_size(metadata.len());

        let path = if self.policy.needs_staging(&absolute) {
            let copy = self.copy_to_staging(&absolute)?;
            let staged_path = copy.path().to_path_buf();
            copies.push(copy);
            staged_path
        } else {
            absolute
        };

        Ok(AttachmentInfo {
            path,
            delay_seconds,
        })
    }

    fn staging_dir(&self) -> Result<PathBuf> {
        match &self.staging_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::home_dir()
                .map(|home| home.join("Pictures"))
                .ok_or(ImsgError::HomeDirUnavailable),
        }
    }

    fn copy_to_staging(&self, source: &Path) -> Result<StagedCopy> {
        let dir = self.staging_dir()?;
        ensure_private_dir(&dir)?;

        let (prefix, suffix) = temp_name_parts(source);
        let mut temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(&dir)
            .map_err(|e| ImsgError::io("create temp attachment in", &dir, e))?;

        let mut reader =
            File::open(source).map_err(|e| ImsgError::io("open attachment", source, e))?;
        io::copy(&mut reader, temp.as_file_mut())
            .map_err(|e| ImsgError::io("copy attachment", source, e))?;

        restrict_to_owner(temp.path())?;

        let temp = temp.into_temp_path();
        debug!(
            source = %source.display(),
            staged = %temp.display(),
            "imsg: staged attachment outside sandbox"
        );

        Ok(StagedCopy {
            source: source.to_path_buf(),
            temp,
        })
    }
}

#[cfg(unix)]
fn ensure_private_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
        .map_err(|e| ImsgError::io("ensure staging directory", dir, e))
}

#[cfg(not(unix))]
fn ensure_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| ImsgError::io("ensure staging directory", dir, e))
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| ImsgError::io("secure temp attachment", path, e))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> Result<()> {
    Ok(())
}
