//! Path helpers: `~` expansion, absolute resolution, and safe temp file names.
//!
//! CHANGELOG:
//! - 02/15/2026 - resolve_absolute drops `.`/`..` segments before the sandbox check
//! - 02/12/2026 - Initial implementation

use std::path::{Component, Path, PathBuf};

use crate::error::{ImsgError, Result};

const TEMP_PREFIX: &str = "imsg_temp_";
const MAX_BASE_LEN: usize = 60;
const MAX_EXT_LEN: usize = 10;

/// Expand a leading `~` or `~/` to the user's home directory.
///
/// `~user/...` forms are rejected rather than guessed at.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    expand_home_with(path, dirs::home_dir)
}

fn expand_home_with(path: &str, home: impl FnOnce() -> Option<PathBuf>) -> Result<PathBuf> {
    if path == "~" || path.starts_with("~/") {
        let home = home().ok_or(ImsgError::HomeDirUnavailable)?;
        return Ok(match path.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => home,
        });
    }

    if path.starts_with('~') {
        return Err(ImsgError::UnsupportedTildePath {
            path: path.to_string(),
        });
    }

    Ok(PathBuf::from(path))
}

/// Make `path` absolute against the current working directory, with `.` and
/// `..` removed lexically.
///
/// Sandbox checks look at path segments, so `Downloads/../Desktop/x.png` has
/// to be seen as `Desktop/x.png`.
pub fn resolve_absolute(path: &Path) -> Result<PathBuf> {
    let absolute =
        std::path::absolute(path).map_err(|e| ImsgError::io("resolve attachment", path, e))?;
    Ok(clean(&absolute))
}

fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            // Popping at the root is a no-op, so `/..` stays `/`.
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`, keeping at most
/// `max_len` characters.
///
/// Only for file names. Script content goes through
/// [`crate::applescript::escape_applescript_string`].
pub fn sanitize_segment(value: &str, max_len: usize) -> String {
    value
        .chars()
        .take(max_len)
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}

/// Prefix and suffix for a staged copy of `path`.
///
/// `holiday photo.JPG` becomes `("imsg_temp_holiday_photo_", ".JPG")`; the
/// random part goes between them.
pub fn temp_name_parts(path: &Path) -> (String, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (base, ext) = match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name.as_str(), ""),
    };

    let safe_base = sanitize_segment(base, MAX_BASE_LEN);
    let mut safe_ext = sanitize_segment(ext, MAX_EXT_LEN);
    if safe_ext == "." {
        safe_ext.clear();
    }

    let prefix = if safe_base.is_empty() {
        TEMP_PREFIX.to_string()
    } else {
        format!("{}{}_", TEMP_PREFIX, safe_base)
    };

    (prefix, safe_ext)
}
