use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context as _;

use crate::foundation::error::LapseResult;

/// A save file on disk and the timestamp used to order it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEntry {
    pub path: PathBuf,
    pub created: SystemTime,
}

impl SaveEntry {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// List `*.json` files (case-insensitive) in `dir`, oldest first.
///
/// Files are ordered by creation time; platforms without creation times use modification time.
/// Equal timestamps are ordered by file name.
pub fn discover_saves(dir: &Path) -> LapseResult<Vec<SaveEntry>> {
    let rd = std::fs::read_dir(dir)
        .with_context(|| format!("read save folder '{}'", dir.display()))?;

    let mut out = Vec::new();
    for entry in rd {
        let entry = entry.with_context(|| format!("list save folder '{}'", dir.display()))?;
        let path = entry.path();
        if !is_json(&path) {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            tracing::warn!(path = %path.display(), "skipping save without readable metadata");
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let created = meta
            .created()
            .or_else(|_| meta.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        out.push(SaveEntry { path, created });
    }

    out.sort_by(|a, b| {
        a.created
            .cmp(&b.created)
            .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
    });
    Ok(out)
}

/// Newest save in `dir`, if any.
pub fn newest_save(dir: &Path) -> LapseResult<Option<SaveEntry>> {
    Ok(discover_saves(dir)?.pop())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
#[path = "../../tests/unit/save/discover.rs"]
mod tests;
