//! Brush library scanning.
//!
//! A brush directory holds one subdirectory per group, each containing
//! `.myb` brush definitions, optional `<name>_prev.png` previews, and an
//! optional `order.conf` naming brushes one per line. Definitions are
//! never parsed here; paths are handed to [`PaintContext::load_brush`]
//! as-is.
//!
//! [`PaintContext::load_brush`]: crate::context::PaintContext::load_brush

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BRUSH_EXTENSION: &str = "myb";
pub const ORDER_FILE: &str = "order.conf";
pub const PREVIEW_SUFFIX: &str = "_prev.png";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a brush directory: {0}")]
    NotADirectory(PathBuf),
}

/// One selectable brush definition on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushInfo {
    pub name: String,
    pub path: PathBuf,
    pub preview: Option<PathBuf>,
}

/// A named group of brushes (one subdirectory)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushGroup {
    pub name: String,
    pub brushes: Vec<BrushInfo>,
}

pub struct BrushLibrary;

impl BrushLibrary {
    /// Scan `dir` for brush groups, sorted by group name.
    ///
    /// Groups with an `order.conf` list brushes in file order; entries
    /// naming a missing brush are skipped with a warning. Groups without
    /// one fall back to sorted directory order.
    pub fn scan(dir: &Path) -> Result<Vec<BrushGroup>, LibraryError> {
        if !dir.is_dir() {
            return Err(LibraryError::NotADirectory(dir.to_path_buf()));
        }

        let mut groups = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let group_dir = entry.path();
            if !group_dir.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let brushes = Self::scan_group(&group_dir)?;
            if brushes.is_empty() {
                continue;
            }
            groups.push(BrushGroup { name, brushes });
        }

        groups.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::info!(
            path = %dir.display(),
            groups = groups.len(),
            "brush library scanned"
        );
        Ok(groups)
    }

    fn scan_group(group_dir: &Path) -> Result<Vec<BrushInfo>, LibraryError> {
        let names = match Self::read_order_file(&group_dir.join(ORDER_FILE)) {
            Some(ordered) => ordered,
            None => {
                let mut names = Vec::new();
                for entry in std::fs::read_dir(group_dir)? {
                    let path = entry?.path();
                    if path.extension().and_then(|e| e.to_str()) == Some(BRUSH_EXTENSION) {
                        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                            names.push(stem.to_string());
                        }
                    }
                }
                names.sort();
                names
            }
        };

        let mut brushes = Vec::new();
        for name in names {
            let path = group_dir.join(format!("{}.{}", name, BRUSH_EXTENSION));
            if !path.is_file() {
                tracing::warn!(brush = %name, "ordered brush missing on disk, skipping");
                continue;
            }
            let preview = group_dir.join(format!("{}{}", name, PREVIEW_SUFFIX));
            brushes.push(BrushInfo {
                name,
                path,
                preview: preview.is_file().then_some(preview),
            });
        }
        Ok(brushes)
    }

    /// One brush name per line, blank lines and `#` comments skipped
    fn read_order_file(path: &Path) -> Option<Vec<String>> {
        let content = std::fs::read_to_string(path).ok()?;
        Some(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string)
                .collect(),
        )
    }
}
