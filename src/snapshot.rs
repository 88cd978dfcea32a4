//! Audit snapshot of the template artifacts used for a generation run.
//!
//! Nothing in here returns an error: a snapshot that cannot be written is
//! logged and generation carries on.

use chrono::Local;
use log::{debug, error, info, warn};
use once_cell::sync::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

const SNAPSHOT_FILES: [(&str, &str); 4] = [
    ("template.pptx", "PowerPoint template"),
    ("template.crtx", "Chart template"),
    ("style.yaml", "Style configuration"),
    ("TEMPLATE.md", "Layout documentation"),
];

const TIMESTAMP_FILE: &str = "timestamp.txt";
const TIMESTAMP_PREFIX: &str = "Generation Timestamp: ";

static SNAPSHOT_TAKEN: OnceCell<()> = OnceCell::new();

/// `<project>/powerpoint/processing/snapshot`
pub fn snapshot_dir(project_dir: &Path) -> PathBuf {
    project_dir.join("powerpoint").join("processing").join("snapshot")
}

/// Copies the master template files into the project's snapshot directory and
/// writes `timestamp.txt`. Missing sources are skipped with a warning.
pub fn create_generation_snapshot(project_dir: &Path, master_dir: &Path) {
    let target = snapshot_dir(project_dir);
    if let Err(e) = fs::create_dir_all(&target) {
        warn!("Failed to create snapshot directory {}: {e}", target.display());
        return;
    }
    info!("Creating generation snapshot in {}", target.display());

    for (file_name, description) in SNAPSHOT_FILES {
        let source = master_dir.join(file_name);
        if !source.is_file() {
            warn!("{description} not found: {}", source.display());
            continue;
        }
        match fs::copy(&source, target.join(file_name)) {
            Ok(_) => debug!("Copied {description}: {file_name}"),
            Err(e) => error!("Failed to copy {file_name}: {e}"),
        }
    }

    let stamp = format!(
        "{TIMESTAMP_PREFIX}{}\nTemplates Path: {}\nProject Directory: {}\n",
        Local::now().to_rfc3339(),
        master_dir.display(),
        project_dir.display()
    );
    match fs::write(target.join(TIMESTAMP_FILE), stamp) {
        Ok(()) => info!("Generation snapshot created"),
        Err(e) => error!("Failed to create timestamp file: {e}"),
    }
}

/// Runs [`create_generation_snapshot`] at most once per process.
pub(crate) fn ensure_generation_snapshot(project_dir: &Path, master_dir: &Path) {
    SNAPSHOT_TAKEN.get_or_init(|| create_generation_snapshot(project_dir, master_dir));
}

/// What a previous run left in the snapshot directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotInfo {
    pub path: PathBuf,
    /// RFC 3339 timestamp from `timestamp.txt`, if readable.
    pub timestamp: Option<String>,
    pub files: Vec<String>,
}

/// `None` if the project has no snapshot directory.
pub fn snapshot_info(project_dir: &Path) -> Option<SnapshotInfo> {
    let path = snapshot_dir(project_dir);
    let entries = fs::read_dir(&path).ok()?;

    let mut files: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    files.sort();

    let timestamp = fs::read_to_string(path.join(TIMESTAMP_FILE))
        .ok()
        .and_then(|text| text.lines().next().and_then(|line| line.strip_prefix(TIMESTAMP_PREFIX)).map(str::to_string));

    Some(SnapshotInfo { path, timestamp, files })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_copies_available_files() {
        let master = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        fs::write(master.path().join("style.yaml"), "colors: {}\n").unwrap();
        fs::write(master.path().join("template.crtx"), b"zip").unwrap();

        assert!(snapshot_info(project.path()).is_none());
        create_generation_snapshot(project.path(), master.path());

        let info = snapshot_info(project.path()).unwrap();
        assert_eq!(info.files, vec!["style.yaml", "template.crtx", "timestamp.txt"]);
        assert!(info.timestamp.is_some_and(|t| chrono::DateTime::parse_from_rfc3339(&t).is_ok()));
    }

    #[test]
    fn test_unwritable_project_is_swallowed() {
        let master = tempfile::tempdir().unwrap();
        let blocker = tempfile::NamedTempFile::new().unwrap();
        // the project "directory" is a regular file, so create_dir_all fails
        create_generation_snapshot(blocker.path(), master.path());
        assert!(snapshot_info(blocker.path()).is_none());
    }
}
