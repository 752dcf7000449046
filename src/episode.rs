//! Episode descriptors: which recording to plot and how to title it.

use crate::error::{Result, VizError};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Activity labels the collar classifier is trained on
pub const ACTIVITY_LABELS: [&str; 7] = [
    "car", "leisure", "play", "run_jog", "seizure", "sleep", "walk",
];

/// A recording file paired with the title shown above its figure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpisodeDescriptor {
    pub path: PathBuf,
    pub title: String,
}

impl EpisodeDescriptor {
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
        }
    }

    /// Resolve the recording path against a data directory.
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, data_dir: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            data_dir.join(&self.path)
        }
    }

    /// Whether the title is one of the collar's activity labels
    pub fn has_activity_label(&self) -> bool {
        ACTIVITY_LABELS.contains(&self.title.as_str())
    }

    pub fn recording_info(&self) -> Option<RecordingInfo> {
        RecordingInfo::from_path(&self.path)
    }
}

/// The three reference episodes, in display order
pub fn default_episodes() -> Vec<EpisodeDescriptor> {
    vec![
        EpisodeDescriptor::new("play/01-27-2021_07-26-19_bd5ac749_Bernie.csv", "play"),
        EpisodeDescriptor::new("sleep/02-28-2021_22-03-28_7aa60c8f_Molly.csv", "sleep"),
        EpisodeDescriptor::new("seizure/02-02-2021_14-50-33_bd5ac749_Mabel.csv", "seizure"),
    ]
}

/// Load episode descriptors from a JSON manifest.
///
/// The manifest is an array of `{ "path": ..., "title": ... }` objects and
/// must list at least one episode.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<EpisodeDescriptor>> {
    let path = path.as_ref();
    let manifest_err = |reason: String| VizError::Manifest {
        path: path.to_path_buf(),
        reason,
    };

    let text = fs::read_to_string(path).map_err(|e| manifest_err(e.to_string()))?;
    let episodes: Vec<EpisodeDescriptor> =
        serde_json::from_str(&text).map_err(|e| manifest_err(e.to_string()))?;

    if episodes.is_empty() {
        return Err(manifest_err("no episodes listed".to_string()));
    }
    if let Some(blank) = episodes.iter().position(|e| e.path.as_os_str().is_empty()) {
        return Err(manifest_err(format!("episode {} has an empty path", blank + 1)));
    }

    Ok(episodes)
}

/// Metadata encoded in collar recording file names:
/// `MM-DD-YYYY_HH-MM-SS_<device>_<subject>.csv`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingInfo {
    pub started_at: NaiveDateTime,
    pub device_id: String,
    pub subject: String,
}

impl RecordingInfo {
    /// Parse recording metadata from a file name; `None` if it doesn't follow the scheme
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let mut parts = stem.splitn(4, '_');
        let date = parts.next()?;
        let time = parts.next()?;
        let device_id = parts.next()?;
        let subject = parts.next()?;

        if device_id.is_empty() || subject.is_empty() {
            return None;
        }

        let started_at =
            NaiveDateTime::parse_from_str(&format!("{date}_{time}"), "%m-%d-%Y_%H-%M-%S").ok()?;

        Some(Self {
            started_at,
            device_id: device_id.to_string(),
            subject: subject.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use std::io::Write;

    #[test]
    fn default_episodes_are_play_sleep_seizure() {
        let episodes = default_episodes();
        let titles: Vec<&str> = episodes.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["play", "sleep", "seizure"]);
        assert_eq!(
            episodes[1].path,
            PathBuf::from("sleep/02-28-2021_22-03-28_7aa60c8f_Molly.csv")
        );
        assert!(episodes.iter().all(|e| e.has_activity_label()));
    }

    #[test]
    fn resolve_joins_relative_paths_only() {
        let rel = EpisodeDescriptor::new("play/a.csv", "play");
        assert_eq!(rel.resolve(Path::new("/data")), PathBuf::from("/data/play/a.csv"));

        let abs = EpisodeDescriptor::new("/tmp/b.csv", "walk");
        assert_eq!(abs.resolve(Path::new("/data")), PathBuf::from("/tmp/b.csv"));
    }

    #[test]
    fn parses_recording_info_from_file_name() {
        let info = default_episodes()[0].recording_info().unwrap();
        assert_eq!(info.device_id, "bd5ac749");
        assert_eq!(info.subject, "Bernie");
        assert_eq!(info.started_at.date(), NaiveDate::from_ymd_opt(2021, 1, 27).unwrap());
        assert_eq!(info.started_at.hour(), 7);
        assert_eq!(info.started_at.minute(), 26);
        assert_eq!(info.started_at.second(), 19);
    }

    #[test]
    fn unconventional_file_names_have_no_recording_info() {
        assert!(RecordingInfo::from_path(Path::new("data.csv")).is_none());
        assert!(RecordingInfo::from_path(Path::new("13-45-2021_07-26-19_dev_Rex.csv")).is_none());
        assert!(RecordingInfo::from_path(Path::new("01-27-2021_07-26-19_dev.csv")).is_none());
    }

    #[test]
    fn loads_manifest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"path": "walk/w.csv", "title": "walk"}}, {{"path": "x.csv", "title": "custom"}}]"#
        )
        .unwrap();

        let episodes = load_manifest(file.path()).unwrap();
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0], EpisodeDescriptor::new("walk/w.csv", "walk"));
        assert!(!episodes[1].has_activity_label());
    }

    #[test]
    fn rejects_empty_or_malformed_manifest() {
        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, "[]").unwrap();
        assert!(matches!(load_manifest(empty.path()), Err(VizError::Manifest { .. })));

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, r#"[{{"path": "a.csv"}}]"#).unwrap();
        assert!(matches!(load_manifest(broken.path()), Err(VizError::Manifest { .. })));

        assert!(matches!(
            load_manifest("/definitely/not/here.json"),
            Err(VizError::Manifest { .. })
        ));
    }
}
