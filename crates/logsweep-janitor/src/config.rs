//! Configuration for retention runs
//!
//! Turns the raw settings (two age offsets and a list of base paths) into
//! two absolute cutoffs observed from a single "now".

use crate::ConfigError;
use logsweep_domain::Clock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Age offset as written in the configuration file
///
/// All three fields are required. Negative or fractional values are rejected
/// at parse time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeOffset {
    /// Whole days
    pub days: u32,
    /// Whole hours
    pub hours: u32,
    /// Whole minutes
    pub minutes: u32,
}

impl AgeOffset {
    /// Create an offset from its parts
    pub fn new(days: u32, hours: u32, minutes: u32) -> Self {
        Self {
            days,
            hours,
            minutes,
        }
    }

    /// Offset as a Duration
    pub fn as_duration(&self) -> Duration {
        let minutes =
            u64::from(self.days) * 24 * 60 + u64::from(self.hours) * 60 + u64::from(self.minutes);
        Duration::from_secs(minutes * 60)
    }
}

/// Raw retention settings, as loaded from JSON or TOML
///
/// ```json
/// {
///   "zip_dir":  { "days": 1,  "hours": 0, "minutes": 0 },
///   "del_zip":  { "days": 90, "hours": 0, "minutes": 0 },
///   "base_path_list": ["/var/log/app"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionSettings {
    /// Age after which a directory is archived
    pub zip_dir: AgeOffset,

    /// Age after which an archive is deleted
    pub del_zip: AgeOffset,

    /// Directories whose immediate children are managed
    pub base_path_list: Vec<PathBuf>,

    /// Archive file extension, without the dot
    /// A single segment; `tar.gz` style extensions are rejected
    /// Default: "zip"
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,

    /// Dry-run mode: report what would happen without touching anything
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,
}

fn default_archive_extension() -> String {
    "zip".to_string()
}

impl RetentionSettings {
    /// Load settings from a file
    ///
    /// `.toml` files are parsed as TOML, everything else as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }

    /// Parse settings from a JSON document
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Parse settings from a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Resolve into absolute cutoffs relative to `now`
    ///
    /// Both thresholds are derived from the same `now`. Paths are taken as
    /// given; their existence is checked when they are scanned.
    pub fn resolve(&self, now: SystemTime) -> Result<RetentionConfig, ConfigError> {
        let archive_extension = normalize_extension(&self.archive_extension)?;

        let archive_threshold = now
            .checked_sub(self.zip_dir.as_duration())
            .ok_or_else(|| ConfigError::Invalid("zip_dir offset is out of range".to_string()))?;
        let expiry_threshold = now
            .checked_sub(self.del_zip.as_duration())
            .ok_or_else(|| ConfigError::Invalid("del_zip offset is out of range".to_string()))?;

        if self.base_path_list.is_empty() {
            tracing::warn!("base_path_list is empty; nothing will be processed");
        }
        if expiry_threshold > archive_threshold {
            tracing::warn!(
                "del_zip ({:?}) is shorter than zip_dir ({:?}); archives may expire before new ones are written",
                self.del_zip.as_duration(),
                self.zip_dir.as_duration()
            );
        }

        Ok(RetentionConfig {
            archive_threshold,
            expiry_threshold,
            base_paths: self.base_path_list.clone(),
            archive_extension,
            dry_run: self.dry_run,
            resolved_at: now,
        })
    }
}

fn normalize_extension(raw: &str) -> Result<String, ConfigError> {
    let ext = raw.trim().trim_start_matches('.');
    if ext.is_empty() {
        return Err(ConfigError::Invalid("archive_extension must not be empty".to_string()));
    }
    if ext.contains(['/', '\\']) {
        return Err(ConfigError::Invalid(format!(
            "archive_extension must not contain a path separator: {raw}"
        )));
    }
    // Archives are matched on their last extension only
    if ext.contains('.') {
        return Err(ConfigError::Invalid(format!(
            "archive_extension must be a single extension without dots: {raw}"
        )));
    }
    Ok(ext.to_string())
}

/// Resolved configuration for one run
///
/// Immutable once built. The thresholds are a snapshot: they do not move
/// while the run progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Directories modified at or before this instant are archived
    pub archive_threshold: SystemTime,

    /// Archives modified strictly before this instant are deleted
    pub expiry_threshold: SystemTime,

    /// Base directories, in processing order
    pub base_paths: Vec<PathBuf>,

    /// Archive file extension, without the dot
    pub archive_extension: String,

    /// Report without mutating
    pub dry_run: bool,

    /// The single "now" both thresholds were derived from
    pub resolved_at: SystemTime,
}

impl RetentionConfig {
    /// Read, parse and resolve a config file in one step
    pub fn load<P: AsRef<Path>>(path: P, clock: &dyn Clock) -> Result<Self, ConfigError> {
        let settings = RetentionSettings::from_file(path)?;
        settings.resolve(clock.now())
    }

    /// Whether `path` has the configured archive extension (ASCII case-insensitive)
    pub fn is_archive_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.archive_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsweep_domain::FixedClock;
    use std::time::UNIX_EPOCH;

    const SAMPLE_JSON: &str = r#"{
        "zip_dir": { "days": 1, "hours": 2, "minutes": 3 },
        "del_zip": { "days": 90, "hours": 0, "minutes": 0 },
        "base_path_list": ["/var/log/a", "/var/log/b"]
    }"#;

    fn now() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    #[test]
    fn test_parse_json() {
        let settings = RetentionSettings::from_json_str(SAMPLE_JSON).unwrap();
        assert_eq!(settings.zip_dir, AgeOffset::new(1, 2, 3));
        assert_eq!(settings.del_zip, AgeOffset::new(90, 0, 0));
        assert_eq!(settings.base_path_list.len(), 2);
        assert_eq!(settings.archive_extension, "zip");
        assert!(!settings.dry_run);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            base_path_list = ["/srv/logs"]
            archive_extension = ".ZIP"
            dry_run = true

            [zip_dir]
            days = 2
            hours = 0
            minutes = 30

            [del_zip]
            days = 30
            hours = 0
            minutes = 0
        "#;
        let settings = RetentionSettings::from_toml_str(toml).unwrap();
        assert_eq!(settings.zip_dir, AgeOffset::new(2, 0, 30));
        assert!(settings.dry_run);

        let config = settings.resolve(now()).unwrap();
        assert_eq!(config.archive_extension, "ZIP");
    }

    #[test]
    fn test_resolve_uses_single_now() {
        let settings = RetentionSettings::from_json_str(SAMPLE_JSON).unwrap();
        let config = settings.resolve(now()).unwrap();

        let zip_offset = Duration::from_secs(86_400 + 2 * 3_600 + 3 * 60);
        assert_eq!(config.archive_threshold, now() - zip_offset);
        assert_eq!(config.expiry_threshold, now() - Duration::from_secs(90 * 86_400));
        assert_eq!(config.resolved_at, now());
        assert_eq!(config.base_paths[0], PathBuf::from("/var/log/a"));
    }

    #[test]
    fn test_missing_field_is_error() {
        let json = r#"{
            "zip_dir": { "days": 1, "hours": 0 },
            "del_zip": { "days": 90, "hours": 0, "minutes": 0 },
            "base_path_list": ["/var/log/a"]
        }"#;
        assert!(matches!(
            RetentionSettings::from_json_str(json),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_non_numeric_is_error() {
        let json = r#"{
            "zip_dir": { "days": "one", "hours": 0, "minutes": 0 },
            "del_zip": { "days": 90, "hours": 0, "minutes": 0 },
            "base_path_list": []
        }"#;
        assert!(RetentionSettings::from_json_str(json).is_err());
    }

    #[test]
    fn test_negative_offset_is_error() {
        let json = r#"{
            "zip_dir": { "days": -1, "hours": 0, "minutes": 0 },
            "del_zip": { "days": 90, "hours": 0, "minutes": 0 },
            "base_path_list": []
        }"#;
        assert!(RetentionSettings::from_json_str(json).is_err());
    }

    #[test]
    fn test_missing_base_paths_is_error() {
        let json = r#"{
            "zip_dir": { "days": 1, "hours": 0, "minutes": 0 },
            "del_zip": { "days": 90, "hours": 0, "minutes": 0 }
        }"#;
        assert!(RetentionSettings::from_json_str(json).is_err());
    }

    #[test]
    fn test_empty_extension_is_error() {
        let mut settings = RetentionSettings::from_json_str(SAMPLE_JSON).unwrap();
        settings.archive_extension = ".".to_string();
        assert!(matches!(settings.resolve(now()), Err(ConfigError::Invalid(_))));

        settings.archive_extension = "tar/gz".to_string();
        assert!(matches!(settings.resolve(now()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_multi_part_extension_is_error() {
        let mut settings = RetentionSettings::from_json_str(SAMPLE_JSON).unwrap();
        settings.archive_extension = "tar.gz".to_string();
        assert!(matches!(settings.resolve(now()), Err(ConfigError::Invalid(_))));

        settings.archive_extension = ".tar.gz".to_string();
        assert!(matches!(settings.resolve(now()), Err(ConfigError::Invalid(_))));

        settings.archive_extension = ".zip".to_string();
        assert_eq!(settings.resolve(now()).unwrap().archive_extension, "zip");
    }

    #[test]
    fn test_empty_base_path_list_is_accepted() {
        let json = r#"{
            "zip_dir": { "days": 1, "hours": 0, "minutes": 0 },
            "del_zip": { "days": 90, "hours": 0, "minutes": 0 },
            "base_path_list": []
        }"#;
        let config = RetentionSettings::from_json_str(json)
            .unwrap()
            .resolve(now())
            .unwrap();
        assert!(config.base_paths.is_empty());
    }

    #[test]
    fn test_expiry_shorter_than_archive_age_is_accepted() {
        let json = r#"{
            "zip_dir": { "days": 30, "hours": 0, "minutes": 0 },
            "del_zip": { "days": 7, "hours": 0, "minutes": 0 },
            "base_path_list": ["/var/log/a"]
        }"#;
        let config = RetentionSettings::from_json_str(json)
            .unwrap()
            .resolve(now())
            .unwrap();
        assert!(config.expiry_threshold > config.archive_threshold);
        assert_eq!(config.expiry_threshold, now() - Duration::from_secs(7 * 86_400));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, SAMPLE_JSON).unwrap();

        let config = RetentionConfig::load(&path, &FixedClock(now())).unwrap();
        assert_eq!(config.base_paths.len(), 2);
        assert_eq!(config.resolved_at, now());
    }

    #[test]
    fn test_load_missing_file() {
        let result = RetentionConfig::load("/definitely/not/here.json", &FixedClock(now()));
        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn test_is_archive_file() {
        let config = RetentionSettings::from_json_str(SAMPLE_JSON)
            .unwrap()
            .resolve(now())
            .unwrap();
        assert!(config.is_archive_file(Path::new("/logs/a.zip")));
        assert!(config.is_archive_file(Path::new("/logs/a.ZIP")));
        assert!(!config.is_archive_file(Path::new("/logs/a.zip.partial")));
        assert!(!config.is_archive_file(Path::new("/logs/zip")));
    }

    #[test]
    fn test_age_offset_duration() {
        assert_eq!(AgeOffset::new(0, 0, 0).as_duration(), Duration::ZERO);
        assert_eq!(
            AgeOffset::new(1, 1, 1).as_duration(),
            Duration::from_secs(86_400 + 3_600 + 60)
        );
    }
}
