use crate::collectors::{mountinfo::MOUNTINFO_PATH, mtab::MTAB_PATH};
use crate::error::{FsStatError, Result};
use crate::resolver::MatchMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mount_table: MountTableConfig,

    #[serde(default)]
    pub resolution: ResolutionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountTableConfig {
    /// Structured per-process mount table, tried first
    pub primary: PathBuf,
    /// Legacy fstab-layout table, used only when `primary` cannot be opened
    pub secondary: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// "prefix" (plain string prefix) or "segments" (path-boundary aware)
    pub match_mode: MatchMode,
    /// Abort `update` when the mount table cannot be opened, instead of
    /// keeping the statistics and leaving the mount empty.
    pub strict: bool,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for MountTableConfig {
    fn default() -> Self {
        Self {
            primary:   PathBuf::from(MOUNTINFO_PATH),
            secondary: PathBuf::from(MTAB_PATH),
        }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    /// Load the user config, falling back to defaults when it is missing or broken.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::try_load(&path).unwrap_or_default(),
            None       => Config::default(),
        }
    }

    pub fn try_load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| FsStatError::Config {
            path:   path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text).map_err(|reason| FsStatError::Config { path: path.to_path_buf(), reason })
    }

    fn from_toml(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fsstat").join("fsstat.toml"))
    }

    /// Write the default config to `path`, creating parent directories.
    pub fn write_defaults(path: &Path) -> Result<()> {
        let io_err = |e: std::io::Error| FsStatError::Config { path: path.to_path_buf(), reason: e.to_string() };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(&Config::default())
            .map_err(|e| FsStatError::Config { path: path.to_path_buf(), reason: e.to_string() })?;
        fs::write(path, format!("# fsstat configuration\n# Generated with --init-config, edit freely\n\n{}", text))
            .map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.mount_table.primary, PathBuf::from("/proc/self/mountinfo"));
        assert_eq!(cfg.mount_table.secondary, PathBuf::from("/etc/mtab"));
        assert_eq!(cfg.resolution.match_mode, MatchMode::Prefix);
        assert!(!cfg.resolution.strict);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::from_toml("[resolution]\nmatch_mode = \"segments\"\n").unwrap();
        assert_eq!(cfg.resolution.match_mode, MatchMode::Segments);
        assert!(!cfg.resolution.strict);
        assert_eq!(cfg.mount_table, MountTableConfig::default());

        let cfg = Config::from_toml("[mount_table]\nsecondary = \"/proc/mounts\"\n").unwrap();
        assert_eq!(cfg.mount_table.primary, PathBuf::from("/proc/self/mountinfo"));
        assert_eq!(cfg.mount_table.secondary, PathBuf::from("/proc/mounts"));
    }

    #[test]
    fn unknown_match_mode_is_rejected() {
        assert!(Config::from_toml("[resolution]\nmatch_mode = \"fuzzy\"\n").is_err());
    }

    #[test]
    fn written_defaults_load_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("fsstat.toml");
        Config::write_defaults(&path).unwrap();
        assert_eq!(Config::try_load(&path).unwrap(), Config::default());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::try_load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, FsStatError::Config { .. }));
    }
}
