use crate::collectors::mount_table::MountTableReader;
use crate::collectors::statfs;
use crate::config::Config;
use crate::error::Result;
use crate::models::fstype::fs_type_name;
use crate::models::mount::MountEntry;
use crate::models::usage::Usage;
use crate::resolver::resolve_stream;
use tracing::{debug, warn};

/// Filesystem statistics for one path, together with the mount it lives on.
///
/// The object is either invalid (every byte count `u64::MAX`, type and flags
/// zero, no mount, empty path) or fully populated from one successful
/// [`update`](FsStat::update). A failed update always leaves it invalid.
///
/// Not synchronised: an update rewrites every field, so callers sharing one
/// instance across threads must lock around it.
#[derive(Debug, Clone)]
pub struct FsStat {
    usage:  Usage,
    mount:  Option<MountEntry>,
    path:   String,
    config: Config,
}

impl FsStat {
    /// An invalid object using the default mount-table sources.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self { usage: Usage::INVALID, mount: None, path: String::new(), config }
    }

    /// Build and update in one step.
    pub fn for_path(path: impl Into<String>) -> Result<Self> {
        let mut stat = Self::new();
        stat.update(path)?;
        Ok(stat)
    }

    /// Query statistics for `path` and resolve its mount.
    ///
    /// A failed statistics query returns the error and leaves the object
    /// invalid. A mount table that cannot be opened only clears the mount,
    /// unless `resolution.strict` is set, in which case it fails the update too.
    pub fn update(&mut self, path: impl Into<String>) -> Result<()> {
        self.invalidate();
        let path = path.into();

        let usage = statfs::query(&path)?;
        let mount = match self.resolve_mount(&path) {
            Ok(mount) => mount,
            Err(err) if self.config.resolution.strict => return Err(err),
            Err(err) => {
                warn!(target: "fsstat::stat", path = %path, error = %err, "mount resolution failed");
                None
            }
        };

        debug!(
            target: "fsstat::stat",
            path = %path,
            capacity = usage.capacity_bytes,
            mount = mount.as_ref().map(|m| m.mount_dir.as_str()).unwrap_or("-"),
            "updated"
        );
        self.usage = usage;
        self.mount = mount;
        self.path  = path;
        Ok(())
    }

    /// Re-run [`update`](FsStat::update) on the current path. Fails on an
    /// invalid object, whose path is empty.
    pub fn refresh(&mut self) -> Result<()> {
        let path = std::mem::take(&mut self.path);
        self.update(path)
    }

    /// Rebind to a new path.
    pub fn set_path(&mut self, path: impl Into<String>) -> Result<()> {
        self.invalidate();
        self.update(path)
    }

    /// Reset to the invalid state.
    pub fn invalidate(&mut self) {
        self.usage = Usage::INVALID;
        self.mount = None;
        self.path.clear();
    }

    fn resolve_mount(&self, path: &str) -> Result<Option<MountEntry>> {
        let records = MountTableReader::new(&self.config.mount_table).open()?;
        Ok(resolve_stream(path, records, self.config.resolution.match_mode))
    }

    pub fn is_valid(&self) -> bool { !self.path.is_empty() }

    pub fn bytes_capacity(&self) -> u64 { self.usage.capacity_bytes }

    pub fn bytes_free(&self) -> u64 { self.usage.free_bytes }

    pub fn bytes_available(&self) -> u64 { self.usage.available_bytes }

    /// True when the read-only bit is set in the statvfs mount flags.
    pub fn is_read_only(&self) -> bool { self.usage.is_read_only() }

    /// `statfs` magic number, 0 when invalid.
    pub fn fs_type(&self) -> i64 { self.usage.fs_type }

    pub fn fs_type_name(&self) -> Option<&'static str> { fs_type_name(self.usage.fs_type) }

    pub fn flags(&self) -> i64 { self.usage.flags }

    pub fn usage(&self) -> &Usage { &self.usage }

    /// The mount `path` resolved to, if any.
    pub fn mount(&self) -> Option<&MountEntry> { self.mount.as_ref() }

    pub fn path(&self) -> &str { &self.path }

    pub fn config(&self) -> &Config { &self.config }
}

impl Default for FsStat {
    fn default() -> Self {
        Self::new()
    }
}
