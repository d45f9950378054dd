use crate::collectors::{mountinfo, mtab};
use crate::config::MountTableConfig;
use crate::error::{FsStatError, Result};
use crate::models::mount::MountEntry;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which of the two mount-table layouts a stream is reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// `/proc/self/mountinfo`: IDs, device numbers, optional fields, superblock options.
    MountInfo,
    /// Legacy fstab-layout table (`/etc/mtab`).
    Mtab,
}

/// Opens the mount table, preferring mountinfo and falling back to the legacy table.
#[derive(Debug, Clone)]
pub struct MountTableReader {
    primary:   PathBuf,
    secondary: PathBuf,
}

impl MountTableReader {
    pub fn new(cfg: &MountTableConfig) -> Self {
        Self { primary: cfg.primary.clone(), secondary: cfg.secondary.clone() }
    }

    /// Open exactly one source. The secondary is only tried when the primary
    /// cannot be opened; the two are never merged.
    pub fn open(&self) -> Result<MountRecords> {
        match File::open(&self.primary) {
            Ok(file) => {
                debug!(target: "fsstat::mount", path = %self.primary.display(), "reading mountinfo");
                return Ok(MountRecords::new(SourceKind::MountInfo, &self.primary, file));
            }
            Err(err) => {
                debug!(
                    target: "fsstat::mount",
                    path = %self.primary.display(),
                    error = %err,
                    "mountinfo unavailable, falling back to legacy table"
                );
            }
        }

        let file = File::open(&self.secondary).map_err(|source| FsStatError::SourceUnavailable {
            primary:   self.primary.clone(),
            secondary: self.secondary.clone(),
            source,
        })?;
        debug!(target: "fsstat::mount", path = %self.secondary.display(), "reading legacy mount table");
        Ok(MountRecords::new(SourceKind::Mtab, &self.secondary, file))
    }
}

impl Default for MountTableReader {
    fn default() -> Self {
        Self::new(&MountTableConfig::default())
    }
}

/// Stream of parsed mount entries in file order.
///
/// Owns the open file. The stream ends at end-of-file, on a read error, or on
/// the first malformed record; the file is closed as soon as the stream ends,
/// or when the stream is dropped early.
#[derive(Debug)]
pub struct MountRecords {
    kind:      SourceKind,
    path:      PathBuf,
    reader:    Option<BufReader<File>>,
    buf:       Vec<u8>,
    line_no:   usize,
    malformed: Option<FsStatError>,
}

impl MountRecords {
    fn new(kind: SourceKind, path: &Path, file: File) -> Self {
        Self {
            kind,
            path:      path.to_path_buf(),
            reader:    Some(BufReader::with_capacity(1024, file)),
            buf:       Vec::new(),
            line_no:   0,
            malformed: None,
        }
    }

    pub fn kind(&self) -> SourceKind { self.kind }

    pub fn path(&self) -> &Path { &self.path }

    /// The record that terminated the stream, if it ended on a malformed line.
    pub fn malformed(&self) -> Option<&FsStatError> {
        self.malformed.as_ref()
    }

    /// True once the underlying file has been released.
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    fn close(&mut self) {
        self.reader = None;
    }
}

impl Iterator for MountRecords {
    type Item = MountEntry;

    fn next(&mut self) -> Option<MountEntry> {
        loop {
            let reader = self.reader.as_mut()?;
            self.buf.clear();
            match reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.close();
                    return None;
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(target: "fsstat::mount", path = %self.path.display(), error = %err, "mount table read failed");
                    self.close();
                    return None;
                }
            }
            self.line_no += 1;

            let parsed = {
                let line = String::from_utf8_lossy(&self.buf);
                match self.kind {
                    SourceKind::MountInfo => mountinfo::parse_line(&line, self.line_no).map(Some),
                    SourceKind::Mtab      => mtab::parse_line(&line, self.line_no),
                }
            };

            match parsed {
                Ok(Some(entry)) => return Some(entry),
                Ok(None)        => continue,
                Err(err) => {
                    debug!(target: "fsstat::mount", path = %self.path.display(), error = %err, "stopping at malformed record");
                    self.malformed = Some(err);
                    self.close();
                    return None;
                }
            }
        }
    }
}

impl FusedIterator for MountRecords {}

/// Read the whole current mount table with the default source paths.
pub fn read_mount_table() -> Result<Vec<MountEntry>> {
    read_mount_table_with(&MountTableConfig::default())
}

pub fn read_mount_table_with(cfg: &MountTableConfig) -> Result<Vec<MountEntry>> {
    Ok(MountTableReader::new(cfg).open()?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(text.as_bytes()).unwrap();
        path
    }

    fn cfg(primary: PathBuf, secondary: PathBuf) -> MountTableConfig {
        MountTableConfig { primary, secondary }
    }

    const MOUNTINFO: &str = "\
22 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw,errors=remount-ro
23 22 0:21 / /proc rw,nosuid shared:12 - proc proc rw
24 22 8:2 / /home rw,relatime shared:2 - ext4 /dev/sda2 rw
";

    const MTAB: &str = "\
/dev/sda1 / ext4 rw,relatime 0 1
proc /proc proc rw,nosuid 0 0
";

    #[test]
    fn prefers_mountinfo_when_present() {
        let dir = TempDir::new().unwrap();
        let primary = write(&dir, "mountinfo", MOUNTINFO);
        let secondary = write(&dir, "mtab", MTAB);

        let mut records = MountTableReader::new(&cfg(primary, secondary)).open().unwrap();
        assert_eq!(records.kind(), SourceKind::MountInfo);
        let dirs: Vec<String> = records.by_ref().map(|e| e.mount_dir).collect();
        assert_eq!(dirs, vec!["/", "/proc", "/home"]);
        assert!(records.malformed().is_none());
        assert!(records.is_closed());
    }

    #[test]
    fn falls_back_to_legacy_table() {
        let dir = TempDir::new().unwrap();
        let secondary = write(&dir, "mtab", MTAB);

        let records = MountTableReader::new(&cfg(dir.path().join("missing"), secondary))
            .open()
            .unwrap();
        assert_eq!(records.kind(), SourceKind::Mtab);
        let entries: Vec<MountEntry> = records.collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].pass_number, 1);
        assert_eq!(entries[1].fs_type, "proc");
    }

    #[test]
    fn no_source_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = MountTableReader::new(&cfg(dir.path().join("a"), dir.path().join("b")))
            .open()
            .unwrap_err();
        assert!(matches!(err, FsStatError::SourceUnavailable { .. }));
    }

    #[test]
    fn malformed_record_ends_the_stream() {
        let dir = TempDir::new().unwrap();
        let text = "\
22 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw
23 22 0:21 / /proc rw - proc proc rw
24 22 8:2 / /home rw,relatime shared:2 - ext4 /dev/sda2 rw
";
        let primary = write(&dir, "mountinfo", text);
        let mut records = MountTableReader::new(&cfg(primary, dir.path().join("mtab"))).open().unwrap();

        let first = records.next().unwrap();
        assert_eq!(first.mount_dir, "/");
        assert!(records.next().is_none());
        // stays terminated; /home is never reached
        assert!(records.next().is_none());
        assert!(records.is_closed());
        match records.malformed() {
            Some(FsStatError::MalformedRecord { line, .. }) => assert_eq!(*line, 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn legacy_table_skips_comments_but_stops_on_bad_numbers() {
        let dir = TempDir::new().unwrap();
        let text = "\
# generated
/dev/sda1 / ext4 rw 0 1

/dev/sda2 /home ext4 rw zero 2
/dev/sda3 /var ext4 rw 0 2
";
        let secondary = write(&dir, "mtab", text);
        let entries = read_mount_table_with(&cfg(dir.path().join("none"), secondary)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mount_dir, "/");
    }

    #[test]
    fn dropping_early_releases_the_file() {
        let dir = TempDir::new().unwrap();
        let primary = write(&dir, "mountinfo", MOUNTINFO);
        let mut records = MountTableReader::new(&cfg(primary, dir.path().join("mtab"))).open().unwrap();
        assert!(records.next().is_some());
        assert!(!records.is_closed());
        drop(records);
    }

    #[test]
    fn empty_table_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let primary = write(&dir, "mountinfo", "");
        let entries = read_mount_table_with(&cfg(primary, dir.path().join("mtab"))).unwrap();
        assert!(entries.is_empty());
    }
}
