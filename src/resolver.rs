use crate::models::mount::MountEntry;
use serde::{Deserialize, Serialize};

/// How a mount directory must relate to a path to be considered its mount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Plain string prefix: "/home" matches "/home2".
    #[default]
    Prefix,
    /// Prefix ending on a path boundary: "/home" matches "/home" and "/home/x", not "/home2".
    Segments,
}

/// Pick the mount whose directory is the longest string prefix of `path`.
///
/// No canonicalisation and no symlink resolution happen here; pass an already
/// resolved path when that matters.
pub fn resolve<'a>(path: &str, entries: &'a [MountEntry]) -> Option<&'a MountEntry> {
    resolve_with(path, entries, MatchMode::Prefix)
}

/// Longest-prefix match in the given mode. On equal lengths the earlier entry
/// wins. Entries with an empty mount directory never match.
pub fn resolve_with<'a>(path: &str, entries: &'a [MountEntry], mode: MatchMode) -> Option<&'a MountEntry> {
    let mut best: Option<&MountEntry> = None;
    let mut best_len = 0;

    for entry in entries {
        let dir = entry.mount_dir.as_str();
        if dir.len() > best_len && matches(path, dir, mode) {
            best_len = dir.len();
            best = Some(entry);
        }
    }
    best
}

/// Owned variant over a stream of entries, used while reading the mount table.
pub(crate) fn resolve_stream<I>(path: &str, entries: I, mode: MatchMode) -> Option<MountEntry>
where
    I: IntoIterator<Item = MountEntry>,
{
    let mut best: Option<MountEntry> = None;
    for entry in entries {
        let longer = best.as_ref().map_or(true, |b| entry.mount_dir.len() > b.mount_dir.len());
        if longer && !entry.mount_dir.is_empty() && matches(path, &entry.mount_dir, mode) {
            best = Some(entry);
        }
    }
    best
}

fn matches(path: &str, dir: &str, mode: MatchMode) -> bool {
    if !path.starts_with(dir) {
        return false;
    }
    match mode {
        MatchMode::Prefix   => true,
        MatchMode::Segments => {
            dir.ends_with('/') || path.len() == dir.len() || path.as_bytes()[dir.len()] == b'/'
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounts(dirs: &[&str]) -> Vec<MountEntry> {
        dirs.iter()
            .enumerate()
            .map(|(i, d)| MountEntry {
                mount_dir: d.to_string(),
                source: format!("dev{}", i),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn longest_prefix_wins() {
        let entries = mounts(&["/", "/home", "/home/user"]);
        let hit = resolve("/home/user/docs", &entries).unwrap();
        assert_eq!(hit.mount_dir, "/home/user");
        assert_eq!(resolve("/home", &entries).unwrap().mount_dir, "/home");
        assert_eq!(resolve("/etc/passwd", &entries).unwrap().mount_dir, "/");
    }

    #[test]
    fn plain_prefix_matches_across_segment_boundary() {
        // "/home" is a string prefix of "/home2" and longer than "/"
        let entries = mounts(&["/", "/home", "/home/user"]);
        assert_eq!(resolve("/home2", &entries).unwrap().mount_dir, "/home");
    }

    #[test]
    fn segment_mode_respects_boundaries() {
        let entries = mounts(&["/", "/home", "/home/user"]);
        assert_eq!(resolve_with("/home2", &entries, MatchMode::Segments).unwrap().mount_dir, "/");
        assert_eq!(resolve_with("/home", &entries, MatchMode::Segments).unwrap().mount_dir, "/home");
        assert_eq!(
            resolve_with("/home/user/docs", &entries, MatchMode::Segments).unwrap().mount_dir,
            "/home/user"
        );
    }

    #[test]
    fn first_seen_wins_on_equal_length() {
        // the same directory mounted twice (over-mount): earliest entry is kept
        let entries = mounts(&["/", "/mnt", "/mnt"]);
        let hit = resolve("/mnt/x", &entries).unwrap();
        assert_eq!(hit.source, "dev1");

        let owned = resolve_stream("/mnt/x", entries.clone(), MatchMode::Prefix).unwrap();
        assert_eq!(owned.source, "dev1");
    }

    #[test]
    fn no_candidate_gives_none() {
        assert!(resolve("/anything", &[]).is_none());
        let entries = mounts(&["/srv", "/opt"]);
        assert!(resolve("relative/path", &entries).is_none());
        assert!(resolve("/home", &entries).is_none());
    }

    #[test]
    fn empty_directory_never_matches() {
        let entries = mounts(&[""]);
        assert!(resolve("/x", &entries).is_none());
        assert!(resolve_stream("/x", entries, MatchMode::Prefix).is_none());
    }

    #[test]
    fn stream_and_slice_agree() {
        let entries = mounts(&["/", "/var", "/var/lib", "/var/lib/docker", "/v"]);
        for path in ["/var/lib/docker/x", "/var/log", "/vx", "/", "/usr"] {
            let a = resolve(path, &entries).map(|e| e.mount_dir.clone());
            let b = resolve_stream(path, entries.clone(), MatchMode::Prefix).map(|e| e.mount_dir);
            assert_eq!(a, b, "{path}");
        }
    }
}
