use crate::error::{FsStatError, Result};
use crate::models::usage::Usage;
use nix::sys::statfs::statfs;
use nix::sys::statvfs::statvfs;

/// Query capacity, free and available space plus type and mount flags for `path`.
///
/// Block counts come from a single statvfs call and are scaled by its
/// fragment size. statvfs has no type field, so the magic number is taken
/// from statfs on the same path.
// Widths of the libc fields differ between 32- and 64-bit targets.
#[allow(clippy::useless_conversion, clippy::unnecessary_cast)]
pub fn query(path: &str) -> Result<Usage> {
    let failed = |source| FsStatError::StatisticsQueryFailed { path: path.to_string(), source };

    let vfs = statvfs(path).map_err(failed)?;
    let fs  = statfs(path).map_err(failed)?;

    let frsize = u64::from(vfs.fragment_size());
    Ok(Usage {
        capacity_bytes:  u64::from(vfs.blocks()).saturating_mul(frsize),
        free_bytes:      u64::from(vfs.blocks_free()).saturating_mul(frsize),
        available_bytes: u64::from(vfs.blocks_available()).saturating_mul(frsize),
        fs_type:         fs.filesystem_type().0 as i64,
        flags:           vfs.flags().bits() as i64,
    })
}
