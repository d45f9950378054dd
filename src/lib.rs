//! Filesystem statistics for a path, plus the mount-table entry it lives on.
//!
//! ```no_run
//! let stat = fsstat::FsStat::for_path("/home")?;
//! println!("{} bytes free", stat.bytes_available());
//! if let Some(mount) = stat.mount() {
//!     println!("on {} ({})", mount.mount_dir, mount.fs_type);
//! }
//! # Ok::<(), fsstat::FsStatError>(())
//! ```
//!
//! The mount table is read from `/proc/self/mountinfo`, or `/etc/mtab` when
//! that is unavailable, and re-read on every update.

pub mod collectors;
pub mod config;
pub mod error;
pub mod fsstat;
pub mod models;
pub mod resolver;
pub mod util;

pub use collectors::mount_table::{read_mount_table, read_mount_table_with, MountRecords, MountTableReader, SourceKind};
pub use config::{Config, MountTableConfig, ResolutionConfig};
pub use error::{FsStatError, Result};
pub use fsstat::FsStat;
pub use models::fstype::fs_type_name;
pub use models::mount::{MountEntry, MountOption};
pub use models::usage::Usage;
pub use resolver::{resolve, resolve_with, MatchMode};
