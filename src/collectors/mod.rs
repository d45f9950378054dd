pub mod mount_table;
pub mod mountinfo;
pub mod mtab;
pub mod statfs;
