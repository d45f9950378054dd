pub mod fstype;
pub mod mount;
pub mod usage;
