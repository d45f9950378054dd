use serde::Serialize;

/// Read-only bit of the statvfs mount flags (ST_RDONLY, same value as MS_RDONLY).
pub const FLAG_READ_ONLY: i64 = 0x1;

/// Result of one statistics query, already converted from blocks to bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub capacity_bytes:  u64,
    pub free_bytes:      u64,
    /// Free space usable by unprivileged users; never above `free_bytes`.
    pub available_bytes: u64,
    pub fs_type:         i64,
    pub flags:           i64,
}

impl Usage {
    /// The "no data" sentinel: every byte count at `u64::MAX`, type and flags zeroed.
    pub const INVALID: Usage = Usage {
        capacity_bytes:  u64::MAX,
        free_bytes:      u64::MAX,
        available_bytes: u64::MAX,
        fs_type:         0,
        flags:           0,
    };

    pub fn is_read_only(&self) -> bool {
        self.flags & FLAG_READ_ONLY != 0
    }

    pub fn used_bytes(&self) -> u64 {
        self.capacity_bytes.saturating_sub(self.free_bytes)
    }

    /// Percentage of space unavailable to ordinary users, the way `df` reports it.
    pub fn use_pct(&self) -> f64 {
        if self.capacity_bytes == 0 { return 0.0; }
        let used  = self.used_bytes() as f64;
        let avail = self.available_bytes as f64;
        if used + avail == 0.0 { return 0.0; }
        used / (used + avail) * 100.0
    }
}

impl Default for Usage {
    fn default() -> Self {
        Self::INVALID
    }
}
