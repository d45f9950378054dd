use serde::Serialize;

/// One `key[=value]` entry of the per-superblock options field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountOption {
    pub name:  String,
    pub value: String,
}

impl MountOption {
    /// Split on the first `=` only; the value is empty when there is none.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('=') {
            Some((name, value)) => Self { name: name.to_string(), value: value.to_string() },
            None                => Self { name: raw.to_string(), value: String::new() },
        }
    }
}

/// One mounted filesystem as read from the mount table.
///
/// The mountinfo-only fields (`mount_id` through `super_options`) stay zero or
/// empty when the entry came from the legacy table, and `dump_frequency` /
/// `pass_number` stay zero when it came from mountinfo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MountEntry {
    pub source:          String,   // "/dev/sda1", "server:/export", "tmpfs"
    pub mount_dir:       String,   // "/home"
    pub fs_type:         String,   // "ext4"
    pub options:         Vec<String>,

    // legacy table (fstab layout)
    pub dump_frequency:  i32,
    pub pass_number:     i32,

    // mountinfo
    pub mount_id:        u32,
    pub parent_id:       u32,
    pub major:           u32,
    pub minor:           u32,
    pub root:            String,
    pub optional_fields: Vec<String>,
    pub super_options:   Vec<MountOption>,
}

impl MountEntry {
    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o == name)
    }

    /// Value of a superblock option; `Some("")` for a bare flag such as `rw`.
    pub fn super_option(&self, name: &str) -> Option<&str> {
        self.super_options.iter()
            .find(|o| o.name == name)
            .map(|o| o.value.as_str())
    }

    /// Read-only according to the per-mount options.
    pub fn is_read_only(&self) -> bool {
        self.has_option("ro")
    }

    /// "major:minor", or None for legacy-table entries, which carry no device numbers.
    pub fn device_number(&self) -> Option<String> {
        if self.mount_id == 0 { return None; }
        Some(format!("{}:{}", self.major, self.minor))
    }
}

/// Comma-separated options in file order. An empty field yields one empty option.
pub(crate) fn split_options(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}
