/// Filesystem magic numbers as reported in `statfs.f_type` (linux/magic.h).
const MAGIC: &[(u32, &str)] = &[
    (0x0000_EF53, "ext2/ext3/ext4"),
    (0x5846_5342, "xfs"),
    (0x9123_683E, "btrfs"),
    (0xCA45_1A4E, "bcachefs"),
    (0x2FC1_2FC1, "zfs"),
    (0xF2F5_2010, "f2fs"),
    (0x0000_4D44, "vfat"),
    (0x2011_BAB0, "exfat"),
    (0x5346_544E, "ntfs"),
    (0x0000_9660, "iso9660"),
    (0x7371_7368, "squashfs"),
    (0x794C_7630, "overlay"),
    (0x6573_5546, "fuse"),
    (0x0000_6969, "nfs"),
    (0xFF53_4D42, "cifs"),
    (0xFE53_4D42, "smb2"),
    (0x0102_1994, "tmpfs"),
    (0x8584_58F6, "ramfs"),
    (0x9584_58F6, "hugetlbfs"),
    (0x0000_9FA0, "proc"),
    (0x6265_6572, "sysfs"),
    (0x0000_1CD1, "devpts"),
    (0x0027_E0EB, "cgroup"),
    (0x6367_7270, "cgroup2"),
    (0x6462_6720, "debugfs"),
    (0x7472_6163, "tracefs"),
    (0x7363_6673, "securityfs"),
    (0xCAFE_4A11, "bpf"),
    (0x1980_0202, "mqueue"),
    (0x6E73_6673, "nsfs"),
    (0x0000_0187, "autofs"),
    (0x6165_676C, "pstore"),
    (0xDE5E_81E4, "efivarfs"),
    (0x6265_6570, "configfs"),
];

/// Human name for a `statfs` type code, if it is a well-known one.
pub fn fs_type_name(code: i64) -> Option<&'static str> {
    // 32-bit targets sign-extend magics above 0x7fffffff; only the low word matters.
    let magic = code as u32;
    MAGIC.iter().find(|(m, _)| *m == magic).map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_magics() {
        assert_eq!(fs_type_name(0xEF53), Some("ext2/ext3/ext4"));
        assert_eq!(fs_type_name(0x0102_1994), Some("tmpfs"));
        assert_eq!(fs_type_name(0x9123_683E), Some("btrfs"));
    }

    #[test]
    fn sign_extended_magic_still_matches() {
        let sign_extended = 0xF2F5_2010_u32 as i32 as i64;
        assert!(sign_extended < 0);
        assert_eq!(fs_type_name(sign_extended), Some("f2fs"));
    }

    #[test]
    fn unknown_and_invalid_codes() {
        assert_eq!(fs_type_name(0), None);
        assert_eq!(fs_type_name(0x1234_5678), None);
    }
}
