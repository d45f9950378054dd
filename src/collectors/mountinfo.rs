use crate::error::{FsStatError, Result};
use crate::models::mount::{split_options, MountEntry, MountOption};
use crate::util::escape::unescape_octal;

/// Primary mount-table source.
pub const MOUNTINFO_PATH: &str = "/proc/self/mountinfo";

/// Minimum field count: six fixed fields, at least one optional field, the
/// separator, then type, source and superblock options.
const MIN_FIELDS: usize = 11;

/// Parse one `/proc/self/mountinfo` line.
///
/// ```text
/// 36 35 98:0 /mnt1 /mnt2 rw,noatime master:1 - ext3 /dev/root rw,errors=continue
/// (0)(1)(2)   (3)   (4)      (5)      (6)   (7) (8)   (9)          (10)
/// ```
///
/// The kernel separates fields with single spaces and escapes spaces inside
/// paths, so an empty source still occupies its own position.
pub fn parse_line(line: &str, line_no: usize) -> Result<MountEntry> {
    let line = line.trim_end_matches(['\n', '\r']);
    let fields: Vec<&str> = line.split(' ').collect();
    if fields.len() < MIN_FIELDS {
        return Err(FsStatError::malformed(
            line_no,
            format!("expected at least {} fields, found {}", MIN_FIELDS, fields.len()),
        ));
    }

    let mount_id  = parse_int(fields[0], "mount id", line_no)?;
    let parent_id = parse_int(fields[1], "parent id", line_no)?;

    let dev: Vec<&str> = fields[2].split(':').collect();
    if dev.len() != 2 {
        return Err(FsStatError::malformed(
            line_no,
            format!("device field {:?} is not major:minor", fields[2]),
        ));
    }
    let major = parse_int(dev[0], "major", line_no)?;
    let minor = parse_int(dev[1], "minor", line_no)?;

    // optional fields run from position 6 up to the "-" separator
    let sep = fields[6..].iter()
        .position(|f| *f == "-")
        .map(|p| p + 6)
        .ok_or_else(|| FsStatError::malformed(line_no, "missing optional-field separator"))?;
    if fields.len() < sep + 4 {
        return Err(FsStatError::malformed(
            line_no,
            "missing filesystem type, source or superblock options after separator",
        ));
    }

    let super_options = fields[sep + 3]
        .split(',')
        .map(MountOption::parse)
        .collect();

    Ok(MountEntry {
        source:          unescape_octal(fields[sep + 2]),
        mount_dir:       unescape_octal(fields[4]),
        fs_type:         fields[sep + 1].to_string(),
        options:         split_options(fields[5]),
        dump_frequency:  0,
        pass_number:     0,
        mount_id,
        parent_id,
        major,
        minor,
        root:            unescape_octal(fields[3]),
        optional_fields: fields[6..sep].iter().map(|f| f.to_string()).collect(),
        super_options,
    })
}

fn parse_int(s: &str, what: &str, line_no: usize) -> Result<u32> {
    s.parse().map_err(|_| FsStatError::malformed(line_no, format!("{} {:?} is not an integer", what, s)))
}
