use crate::error::{FsStatError, Result};
use crate::models::mount::{split_options, MountEntry};
use crate::util::escape::unescape_octal;

/// Secondary mount-table source (glibc `_PATH_MOUNTED`).
pub const MTAB_PATH: &str = "/etc/mtab";

/// Parse one fstab-layout line the way getmntent(3) reads it:
/// `source dir type options dump pass`.
///
/// Returns `Ok(None)` for blank and comment lines, which getmntent skips.
/// A missing options field reads as empty, missing dump/pass as zero.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<MountEntry>> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(FsStatError::malformed(
            line_no,
            format!("expected source, directory and type, found {} fields", fields.len()),
        ));
    }

    let options = fields.get(3).copied().unwrap_or("");
    let dump_frequency = parse_num(fields.get(4), "dump frequency", line_no)?;
    let pass_number    = parse_num(fields.get(5), "pass number", line_no)?;

    Ok(Some(MountEntry {
        source:    unescape_octal(fields[0]),
        mount_dir: unescape_octal(fields[1]),
        fs_type:   unescape_octal(fields[2]),
        options:   split_options(&unescape_octal(options)),
        dump_frequency,
        pass_number,
        ..Default::default()
    }))
}

fn parse_num(field: Option<&&str>, what: &str, line_no: usize) -> Result<i32> {
    match field {
        None    => Ok(0),
        Some(s) => s.parse().map_err(|_| {
            FsStatError::malformed(line_no, format!("{} {:?} is not an integer", what, s))
        }),
    }
}
