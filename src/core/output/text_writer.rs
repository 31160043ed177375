//! Plain-text line writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ChatflatError;

/// Joins lines with `\n`, terminating the last one as well.
///
/// No lines produce an empty string.
pub fn to_text<S: AsRef<str>>(lines: &[S]) -> String {
    let capacity = lines.iter().map(|l| l.as_ref().len() + 1).sum();
    let mut out = String::with_capacity(capacity);
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out
}

/// Writes lines to any writer, one per line.
pub fn write_lines_to<W: Write, S: AsRef<str>>(
    writer: &mut W,
    lines: &[S],
) -> Result<(), ChatflatError> {
    for line in lines {
        writer.write_all(line.as_ref().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes lines to `output_path`, creating or truncating it.
pub fn write_lines<S: AsRef<str>>(
    lines: &[S],
    output_path: impl AsRef<Path>,
) -> Result<(), ChatflatError> {
    let file = File::create(output_path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_lines_to(&mut writer, lines)
}
