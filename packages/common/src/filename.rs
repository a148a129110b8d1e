//! Parsing painting metadata out of legacy image filenames.
//!
//! Legacy assets are named `[<YYYY>/]<stem>.<ext>` where the stem is a list of
//! `_`-separated segments: an optional 4-digit year, one or more title
//! segments, and an optional trailing `<w>x<h>` size in centimetres.

use thiserror::Error;

/// Image file extensions accepted for import.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilenameError {
    #[error("Filename cannot be empty")]
    Empty,
    #[error("Invalid filename: control characters are not allowed")]
    ControlCharacter,
}

/// Metadata recovered from a filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedFilename {
    pub year: Option<i32>,
    pub title: String,
    /// Rendered as `"<w>x<h> cm"`.
    pub dimensions: Option<String>,
}

/// Returns true if `path` ends in one of [`IMAGE_EXTENSIONS`], ignoring case.
pub fn has_image_extension(path: &str) -> bool {
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

fn as_year(segment: &str) -> Option<i32> {
    if segment.len() == 4 && segment.bytes().all(|b| b.is_ascii_digit()) {
        segment.parse().ok()
    } else {
        None
    }
}

fn is_measure(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && s.bytes().any(|b| b.is_ascii_digit())
        && s.matches('.').count() <= 1
}

/// Parse a `<w>x<h>` segment (separator `x`, `X`, `×` or `*`).
fn as_dimensions(segment: &str) -> Option<String> {
    let (w, h) = segment.split_once(['x', 'X', '×', '*'])?;
    let (w, h) = (w.trim(), h.trim());
    (is_measure(w) && is_measure(h)).then(|| format!("{w}x{h} cm"))
}

/// Extract year, title and dimensions from a `[<YYYY>/]<stem>.<ext>` path.
///
/// A year taken from a 4-digit parent directory wins over a year prefix in the
/// stem. Stems that don't fit the grammar become the title verbatim.
pub fn parse_painting_filename(path: &str) -> Result<ParsedFilename, FilenameError> {
    if path.chars().any(|c| c.is_control()) {
        return Err(FilenameError::ControlCharacter);
    }
    let normalized = path.replace('\\', "/");
    let (dir, file) = match normalized.rsplit_once('/') {
        Some((dir, file)) => (dir, file),
        None => ("", normalized.as_str()),
    };
    let dir_year = dir.rsplit('/').next().and_then(as_year);

    let stem = match file.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => file,
    }
    .trim();
    if stem.is_empty() {
        return Err(FilenameError::Empty);
    }

    let mut segments: Vec<&str> = stem.split('_').collect();
    let mut prefix_year = None;
    if segments.len() > 1
        && let Some(year) = as_year(segments[0])
    {
        prefix_year = Some(year);
        segments.remove(0);
    }
    let mut dimensions = None;
    if segments.len() > 1
        && let Some(dims) = segments.last().and_then(|s| as_dimensions(s))
    {
        dimensions = Some(dims);
        segments.pop();
    }

    if segments.iter().any(|s| s.trim().is_empty()) {
        return Ok(ParsedFilename {
            year: dir_year,
            title: stem.to_string(),
            dimensions: None,
        });
    }

    Ok(ParsedFilename {
        year: dir_year.or(prefix_year),
        title: segments.join("_").trim().to_string(),
        dimensions,
    })
}
