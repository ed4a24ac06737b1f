//! Upload rules for project documents: allowed extensions, size limits,
//! stored-name generation, and the headers used when serving files back.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distr::{Alphanumeric, SampleString};

use crate::error::CoreError;

/// Default upload limit (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Length of the random part of a stored file name.
pub const STORED_NAME_LENGTH: usize = 32;

/// Extensions accepted by the upload and replace endpoints (lowercase).
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "csv", "rtf", "odt", "ods", "jpg",
    "jpeg", "png", "gif", "webp", "dwg", "dxf", "zip", "rar", "7z",
];

/// Lowercased extension of `filename`, if it has one.
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Check name and size of an incoming file. Returns the normalized
/// extension to store the file under.
pub fn validate_upload(filename: &str, size: u64, max_bytes: u64) -> Result<String, CoreError> {
    let ext = file_extension(filename).ok_or_else(|| {
        CoreError::Validation(format!("File '{filename}' has no extension"))
    })?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "File type '.{ext}' is not allowed"
        )));
    }
    if size == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "File is too large ({size} bytes). Maximum is {max_bytes} bytes"
        )));
    }
    Ok(ext)
}

/// Random on-disk name: 32 alphanumeric characters plus the extension.
pub fn generate_stored_name(ext: &str) -> String {
    let token = Alphanumeric.sample_string(&mut rand::rng(), STORED_NAME_LENGTH);
    format!("{token}.{ext}")
}

/// Stored names are generated by [`generate_stored_name`]; anything else
/// (path separators, `..`) is refused before touching the filesystem.
pub fn is_safe_stored_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
        && !name.starts_with('.')
}

/// MIME type for a stored file, by extension.
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "rtf" => "application/rtf",
        "odt" => "application/vnd.oasis.opendocument.text",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "zip" => "application/zip",
        "rar" => "application/vnd.rar",
        "7z" => "application/x-7z-compressed",
        _ => "application/octet-stream",
    }
}

/// `Content-Disposition` value for downloading `original_name`.
///
/// Quotes and control characters are replaced in the ASCII fallback; a
/// non-ASCII name additionally gets an RFC 5987 `filename*` parameter.
pub fn content_disposition(original_name: &str) -> String {
    let fallback: String = original_name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if original_name.is_ascii() {
        return format!("attachment; filename=\"{fallback}\"");
    }

    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        utf8_percent_encode(original_name, FILENAME_STAR)
    )
}

/// Everything outside RFC 5987 `attr-char` gets percent-encoded.
const FILENAME_STAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');
