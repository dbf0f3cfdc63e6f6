//! Utility functions for image file naming

use url::Url;

/// Sanitize a street address for use as a file-name stem
///
/// Replaces spaces with underscores and strips commas and periods. The
/// result is a pure function of the input, deterministic and idempotent,
/// so it can be recomputed anywhere without synchronization.
///
/// # Examples
///
/// ```
/// use housepix::utils::sanitize_address;
///
/// assert_eq!(sanitize_address("123 Main St, Unit A."), "123_Main_St_Unit_A");
/// ```
#[must_use]
pub fn sanitize_address(address: &str) -> String {
    address
        .chars()
        .filter(|c| *c != ',' && *c != '.')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Extract the file extension (with leading dot) from a photo URL path
///
/// Returns an empty string when the path carries no extension, so callers
/// can append the result unconditionally.
#[must_use]
pub fn photo_extension(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // Relative or otherwise unparseable URLs still get a best-effort
        // extension from the raw string
        Err(_) => url.to_string(),
    };
    let name = path.rsplit_once('/').map_or(path.as_str(), |(_, name)| name);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => format!(".{ext}"),
        _ => String::new(),
    }
}

/// Assemble the destination file name for a listing photo
///
/// The name is `{id}-{sanitized-address}{extension-of-photo-url}`, e.g.
/// `12-4_Pumpkin_Hill_Street.jpg`.
#[must_use]
pub fn image_file_name(id: u64, address: &str, photo_url: &str) -> String {
    format!(
        "{}-{}{}",
        id,
        sanitize_address(address),
        photo_extension(photo_url)
    )
}
