//! RFID tag-id normalisation and validation.

/// Hardware readers may emit lowercase or whitespace-padded forms; the core
/// stores and compares uppercase hex only.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// A usable tag id is 4–50 uppercase hex characters.
pub fn is_valid(tag: &str) -> bool {
    (4..=50).contains(&tag.len()) && tag.chars().all(|c| c.is_ascii_hexdigit())
}
