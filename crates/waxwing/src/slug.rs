use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SlugError {
    #[error("cannot derive a slug from an empty name")]
    InvalidName,
}

/// Returns the canonical slug for a display name.
///
/// Slugs are lowercase, with `&` and other punctuation stripped and runs of
/// whitespace, underscores, and hyphens collapsed to a single `-`:
///
/// ```
/// # use waxwing::slug::slugify;
/// assert_eq!(slugify("Encoding & Codecs").unwrap(), "encoding-codecs");
/// ```
///
/// Every taxonomy label in the system passes through this one function, so
/// the statically-bundled list and admin-entered text cannot drift into two
/// nodes for the same conceptual entry.
pub fn slugify(name: &str) -> Result<String, SlugError> {
    if name.trim().is_empty() {
        return Err(SlugError::InvalidName);
    }

    let slug = slug::slugify(name);
    if slug.is_empty() {
        // Punctuation-only names slugify to nothing.
        return Err(SlugError::InvalidName);
    }

    Ok(slug)
}

/// Returns the cosmetic-normalization key for a display name.
///
/// Two labels that share a slug name the same node only when their keys also
/// match; a shared slug across different keys is a collision between
/// genuinely different names.
pub(crate) fn cosmetic_key(name: &str) -> String {
    name.to_lowercase()
        .replace('&', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
