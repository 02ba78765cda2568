use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Where a [`Resource`] came from.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The statically-bundled reference list.
    Static,

    /// The administrator-managed database.
    Database,
}

/// A stable identifier for a [`Resource`].
///
/// Static ids are content-derived; database ids are namespaced with a `db:`
/// prefix so the two sources cannot collide.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
pub struct ResourceId(pub String);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ResourceId {
    /// Returns a content-derived id for a statically-bundled resource.
    pub fn from_static_url(url: &str) -> Self {
        Self(format!("static:{}", normalize_url(url)))
    }

    /// Returns a namespaced id for a database-backed resource.
    pub fn from_database_key(key: impl fmt::Display) -> Self {
        Self(format!("db:{key}"))
    }
}

/// A single link entry in the directory.
///
/// Resources are immutable once created; an edit produces a new merged tree
/// on the next aggregation pass rather than mutating anything in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    pub description: String,
    pub url: String,

    /// Taxonomy labels exactly as authored, punctuation and all.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_subcategory: Option<String>,

    /// Auxiliary filtering facet; not part of the taxonomy tree.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,

    pub origin: Origin,
}

impl Resource {
    /// The taxonomy labels of this resource, coarsest first.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.category.as_str()),
            self.subcategory.as_deref(),
            self.sub_subcategory.as_deref(),
        ]
        .into_iter()
        .flatten()
    }

    /// The normalized form of this resource's URL, used for deduplication
    /// across the static and database sources.
    pub fn normalized_url(&self) -> String {
        normalize_url(&self.url)
    }
}

/// Normalizes a URL for identity comparison: parsed form when possible, with
/// the fragment dropped and any trailing slash trimmed.
pub fn normalize_url(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            let mut normalized = parsed.to_string();
            while normalized.ends_with('/') {
                normalized.pop();
            }
            normalized
        }
        Err(_) => url.trim().to_string(),
    }
}

#[derive(Error, Debug)]
pub enum ParseBundleError {
    #[error("failed to parse resource bundle: {0}")]
    Json(#[from] serde_json::Error),
}

/// A resource record as it appears in the statically-bundled reference list.
#[derive(Debug, Deserialize)]
struct BundleRecord {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    description: String,
    url: String,
    category: String,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(default, alias = "subSubcategory")]
    sub_subcategory: Option<String>,
    #[serde(default)]
    tags: BTreeSet<String>,
}

/// Parses the statically-bundled reference list from its JSON form.
///
/// Records without an explicit id get a content-derived one from their URL.
pub fn parse_bundle(json: &str) -> Result<Vec<Resource>, ParseBundleError> {
    let records: Vec<BundleRecord> = serde_json::from_str(json)?;

    Ok(records
        .into_iter()
        .map(|record| Resource {
            id: match record.id {
                Some(id) => ResourceId(format!("static:{id}")),
                None => ResourceId::from_static_url(&record.url),
            },
            title: record.title,
            description: record.description,
            url: record.url,
            category: record.category,
            subcategory: record.subcategory,
            sub_subcategory: record.sub_subcategory,
            tags: record.tags,
            origin: Origin::Static,
        })
        .collect())
}
