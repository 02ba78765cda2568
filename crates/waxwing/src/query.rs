use thiserror::Error;

use crate::resource::Resource;
use crate::search::search;
use crate::taxonomy::{Level, TaxonomyNode, TaxonomyTree};

/// A filter over the merged tree: an optional taxonomy path prefix, plus the
/// cross-cutting tag and search facets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub sub_subcategory: Option<String>,
    pub tags: Vec<String>,
    pub search: Option<String>,
}

impl ResourceFilter {
    /// Returns a new, empty [`ResourceFilter`], which matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, slug: impl Into<String>) -> Self {
        self.category = Some(slug.into());
        self
    }

    pub fn subcategory(mut self, slug: impl Into<String>) -> Self {
        self.subcategory = Some(slug.into());
        self
    }

    pub fn sub_subcategory(mut self, slug: impl Into<String>) -> Self {
        self.sub_subcategory = Some(slug.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// No node with this slug exists at this level. A normal outcome, not a
    /// caller bug; routing layers surface it as a 404.
    #[error("no {level:?} with slug '{slug}'")]
    NotFound { level: Level, slug: String },

    /// The filter names nodes that exist but do not lie on one taxonomy
    /// path, e.g. a sub-subcategory that is not a descendant of the given
    /// category. Never silently coerced.
    #[error("'{descendant}' is not a descendant of '{ancestor}'")]
    InvalidFilter {
        ancestor: String,
        descendant: String,
    },
}

/// Resolves a filter against a tree snapshot.
///
/// With only taxonomy slugs, the result is the named node's full roll-up.
/// Tags then intersect it (a resource stays if it carries any requested
/// tag), and a search query, when present, re-ranks what is left via
/// [`search`] and determines the output order.
pub fn resolve<'a>(
    tree: &'a TaxonomyTree,
    filter: &ResourceFilter,
) -> Result<Vec<&'a Resource>, ResolveError> {
    let mut target: Option<&TaxonomyNode> = None;

    let constraints = [
        (Level::Category, filter.category.as_deref()),
        (Level::Subcategory, filter.subcategory.as_deref()),
        (Level::SubSubcategory, filter.sub_subcategory.as_deref()),
    ];

    for (level, slug) in constraints {
        let Some(slug) = slug else {
            continue;
        };

        let node = match target {
            Some(ancestor) => {
                ancestor
                    .find(level, slug)
                    .ok_or_else(|| match tree.find(level, slug) {
                        // The node exists, just not under the ancestor.
                        Some(_) => ResolveError::InvalidFilter {
                            ancestor: ancestor.slug.clone(),
                            descendant: slug.to_string(),
                        },
                        None => ResolveError::NotFound {
                            level,
                            slug: slug.to_string(),
                        },
                    })?
            }
            None => tree.find(level, slug).ok_or_else(|| ResolveError::NotFound {
                level,
                slug: slug.to_string(),
            })?,
        };

        target = Some(node);
    }

    let mut candidates: Vec<&Resource> = match target {
        Some(node) => tree.resources_of(node).collect(),
        None => tree.resources().collect(),
    };

    if !filter.tags.is_empty() {
        candidates.retain(|resource| filter.tags.iter().any(|tag| resource.tags.contains(tag)));
    }

    if let Some(query) = filter.search.as_deref() {
        candidates = search(&candidates, query)
            .into_iter()
            .map(|ranked| ranked.resource)
            .collect();
    }

    Ok(candidates)
}
