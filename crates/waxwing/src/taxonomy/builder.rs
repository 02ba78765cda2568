use std::collections::HashMap;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::resource::{Resource, ResourceId};
use crate::slug::{cosmetic_key, slugify};
use crate::taxonomy::{Level, TaxonomyNode, TaxonomyTree};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BuildError {
    /// Two genuinely different names at the same level slugify identically.
    /// Merging them silently would fold two taxonomy entries into one, so
    /// the whole build fails and the caller keeps its last known-good tree.
    #[error("slug collision at {level:?}: '{first}' and '{second}' both resolve to '{slug}'")]
    SlugCollision {
        level: Level,
        slug: String,
        first: String,
        second: String,
    },
}

/// What a build skipped rather than aborted on.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Resources excluded because a taxonomy label was empty, whitespace, or
    /// otherwise unslugifiable.
    pub skipped: Vec<ResourceId>,
}

/// Folds a flat resource list into a three-level [`TaxonomyTree`].
///
/// Resources are grouped by their slugified labels, so cosmetic variants of
/// a label ("Encoding & Codecs", "Encoding &Codecs") land on one node; the
/// first-seen spelling becomes the node's display name.
pub struct TaxonomyBuilder {
    resources: Vec<Resource>,
}

impl TaxonomyBuilder {
    /// Returns a new [`TaxonomyBuilder`].
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
        }
    }

    /// Adds the given [`Resource`] to the aggregate.
    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    /// Adds the given [`Resource`]s to the aggregate.
    pub fn add_resources(&mut self, resources: impl IntoIterator<Item = Resource>) {
        self.resources.extend(resources);
    }

    /// Aggregates the added resources into a tree.
    ///
    /// Resources with invalid labels are excluded and reported rather than
    /// failing the build; a slug collision fails the build outright.
    pub fn build(self) -> Result<(TaxonomyTree, BuildReport), BuildError> {
        let mut resources = IndexMap::new();
        let mut groups: IndexMap<String, Group> = IndexMap::new();
        let mut registry = SlugRegistry::default();
        let mut report = BuildReport::default();

        for resource in self.resources {
            if resources.contains_key(&resource.id) {
                warn!(resource = %resource.id, "duplicate resource id; keeping the first occurrence");
                continue;
            }

            let path = match SlugPath::of(&resource) {
                Ok(path) => path,
                Err(reason) => {
                    warn!(
                        resource = %resource.id,
                        title = %resource.title,
                        reason,
                        "excluding resource from taxonomy"
                    );
                    report.skipped.push(resource.id.clone());
                    continue;
                }
            };

            registry.register(Level::Category, &path.category, "", &path.category_name)?;
            let category = groups
                .entry(path.category.clone())
                .or_insert_with(|| Group::named(&path.category_name));

            if let Some((sub_slug, sub_name)) = &path.subcategory {
                registry.register(Level::Subcategory, sub_slug, &path.category, sub_name)?;
                let subcategory = category
                    .children
                    .entry(sub_slug.clone())
                    .or_insert_with(|| Group::named(sub_name));

                if let Some((leaf_slug, leaf_name)) = &path.sub_subcategory {
                    let parent = format!("{}/{sub_slug}", path.category);
                    registry.register(Level::SubSubcategory, leaf_slug, &parent, leaf_name)?;
                    subcategory
                        .children
                        .entry(leaf_slug.clone())
                        .or_insert_with(|| Group::named(leaf_name))
                        .direct
                        .push(resource.id.clone());
                } else {
                    subcategory.direct.push(resource.id.clone());
                }
            } else {
                category.direct.push(resource.id.clone());
            }

            resources.insert(resource.id.clone(), resource);
        }

        let mut categories = groups
            .into_iter()
            .map(|(slug, group)| build_node(slug, group, Level::Category))
            .collect::<Vec<_>>();
        sort_nodes(&mut categories);

        debug!(
            categories = categories.len(),
            resources = resources.len(),
            skipped = report.skipped.len(),
            "built taxonomy tree"
        );

        Ok((
            TaxonomyTree {
                categories,
                resources,
            },
            report,
        ))
    }
}

impl Default for TaxonomyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A partially aggregated node, keyed by slug in its parent.
#[derive(Default)]
struct Group {
    name: String,
    direct: Vec<ResourceId>,
    children: IndexMap<String, Group>,
}

impl Group {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

fn build_node(slug: String, group: Group, level: Level) -> TaxonomyNode {
    let mut children = match level.child() {
        Some(child_level) => group
            .children
            .into_iter()
            .map(|(slug, child)| build_node(slug, child, child_level))
            .collect::<Vec<_>>(),
        None => Vec::new(),
    };
    sort_nodes(&mut children);

    // Roll-up: directly-attached resources first, then each child's roll-up
    // in child order.
    let mut resources = group.direct;
    for child in &children {
        resources.extend(child.resources.iter().cloned());
    }

    TaxonomyNode {
        name: group.name,
        slug,
        level,
        resources,
        children,
    }
}

fn sort_nodes(nodes: &mut [TaxonomyNode]) {
    nodes.sort_by(|a, b| {
        b.resources
            .len()
            .cmp(&a.resources.len())
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// The slugified taxonomy path of a resource, with the trimmed display names
/// that produced each slug.
struct SlugPath {
    category: String,
    category_name: String,
    subcategory: Option<(String, String)>,
    sub_subcategory: Option<(String, String)>,
}

impl SlugPath {
    fn of(resource: &Resource) -> Result<Self, &'static str> {
        let category_name = resource.category.trim();
        let category =
            slugify(category_name).map_err(|_| "category label is empty or unslugifiable")?;

        let subcategory = match resource.subcategory.as_deref().map(str::trim) {
            Some(name) => Some((
                slugify(name).map_err(|_| "subcategory label is empty or unslugifiable")?,
                name.to_string(),
            )),
            None => None,
        };

        let sub_subcategory = match resource.sub_subcategory.as_deref().map(str::trim) {
            Some(_) if subcategory.is_none() => {
                return Err("sub-subcategory without a subcategory breaks the taxonomy path");
            }
            Some(name) => Some((
                slugify(name).map_err(|_| "sub-subcategory label is empty or unslugifiable")?,
                name.to_string(),
            )),
            None => None,
        };

        Ok(Self {
            category,
            category_name: category_name.to_string(),
            subcategory,
            sub_subcategory,
        })
    }
}

#[derive(Default)]
struct SlugRegistry {
    entries: HashMap<(Level, String), RegisteredName>,
}

struct RegisteredName {
    name: String,
    key: String,
    parent: String,
}

impl SlugRegistry {
    /// Claims `slug` at `level` for `name` under `parent`.
    ///
    /// The same name re-registering its node is fine; a different name (or
    /// the same name under a different parent, which would be a second node
    /// with the same slug) is a collision.
    fn register(
        &mut self,
        level: Level,
        slug: &str,
        parent: &str,
        name: &str,
    ) -> Result<(), BuildError> {
        let key = cosmetic_key(name);

        match self.entries.get(&(level, slug.to_string())) {
            Some(existing) if existing.key == key && existing.parent == parent => Ok(()),
            Some(existing) => Err(BuildError::SlugCollision {
                level,
                slug: slug.to_string(),
                first: existing.name.clone(),
                second: name.to_string(),
            }),
            None => {
                self.entries.insert(
                    (level, slug.to_string()),
                    RegisteredName {
                        name: name.to_string(),
                        key,
                        parent: parent.to_string(),
                    },
                );
                Ok(())
            }
        }
    }
}
