use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::resource::{Resource, ResourceId};

/// The level of a node within the taxonomy.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Category,
    Subcategory,
    SubSubcategory,
}

impl Level {
    /// Returns the level beneath this one, if any.
    pub fn child(&self) -> Option<Level> {
        match self {
            Level::Category => Some(Level::Subcategory),
            Level::Subcategory => Some(Level::SubSubcategory),
            Level::SubSubcategory => None,
        }
    }
}

/// A node in the taxonomy tree.
///
/// One shape serves all three levels, tagged by [`Level`], so traversal logic
/// is written once.
#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyNode {
    /// The display label, as the most authoritative source provided it.
    pub name: String,

    /// The canonical identifier; unique within its level across the tree.
    pub slug: String,

    pub level: Level,

    /// The roll-up: ids of every resource at this node or any descendant,
    /// keyed into [`TaxonomyTree::resource`].
    pub resources: Vec<ResourceId>,

    /// Child nodes, ordered by descending resource count, then name.
    pub children: Vec<TaxonomyNode>,
}

impl TaxonomyNode {
    /// Returns the number of resources in this node's roll-up.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Returns the direct child with the given slug.
    pub fn child(&self, slug: &str) -> Option<&TaxonomyNode> {
        self.children.iter().find(|child| child.slug == slug)
    }

    /// Returns the node with the given level and slug within this subtree,
    /// including this node itself.
    pub fn find(&self, level: Level, slug: &str) -> Option<&TaxonomyNode> {
        if self.level == level && self.slug == slug {
            return Some(self);
        }

        self.children.iter().find_map(|child| child.find(level, slug))
    }
}

/// An immutable snapshot of the aggregated taxonomy.
///
/// Nodes reference resources by id into the central map, so a resource
/// appears once in memory no matter how many ancestors roll it up.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaxonomyTree {
    /// Top-level categories, ordered by descending resource count, then name.
    pub categories: Vec<TaxonomyNode>,

    pub(crate) resources: IndexMap<ResourceId, Resource>,
}

impl TaxonomyTree {
    /// Returns the category with the given slug.
    pub fn category(&self, slug: &str) -> Option<&TaxonomyNode> {
        self.categories.iter().find(|category| category.slug == slug)
    }

    /// Returns the node with the given level and slug, wherever it sits.
    pub fn find(&self, level: Level, slug: &str) -> Option<&TaxonomyNode> {
        self.categories
            .iter()
            .find_map(|category| category.find(level, slug))
    }

    /// Returns the resource with the given id.
    pub fn resource(&self, id: &ResourceId) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Returns all resources in the tree, in the order they were ingested.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Returns the resources in a node's roll-up, in roll-up order.
    pub fn resources_of<'a>(
        &'a self,
        node: &'a TaxonomyNode,
    ) -> impl Iterator<Item = &'a Resource> {
        node.resources.iter().filter_map(|id| self.resources.get(id))
    }

    /// The total number of resources in the tree.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Flattens the tree back into its resource list, in ingestion order.
    ///
    /// Rebuilding from the flattened list yields a tree with identical
    /// per-node counts.
    pub fn flatten(&self) -> Vec<Resource> {
        self.resources.values().cloned().collect()
    }
}
