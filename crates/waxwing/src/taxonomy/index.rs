use std::collections::HashMap;

use crate::taxonomy::{BuildError, Level, TaxonomyNode, TaxonomyTree};

/// O(1) slug lookup over a tree snapshot, built once per snapshot.
///
/// The three levels are independent namespaces: a subcategory and an
/// unrelated sub-subcategory may legitimately share a slug, so forcing
/// uniqueness across levels would be artificial. Within a level, uniqueness
/// is re-checked here so a hand-assembled tree cannot smuggle in a
/// collision the builder would have rejected.
#[derive(Debug)]
pub struct TaxonomyIndex<'a> {
    categories: HashMap<&'a str, &'a TaxonomyNode>,
    subcategories: HashMap<&'a str, &'a TaxonomyNode>,
    sub_subcategories: HashMap<&'a str, &'a TaxonomyNode>,
}

impl<'a> TaxonomyIndex<'a> {
    /// Returns a new [`TaxonomyIndex`] over the given tree.
    pub fn new(tree: &'a TaxonomyTree) -> Result<Self, BuildError> {
        let mut index = Self {
            categories: HashMap::new(),
            subcategories: HashMap::new(),
            sub_subcategories: HashMap::new(),
        };

        for category in &tree.categories {
            index.insert(category)?;
        }

        Ok(index)
    }

    /// Looks up the node with the given slug at the given level.
    ///
    /// A miss means "no such taxonomy node", which callers must distinguish
    /// from a node that exists with zero resources.
    pub fn get(&self, level: Level, slug: &str) -> Option<&'a TaxonomyNode> {
        self.namespace(level).get(slug).copied()
    }

    /// The number of nodes at the given level.
    pub fn len(&self, level: Level) -> usize {
        self.namespace(level).len()
    }

    fn namespace(&self, level: Level) -> &HashMap<&'a str, &'a TaxonomyNode> {
        match level {
            Level::Category => &self.categories,
            Level::Subcategory => &self.subcategories,
            Level::SubSubcategory => &self.sub_subcategories,
        }
    }

    fn insert(&mut self, node: &'a TaxonomyNode) -> Result<(), BuildError> {
        let namespace = match node.level {
            Level::Category => &mut self.categories,
            Level::Subcategory => &mut self.subcategories,
            Level::SubSubcategory => &mut self.sub_subcategories,
        };

        if let Some(existing) = namespace.insert(&node.slug, node) {
            return Err(BuildError::SlugCollision {
                level: node.level,
                slug: node.slug.clone(),
                first: existing.name.clone(),
                second: node.name.clone(),
            });
        }

        for child in &node.children {
            self.insert(child)?;
        }

        Ok(())
    }
}
