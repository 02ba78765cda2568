use indexmap::IndexMap;
use tracing::debug;

use crate::resource::Resource;
use crate::taxonomy::{BuildError, BuildReport, TaxonomyBuilder, TaxonomyTree};

/// Merges live (database-backed, administrator-approved) resources into the
/// statically-built tree.
///
/// The merge is a full re-aggregation over both sources rather than a splice
/// of the existing tree, which keeps the roll-up invariant intact without
/// special cases. Live resources join existing nodes through the same slug
/// normalization the static pass used, so cosmetically different admin
/// spellings cannot split a node in two.
///
/// Resources are deduplicated by normalized URL; when a live resource shares
/// a URL with a static one, the live version wins, in the static resource's
/// position.
pub fn merge(
    static_tree: &TaxonomyTree,
    live_resources: Vec<Resource>,
) -> Result<(TaxonomyTree, BuildReport), BuildError> {
    let mut by_url: IndexMap<String, Resource> = IndexMap::new();

    for resource in static_tree.flatten() {
        by_url.insert(resource.normalized_url(), resource);
    }

    let live_count = live_resources.len();
    let mut replaced = 0;
    for resource in live_resources {
        if by_url.insert(resource.normalized_url(), resource).is_some() {
            replaced += 1;
        }
    }

    debug!(
        live = live_count,
        replaced, "merging live resources into static tree"
    );

    let mut builder = TaxonomyBuilder::new();
    builder.add_resources(by_url.into_values());
    builder.build()
}
