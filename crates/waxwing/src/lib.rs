#![doc = include_str!("../README.md")]

pub mod resource;
pub mod search;
pub mod slug;
pub mod taxonomy;

mod query;
mod snapshot;

pub use query::*;
pub use snapshot::*;

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use crate::resource::{parse_bundle, Origin, Resource, ResourceId};
    use crate::taxonomy::{merge, Level, TaxonomyBuilder, TaxonomyIndex};
    use crate::{resolve, ResourceFilter, TreeHandle};

    #[test]
    fn test_kitchen_sink() {
        let bundle = indoc! {r#"
            [
                {
                    "title": "rav1e",
                    "description": "The fastest and safest AV1 encoder.",
                    "url": "https://github.com/xiph/rav1e",
                    "category": "Encoding & Codecs",
                    "subcategory": "Codecs",
                    "subSubcategory": "AV1",
                    "tags": ["encoder"]
                },
                {
                    "title": "SVT-AV1",
                    "description": "Scalable AV1 encoder and decoder.",
                    "url": "https://gitlab.com/AOMediaCodec/SVT-AV1",
                    "category": "Encoding & Codecs",
                    "subcategory": "Codecs",
                    "subSubcategory": "AV1",
                    "tags": ["encoder"]
                },
                {
                    "title": "aom",
                    "description": "Alliance for Open Media reference codec.",
                    "url": "https://aomedia.googlesource.com/aom",
                    "category": "Encoding & Codecs",
                    "subcategory": "Codecs",
                    "subSubcategory": "AV1"
                },
                {
                    "title": "Codec comparison",
                    "description": "A written comparison of modern codecs.",
                    "url": "https://example.com/codec-comparison",
                    "category": "Encoding & Codecs",
                    "subcategory": "Codecs"
                },
                {
                    "title": "hls.js",
                    "description": "JavaScript HLS client using Media Source Extensions.",
                    "url": "https://github.com/video-dev/hls.js",
                    "category": "Players",
                    "subcategory": "Web"
                }
            ]
        "#};

        let mut builder = TaxonomyBuilder::new();
        builder.add_resources(parse_bundle(bundle).unwrap());
        let (static_tree, report) = builder.build().unwrap();
        assert!(report.skipped.is_empty());

        // An administrator approved an update to an existing entry and a
        // brand-new one, with cosmetically different labels.
        let live = vec![
            Resource {
                id: ResourceId::from_database_key(12),
                title: "aom (AOMedia)".to_string(),
                description: "Reference AV1 implementation.".to_string(),
                url: "https://aomedia.googlesource.com/aom/".to_string(),
                category: "encoding & codecs".to_string(),
                subcategory: Some("Codecs ".to_string()),
                sub_subcategory: Some("AV1".to_string()),
                tags: Default::default(),
                origin: Origin::Database,
            },
            Resource {
                id: ResourceId::from_database_key(13),
                title: "VP9 bitstream guide".to_string(),
                description: "An overview of the VP9 bitstream.".to_string(),
                url: "https://example.com/vp9-guide".to_string(),
                category: "Encoding & Codecs".to_string(),
                subcategory: Some("Codecs".to_string()),
                sub_subcategory: Some("VP9".to_string()),
                tags: Default::default(),
                origin: Origin::Database,
            },
        ];

        let (tree, report) = merge(&static_tree, live).unwrap();
        assert!(report.skipped.is_empty());

        // Dedup by URL: still six resources, with the live aom carrying
        // the day.
        assert_eq!(tree.len(), 6);
        let aom = tree
            .resources()
            .find(|resource| resource.url.contains("aomedia"))
            .unwrap();
        assert_eq!(aom.id, ResourceId("db:12".to_string()));
        assert_eq!(aom.origin, Origin::Database);

        let index = TaxonomyIndex::new(&tree).unwrap();
        assert_eq!(index.get(Level::SubSubcategory, "av1").unwrap().resource_count(), 3);
        assert_eq!(index.get(Level::SubSubcategory, "vp9").unwrap().resource_count(), 1);
        assert_eq!(index.get(Level::Subcategory, "codecs").unwrap().resource_count(), 5);
        assert_eq!(index.get(Level::Category, "encoding-codecs").unwrap().resource_count(), 5);
        assert!(index.get(Level::Category, "advertising").is_none());

        let results = resolve(
            &tree,
            &ResourceFilter::new().category("encoding-codecs").search("av1 encoder"),
        )
        .unwrap();
        assert!(results
            .iter()
            .any(|resource| resource.title == "rav1e"));

        let handle = TreeHandle::new(tree);
        assert_eq!(handle.current().len(), 6);
    }
}
