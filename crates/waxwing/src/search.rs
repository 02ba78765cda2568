use std::cmp::Ordering;

use unicode_segmentation::UnicodeSegmentation;

use crate::resource::Resource;

/// A resource matched by a search, with its relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResource<'a> {
    pub resource: &'a Resource,
    pub score: f64,
}

/// Similarity floor for a fuzzy token match. High enough that unrelated
/// terms stay out, low enough that `h264` still reaches `h.264`.
const FUZZY_THRESHOLD: f64 = 0.8;

const TITLE_WEIGHT: f64 = 3.0;
const LABEL_WEIGHT: f64 = 2.0;
const DESCRIPTION_WEIGHT: f64 = 1.0;

/// Searches `resources` for `query`, matching against titles, descriptions,
/// and taxonomy labels.
///
/// Every query token must match somewhere (by substring or by bounded edit
/// distance) for a resource to rank at all. Results come back in descending
/// score order, with ties keeping their input order.
///
/// An empty or whitespace-only query is the identity operation: the input
/// set comes back unchanged and unranked, which the resolver relies on when
/// no search term is supplied.
pub fn search<'a>(resources: &[&'a Resource], query: &str) -> Vec<RankedResource<'a>> {
    let tokens = query_tokens(query);
    if tokens.is_empty() {
        return resources
            .iter()
            .map(|resource| RankedResource {
                resource,
                score: 0.0,
            })
            .collect();
    }

    let mut ranked = Vec::new();
    for resource in resources {
        if let Some(score) = score_resource(resource, &tokens) {
            ranked.push(RankedResource { resource, score });
        }
    }

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    ranked
}

fn score_resource(resource: &Resource, query_tokens: &[String]) -> Option<f64> {
    let fields: Vec<(Vec<String>, f64)> = [(resource.title.as_str(), TITLE_WEIGHT)]
        .into_iter()
        .chain(resource.labels().map(|label| (label, LABEL_WEIGHT)))
        .chain([(resource.description.as_str(), DESCRIPTION_WEIGHT)])
        .map(|(text, weight)| (field_tokens(text), weight))
        .collect();

    let mut total = 0.0;
    for query_token in query_tokens {
        let mut best = 0.0;
        for (tokens, weight) in &fields {
            for token in tokens {
                let similarity = token_similarity(token, query_token) * weight;
                if similarity > best {
                    best = similarity;
                }
            }
        }

        if best == 0.0 {
            // Every query token has to land somewhere.
            return None;
        }

        total += best;
    }

    Some(total)
}

fn token_similarity(token: &str, query_token: &str) -> f64 {
    if token == query_token {
        return 1.0;
    }

    if query_token.len() >= 2 && token.contains(query_token) {
        return 0.9;
    }

    let similarity = strsim::normalized_levenshtein(token, query_token);
    if similarity >= FUZZY_THRESHOLD {
        similarity
    } else {
        0.0
    }
}

/// Query tokens are whitespace-delimited chunks reduced to their
/// alphanumeric content, so punctuation-bearing queries ("h.264") behave.
fn query_tokens(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter_map(|chunk| {
            let stripped: String = chunk.chars().filter(|c| c.is_alphanumeric()).collect();
            (!stripped.is_empty()).then_some(stripped)
        })
        .collect()
}

/// Field tokens are unicode words plus the alphanumeric form of each
/// whitespace chunk, so "H.264" is findable both as `h`/`264` and as `h264`.
fn field_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut tokens: Vec<String> = lowered.unicode_words().map(String::from).collect();
    for chunk in lowered.split_whitespace() {
        let stripped: String = chunk.chars().filter(|c| c.is_alphanumeric()).collect();
        if !stripped.is_empty() && !tokens.contains(&stripped) {
            tokens.push(stripped);
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::resource::{Origin, ResourceId};

    use super::*;

    fn make_resource(key: &str, title: &str, description: &str) -> Resource {
        Resource {
            id: ResourceId(format!("static:{key}")),
            title: title.to_string(),
            description: description.to_string(),
            url: format!("https://example.com/{key}"),
            category: "Encoding & Codecs".to_string(),
            subcategory: Some("Codecs".to_string()),
            sub_subcategory: None,
            tags: Default::default(),
            origin: Origin::Static,
        }
    }

    fn titles<'a>(ranked: &[RankedResource<'a>]) -> Vec<&'a str> {
        ranked
            .iter()
            .map(|ranked| ranked.resource.title.as_str())
            .collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let a = make_resource("a", "rav1e", "AV1 encoder");
        let b = make_resource("b", "x264", "H.264 encoder");
        let resources = vec![&a, &b];

        for query in ["", "   ", "\t"] {
            let ranked = search(&resources, query);

            assert_eq!(titles(&ranked), vec!["rav1e", "x264"]);
            assert!(ranked.iter().all(|ranked| ranked.score == 0.0));
        }
    }

    #[test]
    fn test_near_miss_tokens_match() {
        let a = make_resource("a", "x264", "An H.264 encoder.");
        let b = make_resource("b", "rav1e", "An AV1 encoder.");
        let resources = vec![&a, &b];

        assert_eq!(titles(&search(&resources, "h.264")), vec!["x264"]);
        assert_eq!(titles(&search(&resources, "h264")), vec!["x264"]);
    }

    #[test]
    fn test_unrelated_terms_do_not_match() {
        let a = make_resource("a", "rav1e", "An AV1 encoder.");
        let resources = vec![&a];

        assert_eq!(search(&resources, "subtitles").len(), 0);
        assert_eq!(search(&resources, "av1 subtitles").len(), 0);
    }

    #[test]
    fn test_title_matches_outrank_description_matches() {
        let in_description = make_resource("a", "Awesome reading list", "All about streaming.");
        let in_title = make_resource("b", "Streaming handbook", "A reading list.");
        let resources = vec![&in_description, &in_title];

        let ranked = search(&resources, "streaming");

        assert_eq!(
            titles(&ranked),
            vec!["Streaming handbook", "Awesome reading list"]
        );
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_taxonomy_labels_are_searchable() {
        let a = make_resource("a", "rav1e", "Fast and safe.");
        let resources = vec![&a];

        // "Codecs" only appears in the resource's taxonomy path.
        assert_eq!(titles(&search(&resources, "codecs")), vec!["rav1e"]);
    }

    #[test]
    fn test_punctuation_only_query_does_not_panic() {
        let a = make_resource("a", "rav1e", "An AV1 encoder.");
        let resources = vec![&a];

        // Nothing to match on; behaves like the empty query.
        assert_eq!(search(&resources, "?!&").len(), 1);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let a = make_resource("a", "AV1 encoder", "");
        let b = make_resource("b", "AV1 encoder", "");
        let resources = vec![&a, &b];

        let ranked = search(&resources, "av1");

        assert_eq!(
            ranked
                .iter()
                .map(|ranked| ranked.resource.id.clone())
                .collect::<Vec<_>>(),
            vec![
                ResourceId("static:a".to_string()),
                ResourceId("static:b".to_string())
            ]
        );
    }
}
