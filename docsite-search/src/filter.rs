//! Order-preserving selection of hits by content type.

use crate::classifier::{Classified, RuleSet};
use crate::selection::Selection;
use crate::types::{ContentType, HasUrl};

/// Records that already carry a content type.
pub trait ContentTyped {
    /// The record's content type.
    fn content_type(&self) -> ContentType;
}

impl<T> ContentTyped for Classified<T> {
    fn content_type(&self) -> ContentType {
        self.content_type
    }
}

impl<T: ContentTyped + ?Sized> ContentTyped for &T {
    fn content_type(&self) -> ContentType {
        (**self).content_type()
    }
}

/// Restrict `results` to those admitted by `selected`.
///
/// Relative order is preserved. [`Selection::All`] returns every element;
/// [`Selection::Unrecognized`] returns none. Filtering the output again with
/// the same selection yields the same output.
pub fn filter<T>(results: &[T], selected: &Selection) -> Vec<T>
where
    T: ContentTyped + Clone,
{
    let visible: Vec<T> = results
        .iter()
        .filter(|r| selected.admits(r.content_type()))
        .cloned()
        .collect();
    tracing::debug!(
        selected = %selected,
        total = results.len(),
        visible = visible.len(),
        "filtered results"
    );
    visible
}

/// [`filter`] driven by a raw selector value (`""` means no filter).
pub fn filter_by_value<T>(results: &[T], selected: &str) -> Vec<T>
where
    T: ContentTyped + Clone,
{
    filter(results, &Selection::parse(selected))
}

/// Filter hits that have not been classified yet, classifying on the fly.
pub fn filter_unclassified<T>(rules: &RuleSet, hits: &[T], selected: &Selection) -> Vec<T>
where
    T: HasUrl + Clone,
{
    hits.iter()
        .filter(|hit| selected.admits(rules.classify(*hit)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SearchHit;

    fn classified(urls: &[&str]) -> Vec<Classified<SearchHit>> {
        RuleSet::builtin().annotate(urls.iter().map(|u| SearchHit::from_url(*u)))
    }

    fn urls(results: &[Classified<SearchHit>]) -> Vec<&str> {
        results.iter().map(|r| r.hit.url.as_str()).collect()
    }

    #[test]
    fn all_is_identity() {
        let results = classified(&["/docs/cms/a", "/blog/b", "/docs/api/c"]);
        assert_eq!(filter(&results, &Selection::All), results);
    }

    #[test]
    fn only_keeps_matching_in_order() {
        let results = classified(&["/docs/api/1", "/docs/cms/2", "/docs/api/3", "/blog/4"]);
        let api = filter(&results, &Selection::Only(ContentType::Api));
        assert_eq!(urls(&api), vec!["/docs/api/1", "/docs/api/3"]);
    }

    #[test]
    fn other_can_be_selected() {
        let results = classified(&["/docs/api/1", "/blog/4"]);
        let other = filter(&results, &Selection::Only(ContentType::Other));
        assert_eq!(urls(&other), vec!["/blog/4"]);
    }

    #[test]
    fn unrecognized_matches_nothing() {
        let results = classified(&["/docs/api/1", "/blog/4"]);
        assert!(filter_by_value(&results, "unknown-category").is_empty());
    }

    #[test]
    fn selector_values_must_match_exactly() {
        let results = classified(&["/docs/cms/1", "/docs/cloud/2"]);
        assert!(filter_by_value(&results, "CMS").is_empty());
        assert!(filter_by_value(&results, " cloud ").is_empty());
        assert!(filter_by_value(&results, " ").is_empty());
        assert!(filter_by_value(&results, "   ").is_empty());
        assert_eq!(filter_by_value(&results, "").len(), 2);
    }

    #[test]
    fn empty_input_empty_output() {
        let empty: Vec<Classified<SearchHit>> = Vec::new();
        assert!(filter_by_value(&empty, "cms").is_empty());
        assert!(filter_by_value(&empty, "").is_empty());
    }

    #[test]
    fn idempotent() {
        let results = classified(&["/docs/cloud/1", "/docs/cms/2", "/docs/cloud/3"]);
        let once = filter_by_value(&results, "cloud");
        let twice = filter_by_value(&once, "cloud");
        assert_eq!(once, twice);
    }

    #[test]
    fn works_on_references() {
        let results = classified(&["/docs/cloud/1", "/docs/cms/2"]);
        let refs: Vec<&Classified<SearchHit>> = results.iter().collect();
        let cms = filter(&refs, &Selection::Only(ContentType::Cms));
        assert_eq!(cms.len(), 1);
        assert_eq!(cms[0].hit.url, "/docs/cms/2");
    }

    #[test]
    fn unclassified_hits_filtered_on_the_fly() {
        let hits = vec![
            SearchHit::from_url("/docs/features/media"),
            SearchHit::from_url("/docs/cms/pages"),
        ];
        let features = filter_unclassified(
            RuleSet::builtin(),
            &hits,
            &Selection::Only(ContentType::Features),
        );
        assert_eq!(features, vec![SearchHit::from_url("/docs/features/media")]);
    }
}
