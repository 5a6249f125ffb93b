//! Category-based venue classification.

use std::collections::HashSet;

use crate::models::Category;

/// Category-name fragments that mark a venue as bar-like for this survey.
const BAR_KEYWORDS: &[&str] = &[
    "bar",
    "wine",
    "sausage",
    "cheese",
    "charcuterie",
    "fromage",
    "vin",
];

/// Outcome of classifying one venue's category list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryMatch {
    /// The venue counts as bar-like for density ranking
    pub bar: bool,
    /// At least one category id was in the caller's target set
    pub specific: bool,
}

/// Classify a venue from its ordered category list.
///
/// Name matching is case-insensitive. A venue whose categories match
/// neither a keyword nor a target id classifies as `{bar: false,
/// specific: false}`.
pub fn classify_categories(
    categories: &[Category],
    target_ids: Option<&HashSet<String>>,
) -> CategoryMatch {
    let mut result = CategoryMatch::default();

    for category in categories {
        let name = category.name.to_lowercase();
        if BAR_KEYWORDS.iter().any(|keyword| name.contains(keyword)) {
            result.bar = true;
        }
        if let Some(targets) = target_ids {
            if targets.contains(&category.id) {
                result.specific = true;
                result.bar = true;
            }
        }
    }

    result
}
