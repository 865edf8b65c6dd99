//! Merging of prioritized result buckets and page slicing.

use std::collections::HashSet;

use crate::error::RequestError;
use crate::types::UnifiedRecipe;

/// Concatenate `buckets` in order and drop repeated ids. The first
/// occurrence wins, so higher-priority sources keep their position.
pub fn merge<I>(buckets: I) -> Vec<UnifiedRecipe>
where
    I: IntoIterator<Item = Vec<UnifiedRecipe>>,
{
    let mut seen = HashSet::new();
    buckets
        .into_iter()
        .flatten()
        .filter(|recipe| seen.insert(recipe.id.clone()))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub recipes: Vec<UnifiedRecipe>,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub has_more: bool,
}

/// Slice page `page` (1-based) out of `recipes`.
///
/// A page past the end is empty with `has_more == false`. Page 0 and a
/// zero page size are caller errors.
pub fn paginate(
    recipes: Vec<UnifiedRecipe>,
    page: usize,
    page_size: usize,
) -> Result<Page, RequestError> {
    if page == 0 || page_size == 0 {
        return Err(RequestError::InvalidPage);
    }

    let total_count = recipes.len();
    let start = (page - 1).saturating_mul(page_size);
    let recipes: Vec<UnifiedRecipe> = recipes.into_iter().skip(start).take(page_size).collect();
    let has_more = page.saturating_mul(page_size) < total_count;

    Ok(Page {
        recipes,
        page,
        page_size,
        total_count,
        has_more,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;

    fn recipe(id: &str) -> UnifiedRecipe {
        UnifiedRecipe {
            id: id.to_string(),
            title: id.to_string(),
            translated_title: None,
            image: String::new(),
            url: String::new(),
            source: Source::TheMealDb,
            calories: None,
            time: None,
            servings: None,
            ingredients: None,
            raw_material_lines: None,
            raw_indication_text: None,
            category: None,
            cuisine: None,
            tags: vec![],
            instructions: None,
        }
    }

    fn ids(recipes: &[UnifiedRecipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn merge_keeps_first_occurrence() {
        let merged = merge(vec![
            vec![recipe("a"), recipe("b")],
            vec![recipe("c"), recipe("a"), recipe("d")],
            vec![recipe("b"), recipe("e")],
        ]);
        assert_eq!(ids(&merged), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        assert!(merge(Vec::<Vec<UnifiedRecipe>>::new()).is_empty());
        assert!(merge(vec![vec![], vec![]]).is_empty());
    }

    #[test]
    fn paginate_reports_has_more() {
        let all: Vec<_> = (0..120).map(|i| recipe(&i.to_string())).collect();

        let first = paginate(all.clone(), 1, 50).unwrap();
        assert_eq!(first.recipes.len(), 50);
        assert_eq!(first.total_count, 120);
        assert!(first.has_more);

        let last = paginate(all.clone(), 3, 50).unwrap();
        assert_eq!(last.recipes.len(), 20);
        assert_eq!(last.recipes[0].id, "100");
        assert!(!last.has_more);
    }

    #[test]
    fn exact_multiple_has_no_more() {
        let all: Vec<_> = (0..100).map(|i| recipe(&i.to_string())).collect();
        let second = paginate(all, 2, 50).unwrap();
        assert_eq!(second.recipes.len(), 50);
        assert!(!second.has_more);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let page = paginate(vec![recipe("a")], 7, 50).unwrap();
        assert!(page.recipes.is_empty());
        assert_eq!(page.total_count, 1);
        assert!(!page.has_more);

        let empty = paginate(vec![], 1, 50).unwrap();
        assert!(empty.recipes.is_empty());
        assert_eq!(empty.total_count, 0);
        assert!(!empty.has_more);
    }

    #[test]
    fn page_zero_is_rejected() {
        assert_eq!(paginate(vec![], 0, 50).unwrap_err(), RequestError::InvalidPage);
    }
}
