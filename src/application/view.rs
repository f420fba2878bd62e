//! Read-only derivations over local state.

use serde::Serialize;

use crate::domain::content::Content;
use crate::domain::types::StatusFilter;

use super::state::AdminState;

/// Items whose title contains `search` (case-insensitive) and whose publish
/// state passes `status`. Order is preserved.
pub fn filter_items<'a, T: Content>(items: &'a [T], search: &str, status: StatusFilter) -> Vec<&'a T> {
    let needle = search.to_lowercase();
    items
        .iter()
        .filter(|item| status.admits(item.is_published()))
        .filter(|item| needle.is_empty() || item.title().to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_courses: usize,
    pub published_courses: usize,
    pub total_articles: usize,
    pub published_articles: usize,
}

impl DashboardStats {
    pub fn from_state(state: &AdminState) -> Self {
        Self {
            total_courses: state.courses.len(),
            published_courses: count_published(&state.courses),
            total_articles: state.articles.len(),
            published_articles: count_published(&state.articles),
        }
    }
}

fn count_published<T: Content>(items: &[T]) -> usize {
    items.iter().filter(|item| item.is_published()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{fallback_articles, fallback_courses};
    use crate::domain::types::BackendMode;

    #[test]
    fn empty_search_and_all_status_is_identity() {
        let courses = fallback_courses();
        let filtered = filter_items(&courses, "", StatusFilter::All);
        assert_eq!(filtered.len(), courses.len());
        assert!(filtered.iter().zip(&courses).all(|(left, right)| *left == right));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let courses = fallback_courses();
        let filtered = filter_items(&courses, "ANIMAL", StatusFilter::All);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
    }

    #[test]
    fn search_keeps_surrounding_whitespace() {
        let courses = fallback_courses();
        assert!(filter_items(&courses, "Fun ", StatusFilter::All).is_empty());
        assert_eq!(filter_items(&courses, "g Fun", StatusFilter::All).len(), 1);
    }

    #[test]
    fn status_filter_splits_published_and_drafts() {
        let articles = fallback_articles();
        let drafts = filter_items(&articles, "", StatusFilter::Draft);
        assert_eq!(drafts.iter().map(|a| a.id).collect::<Vec<_>>(), vec![3]);

        let published = filter_items(&articles, "tips", StatusFilter::Published);
        assert_eq!(published.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn stats_count_fallback_dataset() {
        let mut state = AdminState::new(BackendMode::Mock);
        state.courses = fallback_courses();
        state.articles = fallback_articles();

        let stats = DashboardStats::from_state(&state);
        assert_eq!(
            stats,
            DashboardStats {
                total_courses: 3,
                published_courses: 2,
                total_articles: 3,
                published_articles: 2,
            }
        );
    }
}
