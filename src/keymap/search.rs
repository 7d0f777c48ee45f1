//! Fuzzy search over the action catalog
//!
//! Backs command-palette style pickers: every known action is scored against
//! the query on its ID, description and category, with the ID weighted highest.

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use super::action::Action;
use super::registry::Registry;

/// A scored search result
pub struct SearchHit<'a, E> {
    pub action: &'a Action<E>,
    pub score: u32,
}

impl<E> std::fmt::Debug for SearchHit<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHit")
            .field("action", &self.action.id)
            .field("score", &self.score)
            .finish()
    }
}

/// Reuses the matcher and haystack buffer across candidates
struct FuzzyCtx {
    pattern: Pattern,
    matcher: Matcher,
    buf: Vec<char>,
}

impl FuzzyCtx {
    fn new(query: &str) -> Self {
        Self {
            pattern: Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart),
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::new(),
        }
    }

    fn score(&mut self, haystack: &str) -> Option<u32> {
        if haystack.is_empty() {
            return None;
        }
        let utf32 = Utf32Str::new(haystack, &mut self.buf);
        self.pattern.score(utf32, &mut self.matcher)
    }
}

/// Actions matching `query`, best first
///
/// An empty query returns every action ordered by category, then ID.
pub fn search_actions<'a, E>(registry: &'a Registry<E>, query: &str) -> Vec<SearchHit<'a, E>> {
    let query = query.trim();
    if query.is_empty() {
        let mut all: Vec<SearchHit<'a, E>> = registry
            .actions()
            .map(|action| SearchHit { action, score: 0 })
            .collect();
        all.sort_by(|a, b| {
            (&a.action.category, &a.action.id).cmp(&(&b.action.category, &b.action.id))
        });
        return all;
    }

    let mut ctx = FuzzyCtx::new(query);
    let mut hits = Vec::new();
    for action in registry.actions() {
        let id = ctx.score(&action.id).map(|s| s * 2);
        let description = ctx.score(&action.description);
        let category = ctx.score(&action.category).map(|s| s / 2);

        let best = [id, description, category].into_iter().flatten().max();
        if let Some(score) = best {
            hits.push(SearchHit { action, score });
        }
    }

    hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.action.id.cmp(&b.action.id)));
    tracing::debug!("search {:?}: {} hit(s)", query, hits.len());
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Registry<()> {
        let mut registry = Registry::new();
        for (id, description, category) in [
            ("quit", "Quit the application", "App"),
            ("move-down", "Move cursor down", "Navigation"),
            ("move-up", "Move cursor up", "Navigation"),
            ("open-palette", "Open the command palette", "App"),
        ] {
            registry
                .define(
                    Action::new(id)
                        .describe(description)
                        .category(category)
                        .handler(|| ()),
                )
                .unwrap();
        }
        registry
    }

    fn ids<E>(hits: &[SearchHit<'_, E>]) -> Vec<String> {
        hits.iter().map(|h| h.action.id.clone()).collect()
    }

    #[test]
    fn test_empty_query_lists_everything() {
        let registry = catalog();
        let hits = search_actions(&registry, "  ");
        assert_eq!(
            ids(&hits),
            vec!["open-palette", "quit", "move-down", "move-up"]
        );
    }

    #[test]
    fn test_exact_id_ranks_first() {
        let registry = catalog();
        let hits = search_actions(&registry, "quit");
        assert_eq!(hits[0].action.id, "quit");
    }

    #[test]
    fn test_fuzzy_subsequence() {
        let registry = catalog();
        let hits = search_actions(&registry, "mvdn");
        assert_eq!(hits[0].action.id, "move-down");
    }

    #[test]
    fn test_matches_description_case_insensitive() {
        let registry = catalog();
        let hits = search_actions(&registry, "COMMAND");
        assert_eq!(ids(&hits), vec!["open-palette"]);
    }

    #[test]
    fn test_no_match() {
        let registry = catalog();
        assert!(search_actions(&registry, "zzzz").is_empty());
    }
}
