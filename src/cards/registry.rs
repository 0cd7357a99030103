//! Card registry for catalog lookup.
//!
//! The `CardRegistry` stores every card loaded for a deck. It provides fast
//! lookup by `CardId`, iterates in load order, and answers the catalog
//! queries (by category, submissions, wild cards, highlight reel references).

use rustc_hash::FxHashMap;

use super::definition::{Card, CardCategory, CardId};

/// Registry of loaded cards.
///
/// ## Example
///
/// ```
/// use fttm_engine::cards::{Card, CardCategory, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(Card::new(CardId::new(1), CardCategory::Grudge).with_fixed(2));
/// registry.register(Card::new(CardId::new(2), "Agile".parse().unwrap()).with_fixed(1));
///
/// assert_eq!(registry.by_category("grudge").count(), 1);
/// assert_eq!(registry.categories().len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Card>,
    order: Vec<CardId>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: Card) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.order.push(card.id);
        self.cards.insert(card.id, card);
    }

    /// Get a card by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Card IDs in load order.
    #[must_use]
    pub fn ids(&self) -> &[CardId] {
        &self.order
    }

    /// Iterate over all cards in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.order.iter().filter_map(move |id| self.cards.get(id))
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &Card>
    where
        F: Fn(&Card) -> bool,
    {
        self.iter().filter(move |c| predicate(c))
    }

    /// Cards whose category label matches, ignoring case.
    pub fn by_category<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Card> + 'a {
        self.iter().filter(move |c| c.category.matches_label(label))
    }

    /// Skill cards carrying the submission marker.
    pub fn submission_cards(&self) -> impl Iterator<Item = &Card> {
        self.find(Card::is_submission)
    }

    pub fn wild_cards(&self) -> impl Iterator<Item = &Card> {
        self.find(Card::is_wild_card)
    }

    /// Cards whose text sends the players to a highlight reel.
    pub fn highlight_reel_cards(&self) -> impl Iterator<Item = &Card> {
        self.find(Card::references_highlight_reel)
    }

    /// Distinct categories, in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<CardCategory> {
        let mut seen: Vec<CardCategory> = Vec::new();
        for card in self.iter() {
            if !seen.contains(&card.category) {
                seen.push(card.category.clone());
            }
        }
        seen
    }
}

impl FromIterator<Card> for CardRegistry {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut registry = Self::new();
        for card in iter {
            registry.register(card);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardPoints;

    fn skill(name: &str) -> CardCategory {
        CardCategory::from_label(name)
    }

    fn sample() -> CardRegistry {
        [
            Card::new(CardId::new(1), CardCategory::Tv).with_points(CardPoints::Fixed(1)),
            Card::new(CardId::new(2), skill("Mean"))
                .with_fixed(2)
                .with_text("Headlock. Submission!"),
            Card::new(CardId::new(3), CardCategory::WildCard).with_text("Roll on the HIGHLIGHT REEL"),
            Card::new(CardId::new(4), skill("Agile")).with_fixed(1),
            Card::new(CardId::new(5), skill("mean")).with_fixed(3),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_register_and_get() {
        let registry = sample();

        assert_eq!(registry.len(), 5);
        assert!(registry.contains(CardId::new(3)));
        assert_eq!(registry.get(CardId::new(4)).unwrap().category, skill("Agile"));
        assert!(registry.get(CardId::new(99)).is_none());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let mut registry = sample();
        registry.register(Card::new(CardId::new(1), CardCategory::Grudge));
    }

    #[test]
    fn test_iteration_keeps_load_order() {
        let registry = sample();
        let ids: Vec<_> = registry.iter().map(|c| c.id.raw()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(registry.ids().len(), 5);
    }

    #[test]
    fn test_by_category_ignores_case() {
        let registry = sample();
        assert_eq!(registry.by_category("MEAN").count(), 2);
        assert_eq!(registry.by_category("tv").count(), 1);
        assert_eq!(registry.by_category("Helped").count(), 0);
    }

    #[test]
    fn test_flag_queries() {
        let registry = sample();

        let subs: Vec<_> = registry.submission_cards().map(|c| c.id.raw()).collect();
        assert_eq!(subs, vec![2]);
        assert_eq!(registry.wild_cards().count(), 1);
        assert_eq!(registry.highlight_reel_cards().count(), 1);
    }

    #[test]
    fn test_distinct_categories() {
        let registry = sample();
        let labels: Vec<_> = registry.categories().iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, vec!["TV", "Mean", "Wild Card", "Agile", "mean"]);
    }

    #[test]
    fn test_find_with_predicate() {
        let registry = sample();
        let big: Vec<_> = registry
            .find(|c| matches!(c.points, Some(CardPoints::Fixed(p)) if p >= 2))
            .collect();
        assert_eq!(big.len(), 2);
    }
}
