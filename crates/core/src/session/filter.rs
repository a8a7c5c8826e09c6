use std::collections::HashSet;

use crate::model::{Card, CardId, Category};

/// Derive the visible, ordered deck from the full catalog.
///
/// 1. Retain cards matching `selected_category` (all cards when `None`);
///    relative catalog order is preserved.
/// 2. For authenticated users not reviewing everything, drop cards already
///    in the seen set.
///
/// Anonymous users and `show_all_cards` sessions skip seen-filtering
/// entirely. Pure and total: no error conditions.
#[must_use]
pub fn visible_cards<'a>(
    catalog: &'a [Card],
    selected_category: Option<Category>,
    authenticated: bool,
    seen_cards: &HashSet<CardId>,
    show_all_cards: bool,
) -> Vec<&'a Card> {
    catalog
        .iter()
        .filter(|card| selected_category.is_none_or(|c| card.category == c))
        .filter(|card| {
            if authenticated && !show_all_cards {
                !seen_cards.contains(&card.id)
            } else {
                true
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CardContent, Difficulty};

    fn build_card(id: &str, category: Category, seq: u32) -> Card {
        Card {
            id: CardId::new(id),
            stack: "ent-core".to_string(),
            category,
            difficulty: Difficulty::Easy,
            seq,
            content: CardContent::Flashcard {
                front: "Q".to_string(),
                back: "A".to_string(),
            },
        }
    }

    fn catalog() -> Vec<Card> {
        vec![
            build_card("a", Category::Otology, 0),
            build_card("b", Category::Rhinology, 1),
            build_card("c", Category::Otology, 2),
        ]
    }

    fn ids(cards: &[&Card]) -> Vec<String> {
        cards.iter().map(|c| c.id.to_string()).collect()
    }

    #[test]
    fn category_filter_is_stable() {
        let catalog = catalog();
        let seen = HashSet::new();

        let visible = visible_cards(&catalog, Some(Category::Otology), true, &seen, false);
        assert_eq!(ids(&visible), ["a", "c"]);
    }

    #[test]
    fn authenticated_filter_removes_seen_cards() {
        let catalog = catalog();
        let seen: HashSet<CardId> = [CardId::new("b")].into();

        let visible = visible_cards(&catalog, None, true, &seen, false);
        assert_eq!(ids(&visible), ["a", "c"]);
    }

    #[test]
    fn show_all_bypasses_seen_filter() {
        let catalog = catalog();
        let seen: HashSet<CardId> = [CardId::new("a"), CardId::new("b")].into();

        let visible = visible_cards(&catalog, None, true, &seen, true);
        assert_eq!(ids(&visible), ["a", "b", "c"]);
    }

    #[test]
    fn anonymous_users_always_see_everything() {
        let catalog = catalog();
        let seen: HashSet<CardId> = catalog.iter().map(|c| c.id.clone()).collect();

        let visible = visible_cards(&catalog, None, false, &seen, false);
        assert_eq!(visible.len(), catalog.len());
    }

    #[test]
    fn category_and_seen_filters_compose() {
        let catalog = catalog();
        let seen: HashSet<CardId> = [CardId::new("a")].into();

        let visible = visible_cards(&catalog, Some(Category::Otology), true, &seen, false);
        assert_eq!(ids(&visible), ["c"]);

        let visible = visible_cards(&catalog, Some(Category::Otology), true, &seen, true);
        assert_eq!(ids(&visible), ["a", "c"]);
    }
}
