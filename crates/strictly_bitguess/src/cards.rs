//! Question cards: one card per bit of the secret number.
//!
//! Card `i` lists every number in range whose bit `i` is set. A player's
//! yes/no answer to card `i` is therefore exactly bit `i` of their number,
//! and the full answer sequence spells the number out in binary.

use super::mode::GameMode;
use derive_getters::Getters;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, instrument, trace};

/// A question set: "is your number on this card?"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
pub struct Card {
    /// Bit index this card asks about.
    bit: u32,
    /// Numbers on the card, strictly ascending.
    numbers: Vec<u32>,
}

impl Card {
    /// Value contributed to the guess when the player answers "yes".
    pub fn weight(&self) -> u32 {
        1u32.checked_shl(self.bit).unwrap_or(0)
    }

    /// Returns true if `n` is printed on this card.
    pub fn contains(&self, n: u32) -> bool {
        self.numbers.binary_search(&n).is_ok()
    }

    /// Number of entries on the card.
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    /// Returns true if the card lists no numbers.
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// Builds the ordered question cards for the range `[1, max_num]`.
///
/// Cards come back in increasing bit order, which is the order questions
/// are asked in. `max_bits` must be large enough to cover `max_num`; bits
/// whose weight lies beyond `max_num` produce empty cards.
#[instrument]
pub fn generate_cards(max_num: u32, max_bits: u32) -> Vec<Card> {
    let cards: Vec<Card> = (0..max_bits)
        .map(|bit| {
            let numbers = match 1u32.checked_shl(bit) {
                Some(mask) => (1..=max_num).filter(|n| n & mask != 0).collect(),
                None => Vec::new(),
            };
            trace!(bit, count = numbers.len(), "Card built");
            Card { bit, numbers }
        })
        .collect();

    debug!(card_count = cards.len(), "Generated cards");
    cards
}

/// Returns the cards containing `n`, as the answers a truthful player gives.
pub fn membership(cards: &[Card], n: u32) -> Vec<bool> {
    cards.iter().map(|card| card.contains(n)).collect()
}

type DeckKey = (u32, u32);

static DECKS: Lazy<RwLock<HashMap<DeckKey, Arc<[Card]>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the shared, immutable cards for `mode`, building them once per range.
#[instrument(skip(mode), fields(max_num = *mode.max_num(), max_bits = *mode.max_bits()))]
pub fn cards_for(mode: &GameMode) -> Arc<[Card]> {
    let key = (*mode.max_num(), *mode.max_bits());

    if let Some(deck) = DECKS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        trace!("Card cache hit");
        return Arc::clone(deck);
    }

    let mut decks = DECKS.write().unwrap_or_else(PoisonError::into_inner);
    let deck = decks
        .entry(key)
        .or_insert_with(|| {
            debug!("Card cache miss, generating deck");
            generate_cards(key.0, key.1).into()
        });
    Arc::clone(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{Preset, bits_for};
    use std::collections::HashSet;

    #[test]
    fn test_card_shape_for_all_small_ranges() {
        for max_num in 1..=300u32 {
            let max_bits = bits_for(max_num);
            let cards = generate_cards(max_num, max_bits);
            assert_eq!(cards.len(), max_bits as usize);
            for (i, card) in cards.iter().enumerate() {
                assert_eq!(*card.bit(), i as u32);
                assert!(card.numbers().windows(2).all(|w| w[0] < w[1]));
                assert!(card.numbers().iter().all(|&n| (1..=max_num).contains(&n)));
                assert!(!card.is_empty());
            }
        }
    }

    #[test]
    fn test_membership_patterns_are_unique() {
        for preset in [Preset::Fifty, Preset::Hundred, Preset::FiveEleven] {
            let mode = preset.mode();
            let cards = generate_cards(*mode.max_num(), *mode.max_bits());
            let patterns: HashSet<Vec<bool>> =
                (1..=*mode.max_num()).map(|n| membership(&cards, n)).collect();
            assert_eq!(patterns.len(), *mode.max_num() as usize);
        }
    }

    #[test]
    fn test_single_number_range() {
        let cards = generate_cards(1, 1);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].numbers(), &vec![1]);
    }

    #[test]
    fn test_fifty_first_cards() {
        let cards = generate_cards(50, 6);
        assert_eq!(&cards[0].numbers()[..5], &[1, 3, 5, 7, 9]);
        assert_eq!(&cards[5].numbers()[..3], &[32, 33, 34]);
        assert_eq!(*cards[5].numbers().last().unwrap(), 50);
        assert_eq!(cards[5].weight(), 32);
    }

    #[test]
    fn test_generation_is_idempotent() {
        assert_eq!(generate_cards(100, 7), generate_cards(100, 7));
    }

    #[test]
    fn test_oversized_bit_count_yields_empty_cards() {
        let cards = generate_cards(3, 40);
        assert_eq!(cards.len(), 40);
        assert_eq!(cards[1].numbers(), &vec![2, 3]);
        assert!(cards[2..].iter().all(Card::is_empty));
        assert_eq!(cards[39].weight(), 0);
    }

    #[test]
    fn test_cache_shares_deck_across_labels() {
        let a = GameMode::new("cache a", 77).unwrap();
        let b = GameMode::new("cache b", 77).unwrap();
        let first = cards_for(&a);
        let second = cards_for(&b);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(&*first, generate_cards(77, 7).as_slice());
    }
}
