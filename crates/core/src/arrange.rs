//! Pure permutation functions used to lay out spreads. Every mode maps an
//! input identity list to an ordering; nothing here touches entities.

use crate::identity::{CardIdentity, IdentityKind};
use crate::rng::RngState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortMode {
    Random,
    Standard,
    SiStebbins,
    EightKings,
    MirrorColor,
    MirrorNumber,
    MirrorBoth,
}

#[derive(Debug, Error)]
pub enum ArrangeError {
    #[error("unknown sort mode `{0}`")]
    UnknownMode(String),
}

impl SortMode {
    pub fn parse(token: &str) -> Result<Self, ArrangeError> {
        match token {
            "random" => Ok(Self::Random),
            "standard" => Ok(Self::Standard),
            "si_stebbins" => Ok(Self::SiStebbins),
            "eight_kings" => Ok(Self::EightKings),
            "mirror_color" => Ok(Self::MirrorColor),
            "mirror_number" => Ok(Self::MirrorNumber),
            "mirror_both" => Ok(Self::MirrorBoth),
            other => Err(ArrangeError::UnknownMode(other.to_string())),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Standard => "standard",
            Self::SiStebbins => "si_stebbins",
            Self::EightKings => "eight_kings",
            Self::MirrorColor => "mirror_color",
            Self::MirrorNumber => "mirror_number",
            Self::MirrorBoth => "mirror_both",
        }
    }
}

/// Reorders `cards` in place according to `mode`.
pub fn arrange(mode: SortMode, cards: &mut Vec<CardIdentity>, rng: &mut RngState) {
    match mode {
        SortMode::Random => rng.shuffle(cards),
        SortMode::Standard => cards.sort_by_key(|card| standard_key(card.kind())),
        SortMode::SiStebbins => cards.sort_by_key(|card| si_stebbins_key(card.kind())),
        SortMode::EightKings => cards.sort_by_key(|card| eight_kings_key(card.kind())),
        SortMode::MirrorColor => mirror_shuffle(cards, rng, true, false),
        SortMode::MirrorNumber => mirror_shuffle(cards, rng, false, true),
        SortMode::MirrorBoth => mirror_shuffle(cards, rng, true, true),
    }
}

/// Spade < diamond < club < heart by rank; `joker-(1)` first, `joker-(2)`
/// last; unparsed keys sort before everything.
pub fn standard_key(kind: IdentityKind) -> (u8, u8) {
    match kind {
        IdentityKind::Unknown => (0, 0),
        IdentityKind::Joker { index: 1 } => (0, 1),
        IdentityKind::Joker { .. } => (5, 0),
        IdentityKind::Standard { suit, rank } => (1 + suit.spread_index(), rank),
    }
}

/// The classic +3 memorized stack: position `(14 − rank + 3·suit) mod 13`
/// over the club/heart/spade/diamond rotation. Jokers sort last.
pub fn si_stebbins_key(kind: IdentityKind) -> (u8, u8) {
    match kind {
        IdentityKind::Unknown => (0, 0),
        IdentityKind::Joker { index } => (13, index),
        IdentityKind::Standard { suit, rank } => {
            let chased = suit.chased_index();
            (((14 - rank) + 3 * chased) % 13, chased)
        }
    }
}

/// "Eight kings threatened to save ninety-five queens for one sick knave."
const EIGHT_KINGS_RANKS: [u8; 13] = [8, 13, 3, 10, 2, 7, 9, 5, 12, 4, 1, 6, 11];

/// Rank becomes its position in the mnemonic sequence; the suit rotates
/// against it so each run of thirteen walks the whole rotation. Jokers last.
pub fn eight_kings_key(kind: IdentityKind) -> (u8, u8) {
    match kind {
        IdentityKind::Unknown => (0, 0),
        IdentityKind::Joker { index } => (4, 13 + index),
        IdentityKind::Standard { suit, rank } => {
            let position = EIGHT_KINGS_RANKS
                .iter()
                .position(|&r| r == rank)
                .unwrap_or(0) as u8;
            let rotated = (i16::from(suit.chased_index()) - i16::from(position)).rem_euclid(4);
            (rotated as u8, position)
        }
    }
}

/// Random shuffle, then each slot in the first half forces its mirror
/// partner into the slot equidistant from the far end. A pair whose partner
/// cannot be found is left as shuffled.
pub fn mirror_shuffle(cards: &mut [CardIdentity], rng: &mut RngState, color: bool, number: bool) {
    rng.shuffle(cards);
    let n = cards.len();
    for i in 0..n / 2 {
        let far = n - 1 - i;
        if is_mirror(cards[i].kind(), cards[far].kind(), color, number) {
            continue;
        }
        let found = (i + 1..far)
            .find(|&j| is_mirror(cards[i].kind(), cards[j].kind(), color, number))
            .or_else(|| {
                // Rank-only mirroring maps a seven onto itself; pair it
                // with a seven of any other suit instead.
                if number && !color {
                    (i + 1..far).find(|&j| is_rank_mirror(cards[i].kind(), cards[j].kind()))
                } else {
                    None
                }
            });
        if let Some(j) = found {
            cards.swap(j, far);
        }
    }
}

/// Whether `b` is the mirror partner of `a`: color swaps spade↔club and
/// heart↔diamond, number swaps rank↔14−rank, and the two jokers always
/// mirror each other.
pub fn is_mirror(a: IdentityKind, b: IdentityKind, color: bool, number: bool) -> bool {
    match (a, b) {
        (IdentityKind::Joker { index: ia }, IdentityKind::Joker { index: ib }) => ia != ib,
        (
            IdentityKind::Standard { suit: sa, rank: ra },
            IdentityKind::Standard { suit: sb, rank: rb },
        ) => {
            let want_suit = if color { sa.color_partner() } else { sa };
            let want_rank = if number { 14 - ra } else { ra };
            sb == want_suit && rb == want_rank
        }
        _ => false,
    }
}

fn is_rank_mirror(a: IdentityKind, b: IdentityKind) -> bool {
    matches!(
        (a, b),
        (
            IdentityKind::Standard { rank: ra, .. },
            IdentityKind::Standard { rank: rb, .. },
        ) if rb == 14 - ra
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{all_identities, Suit};

    fn deck_without_jokers() -> Vec<CardIdentity> {
        all_identities()
            .into_iter()
            .filter(|id| !id.is_joker())
            .collect()
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        assert!(SortMode::parse("standard").is_ok());
        assert!(matches!(
            SortMode::parse("bogosort"),
            Err(ArrangeError::UnknownMode(_))
        ));
    }

    #[test]
    fn standard_order_brackets_with_jokers() {
        let mut cards = all_identities();
        let mut rng = RngState::from_seed(3);
        rng.shuffle(&mut cards);
        arrange(SortMode::Standard, &mut cards, &mut rng);
        assert_eq!(cards.first().unwrap().key(), "joker-(1)");
        assert_eq!(cards.last().unwrap().key(), "joker-(2)");
        assert_eq!(cards[1].key(), "spade-(1)");
        assert_eq!(cards[13].key(), "spade-(13)");
        assert_eq!(cards[14].key(), "diamond-(1)");
        assert_eq!(cards[52].key(), "heart-(13)");
    }

    #[test]
    fn si_stebbins_reference_cards() {
        // The generator sequence opens AC, 4H, 7S, 10D, KC.
        let expected = [
            "club-(1)",
            "heart-(4)",
            "spade-(7)",
            "diamond-(10)",
            "club-(13)",
        ];
        let mut cards = deck_without_jokers();
        let mut rng = RngState::from_seed(11);
        arrange(SortMode::SiStebbins, &mut cards, &mut rng);
        for (slot, key) in expected.iter().enumerate() {
            assert_eq!(cards[slot].key(), *key);
        }
        // Documented formula check: seven of diamonds keys to (3, 3).
        assert_eq!(
            si_stebbins_key(IdentityKind::Standard {
                suit: Suit::Diamond,
                rank: 7
            }),
            (3, 3)
        );
    }

    #[test]
    fn si_stebbins_steps_by_three() {
        let mut cards = deck_without_jokers();
        let mut rng = RngState::from_seed(0);
        arrange(SortMode::SiStebbins, &mut cards, &mut rng);
        for pair in cards.windows(2) {
            let a = pair[0].rank().unwrap();
            let b = pair[1].rank().unwrap();
            assert_eq!((a + 3 - 1) % 13 + 1, b, "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn eight_kings_is_deterministic_with_jokers_last() {
        let mut first = all_identities();
        let mut second = all_identities();
        let mut rng = RngState::from_seed(5);
        rng.shuffle(&mut first);
        rng.shuffle(&mut second);
        arrange(SortMode::EightKings, &mut first, &mut rng);
        arrange(SortMode::EightKings, &mut second, &mut rng);
        assert_eq!(first, second);
        assert_eq!(first[52].key(), "joker-(1)");
        assert_eq!(first[53].key(), "joker-(2)");
        // The published stack opens 8C, KH, 3S, 10D.
        assert_eq!(first[0].key(), "club-(8)");
        assert_eq!(first[1].key(), "heart-(13)");
        assert_eq!(first[2].key(), "spade-(3)");
        assert_eq!(first[3].key(), "diamond-(10)");
    }

    #[test]
    fn color_mirror_pairs_opposite_colors() {
        let mut cards = deck_without_jokers();
        let mut rng = RngState::from_seed(21);
        arrange(SortMode::MirrorColor, &mut cards, &mut rng);
        let n = cards.len();
        for i in 0..n / 2 {
            let near = cards[i].suit().unwrap();
            let far = cards[n - 1 - i].suit().unwrap();
            assert_eq!(far, near.color_partner());
            assert_ne!(near.color(), far.color());
            assert_eq!(cards[i].rank(), cards[n - 1 - i].rank());
        }
    }

    #[test]
    fn number_mirror_pairs_sum_to_fourteen() {
        let mut cards = deck_without_jokers();
        let mut rng = RngState::from_seed(8);
        arrange(SortMode::MirrorNumber, &mut cards, &mut rng);
        let n = cards.len();
        for i in 0..n / 2 {
            let near = cards[i].rank().unwrap();
            let far = cards[n - 1 - i].rank().unwrap();
            assert_eq!(near + far, 14, "{} vs {}", cards[i], cards[n - 1 - i]);
        }
    }

    #[test]
    fn both_mirror_swaps_color_and_rank() {
        let mut cards = all_identities();
        let mut rng = RngState::from_seed(13);
        arrange(SortMode::MirrorBoth, &mut cards, &mut rng);
        let n = cards.len();
        for i in 0..n / 2 {
            let near = &cards[i];
            let far = &cards[n - 1 - i];
            match (near.kind(), far.kind()) {
                (IdentityKind::Joker { .. }, IdentityKind::Joker { .. }) => {}
                _ => {
                    assert_eq!(far.suit().unwrap(), near.suit().unwrap().color_partner());
                    assert_eq!(near.rank().unwrap() + far.rank().unwrap(), 14);
                }
            }
        }
    }
}
