use serde::{Deserialize, Serialize};
use std::fmt;

/// Declaration order is the spread-sort order: spade < diamond < club < heart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Spade,
    Diamond,
    Club,
    Heart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Diamond, Suit::Club, Suit::Heart];

    pub fn name(self) -> &'static str {
        match self {
            Suit::Spade => "spade",
            Suit::Diamond => "diamond",
            Suit::Club => "club",
            Suit::Heart => "heart",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Suit::ALL.iter().copied().find(|suit| suit.name() == name)
    }

    /// Index in spread-sort order.
    pub fn spread_index(self) -> u8 {
        match self {
            Suit::Spade => 0,
            Suit::Diamond => 1,
            Suit::Club => 2,
            Suit::Heart => 3,
        }
    }

    /// Club, heart, spade, diamond — the rotation the memorized stacks use.
    pub fn chased_index(self) -> u8 {
        match self {
            Suit::Club => 0,
            Suit::Heart => 1,
            Suit::Spade => 2,
            Suit::Diamond => 3,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Suit::Spade | Suit::Club => Color::Black,
            Suit::Diamond | Suit::Heart => Color::Red,
        }
    }

    /// Same-color counterpart: spade↔club, heart↔diamond.
    pub fn color_partner(self) -> Suit {
        match self {
            Suit::Spade => Suit::Club,
            Suit::Club => Suit::Spade,
            Suit::Heart => Suit::Diamond,
            Suit::Diamond => Suit::Heart,
        }
    }
}

/// Ranks are 1 (ace) through 13 (king).
pub const RANK_MIN: u8 = 1;
pub const RANK_MAX: u8 = 13;

pub fn rank_label(rank: u8) -> &'static str {
    match rank {
        1 => "A",
        2 => "2",
        3 => "3",
        4 => "4",
        5 => "5",
        6 => "6",
        7 => "7",
        8 => "8",
        9 => "9",
        10 => "10",
        11 => "J",
        12 => "Q",
        13 => "K",
        _ => "?",
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IdentityKind {
    Standard { suit: Suit, rank: u8 },
    Joker { index: u8 },
    /// Key that did not parse. Sorts before everything, never an error.
    Unknown,
}

/// One logical card: an opaque unique key plus its parsed meaning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CardIdentity {
    key: String,
    kind: IdentityKind,
}

impl CardIdentity {
    /// Parses keys of the form `"spade-(7)"` or `"joker-(1)"`. Anything
    /// else becomes `IdentityKind::Unknown` rather than failing.
    pub fn parse(key: &str) -> Self {
        Self {
            kind: parse_kind(key),
            key: key.to_string(),
        }
    }

    pub fn standard(suit: Suit, rank: u8) -> Self {
        Self {
            key: format!("{}-({})", suit.name(), rank),
            kind: IdentityKind::Standard { suit, rank },
        }
    }

    pub fn joker(index: u8) -> Self {
        Self {
            key: format!("joker-({index})"),
            kind: IdentityKind::Joker { index },
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> IdentityKind {
        self.kind
    }

    pub fn rank(&self) -> Option<u8> {
        match self.kind {
            IdentityKind::Standard { rank, .. } => Some(rank),
            _ => None,
        }
    }

    pub fn suit(&self) -> Option<Suit> {
        match self.kind {
            IdentityKind::Standard { suit, .. } => Some(suit),
            _ => None,
        }
    }

    pub fn is_joker(&self) -> bool {
        matches!(self.kind, IdentityKind::Joker { .. })
    }
}

impl fmt::Display for CardIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

fn parse_kind(key: &str) -> IdentityKind {
    let lower = key.trim().to_ascii_lowercase();
    let Some((name, rest)) = lower.split_once("-(") else {
        return IdentityKind::Unknown;
    };
    let Some(number) = rest.strip_suffix(')') else {
        return IdentityKind::Unknown;
    };
    let Ok(value) = number.parse::<u8>() else {
        return IdentityKind::Unknown;
    };
    if name == "joker" {
        return if (1..=2).contains(&value) {
            IdentityKind::Joker { index: value }
        } else {
            IdentityKind::Unknown
        };
    }
    match Suit::from_name(name) {
        Some(suit) if (RANK_MIN..=RANK_MAX).contains(&value) => IdentityKind::Standard {
            suit,
            rank: value,
        },
        _ => IdentityKind::Unknown,
    }
}

/// The fixed universe: 52 standard cards plus the two jokers.
/// `joker-(1)` precedes `joker-(2)` wherever jokers order among themselves.
pub fn all_identities() -> Vec<CardIdentity> {
    let mut cards = Vec::with_capacity(54);
    for suit in Suit::ALL {
        for rank in RANK_MIN..=RANK_MAX {
            cards.push(CardIdentity::standard(suit, rank));
        }
    }
    cards.push(CardIdentity::joker(1));
    cards.push(CardIdentity::joker(2));
    cards
}
