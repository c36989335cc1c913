use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Card colors. `Black` is reserved for wild cards, which carry no fixed
/// color until they are played.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Black,
}

impl Color {
    /// The four colors a wild card may resolve to
    pub const WILD_CHOICES: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Color::Red => "Red",
                Color::Blue => "Blue",
                Color::Green => "Green",
                Color::Yellow => "Yellow",
                Color::Black => "Black",
            }
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum Value {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    Skip,
    Reverse,
    #[serde(rename = "Draw Two")]
    DrawTwo,
    Wild,
    #[serde(rename = "Wild Draw Four")]
    WildDrawFour,
}

impl Value {
    /// The numbered values 1..9 that appear twice per color
    pub const DOUBLED_NUMBERS: [Value; 9] = [
        Value::One,
        Value::Two,
        Value::Three,
        Value::Four,
        Value::Five,
        Value::Six,
        Value::Seven,
        Value::Eight,
        Value::Nine,
    ];

    /// The action values that appear twice per color
    pub const COLORED_ACTIONS: [Value; 3] = [Value::Skip, Value::Reverse, Value::DrawTwo];
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Value::Zero => "0",
                Value::One => "1",
                Value::Two => "2",
                Value::Three => "3",
                Value::Four => "4",
                Value::Five => "5",
                Value::Six => "6",
                Value::Seven => "7",
                Value::Eight => "8",
                Value::Nine => "9",
                Value::Skip => "Skip",
                Value::Reverse => "Reverse",
                Value::DrawTwo => "Draw Two",
                Value::Wild => "Wild",
                Value::WildDrawFour => "Wild Draw Four",
            }
        )
    }
}

/// A single UNO card. The id is opaque to callers; it is only ever compared
/// for equality when a player names the card they want to play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub color: Color,
    pub value: Value,
}

impl Card {
    fn new(color: Color, value: Value, copy: usize) -> Self {
        Self {
            // Stable within a deck build, so a seeded shuffle reproduces
            // the exact same game.
            id: format!("{}-{}-{}", color, value, copy).to_lowercase(),
            color,
            value,
        }
    }

    pub fn is_wild(&self) -> bool {
        self.color == Color::Black
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.value)
    }
}

/// Builds the standard 108-card UNO deck, unshuffled: per color one "0",
/// two of each "1".."9", two each of Skip/Reverse/Draw Two, plus four Wild
/// and four Wild Draw Four.
pub fn build_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(108);

    for color in Color::WILD_CHOICES {
        deck.push(Card::new(color, Value::Zero, 1));
        for value in Value::DOUBLED_NUMBERS {
            deck.push(Card::new(color, value, 1));
            deck.push(Card::new(color, value, 2));
        }
        for value in Value::COLORED_ACTIONS {
            deck.push(Card::new(color, value, 1));
            deck.push(Card::new(color, value, 2));
        }
    }

    for copy in 1..=4 {
        deck.push(Card::new(Color::Black, Value::Wild, copy));
        deck.push(Card::new(Color::Black, Value::WildDrawFour, copy));
    }

    deck
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_deck_has_108_cards() {
        assert_eq!(build_deck().len(), 108);
    }

    #[test]
    fn test_deck_color_composition() {
        let deck = build_deck();
        for color in Color::WILD_CHOICES {
            let count = deck.iter().filter(|c| c.color == color).count();
            // 19 numbered (one 0, two each 1-9) + 6 special
            assert_eq!(count, 25, "{color} should have 25 cards");
        }
        let black = deck.iter().filter(|c| c.color == Color::Black).count();
        assert_eq!(black, 8);
    }

    #[test]
    fn test_deck_ids_are_unique() {
        let deck = build_deck();
        let ids: HashSet<&str> = deck.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), deck.len());
    }

    #[test]
    fn test_wild_cards_are_black() {
        for card in build_deck() {
            let wild_value = matches!(card.value, Value::Wild | Value::WildDrawFour);
            assert_eq!(card.is_wild(), wild_value, "{card}");
        }
    }

    #[test]
    fn test_value_serializes_to_display_names() {
        let json = serde_json::to_string(&Value::DrawTwo).unwrap();
        assert_eq!(json, "\"Draw Two\"");
        let json = serde_json::to_string(&Value::Seven).unwrap();
        assert_eq!(json, "\"7\"");
    }
}
