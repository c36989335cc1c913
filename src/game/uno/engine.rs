use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cards::{self, Card, Color, Value};
use crate::game::{GameError, GameState};
use crate::room::models::Room;

/// Per-session UNO state. Deck and discard pile are stacks: cards are drawn
/// from, and played onto, the tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnoState {
    pub hands: HashMap<String, Vec<Card>>,
    pub deck: Vec<Card>,
    pub discard_pile: Vec<Card>,
    pub current_color: Color,
    /// +1 clockwise, -1 counter-clockwise
    pub direction: i32,
    /// Usernames in the order they emptied their hand; the first entry is
    /// the winner of record for session tallying
    pub winners: Vec<String>,
}

impl UnoState {
    /// Cards are only ever moved between deck, discard pile, and hands
    pub fn total_cards(&self) -> usize {
        self.deck.len()
            + self.discard_pile.len()
            + self.hands.values().map(Vec::len).sum::<usize>()
    }
}

/// A card is playable iff it is wild, or shares a color with the active
/// color, or shares a value with the discard top.
pub fn is_playable(card: &Card, top_value: Value, current_color: Color) -> bool {
    card.is_wild() || card.color == current_color || card.value == top_value
}

/// Deals a fresh game into the room: shuffled 108-card deck, 7 cards per
/// player in roster order, a non-wild starter seeding the discard pile and
/// fixing the active color. First roster player acts first, clockwise.
pub fn start_game(room: &mut Room, rng: &mut impl Rng) -> Result<(), GameError> {
    let mut deck = cards::build_deck();
    deck.shuffle(rng);

    let mut hands: HashMap<String, Vec<Card>> = HashMap::new();
    for player in &room.players {
        let mut hand = Vec::with_capacity(7);
        for _ in 0..7 {
            if let Some(card) = deck.pop() {
                hand.push(card);
            }
        }
        hands.insert(player.username.clone(), hand);
    }

    // Flip cards until a non-wild surfaces; wilds cannot fix the color
    let mut skipped_wilds = Vec::new();
    let starter = loop {
        let Some(card) = deck.pop() else { break None };
        if card.is_wild() {
            skipped_wilds.push(card);
        } else {
            break Some(card);
        }
    };
    let Some(starter) = starter else {
        // Unreachable with a real deck; at most 8 of 108 cards are wild
        return Err(GameError::InvalidMove);
    };
    // Skipped wilds return to the bottom of the deck, never leave the game
    for card in skipped_wilds {
        deck.insert(0, card);
    }

    let current_color = starter.color;
    room.game_state = Some(GameState::Uno(UnoState {
        hands,
        deck,
        discard_pile: vec![starter],
        current_color,
        direction: 1,
        winners: Vec::new(),
    }));
    room.status = crate::room::models::RoomStatus::Playing;
    room.set_current_player(0);
    Ok(())
}

/// Plays the named card from the acting player's hand. Guards of the
/// generic session machine (status, turn) are enforced by the caller; this
/// validates card ownership, legality, and wild color choice, and leaves
/// the room untouched on any failure.
pub fn play_card(
    room: &mut Room,
    username: &str,
    card_id: &str,
    chosen_color: Option<Color>,
    rng: &mut impl Rng,
) -> Result<(), GameError> {
    let players = room.usernames();
    let player_count = players.len();
    let current_index = room.current_player_index;

    let Some(GameState::Uno(state)) = room.game_state.as_mut() else {
        return Err(GameError::InvalidMove);
    };

    // All validation happens before the first mutation
    let hand = state.hands.get(username).ok_or(GameError::CardNotInHand)?;
    let card_index = hand
        .iter()
        .position(|c| c.id == card_id)
        .ok_or(GameError::CardNotInHand)?;
    let card = hand[card_index].clone();

    let top_value = state
        .discard_pile
        .last()
        .map(|c| c.value)
        .ok_or(GameError::InvalidMove)?;
    if !is_playable(&card, top_value, state.current_color) {
        return Err(GameError::InvalidMove);
    }

    let new_color = if card.is_wild() {
        match chosen_color {
            Some(color) if Color::WILD_CHOICES.contains(&color) => color,
            _ => return Err(GameError::InvalidColorChoice),
        }
    } else {
        card.color
    };

    // Commit: card moves from hand to discard top
    if let Some(hand) = state.hands.get_mut(username) {
        hand.remove(card_index);
    }
    state.discard_pile.push(card.clone());
    state.current_color = new_color;

    // Exactly one side effect per card; numbered cards have none
    let mut skip = 0;
    let mut draw_amount = 0;
    match card.value {
        Value::Skip => skip = 1,
        Value::Reverse => {
            state.direction = -state.direction;
            // With two players a Reverse degenerates to a Skip
            if player_count == 2 {
                skip = 1;
            }
        }
        Value::DrawTwo => {
            draw_amount = 2;
            skip = 1;
        }
        Value::WildDrawFour => {
            draw_amount = 4;
            skip = 1;
        }
        _ => {}
    }

    if state.hands.get(username).is_some_and(Vec::is_empty) {
        state.winners.push(username.to_string());
    }

    let direction = state.direction;
    let next_index = (current_index as i32 + direction * (1 + skip))
        .rem_euclid(player_count as i32) as usize;

    // The forced draw lands on the immediate next player, before any skip
    if draw_amount > 0 {
        let victim_index =
            (current_index as i32 + direction).rem_euclid(player_count as i32) as usize;
        draw_cards(state, &players[victim_index], draw_amount, rng);
        debug!(victim = %players[victim_index], count = draw_amount, "Forced draw applied");
    }

    // Elimination: when at most one player still holds cards, the game ends
    // and the last holdout joins the winners list
    let mut remaining = 0;
    let mut last_player: Option<&str> = None;
    for name in &players {
        let holds_cards = state.hands.get(name).is_some_and(|h| !h.is_empty());
        if !state.winners.iter().any(|w| w == name) && holds_cards {
            remaining += 1;
            last_player = Some(name);
        }
    }

    let mut finished = false;
    if remaining <= 1 {
        if let Some(last) = last_player {
            state.winners.push(last.to_string());
        }
        finished = true;
    }
    let winner_of_record = state.winners.first().cloned();

    room.set_current_player(next_index);
    if finished {
        room.record_finish(winner_of_record.as_deref());
    }
    Ok(())
}

/// Draws exactly one card into the caller's hand, then passes the turn one
/// step in the current direction. Drawing never skips anyone.
pub fn draw_card(room: &mut Room, username: &str, rng: &mut impl Rng) -> Result<(), GameError> {
    let player_count = room.players.len();
    let current_index = room.current_player_index;

    let Some(GameState::Uno(state)) = room.game_state.as_mut() else {
        return Err(GameError::InvalidMove);
    };

    draw_cards(state, username, 1, rng);

    let next_index =
        (current_index as i32 + state.direction).rem_euclid(player_count as i32) as usize;
    room.set_current_player(next_index);
    Ok(())
}

/// Shared draw primitive: pops from the deck tail; on an empty deck the
/// discard pile (minus its top card) is reshuffled back in. If both are
/// exhausted the draw silently stops short.
fn draw_cards(state: &mut UnoState, username: &str, count: usize, rng: &mut impl Rng) {
    for _ in 0..count {
        if state.deck.is_empty() {
            if state.discard_pile.len() <= 1 {
                break;
            }
            let top_index = state.discard_pile.len() - 1;
            let top = state.discard_pile.remove(top_index);
            state.deck.append(&mut state.discard_pile);
            state.discard_pile.push(top);
            state.deck.shuffle(rng);
            debug!(deck_size = state.deck.len(), "Reshuffled discard pile into deck");
        }
        match state.deck.pop() {
            Some(card) => {
                if let Some(hand) = state.hands.get_mut(username) {
                    hand.push(card);
                }
            }
            None => break,
        }
    }
}
