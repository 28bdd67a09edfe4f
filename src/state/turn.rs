//! Turn order.
//!
//! Players move in order `1..=N`, wrapping. The player after the most recent
//! mover is next; games that have not started, or are finished, always point
//! at order 1.

use tracing::warn;

use super::error::MatchError;
use super::game::{Game, Move, Player};
use super::lifecycle::GameState;

/// Whose turn it is, given the game and its move history.
pub fn next_turn_player(game: &Game, history: &[Move]) -> Result<Player, MatchError> {
    if game.state != GameState::InProgress || game.player_count() == 0 {
        return first_player(game);
    }

    let Some(last) = latest_move(history) else {
        warn!(game_id = game.id, "game in progress without moves, falling back to first player");
        return first_player(game);
    };

    // Use the mover's current seat; the recorded order only if they left.
    let last_order = game
        .player_for_person(last.player.person_id())
        .map_or(last.player.order, |p| p.order);
    let next_order = usize::from(last_order) % game.player_count() + 1;

    match u8::try_from(next_order).ok().and_then(|o| game.player_by_order(o)) {
        Some(player) => Ok(player.clone()),
        None => {
            warn!(
                game_id = game.id,
                next_order, "no player seated at next order, falling back to first player"
            );
            first_player(game)
        }
    }
}

/// The player with order 1.
pub fn first_player(game: &Game) -> Result<Player, MatchError> {
    game.player_by_order(1).cloned().ok_or_else(|| {
        MatchError::DataCorruption(format!("player 1 not found for game with id {}", game.id))
    })
}

/// Most recent move by time, commit sequence breaking ties.
pub fn latest_move(history: &[Move]) -> Option<&Move> {
    history.iter().max_by_key(|m| (m.time, m.seq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::{MoveDirection, Person, PlayerMove};
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn make_player(id: i64, order: u8) -> Player {
        Player::new(Person::new(id, format!("user{}", id), "First", "Last"), order)
    }

    fn four_player_game(state: GameState) -> Game {
        let players = (1..=4).map(|o| make_player(100 + i64::from(o), o)).collect();
        let mut game = Game::new(9, players, 15, 225);
        game.state = state;
        game
    }

    fn moved(player: &Player, seconds: i64, seq: u64) -> Move {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::seconds(seconds);
        Move::record(
            PlayerMove::new("word", 0, 0, MoveDirection::LeftRight, player.clone()),
            time,
            seq,
        )
    }

    fn order_of(result: Result<Player, MatchError>) -> u8 {
        result.unwrap().order
    }

    #[test]
    fn test_new_game_starts_with_order_one() {
        let game = four_player_game(GameState::Initialized);
        assert_eq!(order_of(next_turn_player(&game, &[])), 1);
    }

    #[test]
    fn test_finished_game_points_at_order_one() {
        let game = four_player_game(GameState::Finished);
        let history = vec![moved(&game.players[2], 0, 0)];
        assert_eq!(order_of(next_turn_player(&game, &history)), 1);
    }

    #[test]
    fn test_next_after_most_recent_mover() {
        let game = four_player_game(GameState::InProgress);
        let history = vec![moved(&game.players[0], 0, 0), moved(&game.players[1], 10, 1)];
        assert_eq!(order_of(next_turn_player(&game, &history)), 3);
    }

    #[test]
    fn test_wraps_after_last_order() {
        let game = four_player_game(GameState::InProgress);
        let history = vec![moved(&game.players[3], 5, 3)];
        assert_eq!(order_of(next_turn_player(&game, &history)), 1);
    }

    #[test]
    fn test_history_order_does_not_matter() {
        let game = four_player_game(GameState::InProgress);
        let history = vec![moved(&game.players[2], 30, 2), moved(&game.players[0], 10, 0)];
        assert_eq!(order_of(next_turn_player(&game, &history)), 4);
    }

    #[test]
    fn test_same_timestamp_uses_sequence() {
        let game = four_player_game(GameState::InProgress);
        let history = vec![moved(&game.players[1], 0, 7), moved(&game.players[0], 0, 6)];
        assert_eq!(order_of(next_turn_player(&game, &history)), 3);
    }

    #[test]
    fn test_in_progress_without_history_falls_back() {
        let game = four_player_game(GameState::InProgress);
        assert_eq!(order_of(next_turn_player(&game, &[])), 1);
    }

    #[test]
    fn test_missing_first_player_is_corruption() {
        let mut game = four_player_game(GameState::Initialized);
        game.players.retain(|p| p.order != 1);
        let err = next_turn_player(&game, &[]).unwrap_err();
        assert!(matches!(err, MatchError::DataCorruption(_)));
    }
}
