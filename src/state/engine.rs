//! Match engine.
//!
//! Coordinates game creation, move legality, turn ownership and move commits
//! on top of a [`GamesStore`]. Legality and the turn check run inside the
//! store's per-game lock, so two concurrent moves on one game cannot both
//! pass against the same board.

use tracing::{debug, info};

use super::config::EngineConfig;
use super::dictionary::WordChecker;
use super::error::{FailReason, MatchError};
use super::game::{scoreboard, validate_roster, Game, GameId, Move, PersonId, Player, PlayerMove};
use super::lifecycle::UpdateGameOptions;
use super::store::{GameView, GamesStore};
use super::turn;
use super::validation::MoveValidator;

/// Runs matches: owns the games store, the move validator and the config.
pub struct MatchEngine<S, D> {
    store: S,
    validator: MoveValidator<D>,
    config: EngineConfig,
}

impl<S: GamesStore, D: WordChecker> MatchEngine<S, D> {
    pub fn new(store: S, dictionary: D, config: EngineConfig) -> Self {
        Self {
            store,
            validator: MoveValidator::new(dictionary),
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn validator(&self) -> &MoveValidator<D> {
        &self.validator
    }

    /// Create a game. Zero for `board_size` or `tiles_per_player` selects the
    /// configured default.
    pub fn start_new_game(
        &self,
        players: Vec<Player>,
        board_size: usize,
        tiles_per_player: usize,
    ) -> Result<Game, MatchError> {
        validate_roster(&players)?;
        let board_size = self.config.board_size_or_default(board_size);
        let tiles_per_player = self.config.tiles_per_player_or_default(tiles_per_player);
        self.store.create_game(players, board_size, tiles_per_player)
    }

    /// Why the move is illegal on `game`, or `None` if it may be played.
    pub fn validate_move(&self, game: &Game, player_move: &PlayerMove) -> Option<FailReason> {
        self.validator.validate_move(game, player_move)
    }

    /// Validate and commit a move.
    ///
    /// The move is checked against the stored game rather than the caller's
    /// snapshot: legality first, then turn ownership. Nothing is written on
    /// failure.
    pub fn make_move(&self, game: &Game, player_move: PlayerMove) -> Result<Game, MatchError> {
        let guard = |current: &Game, history: &[Move]| -> Result<(), MatchError> {
            if let Some(reason) = self.validator.validate_move(current, &player_move) {
                return Err(MatchError::InvalidMove(reason));
            }

            let expected = turn::next_turn_player(current, history)?;
            if expected.person_id() != player_move.player.person_id() {
                debug!(
                    game_id = current.id,
                    expected = expected.person_id(),
                    attempted = player_move.player.person_id(),
                    "move out of turn"
                );
                return Err(MatchError::TurnOrder {
                    expected: Box::new(expected),
                    attempted: Box::new(player_move.player.clone()),
                });
            }
            Ok(())
        };

        let updated = self.store.make_move(game.id, player_move.clone(), &guard)?;
        info!(
            game_id = updated.id,
            person_id = player_move.player.person_id(),
            state = %updated.state,
            "move accepted"
        );
        Ok(updated)
    }

    pub fn next_turn_player(&self, game_id: GameId) -> Result<Player, MatchError> {
        self.store.next_turn_player(game_id)
    }

    pub fn get_game(&self, game_id: GameId) -> Result<Game, MatchError> {
        self.store.get_game(game_id)
    }

    pub fn lookup_game(&self, game_id: GameId) -> Option<Game> {
        self.store.lookup_game(game_id)
    }

    pub fn update_game(&self, options: UpdateGameOptions) -> Result<Game, MatchError> {
        let game_id = options.game_id;
        self.store.update_game(options)?;
        self.store.get_game(game_id)
    }

    pub fn delete_game(&self, game_id: GameId) -> Result<(), MatchError> {
        self.store.delete_game(game_id)
    }

    pub fn games(&self, view: &GameView, offset: usize, limit: usize) -> Vec<Game> {
        self.store.get_games(view, offset, limit)
    }

    pub fn games_count(&self, view: &GameView) -> usize {
        self.store.games_count(view)
    }

    pub fn game_history(
        &self,
        game_id: GameId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Move>, MatchError> {
        self.store.game_history(game_id, limit, offset)
    }

    pub fn game_history_count(&self, game_id: GameId) -> Result<usize, MatchError> {
        self.store.game_history_count(game_id)
    }

    /// Points per person over the whole history, best first.
    pub fn scoreboard(&self, game_id: GameId) -> Result<Vec<(PersonId, u32)>, MatchError> {
        let history = self.store.game_history(game_id, usize::MAX, 0)?;
        Ok(scoreboard(&history))
    }
}
