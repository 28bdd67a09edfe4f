//! Move legality rules.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. **Boundary** - the word must fit on the board from its start cell.
//! 2. **Opening move** - on a game with no moves yet only the dictionary
//!    applies; the board is empty so adjacency is meaningless.
//! 3. **Overlap / share** - letters landing on tiles must match them, the word
//!    may not sit entirely on an existing word, and it must touch the board.
//! 4. **Words formed** - the word and every crossing word it completes must be
//!    in the dictionary.

use tracing::debug;

use super::board::BoardMatrix;
use super::dictionary::WordChecker;
use super::error::{FailKind, FailReason};
use super::game::{Game, MoveDirection, PlayerMove};

/// Rules engine for word placements.
#[derive(Debug, Clone)]
pub struct MoveValidator<D> {
    dictionary: D,
}

impl<D: WordChecker> MoveValidator<D> {
    pub fn new(dictionary: D) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &D {
        &self.dictionary
    }

    /// Why the move is illegal, or `None` if it may be played.
    pub fn validate_move(&self, game: &Game, mv: &PlayerMove) -> Option<FailReason> {
        let matrix = game.board.to_matrix();
        let result = self.check(&matrix, game.is_opening(), mv);
        if let Err(reason) = &result {
            debug!(
                game_id = game.id,
                word = %mv.word,
                row = mv.row,
                col = mv.col,
                direction = %mv.direction,
                kind = reason.kind.as_str(),
                "move rejected"
            );
        }
        result.err()
    }

    /// Run every rule against a board grid.
    pub fn check(
        &self,
        matrix: &BoardMatrix,
        opening: bool,
        mv: &PlayerMove,
    ) -> Result<(), FailReason> {
        check_boundary(matrix.size(), mv)?;

        if opening {
            return self.check_dictionary(mv);
        }

        check_space_share(matrix, mv)?;
        self.check_words_formed(matrix, mv)
    }

    fn check_dictionary(&self, mv: &PlayerMove) -> Result<(), FailReason> {
        if self.dictionary.check_word(&mv.word) {
            Ok(())
        } else {
            Err(FailReason::new(
                FailKind::DictionaryWord,
                format!("word {} specified is not in the dictionary", mv.word),
            ))
        }
    }

    /// The placed word, then each crossing word it completes.
    fn check_words_formed(&self, matrix: &BoardMatrix, mv: &PlayerMove) -> Result<(), FailReason> {
        self.check_dictionary(mv)?;

        for (row, col, letter) in mv.cells() {
            let Some(crossing) = crossing_word(matrix, mv.direction, row, col, letter) else {
                continue;
            };
            debug!(
                row,
                col,
                direction = %mv.direction,
                word = %crossing.word,
                "formed crossing word"
            );
            if !self.dictionary.check_word(&crossing.word) {
                return Err(FailReason::new(
                    FailKind::DictionaryWord,
                    format!(
                        "formed word {} from row {} col {} in direction {} is not in the dictionary",
                        crossing.word,
                        crossing.row,
                        crossing.col,
                        crossing.direction
                    ),
                ));
            }
        }

        Ok(())
    }
}

/// Fail if the word runs past the board edge.
pub fn check_boundary(board_size: usize, mv: &PlayerMove) -> Result<(), FailReason> {
    let len = mv.len();
    let (start, across, label) = match mv.direction {
        MoveDirection::LeftRight => (mv.col, mv.row, "from left to right"),
        MoveDirection::TopBottom => (mv.row, mv.col, "from top to bottom"),
    };

    let past_edge = start.checked_add(len).map_or(true, |end| end > board_size);
    if past_edge || across >= board_size {
        return Err(FailReason::new(
            FailKind::Boundary,
            format!(
                "word {} exceeds the board size in direction {} from row {} col {}",
                mv.word, label, mv.row, mv.col
            ),
        ));
    }
    Ok(())
}

/// Overlap and adjacency rules for a non-opening move.
///
/// The scan stops at the first empty cell that has an occupied neighbour on
/// either side across the word; cells after it are not examined.
pub fn check_space_share(matrix: &BoardMatrix, mv: &PlayerMove) -> Result<(), FailReason> {
    let len = mv.len();
    let mut overlap_count = 0;
    let mut no_share_count = 0;

    for (row, col, letter) in mv.cells() {
        let existing = matrix
            .get(row, col)
            .ok_or_else(|| out_of_board(mv, row, col))?;

        if matrix.is_occupied(row, col) {
            if !same_letter(existing, letter) {
                return Err(FailReason::new(
                    FailKind::OverlapConflict,
                    format!(
                        "word {} overlaps with existing character {} with incorrect character {} at row {} col {} moving direction {}",
                        mv.word, existing, letter, row, col, mv.direction
                    ),
                ));
            }
            overlap_count += 1;
            if overlap_count == len {
                return Err(FailReason::new(
                    FailKind::FullOverlap,
                    format!(
                        "word {} overlaps with existing word {} at row {} col {} moving direction {}",
                        mv.word, mv.word, mv.row, mv.col, mv.direction
                    ),
                ));
            }
        } else if has_side_neighbour(matrix, mv.direction, row, col) {
            break;
        } else {
            no_share_count += 1;
            if no_share_count == len {
                return Err(FailReason::new(
                    FailKind::NoShare,
                    format!(
                        "word {} must share at least one space with an existing word at row {} col {} moving direction {}",
                        mv.word, mv.row, mv.col, mv.direction
                    ),
                ));
            }
        }
    }

    Ok(())
}

/// A word read across the placement through one of its letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossingWord {
    pub word: String,
    /// First cell of the crossing word
    pub row: usize,
    pub col: usize,
    pub direction: MoveDirection,
}

/// Assemble the perpendicular word through `(row, col)` if it is longer than
/// the placed letter alone.
pub fn crossing_word(
    matrix: &BoardMatrix,
    direction: MoveDirection,
    row: usize,
    col: usize,
    letter: char,
) -> Option<CrossingWord> {
    let cross = match direction {
        MoveDirection::LeftRight => MoveDirection::TopBottom,
        MoveDirection::TopBottom => MoveDirection::LeftRight,
    };
    let (along, fixed) = match cross {
        MoveDirection::TopBottom => (row, col),
        MoveDirection::LeftRight => (col, row),
    };
    let cell = |pos: usize| match cross {
        MoveDirection::TopBottom => (pos, fixed),
        MoveDirection::LeftRight => (fixed, pos),
    };
    let occupied = |pos: usize| {
        let (r, c) = cell(pos);
        matrix.is_occupied(r, c)
    };

    let mut start = along;
    while start > 0 && occupied(start - 1) {
        start -= 1;
    }
    let mut end = along;
    while end.checked_add(1).is_some_and(|next| occupied(next)) {
        end += 1;
    }
    if start == end {
        return None;
    }

    let word: String = (start..=end)
        .map(|pos| {
            if pos == along {
                letter
            } else {
                let (r, c) = cell(pos);
                matrix.get(r, c).unwrap_or(letter)
            }
        })
        .collect();
    let (row, col) = cell(start);

    Some(CrossingWord {
        word,
        row,
        col,
        direction: cross,
    })
}

fn has_side_neighbour(matrix: &BoardMatrix, direction: MoveDirection, row: usize, col: usize) -> bool {
    match direction {
        MoveDirection::LeftRight => {
            row.checked_sub(1).is_some_and(|up| matrix.is_occupied(up, col))
                || row.checked_add(1).is_some_and(|down| matrix.is_occupied(down, col))
        }
        MoveDirection::TopBottom => {
            col.checked_sub(1).is_some_and(|left| matrix.is_occupied(row, left))
                || col.checked_add(1).is_some_and(|right| matrix.is_occupied(row, right))
        }
    }
}

fn same_letter(a: char, b: char) -> bool {
    a.to_lowercase().eq(b.to_lowercase())
}

fn out_of_board(mv: &PlayerMove, row: usize, col: usize) -> FailReason {
    FailReason::new(
        FailKind::Boundary,
        format!("word {} leaves the board at row {} col {}", mv.word, row, col),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::board::Board;
    use crate::state::dictionary::DictionaryIndex;
    use crate::state::game::{Person, Player};
    use crate::state::lifecycle::GameState;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Records every lookup and answers from a fixed word list.
    struct Recorder {
        index: DictionaryIndex,
        asked: RefCell<Vec<String>>,
    }

    impl Recorder {
        fn new(words: &[&str]) -> Self {
            Self {
                index: DictionaryIndex::from_words(words),
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl WordChecker for Recorder {
        fn check_word(&self, word: &str) -> bool {
            self.asked.borrow_mut().push(word.to_string());
            self.index.check_word(word)
        }
    }

    fn player() -> Player {
        Player::new(Person::new(1, "ann", "Ann", "Smith"), 1)
    }

    fn lr(word: &str, row: usize, col: usize) -> PlayerMove {
        PlayerMove::new(word, row, col, MoveDirection::LeftRight, player())
    }

    fn tb(word: &str, row: usize, col: usize) -> PlayerMove {
        PlayerMove::new(word, row, col, MoveDirection::TopBottom, player())
    }

    fn matrix(rows: &[&str]) -> BoardMatrix {
        Board::from_rows(rows).to_matrix()
    }

    fn game(rows: &[&str], state: GameState) -> Game {
        let mut game = Game::new(1, vec![player()], rows.len(), 25);
        game.board = Board::from_rows(rows);
        game.state = state;
        game
    }

    const EMPTY5: [&str; 5] = [".....", ".....", ".....", ".....", "....."];

    fn kind(result: Result<(), FailReason>) -> Option<FailKind> {
        result.err().map(|r| r.kind)
    }

    #[test]
    fn test_boundary_out_of_board() {
        assert_eq!(kind(check_boundary(5, &lr("cat", 3, 3))), Some(FailKind::Boundary));
        assert_eq!(kind(check_boundary(5, &lr("marriage", 0, 0))), Some(FailKind::Boundary));
        assert_eq!(kind(check_boundary(5, &tb("cat", 3, 3))), Some(FailKind::Boundary));
        assert_eq!(kind(check_boundary(5, &tb("marriage", 0, 0))), Some(FailKind::Boundary));
        assert_eq!(kind(check_boundary(5, &tb("cat", 1, 5))), Some(FailKind::Boundary));
        assert_eq!(kind(check_boundary(5, &lr("cat", 5, 1))), Some(FailKind::Boundary));
    }

    #[test]
    fn test_boundary_huge_start_rejected() {
        assert_eq!(kind(check_boundary(5, &lr("cat", 0, usize::MAX))), Some(FailKind::Boundary));
        assert_eq!(kind(check_boundary(5, &tb("cat", usize::MAX, 0))), Some(FailKind::Boundary));
        assert_eq!(kind(check_boundary(5, &lr("cat", 0, usize::MAX - 1))), Some(FailKind::Boundary));
    }

    #[test]
    fn test_huge_opening_move_rejected() {
        let validator = MoveValidator::new(DictionaryIndex::from_words(["cat"]));
        let opening = game(&EMPTY5, GameState::Initialized);
        let reason = validator.validate_move(&opening, &lr("cat", 0, usize::MAX)).unwrap();
        assert_eq!(reason.kind, FailKind::Boundary);
    }

    #[test]
    fn test_boundary_within_board() {
        assert!(check_boundary(5, &lr("cat", 3, 2)).is_ok());
        assert!(check_boundary(5, &lr("manny", 0, 0)).is_ok());
        assert!(check_boundary(5, &tb("cat", 2, 4)).is_ok());
        assert!(check_boundary(5, &tb("manny", 0, 4)).is_ok());
    }

    #[test]
    fn test_space_share_full_overlap() {
        let board = matrix(&["cat..", ".....", ".....", ".....", "....."]);
        assert_eq!(kind(check_space_share(&board, &lr("cat", 0, 0))), Some(FailKind::FullOverlap));

        let board = matrix(&["c....", "a....", "t....", ".....", "....."]);
        assert_eq!(kind(check_space_share(&board, &tb("cat", 0, 0))), Some(FailKind::FullOverlap));
    }

    #[test]
    fn test_space_share_partial_overlap() {
        let board = matrix(&["cat..", ".....", ".....", ".....", "....."]);
        assert!(check_space_share(&board, &lr("atm", 0, 1)).is_ok());

        let board = matrix(&["c....", "a....", "t....", ".....", "....."]);
        assert!(check_space_share(&board, &tb("atm", 1, 0)).is_ok());
    }

    #[test]
    fn test_space_share_overlap_conflict() {
        let board = matrix(&["cat..", ".....", ".....", ".....", "....."]);
        let reason = check_space_share(&board, &lr("ant", 0, 1)).unwrap_err();
        assert_eq!(reason.kind, FailKind::OverlapConflict);
        assert!(reason.reason.contains("existing character t with incorrect character n"));

        let board = matrix(&["c....", "a....", "t....", ".....", "....."]);
        assert_eq!(kind(check_space_share(&board, &tb("ant", 1, 0))), Some(FailKind::OverlapConflict));
    }

    #[test]
    fn test_space_share_overlap_ignores_case() {
        let board = matrix(&["CAT..", ".....", ".....", ".....", "....."]);
        assert!(check_space_share(&board, &lr("atm", 0, 1)).is_ok());
    }

    #[test]
    fn test_space_share_adjacent_rows() {
        let above = matrix(&["cat..", ".....", ".....", ".....", "....."]);
        let below = matrix(&[".....", ".....", "cat..", ".....", "....."]);
        for col in 0..3 {
            assert!(check_space_share(&above, &lr("ant", 1, col)).is_ok());
            assert!(check_space_share(&below, &lr("ant", 1, col)).is_ok());
        }
    }

    #[test]
    fn test_space_share_adjacent_columns() {
        let left = matrix(&["c....", "a....", "t....", ".....", "....."]);
        let right = matrix(&[".....", "...c.", "...a.", "...t.", "....."]);
        for row in 0..3 {
            assert!(check_space_share(&left, &tb("ant", row, 1)).is_ok());
            assert!(check_space_share(&right, &tb("ant", row, 2)).is_ok());
        }
    }

    #[test]
    fn test_space_share_isolated_word() {
        let board = matrix(&[".....", "c...h", "a...u", "t...t", "....."]);
        assert_eq!(kind(check_space_share(&board, &tb("ant", 0, 2))), Some(FailKind::NoShare));

        let board = matrix(&[".cat.", ".....", ".....", ".....", ".hut."]);
        let reason = check_space_share(&board, &lr("ant", 2, 0)).unwrap_err();
        assert_eq!(reason.kind, FailKind::NoShare);
        assert!(reason.reason.contains("must share at least one space"));
    }

    #[test]
    fn test_space_share_stops_at_first_adjacency() {
        // 'x' at (1,0) makes the first cell adjacent; the conflicting 't' at
        // (0,2) is never reached.
        let board = matrix(&["..t..", "x....", ".....", ".....", "....."]);
        assert!(check_space_share(&board, &lr("abc", 0, 0)).is_ok());
    }

    #[test]
    fn test_crossing_word_assembly() {
        let board = matrix(&[".....", "pa.t.", ".n.ot", "...oy", "bo..."]);
        let word = |row, letter| {
            crossing_word(&board, MoveDirection::TopBottom, row, 2, letter).map(|c| c.word)
        };
        assert_eq!(word(1, 'c').as_deref(), Some("pact"));
        assert_eq!(word(2, 'a').as_deref(), Some("naot"));
        assert_eq!(word(3, 't').as_deref(), Some("toy"));
        assert_eq!(word(4, 'y').as_deref(), Some("boy"));
        assert_eq!(word(0, 'z'), None);

        let first = crossing_word(&board, MoveDirection::TopBottom, 2, 2, 'a').unwrap();
        assert_eq!((first.row, first.col, first.direction), (2, 1, MoveDirection::LeftRight));
    }

    #[test]
    fn test_words_formed_top_bottom_valid() {
        let rows = [".....", "pa.t.", ".n.ot", "...oy", "bo..."];
        let dictionary = Recorder::new(&["caty", "pact", "naot", "toy", "boy"]);
        let validator = MoveValidator::new(&dictionary);

        assert!(validator.check(&matrix(&rows), false, &tb("caty", 1, 2)).is_ok());
        assert_eq!(
            *dictionary.asked.borrow(),
            vec!["caty", "pact", "naot", "toy", "boy"]
        );
    }

    #[test]
    fn test_words_formed_top_bottom_invalid_crossing() {
        let rows = [".....", "pa.t.", ".n.ot", "...oy", "bo..."];
        let validator = MoveValidator::new(DictionaryIndex::from_words(["caty", "naot", "toy", "boy"]));

        let reason = validator.check(&matrix(&rows), false, &tb("caty", 1, 2)).unwrap_err();
        assert_eq!(reason.kind, FailKind::DictionaryWord);
        assert!(reason.reason.contains("formed word pact"));
    }

    #[test]
    fn test_words_formed_left_right() {
        let rows = [
            ".s.fa..",
            ".t.rn..",
            ".a.ua..",
            ".n.il..",
            ".......",
            ".yn.z..",
            "..t.e..",
        ];
        let words = ["caty", "stancy", "ant", "fruit", "analyze"];
        let validator = MoveValidator::new(DictionaryIndex::from_words(words));
        assert!(validator.check(&matrix(&rows), false, &lr("caty", 4, 1)).is_ok());

        let validator = MoveValidator::new(DictionaryIndex::from_words(&words[..4]));
        let reason = validator.check(&matrix(&rows), false, &lr("caty", 4, 1)).unwrap_err();
        assert!(reason.reason.contains("analyze"));
    }

    #[test]
    fn test_placed_word_always_checked() {
        // Adjacent to 'c' but forms no crossing word longer than one letter.
        let rows = ["c....", ".....", ".....", ".....", "....."];
        let dictionary = Recorder::new(&[]);
        let validator = MoveValidator::new(&dictionary);

        let reason = validator.check(&matrix(&rows), false, &tb("bamn", 0, 1)).unwrap_err();
        assert_eq!(reason.kind, FailKind::DictionaryWord);
        assert!(reason.reason.contains("word bamn specified is not in the dictionary"));
        assert_eq!(*dictionary.asked.borrow(), vec!["bamn"]);
    }

    #[test]
    fn test_opening_move_only_checks_dictionary() {
        let validator = MoveValidator::new(DictionaryIndex::from_words(["test"]));
        let opening = game(&EMPTY5, GameState::Initialized);

        assert_eq!(validator.validate_move(&opening, &lr("test", 0, 0)), None);
        assert_eq!(validator.validate_move(&opening, &tb("test", 1, 4)), None);

        let reason = validator.validate_move(&opening, &lr("tset", 0, 0)).unwrap();
        assert_eq!(reason.kind, FailKind::DictionaryWord);

        let reason = validator.validate_move(&opening, &lr("test", 0, 2)).unwrap();
        assert_eq!(reason.kind, FailKind::Boundary);
    }

    #[test]
    fn test_non_opening_isolated_word_rejected() {
        let validator = MoveValidator::new(DictionaryIndex::from_words(["test", "cat"]));
        let in_progress = game(&["cat..", ".....", ".....", ".....", "....."], GameState::InProgress);

        let reason = validator.validate_move(&in_progress, &lr("test", 3, 0)).unwrap();
        assert_eq!(reason.kind, FailKind::NoShare);
    }

    #[test]
    fn test_non_opening_valid_extension() {
        let validator = MoveValidator::new(DictionaryIndex::from_words(["cat", "atom"]));
        let in_progress = game(&["cat..", ".....", ".....", ".....", "....."], GameState::InProgress);

        assert_eq!(validator.validate_move(&in_progress, &tb("atom", 0, 1)), None);
    }

    #[test]
    fn test_marriage_does_not_fit() {
        let validator = MoveValidator::new(DictionaryIndex::from_words(["marriage"]));
        let opening = game(&EMPTY5, GameState::Initialized);
        let reason = validator.validate_move(&opening, &lr("marriage", 0, 0)).unwrap();
        assert_eq!(reason.kind, FailKind::Boundary);
    }
}
