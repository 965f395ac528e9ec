use std::fmt;

use rand::Rng;

use super::player::Player;
use crate::config::BoardConfig;
use crate::error::{ConfigError, MoveError};

pub const MIN_DIMENSION: usize = 3;
pub const MAX_DIMENSION: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    A,
    B,
}

impl Cell {
    /// The player owning this cell, if any
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::A => Some(Player::A),
            Cell::B => Some(Player::B),
        }
    }

    fn symbol(self) -> char {
        match self.owner() {
            Some(player) => player.symbol(),
            None => '.',
        }
    }
}

/// A line direction along which pieces can connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
    DiagonalUp,
    DiagonalDown,
}

impl Axis {
    pub const ALL: [Axis; 4] = [
        Axis::Horizontal,
        Axis::Vertical,
        Axis::DiagonalUp,
        Axis::DiagonalDown,
    ];

    /// (row, column) step along this axis
    pub fn step(self) -> (isize, isize) {
        match self {
            Axis::Horizontal => (0, 1),
            Axis::Vertical => (1, 0),
            Axis::DiagonalUp => (1, 1),
            Axis::DiagonalDown => (-1, 1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(self, Axis::DiagonalUp | Axis::DiagonalDown)
    }
}

/// Game board with gravity. Row 0 is the bottom row; pieces stack upward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    columns: usize,
    win_length: usize,
    allow_diagonal: bool,
    cells: Vec<Cell>,
    heights: Vec<usize>,
    current_turn: Player,
    piece_count: usize,
    last_move: Option<(usize, usize)>,
}

impl Board {
    /// Create a new empty board with player A to move.
    ///
    /// `win_length` is clamped to the larger board dimension.
    pub fn new(
        rows: usize,
        columns: usize,
        win_length: usize,
        allow_diagonal: bool,
    ) -> Result<Self, ConfigError> {
        Self::with_first_player(rows, columns, win_length, allow_diagonal, Player::A)
    }

    /// Create a new empty board with `first` to move.
    pub fn with_first_player(
        rows: usize,
        columns: usize,
        win_length: usize,
        allow_diagonal: bool,
        first: Player,
    ) -> Result<Self, ConfigError> {
        validate_shape(rows, columns, win_length)?;

        Ok(Board {
            rows,
            columns,
            win_length: win_length.min(rows.max(columns)),
            allow_diagonal,
            cells: vec![Cell::Empty; rows * columns],
            heights: vec![0; columns],
            current_turn: first,
            piece_count: 0,
            last_move: None,
        })
    }

    pub fn from_config(config: &BoardConfig, first: Player) -> Result<Self, ConfigError> {
        Self::with_first_player(
            config.rows,
            config.columns,
            config.win_length,
            config.allow_diagonal,
            first,
        )
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Effective win length after clamping
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    pub fn allows_diagonal(&self) -> bool {
        self.allow_diagonal
    }

    /// Player whose piece the next drop places
    pub fn current_turn(&self) -> Player {
        self.current_turn
    }

    pub fn piece_count(&self) -> usize {
        self.piece_count
    }

    /// (row, column) of the most recent drop
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        col >= self.columns || self.heights[col] >= self.rows
    }

    /// Drop the current player's piece in a column, returns the row where it
    /// landed. Does not switch turns.
    pub fn drop_in_column(&mut self, col: usize) -> Result<usize, MoveError> {
        if col >= self.columns {
            return Err(MoveError::InvalidColumn {
                column: col,
                columns: self.columns,
            });
        }

        let row = self.heights[col];
        if row >= self.rows {
            return Err(MoveError::ColumnFull(col));
        }

        let idx = self.index(row, col);
        self.cells[idx] = self.current_turn.to_cell();
        self.heights[col] += 1;
        self.piece_count += 1;
        self.last_move = Some((row, col));
        Ok(row)
    }

    pub fn switch_player(&mut self) {
        self.current_turn = self.current_turn.other();
    }

    pub fn contains_empty_cell(&self) -> bool {
        self.piece_count < self.rows * self.columns
    }

    /// Columns that can still take a piece, in ascending order
    pub fn possible_drops(&self) -> Vec<usize> {
        (0..self.columns)
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }

    /// Pick a legal column uniformly at random
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, MoveError> {
        let open = (0..self.columns)
            .filter(|&col| !self.is_column_full(col))
            .count();
        if open == 0 {
            return Err(MoveError::NoLegalMove);
        }

        let pick = rng.random_range(0..open);
        (0..self.columns)
            .filter(|&col| !self.is_column_full(col))
            .nth(pick)
            .ok_or(MoveError::NoLegalMove)
    }

    /// Scan the whole board for a run of `win_length` connected pieces
    pub fn check_for_victory(&self) -> bool {
        self.find_run().is_some()
    }

    /// Game-over predicate consulted after each move
    pub fn check_for_winner(&self) -> bool {
        self.check_for_victory()
    }

    /// Owner of a winning run, if one exists
    pub fn winner(&self) -> Option<Player> {
        self.find_run()
            .and_then(|(row, col, _, _)| self.get(row, col).owner())
    }

    /// Cells of a maximal winning run, ordered along its axis
    pub fn winning_run(&self) -> Option<Vec<(usize, usize)>> {
        let (row, col, axis, len) = self.find_run()?;
        let (dr, dc) = axis.step();
        Some(
            (0..len as isize)
                .map(|k| {
                    (
                        (row as isize + k * dr) as usize,
                        (col as isize + k * dc) as usize,
                    )
                })
                .collect(),
        )
    }

    /// Check only the runs through the last dropped piece.
    ///
    /// Agrees with [`Board::check_for_victory`] whenever the position before
    /// the last drop had no winning run.
    pub fn last_move_wins(&self) -> bool {
        let Some((row, col)) = self.last_move else {
            return false;
        };
        let cell = self.get(row, col);
        if cell == Cell::Empty {
            return false;
        }

        self.axes().any(|axis| {
            let (dr, dc) = axis.step();
            let forward = self.count_from(row, col, dr, dc, cell);
            let backward = self.count_from(row, col, -dr, -dc, cell);
            1 + forward + backward >= self.win_length
        })
    }

    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.columns, "cell ({row}, {col}) out of bounds");
        row * self.columns + col
    }

    /// Cell lookup that treats off-board coordinates as empty
    fn cell_at(&self, row: isize, col: isize) -> Cell {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.columns {
            return Cell::Empty;
        }
        self.cells[row as usize * self.columns + col as usize]
    }

    fn axes(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL
            .into_iter()
            .filter(move |axis| self.allow_diagonal || !axis.is_diagonal())
    }

    /// Number of `cell`-owned pieces strictly beyond (row, col) along (dr, dc)
    fn count_from(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        (1..)
            .map(|k| (row as isize + k * dr, col as isize + k * dc))
            .take_while(|&(r, c)| self.cell_at(r, c) == cell)
            .count()
    }

    /// First maximal run reaching `win_length`: (start row, start col, axis, length)
    fn find_run(&self) -> Option<(usize, usize, Axis, usize)> {
        for row in 0..self.rows {
            for col in 0..self.columns {
                let cell = self.get(row, col);
                if cell == Cell::Empty {
                    continue;
                }

                for axis in self.axes() {
                    let (dr, dc) = axis.step();
                    // Only count from the first cell of a run
                    if self.cell_at(row as isize - dr, col as isize - dc) == cell {
                        continue;
                    }
                    let len = 1 + self.count_from(row, col, dr, dc, cell);
                    if len >= self.win_length {
                        return Some((row, col, axis, len));
                    }
                }
            }
        }
        None
    }
}

/// Check board dimensions and win length before construction.
pub(crate) fn validate_shape(
    rows: usize,
    columns: usize,
    win_length: usize,
) -> Result<(), ConfigError> {
    let range = MIN_DIMENSION..=MAX_DIMENSION;
    if !range.contains(&rows) {
        return Err(ConfigError::InvalidConfiguration(format!(
            "rows must be in [{MIN_DIMENSION}, {MAX_DIMENSION}], got {rows}"
        )));
    }
    if !range.contains(&columns) {
        return Err(ConfigError::InvalidConfiguration(format!(
            "columns must be in [{MIN_DIMENSION}, {MAX_DIMENSION}], got {columns}"
        )));
    }
    if win_length == 0 {
        return Err(ConfigError::InvalidConfiguration(
            "win_length must be > 0".into(),
        ));
    }
    Ok(())
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = (1..=self.columns).map(|c| c.to_string()).collect();
        writeln!(f, " {} ", header.join(" "))?;

        for row in (0..self.rows).rev() {
            let line: Vec<String> = (0..self.columns)
                .map(|col| self.get(row, col).symbol().to_string())
                .collect();
            writeln!(f, "|{}|", line.join(" "))?;
        }

        write!(f, "+{}+", "-".repeat(2 * self.columns - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Drop a piece for `player` regardless of whose turn it is
    fn place(board: &mut Board, col: usize, player: Player) -> usize {
        if board.current_turn() != player {
            board.switch_player();
        }
        board.drop_in_column(col).unwrap()
    }

    fn assert_gravity(board: &Board) {
        for col in 0..board.columns() {
            let filled = (0..board.rows())
                .take_while(|&row| board.get(row, col) != Cell::Empty)
                .count();
            for row in filled..board.rows() {
                assert_eq!(
                    board.get(row, col),
                    Cell::Empty,
                    "floating piece at ({row}, {col})"
                );
            }
        }
        let occupied = (0..board.rows())
            .flat_map(|row| (0..board.columns()).map(move |col| (row, col)))
            .filter(|&(row, col)| board.get(row, col) != Cell::Empty)
            .count();
        assert_eq!(occupied, board.piece_count());
    }

    #[test]
    fn test_new_board_is_empty() {
        for rows in MIN_DIMENSION..=MAX_DIMENSION {
            for columns in MIN_DIMENSION..=MAX_DIMENSION {
                let board = Board::new(rows, columns, 3, true).unwrap();
                assert_eq!(board.piece_count(), 0);
                assert_eq!(board.last_move(), None);
                for row in 0..rows {
                    for col in 0..columns {
                        assert_eq!(board.get(row, col), Cell::Empty);
                    }
                }
            }
        }
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert!(matches!(
            Board::new(2, 4, 3, true),
            Err(ConfigError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Board::new(4, 9, 3, true),
            Err(ConfigError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Board::new(4, 4, 0, true),
            Err(ConfigError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_win_length_is_clamped() {
        let board = Board::new(3, 5, 10, false).unwrap();
        assert_eq!(board.win_length(), 5);

        let board = Board::new(6, 7, 4, true).unwrap();
        assert_eq!(board.win_length(), 4);
    }

    #[test]
    fn test_drop_lands_bottom_up() {
        let mut board = Board::new(4, 4, 4, true).unwrap();

        let row = board.drop_in_column(2).unwrap();
        assert_eq!(row, 0);
        assert_eq!(board.get(0, 2), Cell::A);
        assert_eq!(board.last_move(), Some((0, 2)));

        board.switch_player();
        let row = board.drop_in_column(2).unwrap();
        assert_eq!(row, 1);
        assert_eq!(board.get(1, 2), Cell::B);
        assert_eq!(board.piece_count(), 2);
    }

    #[test]
    fn test_drop_does_not_switch_turn() {
        let mut board = Board::new(4, 4, 4, true).unwrap();
        board.drop_in_column(0).unwrap();
        assert_eq!(board.current_turn(), Player::A);
        board.switch_player();
        assert_eq!(board.current_turn(), Player::B);
    }

    #[test]
    fn test_column_full_leaves_board_unchanged() {
        let mut board = Board::new(3, 3, 3, true).unwrap();
        for _ in 0..3 {
            board.drop_in_column(1).unwrap();
            board.switch_player();
        }
        assert!(board.is_column_full(1));

        let before = board.clone();
        assert_eq!(board.drop_in_column(1), Err(MoveError::ColumnFull(1)));
        assert_eq!(board, before);
        assert_eq!(board.current_turn(), before.current_turn());
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new(4, 4, 4, true).unwrap();
        assert_eq!(
            board.drop_in_column(4),
            Err(MoveError::InvalidColumn {
                column: 4,
                columns: 4
            })
        );
        assert_eq!(board.piece_count(), 0);
    }

    #[test]
    fn test_gravity_holds_for_random_drops() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::new(5, 6, 4, true).unwrap();
        while board.contains_empty_cell() {
            let col = board.random_move(&mut rng).unwrap();
            let before = board.piece_count();
            board.drop_in_column(col).unwrap();
            board.switch_player();
            assert_eq!(board.piece_count(), before + 1);
            assert_gravity(&board);
        }
        assert_eq!(board.piece_count(), 30);
        assert!(board.possible_drops().is_empty());
    }

    #[test]
    fn test_possible_drops_ascending() {
        let mut board = Board::new(3, 4, 3, true).unwrap();
        assert_eq!(board.possible_drops(), vec![0, 1, 2, 3]);
        for _ in 0..3 {
            board.drop_in_column(2).unwrap();
            board.switch_player();
        }
        assert_eq!(board.possible_drops(), vec![0, 1, 3]);
    }

    #[test]
    fn test_random_move_is_legal() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut board = Board::new(3, 4, 3, true).unwrap();
        for _ in 0..3 {
            board.drop_in_column(0).unwrap();
            board.switch_player();
        }
        for _ in 0..200 {
            let col = board.random_move(&mut rng).unwrap();
            assert!(board.possible_drops().contains(&col));
        }
    }

    #[test]
    fn test_random_move_on_full_board() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut board = Board::new(3, 3, 3, false).unwrap();
        for col in 0..3 {
            for _ in 0..3 {
                board.drop_in_column(col).unwrap();
            }
        }
        assert!(!board.contains_empty_cell());
        assert_eq!(board.random_move(&mut rng), Err(MoveError::NoLegalMove));
    }

    #[test]
    fn test_empty_board_has_no_victory() {
        let board = Board::new(8, 8, 3, true).unwrap();
        assert!(!board.check_for_victory());
        assert_eq!(board.winner(), None);
        assert_eq!(board.winning_run(), None);
    }

    #[test]
    fn test_horizontal_win_row_zero() {
        let mut board = Board::new(4, 4, 4, false).unwrap();
        for col in 0..4 {
            board.drop_in_column(col).unwrap();
        }
        assert!(board.check_for_victory());
        assert!(board.check_for_winner());
        assert_eq!(board.winner(), Some(Player::A));
        assert_eq!(
            board.winning_run(),
            Some(vec![(0, 0), (0, 1), (0, 2), (0, 3)])
        );
    }

    #[test]
    fn test_vertical_stack() {
        let mut board = Board::new(4, 4, 4, false).unwrap();
        for _ in 0..3 {
            board.drop_in_column(0).unwrap();
        }
        assert!(!board.check_for_victory());

        board.drop_in_column(0).unwrap();
        assert!(board.check_for_victory());
        assert_eq!(
            board.winning_run(),
            Some(vec![(0, 0), (1, 0), (2, 0), (3, 0)])
        );
    }

    #[test]
    fn test_filled_board_without_run_is_draw() {
        // Bottom to top: A A B / B B A / A A B
        let mut board = Board::new(3, 3, 3, true).unwrap();
        let layout = [
            [Player::A, Player::A, Player::B],
            [Player::B, Player::B, Player::A],
            [Player::A, Player::A, Player::B],
        ];
        for pieces in layout {
            for (col, player) in pieces.into_iter().enumerate() {
                place(&mut board, col, player);
            }
        }

        assert!(!board.contains_empty_cell());
        assert!(!board.check_for_victory());
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_diagonal_only_counts_when_allowed() {
        let build = |allow_diagonal: bool| {
            let mut board = Board::new(4, 4, 3, allow_diagonal).unwrap();
            // A on (0,0), (1,1), (2,2); B fills underneath
            place(&mut board, 0, Player::A);
            place(&mut board, 1, Player::B);
            place(&mut board, 1, Player::A);
            place(&mut board, 2, Player::B);
            place(&mut board, 2, Player::B);
            place(&mut board, 2, Player::A);
            board
        };

        let with = build(true);
        assert!(with.check_for_victory());
        assert_eq!(with.winner(), Some(Player::A));
        assert_eq!(with.winning_run(), Some(vec![(0, 0), (1, 1), (2, 2)]));

        let without = build(false);
        assert!(!without.check_for_victory());
    }

    #[test]
    fn test_diagonal_down_win() {
        let mut board = Board::new(4, 4, 3, true).unwrap();
        // B on (2,0), (1,1), (0,2)
        place(&mut board, 2, Player::B);
        place(&mut board, 1, Player::A);
        place(&mut board, 1, Player::B);
        place(&mut board, 0, Player::A);
        place(&mut board, 0, Player::A);
        place(&mut board, 0, Player::B);

        assert!(board.check_for_victory());
        assert_eq!(board.winner(), Some(Player::B));
        assert!(board.last_move_wins());
    }

    #[test]
    fn test_mixed_owners_do_not_form_run() {
        let mut board = Board::new(4, 5, 4, true).unwrap();
        place(&mut board, 0, Player::A);
        place(&mut board, 1, Player::A);
        place(&mut board, 2, Player::B);
        place(&mut board, 3, Player::A);
        place(&mut board, 4, Player::A);
        assert!(!board.check_for_victory());
        assert!(!board.last_move_wins());
    }

    #[test]
    fn test_axis_shorter_than_win_length_never_wins() {
        let mut board = Board::new(3, 6, 4, true).unwrap();
        for _ in 0..3 {
            board.drop_in_column(0).unwrap();
        }
        assert!(board.is_column_full(0));
        assert!(!board.check_for_victory());
        assert!(!board.last_move_wins());

        for col in 1..4 {
            board.drop_in_column(col).unwrap();
        }
        assert!(board.check_for_victory());
        assert!(board.last_move_wins());
        assert_eq!(
            board.winning_run(),
            Some(vec![(0, 0), (0, 1), (0, 2), (0, 3)])
        );
    }

    #[test]
    fn test_run_longer_than_win_length_counts() {
        let mut board = Board::new(3, 6, 4, false).unwrap();
        for col in [0, 1, 3, 4, 2] {
            board.drop_in_column(col).unwrap();
        }
        assert!(board.check_for_victory());
        assert_eq!(board.winning_run().map(|run| run.len()), Some(5));
    }

    #[test]
    fn test_checks_are_idempotent() {
        let mut board = Board::new(4, 4, 3, true).unwrap();
        place(&mut board, 0, Player::A);
        place(&mut board, 1, Player::B);
        assert_eq!(board.check_for_victory(), board.check_for_victory());
        assert_eq!(board.contains_empty_cell(), board.contains_empty_cell());

        for _ in 0..3 {
            place(&mut board, 2, Player::A);
        }
        assert!(board.check_for_victory());
        assert!(board.check_for_victory());
    }

    #[test]
    fn test_last_move_agrees_with_global_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let mut board = Board::new(6, 7, 4, true).unwrap();
            while board.contains_empty_cell() {
                let col = board.random_move(&mut rng).unwrap();
                board.drop_in_column(col).unwrap();
                assert_eq!(board.last_move_wins(), board.check_for_victory());
                if board.check_for_victory() {
                    break;
                }
                board.switch_player();
            }
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let mut board = Board::new(4, 4, 4, true).unwrap();
        board.drop_in_column(0).unwrap();
        let snapshot = board.clone();

        let mut copy = board.clone();
        copy.drop_in_column(1).unwrap();
        copy.switch_player();

        assert_eq!(board, snapshot);
        assert_eq!(board.get(0, 1), Cell::Empty);
        assert_eq!(copy.piece_count(), 2);
    }

    #[test]
    fn test_display_renders_top_row_first() {
        let mut board = Board::new(3, 3, 3, true).unwrap();
        place(&mut board, 1, Player::A);
        place(&mut board, 1, Player::B);
        let expected = " 1 2 3 \n|. . .|\n|. O .|\n|. X .|\n+-----+";
        assert_eq!(board.to_string(), expected);
    }
}
