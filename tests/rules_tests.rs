//! Rules engine integration tests: terminal conditions and captures.

use tablut_mcts::games::tablut::{
    CellKind, GameState, Grid, PieceKind, Position, Side, Status,
};

fn p(row: u8, col: u8) -> Position {
    Position::new(row, col)
}

/// Play the generated move from `from` to `to`; panics if it is not legal.
fn play(state: &mut GameState, from: (u8, u8), to: (u8, u8)) {
    let (from, to) = (p(from.0, from.1), p(to.0, to.1));
    let action = state
        .legal_actions()
        .into_iter()
        .find(|a| a.from() == from && a.to == to)
        .unwrap_or_else(|| panic!("{from} -> {to} is not legal\n{state}"));
    state.apply_action(&action);
    state.check_index().unwrap();
}

fn assert_exclusive(state: &GameState) {
    let flags = [state.is_white_win(), state.is_black_win(), state.is_draw()];
    assert!(flags.iter().filter(|f| **f).count() <= 1, "{state:?}");
}

// =============================================================================
// Standard Position
// =============================================================================

#[test]
fn test_standard_position() {
    let state = GameState::new();

    assert_eq!(state.turn(), Side::White);
    assert_eq!(state.status(), Status::Ongoing);
    assert_eq!(state.king(), Some(Position::CITADEL));
    assert_eq!(state.white_count(), 9);
    assert_eq!(state.black_count(), 16);
    assert!(state.is_first_move());

    let dump = state.to_string();
    let rows: Vec<&str> = dump.lines().collect();
    assert_eq!(rows.len(), 9);
    assert_eq!(rows[0], "---BBB---");
    assert_eq!(rows[4], "BBWWKWWBB");
}

// =============================================================================
// King Escape
// =============================================================================

#[test]
fn test_king_escape_from_standard_position() {
    let mut state = GameState::new();

    play(&mut state, (4, 3), (7, 3));
    play(&mut state, (3, 8), (3, 7));
    play(&mut state, (4, 4), (4, 3));
    play(&mut state, (3, 7), (2, 7));
    play(&mut state, (4, 3), (2, 3));
    play(&mut state, (2, 7), (1, 7));
    assert_eq!(state.status(), Status::Ongoing);

    play(&mut state, (2, 3), (2, 0));

    assert_eq!(state.king(), Some(p(2, 0)));
    assert!(state.is_white_win());
    assert!(!state.is_black_win());
    assert!(!state.is_draw());
    assert!(state.legal_actions().is_empty());
}

#[test]
fn test_every_escape_cell_wins() {
    let escapes: Vec<Position> = Position::all()
        .filter(|pos| tablut_mcts::games::tablut::geometry::cell_kind(*pos) == CellKind::Escape)
        .collect();
    assert_eq!(escapes.len(), 16);

    for escape in escapes {
        let mut grid = Grid::empty();
        grid.set(p(8, 8), PieceKind::Black);
        grid.set(p(0, 0), PieceKind::White);
        let king = Position::all()
            .find(|pos| {
                pos.distance(escape) == 1 && !pos.is_on_edge() && grid.is_empty(*pos)
            })
            .expect("every escape cell has an inner neighbour");
        grid.set(king, PieceKind::King);

        let mut state = GameState::from_grid(grid, Side::White).unwrap();
        let action = state
            .actions_from(king)
            .find(|a| a.to == escape)
            .cloned()
            .unwrap();
        state.apply_action(&action);

        assert_eq!(state.status(), Status::WhiteWin, "escape at {escape}");
    }
}

// =============================================================================
// King Capture
// =============================================================================

fn king_beside_citadel(black_flanks: &[(u8, u8)]) -> GameState {
    let mut grid = Grid::empty();
    grid.set(p(3, 4), PieceKind::King);
    grid.set(p(8, 8), PieceKind::White);
    grid.set(p(2, 1), PieceKind::Black);
    for &(row, col) in black_flanks {
        grid.set(p(row, col), PieceKind::Black);
    }
    GameState::from_grid(grid, Side::Black).unwrap()
}

#[test]
fn test_king_beside_citadel_needs_three_black_neighbours() {
    // (3,3), (3,5), the arriving piece at (2,4) and the Citadel.
    let mut state = king_beside_citadel(&[(3, 3), (3, 5)]);
    play(&mut state, (2, 1), (2, 4));

    assert!(state.is_black_win());
    assert_eq!(state.king(), None);
    assert_exclusive(&state);
}

#[test]
fn test_king_beside_citadel_survives_two_black_neighbours() {
    let mut state = king_beside_citadel(&[(3, 3)]);
    play(&mut state, (2, 1), (2, 4));

    assert_eq!(state.status(), Status::Ongoing);
    assert_eq!(state.king(), Some(p(3, 4)));
    assert_eq!(state.grid().get(p(3, 4)), PieceKind::King);
}

#[test]
fn test_king_sandwiched_away_from_centre() {
    let mut grid = Grid::empty();
    grid.set(p(6, 2), PieceKind::King);
    grid.set(p(6, 1), PieceKind::Black);
    grid.set(p(8, 3), PieceKind::Black);
    grid.set(p(0, 8), PieceKind::White);
    let mut state = GameState::from_grid(grid, Side::Black).unwrap();

    play(&mut state, (8, 3), (6, 3));

    assert!(state.is_black_win());
    assert_eq!(state.white_count(), 1);
}

#[test]
fn test_capturing_last_black_piece_wins() {
    let mut grid = Grid::empty();
    grid.set(p(0, 0), PieceKind::King);
    grid.set(p(2, 2), PieceKind::Black);
    grid.set(p(2, 1), PieceKind::White);
    grid.set(p(6, 3), PieceKind::White);
    let mut state = GameState::from_grid(grid, Side::White).unwrap();

    play(&mut state, (6, 3), (2, 3));

    assert_eq!(state.black_count(), 0);
    assert!(state.is_white_win());
}

// =============================================================================
// Repetition
// =============================================================================

#[test]
fn test_first_repetition_is_a_draw() {
    let mut grid = Grid::empty();
    grid.set(Position::CITADEL, PieceKind::King);
    grid.set(p(6, 6), PieceKind::White);
    grid.set(p(2, 2), PieceKind::Black);
    let mut state = GameState::from_grid(grid, Side::White).unwrap();

    play(&mut state, (6, 6), (6, 7));
    play(&mut state, (2, 2), (2, 3));
    play(&mut state, (6, 7), (6, 6));
    assert_eq!(state.status(), Status::Ongoing);

    play(&mut state, (2, 3), (2, 2));

    assert!(state.is_draw());
    assert_exclusive(&state);
    assert_eq!(state.grid(), &grid);
}

#[test]
fn test_capture_resets_repetition() {
    let mut grid = Grid::empty();
    grid.set(Position::CITADEL, PieceKind::King);
    grid.set(p(6, 6), PieceKind::White);
    grid.set(p(8, 7), PieceKind::White);
    grid.set(p(7, 7), PieceKind::Black);
    grid.set(p(2, 2), PieceKind::Black);
    let mut state = GameState::from_grid(grid, Side::White).unwrap();

    play(&mut state, (6, 6), (6, 7));
    assert_eq!(state.black_count(), 1);
    assert_eq!(state.history_len(), 1);

    play(&mut state, (2, 2), (2, 3));
    play(&mut state, (6, 7), (6, 6));
    play(&mut state, (2, 3), (2, 2));
    assert_eq!(state.status(), Status::Ongoing);

    // Back to the board right after the capture.
    play(&mut state, (6, 6), (6, 7));
    assert!(state.is_draw());
}

// =============================================================================
// Stalemate and Temporary Moves
// =============================================================================

#[test]
fn test_side_without_moves_loses() {
    let mut grid = Grid::empty();
    grid.set(p(0, 0), PieceKind::Black);
    grid.set(p(0, 1), PieceKind::White);
    grid.set(p(2, 2), PieceKind::King);
    grid.set(p(3, 0), PieceKind::White);
    let mut state = GameState::from_grid(grid, Side::White).unwrap();

    // Boxes in the corner piece without taking it.
    play(&mut state, (3, 0), (1, 0));

    assert_eq!(state.turn(), Side::Black);
    assert!(state.is_white_win());
}

#[test]
fn test_temporary_move_restores_grid() {
    let mut state = GameState::new();
    let before = *state.grid();

    for action in state.legal_actions() {
        {
            let peek = state.temporary(&action);
            assert_eq!(peek.grid().get(action.to), action.kind());
            assert!(peek.grid().is_empty(action.from()));
        }
        assert_eq!(state.grid(), &before);
    }
    state.check_index().unwrap();
}
