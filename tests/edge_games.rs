//! Regression games
//!
//! Each fixture is a short game in which O lifts a piece off an X piece and
//! X wins on the next move. The agent, given the position two moves
//! earlier, must not hand X the game.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use gobblers::{Agent, Board, MoveRecord, Player, Symmetry};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Fixture {
    #[allow(dead_code)]
    description: String,
    games: Vec<Game>,
}

#[derive(Debug, Deserialize)]
struct Game {
    winner: Player,
    moves: Vec<MoveRecord>,
}

fn load_fixture() -> Fixture {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/edge_games.json");
    let file = File::open(&path).unwrap_or_else(|e| panic!("open {}: {e}", path.display()));
    serde_json::from_reader(BufReader::new(file)).expect("parse edge_games.json")
}

#[test]
fn test_fixture_games_replay_to_recorded_winner() {
    let fixture = load_fixture();
    assert_eq!(fixture.games.len(), 8);

    for game in &fixture.games {
        let board = Board::from_moves(&game.moves).expect("fixture game is legal");
        assert_eq!(board.winner(), Some(game.winner), "{:?}", board.notation());
        assert_eq!(board.moves(), game.moves.as_slice());
    }
}

#[test]
fn test_agent_does_not_expose_a_win() {
    let fixture = load_fixture();

    for game in &fixture.games {
        for seed in 0..10 {
            let mut board = Board::new();
            board.replay(&game.moves).unwrap();
            board.undo(2).unwrap();
            assert_eq!(board.turn(), Player::O);

            let mut agent = Agent::with_seed(&mut board, seed);
            assert!(agent.play());
            assert!(agent.play());

            assert!(
                !board.is_terminal(),
                "seed {seed}: {:?}\n{}",
                board.notation(),
                board
            );
        }
    }
}

#[test]
fn test_reflected_games_keep_their_winner() {
    let fixture = load_fixture();

    for game in &fixture.games {
        let original = Board::from_moves(&game.moves).unwrap();
        for symmetry in Symmetry::ALL {
            let mut board = original.clone();
            board.reflect_with(symmetry).unwrap();
            assert_eq!(board.winner(), Some(game.winner), "{symmetry:?}");

            board.reflect_with(symmetry).unwrap();
            assert_eq!(board, original, "{symmetry:?}");
        }
    }
}

#[test]
fn test_board_json_is_the_move_log() {
    let fixture = load_fixture();
    let game = &fixture.games[0];

    let mut board = Board::from_moves(&game.moves).unwrap();
    board.undo(1).unwrap();

    let json = serde_json::to_string(&board).unwrap();
    assert_eq!(json, r#"["X-1-0-1-1","O-3-0-1-1","X-3-0-0-2","O-3-0-2-1"]"#);

    let back: Board = serde_json::from_str(&json).unwrap();
    assert_eq!(back, board);
    assert_eq!(back.render(), board.render());
}

#[test]
fn test_illegal_log_is_rejected_on_load() {
    // O moves twice in a row.
    let err = serde_json::from_str::<Board>(r#"["X-1-0-0-0","O-1-0-1-1","O-1-1-2-2"]"#);
    assert!(err.is_err());
}
