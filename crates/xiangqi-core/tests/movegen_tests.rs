use serde::Deserialize;
use xiangqi_core::board::Board;
use xiangqi_core::fen::parse_fen;
use xiangqi_core::movegen::{
    apply_move, generate_all_moves, generate_legal_moves, is_legal_geometry, is_valid_move,
};
use xiangqi_core::types::{Color, Piece, PieceKind, Square};

#[derive(Debug, Deserialize)]
struct PerftBaseline {
    fen: String,
    depth: u8,
    nodes: u64,
}

fn sq(row: u8, col: u8) -> Square {
    Square::new(row, col).expect("valid square")
}

fn place(board: &mut Board, row: u8, col: u8, kind: PieceKind, color: Color) {
    board.set(sq(row, col), Some(Piece::new(kind, color)));
}

fn perft(board: &Board, color: Color, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_all_moves(board, color);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|mv| {
            let mut next = board.clone();
            apply_move(&mut next, mv.from, mv.to).expect("origin occupied");
            perft(&next, color.opposite(), depth - 1)
        })
        .sum()
}

#[test]
fn perft_matches_baselines() {
    let fixture_path = format!(
        "{}/tests/fixtures/perft_baselines.json",
        env!("CARGO_MANIFEST_DIR")
    );
    let fixture = std::fs::read_to_string(fixture_path).expect("read fixture");
    let baselines: Vec<PerftBaseline> = serde_json::from_str(&fixture).expect("parse fixture");
    assert!(!baselines.is_empty());

    for baseline in baselines {
        let parsed = parse_fen(&baseline.fen).expect("valid fen");
        let actual = perft(&parsed.board, parsed.turn, baseline.depth);
        assert_eq!(
            actual, baseline.nodes,
            "perft mismatch: fen={}, depth={}",
            baseline.fen, baseline.depth
        );
    }
}

#[test]
fn cannon_capture_needs_exactly_one_screen() {
    let mut board = Board::empty();
    place(&mut board, 4, 4, PieceKind::Cannon, Color::Red);
    place(&mut board, 4, 6, PieceKind::Pawn, Color::Red);
    place(&mut board, 4, 7, PieceKind::Pawn, Color::Black);
    assert!(is_valid_move(&board, Color::Red, sq(4, 4), sq(4, 7)));

    place(&mut board, 4, 5, PieceKind::Pawn, Color::Black);
    assert!(!is_valid_move(&board, Color::Red, sq(4, 4), sq(4, 7)));
}

#[test]
fn cannon_slides_like_chariot_when_not_capturing() {
    let mut board = Board::empty();
    place(&mut board, 4, 4, PieceKind::Cannon, Color::Black);
    assert!(is_valid_move(&board, Color::Black, sq(4, 4), sq(4, 0)));
    assert!(is_valid_move(&board, Color::Black, sq(4, 4), sq(9, 4)));
    assert!(!is_valid_move(&board, Color::Black, sq(4, 4), sq(5, 5)));

    place(&mut board, 6, 4, PieceKind::Pawn, Color::Red);
    assert!(!is_valid_move(&board, Color::Black, sq(4, 4), sq(8, 4)));
    assert!(!is_valid_move(&board, Color::Black, sq(4, 4), sq(6, 4)));
    assert!(is_valid_move(&board, Color::Black, sq(4, 4), sq(5, 4)));
}

#[test]
fn chariot_is_blocked_by_any_piece() {
    let mut board = Board::empty();
    place(&mut board, 9, 0, PieceKind::Chariot, Color::Red);
    place(&mut board, 5, 0, PieceKind::Pawn, Color::Black);
    assert!(is_valid_move(&board, Color::Red, sq(9, 0), sq(5, 0)));
    assert!(!is_valid_move(&board, Color::Red, sq(9, 0), sq(4, 0)));
    assert!(!is_valid_move(&board, Color::Red, sq(9, 0), sq(8, 1)));
    assert!(is_valid_move(&board, Color::Red, sq(9, 0), sq(9, 8)));
}

#[test]
fn opening_chariot_cannot_move_diagonally() {
    let board = Board::new();
    assert!(!is_valid_move(&board, Color::Red, sq(9, 0), sq(8, 1)));
}

#[test]
fn elephant_eye_and_river() {
    let mut board = Board::empty();
    place(&mut board, 9, 2, PieceKind::Elephant, Color::Red);
    assert!(is_valid_move(&board, Color::Red, sq(9, 2), sq(7, 4)));
    assert!(is_valid_move(&board, Color::Red, sq(9, 2), sq(7, 0)));
    assert!(!is_valid_move(&board, Color::Red, sq(9, 2), sq(8, 3)));

    place(&mut board, 8, 3, PieceKind::Pawn, Color::Black);
    assert!(!is_valid_move(&board, Color::Red, sq(9, 2), sq(7, 4)));

    place(&mut board, 5, 2, PieceKind::Elephant, Color::Red);
    assert!(!is_valid_move(&board, Color::Red, sq(5, 2), sq(3, 4)));
    assert!(is_valid_move(&board, Color::Red, sq(5, 2), sq(7, 4)));

    place(&mut board, 4, 2, PieceKind::Elephant, Color::Black);
    assert!(!is_valid_move(&board, Color::Black, sq(4, 2), sq(6, 0)));
    assert!(is_valid_move(&board, Color::Black, sq(4, 2), sq(2, 0)));
}

#[test]
fn advisor_stays_on_palace_diagonals() {
    let mut board = Board::empty();
    place(&mut board, 9, 3, PieceKind::Advisor, Color::Red);
    assert!(is_valid_move(&board, Color::Red, sq(9, 3), sq(8, 4)));
    assert!(!is_valid_move(&board, Color::Red, sq(9, 3), sq(8, 2)));
    assert!(!is_valid_move(&board, Color::Red, sq(9, 3), sq(8, 3)));

    place(&mut board, 1, 4, PieceKind::Advisor, Color::Black);
    let targets = generate_legal_moves(&board, sq(1, 4));
    assert_eq!(targets.as_slice(), &[sq(0, 3), sq(0, 5), sq(2, 3), sq(2, 5)]);
}

#[test]
fn general_steps_orthogonally_inside_palace() {
    let mut board = Board::empty();
    place(&mut board, 9, 3, PieceKind::General, Color::Red);
    let targets = generate_legal_moves(&board, sq(9, 3));
    assert_eq!(targets.as_slice(), &[sq(8, 3), sq(9, 4)]);

    place(&mut board, 2, 5, PieceKind::General, Color::Black);
    assert!(is_valid_move(&board, Color::Black, sq(2, 5), sq(2, 4)));
    assert!(!is_valid_move(&board, Color::Black, sq(2, 5), sq(3, 5)));
    assert!(!is_valid_move(&board, Color::Black, sq(2, 5), sq(1, 4)));
}

#[test]
fn flying_general_needs_an_empty_file() {
    let mut board = Board::empty();
    place(&mut board, 9, 4, PieceKind::General, Color::Red);
    place(&mut board, 0, 4, PieceKind::General, Color::Black);
    assert!(is_valid_move(&board, Color::Red, sq(9, 4), sq(0, 4)));
    assert!(is_valid_move(&board, Color::Black, sq(0, 4), sq(9, 4)));

    place(&mut board, 5, 4, PieceKind::Pawn, Color::Red);
    assert!(!is_valid_move(&board, Color::Red, sq(9, 4), sq(0, 4)));
    assert!(!is_valid_move(&board, Color::Black, sq(0, 4), sq(9, 4)));
}

#[test]
fn flying_move_only_targets_the_enemy_general() {
    let mut board = Board::empty();
    place(&mut board, 9, 4, PieceKind::General, Color::Red);
    place(&mut board, 2, 4, PieceKind::Chariot, Color::Black);
    assert!(!is_valid_move(&board, Color::Red, sq(9, 4), sq(2, 4)));
    assert!(!is_valid_move(&board, Color::Red, sq(9, 4), sq(5, 4)));
}

#[test]
fn horse_moves_from_the_opening() {
    let board = Board::new();
    let targets = generate_legal_moves(&board, sq(9, 1));
    assert_eq!(targets.as_slice(), &[sq(7, 0), sq(7, 2)]);
    assert!(!is_legal_geometry(&board, sq(9, 1), sq(8, 3)));
}

#[test]
fn pawns_never_retreat() {
    let mut board = Board::empty();
    place(&mut board, 3, 4, PieceKind::Pawn, Color::Red);
    place(&mut board, 6, 4, PieceKind::Pawn, Color::Black);
    assert!(!is_valid_move(&board, Color::Red, sq(3, 4), sq(4, 4)));
    assert!(!is_valid_move(&board, Color::Black, sq(6, 4), sq(5, 4)));
    assert!(is_valid_move(&board, Color::Red, sq(3, 4), sq(3, 3)));
    assert!(is_valid_move(&board, Color::Black, sq(6, 4), sq(6, 5)));
}

#[test]
fn own_pieces_are_never_captured() {
    let board = Board::new();
    for color in Color::ALL {
        for mv in generate_all_moves(&board, color) {
            assert_eq!(mv.piece.color, color);
            assert!(mv.captured.is_none_or(|piece| piece.color != color));
        }
    }
}

#[test]
fn wrong_color_origin_is_rejected() {
    let board = Board::new();
    assert!(!is_valid_move(&board, Color::Black, sq(6, 0), sq(5, 0)));
    assert!(is_valid_move(&board, Color::Red, sq(6, 0), sq(5, 0)));
}

#[test]
fn enumeration_order_is_pieces_then_destinations() {
    let parsed = parse_fen("3k5/9/9/9/4R4/9/9/9/9/5K3 w").unwrap();
    let moves = generate_all_moves(&parsed.board, Color::Red);
    assert_eq!(moves.len(), 19);
    assert_eq!(moves[0].from, sq(4, 4));
    assert_eq!(moves[0].to, sq(0, 4));
    assert!(moves[..17].iter().all(|mv| mv.from == sq(4, 4)));
    assert!(moves[17..].iter().all(|mv| mv.from == sq(9, 5)));
    assert!(moves
        .windows(2)
        .all(|pair| pair[0].from != pair[1].from || pair[0].to.index() < pair[1].to.index()));
}
