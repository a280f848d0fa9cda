use xiangqi_core::{
    encode_fen, parse_fen, Board, Color, FenError, GameMode, GameSession, Piece, PieceKind,
    Square, START_POSITION,
};

#[test]
fn parse_start_position() {
    let parsed = parse_fen(START_POSITION).unwrap();
    assert_eq!(parsed.turn, Color::Red);
    assert_eq!(parsed.board, Board::new());
}

#[test]
fn encode_start_position() {
    assert_eq!(encode_fen(&Board::new(), Color::Red), START_POSITION);
    assert!(encode_fen(&Board::new(), Color::Black).ends_with(" b"));
}

#[test]
fn uppercase_is_red_lowercase_is_black() {
    let parsed = parse_fen(START_POSITION).unwrap();
    assert_eq!(
        parsed.board.piece_at(Square::new_unchecked(9, 0)),
        Some(Piece::new(PieceKind::Chariot, Color::Red))
    );
    assert_eq!(
        parsed.board.piece_at(Square::new_unchecked(0, 4)),
        Some(Piece::new(PieceKind::General, Color::Black))
    );
}

#[test]
fn trailing_fields_are_ignored() {
    let parsed = parse_fen("4k4/9/9/9/9/9/9/9/9/R3K1R2 b - - 0 1").unwrap();
    assert_eq!(parsed.turn, Color::Black);
    assert_eq!(parsed.board.count(Color::Red), 3);
    assert_eq!(parsed.board.count(Color::Black), 1);
    assert_eq!(
        encode_fen(&parsed.board, parsed.turn),
        "4k4/9/9/9/9/9/9/9/9/R3K1R2 b"
    );
}

#[test]
fn wxf_letters_decode_to_canonical_pieces() {
    let parsed =
        parse_fen("rheakaehr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RHEAKAEHR w").unwrap();
    assert_eq!(parsed.board, Board::new());
}

#[test]
fn rejects_short_and_long_rows() {
    assert_eq!(
        parse_fen("rnbakabn/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w"),
        Err(FenError::RowLength { row: 0, columns: 8 })
    );
    assert_eq!(
        parse_fen("rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C2/9/RNBAKABNR w"),
        Err(FenError::RowLength { row: 7, columns: 10 })
    );
    assert_eq!(
        parse_fen("rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNRR w"),
        Err(FenError::RowLength { row: 9, columns: 10 })
    );
}

#[test]
fn rejects_wrong_row_count() {
    assert_eq!(
        parse_fen("rnbakabnr/9/1c5c1/p1p1p1p1p/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w"),
        Err(FenError::RowCount(9))
    );
}

#[test]
fn rejects_unknown_tokens() {
    assert_eq!(
        parse_fen("rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNX w"),
        Err(FenError::UnknownToken { row: 9, token: 'X' })
    );
    assert_eq!(
        parse_fen("rnbakabnr/9/1c5c1/p1p1p1p1p/9/09/P1P1P1P1P/1C5C1/9/RNBAKABNR w"),
        Err(FenError::UnknownToken { row: 5, token: '0' })
    );
}

#[test]
fn rejects_missing_or_bad_side() {
    assert_eq!(parse_fen(""), Err(FenError::Empty));
    assert_eq!(
        parse_fen("rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR"),
        Err(FenError::MissingSideToMove)
    );
    assert_eq!(
        parse_fen("rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR r"),
        Err(FenError::InvalidSideToMove("r".to_string()))
    );
}

#[test]
fn failed_decode_leaves_session_untouched() {
    let mut session = GameSession::new();
    session.init_game(GameMode::Local, None).unwrap();
    assert!(session.make_move(Square::new_unchecked(6, 0), Square::new_unchecked(5, 0)));
    let before = session.fen();

    assert!(session.load_fen("9/9/9 w").is_err());
    assert!(session
        .init_game(GameMode::Local, Some("rnbakabnr/9/9/9/9/9/9/9/9/RNBAKABN w"))
        .is_err());
    assert_eq!(session.fen(), before);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn encoder_never_emits_zero_or_double_digit_runs() {
    let encoded = encode_fen(&Board::empty(), Color::Red);
    assert_eq!(encoded, "9/9/9/9/9/9/9/9/9/9 w");

    let mut board = Board::empty();
    board.set(
        Square::new_unchecked(0, 8),
        Some(Piece::new(PieceKind::Pawn, Color::Red)),
    );
    board.set(
        Square::new_unchecked(1, 0),
        Some(Piece::new(PieceKind::Pawn, Color::Black)),
    );
    let encoded = encode_fen(&board, Color::Black);
    assert_eq!(encoded, "8P/p8/9/9/9/9/9/9/9/9 b");
    assert!(!encoded.contains('0'));
}
