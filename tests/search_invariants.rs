use tavola::board::{move_to_uci, Board, Color, Move};
use tavola::rules::legal_moves;
use tavola::search::{Search, SearchParams, MATE};

// Root choice by unpruned minimax: strict improvement, first move wins ties
fn plain_root(board: &Board, depth: u8, params: SearchParams) -> (Option<Move>, i32) {
    let mut search = Search::new(board.clone(), params);
    let maximizing = board.side == Color::White;
    let mut best: Option<(Move, i32)> = None;
    for mv in legal_moves(board) {
        let mut child = board.clone();
        child.apply_move(mv);
        let score = search.minimax_plain(&mut child, depth - 1, !maximizing, 1);
        let better = match best {
            None => true,
            Some((_, b)) if maximizing => score > b,
            Some((_, b)) => score < b,
        };
        if better {
            best = Some((mv, score));
        }
    }
    match best {
        Some((mv, score)) => (Some(mv), score),
        None => (None, 0),
    }
}

fn assert_alpha_beta_matches_minimax(fen: &str, depth: u8) {
    let board = Board::from_fen(fen).expect("Invalid FEN");
    let params = SearchParams::new();
    let (plain_move, plain_score) = plain_root(&board, depth, params.clone());

    let mut search = Search::new(board, params);
    let result = search.search_depth(depth);

    assert_eq!(result.score, plain_score, "score differs for {fen} at depth {depth}");
    assert_eq!(
        move_to_uci(result.best_move),
        move_to_uci(plain_move),
        "best move differs for {fen} at depth {depth}"
    );
}

#[test]
fn alpha_beta_equals_minimax_startpos() {
    assert_alpha_beta_matches_minimax(tavola::board::START_FEN, 3);
}

#[test]
fn alpha_beta_equals_minimax_middlegame() {
    assert_alpha_beta_matches_minimax(
        "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
        3,
    );
}

#[test]
fn alpha_beta_equals_minimax_black_to_move() {
    assert_alpha_beta_matches_minimax(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b KQkq - 0 1",
        2,
    );
}

#[test]
fn alpha_beta_prunes_something() {
    let board = Board::startpos();
    let mut search = Search::with_board(board.clone());
    search.search_depth(3);
    let pruned_nodes = search.stats().nodes;
    assert!(search.stats().cutoffs > 0);

    let mut plain = Search::with_board(board.clone());
    let mut child = board;
    plain.minimax_plain(&mut child, 3, true, 0);
    assert!(pruned_nodes < plain.stats().nodes);
}

#[test]
fn mate_in_1_white() {
    // Scholar's mate: Qxf7#
    let board = Board::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4").unwrap();
    let mut search = Search::with_board(board);
    let result = search.search_depth(2);
    assert_eq!(move_to_uci(result.best_move), "h5f7");
    assert_eq!(result.score, MATE - 1);
}

#[test]
fn mate_in_1_black() {
    // Fool's mate: Qh4#
    let board = Board::from_fen("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2").unwrap();
    let mut search = Search::with_board(board);
    let result = search.search_depth(2);
    assert_eq!(move_to_uci(result.best_move), "d8h4");
    assert_eq!(result.score, -(MATE - 1));
}

#[test]
fn timed_search_stops_on_forced_mate() {
    let board = Board::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4").unwrap();
    let mut search = Search::new(board, SearchParams::new().max_depth(6));
    let result = search.search_timed(60_000);
    assert_eq!(move_to_uci(result.best_move), "h5f7");
    assert_eq!(result.depth, 2);
}

#[test]
fn no_move_when_mated_or_stalemated() {
    let mated = Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
    let mut search = Search::with_board(mated.clone());
    assert_eq!(search.select_best_move(100), None);

    let stalemate = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let mut search = Search::with_board(stalemate);
    let result = search.search_depth(3);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, 0);

    // without mate scoring the static evaluation stands in
    let mut search = Search::new(mated.clone(), SearchParams::new().mate_scoring(false));
    let result = search.search_depth(2);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, tavola::eval::evaluate(&mated));
}

#[test]
fn tiny_budget_still_returns_a_legal_move() {
    let board = Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    let mut search = Search::new(board.clone(), SearchParams::new().max_depth(10));
    let result = search.search_timed(0);
    let mv = result.best_move.expect("depth 1 always completes");
    assert!(legal_moves(&board).contains(&mv));
    assert_eq!(result.depth, 1);
}

#[test]
fn abandoned_depth_keeps_last_completed_result() {
    let board = Board::startpos();
    let mut search = Search::new(board.clone(), SearchParams::new().max_depth(10));
    let result = search.search_timed(200);
    assert!(result.depth >= 1 && result.depth < 10);

    let iterations = &search.stats().iterations;
    let last = iterations.last().expect("at least depth 1");
    assert_eq!(last.depth, result.depth);
    assert_eq!(last.best_move, result.best_move);
    for (i, it) in iterations.iter().enumerate() {
        assert_eq!(it.depth as usize, i + 1);
    }
    assert_eq!(search.board(), &board);
}
