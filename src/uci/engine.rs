//! UCI engine state machine and the stdin/stdout loop around it
//!
//! Searches run synchronously inside `go`: the reply to `go` already holds
//! the `info` lines and the `bestmove`. `stop` therefore has nothing to
//! interrupt and is accepted silently, and `go infinite` deepens until
//! `MaxDepth` rather than until a `stop` arrives.

use super::options::{UciOptions, MAX_DEPTH_LIMIT};
use super::parser::{parse_uci_command, GoParams, UciCommand};
use crate::board::{move_to_uci, parse_uci_move, Board, Color};
use crate::error::Result;
use crate::perft::perft_divide;
use crate::search::{Search, SearchParams, SearchResult, TimeManagement, MATE, MATE_THRESHOLD};
use crate::time::TimeManager;
use std::io::{self, BufRead, Write};

pub const ENGINE_NAME: &str = "Tavola";
pub const ENGINE_AUTHOR: &str = "the Tavola developers";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciState {
    Init,
    Ready,
}

pub struct UciEngine {
    state: UciState,
    board: Board,
    running: bool,
    options: UciOptions,
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UciEngine {
    pub fn new() -> Self {
        Self {
            state: UciState::Init,
            board: Board::startpos(),
            running: true,
            options: UciOptions::default(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> UciState {
        self.state
    }

    pub fn options(&self) -> &UciOptions {
        &self.options
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn handle_command(&mut self, cmd: UciCommand) -> Vec<String> {
        let mut res = Vec::new();
        match cmd {
            UciCommand::Uci => {
                res.push(format!("id name {} {}", ENGINE_NAME, env!("CARGO_PKG_VERSION")));
                res.push(format!("id author {}", ENGINE_AUTHOR));
                for option in UciOptions::definitions() {
                    res.push(option.declaration());
                }
                res.push("uciok".to_string());
                self.state = UciState::Ready;
            }
            UciCommand::IsReady => {
                res.push("readyok".to_string());
            }
            UciCommand::UciNewGame => {
                self.board = Board::startpos();
                self.state = UciState::Ready;
            }
            UciCommand::Position { fen, moves } => {
                // Nothing changes unless the FEN and every move are accepted
                match position_from(fen.as_deref(), &moves) {
                    Ok(board) => self.board = board,
                    Err(e) => res.push(format!("info string {}", e)),
                }
                self.state = UciState::Ready;
            }
            UciCommand::Go(go) => {
                res.extend(self.go(&go));
                self.state = UciState::Ready;
            }
            UciCommand::Stop => {
                self.state = UciState::Ready;
            }
            UciCommand::SetOption { name, value } => {
                if let Err(e) = self.options.set_option(&name, value.as_deref()) {
                    res.push(format!("info string {}", e));
                }
            }
            UciCommand::Display => {
                res.extend(self.board.to_string().lines().map(str::to_string));
                res.push(format!("Fen: {}", self.board.to_fen()));
            }
            UciCommand::Perft { depth } => match depth {
                Some(depth) => {
                    let divide = perft_divide(&self.board, depth);
                    let total: u64 = divide.iter().map(|(_, n)| n).sum();
                    for (mv, nodes) in divide {
                        res.push(format!("{}: {}", mv, nodes));
                    }
                    res.push(String::new());
                    res.push(format!("Nodes searched: {}", total));
                }
                None => res.push("info string usage: perft <depth>".to_string()),
            },
            UciCommand::Quit => {
                self.running = false;
            }
            UciCommand::Unknown(s) => {
                if !s.is_empty() {
                    res.push(format!("info string unknown command: {}", s));
                }
            }
        }
        res
    }

    fn go(&mut self, go: &GoParams) -> Vec<String> {
        let params = self.options.search_params();
        let mut search = Search::new(self.board.clone(), params.clone());

        let result = match go.depth {
            Some(depth) if !go.has_clock() => search.search_depth(depth.clamp(1, MAX_DEPTH_LIMIT)),
            _ => {
                let budget = if go.infinite {
                    u64::MAX
                } else {
                    budget_for(go, &params, self.board.side)
                };
                let capped = match go.depth {
                    Some(depth) => params.clone().max_depth(depth),
                    None => params,
                };
                search.set_params(capped);
                search.search_timed(budget)
            }
        };

        let mut res: Vec<String> = search
            .stats()
            .iterations
            .iter()
            .map(|it| {
                let mut line = format!(
                    "info depth {} score {} nodes {} time {}",
                    it.depth,
                    uci_score(it.score, self.board.side),
                    it.nodes,
                    it.elapsed_ms
                );
                if let Some(mv) = it.best_move {
                    line.push_str(&format!(" pv {}", mv));
                }
                line
            })
            .collect();
        res.push(bestmove_line(&result));
        res
    }
}

fn budget_for(go: &GoParams, params: &SearchParams, side: Color) -> u64 {
    let tm = TimeManagement::new().with_msec_per_move(params.time_limit_ms);
    TimeManager::allocate_time(
        &tm,
        go.wtime,
        go.btime,
        go.winc,
        go.binc,
        go.movetime,
        go.movestogo,
        side == Color::White,
    )
}

/// Build the position named by a `position` command, rejecting it whole
/// if the FEN or any move is bad.
pub fn position_from(fen: Option<&str>, moves: &[String]) -> Result<Board> {
    let mut board = match fen {
        Some(f) => Board::from_fen(f)?,
        None => Board::startpos(),
    };
    for text in moves {
        let mv = parse_uci_move(&board, text)?;
        board.apply_move(mv);
    }
    Ok(board)
}

/// UCI score text from the side to move's point of view.
pub fn uci_score(white_score: i32, side: Color) -> String {
    let own = match side {
        Color::White => white_score,
        Color::Black => -white_score,
    };
    if own.abs() >= MATE_THRESHOLD {
        // mate in moves, negative when the side to move is getting mated
        let moves = (MATE - own.abs() + 1) / 2;
        format!("mate {}", if own > 0 { moves } else { -moves })
    } else {
        format!("cp {}", own)
    }
}

fn bestmove_line(result: &SearchResult) -> String {
    format!("bestmove {}", move_to_uci(result.best_move))
}

pub fn run_uci_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    let mut engine = UciEngine::new();
    let mut buf = String::new();

    while engine.is_running() {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        if n == 0 {
            // EOF
            break;
        }
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }

        for r in process_uci_line(line, &mut engine) {
            writeln!(writer, "{}", r)?;
        }
        // GUIs wait on each reply
        writer.flush()?;
    }

    Ok(())
}

pub fn process_uci_line(line: &str, engine: &mut UciEngine) -> Vec<String> {
    let cmd = parse_uci_command(line);
    engine.handle_command(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uci_score_is_side_relative() {
        assert_eq!(uci_score(35, Color::White), "cp 35");
        assert_eq!(uci_score(35, Color::Black), "cp -35");
        // white mates in one: score MATE - 1 seen by white
        assert_eq!(uci_score(MATE - 1, Color::White), "mate 1");
        assert_eq!(uci_score(MATE - 1, Color::Black), "mate -1");
        assert_eq!(uci_score(-MATE, Color::White), "mate 0");
    }

    #[test]
    fn test_position_from_rejects_bad_move() {
        let moves = vec!["e2e4".to_string(), "e7e4".to_string()];
        assert!(position_from(None, &moves).is_err());
        let moves = vec!["e2e4".to_string(), "e7e5".to_string()];
        let board = position_from(None, &moves).unwrap();
        assert_eq!(board.side, Color::White);
        assert_eq!(board.fullmove, 2);
    }
}
