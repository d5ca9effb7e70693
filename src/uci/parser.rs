//! UCI command parser
//!
//! Tokenises one input line into a [`UciCommand`]. Unknown tokens inside a
//! known command are skipped, as GUIs send fields we do not use.

/// Fields of a `go` command. Absent fields are `None`.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct GoParams {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movetime: Option<u64>,
    pub movestogo: Option<u64>,
    pub depth: Option<u8>,
    pub infinite: bool,
}

impl GoParams {
    /// True when any clock field was given
    pub fn has_clock(&self) -> bool {
        self.movetime.is_some() || self.wtime.is_some() || self.btime.is_some()
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum UciCommand {
    Uci,
    IsReady,
    SetOption {
        name: String,
        value: Option<String>,
    },
    UciNewGame,
    /// `fen` is `None` for `startpos`
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Go(GoParams),
    Stop,
    Quit,
    /// `d` / `display`: print the board
    Display,
    /// `perft N`: divide listing and total
    Perft {
        depth: Option<u32>,
    },
    Unknown(String),
}

fn parse_value<T: std::str::FromStr>(parts: &[&str], i: usize) -> Option<T> {
    parts.get(i + 1).and_then(|v| v.parse::<T>().ok())
}

/// Parse a UCI command from a string (simple tokenizer)
pub fn parse_uci_command(line: &str) -> UciCommand {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = parts.first() else {
        return UciCommand::Unknown(String::new());
    };

    match head {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        "d" | "display" => UciCommand::Display,
        "perft" => UciCommand::Perft {
            depth: parse_value(&parts, 0),
        },
        "setoption" => parse_setoption(&parts),
        "position" => parse_position(&parts),
        "go" => UciCommand::Go(parse_go(&parts)),
        _ => UciCommand::Unknown(line.trim().to_string()),
    }
}

// setoption name <name words> [value <value words>]
fn parse_setoption(parts: &[&str]) -> UciCommand {
    let mut name = Vec::new();
    let mut value: Option<String> = None;
    let mut i = 1usize;
    while i < parts.len() {
        match parts[i] {
            "name" => {
                i += 1;
                while i < parts.len() && parts[i] != "value" {
                    name.push(parts[i]);
                    i += 1;
                }
            }
            "value" => {
                value = Some(parts[i + 1..].join(" "));
                break;
            }
            _ => i += 1,
        }
    }
    UciCommand::SetOption {
        name: name.join(" "),
        value,
    }
}

// position [startpos | fen <six fields>] [moves <m1> <m2> ...]
fn parse_position(parts: &[&str]) -> UciCommand {
    let moves_at = parts.iter().position(|&s| s == "moves");
    let moves = match moves_at {
        Some(pos) => parts[pos + 1..].iter().map(|s| s.to_string()).collect(),
        None => Vec::new(),
    };
    let fen = match parts.get(1) {
        Some(&"fen") => {
            let end = moves_at.unwrap_or(parts.len());
            Some(parts[2..end.max(2)].join(" "))
        }
        _ => None,
    };
    UciCommand::Position { fen, moves }
}

fn parse_go(parts: &[&str]) -> GoParams {
    let mut go = GoParams::default();
    let mut i = 1usize;
    while i < parts.len() {
        let mut step = 2;
        match parts[i] {
            "wtime" => go.wtime = parse_value(parts, i),
            "btime" => go.btime = parse_value(parts, i),
            "winc" => go.winc = parse_value(parts, i),
            "binc" => go.binc = parse_value(parts, i),
            "movetime" => go.movetime = parse_value(parts, i),
            "movestogo" => go.movestogo = parse_value(parts, i),
            "depth" => go.depth = parse_value(parts, i),
            "infinite" => {
                go.infinite = true;
                step = 1;
            }
            _ => step = 1,
        }
        i += step;
    }
    go
}
