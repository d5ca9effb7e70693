//! UCI front end: command parsing, options and the engine loop

pub mod engine;
pub mod options;
pub mod parser;

pub use engine::{process_uci_line, run_uci_loop, UciEngine, UciState};
pub use options::UciOptions;
pub use parser::{parse_uci_command, GoParams, UciCommand};
