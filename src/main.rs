//! Tavola UCI chess engine main entry point.

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    tavola::uci::run_uci_loop().context("UCI loop failed")
}
