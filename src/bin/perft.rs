use anyhow::{anyhow, bail, Context};
use clap::Parser;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position};
use std::collections::BTreeMap;
use tavola::board::{Board, START_FEN};
use tavola::perft::perft_divide;

#[derive(Parser, Debug)]
#[command(author, version, about = "Count leaf nodes of the legal move tree", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    #[arg(short, long, default_value_t = 4)]
    depth: u32,

    /// Print the node count below each root move
    #[arg(long)]
    divide: bool,

    /// Compare every root move's count against shakmaty and list differences
    #[arg(long)]
    verify: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let board = Board::from_fen(&args.fen).with_context(|| format!("loading '{}'", args.fen))?;

    println!("Running perft on FEN: '{}' at depth {}", args.fen, args.depth);

    let start = std::time::Instant::now();
    let divide = perft_divide(&board, args.depth);
    let duration = start.elapsed();
    let nodes: u64 = if args.depth == 0 {
        1
    } else {
        divide.iter().map(|(_, n)| n).sum()
    };

    if args.divide {
        for (mv, count) in &divide {
            println!("{}: {}", mv, count);
        }
        println!();
    }
    println!(
        "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
        args.depth,
        nodes,
        duration.as_millis(),
        nodes as f64 / (duration.as_micros().max(1) as f64)
    );

    if args.verify {
        let ours: BTreeMap<String, u64> = divide.iter().map(|(m, n)| (m.to_uci(), *n)).collect();
        let reference = divide_shakmaty(&args.fen, args.depth)?;
        let mut mismatches = 0;

        for (mv, expected) in &reference {
            match ours.get(mv) {
                Some(got) if got == expected => {}
                Some(got) => {
                    mismatches += 1;
                    println!("{}: ours {} shakmaty {}", mv, got, expected);
                }
                None => {
                    mismatches += 1;
                    println!("{}: missing (shakmaty {})", mv, expected);
                }
            }
        }
        for (mv, got) in &ours {
            if !reference.contains_key(mv) {
                mismatches += 1;
                println!("{}: extra (ours {})", mv, got);
            }
        }

        if mismatches > 0 {
            bail!("{} root moves differ from shakmaty", mismatches);
        }
        println!("verified against shakmaty");
    }

    Ok(())
}

fn divide_shakmaty(fen: &str, depth: u32) -> anyhow::Result<BTreeMap<String, u64>> {
    let parsed: Fen = fen.parse().with_context(|| format!("shakmaty rejected '{}'", fen))?;
    let pos: Chess = parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| anyhow!("shakmaty rejected '{}': {}", fen, e))?;

    let mut counts = BTreeMap::new();
    if depth == 0 {
        return Ok(counts);
    }
    for m in pos.legal_moves() {
        let mut next = pos.clone();
        next.play_unchecked(&m);
        counts.insert(m.to_uci(CastlingMode::Standard).to_string(), perft_shakmaty(&next, depth - 1));
    }
    Ok(counts)
}

fn perft_shakmaty(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}
