//! Terminal front-end for the rules engine.
//!
//! Usage: cargo run -- --moves "e2e4 e7e5 g1f3" --interactive
//!
//! In interactive mode, type a move in coordinate form (`e2e4`, `e7e8q`), a square
//! (`g1`) to list where the piece on it can go, `moves` to list every legal move,
//! or `quit`.

use std::io::{self, BufRead, Write};

use clap::Parser;
use color_eyre::eyre::{bail, Result, WrapErr};
use itertools::Itertools;
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use chess_rules::{Game, Move, MoveEffects, Square};

#[derive(Parser, Debug)]
#[command(name = "chess_rules")]
#[command(about = "Play chess in the terminal against the rules, not an engine")]
struct Args {
    /// Space separated moves to replay first, e.g. "e2e4 e7e5 g1f3"
    #[arg(short, long)]
    moves: Option<String>,

    /// Read further moves from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Number of random legal plies to play after the replayed moves
    #[arg(short, long, default_value_t = 0)]
    random: usize,

    /// Seed for the random plies
    #[arg(long)]
    seed: Option<u64>,

    /// Draw pieces as letters instead of unicode symbols
    #[arg(long)]
    ascii: bool,

    /// Log every move (same as RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,
}

struct Session {
    game: Game,
    ascii: bool,
}

impl Session {
    fn draw(&self) {
        let board = self.game.board();
        if self.ascii {
            println!("{}", board.draw_board_ascii());
        } else {
            println!("{}", board.draw_board());
        }
        println!("{} to move, {}", self.game.active_color(), self.game.status());
    }

    fn report(&self, effects: &MoveEffects) {
        println!("{}", effects.to_human());
    }

    fn replay(&mut self, moves: &str) -> Result<()> {
        for text in moves.split_whitespace() {
            let mv: Move = text.parse()?;
            let effects = self
                .game
                .play_move(mv)
                .wrap_err_with(|| format!("while replaying {}", text))?;
            self.report(&effects);
        }
        Ok(())
    }

    fn play_random(&mut self, plies: usize, seed: Option<u64>) -> Result<()> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        for _ in 0..plies {
            let Some(mv) = self.game.legal_moves().choose(&mut rng).copied() else {
                break;
            };
            let effects = self.game.play_move(mv)?;
            self.report(&effects);
        }
        Ok(())
    }

    fn interact(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        self.draw();
        print!("> ");
        stdout.flush()?;

        for line in stdin.lock().lines() {
            let line = line?;
            let input = line.trim();
            match input {
                "" => {}
                "quit" | "exit" => break,
                "moves" => {
                    println!("{}", self.game.legal_moves().iter().join(" "));
                }
                _ if input.len() == 2 => match input.parse::<Square>() {
                    Ok(square) => {
                        let targets = self.game.legal_targets(square);
                        if targets.is_empty() {
                            println!("nothing to move on {}", square);
                        } else {
                            println!("{}", targets.iter().join(" "));
                        }
                    }
                    Err(e) => println!("{}", e),
                },
                _ => match input.parse::<Move>() {
                    Ok(mv) => match self.game.play_move(mv) {
                        Ok(effects) => {
                            self.report(&effects);
                            self.draw();
                        }
                        Err(e) => println!("{}", e),
                    },
                    Err(e) => println!("{}", e),
                },
            }
            if self.game.is_over() {
                break;
            }
            print!("> ");
            stdout.flush()?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    if args.seed.is_some() && args.random == 0 {
        bail!("--seed only makes sense together with --random");
    }

    let mut session = Session {
        game: Game::new(),
        ascii: args.ascii,
    };

    if let Some(moves) = &args.moves {
        session.replay(moves)?;
    }
    session.play_random(args.random, args.seed)?;

    if args.interactive && !session.game.is_over() {
        session.interact()?;
    } else {
        session.draw();
    }
    Ok(())
}
