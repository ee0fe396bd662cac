use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Instant;

use chess_rules::chess_board::{ChessError, GameState, INITIAL_POSITION};
use chess_rules::perft::{perft, perft_divide};

use clap::arg;
use clap::command;
use clap::Command;

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let matches = command!()
        .version("v0.1.0")
        .propagate_version(true)
        .arg(arg!(
            -d --debug "Turn debugging information on"
        ))
        .subcommand(Command::new("benchmark").about("Times perft on the starting position"))
        .subcommand(
            Command::new("play").about("Play a game on the terminal").arg(
                arg!(
                -f --fen <FEN> "Board position"
                        )
                .default_value(INITIAL_POSITION),
            ),
        )
        .subcommand(
            Command::new("selfplay")
                .about("Plays random legal games")
                .arg(
                    arg!(
                    -g --games <n> "Number of games"
                            )
                    .default_value("10")
                    .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(
                    -s --seed <seed> "Seed of the move picker"
                            )
                    .default_value("42")
                    .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(
                    -p --"max-plies" <plies> "Plies after which a game is abandoned"
                            )
                    .default_value("300")
                    .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("perft")
                .about("Run Perft test")
                .arg(
                    arg!(
                    -f --fen <FEN> "Board position"
                            )
                    .default_value(INITIAL_POSITION),
                )
                .arg(
                    arg!(
                    -x --depth <d> "depth"
                            )
                    .default_value("3")
                    .value_parser(clap::value_parser!(u8)),
                )
                .arg(
                    arg!(
                    -m --moves <moves> "List of moves"
                            )
                    .num_args(1..)
                    .value_parser(clap::value_parser!(String)),
                ),
        )
        .get_matches();

    init_logging(matches.get_flag("debug"));

    let result = match matches.subcommand() {
        Some(("benchmark", _)) => benchmark(),
        Some(("play", arg_matches)) => {
            let fen = arg_matches.get_one::<String>("fen").map(String::as_str).unwrap_or(INITIAL_POSITION);
            play(fen)
        }
        Some(("selfplay", arg_matches)) => {
            let games = arg_matches.get_one::<usize>("games").copied().unwrap_or(10);
            let seed = arg_matches.get_one::<u64>("seed").copied().unwrap_or(42);
            let max_plies = arg_matches.get_one::<usize>("max-plies").copied().unwrap_or(300);
            selfplay(games, seed, max_plies)
        }
        Some(("perft", arg_matches)) => {
            let fen = arg_matches.get_one::<String>("fen").map(String::as_str).unwrap_or(INITIAL_POSITION);
            let depth = arg_matches.get_one::<u8>("depth").copied().unwrap_or(3);
            let moves = arg_matches
                .get_many::<String>("moves")
                .unwrap_or_default()
                .filter(|&v| !v.is_empty())
                .collect::<Vec<_>>();
            run_perft(fen, moves, depth)
        }
        None => play(INITIAL_POSITION),
        _ => unreachable!("Exhausted list of subcommands"),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn print_status(state: &mut GameState) {
    println!("{}", state.board());
    // refreshes the checkmate and stalemate flags
    state.get_valid_moves();
    if state.checkmate {
        println!("Checkmate, {} wins", state.active_color().opposite());
    } else if state.stalemate {
        println!("Stalemate");
    } else {
        if state.in_check() {
            println!("Check!");
        }
        println!("{} to move", state.active_color());
    }
}

fn play(fen: &str) -> Result<(), ChessError> {
    let mut state = GameState::from_fen(fen)?;
    info!(fen = %state.to_fen(), "starting game");
    print_status(&mut state);

    let stdin = io::stdin();
    prompt();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        match line.trim() {
            "" => {}
            "quit" | "exit" => break,
            "undo" => match state.undo_move() {
                Some(mv) => {
                    println!("Took back {}", mv.get_chess_notation());
                    print_status(&mut state);
                }
                None => println!("Nothing to undo"),
            },
            "moves" => {
                let moves: Vec<String> = state.get_valid_moves().iter().map(|mv| mv.as_algebraic()).collect();
                println!("{}", moves.join(" "));
            }
            "fen" => println!("{}", state.to_fen()),
            text => match state.make_move_from_algebraic(text) {
                Ok(mv) => {
                    println!("Played {}", mv.get_chess_notation());
                    print_status(&mut state);
                }
                Err(e) => println!("{}", e),
            },
        }
        prompt();
    }
    Ok(())
}

fn prompt() {
    print!("> ");
    // a failed flush only loses the prompt
    let _ = io::stdout().flush();
}

#[derive(Tabled)]
struct SelfplayRow {
    game: usize,
    plies: usize,
    result: String,
    final_position: String,
}

fn selfplay(games: usize, seed: u64, max_plies: usize) -> Result<(), ChessError> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let mut table_rows = Vec::new();

    for game in 1..=games {
        let mut state = GameState::new();
        let result = loop {
            let moves = state.get_valid_moves();
            if state.checkmate {
                break format!("{} wins", state.active_color().opposite());
            }
            if state.stalemate {
                break "stalemate".to_string();
            }
            if state.move_log().len() >= max_plies {
                break "ply limit".to_string();
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            state.make_move(mv);
        };
        debug!(game, plies = state.move_log().len(), result = %result, "selfplay game finished");
        table_rows.push(SelfplayRow {
            game,
            plies: state.move_log().len(),
            result,
            final_position: state.to_fen(),
        });
    }
    println!("{}", Table::new(table_rows).with(Style::modern()));
    Ok(())
}

#[derive(Tabled)]
struct BenchmarkRow {
    depth: u8,
    node_count: u64,
    elapsed_time: f32,
    knodes_per_sec: f32,
}

fn benchmark() -> Result<(), ChessError> {
    let mut state = GameState::from_fen(INITIAL_POSITION)?;
    let mut table_rows = Vec::new();
    for depth in 1..=5 {
        let start_time = Instant::now();
        let node_count = perft(&mut state, depth);
        let elapsed = start_time.elapsed();
        table_rows.push(BenchmarkRow {
            depth,
            node_count,
            elapsed_time: elapsed.as_secs_f32(),
            knodes_per_sec: node_count as f32 / elapsed.as_secs_f32().max(f32::EPSILON) / 1000f32,
        });
        if elapsed.as_secs() > 10 {
            break;
        }
    }
    println!("{}", Table::new(table_rows).with(Style::modern()));
    Ok(())
}

fn run_perft(fen: &str, moves: Vec<&String>, depth: u8) -> Result<(), ChessError> {
    println!("Perft test for {} moves {:?} with depth {}", fen, moves, depth);
    let mut state = GameState::from_fen(fen)?;
    for m in moves {
        state.make_move_from_algebraic(m)?;
    }

    let mut num_nodes = 0;
    for (m, c) in perft_divide(&mut state, depth) {
        println!("{}: {}", m, c);
        num_nodes += c;
    }
    println!("\nNodes searched: {}", num_nodes);
    Ok(())
}
