use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use clap::Parser;
use crossbeam::channel;
use log::{error, info};
use xiangqi_core::{Color, Difficulty, EndReason, GameMode, GameSession, Winner};
use xiangqi_engine::{EngineConfig, MinimaxSearcher};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play minimax against itself and tally the results")]
struct Args {
    /// Number of games to play
    #[arg(short, long, default_value_t = 10)]
    games: u32,

    /// Red difficulty (easy, medium, hard)
    #[arg(long, default_value = "medium", value_parser = parse_difficulty)]
    red: Difficulty,

    /// Black difficulty (easy, medium, hard)
    #[arg(long, default_value = "easy", value_parser = parse_difficulty)]
    black: Difficulty,

    /// Plies after which a game is adjudicated a draw
    #[arg(long, default_value_t = 200)]
    max_plies: usize,

    /// Starting position; defaults to the standard opening
    #[arg(long)]
    fen: Option<String>,

    /// TOML engine config; its seed makes the run reproducible
    #[arg(long)]
    config: Option<PathBuf>,

    /// Worker threads; defaults to available parallelism
    #[arg(long)]
    threads: Option<usize>,

    /// Print every game's move list to stdout
    #[arg(long)]
    print_games: bool,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_difficulty(input: &str) -> Result<Difficulty, String> {
    Difficulty::parse(input).ok_or_else(|| format!("unknown difficulty '{input}'"))
}

#[derive(Debug)]
struct GameReport {
    game: u32,
    plies: usize,
    winner: Winner,
    reason: Option<EndReason>,
    export: String,
}

fn play_game(args: &Args, seed: Option<u64>, game: u32) -> Result<GameReport, String> {
    let mut session = GameSession::new();
    session
        .init_game(GameMode::Local, args.fen.as_deref())
        .map_err(|err| format!("invalid --fen: {err}"))?;

    let mut red = MinimaxSearcher::from_seed(seed.map(|s| s.wrapping_add(u64::from(game) * 2)));
    let mut black =
        MinimaxSearcher::from_seed(seed.map(|s| s.wrapping_add(u64::from(game) * 2 + 1)));

    while session.is_active() && session.history().len() < args.max_plies {
        let color = session.current_player();
        let (searcher, difficulty) = match color {
            Color::Red => (&mut red, args.red),
            Color::Black => (&mut black, args.black),
        };
        let Some(mv) = searcher.choose_move(session.board(), color, difficulty) else {
            break;
        };
        if !session.make_move(mv.from, mv.to) {
            return Err(format!("session rejected generated move {mv:?}"));
        }
    }

    if session.is_active() {
        session.agree_draw();
    }
    let result = session.result();
    Ok(GameReport {
        game,
        plies: session.history().len(),
        winner: result.map_or(Winner::Draw, |r| r.winner),
        reason: result.map(|r| r.reason),
        export: session.export(),
    })
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, &args.log_level),
    )
    .init();

    let config = match &args.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };
    let threads = args.threads.unwrap_or_else(|| {
        thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    });
    info!(
        "running {} games, red={:?} black={:?}, on {threads} threads",
        args.games, args.red, args.black
    );

    let (jobs_tx, jobs_rx) = channel::unbounded::<u32>();
    let (results_tx, results_rx) = channel::unbounded();
    for game in 1..=args.games {
        let _ = jobs_tx.send(game);
    }
    drop(jobs_tx);

    let mut reports = Vec::with_capacity(args.games as usize);
    let mut failed = false;
    thread::scope(|scope| {
        for worker in 0..threads {
            let jobs_rx = jobs_rx.clone();
            let results_tx = results_tx.clone();
            let args = &args;
            let seed = config.seed;
            scope.spawn(move || {
                for game in jobs_rx {
                    let report = play_game(args, seed, game);
                    if let Ok(report) = &report {
                        info!(
                            "[t{worker}] game {}/{}: {} plies, {:?} ({:?})",
                            report.game, args.games, report.plies, report.winner, report.reason
                        );
                    }
                    let _ = results_tx.send(report);
                }
            });
        }
        drop(results_tx);

        for report in results_rx.iter() {
            match report {
                Ok(report) => reports.push(report),
                Err(err) => {
                    error!("{err}");
                    failed = true;
                }
            }
        }
    });

    reports.sort_by_key(|report| report.game);
    let (mut red_wins, mut black_wins, mut draws) = (0u32, 0u32, 0u32);
    for report in &reports {
        match report.winner {
            Winner::Side(Color::Red) => red_wins += 1,
            Winner::Side(Color::Black) => black_wins += 1,
            Winner::Draw => draws += 1,
        }
        if args.print_games {
            println!("# game {}\n{}\n", report.game, report.export);
        }
    }
    println!(
        "red ({:?}) {red_wins}W / black ({:?}) {black_wins}W / {draws}D",
        args.red, args.black
    );

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
