// 象棋対局 CLI
//
// 人間は標準入力から指し、自動の席は着手提案（乱択 / 外部プロセス）で指す。
// ログは stderr、盤面と応答は stdout に出す。

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tokio::io::{AsyncBufReadExt, BufReader};
use xiangqi_core::{is_in_check, Color, Move, Square};
use xiangqi_play::{
    request_move, run_game, Difficulty, GameState, MoveEvent, MoveSuggester, PlayConfig,
    PlayerKind, ProcessSuggester, RandomSuggester,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start position in FEN
    #[arg(long)]
    fen: Option<String>,

    /// Red player: human, random or process
    #[arg(long)]
    red: Option<PlayerKind>,

    /// Black player: human, random or process
    #[arg(long)]
    black: Option<PlayerKind>,

    /// Difficulty passed to the suggester: easy, medium or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Seed for random moves and fallbacks
    #[arg(long)]
    seed: Option<u64>,

    /// Suggester executable for `process` players
    #[arg(long)]
    engine_path: Option<PathBuf>,

    /// Draw after this many plies
    #[arg(long)]
    max_plies: Option<u32>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// 席ごとのプレイヤー
enum Seat {
    Human,
    Random(RandomSuggester),
    Process(ProcessSuggester),
}

impl Seat {
    fn open(config: &PlayConfig, side: Color, seed: u64) -> Result<Self> {
        Ok(match config.player(side) {
            PlayerKind::Human => Seat::Human,
            PlayerKind::Random => Seat::Random(RandomSuggester::with_seed(seed)),
            PlayerKind::Process => {
                let Some(cfg) = config.process_config() else {
                    bail!("{side} is a process player but no engine path is configured");
                };
                let suggester = ProcessSuggester::spawn(&cfg, format!("{side}-engine"))
                    .with_context(|| format!("failed to spawn suggester {}", cfg.path.display()))?;
                Seat::Process(suggester)
            }
        })
    }

    fn suggester(&self) -> Option<&dyn MoveSuggester> {
        match self {
            Seat::Human => None,
            Seat::Random(s) => Some(s),
            Seat::Process(s) => Some(s),
        }
    }

    async fn close(self) {
        if let Seat::Process(s) = self {
            s.shutdown().await;
        }
    }
}

/// 人間の入力1行を処理した結果
enum Flow {
    Continue,
    Quit,
}

fn init_logger(debug: bool) {
    use std::io::Write;
    let log_level = if debug { "debug" } else { "info" };

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    );
    builder
        .format(|buf, record| {
            writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
        })
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Stderr);
    builder.init();
}

fn build_config(args: &Args) -> Result<PlayConfig> {
    let mut config = match &args.config {
        Some(path) => PlayConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PlayConfig::default(),
    };
    if let Some(fen) = &args.fen {
        config.start_fen = Some(fen.clone());
    }
    if let Some(red) = args.red {
        config.red = red;
    }
    if let Some(black) = args.black {
        config.black = black;
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(path) = &args.engine_path {
        config.engine.path = Some(path.clone());
    }
    if let Some(max_plies) = args.max_plies {
        config.max_plies = max_plies;
    }
    Ok(config)
}

fn print_board(state: &GameState) {
    println!("{}", state.board());
    let side = state.side_to_move();
    let mut line = format!("{side} to move, ply {}", state.ply());
    if let Some(mv) = state.last_move() {
        line.push_str(&format!(", last {mv}"));
    }
    if state.result().is_none() && is_in_check(state.board(), side) {
        line.push_str(", check");
    }
    println!("{line}");
}

fn print_help() {
    println!("commands:");
    println!("  <move>         play a move, e.g. h2e2 or h2-e2");
    println!("  select <sq>    select a piece and list its moves");
    println!("  <sq>           move the selected piece to <sq>");
    println!("  moves          list all legal moves");
    println!("  board          show the board");
    println!("  fen            show the position as FEN");
    println!("  quit           leave the game");
}

fn format_moves(moves: &[Move]) -> String {
    moves.iter().map(|mv| mv.to_iccs()).collect::<Vec<_>>().join(" ")
}

fn handle_command(state: &mut GameState, line: &str) -> Flow {
    let mut tokens = line.split_whitespace();
    let Some(command) = tokens.next() else {
        return Flow::Continue;
    };

    let played = match command {
        "quit" | "exit" => return Flow::Quit,
        "help" => {
            print_help();
            return Flow::Continue;
        }
        "fen" => {
            println!("{}", state.fen());
            return Flow::Continue;
        }
        "board" => {
            print_board(state);
            return Flow::Continue;
        }
        "moves" => {
            println!("{}", format_moves(&state.legal_moves()));
            return Flow::Continue;
        }
        "select" => {
            let Some(square) = tokens.next().and_then(Square::from_iccs) else {
                println!("usage: select <square>");
                return Flow::Continue;
            };
            match state.select(square) {
                Ok(moves) if moves.is_empty() => println!("{square}: no legal moves"),
                Ok(moves) => println!("{}", format_moves(&moves)),
                Err(e) => println!("error: {e}"),
            }
            return Flow::Continue;
        }
        text => {
            if let Some(mv) = Move::from_iccs(text) {
                state.play(mv)
            } else if let Some(to) = Square::from_iccs(text) {
                state.play_selected(to)
            } else {
                println!("unknown command '{text}' (try 'help')");
                return Flow::Continue;
            }
        }
    };

    match played {
        Ok(_) => print_board(state),
        Err(e) => println!("error: {e}"),
    }
    Flow::Continue
}

async fn play_interactive(
    state: &mut GameState,
    red: &Seat,
    black: &Seat,
    config: &PlayConfig,
    rng: &mut Xoshiro256PlusPlus,
) -> Result<()> {
    let policy = config.policy();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_board(state);
    print_help();

    while state.result().is_none() {
        let side = state.side_to_move();
        let seat = match side {
            Color::Red => red,
            Color::Black => black,
        };

        if let Some(suggester) = seat.suggester() {
            let request = state.begin_suggestion(config.difficulty)?;
            let choice = request_move(suggester, &request, &policy, rng).await;
            state.end_suggestion(choice.as_ref().map(|c| c.mv))?;
            if let Some(choice) = choice {
                let note = if choice.source.is_fallback() { " (fallback)" } else { "" };
                println!("{side} plays {}{note}", choice.mv);
                print_board(state);
            }
            continue;
        }

        print!("{side}> ");
        std::io::Write::flush(&mut std::io::stdout()).context("failed to flush stdout")?;
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            info!("stdin closed");
            break;
        };
        if let Flow::Quit = handle_command(state, &line) {
            break;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.debug);

    let config = build_config(&args)?;
    let seed = config.seed.unwrap_or_else(rand::random);
    info!("seed {seed}");
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let mut state = match &config.start_fen {
        Some(fen) => GameState::from_fen(fen, config.limits())
            .with_context(|| format!("invalid start position '{fen}'"))?,
        None => GameState::new(config.limits()),
    };

    let red = Seat::open(&config, Color::Red, seed.wrapping_add(1))?;
    let black = Seat::open(&config, Color::Black, seed.wrapping_add(2))?;

    match (red.suggester(), black.suggester()) {
        (Some(r), Some(b)) => {
            print_board(&state);
            let mut on_move = |event: &MoveEvent<'_>| {
                let note = if event.source.is_fallback() { " (fallback)" } else { "" };
                println!("{:>3}. {} {} [{}]{note}", event.ply, event.side, event.mv, event.suggester);
            };
            run_game(
                &mut state,
                r,
                b,
                config.difficulty,
                &config.policy(),
                &mut rng,
                &mut on_move,
            )
            .await?;
            print_board(&state);
        }
        _ => play_interactive(&mut state, &red, &black, &config, &mut rng).await?,
    }

    match state.result() {
        Some(result) => println!("result: {result}"),
        None => println!("game abandoned at ply {}", state.ply()),
    }

    red.close().await;
    black.close().await;
    Ok(())
}
