//! Hoops CLI
//!
//! Plays games through `hoops_core` and prints the box score,
//! optionally with the play-by-play, or dumps the raw result JSON.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use hoops_core::api::{demo_request, simulate_game, GameRequest};
use hoops_core::models::{PbpLog, SimulationResult, TeamBoxScore};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hoops")]
#[command(about = "Simulate basketball games possession by possession", long_about = None)]
#[command(version = hoops_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game described by a request JSON file
    Simulate {
        /// Request JSON file path (`-` reads stdin)
        #[arg(long)]
        request: PathBuf,

        /// Override the request's seed
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Play a game between two generated demo rosters
    Demo {
        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print a demo request JSON to use as a template
    SampleRequest {
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Print the full result as JSON instead of a box score
    #[arg(long)]
    json: bool,

    /// Also print the play-by-play
    #[arg(long)]
    pbp: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).compact().init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { request, seed, output } => {
            let mut req = load_request(&request)?;
            if seed.is_some() {
                req.setup.seed = seed;
            }
            run(&req, &output)
        }
        Commands::Demo { seed, output } => run(&demo_request(seed), &output),
        Commands::SampleRequest { seed } => {
            println!("{}", serde_json::to_string_pretty(&demo_request(seed))?);
            Ok(())
        }
    }
}

fn load_request(path: &Path) -> Result<GameRequest> {
    let raw = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read request from stdin")?
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).with_context(|| format!("Invalid request JSON in {}", path.display()))
}

fn run(request: &GameRequest, output: &OutputArgs) -> Result<()> {
    let result = simulate_game(request).context("Simulation failed")?;
    if result.winner_team_id.is_none() {
        bail!("game finished without a winner");
    }
    tracing::info!(home = result.home_score, away = result.away_score, "game complete");

    if output.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    if output.pbp {
        print_pbp(&result.logs);
        println!();
    }
    print_summary(&result);
    Ok(())
}

fn print_pbp(logs: &[PbpLog]) {
    for log in logs {
        let score = match (log.home_score, log.away_score) {
            (Some(h), Some(a)) => format!("{h:>3}-{a:<3}"),
            _ => " ".repeat(7),
        };
        println!("Q{} {:>5}  {}  {}", log.quarter, log.time_remaining, score, log.text);
    }
}

fn print_summary(result: &SimulationResult) {
    let label = |q: usize| if q < 4 { format!("Q{}", q + 1) } else { "TB".to_string() };
    let periods = result.home.quarter_scores.len();
    let header: String = (0..periods).map(|q| format!("{:>4}", label(q))).collect();
    println!("{:<24}{}{:>6}", "", header, "T");
    for team in [&result.home, &result.away] {
        let line: String = team.quarter_scores.iter().map(|s| format!("{s:>4}")).collect();
        println!("{:<24}{}{:>6}", team.name, line, team.score);
    }
    if result.went_to_tie_break {
        println!("(decided by tie-break possession)");
    }
    println!();
    print_box(&result.home);
    println!();
    print_box(&result.away);
}

fn print_box(team: &TeamBoxScore) {
    println!("── {} ──", team.name);
    println!(
        "{:<22}{:>3}{:>6}{:>5}{:>5}{:>5}{:>8}{:>8}{:>8}{:>4}{:>5}",
        "PLAYER", "POS", "MIN", "PTS", "REB", "AST", "FG", "3P", "FT", "PF", "+/-"
    );
    for row in team.players.iter().filter(|p| p.stats.seconds_played > 0) {
        let s = &row.stats;
        println!(
            "{:<22}{:>3}{:>6.1}{:>5}{:>5}{:>5}{:>8}{:>8}{:>8}{:>4}{:>+5}",
            row.name,
            format!("{:?}", row.position),
            row.mp,
            s.pts,
            s.reb,
            s.ast,
            format!("{}-{}", s.fgm, s.fga),
            format!("{}-{}", s.p3m, s.p3a),
            format!("{}-{}", s.ftm, s.fta),
            s.pf,
            s.plus_minus,
        );
    }
    let dnp = team.players.iter().filter(|p| p.stats.seconds_played == 0).count();
    if dnp > 0 {
        println!("({dnp} did not play)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_demo_flags() {
        let cli = Cli::try_parse_from(["hoops", "demo", "--seed", "7", "--pbp"]).unwrap();
        match cli.command {
            Commands::Demo { seed, output } => {
                assert_eq!(seed, 7);
                assert!(output.pbp && !output.json);
            }
            _ => panic!("expected demo"),
        }
    }

    #[test]
    fn test_simulate_requires_request() {
        assert!(Cli::try_parse_from(["hoops", "simulate"]).is_err());
    }
}
