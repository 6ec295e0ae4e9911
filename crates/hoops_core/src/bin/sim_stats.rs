// League-average sanity check over many seeded demo games
// Run with: cargo run --bin sim_stats --release [-- <games> [pace]]

use hoops_core::api::{demo_request, simulate_game_json};
use hoops_core::models::{PlayType, SimulationResult, TeamBoxScore};
use hoops_core::SimError;
use rayon::prelude::*;

/// Per-team totals for one game
#[derive(Default, Clone)]
struct TeamStats {
    pts: u32,
    fgm: u32,
    fga: u32,
    p3m: u32,
    p3a: u32,
    ftm: u32,
    fta: u32,
    oreb: u32,
    reb: u32,
    ast: u32,
    tov: u32,
    pf: u32,
    transition: u32,
}

impl TeamStats {
    fn from_box(team: &TeamBoxScore, transition: u32) -> Self {
        let mut t = TeamStats { pts: team.score as u32, transition, ..Default::default() };
        for row in &team.players {
            let s = &row.stats;
            t.fgm += s.fgm as u32;
            t.fga += s.fga as u32;
            t.p3m += s.p3m as u32;
            t.p3a += s.p3a as u32;
            t.ftm += s.ftm as u32;
            t.fta += s.fta as u32;
            t.oreb += s.oreb as u32;
            t.reb += s.reb as u32;
            t.ast += s.ast as u32;
            t.tov += s.tov as u32;
            t.pf += s.pf as u32;
        }
        t
    }

    /// Standard possession estimate: FGA + 0.44 FTA + TOV - OREB.
    fn possessions(&self) -> f64 {
        self.fga as f64 + 0.44 * self.fta as f64 + self.tov as f64 - self.oreb as f64
    }

    fn accumulate(&mut self, other: &TeamStats) {
        self.pts += other.pts;
        self.fgm += other.fgm;
        self.fga += other.fga;
        self.p3m += other.p3m;
        self.p3a += other.p3a;
        self.ftm += other.ftm;
        self.fta += other.fta;
        self.oreb += other.oreb;
        self.reb += other.reb;
        self.ast += other.ast;
        self.tov += other.tov;
        self.pf += other.pf;
        self.transition += other.transition;
    }
}

struct GameStats {
    home: TeamStats,
    away: TeamStats,
    tie_break: bool,
    home_won: bool,
}

fn get_game_stats(result: &SimulationResult) -> GameStats {
    let transitions = |team_id: &str| {
        result
            .shot_events
            .iter()
            .filter(|s| s.team_id == team_id && s.play_type == PlayType::Transition)
            .count() as u32
    };
    GameStats {
        home: TeamStats::from_box(&result.home, transitions(&result.home.team_id)),
        away: TeamStats::from_box(&result.away, transitions(&result.away.team_id)),
        tie_break: result.went_to_tie_break,
        home_won: result.winner_team_id.as_deref() == Some(result.home.team_id.as_str()),
    }
}

struct AggregatedStats {
    home: TeamStats,
    away: TeamStats,
    game_count: u32,
    tie_breaks: u32,
    home_wins: u32,
}

impl AggregatedStats {
    fn new() -> Self {
        Self { home: TeamStats::default(), away: TeamStats::default(), game_count: 0, tie_breaks: 0, home_wins: 0 }
    }

    fn add(&mut self, stats: GameStats) {
        self.game_count += 1;
        self.home.accumulate(&stats.home);
        self.away.accumulate(&stats.away);
        self.tie_breaks += stats.tie_break as u32;
        self.home_wins += stats.home_won as u32;
    }

    fn avg(&self, val: u32) -> f64 {
        if self.game_count == 0 {
            0.0
        } else {
            val as f64 / self.game_count as f64
        }
    }

    fn avg_f64(&self, val: f64) -> f64 {
        if self.game_count == 0 {
            0.0
        } else {
            val / self.game_count as f64
        }
    }
}

fn pct(made: u32, attempted: u32) -> f64 {
    if attempted == 0 {
        0.0
    } else {
        100.0 * made as f64 / attempted as f64
    }
}

fn print_team(label: &str, agg: &AggregatedStats, t: &TeamStats) {
    println!("── {label} ──");
    println!("  PTS {:>6.1}   PACE {:>5.1}", agg.avg(t.pts), agg.avg_f64(t.possessions()));
    println!(
        "  FG  {:>5.1}/{:<5.1} ({:>4.1}%)   3P {:>4.1}/{:<4.1} ({:>4.1}%)   FT {:>4.1}/{:<4.1} ({:>4.1}%)",
        agg.avg(t.fgm),
        agg.avg(t.fga),
        pct(t.fgm, t.fga),
        agg.avg(t.p3m),
        agg.avg(t.p3a),
        pct(t.p3m, t.p3a),
        agg.avg(t.ftm),
        agg.avg(t.fta),
        pct(t.ftm, t.fta),
    );
    println!("  3PA share {:>4.1}%   transition FGA {:>4.1}", pct(t.p3a, t.fga), agg.avg(t.transition));
    println!(
        "  REB {:>4.1} (OREB {:>4.1})   AST {:>4.1}   TOV {:>4.1}   PF {:>4.1}",
        agg.avg(t.reb),
        agg.avg(t.oreb),
        agg.avg(t.ast),
        agg.avg(t.tov),
        agg.avg(t.pf),
    );
}

fn main() {
    let mut args = std::env::args().skip(1);
    let num_games: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(100);
    let pace: Option<u8> = args.next().and_then(|a| a.parse().ok());

    println!("\n╔══════════════════════════════════════════════════════════╗");
    println!("║              Simulated League Averages                   ║");
    println!("╚══════════════════════════════════════════════════════════╝\n");
    match pace {
        Some(p) => println!("Running {num_games} games (pace {p} for both teams)..."),
        None => println!("Running {num_games} games..."),
    }

    // Games are independent; each one is fully determined by its seed.
    let outcomes: Vec<(u64, Result<SimulationResult, SimError>)> = (0..num_games as u64)
        .into_par_iter()
        .map(|i| {
            let seed = 1000 + i;
            let mut request = demo_request(seed);
            if let Some(p) = pace {
                request.setup.home_tactics.sliders.pace = p;
                request.setup.away_tactics.sliders.pace = p;
            }
            let outcome = serde_json::to_string(&request)
                .map_err(SimError::from)
                .and_then(|json| simulate_game_json(&json))
                .and_then(|out| Ok(serde_json::from_str::<SimulationResult>(&out)?));
            (seed, outcome)
        })
        .collect();

    let mut agg = AggregatedStats::new();
    let mut failures = 0;
    for (seed, outcome) in outcomes {
        match outcome {
            Ok(result) => agg.add(get_game_stats(&result)),
            Err(e) => {
                failures += 1;
                eprintln!("seed {seed} failed: {e}");
            }
        }
    }

    println!();
    print_team("HOME", &agg, &agg.home);
    print_team("AWAY", &agg, &agg.away);
    println!();
    println!(
        "Home wins {:>4.1}%   tie-breaks {:>4.1}%   failures {failures}",
        pct(agg.home_wins, agg.game_count),
        pct(agg.tie_breaks, agg.game_count),
    );
}
