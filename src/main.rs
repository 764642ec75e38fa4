use anyhow::{Context, Result};
use clap::Parser;

use signal_sim::simulation::{
    metrics::{self, improvement_percent, PolicyMetrics, SimulationMetrics},
    SimConfig, SimulationState, System,
};

#[derive(Parser)]
#[command(name = "signal_sim")]
#[command(about = "Traffic-signal control simulation comparing a game-theory policy against a fixed-timing baseline")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "500")]
    ticks: u64,

    /// Number of signal heads
    #[arg(long, default_value = "4")]
    lights: usize,

    /// Comma-separated sync-group assignment, one entry per light
    #[arg(long, default_value = "0,0,1,1")]
    groups: String,

    /// Traffic arrival rate on a 1-10 scale
    #[arg(long, default_value = "5")]
    traffic_rate: u32,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Print a comparison summary every this many ticks
    #[arg(long, default_value = "50")]
    summary_every: u64,
}

/// One sampled point of the metric history kept for the end-of-run table
struct HistoryPoint {
    tick: u64,
    greedy_wait: u64,
    fixed_wait: u64,
    greedy_queue: f64,
    fixed_queue: f64,
}

/// Sample the metric history every this many ticks
const HISTORY_SAMPLE_INTERVAL: u64 = 5;

/// Keep only this many trailing history samples
const HISTORY_CAPACITY: usize = 50;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let sync_groups = parse_groups(&cli.groups)?;
    let config = SimConfig::new(cli.lights, sync_groups);

    let mut state = match cli.seed {
        Some(seed) => SimulationState::new_with_seed(&config, seed)?,
        None => SimulationState::new(&config)?,
    };
    state.set_traffic_rate(cli.traffic_rate)?;
    state.start();

    println!(
        "Running signal simulation: {} lights, {} ticks, traffic rate {}",
        cli.lights, cli.ticks, cli.traffic_rate
    );
    println!();

    let summary_every = cli.summary_every.max(1);
    let mut history: Vec<HistoryPoint> = Vec::new();

    while state.tick < cli.ticks {
        state.step();
        let snapshot = metrics::snapshot(&state);

        if state.tick % HISTORY_SAMPLE_INTERVAL == 0 {
            history.push(HistoryPoint {
                tick: state.tick,
                greedy_wait: snapshot.greedy.total_wait_time,
                fixed_wait: snapshot.fixed_timing.total_wait_time,
                greedy_queue: snapshot.greedy.avg_queue_length,
                fixed_queue: snapshot.fixed_timing.avg_queue_length,
            });
            if history.len() > HISTORY_CAPACITY {
                history.remove(0);
            }
        }

        if state.tick % summary_every == 0 {
            print_summary(&state, &snapshot);
        }
    }
    state.pause();

    let snapshot = metrics::snapshot(&state);
    print_final_comparison(&snapshot);
    print_history(&history);
    Ok(())
}

fn parse_groups(raw: &str) -> Result<Vec<usize>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .with_context(|| format!("invalid sync group '{}'", part.trim()))
        })
        .collect()
}

fn print_summary(state: &SimulationState, snapshot: &SimulationMetrics) {
    println!("--- Tick {} ---", state.tick);
    print_system_line("game theory", &state.greedy_system, &snapshot.greedy);
    print_system_line("fixed timing", &state.fixed_timing_system, &snapshot.fixed_timing);
    println!();
}

fn print_system_line(label: &str, system: &System, metrics: &PolicyMetrics) {
    let phases: String = system.lights.iter().map(|l| l.phase.glyph()).collect();
    println!(
        "  {:<12} [{}] wait {:>6}  avg queue {:>5.1}  throughput {:>6}",
        label, phases, metrics.total_wait_time, metrics.avg_queue_length, metrics.throughput
    );
}

fn print_final_comparison(snapshot: &SimulationMetrics) {
    let greedy = &snapshot.greedy;
    let fixed = &snapshot.fixed_timing;
    println!("=== FINAL COMPARISON ===");
    println!(
        "  total wait time:  game theory {:>8}  fixed timing {:>8}  ({:+.1}%)",
        greedy.total_wait_time,
        fixed.total_wait_time,
        improvement_percent(greedy.total_wait_time as f64, fixed.total_wait_time as f64, true)
    );
    println!(
        "  avg queue length: game theory {:>8.2}  fixed timing {:>8.2}  ({:+.1}%)",
        greedy.avg_queue_length,
        fixed.avg_queue_length,
        improvement_percent(greedy.avg_queue_length, fixed.avg_queue_length, true)
    );
    println!(
        "  throughput:       game theory {:>8}  fixed timing {:>8}  ({:+.1}%)",
        greedy.throughput,
        fixed.throughput,
        improvement_percent(greedy.throughput as f64, fixed.throughput as f64, false)
    );
}

fn print_history(history: &[HistoryPoint]) {
    if history.is_empty() {
        return;
    }
    println!();
    println!(
        "History (last {} samples, every {} ticks):",
        history.len(),
        HISTORY_SAMPLE_INTERVAL
    );
    println!("  tick   wait (gt/ft)      avg queue (gt/ft)");
    for point in history {
        println!(
            "  {:>5}  {:>6} / {:>6}    {:>5.1} / {:>5.1}",
            point.tick, point.greedy_wait, point.fixed_wait, point.greedy_queue, point.fixed_queue
        );
    }
}
