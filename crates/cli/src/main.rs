use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pressure_opt::api::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

mod instance;
mod provenance;
mod report;

use instance::InstanceFile;
use provenance::Payload;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Plan pressure-equalization transfers from donor to target cylinders")]
struct Cmd {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Search for the best transfer sequence and print it
    Solve {
        /// Built-in instance (see `presets`)
        #[arg(long, conflicts_with_all = ["input", "random_seed"])]
        preset: Option<String>,
        /// JSON instance file
        #[arg(long, conflicts_with = "random_seed")]
        input: Option<PathBuf>,
        /// Draw a random instance with this seed
        #[arg(long)]
        random_seed: Option<u64>,
        /// Maximum number of transfers
        #[arg(long)]
        depth: usize,
        /// Independent first-level partitions searched in parallel
        #[arg(long, default_value_t = 1)]
        chunks: usize,
        /// Total test budget, split across chunks
        #[arg(long, default_value_t = SolveCfg::default().max_tests)]
        max_tests: u64,
        /// Stop a transfer once the target reaches its cap (overrides the instance file)
        #[arg(long)]
        early_stopping: bool,
        /// Skip positions already reached through another transfer order
        #[arg(long)]
        dedup: bool,
        /// Write the result as JSON (plus a provenance sidecar)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List built-in instances
    Presets,
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Solve {
            preset,
            input,
            random_seed,
            depth,
            chunks,
            max_tests,
            early_stopping,
            dedup,
            out,
        } => {
            let base = StateCfg {
                allow_early_stopping: early_stopping,
                ..StateCfg::default()
            };
            let (source, initial) = load_instance(preset, input, random_seed, base)?;
            let cfg = SolveCfg {
                num_chunks: chunks,
                max_tests,
                dedup_visited: dedup,
            };
            solve_cmd(&source, &initial, depth, cfg, out.as_deref())
        }
        Action::Presets => presets(),
        Action::Report => report(),
    }
}

fn load_instance(
    preset: Option<String>,
    input: Option<PathBuf>,
    random_seed: Option<u64>,
    base: StateCfg,
) -> Result<(String, State)> {
    if let Some(path) = input {
        let mut file = InstanceFile::read(&path)?;
        if base.allow_early_stopping {
            file.config.allow_early_stopping = Some(true);
        }
        let state = file.into_state(base)?;
        return Ok((path.display().to_string(), state));
    }
    if let Some(seed) = random_seed {
        let tok = ReplayToken { seed, index: 0 };
        let state = draw_random(RandomCfg::default(), tok, base)?;
        return Ok((format!("random:{seed}"), state));
    }
    let name = preset.unwrap_or_else(|| PRESET_NAMES[0].to_string());
    match preset_by_name(&name, base) {
        Some(state) => Ok((name, state?)),
        None => bail!(
            "unknown preset '{name}' (available: {})",
            PRESET_NAMES.join(", ")
        ),
    }
}

fn solve_cmd(
    source: &str,
    initial: &State,
    depth: usize,
    cfg: SolveCfg,
    out: Option<&Path>,
) -> Result<()> {
    tracing::info!(
        source,
        depth,
        chunks = cfg.num_chunks,
        max_tests = cfg.max_tests,
        "solve"
    );
    println!("Initial state:\n{initial}");
    println!("Solving with maximum number of connections: {depth}");
    let sol = solve(initial, depth, cfg)?;
    if sol.found_any() {
        println!("Solution found:\n{}", sol.best);
    } else {
        println!("No admissible transfer exists for this instance.");
    }
    println!("Num tests: {}", sol.num_tests);
    println!("Elapsed time: {} ms", sol.elapsed.as_millis());

    if let Some(out) = out {
        if let Some(parent) = out.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let doc = report::solution_json(&sol);
        std::fs::write(out, serde_json::to_vec_pretty(&doc)?)
            .with_context(|| format!("writing {}", out.display()))?;
        let params = serde_json::json!({
            "depth": depth,
            "chunks": cfg.num_chunks,
            "max_tests": cfg.max_tests,
            "dedup_visited": cfg.dedup_visited,
            "allow_early_stopping": initial.cfg().allow_early_stopping
        });
        let payload = Payload::new(source, params).with_run(&sol);
        let prov = provenance::write_sidecar(out, payload)?;
        tracing::info!(out = %out.display(), provenance = %prov.display(), "wrote result");
    }
    Ok(())
}

fn presets() -> Result<()> {
    for name in PRESET_NAMES {
        if let Some(state) = preset_by_name(name, StateCfg::default()) {
            let state = state?;
            println!(
                "{name}: {} targets, {} donors",
                state.num_targets(),
                state.num_donors()
            );
        }
    }
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "lib_version": pressure_opt::VERSION,
        "presets": PRESET_NAMES,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
