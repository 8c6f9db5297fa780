use std::path::PathBuf;

use anyhow::Context;
use callsim::core::{Policy, SimOpts};
use callsim::utils::{read_scenario, report};
use clap::{Parser, ValueEnum};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Topology file: one `<node> <node> <delay> <capacity>` record per line, or JSON
    #[arg(short, long, default_value = "topology.dat")]
    topology: PathBuf,

    /// Workload file: one `<arrival> <src> <dst> <duration>` record per line in arrival order,
    /// or JSON
    #[arg(short, long, default_value = "callworkload.dat")]
    workload: PathBuf,

    /// Policy to run (repeatable). Runs SHPF, SDPF, LLP, MFC and SHPO when omitted
    #[arg(short, long = "policy")]
    policies: Vec<Policy>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Check link state against the reservation ledger after every call
    #[arg(long)]
    verify: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let loaded = read_scenario(&args.topology, &args.workload).with_context(|| {
        format!(
            "failed to load {} and {}",
            args.topology.display(),
            args.workload.display()
        )
    })?;
    info!(
        "loaded {} nodes, {} links, {} calls",
        loaded.node_map.len(),
        loaded.scenario.links.len(),
        loaded.scenario.calls.len()
    );

    let policies = if args.policies.is_empty() {
        Policy::ALL.to_vec()
    } else {
        args.policies
    };
    let opts = SimOpts::builder()
        .policies(policies)
        .verify_invariants(args.verify)
        .build();
    let reports = callsim::core::run(loaded.scenario, opts).context("simulation failed")?;

    let out = match args.format {
        Format::Table => report::render_table(&reports),
        Format::Json => report::render_json(&reports)?,
    };
    print!("{out}");
    Ok(())
}
