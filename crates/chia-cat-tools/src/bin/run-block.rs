use chia_cat_scan::run_json_block;
use chia_consensus::consensus_constants::TEST_CONSTANTS;
use clap::Parser;
use std::path::PathBuf;

/// Print the CAT spends in a block, as JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the block's JSON file. Blocks referenced by its generator are
    /// loaded from <height>.json files in the same directory
    file: PathBuf,

    /// Run the generator and puzzles with at most this cost
    #[arg(long)]
    max_cost: Option<u64>,

    /// Pretty print the output
    #[arg(short, long, default_value_t = false)]
    pretty: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut constants = TEST_CONSTANTS;
    if let Some(max_cost) = args.max_cost {
        constants.max_block_cost_clvm = max_cost;
    }

    let cat_spends = run_json_block(&args.file, &constants).expect("failed to run block");

    let output = if args.pretty {
        serde_json::to_string_pretty(&cat_spends)
    } else {
        serde_json::to_string(&cat_spends)
    }
    .expect("failed to serialize CAT spends");
    println!("{output}");
}
