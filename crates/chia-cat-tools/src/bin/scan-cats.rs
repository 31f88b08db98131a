use clap::Parser;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::available_parallelism;

use chia_cat_scan::run_block::resolve_block_refs;
use chia_cat_scan::{BlockRecord, CatMatcher, CatSpend, run_block_with_refs};
use chia_cat_tools::BlockchainDb;
use chia_consensus::consensus_constants::TEST_CONSTANTS;
use log::info;
use serde::Serialize;

/// Scan the main chain blocks of a blockchain database for CAT spends. Prints
/// one JSON object per block with CAT spends
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to blockchain database file to scan
    file: PathBuf,

    /// Start at this block height
    #[arg(short, long, default_value_t = 0)]
    start_height: u32,

    /// The height to stop at (inclusive)
    #[arg(short, long)]
    max_height: Option<u32>,

    /// The number of parallel threads to run block generators in
    #[arg(short = 'j', long)]
    num_jobs: Option<usize>,

    /// Run generators and puzzles with at most this cost
    #[arg(long)]
    max_cost: Option<u64>,
}

#[derive(Serialize)]
struct BlockCats<'a> {
    height: u32,
    cat_spends: &'a [CatSpend],
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut constants = TEST_CONSTANTS;
    if let Some(max_cost) = args.max_cost {
        constants.max_block_cost_clvm = max_cost;
    }
    let constants = Arc::new(constants);

    let num_cores = args
        .num_jobs
        .unwrap_or_else(|| available_parallelism().expect("available_parallelism").into());

    let pool = blocking_threadpool::Builder::new()
        .num_threads(num_cores)
        .queue_len(num_cores * 2)
        .build();

    let db = BlockchainDb::open(&args.file).expect("failed to open database file");
    let num_spends = Arc::new(AtomicUsize::new(0));

    db.iterate_blocks(args.start_height, args.max_height, |height, block| {
        let record = BlockRecord::from(&block);
        if record.generator_and_cost().is_none() {
            return Ok(());
        }

        // block references are looked up on this thread, the database
        // connection is not shared with the workers
        let block_refs = resolve_block_refs(&record, &db)?;

        let constants = constants.clone();
        let num_spends = num_spends.clone();
        pool.execute(move || {
            let cat_spends =
                run_block_with_refs(&record, &block_refs, &constants, &CatMatcher::default())
                    .unwrap_or_else(|e| panic!("failed to run block {height}: {e}"));
            if cat_spends.is_empty() {
                return;
            }
            info!("height: {height} CAT spends: {}", cat_spends.len());
            num_spends.fetch_add(cat_spends.len(), Ordering::Relaxed);

            let line = serde_json::to_string(&BlockCats {
                height,
                cat_spends: &cat_spends,
            })
            .expect("failed to serialize CAT spends");
            writeln!(io::stdout().lock(), "{line}").expect("failed to write output");
        });
        Ok(())
    })
    .expect("failed to scan blocks");

    pool.join();
    assert_eq!(pool.panic_count(), 0);
    info!("found {} CAT spends", num_spends.load(Ordering::Relaxed));
}
