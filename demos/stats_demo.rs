use clap::Parser;
use clap::ValueEnum;
use slot_hash::Config;
use slot_hash::FixedState;
use slot_hash::HashMap;
use slot_hash::probe::ProbeStrategy;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Linear,
    Double,
}

impl From<Strategy> for ProbeStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Linear => ProbeStrategy::Linear,
            Strategy::Double => ProbeStrategy::DoubleHash,
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Remove/insert rounds run after the initial fill.
    #[arg(short = 'r', long = "churn_rounds", default_value_t = 0)]
    churn_rounds: usize,

    #[arg(short = 's', long = "strategy", value_enum, default_value_t = Strategy::Linear)]
    strategy: Strategy,

    #[arg(short = 'g', long = "grow_threshold", default_value_t = 75)]
    grow_threshold: u8,

    #[arg(long = "seed", default_value_t = 0)]
    seed: u64,
}

fn main() {
    let args = Args::parse();

    let config = Config::new()
        .with_probe_strategy(args.strategy.into())
        .with_grow_threshold(args.grow_threshold);

    println!(
        "Creating HashMap with target capacity: {} ({:?} probing, grow above {}%)",
        args.target_capacity, args.strategy, args.grow_threshold
    );

    let mut map: HashMap<u64, u64, FixedState> = HashMap::with_config_and_hasher(
        args.target_capacity,
        config,
        FixedState::with_seed(args.seed),
    );

    println!(
        "Actual capacity: {} ({} slots)",
        map.capacity(),
        map.num_slots()
    );
    println!("Filling map with u64 keys...");

    let num_values = map.capacity() as u64;
    for key in 0..num_values {
        map.insert(key, key);
    }

    println!("Inserted {} values into map", map.len());
    println!(
        "Final load factor: {:.2}%",
        (map.len() as f64 / map.num_slots() as f64) * 100.0
    );

    if args.churn_rounds > 0 {
        println!("Churning {} rounds...", args.churn_rounds);
        let mut next = num_values;
        for round in 0..args.churn_rounds as u64 {
            map.remove(&round);
            map.insert(next, next);
            next += 1;
        }
    }

    map.probe_histogram().print();
    map.debug_stats().print();
}
