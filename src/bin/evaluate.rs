use alsrec::{
    evaluate, init_tracing, load_transactions, split_by_week, Config, Recommender, Strategy,
};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Hold out the last weeks of a transaction log and score a strategy",
    long_about = None
)]
struct Args {
    #[arg(short, long)]
    data: String,

    /// Weeks held out for testing, defaults to evaluation.test_weeks
    #[arg(short, long)]
    test_weeks: Option<u32>,

    #[arg(short, long, value_enum, default_value_t = Strategy::SimilarItems)]
    strategy: Strategy,

    /// Recommendations per user, defaults to recommendation.top_n
    #[arg(short)]
    n: Option<usize>,

    /// Metric cutoff, defaults to evaluation.k
    #[arg(short)]
    k: Option<usize>,

    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    std::env::set_var("RUST_LOG", &args.log_level);
    init_tracing();

    info!("Starting offline evaluation");

    let config = Config::load_or_default(&args.config)?;
    let test_weeks = args.test_weeks.unwrap_or(config.evaluation.test_weeks);
    let n = args.n.unwrap_or(config.recommendation.top_n);
    let k = args.k.unwrap_or(config.evaluation.k);

    let transactions = load_transactions(&args.data)?;
    let (train, test) = split_by_week(&transactions, test_weeks as usize)?;

    let recommender = Recommender::new(&train, &config).context("Failed to fit recommender")?;
    let report = evaluate(&recommender, &test, args.strategy, n, k);

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
