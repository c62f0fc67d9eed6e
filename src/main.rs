use alsrec::{
    init_tracing, load_transactions, Config, Deduplication, RecommendationResponse, Recommender,
    Strategy,
};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Recommend items for one user from a transaction log",
    long_about = None
)]
struct Args {
    /// Transaction CSV with user_id, item_id and quantity columns
    #[arg(short, long)]
    data: String,

    #[arg(short, long)]
    user: u64,

    #[arg(short, long, value_enum, default_value_t = Strategy::SimilarItems)]
    strategy: Strategy,

    /// Number of items, defaults to recommendation.top_n
    #[arg(short)]
    n: Option<usize>,

    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Never repeat an item in the neighbour-based strategies
    #[arg(long)]
    unique: bool,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    std::env::set_var("RUST_LOG", &args.log_level);
    init_tracing();

    let config = Config::load_or_default(&args.config)?;
    info!("Model configuration: {:?}", config.model);

    let transactions = load_transactions(&args.data)?;
    let recommender =
        Recommender::new(&transactions, &config).context("Failed to fit recommender")?;

    let n = args.n.unwrap_or(config.recommendation.top_n);
    let dedup = if args.unique {
        Deduplication::Unique
    } else {
        Deduplication::Keep
    };

    let items = recommender
        .recommend_with(args.user, n, args.strategy, dedup)
        .with_context(|| format!("Failed to recommend for user {}", args.user))?;

    let response = RecommendationResponse {
        user_id: args.user,
        strategy: args.strategy.to_string(),
        items,
    };
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
