use clap::{Parser, Subcommand};

use pulse_db::PgArticleStore;
use pulse_feed::{load_feed, refresh_feed, Enricher, FeedFetcher, PipelineOptions};

#[derive(Debug, Parser)]
#[command(name = "pulse-cli")]
#[command(about = "AI Pulse ingestion command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one fetch-enrich-persist refresh cycle and print the projections.
    Refresh,
    /// Rehydrate the projections from persisted articles without fetching.
    Load,
    /// Apply pending database migrations.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = pulse_core::load_app_config()?;

    let pool_config = pulse_db::PoolConfig::from_app_config(&config);
    let pool = pulse_db::connect_pool(&config.database_url, pool_config).await?;
    let store = PgArticleStore::new(pool.clone());
    let options = PipelineOptions {
        fallback_recent: config.fallback_recent,
        recent_load_limit: config.recent_load_limit,
    };

    match cli.command {
        Commands::Migrate => {
            pulse_db::run_migrations(&pool).await?;
            println!("migrations applied");
        }
        Commands::Refresh => {
            pulse_db::run_migrations(&pool).await?;
            let feeds = pulse_core::load_feeds(&config.feeds_path)?;
            tracing::info!(sources = feeds.feeds.len(), "starting refresh cycle");

            let fetcher = FeedFetcher::new(
                config.feed_timeout_secs,
                &config.user_agent,
                config.max_concurrent_feeds,
            )?;
            let enricher = Enricher::new(
                config.page_timeout_secs,
                &config.user_agent,
                &config.translate_url,
                &config.translate_target,
                config.max_concurrent_enrich,
            )?;

            let projection =
                refresh_feed(&fetcher, &enricher, &store, &feeds.feeds, options).await?;
            println!("{}", serde_json::to_string_pretty(&projection)?);
        }
        Commands::Load => match load_feed(&store, options).await {
            Some(projection) => println!("{}", serde_json::to_string_pretty(&projection)?),
            None => eprintln!("article store is empty; nothing to load"),
        },
    }

    Ok(())
}
