mod news;
mod stats;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::news::NewsCommands;
use crate::stats::StatsCommands;

#[derive(Debug, Parser)]
#[command(name = "trendboard-cli")]
#[command(about = "TrendRadar dashboard command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Query stored news items
    News {
        #[command(subcommand)]
        command: NewsCommands,
    },
    /// Query the aggregation service
    Stats {
        #[command(subcommand)]
        command: StatsCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database answers
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Replace the sample platforms and news items
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = trendboard_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("trendboard-cli ready; see --help for commands");
        return Ok(());
    };

    match command {
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            run_db(&pool, command).await
        }
        Commands::News { command } => {
            let pool = connect(&config).await?;
            news::run(&pool, command).await
        }
        Commands::Stats { command } => {
            let client = trendboard_stats::StatsClient::with_base_url(
                &config.api_base_url,
                config.http_timeout_secs,
                &config.user_agent,
            )?;
            stats::run(&client, command).await
        }
    }
}

async fn connect(config: &trendboard_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = trendboard_db::PoolConfig::from_app_config(config);
    Ok(trendboard_db::connect_pool(&config.database_url, pool_config).await?)
}

async fn run_db(pool: &sqlx::PgPool, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            trendboard_db::ping(pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = trendboard_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed => {
            trendboard_db::run_migrations(pool).await?;
            let summary = trendboard_db::seed_sample_data(pool).await?;
            tracing::info!(
                platforms = summary.platforms,
                news_items = summary.news_items,
                "sample data seeded"
            );
            println!(
                "seeded {} platforms and {} news items",
                summary.platforms, summary.news_items
            );
        }
    }
    Ok(())
}
