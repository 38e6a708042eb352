use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use content_manager::app::AppContext;
use content_manager::cli::{commands, Cli, Commands};
use content_manager::config::Config;

// Publishers are refreshed one after another; a single thread is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let ctx = AppContext::new(config, cli.db)?;

    match cli.command {
        Commands::AddLink {
            link,
            kind,
            category,
            title,
        } => {
            commands::add_link(&ctx, &link, title, kind, category)?;
        }
        Commands::UpdateLink {
            link,
            date,
            kind,
            category,
        } => {
            commands::update_link(&ctx, &link, date.as_deref(), kind, category)?;
        }
        Commands::RemoveLink { link } => {
            commands::remove_link(&ctx, &link)?;
        }
        Commands::Links => {
            commands::list_links(&ctx)?;
        }
        Commands::AddPublisher {
            name,
            website,
            rss,
            kind,
            category,
        } => {
            commands::add_publisher(&ctx, &name, &website, &rss, kind, category).await?;
        }
        Commands::UpdatePublisher {
            name,
            rss,
            kind,
            category,
        } => {
            commands::update_publisher(&ctx, &name, rss, kind, category)?;
        }
        Commands::RemovePublisher { name } => {
            commands::remove_publisher(&ctx, &name)?;
        }
        Commands::Publishers => {
            commands::list_publishers(&ctx)?;
        }
        Commands::Entries { publisher, json } => {
            commands::list_entries(&ctx, publisher.as_deref(), json)?;
        }
        Commands::Refresh { verbose } => {
            commands::refresh(&ctx, verbose).await?;
        }
    }

    Ok(())
}
