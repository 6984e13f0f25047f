use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use callboard_client::{
    telemetry, ApiClient, AuthenticatedTransport, CallListSync, ClientConfig, FilterSet,
    LayoutGateway, LayoutPreferences, LoadRequest,
};
use clap::{Args, Parser, Subcommand};

mod output;

#[derive(Parser)]
#[command(author, version, about = "Browse call records from the reception dashboard API")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List calls, following pagination for the requested number of pages
    Calls(CallsArgs),
    /// Show or change the saved call layout
    #[command(subcommand)]
    Layout(LayoutCommand),
}

#[derive(Args)]
struct CallsArgs {
    #[arg(long)]
    status: Option<String>,
    /// Only starred calls
    #[arg(long, conflicts_with = "unstarred")]
    starred: bool,
    /// Only calls that are not starred
    #[arg(long)]
    unstarred: bool,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    after: Option<String>,
    #[arg(long)]
    before: Option<String>,
    #[arg(long)]
    to_number: Option<String>,
    #[arg(long)]
    limit: Option<u32>,
    /// Number of pages to load
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,
}

impl CallsArgs {
    fn filters(&self) -> FilterSet {
        let starred = match (self.starred, self.unstarred) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        FilterSet {
            status: self.status.clone(),
            starred,
            search: self.search.clone(),
            after: self.after.clone(),
            before: self.before.clone(),
            to_number: self.to_number.clone(),
        }
    }
}

#[derive(Subcommand)]
enum LayoutCommand {
    /// Print the saved layout
    Show,
    /// Save a new layout
    Set {
        /// Section names in display order, comma separated
        #[arg(long, value_delimiter = ',')]
        order: Vec<String>,
        /// Sections to show collapsed, comma separated
        #[arg(long, value_delimiter = ',')]
        collapse: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = ClientConfig::from_path(path)?;
            config.apply_env();
            config.validate()?;
            config
        }
        None => ClientConfig::load()?,
    };
    tracing::info!(api_url = %config.api_url, "using dashboard API");

    let transport: Arc<dyn AuthenticatedTransport> = Arc::new(ApiClient::from_config(&config)?);

    match cli.command {
        Command::Calls(calls) => list_calls(transport, &config, calls).await,
        Command::Layout(LayoutCommand::Show) => {
            let layout = LayoutGateway::new(transport).fetch().await;
            output::print_layout(&layout);
            Ok(())
        }
        Command::Layout(LayoutCommand::Set { order, collapse }) => {
            let layout = LayoutPreferences {
                section_order: order,
                collapsed_sections: collapse.into_iter().map(|name| (name, true)).collect(),
            };
            LayoutGateway::new(transport).save(&layout).await?;
            println!("Layout saved.");
            Ok(())
        }
    }
}

async fn list_calls(
    transport: Arc<dyn AuthenticatedTransport>,
    config: &ClientConfig,
    args: CallsArgs,
) -> Result<()> {
    let sync = CallListSync::new(transport, config.sync_options());
    let filters = args.filters();

    sync.load(LoadRequest {
        filters: filters.clone(),
        cursor: None,
        limit: args.limit,
    })
    .await;

    for _ in 1..args.pages {
        if sync.snapshot().error.is_some() || !sync.load_more(filters.clone(), args.limit).await {
            break;
        }
    }

    let state = sync.snapshot();
    output::print_calls(&state.items);
    output::print_footer(&state, sync.get_stored_cursor(&filters).as_deref());
    if let Some(error) = state.error {
        bail!("{error}");
    }
    Ok(())
}
