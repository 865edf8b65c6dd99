mod browse;
mod output;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use larder_core::ai::client_from_env;
use larder_core::http::ReqwestClient;
use larder_core::store::DiskStore;
use larder_core::types::parse_source_list;
use larder_core::RecipeService;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "larder")]
#[command(about = "Search recipe sites and expand recipes into full instructions", long_about = None)]
struct Cli {
    /// Print raw JSON instead of a listing
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search every source for a keyword
    Search {
        query: String,
        /// Comma-separated sources (default: all)
        #[arg(long)]
        sources: Option<String>,
        /// Hits per source
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Search all keywords of a category
    Category {
        name: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// List categories and their keywords
    Categories,
    /// Search, then enrich one result
    Enrich {
        query: String,
        /// 1-based result number to enrich
        #[arg(long, default_value_t = 1)]
        pick: usize,
    },
    /// Search, then enrich results by number until EOF or "q"
    Browse { query: String },
}

fn build_service() -> Result<RecipeService> {
    let http = Arc::new(ReqwestClient::new().context("Failed to build HTTP client")?);
    RecipeService::from_env(http, client_from_env(), Arc::new(DiskStore::from_env()))
        .context("Invalid search configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let service = build_service()?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Search {
            query,
            sources,
            limit,
        } => {
            let sources = parse_source_list(sources.as_deref().unwrap_or(""))?;
            let response = service.search_by_keyword(&query, &sources, limit).await?;
            if cli.json {
                output::print_json(&mut out, &response)?;
            } else {
                output::print_errors(response.errors.as_deref());
                output::print_recipes(&mut out, &response.recipes, 0)?;
                writeln!(out, "{} recipes", response.total_count)?;
            }
        }
        Commands::Category { name, page } => {
            let response = service.search_by_category(&name, page).await?;
            if cli.json {
                output::print_json(&mut out, &response)?;
            } else {
                output::print_errors(response.errors.as_deref());
                output::print_recipes(
                    &mut out,
                    &response.recipes,
                    (response.page - 1) * response.page_size,
                )?;
                writeln!(
                    out,
                    "page {} ({} recipes total{})",
                    response.page,
                    response.total_count,
                    if response.has_more { ", more available" } else { "" }
                )?;
            }
        }
        Commands::Categories => {
            let categories = service.categories();
            if cli.json {
                output::print_json(&mut out, &categories)?;
            } else {
                output::print_categories(&mut out, &categories)?;
            }
        }
        Commands::Enrich { query, pick } => {
            let response = service.search_by_keyword(&query, &[], None).await?;
            output::print_errors(response.errors.as_deref());
            let recipe = pick
                .checked_sub(1)
                .and_then(|i| response.recipes.get(i))
                .with_context(|| {
                    format!("No result #{pick} ({} found)", response.recipes.len())
                })?;
            let enriched = service.enrich(recipe).await?;
            if cli.json {
                output::print_json(&mut out, &enriched)?;
            } else {
                output::print_enriched(&mut out, &enriched)?;
            }
        }
        Commands::Browse { query } => {
            let response = service.search_by_keyword(&query, &[], None).await?;
            output::print_errors(response.errors.as_deref());
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            browse::run(service.gateway(), &response.recipes, stdin, &mut out).await?;
        }
    }

    Ok(())
}
