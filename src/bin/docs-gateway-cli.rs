use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use docs_gateway::config::load_config;
use docs_gateway::RedirectTable;

#[derive(Parser)]
#[command(name = "docs-gateway-cli")]
#[command(about = "Management CLI for the documentation gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(short, long, env = "DOCS_GATEWAY_ADMIN_KEY", default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway status
    Status,
    /// List the live redirect rules in evaluation order
    Rules,
    /// Ask the running gateway how it would answer a path
    Resolve { path: String },
    /// Load and validate a configuration file
    Check { config: PathBuf },
    /// Resolve a path against a configuration file without a running gateway
    Try { config: PathBuf, path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => get_admin(&cli.url, &cli.key, "/admin/status", &[]).await?,
        Commands::Rules => get_admin(&cli.url, &cli.key, "/admin/rules", &[]).await?,
        Commands::Resolve { path } => {
            let (path, query) = split_query(&path);
            let mut params = vec![("path", path)];
            if let Some(query) = query {
                params.push(("query", query));
            }
            get_admin(&cli.url, &cli.key, "/admin/resolve", &params).await?
        }
        Commands::Check { config } => {
            let config = load_config(&config)?;
            let rules = config.effective_redirects();
            println!(
                "ok: {} redirect rule(s){}, {} code slot(s)",
                rules.len(),
                if config.redirects.is_empty() { " (built-in)" } else { "" },
                config.code_input.slots,
            );
        }
        Commands::Try { config, path } => {
            let config = load_config(&config)?;
            let table = RedirectTable::compile(&config.effective_redirects())?;
            let (path, query) = split_query(&path);
            match table.resolve(path, query) {
                Some(redirect) => println!(
                    "{} {} (rule #{})",
                    redirect.status.as_u16(),
                    redirect.location,
                    redirect.rule
                ),
                None => println!("404 no redirect"),
            }
        }
    }

    Ok(())
}

fn split_query(path: &str) -> (&str, Option<&str>) {
    match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    }
}

async fn get_admin(
    url: &str,
    key: &str,
    endpoint: &str,
    params: &[(&str, &str)],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);

    let res = reqwest::Client::new()
        .get(format!("{}{}", url.trim_end_matches('/'), endpoint))
        .headers(headers)
        .query(params)
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
