use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use gnews::config::Config;
use gnews::feed::{http_client, HttpTransport, NewsResponse};
use gnews::util::strip_control_chars;
use gnews::{NewsParams, NewsService};

const SEPARATOR: &str = "--------------";

/// Get the default config file path (~/.config/gnews/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("gnews")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "gnews", version, about = "Fetch headlines from Google News RSS")]
struct Args {
    /// Language code for the feed (hl), e.g. "en" or "ja"
    #[arg(short, long)]
    language: Option<String>,

    /// Country code for the feed (gl), e.g. "us" or "jp"
    #[arg(short, long)]
    country: Option<String>,

    /// Search query; omit for top stories
    #[arg(short, long)]
    query: Option<String>,

    /// Print the response as JSON
    #[arg(long)]
    json: bool,

    /// Config file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn build_service(config: &Config) -> Result<NewsService> {
    let defaults = config
        .service_defaults()
        .context("Invalid default language/country in config")?;
    let client = http_client(config.request_timeout(), &config.user_agent)
        .context("Failed to build HTTP client")?;

    let transport = HttpTransport::new(client).max_body_bytes(config.max_feed_bytes);
    Ok(NewsService::with_transport(transport)
        .base_url(config.base_url.as_str())
        .defaults(defaults))
}

fn print_items(news: &NewsResponse) {
    println!("{} items", news.items.len());
    for item in &news.items {
        println!("{SEPARATOR}");
        println!("Title: {}", strip_control_chars(&item.title));
        println!("Link: {}", strip_control_chars(&item.link));
        println!("Published: {}", strip_control_chars(&item.pub_date));
        println!("Description: {}", strip_control_chars(&item.description));
        println!("Source: {}", strip_control_chars(&item.source));
    }
    if !news.items.is_empty() {
        println!("{SEPARATOR}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the feed
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path).with_context(|| {
        format!(
            "Failed to load config from '{}'",
            config_path.display()
        )
    })?;

    let service = build_service(&config)?;

    let params = NewsParams {
        country: args.country,
        language: args.language,
        query: args.query,
    };
    let news = service
        .get_news(&params)
        .await
        .context("Failed to get news")?;

    if args.json {
        let json = serde_json::to_string_pretty(&news).context("Failed to serialize news")?;
        println!("{json}");
    } else {
        print_items(&news);
    }

    Ok(())
}
