//! meshify: Export tweets for a set of hashtags as CSV
//!
//! Fetches N unique tweets per hashtag from the Twitter search API, flattens
//! them and writes one CSV with alphabetically sorted columns.
//!
//! Usage:
//!   # 2000 #IoT tweets to stdout
//!   meshify -k $KEY -s $SECRET
//!
//!   # 500 tweets each for two tags, written to a file
//!   meshify -t IoT,rust -n 500 -o tweets.csv
//!
//! Every flag falls back to a MESHIFY_* environment variable, and a `.env`
//! file in the working directory is loaded first. Logs go to stderr and are
//! filtered with RUST_LOG (default: info).

// Use MiMalloc allocator for the whole process
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use clap::Parser;
use meshify::config::{Settings, DEFAULT_PER_TAG};
use meshify::etl::{hashtags_to_csv, Etl};
use meshify::extract::HashtagExtractor;
use meshify::load::CsvLoader;
use meshify::twitter::TwitterApi;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "meshify")]
#[command(
    about = "Export tweets for a set of hashtags as CSV",
    long_about = "Use the Twitter API to gather unique tweets per hashtag and output them to a CSV file."
)]
struct Args {
    /// Required. Twitter API public key
    #[arg(long, short = 'k', env = "MESHIFY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Required. Twitter API secret key
    #[arg(long, short = 's', env = "MESHIFY_API_SECRET", hide_env_values = true)]
    api_secret: Option<String>,

    /// Output file path for CSV output (default: stdout)
    #[arg(long, short = 'o', env = "MESHIFY_OUT")]
    out: Option<PathBuf>,

    /// Hashtags to query. '#' is a comment character in most shells, so pass
    /// the tag name only (IoT, not #IoT)
    #[arg(long, short = 't', env = "MESHIFY_TAGS", value_delimiter = ',', default_value = "IoT")]
    tags: Vec<String>,

    /// Number of tweets per hashtag
    #[arg(long, short = 'n', env = "MESHIFY_NUMBER", default_value_t = DEFAULT_PER_TAG)]
    number: usize,
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Settings {
            api_key: args.api_key.unwrap_or_default(),
            api_secret: args.api_secret.unwrap_or_default(),
            out: args.out,
            tags: args.tags,
            per_tag: args.number,
        }
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Stdout may carry the CSV, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from(Args::parse());
    settings.validate()?;

    let hashtags = settings.hashtags();
    let api = TwitterApi::new(&settings.api_key, &settings.api_secret)?;

    info!(hashtags = ?hashtags, per_tag = settings.per_tag, "starting export");

    match &settings.out {
        Some(path) => {
            let loader = CsvLoader::create(path)?;
            let extractor = HashtagExtractor::new(api, settings.per_tag, hashtags);
            Etl::new(extractor, loader).run()?;
            info!(path = %path.display(), "export complete");
        }
        None => {
            let stdout = std::io::stdout();
            hashtags_to_csv(stdout.lock(), api, settings.per_tag, hashtags).run()?;
        }
    }

    Ok(())
}
