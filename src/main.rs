//! rnw - a tiny terminal microblog on top of Telegraph pages
#![allow(clippy::uninlined_format_args)]

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use rnw::api::telegraph::TelegraphClient;
use rnw::feed::FeedSource;
use rnw::{BucketDate, Channel, Config, Credential, Post, Session};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;

    match parse_args()? {
        Command::Write { content, channel } => write_cli(&config, &content, &channel).await,
        Command::Feed {
            channel,
            page,
            size,
            date,
        } => feed_cli(&config, &channel, page, size, date).await,
        Command::Count { channel, date } => count_cli(&config, &channel, date).await,
        Command::Prefetch { channel, pages } => prefetch_cli(&config, &channel, pages).await,
        Command::Account => account_cli(&config).await,
        Command::Logout => logout_cli(&config),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Write {
        content: String,
        channel: Channel,
    },
    Feed {
        channel: Channel,
        page: Option<u64>,
        size: Option<u64>,
        date: Option<BucketDate>,
    },
    Count {
        channel: Channel,
        date: Option<BucketDate>,
    },
    Prefetch {
        channel: Channel,
        pages: Option<u64>,
    },
    Account,
    Logout,
    Help,
    Version,
}

/// Flags that take a value
const VALUE_FLAGS: &[&str] = &[
    "-c", "--channel", "-p", "--page", "-s", "--size", "-n", "--pages", "--date",
];

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let Some(command) = args.first() else {
        return Ok(Command::Feed {
            channel: Channel::global(),
            page: None,
            size: None,
            date: None,
        });
    };
    let rest = &args[1..];

    match command.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),

        "write" | "w" => {
            let content = positional(rest)
                .first()
                .map(|s| (*s).to_string())
                .ok_or_else(|| anyhow::anyhow!("Missing post content"))?;
            let channel = Channel::from(flag(rest, &["-c", "--channel"]));
            Ok(Command::Write { content, channel })
        }

        "feed" | "read" | "r" => Ok(Command::Feed {
            channel: channel_arg(rest),
            page: number(rest, &["-p", "--page"])?,
            size: number(rest, &["-s", "--size"])?,
            date: date_arg(rest)?,
        }),

        "count" => Ok(Command::Count {
            channel: channel_arg(rest),
            date: date_arg(rest)?,
        }),

        "prefetch" => Ok(Command::Prefetch {
            channel: channel_arg(rest),
            pages: number(rest, &["-n", "--pages"])?,
        }),

        "account" => Ok(Command::Account),
        "logout" => Ok(Command::Logout),

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'rnw --help' for usage"
        )),
    }
}

/// Arguments that are neither flags nor flag values
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if VALUE_FLAGS.contains(&args[i].as_str()) {
            i += 2;
        } else {
            if !args[i].starts_with('-') {
                out.push(args[i].as_str());
            }
            i += 1;
        }
    }
    out
}

fn flag<'a>(args: &'a [String], names: &[&str]) -> Option<&'a str> {
    args.iter()
        .position(|a| names.contains(&a.as_str()))
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn number(args: &[String], names: &[&str]) -> Result<Option<u64>> {
    flag(args, names)
        .map(|v| {
            v.parse()
                .with_context(|| format!("{} expects a number, got {v:?}", names[names.len() - 1]))
        })
        .transpose()
}

fn date_arg(args: &[String]) -> Result<Option<BucketDate>> {
    flag(args, &["--date"]).map(str::parse).transpose()
}

/// Channel from `-c NAME` or the first positional argument
fn channel_arg(args: &[String]) -> Channel {
    flag(args, &["-c", "--channel"])
        .or_else(|| positional(args).first().copied())
        .map_or_else(Channel::global, Channel::named)
}

fn client(config: &Config) -> Result<TelegraphClient> {
    TelegraphClient::new(&config.api_url, config.request_timeout())
}

/// Session with the stored credential, if there is one
fn session(config: &Config, date: Option<BucketDate>) -> Result<Session<TelegraphClient>> {
    let mut session = Session::new(client(config)?).with_author(&config.author_name);
    if let Some(credential) = rnw::auth::get_token(&config.short_name).unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable credentials: {e}");
        None
    }) {
        session = session.with_credential(credential);
    }
    if let Some(date) = date {
        session = session.with_date(date);
    }
    Ok(session)
}

/// Load the stored token or create an account and store its token
async fn ensure_credential(config: &Config) -> Result<Credential> {
    if let Some(credential) = rnw::auth::get_token(&config.short_name)? {
        return Ok(credential);
    }

    println!("Creating account {}...", config.short_name);
    let account = client(config)?
        .create_account(&config.short_name, Some(&config.author_name))
        .await
        .context("Failed to create account")?;
    let token = account
        .access_token
        .ok_or_else(|| anyhow::anyhow!("The page service returned no access token"))?;

    rnw::auth::store_token(&config.short_name, &token)?;
    println!("✓ Account saved");
    Ok(Credential::new(token))
}

async fn write_cli(config: &Config, content: &str, channel: &Channel) -> Result<()> {
    let length = content.trim().chars().count();
    if length > config.max_post_chars {
        anyhow::bail!(
            "Post is {length} characters; the limit is {}",
            config.max_post_chars
        );
    }

    let credential = ensure_credential(config).await?;
    let session = Session::new(client(config)?)
        .with_credential(credential)
        .with_author(&config.author_name);

    let page = session.write(content, channel).await?;
    println!("✓ Posted to {}: {}", channel, page.url);
    Ok(())
}

async fn feed_cli(
    config: &Config,
    channel: &Channel,
    page: Option<u64>,
    size: Option<u64>,
    date: Option<BucketDate>,
) -> Result<()> {
    let session = Arc::new(session(config, date)?);
    let page = page.unwrap_or(1);
    let size = size.unwrap_or(config.page_size);

    println!("{}  ·  page {}  ·  {}", channel, page, session.date());
    println!("{}", "─".repeat(60));

    let mut cursor = session.feed_cursor(channel, page, size).await;
    if let Some(window) = cursor.window() {
        println!("posts {}..{}", window.end, window.start);
    }
    let mut shown = 0;
    while let Some(post) = cursor.next().await {
        print_post(&post);
        shown += 1;
    }

    if shown == 0 {
        println!("\nNo messages yet");
    }
    if cursor.skipped() > 0 {
        println!("\n({} posts could not be loaded)", cursor.skipped());
    }
    if cursor.source() == FeedSource::Cache {
        tracing::info!("Served {channel} page {page} from the list cache");
    }
    let more = cursor.window().is_some_and(|w| w.start > 1);
    drop(cursor);

    // Warm the following pages; cache writes need an account
    if more && config.prefetch_pages > 0 && session.can_write() {
        for handle in session.prefetch(channel, page.saturating_add(1), config.prefetch_pages, size) {
            let _ = handle.await;
        }
    }

    Ok(())
}

fn print_post(post: &Post) {
    const WIDTH: usize = 76;
    const MAX_NAME: usize = 20;

    let name = if post.name.chars().count() > MAX_NAME {
        let head: String = post.name.chars().take(MAX_NAME - 1).collect();
        format!("{head}…")
    } else {
        post.name.clone()
    };
    let name_width = name.chars().count();
    let indent = " ".repeat(name_width);

    let body = post.content.split_whitespace().collect::<Vec<_>>().join(" ");
    let options = textwrap::Options::new(WIDTH.saturating_sub(name_width + 3).max(20))
        .break_words(false);
    let lines = textwrap::wrap(&body, options);

    println!();
    for (i, line) in lines.iter().enumerate() {
        let label = if i == 0 { name.as_str() } else { indent.as_str() };
        println!("{label}   {line}");
    }
}

async fn count_cli(config: &Config, channel: &Channel, date: Option<BucketDate>) -> Result<()> {
    let session = session(config, date)?;
    let total = session.post_count(channel).await;
    println!("{} has {} posts on {}", channel, total, session.date());
    Ok(())
}

async fn prefetch_cli(config: &Config, channel: &Channel, pages: Option<u64>) -> Result<()> {
    let session = session(config, None)?;
    if !session.can_write() {
        anyhow::bail!("Prefetching writes cache pages; post something first to create an account");
    }

    let pages = pages.unwrap_or(config.prefetch_pages);
    let session = Arc::new(session);
    for handle in session.prefetch(channel, 1, pages, config.page_size) {
        // Prefetch drops its own errors; only a panicked task shows up here
        let _ = handle.await;
    }

    println!("✓ Warmed {} pages of {}", pages, channel);
    Ok(())
}

async fn account_cli(config: &Config) -> Result<()> {
    let Some(credential) = rnw::auth::get_token(&config.short_name)? else {
        println!("No account configured.");
        println!("\nAn account is created on your first post:");
        println!("  rnw write \"hello\"");
        return Ok(());
    };

    let account = client(config)?
        .get_account_info(&credential)
        .await
        .context("Failed to fetch account info")?;

    println!("Account: {}", account.short_name);
    println!("Author:  {}", account.author_name);
    if let Some(count) = account.page_count {
        println!("Pages:   {}", count);
    }
    if let Some(url) = account.auth_url {
        println!("Login:   {}", url);
    }
    Ok(())
}

fn logout_cli(config: &Config) -> Result<()> {
    rnw::auth::delete_token(&config.short_name)?;
    println!("✓ Forgot the token for {}", config.short_name);
    Ok(())
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"rnw - a tiny terminal microblog on Telegraph pages

USAGE:
    rnw                                Show the global feed
    rnw [COMMAND]

COMMANDS:
    write <content> [-c <channel>]     Publish a post
      Examples:
        rnw write "Hello world!"
        rnw write "cargo is fast" -c rust

    feed [channel] [OPTIONS]           Show a feed, newest first
      Options:
        -p, --page <n>                 Page number (default: 1)
        -s, --size <n>                 Posts per page (default: from config)
        --date <MM-DD>                 Read another day's posts (UTC)

    count [channel] [--date <MM-DD>]   Count posts in a channel

    prefetch [channel] [-n <pages>]    Build list-cache pages ahead of time

    account                            Show the stored account

    logout                             Forget the stored access token

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

CONFIG:
    {}
"#,
        config_path
    );
}

fn print_version() {
    println!("rnw {}", rnw::VERSION);
}
