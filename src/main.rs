use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use know_your_player::render::{render_state, LiveRenderer, RenderOptions};
use know_your_player::{
    ClientConfig, HttpConnector, QueryError, SearchSession, SearchStatus, StreamConsumer,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Look up a baseball player and stream what the service finds.
#[derive(Debug, Parser)]
#[command(name = "know-your-player", version, about, long_about = None)]
struct Cli {
    /// Player full name; omit to start an interactive prompt
    name: Vec<String>,

    /// Base address of the query service
    #[arg(long)]
    base_url: Option<String>,

    /// Config file (TOML, JSON or YAML) with `base_url`, `query_path`, `accept`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show the raw response under a successful result
    #[arg(long)]
    raw: bool,

    /// Print the final search state as JSON
    #[arg(long)]
    json: bool,

    /// Print Prometheus metrics before exiting
    #[arg(long)]
    metrics: bool,
}

type Session = SearchSession<HttpConnector>;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let connector = HttpConnector::new(&config)?;
    let mut session = SearchSession::new(StreamConsumer::new(connector));

    let status = if cli.name.is_empty() {
        interactive(&mut session, &cli).await?
    } else {
        search_once(&mut session, &cli.name.join(" "), &cli).await?
    };

    if cli.metrics {
        print_metrics()?;
    }

    Ok(match status {
        SearchStatus::Error => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

#[cfg(feature = "configs")]
fn load_config(cli: &Cli) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let config = ClientConfig::load(cli.config.as_deref())?;
    Ok(match &cli.base_url {
        Some(url) => config.with_base_url(url),
        None => config,
    })
}

#[cfg(not(feature = "configs"))]
fn load_config(cli: &Cli) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    if cli.config.is_some() {
        return Err("config files need the `configs` feature".into());
    }
    let config = ClientConfig::default();
    Ok(match &cli.base_url {
        Some(url) => config.with_base_url(url),
        None => config,
    })
}

async fn search_once(
    session: &mut Session,
    name: &str,
    cli: &Cli,
) -> Result<SearchStatus, Box<dyn std::error::Error>> {
    let mut live = LiveRenderer::new(RenderOptions { show_raw: cli.raw });
    let mut render_result = Ok(());
    let show_live = !cli.json;

    let state = session
        .search(name, |update| {
            if show_live && render_result.is_ok() {
                render_result = live.update(update, &mut io::stdout().lock());
            }
        })
        .await?;
    render_result?;

    if cli.json {
        println!("{}", simd_json::to_string_pretty(state)?);
    }
    Ok(state.status())
}

async fn interactive(
    session: &mut Session,
    cli: &Cli,
) -> Result<SearchStatus, Box<dyn std::error::Error>> {
    let options = RenderOptions { show_raw: cli.raw };
    render_state(session.state(), &options, &mut io::stdout().lock())?;
    println!("Type a player's full name, :clear to reset, :quit to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nPlayer Full Name> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            ":quit" | ":q" => break,
            ":clear" => {
                session.clear();
                render_state(session.state(), &options, &mut io::stdout().lock())?;
            }
            _ => {
                session.set_input(line.as_str());
                if !session.can_submit() {
                    continue;
                }
                match search_once(session, &line, cli).await {
                    Ok(_) => {}
                    Err(e) if e.is::<QueryError>() => {
                        eprintln!("{}", e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    Ok(session.state().status())
}

#[cfg(feature = "metrics")]
fn print_metrics() -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", know_your_player::metrics::gather_metrics()?);
    Ok(())
}

#[cfg(not(feature = "metrics"))]
fn print_metrics() -> Result<(), Box<dyn std::error::Error>> {
    Err("metrics need the `metrics` feature".into())
}
