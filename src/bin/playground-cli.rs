use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use futures_util::future::join_all;

use local_playground::config::{apply_client_overrides, load_config, LogFormat, PlaygroundConfig};
use local_playground::markdown::extract_blocks;
use local_playground::observability::logging;
use local_playground::playground::{affordances, PageOptions, PlaygroundController};

#[derive(Parser)]
#[command(name = "playground-cli")]
#[command(about = "Run the playground blocks of a Markdown chapter", long_about = None)]
struct Cli {
    /// TOML configuration file; only the [client] table is used
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Execution endpoint, overriding the configured one
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Per-run deadline in milliseconds
    #[arg(short, long)]
    deadline_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run playground blocks and print their result panels
    Run {
        file: PathBuf,
        /// Only run the block at this position (0-based, all fenced blocks)
        #[arg(short, long)]
        block: Option<usize>,
    },
    /// List code blocks and the buttons each would get
    List {
        file: PathBuf,
        #[arg(long)]
        copyable: bool,
        #[arg(long)]
        editor: bool,
    },
    /// Check the execution server status page
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(LogFormat::Pretty, logging::CLI_FILTER);

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PlaygroundConfig::default(),
    };
    let config = apply_client_overrides(config, cli.endpoint, cli.deadline_ms)?;

    match cli.command {
        Commands::Run { file, block } => {
            let markdown = std::fs::read_to_string(&file)?;
            let blocks = extract_blocks(&markdown);
            let controller = PlaygroundController::from_config(&config.client)?;

            let selected: Vec<_> = blocks
                .iter()
                .enumerate()
                .filter(|(i, b)| b.is_playground() && block.map_or(true, |wanted| wanted == *i))
                .collect();
            if selected.is_empty() {
                eprintln!("No playground blocks to run in {}", file.display());
                return Ok(());
            }

            let runs = selected.iter().map(|(_, b)| controller.run(b));
            let outcomes = join_all(runs).await;

            for ((index, b), outcome) in selected.iter().zip(outcomes) {
                let rendered = b.result_panel().map(|panel| panel.render());
                println!("--- block {} ({}) [{}]", index, b.edition(), outcome.label());
                if let Some(rendered) = rendered {
                    println!("{}", rendered.text.unwrap_or_default());
                }
            }
        }
        Commands::List { file, copyable, editor } => {
            let markdown = std::fs::read_to_string(&file)?;
            let options = PageOptions {
                copyable,
                editor_available: editor,
            };

            for (index, b) in extract_blocks(&markdown).iter().enumerate() {
                let titles: Vec<_> = affordances(b, options).iter().map(|a| a.title()).collect();
                println!(
                    "{:>3}  {:<10} {:<40} {}",
                    index,
                    b.language().unwrap_or("-"),
                    b.classes().join(" "),
                    titles.join(", ")
                );
            }
        }
        Commands::Status => {
            let url = config.client.endpoint_url()?.join("/")?;
            let res = reqwest::Client::new()
                .get(url)
                .timeout(Duration::from_millis(config.client.deadline_ms))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: execution server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    print!("{}", res.text().await?);
    Ok(())
}
