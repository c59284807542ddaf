use std::fs::OpenOptions;

use anyhow::Context;
use anyhow::Result;
use clap::CommandFactory;
use clap::FromArgMatches;
use clap::Parser;
use log::LevelFilter;
use taleweave_term::application::cli;
use taleweave_term::Config;
use taleweave_term::StoryClientManager;

#[derive(Parser, Debug)]
#[clap(
    name = "Taleweave",
    author,
    version = "0.1.0",
    about = "Write a story together with an AI, five panels at a time."
)]
struct Cli {
    #[clap(long, short, default_value = "info")]
    log_level: String,

    #[clap(
        long,
        default_value = "taleweave.log",
        help = "File that receives log output so the prompts stay readable"
    )]
    log_file: String,

    #[clap(long, help = "Print the default config file to stdout and exit")]
    print_default_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = cli::augment(Cli::command());
    let matches = cmd.clone().get_matches();
    let args = Cli::from_arg_matches(&matches)?;

    if args.print_default_config {
        println!("{}", Config::serialize_default(cmd));
        return Ok(());
    }

    // Logs go to a file to keep the prompts clean.
    let log_level_filter = args.log_level.parse().unwrap_or(LevelFilter::Info);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.log_file)
        .with_context(|| format!("Failed to create {}", args.log_file))?;

    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    Config::load(cmd, vec![&matches]).await?;

    std::panic::set_hook(Box::new(|panic_info| {
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let client = StoryClientManager::get()?;
    log::info!("starting taleweave");

    taleweave_term::start_loop(client).await
}
