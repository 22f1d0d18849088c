use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use ebookshelf_config::AppConfig;

mod commands;

fn build_cli() -> Command {
    Command::new("ebookshelf")
        .version("0.1.0")
        .about("Personal ebook library with file-backed storage")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Path to the JSON config file")
                .required(true),
        )
        .subcommand(Command::new("serve").about("Serve the library over HTTP"))
        .subcommand(Command::new("list").about("List all books in the library"))
        .subcommand(
            Command::new("add")
                .about("Add a new book to the library")
                .arg(
                    Arg::new("title")
                        .short('t')
                        .long("title")
                        .value_name("TITLE")
                        .help("Book title")
                        .required(true),
                )
                .arg(
                    Arg::new("author")
                        .short('a')
                        .long("author")
                        .value_name("AUTHOR")
                        .help("Book author (repeatable)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("year")
                        .short('y')
                        .long("year")
                        .value_name("YEAR")
                        .help("Publication year")
                        .required(true),
                )
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .value_name("TAG")
                        .help("Tag (repeatable)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("file")
                        .short('f')
                        .long("file")
                        .value_name("PATH")
                        .help("Attach the given file (repeatable)")
                        .action(ArgAction::Append),
                ),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = build_cli().get_matches();
    let config_path = matches
        .get_one::<String>("config")
        .context("--config is required")?;
    let config = AppConfig::load(config_path).context("Error loading config file")?;

    match matches.subcommand() {
        // Serving the library is the program's default mode.
        Some(("serve", _)) | None => commands::serve(&config).await,
        Some(("list", _)) => commands::list_books(&config),
        Some(("add", sub_matches)) => commands::add_book(&config, sub_matches),
        Some((other, _)) => anyhow::bail!("Unknown command: {}", other),
    }
}
