//! `driverboard` - CLI for the driver registry
//!
//! This binary drives a [`DriverBoard`] from the command line: every command
//! mounts the board against the configured backend, performs one action, and
//! prints the refreshed list.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use driverboard::cli::{Cli, Command, ConfigCommand, OutputFormat};
use driverboard::view::{html, text};
use driverboard::{
    init_logging, BoardEvent, Config, DriverBoard, DriverForm, HtmlContainer, HttpDriverApi,
    SystemClock,
};

type Board = DriverBoard<HttpDriverApi, HtmlContainer>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    // Execute the command
    match cli.command {
        Command::List(cmd) => {
            let board = open_board(&config).await?;
            print_board(&board, cmd.format)?;
        }
        Command::Add(cmd) => {
            let mut board = open_board(&config).await?;
            for (field, value) in cmd.inputs() {
                board
                    .dispatch(BoardEvent::FormInput {
                        name: field.input_name().to_string(),
                        value: value.to_string(),
                    })
                    .await?;
            }
            board.dispatch(BoardEvent::Submit).await?;
            print_board(&board, cmd.format)?;
        }
        Command::Edit(cmd) => {
            let mut board = open_board(&config).await?;
            board.dispatch(BoardEvent::Edit(cmd.id)).await?;
            for (field, value) in cmd.changes() {
                board
                    .dispatch(BoardEvent::EditInput {
                        id: cmd.id,
                        field,
                        value: value.to_string(),
                    })
                    .await?;
            }
            board.dispatch(BoardEvent::Save(cmd.id)).await?;
            print_board(&board, cmd.format)?;
        }
        Command::Delete(cmd) => {
            let mut board = open_board(&config).await?;
            board.dispatch(BoardEvent::Delete(cmd.id)).await?;
            print_board(&board, cmd.format)?;
        }
        Command::Render(cmd) => {
            let board = open_board(&config).await?;
            let page = html::render_page(&config.view.title, &board.view(), board.form());
            match cmd.output {
                Some(path) => std::fs::write(&path, page)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{page}"),
            }
        }
        Command::Config(cmd) => handle_config(&config, cmd)?,
    }

    Ok(())
}

/// Build the board and load the driver list, failing if the backend is unreachable.
async fn open_board(config: &Config) -> anyhow::Result<Board> {
    let api = HttpDriverApi::new(&config.api)?;
    let mut board = DriverBoard::new(api, HtmlContainer::new(), DriverForm::new(), SystemClock);
    board.load_and_render().await?;
    Ok(board)
}

fn print_board(board: &Board, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Plain => print!("{}", text::render_board(&board.view())),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(board.drivers())?),
        OutputFormat::Html => print!("{}", board.container().markup()),
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Base URL:           {}", config.api.base_url);
                println!("  Resource:           {}", config.api.resource);
                match config.api.timeout() {
                    Some(timeout) => println!("  Timeout:            {}s", timeout.as_secs()),
                    None => println!("  Timeout:            none"),
                }
                println!();
                println!("[View]");
                println!("  Title:              {}", config.view.title);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
