use std::{io::Write, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{ControllerEvent, HotelApi, HotelListController, HttpHotelApi};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod terminal;

use commands::{parse_command, PageCommand, HELP};
use terminal::{render_form, render_items, render_patch, TerminalPrompt};

/// Terminal front end for the hotel management page.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, env = "HOTEL_SERVER_URL", default_value = "http://127.0.0.1:8000")]
    server_url: String,
    /// Initial city filter, fetched on start when longer than two characters.
    #[arg(long, default_value = "")]
    city: String,
    /// Skip reading the token from the page.
    #[arg(long, env = "HOTEL_CSRF_TOKEN")]
    csrf_token: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    let api: Arc<dyn HotelApi> = match args.csrf_token {
        Some(token) => Arc::new(HttpHotelApi::new(&args.server_url, token)?),
        None => Arc::new(
            HttpHotelApi::connect(&args.server_url)
                .await
                .with_context(|| format!("failed to load page from {}", args.server_url))?,
        ),
    };
    info!(server_url = %args.server_url, "connected");

    let controller =
        HotelListController::with_city_filter(api, Arc::new(TerminalPrompt), args.city);
    let render_task = tokio::spawn(render_events(controller.subscribe_events()));

    controller.initialize().await;
    println!("{HELP}");

    loop {
        print!("> ");
        std::io::stdout().flush().ok();
        let line = tokio::task::spawn_blocking(read_line)
            .await
            .context("stdin reader task failed")??;
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if command == PageCommand::Quit {
            break;
        }
        dispatch(&controller, command).await;
    }

    render_task.abort();
    Ok(())
}

async fn dispatch(controller: &HotelListController, command: PageCommand) {
    match command {
        PageCommand::City(city) => {
            controller.change_city(city).await;
        }
        PageCommand::List => println!("{}", render_items(&controller.list_items().await)),
        PageCommand::SetName(value) => controller.update_form(|form| form.name = value).await,
        PageCommand::SetLocalCode(value) => {
            controller.update_form(|form| form.local_code = value).await
        }
        PageCommand::SetHotelCity(value) => controller.update_form(|form| form.city = value).await,
        PageCommand::ShowForm => println!("{}", render_form(&controller.form().await)),
        PageCommand::Save => {
            controller.on_form_submit().await;
        }
        PageCommand::Edit(hotel_id) => {
            let element_id = client_core::render::hotel_element_id(hotel_id);
            let binding = controller
                .view()
                .await
                .find(&element_id)
                .map(|item| item.edit.clone());
            match binding {
                Some(edit) => {
                    controller
                        .edit_hotel(&edit.name, &edit.city, &edit.local_code)
                        .await
                }
                None => println!("hotel {hotel_id} is not in the list"),
            }
        }
        PageCommand::Delete(hotel_id) => {
            controller.delete_hotel(hotel_id).await;
        }
        PageCommand::Help => println!("{HELP}"),
        PageCommand::Quit => {}
    }
}

async fn render_events(mut events: tokio::sync::broadcast::Receiver<ControllerEvent>) {
    loop {
        match events.recv().await {
            Ok(ControllerEvent::ListPatched(patch)) => println!("{}", render_patch(&patch)),
            Ok(ControllerEvent::FormChanged(form)) => println!("{}", render_form(&form)),
            Ok(ControllerEvent::Alert(_)) => {}
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "render events lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}

fn read_line() -> Result<Option<String>> {
    let mut line = String::new();
    let read = std::io::stdin()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok((read > 0).then_some(line))
}
