use chrono::{Datelike, NaiveDate};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use stoic_diary::application::init::init;
use stoic_diary::application::{
    BatchFormat, ChatOutcome, ChatService, ExportService, HistoryService, ListOptions, Selection,
    SettingsService,
};
use stoic_diary::cli::commands::day_arg;
use stoic_diary::cli::{format_calendar, format_entry_list, format_transcript, Cli, Commands};
use stoic_diary::domain::day_ref::{parse_iso_date, resolve_day, today};
use stoic_diary::domain::{DayReference, SessionKind};
use stoic_diary::error::{DiaryError, Result};
use stoic_diary::infrastructure::{DiaryRepository, GeminiClient, JsonFileStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

/// Logs go to stderr; `STOIC_LOG` takes precedence over `-v`
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env("STOIC_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        println!("stoic - Stoic diary with an AI mentor");
        println!("Use --help for usage information");
        return Ok(());
    };

    match command {
        Commands::Init { path } => {
            init(&path)?;
            println!("Initialized stoic diary at {}", path.display());
            println!("Next: stoic config api-key <KEY>");
            Ok(())
        }
        Commands::Chat { day, message } => {
            let store = JsonFileStore::discover()?;
            let date = resolve_day(day_arg(&day).as_deref())?;
            let service = chat_service(store.clone())?;

            match message {
                Some(text) => exchange(&service, date, &text).await,
                None => interactive(&service, &store, date).await,
            }
        }
        Commands::Morning { day } => session(&day, SessionKind::Morning).await,
        Commands::Evening { day } => session(&day, SessionKind::Evening).await,
        Commands::Show { day } => {
            let date = resolve_day(day_arg(&day).as_deref())?;
            let service = HistoryService::new(JsonFileStore::discover()?);
            let entry = service.show(date)?;
            print!("{}", format_transcript(&entry, today()));
            Ok(())
        }
        Commands::List {
            from,
            to,
            tag,
            limit,
        } => {
            let options = ListOptions {
                from: from.as_deref().map(parse_iso_date).transpose()?,
                to: to.as_deref().map(parse_iso_date).transpose()?,
                tag,
                limit,
            };
            let service = HistoryService::new(JsonFileStore::discover()?);
            let entries = service.list(&options)?;
            print!("{}", format_entry_list(&entries));
            if entries.is_empty() {
                println!();
            }
            Ok(())
        }
        Commands::Calendar { month } => {
            let first = match month {
                Some(m) => parse_month(&m)?,
                None => today(),
            };
            let service = HistoryService::new(JsonFileStore::discover()?);
            let counts = service.month(first.year(), first.month())?;
            print!("{}", format_calendar(first.year(), first.month(), &counts));
            Ok(())
        }
        Commands::Export {
            day,
            output,
            stdout,
            no_frontmatter,
        } => {
            let date = resolve_day(day_arg(&day).as_deref())?;
            let service = ExportService::new(JsonFileStore::discover()?);

            if stdout {
                print!("{}", service.render_entry(date, !no_frontmatter)?);
            } else {
                let dir = output.unwrap_or_else(|| PathBuf::from("."));
                let path = service.export_entry(date, !no_frontmatter, &dir)?;
                println!("Exported {}", path.display());
            }
            Ok(())
        }
        Commands::ExportBatch {
            dates,
            from,
            to,
            all,
            format,
            output,
            no_frontmatter,
        } => {
            let format: BatchFormat = format.parse().map_err(DiaryError::Config)?;
            let selection = if all {
                Selection::All
            } else if from.is_some() || to.is_some() {
                Selection::Range {
                    from: from.as_deref().map(parse_iso_date).transpose()?,
                    to: to.as_deref().map(parse_iso_date).transpose()?,
                }
            } else if !dates.is_empty() {
                let base = today();
                let dates = dates
                    .iter()
                    .map(|d| DayReference::parse(d).map(|r| r.resolve(base)))
                    .collect::<Result<Vec<_>>>()?;
                Selection::Dates(dates)
            } else {
                return Err(DiaryError::NothingToExport);
            };

            let service = ExportService::new(JsonFileStore::discover()?);
            let dir = output.unwrap_or_else(|| PathBuf::from("."));
            let path = service.export_batch(
                &selection,
                format,
                !no_frontmatter,
                &dir,
                chrono::Local::now(),
            )?;
            println!("Exported {}", path.display());
            Ok(())
        }
        Commands::Config { key, value, list } => {
            let service = SettingsService::new(JsonFileStore::discover()?);

            if list {
                for (k, v) in service.list()? {
                    if v.contains('\n') {
                        println!("{} =\n{}", k, v.trim_end());
                    } else {
                        println!("{} = {}", k, v);
                    }
                }
                return Ok(());
            }

            match (key.as_deref(), value) {
                (Some("edit-prompt"), None) => {
                    if service.edit_prompt()? {
                        println!("Persona updated");
                    } else {
                        println!("Persona unchanged");
                    }
                }
                (Some("reset-prompt"), None) => {
                    service.reset_prompt()?;
                    println!("Persona reset to the default Stoic mentor");
                }
                (Some(k), Some(v)) => {
                    service.set(k, &v)?;
                    if k == "api-key" {
                        println!("Set {} = {}", k, service.get(k)?);
                    } else {
                        println!("Set {} = {}", k, v);
                    }
                }
                (Some(k), None) => println!("{}", service.get(k)?),
                (None, _) => {
                    println!("Usage: stoic config [--list | <key> [<value>] | edit-prompt | reset-prompt]");
                    println!(
                        "Valid keys: {}",
                        stoic_diary::application::manage_settings::VALID_KEYS
                    );
                }
            }
            Ok(())
        }
        Commands::Delete { day } => {
            let date = resolve_day(day_arg(&day).as_deref())?;
            HistoryService::new(JsonFileStore::discover()?).delete(date)?;
            println!("Deleted {}", date.format("%Y-%m-%d"));
            Ok(())
        }
    }
}

fn parse_month(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
        .map_err(|_| DiaryError::Config(format!("Invalid month format: '{}'", input.trim())))
}

fn chat_service(store: JsonFileStore) -> Result<ChatService<GeminiClient>> {
    let settings = store.load_settings()?;
    let api_key = settings
        .effective_api_key()
        .ok_or(DiaryError::MissingApiKey)?;
    let config = store.load_config()?;
    let client = GeminiClient::new(api_key, &config)?;
    Ok(ChatService::new(store, client))
}

async fn session(day: &[String], kind: SessionKind) -> Result<()> {
    let store = JsonFileStore::discover()?;
    let date = resolve_day(day_arg(day).as_deref())?;
    let service = chat_service(store)?;

    println!("Me: {}", kind.opener());
    print_prefix();
    let outcome = service.start_session(date, kind, stream_printer()).await?;
    finish_reply(&outcome);
    Ok(())
}

/// Prints only the part of the accumulated reply not yet on screen
fn stream_printer() -> impl FnMut(&str) + Send {
    let mut printed = 0;
    move |accumulated: &str| {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(accumulated[printed..].as_bytes());
        let _ = stdout.flush();
        printed = accumulated.len();
    }
}

fn print_prefix() {
    print!("\nStoic Guide: ");
    let _ = io::stdout().flush();
}

fn finish_reply(outcome: &ChatOutcome) {
    match outcome {
        ChatOutcome::Reply(_) => println!("\n"),
        ChatOutcome::Fallback { message, .. } => println!("\n{}\n", message.content),
    }
}

async fn exchange(
    service: &ChatService<GeminiClient>,
    date: NaiveDate,
    text: &str,
) -> Result<()> {
    print_prefix();
    let outcome = service.send(date, text, stream_printer()).await?;
    finish_reply(&outcome);
    Ok(())
}

async fn interactive(
    service: &ChatService<GeminiClient>,
    store: &JsonFileStore,
    date: NaiveDate,
) -> Result<()> {
    let settings = store.load_settings()?;
    let existing = store.get_entry(date)?;

    println!("Welcome, {}.", settings.user_name);
    match &existing {
        Some(entry) if !entry.is_empty() => print!("{}", format_transcript(entry, today())),
        _ => {
            println!("\"The happiness of your life depends upon the quality of your thoughts.\"");
            println!("Type /morning for the morning preparation or /evening for the evening review.");
        }
    }
    println!("Write your reflection. /quit to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nMe: ");
        let _ = io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let outcome = match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/morning" | "/evening" => {
                let kind = if line.trim() == "/morning" {
                    SessionKind::Morning
                } else {
                    SessionKind::Evening
                };
                print_prefix();
                service.start_session(date, kind, stream_printer()).await?
            }
            _ => {
                print_prefix();
                service.send(date, &line, stream_printer()).await?
            }
        };
        finish_reply(&outcome);
    }

    Ok(())
}
