//! # CLI Layer
//!
//! This module is **one possible UI client** for scholar. It is the only place
//! that knows about terminal I/O, sets up logging, and turns `CmdResult`s into
//! text.
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` with API and configuration
//! - `handle_*()`: Per-command handlers that call the API and format output

use super::render::{print_messages, render_config, render_entry_list, render_types};
use super::setup::{Cli, Commands, CoreCommands, DataCommands, EntryCommands, MiscCommands};
use clap::Parser;
use scholar::api::{AddOptions, ConfigAction, ScholarApi};
use scholar::editor::{edit_text, open_file};
use scholar::error::{Result, ScholarError};
use scholar::init::{default_paths, initialize};
use scholar::store::fs::FileStore;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Log filter override, e.g. `SCHOLAR_LOG=scholar=trace`.
const LOG_ENV: &str = "SCHOLAR_LOG";

struct AppContext {
    api: ScholarApi<FileStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    configure_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Core(cmd)) => match cmd {
            CoreCommands::Add {
                query,
                entry_type,
                doi,
                fields,
                attach,
            } => handle_add(
                &mut ctx,
                AddOptions {
                    entry_type,
                    doi,
                    query,
                    fields,
                    attach,
                },
            ),
            CoreCommands::List => handle_list(&ctx),
            CoreCommands::Show { key } => handle_show(&ctx, &key),
        },
        Some(Commands::Entry(cmd)) => match cmd {
            EntryCommands::Edit { key } => handle_edit(&mut ctx, &key),
            EntryCommands::Open { key } => handle_open(&ctx, &key),
            EntryCommands::Attach { key, file } => handle_attach(&mut ctx, &key, &file),
            EntryCommands::Remove { keys } => handle_remove(&mut ctx, keys),
            EntryCommands::Path { key } => handle_path(&ctx, &key),
        },
        Some(Commands::Data(cmd)) => match cmd {
            DataCommands::Import { paths, strict } => handle_import(&mut ctx, paths, strict),
            DataCommands::Export { keys, output } => handle_export(&ctx, keys, output),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Types { fields } => handle_types(&ctx, fields),
            MiscCommands::Config { key, value } => handle_config(&ctx, key, value),
            MiscCommands::Init => handle_init(&ctx, cli.library.as_deref()),
        },
        None => handle_list(&ctx),
    }
}

/// Logs go to stderr so bibtex on stdout stays clean.
fn configure_logging(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let _ = registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let paths = default_paths()?;
    let ctx = initialize(paths, cli.library.as_deref())?;
    Ok(AppContext { api: ctx.api })
}

fn handle_add(ctx: &mut AppContext, options: AddOptions) -> Result<()> {
    let result = ctx.api.add_entry(options)?;
    for entry in &result.affected_entries {
        println!("{}", entry.key);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_entries()?;
    print!("{}", render_entry_list(&result.listed_entries));
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, key: &str) -> Result<()> {
    let result = ctx.api.show_entry(key)?;
    if let Some(text) = &result.rendered {
        print!("{}", text);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, key: &str) -> Result<()> {
    let buffer = ctx.api.edit_buffer(key)?;
    let edited = edit_text(&buffer, ".yaml")?;
    let result = ctx.api.update_entry(key, &edited)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_open(ctx: &AppContext, key: &str) -> Result<()> {
    let result = ctx.api.attachment_path(key)?;
    for path in &result.entry_paths {
        open_file(path)?;
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_attach(ctx: &mut AppContext, key: &str, file: &Path) -> Result<()> {
    let result = ctx.api.attach_file(key, file)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, keys: Vec<String>) -> Result<()> {
    let result = ctx.api.remove_entries(&keys)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_path(ctx: &AppContext, key: &str) -> Result<()> {
    let result = ctx.api.entry_dir(key)?;
    for path in &result.entry_paths {
        println!("{}", path.display());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, paths: Vec<PathBuf>, strict: bool) -> Result<()> {
    let mut text = String::new();
    for path in &paths {
        if path.as_os_str() == "-" {
            std::io::stdin().read_to_string(&mut text)?;
        } else {
            let content = std::fs::read_to_string(path).map_err(|e| {
                ScholarError::Api(format!("Cannot read {}: {}", path.display(), e))
            })?;
            text.push_str(&content);
        }
        text.push('\n');
    }

    let result = ctx.api.import_bibtex(&text, strict)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, keys: Vec<String>, output: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.export_entries(&keys, output.as_deref())?;
    if let Some(text) = &result.rendered {
        print!("{}", text);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_types(ctx: &AppContext, fields: bool) -> Result<()> {
    let result = ctx.api.types()?;
    print!("{}", render_types(&result.types, fields));
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    print_messages(&result.messages);
    if result.has_errors() {
        return Err(ScholarError::Api("config command failed".to_string()));
    }
    Ok(())
}

fn handle_init(ctx: &AppContext, library: Option<&str>) -> Result<()> {
    let result = ctx.api.init(library)?;
    print_messages(&result.messages);
    Ok(())
}
