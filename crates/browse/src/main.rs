//! browse - Terminal browser for Infisical secrets
//!
//! Authenticates with universal-auth (falling back across regions), fetches
//! every secret of one environment and shows them as a folder tree with
//! live search.
//!
//! Commands:
//! - (none): interactive tree browser
//! - list: print the tree, optionally filtered
//! - init: write credentials to the config `.env`
//! - check: show which credentials are set
//! - open [PATH]: open a folder in the Infisical web app

mod app;
mod commands;
mod data;
mod ui;

use anyhow::Result;
use browser_core::Paths;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use infisical::Credentials;
use ratatui::prelude::*;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use app::{App, Mode};

#[derive(Parser)]
#[command(name = "browse")]
#[command(about = "Terminal browser for Infisical secrets - folder tree with live search")]
#[command(version)]
#[command(after_help = r#"CREDENTIALS:
    Read from the environment after loading ./.env and then
    ~/.config/infisical-browser/.env (written by `browse init`):
    - INFISICAL_UNIVERSAL_AUTH_CLIENT_ID
    - INFISICAL_UNIVERSAL_AUTH_CLIENT_SECRET
    - INFISICAL_PROJECT_ID
    - INFISICAL_ENV_SLUG

EXAMPLES:
    browse                      # Interactive tree browser
    browse --env staging        # Browse another environment
    browse list -q postgres     # Print matching secrets (values masked)
    browse list --json          # Keys and folders as JSON
    browse open /prod/db        # Open a folder in the web app

KEY BINDINGS:
    q, Esc      Quit (Esc clears an active search first)
    j/k, Up/Dn  Move selection
    Enter/Space Open or close folder
    l/h         Open folder / close folder or go to parent
    E / C       Expand everything below / collapse folder
    /           Search names and values
    m           Mask/unmask values
    o           Open selected folder in Infisical
    r           Refetch secrets
    ?           Toggle help overlay

LOGS:
    The browser logs to ~/.local/share/infisical-browser/browse.log.
    Set RUST_LOG=debug for more detail. Secret values are never logged."#)]
struct Cli {
    /// Project ID (overrides INFISICAL_PROJECT_ID)
    #[arg(long, global = true)]
    project: Option<String>,

    /// Environment slug (overrides INFISICAL_ENV_SLUG)
    #[arg(long = "env", global = true)]
    environment: Option<String>,

    /// Keep config and logs under this directory instead of the XDG dirs
    #[arg(long, global = true, hide = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the secret tree without the interactive browser
    List {
        /// Only show secrets whose name or value contains this text
        #[arg(short, long)]
        query: Option<String>,
        /// Print values instead of a mask
        #[arg(long)]
        show_values: bool,
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Prompt for credentials and save them for later runs
    Init {
        /// Overwrite an existing credentials file
        #[arg(long)]
        force: bool,
    },

    /// Show which credentials are set (values are never printed)
    Check,

    /// Open a folder of the environment in the Infisical web app
    Open {
        /// Folder path, e.g. /prod/db
        path: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match &cli.home {
        Some(root) => Paths::under(root),
        None => Paths::new(),
    };
    init_tracing(&paths, cli.command.is_none());

    let config = data::load_config(&paths)?;
    let credentials = data::load_credentials(&paths, cli.project, cli.environment);

    match cli.command {
        Some(Commands::List { query, show_values, json }) => {
            commands::cmd_list(&credentials, &config, query.as_deref(), show_values, json)
        }
        Some(Commands::Init { force }) => commands::cmd_init(&paths, &credentials, force),
        Some(Commands::Check) => commands::cmd_check(&paths, &credentials, &config),
        Some(Commands::Open { path }) => commands::cmd_open(&credentials, &config, path.as_deref()),
        None => run_browser(credentials, config),
    }
}

/// The TUI owns the terminal, so it logs to a file; everything else to stderr
fn init_tracing(paths: &Paths, tui: bool) {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());

    if !tui {
        builder.with_writer(io::stderr).init();
        return;
    }

    let log_file = fs::create_dir_all(&paths.data).and_then(|()| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(paths.log_file())
    });

    match log_file {
        Ok(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        Err(_) => builder.with_writer(io::sink).init(),
    }
}

fn run_browser(credentials: Credentials, config: browser_core::Config) -> Result<()> {
    tracing::info!(credentials = ?credentials, "Starting browser");

    let mut app = App::new(credentials, config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let poll_interval = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // The loading state is on screen before the blocking fetch starts
        if app.refresh_pending {
            app.refresh();
            continue;
        }

        if event::poll(poll_interval)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !handle_key(app, key) {
                    return Ok(());
                }
            }
        }
    }
}

/// Apply one key press; returns false when the app should exit
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return false;
    }

    app.status = None;

    if app.mode == Mode::Search {
        match key.code {
            KeyCode::Esc => app.clear_search(),
            KeyCode::Enter => app.finish_search(),
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Down => app.move_down(),
            KeyCode::Up => app.move_up(),
            KeyCode::Char(c) => app.push_search_char(c),
            _ => {}
        }
        return true;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.toggle_help();
        }
        return true;
    }

    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Esc => {
            if app.query.is_empty() {
                return false;
            }
            app.clear_search();
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.move_top(),
        KeyCode::Char('G') | KeyCode::End => app.move_bottom(),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('l') | KeyCode::Right => app.expand_selected(),
        KeyCode::Char('h') | KeyCode::Left => app.collapse_selected(),
        KeyCode::Char('E') => app.expand_all_selected(),
        KeyCode::Char('C') => app.collapse_all_selected(),
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('m') => app.toggle_mask(),
        KeyCode::Char('o') => app.open_selected(),
        KeyCode::Char('r') => app.request_refresh(),
        KeyCode::Char('?') => app.toggle_help(),
        _ => {}
    }
    true
}
