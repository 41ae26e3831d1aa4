//! roster binary entry point.
//!
//! Parses the command line, installs logging, picks a profile source and
//! either runs the terminal browser or prints a computed list.
//!
use anyhow::{Context as _, Result, anyhow};
use clap::{Parser, Subcommand};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use roster::app::keymap::{KEYMAP_FILE_NAME, Keymap};
use roster::app::{self, AppState};
use roster::config::{CONFIG_FILE_NAME, RosterConfig};
use roster::emoji::{EmojiCatalog, SkinTone, resolve_emoji_name};
use roster::list::{ListData, UserList};
use roster::sys::{JsonSource, ProfileSource, SystemAdapter};

#[derive(Parser, Debug)]
#[command(name = "roster", version, about = "Browse channel members grouped by role or initial")]
struct Cli {
    /// Settings file (key = value lines).
    #[arg(long, env = "ROSTER_CONFIG", default_value = CONFIG_FILE_NAME, global = true)]
    config: String,

    /// Log filter, e.g. `debug` or `roster=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// JSON array of profiles to show instead of local accounts.
    #[arg(long, global = true)]
    profiles: Option<PathBuf>,

    /// JSON array of channel members matching `--profiles`.
    #[arg(long, global = true, requires = "profiles")]
    members: Option<PathBuf>,

    /// Id of the signed-in user when reading JSON profiles.
    #[arg(long, global = true)]
    current_user: Option<String>,

    /// Treat this Unix group as the channel.
    #[arg(long, global = true, conflicts_with = "profiles")]
    group: Option<String>,

    /// Unix group whose members are channel admins.
    #[arg(long, global = true)]
    admin_group: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive member browser (default).
    Browse,
    /// Print the member list once.
    Sections {
        /// Search term; prints matching profiles as a flat list.
        #[arg(long)]
        term: Option<String>,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Resolve an emoji name for a skin tone preference.
    Emoji {
        name: String,
        /// `default` or a modifier code such as 1F3FB. Defaults to the config value.
        #[arg(long)]
        skin_tone: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RosterConfig::load_or_init(&cli.config);
    let interactive = matches!(cli.command, None | Some(Command::Browse));
    init_logging(cli.log_level.as_deref(), interactive.then_some(config.log_file.as_str()))?;
    tracing::debug!(?cli, "starting");

    match &cli.command {
        None | Some(Command::Browse) => browse(&cli, &config),
        Some(Command::Sections { term, json }) => print_sections(&cli, &config, term.as_deref(), *json),
        Some(Command::Emoji { name, skin_tone }) => {
            let tone = match skin_tone {
                Some(code) => SkinTone::parse(code).ok_or_else(|| anyhow!("unknown skin tone {code}"))?,
                None => config.skin_tone,
            };
            println!("{}", resolve_emoji_name(name, tone, &EmojiCatalog::builtin()));
            Ok(())
        }
    }
}

/// Log to `log_file` while the terminal is in raw mode, else to stderr.
fn init_logging(level: Option<&str>, log_file: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(l) => EnvFilter::new(l),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {path}"))?;
            builder.with_ansi(false).with_writer(std::sync::Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn open_source(cli: &Cli, config: &RosterConfig) -> Result<Box<dyn ProfileSource>> {
    if let Some(profiles) = &cli.profiles {
        let mut source = JsonSource::from_files(profiles, cli.members.as_deref())
            .map_err(|e| anyhow!(e))
            .context("load json profiles")?;
        if let Some(me) = &cli.current_user {
            source = source.with_current_user(me.clone());
        }
        return Ok(Box::new(source));
    }
    let mut adapter = SystemAdapter::new();
    if let Some(group) = &cli.group {
        let admins = cli.admin_group.clone().unwrap_or_else(|| config.admin_group.clone());
        adapter = adapter.for_group(group.clone(), admins);
    }
    Ok(Box::new(adapter))
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn browse(cli: &Cli, config: &RosterConfig) -> Result<()> {
    let source = open_source(cli, config)?;
    let mut state = AppState::new(source, config, Keymap::load(KEYMAP_FILE_NAME))
        .map_err(|e| anyhow!(e))
        .context("load first page")?;

    let mut terminal = init_terminal().context("init terminal")?;
    let res = app::run(&mut terminal, &mut state);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = &res {
        tracing::error!(error = %err, "application error");
    }
    res
}

fn print_sections(cli: &Cli, config: &RosterConfig, term: Option<&str>, json: bool) -> Result<()> {
    let mut source = open_source(cli, config)?;
    let members = source.channel_members().map_err(|e| anyhow!(e))?;
    let mut profiles = Vec::new();
    for page in 0.. {
        let batch = source.fetch_page(page, config.page_size).map_err(|e| anyhow!(e))?;
        let done = batch.len() < config.page_size;
        profiles.extend(batch);
        if done {
            break;
        }
    }

    let mut list = UserList::new(profiles, members);
    list.name_display = config.name_display;
    list.labels = config.labels.clone();
    list.current_user_id = source.current_user_id().unwrap_or_default();
    if let Some(term) = term {
        list.term = term.to_string();
        list.profiles = roster::search::filter_profiles(&list.profiles, term);
    }
    let data = list.data()?;

    if json {
        let out = match &data {
            ListData::Flat(items) => serde_json::to_string_pretty(items)?,
            ListData::Sections(sections) => serde_json::to_string_pretty(sections)?,
        };
        println!("{out}");
        return Ok(());
    }

    match &data {
        ListData::Flat(items) => {
            for p in items {
                println!("{}  @{}", p.display_name(list.name_display), p.username);
            }
        }
        ListData::Sections(sections) => {
            for section in sections {
                if !section.first {
                    println!();
                }
                println!("== {}", section.id);
                for (index, item) in section.data.iter().enumerate() {
                    let row = list.row_state(item, index, Some(section));
                    let admin = if row.is_channel_admin { "  [admin]" } else { "" };
                    let me = if row.is_my_user { "  (you)" } else { "" };
                    println!("  {}  @{}{admin}{me}", row.display_name, item.profile.username);
                }
            }
        }
    }
    if list.show_no_results(&data) {
        println!("No results for \u{201c}{}\u{201d}", list.term);
    }
    Ok(())
}
