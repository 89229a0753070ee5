use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};

use cozyspace::app::App;
use cozyspace::runtime::{AppEvent, CrosstermEventSource, Runner};
use cozyspace::storage::{self, FileProfileStore, ProfileStore};
use cozyspace::ui;

/// cozy terminal dashboard with a pomodoro timer, tasks, notes and more
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A cozy terminal dashboard: pomodoro focus timer with session stats, \
                  a task list, notes, quick links and a calendar, saved per profile."
)]
struct Cli {
    /// focus block length in minutes
    #[clap(short = 'f', long)]
    focus_duration: Option<u32>,

    /// break length in minutes
    #[clap(short = 'b', long)]
    break_duration: Option<u32>,

    /// sign in as this email, skipping the login screen
    #[clap(short = 'u', long)]
    user: Option<String>,

    /// profile file to load and save (defaults to the platform data dir)
    #[clap(short = 'd', long)]
    data_file: Option<PathBuf>,

    /// import a previously exported profile before starting
    #[clap(long)]
    import: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = match &cli.data_file {
        Some(path) => FileProfileStore::with_path(path),
        None => FileProfileStore::new(),
    };
    let mut data = match &cli.import {
        Some(path) => storage::import_from(path)?,
        None => store.load(),
    };
    if let Some(mins) = cli.focus_duration {
        data.timer.set_focus_duration(mins);
    }
    if let Some(mins) = cli.break_duration {
        data.timer.set_break_duration(mins);
    }
    if let Some(email) = &cli.user {
        // there is no real credential check, so a flag-provided identity
        // is as good as a typed one
        data.user = Some(cozyspace::profile::login(email, email)?);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(data);
    let result = run_app(&mut terminal, &mut app, &store);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &FileProfileStore,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new());

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step() {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
        }

        if app.dirty {
            store.save(&app.data)?;
            app.dirty = false;
        }

        if app.should_quit {
            store.save(&app.data)?;
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["cozyspace"]);
        assert_eq!(cli.focus_duration, None);
        assert_eq!(cli.break_duration, None);
        assert_eq!(cli.data_file, None);
        assert_eq!(cli.import, None);
    }

    #[test]
    fn cli_parses_durations_and_paths() {
        let cli = Cli::parse_from([
            "cozyspace",
            "-f",
            "50",
            "-b",
            "10",
            "-d",
            "/tmp/profile.json",
        ]);
        assert_eq!(cli.focus_duration, Some(50));
        assert_eq!(cli.break_duration, Some(10));
        assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/profile.json")));
    }

    #[test]
    fn cli_user_flag_signs_in_directly() {
        let cli = Cli::parse_from(["cozyspace", "-u", "ada@lovelace.dev"]);
        let user = cozyspace::profile::login(cli.user.as_deref().unwrap(), "x").unwrap();
        assert_eq!(user.name, "ada");
    }

    #[test]
    fn cli_rejects_non_numeric_duration() {
        assert!(Cli::try_parse_from(["cozyspace", "-f", "soon"]).is_err());
    }

    #[test]
    fn cli_duration_overrides_apply_to_loaded_profile() {
        let mut data = cozyspace::storage::ProfileData::default();
        data.timer.set_focus_duration(50);
        assert_eq!(data.timer.time_left_secs(), 3000);
        data.timer.set_break_duration(10);
        assert_eq!(data.timer.settings.break_duration_mins, 10);
    }
}
