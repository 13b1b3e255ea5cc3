use std::io::{self, stdout, Stdout};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use crossbeam_channel::{Receiver, TryRecvError};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use quadrant::app::LogicThread;
use quadrant::config::Config;
use quadrant::persistence::Persistence;
use quadrant::render::RenderState;
use quadrant::store::{self, TaskStore};
use quadrant::task::{Quadrant, Task, TaskId};
use quadrant::{qlog, ui, Error, Result};

const FRAME_DURATION: Duration = Duration::from_micros(16_666); // 60fps

/// Quadrant - a four-quadrant task board for the terminal
#[derive(Parser, Debug)]
#[command(name = "quadrant")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    QUADRANT_DEBUG=1     Enable debug logging (alternative to --debug)\n    QUADRANT_DEBUG=trace Also log key events\n    XDG_RUNTIME_DIR      Location of the session store")]
pub struct Cli {
    /// Enable debug logging (writes to ~/.quadrant/quadrant.log)
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Keep tasks in memory only; nothing is written
    #[arg(long, conflicts_with = "session_dir")]
    pub ephemeral: bool,

    /// Store tasks in this directory instead of the runtime directory
    #[arg(long, value_name = "PATH")]
    pub session_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Scriptable board operations
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List tasks grouped by quadrant
    List {
        /// Only show this quadrant (do-first, do-later, delegate, eliminate or 1-4)
        #[arg(long, short = 'q')]
        quadrant: Option<Quadrant>,
    },

    /// Add a task
    Add {
        /// Task content
        content: String,

        /// Target quadrant (defaults to the configured default quadrant)
        #[arg(long, short = 'q')]
        quadrant: Option<Quadrant>,
    },

    /// Replace a task's content
    Edit {
        /// Task id or unique id prefix
        id: String,

        /// New content
        content: String,
    },

    /// Delete a task
    Delete {
        /// Task id or unique id prefix
        id: String,
    },

    /// Mark a task completed
    Done {
        /// Task id or unique id prefix
        id: String,

        /// Mark the task not completed instead
        #[arg(long)]
        undo: bool,
    },

    /// Move a task to a quadrant
    Move {
        /// Task id or unique id prefix
        id: String,

        /// Destination quadrant
        quadrant: Quadrant,

        /// Position within the destination (defaults to the end)
        #[arg(long, short = 'i')]
        index: Option<usize>,
    },

    /// Write the current settings to ~/.quadrant/quadrant.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Delete every task in the session store
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    quadrant::log::init(cli.debug);

    let mut config = Config::load()?;
    let persistence = open_persistence(&cli, &mut config);
    qlog!(
        "quadrant {} key={} store={}",
        env!("CARGO_PKG_VERSION"),
        persistence.key(),
        persistence.location()
    );

    if let Some(command) = cli.command {
        return match command {
            Command::Reset { yes } => run_reset(&persistence, yes),
            Command::Init { force } => run_init(&config, &Config::config_path()?, force),
            command => {
                let mut board = TaskStore::load(persistence);
                run_command(&mut board, &config, command)
            }
        };
    }

    qlog!("Starting board UI");

    let shutdown = Arc::new(AtomicBool::new(false));
    let (state_tx, state_rx) = crossbeam_channel::bounded::<RenderState>(1);

    let shutdown_clone = shutdown.clone();
    let logic_handle =
        thread::spawn(move || LogicThread::run(config, persistence, state_tx, shutdown_clone));

    let mut terminal = setup_terminal()?;
    let result = render_loop(&mut terminal, state_rx, &shutdown);

    shutdown.store(true, Ordering::SeqCst);
    let logic_result = logic_handle.join();
    restore_terminal(&mut terminal)?;

    match logic_result {
        Ok(Err(e)) => {
            eprintln!("Error: {}", e);
            Err(e)
        }
        _ => result,
    }
}

/// Pick the session store: none for `--ephemeral`, otherwise the
/// configured (or overridden) session directory.
fn open_persistence(cli: &Cli, config: &mut Config) -> Persistence {
    if cli.ephemeral {
        qlog!("Ephemeral session, tasks will not be saved");
        return Persistence::detached();
    }
    if let Some(dir) = &cli.session_dir {
        config.session_dir = Some(dir.to_string_lossy().into_owned());
    }
    Persistence::from_config(config)
}

/// Execute one board subcommand against `board`.
fn run_command(board: &mut TaskStore, config: &Config, command: Command) -> Result<()> {
    if !board.persistence().is_attached() {
        eprintln!("Warning: no session store available, changes will not be saved");
    }

    match command {
        Command::List { quadrant } => {
            print!("{}", format_task_list(board.tasks(), quadrant));
        }

        Command::Add { content, quadrant } => {
            let quadrant = quadrant.unwrap_or_else(|| config.effective_default_quadrant());
            let id = board
                .add(&content, quadrant)?
                .ok_or_else(|| Error::Validation("Task content cannot be empty".to_string()))?;
            println!("Added {} to {}", id.short(), quadrant.title());
        }

        Command::Edit { id, content } => {
            if content.trim().is_empty() {
                return Err(Error::Validation("Task content cannot be empty".to_string()));
            }
            let id = resolve_id(board, &id)?;
            board.update(&id, &content)?;
            println!("Updated {}", id.short());
        }

        Command::Delete { id } => {
            let id = resolve_id(board, &id)?;
            board.delete(&id)?;
            println!("Deleted {}", id.short());
        }

        Command::Done { id, undo } => {
            let id = resolve_id(board, &id)?;
            board.complete(&id, !undo)?;
            let state = if undo { "not done" } else { "done" };
            println!("Marked {} {}", id.short(), state);
        }

        Command::Move {
            id,
            quadrant,
            index,
        } => {
            let id = resolve_id(board, &id)?;
            let index = index.unwrap_or_else(|| store::count_in(board.tasks(), quadrant));
            board.reorder(&id, quadrant, index)?;
            println!("Moved {} to {}", id.short(), quadrant.title());
        }

        Command::Reset { yes } => return run_reset(board.persistence(), yes),
        Command::Init { force } => return run_init(config, &Config::config_path()?, force),
    }

    Ok(())
}

fn resolve_id(board: &TaskStore, prefix: &str) -> Result<TaskId> {
    Ok(store::find_by_prefix(board.tasks(), prefix)?.id.clone())
}

/// Render tasks grouped by quadrant, one line per task:
/// `  [x] 1a2b3c4d  content`.
fn format_task_list(tasks: &[Task], only: Option<Quadrant>) -> String {
    let mut out = String::new();

    for quadrant in Quadrant::ALL {
        if only.is_some_and(|q| q != quadrant) {
            continue;
        }
        let in_quadrant = store::in_quadrant(tasks, quadrant);
        let done = in_quadrant.iter().filter(|t| t.completed).count();

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("{} ({}/{})\n", quadrant.title(), done, in_quadrant.len()));

        if in_quadrant.is_empty() {
            out.push_str("  (empty)\n");
        }
        for task in in_quadrant {
            let check = if task.completed { "x" } else { " " };
            out.push_str(&format!("  [{}] {}  {}\n", check, task.id.short(), task.content));
        }
    }

    out
}

fn render_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state_rx: Receiver<RenderState>,
    shutdown: &AtomicBool,
) -> Result<()> {
    let mut state = RenderState::default();
    let mut last_version: u64 = 0;
    let mut last_frame = Instant::now();
    let mut dirty = true;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match state_rx.try_recv() {
            Ok(s) => {
                dirty = dirty || s.version != last_version;
                state = s;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        if last_frame.elapsed() < FRAME_DURATION {
            thread::sleep(Duration::from_micros(500));
            continue;
        }
        last_frame = Instant::now();

        if dirty {
            terminal.draw(|f| ui::draw(f, &state))?;
            last_version = state.version;
            dirty = false;
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(disable_raw_mode()?)
}

/// Write the effective settings to `path` with every default spelled out.
fn run_init(config: &Config, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Validation(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    config.resolved().save_to(path)?;
    qlog!("Config written to {}", path.display());
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_reset(persistence: &Persistence, skip_confirm: bool) -> Result<()> {
    qlog!("Reset command initiated (yes={})", skip_confirm);

    let count = persistence.load().len();
    if count == 0 {
        println!("No tasks to delete.");
        return Ok(());
    }

    if !skip_confirm {
        print!("Delete all {} task(s)? [y/N] ", count);
        std::io::Write::flush(&mut std::io::stdout())?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        if input != "y" && input != "yes" {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    persistence.clear()?;
    println!("Reset complete: {} task(s) deleted", count);
    qlog!("Reset command completed: {} tasks", count);

    Ok(())
}
