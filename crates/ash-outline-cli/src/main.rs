use anyhow::{Context, Result};
use ash_outline_config::Config;
use ash_outline_engine::{
    DocumentKey, Parser, ParserOptions, SchemaRegistry, VersionedCache, io, render_outline,
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use relative_path::RelativePathBuf;
use std::{
    env, fs,
    io::stdout,
    path::{Path, PathBuf},
    process,
    time::UNIX_EPOCH,
};

/// What the command line asked to look at.
#[derive(Debug, PartialEq, Eq)]
enum Target {
    /// Print one file's outline and exit.
    File(PathBuf),
    /// Browse every source file under a directory.
    Project(PathBuf),
}

impl Target {
    fn from_path(path: PathBuf) -> Self {
        if path.is_file() {
            Self::File(path)
        } else {
            Self::Project(path)
        }
    }
}

/// Built-in schemas (unless disabled) followed by each configured schema file.
fn load_registry(config: &Config) -> Result<SchemaRegistry> {
    let mut registry = if config.include_builtin_schemas {
        SchemaRegistry::builtin().context("built-in schemas failed to compile")?
    } else {
        SchemaRegistry::new()
    };
    for path in &config.schema_paths {
        let extra = SchemaRegistry::load_file(path)
            .with_context(|| format!("loading schemas from {}", path.display()))?;
        log::info!("loaded {} schemas from {}", extra.len(), path.display());
        registry.merge(extra)?;
    }
    Ok(registry)
}

fn parser_options(config: &Config) -> ParserOptions {
    ParserOptions {
        heuristic_fallback: config.heuristic_fallback,
    }
}

/// Modification time in milliseconds, used as the document version.
fn file_version(path: &Path) -> i64 {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

struct App {
    project_path: PathBuf,
    registry: SchemaRegistry,
    options: ParserOptions,
    max_file_bytes: u64,
    cache: VersionedCache,
    files: Vec<RelativePathBuf>,
    file_list_state: ListState,
    current_content: Vec<String>,
}

impl App {
    fn new(project_path: PathBuf, config: &Config, registry: SchemaRegistry) -> Result<Self> {
        let files = io::scan_source_files(&project_path, &config.file_extensions)?;

        let mut app = Self {
            project_path,
            registry,
            options: parser_options(config),
            max_file_bytes: config.max_file_bytes,
            cache: VersionedCache::new(),
            files,
            file_list_state: ListState::default(),
            current_content: Vec::new(),
        };

        // Select first file if available
        if !app.files.is_empty() {
            app.file_list_state.select(Some(0));
            app.update_content_for_selection();
        }

        Ok(app)
    }

    fn next_file(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => (i + 1) % self.files.len(),
            None => 0,
        };
        self.file_list_state.select(Some(i));
        self.update_content_for_selection();
    }

    fn previous_file(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(0) | None => self.files.len() - 1,
            Some(i) => i - 1,
        };
        self.file_list_state.select(Some(i));
        self.update_content_for_selection();
    }

    /// Drops the cached outline of the selected file and parses it again.
    fn reload_selected(&mut self) {
        if let Some(file) = self.selected_file() {
            let uri = file.to_string();
            self.cache.invalidate(&uri);
        }
        self.update_content_for_selection();
    }

    fn selected_file(&self) -> Option<&RelativePathBuf> {
        self.files.get(self.file_list_state.selected()?)
    }

    fn update_content_for_selection(&mut self) {
        let Some(file) = self.selected_file().cloned() else {
            return;
        };
        self.current_content = match io::read_source(&file, &self.project_path, self.max_file_bytes)
        {
            Ok(content) => {
                let key = DocumentKey::new(
                    file.as_str(),
                    file_version(&file.to_path(&self.project_path)),
                );
                let parser = Parser::with_options(&self.registry, self.options);
                let outcome = parser.parse_cached(&mut self.cache, key, &content);
                let mut lines = render_outline(&outcome);
                if outcome.result.sections.is_empty() {
                    lines.push(String::new());
                    lines.push("No structure found".to_string());
                }
                lines
            }
            Err(e) => vec![format!("Error reading file: {e}")],
        };
    }
}

/// Prints the outline of a single file to stdout.
fn print_outline(path: &Path, config: &Config, registry: &SchemaRegistry) -> Result<()> {
    let root = path.parent().unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("{} has no file name", path.display()))?;
    let relative = RelativePathBuf::from_path(name)?;

    let content = io::read_source(&relative, root, config.max_file_bytes)?;
    let outcome =
        Parser::with_options(registry, parser_options(config)).parse_with_fallback(&content);
    for line in render_outline(&outcome) {
        println!("{line}");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    // Determine target path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let (target_path, from_config) = match args.len() {
        2 => (PathBuf::from(&args[1]), false),
        1 => match &config.project_path {
            Some(path) => (path.clone(), true),
            None => {
                eprintln!("Error: No project path provided and none configured");
                eprintln!("Usage: {} <project-folder-or-file>", args[0]);
                eprintln!(
                    "Or set project_path in a config file at {}",
                    config_path.display()
                );
                process::exit(1);
            }
        },
        _ => {
            eprintln!("Usage: {} [project-folder-or-file]", args[0]);
            process::exit(1);
        }
    };

    let registry = load_registry(&config)?;
    log::info!("{} schemas available", registry.len());

    let project_path = match Target::from_path(target_path) {
        Target::File(path) => return print_outline(&path, &config, &registry),
        Target::Project(path) => path,
    };

    // Validate project directory using engine
    if let Err(e) = io::validate_project_dir(&project_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Project path '{}'{} is invalid: {e}",
            project_path.display(),
            source
        );
        process::exit(1);
    }

    // Create app before touching the terminal so scan errors print normally
    let mut app = App::new(project_path, &config, registry)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_file(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_file(),
                KeyCode::Char('r') => app.reload_selected(),
                _ => {}
            }
        }
    }
}

fn outline_style(line: &str) -> Style {
    if line.starts_with("section ") {
        Style::default().fg(Color::Cyan)
    } else if line.starts_with("  ") {
        Style::default()
    } else {
        Style::default().fg(Color::Yellow)
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(f.area());

    // File list panel
    let file_items: Vec<ListItem> = app
        .files
        .iter()
        .map(|file| ListItem::new(vec![Line::from(vec![Span::raw(file.to_string())])]))
        .collect();

    let files_list = List::new(file_items)
        .block(Block::default().borders(Borders::ALL).title("Files"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(files_list, chunks[0], &mut app.file_list_state);

    // Outline panel
    let content_text = if app.current_content.is_empty() {
        vec![Line::from("Select a file to view its outline")]
    } else {
        app.current_content
            .iter()
            .map(|line| Line::from(vec![Span::styled(line.clone(), outline_style(line))]))
            .collect()
    };

    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title("Outline"))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(content, chunks[1]);

    // Instructions
    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Previous | "),
        Span::raw("↓/j: Next | "),
        Span::raw("r: Reload"),
    ]);

    let help = Paragraph::new(vec![help_text]).block(Block::default());

    // Place help at bottom
    let bottom_chunk = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    f.render_widget(help, bottom_chunk[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_target_distinguishes_files_and_directories() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("post.ex");
        fs::write(&file, "defmodule Post do\nend\n").unwrap();

        assert_eq!(Target::from_path(file.clone()), Target::File(file));
        assert_eq!(
            Target::from_path(dir.path().to_path_buf()),
            Target::Project(dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_registry_includes_configured_schemas() {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("oban.toml");
        fs::write(
            &schema,
            "[[schema]]\nname = \"Oban\"\ndeclaration_pattern = \"Oban.Worker\"\n",
        )
        .unwrap();

        let config = Config {
            schema_paths: vec![schema],
            include_builtin_schemas: false,
            ..Config::default()
        };
        let registry = load_registry(&config).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("Oban.Worker").is_some());
    }

    #[test]
    fn test_missing_schema_file_is_an_error() {
        let config = Config {
            schema_paths: vec![PathBuf::from("/nonexistent/schemas.toml")],
            ..Config::default()
        };
        let err = load_registry(&config).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/schemas.toml"));
    }

    #[test]
    fn test_app_lists_sources_and_outlines_first() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("lib")).unwrap();
        fs::write(
            dir.path().join("lib/post.ex"),
            "defmodule Post do\n  use Ash.Resource\n  attributes do\n    attribute :title, :string\n  end\nend\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let config = Config::default();
        let registry = load_registry(&config).unwrap();
        let app = App::new(dir.path().to_path_buf(), &config, registry).unwrap();

        assert_eq!(app.files, vec![RelativePathBuf::from("lib/post.ex")]);
        assert_eq!(app.current_content[0], "module Post");
        assert!(
            app.current_content
                .iter()
                .any(|line| line.starts_with("section attributes"))
        );
        assert_eq!(app.cache.len(), 1);
    }
}
