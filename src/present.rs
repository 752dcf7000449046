//! Presenting finished figures: interactively in the terminal or as exported SVG files.

use crate::display;
use crate::error::{Result, VizError};
use crate::figure::Figure;
use crate::render;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::CrosstermBackend, Terminal};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Final stage of the pipeline for one figure
pub trait Presenter {
    /// Show or export `figure`. Interactive presenters return only once the
    /// user has dismissed it.
    fn present(&mut self, figure: &Figure) -> Result<()>;
}

/// Full-screen terminal chart that blocks until the user closes it
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Presenter for TerminalPresenter {
    fn present(&mut self, figure: &Figure) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = wait_for_dismissal(&mut terminal, figure);

        // Restore terminal even when drawing failed
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }
}

fn is_dismiss_key(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter)
}

/// Redraw on every event (resizes included) until a dismiss key is pressed
fn wait_for_dismissal<B: Backend>(terminal: &mut Terminal<B>, figure: &Figure) -> Result<()> {
    loop {
        terminal.draw(|f| display::render_figure(f, figure))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && is_dismiss_key(key.code) {
                return Ok(());
            }
        }
    }
}

/// Writes each figure to `<dir>/<NN>_<title>.svg` and returns immediately
#[derive(Debug)]
pub struct SvgExporter {
    output_dir: PathBuf,
    size: (u32, u32),
    exported: Vec<PathBuf>,
}

impl SvgExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P, size: (u32, u32)) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir).map_err(|source| VizError::Export {
            path: output_dir.clone(),
            source,
        })?;

        Ok(Self {
            output_dir,
            size,
            exported: Vec::new(),
        })
    }

    /// Files written so far, in presentation order
    pub fn exported(&self) -> &[PathBuf] {
        &self.exported
    }

    fn next_path(&self, title: &str) -> PathBuf {
        let name: String = title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.output_dir
            .join(format!("{:02}_{}.svg", self.exported.len() + 1, name))
    }
}

impl Presenter for SvgExporter {
    fn present(&mut self, figure: &Figure) -> Result<()> {
        let svg = render::render_svg(figure, self.size)?;
        let path = self.next_path(&figure.title);
        fs::write(&path, svg).map_err(|source| VizError::Export {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "exported figure");
        self.exported.push(path);
        Ok(())
    }
}
