use std::io;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use rustdoku_core::{Position, SIZE};

use crate::app::{App, InputMode};

const GRID_WIDTH: u16 = 37;
const GRID_HEIGHT: u16 = 19;
const PANEL_WIDTH: u16 = 25;

const THICK_ROW: &str = "+===+===+===+===+===+===+===+===+===+";
const THIN_ROW: &str = "+---+---+---+---+---+---+---+---+---+";

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, _) = terminal::size()?;

    let total_width = GRID_WIDTH + 3 + PANEL_WIDTH;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = 1;

    execute!(
        stdout,
        Hide,
        SetBackgroundColor(app.theme.bg),
        Clear(ClearType::All)
    )?;

    // Conflicts are recomputed every frame so a bad digit lights up the
    // moment it lands, matching how the board is meant to be read.
    let conflicts = app.session.validate().conflicts;

    render_grid(stdout, app, &conflicts, start_x, start_y)?;
    render_info_panel(stdout, app, start_x + GRID_WIDTH + 3, start_y)?;
    render_controls(stdout, app, start_x, start_y + GRID_HEIGHT + 1)?;

    if let Some(ref msg) = app.message {
        execute!(
            stdout,
            MoveTo(start_x, start_y + GRID_HEIGHT + 5),
            SetForegroundColor(app.theme.key),
            Print(msg)
        )?;
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_grid(
    stdout: &mut io::Stdout,
    app: &App,
    conflicts: &[usize],
    x: u16,
    y: u16,
) -> io::Result<()> {
    let theme = &app.theme;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.box_border),
        Print(THICK_ROW)
    )?;

    for row in 0..SIZE {
        let cell_y = y + 1 + row as u16 * 2;
        execute!(stdout, MoveTo(x, cell_y))?;

        for col in 0..SIZE {
            // Thick verticals at 3x3 boundaries.
            if col % 3 == 0 {
                execute!(stdout, SetForegroundColor(theme.box_border), Print("║"))?;
            } else {
                execute!(stdout, SetForegroundColor(theme.border), Print("│"))?;
            }
            render_cell(stdout, app, conflicts, row, col)?;
        }
        execute!(stdout, SetForegroundColor(theme.box_border), Print("║"))?;

        let (sep, color) = if (row + 1) % 3 == 0 {
            (THICK_ROW, theme.box_border)
        } else {
            (THIN_ROW, theme.border)
        };
        execute!(
            stdout,
            MoveTo(x, cell_y + 1),
            SetForegroundColor(color),
            Print(sep)
        )?;
    }

    Ok(())
}

fn render_cell(
    stdout: &mut io::Stdout,
    app: &App,
    conflicts: &[usize],
    row: usize,
    col: usize,
) -> io::Result<()> {
    let theme = &app.theme;
    let idx = row * SIZE + col;
    let is_cursor = Position::new(row, col) == app.cursor;

    let bg = if is_cursor { theme.cursor_bg } else { theme.bg };
    let (text, fg) = match app.session.current().get(idx) {
        Some(v) => {
            let fg = if conflicts.contains(&idx) {
                theme.conflict
            } else if app.session.is_fixed(idx) {
                theme.given
            } else {
                theme.filled
            };
            (format!(" {v} "), fg)
        }
        None if app.has_marks(idx) => (" · ".to_string(), theme.pencil),
        None => ("   ".to_string(), theme.fg),
    };

    execute!(
        stdout,
        SetBackgroundColor(bg),
        SetForegroundColor(fg),
        Print(text),
        SetBackgroundColor(theme.bg)
    )?;
    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(
        stdout,
        MoveTo(x, y + 1),
        SetForegroundColor(theme.fg),
        Print(format!("Difficulty: {}", app.session.difficulty())),
        MoveTo(x, y + 2),
        SetForegroundColor(theme.info),
        Print(format!("Time: {}", app.elapsed_string())),
        MoveTo(x, y + 3),
        SetForegroundColor(theme.info),
        Print(match app.mode {
            InputMode::Normal => "Mode: normal",
            InputMode::Pencil => "Mode: pencil",
        })
    )?;

    let marks = app.marks(app.cursor.index());
    if !marks.is_empty() {
        let notes: Vec<String> = marks.iter().map(u8::to_string).collect();
        execute!(
            stdout,
            MoveTo(x, y + 5),
            SetForegroundColor(theme.pencil),
            Print(format!("Notes: {}", notes.join(" ")))
        )?;
    }

    if app.finished {
        execute!(
            stdout,
            MoveTo(x, y + 7),
            SetForegroundColor(theme.success),
            Print("Game over - n for a new board")
        )?;
    }

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let lines = [
        "arrows move   1-9 place   0 clear   p pencil",
        "h hint   v validate   enter check   r reveal",
        "c clear board   n/e/m/d new game   t theme   q quit",
    ];
    for (i, line) in lines.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x, y + i as u16),
            SetForegroundColor(theme.info),
            Print(line)
        )?;
    }
    Ok(())
}
