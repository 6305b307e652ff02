use std::io::{self, Stdout};

use chip::{chip8::ChipSet, definitions::display, devices::DisplayCommands};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Span, Spans},
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Paragraph,
    },
    Terminal,
};

use super::logger;

/// The width of the screen pane, the framebuffer plus the border.
const SCREEN_WIDTH: u16 = display::WIDTH as u16 + 2;
/// The height of the screen pane, the framebuffer plus the border.
const SCREEN_HEIGHT: u16 = display::HEIGHT as u16 + 2;

/// Renders the framebuffer, the machine state and the log into the terminal.
pub struct TermDisplay {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// the coordinates of the set pixels, as the canvas expects them
    points: Vec<(f64, f64)>,
}

impl TermDisplay {
    pub fn new() -> io::Result<Self> {
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            points: Vec::with_capacity(display::RESOLUTION),
        })
    }

    /// Will draw the whole terminal.
    pub fn render(&mut self, chip: &ChipSet, paused: bool) -> io::Result<()> {
        let points = &self.points;
        let status = status(chip, paused);

        self.terminal.draw(|f| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(SCREEN_HEIGHT), Constraint::Min(3)].as_ref())
                .split(f.size());
            let top = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SCREEN_WIDTH), Constraint::Min(20)].as_ref())
                .split(rows[0]);

            let screen = Canvas::default()
                .block(Block::default().title("CHIP-8").borders(Borders::ALL))
                .x_bounds([0.0, (display::WIDTH - 1) as f64])
                .y_bounds([-((display::HEIGHT - 1) as f64), 0.0])
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: points,
                        color: Color::White,
                    });
                });
            f.render_widget(screen, top[0]);

            let state = Paragraph::new(status)
                .block(Block::default().title("State").borders(Borders::ALL));
            f.render_widget(state, top[1]);

            let height = rows[1].height.saturating_sub(2) as usize;
            let lines: Vec<Spans> = logger::latest(height)
                .into_iter()
                .map(Spans::from)
                .collect();
            let log = Paragraph::new(lines).block(Block::default().title("Log").borders(Borders::ALL));
            f.render_widget(log, rows[1]);
        })?;
        Ok(())
    }
}

impl DisplayCommands for TermDisplay {
    fn display(&mut self, pixels: &[bool]) {
        self.points.clear();
        self.points.extend(
            pixels
                .iter()
                .enumerate()
                .filter(|(_, &pixel)| pixel)
                .map(|(index, _)| {
                    let x = index % display::WIDTH;
                    let y = index / display::WIDTH;
                    (x as f64, -(y as f64))
                }),
        );
    }
}

/// The lines of the state pane.
fn status(chip: &ChipSet, paused: bool) -> Vec<Spans<'static>> {
    let mode = if paused { "STEP" } else { "RUN" };
    let instruction = match chip.current_instruction() {
        Ok(instruction) => instruction.to_string(),
        Err(err) => err.to_string(),
    };

    let mut lines = vec![Spans::from(vec![
        Span::styled(mode, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        if chip.get_sound_timer() > 0 {
            Span::styled("BEEP", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        } else {
            Span::raw("    ")
        },
    ])];

    lines.push(Spans::from(format!(
        "{:#06X}  {}",
        chip.get_program_counter(),
        instruction
    )));
    if let Some(x) = chip.is_awaiting_key() {
        lines.push(Spans::from(format!("waiting for a key into V{:X}", x)));
    }
    lines.push(Spans::from(""));
    lines.extend(chip.summary().lines().map(|line| Spans::from(line.to_string())));
    lines.push(Spans::from(""));
    lines.push(Spans::from("Esc quit  P run/step  Space step"));
    lines
}
