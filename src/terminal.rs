//! Terminal host: the terminal window is the container, half-block cells are
//! the drawing surface's pixels, and crossterm supplies input and timing.

use crate::container::Container;
use crate::error::{Result, ViewError};
use crate::input::{Command, InputEvent};
use crate::scheduler::{DisplayScheduler, HostEvent};
use crate::surface::{Color, Surface};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::style::{
    Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, BufWriter, Stdout, Write};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Each terminal row shows two stacked pixels
pub const PIXELS_PER_ROW: usize = 2;

/// Used when the terminal cannot report its size
const FALLBACK_SIZE: (u16, u16) = (80, 24);

pub struct TerminalContainer {
    out: BufWriter<Stdout>,
    attached: bool,
}

impl TerminalContainer {
    pub fn new() -> Self {
        TerminalContainer {
            out: BufWriter::new(io::stdout()),
            attached: false,
        }
    }

    fn restore(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            ResetColor,
            Show,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        disable_raw_mode()
    }
}

impl Default for TerminalContainer {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal size in cells as (columns, rows)
pub fn terminal_cells() -> (u16, u16) {
    match terminal::size() {
        Ok(size) => size,
        Err(e) => {
            log::warn!("crossterm could not read the terminal size: {}", e);
            termsize::get()
                .map(|size| (size.cols, size.rows))
                .unwrap_or(FALLBACK_SIZE)
        }
    }
}

impl Container for TerminalContainer {
    fn client_size(&self) -> (usize, usize) {
        let (cols, rows) = terminal_cells();
        (cols as usize, rows as usize * PIXELS_PER_ROW)
    }

    fn append_surface(&mut self, _surface: &Surface) -> Result<()> {
        if self.attached {
            return Err(ViewError::SurfaceAttached);
        }
        enable_raw_mode()?;
        execute!(
            self.out,
            EnterAlternateScreen,
            EnableMouseCapture,
            Hide,
            Clear(ClearType::All)
        )?;
        self.attached = true;
        Ok(())
    }

    fn present(&mut self, surface: &Surface, overlay: &[String]) -> Result<()> {
        if !self.attached {
            return Err(ViewError::NoSurface);
        }
        write_frame(&mut self.out, surface, overlay)?;
        self.out.flush()?;
        Ok(())
    }

    fn remove_surface(&mut self) -> Result<()> {
        if !self.attached {
            return Err(ViewError::NoSurface);
        }
        self.attached = false;
        self.restore()?;
        Ok(())
    }

    fn surface_count(&self) -> usize {
        usize::from(self.attached)
    }
}

impl Drop for TerminalContainer {
    fn drop(&mut self) {
        if self.attached {
            // Leave the user's terminal usable even if the loop bailed out
            let _ = self.restore();
        }
    }
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Writes a surface as upper-half-block cells, then overlay lines from the top-left
pub fn write_frame<W: Write>(out: &mut W, surface: &Surface, overlay: &[String]) -> io::Result<()> {
    let rows = surface.height().div_ceil(PIXELS_PER_ROW);
    for row in 0..rows {
        queue!(out, MoveTo(0, row as u16))?;
        let top = surface.row(row * PIXELS_PER_ROW);
        let bottom = if row * PIXELS_PER_ROW + 1 < surface.height() {
            surface.row(row * PIXELS_PER_ROW + 1)
        } else {
            top
        };

        let mut current: Option<(Color, Color)> = None;
        for (&upper, &lower) in top.iter().zip(bottom) {
            if current != Some((upper, lower)) {
                queue!(
                    out,
                    SetForegroundColor(term_color(upper)),
                    SetBackgroundColor(term_color(lower))
                )?;
                current = Some((upper, lower));
            }
            queue!(out, Print('▀'))?;
        }
    }

    for (row, line) in overlay.iter().enumerate().take(rows) {
        let text: String = line.chars().take(surface.width()).collect();
        queue!(
            out,
            MoveTo(0, row as u16),
            SetForegroundColor(TermColor::White),
            SetBackgroundColor(TermColor::Black),
            Print(text)
        )?;
    }
    queue!(out, ResetColor)
}

/// Fixed-rate frame clock that polls terminal input between frames
pub struct TerminalScheduler {
    interval: Duration,
    next_frame: Instant,
    frame_limit: Option<u64>,
    frames: u64,
}

impl TerminalScheduler {
    /// `frame_limit` closes the view after that many frames
    pub fn new(frame_rate: u32, frame_limit: Option<u64>) -> Self {
        TerminalScheduler {
            interval: Duration::from_secs_f64(1.0 / frame_rate.max(1) as f64),
            next_frame: Instant::now(),
            frame_limit,
            frames: 0,
        }
    }
}

/// Wall-clock time in milliseconds since the Unix epoch
pub fn wall_clock_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

impl DisplayScheduler for TerminalScheduler {
    fn next_event(&mut self) -> Result<HostEvent> {
        loop {
            let now = Instant::now();
            if now >= self.next_frame {
                if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
                    return Ok(HostEvent::Close);
                }
                // Skip missed frames rather than bursting to catch up
                self.next_frame = (self.next_frame + self.interval).max(now);
                self.frames += 1;
                return Ok(HostEvent::Frame(wall_clock_ms()));
            }
            if event::poll(self.next_frame - now)? {
                if let Some(event) = map_event(event::read()?) {
                    return Ok(event);
                }
            }
        }
    }
}

/// Translates a crossterm event into a host event, in surface pixel coordinates
pub fn map_event(event: Event) -> Option<HostEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Some(HostEvent::Close);
            }
            let command = match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                    return Some(HostEvent::Close)
                }
                KeyCode::Char('p') | KeyCode::Char('P') => Command::TogglePause,
                KeyCode::Char('d') | KeyCode::Char('D') => Command::ToggleDebug,
                KeyCode::Char('w') | KeyCode::Char('W') => Command::ToggleWireframe,
                KeyCode::Char('r') | KeyCode::Char('R') => Command::ResetView,
                _ => return None,
            };
            Some(HostEvent::Input(InputEvent::Command(command)))
        }
        Event::Mouse(mouse) => {
            let x = mouse.column as f64;
            let y = (mouse.row as usize * PIXELS_PER_ROW) as f64;
            let input = match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => InputEvent::PointerDown { x, y },
                MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                    InputEvent::PointerMove { x, y }
                }
                MouseEventKind::Up(MouseButton::Left) => InputEvent::PointerUp,
                MouseEventKind::ScrollUp => InputEvent::Wheel { delta_y: -1.0 },
                MouseEventKind::ScrollDown => InputEvent::Wheel { delta_y: 1.0 },
                _ => return None,
            };
            Some(HostEvent::Input(input))
        }
        Event::Resize(cols, rows) => Some(HostEvent::Resize(
            cols as usize,
            rows as usize * PIXELS_PER_ROW,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn quit_keys_close_the_view() {
        assert_eq!(map_event(key(KeyCode::Char('q'), KeyModifiers::NONE)), Some(HostEvent::Close));
        assert_eq!(map_event(key(KeyCode::Esc, KeyModifiers::NONE)), Some(HostEvent::Close));
        assert_eq!(
            map_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(HostEvent::Close)
        );
        assert_eq!(map_event(key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn shortcut_keys_become_commands() {
        assert_eq!(
            map_event(key(KeyCode::Char('w'), KeyModifiers::NONE)),
            Some(HostEvent::Input(InputEvent::Command(Command::ToggleWireframe)))
        );
        assert_eq!(
            map_event(key(KeyCode::Char('P'), KeyModifiers::SHIFT)),
            Some(HostEvent::Input(InputEvent::Command(Command::TogglePause)))
        );
    }

    #[test]
    fn mouse_rows_map_to_pixel_pairs() {
        assert_eq!(
            map_event(mouse(MouseEventKind::Down(MouseButton::Left), 7, 5)),
            Some(HostEvent::Input(InputEvent::PointerDown { x: 7.0, y: 10.0 }))
        );
        assert_eq!(
            map_event(mouse(MouseEventKind::ScrollUp, 0, 0)),
            Some(HostEvent::Input(InputEvent::Wheel { delta_y: -1.0 }))
        );
        assert_eq!(map_event(mouse(MouseEventKind::Down(MouseButton::Right), 0, 0)), None);
        assert_eq!(map_event(Event::Resize(100, 30)), Some(HostEvent::Resize(100, 60)));
    }

    #[test]
    fn frame_is_written_as_half_blocks_with_overlay() {
        let mut surface = Surface::new(3, 3);
        surface.clear(Color::from_hex(0x102030));
        let mut out = Vec::new();
        write_frame(&mut out, &surface, &["hi".to_string()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        // Two cell rows of three blocks each
        assert_eq!(text.matches('▀').count(), 6);
        assert!(text.contains("hi"));
        assert!(text.contains("16;32;48"));
    }

    #[test]
    fn frame_limit_closes_the_scheduler() {
        let mut scheduler = TerminalScheduler::new(1000, Some(0));
        assert_eq!(scheduler.next_event().unwrap(), HostEvent::Close);
    }
}
