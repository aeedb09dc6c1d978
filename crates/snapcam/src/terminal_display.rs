//! Live preview drawn with half-block characters.
//!
//! Each terminal cell shows two vertically stacked pixels: the `▀` glyph in
//! the top pixel's colour over a background of the bottom pixel's colour.
//! The last row holds the status line.

use crate::TerminalGuard;

use snapcam_core::{CaptureError, CoreResult, Display, Frame, SessionStatus};

use std::{
    fmt::Write as _,
    io::{self, Stdout, Write},
    panic::Location,
};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use error_location::ErrorLocation;
use image::imageops::{self, FilterType};
use tracing::info;

const HALF_BLOCK: char = '▀';
const KEY_HELP: &str = "q quit | r record | s snapshot | 0/3/5/8 timed";

/// Largest size that fits `frame` into a `cols` x `rows` cell area, keeping
/// its aspect ratio. Rows hold two pixels each.
pub(crate) fn preview_size(frame_width: u32, frame_height: u32, cols: u16, rows: u16) -> (u32, u32) {
    let max_width = u32::from(cols);
    let max_height = u32::from(rows) * 2;

    if frame_width == 0 || frame_height == 0 || max_width == 0 || max_height == 0 {
        return (0, 0);
    }

    let scale = f64::min(
        f64::from(max_width) / f64::from(frame_width),
        f64::from(max_height) / f64::from(frame_height),
    );

    let width = ((f64::from(frame_width) * scale) as u32).clamp(1, max_width);
    let height = ((f64::from(frame_height) * scale) as u32).clamp(1, max_height);
    // Keep pixel rows paired so every cell has a top and bottom pixel.
    (width, height - height % 2)
}

/// One-line summary of the session for the bottom row.
pub(crate) fn status_line(status: &SessionStatus) -> String {
    let mut line = String::new();

    if status.continuous_recording {
        line.push_str("● REC  ");
    }
    if status.timed_recording {
        match status.timed_remaining {
            Some(remaining) => {
                let _ = write!(line, "● TIMED {:.1}s  ", remaining.as_secs_f64());
            }
            None => line.push_str("● TIMED  "),
        }
    }
    if !status.continuous_recording && !status.timed_recording {
        line.push_str("IDLE  ");
    }
    if status.mirror_enabled {
        line.push_str("MIRROR  ");
    }

    line.push_str(KEY_HELP);
    line
}

/// Full-screen terminal preview. Owns the terminal while alive.
pub struct TerminalDisplay {
    stdout: Stdout,
    guard: Option<TerminalGuard>,
    preview: bool,
    frames_shown: u64,
}

impl TerminalDisplay {
    /// Take over the terminal. With `preview` off only the status line is drawn.
    pub(crate) fn new(guard: TerminalGuard, preview: bool) -> Self {
        Self {
            stdout: io::stdout(),
            guard: Some(guard),
            preview,
            frames_shown: 0,
        }
    }

    fn draw(&mut self, frame: &Frame, status: &SessionStatus) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let preview_rows = rows.saturating_sub(1);

        if self.frames_shown == 0 {
            queue!(self.stdout, Clear(ClearType::All))?;
        }

        if self.preview {
            let (width, height) = preview_size(frame.width(), frame.height(), cols, preview_rows);
            if width > 0 && height > 0 {
                let scaled = imageops::resize(frame, width, height, FilterType::Triangle);
                self.draw_pixels(&scaled)?;
            }
        }

        let line: String = status_line(status).chars().take(usize::from(cols)).collect();
        queue!(
            self.stdout,
            MoveTo(0, preview_rows),
            ResetColor,
            Clear(ClearType::CurrentLine),
            Print(line)
        )?;

        self.stdout.flush()
    }

    fn draw_pixels(&mut self, scaled: &Frame) -> io::Result<()> {
        for cell_row in 0..scaled.height() / 2 {
            let top_y = cell_row * 2;
            queue!(self.stdout, MoveTo(0, cell_row as u16))?;

            for x in 0..scaled.width() {
                let top = scaled.get_pixel(x, top_y);
                let bottom = scaled.get_pixel(x, top_y + 1);
                queue!(
                    self.stdout,
                    SetForegroundColor(Color::Rgb {
                        r: top[0],
                        g: top[1],
                        b: top[2]
                    }),
                    SetBackgroundColor(Color::Rgb {
                        r: bottom[0],
                        g: bottom[1],
                        b: bottom[2]
                    }),
                    Print(HALF_BLOCK)
                )?;
            }

            queue!(self.stdout, ResetColor)?;
        }

        Ok(())
    }
}

impl Display for TerminalDisplay {
    #[track_caller]
    fn show(&mut self, frame: &Frame, status: &SessionStatus) -> CoreResult<()> {
        if self.guard.is_none() {
            return Ok(());
        }

        self.draw(frame, status)
            .map_err(|e| CaptureError::DisplayError {
                reason: format!("Failed to draw preview: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.frames_shown += 1;
        Ok(())
    }

    fn release(&mut self) {
        let Some(mut guard) = self.guard.take() else {
            return;
        };

        let _ = queue!(self.stdout, ResetColor, Clear(ClearType::All));
        let _ = self.stdout.flush();
        guard.restore();

        info!(frames_shown = self.frames_shown, "Display released");
    }
}
