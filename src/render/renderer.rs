use std::io::{self, Write};

use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use tracing::warn;

use crate::render::capability::{RenderCapability, RenderTier};

/// Writes composed frames to the terminal using the detected tier. A tier
/// that fails mid-session is downgraded for the rest of the renderer's life
/// (full-ANSI -> clear-and-reprint -> minimal-diff); it is never upgraded
/// back, and never re-probed inside the loop.
pub struct Renderer {
    out: Box<dyn Write>,
    tier: RenderTier,
    compact: bool,
    drawn_lines: usize,
}

impl Renderer {
    pub fn new(out: Box<dyn Write>, caps: RenderCapability) -> Self {
        Self {
            out,
            tier: caps.tier,
            compact: caps.compact,
            drawn_lines: 0,
        }
    }

    pub fn stdout(caps: RenderCapability) -> Self {
        Self::new(Box::new(io::stdout()), caps)
    }

    pub fn tier(&self) -> RenderTier {
        self.tier
    }

    /// Capability as the composer should see it right now.
    pub fn capability(&self) -> RenderCapability {
        RenderCapability {
            tier: self.tier,
            compact: self.compact,
        }
    }

    /// Forget the previous frame. Called at session open so the first frame
    /// appends below whatever the caller printed instead of overwriting it.
    pub fn begin_session(&mut self) {
        self.drawn_lines = 0;
    }

    /// Draw a full frame, downgrading the tier on failure.
    pub fn draw_frame(&mut self, lines: &[String]) -> io::Result<()> {
        loop {
            match self.try_frame(lines) {
                Ok(()) => return Ok(()),
                Err(err) => match self.tier.downgrade() {
                    Some(next) => {
                        warn!("render failed at {:?} ({err}), downgrading to {:?}", self.tier, next);
                        self.tier = next;
                        self.drawn_lines = 0;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    /// Draw a cursor-movement update: the minimal tier prints only the
    /// one-line summary, every other tier repaints the frame in place.
    pub fn draw_update(&mut self, lines: &[String], summary: &str) -> io::Result<()> {
        if self.tier == RenderTier::MinimalDiff {
            writeln!(self.out, "{summary}")?;
            return self.out.flush();
        }
        self.draw_frame(lines)
    }

    /// Best-effort single line, used on degraded exit paths.
    pub fn show_message(&mut self, message: &str) -> io::Result<()> {
        match self.tier {
            RenderTier::MinimalDiff => writeln!(self.out, "{message}")?,
            _ => write!(self.out, "{message}\r\n")?,
        }
        self.out.flush()
    }

    fn try_frame(&mut self, lines: &[String]) -> io::Result<()> {
        match self.tier {
            RenderTier::FullAnsi => {
                if self.drawn_lines > 0 {
                    let up = self.drawn_lines.min(u16::MAX as usize) as u16;
                    queue!(self.out, cursor::MoveUp(up))?;
                }
                queue!(self.out, cursor::MoveToColumn(0))?;
                for line in lines {
                    queue!(self.out, Clear(ClearType::UntilNewLine))?;
                    write!(self.out, "{line}\r\n")?;
                }
                // A shrinking frame leaves stale rows behind; blank them and
                // park the cursor right under the new frame.
                let extra = self.drawn_lines.saturating_sub(lines.len());
                if extra > 0 {
                    for _ in 0..extra {
                        queue!(self.out, Clear(ClearType::UntilNewLine))?;
                        write!(self.out, "\r\n")?;
                    }
                    queue!(self.out, cursor::MoveUp(extra as u16))?;
                }
                self.drawn_lines = lines.len();
                self.out.flush()
            }
            RenderTier::ClearReprint => {
                queue!(self.out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
                for line in lines {
                    write!(self.out, "{line}\r\n")?;
                }
                self.out.flush()
            }
            RenderTier::MinimalDiff => {
                // Constrained hosts are line-buffered; no carriage returns.
                for line in lines {
                    writeln!(self.out, "{line}")?;
                }
                self.out.flush()
            }
        }
    }
}
