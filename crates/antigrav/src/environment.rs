//! Terminal implementation of the animation host's [`Environment`].

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use antigrav_config::DisplaySettings;
use antigrav_core::{Point, SurfaceSize};
use antigrav_field::{CellScale, Environment, FrameToken, HostEvent, Listener};
use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        MouseEventKind,
    },
    execute,
};

/// Poll timeout while no frame is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// The terminal as seen by the animation host.
///
/// Frames are deadlines checked by the main loop; listeners toggle the
/// terminal's mouse and focus reporting.
#[derive(Debug)]
pub struct TerminalEnvironment<W: Write = Stdout> {
    out: W,
    cols: u16,
    rows: u16,
    /// Rows at the bottom not covered by the surface.
    reserved_rows: u16,
    scale: CellScale,
    frame_interval: Duration,
    next_token: u64,
    pending: Option<(FrameToken, Instant)>,
    attached: Vec<Listener>,
}

impl TerminalEnvironment<Stdout> {
    pub fn new(display: &DisplaySettings) -> Self {
        Self::with_writer(io::stdout(), display)
    }
}

impl<W: Write> TerminalEnvironment<W> {
    /// Create an environment that writes terminal control sequences to `out`.
    pub fn with_writer(out: W, display: &DisplaySettings) -> Self {
        Self {
            out,
            cols: 0,
            rows: 0,
            reserved_rows: u16::from(display.show_help),
            scale: CellScale {
                width_px: display.cell_width_px,
                height_px: display.cell_height_px,
            },
            frame_interval: Duration::from_secs_f64(1.0 / f64::from(display.fps.max(1))),
            next_token: 0,
            pending: None,
            attached: Vec::new(),
        }
    }

    /// Record the terminal size in cells.
    pub fn set_terminal_size(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn reserved_rows(&self) -> u16 {
        self.reserved_rows
    }

    pub fn scale(&self) -> CellScale {
        self.scale
    }

    pub fn is_attached(&self, listener: Listener) -> bool {
        self.attached.contains(&listener)
    }

    /// How long the main loop may wait for input before the next frame is due.
    pub fn time_until_frame(&self, now: Instant) -> Duration {
        self.pending
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
            .unwrap_or(IDLE_POLL)
    }

    /// Take the pending frame if its deadline has passed.
    pub fn take_due_frame(&mut self, now: Instant) -> Option<FrameToken> {
        match self.pending {
            Some((token, deadline)) if deadline <= now => {
                self.pending = None;
                Some(token)
            }
            _ => None,
        }
    }

    /// Center of a terminal cell in viewport pixels.
    pub fn cell_center(&self, col: u16, row: u16) -> Point {
        Point::new(
            (f32::from(col) + 0.5) * self.scale.width_px,
            (f32::from(row) + 0.5) * self.scale.height_px,
        )
    }

    /// Map a terminal event to a host event, dropping input nobody listens to.
    pub fn translate(&self, event: &Event) -> Option<HostEvent> {
        let (listener, host_event) = match event {
            Event::Resize(_, _) => (Listener::Resize, HostEvent::Resize),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => (
                    Listener::PointerMove,
                    HostEvent::PointerMove(self.cell_center(mouse.column, mouse.row)),
                ),
                _ => return None,
            },
            Event::FocusLost => (Listener::PointerLeave, HostEvent::PointerLeave),
            _ => return None,
        };

        self.is_attached(listener).then_some(host_event)
    }

    /// Turn the terminal reporting behind `listener` on or off.
    fn set_reporting(&mut self, listener: Listener, enabled: bool) {
        let result = match (listener, enabled) {
            (Listener::PointerMove, true) => execute!(self.out, EnableMouseCapture),
            (Listener::PointerMove, false) => execute!(self.out, DisableMouseCapture),
            (Listener::PointerLeave, true) => execute!(self.out, EnableFocusChange),
            (Listener::PointerLeave, false) => execute!(self.out, DisableFocusChange),
            // Resize events are always reported
            (Listener::Resize, _) => Ok(()),
        };

        if let Err(err) = result {
            log::warn!("failed to toggle {listener:?} reporting: {err}");
        }
    }
}

impl<W: Write> Environment for TerminalEnvironment<W> {
    fn viewport(&self) -> SurfaceSize {
        let rows = self.rows.saturating_sub(self.reserved_rows);
        SurfaceSize::new(
            f32::from(self.cols) * self.scale.width_px,
            f32::from(rows) * self.scale.height_px,
        )
    }

    fn surface_origin(&self) -> Point {
        Point::default()
    }

    fn request_frame(&mut self) -> FrameToken {
        self.next_token += 1;
        let token = FrameToken(self.next_token);
        self.pending = Some((token, Instant::now() + self.frame_interval));
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if matches!(self.pending, Some((pending, _)) if pending == token) {
            self.pending = None;
        }
    }

    fn attach(&mut self, listener: Listener) {
        if self.is_attached(listener) {
            return;
        }
        self.set_reporting(listener, true);
        self.attached.push(listener);
        log::debug!("attached {listener:?} listener");
    }

    fn detach(&mut self, listener: Listener) {
        if !self.is_attached(listener) {
            return;
        }
        self.set_reporting(listener, false);
        self.attached.retain(|&l| l != listener);
        log::debug!("detached {listener:?} listener");
    }
}
