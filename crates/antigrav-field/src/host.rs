//! Animation host: frame scheduling, input listeners and teardown.
//!
//! The host never talks to a terminal or window directly. Everything it needs
//! from the outside world goes through [`Environment`], which the binary
//! implements for a real terminal and tests implement with a fake.

use antigrav_core::{FieldSettings, POINTER_SENTINEL, Point, SurfaceSize};
use rand::Rng;

use crate::canvas::Canvas;
use crate::field::ParticleField;
use crate::particle::FrameContext;

/// Identifies a frame requested from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Input the host subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    Resize,
    PointerMove,
    PointerLeave,
}

impl Listener {
    pub const ALL: [Listener; 3] = [
        Listener::Resize,
        Listener::PointerMove,
        Listener::PointerLeave,
    ];
}

/// An input delivered by the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The viewport changed size; read the new size from the environment.
    Resize,
    /// Pointer moved to a position in viewport coordinates.
    PointerMove(Point),
    /// Pointer left the viewport.
    PointerLeave,
}

/// Capabilities the host needs from whatever is displaying it.
pub trait Environment {
    /// Current viewport size in virtual pixels.
    fn viewport(&self) -> SurfaceSize;

    /// Top-left corner of the drawable surface in viewport coordinates.
    fn surface_origin(&self) -> Point;

    /// Schedule one call to [`AnimationHost::frame_step`].
    fn request_frame(&mut self) -> FrameToken;

    /// Cancel a frame returned by `request_frame`.
    fn cancel_frame(&mut self, token: FrameToken);

    /// Start delivering events for `listener`.
    fn attach(&mut self, listener: Listener);

    /// Stop delivering events for `listener`.
    fn detach(&mut self, listener: Listener);
}

/// Lifecycle of a host. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Running,
    Stopped,
}

/// Drives a [`ParticleField`] from environment frames and events.
#[derive(Debug)]
pub struct AnimationHost<R> {
    field: ParticleField,
    context: FrameContext,
    state: HostState,
    pending_frame: Option<FrameToken>,
    rng: R,
}

impl<R: Rng> AnimationHost<R> {
    /// Attach listeners, build the field for the current viewport and request
    /// the first frame.
    pub fn start<E: Environment + ?Sized>(env: &mut E, settings: FieldSettings, rng: R) -> Self {
        let mut host = Self {
            field: ParticleField::new(settings),
            context: FrameContext::new(SurfaceSize::default()),
            state: HostState::Running,
            pending_frame: None,
            rng,
        };

        for listener in Listener::ALL {
            env.attach(listener);
        }
        host.resize(env);
        host.pending_frame = Some(env.request_frame());

        log::info!(
            "animation started with {} particles",
            host.field.settings().particle_count
        );
        host
    }

    /// Adopt the environment's viewport size and rebuild the field.
    pub fn resize<E: Environment + ?Sized>(&mut self, env: &mut E) {
        if !self.is_running() {
            return;
        }
        let surface = env.viewport();
        self.context.surface = surface;
        self.field.rebuild(&mut self.rng, surface);
    }

    /// Record a pointer position given in viewport coordinates.
    pub fn on_pointer_move<E: Environment + ?Sized>(&mut self, env: &mut E, position: Point) {
        if !self.is_running() {
            return;
        }
        self.context.pointer = position - env.surface_origin();
    }

    /// Forget the pointer.
    pub fn on_pointer_leave(&mut self) {
        if !self.is_running() {
            return;
        }
        self.context.pointer = POINTER_SENTINEL;
    }

    /// Dispatch an event. Returns false if the host is stopped.
    pub fn handle_event<E: Environment + ?Sized>(&mut self, env: &mut E, event: HostEvent) -> bool {
        if !self.is_running() {
            return false;
        }
        match event {
            HostEvent::Resize => self.resize(env),
            HostEvent::PointerMove(position) => self.on_pointer_move(env, position),
            HostEvent::PointerLeave => self.on_pointer_leave(),
        }
        true
    }

    /// Run the frame identified by `token`: clear, update and draw every
    /// particle, advance the frame counter and request the next frame.
    ///
    /// Returns false without touching anything if the host is stopped or
    /// `token` is not the pending frame.
    pub fn frame_step<E, C>(&mut self, env: &mut E, token: FrameToken, canvas: &mut C) -> bool
    where
        E: Environment + ?Sized,
        C: Canvas + ?Sized,
    {
        if !self.is_running() || self.pending_frame != Some(token) {
            log::trace!("ignoring stale frame {token:?}");
            return false;
        }

        canvas.clear(self.context.surface);
        self.field.step(&self.context, canvas);
        self.context.frame += 1;
        self.pending_frame = Some(env.request_frame());
        true
    }

    /// Cancel the pending frame and detach every listener. Safe to call more
    /// than once.
    pub fn stop<E: Environment + ?Sized>(&mut self, env: &mut E) {
        if !self.is_running() {
            return;
        }
        if let Some(token) = self.pending_frame.take() {
            env.cancel_frame(token);
        }
        for listener in Listener::ALL {
            env.detach(listener);
        }
        self.state = HostState::Stopped;

        log::info!("animation stopped after {} frames", self.context.frame);
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == HostState::Running
    }

    pub fn frame_count(&self) -> u64 {
        self.context.frame
    }

    /// Pointer in surface coordinates.
    pub fn pointer(&self) -> Point {
        self.context.pointer
    }

    pub fn surface(&self) -> SurfaceSize {
        self.context.surface
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending_frame
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }
}
