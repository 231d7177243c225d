//! Press-gesture disambiguator for document button shapes.
//!
//! # Responsibility
//! - Decide whether a press-and-release on a button is a hold-to-activate
//!   or the start of a host-native drag/resize.
//! - Own the per-session activation deadline and its cancellation rules.
//!
//! # Invariants
//! - One live session at a time; a new press replaces the previous session.
//! - An armed deadline never outlives its session.
//! - Cancellation (move past threshold, release, leave) is always possible
//!   until the deadline elapses.
//!
//! The machine is deadline-driven rather than timer-driven: the host event
//! loop supplies `Instant`s with each call and polls for due activations on
//! its regular tick. That keeps the machine on the host's single cooperative
//! loop and makes every timing rule testable with synthetic clocks.

use super::Point;
use crate::model::DocId;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Default hold duration before a press activates the document.
pub const DEFAULT_HOLD_DELAY: Duration = Duration::from_millis(500);

/// Default displacement, in pixels, treated as the start of a manipulation.
pub const DEFAULT_MOVE_THRESHOLD: f64 = 5.0;

/// What exceeding the move threshold does to a pending activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdPolicy {
    /// Cancel the pending activation; the user is dragging or resizing.
    /// This is the shipped behavior of the document button.
    #[default]
    CancelPending,
    /// Emit the activation immediately instead of waiting out the hold.
    /// Opt-in variant for hosts that want tap-or-drag with an eager open.
    ActivateEarly,
}

/// Tuning knobs for the disambiguator.
#[derive(Debug, Clone, Copy)]
pub struct GestureConfig {
    /// How long a press must hold still before it activates.
    pub hold_delay: Duration,
    /// Displacement beyond which the press counts as a manipulation.
    pub move_threshold: f64,
    /// Behavior when the threshold is exceeded while the deadline is armed.
    pub threshold_policy: ThresholdPolicy,
    /// Whether emitted activations ask the host for tactile feedback.
    pub haptic_feedback: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hold_delay: DEFAULT_HOLD_DELAY,
            move_threshold: DEFAULT_MOVE_THRESHOLD,
            threshold_policy: ThresholdPolicy::default(),
            haptic_feedback: true,
        }
    }
}

/// Emitted at most once per session when a press is classified as activate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Document the pressed button points at.
    pub target: DocId,
    /// Host should give best-effort tactile feedback; failures are ignored.
    pub haptic: bool,
}

struct Session {
    target: DocId,
    start: Point,
    deadline: Option<Instant>,
}

/// Per-shape press classification machine.
pub struct GestureDisambiguator {
    config: GestureConfig,
    session: Option<Session>,
}

impl GestureDisambiguator {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Starts a session for a press on the button bound to `target`.
    ///
    /// Arms the activation deadline at `now + hold_delay`. A press while a
    /// session is still live replaces it: the stale deadline is cancelled
    /// and the new press is tracked fresh.
    pub fn on_press(&mut self, target: DocId, position: Point, now: Instant) {
        if self.session.is_some() {
            debug!("event=gesture_press module=gesture status=replace target={target}");
        }
        self.session = Some(Session {
            target,
            start: position,
            deadline: Some(now + self.config.hold_delay),
        });
    }

    /// Feeds a pointer move while the button is pressed.
    ///
    /// Displacement within the threshold leaves the deadline armed. Beyond
    /// it, the configured policy applies: cancel the pending activation, or
    /// emit it immediately. Without a session this is a silent no-op.
    pub fn on_move(&mut self, position: Point) -> Option<Activation> {
        let session = self.session.as_mut()?;
        if session.deadline.is_none() {
            return None;
        }
        if session.start.distance_to(position) <= self.config.move_threshold {
            return None;
        }

        match self.config.threshold_policy {
            ThresholdPolicy::CancelPending => {
                session.deadline = None;
                debug!(
                    "event=gesture_threshold module=gesture status=cancelled target={}",
                    session.target
                );
                None
            }
            ThresholdPolicy::ActivateEarly => {
                let session = self.session.take()?;
                Some(self.emit_activation(session))
            }
        }
    }

    /// Emits the activation once the armed deadline has elapsed.
    ///
    /// The host calls this on its regular tick; returns `None` while the
    /// deadline is pending, cancelled, or no session exists.
    pub fn poll(&mut self, now: Instant) -> Option<Activation> {
        let deadline = self.session.as_ref()?.deadline?;
        if now < deadline {
            return None;
        }
        let session = self.session.take()?;
        Some(self.emit_activation(session))
    }

    /// Ends the session on pointer release. Safe without a session.
    ///
    /// No event is emitted; if the deadline had already fired, the
    /// activation was emitted then and nothing fires twice.
    pub fn on_release(&mut self) {
        self.session = None;
    }

    /// Ends the session when the pointer leaves the button. Safe without a
    /// session.
    pub fn on_leave(&mut self) {
        self.session = None;
    }

    /// Whether a session with an armed, un-fired deadline exists.
    pub fn is_armed(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.deadline.is_some())
    }

    // Consuming the session here is what guarantees at-most-once: any later
    // move/poll finds no session to emit from.
    fn emit_activation(&self, session: Session) -> Activation {
        info!(
            "event=gesture_activate module=gesture status=ok target={}",
            session.target
        );
        Activation {
            target: session.target,
            haptic: self.config.haptic_feedback,
        }
    }
}

impl Default for GestureDisambiguator {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
