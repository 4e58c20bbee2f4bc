use serde::{Deserialize, Serialize};

mod clock;
pub use clock::*;
mod cuts;
pub use cuts::*;
mod zoom;
pub use zoom::*;
mod region;
pub use region::*;
mod commands;
pub use commands::*;

/// Time on the audio timeline, in seconds.
pub type Seconds = f64;

/// Which endpoint of a complete selection a new mark should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    Start,
    End,
}

/// The time range under construction: up to two endpoints, kept ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    start: Option<Seconds>,
    end: Option<Seconds>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<Seconds> {
        self.start
    }

    pub fn end(&self) -> Option<Seconds> {
        self.end
    }

    /// Both endpoints are present.
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn reset(&mut self) {
        self.start = None;
        self.end = None;
    }

    pub fn set_start(&mut self, t: Seconds) {
        self.start = Some(t);
        self.normalize();
    }

    pub fn set_end(&mut self, t: Seconds) {
        self.end = Some(t);
        self.normalize();
    }

    pub fn clear_end(&mut self) {
        self.end = None;
    }

    /// Span between the endpoints; zero while incomplete.
    pub fn duration(&self) -> Seconds {
        match (self.start, self.end) {
            (Some(s), Some(e)) => (e - s).max(0.0),
            _ => 0.0,
        }
    }

    // The selection is materially "the segment between the two most recent
    // marks", whatever order they arrived in.
    fn normalize(&mut self) {
        if let (Some(s), Some(e)) = (self.start, self.end) {
            if e < s {
                self.start = Some(e);
                self.end = Some(s);
            }
        }
    }
}

/// Decide which endpoint of a complete selection a new mark moves.
///
/// Marks at or beyond an endpoint move that endpoint. Inside the span the
/// first third moves the start and the rest moves the end, so repeated marks
/// tend to trim the tail of the selection rather than its head.
pub fn pick_boundary(t: Seconds, start: Seconds, end: Seconds) -> Boundary {
    if t <= start {
        return Boundary::Start;
    }
    if t >= end {
        return Boundary::End;
    }

    let span = end - start;
    if span <= 0.0 {
        return Boundary::End;
    }

    let rel = (t - start) / span;
    if rel <= 1.0 / 3.0 {
        Boundary::Start
    } else {
        Boundary::End
    }
}
