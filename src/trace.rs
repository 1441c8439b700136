//! Spans and events for the `distance_matrix`, `score_blocks`, `assign` and
//! `match_sets` phases of [`crate::CrossScaleMatcher`].
//!
//! Each phase opens a span carrying its sizes (rows, columns, keypoint
//! pairs, strategy name) and closes with a `*_done` event reporting
//! `elapsed_ms` from a [`PhaseClock`], plus the match count for assignment.
//! Without the `tracing` feature both macros expand to no-ops.

/// Opens an info-level span named after a matcher phase, e.g.
/// `trace_span!("score_blocks", strategy = "wC", pairs = 120)`.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Emits a phase-completion event such as
/// `trace_event!("assign_done", matches = 42)`.
///
/// Without the `tracing` feature the field values are evaluated and dropped.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Span guard returned by `trace_span!` when the `tracing` feature is off.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns self, mirroring `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}

/// Wall-clock timer feeding the `elapsed_ms` field of phase events.
pub(crate) struct PhaseClock {
    start: std::time::Instant,
}

impl PhaseClock {
    pub(crate) fn start() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since the clock was started.
    pub(crate) fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1e3
    }
}
