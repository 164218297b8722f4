//! Optional trace channel for the structural parser.
//!
//! Enabled by the `trace` cargo feature, which routes one line per structural
//! event to the [`log`] facade under the `jsontape::parser` target: nesting
//! depth, token position, event kind, and a label (the raw diagnostic for
//! errors, empty otherwise). With the feature off every call site compiles to
//! nothing. The channel is informational only and never changes a parse
//! outcome.
//!
//! [`log`]: https://docs.rs/log

#[cfg(feature = "trace")]
macro_rules! trace_event {
    ($depth:expr, $position:expr, $kind:expr, $label:expr) => {
        log::trace!(
            target: "jsontape::parser",
            "{:>4} {:>6} {:<18} {}",
            $depth,
            $position,
            $kind,
            $label
        )
    };
}

#[cfg(not(feature = "trace"))]
macro_rules! trace_event {
    ($depth:expr, $position:expr, $kind:expr, $label:expr) => {{
        let _ = (&$depth, &$position, &$kind, &$label);
    }};
}

pub(crate) use trace_event;
