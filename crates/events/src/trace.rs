use core::fmt::Display;

use crate::Event;

/// Emit one `debug` record per event applied to `stream` (a cart or order id).
pub fn trace_applied<E, S>(stream: &S, events: &[E])
where
    E: Event,
    S: Display + ?Sized,
{
    for event in events {
        tracing::debug!(
            stream = %stream,
            event_type = event.event_type(),
            version = event.version(),
            occurred_at = %event.occurred_at(),
            "event applied"
        );
    }
}
