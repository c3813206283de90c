use chrono::{DateTime, Utc};

/// A fact emitted by the cart or order aggregate.
///
/// Events are applied to their aggregate in emission order and never edited
/// afterwards; each one bumps the aggregate version by one.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted name, `<area>.<fact>` (e.g. "orders.order.shipped").
    fn event_type(&self) -> &'static str;

    /// Payload schema version. Bump when an event's fields change shape.
    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc>;
}
