//! Value object trait: equality by value, not identity.
//!
//! Addresses and cart line items are value objects: two addresses with the same
//! fields are the same address, and a line item snapshot is defined entirely by
//! what was captured when the product was added.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one with the new values.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Address {
///     street: String,
///     city: String,
/// }
///
/// impl ValueObject for Address {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
