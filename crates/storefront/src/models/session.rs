//! Session-related types.
//!
//! Keys for state carried in the visitor's session cookie.

/// Session keys for visitor state.
pub mod keys {
    /// Key for the visitor id scoping the cart vault namespace.
    pub const VISITOR_ID: &str = "visitor_id";

    /// Key for the serialized checkout coordinator state.
    pub const CHECKOUT: &str = "checkout";
}
