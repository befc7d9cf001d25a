//! Stride Core - Cart and checkout domain library.
//!
//! This crate holds the storefront's client-state logic, independent of any
//! web framework or rendering layer:
//! - [`cart`] - Cart lines, derived totals, and the persistent cart store
//! - [`checkout`] - Address/payment records, validation, and the checkout
//!   form coordinator
//! - [`storage`] - The key/value storage seam the cart store writes through
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP, no async.
//! Persistence goes through the [`storage::Storage`] trait so callers inject
//! whatever medium they have (the storefront injects a server-side vault; the
//! tests inject [`storage::MemoryStorage`]).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod storage;

pub use cart::{CART_STORAGE_KEY, CartLine, CartStore, LoadOutcome, SHIPPING_COST};
pub use checkout::{
    AddressRecord, CheckoutCoordinator, FieldError, FieldErrors, PaymentRecord,
    apply_same_address, validate_address, validate_payment,
};
pub use storage::{MemoryStorage, Storage, StorageError};
