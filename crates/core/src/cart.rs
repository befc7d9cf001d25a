//! Cart lines, derived totals, and the persistent cart store.
//!
//! The store keeps the authoritative in-memory line list and writes the full
//! serialized sequence through its [`Storage`] backend on every accepted
//! mutation, under a single well-known key. Derived values (subtotal, total,
//! item count) are recomputed from the current lines and never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::storage::{Storage, StorageError};

/// The well-known storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Flat-rate shipping applied to every order.
pub const SHIPPING_COST: Decimal = Decimal::TEN;

/// Version written into the persisted envelope. Payloads with any other
/// version are treated as corrupted.
const CART_SCHEMA_VERSION: u32 = 1;

/// One product entry with quantity in the shopping cart.
///
/// Invariant: `quantity >= 1`. The quantity operations never let it drop
/// below one; removing the line is the only way to eliminate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Unique per product.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit price. Serialized as a JSON number in the persisted format.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Product image reference.
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// Units of this product, at least one.
    pub quantity: u32,
}

impl CartLine {
    /// Price for the whole line (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Persisted envelope: the line sequence plus a schema version.
#[derive(Debug, Deserialize)]
struct StoredCart {
    version: u32,
    lines: Vec<CartLine>,
}

/// Borrowing counterpart of [`StoredCart`] for writes.
#[derive(Serialize)]
struct StoredCartRef<'a> {
    version: u32,
    lines: &'a [CartLine],
}

/// How [`CartStore::load`] obtained its initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing was stored; the cart starts empty.
    Fresh,
    /// The persisted cart was read back.
    Restored,
    /// The persisted value did not parse as a valid cart. The bad entry has
    /// been removed and the cart starts empty.
    RecoveredFromCorruption,
}

/// The authoritative cart state, synchronized write-through to storage.
#[derive(Debug)]
pub struct CartStore<S> {
    lines: Vec<CartLine>,
    storage: S,
}

impl<S: Storage> CartStore<S> {
    /// Restore the cart from `storage`.
    ///
    /// An absent entry yields an empty cart. An entry that does not parse as
    /// a version-1 cart (or that violates the quantity invariant) is removed
    /// from storage and the cart starts empty; the outcome reports the
    /// recovery so callers can surface it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only for backend failures; malformed data is
    /// handled, not propagated.
    pub fn load(storage: S) -> Result<(Self, LoadOutcome), StorageError> {
        let Some(bytes) = storage.read(CART_STORAGE_KEY)? else {
            return Ok((Self::empty(storage), LoadOutcome::Fresh));
        };

        match serde_json::from_slice::<StoredCart>(&bytes) {
            Ok(stored)
                if stored.version == CART_SCHEMA_VERSION
                    && stored.lines.iter().all(|line| line.quantity >= 1) =>
            {
                Ok((
                    Self {
                        lines: stored.lines,
                        storage,
                    },
                    LoadOutcome::Restored,
                ))
            }
            _ => {
                storage.remove(CART_STORAGE_KEY)?;
                Ok((Self::empty(storage), LoadOutcome::RecoveredFromCorruption))
            }
        }
    }

    fn empty(storage: S) -> Self {
        Self {
            lines: Vec::new(),
            storage,
        }
    }

    /// The current line sequence, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines (header badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Sum of `price * quantity` over the current lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Subtotal plus the flat shipping cost.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal() + SHIPPING_COST
    }

    /// Add a line to the cart, merging quantities when the product is
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the updated cart cannot be persisted.
    pub fn add_line(&mut self, line: CartLine) -> Result<(), StorageError> {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.id == line.id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.lines.push(line);
        }
        self.save()
    }

    /// Replace the quantity of the line matching `id`.
    ///
    /// Quantities below one are silently ignored and nothing is written.
    /// An unknown `id` leaves the lines untouched, but the accepted
    /// operation still persists the (unchanged) sequence.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the cart cannot be persisted.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> Result<(), StorageError> {
        if quantity < 1 {
            return Ok(());
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.save()
    }

    /// Remove the line matching `id`.
    ///
    /// Returns whether a line was removed; an unknown `id` is a no-op, not
    /// an error. Callers emit the user-visible notification only on `true`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the cart cannot be persisted.
    pub fn remove_line(&mut self, id: &str) -> Result<bool, StorageError> {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        let removed = self.lines.len() != before;
        self.save()?;
        Ok(removed)
    }

    /// Overwrite the persisted representation with the full current
    /// sequence. Last writer wins; there is no merge and no conflict
    /// detection.
    fn save(&self) -> Result<(), StorageError> {
        let envelope = StoredCartRef {
            version: CART_SCHEMA_VERSION,
            lines: &self.lines,
        };
        let bytes = serde_json::to_vec(&envelope)?;
        self.storage.write(CART_STORAGE_KEY, &bytes)
    }
}
