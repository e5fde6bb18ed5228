//! The shopping cart.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s, at most one per product
//! id. It is always persisted and loaded whole, as a bare JSON array.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Price, PriceError};
use super::product::ProductSummary;

/// One product in the cart together with its quantity.
///
/// `quantity` is at least 1 for every line held by a [`Cart`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    /// Unit price at the time the product was added.
    pub price: Price,
    pub quantity: u32,
}

impl CartLine {
    /// A new line with quantity 1.
    #[must_use]
    pub fn new(product: ProductSummary) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            image: product.image,
            price: product.price,
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the total is not representable.
    pub fn line_total(&self) -> Result<Price, PriceError> {
        self.price.checked_mul(self.quantity)
    }
}

/// Ordered sequence of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from persisted lines.
    ///
    /// Lines with a zero quantity are dropped and repeated ids are merged
    /// into the first occurrence, so the one-line-per-id invariant holds even
    /// for hand-edited storage.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            match cart.line_mut(&line.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.id == id)
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line's quantity, or appends a new line with
    /// quantity 1.
    pub fn add(&mut self, product: ProductSummary) {
        match self.line_mut(&product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::new(product)),
        }
    }

    /// Change a line's quantity by `delta`.
    ///
    /// The line is removed when the result is zero or below. Unknown ids
    /// leave the cart unchanged. Returns whether a line was found.
    pub fn update_quantity(&mut self, id: &ProductId, delta: i64) -> bool {
        let Some(line) = self.line_mut(id) else {
            return false;
        };

        let updated = i64::from(line.quantity).saturating_add(delta);
        if updated <= 0 {
            self.remove(id);
        } else {
            line.quantity = u32::try_from(updated).unwrap_or(u32::MAX);
        }
        true
    }

    /// Remove a product's line, if present.
    pub fn remove(&mut self, id: &ProductId) {
        self.lines.retain(|line| &line.id != id);
    }

    /// Sum of unit price times quantity over all lines.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if any line total or the sum is not
    /// representable.
    pub fn subtotal(&self) -> Result<Price, PriceError> {
        self.lines.iter().try_fold(Price::ZERO, |total, line| {
            total.checked_add(line.line_total()?)
        })
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

impl FromIterator<CartLine> for Cart {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        Self::from_lines(iter)
    }
}
