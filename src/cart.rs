//! Cart snapshots

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::products::{CartProduct, LineItemUuid};

/// Errors related to cart snapshot construction.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// Two product lines share a uuid.
    #[error("Product uuid {0} appears more than once in the cart")]
    DuplicateProduct(LineItemUuid),

    /// A product's currency differs from the cart currency.
    ///
    /// Holds the product index, the product currency and the cart currency.
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A cart amount was negative.
    #[error("Cart {0} cannot be negative")]
    NegativeAmount(&'static str),
}

/// A coupon applied to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCoupon {
    /// Coupon code as accepted by the cart service.
    pub code: String,

    /// Savings from the coupon, in minor units.
    pub savings: i64,
}

/// Totals of a cart snapshot, in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of product prices before coupon and credits.
    pub subtotal: i64,

    /// Credits applied to the cart.
    pub credits: i64,

    /// Amount payable.
    pub total: i64,
}

/// Immutable point-in-time view of a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    products: Vec<CartProduct>,
    coupon: Option<AppliedCoupon>,
    totals: CartTotals,
    currency: &'static Currency,
}

impl Cart {
    /// Create a cart snapshot from its parts.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if product uuids repeat, a product is priced in
    /// another currency, or any total is negative.
    pub fn with_products(
        products: impl Into<Vec<CartProduct>>,
        coupon: Option<AppliedCoupon>,
        totals: CartTotals,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let products = products.into();

        let mut seen = FxHashSet::default();

        products.iter().enumerate().try_for_each(|(i, product)| {
            if !seen.insert(product.uuid()) {
                return Err(CartError::DuplicateProduct(product.uuid().clone()));
            }

            let product_currency = product.price().currency();
            if product_currency == currency {
                Ok(())
            } else {
                Err(CartError::CurrencyMismatch(
                    i,
                    product_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        if totals.subtotal < 0 {
            return Err(CartError::NegativeAmount("subtotal"));
        }

        if totals.total < 0 {
            return Err(CartError::NegativeAmount("total"));
        }

        if totals.credits < 0 {
            return Err(CartError::NegativeAmount("credits"));
        }

        Ok(Cart {
            products,
            coupon,
            totals,
            currency,
        })
    }

    /// Product lines in display order.
    pub fn products(&self) -> &[CartProduct] {
        &self.products
    }

    /// Find a product line by uuid.
    pub fn product(&self, uuid: &LineItemUuid) -> Option<&CartProduct> {
        self.products.iter().find(|product| product.uuid() == uuid)
    }

    /// Whether any product line satisfies the predicate.
    pub fn has_product(&self, predicate: impl Fn(&CartProduct) -> bool) -> bool {
        self.products.iter().any(predicate)
    }

    /// The applied coupon, if any.
    pub fn coupon(&self) -> Option<&AppliedCoupon> {
        self.coupon.as_ref()
    }

    /// Raw totals in minor units.
    pub fn totals(&self) -> CartTotals {
        self.totals
    }

    /// Subtotal before coupon and credits.
    pub fn subtotal(&self) -> Money<'static, Currency> {
        Money::from_minor(self.totals.subtotal, self.currency)
    }

    /// Amount payable.
    pub fn total(&self) -> Money<'static, Currency> {
        Money::from_minor(self.totals.total, self.currency)
    }

    /// Credits applied to the cart.
    pub fn credits(&self) -> Money<'static, Currency> {
        Money::from_minor(self.totals.credits, self.currency)
    }

    /// Whether nothing is payable: credits, coupons or free items cover the purchase.
    pub fn is_purchase_free(&self) -> bool {
        self.totals.total == 0
    }

    /// Get the number of product lines.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the cart has no product lines.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
