//! Cart review prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    adjustments::{AdjustmentItems, CouponLineItem, CreditsLineItem, derive_adjustment_items},
    cart::{AppliedCoupon, Cart, CartError, CartTotals},
    classification::{ProductClassifier, SlugClassifier, SlugSets},
    commands::{CartCommand, CartMutation, CartMutationRequest, CommandError, apply_command},
    coupon::{CouponAffordance, CouponField, CouponStatus},
    engine::{Affordance, CartReviewEngine, FailureKind, FormStatus, InlineFailure, SubmitError},
    products::{CartProduct, LineItemUuid, PurchaseType, VariantId},
    review::{
        OrderReview, ReviewLineItem, ReviewOptions, derive_review,
        site::{SiteContext, SiteSummary},
    },
    rules::{DeletionVeto, VariantLock, compute_deletability, compute_variant_selector_visible},
    service::{CartService, CartServiceError, InMemoryCartService},
};
