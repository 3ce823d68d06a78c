//! Cart review engine
//!
//! Owns the last good cart snapshot and the transient coupon-entry state,
//! exposes derived review state to the presentation layer, and forwards
//! validated commands to the cart service one at a time.

use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{
    adjustments::AdjustmentItems,
    cart::Cart,
    classification::ProductClassifier,
    commands::{CartCommand, CommandError, apply_command},
    coupon::{CouponAffordance, CouponField, CouponStatus, coupon_affordance},
    products::LineItemUuid,
    review::{
        OrderReview, ReviewOptions, derive_review,
        site::{SiteContext, SiteSummary, site_summary},
    },
    service::{CartService, CartServiceError},
};

/// Whether the review accepts new cart commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormStatus {
    /// Idle; commands are accepted.
    #[default]
    Ready,

    /// A cart update is in flight; commands are refused.
    Updating,
}

/// The control a failure is shown next to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affordance {
    /// The coupon input or the coupon row's delete button.
    CouponField,

    /// A product row's delete button.
    DeleteButton(LineItemUuid),

    /// A product row's variant selector.
    VariantPicker(LineItemUuid),

    /// Not tied to a single control (snapshot refresh).
    Review,
}

impl Affordance {
    fn for_command(command: &CartCommand) -> Self {
        match command {
            CartCommand::ApplyCoupon(_) | CartCommand::RemoveCoupon => Self::CouponField,
            CartCommand::RemoveProduct(uuid) => Self::DeleteButton(uuid.clone()),
            CartCommand::ChangeVariant(uuid, _) => Self::VariantPicker(uuid.clone()),
        }
    }
}

/// How a failure is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The coupon code was rejected; the customer can correct it.
    InvalidCoupon,

    /// Something went wrong upstream; offer to retry.
    Retry,
}

/// Failure indicator attached to one control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineFailure {
    /// Control the indicator belongs to.
    pub affordance: Affordance,

    /// Indicator kind.
    pub kind: FailureKind,
}

/// Errors surfaced by [`CartReviewEngine::submit`] and [`CartReviewEngine::refresh`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Another cart update is still in flight.
    #[error("another cart update is in progress")]
    NotReady,

    /// The command was refused locally and never sent.
    #[error(transparent)]
    LocalGuardRejection(#[from] CommandError),

    /// The cart service rejected the coupon code.
    #[error("coupon code {0} is not valid")]
    InvalidCoupon(String),

    /// The cart service could not be reached.
    #[error("cart service unavailable: {0}")]
    NetworkFailure(String),

    /// The cart service refused the update.
    #[error("cart update rejected: {0}")]
    ValidationFailure(String),
}

impl From<CartServiceError> for SubmitError {
    fn from(error: CartServiceError) -> Self {
        match error {
            CartServiceError::InvalidCoupon(code) => Self::InvalidCoupon(code),
            CartServiceError::NetworkFailure(reason) => Self::NetworkFailure(reason),
            CartServiceError::ValidationFailure(reason) => Self::ValidationFailure(reason),
        }
    }
}

#[derive(Debug)]
struct Session {
    snapshot: Cart,
    review: OrderReview,
    form_status: FormStatus,
    coupon_status: CouponStatus,
    coupon_field: CouponField,
    failure: Option<InlineFailure>,
}

impl Session {
    fn new(snapshot: Cart, classifier: &impl ProductClassifier, options: ReviewOptions) -> Self {
        let review = derive_review(&snapshot, classifier, options);
        let coupon_status = CouponStatus::from_cart(&snapshot);

        Self {
            snapshot,
            review,
            form_status: FormStatus::Ready,
            coupon_status,
            coupon_field: CouponField::default(),
            failure: None,
        }
    }

    /// Replace the snapshot and rebuild every piece of derived state from it.
    fn accept(
        &mut self,
        snapshot: Cart,
        classifier: &impl ProductClassifier,
        options: ReviewOptions,
    ) {
        self.review = derive_review(&snapshot, classifier, options);
        self.coupon_status = CouponStatus::from_cart(&snapshot);
        self.snapshot = snapshot;
        self.form_status = FormStatus::Ready;
        self.failure = None;

        if self.coupon_status == CouponStatus::Applied {
            self.coupon_field.clear_value();
        }
    }
}

/// Restores the session to `Ready` if a submission is abandoned mid-flight.
struct InFlight<'e> {
    session: &'e Mutex<Session>,
    previous_coupon_status: CouponStatus,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self) -> CouponStatus {
        self.settled = true;
        self.previous_coupon_status
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        session.form_status = FormStatus::Ready;
        session.coupon_status = self.previous_coupon_status;
        debug!("cart update abandoned before completion");
    }
}

/// Review state for one checkout, kept consistent with an external cart.
#[derive(Debug)]
pub struct CartReviewEngine<S, C> {
    service: S,
    classifier: C,
    options: ReviewOptions,
    session: Mutex<Session>,
}

impl<S: CartService, C: ProductClassifier> CartReviewEngine<S, C> {
    /// Create an engine over an already fetched snapshot.
    pub fn new(service: S, classifier: C, options: ReviewOptions, snapshot: Cart) -> Self {
        let session = Session::new(snapshot, &classifier, options);

        Self {
            service,
            classifier,
            options,
            session: Mutex::new(session),
        }
    }

    /// Fetch the first snapshot from the service and create an engine over it.
    ///
    /// # Errors
    ///
    /// Returns the service error if the snapshot cannot be read.
    pub async fn load(
        service: S,
        classifier: C,
        options: ReviewOptions,
    ) -> Result<Self, CartServiceError> {
        let snapshot = service.get_cart_snapshot().await?;

        info!(products = snapshot.len(), "cart review loaded");

        Ok(Self::new(service, classifier, options, snapshot))
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the product line can be removed. Unknown uuids are not deletable.
    pub fn deletable(&self, uuid: &LineItemUuid) -> bool {
        self.lock().review.deletable(uuid)
    }

    /// Whether the product line offers a variant selector.
    pub fn variant_selector_visible(&self, uuid: &LineItemUuid) -> bool {
        self.lock().review.variant_selector_visible(uuid)
    }

    /// Coupon and credits rows for the current snapshot.
    pub fn adjustment_items(&self) -> AdjustmentItems {
        self.lock().review.adjustments.clone()
    }

    /// Full review state for the current snapshot.
    pub fn review(&self) -> OrderReview {
        self.lock().review.clone()
    }

    /// The last good snapshot.
    pub fn snapshot(&self) -> Cart {
        self.lock().snapshot.clone()
    }

    /// Whether commands are currently accepted.
    pub fn form_status(&self) -> FormStatus {
        self.lock().form_status
    }

    /// Coupon status signal.
    pub fn coupon_status(&self) -> CouponStatus {
        self.lock().coupon_status
    }

    /// Current coupon-entry state.
    pub fn coupon_field(&self) -> CouponField {
        self.lock().coupon_field.clone()
    }

    /// What the coupon area shows.
    pub fn coupon_affordance(&self) -> CouponAffordance {
        let session = self.lock();

        coupon_affordance(
            &session.snapshot,
            session.coupon_status,
            &session.coupon_field,
            session.form_status == FormStatus::Ready,
        )
    }

    /// Failure indicator from the last command, if it failed upstream.
    pub fn inline_failure(&self) -> Option<InlineFailure> {
        self.lock().failure.clone()
    }

    /// Site heading for the current snapshot.
    pub fn site_summary(&self, site: Option<&SiteContext>) -> Option<SiteSummary> {
        site_summary(&self.lock().snapshot, site, &self.classifier)
    }

    /// Open the coupon input.
    pub fn show_coupon_field(&self) {
        self.lock().coupon_field.show();
    }

    /// Record what the customer has typed into the coupon input.
    pub fn set_coupon_field_value(&self, value: impl Into<String>) {
        self.lock().coupon_field.set_value(value);
    }

    /// Validate a command, forward it to the cart service and adopt the resulting snapshot.
    ///
    /// Only one command is in flight at a time. On failure the last good
    /// snapshot stays in place and an [`InlineFailure`] marks the control that
    /// issued the command.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitError`] when another update is in flight, the command
    /// is refused locally, or the cart service reports a failure.
    #[instrument(skip(self, command), fields(command = command.name()))]
    pub async fn submit(&self, command: CartCommand) -> Result<(), SubmitError> {
        let (request, guard) = {
            let mut session = self.lock();

            if session.form_status != FormStatus::Ready {
                warn!("command refused while another cart update is in flight");
                return Err(SubmitError::NotReady);
            }

            let request =
                match apply_command(&command, &session.snapshot, &self.classifier, self.options) {
                    Ok(request) => request,
                    Err(error) => {
                        debug!(%error, ?command, "command rejected by local guard");
                        return Err(SubmitError::LocalGuardRejection(error));
                    }
                };

            let guard = InFlight {
                session: &self.session,
                previous_coupon_status: session.coupon_status,
                settled: false,
            };

            session.form_status = FormStatus::Updating;
            session.failure = None;

            match &command {
                CartCommand::ApplyCoupon(_) => session.coupon_status = CouponStatus::Pending,
                CartCommand::RemoveCoupon => session.coupon_field.reset(),
                CartCommand::RemoveProduct(_) | CartCommand::ChangeVariant(..) => {}
            }

            (request, guard)
        };

        debug!(request_id = %request.request_id, "forwarding cart mutation");

        let result = self.service.submit_mutation(request).await;
        let previous_coupon_status = guard.settle();

        let mut session = self.lock();

        match result {
            Ok(snapshot) => {
                session.accept(snapshot, &self.classifier, self.options);
                info!(coupon_status = ?session.coupon_status, "cart updated");

                Ok(())
            }
            Err(error) => {
                session.form_status = FormStatus::Ready;

                let rejected_coupon = matches!(command, CartCommand::ApplyCoupon(_))
                    && matches!(error, CartServiceError::InvalidCoupon(_));

                let kind = if rejected_coupon {
                    session.coupon_status = CouponStatus::Invalid;
                    FailureKind::InvalidCoupon
                } else {
                    session.coupon_status = previous_coupon_status;
                    FailureKind::Retry
                };

                session.failure = Some(InlineFailure {
                    affordance: Affordance::for_command(&command),
                    kind,
                });

                warn!(%error, "cart update failed");

                Err(error.into())
            }
        }
    }

    /// Re-read the snapshot from the cart service.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitError`] when an update is in flight or the service fails.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), SubmitError> {
        let guard = {
            let mut session = self.lock();

            if session.form_status != FormStatus::Ready {
                return Err(SubmitError::NotReady);
            }

            session.form_status = FormStatus::Updating;

            InFlight {
                session: &self.session,
                previous_coupon_status: session.coupon_status,
                settled: false,
            }
        };

        let result = self.service.get_cart_snapshot().await;
        guard.settle();

        let mut session = self.lock();

        match result {
            Ok(snapshot) => {
                session.accept(snapshot, &self.classifier, self.options);
                Ok(())
            }
            Err(error) => {
                session.form_status = FormStatus::Ready;
                session.failure = Some(InlineFailure {
                    affordance: Affordance::Review,
                    kind: FailureKind::Retry,
                });

                warn!(%error, "cart refresh failed");

                Err(error.into())
            }
        }
    }
}
