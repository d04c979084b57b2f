//! Order submission.
//!
//! There is no order backend: submitting validates the form, waits to
//! stand in for the network round trip, logs the payload, empties the store
//! and moves the shopper to the confirmation page after a second pause.

use crate::checkout::{validate, CheckoutForm, OrderPayload};
use crate::error::CommerceError;
use crate::navigation::{Navigator, Notifier, Route};
use crate::pricing::PricingPolicy;
use crate::store::LineItemStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Message shown when an order goes through.
pub const ORDER_PLACED: &str = "Order placed successfully!";

/// Message shown when the payload cannot be assembled.
pub const ORDER_FAILED: &str = "Failed to place order";

/// Where a submission stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success,
    Failed,
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Success => "success",
            SubmissionState::Failed => "failed",
        }
    }
}

/// Artificial delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionConfig {
    /// Pause standing in for the order request.
    pub submit_delay: Duration,
    /// Pause between the success message and the confirmation page.
    pub redirect_delay: Duration,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            submit_delay: Duration::from_secs(2),
            redirect_delay: Duration::from_secs(2),
        }
    }
}

/// Drives one checkout page's submissions.
pub struct OrderSubmitter {
    state: watch::Sender<SubmissionState>,
    config: SubmissionConfig,
    policy: PricingPolicy,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl OrderSubmitter {
    pub fn new(notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            state: watch::Sender::new(SubmissionState::Idle),
            config: SubmissionConfig::default(),
            policy: PricingPolicy::default(),
            notifier,
            navigator,
        }
    }

    pub fn with_config(mut self, config: SubmissionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_policy(mut self, policy: PricingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> SubmissionState {
        *self.state.borrow()
    }

    /// Follow state changes, including while `submit` is in flight.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Form inputs are locked while an order is in flight.
    pub fn inputs_disabled(&self) -> bool {
        self.state() == SubmissionState::Submitting
    }

    /// Return to Idle after a finished submission.
    pub fn reset(&mut self) {
        if self.state() != SubmissionState::Submitting {
            self.state.send_replace(SubmissionState::Idle);
        }
    }

    /// Submit the order.
    ///
    /// On a validation failure the shopper is told why and nothing changes.
    /// The store is only cleared once the payload has been built. Dropping
    /// the future before then puts the submitter back to Idle.
    pub async fn submit(
        &mut self,
        store: &mut LineItemStore,
        form: &CheckoutForm,
    ) -> Result<OrderPayload, CommerceError> {
        if self.state() == SubmissionState::Submitting {
            return Err(CommerceError::SubmissionInProgress);
        }
        self.state.send_replace(SubmissionState::Idle);

        if let Err(e) = validate(form, store.effective_items()) {
            tracing::debug!(reason = %e, "checkout rejected");
            self.notifier.error(&e.to_string());
            return Err(e.into());
        }

        let _guard = InFlight::enter(&self.state);
        tokio::time::sleep(self.config.submit_delay).await;

        let payload = match OrderPayload::build(store, form, &self.policy, chrono::Utc::now()) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(target: "bazaar::orders", error = %e, "order payload could not be built");
                self.state.send_replace(SubmissionState::Failed);
                self.notifier.error(ORDER_FAILED);
                self.state.send_replace(SubmissionState::Idle);
                return Err(e);
            }
        };

        match payload.to_json() {
            Ok(json) => tracing::info!(
                target: "bazaar::orders",
                total = %payload.total_amount,
                preorder = payload.is_preorder,
                payload = %json,
                "order placed"
            ),
            Err(e) => tracing::warn!(target: "bazaar::orders", error = %e, "order placed, payload not loggable"),
        }

        store.clear_cart();
        store.clear_preorder();
        self.notifier.success(ORDER_PLACED);
        self.state.send_replace(SubmissionState::Success);

        tokio::time::sleep(self.config.redirect_delay).await;
        self.navigator.navigate(Route::OrderConfirmation);

        Ok(payload)
    }
}

/// Marks a submission in flight; falls back to Idle if still Submitting when dropped.
struct InFlight<'a> {
    state: &'a watch::Sender<SubmissionState>,
}

impl<'a> InFlight<'a> {
    fn enter(state: &'a watch::Sender<SubmissionState>) -> Self {
        state.send_replace(SubmissionState::Submitting);
        Self { state }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            if *state == SubmissionState::Submitting {
                tracing::debug!("submission abandoned before completion");
                *state = SubmissionState::Idle;
                true
            } else {
                false
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};
    use crate::navigation::LogNotifier;
    use crate::pricing::DeliveryArea;
    use crate::store::AddItem;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        messages: Mutex<Vec<(bool, String)>>,
        routes: Mutex<Vec<Route>>,
    }

    impl Notifier for Recorder {
        fn success(&self, message: &str) {
            self.messages.lock().unwrap().push((true, message.to_string()));
        }
        fn error(&self, message: &str) {
            self.messages.lock().unwrap().push((false, message.to_string()));
        }
    }

    impl Navigator for Recorder {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    fn submitter(recorder: &Arc<Recorder>) -> OrderSubmitter {
        OrderSubmitter::new(recorder.clone(), recorder.clone())
    }

    fn form() -> CheckoutForm {
        CheckoutForm::new()
            .name("Karim")
            .phone("01812345678")
            .address("Mirpur 10")
            .delivery_area(DeliveryArea::OutsideDhaka)
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_places_order() {
        let recorder = Arc::new(Recorder::default());
        let mut submitter = submitter(&recorder);
        let mut store = LineItemStore::new(Currency::BDT);
        store
            .add_item(AddItem::new("p-1", "Kurti", Money::from_major(900, Currency::BDT)))
            .unwrap();

        let payload = submitter.submit(&mut store, &form()).await.unwrap();

        assert_eq!(payload.total_amount, Money::from_major(1000, Currency::BDT));
        assert!(store.is_empty());
        assert_eq!(submitter.state(), SubmissionState::Success);
        assert_eq!(*recorder.routes.lock().unwrap(), vec![Route::OrderConfirmation]);
        assert_eq!(
            *recorder.messages.lock().unwrap(),
            vec![(true, ORDER_PLACED.to_string())]
        );

        submitter.reset();
        assert_eq!(submitter.state(), SubmissionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_with_log_notifier() {
        let recorder = Arc::new(Recorder::default());
        let mut submitter = OrderSubmitter::new(Arc::new(LogNotifier), recorder.clone());
        let mut store = LineItemStore::new(Currency::BDT);
        store
            .add_item(AddItem::new("p-1", "Kurti", Money::from_major(900, Currency::BDT)))
            .unwrap();

        submitter.submit(&mut store, &form()).await.unwrap();

        assert!(store.is_empty());
        assert!(recorder.messages.lock().unwrap().is_empty());
        assert_eq!(*recorder.routes.lock().unwrap(), vec![Route::OrderConfirmation]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overflowing_total_fails_and_keeps_store() {
        let recorder = Arc::new(Recorder::default());
        let mut submitter = submitter(&recorder);
        let mut store = LineItemStore::new(Currency::BDT);
        store
            .add_item(AddItem::new("p-1", "Gold", Money::new(i64::MAX / 2, Currency::BDT)).quantity(3))
            .unwrap();
        let before = store.clone();

        let err = submitter.submit(&mut store, &form()).await.unwrap_err();

        assert!(matches!(err, CommerceError::Overflow));
        assert_eq!(store, before);
        assert_eq!(submitter.state(), SubmissionState::Idle);
        assert_eq!(
            *recorder.messages.lock().unwrap(),
            vec![(false, ORDER_FAILED.to_string())]
        );
        assert!(recorder.routes.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_inputs_disabled_while_submitting() {
        let recorder = Arc::new(Recorder::default());
        let mut submitter = submitter(&recorder).with_config(SubmissionConfig {
            submit_delay: Duration::from_millis(1500),
            redirect_delay: Duration::from_millis(500),
        });
        let watcher = submitter.subscribe();
        let mut store = LineItemStore::new(Currency::BDT);
        store
            .add_item(AddItem::new("p-1", "Kurti", Money::from_major(900, Currency::BDT)))
            .unwrap();
        let form = form();

        {
            let fut = submitter.submit(&mut store, &form);
            tokio::pin!(fut);
            assert!(futures::poll!(fut.as_mut()).is_pending());
            assert_eq!(*watcher.borrow(), SubmissionState::Submitting);
            fut.await.unwrap();
        }
        assert_eq!(*watcher.borrow(), SubmissionState::Success);
        assert!(!submitter.inputs_disabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submission_returns_to_idle() {
        let recorder = Arc::new(Recorder::default());
        let mut submitter = submitter(&recorder);
        let mut store = LineItemStore::new(Currency::BDT);
        store
            .add_item(AddItem::new("p-1", "Kurti", Money::from_major(900, Currency::BDT)))
            .unwrap();
        let before = store.clone();
        let form = form();

        {
            let fut = submitter.submit(&mut store, &form);
            tokio::pin!(fut);
            assert!(futures::poll!(fut.as_mut()).is_pending());
        }

        assert_eq!(submitter.state(), SubmissionState::Idle);
        assert!(!submitter.inputs_disabled());
        assert_eq!(store, before);
        assert!(recorder.messages.lock().unwrap().is_empty());

        let payload = submitter.submit(&mut store, &form).await.unwrap();
        assert_eq!(payload.total_amount, Money::from_major(1000, Currency::BDT));
        assert_eq!(submitter.state(), SubmissionState::Success);
    }
}
