use crate::config::SessionConfig;
use crate::domain::catalog::{Catalog, Product};
use crate::domain::money::Money;
use crate::domain::ports::CatalogSource;
use crate::domain::session::{CashInsertion, PaymentMethod, SessionSnapshot, SessionState};
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// The purchase session controller.
///
/// `PurchaseSession` owns the state of a single purchase and exposes the
/// operations a presentation layer drives it with. State lives in a
/// `watch` channel: every check-and-mutate runs inside one
/// `send_if_modified` call, and every effective change wakes subscribers.
///
/// The handle is cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct PurchaseSession {
    catalog: Arc<Catalog>,
    state: Arc<watch::Sender<SessionState>>,
    config: SessionConfig,
}

impl PurchaseSession {
    /// Creates a session over an already loaded catalog, starting in
    /// `SelectItems` with nothing selected.
    pub fn new(catalog: Catalog, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(SessionState::new());
        Self {
            catalog: Arc::new(catalog),
            state: Arc::new(state),
            config,
        }
    }

    /// Loads the catalog from `source` and opens a session over it.
    pub async fn open(source: &dyn CatalogSource, config: SessionConfig) -> Result<Self> {
        let catalog = source.load().await?;
        info!(
            products = catalog.products().len(),
            denominations = catalog.cash_denominations().len(),
            "Catalog loaded"
        );
        Ok(Self::new(catalog, config))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current read model.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().snapshot()
    }

    /// Receiver that is notified after every effective state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn select_product(&self, item: &Product) -> bool {
        self.apply("select_product", |state| state.select_product(item))
    }

    pub fn choose_payment_method(&self, method: PaymentMethod) -> bool {
        self.apply("choose_payment_method", |state| {
            state.choose_payment_method(method)
        })
    }

    /// Runs the payment sequence for a card. Resolves once the sequence has
    /// finished, or immediately with `false` outside `PayWithCard`.
    pub async fn submit_card(&self, valid: bool) -> bool {
        if !self.apply("submit_card", SessionState::begin_card_payment) {
            return false;
        }
        self.process_payment(valid).await;
        true
    }

    /// Counts `amount` towards the selected product's price.
    ///
    /// Returns `false` without touching the state when called outside
    /// `PayWithCash`, with a non-positive amount, or while a previous
    /// insertion is still being processed. Once the total covers the price
    /// this waits out the processing interval and the whole payment sequence
    /// before resolving.
    pub async fn insert_cash(&self, amount: Money) -> bool {
        let mut outcome = CashInsertion::Rejected;
        self.apply("insert_cash", |state| {
            outcome = state.insert_cash(amount);
            outcome != CashInsertion::Rejected
        });

        match outcome {
            CashInsertion::Rejected => false,
            CashInsertion::Insufficient => true,
            CashInsertion::Sufficient => {
                tokio::time::sleep(self.config.settlement_delay).await;
                self.apply("cash_settlement", SessionState::begin_cash_settlement);
                self.process_payment(true).await;
                true
            }
        }
    }

    /// Acknowledges the dispensed item and starts over.
    pub fn take_item(&self) -> bool {
        self.apply("take_item", SessionState::take_item)
    }

    // Callers have already moved the session into ProcessingPayment.
    async fn process_payment(&self, success: bool) {
        tokio::time::sleep(self.config.settlement_delay).await;
        self.apply("settle_payment", |state| state.settle(success));
        tokio::time::sleep(self.config.settlement_delay).await;
        self.apply("complete_payment", SessionState::complete);
    }

    fn apply(&self, op: &'static str, f: impl FnOnce(&mut SessionState) -> bool) -> bool {
        let applied = self.state.send_if_modified(f);
        if applied {
            let state = self.state.borrow();
            info!(
                op,
                status = %state.status,
                selected = state.selected_item.as_ref().map(|p| p.name.as_str()),
                cash = state.cash_amount.value(),
                busy = state.busy,
                "Session updated"
            );
        } else {
            debug!(op, status = %self.state.borrow().status, "Ignored out-of-state call");
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::Status;
    use crate::infrastructure::in_memory::StaticCatalog;
    use std::time::Duration;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                Product::new("콜라", 1100).unwrap(),
                Product::new("물", 600).unwrap(),
                Product::new("주스", 1500).unwrap(),
            ],
            vec![Money::new(100), Money::new(500), Money::new(1000)],
        )
        .unwrap()
    }

    fn session() -> PurchaseSession {
        PurchaseSession::new(catalog(), SessionConfig::default())
    }

    fn product(session: &PurchaseSession, name: &str) -> Product {
        session.catalog().find_product(name).unwrap().clone()
    }

    /// Collects every status the session passes through until `until` is seen.
    fn record_statuses(
        session: &PurchaseSession,
        until: Status,
    ) -> tokio::task::JoinHandle<Vec<Status>> {
        let mut rx = session.subscribe();
        let initial = rx.borrow_and_update().status;
        tokio::spawn(async move {
            let mut seen = vec![initial];
            while rx.changed().await.is_ok() {
                let status = rx.borrow_and_update().status;
                if seen.last() != Some(&status) {
                    seen.push(status);
                }
                if status == until {
                    break;
                }
            }
            seen
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_loads_catalog_from_source() {
        let session = PurchaseSession::open(&StaticCatalog::default(), SessionConfig::default())
            .await
            .unwrap();
        assert!(session.catalog().find_product("콜라").is_some());
        assert_eq!(session.snapshot().status, Status::SelectItems);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_select_clears_selection() {
        let session = session();
        let cola = product(&session, "콜라");

        assert!(session.select_product(&cola));
        assert_eq!(session.snapshot().selected_item, Some(cola.clone()));
        assert!(session.select_product(&cola));
        assert_eq!(session.snapshot().selected_item, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cash_path_reaches_dispense_with_change() {
        let session = session();
        let juice = product(&session, "주스");
        session.select_product(&juice);
        assert!(session.choose_payment_method(PaymentMethod::Cash));

        assert!(session.insert_cash(Money::new(1000)).await);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, Status::PayWithCash);
        assert_eq!(snapshot.cash_amount, Money::new(1000));

        let recorder = record_statuses(&session, Status::DispenseItem);
        assert!(session.insert_cash(Money::new(1000)).await);

        let statuses = recorder.await.unwrap();
        assert_eq!(
            statuses,
            vec![
                Status::PayWithCash,
                Status::ProcessingPayment,
                Status::PaymentSuccess,
                Status::DispenseItem,
            ]
        );

        let snapshot = session.snapshot();
        assert_eq!(snapshot.cash_amount, Money::new(2000));
        assert_eq!(snapshot.change, Money::new(500));
        assert!(!snapshot.busy);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_card_returns_to_selection() {
        let session = session();
        let cola = product(&session, "콜라");
        session.select_product(&cola);
        session.choose_payment_method(PaymentMethod::Card);

        let recorder = record_statuses(&session, Status::SelectItems);
        assert!(session.submit_card(false).await);

        assert_eq!(
            recorder.await.unwrap(),
            vec![
                Status::PayWithCard,
                Status::ProcessingPayment,
                Status::PaymentFailed,
                Status::SelectItems,
            ]
        );
        assert_eq!(session.snapshot().selected_item, Some(cola));
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_card_dispenses_without_change() {
        let session = session();
        session.select_product(&product(&session, "물"));
        session.choose_payment_method(PaymentMethod::Card);

        assert!(session.submit_card(true).await);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, Status::DispenseItem);
        assert_eq!(snapshot.change, Money::ZERO);

        assert!(session.take_item());
        assert_eq!(session.snapshot().status, Status::SelectItems);
        assert_eq!(session.snapshot().selected_item, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_card_ignored_outside_card_payment() {
        let session = session();
        assert!(!session.submit_card(true).await);

        session.select_product(&product(&session, "물"));
        session.choose_payment_method(PaymentMethod::Cash);
        assert!(!session.submit_card(true).await);
        assert_eq!(session.snapshot().status, Status::PayWithCash);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reentrant_insert_is_ignored() {
        let session = session();
        session.select_product(&product(&session, "콜라"));
        session.choose_payment_method(PaymentMethod::Cash);

        let mut rx = session.subscribe();
        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.insert_cash(Money::new(1500)).await })
        };
        rx.wait_for(|state| state.busy).await.unwrap();

        assert!(!session.insert_cash(Money::new(500)).await);
        assert_eq!(session.snapshot().cash_amount, Money::new(1500));

        assert!(pending.await.unwrap());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, Status::DispenseItem);
        assert_eq!(snapshot.cash_amount, Money::new(1500));
        assert_eq!(snapshot.change, Money::new(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_take_item_is_noop_outside_dispense() {
        let session = session();
        assert!(!session.take_item());

        session.select_product(&product(&session, "콜라"));
        session.choose_payment_method(PaymentMethod::Cash);
        session.insert_cash(Money::new(500)).await;
        assert!(!session.take_item());
        assert_eq!(session.snapshot().cash_amount, Money::new(500));
        assert_eq!(session.snapshot().status, Status::PayWithCash);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settlement_uses_configured_delay() {
        let session = PurchaseSession::new(catalog(), SessionConfig::with_delay_millis(50));
        session.select_product(&product(&session, "물"));
        session.choose_payment_method(PaymentMethod::Card);

        let start = tokio::time::Instant::now();
        session.submit_card(true).await;
        assert_eq!(start.elapsed(), Duration::from_millis(100));
    }
}
