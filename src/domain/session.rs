use crate::domain::catalog::Product;
use crate::domain::money::Money;
use crate::error::VendingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the purchase flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    SelectItems,
    PayWithCard,
    PayWithCash,
    ProcessingPayment,
    PaymentFailed,
    PaymentSuccess,
    DispenseItem,
}

impl Status {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SelectItems => "select_items",
            Self::PayWithCard => "pay_with_card",
            Self::PayWithCash => "pay_with_cash",
            Self::ProcessingPayment => "processing_payment",
            Self::PaymentFailed => "payment_failed",
            Self::PaymentSuccess => "payment_success",
            Self::DispenseItem => "dispense_item",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Cash,
}

impl FromStr for PaymentMethod {
    type Err = VendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            other => Err(VendingError::ScriptError(format!(
                "Unknown payment method '{other}'"
            ))),
        }
    }
}

/// Result of handing a bill or coin to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashInsertion {
    /// Out of state, busy, a non-positive amount, or a total that would
    /// overflow. Nothing changed.
    Rejected,
    /// Counted, but the total is still below the price.
    Insufficient,
    /// Counted and the total covers the price. `busy` stays set until
    /// [`SessionState::begin_cash_settlement`].
    Sufficient,
}

/// Mutable state of one purchase session.
///
/// Each method applies a single transition and reports whether anything
/// changed. Calls made from the wrong status are ignored, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub status: Status,
    pub selected_item: Option<Product>,
    pub cash_amount: Money,
    pub busy: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `cash_amount - price` once cash has been inserted, otherwise zero.
    /// Negative while the inserted cash is still short of the price.
    pub fn change(&self) -> Money {
        match &self.selected_item {
            Some(item) if self.cash_amount.is_positive() => self.cash_amount - item.price,
            _ => Money::ZERO,
        }
    }

    /// Toggles the selection: picking the selected product again clears it.
    pub fn select_product(&mut self, item: &Product) -> bool {
        if self.status != Status::SelectItems {
            return false;
        }
        let already_selected = self
            .selected_item
            .as_ref()
            .is_some_and(|current| current.name == item.name);
        self.selected_item = if already_selected {
            None
        } else {
            Some(item.clone())
        };
        true
    }

    pub fn choose_payment_method(&mut self, method: PaymentMethod) -> bool {
        if self.status != Status::SelectItems || self.selected_item.is_none() {
            return false;
        }
        self.status = match method {
            PaymentMethod::Card => Status::PayWithCard,
            PaymentMethod::Cash => Status::PayWithCash,
        };
        true
    }

    /// Moves a card payment into processing.
    pub fn begin_card_payment(&mut self) -> bool {
        if self.status != Status::PayWithCard {
            return false;
        }
        self.status = Status::ProcessingPayment;
        true
    }

    pub fn insert_cash(&mut self, amount: Money) -> CashInsertion {
        if self.status != Status::PayWithCash || self.busy || !amount.is_positive() {
            return CashInsertion::Rejected;
        }
        let Some(price) = self.selected_item.as_ref().map(|item| item.price) else {
            return CashInsertion::Rejected;
        };

        let Some(total) = self.cash_amount.checked_add(amount) else {
            return CashInsertion::Rejected;
        };

        self.busy = true;
        self.cash_amount = total;

        if self.cash_amount < price {
            self.busy = false;
            CashInsertion::Insufficient
        } else {
            CashInsertion::Sufficient
        }
    }

    /// Releases the insertion guard and starts processing in one step.
    pub fn begin_cash_settlement(&mut self) -> bool {
        if self.status != Status::PayWithCash || !self.busy {
            return false;
        }
        self.busy = false;
        self.status = Status::ProcessingPayment;
        true
    }

    pub fn settle(&mut self, success: bool) -> bool {
        if self.status != Status::ProcessingPayment {
            return false;
        }
        self.status = if success {
            Status::PaymentSuccess
        } else {
            Status::PaymentFailed
        };
        true
    }

    /// Leaves the settled state. A failed payment only resets the status;
    /// the selection and any inserted cash are kept.
    pub fn complete(&mut self) -> bool {
        self.status = match self.status {
            Status::PaymentSuccess => Status::DispenseItem,
            Status::PaymentFailed => Status::SelectItems,
            _ => return false,
        };
        true
    }

    /// The only reset path: clears selection and cash.
    pub fn take_item(&mut self) -> bool {
        if self.status != Status::DispenseItem {
            return false;
        }
        self.selected_item = None;
        self.cash_amount = Money::ZERO;
        self.status = Status::SelectItems;
        true
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            selected_item: self.selected_item.clone(),
            cash_amount: self.cash_amount,
            change: self.change(),
            busy: self.busy,
        }
    }
}

/// The read model handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub status: Status,
    pub selected_item: Option<Product>,
    pub cash_amount: Money,
    pub change: Money,
    pub busy: bool,
}
