use crate::application::session::PurchaseSession;
use crate::domain::money::Money;
use crate::domain::session::PaymentMethod;
use crate::error::{Result, VendingError};

/// One user interaction with the machine, as read from a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Select(String),
    Pay(PaymentMethod),
    Cash(Money),
    Card { valid: bool },
    Take,
}

impl Action {
    /// Drives `session` with this action.
    ///
    /// Returns whether the session accepted it; out-of-state actions yield
    /// `Ok(false)`. Products missing from the catalog and cash the machine
    /// does not take are errors, since they could never have been offered.
    pub async fn apply(self, session: &PurchaseSession) -> Result<bool> {
        match self {
            Action::Select(name) => {
                let product = session
                    .catalog()
                    .find_product(&name)
                    .cloned()
                    .ok_or_else(|| VendingError::ScriptError(format!("Unknown product '{name}'")))?;
                Ok(session.select_product(&product))
            }
            Action::Pay(method) => Ok(session.choose_payment_method(method)),
            Action::Cash(amount) => {
                if !session.catalog().accepts(amount) {
                    return Err(VendingError::ScriptError(format!(
                        "Denomination {amount} is not accepted"
                    )));
                }
                Ok(session.insert_cash(amount).await)
            }
            Action::Card { valid } => Ok(session.submit_card(valid).await),
            Action::Take => Ok(session.take_item()),
        }
    }
}
