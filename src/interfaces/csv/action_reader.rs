use crate::domain::money::Money;
use crate::error::{Result, VendingError};
use crate::interfaces::script::Action;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum ActionType {
    Select,
    Pay,
    Cash,
    Card,
    Take,
}

#[derive(Debug, Deserialize)]
struct ActionRecord {
    action: ActionType,
    value: Option<String>,
}

impl TryFrom<ActionRecord> for Action {
    type Error = VendingError;

    fn try_from(record: ActionRecord) -> Result<Self> {
        let value = record.value.as_deref().map(str::trim).unwrap_or_default();
        let missing = || VendingError::ScriptError(format!("{:?} requires a value", record.action));

        match record.action {
            ActionType::Select if value.is_empty() => Err(missing()),
            ActionType::Select => Ok(Action::Select(value.to_string())),
            ActionType::Pay if value.is_empty() => Err(missing()),
            ActionType::Pay => Ok(Action::Pay(value.parse()?)),
            ActionType::Cash => {
                let won = value.parse::<i64>().map_err(|_| {
                    VendingError::ScriptError(format!("Invalid cash amount '{value}'"))
                })?;
                Ok(Action::Cash(Money::positive(won)?))
            }
            ActionType::Card => match value.to_ascii_lowercase().as_str() {
                "valid" | "true" => Ok(Action::Card { valid: true }),
                "invalid" | "false" => Ok(Action::Card { valid: false }),
                other => Err(VendingError::ScriptError(format!(
                    "Card must be 'valid' or 'invalid', got '{other}'"
                ))),
            },
            ActionType::Take => Ok(Action::Take),
        }
    }
}

/// Reads scripted actions from a CSV source with an `action, value` header.
///
/// Whitespace is trimmed and the value column may be omitted on rows that
/// need none (`take`).
pub struct ActionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ActionReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily parses each row. A bad row yields an error and reading carries on.
    pub fn actions(self) -> impl Iterator<Item = Result<Action>> {
        self.reader.into_deserialize::<ActionRecord>().map(|result| {
            result
                .map_err(VendingError::from)
                .and_then(Action::try_from)
        })
    }
}
