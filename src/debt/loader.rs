//! Load debts from the JSON the debt manager form submits
//!
//! Form fields arrive either as JSON numbers or as the raw text typed by the
//! user. Both are coerced here, at the boundary, so the simulator only ever
//! sees strict numeric values.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use super::{validate_debts, Debt, DebtType};
use crate::error::LoadError;

/// Numeric form value: a JSON number or the text the user typed
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberField {
    Number(f64),
    Text(String),
}

impl NumberField {
    /// `Ok(None)` for blank text; `Err` carries the raw text of anything that is not a finite number
    pub fn value(&self) -> Result<Option<f64>, &str> {
        match self {
            NumberField::Number(value) => Ok(Some(*value)),
            NumberField::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                match trimmed.replace(',', "").parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(Some(value)),
                    _ => Err(text.as_str()),
                }
            }
        }
    }

    fn parse(&self, index: usize, field: &'static str) -> Result<Option<f64>, LoadError> {
        self.value().map_err(|raw| LoadError::InvalidNumber {
            index,
            field,
            value: raw.to_string(),
        })
    }
}

/// Raw record as posted by the form; accepts both snake_case and the form's camelCase keys
#[derive(Debug, Deserialize)]
struct DebtRecord {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type", alias = "debt_type")]
    debt_type: Option<String>,
    #[serde(alias = "principal")]
    balance: NumberField,
    #[serde(alias = "annualRate", alias = "interestRate", alias = "interest_rate")]
    annual_rate: NumberField,
    #[serde(default, alias = "minPayment")]
    min_payment: Option<NumberField>,
    #[serde(default)]
    emi: Option<NumberField>,
    #[serde(default, alias = "extraPayment")]
    extra_payment: Option<NumberField>,
    #[serde(default, alias = "emisLeft")]
    emis_left: Option<NumberField>,
}

impl DebtRecord {
    /// `position` is 1-based and doubles as the id when none was posted
    fn to_debt(self, position: usize) -> Result<Debt, LoadError> {
        let required = |field: &'static str, value: Option<f64>| {
            value.ok_or(LoadError::InvalidNumber {
                index: position,
                field,
                value: String::new(),
            })
        };

        let balance = required("balance", self.balance.parse(position, "balance")?)?;
        let annual_rate = required("annual_rate", self.annual_rate.parse(position, "annual_rate")?)?;

        // The form treats the minimum as optional and falls back to the EMI
        let min_payment = match self.min_payment.as_ref().map(|f| f.parse(position, "min_payment")).transpose()? {
            Some(Some(value)) => Some(value),
            _ => self
                .emi
                .as_ref()
                .map(|f| f.parse(position, "emi"))
                .transpose()?
                .flatten(),
        };
        let min_payment = required("min_payment", min_payment)?;

        let extra_payment = self
            .extra_payment
            .as_ref()
            .map(|f| f.parse(position, "extra_payment"))
            .transpose()?
            .flatten()
            .unwrap_or(0.0);

        let emis_left = match self.emis_left.as_ref().map(|f| f.parse(position, "emis_left")).transpose()?.flatten() {
            Some(value) if value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 => Some(value as u32),
            Some(value) => {
                return Err(LoadError::InvalidNumber {
                    index: position,
                    field: "emis_left",
                    value: value.to_string(),
                })
            }
            None => None,
        };

        let id = self.id.unwrap_or(position as u64);
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Debt {}", position));
        let debt_type = self
            .debt_type
            .as_deref()
            .map(DebtType::from_label)
            .unwrap_or_default();

        Ok(Debt {
            id,
            name,
            debt_type,
            balance,
            annual_rate,
            min_payment,
            extra_payment,
            emis_left,
        })
    }
}

/// Load and validate debts from a JSON file
pub fn load_debts<P: AsRef<Path>>(path: P) -> Result<Vec<Debt>, LoadError> {
    let file = File::open(path)?;
    load_debts_from_reader(BufReader::new(file))
}

/// Load and validate debts from any reader (e.g., request body, string buffer)
pub fn load_debts_from_reader<R: Read>(reader: R) -> Result<Vec<Debt>, LoadError> {
    let records: Vec<DebtRecord> = serde_json::from_reader(reader)?;
    records_to_debts(records)
}

/// Load and validate debts from a JSON string
pub fn load_debts_from_str(json: &str) -> Result<Vec<Debt>, LoadError> {
    load_debts_from_reader(json.as_bytes())
}

/// Load and validate debts from an already-parsed JSON value (e.g., a request field)
pub fn load_debts_from_value(value: serde_json::Value) -> Result<Vec<Debt>, LoadError> {
    let records: Vec<DebtRecord> = serde_json::from_value(value)?;
    records_to_debts(records)
}

fn records_to_debts(records: Vec<DebtRecord>) -> Result<Vec<Debt>, LoadError> {
    let debts = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| record.to_debt(i + 1))
        .collect::<Result<Vec<_>, _>>()?;

    validate_debts(&debts)?;
    for debt in debts.iter().filter(|d| !d.tenure_consistent()) {
        log::info!(
            "debt {} states {:?} installments left but its minimum projects {:?}",
            debt.id,
            debt.emis_left,
            debt.projected_months()
        );
    }
    Ok(debts)
}
