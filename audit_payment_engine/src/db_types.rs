use std::{collections::HashMap, fmt::Display, str::FromStr};

use apg_common::{Paise, INR_CURRENCY_CODE};
use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------   OrderStatusType     -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order has been created; no verified payment has been reconciled against it yet.
    Pending,
    /// A payment callback was verified against this order and the payment is captured.
    Completed,
    /// Verification for this order was rejected (forged signature, amount tamper, or the processor reported failure).
    Failed,
}

impl OrderStatusType {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatusType::Pending)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "Pending"),
            OrderStatusType::Completed => write!(f, "Completed"),
            OrderStatusType::Failed => write!(f, "Failed"),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderStatusType::Pending
        })
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            "Failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------      Customer        --------------------------------------------------------
/// Purchaser contact details. Opaque to the engine; validation (if any) happens upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// The website the audit was purchased for.
    #[serde(default)]
    pub website: String,
}

//--------------------------------------        Order         --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    /// Locally-generated primary key.
    pub id: i64,
    /// The order id assigned by the payment processor. Assigned exactly once, never reassigned.
    pub gateway_order_id: Option<String>,
    /// The payment id reported in the verified callback. Immutable once set.
    pub gateway_payment_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_website: String,
    pub amount: Paise,
    pub currency: String,
    /// Merchant-side reference token handed to the processor at order creation.
    pub receipt: String,
    /// Free-form metadata, stored as the JSON text supplied at creation.
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: OrderStatusType,
}

impl Order {
    pub fn customer(&self) -> Customer {
        Customer {
            name: self.customer_name.clone(),
            email: self.customer_email.clone(),
            phone: self.customer_phone.clone(),
            website: self.customer_website.clone(),
        }
    }
}

//--------------------------------------       NewOrder       --------------------------------------------------------
/// The insert shape for a purchase attempt. The store forces the status to `Pending`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer: Customer,
    /// The amount in minor currency units
    pub amount: Paise,
    /// Three-letter currency code
    pub currency: String,
    /// Merchant reference token; must be practically unique per attempt
    pub receipt: String,
    /// Free-form metadata map
    pub notes: HashMap<String, String>,
}

impl NewOrder {
    pub fn new(amount: Paise, receipt: String) -> Self {
        Self {
            customer: Customer::default(),
            amount,
            currency: INR_CURRENCY_CODE.to_string(),
            receipt,
            notes: HashMap::new(),
        }
    }

    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = customer;
        self
    }

    pub fn with_currency<S: Into<String>>(mut self, currency: S) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_notes(mut self, notes: HashMap<String, String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn notes_as_json(&self) -> Option<String> {
        if self.notes.is_empty() {
            None
        } else {
            serde_json::to_string(&self.notes).ok()
        }
    }
}
