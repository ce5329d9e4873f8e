//! Transaction model
//!
//! A transaction is a single inflow or outflow of the charity's funds. Its
//! flow decides which side of the ledger it counts toward, and its category
//! must belong to that flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::TransactionId;
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Flow {
    Income,
    Expense,
}

impl Flow {
    pub const ALL: [Flow; 2] = [Flow::Income, Flow::Expense];

    /// Stable upper-case code used in files ("INCOME" / "EXPENSE")
    pub fn code(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    pub fn persian_label(&self) -> &'static str {
        match self {
            Self::Income => "ورودی",
            Self::Expense => "خروجی",
        }
    }

    /// Categories that may be used with this flow
    pub fn categories(&self) -> &'static [Category] {
        match self {
            Self::Income => &Category::INCOME,
            Self::Expense => &Category::EXPENSE,
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for Flow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Flow::ALL
            .into_iter()
            .find(|flow| s.eq_ignore_ascii_case(flow.code()) || s == flow.persian_label())
            .or_else(|| match s.to_ascii_lowercase().as_str() {
                "in" | "inflow" => Some(Flow::Income),
                "out" | "outflow" => Some(Flow::Expense),
                _ => None,
            })
            .ok_or_else(|| format!("Unknown flow: {}", s))
    }
}

/// What a transaction was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    // Income
    CompanyContribution,
    ShopRental,
    DirectDonation,
    // Expense
    Groceries,
    Stationery,
    AnimalSacrifice,
    Bread,
    Other,
}

impl Category {
    pub const INCOME: [Category; 3] = [
        Category::CompanyContribution,
        Category::ShopRental,
        Category::DirectDonation,
    ];

    pub const EXPENSE: [Category; 5] = [
        Category::Groceries,
        Category::Stationery,
        Category::AnimalSacrifice,
        Category::Bread,
        Category::Other,
    ];

    /// Every category, income first
    pub fn all() -> impl Iterator<Item = Category> {
        Self::INCOME.into_iter().chain(Self::EXPENSE)
    }

    /// The flow this category belongs to
    pub fn flow(&self) -> Flow {
        match self {
            Self::CompanyContribution | Self::ShopRental | Self::DirectDonation => Flow::Income,
            Self::Groceries | Self::Stationery | Self::AnimalSacrifice | Self::Bread | Self::Other => {
                Flow::Expense
            }
        }
    }

    /// Stable upper-snake code used in files, e.g. "SHOP_RENTAL"
    pub fn code(&self) -> &'static str {
        match self {
            Self::CompanyContribution => "COMPANY_CONTRIBUTION",
            Self::ShopRental => "SHOP_RENTAL",
            Self::DirectDonation => "DIRECT_DONATION",
            Self::Groceries => "GROCERIES",
            Self::Stationery => "STATIONERY",
            Self::AnimalSacrifice => "ANIMAL_SACRIFICE",
            Self::Bread => "BREAD",
            Self::Other => "OTHER",
        }
    }

    pub fn persian_label(&self) -> &'static str {
        match self {
            Self::CompanyContribution => "واریز شرکت",
            Self::ShopRental => "اجاره بها",
            Self::DirectDonation => "کمک مستقیم",
            Self::Groceries => "خرید مواد غذایی",
            Self::Stationery => "نوشت افزار",
            Self::AnimalSacrifice => "ذبح دام",
            Self::Bread => "نان",
            Self::Other => "سایر",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CompanyContribution => "Company contribution",
            Self::ShopRental => "Shop rental",
            Self::DirectDonation => "Direct donation",
            Self::Groceries => "Groceries",
            Self::Stationery => "Stationery",
            Self::AnimalSacrifice => "Animal sacrifice",
            Self::Bread => "Bread",
            Self::Other => "Other",
        };
        f.pad(name)
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the file code, a kebab-case name, or the Persian label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = trimmed.replace(['-', ' '], "_");
        Category::all()
            .find(|category| {
                normalized.eq_ignore_ascii_case(category.code())
                    || trimmed == category.persian_label()
            })
            .ok_or_else(|| format!("Unknown category: {}", trimmed))
    }
}

/// A single ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    pub flow: Flow,

    pub category: Category,

    /// Always positive; the flow carries the sign
    pub amount: Money,

    /// When the money moved
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,

    pub description: String,

    /// Tenant, donor or other counterparty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Transaction {
    /// Create a new transaction with a fresh ID
    pub fn new(
        flow: Flow,
        category: Category,
        amount: Money,
        timestamp: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            flow,
            category,
            amount,
            timestamp,
            description: description.into(),
            source: None,
        }
    }

    /// Attach a counterparty
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        let source = source.into();
        self.source = if source.trim().is_empty() {
            None
        } else {
            Some(source)
        };
        self
    }

    pub fn is_income(&self) -> bool {
        self.flow == Flow::Income
    }

    pub fn is_expense(&self) -> bool {
        self.flow == Flow::Expense
    }

    /// Amount with the flow's sign applied (negative for expenses)
    pub fn signed_amount(&self) -> Money {
        match self.flow {
            Flow::Income => self.amount,
            Flow::Expense => -self.amount,
        }
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        if !self.amount.is_within_limit() {
            return Err(TransactionValidationError::AmountTooLarge(self.amount));
        }

        if self.description.trim().is_empty() {
            return Err(TransactionValidationError::EmptyDescription);
        }

        if self.category.flow() != self.flow {
            return Err(TransactionValidationError::CategoryFlowMismatch {
                flow: self.flow,
                category: self.category,
            });
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.timestamp.format("%Y-%m-%d"),
            self.category,
            self.description,
            self.signed_amount()
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    EmptyDescription,
    CategoryFlowMismatch { flow: Flow, category: Category },
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::AmountTooLarge(amount) => write!(
                f,
                "Amount {} is above the limit of {}",
                amount,
                Money::MAX_AMOUNT
            ),
            Self::EmptyDescription => write!(f, "Description is required"),
            Self::CategoryFlowMismatch { flow, category } => write!(
                f,
                "Category '{}' cannot be used for {} transactions",
                category,
                flow.to_string().to_lowercase()
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Transaction {
        Transaction::new(
            Flow::Income,
            Category::ShopRental,
            Money::from_minor(2_000_000),
            Utc.with_ymd_and_hms(2025, 10, 3, 11, 30, 0).unwrap(),
            "Shop No. 1 rent",
        )
    }

    #[test]
    fn test_category_flows() {
        for category in Category::INCOME {
            assert_eq!(category.flow(), Flow::Income);
        }
        for category in Category::EXPENSE {
            assert_eq!(category.flow(), Flow::Expense);
        }
        assert_eq!(Category::all().count(), 8);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("SHOP_RENTAL".parse::<Category>().unwrap(), Category::ShopRental);
        assert_eq!("shop-rental".parse::<Category>().unwrap(), Category::ShopRental);
        assert_eq!("animal sacrifice".parse::<Category>().unwrap(), Category::AnimalSacrifice);
        assert_eq!("ذبح دام".parse::<Category>().unwrap(), Category::AnimalSacrifice);
        assert_eq!("نان".parse::<Category>().unwrap(), Category::Bread);
        assert!("rent".parse::<Category>().is_err());
    }

    #[test]
    fn test_flow_parse() {
        assert_eq!("income".parse::<Flow>().unwrap(), Flow::Income);
        assert_eq!("EXPENSE".parse::<Flow>().unwrap(), Flow::Expense);
        assert_eq!("ورودی".parse::<Flow>().unwrap(), Flow::Income);
        assert_eq!("خروجی".parse::<Flow>().unwrap(), Flow::Expense);
        assert!("sideways".parse::<Flow>().is_err());
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_amount() {
        let mut txn = sample();
        txn.amount = Money::zero();
        assert_eq!(
            txn.validate(),
            Err(TransactionValidationError::NonPositiveAmount(Money::zero()))
        );

        txn.amount = Money::from_minor(-5);
        assert!(txn.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_amount_above_limit() {
        let mut txn = sample();
        txn.amount = Money::MAX_AMOUNT;
        assert!(txn.validate().is_ok());

        txn.amount = Money::from_minor(i64::MAX / 2 + 1);
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::AmountTooLarge(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_description() {
        let mut txn = sample();
        txn.description = "   ".into();
        assert_eq!(
            txn.validate(),
            Err(TransactionValidationError::EmptyDescription)
        );
    }

    #[test]
    fn test_validate_rejects_category_of_other_flow() {
        let mut txn = sample();
        txn.category = Category::Bread;
        let err = txn.validate().unwrap_err();
        assert_eq!(err.to_string(), "Category 'Bread' cannot be used for income transactions");
    }

    #[test]
    fn test_signed_amount() {
        let income = sample();
        assert_eq!(income.signed_amount(), Money::from_minor(2_000_000));

        let mut expense = sample();
        expense.flow = Flow::Expense;
        expense.category = Category::Groceries;
        assert_eq!(expense.signed_amount(), Money::from_minor(-2_000_000));
    }

    #[test]
    fn test_with_source_ignores_blank() {
        assert_eq!(sample().with_source("Mr. Mohammadi").source.as_deref(), Some("Mr. Mohammadi"));
        assert_eq!(sample().with_source("  ").source, None);
    }

    #[test]
    fn test_serialization() {
        let txn = sample().with_source("Mr. Mohammadi");
        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains(r#""flow":"INCOME""#));
        assert!(json.contains(r#""category":"SHOP_RENTAL""#));
        assert!(json.contains(r#""date":"2025-10-03T11:30:00Z""#));

        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(txn, deserialized);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample().to_string(),
            "2025-10-03 Shop rental Shop No. 1 rent 2,000,000"
        );
    }
}
