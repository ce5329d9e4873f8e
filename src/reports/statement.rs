//! Balance Statement
//!
//! Opening and closing balance for a period, with optional manually entered
//! totals that take precedence over the calculated ones. Overrides only
//! change the statement; the period's monthly series is left untouched.

use std::io::Write;

use serde::Serialize;

use super::period::PeriodReport;
use crate::calendar::JalaliDate;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;

/// Manually entered totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TotalOverrides {
    pub income: Option<Money>,
    pub expense: Option<Money>,
}

impl TotalOverrides {
    pub fn is_empty(&self) -> bool {
        self.income.is_none() && self.expense.is_none()
    }
}

/// One line of the statement: calculated and effective value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatementLine {
    pub calculated: Money,
    pub effective: Money,
}

impl StatementLine {
    fn new(calculated: Money, manual: Option<Money>) -> Self {
        Self {
            calculated,
            effective: manual.unwrap_or(calculated),
        }
    }

    pub fn is_overridden(&self) -> bool {
        self.calculated != self.effective
    }
}

/// Summary table of a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceStatement {
    pub first_day: JalaliDate,
    pub last_day: JalaliDate,
    pub opening_balance: Money,
    pub income: StatementLine,
    pub expense: StatementLine,
    /// Closing balance from the calculated totals
    pub calculated_closing_balance: Money,
    /// Closing balance from the effective totals
    pub closing_balance: Money,
}

impl BalanceStatement {
    /// Build a statement from a period report
    pub fn generate(report: &PeriodReport, overrides: TotalOverrides) -> LedgerResult<Self> {
        for (name, value) in [("income", overrides.income), ("expense", overrides.expense)] {
            if value.is_some_and(|v| v.is_negative()) {
                return Err(LedgerError::Validation(format!(
                    "Manual {} total cannot be negative",
                    name
                )));
            }
            if value.is_some_and(|v| !v.is_within_limit()) {
                return Err(LedgerError::Validation(format!(
                    "Manual {} total is above the limit of {}",
                    name,
                    Money::MAX_AMOUNT
                )));
            }
        }

        let income = StatementLine::new(report.total_income, overrides.income);
        let expense = StatementLine::new(report.total_expense, overrides.expense);
        if !overrides.is_empty() {
            tracing::debug!(
                income = %income.effective,
                expense = %expense.effective,
                "applied manual totals"
            );
        }

        Ok(Self {
            first_day: report.first_day,
            last_day: report.last_day,
            opening_balance: report.opening_balance,
            income,
            expense,
            calculated_closing_balance: report.opening_balance + income.calculated
                - expense.calculated,
            closing_balance: report.opening_balance + income.effective - expense.effective,
        })
    }

    /// Either total was entered manually
    pub fn is_overridden(&self) -> bool {
        self.income.is_overridden() || self.expense.is_overridden()
    }

    /// Format the statement for terminal display
    pub fn format_terminal(&self, currency_label: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Statement: {} to {}\n",
            self.first_day.long_format(),
            self.last_day.long_format()
        ));

        let line = |label: &str, amount: Money, note: &str| {
            format!(
                "  {:<18} {:>20}{}\n",
                label,
                amount.format_with_label(currency_label),
                note
            )
        };
        let note = |l: &StatementLine| {
            if l.is_overridden() {
                format!("  (manual; calculated {})", l.calculated)
            } else {
                String::new()
            }
        };

        output.push_str(&line("Opening balance", self.opening_balance, ""));
        output.push_str(&line("Total income", self.income.effective, &note(&self.income)));
        output.push_str(&line("Total expense", self.expense.effective, &note(&self.expense)));
        let closing_note = if self.is_overridden() {
            format!("  (calculated {})", self.calculated_closing_balance)
        } else {
            String::new()
        };
        output.push_str(&line("Closing balance", self.closing_balance, &closing_note));
        output
    }

    /// Export the statement to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let rows = [
            ("Opening Balance", self.opening_balance, self.opening_balance),
            ("Total Income", self.income.calculated, self.income.effective),
            ("Total Expense", self.expense.calculated, self.expense.effective),
            (
                "Closing Balance",
                self.calculated_closing_balance,
                self.closing_balance,
            ),
        ];

        csv_writer
            .write_record(["Line", "Calculated", "Effective"])
            .map_err(|e| LedgerError::Export(e.to_string()))?;
        for (label, calculated, effective) in rows {
            csv_writer
                .write_record([
                    label.to_string(),
                    calculated.minor().to_string(),
                    effective.minor().to_string(),
                ])
                .map_err(|e| LedgerError::Export(e.to_string()))?;
        }
        csv_writer
            .flush()
            .map_err(|e| LedgerError::Export(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CivilDate, DateRangeResolver};
    use crate::storage::sample_transactions_list;

    fn mehr_report() -> PeriodReport {
        let range = DateRangeResolver::default()
            .resolve(CivilDate::new(1404, 7, 1), CivilDate::new(1404, 7, 30))
            .unwrap();
        PeriodReport::generate(
            &sample_transactions_list().unwrap(),
            &range,
            Money::from_minor(1_000_000),
        )
    }

    #[test]
    fn test_statement_without_overrides() {
        let report = mehr_report();
        let statement = BalanceStatement::generate(&report, TotalOverrides::default()).unwrap();

        assert_eq!(statement.income.effective, Money::from_minor(17_500_000));
        assert_eq!(statement.expense.effective, Money::from_minor(10_450_000));
        assert_eq!(statement.closing_balance, report.closing_balance);
        assert_eq!(statement.calculated_closing_balance, report.closing_balance);
        assert!(!statement.is_overridden());
    }

    #[test]
    fn test_overrides_change_closing_balance_only() {
        let report = mehr_report();
        let before = report.clone();
        let statement = BalanceStatement::generate(
            &report,
            TotalOverrides {
                income: Some(Money::from_minor(20_000_000)),
                expense: None,
            },
        )
        .unwrap();

        assert!(statement.income.is_overridden());
        assert_eq!(statement.income.calculated, Money::from_minor(17_500_000));
        assert_eq!(statement.closing_balance, Money::from_minor(10_550_000));
        assert_eq!(report, before);

        let output = statement.format_terminal("IRR");
        assert!(output.contains("manual; calculated 17,500,000"));
        assert!(output.contains("(calculated 8,050,000)"));
    }

    #[test]
    fn test_negative_override_rejected() {
        let err = BalanceStatement::generate(
            &mehr_report(),
            TotalOverrides {
                income: None,
                expense: Some(Money::from_minor(-1)),
            },
        )
        .unwrap_err();
        assert!(err.is_validation());

        let err = BalanceStatement::generate(
            &mehr_report(),
            TotalOverrides {
                income: Some(Money::from_minor(i64::MAX)),
                expense: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("above the limit"));
    }

    #[test]
    fn test_export_csv() {
        let statement = BalanceStatement::generate(
            &mehr_report(),
            TotalOverrides {
                income: None,
                expense: Some(Money::from_minor(10_000_000)),
            },
        )
        .unwrap();

        let mut buffer = Vec::new();
        statement.export_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();
        assert!(csv.contains("Total Expense,10450000,10000000"));
        assert!(csv.contains("Opening Balance,1000000,1000000"));
        assert!(csv.contains("Closing Balance,8050000,8500000"));
        assert_eq!(statement.calculated_closing_balance, Money::from_minor(8_050_000));
    }
}
