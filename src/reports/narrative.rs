//! Narrative analysis
//!
//! Builds a plain-text briefing of a period for an external text generator
//! and hands it over through the [`NarrativeGenerator`] seam. Each request is
//! a single attempt that ends in text or an error.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::period::PeriodReport;
use super::statement::BalanceStatement;
use crate::calendar::JalaliDate;
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Flow, Money};

/// Turns a prompt into narrative text
pub trait NarrativeGenerator {
    fn generate(&self, prompt: &str) -> LedgerResult<String>;
}

/// Language the prompt is written in, and asks the answer to be written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PromptLanguage {
    #[default]
    English,
    Persian,
}

/// Fixed text of a prompt in one language
struct Wording {
    instructions: &'static str,
    period: &'static str,
    start_date: &'static str,
    end_date: &'static str,
    opening: &'static str,
    income: &'static str,
    expense: &'static str,
    closing: &'static str,
    no_transactions: &'static str,
    samples: &'static str,
    income_kind: &'static str,
    expense_kind: &'static str,
    on: &'static str,
}

const ENGLISH: Wording = Wording {
    instructions: "You are a financial analyst preparing a management briefing for the board of a \
                   charity. Using the figures below, describe the key points, the largest sources \
                   of income, the largest areas of spending, and give an overall assessment of the \
                   charity's financial position. Write a few clear paragraphs.",
    period: "Period:",
    start_date: "Start date",
    end_date: "End date",
    opening: "Opening balance",
    income: "Total income",
    expense: "Total expense",
    closing: "Closing balance",
    no_transactions: "There were no transactions in this period.",
    samples: "Sample transactions",
    income_kind: "Income",
    expense_kind: "Expense",
    on: "on",
};

const PERSIAN: Wording = Wording {
    instructions: "شما یک تحلیلگر مالی حرفه‌ای هستید. لطفاً یک تحلیل مدیریتی برای هیئت مدیره یک \
                   خیریه بر اساس داده‌های زیر به زبان فارسی تهیه کنید. این تحلیل باید شامل نکات \
                   کلیدی، بزرگترین منابع درآمد، بیشترین حوزه‌های هزینه، و یک ارزیابی کلی از وضعیت \
                   مالی باشد. تحلیل را در چند پاراگراف روان و قابل فهم برای مدیران ارائه دهید.",
    period: "اطلاعات مالی دوره:",
    start_date: "تاریخ شروع گزارش",
    end_date: "تاریخ پایان گزارش",
    opening: "مانده حساب در ابتدای دوره",
    income: "مجموع درآمد در دوره",
    expense: "مجموع هزینه در دوره",
    closing: "مانده حساب در انتهای دوره",
    no_transactions: "در این دوره هیچ تراکنشی ثبت نشده است.",
    samples: "نمونه تراکنش‌ها",
    income_kind: "درآمد",
    expense_kind: "هزینه",
    on: "در تاریخ",
};

impl PromptLanguage {
    fn wording(self) -> &'static Wording {
        match self {
            Self::English => &ENGLISH,
            Self::Persian => &PERSIAN,
        }
    }

    fn date(self, date: JalaliDate) -> String {
        match self {
            Self::English => date.long_format(),
            Self::Persian => format!(
                "{} {} {}",
                date.day(),
                date.month_key().persian_name(),
                date.year()
            ),
        }
    }

    fn category(self, category: Category) -> String {
        match self {
            Self::English => category.to_string(),
            Self::Persian => category.persian_label().to_string(),
        }
    }
}

/// Build the prompt for a period
///
/// Totals come from the statement so manual overrides are reflected. At most
/// `sample_size` transactions are listed, oldest first.
pub fn build_prompt(
    report: &PeriodReport,
    statement: &BalanceStatement,
    sample_size: usize,
    currency_label: &str,
    language: PromptLanguage,
) -> String {
    let words = language.wording();
    let money = |amount: Money| amount.format_with_label(currency_label);

    let mut prompt = format!("{}\n\n{}\n", words.instructions, words.period);
    for (label, value) in [
        (words.start_date, language.date(statement.first_day)),
        (words.end_date, language.date(statement.last_day)),
        (words.opening, money(statement.opening_balance)),
        (words.income, money(statement.income.effective)),
        (words.expense, money(statement.expense.effective)),
        (words.closing, money(statement.closing_balance)),
    ] {
        prompt.push_str(&format!("- {}: {}\n", label, value));
    }
    prompt.push('\n');

    if report.is_empty() {
        prompt.push_str(words.no_transactions);
        prompt.push('\n');
        return prompt;
    }

    prompt.push_str(&format!(
        "{} ({} of {}):\n",
        words.samples,
        sample_size.min(report.transaction_count()),
        report.transaction_count()
    ));
    for txn in report.transactions.iter().take(sample_size) {
        let kind = match txn.flow {
            Flow::Income => words.income_kind,
            Flow::Expense => words.expense_kind,
        };
        let date = report
            .range()
            .local_date(txn.timestamp)
            .map(|d| language.date(d))
            .unwrap_or_else(|| txn.timestamp.format("%Y-%m-%d").to_string());
        prompt.push_str(&format!(
            "- {} ({}): {}, {} {} {}\n",
            kind,
            language.category(txn.category),
            txn.description,
            money(txn.amount),
            words.on,
            date
        ));
    }

    prompt
}

/// Runs an operator-configured program with the prompt on stdin
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Use `narrative_command` from settings
    pub fn from_settings(settings: &Settings) -> LedgerResult<Self> {
        let (program, args) = settings
            .narrative_command
            .as_deref()
            .and_then(|argv| argv.split_first())
            .ok_or_else(|| {
                LedgerError::Config(
                    "No narrative_command configured; set it in config.json to enable analysis"
                        .into(),
                )
            })?;
        Ok(Self::new(program.clone(), args.to_vec()))
    }
}

impl NarrativeGenerator for CommandGenerator {
    fn generate(&self, prompt: &str) -> LedgerResult<String> {
        tracing::debug!(program = %self.program, bytes = prompt.len(), "requesting narrative");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| LedgerError::Narrative(format!("could not start {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A program that exits without reading is reported by its status below
            if let Err(e) = stdin.write_all(prompt.as_bytes()) {
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(LedgerError::Narrative(format!("could not send prompt: {}", e)));
                }
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| LedgerError::Narrative(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LedgerError::Narrative(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(LedgerError::Narrative(format!(
                "{} produced no output",
                self.program
            )));
        }
        Ok(text)
    }
}
