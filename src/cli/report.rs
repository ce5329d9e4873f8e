//! CLI command for period reports
//!
//! Generates the period aggregate and balance statement, optionally exports
//! them and builds or runs the narrative analysis.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Args;

use super::export::ExportFormat;
use super::{parse_money_arg, resolve_period, CliContext};
use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_report_yaml, ReportExport};
use crate::reports::{
    build_prompt, BalanceStatement, CategoryBreakdown, CommandGenerator, NarrativeGenerator,
    PeriodReport, PromptLanguage, TotalOverrides,
};

/// Arguments for `report`
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Start date (YYYY/MM/DD), defaults to 1 Farvardin of this year
    #[arg(short, long)]
    pub from: Option<String>,

    /// End date (YYYY/MM/DD), defaults to today
    #[arg(short, long)]
    pub to: Option<String>,

    /// Opening balance, defaults to the configured value
    #[arg(long)]
    pub opening: Option<String>,

    /// Manually entered total income for the statement
    #[arg(long)]
    pub income_override: Option<String>,

    /// Manually entered total expense for the statement
    #[arg(long)]
    pub expense_override: Option<String>,

    /// Also show totals per category
    #[arg(short, long)]
    pub breakdown: bool,

    /// Export the report to a file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format
    #[arg(long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Print the narrative analysis prompt
    #[arg(long)]
    pub prompt: bool,

    /// Run the configured narrative command on the prompt
    #[arg(long)]
    pub analyze: bool,

    /// Prompt language, defaults to the configured one
    #[arg(long, value_enum)]
    pub language: Option<PromptLanguage>,
}

/// Handle the report command
pub fn handle_report_command(ctx: &CliContext, args: ReportArgs) -> LedgerResult<()> {
    let range = resolve_period(&ctx.resolver, args.from.as_deref(), args.to.as_deref())?;

    let opening = match &args.opening {
        Some(value) => parse_money_arg("--opening", value)?,
        None => ctx.settings.default_opening_balance,
    };
    let overrides = TotalOverrides {
        income: args
            .income_override
            .as_deref()
            .map(|v| parse_money_arg("--income-override", v))
            .transpose()?,
        expense: args
            .expense_override
            .as_deref()
            .map(|v| parse_money_arg("--expense-override", v))
            .transpose()?,
    };

    let store = ctx.load_ledger()?;
    let report = PeriodReport::generate(store.all(), &range, opening);
    let statement = BalanceStatement::generate(&report, overrides)?;
    let label = ctx.settings.currency_label.as_str();

    print!("{}", report.format_terminal(label));
    println!();
    print!("{}", statement.format_terminal(label));

    if args.breakdown {
        println!();
        print!("{}", CategoryBreakdown::generate(&report.transactions).format_terminal());
    }

    if let Some(output) = &args.output {
        let file = File::create(output).map_err(|e| {
            LedgerError::Export(format!("Failed to create file {}: {}", output.display(), e))
        })?;
        let mut writer = BufWriter::new(file);

        match args.format {
            ExportFormat::Csv => report.export_csv(&mut writer)?,
            ExportFormat::Json => ReportExport::new(&report, &statement, label).write_json(&mut writer)?,
            ExportFormat::Yaml => {
                export_report_yaml(&ReportExport::new(&report, &statement, label), &mut writer)?
            }
        }
        println!("\nReport exported to: {}", output.display());
    }

    if args.prompt || args.analyze {
        let prompt = build_prompt(
            &report,
            &statement,
            ctx.settings.narrative_sample_size,
            label,
            args.language.unwrap_or(ctx.settings.narrative_language),
        );

        if args.prompt {
            println!("\n{}", prompt);
        }
        if args.analyze {
            let narrative = CommandGenerator::from_settings(&ctx.settings)?.generate(&prompt)?;
            println!("\nAnalysis\n{}\n{}", "=".repeat(8), narrative);
        }
    }

    Ok(())
}
