//! Setup and overview commands: `init`, `config` and `summary`

use super::CliContext;
use crate::config::LedgerPaths;
use crate::display::report::double_separator;
use crate::error::LedgerResult;
use crate::reports::CategoryBreakdown;
use crate::storage::{initialize_storage, needs_initialization};

/// Create settings and ledger files that do not exist yet
pub fn handle_init_command(paths: &LedgerPaths, sample: bool) -> LedgerResult<()> {
    println!("Initializing charity ledger at: {}", paths.base_dir().display());
    let report = initialize_storage(paths, sample)?;

    if report.settings_created {
        println!("  Created settings:  {}", paths.settings_file().display());
    } else {
        println!("  Settings already exist, left unchanged");
    }

    if report.ledger_created {
        println!("  Created ledger:    {}", paths.ledger_file().display());
        if report.sample_transactions > 0 {
            println!(
                "  Added {} sample transactions",
                report.sample_transactions
            );
        }
    } else {
        println!("  Ledger already exists, left unchanged");
    }

    println!();
    println!("Run 'charity report' to see this year's figures.");
    Ok(())
}

/// Show resolved paths and current settings
pub fn handle_config_command(ctx: &CliContext) -> LedgerResult<()> {
    let settings = &ctx.settings;

    println!("Charity Ledger Configuration");
    println!("============================");
    println!("Base directory:  {}", ctx.paths.base_dir().display());
    println!("Settings file:   {}", ctx.paths.settings_file().display());
    println!("Ledger file:     {}", ctx.paths.ledger_file().display());
    if needs_initialization(&ctx.paths) {
        println!("Not initialized; run 'charity init' to create missing files");
    }
    println!();
    println!("Settings:");
    println!("  UTC offset:          {}", settings.offset_label());
    println!("  Year floor:          {}", settings.year_floor);
    println!("  Currency label:      {}", settings.currency_label);
    println!(
        "  Opening balance:     {}",
        settings.default_opening_balance
    );
    println!("  Narrative sample:    {}", settings.narrative_sample_size);
    println!("  Narrative language:  {:?}", settings.narrative_language);
    match &settings.narrative_command {
        Some(argv) => println!("  Narrative command:   {}", argv.join(" ")),
        None => println!("  Narrative command:   (not configured)"),
    }
    Ok(())
}

/// All-time totals and per-category breakdown
pub fn handle_summary_command(ctx: &CliContext) -> LedgerResult<()> {
    let store = ctx.load_ledger()?;
    let totals = store.totals();
    let label = ctx.settings.currency_label.as_str();

    println!("Ledger Summary");
    println!("{}", double_separator(40));
    println!("Transactions:  {:>20}", totals.count);
    println!("Income:        {:>20}", totals.income.format_with_label(label));
    println!("Expense:       {:>20}", totals.expense.format_with_label(label));
    println!("Balance:       {:>20}", totals.balance.format_with_label(label));

    if !store.is_empty() {
        println!();
        print!("{}", CategoryBreakdown::generate(store.all()).format_terminal());
    }
    Ok(())
}
