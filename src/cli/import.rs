//! CLI command for importing transactions
//!
//! CSV files are the everyday path; JSON and YAML ledger exports can be
//! brought back in as well. Either every row is imported or none is.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use clap::Args;

use super::export::ExportFormat;
use super::CliContext;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{import_ledger_json, import_ledger_yaml, import_transactions};

/// Arguments for `import`
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// File to import
    pub file: PathBuf,

    /// Input format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ExportFormat,
}

/// Handle the import command
pub fn handle_import_command(ctx: &CliContext, args: ImportArgs) -> LedgerResult<()> {
    let mut store = ctx.load_ledger()?;
    let open_err =
        |e: std::io::Error| LedgerError::Import(format!("Cannot read {}: {}", args.file.display(), e));

    let count = match args.format {
        ExportFormat::Csv => {
            let file = File::open(&args.file).map_err(open_err)?;
            import_transactions(&mut store, BufReader::new(file), ctx.resolver.offset())?
        }
        ExportFormat::Json => {
            let contents = fs::read_to_string(&args.file).map_err(open_err)?;
            import_ledger_json(&contents)?.merge_into(&mut store)?
        }
        ExportFormat::Yaml => {
            let contents = fs::read_to_string(&args.file).map_err(open_err)?;
            import_ledger_yaml(&contents)?.merge_into(&mut store)?
        }
    };

    ctx.save_ledger(&store)?;
    println!(
        "Imported {} transactions from: {}",
        count,
        args.file.display()
    );

    Ok(())
}
