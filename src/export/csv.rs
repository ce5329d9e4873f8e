//! CSV import and export of transactions
//!
//! Columns: `id,flow,category,amount,date,description,source`. Exported files
//! import back unchanged. On import, columns are matched by header name and
//! flows and categories may be given by code or Persian label.

use std::io::{Read, Write};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Flow, Money, Transaction, TransactionId};
use crate::storage::LedgerStore;

/// Header row written by [`export_transactions_csv`]
pub const TRANSACTION_COLUMNS: [&str; 7] = [
    "id",
    "flow",
    "category",
    "amount",
    "date",
    "description",
    "source",
];

/// Export transactions to CSV in the given order
pub fn export_transactions_csv<'a, W, I>(transactions: I, writer: &mut W) -> LedgerResult<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(TRANSACTION_COLUMNS)
        .map_err(|e| LedgerError::Export(e.to_string()))?;

    let mut count = 0;
    for txn in transactions {
        csv_writer
            .write_record([
                txn.id.as_uuid().to_string(),
                txn.flow.code().to_string(),
                txn.category.code().to_string(),
                txn.amount.minor().to_string(),
                txn.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                txn.description.clone(),
                txn.source.clone().unwrap_or_default(),
            ])
            .map_err(|e| LedgerError::Export(e.to_string()))?;
        count += 1;
    }

    csv_writer
        .flush()
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(count)
}

/// Column positions resolved from the header row
struct ColumnMap {
    id: Option<usize>,
    flow: usize,
    category: usize,
    amount: usize,
    date: usize,
    description: usize,
    source: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> LedgerResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                LedgerError::Import(format!("missing required column '{}'", name))
            })
        };

        Ok(Self {
            id: find("id"),
            flow: require("flow")?,
            category: require("category")?,
            amount: require("amount")?,
            date: require("date")?,
            description: require("description")?,
            source: find("source"),
        })
    }
}

/// Read transactions from CSV
///
/// Every row is validated like [`LedgerStore::add`]; the first bad row stops
/// the read with its line number. `YYYY-MM-DD` dates are taken as local
/// midnight in `offset`.
pub fn read_transactions_csv<R: Read>(
    reader: R,
    offset: FixedOffset,
) -> LedgerResult<Vec<Transaction>> {
    Ok(read_rows(reader, offset)?
        .into_iter()
        .map(|(_, txn)| txn)
        .collect())
}

fn read_rows<R: Read>(reader: R, offset: FixedOffset) -> LedgerResult<Vec<(u64, Transaction)>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| LedgerError::Import(e.to_string()))?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        // Header is line 1
        let fallback_line = index as u64 + 2;
        let record = record.map_err(|e| {
            LedgerError::Import(format!("line {}: {}", fallback_line, e))
        })?;
        let line = record.position().map_or(fallback_line, |p| p.line());

        let txn = parse_record(&record, &columns, offset)
            .map_err(|msg| LedgerError::Import(format!("line {}: {}", line, msg)))?;
        rows.push((line, txn));
    }

    Ok(rows)
}

fn parse_record(
    record: &StringRecord,
    columns: &ColumnMap,
    offset: FixedOffset,
) -> Result<Transaction, String> {
    let field = |index: usize| record.get(index).unwrap_or("").trim();

    let flow: Flow = field(columns.flow).parse()?;
    let category: Category = field(columns.category).parse()?;
    let amount = Money::parse(field(columns.amount)).map_err(|e| e.to_string())?;
    let timestamp = parse_timestamp(field(columns.date), offset)?;

    let mut txn = Transaction::new(flow, category, amount, timestamp, field(columns.description));

    if let Some(raw_id) = columns.id.map(field).filter(|s| !s.is_empty()) {
        txn.id = raw_id
            .parse::<TransactionId>()
            .map_err(|e| format!("invalid id '{}': {}", raw_id, e))?;
    }
    if let Some(source) = columns.source.map(field) {
        txn = txn.with_source(source);
    }

    txn.validate().map_err(|e| e.to_string())?;
    Ok(txn)
}

fn parse_timestamp(raw: &str, offset: FixedOffset) -> Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected RFC 3339 or YYYY-MM-DD)", raw))?;
    offset
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| format!("invalid local date '{}'", raw))
}

/// Import CSV rows into the store
///
/// All or nothing: if any row is invalid or duplicates an existing ID, the
/// store is left unchanged.
pub fn import_transactions<R: Read>(
    store: &mut LedgerStore,
    reader: R,
    offset: FixedOffset,
) -> LedgerResult<usize> {
    let rows = read_rows(reader, offset)?;
    let mut staged = store.clone();

    for (line, txn) in rows.iter().cloned() {
        staged
            .add(txn)
            .map_err(|e| LedgerError::Import(format!("line {}: {}", line, e)))?;
    }

    *store = staged;
    tracing::info!(count = rows.len(), "imported transactions");
    Ok(rows.len())
}
