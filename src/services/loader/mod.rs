use crate::models::Transaction;
use crate::utils::validation::validate_transaction;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Reads a comma separated transaction log with a header row.
///
/// Columns are matched by name: `user_id`, `item_id` and `quantity` are required,
/// `basket_id`, `week_no` and `sales_value` are optional, anything else is ignored.
pub fn load_transactions<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open transaction file {}", path.display()))?;

    let transactions = read_transactions(file)
        .with_context(|| format!("Failed to read transactions from {}", path.display()))?;

    info!("Loaded {} transactions from {}", transactions.len(), path.display());
    Ok(transactions)
}

pub fn read_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut transactions = Vec::new();
    let mut returns = 0;

    for (line, record) in reader.deserialize::<Transaction>().enumerate() {
        // line 1 is the header
        let context = || format!("Invalid transaction on line {}", line + 2);
        let transaction = record.with_context(context)?;
        validate_transaction(&transaction).with_context(context)?;
        if transaction.quantity < 0.0 {
            returns += 1;
        }
        transactions.push(transaction);
    }

    if returns > 0 {
        warn!("{} transactions have a negative quantity, kept as purchases", returns);
    }

    Ok(transactions)
}
