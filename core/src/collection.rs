//! Ordered, read-only set of transactions from one read request.

use std::ops::Index;

use serde_json::Value;

use crate::error::CollectionError;
use crate::record::Transaction;
use crate::types::StatType;

/// Transactions in the order the service returned them.
///
/// Built wholesale from a `{"data": [...]}` payload and never modified. No
/// relationship to timestamp order is assumed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionCollection {
    transactions: Vec<Transaction>,
}

impl TransactionCollection {
    /// Decode every record under `data`, in order.
    ///
    /// The first record that fails aborts construction; its index is carried
    /// in `CollectionError::Record`.
    pub fn from_payload(payload: &Value) -> Result<Self, CollectionError> {
        let records = payload
            .get("data")
            .and_then(Value::as_array)
            .ok_or(CollectionError::MissingData)?;

        let transactions = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                Transaction::from_value(record)
                    .map_err(|source| CollectionError::Record { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { transactions })
    }

    pub fn count(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    /// Transactions of `stat_type`, keeping their relative order.
    pub fn filter_by_type(&self, stat_type: StatType) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions
            .iter()
            .filter(move |tx| tx.stat_type() == stat_type)
    }

    pub fn count_by_type(&self, stat_type: StatType) -> usize {
        self.filter_by_type(stat_type).count()
    }
}

impl Index<usize> for TransactionCollection {
    type Output = Transaction;

    fn index(&self, index: usize) -> &Self::Output {
        &self.transactions[index]
    }
}

impl<'a> IntoIterator for &'a TransactionCollection {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

impl TryFrom<&Value> for TransactionCollection {
    type Error = CollectionError;

    fn try_from(payload: &Value) -> Result<Self, Self::Error> {
        Self::from_payload(payload)
    }
}
