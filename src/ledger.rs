//! The ledger owns the authoritative list of transactions and the per-person
//! thresholds, and persists them after every change.

use crate::{
    Error,
    balance::{Balance, PersonBalance, compute_balance, compute_person_balances},
    labels::{self, LabelList},
    store::{
        KeyValueStore, PERSON_THRESHOLDS_KEY, TRANSACTIONS_KEY, load_list_or_default,
        load_or_default, save,
    },
    threshold::{BalanceThresholds, PersonThresholds},
    transaction::{NewTransaction, Transaction, TransactionId, TransactionUpdate},
};

/// A petty cash ledger persisted to a [KeyValueStore].
///
/// Transactions are kept newest first: [Ledger::add_transaction] puts the new
/// transaction at the front.
#[derive(Debug)]
pub struct Ledger<S> {
    store: S,
    transactions: Vec<Transaction>,
    thresholds: PersonThresholds,
}

impl<S: KeyValueStore> Ledger<S> {
    /// Load the ledger from `store`.
    ///
    /// Missing or unreadable state loads as an empty ledger. A stored
    /// transaction that cannot be read is skipped and the rest are kept.
    pub fn open(store: S) -> Self {
        let transactions: Vec<Transaction> =
            load_list_or_default(&store, TRANSACTIONS_KEY, Vec::new());
        let thresholds = load_or_default(&store, PERSON_THRESHOLDS_KEY, PersonThresholds::new());

        tracing::debug!(
            "Loaded {} transactions and {} person thresholds",
            transactions.len(),
            thresholds.len()
        );

        Self {
            store,
            transactions,
            thresholds,
        }
    }

    /// The transactions, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Assign a fresh ID to `transaction` and add it to the front of the ledger.
    pub fn add_transaction(&mut self, transaction: NewTransaction) -> &Transaction {
        let transaction = transaction.finalize(TransactionId::generate());
        tracing::debug!("Adding transaction {}", transaction.id);

        self.transactions.insert(0, transaction);
        self.save_transactions();

        &self.transactions[0]
    }

    /// Remove the transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if no transaction has `id`.
    pub fn delete_transaction(&mut self, id: &TransactionId) -> Result<(), Error> {
        let count_before = self.transactions.len();
        self.transactions.retain(|transaction| &transaction.id != id);

        if self.transactions.len() == count_before {
            return Err(Error::DeleteMissingTransaction);
        }

        tracing::debug!("Deleted transaction {id}");
        self.save_transactions();
        Ok(())
    }

    /// Merge `update` into the transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingTransaction] if no transaction has `id`.
    pub fn update_transaction(
        &mut self,
        id: &TransactionId,
        update: TransactionUpdate,
    ) -> Result<&Transaction, Error> {
        let index = self
            .transactions
            .iter()
            .position(|transaction| &transaction.id == id)
            .ok_or(Error::UpdateMissingTransaction)?;

        self.transactions[index].apply(update);
        tracing::debug!("Updated transaction {id}");
        self.save_transactions();

        Ok(&self.transactions[index])
    }

    /// The thresholds explicitly set per person.
    pub fn person_thresholds(&self) -> &PersonThresholds {
        &self.thresholds
    }

    /// Set and save the thresholds for `person`.
    pub fn set_person_thresholds(&mut self, person: &str, thresholds: BalanceThresholds) {
        self.thresholds.set(person, thresholds);
        save(&mut self.store, PERSON_THRESHOLDS_KEY, &self.thresholds);
    }

    /// The balance of the whole ledger.
    pub fn balance(&self) -> Balance {
        compute_balance(&self.transactions)
    }

    /// The balance of each person, in the order they first appear.
    pub fn person_balances(&self) -> Vec<PersonBalance> {
        compute_person_balances(&self.transactions, &self.thresholds)
    }

    /// The labels in `list`.
    pub fn labels(&self, list: LabelList) -> Vec<String> {
        labels::get_labels(list, &self.store)
    }

    /// Add `label` to `list` if it is not there already.
    pub fn add_label(&mut self, list: LabelList, label: &str) -> Vec<String> {
        labels::add_label(list, label, &mut self.store)
    }

    /// Remove `label` from `list`.
    pub fn delete_label(&mut self, list: LabelList, label: &str) -> Vec<String> {
        labels::delete_label(list, label, &mut self.store)
    }

    /// Rename `old_label` to `new_label` in `list`.
    pub fn rename_label(
        &mut self,
        list: LabelList,
        old_label: &str,
        new_label: &str,
    ) -> Vec<String> {
        labels::rename_label(list, old_label, new_label, &mut self.store)
    }

    /// The store the ledger persists to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Close the ledger and return its store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn save_transactions(&mut self) {
        save(&mut self.store, TRANSACTIONS_KEY, &self.transactions);
    }
}
