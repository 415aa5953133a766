use std::sync::Mutex;

use rand::{distributions::Alphanumeric, Rng};

use crate::db::StateStorage;
use crate::domain::billno;
use crate::error::AppError;
use crate::models::{
  today_iso, ClientProfile, ReportMeta, StateSnapshot, Transaction, TransactionPatch,
  VendorProfile, DEFAULT_ITEM_NAME,
};

const TXN_ID_LEN: usize = 16;

pub fn new_txn_id() -> String {
  rand::thread_rng()
    .sample_iter(&Alphanumeric)
    .take(TXN_ID_LEN)
    .map(char::from)
    .collect()
}

/// Process-wide owner of the application state. Every mutation goes through
/// `mutate`, which runs the action under the lock and then writes the whole
/// snapshot through to storage. The write-through is best effort: a failed
/// save is ignored, the in-memory state stays authoritative.
pub struct Store {
  state: Mutex<StateSnapshot>,
  storage: Box<dyn StateStorage + Send>,
}

impl Store {
  pub fn open(storage: Box<dyn StateStorage + Send>) -> Result<Self, AppError> {
    let state = match storage.load()? {
      Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
      None => StateSnapshot::default(),
    };
    Ok(Self {
      state: Mutex::new(state),
      storage,
    })
  }

  pub fn snapshot(&self) -> Result<StateSnapshot, AppError> {
    Ok(self.state.lock()?.clone())
  }

  fn mutate<T>(
    &self,
    action: impl FnOnce(&mut StateSnapshot) -> Result<T, AppError>,
  ) -> Result<T, AppError> {
    let mut state = self.state.lock()?;
    let value = action(&mut state)?;
    if let Ok(raw) = serde_json::to_string(&*state) {
      let _ = self.storage.save(&raw);
    }
    Ok(value)
  }

  pub fn update_vendor(&self, vendor: VendorProfile) -> Result<VendorProfile, AppError> {
    self.mutate(|state| {
      state.vendor = vendor.clone();
      Ok(vendor)
    })
  }

  pub fn update_client(&self, client: ClientProfile) -> Result<ClientProfile, AppError> {
    self.mutate(|state| {
      state.client = client.clone();
      Ok(client)
    })
  }

  pub fn update_meta(&self, meta: ReportMeta) -> Result<ReportMeta, AppError> {
    self.mutate(|state| {
      state.meta = meta.clone();
      Ok(meta)
    })
  }

  /// Appends a fresh row, inheriting the previous row's date and the next
  /// bill number in its sequence.
  pub fn add_transaction(&self) -> Result<Transaction, AppError> {
    self.mutate(|state| {
      let (date, bill_no) = match state.transactions.last() {
        Some(last) => {
          let bill_no = if last.bill_no.is_empty() {
            String::new()
          } else {
            billno::next_bill_no(&last.bill_no)
          };
          (last.date.clone(), bill_no)
        }
        None => (today_iso(), String::new()),
      };

      let txn = Transaction {
        id: new_txn_id(),
        bill_no,
        date,
        vehicle_no: String::new(),
        indent: String::new(),
        item_name: DEFAULT_ITEM_NAME.to_string(),
        quantity: 0.0,
        rate: 0.0,
        amount: 0.0,
      };
      state.transactions.push(txn.clone());
      Ok(txn)
    })
  }

  /// Applies a field patch to one row. Amount is derived: it is recomputed
  /// whenever quantity or rate changes and can never be set directly.
  pub fn update_transaction(
    &self,
    id: &str,
    patch: TransactionPatch,
  ) -> Result<Transaction, AppError> {
    self.mutate(|state| {
      let txn = state
        .transactions
        .iter_mut()
        .find(|txn| txn.id == id)
        .ok_or_else(|| AppError::new("NOT_FOUND", "Transaction not found"))?;

      let recompute = patch.quantity.is_some() || patch.rate.is_some();
      if let Some(bill_no) = patch.bill_no {
        txn.bill_no = bill_no;
      }
      if let Some(date) = patch.date {
        txn.date = date;
      }
      if let Some(vehicle_no) = patch.vehicle_no {
        txn.vehicle_no = vehicle_no;
      }
      if let Some(indent) = patch.indent {
        txn.indent = indent;
      }
      if let Some(item_name) = patch.item_name {
        txn.item_name = item_name;
      }
      if let Some(quantity) = patch.quantity {
        txn.quantity = quantity;
      }
      if let Some(rate) = patch.rate {
        txn.rate = rate;
      }
      if recompute {
        txn.amount = txn.quantity * txn.rate;
      }
      Ok(txn.clone())
    })
  }

  pub fn delete_transaction(&self, id: &str) -> Result<(), AppError> {
    self.mutate(|state| {
      let before = state.transactions.len();
      state.transactions.retain(|txn| txn.id != id);
      if state.transactions.len() == before {
        return Err(AppError::new("NOT_FOUND", "Transaction not found"));
      }
      Ok(())
    })
  }

  /// Overwrites every row's rate and recomputes every amount.
  pub fn apply_bulk_rate(&self, rate: f64) -> Result<usize, AppError> {
    self.mutate(|state| {
      for txn in &mut state.transactions {
        txn.rate = rate;
        txn.amount = txn.quantity * rate;
      }
      Ok(state.transactions.len())
    })
  }

  /// Row 0 gets the typed reference verbatim; row i gets the reference
  /// incremented by i. A reference with no numeric part repeats unchanged.
  pub fn apply_smart_bill_fill(&self, start_bill_no: &str) -> Result<usize, AppError> {
    self.mutate(|state| {
      for (idx, txn) in state.transactions.iter_mut().enumerate() {
        txn.bill_no = if idx == 0 {
          start_bill_no.to_string()
        } else {
          billno::increment_bill_no(start_bill_no, idx as i64)
        };
      }
      Ok(state.transactions.len())
    })
  }

  /// Import is strictly additive: records are appended in file order.
  pub fn import_transactions(&self, records: Vec<Transaction>) -> Result<usize, AppError> {
    self.mutate(|state| {
      let count = records.len();
      state.transactions.extend(records);
      Ok(count)
    })
  }

  /// Clears all transactions and zeroes the opening balance. Vendor, client
  /// and the report dates stay as they are.
  pub fn reset_all(&self) -> Result<(), AppError> {
    self.mutate(|state| {
      state.transactions.clear();
      state.meta.opening_balance = "0".to_string();
      Ok(())
    })
  }
}
