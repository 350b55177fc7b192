use crate::models::Transaction;

/// Called after an expense transaction has been committed, either on create
/// or on update. Implementations must return quickly and must not fail the
/// write; anything slow belongs on a spawned task.
pub trait ExpenseHook: Send + Sync {
    fn expense_recorded(&self, transaction: &Transaction);
}

pub struct NoopHook;

impl ExpenseHook for NoopHook {
    fn expense_recorded(&self, _transaction: &Transaction) {}
}
