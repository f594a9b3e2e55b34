//! Linear transfer unit for fungible value in transit

use std::fmt;

use crate::error::{LedgerError, LedgerResult, Rejected};
use crate::types::AssetId;

/// A quantity of one asset that has left a sub-account and not yet landed in
/// another.
///
/// Not `Clone`. Only `Ledger::mint_with_cap` creates nonzero value; only a
/// deposit, a merge, or a burn consumes it. Dropping a nonzero `CashValue`
/// loses value: it is logged as an error and trips a debug assertion.
#[must_use = "dropping a CashValue destroys value; deposit or burn it"]
pub struct CashValue {
    asset_id: AssetId,
    amount: u64,
}

impl CashValue {
    pub(crate) fn new(asset_id: AssetId, amount: u64) -> Self {
        Self { asset_id, amount }
    }

    /// An empty value of `asset_id`. Anyone may create one; it carries nothing.
    pub fn zero(asset_id: AssetId) -> Self {
        Self::new(asset_id, 0)
    }

    pub fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Consume the value, yielding its parts. Crate-private: only ledger
    /// operations that account for the amount may do this.
    pub(crate) fn into_parts(mut self) -> (AssetId, u64) {
        let amount = std::mem::take(&mut self.amount);
        (self.asset_id, amount)
    }

    /// Split `amount` off into a new value.
    pub fn extract(&mut self, amount: u64) -> LedgerResult<CashValue> {
        if amount > self.amount {
            return Err(LedgerError::InvalidArgument(format!(
                "cannot extract {} from a value of {}",
                amount, self.amount
            )));
        }
        self.amount -= amount;
        Ok(CashValue::new(self.asset_id, amount))
    }

    /// Fold `other` into `self`. Mismatched assets hand `other` back.
    pub fn merge_into(&mut self, other: CashValue) -> Result<(), Rejected<CashValue>> {
        if other.asset_id != self.asset_id {
            let error = LedgerError::InvalidArgument(format!(
                "cannot merge {} into {}",
                other.asset_id, self.asset_id
            ));
            return Err(Rejected::new(error, other));
        }
        let Some(total) = self.amount.checked_add(other.amount) else {
            return Err(Rejected::new(
                LedgerError::OutOfRange("merged amount overflows u64".to_string()),
                other,
            ));
        };
        let _ = other.into_parts();
        self.amount = total;
        Ok(())
    }

    /// Dispose of an empty value. A nonzero value comes back in the error.
    pub fn destroy_zero(self) -> Result<(), Rejected<CashValue>> {
        if self.amount != 0 {
            let error = LedgerError::InvalidArgument(format!(
                "cannot destroy a value of {}",
                self.amount
            ));
            return Err(Rejected::new(error, self));
        }
        Ok(())
    }
}

impl fmt::Debug for CashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CashValue")
            .field("asset_id", &self.asset_id)
            .field("amount", &self.amount)
            .finish()
    }
}

impl Drop for CashValue {
    fn drop(&mut self) {
        if self.amount != 0 && !std::thread::panicking() {
            tracing::error!(
                "💸 CashValue of {} units of {} dropped without being deposited or burned",
                self.amount,
                self.asset_id
            );
            if cfg!(debug_assertions) {
                panic!("nonzero CashValue dropped: {:?}", self);
            }
        }
    }
}

/// Fold a list of values of one asset into a single value.
///
/// An empty list, or any two values of different assets, is rejected and the
/// whole list comes back untouched.
pub fn merge(values: Vec<CashValue>) -> Result<CashValue, Rejected<Vec<CashValue>>> {
    if values.is_empty() {
        return Err(Rejected::new(
            LedgerError::InvalidArgument("cannot merge an empty list".to_string()),
            values,
        ));
    }
    let asset_id = values[0].asset_id;
    if let Some(odd) = values.iter().find(|v| v.asset_id != asset_id) {
        let error = LedgerError::InvalidArgument(format!(
            "cannot merge {} with {}",
            odd.asset_id, asset_id
        ));
        return Err(Rejected::new(error, values));
    }
    let total = values
        .iter()
        .try_fold(0u64, |acc, v| acc.checked_add(v.amount));
    let Some(total) = total else {
        return Err(Rejected::new(
            LedgerError::OutOfRange("merged amount overflows u64".to_string()),
            values,
        ));
    };

    for value in values {
        let _ = value.into_parts();
    }
    Ok(CashValue::new(asset_id, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, EntityId};

    fn asset(name: &str) -> AssetId {
        AssetId::from_entity(EntityId::from_address(Address::from_name(name)))
    }

    // Tests own fabricated value; account for it explicitly.
    fn settle(value: CashValue) -> u64 {
        value.into_parts().1
    }

    #[test]
    fn test_merge_sums_amounts() {
        let gold = asset("gold");
        let merged = merge(vec![
            CashValue::new(gold, 3),
            CashValue::new(gold, 4),
            CashValue::zero(gold),
        ])
        .unwrap();
        assert_eq!(merged.asset_id(), gold);
        assert_eq!(settle(merged), 7);
    }

    #[test]
    fn test_merge_mixed_assets_hands_values_back() {
        let rejected = merge(vec![
            CashValue::new(asset("gold"), 3),
            CashValue::new(asset("silver"), 4),
        ])
        .unwrap_err();
        assert!(matches!(rejected.error, LedgerError::InvalidArgument(_)));
        let total: u64 = rejected.value.into_iter().map(settle).sum();
        assert_eq!(total, 7);
    }

    #[test]
    fn test_merge_empty_list_fails() {
        let rejected = merge(Vec::new()).unwrap_err();
        assert!(matches!(rejected.error, LedgerError::InvalidArgument(_)));
        assert!(rejected.value.is_empty());
    }

    #[test]
    fn test_extract_and_merge_into() {
        let gold = asset("gold");
        let mut value = CashValue::new(gold, 10);
        let part = value.extract(4).unwrap();
        assert_eq!(value.amount(), 6);
        assert_eq!(part.amount(), 4);
        assert!(matches!(value.extract(7), Err(LedgerError::InvalidArgument(_))));

        value.merge_into(part).unwrap();
        assert_eq!(value.amount(), 10);

        let stranger = CashValue::new(asset("silver"), 1);
        let rejected = value.merge_into(stranger).unwrap_err();
        assert_eq!(settle(rejected.value), 1);
        assert_eq!(settle(value), 10);
    }

    #[test]
    fn test_destroy_zero() {
        let gold = asset("gold");
        CashValue::zero(gold).destroy_zero().unwrap();
        let rejected = CashValue::new(gold, 2).destroy_zero().unwrap_err();
        assert!(matches!(rejected.error, LedgerError::InvalidArgument(_)));
        assert_eq!(settle(rejected.value), 2);
    }
}
