//! Account to primary list mapping.

use crate::types::{Address, TokenId};
use std::collections::HashMap;

/// Maps each account to at most one primary list.
///
/// Iteration follows first registration order. Re-designating an account's
/// primary list replaces the token id but keeps the account's position,
/// which is the tie-break order for leaderboards.
#[derive(Default)]
pub struct PrimaryListIndex {
    lists: HashMap<Address, TokenId>,
    order: Vec<Address>,
}

impl PrimaryListIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Designate `token_id` as the account's primary list. Last write wins.
    ///
    /// Returns the previous designation, if any.
    pub fn set_primary_list(&mut self, account: Address, token_id: TokenId) -> Option<TokenId> {
        let previous = self.lists.insert(account, token_id);
        if previous.is_none() {
            self.order.push(account);
        }
        previous
    }

    pub fn get_primary_list(&self, account: &Address) -> Option<&TokenId> {
        self.lists.get(account)
    }

    /// `(account, primary list)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &TokenId)> + '_ {
        self.order
            .iter()
            .filter_map(move |account| self.lists.get(account).map(|token_id| (account, token_id)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut index = PrimaryListIndex::new();
        let account = Address([1; 20]);

        assert_eq!(index.set_primary_list(account, TokenId::from(1)), None);
        assert_eq!(
            index.set_primary_list(account, TokenId::from(2)),
            Some(TokenId::from(1))
        );
        assert_eq!(index.get_primary_list(&account), Some(&TokenId::from(2)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_iteration_keeps_first_registration_order() {
        let mut index = PrimaryListIndex::new();
        let a = Address([1; 20]);
        let b = Address([2; 20]);
        let c = Address([3; 20]);

        index.set_primary_list(b, TokenId::from(10));
        index.set_primary_list(a, TokenId::from(11));
        index.set_primary_list(c, TokenId::from(12));
        index.set_primary_list(b, TokenId::from(13));

        let order: Vec<_> = index.iter().map(|(account, id)| (*account, id.clone())).collect();
        assert_eq!(
            order,
            vec![
                (b, TokenId::from(13)),
                (a, TokenId::from(11)),
                (c, TokenId::from(12)),
            ]
        );
    }

    #[test]
    fn test_unknown_account() {
        let index = PrimaryListIndex::new();
        assert!(index.get_primary_list(&Address([9; 20])).is_none());
        assert!(index.is_empty());
    }
}
