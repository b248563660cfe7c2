// src/services/selection.rs
use serde::Serialize;

use crate::models::FundIdentity;

/// Funds picked for comparison, unique by code, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    funds: Vec<FundIdentity>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `fund` unless a fund with the same code is already selected.
    /// Returns whether the set changed.
    pub fn add(&mut self, fund: FundIdentity) -> bool {
        if self.contains(&fund.code) {
            return false;
        }
        self.funds.push(fund);
        true
    }

    /// Returns whether a fund was removed.
    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.funds.len();
        self.funds.retain(|f| f.code != code);
        self.funds.len() != before
    }

    pub fn contains(&self, code: &str) -> bool {
        self.funds.iter().any(|f| f.code == code)
    }

    pub fn get(&self, code: &str) -> Option<&FundIdentity> {
        self.funds.iter().find(|f| f.code == code)
    }

    pub fn codes(&self) -> Vec<String> {
        self.funds.iter().map(|f| f.code.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FundIdentity> {
        self.funds.iter()
    }

    pub fn len(&self) -> usize {
        self.funds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }
}

impl FromIterator<FundIdentity> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = FundIdentity>>(iter: I) -> Self {
        let mut set = SelectionSet::new();
        for fund in iter {
            set.add(fund);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_add_is_a_noop() {
        let mut set = SelectionSet::new();
        let fund = FundIdentity::new("122639", "Fund X");
        assert!(set.add(fund.clone()));
        assert!(!set.add(fund));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn duplicate_code_keeps_first_name() {
        let mut set = SelectionSet::new();
        set.add(FundIdentity::new("122639", "Fund X"));
        set.add(FundIdentity::new("122639", "Other label"));
        assert_eq!(set.get("122639").unwrap().name, "Fund X");
    }

    #[test]
    fn removing_unknown_code_is_a_noop() {
        let mut set: SelectionSet = vec![FundIdentity::new("1", "A")].into_iter().collect();
        assert!(!set.remove("2"));
        assert_eq!(set.codes(), vec!["1".to_string()]);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut set = SelectionSet::new();
        set.add(FundIdentity::new("3", "C"));
        set.add(FundIdentity::new("1", "A"));
        set.add(FundIdentity::new("2", "B"));
        assert!(set.remove("1"));
        set.add(FundIdentity::new("1", "A"));
        assert_eq!(set.codes(), vec!["3", "2", "1"]);
    }

    #[test]
    fn remove_last_leaves_empty_set() {
        let mut set = SelectionSet::new();
        set.add(FundIdentity::new("1", "A"));
        assert!(set.remove("1"));
        assert!(set.is_empty());
    }
}
