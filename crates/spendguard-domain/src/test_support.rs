use crate::model::{BudgetState, PolicyModel};
use spendguard_types::{Money, Transaction};
use std::collections::BTreeSet;

pub fn money(s: &str) -> Money {
    s.parse().expect("test amount")
}

pub fn tx(amount: &str, destination: &str) -> Transaction {
    Transaction::new(money(amount), destination).with_token("USDC")
}

pub fn tx_with_purpose(amount: &str, destination: &str, purpose: &str) -> Transaction {
    tx(amount, destination).with_purpose(purpose)
}

pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn budget(spent: &str) -> BudgetState {
    BudgetState::with_spent(money(spent))
}

pub fn per_tx(limit: &str) -> PolicyModel {
    PolicyModel {
        per_tx_limit: Some(money(limit)),
        ..PolicyModel::default()
    }
}

pub fn total(limit: &str) -> PolicyModel {
    PolicyModel {
        total_limit: Some(money(limit)),
        ..PolicyModel::default()
    }
}

pub fn allow(entries: &[&str]) -> PolicyModel {
    PolicyModel {
        allowed_destinations: set(entries),
        ..PolicyModel::default()
    }
}

pub fn block(entries: &[&str]) -> PolicyModel {
    PolicyModel {
        blocked_categories: set(entries),
        ..PolicyModel::default()
    }
}
