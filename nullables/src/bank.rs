//! Nullable bank with module-account balances.

use oracle_store::{BankError, BankKeeper};
use oracle_types::Coin;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

type Balances = BTreeMap<String, BTreeMap<String, u128>>;

#[derive(Default)]
pub struct NullBank {
    balances: Mutex<Balances>,
}

impl NullBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a module account out of thin air.
    pub fn mint(&self, module: &str, coin: Coin) {
        *self
            .balances()
            .entry(module.to_string())
            .or_default()
            .entry(coin.denom)
            .or_default() += coin.amount;
    }

    pub fn balance(&self, module: &str, denom: &str) -> u128 {
        self.balances()
            .get(module)
            .and_then(|m| m.get(denom))
            .copied()
            .unwrap_or(0)
    }

    fn balances(&self) -> MutexGuard<'_, Balances> {
        self.balances.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BankKeeper for NullBank {
    fn module_balances(&self, module: &str) -> Vec<Coin> {
        self.balances()
            .get(module)
            .map(|m| {
                m.iter()
                    .filter(|(_, amount)| **amount > 0)
                    .map(|(denom, amount)| Coin::new(denom.clone(), *amount))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn send_coins_from_module_to_module(
        &self,
        sender: &str,
        recipient: &str,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        let mut balances = self.balances();
        let from = balances
            .get(sender)
            .ok_or_else(|| BankError::UnknownModule(sender.to_string()))?;
        for coin in amount {
            let available = from.get(&coin.denom).copied().unwrap_or(0);
            if available < coin.amount {
                return Err(BankError::InsufficientFunds {
                    module: sender.to_string(),
                    needed: coin.clone(),
                    available,
                });
            }
        }

        for coin in amount {
            if let Some(balance) = balances
                .get_mut(sender)
                .and_then(|m| m.get_mut(&coin.denom))
            {
                *balance -= coin.amount;
            }
            *balances
                .entry(recipient.to_string())
                .or_default()
                .entry(coin.denom.clone())
                .or_default() += coin.amount;
        }
        Ok(())
    }
}
