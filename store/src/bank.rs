//! Bank module as seen by the oracle: module-account balances and transfers.

use oracle_types::Coin;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BankError {
    #[error("insufficient funds in {module}: need {needed}, have {available}")]
    InsufficientFunds {
        module: String,
        needed: Coin,
        available: u128,
    },

    #[error("unknown module account: {0}")]
    UnknownModule(String),
}

pub trait BankKeeper {
    /// Every non-zero balance held by a module account, ordered by denom.
    fn module_balances(&self, module: &str) -> Vec<Coin>;

    fn send_coins_from_module_to_module(
        &self,
        sender: &str,
        recipient: &str,
        amount: &[Coin],
    ) -> Result<(), BankError>;
}
