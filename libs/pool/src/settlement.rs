//! All-or-nothing settlement of custody effects
//!
//! An operation lists the transfers, mints and burns it needs in order.
//! They are applied one at a time; when one fails, the ones already applied
//! are undone in reverse order before the error is returned.

use crate::custody::{CustodyError, LpLedger, TokenVault};
use crate::error::PoolError;
use dex_types::Address;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Effect {
    /// Holder -> pool vault
    Pull {
        mint: Address,
        from: Address,
        vault: Address,
        amount: u64,
    },
    /// Pool vault -> holder
    Release {
        mint: Address,
        vault: Address,
        to: Address,
        amount: u64,
    },
    MintShares {
        lp_mint: Address,
        owner: Address,
        amount: u64,
    },
    BurnShares {
        lp_mint: Address,
        owner: Address,
        amount: u64,
    },
}

impl Effect {
    fn apply(&self, vault: &dyn TokenVault, ledger: &dyn LpLedger) -> Result<(), CustodyError> {
        match *self {
            Effect::Pull {
                mint,
                from,
                vault: to,
                amount,
            } => vault.transfer_in(&mint, &from, &to, amount),
            Effect::Release {
                mint,
                vault: from,
                to,
                amount,
            } => vault.transfer_out(&mint, &from, &to, amount),
            Effect::MintShares {
                lp_mint,
                owner,
                amount,
            } => ledger.mint(&lp_mint, &owner, amount),
            Effect::BurnShares {
                lp_mint,
                owner,
                amount,
            } => ledger.burn(&lp_mint, &owner, amount),
        }
    }

    fn inverse(&self) -> Effect {
        match *self {
            Effect::Pull {
                mint,
                from,
                vault,
                amount,
            } => Effect::Release {
                mint,
                vault,
                to: from,
                amount,
            },
            Effect::Release {
                mint,
                vault,
                to,
                amount,
            } => Effect::Pull {
                mint,
                from: to,
                vault,
                amount,
            },
            Effect::MintShares {
                lp_mint,
                owner,
                amount,
            } => Effect::BurnShares {
                lp_mint,
                owner,
                amount,
            },
            Effect::BurnShares {
                lp_mint,
                owner,
                amount,
            } => Effect::MintShares {
                lp_mint,
                owner,
                amount,
            },
        }
    }

    fn amount(&self) -> u64 {
        match *self {
            Effect::Pull { amount, .. }
            | Effect::Release { amount, .. }
            | Effect::MintShares { amount, .. }
            | Effect::BurnShares { amount, .. } => amount,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Settlement {
    effects: Vec<Effect>,
}

impl Settlement {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue an effect; zero amounts are dropped
    pub(crate) fn then(mut self, effect: Effect) -> Self {
        if effect.amount() > 0 {
            self.effects.push(effect);
        }
        self
    }

    pub(crate) fn execute(
        &self,
        vault: &dyn TokenVault,
        ledger: &dyn LpLedger,
    ) -> Result<(), PoolError> {
        for (applied, effect) in self.effects.iter().enumerate() {
            if let Err(cause) = effect.apply(vault, ledger) {
                warn!(
                    ?effect,
                    "Settlement failed: {}; rolling back {} applied effects",
                    cause,
                    applied
                );
                for done in self.effects[..applied].iter().rev() {
                    if let Err(rollback) = done.inverse().apply(vault, ledger) {
                        error!(?done, %rollback, "Rollback failed, custody is inconsistent");
                        return Err(PoolError::RollbackFailed { cause, rollback });
                    }
                }
                return Err(PoolError::Custody(cause));
            }
        }
        Ok(())
    }
}
