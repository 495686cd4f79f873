//! Collateral and position bookkeeping for one series.
//!
//! The contract loads a [`SeriesBook`] and the caller's [`Position`] out of
//! storage, applies one transition here, and writes both back only if the
//! transition succeeded.

use alloy_primitives::U256;
use options_core::fixed_point::mul_div;

use crate::{
    AlreadyRedeemed, InsufficientWrittenAmount, NotWriter, Overflow, RegistryError,
};

/// Aggregate state of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesBook {
    /// Written amount still owed a redemption.
    pub total_written: U256,
    /// Collateral held for the series.
    pub collateral_locked: U256,
    /// Counter-asset paid in by exercisers, not yet redeemed.
    pub exercise_proceeds: U256,
    pub total_exercised: U256,
}

/// One writer's stake in a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// Amount the writer may still close.
    pub open: U256,
    /// Weight of the writer's redemption claim.
    pub written: U256,
    pub redeemed: bool,
}

/// Lifecycle phase of a series at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesState {
    Unissued,
    /// Before expiration; positions can be opened and closed.
    Active,
    /// Expired but holders may still exercise.
    Exercisable,
    /// Exercise is over; writers may redeem.
    Redeemable,
    /// Every writer has redeemed.
    Settled,
}

impl SeriesState {
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Unissued => 0,
            Self::Active => 1,
            Self::Exercisable => 2,
            Self::Redeemable => 3,
            Self::Settled => 4,
        }
    }

    /// Phase of an issued series with `deadline` as the last exercise instant.
    #[must_use]
    pub fn at(expiration: u64, deadline: u64, now: u64, book: &SeriesBook) -> Self {
        if now < expiration {
            Self::Active
        } else if now <= deadline {
            Self::Exercisable
        } else if book.total_written.is_zero() {
            Self::Settled
        } else {
            Self::Redeemable
        }
    }
}

impl SeriesBook {
    /// Records `amount` newly written contracts backed by `collateral`.
    ///
    /// # Errors
    /// - `Overflow`: if a total exceeds `U256::MAX`
    pub fn open(
        &mut self,
        position: &mut Position,
        amount: U256,
        collateral: U256,
    ) -> Result<(), RegistryError> {
        self.total_written = add(self.total_written, amount)?;
        self.collateral_locked = add(self.collateral_locked, collateral)?;
        position.open = add(position.open, amount)?;
        position.written = add(position.written, amount)?;
        Ok(())
    }

    /// Unwinds `amount` of the writer's own position and releases `collateral`.
    ///
    /// # Errors
    /// - `InsufficientWrittenAmount`: if the writer has less than `amount` open
    pub fn close(
        &mut self,
        position: &mut Position,
        amount: U256,
        collateral: U256,
    ) -> Result<(), RegistryError> {
        if position.open < amount {
            return Err(insufficient_written(position.open, amount));
        }
        let locked = self
            .collateral_locked
            .checked_sub(collateral)
            .ok_or_else(|| insufficient_written(position.open, amount))?;

        position.open -= amount;
        position.written -= amount;
        self.total_written -= amount;
        self.collateral_locked = locked;
        Ok(())
    }

    /// Settles an exercise of `amount` contracts.
    ///
    /// Returns the collateral owed to the exerciser, capped by what the series
    /// still holds.
    ///
    /// # Errors
    /// - `Overflow`: if a total exceeds `U256::MAX`
    pub fn exercise(
        &mut self,
        amount: U256,
        collateral_due: U256,
        payment: U256,
    ) -> Result<U256, RegistryError> {
        let payout = collateral_due.min(self.collateral_locked);
        self.exercise_proceeds = add(self.exercise_proceeds, payment)?;
        self.total_exercised = add(self.total_exercised, amount)?;
        self.collateral_locked -= payout;
        Ok(payout)
    }

    /// Pays the writer's share of the remaining collateral and proceeds.
    ///
    /// The share is `remaining * written / total_written` of each pool, and
    /// both pools and `total_written` shrink by what was paid, so the final
    /// redeemer takes whatever rounding left behind.
    ///
    /// # Errors
    /// - `NotWriter`: if the writer has nothing written
    /// - `AlreadyRedeemed`: if the writer already redeemed
    pub fn redeem(&mut self, position: &mut Position) -> Result<(U256, U256), RegistryError> {
        if position.redeemed {
            return Err(RegistryError::AlreadyRedeemed(AlreadyRedeemed {}));
        }
        if position.written.is_zero() {
            return Err(RegistryError::NotWriter(NotWriter {}));
        }

        let collateral = mul_div(self.collateral_locked, position.written, self.total_written)?;
        let proceeds = mul_div(self.exercise_proceeds, position.written, self.total_written)?;

        self.collateral_locked -= collateral;
        self.exercise_proceeds -= proceeds;
        self.total_written -= position.written;
        position.open = U256::ZERO;
        position.redeemed = true;
        Ok((collateral, proceeds))
    }
}

fn add(a: U256, b: U256) -> Result<U256, RegistryError> {
    a.checked_add(b)
        .ok_or(RegistryError::Overflow(Overflow {}))
}

const fn insufficient_written(available: U256, requested: U256) -> RegistryError {
    RegistryError::InsufficientWrittenAmount(InsufficientWrittenAmount {
        available,
        requested,
    })
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        /// Property: redemptions pay out exactly what the series holds
        #[test]
        fn prop_redemption_conserves_pools(
            writes in prop::collection::vec(1u64..1_000_000_000, 1..8),
            exercised_bps in 0u64..=10_000,
            proceeds in 0u64..u64::MAX,
        ) {
            let mut book = SeriesBook::default();
            let mut positions = vec![Position::default(); writes.len()];
            for (position, amount) in positions.iter_mut().zip(&writes) {
                book.open(position, U256::from(*amount), U256::from(*amount)).unwrap();
            }

            let written = book.total_written;
            let exercised = written * U256::from(exercised_bps) / U256::from(10_000);
            book.exercise(exercised, exercised, U256::from(proceeds)).unwrap();

            let escrow = book.collateral_locked;
            let mut paid_collateral = U256::ZERO;
            let mut paid_proceeds = U256::ZERO;
            for position in &mut positions {
                let (collateral, proceeds) = book.redeem(position).unwrap();
                paid_collateral += collateral;
                paid_proceeds += proceeds;
            }

            prop_assert_eq!(paid_collateral, escrow);
            prop_assert_eq!(paid_proceeds, U256::from(proceeds));
            prop_assert_eq!(book.total_written, U256::ZERO);
        }
    }
}
