//! Option series identity and escrow requirements.

use alloy_primitives::{keccak256, Address, B256, U256};

use crate::fixed_point::wad_mul;
use crate::MathError;

/// Asset address standing for the chain's native currency.
pub const NATIVE_ASSET: Address = Address::ZERO;

/// Represents the type of option contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionType {
    /// Call option: Right to BUY underlying at strike price.
    #[default]
    Call,
    /// Put option: Right to SELL underlying at strike price.
    Put,
}

impl OptionType {
    /// Converts option type to u8 for encoding.
    ///
    /// # Returns
    /// - `0` for Call
    /// - `1` for Put
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Call => 0,
            Self::Put => 1,
        }
    }

    /// Decodes the ABI representation, `None` for anything but 0 or 1.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Call),
            1 => Some(Self::Put),
            _ => None,
        }
    }
}

/// When holders may exercise a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExerciseStyle {
    /// Any time up to and including expiration.
    #[default]
    American,
    /// Only during the window that opens at expiration.
    European,
}

impl ExerciseStyle {
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::American => 0,
            Self::European => 1,
        }
    }

    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::American),
            1 => Some(Self::European),
            _ => None,
        }
    }

    /// Whether exercise is allowed at `now` for a series expiring at
    /// `expiration` with a European window of `window` seconds.
    #[must_use]
    pub const fn can_exercise(self, expiration: u64, window: u64, now: u64) -> bool {
        match self {
            Self::American => now <= expiration,
            Self::European => now >= expiration && now <= expiration.saturating_add(window),
        }
    }

    /// First instant at which no holder can exercise any more.
    #[must_use]
    pub const fn exercise_deadline(self, expiration: u64, window: u64) -> u64 {
        match self {
            Self::American => expiration,
            Self::European => expiration.saturating_add(window),
        }
    }
}

/// The immutable tuple that identifies a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesTerms {
    pub underlying: Address,
    pub strike_asset: Address,
    pub expiration: u64,
    pub option_type: OptionType,
    /// Strike asset per unit of underlying, wad.
    pub strike: U256,
}

impl SeriesTerms {
    /// Content-addressed series id.
    ///
    /// Computed as `keccak256(underlying, strike_asset, expiration, flavor, strike)`
    /// with the integers big-endian and 32 bytes wide. Issuing the same terms
    /// twice yields the same id.
    #[must_use]
    pub fn id(&self) -> B256 {
        let encoded = [
            self.underlying.as_slice(),
            self.strike_asset.as_slice(),
            U256::from(self.expiration).to_be_bytes::<32>().as_slice(),
            &[self.option_type.to_u8()],
            self.strike.to_be_bytes::<32>().as_slice(),
        ]
        .concat();

        keccak256(encoded)
    }

    /// Asset writers escrow: underlying for calls, strike asset for puts.
    #[must_use]
    pub const fn collateral_asset(&self) -> Address {
        match self.option_type {
            OptionType::Call => self.underlying,
            OptionType::Put => self.strike_asset,
        }
    }

    /// Asset exercisers pay in: strike asset for calls, underlying for puts.
    #[must_use]
    pub const fn counter_asset(&self) -> Address {
        match self.option_type {
            OptionType::Call => self.strike_asset,
            OptionType::Put => self.underlying,
        }
    }

    /// Collateral backing `amount` contracts.
    ///
    /// # Errors
    /// - `Overflow`: if `strike * amount` does not fit 256 bits
    pub fn collateral_for(&self, amount: U256) -> Result<U256, MathError> {
        match self.option_type {
            OptionType::Call => Ok(amount),
            OptionType::Put => wad_mul(self.strike, amount),
        }
    }

    /// Counter-asset an exerciser pays for `amount` contracts.
    ///
    /// # Errors
    /// - `Overflow`: if `strike * amount` does not fit 256 bits
    pub fn exercise_payment(&self, amount: U256) -> Result<U256, MathError> {
        match self.option_type {
            OptionType::Call => wad_mul(self.strike, amount),
            OptionType::Put => Ok(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WAD;

    fn terms(option_type: OptionType) -> SeriesTerms {
        SeriesTerms {
            underlying: Address::from([0x11; 20]),
            strike_asset: Address::from([0x22; 20]),
            expiration: 1_700_000_000,
            option_type,
            strike: U256::from(250) * WAD,
        }
    }

    #[test]
    fn test_id_is_deterministic() {
        assert_eq!(terms(OptionType::Call).id(), terms(OptionType::Call).id());
    }

    #[test]
    fn test_id_distinguishes_every_field() {
        let base = terms(OptionType::Call);
        let variants = [
            SeriesTerms { underlying: Address::from([0x33; 20]), ..base },
            SeriesTerms { strike_asset: Address::from([0x33; 20]), ..base },
            SeriesTerms { expiration: base.expiration + 1, ..base },
            SeriesTerms { option_type: OptionType::Put, ..base },
            SeriesTerms { strike: base.strike + U256::from(1), ..base },
        ];
        for variant in variants {
            assert_ne!(variant.id(), base.id(), "{variant:?}");
        }
    }

    #[test]
    fn test_option_type_round_trip() {
        assert_eq!(OptionType::from_u8(OptionType::Put.to_u8()), Some(OptionType::Put));
        assert_eq!(OptionType::from_u8(2), None);
        assert_eq!(ExerciseStyle::from_u8(1), Some(ExerciseStyle::European));
        assert_eq!(ExerciseStyle::from_u8(7), None);
    }

    #[test]
    fn test_call_escrows_underlying_one_to_one() {
        let call = terms(OptionType::Call);
        assert_eq!(call.collateral_asset(), call.underlying);
        assert_eq!(call.counter_asset(), call.strike_asset);
        assert_eq!(call.collateral_for(U256::from(3) * WAD).unwrap(), U256::from(3) * WAD);
        assert_eq!(call.exercise_payment(U256::from(2) * WAD).unwrap(), U256::from(500) * WAD);
    }

    #[test]
    fn test_put_escrows_strike_times_amount() {
        let put = terms(OptionType::Put);
        assert_eq!(put.collateral_asset(), put.strike_asset);
        assert_eq!(put.counter_asset(), put.underlying);
        assert_eq!(put.collateral_for(U256::from(2) * WAD).unwrap(), U256::from(500) * WAD);
        assert_eq!(put.exercise_payment(U256::from(2) * WAD).unwrap(), U256::from(2) * WAD);
    }

    #[test]
    fn test_exercise_windows() {
        let american = ExerciseStyle::American;
        assert!(american.can_exercise(100, 50, 0));
        assert!(american.can_exercise(100, 50, 100));
        assert!(!american.can_exercise(100, 50, 101));

        let european = ExerciseStyle::European;
        assert!(!european.can_exercise(100, 50, 99));
        assert!(european.can_exercise(100, 50, 100));
        assert!(european.can_exercise(100, 50, 150));
        assert!(!european.can_exercise(100, 50, 151));
        assert_eq!(european.exercise_deadline(100, 50), 150);
    }
}
