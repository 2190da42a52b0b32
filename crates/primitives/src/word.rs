//! Conversions between the crate's two views of a 256-bit word: the
//! unsigned integer the stack stores natively, and the two's-complement
//! signed integer a handful of opcodes (`SDIV`, `SMOD`, `SLT`, `SGT`, `SAR`)
//! operate on instead.

use alloy::primitives::{I256, U256};

use crate::errors::{EvmErrors, EvmResult};

pub const WORD_BYTES: usize = 32;

/// Reinterprets a word's bits as an unsigned integer. Total: every `U256`
/// is already the unsigned view.
pub fn uint(w: U256) -> U256 {
    w
}

/// Reinterprets a word's bits as a signed two's-complement integer. Total.
pub fn sint(w: U256) -> I256 {
    I256::from_raw(w)
}

/// Builds a word from an unsigned value. `U256` values constructed inside
/// this crate never exceed 256 bits, so this never actually fails; kept
/// for symmetry with [`to_word_s`] and as the landing spot if a future
/// caller hands in a wider source type.
pub fn to_word_u(x: U256) -> EvmResult<U256> {
    Ok(x)
}

/// Builds a word from a signed value, rejecting it if it cannot be
/// represented as a 256-bit two's-complement integer.
pub fn to_word_s(x: I256) -> EvmResult<U256> {
    if x < I256::MIN || x > I256::MAX {
        return Err(EvmErrors::SignedIntegerOutOfBounds);
    }
    Ok(x.into_raw())
}

/// Left-pads (or rejects) a byte slice into a 32-byte word. Bytecode
/// decoding never produces a slice wider than 32 bytes for a legitimate
/// `PUSH`, but this guards the handful of call sites that build a word
/// from caller-supplied bytes directly (e.g. CALLVALUE construction).
pub fn pad_to_word(bytes: &[u8]) -> EvmResult<U256> {
    if bytes.len() > WORD_BYTES {
        return Err(EvmErrors::ValueOverflow);
    }
    Ok(U256::from_be_slice(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_to_word_left_pads() {
        let w = pad_to_word(&[0x2a]).unwrap();
        assert_eq!(w, U256::from(0x2au64));
    }

    #[test]
    fn pad_to_word_rejects_oversize() {
        let bytes = [0u8; 33];
        assert_eq!(pad_to_word(&bytes), Err(EvmErrors::ValueOverflow));
    }

    #[test]
    fn sint_round_trips_negative_one() {
        let minus_one = U256::MAX;
        assert_eq!(sint(minus_one), I256::MINUS_ONE);
        assert_eq!(to_word_s(I256::MINUS_ONE).unwrap(), minus_one);
    }
}
