//! Arithmetic, comparison, and bitwise opcode handlers.
//!
//! Unsigned ops operate on `U256` directly; signed ops reinterpret the
//! same bits as `I256` the way the teacher's handlers do
//! (`I256::from_limbs(*a.as_limbs())`), but `SDIV`/`SMOD` here round
//! toward negative infinity rather than truncating toward zero — the
//! teacher's version used native `/`/`%`, which truncates.
//
// ref == https://www.evm.codes/

use alloy::primitives::{I256, U256};

use crate::context::Context;
use primitives::errors::EvmResult;

fn one() -> I256 {
    I256::from_raw(U256::from(1u64))
}

fn to_signed(w: U256) -> I256 {
    I256::from_raw(w)
}

fn from_signed(i: I256) -> U256 {
    i.into_raw()
}

/// Floor (round-toward-negative-infinity) signed division. `b == 0`
/// yields 0; `MIN / -1` wraps back to `MIN`, matching 256-bit
/// two's-complement overflow rather than panicking.
fn sdiv_floor(a: I256, b: I256) -> I256 {
    if b == I256::ZERO {
        return I256::ZERO;
    }
    if a == I256::MIN && b == -one() {
        return I256::MIN;
    }
    let q = a / b;
    let r = a % b;
    if r != I256::ZERO && r.is_negative() != b.is_negative() {
        q - one()
    } else {
        q
    }
}

fn smod_floor(a: I256, b: I256) -> I256 {
    if b == I256::ZERO {
        return I256::ZERO;
    }
    let r = a % b;
    if r != I256::ZERO && r.is_negative() != b.is_negative() {
        r + b
    } else {
        r
    }
}

/// Binary exponentiation, wrapping mod 2**256 at every squaring/multiply
/// step rather than computing the full-precision power first.
fn mod_pow(mut base: U256, mut exp: U256) -> U256 {
    let mut result = U256::from(1u64);
    while exp > U256::ZERO {
        if exp & U256::from(1u64) == U256::from(1u64) {
            result = result.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    result
}

/// ADD: push `a + b` mod 2**256.
pub fn add(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    ctx.stack.push(a.wrapping_add(b))
}

/// SUB: push `a - b` mod 2**256.
pub fn sub(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    ctx.stack.push(a.wrapping_sub(b))
}

pub fn mul(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    ctx.stack.push(a.wrapping_mul(b))
}

/// DIV: unsigned division, 0 on division by zero.
pub fn div(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    ctx.stack.push(if b.is_zero() { U256::ZERO } else { a / b })
}

/// SDIV: signed division rounding toward negative infinity, 0 on
/// division by zero.
pub fn sdiv(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    let result = sdiv_floor(to_signed(a), to_signed(b));
    ctx.stack.push(from_signed(result))
}

pub fn modulo(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    ctx.stack.push(if b.is_zero() { U256::ZERO } else { a % b })
}

pub fn smod(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    let result = smod_floor(to_signed(a), to_signed(b));
    ctx.stack.push(from_signed(result))
}

/// ADDMOD: `(a + b) mod n`, computed with a full-precision intermediate
/// (`a + b` can exceed 256 bits) rather than wrapping `a + b` first. `n
/// == 0` yields 0.
pub fn addmod(ctx: &mut Context) -> EvmResult<()> {
    let (a, b, n) = ctx.stack.pop3()?;
    ctx.stack.push(a.add_mod(b, n))
}

/// MULMOD: `(a * b) mod n`, computed with a full-precision intermediate
/// (`a * b` can take up to 512 bits) rather than wrapping `a * b` first.
/// `n == 0` yields 0.
pub fn mulmod(ctx: &mut Context) -> EvmResult<()> {
    let (a, b, n) = ctx.stack.pop3()?;
    ctx.stack.push(a.mul_mod(b, n))
}

/// EXP: modular exponentiation via repeated squaring, never naive
/// big-integer expansion of `base**exponent`.
pub fn exp(ctx: &mut Context) -> EvmResult<()> {
    let (base, exponent) = ctx.stack.pop2()?;
    ctx.stack.push(mod_pow(base, exponent))
}

/// SIGNEXTEND(b, x): if `b >= 31`, `x` is unchanged. Otherwise, treating
/// the low `b+1` bytes of `x` as a signed integer, sign-extend it to fill
/// the rest of the word; if that sign bit is clear, `x` is returned
/// unchanged (its high bytes are left as-is, not masked to zero).
pub fn signextend(ctx: &mut Context) -> EvmResult<()> {
    let (b, x) = ctx.stack.pop2()?;
    if b >= U256::from(31u64) {
        return ctx.stack.push(x);
    }
    let b: usize = b.to::<usize>();
    let bit_index = 8 * (b + 1) - 1;
    let sign_mask = U256::from(1u64) << bit_index;
    let sign_set = (x & sign_mask) != U256::ZERO;
    let result = if sign_set {
        let low_mask = (U256::from(1u64) << (bit_index + 1)) - U256::from(1u64);
        x | !low_mask
    } else {
        x
    };
    ctx.stack.push(result)
}

pub fn lt(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    ctx.stack.push(U256::from(a < b))
}

pub fn gt(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    ctx.stack.push(U256::from(a > b))
}

pub fn slt(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    ctx.stack.push(U256::from(to_signed(a).lt(&to_signed(b))))
}

pub fn sgt(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    ctx.stack.push(U256::from(to_signed(a).gt(&to_signed(b))))
}

pub fn eq(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    ctx.stack.push(U256::from(a == b))
}

pub fn iszero(ctx: &mut Context) -> EvmResult<()> {
    let a = ctx.stack.pop()?;
    ctx.stack.push(U256::from(a.is_zero()))
}

pub fn and(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    ctx.stack.push(a & b)
}

pub fn or(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    ctx.stack.push(a | b)
}

pub fn xor(ctx: &mut Context) -> EvmResult<()> {
    let (a, b) = ctx.stack.pop2()?;
    ctx.stack.push(a ^ b)
}

pub fn not(ctx: &mut Context) -> EvmResult<()> {
    let a = ctx.stack.pop()?;
    ctx.stack.push(!a)
}

/// BYTE(i, x): the `i`-th byte of `x`, 0-indexed from the most
/// significant byte; 0 when `i >= 32`.
pub fn byte(ctx: &mut Context) -> EvmResult<()> {
    let (i, x) = ctx.stack.pop2()?;
    let result = if i >= U256::from(32u64) {
        U256::ZERO
    } else {
        let idx: usize = i.to::<usize>();
        let bytes = x.to_be_bytes::<32>();
        U256::from(bytes[idx])
    };
    ctx.stack.push(result)
}

pub fn shl(ctx: &mut Context) -> EvmResult<()> {
    let (shift, value) = ctx.stack.pop2()?;
    let result = if shift >= U256::from(256u64) {
        U256::ZERO
    } else {
        value << shift.to::<usize>()
    };
    ctx.stack.push(result)
}

pub fn shr(ctx: &mut Context) -> EvmResult<()> {
    let (shift, value) = ctx.stack.pop2()?;
    let result = if shift >= U256::from(256u64) {
        U256::ZERO
    } else {
        value >> shift.to::<usize>()
    };
    ctx.stack.push(result)
}

/// SAR: arithmetic shift right; saturates to -1/0 rather than wrapping
/// once the shift reaches the word width.
pub fn sar(ctx: &mut Context) -> EvmResult<()> {
    let (shift, value) = ctx.stack.pop2()?;
    let signed = to_signed(value);
    let result = if shift >= U256::from(256u64) {
        if signed.is_negative() {
            from_signed(-one())
        } else {
            U256::ZERO
        }
    } else {
        from_signed(signed >> shift.to::<usize>())
    };
    ctx.stack.push(result)
}
