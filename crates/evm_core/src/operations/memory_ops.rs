//! Memory, calldata, code, and hashing opcode handlers — everything that
//! reads or writes the byte-addressed memory buffer or the immutable
//! input/code byte strings.

use alloy::primitives::{keccak256, U256};

use crate::context::Context;
use primitives::errors::EvmResult;
use primitives::memory::{word_to_data_offset, word_to_offset};

/// Reads `len` bytes from `src` starting at `offset`, zero-extending past
/// the end rather than failing — `CALLDATALOAD`/`CALLDATACOPY`/
/// `CODECOPY` all share this behavior.
fn read_zero_extended(src: &[u8], offset: usize, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    if offset < src.len() {
        let available = (src.len() - offset).min(len);
        out[..available].copy_from_slice(&src[offset..offset + available]);
    }
    out
}

pub fn keccak256_op(ctx: &mut Context) -> EvmResult<()> {
    let (off, size) = ctx.stack.pop2()?;
    let off = word_to_offset(off)?;
    let size = word_to_offset(size)?;
    let bytes = ctx.memory.read(off, size)?;
    let hash = keccak256(&bytes);
    ctx.stack.push(U256::from_be_slice(hash.as_slice()))
}

pub fn callvalue(ctx: &mut Context) -> EvmResult<()> {
    ctx.stack.push(ctx.input.callvalue)
}

pub fn calldataload(ctx: &mut Context) -> EvmResult<()> {
    let i = ctx.stack.pop()?;
    let i = word_to_data_offset(i);
    let bytes = read_zero_extended(&ctx.input.calldata, i, 32);
    ctx.stack.push(U256::from_be_slice(&bytes))
}

pub fn calldatasize(ctx: &mut Context) -> EvmResult<()> {
    ctx.stack.push(U256::from(ctx.input.calldata.len() as u64))
}

pub fn calldatacopy(ctx: &mut Context) -> EvmResult<()> {
    let (dst, src, len) = ctx.stack.pop3()?;
    let dst = word_to_offset(dst)?;
    let src = word_to_data_offset(src);
    let len = word_to_offset(len)?;
    let bytes = read_zero_extended(&ctx.input.calldata, src, len);
    ctx.memory.write(dst, &bytes)
}

pub fn codesize(ctx: &mut Context) -> EvmResult<()> {
    ctx.stack.push(U256::from(ctx.code.len() as u64))
}

pub fn codecopy(ctx: &mut Context) -> EvmResult<()> {
    let (dst, src, len) = ctx.stack.pop3()?;
    let dst = word_to_offset(dst)?;
    let src = word_to_data_offset(src);
    let len = word_to_offset(len)?;
    let bytes = read_zero_extended(&ctx.code, src, len);
    ctx.memory.write(dst, &bytes)
}

pub fn mload(ctx: &mut Context) -> EvmResult<()> {
    let off = ctx.stack.pop()?;
    let off = word_to_offset(off)?;
    let word = ctx.memory.load_word(off)?;
    ctx.stack.push(word)
}

pub fn mstore(ctx: &mut Context) -> EvmResult<()> {
    let (off, word) = ctx.stack.pop2()?;
    let off = word_to_offset(off)?;
    ctx.memory.store_word(off, word)
}

pub fn mstore8(ctx: &mut Context) -> EvmResult<()> {
    let (off, word) = ctx.stack.pop2()?;
    let off = word_to_offset(off)?;
    let byte = word.to_be_bytes::<32>()[31];
    ctx.memory.store_byte(off, byte)
}

pub fn msize(ctx: &mut Context) -> EvmResult<()> {
    ctx.stack.push(U256::from(ctx.memory.len() as u64))
}

pub fn mcopy(ctx: &mut Context) -> EvmResult<()> {
    let (dst, src, len) = ctx.stack.pop3()?;
    let dst = word_to_offset(dst)?;
    let src = word_to_offset(src)?;
    let len = word_to_offset(len)?;
    ctx.memory.copy_within(dst, src, len)
}

pub fn returndatasize(ctx: &mut Context) -> EvmResult<()> {
    ctx.stack.push(U256::from(ctx.return_data.len() as u64))
}

pub fn returndatacopy(ctx: &mut Context) -> EvmResult<()> {
    let (dst, src, len) = ctx.stack.pop3()?;
    let dst = word_to_offset(dst)?;
    let src = word_to_data_offset(src);
    let len = word_to_offset(len)?;
    let bytes = read_zero_extended(&ctx.return_data, src, len);
    ctx.memory.write(dst, &bytes)
}

pub fn tload(ctx: &mut Context) -> EvmResult<()> {
    let key = ctx.stack.pop()?;
    let value = ctx.transient.t_load(key);
    ctx.stack.push(value)
}

pub fn tstore(ctx: &mut Context) -> EvmResult<()> {
    let (key, value) = ctx.stack.pop2()?;
    ctx.transient.t_store(key, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    #[test]
    fn calldataload_zero_extends_past_end() {
        let mut ctx = Context::for_test();
        ctx.input.calldata = vec![0xaa, 0xbb];
        ctx.stack.push(U256::from(0u64)).unwrap();
        calldataload(&mut ctx).unwrap();
        let word = ctx.stack.pop().unwrap();
        let mut expected = [0u8; 32];
        expected[0] = 0xaa;
        expected[1] = 0xbb;
        assert_eq!(word, U256::from_be_slice(&expected));
    }

    #[test]
    fn calldataload_past_end_is_zero() {
        let mut ctx = Context::for_test();
        ctx.input.calldata = vec![0xaa];
        ctx.stack.push(U256::from(5u64)).unwrap();
        calldataload(&mut ctx).unwrap();
        assert_eq!(ctx.stack.pop().unwrap(), U256::ZERO);
    }

    #[test]
    fn calldataload_with_offset_beyond_memory_cap_is_zero_not_an_error() {
        // An offset far larger than the memory cap is still a valid,
        // zero-extended read of calldata — it must not be rejected the
        // way an out-of-range memory offset would be.
        let mut ctx = Context::for_test();
        ctx.input.calldata = vec![0xaa];
        ctx.stack.push(U256::from(1u128 << 40)).unwrap();
        calldataload(&mut ctx).unwrap();
        assert_eq!(ctx.stack.pop().unwrap(), U256::ZERO);
    }

    #[test]
    fn mstore_then_mload_round_trips() {
        let mut ctx = Context::for_test();
        ctx.stack.push(U256::from(42u64)).unwrap();
        ctx.stack.push(U256::ZERO).unwrap();
        mstore(&mut ctx).unwrap();
        ctx.stack.push(U256::ZERO).unwrap();
        mload(&mut ctx).unwrap();
        assert_eq!(ctx.stack.pop().unwrap(), U256::from(42u64));
    }

    #[test]
    fn keccak256_of_empty_matches_known_hash() {
        let mut ctx = Context::for_test();
        ctx.stack.push(U256::ZERO).unwrap();
        ctx.stack.push(U256::ZERO).unwrap();
        keccak256_op(&mut ctx).unwrap();
        let result = ctx.stack.pop().unwrap();
        let expected =
            U256::from_be_slice(&keccak256(&[]).0);
        assert_eq!(result, expected);
    }

    #[test]
    fn tload_unset_key_is_zero() {
        let mut ctx = Context::for_test();
        ctx.stack.push(U256::from(7u64)).unwrap();
        tload(&mut ctx).unwrap();
        assert_eq!(ctx.stack.pop().unwrap(), U256::ZERO);
    }
}
