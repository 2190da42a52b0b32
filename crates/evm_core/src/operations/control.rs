//! Stack-shuffling, control-flow, termination, and FFI-dispatch opcode
//! handlers.

use alloy::primitives::U256;

use crate::context::Context;
use crate::ffi::{word_to_address, FfiOutcome};
use crate::opcodes::Instruction;
use primitives::errors::{EvmErrors, EvmResult};
use primitives::memory::word_to_offset;
use primitives::word::pad_to_word;

pub fn pop(ctx: &mut Context) -> EvmResult<()> {
    ctx.stack.pop()?;
    Ok(())
}

pub fn push(ctx: &mut Context, n: u8, bytes: &[u8]) -> EvmResult<()> {
    if bytes.len() != n as usize {
        return Err(EvmErrors::InvalidPush { n, len: bytes.len() });
    }
    ctx.stack.push(pad_to_word(bytes)?)
}

pub fn dup(ctx: &mut Context, n: u8) -> EvmResult<()> {
    ctx.stack.dup(n)
}

pub fn swap(ctx: &mut Context, n: u8) -> EvmResult<()> {
    ctx.stack.swap(n)
}

pub fn jumpdest(_ctx: &mut Context) -> EvmResult<()> {
    Ok(())
}

pub fn pc(ctx: &mut Context) -> EvmResult<()> {
    ctx.stack.push(U256::from(ctx.pc as u64))
}

pub fn gas(ctx: &mut Context) -> EvmResult<()> {
    // Gas accounting is out of scope; a large fixed constant lets
    // gas-aware bytecode (e.g. a `GAS` check before a risky call) still
    // take its "plenty of gas" branch.
    ctx.stack.push(U256::from(4_000_000u64))
}

fn is_jumpdest(ctx: &Context, dest: usize) -> bool {
    matches!(
        ctx.program_map.get(dest),
        Some(Some((Instruction::JumpDest, _)))
    )
}

/// Validates `dest` and sets `ctx.pc` to it. The driver's unconditional
/// post-step advance-by-length then lands past `JUMPDEST` (itself a
/// no-op), which is semantically equivalent to landing on it.
pub fn jump(ctx: &mut Context) -> EvmResult<()> {
    let dest = ctx.stack.pop()?;
    let dest = word_to_offset(dest).map_err(|_| EvmErrors::InvalidJumpDest(usize::MAX))?;
    if !is_jumpdest(ctx, dest) {
        return Err(EvmErrors::InvalidJumpDest(dest));
    }
    ctx.pc = dest;
    Ok(())
}

pub fn jumpi(ctx: &mut Context) -> EvmResult<()> {
    let (dest, cond) = ctx.stack.pop2()?;
    if cond.is_zero() {
        return Ok(());
    }
    let dest = word_to_offset(dest).map_err(|_| EvmErrors::InvalidJumpDest(usize::MAX))?;
    if !is_jumpdest(ctx, dest) {
        return Err(EvmErrors::InvalidJumpDest(dest));
    }
    ctx.pc = dest;
    Ok(())
}

pub fn stop(ctx: &mut Context) -> EvmResult<()> {
    ctx.return_data.clear();
    ctx.halted = true;
    Ok(())
}

pub fn ret(ctx: &mut Context) -> EvmResult<()> {
    let (off, size) = ctx.stack.pop2()?;
    let off = word_to_offset(off)?;
    let size = word_to_offset(size)?;
    ctx.return_data = ctx.memory.read(off, size)?;
    ctx.halted = true;
    Ok(())
}

pub fn revert(ctx: &mut Context) -> EvmResult<()> {
    let (off, size) = ctx.stack.pop2()?;
    let off = word_to_offset(off)?;
    let size = word_to_offset(size)?;
    ctx.return_data = ctx.memory.read(off, size)?;
    ctx.halted = true;
    ctx.reverted = true;
    Ok(())
}

pub fn invalid(_ctx: &mut Context) -> EvmResult<()> {
    Err(EvmErrors::InvalidOperation)
}

/// `STATICCALL gas, addr, argsOffset, argsSize, retOffset, retSize`.
/// `gas` is ignored — gas accounting is out of scope.
pub fn staticcall(ctx: &mut Context) -> EvmResult<()> {
    let gas = ctx.stack.pop()?;
    let _ = gas;
    let addr_word = ctx.stack.pop()?;
    let args_off = ctx.stack.pop()?;
    let args_size = ctx.stack.pop()?;
    let ret_off = ctx.stack.pop()?;
    let ret_size = ctx.stack.pop()?;

    let addr = word_to_address(addr_word);
    let args_off = word_to_offset(args_off)?;
    let args_size = word_to_offset(args_size)?;
    let ret_off = word_to_offset(ret_off)?;
    let ret_size = word_to_offset(ret_size)?;

    let args = ctx.memory.read(args_off, args_size)?;

    let handler = ctx
        .ffis
        .get(&addr)
        .ok_or(EvmErrors::UnknownFfi(addr))?
        .clone();

    log::debug!("STATICCALL -> {addr}");

    match handler(&args) {
        FfiOutcome::Return(data) => {
            let mut copy_out = data.clone();
            copy_out.resize(ret_size, 0);
            ctx.return_data = data;
            ctx.memory.write(ret_off, &copy_out[..ret_size])?;
            ctx.stack.push(U256::from(1u64))
        }
        FfiOutcome::Revert(data) => {
            ctx.return_data = data;
            ctx.halted = true;
            ctx.reverted = true;
            ctx.stack.push(U256::ZERO)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::build_program_map;

    fn ctx_with_code(code: &[u8]) -> Context {
        let mut ctx = Context::for_test();
        ctx.code = code.to_vec();
        ctx.program_map = build_program_map(&ctx.code);
        ctx
    }

    #[test]
    fn jump_to_jumpdest_succeeds() {
        use crate::opcodes::byte;
        let code = [byte::JUMPDEST];
        let mut ctx = ctx_with_code(&code);
        ctx.stack.push(U256::ZERO).unwrap();
        jump(&mut ctx).unwrap();
        assert_eq!(ctx.pc, 0);
    }

    #[test]
    fn jump_into_push_immediate_is_invalid() {
        use crate::opcodes::byte;
        let code = [byte::PUSH1, 0x01];
        let mut ctx = ctx_with_code(&code);
        ctx.stack.push(U256::from(1u64)).unwrap();
        assert_eq!(jump(&mut ctx), Err(EvmErrors::InvalidJumpDest(1)));
    }

    #[test]
    fn jumpi_is_noop_when_condition_zero() {
        use crate::opcodes::byte;
        let code = [byte::STOP];
        let mut ctx = ctx_with_code(&code);
        ctx.stack.push(U256::ZERO).unwrap(); // cond
        ctx.stack.push(U256::from(99u64)).unwrap(); // dest (never validated)
        jumpi(&mut ctx).unwrap();
        assert_eq!(ctx.pc, 0);
    }

    #[test]
    fn revert_sets_flags_and_data() {
        let mut ctx = Context::for_test();
        ctx.memory.write(0, &[0x42]).unwrap();
        ctx.stack.push(U256::from(1u64)).unwrap(); // size
        ctx.stack.push(U256::ZERO).unwrap(); // off
        revert(&mut ctx).unwrap();
        assert!(ctx.halted);
        assert!(ctx.reverted);
        assert_eq!(ctx.return_data, vec![0x42]);
    }

    #[test]
    fn staticcall_to_unregistered_address_errors() {
        let mut ctx = Context::for_test();
        // Pushed bottom-to-top: retSize, retOffset, argsSize, argsOffset,
        // addr, gas — so `gas` pops first and `addr` second, matching
        // STATICCALL's argument order.
        for v in [0u64, 0, 0, 0, 0x1234, 0] {
            ctx.stack.push(U256::from(v)).unwrap();
        }
        assert!(matches!(staticcall(&mut ctx), Err(EvmErrors::UnknownFfi(_))));
    }
}
