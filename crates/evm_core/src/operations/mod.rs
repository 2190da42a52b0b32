//! Per-opcode state transitions. `step` is the single entry point the
//! driver calls once per instruction; it is a `match` over the decoded
//! [`Instruction`](crate::opcodes::Instruction) rather than a raw-byte
//! jump table, since several variants (`Push`, `Dup`, `Swap`) carry a
//! payload a `[fn; 256]` table can't address — see
//! [`crate::jump_tables`] for the nullary subset that *is* dispatched
//! through a function-pointer table, in the teacher's original style.

pub mod ariths;
pub mod control;
pub mod memory_ops;

use crate::context::Context;
use crate::jump_tables::{jump_table, JUMP_TABLE_LEN};
use crate::opcodes::Instruction;
use primitives::errors::{EvmErrors, EvmResult};

/// Opcodes this interpreter refuses to execute because they observe or
/// mutate state outside its sandbox (chain context, persistent storage,
/// external accounts, logs, nested calls).
fn impure_name(instr: &Instruction) -> Option<&'static str> {
    use Instruction::*;
    let name = match instr {
        Address => "ADDRESS",
        Balance => "BALANCE",
        Origin => "ORIGIN",
        Caller => "CALLER",
        GasPrice => "GASPRICE",
        ExtCodeSize => "EXTCODESIZE",
        ExtCodeCopy => "EXTCODECOPY",
        ExtCodeHash => "EXTCODEHASH",
        BlockHash => "BLOCKHASH",
        CoinBase => "COINBASE",
        Timestamp => "TIMESTAMP",
        Number => "NUMBER",
        PrevRandao => "PREVRANDAO",
        GasLimit => "GASLIMIT",
        ChainId => "CHAINID",
        SelfBalance => "SELFBALANCE",
        BaseFee => "BASEFEE",
        BlobHash => "BLOBHASH",
        BlobBaseFee => "BLOBBASEFEE",
        SLoad => "SLOAD",
        SStore => "SSTORE",
        Log(_) => "LOG",
        Create => "CREATE",
        Call => "CALL",
        CallCode => "CALLCODE",
        DelegateCall => "DELEGATECALL",
        Create2 => "CREATE2",
        SelfDestruct => "SELFDESTRUCT",
        _ => return None,
    };
    Some(name)
}

pub fn step(ctx: &mut Context, instr: &Instruction) -> EvmResult<()> {
    if let Some(name) = impure_name(instr) {
        return Err(EvmErrors::Impure(name.to_string()));
    }

    match instr {
        Instruction::Push(bytes) => return control::push(ctx, bytes.len() as u8, bytes),
        Instruction::Dup(n) => return control::dup(ctx, *n),
        Instruction::Swap(n) => return control::swap(ctx, *n),
        Instruction::Jump => return control::jump(ctx),
        Instruction::Jumpi => return control::jumpi(ctx),
        Instruction::Stop => return control::stop(ctx),
        Instruction::Return => return control::ret(ctx),
        Instruction::Revert => return control::revert(ctx),
        Instruction::Invalid => return control::invalid(ctx),
        Instruction::StaticCall => return control::staticcall(ctx),
        Instruction::Unknown(_) => {
            return Err(EvmErrors::NotImplemented(format!("{instr}")));
        }
        _ => {}
    }

    // The remaining nullary opcodes are dispatched through the teacher's
    // function-pointer table, keyed by raw opcode byte.
    let opcode = encode_opcode_tag(instr);
    match jump_table()[opcode as usize] {
        Some(handler) => handler(ctx),
        None => Err(EvmErrors::NotImplemented(format!("{instr}"))),
    }
}

/// Maps a nullary `Instruction` to its raw opcode byte, which is what
/// [`crate::jump_tables::build_jump_table`] indexes by. Only called for
/// variants already known (by `step`) to carry no payload.
fn encode_opcode_tag(instr: &Instruction) -> u8 {
    let mut bytes = Vec::with_capacity(1);
    instr.encode(&mut bytes);
    debug_assert!((bytes[0] as usize) < JUMP_TABLE_LEN);
    bytes[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use alloy::primitives::U256;

    #[test]
    fn impure_opcode_is_rejected() {
        let mut ctx = Context::for_test();
        assert_eq!(
            step(&mut ctx, &Instruction::SLoad),
            Err(EvmErrors::Impure("SLOAD".to_string()))
        );
    }

    #[test]
    fn push_decodes_and_pads() {
        let mut ctx = Context::for_test();
        step(&mut ctx, &Instruction::Push(vec![0x2a])).unwrap();
        assert_eq!(ctx.stack.pop().unwrap(), U256::from(0x2au64));
    }

    #[test]
    fn add_dispatches_through_jump_table() {
        let mut ctx = Context::for_test();
        ctx.stack.push(U256::from(2u64)).unwrap();
        ctx.stack.push(U256::from(3u64)).unwrap();
        step(&mut ctx, &Instruction::Add).unwrap();
        assert_eq!(ctx.stack.pop().unwrap(), U256::from(5u64));
    }
}
