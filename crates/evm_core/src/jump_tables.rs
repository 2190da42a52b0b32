//! The function-pointer dispatch table for nullary, always-fallible-only-
//! on-stack-depth opcodes, in the teacher's original style
//! (`[fn(&mut Evm); 256]`, one array slot per raw opcode byte). Opcodes
//! that carry a payload (`Push`, `Dup`, `Swap`) or need pre-dispatch
//! handling (jumps, termination, `STATICCALL`, impure rejection) are
//! handled directly by [`crate::operations::step`] instead and never
//! reach this table.

use std::sync::OnceLock;

use crate::context::Context;
use crate::operations::{ariths::*, control, memory_ops::*};
use crate::opcodes::byte;
use primitives::errors::EvmResult;

pub const JUMP_TABLE_LEN: usize = 256;

pub type OpcodeFn = fn(&mut Context) -> EvmResult<()>;

/// Built once and cached; the table never depends on execution state.
pub fn jump_table() -> &'static [Option<OpcodeFn>; JUMP_TABLE_LEN] {
    static TABLE: OnceLock<[Option<OpcodeFn>; JUMP_TABLE_LEN]> = OnceLock::new();
    TABLE.get_or_init(build_jump_table)
}

fn build_jump_table() -> [Option<OpcodeFn>; JUMP_TABLE_LEN] {
    let mut table: [Option<OpcodeFn>; JUMP_TABLE_LEN] = [None; JUMP_TABLE_LEN];

    table[byte::ADD as usize] = Some(add);
    table[byte::MUL as usize] = Some(mul);
    table[byte::SUB as usize] = Some(sub);
    table[byte::DIV as usize] = Some(div);
    table[byte::SDIV as usize] = Some(sdiv);
    table[byte::MOD as usize] = Some(modulo);
    table[byte::SMOD as usize] = Some(smod);
    table[byte::ADDMOD as usize] = Some(addmod);
    table[byte::MULMOD as usize] = Some(mulmod);
    table[byte::EXP as usize] = Some(exp);
    table[byte::SIGNEXTEND as usize] = Some(signextend);
    table[byte::LT as usize] = Some(lt);
    table[byte::GT as usize] = Some(gt);
    table[byte::SLT as usize] = Some(slt);
    table[byte::SGT as usize] = Some(sgt);
    table[byte::EQ as usize] = Some(eq);
    table[byte::ISZERO as usize] = Some(iszero);
    table[byte::AND as usize] = Some(and);
    table[byte::OR as usize] = Some(or);
    table[byte::XOR as usize] = Some(xor);
    table[byte::NOT as usize] = Some(not);
    table[byte::BYTE as usize] = Some(byte);
    table[byte::SHL as usize] = Some(shl);
    table[byte::SHR as usize] = Some(shr);
    table[byte::SAR as usize] = Some(sar);

    table[byte::KECCAK256 as usize] = Some(keccak256_op);
    table[byte::CALLVALUE as usize] = Some(callvalue);
    table[byte::CALLDATALOAD as usize] = Some(calldataload);
    table[byte::CALLDATASIZE as usize] = Some(calldatasize);
    table[byte::CALLDATACOPY as usize] = Some(calldatacopy);
    table[byte::CODESIZE as usize] = Some(codesize);
    table[byte::CODECOPY as usize] = Some(codecopy);
    table[byte::MLOAD as usize] = Some(mload);
    table[byte::MSTORE as usize] = Some(mstore);
    table[byte::MSTORE8 as usize] = Some(mstore8);
    table[byte::MSIZE as usize] = Some(msize);
    table[byte::MCOPY as usize] = Some(mcopy);
    table[byte::RETURNDATASIZE as usize] = Some(returndatasize);
    table[byte::RETURNDATACOPY as usize] = Some(returndatacopy);
    table[byte::TLOAD as usize] = Some(tload);
    table[byte::TSTORE as usize] = Some(tstore);

    table[byte::POP as usize] = Some(control::pop);
    table[byte::PC as usize] = Some(control::pc);
    table[byte::JUMPDEST as usize] = Some(control::jumpdest);
    table[byte::GAS as usize] = Some(control::gas);

    table
}
