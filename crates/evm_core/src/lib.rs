//! A pure-function EVM bytecode interpreter: executes code against
//! calldata and returns return data, revert data, or a structured error.
//! No chain context, no persistent storage, no gas market — only
//! computation, memory, transient storage, and `STATICCALL` to
//! host-registered pure functions.

pub mod context;
pub mod ffi;
pub mod jump_tables;
pub mod opcodes;
pub mod operations;

use std::collections::HashMap;

use alloy::primitives::{Address, U256};

use context::{Context, Input};
use ffi::{FfiHandler, FfiTable};
use opcodes::{Instruction, ToInstructions};
use primitives::errors::EvmErrors;

pub use primitives::errors::EvmErrors as VmError;

/// Either raw bytecode or an already-decoded instruction sequence. The
/// disassembler (`[u8]::to_instructions`) is consulted only for the raw
/// form.
pub enum Bytecode {
    Raw(Vec<u8>),
    Instructions(Vec<Instruction>),
}

impl Bytecode {
    fn into_encoded(self) -> Vec<u8> {
        match self {
            Bytecode::Raw(bytes) => bytes,
            Bytecode::Instructions(instructions) => {
                let mut out = Vec::new();
                for insn in &instructions {
                    insn.encode(&mut out);
                }
                out
            }
        }
    }
}

impl From<Vec<u8>> for Bytecode {
    fn from(bytes: Vec<u8>) -> Self {
        Bytecode::Raw(bytes)
    }
}

/// The three knobs this interpreter exposes to a caller of `exec`.
#[derive(Default)]
pub struct ExecOpts {
    pub callvalue: U256,
    pub ffis: HashMap<Address, FfiHandler>,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    pub stack: Vec<U256>,
    pub reverted: bool,
    pub return_data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Ok(Vec<u8>),
    Revert(Vec<u8>),
}

/// Runs `code` against `calldata` to completion and returns the full
/// execution result, or the error that aborted it.
pub fn exec(code: Bytecode, calldata: Vec<u8>, opts: ExecOpts) -> Result<ExecResult, VmError> {
    let encoded = code.into_encoded();
    let ffis = FfiTable::new(opts.ffis);
    let input = Input {
        calldata,
        callvalue: opts.callvalue,
    };
    let mut ctx = Context::new(encoded, input, ffis);

    run(&mut ctx, opts.verbose)?;

    Ok(ExecResult {
        stack: ctx.stack.data,
        reverted: ctx.reverted,
        return_data: ctx.return_data,
    })
}

/// `exec`, collapsed to the two outcomes a typical caller cares about.
pub fn exec_call(code: Bytecode, calldata: Vec<u8>, opts: ExecOpts) -> Result<CallOutcome, VmError> {
    let result = exec(code, calldata, opts)?;
    Ok(if result.reverted {
        CallOutcome::Revert(result.return_data)
    } else {
        CallOutcome::Ok(result.return_data)
    })
}

/// The fetch-decode-dispatch loop. PC always advances by the current
/// instruction's encoded length after a successful step, including after
/// a jump lands on its destination — `JUMPDEST` is a no-op, so stepping
/// past it is equivalent to executing it.
fn run(ctx: &mut Context, verbose: bool) -> Result<(), EvmErrors> {
    loop {
        let (instr, len) = ctx
            .program_map
            .get(ctx.pc)
            .and_then(|entry| entry.clone())
            .ok_or(EvmErrors::PcOutOfBounds)?;

        if verbose {
            log::trace!("pc={:<6} {}", ctx.pc, instr);
        }

        operations::step(ctx, &instr)?;

        if ctx.halted {
            return Ok(());
        }

        ctx.pc += len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opcodes::byte;
    use std::sync::Arc;

    fn push1(n: u8) -> Vec<u8> {
        vec![byte::PUSH1, n]
    }

    #[test]
    fn identity_return() {
        // PUSH1 0x2a; PUSH1 0x00; MSTORE; PUSH1 0x20; PUSH1 0x00; RETURN
        let mut code = Vec::new();
        code.extend(push1(0x2a));
        code.extend(push1(0x00));
        code.push(byte::MSTORE);
        code.extend(push1(0x20));
        code.extend(push1(0x00));
        code.push(byte::RETURN);

        let result = exec_call(Bytecode::Raw(code), Vec::new(), ExecOpts::default()).unwrap();
        let mut expected = vec![0u8; 32];
        expected[31] = 0x2a;
        assert_eq!(result, CallOutcome::Ok(expected));
    }

    #[test]
    fn revert_with_data() {
        // PUSH1 0x01; PUSH1 0x00; MSTORE8; PUSH1 0x01; PUSH1 0x00; REVERT
        let mut code = Vec::new();
        code.extend(push1(0x01));
        code.extend(push1(0x00));
        code.push(byte::MSTORE8);
        code.extend(push1(0x01));
        code.extend(push1(0x00));
        code.push(byte::REVERT);

        let result = exec_call(Bytecode::Raw(code), Vec::new(), ExecOpts::default()).unwrap();
        assert_eq!(result, CallOutcome::Revert(vec![0x01]));
    }

    #[test]
    fn impure_opcode_is_rejected() {
        let code = vec![byte::SLOAD];
        let err = exec(Bytecode::Raw(code), Vec::new(), ExecOpts::default()).unwrap_err();
        assert_eq!(err, EvmErrors::Impure("SLOAD".to_string()));
    }

    #[test]
    fn jump_into_push_immediate_is_invalid_dest() {
        // PUSH1 0x03 (target lands inside the next PUSH1's immediate);
        // JUMP; PUSH1 0xff; STOP
        let mut code = Vec::new();
        code.extend(push1(0x03));
        code.push(byte::JUMP);
        code.extend(push1(0xff));
        code.push(byte::STOP);

        let err = exec(Bytecode::Raw(code), Vec::new(), ExecOpts::default()).unwrap_err();
        assert!(matches!(err, EvmErrors::InvalidJumpDest(3)));
    }

    #[test]
    fn ffi_round_trip_echoes_args() {
        let mut addr_bytes = [0u8; 20];
        addr_bytes[19] = 0xab;
        let addr = Address::new(addr_bytes);

        // Stack order at STATICCALL time (top first): gas, addr,
        // argsOffset, argsSize, retOffset, retSize. Pushed bottom-to-top
        // in the opposite order.
        let mut code = Vec::new();
        code.extend(push1(0x00)); // retSize
        code.extend(push1(0x00)); // retOffset
        code.extend(push1(0x00)); // argsSize
        code.extend(push1(0x00)); // argsOffset
        code.push(0x73); // PUSH20
        code.extend_from_slice(addr.as_slice());
        code.extend(push1(0x00)); // gas
        code.push(byte::STATICCALL);
        code.push(byte::STOP);

        let mut ffis: HashMap<Address, FfiHandler> = HashMap::new();
        ffis.insert(addr, Arc::new(|args: &[u8]| ffi::FfiOutcome::Return(args.to_vec())));

        let opts = ExecOpts {
            ffis,
            ..ExecOpts::default()
        };
        let result = exec(Bytecode::Raw(code), Vec::new(), opts).unwrap();
        assert_eq!(result.stack.last(), Some(&U256::from(1u64)));
    }

    #[test]
    fn console_log_builtin_succeeds() {
        let mut code = Vec::new();
        code.extend(push1(0x00)); // retSize
        code.extend(push1(0x00)); // retOffset
        code.extend(push1(0x00)); // argsSize
        code.extend(push1(0x00)); // argsOffset
        code.push(0x73); // PUSH20
        code.extend_from_slice(ffi::CONSOLE_LOG_ADDRESS.as_slice());
        code.extend(push1(0x00)); // gas
        code.push(byte::STATICCALL);
        code.push(byte::STOP);

        let result = exec(Bytecode::Raw(code), Vec::new(), ExecOpts::default()).unwrap();
        assert_eq!(result.stack.last(), Some(&U256::from(1u64)));
    }
}
