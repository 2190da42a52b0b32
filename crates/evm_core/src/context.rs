//! The mutable execution state threaded through every opcode handler.

use alloy::primitives::U256;

use primitives::memory::Memory;
use primitives::stack::Stack;
use primitives::storage::TransientStorage;

use crate::ffi::FfiTable;
use crate::opcodes::ProgramMap;

#[derive(Debug, Clone, Default)]
pub struct Input {
    pub calldata: Vec<u8>,
    pub callvalue: U256,
}

/// One execution's worth of mutable state. Constructed once per `exec`
/// call and discarded when the driver halts.
pub struct Context {
    pub code: Vec<u8>,
    pub program_map: ProgramMap,
    pub pc: usize,
    pub stack: Stack,
    pub memory: Memory,
    pub transient: TransientStorage,
    pub input: Input,
    pub halted: bool,
    pub reverted: bool,
    pub return_data: Vec<u8>,
    pub ffis: FfiTable,
}

impl Context {
    pub fn new(code: Vec<u8>, input: Input, ffis: FfiTable) -> Self {
        let program_map = crate::opcodes::build_program_map(&code);
        Context {
            code,
            program_map,
            pc: 0,
            stack: Stack::default(),
            memory: Memory::new(),
            transient: TransientStorage::new(),
            input,
            halted: false,
            reverted: false,
            return_data: Vec::new(),
            ffis,
        }
    }

    /// An empty context with no code, for unit-testing individual opcode
    /// handlers without going through `exec`.
    #[cfg(test)]
    pub fn for_test() -> Self {
        Context::new(Vec::new(), Input::default(), FfiTable::default())
    }
}
