//! Decoded bytecode instructions and the raw opcode byte values they
//! encode to/from.
//!
//! `Instruction` is the data model the rest of the crate dispatches on;
//! `decode`/`encode` are the disassembler/assembler this crate owns
//! directly rather than depending on an external tool for.

use std::fmt;

/// Raw opcode byte values, kept separate from `Instruction` so decoding
/// can match on them without constructing throwaway variants first.
#[allow(dead_code)]
pub mod byte {
    pub const STOP: u8 = 0x00;
    pub const ADD: u8 = 0x01;
    pub const MUL: u8 = 0x02;
    pub const SUB: u8 = 0x03;
    pub const DIV: u8 = 0x04;
    pub const SDIV: u8 = 0x05;
    pub const MOD: u8 = 0x06;
    pub const SMOD: u8 = 0x07;
    pub const ADDMOD: u8 = 0x08;
    pub const MULMOD: u8 = 0x09;
    pub const EXP: u8 = 0x0a;
    pub const SIGNEXTEND: u8 = 0x0b;
    pub const LT: u8 = 0x10;
    pub const GT: u8 = 0x11;
    pub const SLT: u8 = 0x12;
    pub const SGT: u8 = 0x13;
    pub const EQ: u8 = 0x14;
    pub const ISZERO: u8 = 0x15;
    pub const AND: u8 = 0x16;
    pub const OR: u8 = 0x17;
    pub const XOR: u8 = 0x18;
    pub const NOT: u8 = 0x19;
    pub const BYTE: u8 = 0x1a;
    pub const SHL: u8 = 0x1b;
    pub const SHR: u8 = 0x1c;
    pub const SAR: u8 = 0x1d;
    pub const KECCAK256: u8 = 0x20;
    pub const ADDRESS: u8 = 0x30;
    pub const BALANCE: u8 = 0x31;
    pub const ORIGIN: u8 = 0x32;
    pub const CALLER: u8 = 0x33;
    pub const CALLVALUE: u8 = 0x34;
    pub const CALLDATALOAD: u8 = 0x35;
    pub const CALLDATASIZE: u8 = 0x36;
    pub const CALLDATACOPY: u8 = 0x37;
    pub const CODESIZE: u8 = 0x38;
    pub const CODECOPY: u8 = 0x39;
    pub const GASPRICE: u8 = 0x3a;
    pub const EXTCODESIZE: u8 = 0x3b;
    pub const EXTCODECOPY: u8 = 0x3c;
    pub const RETURNDATASIZE: u8 = 0x3d;
    pub const RETURNDATACOPY: u8 = 0x3e;
    pub const EXTCODEHASH: u8 = 0x3f;
    pub const BLOCKHASH: u8 = 0x40;
    pub const COINBASE: u8 = 0x41;
    pub const TIMESTAMP: u8 = 0x42;
    pub const NUMBER: u8 = 0x43;
    pub const PREVRANDAO: u8 = 0x44;
    pub const GASLIMIT: u8 = 0x45;
    pub const CHAINID: u8 = 0x46;
    pub const SELFBALANCE: u8 = 0x47;
    pub const BASEFEE: u8 = 0x48;
    pub const BLOBHASH: u8 = 0x49;
    pub const BLOBBASEFEE: u8 = 0x4a;
    pub const POP: u8 = 0x50;
    pub const MLOAD: u8 = 0x51;
    pub const MSTORE: u8 = 0x52;
    pub const MSTORE8: u8 = 0x53;
    pub const SLOAD: u8 = 0x54;
    pub const SSTORE: u8 = 0x55;
    pub const JUMP: u8 = 0x56;
    pub const JUMPI: u8 = 0x57;
    pub const PC: u8 = 0x58;
    pub const MSIZE: u8 = 0x59;
    pub const GAS: u8 = 0x5a;
    pub const JUMPDEST: u8 = 0x5b;
    pub const TLOAD: u8 = 0x5c;
    pub const TSTORE: u8 = 0x5d;
    pub const MCOPY: u8 = 0x5e;
    pub const PUSH0: u8 = 0x5f;
    pub const PUSH1: u8 = 0x60;
    pub const PUSH32: u8 = 0x7f;
    pub const DUP1: u8 = 0x80;
    pub const DUP16: u8 = 0x8f;
    pub const SWAP1: u8 = 0x90;
    pub const SWAP16: u8 = 0x9f;
    pub const LOG0: u8 = 0xa0;
    pub const LOG4: u8 = 0xa4;
    pub const CREATE: u8 = 0xf0;
    pub const CALL: u8 = 0xf1;
    pub const CALLCODE: u8 = 0xf2;
    pub const RETURN: u8 = 0xf3;
    pub const DELEGATECALL: u8 = 0xf4;
    pub const CREATE2: u8 = 0xf5;
    pub const STATICCALL: u8 = 0xfa;
    pub const REVERT: u8 = 0xfd;
    pub const INVALID: u8 = 0xfe;
    pub const SELFDESTRUCT: u8 = 0xff;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Stop,
    Add,
    Mul,
    Sub,
    Div,
    SDiv,
    Mod,
    SMod,
    AddMod,
    MulMod,
    Exp,
    SignExtend,
    Lt,
    Gt,
    SLt,
    SGt,
    Eq,
    IsZero,
    And,
    Or,
    Xor,
    Not,
    Byte,
    Shl,
    Shr,
    Sar,
    Keccak256,
    Address,
    Balance,
    Origin,
    Caller,
    CallValue,
    CallDataLoad,
    CallDataSize,
    CallDataCopy,
    CodeSize,
    CodeCopy,
    GasPrice,
    ExtCodeSize,
    ExtCodeCopy,
    ReturnDataSize,
    ReturnDataCopy,
    ExtCodeHash,
    BlockHash,
    CoinBase,
    Timestamp,
    Number,
    PrevRandao,
    GasLimit,
    ChainId,
    SelfBalance,
    BaseFee,
    BlobHash,
    BlobBaseFee,
    Pop,
    MLoad,
    MStore,
    MStore8,
    SLoad,
    SStore,
    Jump,
    Jumpi,
    Pc,
    MSize,
    Gas,
    JumpDest,
    TLoad,
    TStore,
    MCopy,
    /// `n` immediate bytes, already validated to be `1..=32` long by
    /// [`Instruction::decode`].
    Push(Vec<u8>),
    Dup(u8),
    Swap(u8),
    Log(u8),
    Create,
    Call,
    CallCode,
    Return,
    DelegateCall,
    Create2,
    StaticCall,
    Revert,
    Invalid,
    SelfDestruct,
    /// A byte that does not correspond to any known opcode.
    Unknown(u8),
}

impl Instruction {
    /// Number of bytes this instruction occupies in the encoded bytecode.
    pub fn length(&self) -> usize {
        match self {
            Instruction::Push(bytes) => 1 + bytes.len(),
            _ => 1,
        }
    }

    /// Encodes this instruction back to its byte-code representation,
    /// appending to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        use byte::*;
        match self {
            Instruction::Stop => out.push(STOP),
            Instruction::Add => out.push(ADD),
            Instruction::Mul => out.push(MUL),
            Instruction::Sub => out.push(SUB),
            Instruction::Div => out.push(DIV),
            Instruction::SDiv => out.push(SDIV),
            Instruction::Mod => out.push(MOD),
            Instruction::SMod => out.push(SMOD),
            Instruction::AddMod => out.push(ADDMOD),
            Instruction::MulMod => out.push(MULMOD),
            Instruction::Exp => out.push(EXP),
            Instruction::SignExtend => out.push(SIGNEXTEND),
            Instruction::Lt => out.push(LT),
            Instruction::Gt => out.push(GT),
            Instruction::SLt => out.push(SLT),
            Instruction::SGt => out.push(SGT),
            Instruction::Eq => out.push(EQ),
            Instruction::IsZero => out.push(ISZERO),
            Instruction::And => out.push(AND),
            Instruction::Or => out.push(OR),
            Instruction::Xor => out.push(XOR),
            Instruction::Not => out.push(NOT),
            Instruction::Byte => out.push(BYTE),
            Instruction::Shl => out.push(SHL),
            Instruction::Shr => out.push(SHR),
            Instruction::Sar => out.push(SAR),
            Instruction::Keccak256 => out.push(KECCAK256),
            Instruction::Address => out.push(ADDRESS),
            Instruction::Balance => out.push(BALANCE),
            Instruction::Origin => out.push(ORIGIN),
            Instruction::Caller => out.push(CALLER),
            Instruction::CallValue => out.push(CALLVALUE),
            Instruction::CallDataLoad => out.push(CALLDATALOAD),
            Instruction::CallDataSize => out.push(CALLDATASIZE),
            Instruction::CallDataCopy => out.push(CALLDATACOPY),
            Instruction::CodeSize => out.push(CODESIZE),
            Instruction::CodeCopy => out.push(CODECOPY),
            Instruction::GasPrice => out.push(GASPRICE),
            Instruction::ExtCodeSize => out.push(EXTCODESIZE),
            Instruction::ExtCodeCopy => out.push(EXTCODECOPY),
            Instruction::ReturnDataSize => out.push(RETURNDATASIZE),
            Instruction::ReturnDataCopy => out.push(RETURNDATACOPY),
            Instruction::ExtCodeHash => out.push(EXTCODEHASH),
            Instruction::BlockHash => out.push(BLOCKHASH),
            Instruction::CoinBase => out.push(COINBASE),
            Instruction::Timestamp => out.push(TIMESTAMP),
            Instruction::Number => out.push(NUMBER),
            Instruction::PrevRandao => out.push(PREVRANDAO),
            Instruction::GasLimit => out.push(GASLIMIT),
            Instruction::ChainId => out.push(CHAINID),
            Instruction::SelfBalance => out.push(SELFBALANCE),
            Instruction::BaseFee => out.push(BASEFEE),
            Instruction::BlobHash => out.push(BLOBHASH),
            Instruction::BlobBaseFee => out.push(BLOBBASEFEE),
            Instruction::Pop => out.push(POP),
            Instruction::MLoad => out.push(MLOAD),
            Instruction::MStore => out.push(MSTORE),
            Instruction::MStore8 => out.push(MSTORE8),
            Instruction::SLoad => out.push(SLOAD),
            Instruction::SStore => out.push(SSTORE),
            Instruction::Jump => out.push(JUMP),
            Instruction::Jumpi => out.push(JUMPI),
            Instruction::Pc => out.push(PC),
            Instruction::MSize => out.push(MSIZE),
            Instruction::Gas => out.push(GAS),
            Instruction::JumpDest => out.push(JUMPDEST),
            Instruction::TLoad => out.push(TLOAD),
            Instruction::TStore => out.push(TSTORE),
            Instruction::MCopy => out.push(MCOPY),
            Instruction::Push(bytes) => {
                if bytes.is_empty() {
                    out.push(PUSH0);
                } else {
                    out.push(PUSH1 + (bytes.len() as u8 - 1));
                    out.extend_from_slice(bytes);
                }
            }
            Instruction::Dup(n) => out.push(DUP1 + (n - 1)),
            Instruction::Swap(n) => out.push(SWAP1 + (n - 1)),
            Instruction::Log(n) => out.push(LOG0 + n),
            Instruction::Create => out.push(CREATE),
            Instruction::Call => out.push(CALL),
            Instruction::CallCode => out.push(CALLCODE),
            Instruction::Return => out.push(RETURN),
            Instruction::DelegateCall => out.push(DELEGATECALL),
            Instruction::Create2 => out.push(CREATE2),
            Instruction::StaticCall => out.push(STATICCALL),
            Instruction::Revert => out.push(REVERT),
            Instruction::Invalid => out.push(INVALID),
            Instruction::SelfDestruct => out.push(SELFDESTRUCT),
            Instruction::Unknown(b) => out.push(*b),
        }
    }

    /// Decodes one instruction starting at `pc` within `code`. Returns the
    /// instruction and its length in bytes. A truncated `PUSH` at the end
    /// of the code is zero-padded, matching the reference disassembler's
    /// tolerance for bytecode whose last push runs off the end.
    pub fn decode(pc: usize, code: &[u8]) -> (Instruction, usize) {
        use byte::*;
        let op = code[pc];
        let insn = match op {
            STOP => Instruction::Stop,
            ADD => Instruction::Add,
            MUL => Instruction::Mul,
            SUB => Instruction::Sub,
            DIV => Instruction::Div,
            SDIV => Instruction::SDiv,
            MOD => Instruction::Mod,
            SMOD => Instruction::SMod,
            ADDMOD => Instruction::AddMod,
            MULMOD => Instruction::MulMod,
            EXP => Instruction::Exp,
            SIGNEXTEND => Instruction::SignExtend,
            LT => Instruction::Lt,
            GT => Instruction::Gt,
            SLT => Instruction::SLt,
            SGT => Instruction::SGt,
            EQ => Instruction::Eq,
            ISZERO => Instruction::IsZero,
            AND => Instruction::And,
            OR => Instruction::Or,
            XOR => Instruction::Xor,
            NOT => Instruction::Not,
            BYTE => Instruction::Byte,
            SHL => Instruction::Shl,
            SHR => Instruction::Shr,
            SAR => Instruction::Sar,
            KECCAK256 => Instruction::Keccak256,
            ADDRESS => Instruction::Address,
            BALANCE => Instruction::Balance,
            ORIGIN => Instruction::Origin,
            CALLER => Instruction::Caller,
            CALLVALUE => Instruction::CallValue,
            CALLDATALOAD => Instruction::CallDataLoad,
            CALLDATASIZE => Instruction::CallDataSize,
            CALLDATACOPY => Instruction::CallDataCopy,
            CODESIZE => Instruction::CodeSize,
            CODECOPY => Instruction::CodeCopy,
            GASPRICE => Instruction::GasPrice,
            EXTCODESIZE => Instruction::ExtCodeSize,
            EXTCODECOPY => Instruction::ExtCodeCopy,
            RETURNDATASIZE => Instruction::ReturnDataSize,
            RETURNDATACOPY => Instruction::ReturnDataCopy,
            EXTCODEHASH => Instruction::ExtCodeHash,
            BLOCKHASH => Instruction::BlockHash,
            COINBASE => Instruction::CoinBase,
            TIMESTAMP => Instruction::Timestamp,
            NUMBER => Instruction::Number,
            PREVRANDAO => Instruction::PrevRandao,
            GASLIMIT => Instruction::GasLimit,
            CHAINID => Instruction::ChainId,
            SELFBALANCE => Instruction::SelfBalance,
            BASEFEE => Instruction::BaseFee,
            BLOBHASH => Instruction::BlobHash,
            BLOBBASEFEE => Instruction::BlobBaseFee,
            POP => Instruction::Pop,
            MLOAD => Instruction::MLoad,
            MSTORE => Instruction::MStore,
            MSTORE8 => Instruction::MStore8,
            SLOAD => Instruction::SLoad,
            SSTORE => Instruction::SStore,
            JUMP => Instruction::Jump,
            JUMPI => Instruction::Jumpi,
            PC => Instruction::Pc,
            MSIZE => Instruction::MSize,
            GAS => Instruction::Gas,
            JUMPDEST => Instruction::JumpDest,
            TLOAD => Instruction::TLoad,
            TSTORE => Instruction::TStore,
            MCOPY => Instruction::MCopy,
            PUSH0 => Instruction::Push(Vec::new()),
            PUSH1..=PUSH32 => {
                let n = (op - PUSH1 + 1) as usize;
                let start = pc + 1;
                let available = code.len().saturating_sub(start);
                let take = available.min(n);
                let mut bytes = code[start..start + take].to_vec();
                bytes.resize(n, 0);
                return (Instruction::Push(bytes), 1 + n);
            }
            DUP1..=DUP16 => Instruction::Dup(op - DUP1 + 1),
            SWAP1..=SWAP16 => Instruction::Swap(op - SWAP1 + 1),
            LOG0..=LOG4 => Instruction::Log(op - LOG0),
            CREATE => Instruction::Create,
            CALL => Instruction::Call,
            CALLCODE => Instruction::CallCode,
            RETURN => Instruction::Return,
            DELEGATECALL => Instruction::DelegateCall,
            CREATE2 => Instruction::Create2,
            STATICCALL => Instruction::StaticCall,
            REVERT => Instruction::Revert,
            INVALID => Instruction::Invalid,
            SELFDESTRUCT => Instruction::SelfDestruct,
            other => Instruction::Unknown(other),
        };
        let len = insn.length();
        (insn, len)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push(bytes) => write!(f, "PUSH{} 0x{}", bytes.len(), hex::encode(bytes)),
            Instruction::Dup(n) => write!(f, "DUP{n}"),
            Instruction::Swap(n) => write!(f, "SWAP{n}"),
            Instruction::Log(n) => write!(f, "LOG{n}"),
            Instruction::Unknown(b) => write!(f, "UNKNOWN(0x{b:02x})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Decodes an entire bytecode sequence into instructions.
pub trait ToInstructions {
    fn to_instructions(&self) -> Vec<Instruction>;
}

impl ToInstructions for [u8] {
    fn to_instructions(&self) -> Vec<Instruction> {
        let mut out = Vec::new();
        let mut pc = 0;
        while pc < self.len() {
            let (insn, len) = Instruction::decode(pc, self);
            out.push(insn);
            pc += len;
        }
        out
    }
}

/// PC → (instruction, encoded length), dense over the byte range of the
/// code. `None` at offsets that fall inside a multi-byte instruction's
/// immediate (these are invalid jump destinations).
pub type ProgramMap = Vec<Option<(Instruction, usize)>>;

pub fn build_program_map(code: &[u8]) -> ProgramMap {
    let mut map: ProgramMap = vec![None; code.len()];
    let mut pc = 0;
    while pc < code.len() {
        let (insn, len) = Instruction::decode(pc, code);
        map[pc] = Some((insn, len));
        pc += len;
    }
    map
}
