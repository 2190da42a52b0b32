use alloy::primitives::Address;

/// Everything that can abort an execution.
///
/// `REVERT` is deliberately not a variant here: a revert is a normal
/// terminal state carried on `ExecResult`, not a failure of the interpreter
/// itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvmErrors {
    #[error("program counter out of bounds")]
    PcOutOfBounds,

    #[error("stack underflow")]
    StackUnderflow,

    #[error("stack overflow")]
    StackOverflow,

    #[error("value does not fit in a 256-bit word")]
    ValueOverflow,

    #[error("signed integer out of representable range")]
    SignedIntegerOutOfBounds,

    #[error("memory request exceeds the {0}-byte cap")]
    OutOfMemory(usize),

    #[error("jump destination {0} is not a JUMPDEST")]
    InvalidJumpDest(usize),

    #[error("INVALID opcode executed")]
    InvalidOperation,

    #[error("PUSH{n} instruction carries {len} immediate bytes")]
    InvalidPush { n: u8, len: usize },

    #[error("STATICCALL to unregistered address {0}")]
    UnknownFfi(Address),

    #[error("opcode {0} observes or mutates state outside the sandbox")]
    Impure(String),

    #[error("opcode {0} is not implemented")]
    NotImplemented(String),
}

pub type EvmResult<T> = Result<T, EvmErrors>;
