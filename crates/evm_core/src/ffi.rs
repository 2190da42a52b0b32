//! `STATICCALL`-addressed foreign function interfaces: the one sanctioned
//! way this interpreter lets a program observe anything outside its own
//! stack/memory/transient storage.

use std::collections::HashMap;
use std::sync::Arc;

use alloy::primitives::{Address, B256, U256};

/// What a handler decided: either the call succeeded with return data, or
/// it reverted with revert data. Handlers never panic and never error —
/// a handler that cannot make sense of its input should revert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FfiOutcome {
    Return(Vec<u8>),
    Revert(Vec<u8>),
}

pub type FfiHandler = Arc<dyn Fn(&[u8]) -> FfiOutcome + Send + Sync>;

/// The address `console.log` is conventionally deployed at by Hardhat:
/// the ASCII string "console.log" left-padded with zero bytes to 20.
pub const CONSOLE_LOG_ADDRESS: Address = Address::new([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x63, 0x6f, 0x6e, 0x73, 0x6f, 0x6c, 0x65,
    0x2e, 0x6c, 0x6f, 0x67,
]);

#[derive(Clone, Default)]
pub struct FfiTable {
    handlers: HashMap<Address, FfiHandler>,
}

impl FfiTable {
    /// Builds the table from the built-ins plus `overrides`, with
    /// caller-supplied entries winning on collision.
    pub fn new(overrides: HashMap<Address, FfiHandler>) -> Self {
        let mut handlers = builtins();
        handlers.extend(overrides);
        FfiTable { handlers }
    }

    pub fn get(&self, address: &Address) -> Option<&FfiHandler> {
        self.handlers.get(address)
    }
}

fn builtins() -> HashMap<Address, FfiHandler> {
    let mut table: HashMap<Address, FfiHandler> = HashMap::new();
    table.insert(CONSOLE_LOG_ADDRESS, Arc::new(console_log));
    table
}

/// Reduces a word to an address by discarding the high 12 bytes, as
/// `STATICCALL`'s argument is a full word on the stack but only the low
/// 20 bytes name an account.
pub fn word_to_address(word: U256) -> Address {
    Address::from_word(B256::from(word.to_be_bytes::<32>()))
}

fn console_log(args: &[u8]) -> FfiOutcome {
    if args.len() < 4 {
        log::debug!("console.log: calldata too short to carry a selector");
        return FfiOutcome::Return(Vec::new());
    }
    let selector = &args[0..4];
    let tail = &args[4..];
    match selector {
        // log(string)
        [0x41, 0x30, 0x4f, 0xac] => {
            if let Some(s) = decode_string(tail, 0) {
                log::debug!("console.log: {s}");
            }
        }
        // log(uint256)
        [0xf8, 0x2c, 0x50, 0xf1] => {
            if tail.len() >= 32 {
                log::debug!("console.log: {}", U256::from_be_slice(&tail[0..32]));
            }
        }
        // log(address)
        [0x2c, 0x2e, 0xcb, 0xc2] => {
            if tail.len() >= 32 {
                log::debug!("console.log: {}", word_to_address(U256::from_be_slice(&tail[0..32])));
            }
        }
        // log(bool)
        [0x32, 0x45, 0x8e, 0xfa] => {
            if tail.len() >= 32 {
                let v = U256::from_be_slice(&tail[0..32]);
                log::debug!("console.log: {}", !v.is_zero());
            }
        }
        // log(string,uint256)
        [0x31, 0x3c, 0xe5, 0x67] => {
            if tail.len() >= 64 {
                if let Some(s) = decode_string(tail, 0) {
                    let n = U256::from_be_slice(&tail[32..64]);
                    log::debug!("console.log: {s} {n}");
                }
            }
        }
        _ => {
            log::debug!("console.log: unrecognized selector, raw calldata 0x{}", hex::encode(args));
        }
    }
    FfiOutcome::Return(Vec::new())
}

/// Decodes a single ABI-encoded `string` argument whose head word (at
/// `head_offset` within the tuple's tail) holds its own byte offset into
/// that tail, Solidity dynamic-type style.
fn decode_string(tail: &[u8], head_offset: usize) -> Option<String> {
    if tail.len() < head_offset + 32 {
        return None;
    }
    let rel_offset = U256::from_be_slice(&tail[head_offset..head_offset + 32]);
    let rel_offset: usize = rel_offset.try_into().ok()?;
    if tail.len() < rel_offset + 32 {
        return None;
    }
    let len = U256::from_be_slice(&tail[rel_offset..rel_offset + 32]);
    let len: usize = len.try_into().ok()?;
    let start = rel_offset + 32;
    if tail.len() < start + len {
        return None;
    }
    String::from_utf8(tail[start..start + len].to_vec()).ok()
}
