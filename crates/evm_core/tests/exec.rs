//! End-to-end tests driving `exec`/`exec_call` over small assembled
//! programs, rather than calling opcode handlers directly.

use alloy::primitives::U256;
use evm_core::opcodes::byte;
use evm_core::{exec, exec_call, Bytecode, CallOutcome, ExecOpts};

fn push1(n: u8) -> Vec<u8> {
    vec![byte::PUSH1, n]
}

#[test]
fn dup1_pop_is_identity_on_the_stack() {
    // PUSH1 0x07; DUP1; POP; PUSH1 0x00; MSTORE; PUSH1 0x20; PUSH1 0x00; RETURN
    let mut code = Vec::new();
    code.extend(push1(0x07));
    code.push(byte::DUP1);
    code.push(byte::POP);
    code.extend(push1(0x00));
    code.push(byte::MSTORE);
    code.extend(push1(0x20));
    code.extend(push1(0x00));
    code.push(byte::RETURN);

    let result = exec_call(Bytecode::Raw(code), Vec::new(), ExecOpts::default()).unwrap();
    let mut expected = vec![0u8; 32];
    expected[31] = 0x07;
    assert_eq!(result, CallOutcome::Ok(expected));
}

#[test]
fn not_not_is_identity() {
    // PUSH1 0x2a; NOT; NOT; PUSH1 0x00; MSTORE; PUSH1 0x20; PUSH1 0x00; RETURN
    let mut code = Vec::new();
    code.extend(push1(0x2a));
    code.push(byte::NOT);
    code.push(byte::NOT);
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
fn div_and_mod_by_zero_push_zero() {
    // PUSH1 0x00 (divisor); PUSH1 0x05 (dividend); DIV; PUSH1 0x00; MSTORE;
    // PUSH1 0x20; PUSH1 0x00; RETURN
    let mut code = Vec::new();
    code.extend(push1(0x00));
    code.extend(push1(0x05));
    code.push(byte::DIV);
    code.extend(push1(0x00));
    code.push(byte::MSTORE);
    code.extend(push1(0x20));
    code.extend(push1(0x00));
    code.push(byte::RETURN);

    let result = exec_call(Bytecode::Raw(code), Vec::new(), ExecOpts::default()).unwrap();
    assert_eq!(result, CallOutcome::Ok(vec![0u8; 32]));
}

#[test]
fn calldataload_past_end_reads_zero() {
    // PUSH1 0x20 (offset past a 1-byte calldata); CALLDATALOAD; PUSH1 0x00;
    // MSTORE; PUSH1 0x20; PUSH1 0x00; RETURN
    let mut code = Vec::new();
    code.extend(push1(0x20));
    code.push(byte::CALLDATALOAD);
    code.extend(push1(0x00));
    code.push(byte::MSTORE);
    code.extend(push1(0x20));
    code.extend(push1(0x00));
    code.push(byte::RETURN);

    let result = exec_call(Bytecode::Raw(code), vec![0xff], ExecOpts::default()).unwrap();
    assert_eq!(result, CallOutcome::Ok(vec![0u8; 32]));
}

#[test]
fn stack_overflow_is_reported() {
    let mut code = Vec::new();
    for _ in 0..=1024 {
        code.extend(push1(0x01));
    }
    code.push(byte::STOP);

    let err = exec(Bytecode::Raw(code), Vec::new(), ExecOpts::default()).unwrap_err();
    assert_eq!(err, evm_core::VmError::StackOverflow);
}

#[test]
fn unknown_opcode_is_not_implemented() {
    // 0x0c has never been assigned to an EVM opcode.
    let code = vec![0x0c];
    let err = exec(Bytecode::Raw(code), Vec::new(), ExecOpts::default()).unwrap_err();
    assert!(matches!(err, evm_core::VmError::NotImplemented(_)));
}

#[test]
fn callvalue_is_observable() {
    // CALLVALUE; PUSH1 0x00; MSTORE; PUSH1 0x20; PUSH1 0x00; RETURN
    let mut code = Vec::new();
    code.push(byte::CALLVALUE);
    code.extend(push1(0x00));
    code.push(byte::MSTORE);
    code.extend(push1(0x20));
    code.extend(push1(0x00));
    code.push(byte::RETURN);

    let opts = ExecOpts {
        callvalue: U256::from(42u64),
        ..ExecOpts::default()
    };
    let result = exec_call(Bytecode::Raw(code), Vec::new(), opts).unwrap();
    let mut expected = vec![0u8; 32];
    expected[31] = 42;
    assert_eq!(result, CallOutcome::Ok(expected));
}
