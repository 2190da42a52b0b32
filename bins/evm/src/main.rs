use std::fs;
use std::process::ExitCode;

use alloy::primitives::U256;
use clap::Parser;
use evm_core::{exec_call, Bytecode, CallOutcome, ExecOpts};
use serde::Serialize;

/// Runs EVM bytecode against calldata and prints the result as JSON.
#[derive(Parser, Debug)]
#[command(name = "evm", about = "Pure-function EVM bytecode interpreter")]
struct Args {
    /// Hex-encoded bytecode (with or without a 0x prefix), or a path to a
    /// file containing it, when prefixed with `@`.
    code: String,

    /// Hex-encoded calldata.
    #[arg(long, default_value = "0x")]
    calldata: String,

    /// Value made available to the program via CALLVALUE.
    #[arg(long, default_value = "0")]
    callvalue: u64,

    /// Emit one trace line per executed instruction on stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Report {
    Ok { data: String },
    Revert { data: String },
    Error { message: String },
}

fn read_hex_arg(arg: &str) -> anyhow::Result<Vec<u8>> {
    let raw = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)?,
        None => arg.to_string(),
    };
    let trimmed = raw.trim().trim_start_matches("0x");
    Ok(hex::decode(trimmed)?)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let report = match run(&args) {
        Ok(report) => report,
        Err(err) => Report::Error { message: err.to_string() },
    };

    println!("{}", serde_json::to_string_pretty(&report).expect("Report always serializes"));

    match report_is_ok(&report) {
        true => ExitCode::SUCCESS,
        false => ExitCode::FAILURE,
    }
}

fn report_is_ok(report: &Report) -> bool {
    !matches!(report, Report::Error { .. })
}

fn run(args: &Args) -> anyhow::Result<Report> {
    let code = read_hex_arg(&args.code)?;
    let calldata = read_hex_arg(&args.calldata)?;

    let opts = ExecOpts {
        callvalue: U256::from(args.callvalue),
        verbose: args.verbose,
        ..ExecOpts::default()
    };

    let outcome = exec_call(Bytecode::Raw(code), calldata, opts)?;
    Ok(match outcome {
        CallOutcome::Ok(data) => Report::Ok { data: format!("0x{}", hex::encode(data)) },
        CallOutcome::Revert(data) => Report::Revert { data: format!("0x{}", hex::encode(data)) },
    })
}
