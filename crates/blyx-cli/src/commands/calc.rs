use blyx_core::calculator::{evaluate, format_number, sanitize};

use crate::common::CliResult;

pub fn run(expr: &str) -> CliResult {
    let value = evaluate(&sanitize(expr))?;
    println!("{}", format_number(value));
    Ok(())
}
