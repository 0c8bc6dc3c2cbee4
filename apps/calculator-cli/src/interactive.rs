//! Line-oriented interactive mode.
//!
//! Prompts for an operation (or `quit`) and two operands, calls the service
//! and prints the outcome. Bad input re-prompts; RPC failures are reported
//! and the loop continues.

use anyhow::Result;
use calculator_sdk::{CalculatorClientV1, Operation};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

const OPERATION_PROMPT: &str = "\nEnter operation (or 'quit'): ";
const INVALID_OPERATION: &str = "Invalid operation. Use: add, subtract, multiply, divide, quit\n";
const INVALID_NUMBERS: &str = "Please enter valid numbers\n";

async fn prompt<R, W>(lines: &mut Lines<R>, out: &mut W, text: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(lines.next_line().await?.map(|line| line.trim().to_owned()))
}

/// Run the interactive loop until `quit` or end of input.
///
/// # Errors
/// Returns an error if reading `input` or writing `out` fails.
pub async fn run_interactive<R, W>(
    client: &dyn CalculatorClientV1,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    out.write_all(b"\n=== Interactive Calculator Mode ===\nCommands: add, subtract, multiply, divide, quit\n")
        .await?;

    loop {
        let Some(command) = prompt(&mut lines, out, OPERATION_PROMPT).await? else {
            break;
        };
        if command.eq_ignore_ascii_case("quit") {
            break;
        }
        let Ok(op) = command.parse::<Operation>() else {
            out.write_all(INVALID_OPERATION.as_bytes()).await?;
            continue;
        };

        let Some(a) = prompt(&mut lines, out, "Enter first number: ").await? else {
            break;
        };
        let Some(b) = prompt(&mut lines, out, "Enter second number: ").await? else {
            break;
        };
        let (Ok(a), Ok(b)) = (a.parse::<f64>(), b.parse::<f64>()) else {
            out.write_all(INVALID_NUMBERS.as_bytes()).await?;
            continue;
        };

        let line = match client.calculate(op, a, b).await {
            Ok(calc) => format!("Result: {}\n", calc.message),
            Err(e) => format!("RPC failed: {e}\n"),
        };
        out.write_all(line.as_bytes()).await?;
    }

    out.flush().await?;
    Ok(())
}
