//! Batch run over a fixed set of sample calculations.

use anyhow::Result;
use calculator_sdk::{CalculatorClientV1, Operation};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Sample cases, the last one exercising division by zero.
pub const SAMPLE_CASES: [(Operation, f64, f64); 5] = [
    (Operation::Add, 15.5, 7.2),
    (Operation::Subtract, 22.8, 5.3),
    (Operation::Multiply, 6.5, 3.0),
    (Operation::Divide, 25.0, 5.0),
    (Operation::Divide, 12.0, 0.0),
];

/// Run every sample case and report each outcome to `out`.
///
/// Failed calls are reported and do not stop the run. Returns the number of
/// failed calls.
///
/// # Errors
/// Returns an error only if writing to `out` fails.
pub async fn run_demo<W>(client: &dyn CalculatorClientV1, server: &str, out: &mut W) -> Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut failures = 0;
    out.write_all(format!("=== Rust Calculator Client ===\nConnected to server at {server}\n").as_bytes())
        .await?;

    for (op, a, b) in SAMPLE_CASES {
        let report = match client.calculate(op, a, b).await {
            Ok(calc) => format!(
                "\n{}:\nRequest: a={a}, b={b}\nResponse: operation={}, result={}\nMessage: {}\n",
                op.rpc_name().to_uppercase(),
                calc.operation,
                calc.result,
                calc.message
            ),
            Err(e) => {
                failures += 1;
                tracing::warn!(operation = op.rpc_name(), error = %e, "demo call failed");
                format!("\nError in {op}: {e}\n")
            }
        };
        out.write_all(report.as_bytes()).await?;
    }

    out.write_all(b"\n=== All operations completed ===\n").await?;
    out.flush().await?;
    Ok(failures)
}
