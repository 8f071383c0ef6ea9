//! Line input shared by the REPL and one-shot approval prompts.

use tokio::io::{AsyncBufRead, Lines};

/// Result of waiting for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineRead {
    Line(String),
    Eof,
    Interrupted,
}

/// Read one line, treating Ctrl-C like an explicit interrupt.
pub(crate) async fn read_line<R>(input: &mut Lines<R>) -> LineRead
where
    R: AsyncBufRead + Unpin,
{
    tokio::select! {
        line = input.next_line() => match line {
            Ok(Some(line)) => LineRead::Line(line),
            Ok(None) => LineRead::Eof,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read input");
                LineRead::Eof
            }
        },
        _ = tokio::signal::ctrl_c() => LineRead::Interrupted,
    }
}
