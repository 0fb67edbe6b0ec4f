use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// How long to wait for pipe readers once the child is gone. A grandchild
/// that inherited the pipes can keep them open after the child is killed.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// Captured result of a bounded child process run
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code, `None` if killed by a signal or by the timeout
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

/// Spawn `command`, optionally feed it `stdin`, and wait at most `timeout`.
///
/// Both output pipes are drained on their own tasks so a child that writes
/// more than a pipe buffer cannot block on us. On expiry the child is killed
/// and whatever it wrote so far is returned with `timed_out` set.
pub async fn run_with_timeout(
    command: &mut Command,
    stdin: Option<&[u8]>,
    timeout: Duration,
) -> io::Result<ProcessOutput> {
    command
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn()?;
    let stdout_reader = drain(child.stdout.take());
    let stderr_reader = drain(child.stderr.take());
    let input = child.stdin.take();

    let exchange = async {
        if let (Some(data), Some(mut pipe)) = (stdin, input) {
            // A broken pipe means the child exited early; its status says why
            if let Err(e) = pipe.write_all(data).await {
                tracing::debug!("child stdin closed early: {}", e);
            }
        }
        child.wait().await
    };

    let waited = tokio::time::timeout(timeout, exchange).await;
    let (status, timed_out) = match waited {
        Ok(status) => (status?.code(), false),
        Err(_) => {
            if let Err(e) = child.kill().await {
                tracing::debug!("failed to kill timed out child: {}", e);
            }
            (None, true)
        }
    };

    Ok(ProcessOutput {
        status,
        stdout: collect(stdout_reader).await,
        stderr: collect(stderr_reader).await,
        timed_out,
    })
}

fn drain<R>(pipe: Option<R>) -> Option<JoinHandle<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pipe.map(|mut pipe| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = pipe.read_to_end(&mut buf).await {
                tracing::debug!("error reading child output: {}", e);
            }
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

async fn collect(reader: Option<JoinHandle<String>>) -> String {
    let Some(handle) = reader else {
        return String::new();
    };
    match tokio::time::timeout(DRAIN_GRACE, handle).await {
        Ok(Ok(text)) => text,
        _ => String::new(),
    }
}
