use crate::{Error, ProcessConfig, Result};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

/// What a completed external process produced.
#[derive(Debug)]
pub(crate) struct ProcessOutput {
    pub(crate) exit_status: ExitStatus,
    pub(crate) stdout: Vec<u8>,
    pub(crate) stdout_truncated: bool,
}

impl ProcessOutput {
    /// None if the process was terminated by a signal.
    pub(crate) fn exit_code_o(&self) -> Option<i32> {
        self.exit_status.code()
    }
}

/// Run the configured command with an optional trailing argument and optional stdin bytes.
/// The child is killed if this future is dropped, and is killed and reaped on timeout.
pub(crate) async fn run_process(
    process_config: &ProcessConfig,
    extra_arg_o: Option<&str>,
    stdin_bytes_o: Option<&[u8]>,
) -> Result<ProcessOutput> {
    let mut std_command = std::process::Command::new(&process_config.program);
    // The child leads its own process group, so anything it forks can be killed with it.
    #[cfg(unix)]
    std::os::unix::process::CommandExt::process_group(&mut std_command, 0);
    let mut command = tokio::process::Command::from(std_command);
    command.args(&process_config.args);
    if let Some(extra_arg) = extra_arg_o {
        command.arg(extra_arg);
    }
    command
        .stdin(if stdin_bytes_o.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|err| Error::Unavailable {
        message: format!("can't start {:?}: {}", process_config.program, err).into(),
        exit_code_o: None,
    })?;
    tracing::debug!(
        program = %process_config.program,
        pid = ?child.id(),
        "spawned external process"
    );
    let process_group_killer = ProcessGroupKiller::new(&child);

    let outcome = tokio::time::timeout(
        process_config.timeout,
        communicate(&mut child, process_config, stdin_bytes_o),
    )
    .await;
    match outcome {
        Ok(result) => result,
        Err(_) => {
            process_group_killer.kill_group();
            // kill() also waits on the child, so no zombie is left behind.
            if let Err(err) = child.kill().await {
                tracing::warn!(
                    "failed to kill timed-out process {:?}: {}",
                    process_config.program,
                    err
                );
            }
            tracing::warn!(
                "process {:?} timed out after {:?}",
                process_config.program,
                process_config.timeout
            );
            Err(Error::TimedOut {
                program: process_config.program.clone().into(),
                timeout: process_config.timeout,
            })
        }
    }
}

/// Sends SIGKILL to a child's process group when dropped, which covers a dropped request
/// future, and any grandchildren still running after the child itself exits.
struct ProcessGroupKiller {
    #[cfg_attr(not(unix), allow(dead_code))]
    pgid_o: Option<i32>,
}

impl ProcessGroupKiller {
    fn new(child: &tokio::process::Child) -> Self {
        Self {
            pgid_o: child.id().and_then(|pid| i32::try_from(pid).ok()),
        }
    }
    fn kill_group(&self) {
        #[cfg(unix)]
        if let Some(pgid) = self.pgid_o {
            // SAFETY: killpg only sends a signal; ESRCH for an already-empty group is ignored.
            unsafe {
                libc::killpg(pgid, libc::SIGKILL);
            }
        }
    }
}

impl Drop for ProcessGroupKiller {
    fn drop(&mut self) {
        self.kill_group();
    }
}

async fn communicate(
    child: &mut tokio::process::Child,
    process_config: &ProcessConfig,
    stdin_bytes_o: Option<&[u8]>,
) -> Result<ProcessOutput> {
    let stdin_o = child.stdin.take();
    let stdout = child.stdout.take().ok_or_else(|| Error::Unavailable {
        message: "child stdout was not captured".into(),
        exit_code_o: None,
    })?;
    let stderr = child.stderr.take().ok_or_else(|| Error::Unavailable {
        message: "child stderr was not captured".into(),
        exit_code_o: None,
    })?;

    let write_stdin = async move {
        if let (Some(mut stdin), Some(stdin_bytes)) = (stdin_o, stdin_bytes_o) {
            match stdin.write_all(stdin_bytes).await {
                Ok(()) => {}
                // The child may exit without reading all of its input.
                Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(err) => return Err(err),
            }
            // Dropping stdin closes it so the child sees EOF.
        }
        Ok(())
    };
    let (write_result, stdout_result, stderr_result) = tokio::join!(
        write_stdin,
        read_capped(stdout, process_config.max_output_bytes),
        read_capped(stderr, process_config.max_output_bytes),
    );
    let io_error = |err: std::io::Error| Error::Unavailable {
        message: format!("I/O error talking to {:?}: {}", process_config.program, err).into(),
        exit_code_o: None,
    };
    write_result.map_err(io_error)?;
    let (stdout, stdout_truncated) = stdout_result.map_err(io_error)?;
    let (stderr, _) = stderr_result.map_err(io_error)?;

    let exit_status = child.wait().await.map_err(io_error)?;

    if !stderr.is_empty() {
        tracing::debug!(
            program = %process_config.program,
            "stderr: {}",
            String::from_utf8_lossy(&stderr).trim_end()
        );
    }
    if stdout_truncated {
        tracing::warn!(
            "stdout of {:?} exceeded {} bytes and was truncated",
            process_config.program,
            process_config.max_output_bytes
        );
    }
    tracing::debug!(
        program = %process_config.program,
        %exit_status,
        stdout_len = stdout.len(),
        "external process finished"
    );
    Ok(ProcessOutput {
        exit_status,
        stdout,
        stdout_truncated,
    })
}

/// Read to EOF, keeping at most max_bytes.  The rest is drained so that the child never blocks
/// on a full pipe.
async fn read_capped<R: AsyncRead + Unpin>(
    mut reader: R,
    max_bytes: usize,
) -> std::io::Result<(Vec<u8>, bool)> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut truncated = false;
    loop {
        let n = match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        let room = max_bytes.saturating_sub(buffer.len());
        if n > room {
            truncated = true;
        }
        buffer.extend_from_slice(&chunk[..n.min(room)]);
    }
    Ok((buffer, truncated))
}
