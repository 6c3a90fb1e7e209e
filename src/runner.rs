//! Spawning terraform and capturing its output.
//!
//! Both pipes are read on their own task. Each line is echoed to the step
//! log as it arrives and appended, with colour codes removed, to a single
//! transcript. The relative order of stdout and stderr lines is whatever
//! order they were read in. Bytes that are not valid UTF-8 are replaced, and
//! the pipe is drained to the end either way.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::Mutex;

use crate::terraform::{ExitStatus, strip_ansi};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {seconds}s")]
    TimedOut { program: String, seconds: u64 },
}

/// Combined output and exit status of one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub output: String,
    pub exit_status: ExitStatus,
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &Path, args: &[String]) -> Result<RunOutput, RunnerError>;
}

/// Runs a real process, mirroring its output to this process's stdout and
/// stderr.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
    echo: bool,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            echo: true,
        }
    }

    /// Captures output without echoing it.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn as_str(&self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

type Transcript = Arc<Mutex<Vec<String>>>;

fn collect_lines<R>(
    reader: R,
    stream: Stream,
    echo: bool,
    transcript: Transcript,
) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        stream = stream.as_str(),
                        "failed to read process output"
                    );
                    break;
                }
            }

            let line = decode_line(&buf);
            if echo {
                match stream {
                    Stream::Stdout => println!("{}", line),
                    Stream::Stderr => eprintln!("{}", line),
                }
            }
            transcript.lock().await.push(strip_ansi(&line));
        }
    })
}

/// Waits for every reader task. Returns false if any of them failed, in
/// which case the transcript may be missing lines.
async fn join_readers(readers: Vec<tokio::task::JoinHandle<()>>, program: &str) -> bool {
    let mut complete = true;
    for reader in readers {
        if let Err(e) = reader.await {
            tracing::warn!(
                program = %program,
                error = %e,
                "output reader task failed, transcript may be incomplete"
            );
            complete = false;
        }
    }
    complete
}

/// Decodes one raw line, replacing invalid UTF-8 and dropping the line ending.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<RunOutput, RunnerError> {
        let program_name = program.display().to_string();

        tracing::debug!(program = %program_name, ?args, "spawning process");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: program_name.clone(),
                source,
            })?;

        let transcript: Transcript = Arc::new(Mutex::new(Vec::new()));
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(collect_lines(stdout, Stream::Stdout, self.echo, transcript.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(collect_lines(stderr, Stream::Stderr, self.echo, transcript.clone()));
        }

        let waited = match self.timeout {
            Some(limit) => {
                let outcome = tokio::time::timeout(limit, child.wait()).await;
                match outcome {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::warn!(
                            program = %program_name,
                            seconds = limit.as_secs(),
                            "process timed out, killing"
                        );
                        let _ = child.kill().await;
                        return Err(RunnerError::TimedOut {
                            program: program_name,
                            seconds: limit.as_secs(),
                        });
                    }
                }
            }
            None => child.wait().await,
        };

        let status = waited.map_err(|source| RunnerError::Wait {
            program: program_name.clone(),
            source,
        })?;

        join_readers(readers, &program_name).await;

        let lines = transcript.lock().await;
        let mut output = lines.join("\n");
        if !lines.is_empty() {
            output.push('\n');
        }

        let exit_status = ExitStatus(status.code().unwrap_or(-1));
        tracing::debug!(program = %program_name, exit_status = %exit_status, "process finished");

        Ok(RunOutput {
            output,
            exit_status,
        })
    }
}
