use std::io;

use log::debug;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub code: i32,
    pub output: String,
}

/// Runs an external command line and reports its exit code together with the
/// combined stdout/stderr output. Implemented by test doubles that do not
/// spawn processes.
pub trait CommandRunner {
    fn run(&self, cmd: &str) -> impl Future<Output = io::Result<CommandOutput>> + Send;
}

/// Passes the command line verbatim to `<shell> -c` and waits for the child
/// to terminate. A signal-terminated child reports exit code -1.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        ShellRunner {
            shell: shell.into(),
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, cmd: &str) -> impl Future<Output = io::Result<CommandOutput>> + Send {
        let shell = self.shell.clone();
        let cmd = cmd.to_string();
        async move {
            debug!("spawning {} -c {:?}", shell, cmd);
            let result = Command::new(&shell).arg("-c").arg(&cmd).output().await?;
            let mut output = String::from_utf8_lossy(&result.stdout).into_owned();
            output.push_str(&String::from_utf8_lossy(&result.stderr));
            Ok(CommandOutput {
                code: result.status.code().unwrap_or(-1),
                output,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let runner = ShellRunner::new("/bin/sh");
        let result = runner.run("echo hi").await.unwrap();
        assert_eq!(result.code, 0);
        assert_eq!(result.output, "hi\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_code() {
        let runner = ShellRunner::new("/bin/sh");
        let result = runner.run("exit 7").await.unwrap();
        assert_eq!(result.code, 7);
    }

    #[tokio::test]
    async fn test_combines_stderr() {
        let runner = ShellRunner::new("/bin/sh");
        let result = runner.run("echo out; echo err 1>&2").await.unwrap();
        assert!(result.output.contains("out"));
        assert!(result.output.contains("err"));
    }

    #[tokio::test]
    async fn test_missing_shell_is_io_error() {
        let runner = ShellRunner::new("/nonexistent-shell");
        assert!(runner.run("echo hi").await.is_err());
    }
}
