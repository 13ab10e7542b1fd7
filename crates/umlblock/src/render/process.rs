//! Out-of-process rendering through a spawned Java runtime.

use std::{
    ffi::OsString,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use log::{debug, warn};

use crate::{
    config::RendererConfig,
    error::{RenderError, UmlBlockError},
    render::{PIPE_FLAG, Renderer, engine_args},
};

const JAVA_BIN: &str = if cfg!(windows) { "java.exe" } else { "java" };

/// How often a child is polled while a timeout is in effect.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Renders by spawning `<java_home>/bin/java -jar <jar> ... -pipe`.
///
/// The source is written to the child's stdin and the child's stdout and
/// stderr are collected as one stream. The calling thread blocks until the
/// child exits, or until the optional timeout elapses.
#[derive(Debug, Clone)]
pub struct ProcessRenderer {
    java_home: Option<PathBuf>,
    jar: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessRenderer {
    /// Creates a process renderer.
    ///
    /// A missing `java_home` is only reported when rendering, before anything
    /// is spawned.
    pub fn new(java_home: Option<PathBuf>, jar: impl Into<PathBuf>) -> Self {
        Self {
            java_home,
            jar: jar.into(),
            timeout: None,
        }
    }

    /// Creates a process renderer from configuration, falling back to
    /// `$JAVA_HOME` when no Java installation is configured.
    pub fn from_config(config: &RendererConfig) -> Self {
        Self {
            java_home: config.resolve_java_home(),
            jar: config.jar().to_path_buf(),
            timeout: config.timeout(),
        }
    }

    /// Kills the engine if a single run takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the path of the Java executable.
    ///
    /// # Errors
    ///
    /// Returns [`UmlBlockError::Config`] if no Java installation is known.
    pub fn java_executable(&self) -> Result<PathBuf, UmlBlockError> {
        let java_home = self.java_home.as_deref().ok_or_else(|| {
            UmlBlockError::config(
                "no Java runtime configured: set `renderer.java_home` or the JAVA_HOME \
                 environment variable to a JRE or JDK installation path",
            )
        })?;
        Ok(java_home.join("bin").join(JAVA_BIN))
    }

    /// Returns the arguments passed to the Java executable.
    pub fn command_args(&self, flag: Option<&str>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-jar".into(), self.jar.clone().into_os_string()];
        let mut engine = engine_args(None);
        engine.push(PIPE_FLAG.to_string());
        engine.extend(flag.map(str::to_string));
        args.extend(engine.into_iter().map(OsString::from));
        args
    }

    fn spawn(&self, java: &Path, flag: Option<&str>) -> Result<(Child, io::PipeReader), RenderError> {
        let (reader, writer) = io::pipe().map_err(RenderError::Spawn)?;

        // The command owns both write ends and must be dropped before the
        // output is read, or the reader never sees EOF.
        let child = {
            let mut cmd = Command::new(java);
            cmd.args(self.command_args(flag))
                .stdin(Stdio::piped())
                .stdout(writer.try_clone().map_err(RenderError::Spawn)?)
                .stderr(writer);
            cmd.spawn().map_err(RenderError::Spawn)?
        };

        Ok((child, reader))
    }
}

impl Renderer for ProcessRenderer {
    fn render(&self, source: &str, flag: Option<&str>) -> Result<Vec<u8>, UmlBlockError> {
        let java = self.java_executable()?;
        debug!(
            program = java.display().to_string(),
            jar = self.jar.display().to_string(),
            flag:?;
            "Spawning PlantUML"
        );

        let (mut child, mut reader) = self.spawn(&java, flag)?;

        let Some(mut stdin) = child.stdin.take() else {
            let _ = child.kill();
            return Err(RenderError::Spawn(io::Error::other("failed to open PlantUML stdin")).into());
        };

        let input = source.as_bytes().to_vec();
        let feeder = thread::spawn(move || -> io::Result<()> {
            // The engine may exit before reading everything; its exit status
            // is what gets reported then.
            match stdin.write_all(&input) {
                Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        });
        let drain = thread::spawn(move || -> io::Result<Vec<u8>> {
            let mut output = Vec::new();
            reader.read_to_end(&mut output)?;
            Ok(output)
        });

        let status = match self.timeout {
            Some(timeout) => wait_with_timeout(&mut child, timeout)?,
            None => child.wait().map_err(RenderError::Spawn)?,
        };

        let output = join(drain, "output drain")?;
        let fed = join(feeder, "stdin feeder");

        check_status(status)?;
        fed?;

        debug!(bytes = output.len(); "PlantUML finished");
        Ok(output)
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus, RenderError> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait().map_err(RenderError::Spawn)? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            warn!(timeout:?; "PlantUML timed out, killing process");
            if let Err(err) = child.kill() {
                warn!(err:%; "Failed to kill PlantUML process");
            }
            let _ = child.wait();
            return Err(RenderError::Timeout(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn join<T>(handle: JoinHandle<io::Result<T>>, name: &str) -> Result<T, RenderError> {
    handle
        .join()
        .map_err(|_| RenderError::Spawn(io::Error::other(format!("PlantUML {name} thread panicked"))))?
        .map_err(RenderError::Spawn)
}

fn check_status(status: ExitStatus) -> Result<(), RenderError> {
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(RenderError::Exit { code }),
        None => Err(RenderError::Terminated),
    }
}
