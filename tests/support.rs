use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// How long `/slow` waits before answering.
pub const SLOW_RESPONSE_DELAY: Duration = Duration::from_secs(2);

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server for tests.
///
/// `/slow` answers after [`SLOW_RESPONSE_DELAY`], `/status/<code>` answers
/// with that code and everything else returns `200 OK`.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    thread::spawn(move || handle_client(stream));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

fn handle_client(mut stream: TcpStream) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let mut buffer = [0u8; 1024];
    let Ok(read) = stream.read(&mut buffer) else {
        return;
    };
    let request = String::from_utf8_lossy(buffer.get(..read).unwrap_or_default()).into_owned();
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_owned();

    let status = if path == "/slow" {
        thread::sleep(SLOW_RESPONSE_DELAY);
        200
    } else if let Some(code) = path.strip_prefix("/status/") {
        code.parse::<u16>().unwrap_or(500)
    } else {
        200
    };

    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK",
        status
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Run the `routecheck` binary against `db` and capture output.
///
/// The working directory and `HOME` point at the database's directory so no
/// ambient config file is picked up.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_routecheck<I, S>(db: &Path, args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = routecheck_bin()?;
    let home = db.parent().unwrap_or(db);
    Command::new(bin)
        .arg("--db")
        .arg(db)
        .args(args)
        .current_dir(home)
        .env("HOME", home)
        .env_remove("ROUTECHECK_DB")
        .env_remove("ROUTECHECK_LOG")
        .env("RUST_LOG", "error")
        .output()
        .map_err(|err| format!("run routecheck failed: {}", err))
}

/// Like [`run_routecheck`] but fails unless the process exited successfully.
///
/// # Errors
///
/// Returns an error with captured stdout/stderr on a non-zero exit.
pub fn run_ok<I, S>(db: &Path, args: I) -> Result<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run_routecheck(db, args)?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[must_use]
pub fn describe(output: &Output) -> String {
    format!(
        "status: {}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn routecheck_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_routecheck").map_or_else(
        || Err("CARGO_BIN_EXE_routecheck missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
