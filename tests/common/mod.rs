#![allow(dead_code)]

use std::process::{Child, Command, Output, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::put,
    Json, Router,
};

pub fn relay_bin() -> &'static str {
    env!("CARGO_BIN_EXE_quest-relay")
}

pub fn free_addr() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("127.0.0.1:{port}")
}

/// A running `quest-relay serve`, killed on drop.
pub struct RelayProcess {
    pub addr: String,
    child: Child,
}

impl RelayProcess {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// True while the process has not exited.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for RelayProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Spawn the relay pointed at `api_base`, configured through the same
/// environment variables a deployment would use.
pub fn spawn_relay(api_base: &str, extra_args: &[&str]) -> RelayProcess {
    let addr = free_addr();
    let mut cmd = Command::new(relay_bin());
    cmd.args(["serve", "--listen", &addr, "--api-base", api_base]);
    cmd.args(["--log-level", "warn"]);
    for arg in extra_args {
        cmd.arg(arg);
    }
    cmd.env("TOKEN", "s3cret");
    cmd.env("USER", "octo");
    cmd.env("REPO", "answers");
    let mut child = cmd
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn quest-relay serve");
    wait_for_server(&addr, &mut child);
    RelayProcess { addr, child }
}

pub fn wait_for_server(addr: &str, child: &mut Child) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            let _ = child.wait();
            panic!("relay failed to start before deadline");
        }
        thread::sleep(Duration::from_millis(50));
    }
}

/// Run a quest-relay command and capture its output.
pub fn run_relay(args: &[&str]) -> Output {
    Command::new(relay_bin())
        .args(args)
        .output()
        .expect("run quest-relay")
}

pub fn assert_ok(output: &Output, context: &str) {
    assert!(
        output.status.success(),
        "{context} failed (status {:?})\nstdout:\n{}\nstderr:\n{}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

// ─── Fake GitHub ──────────────────────────────────────────────────────────────

/// One PUT received by the fake contents API
#[derive(Debug, Clone)]
pub struct ReceivedPut {
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

pub struct FakeGithub {
    pub base: String,
    received: Arc<Mutex<Vec<ReceivedPut>>>,
}

impl FakeGithub {
    pub fn received(&self) -> Vec<ReceivedPut> {
        self.received.lock().unwrap().clone()
    }
}

/// Serve a contents endpoint that records each PUT, waits `delay`, then
/// answers with `status`.
pub async fn fake_github(status: StatusCode, delay: Duration) -> FakeGithub {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let app = Router::new().route(
        "/repos/:owner/:repo/contents/:path",
        put(
            move |Path((owner, repo, path)): Path<(String, String, String)>,
                  headers: HeaderMap,
                  Json(body): Json<serde_json::Value>| {
                let sink = Arc::clone(&sink);
                async move {
                    sink.lock().unwrap().push(ReceivedPut {
                        owner,
                        repo,
                        path,
                        authorization: headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        body,
                    });
                    tokio::time::sleep(delay).await;
                    (status, r#"{"content":{"name":"stub"}}"#)
                }
            },
        ),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake github");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeGithub {
        base: format!("http://{addr}"),
        received,
    }
}
