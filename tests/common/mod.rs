use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/biblioteca-api");
        cmd.env("BIBLIOTECA_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL and JWT_SECRET from .env (loaded by the server)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline { break; }
            // The root greeting works without a database, so it doubles as liveness
            let url = format!("{}/", self.base_url);
            match client.get(&url).send().await {
                Ok(resp) => {
                    if resp.status() == StatusCode::OK {
                        return Ok(());
                    }
                }
                Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    // Use stable get_or_init and convert init errors into a panic with context.
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Probes `/testar-db`. Tests that need real rows call this first and return
/// early when the database is not reachable, so the suite still passes on a
/// machine without PostgreSQL.
pub async fn database_available(server: &TestServer) -> Result<bool> {
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/testar-db", server.base_url))
        .send()
        .await?;

    if res.status() != StatusCode::OK {
        eprintln!("skipping: database unavailable ({})", res.status());
        return Ok(false);
    }
    Ok(true)
}

/// Username that satisfies the registration rules and will not collide
/// across test runs.
pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}

pub struct TestUser {
    pub username: String,
    pub token: String,
}

/// Registers a fresh user and logs in, returning the bearer token.
pub async fn register_and_login(
    client: &reqwest::Client,
    base_url: &str,
    prefix: &str,
) -> Result<TestUser> {
    let username = unique_username(prefix);

    let res = client
        .post(format!("{}/registrar", base_url))
        .json(&json!({
            "username": username,
            "password": "senha-de-teste",
            "email": format!("{}@example.com", username),
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration of {} failed: {}",
        username,
        res.status()
    );

    let res = client
        .post(format!("{}/login", base_url))
        .json(&json!({ "username": username, "password": "senha-de-teste" }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "login of {} failed: {}",
        username,
        res.status()
    );

    let body = res.json::<Value>().await?;
    let token = body["token"]
        .as_str()
        .context("login response missing token")?
        .to_string();

    Ok(TestUser { username, token })
}
