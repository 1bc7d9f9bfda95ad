#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

pub const SECRET: &str = "black-box-test-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// The built binary running without a database, so only the gate and the
/// input validation in front of the store are observable.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_staydesk-api"));
        cmd.arg("serve")
            .env("STAYDESK_API_PORT", port.to_string())
            // Present but empty: dotenvy will not override it and config treats it as unset.
            .env("DATABASE_URL", "")
            .env("SUPABASE_JWT_SECRET", SECRET)
            .env("APP_ENV", "development")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;
        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Session token signed with the secret the spawned server was given.
pub fn session_token(user_id: uuid::Uuid) -> Result<String> {
    let mut security = staydesk_api::config::AppConfig::development().security;
    security.jwt_secret = SECRET.to_string();
    let claims = staydesk_api::auth::Claims::new(user_id, None, &security);
    Ok(staydesk_api::auth::issue_session_token(&claims, &security)?)
}
