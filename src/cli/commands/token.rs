use uuid::Uuid;

use crate::auth::{issue_session_token, Claims};
use crate::config::AppConfig;

pub fn handle(config: &AppConfig, user: Uuid, email: Option<String>) -> anyhow::Result<()> {
    if crate::is_production!() {
        anyhow::bail!("refusing to mint development tokens in production");
    }

    let claims = Claims::new(user, email, &config.security);
    let token = issue_session_token(&claims, &config.security)?;
    println!("{}", token);
    Ok(())
}
