use server::config::AppConfig;
use server::utils::jwt::{self, ADMIN_ROLE};

pub fn token_cmd(config: &AppConfig, subject: &str, days: i64) -> anyhow::Result<()> {
    anyhow::ensure!(days > 0, "--days must be positive");
    anyhow::ensure!(
        !config.auth.jwt_secret.is_empty(),
        "auth.jwt_secret is not configured (set GALLERY__AUTH__JWT_SECRET)"
    );
    let token = jwt::sign(&config.auth.jwt_secret, subject, ADMIN_ROLE, days)?;
    println!("{token}");
    Ok(())
}
