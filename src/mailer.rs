use async_trait::async_trait;
use tracing::info;

/// Out-of-band delivery channel for password-reset codes.
///
/// Stands in for a real mail provider; the production impl just logs the
/// code so it can be picked up from the server output.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_reset_otp(&self, email: &str, otp: &str) -> anyhow::Result<()>;
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_reset_otp(&self, email: &str, otp: &str) -> anyhow::Result<()> {
        info!(email = %email, otp = %otp, "password reset OTP issued");
        Ok(())
    }
}
