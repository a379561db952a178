//! Emailing the run summary over SMTP.

use chrono::Utc;
use mail_builder::MessageBuilder;
use mail_send::SmtpClientBuilder;
use tracing::info;

use eml2cal_core::RunSummary;

use crate::config::SmtpSettings;
use crate::error::{RunError, RunResult};
use crate::secret::resolve_password;

/// Sends the run summary to the configured recipient.
pub async fn send_report(settings: &SmtpSettings, summary: &RunSummary) -> RunResult<()> {
    let password = resolve_password(&settings.password_cmd).await?;
    let from = settings
        .from_address
        .as_deref()
        .unwrap_or(&settings.username);
    let subject = format!(
        "[eml2cal] Action report: {}",
        Utc::now().format("%Y-%m-%d %H:%M")
    );

    let message = MessageBuilder::new()
        .from(from.to_string())
        .to(settings.to_address.clone())
        .subject(subject)
        .text_body(summary.to_text());

    let mut client = SmtpClientBuilder::new(settings.server.clone(), settings.port)
        .implicit_tls(settings.port == 465)
        .credentials((settings.username.clone(), password))
        .connect()
        .await
        .map_err(|e| RunError::Report(e.to_string()))?;
    client
        .send(message)
        .await
        .map_err(|e| RunError::Report(e.to_string()))?;

    info!(to = %settings.to_address, "sent run report");
    Ok(())
}
