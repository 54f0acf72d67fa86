use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Usuario recién registrado, tal como viaja en el webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub id: i64,
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Serialize)]
struct UserRegisteredPayload<'a> {
    event: &'static str,
    user: &'a RegisteredUser,
}

/// Resultado de un envío. Nunca es un error: sólo se registra en logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Skipped,
    Delivered(u16),
    Rejected(u16),
    Failed(String),
}

/// Notificaciones salientes best-effort hacia la automatización externa
#[derive(Clone)]
pub struct WebhookService {
    client: Client,
    url: Option<String>,
    timeout: Duration,
}

impl WebhookService {
    pub fn new(url: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url,
            timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Envía el evento `user_registered` y espera la respuesta
    pub async fn send_user_registered(&self, user: &RegisteredUser) -> WebhookOutcome {
        let Some(url) = self.url.as_deref() else {
            log::info!("⚠️ MAKE_WEBHOOK_URL no configurada; se omite el webhook");
            return WebhookOutcome::Skipped;
        };

        let payload = UserRegisteredPayload {
            event: "user_registered",
            user,
        };

        match self
            .client
            .post(url)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_client_error() || response.status().is_server_error() => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                log::warn!("❌ Webhook respondió {}: {}", status, body);
                WebhookOutcome::Rejected(status)
            }
            Ok(response) => {
                let status = response.status().as_u16();
                log::info!("✅ Webhook entregado: {}", status);
                WebhookOutcome::Delivered(status)
            }
            Err(e) => {
                log::error!("❌ Error enviando webhook: {}", e);
                WebhookOutcome::Failed(e.to_string())
            }
        }
    }

    /// Lanza el envío en segundo plano sin bloquear al llamador
    pub fn notify_user_registered(&self, user: RegisteredUser) -> tokio::task::JoinHandle<WebhookOutcome> {
        let service = self.clone();
        tokio::spawn(async move { service.send_user_registered(&user).await })
    }
}
