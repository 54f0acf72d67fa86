use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vehicle_service_logs::config::database::mask_database_url;
use vehicle_service_logs::config::{DatabaseConfig, EnvironmentConfig};
use vehicle_service_logs::{create_app_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🔧 Vehicle Service Logs - API de mantenimiento");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;
    if config.is_development() {
        warn!("🛠️ Modo desarrollo: CORS {:?}", config.cors_origins);
    }

    // Inicializar base de datos
    info!("🗄️ Conectando a {}", mask_database_url(&config.database_url));
    let pool = match DatabaseConfig::new(config.database_url.clone()).create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let app_state = AppState::new(pool, config.clone())?;
    app_state.initialize().await?;
    info!("✅ Tabla '{}' lista", config.table_name);

    if app_state.webhooks.is_configured() {
        info!("🔔 Webhook de registro configurado");
    } else {
        warn!("⚠️ MAKE_WEBHOOK_URL no configurada; los webhooks se omitirán");
    }

    let app = create_app_router(app_state);
    let addr = config.server_url();

    info!("🌐 Servidor iniciando en http://{} ({})", addr, config.environment);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚗 Registros de servicio:");
    info!("   POST /vehicle_service_logs - Crear registro");
    info!("   GET  /vehicle_service_logs?vehicle_id= - Listar registros");
    info!("   GET  /vehicle_service_logs/:id - Obtener registro");
    info!("   PUT  /vehicle_service_logs/:id - Reemplazar registro");
    info!("   DELETE /vehicle_service_logs/:id - Eliminar registro");
    info!("📊 Analytics:");
    info!("   GET  /vehicle_service_logs/analytics/total");
    info!("   GET  /vehicle_service_logs/analytics/average_cost");
    info!("   GET  /vehicle_service_logs/analytics/most_frequent_service");
    info!("   GET  /vehicle_service_logs/analytics/most_recent");
    info!("   GET  /vehicle_service_logs/analytics/due_soon?days=");
    info!("   GET  /vehicle_service_logs/analytics/overdue");
    info!("   GET  /vehicle_service_logs/analytics/top_owner");
    info!("   GET  /vehicle_service_logs/api/mechanics/top");
    info!("   GET  /vehicle_service_logs/api/mechanics/costs");
    info!("🤖 Agente:");
    info!("   GET  /agent/tools - Herramientas disponibles");
    info!("   POST /agent/tools/:name - Invocar herramienta");
    info!("🔔 Eventos:");
    info!("   POST /events/user_registered - Notificar registro de usuario");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
