use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rental_listings::cache::{CacheConfig, CacheOperations, NoopCache, RedisClient};
use rental_listings::config::{database::DatabaseConfig, EnvironmentConfig};
use rental_listings::database::DatabaseConnection;
use rental_listings::routes::create_router;
use rental_listings::state::{AppState, Stores};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rental_listings=debug,tower_http=info,info")),
        )
        .init();

    info!("🏠 Rental Listings API");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new(&DatabaseConfig::new(config.database_url.clone())).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let cache = connect_cache(&CacheConfig::from(&config)).await;

    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = AppState::new(config, Stores::postgres(db_connection.pool().clone()), cache);
    let app = create_router(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /api/health");
    info!("   POST /api/auth/register | /api/auth/login");
    info!("   GET  /api/properties | /api/properties/:id");
    info!("   POST /api/properties, PUT|DELETE /api/properties/:id (auth)");
    info!("   GET|POST|DELETE /api/favorites (auth)");
    info!("   GET|POST /api/recommendations (auth)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Redis si está habilitado y responde; si no, el servicio sigue sin cache
async fn connect_cache(config: &CacheConfig) -> Arc<dyn CacheOperations> {
    if !config.enabled {
        info!("ℹ️ Cache deshabilitado por configuración");
        return Arc::new(NoopCache);
    }

    match RedisClient::new(config).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!("⚠️ Redis no disponible ({}), continuando sin cache", e);
            Arc::new(NoopCache)
        }
    }
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
