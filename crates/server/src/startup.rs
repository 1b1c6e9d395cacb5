use std::{path::Path, sync::Arc};

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes::{self, AppState};
use service::campaign::policy::{AllowAll, CampaignPolicy, RequireRole};
use service::campaign::repo::seaorm::SeaOrmCampaignRepository;
use service::campaign::{CampaignRepository, CampaignService};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Where the running configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(String),
    /// No file at this path, assembled from environment variables.
    Env { missing: String },
}

impl ConfigSource {
    /// Report the source once a subscriber is installed.
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!(%path, "configuration loaded"),
            ConfigSource::Env { missing } => warn!(path = %missing, "config file not found, using environment"),
        }
    }
}

/// Load `config.toml` (or `CONFIG_PATH`); without a file, assemble the
/// configuration from environment variables. Either way it is validated.
pub fn load_config() -> anyhow::Result<(AppConfig, ConfigSource)> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        return Ok((AppConfig::load_and_validate()?, ConfigSource::File(path)));
    }
    let mut cfg = AppConfig::from_env();
    cfg.normalize_and_validate()?;
    Ok((cfg, ConfigSource::Env { missing: path }))
}

fn build_policy(cfg: &AppConfig) -> Arc<dyn CampaignPolicy> {
    match &cfg.policy.create_requires_role {
        Some(role) => {
            info!(%role, "campaign creation restricted to role");
            Arc::new(RequireRole::new(role.clone()))
        }
        None => Arc::new(AllowAll),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl_c");
        return;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: connect, migrate, build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db_cfg: models::db::DatabaseConfig = (&cfg.database).into();
    let db = models::db::connect_with_config(&db_cfg).await?;
    migration::Migrator::up(&db, None).await?;
    info!("database migrated");

    let repo: Arc<dyn CampaignRepository> = Arc::new(SeaOrmCampaignRepository::new(db.clone()));
    let state = AppState { campaigns: Arc::new(CampaignService::with_policy(repo, build_policy(&cfg))) };
    let app: Router = routes::build_router(state, build_cors());

    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    info!(addr = %listener.local_addr()?, "starting campaign server");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    models::db::close(db).await?;
    info!("database pool closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_follows_config() {
        let mut cfg = AppConfig::default();
        let plain = build_policy(&cfg);
        let owner = service::campaign::domain::Owner {
            user: models::user::Model {
                id: uuid::Uuid::new_v4(),
                name: "n".into(),
                email: "n@example.com".into(),
                created_at: chrono_now(),
            },
            roles: vec![],
        };
        assert!(plain.authorize_create(&owner).is_ok());

        cfg.policy.create_requires_role = Some("moderator".into());
        assert!(build_policy(&cfg).authorize_create(&owner).is_err());
    }

    // Single test owns CONFIG_PATH so the two cases never race.
    #[test]
    fn load_config_reports_its_source() {
        let dir = std::env::temp_dir().join(format!("campaign-cfg-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("config.toml");
        std::fs::write(
            &file,
            "[server]\nhost = \"127.0.0.1\"\nport = 9100\n\n[database]\nurl = \"postgres://localhost/campaigns\"\n",
        )
        .unwrap();

        std::env::set_var("CONFIG_PATH", &file);
        let (cfg, source) = load_config().unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(source, ConfigSource::File(file.display().to_string()));

        let missing = dir.join("absent.toml");
        std::env::set_var("CONFIG_PATH", &missing);
        std::env::set_var("DATABASE_URL", "postgres://localhost/campaigns");
        let (_, source) = load_config().unwrap();
        assert_eq!(source, ConfigSource::Env { missing: missing.display().to_string() });

        std::env::remove_var("CONFIG_PATH");
        let _ = std::fs::remove_dir_all(&dir);
    }

    fn chrono_now() -> sea_orm::prelude::DateTimeWithTimeZone {
        chrono::Utc::now().into()
    }
}
