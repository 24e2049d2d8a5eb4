//! Montagem completa: `.env` → configuração → backend → câmera
//!
//! Nenhuma falha encerra o processo aqui; quem decide é o shell da
//! aplicação.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::api::CameraApi;
use crate::camera::{Camera, Clock, SystemClock};
use crate::config::CameraConfig;
use crate::error::{CameraResult, ConfigError};

/// Caminhos de entrada da montagem
#[derive(Debug, Clone, Copy)]
pub struct SetupPaths<'a> {
    pub config: &'a Path,
    pub env: &'a Path,
    pub calibration: Option<&'a Path>,
}

/// Carrega variáveis de um arquivo `.env`
pub fn load_env(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    dotenv::from_path(path)
        .map_err(|e| ConfigError::Parse(format!("Failed to load {}: {}", path.display(), e)))
}

/// Carrega `.env` e configuração
pub fn load_config(config_path: &Path, env_path: &Path) -> Result<CameraConfig, ConfigError> {
    load_env(env_path)?;
    CameraConfig::load(config_path)
}

/// Monta a câmera. `connect` constrói o backend a partir da configuração
/// e deve traduzir suas falhas (autenticação, conexão).
pub fn setup<A, F>(paths: SetupPaths<'_>, connect: F) -> CameraResult<Camera<A>>
where
    A: CameraApi,
    F: FnOnce(&CameraConfig) -> CameraResult<A>,
{
    setup_with_clock(paths, connect, &SystemClock)
}

pub fn setup_with_clock<A, F>(
    paths: SetupPaths<'_>,
    connect: F,
    clock: &dyn Clock,
) -> CameraResult<Camera<A>>
where
    A: CameraApi,
    F: FnOnce(&CameraConfig) -> CameraResult<A>,
{
    let config = load_config(paths.config, paths.env)?;
    info!(host = %config.host(), port = config.port(), "configuration loaded");

    let api = Arc::new(connect(&config)?);
    Camera::with_clock(api, config, paths.calibration, clock)
}
