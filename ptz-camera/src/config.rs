//! Configuração da câmera
//!
//! `CameraSettings` vem de um arquivo TOML, `CameraSecrets` de argumentos
//! explícitos ou das variáveis `PASSWORD_CAMERA` / `PASSWORD_CLOUD`.
//! `CameraConfig` junta os dois e é o único objeto que o orquestrador consome.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{DayNightMode, VideoQuality};

pub const PASSWORD_CAMERA_VAR: &str = "PASSWORD_CAMERA";
pub const PASSWORD_CLOUD_VAR: &str = "PASSWORD_CLOUD";

/// Valores padrão usados quando uma chave não aparece no arquivo
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDefaults {
    pub host: &'static str,
    pub user: &'static str,
    pub port: u16,
    pub flip_image: bool,
    pub daynight_mode: &'static str,
    pub video_quality: &'static str,
    pub start_position: StartPosition,
}

impl SettingsDefaults {
    pub const fn new() -> Self {
        Self {
            host: "127.0.0.1",
            user: "admin",
            port: 554,
            flip_image: true,
            daynight_mode: "day",
            video_quality: "high",
            start_position: StartPosition { pan: 0.0, tilt: 0.0 },
        }
    }
}

impl Default for SettingsDefaults {
    fn default() -> Self {
        Self::new()
    }
}

pub const DEFAULTS: SettingsDefaults = SettingsDefaults::new();

/// Posição inicial (graus)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StartPosition {
    pub pan: f64,
    pub tilt: f64,
}

/// Formato bruto do arquivo; tudo opcional
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    host: Option<String>,
    port: Option<u16>,
    #[serde(default)]
    user: RawUsers,
    flip_image: Option<bool>,
    daynight_mode: Option<String>,
    video_quality: Option<String>,
    start_position: Option<StartPosition>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUsers {
    camera: Option<String>,
    cloud: Option<String>,
}

/// Configurações não sensíveis da câmera
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraSettings {
    pub host: String,
    pub port: u16,
    pub user_camera: String,
    pub user_cloud: String,
    pub flip_image: bool,
    pub daynight_mode: DayNightMode,
    pub video_quality: VideoQuality,
    pub start_position: StartPosition,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self::resolve(RawSettings::default())
    }
}

impl CameraSettings {
    /// Parse a partir de uma string TOML
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(Self::resolve(raw))
    }

    /// Carrega de um arquivo
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_str(&content)
    }

    /// Aplica os padrões. `daynight_mode` diferente de `"day"` liga a visão
    /// noturna; `video_quality` diferente de `"high"` cai para `Low`.
    fn resolve(raw: RawSettings) -> Self {
        let daynight = raw.daynight_mode.as_deref().unwrap_or(DEFAULTS.daynight_mode);
        let quality = raw.video_quality.as_deref().unwrap_or(DEFAULTS.video_quality);

        Self {
            host: raw.host.unwrap_or_else(|| DEFAULTS.host.to_string()),
            port: raw.port.unwrap_or(DEFAULTS.port),
            user_camera: raw.user.camera.unwrap_or_else(|| DEFAULTS.user.to_string()),
            user_cloud: raw.user.cloud.unwrap_or_else(|| DEFAULTS.user.to_string()),
            flip_image: raw.flip_image.unwrap_or(DEFAULTS.flip_image),
            daynight_mode: if daynight == "day" {
                DayNightMode::Day
            } else {
                DayNightMode::Night
            },
            video_quality: if quality == "high" {
                VideoQuality::High
            } else {
                VideoQuality::Low
            },
            start_position: raw.start_position.unwrap_or(DEFAULTS.start_position),
        }
    }
}

/// Segredos da câmera
#[derive(Clone, PartialEq, Eq)]
pub struct CameraSecrets {
    pub password_camera: String,
    pub password_cloud: String,
}

impl std::fmt::Debug for CameraSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSecrets")
            .field("password_camera", &"***")
            .field("password_cloud", &"***")
            .finish()
    }
}

impl CameraSecrets {
    /// Valores vazios são buscados no ambiente. Falha listando o que faltar.
    pub fn new(password_camera: &str, password_cloud: &str) -> Result<Self, ConfigError> {
        let pick = |given: &str, var: &str| {
            if given.is_empty() {
                env::var(var).unwrap_or_default()
            } else {
                given.to_string()
            }
        };

        let secrets = Self {
            password_camera: pick(password_camera, PASSWORD_CAMERA_VAR),
            password_cloud: pick(password_cloud, PASSWORD_CLOUD_VAR),
        };

        let missing: Vec<String> = [
            ("password_camera", &secrets.password_camera),
            ("password_cloud", &secrets.password_cloud),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name.to_string())
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingSecrets(missing));
        }
        Ok(secrets)
    }

    /// Somente do ambiente
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new("", "")
    }
}

/// Configurações + segredos
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub settings: CameraSettings,
    pub secrets: CameraSecrets,
}

impl CameraConfig {
    pub fn new(settings: CameraSettings, secrets: CameraSecrets) -> Self {
        Self { settings, secrets }
    }

    /// Segredos do ambiente, configurações do arquivo
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let secrets = CameraSecrets::from_env()?;
        let settings = CameraSettings::load(path)?;
        Ok(Self::new(settings, secrets))
    }

    pub fn host(&self) -> &str {
        &self.settings.host
    }

    pub fn port(&self) -> u16 {
        self.settings.port
    }

    pub fn user_camera(&self) -> &str {
        &self.settings.user_camera
    }

    pub fn user_cloud(&self) -> &str {
        &self.settings.user_cloud
    }

    pub fn password_camera(&self) -> &str {
        &self.secrets.password_camera
    }

    pub fn password_cloud(&self) -> &str {
        &self.secrets.password_cloud
    }

    pub fn flip_image(&self) -> bool {
        self.settings.flip_image
    }

    pub fn daynight_mode(&self) -> DayNightMode {
        self.settings.daynight_mode
    }

    pub fn video_quality(&self) -> VideoQuality {
        self.settings.video_quality
    }

    pub fn start_position(&self) -> StartPosition {
        self.settings.start_position
    }
}

/// Recorte da configuração exposto em tempo de execução
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub host: String,
    pub port: u16,
    pub flip_image: bool,
    pub daynight_mode: DayNightMode,
}

impl RuntimeConfig {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            host: config.host().to_string(),
            port: config.port(),
            flip_image: config.flip_image(),
            daynight_mode: config.daynight_mode(),
        }
    }
}

impl From<&CameraConfig> for RuntimeConfig {
    fn from(config: &CameraConfig) -> Self {
        Self::from_config(config)
    }
}

/// Caminho padrão do arquivo de configuração
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}
