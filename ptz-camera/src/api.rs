//! Interface de capacidades do dispositivo
//!
//! Todo backend de fabricante implementa [`CameraApi`]. Cada implementação
//! traduz as falhas nativas do seu protocolo para [`CameraError`] na própria
//! fronteira (ver [`translate`](crate::error::translate)); o orquestrador
//! nunca vê um erro cru de transporte.
//!
//! [`CameraError`]: crate::error::CameraError

use crate::config::CameraConfig;
use crate::error::CameraResult;
use crate::types::{DayNightMode, DeviceInfo, VideoCapability, VideoQuality, VideoSpecs};

/// Contrato de um backend de câmera pan/tilt.
///
/// # Exemplo
///
/// ```ignore
/// use ptz_camera::{CameraApi, CameraError, CameraResult};
///
/// struct Vendor { client: VendorClient }
///
/// impl CameraApi for Vendor {
///     fn move_motor(&self, pan: f64, tilt: f64) -> CameraResult<bool> {
///         match self.client.move_motor(pan, tilt).or_kind(ErrorKind::Command) {
///             Ok(()) => Ok(true),
///             Err(CameraError::Command { .. }) => Ok(false),
///             Err(e) => Err(e),
///         }
///     }
///     // ...
/// }
/// ```
pub trait CameraApi: Send + Sync {
    /// Modelo e versões
    fn get_info(&self) -> CameraResult<DeviceInfo>;

    /// Configuração atual do stream principal
    fn get_video_specs(&self) -> CameraResult<VideoSpecs>;

    /// Opções de vídeo suportadas
    fn get_video_capabilities(&self) -> CameraResult<VideoCapability>;

    /// Move o motor (graus). Rejeição esperada do backend retorna
    /// `Ok(false)`; falhas de autenticação e conexão propagam.
    fn move_motor(&self, pan: f64, tilt: f64) -> CameraResult<bool>;

    /// Rotina de calibração do motor
    fn calibrate_motor(&self) -> CameraResult<()>;

    fn reboot(&self) -> CameraResult<()>;

    fn set_daynight_mode(&self, mode: DayNightMode) -> CameraResult<()>;

    fn get_daynight_mode(&self) -> CameraResult<DayNightMode>;

    fn is_image_flipped(&self) -> CameraResult<bool>;

    fn flip_image(&self, flag: bool) -> CameraResult<()>;

    /// URL do stream. Não fala com o dispositivo.
    fn get_url(&self, config: Option<&CameraConfig>) -> String {
        rtsp_url(config)
    }
}

/// Caminho do stream para a qualidade configurada
pub fn stream_path(quality: VideoQuality) -> &'static str {
    match quality {
        VideoQuality::High => "stream1",
        _ => "stream2",
    }
}

/// `rtsp://{user}:{password}@{host}:{port}/{stream}`, ou `""` sem config
pub fn rtsp_url(config: Option<&CameraConfig>) -> String {
    let Some(config) = config else {
        return String::new();
    };

    format!(
        "rtsp://{}:{}@{}:{}/{}",
        config.user_camera(),
        config.password_camera(),
        config.host(),
        config.port(),
        stream_path(config.video_quality())
    )
}
