//! # 📷 ptz-camera — Controle de câmera pan/tilt
//!
//! Camada de controle independente de fabricante para câmeras de rede com
//! pan/tilt. Expõe uma superfície uniforme de comandos (motor, modo
//! dia/noite, orientação da imagem, introspecção de vídeo, reboot) sobre
//! qualquer backend que implemente [`CameraApi`].
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              Camera<A>                  │
//! │  init · clamp pan/tilt · safe_call      │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │CalibrationData│ │  RuntimeConfig  │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └─────────────────────────────────────────┘
//!                   ↓ Arc<A>
//!  ┌──────────────────────────────────────┐
//!  │   CameraApi (trait)                  │
//!  │   move_motor(), get_info(), ...      │
//!  └──────────────────────────────────────┘
//!        ↓                    ↓
//!  SimulatedCamera      backend do fabricante
//! ```
//!
//! ## Componentes
//!
//! - [`Camera`]: orquestrador com estado. Roda a sequência de
//!   inicialização (flip, modo dia/noite, homing, espera, posição inicial) e
//!   mantém pan em `[0, 360]` e tilt em `[0, 90]`.
//! - [`CalibrationData`]: modelo pinhole com padrão, leitura e escrita em
//!   TOML.
//! - [`CameraError`]: `Command`, `Connection`, `Authentication`, mais
//!   erros locais. [`translate`] converte falhas de backend.
//! - [`SimulatedCamera`]: backend em memória para testes e demonstração.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ptz_camera::{Camera, CameraConfig, CameraSecrets, CameraSettings, Clock, SimulatedCamera};
//!
//! struct NoWait;
//! impl Clock for NoWait {
//!     fn sleep(&self, _: Duration) {}
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CameraConfig::new(
//!     CameraSettings::default(),
//!     CameraSecrets::new("camera-pass", "cloud-pass")?,
//! );
//! let api = Arc::new(SimulatedCamera::new());
//! let mut camera = Camera::with_clock(api, config, None, &NoWait)?;
//!
//! camera.move_motor(45.0, 30.0)?;
//! assert_eq!((camera.pan(), camera.tilt()), (45.0, 30.0));
//! assert!(camera.get_url().ends_with("/stream1"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Concorrência
//!
//! Síncrono. `move_motor` recebe `&mut self`; para compartilhar uma câmera
//! entre threads use um `Mutex` externo. O backend é compartilhado via
//! `Arc` e cuida da própria sincronização.

pub mod api;
pub mod bootstrap;
pub mod calibration;
pub mod camera;
pub mod config;
pub mod error;
pub mod simulated;
pub mod types;

pub use api::{CameraApi, rtsp_url};
pub use bootstrap::{SetupPaths, setup};
pub use calibration::CalibrationData;
pub use camera::{Camera, Clock, SystemClock, clamp_delta};
pub use config::{CameraConfig, CameraSecrets, CameraSettings, RuntimeConfig, StartPosition};
pub use error::{
    CalibrationError, CameraError, CameraResult, ConfigError, ErrorKind, TranslateExt,
    UNKNOWN_CODE, translate,
};
pub use simulated::{MOTOR_LIMIT_CODE, SimulatedCamera, SimulatorConfig, SimulatorFault};
pub use types::{
    DayNightMode, DeviceInfo, VideoBitrate, VideoBitrateType, VideoCapability, VideoEncodeType,
    VideoQuality, VideoResolution, VideoSpecs,
};
