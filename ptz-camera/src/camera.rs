//! Orquestrador de câmera
//!
//! Controla qualquer backend que implemente [`CameraApi`]: roda a sequência
//! de inicialização, mantém a posição acumulada do pan/tilt dentro dos
//! limites e absorve apenas rejeições de comando no caminho de movimento.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::CameraApi;
use crate::calibration::CalibrationData;
use crate::config::{CameraConfig, RuntimeConfig};
use crate::error::{CameraError, CameraResult, UNKNOWN_CODE};
use crate::types::{DayNightMode, DeviceInfo, VideoCapability, VideoSpecs};

/// Limites de pan (graus)
pub const PAN_RANGE: (f64, f64) = (0.0, 360.0);
/// Limites de tilt (graus)
pub const TILT_RANGE: (f64, f64) = (0.0, 90.0);
/// Espera após o movimento de homing
pub const SETTLE_DURATION: Duration = Duration::from_secs(5);
/// Movimento que leva o pan/tilt ao canto mecânico
pub const HOME_MOVE: (f64, f64) = (-360.0, -90.0);

/// Ajusta `delta` para que `current + delta` fique em `[min, max]`.
/// Retorna o delta efetivo.
pub fn clamp_delta(current: f64, delta: f64, min: f64, max: f64) -> f64 {
    let target = (current + delta).min(max).max(min);
    target - current
}

/// Fonte de espera bloqueante
pub trait Clock {
    fn sleep(&self, duration: Duration);
}

/// Dorme a thread atual
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Câmera genérica sobre um backend compartilhado
pub struct Camera<A: CameraApi + ?Sized> {
    api: Arc<A>,
    config: CameraConfig,
    pan: f64,
    tilt: f64,
    calibration: CalibrationData,
}

impl<A: CameraApi + ?Sized> std::fmt::Debug for Camera<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("host", &self.config.host())
            .field("pan", &self.pan)
            .field("tilt", &self.tilt)
            .field("calibration", &(self.calibration.width, self.calibration.height))
            .finish()
    }
}

impl<A: CameraApi + ?Sized> Camera<A> {
    /// Cria a câmera e roda a inicialização. Sem `calibration_path`, a
    /// calibração padrão é derivada da resolução atual do backend.
    pub fn new(
        api: Arc<A>,
        config: CameraConfig,
        calibration_path: Option<&Path>,
    ) -> CameraResult<Self> {
        Self::with_clock(api, config, calibration_path, &SystemClock)
    }

    /// Como [`Camera::new`], com a espera de assentamento delegada a `clock`
    pub fn with_clock(
        api: Arc<A>,
        config: CameraConfig,
        calibration_path: Option<&Path>,
        clock: &dyn Clock,
    ) -> CameraResult<Self> {
        // Canto oposto ao home: o homing é aceito inteiro e zera o estado
        let mut camera = Self {
            api,
            config,
            pan: PAN_RANGE.1,
            tilt: TILT_RANGE.1,
            calibration: CalibrationData::default(0, 0),
        };

        camera.init_camera(clock)?;

        camera.calibration = match calibration_path {
            Some(path) => {
                info!(path = %path.display(), "loading calibration");
                CalibrationData::load(path)?
            }
            None => {
                let (width, height) = camera.resolution()?;
                info!(width, height, "using default calibration");
                CalibrationData::default(width, height)
            }
        };

        Ok(camera)
    }

    pub fn calibration(&self) -> &CalibrationData {
        &self.calibration
    }

    /// Pan acumulado (graus)
    pub fn pan(&self) -> f64 {
        self.pan
    }

    /// Tilt acumulado (graus)
    pub fn tilt(&self) -> f64 {
        self.tilt
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn get_config(&self) -> RuntimeConfig {
        RuntimeConfig::from_config(&self.config)
    }

    // --- Informação / status ---

    /// Modelo, versões de software/hardware e calibração do motor
    pub fn get_info(&self) -> CameraResult<DeviceInfo> {
        self.api.get_info()
    }

    /// Codificação, taxa de frames, bitrate...
    pub fn get_video_specs(&self) -> CameraResult<VideoSpecs> {
        self.api.get_video_specs()
    }

    pub fn get_video_capabilities(&self) -> CameraResult<VideoCapability> {
        self.api.get_video_capabilities()
    }

    pub fn get_daynight_mode(&self) -> CameraResult<DayNightMode> {
        self.api.get_daynight_mode()
    }

    // --- Motor ---

    /// Move pan/tilt em graus. O estado local é atualizado antes do
    /// comando, mesmo que o backend rejeite ou falhe depois. Deltas não
    /// finitos são recusados sem tocar no estado nem no backend.
    pub fn move_motor(&mut self, pan: f64, tilt: f64) -> CameraResult<()> {
        if !pan.is_finite() || !tilt.is_finite() {
            return Err(CameraError::command(
                UNKNOWN_CODE,
                format!("Invalid move request: pan={} tilt={}", pan, tilt),
            ));
        }

        let pan = clamp_delta(self.pan, pan, PAN_RANGE.0, PAN_RANGE.1);
        let tilt = clamp_delta(self.tilt, tilt, TILT_RANGE.0, TILT_RANGE.1);
        self.pan += pan;
        self.tilt += tilt;

        debug!(pan, tilt, abs_pan = self.pan, abs_tilt = self.tilt, "move_motor");
        self.safe_call(|api| api.move_motor(pan, tilt))?;
        Ok(())
    }

    pub fn calibrate_motor(&self) -> CameraResult<()> {
        self.api.calibrate_motor()
    }

    pub fn reboot(&self) -> CameraResult<()> {
        info!(host = %self.config.host(), "rebooting camera");
        self.api.reboot()
    }

    pub fn is_image_flipped(&self) -> CameraResult<bool> {
        self.api.is_image_flipped()
    }

    pub fn flip_image(&self, flag: bool) -> CameraResult<()> {
        self.api.flip_image(flag)
    }

    pub fn set_daynight_mode(&self, mode: DayNightMode) -> CameraResult<()> {
        self.api.set_daynight_mode(mode)
    }

    /// URL RTSP
    pub fn get_url(&self) -> String {
        self.api.get_url(Some(&self.config))
    }

    // --- Interno ---

    fn resolution(&self) -> CameraResult<(u32, u32)> {
        let specs = self.api.get_video_specs()?;
        Ok(specs.resolution.dimensions())
    }

    /// Absorve `Command`; qualquer outro erro sobe inalterado
    fn safe_call<T>(&self, f: impl FnOnce(&A) -> CameraResult<T>) -> CameraResult<Option<T>> {
        match f(&self.api) {
            Ok(value) => Ok(Some(value)),
            Err(err @ CameraError::Command { .. }) => {
                warn!(error = %err, "command rejected by camera");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn init_camera(&mut self, clock: &dyn Clock) -> CameraResult<()> {
        info!(
            flip_image = self.config.flip_image(),
            daynight_mode = %self.config.daynight_mode(),
            "initializing camera"
        );
        self.api.flip_image(self.config.flip_image())?;
        self.api.set_daynight_mode(self.config.daynight_mode())?;

        self.move_motor(HOME_MOVE.0, HOME_MOVE.1)?;
        clock.sleep(SETTLE_DURATION);

        let start = self.config.start_position();
        self.move_motor(start.pan, start.tilt)?;
        info!(pan = self.pan, tilt = self.tilt, "camera at start position");
        Ok(())
    }
}
