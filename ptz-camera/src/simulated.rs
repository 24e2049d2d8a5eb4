//! Backend simulado (mock de hardware)
//!
//! Implementa [`CameraApi`] em memória. O motor satura nos batentes
//! mecânicos como um pan/tilt real; um comando que não consegue mover nada
//! (já encostado no batente na direção pedida) é rejeitado pelo "firmware"
//! com o código [`MOTOR_LIMIT_CODE`] e reportado como `Ok(false)`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::debug;

use crate::api::CameraApi;
use crate::config::CameraConfig;
use crate::error::{CameraError, CameraResult, ErrorKind, translate};
use crate::types::{
    DayNightMode, DeviceInfo, VideoBitrate, VideoBitrateType, VideoCapability, VideoEncodeType,
    VideoQuality, VideoResolution, VideoSpecs,
};

/// Código de firmware para movimento bloqueado pelo batente
pub const MOTOR_LIMIT_CODE: i32 = -40210;

/// Falhas nativas do simulador, antes da tradução
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulatorFault {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Motor already at mechanical limit")]
    AtLimit,

    #[error("Device unreachable: {0}")]
    Unreachable(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl SimulatorFault {
    /// Tipo da taxonomia para esta falha
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimulatorFault::InvalidCredentials => ErrorKind::Authentication,
            SimulatorFault::Unreachable(_) => ErrorKind::Connection,
            SimulatorFault::AtLimit | SimulatorFault::Rejected(_) => ErrorKind::Command,
        }
    }
}

/// Chamada registrada pelo simulador
#[derive(Debug, Clone, PartialEq)]
pub enum SimulatedCall {
    GetInfo,
    GetVideoSpecs,
    GetVideoCapabilities,
    MoveMotor { pan: f64, tilt: f64 },
    CalibrateMotor,
    Reboot,
    SetDayNightMode(DayNightMode),
    GetDayNightMode,
    IsImageFlipped,
    FlipImage(bool),
}

/// Parâmetros do dispositivo simulado
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub model: String,
    pub software_version: String,
    pub hardware_version: String,
    /// Batentes de pan (graus)
    pub pan_range: (f64, f64),
    /// Batentes de tilt (graus)
    pub tilt_range: (f64, f64),
    /// Posição ao ligar
    pub initial_position: (f64, f64),
    pub specs: VideoSpecs,
    pub capabilities: VideoCapability,
    pub cloud_user: String,
    pub cloud_password: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            model: "SIM-PTZ".to_string(),
            software_version: "1.0.0".to_string(),
            hardware_version: "1.0".to_string(),
            pan_range: (0.0, 360.0),
            tilt_range: (0.0, 90.0),
            initial_position: (180.0, 45.0),
            specs: VideoSpecs {
                bitrate: VideoBitrate::Br1228,
                default_bitrate: VideoBitrate::Br1228,
                bitrate_type: VideoBitrateType::Vbr,
                frame_rate: 15,
                encode_type: VideoEncodeType::H264,
                resolution: VideoResolution::SuperHd,
                quality: VideoQuality::High,
            },
            capabilities: VideoCapability {
                encode_types: vec![VideoEncodeType::H264, VideoEncodeType::H265],
                frame_rates: vec![15, 20, 25],
                bitrates: vec![
                    VideoBitrate::Br256,
                    VideoBitrate::Br512,
                    VideoBitrate::Br1024,
                    VideoBitrate::Br1228,
                    VideoBitrate::Br2048,
                ],
                bitrate_types: vec![VideoBitrateType::Cbr, VideoBitrateType::Vbr],
                resolutions: vec![
                    VideoResolution::SuperHd,
                    VideoResolution::Res1080p,
                    VideoResolution::Res720p,
                    VideoResolution::Res360p,
                ],
                qualities: vec![VideoQuality::Low, VideoQuality::Mid, VideoQuality::High],
            },
            cloud_user: "admin".to_string(),
            cloud_password: String::new(),
        }
    }
}

/// Estado interno do dispositivo simulado
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedState {
    /// Posição mecânica absoluta
    pub pan: f64,
    pub tilt: f64,
    pub flipped: bool,
    pub daynight_mode: DayNightMode,
    pub motor_calibrated: bool,
    pub reboots: u64,
    /// Movimentos aceitos
    pub moves: u64,
    /// Movimentos rejeitados
    pub rejected_moves: u64,
    pub calls: Vec<SimulatedCall>,
    /// Falhas injetadas, consumidas uma por chamada
    pub pending_faults: VecDeque<SimulatorFault>,
}

impl SimulatedState {
    fn new(config: &SimulatorConfig) -> Self {
        Self {
            pan: config.initial_position.0,
            tilt: config.initial_position.1,
            flipped: false,
            daynight_mode: DayNightMode::Auto,
            motor_calibrated: false,
            reboots: 0,
            moves: 0,
            rejected_moves: 0,
            calls: Vec::new(),
            pending_faults: VecDeque::new(),
        }
    }

    /// Registra a chamada e devolve a próxima falha injetada, se houver
    fn enter(&mut self, call: SimulatedCall) -> Result<(), SimulatorFault> {
        debug!(?call, "simulated camera call");
        self.calls.push(call);
        match self.pending_faults.pop_front() {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }

    /// Movimento relativo, saturando nos batentes
    fn step(&mut self, pan: f64, tilt: f64, config: &SimulatorConfig) -> Result<(), SimulatorFault> {
        let (pan_lo, pan_hi) = config.pan_range;
        let (tilt_lo, tilt_hi) = config.tilt_range;
        let new_pan = (self.pan + pan).max(pan_lo).min(pan_hi);
        let new_tilt = (self.tilt + tilt).max(tilt_lo).min(tilt_hi);

        let requested = pan != 0.0 || tilt != 0.0;
        if requested && new_pan == self.pan && new_tilt == self.tilt {
            self.rejected_moves += 1;
            return Err(SimulatorFault::AtLimit);
        }

        self.pan = new_pan;
        self.tilt = new_tilt;
        self.moves += 1;
        Ok(())
    }
}

/// Câmera pan/tilt simulada
#[derive(Clone)]
pub struct SimulatedCamera {
    state: Arc<Mutex<SimulatedState>>,
    config: SimulatorConfig,
}

impl std::fmt::Debug for SimulatedCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedCamera")
            .field("model", &self.config.model)
            .finish()
    }
}

impl SimulatedCamera {
    /// Cria com configuração padrão
    pub fn new() -> Self {
        Self::with_config(SimulatorConfig::default())
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimulatedState::new(&config))),
            config,
        }
    }

    /// "Abre sessão" validando usuário e senha de nuvem. A senha esperada
    /// vazia aceita qualquer senha.
    pub fn connect(config: &CameraConfig) -> CameraResult<Self> {
        Self::connect_with(SimulatorConfig::default(), config)
    }

    pub fn connect_with(sim: SimulatorConfig, config: &CameraConfig) -> CameraResult<Self> {
        translate(ErrorKind::Authentication, || {
            let user_ok = config.user_cloud() == sim.cloud_user;
            let password_ok =
                sim.cloud_password.is_empty() || config.password_cloud() == sim.cloud_password;
            if user_ok && password_ok {
                Ok(())
            } else {
                Err(SimulatorFault::InvalidCredentials)
            }
        })?;
        Ok(Self::with_config(sim))
    }

    /// Injeta uma falha na próxima chamada
    pub fn inject_fault(&self, fault: SimulatorFault) -> CameraResult<()> {
        self.lock()?.pending_faults.push_back(fault);
        Ok(())
    }

    /// Cópia do estado interno
    pub fn state(&self) -> CameraResult<SimulatedState> {
        Ok(self.lock()?.clone())
    }

    /// Chamadas recebidas até agora
    pub fn calls(&self) -> CameraResult<Vec<SimulatedCall>> {
        Ok(self.lock()?.calls.clone())
    }

    /// Posição mecânica (pan, tilt)
    pub fn position(&self) -> CameraResult<(f64, f64)> {
        let state = self.lock()?;
        Ok((state.pan, state.tilt))
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    fn lock(&self) -> CameraResult<MutexGuard<'_, SimulatedState>> {
        self.state
            .lock()
            .map_err(|e| CameraError::connection(format!("Simulator state poisoned: {}", e)))
    }

    /// Executa `op` com o estado travado e traduz a falha nativa
    fn call<T>(
        &self,
        call: SimulatedCall,
        op: impl FnOnce(&mut SimulatedState, &SimulatorConfig) -> Result<T, SimulatorFault>,
    ) -> CameraResult<T> {
        let mut state = self.lock()?;
        let result = state.enter(call).and_then(|()| op(&mut state, &self.config));
        match result {
            Ok(value) => Ok(value),
            Err(fault @ SimulatorFault::AtLimit) => {
                Err(CameraError::command(MOTOR_LIMIT_CODE, fault.to_string()))
            }
            Err(fault) => {
                let kind = fault.kind();
                translate(kind, || Err(fault))
            }
        }
    }
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraApi for SimulatedCamera {
    fn get_info(&self) -> CameraResult<DeviceInfo> {
        self.call(SimulatedCall::GetInfo, |state, config| {
            Ok(DeviceInfo {
                model: config.model.clone(),
                software_version: config.software_version.clone(),
                hardware_version: config.hardware_version.clone(),
                is_calibrated: state.motor_calibrated,
            })
        })
    }

    fn get_video_specs(&self) -> CameraResult<VideoSpecs> {
        self.call(SimulatedCall::GetVideoSpecs, |_, config| Ok(config.specs.clone()))
    }

    fn get_video_capabilities(&self) -> CameraResult<VideoCapability> {
        self.call(SimulatedCall::GetVideoCapabilities, |_, config| {
            Ok(config.capabilities.clone())
        })
    }

    fn move_motor(&self, pan: f64, tilt: f64) -> CameraResult<bool> {
        let result = self.call(SimulatedCall::MoveMotor { pan, tilt }, |state, config| {
            state.step(pan, tilt, config)
        });
        match result {
            Ok(()) => Ok(true),
            Err(CameraError::Command { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn calibrate_motor(&self) -> CameraResult<()> {
        self.call(SimulatedCall::CalibrateMotor, |state, config| {
            state.pan = config.initial_position.0;
            state.tilt = config.initial_position.1;
            state.motor_calibrated = true;
            Ok(())
        })
    }

    fn reboot(&self) -> CameraResult<()> {
        self.call(SimulatedCall::Reboot, |state, _| {
            state.reboots += 1;
            Ok(())
        })
    }

    fn set_daynight_mode(&self, mode: DayNightMode) -> CameraResult<()> {
        self.call(SimulatedCall::SetDayNightMode(mode), |state, _| {
            state.daynight_mode = mode;
            Ok(())
        })
    }

    fn get_daynight_mode(&self) -> CameraResult<DayNightMode> {
        self.call(SimulatedCall::GetDayNightMode, |state, _| Ok(state.daynight_mode))
    }

    fn is_image_flipped(&self) -> CameraResult<bool> {
        self.call(SimulatedCall::IsImageFlipped, |state, _| Ok(state.flipped))
    }

    fn flip_image(&self, flag: bool) -> CameraResult<()> {
        self.call(SimulatedCall::FlipImage(flag), |state, _| {
            state.flipped = flag;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CameraSecrets, CameraSettings};

    fn camera_config(user_cloud: &str, password_cloud: &str) -> CameraConfig {
        let settings = CameraSettings {
            user_cloud: user_cloud.into(),
            ..Default::default()
        };
        CameraConfig::new(settings, CameraSecrets::new("cam", password_cloud).unwrap())
    }

    #[test]
    fn test_move_saturates_at_limits() {
        let cam = SimulatedCamera::new();
        assert!(cam.move_motor(-360.0, -90.0).unwrap());
        assert_eq!(cam.position().unwrap(), (0.0, 0.0));

        assert!(cam.move_motor(500.0, 10.0).unwrap());
        assert_eq!(cam.position().unwrap(), (360.0, 10.0));
    }

    #[test]
    fn test_move_at_limit_is_rejected() {
        let cam = SimulatedCamera::new();
        cam.move_motor(-360.0, -90.0).unwrap();

        assert!(!cam.move_motor(-10.0, -10.0).unwrap());
        let state = cam.state().unwrap();
        assert_eq!(state.rejected_moves, 1);
        assert_eq!(state.moves, 1);
    }

    #[test]
    fn test_at_limit_carries_firmware_code() {
        let cam = SimulatedCamera::new();
        cam.move_motor(-360.0, -90.0).unwrap();

        let err = cam
            .call(SimulatedCall::MoveMotor { pan: -5.0, tilt: 0.0 }, |state, config| {
                state.step(-5.0, 0.0, config)
            })
            .unwrap_err();
        assert!(err.is_command());
        assert_eq!(err.code(), Some(MOTOR_LIMIT_CODE));
        assert_eq!(err.message(), "Motor already at mechanical limit");
    }

    #[test]
    fn test_out_of_range_move_saturates() {
        let cam = SimulatedCamera::new();
        cam.move_motor(-360.0, -90.0).unwrap();

        assert!(cam.move_motor(500.0, 0.0).unwrap());
        assert_eq!(cam.position().unwrap(), (360.0, 0.0));
        assert!(!cam.move_motor(1.0, 0.0).unwrap());
    }

    #[test]
    fn test_injected_command_fault_is_swallowed_by_move() {
        let cam = SimulatedCamera::new();
        cam.inject_fault(SimulatorFault::Rejected("busy".into())).unwrap();
        assert!(!cam.move_motor(10.0, 0.0).unwrap());
        assert!(cam.move_motor(10.0, 0.0).unwrap());
    }

    #[test]
    fn test_injected_connection_fault_propagates() {
        let cam = SimulatedCamera::new();
        cam.inject_fault(SimulatorFault::Unreachable("timeout".into())).unwrap();
        let err = cam.move_motor(10.0, 0.0).unwrap_err();
        assert!(err.is_connection());
        assert!(err.message().contains("timeout"));
    }

    #[test]
    fn test_injected_command_fault_on_reboot() {
        let cam = SimulatedCamera::new();
        cam.inject_fault(SimulatorFault::Rejected("busy".into())).unwrap();
        assert!(cam.reboot().unwrap_err().is_command());
        assert_eq!(cam.state().unwrap().reboots, 0);
    }

    #[test]
    fn test_settings_roundtrip() {
        let cam = SimulatedCamera::new();
        cam.flip_image(true).unwrap();
        cam.set_daynight_mode(DayNightMode::Night).unwrap();
        assert!(cam.is_image_flipped().unwrap());
        assert_eq!(cam.get_daynight_mode().unwrap(), DayNightMode::Night);
    }

    #[test]
    fn test_calibrate_and_reboot() {
        let cam = SimulatedCamera::new();
        assert!(!cam.get_info().unwrap().is_calibrated);
        cam.calibrate_motor().unwrap();
        cam.reboot().unwrap();
        let state = cam.state().unwrap();
        assert!(state.motor_calibrated);
        assert_eq!(state.reboots, 1);
        assert!(cam.get_info().unwrap().is_calibrated);
    }

    #[test]
    fn test_call_log() {
        let cam = SimulatedCamera::new();
        cam.get_video_specs().unwrap();
        cam.move_motor(1.0, 2.0).unwrap();
        assert_eq!(
            cam.calls().unwrap(),
            vec![
                SimulatedCall::GetVideoSpecs,
                SimulatedCall::MoveMotor { pan: 1.0, tilt: 2.0 },
            ]
        );
    }

    #[test]
    fn test_connect_accepts_matching_user() {
        let cam = SimulatedCamera::connect(&camera_config("admin", "whatever")).unwrap();
        assert_eq!(cam.config().model, "SIM-PTZ");
    }

    #[test]
    fn test_connect_rejects_bad_credentials() {
        let sim = SimulatorConfig {
            cloud_password: "secret".into(),
            ..Default::default()
        };
        let err = SimulatedCamera::connect_with(sim, &camera_config("admin", "wrong")).unwrap_err();
        assert!(err.is_authentication());
        assert!(err.to_string().contains("Invalid credentials"));
    }

    #[test]
    fn test_default_resolution() {
        let cam = SimulatedCamera::new();
        let specs = cam.get_video_specs().unwrap();
        assert_eq!(specs.resolution.dimensions(), (2304, 1296));
    }
}
