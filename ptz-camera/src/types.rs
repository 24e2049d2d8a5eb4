//! Tipos de dados trocados com o backend da câmera

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Codificação de vídeo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoEncodeType {
    H264,
    H265,
}

/// Bitrate de vídeo (kbps)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum VideoBitrate {
    Br256,
    Br512,
    Br1024,
    Br1228,
    Br2048,
}

impl VideoBitrate {
    /// Valor em kbps
    pub fn kbps(self) -> u32 {
        match self {
            VideoBitrate::Br256 => 256,
            VideoBitrate::Br512 => 512,
            VideoBitrate::Br1024 => 1024,
            VideoBitrate::Br1228 => 1228,
            VideoBitrate::Br2048 => 2048,
        }
    }
}

impl TryFrom<u32> for VideoBitrate {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            256 => Ok(VideoBitrate::Br256),
            512 => Ok(VideoBitrate::Br512),
            1024 => Ok(VideoBitrate::Br1024),
            1228 => Ok(VideoBitrate::Br1228),
            2048 => Ok(VideoBitrate::Br2048),
            other => Err(format!("Invalid video bitrate: {}", other)),
        }
    }
}

impl From<VideoBitrate> for u32 {
    fn from(bitrate: VideoBitrate) -> Self {
        bitrate.kbps()
    }
}

/// Resolução de vídeo, no formato do fabricante (`"L*A"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoResolution {
    #[serde(rename = "2304*1296")]
    SuperHd,
    #[serde(rename = "1920*1080")]
    Res1080p,
    #[serde(rename = "1280*720")]
    Res720p,
    #[serde(rename = "640*360")]
    Res360p,
}

impl VideoResolution {
    /// Largura e altura em pixels
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            VideoResolution::SuperHd => (2304, 1296),
            VideoResolution::Res1080p => (1920, 1080),
            VideoResolution::Res720p => (1280, 720),
            VideoResolution::Res360p => (640, 360),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VideoResolution::SuperHd => "2304*1296",
            VideoResolution::Res1080p => "1920*1080",
            VideoResolution::Res720p => "1280*720",
            VideoResolution::Res360p => "640*360",
        }
    }
}

impl fmt::Display for VideoResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoResolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2304*1296" => Ok(VideoResolution::SuperHd),
            "1920*1080" => Ok(VideoResolution::Res1080p),
            "1280*720" => Ok(VideoResolution::Res720p),
            "640*360" => Ok(VideoResolution::Res360p),
            other => Err(format!("Invalid video resolution: {}", other)),
        }
    }
}

/// Tipo de controle de bitrate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoBitrateType {
    Cbr,
    Vbr,
}

/// Modo dia/noite (visão noturna)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayNightMode {
    /// Visão noturna ligada
    #[serde(rename = "on", alias = "night")]
    Night,
    /// Visão noturna desligada
    #[default]
    #[serde(rename = "off", alias = "day")]
    Day,
    #[serde(rename = "auto")]
    Auto,
}

impl DayNightMode {
    /// Valor enviado ao backend
    pub fn as_str(self) -> &'static str {
        match self {
            DayNightMode::Night => "on",
            DayNightMode::Day => "off",
            DayNightMode::Auto => "auto",
        }
    }
}

impl fmt::Display for DayNightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayNightMode {
    type Err = String;

    /// Aceita os valores do backend (`on`/`off`/`auto`) e os apelidos
    /// `night`/`day`, sem diferenciar maiúsculas.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" | "night" => Ok(DayNightMode::Night),
            "off" | "day" => Ok(DayNightMode::Day),
            "auto" => Ok(DayNightMode::Auto),
            _ => Err(format!("Invalid DayNightMode value: {}", s)),
        }
    }
}

/// Qualidade de vídeo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VideoQuality {
    Low,
    Mid,
    #[default]
    High,
}

impl VideoQuality {
    pub fn level(self) -> u8 {
        match self {
            VideoQuality::Low => 1,
            VideoQuality::Mid => 3,
            VideoQuality::High => 5,
        }
    }
}

impl TryFrom<u8> for VideoQuality {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VideoQuality::Low),
            3 => Ok(VideoQuality::Mid),
            5 => Ok(VideoQuality::High),
            other => Err(format!("Invalid video quality: {}", other)),
        }
    }
}

impl From<VideoQuality> for u8 {
    fn from(quality: VideoQuality) -> Self {
        quality.level()
    }
}

/// Informações básicas do dispositivo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub model: String,
    pub software_version: String,
    pub hardware_version: String,
    pub is_calibrated: bool,
}

/// Configuração atual do stream principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSpecs {
    pub bitrate: VideoBitrate,
    pub default_bitrate: VideoBitrate,
    pub bitrate_type: VideoBitrateType,
    pub frame_rate: u32,
    pub encode_type: VideoEncodeType,
    pub resolution: VideoResolution,
    pub quality: VideoQuality,
}

/// Opções suportadas pelo stream principal
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoCapability {
    pub encode_types: Vec<VideoEncodeType>,
    pub frame_rates: Vec<u32>,
    pub bitrates: Vec<VideoBitrate>,
    pub bitrate_types: Vec<VideoBitrateType>,
    pub resolutions: Vec<VideoResolution>,
    pub qualities: Vec<VideoQuality>,
}
