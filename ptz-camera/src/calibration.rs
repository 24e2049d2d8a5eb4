//! Modelo de calibração intrínseca (pinhole + distorção)
//!
//! O artefato em disco é um TOML com as matrizes achatadas em ordem de
//! linha:
//!
//! ```toml
//! width = 1920
//! height = 1080
//! distortion_model = "plumb_bob"
//! K = [1000.0, 0.0, 960.0, 0.0, 1000.0, 540.0, 0.0, 0.0, 1.0]
//! D = [0.0, 0.0, 0.0, 0.0, 0.0]
//! R = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
//! P = [1000.0, 0.0, 960.0, 0.0, 0.0, 1000.0, 540.0, 0.0, 0.0, 0.0, 1.0, 0.0]
//! ```

use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::CalibrationError;

pub type Matrix3 = [[f64; 3]; 3];
pub type Matrix3x4 = [[f64; 4]; 3];

/// Distância focal do modelo não calibrado (pixels)
pub const DEFAULT_FOCAL_LENGTH: f64 = 1000.0;
/// Número de coeficientes do modelo `plumb_bob`
pub const PLUMB_BOB_COEFFICIENTS: usize = 5;
pub const DEFAULT_DISTORTION_MODEL: &str = "plumb_bob";

/// Parâmetros intrínsecos e de distorção
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationData {
    pub width: u32,
    pub height: u32,
    pub distortion_model: String,
    /// Matriz intrínseca 3x3
    pub k: Matrix3,
    /// Coeficientes de distorção
    pub d: Vec<f64>,
    /// Matriz de retificação 3x3
    pub r: Matrix3,
    /// Matriz de projeção 3x4
    pub p: Matrix3x4,
}

/// Forma achatada usada no arquivo
#[derive(Debug, Serialize, Deserialize)]
struct CalibrationFile {
    width: u32,
    height: u32,
    distortion_model: String,
    #[serde(rename = "K")]
    k: Vec<f64>,
    #[serde(rename = "D")]
    d: Vec<f64>,
    #[serde(rename = "R")]
    r: Vec<f64>,
    #[serde(rename = "P")]
    p: Vec<f64>,
}

impl CalibrationData {
    /// Modelo pinhole não calibrado: foco 1000 nos dois eixos, ponto
    /// principal no centro da imagem, sem distorção, `R = I`, `P = [K | 0]`.
    pub fn default(width: u32, height: u32) -> Self {
        let f = DEFAULT_FOCAL_LENGTH;
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;

        let k = [[f, 0.0, cx], [0.0, f, cy], [0.0, 0.0, 1.0]];

        Self {
            width,
            height,
            distortion_model: DEFAULT_DISTORTION_MODEL.to_string(),
            k,
            d: vec![0.0; PLUMB_BOB_COEFFICIENTS],
            r: identity(),
            p: projection_from(&k),
        }
    }

    /// Lê um artefato TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CalibrationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            IoErrorKind::NotFound => CalibrationError::NotFound(path.to_path_buf()),
            _ => CalibrationError::Io(format!("Failed to read {}: {}", path.display(), e)),
        })?;
        Self::from_toml(&content)
    }

    /// Grava um artefato TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CalibrationError> {
        let path = path.as_ref();
        let content = self.to_toml()?;
        std::fs::write(path, content)
            .map_err(|e| CalibrationError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> Result<Self, CalibrationError> {
        let file: CalibrationFile =
            toml::from_str(content).map_err(|e| CalibrationError::Parse(e.to_string()))?;

        Ok(Self {
            width: file.width,
            height: file.height,
            distortion_model: file.distortion_model,
            k: reshape::<3, 3>("K", &file.k)?,
            d: file.d,
            r: reshape::<3, 3>("R", &file.r)?,
            p: reshape::<3, 4>("P", &file.p)?,
        })
    }

    pub fn to_toml(&self) -> Result<String, CalibrationError> {
        let file = CalibrationFile {
            width: self.width,
            height: self.height,
            distortion_model: self.distortion_model.clone(),
            k: flatten(&self.k),
            d: self.d.clone(),
            r: flatten(&self.r),
            p: flatten(&self.p),
        };
        toml::to_string_pretty(&file)
            .map_err(|e| CalibrationError::Parse(format!("Failed to serialize calibration: {}", e)))
    }

    /// Projeção em mapa aninhado, com matrizes como listas de listas
    pub fn to_mapping(&self) -> Value {
        json!({
            "width": self.width,
            "height": self.height,
            "distortion_model": self.distortion_model,
            "K": self.k,
            "D": self.d,
            "R": self.r,
            "P": self.p,
        })
    }

    /// Distâncias focais (fx, fy)
    pub fn focal_length(&self) -> (f64, f64) {
        (self.k[0][0], self.k[1][1])
    }

    /// Ponto principal (cx, cy)
    pub fn principal_point(&self) -> (f64, f64) {
        (self.k[0][2], self.k[1][2])
    }
}

fn identity() -> Matrix3 {
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
}

fn projection_from(k: &Matrix3) -> Matrix3x4 {
    let mut p = [[0.0; 4]; 3];
    for (row, k_row) in p.iter_mut().zip(k.iter()) {
        row[..3].copy_from_slice(k_row);
    }
    p
}

fn flatten<const C: usize>(m: &[[f64; C]]) -> Vec<f64> {
    m.iter().flat_map(|row| row.iter().copied()).collect()
}

fn reshape<const R: usize, const C: usize>(
    name: &str,
    values: &[f64],
) -> Result<[[f64; C]; R], CalibrationError> {
    if values.len() != R * C {
        return Err(CalibrationError::Parse(format!(
            "{} must have {} elements ({}x{}), got {}",
            name,
            R * C,
            R,
            C,
            values.len()
        )));
    }
    let mut m = [[0.0; C]; R];
    for (row, chunk) in m.iter_mut().zip(values.chunks_exact(C)) {
        row.copy_from_slice(chunk);
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_pinhole() {
        let calib = CalibrationData::default(1920, 1080);
        assert_eq!(calib.focal_length(), (1000.0, 1000.0));
        assert_eq!(calib.principal_point(), (960.0, 540.0));
        assert_eq!(calib.k[2], [0.0, 0.0, 1.0]);
        assert_eq!(calib.k[0][1], 0.0);
        assert_eq!(calib.d, vec![0.0; 5]);
        assert_eq!(calib.r, identity());
        assert_eq!(calib.distortion_model, "plumb_bob");

        for (p_row, k_row) in calib.p.iter().zip(calib.k.iter()) {
            assert_eq!(&p_row[..3], k_row);
            assert_eq!(p_row[3], 0.0);
        }
    }

    #[test]
    fn test_default_odd_resolution() {
        let calib = CalibrationData::default(641, 361);
        assert_eq!(calib.principal_point(), (320.5, 180.5));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calib.toml");

        let mut calib = CalibrationData::default(1280, 720);
        calib.k = [[812.25, 0.5, 641.125], [0.0, 815.75, 359.875], [0.0, 0.0, 1.0]];
        calib.d = vec![-0.31, 0.12, 0.0011, -0.0007, -0.021];
        calib.r = [[0.999, -0.01, 0.02], [0.01, 0.999, 0.0], [-0.02, 0.0, 0.999]];
        calib.p = [
            [800.0, 0.0, 640.0, -12.5],
            [0.0, 800.0, 360.0, 0.25],
            [0.0, 0.0, 1.0, 0.0],
        ];

        calib.save(&path).unwrap();
        let loaded = CalibrationData::load(&path).unwrap();
        assert_eq!(loaded, calib);
    }

    #[test]
    fn test_artifact_is_flat() {
        let calib = CalibrationData::default(640, 360);
        let value: toml::Value = toml::from_str(&calib.to_toml().unwrap()).unwrap();
        assert_eq!(value["K"].as_array().unwrap().len(), 9);
        assert_eq!(value["D"].as_array().unwrap().len(), 5);
        assert_eq!(value["R"].as_array().unwrap().len(), 9);
        assert_eq!(value["P"].as_array().unwrap().len(), 12);
        assert_eq!(value["width"].as_integer(), Some(640));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");
        assert_eq!(
            CalibrationData::load(&path).unwrap_err(),
            CalibrationError::NotFound(path)
        );
    }

    #[test]
    fn test_load_wrong_shape() {
        let content = r#"
width = 640
height = 360
distortion_model = "plumb_bob"
K = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]
D = [0.0, 0.0, 0.0, 0.0, 0.0]
R = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
P = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]
"#;
        let err = CalibrationData::from_toml(content).unwrap_err();
        assert!(matches!(err, CalibrationError::Parse(ref msg) if msg.contains("K must have 9")));
    }

    #[test]
    fn test_load_malformed() {
        let err = CalibrationData::from_toml("width = \"wide\"").unwrap_err();
        assert!(matches!(err, CalibrationError::Parse(_)));
    }

    #[test]
    fn test_to_mapping_nested() {
        let calib = CalibrationData::default(1920, 1080);
        let map = calib.to_mapping();
        assert_eq!(map["width"], 1920);
        assert_eq!(map["distortion_model"], "plumb_bob");
        assert_eq!(map["K"][0][2], 960.0);
        assert_eq!(map["P"].as_array().unwrap().len(), 3);
        assert_eq!(map["P"][0].as_array().unwrap().len(), 4);
        assert_eq!(map["D"].as_array().unwrap().len(), 5);
    }
}
