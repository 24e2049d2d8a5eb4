//! Erros da camada de câmera
//!
//! Três tipos fechados vindos do backend (`Command`, `Connection`,
//! `Authentication`) mais os erros locais de calibração e configuração.
//! O combinador [`translate`] converte qualquer falha de backend em um
//! desses tipos, preservando a mensagem e a causa original.

use std::error::Error as StdError;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

pub type CameraResult<T> = Result<T, CameraError>;

/// Causa original de uma falha traduzida
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// Código usado quando o backend não informa um
pub const UNKNOWN_CODE: i32 = -1;

/// Erros de câmera
#[derive(Debug, Error, Clone)]
pub enum CameraError {
    /// Comando rejeitado pelo backend (fora de alcance, ocupado...)
    #[error("[{code}] {message}")]
    Command {
        code: i32,
        message: String,
        #[source]
        source: Option<Cause>,
    },

    /// Falha de transporte
    #[error("Connection failed: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    /// Credenciais ou sessão inválidas
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    /// Artefato de calibração
    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    /// Configuração
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CameraError {
    /// Rejeição de comando com código explícito
    pub fn command(code: i32, message: impl Into<String>) -> Self {
        CameraError::Command {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        CameraError::Connection {
            message: message.into(),
            source: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        CameraError::Authentication {
            message: message.into(),
            source: None,
        }
    }

    /// Tipo do erro, se for um dos três tipos de backend
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            CameraError::Command { .. } => Some(ErrorKind::Command),
            CameraError::Connection { .. } => Some(ErrorKind::Connection),
            CameraError::Authentication { .. } => Some(ErrorKind::Authentication),
            CameraError::Calibration(_) | CameraError::Config(_) => None,
        }
    }

    /// Mensagem original, sem prefixo de tipo ou código
    pub fn message(&self) -> String {
        match self {
            CameraError::Command { message, .. }
            | CameraError::Connection { message, .. }
            | CameraError::Authentication { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Código numérico (apenas `Command`)
    pub fn code(&self) -> Option<i32> {
        match self {
            CameraError::Command { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_command(&self) -> bool {
        matches!(self, CameraError::Command { .. })
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, CameraError::Connection { .. })
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, CameraError::Authentication { .. })
    }
}

/// Tipo alvo da tradução
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorKind {
    #[default]
    Command,
    Connection,
    Authentication,
}

impl ErrorKind {
    /// Embrulha uma falha qualquer neste tipo
    pub fn wrap<E>(self, err: E) -> CameraError
    where
        E: StdError + Send + Sync + 'static,
    {
        let message = err.to_string();
        let source: Option<Cause> = Some(Arc::new(err));
        match self {
            ErrorKind::Command => CameraError::Command {
                code: UNKNOWN_CODE,
                message,
                source,
            },
            ErrorKind::Connection => CameraError::Connection { message, source },
            ErrorKind::Authentication => CameraError::Authentication { message, source },
        }
    }
}

/// Executa `work` e traduz qualquer erro para `kind`.
///
/// A mensagem do erro original vira a mensagem do novo erro, e o erro
/// original fica disponível via `source()`.
pub fn translate<T, E, F>(kind: ErrorKind, work: F) -> CameraResult<T>
where
    F: FnOnce() -> Result<T, E>,
    E: StdError + Send + Sync + 'static,
{
    work().map_err(|e| kind.wrap(e))
}

/// Tradução pontual sobre um `Result`
pub trait TranslateExt<T> {
    fn or_kind(self, kind: ErrorKind) -> CameraResult<T>;
}

impl<T, E> TranslateExt<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn or_kind(self, kind: ErrorKind) -> CameraResult<T> {
        self.map_err(|e| kind.wrap(e))
    }
}

/// Erros do artefato de calibração
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalibrationError {
    /// Arquivo inexistente
    #[error("Calibration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Conteúdo inválido
    #[error("Invalid calibration data: {0}")]
    Parse(String),

    /// Falha de E/S
    #[error("Calibration I/O error: {0}")]
    Io(String),
}

/// Erros de configuração
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Arquivo inexistente
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// TOML inválido
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Segredos ausentes
    #[error("Missing required camera secrets: {}", .0.join(", "))]
    MissingSecrets(Vec<String>),

    /// Falha de E/S
    #[error("Config I/O error: {0}")]
    Io(String),
}
