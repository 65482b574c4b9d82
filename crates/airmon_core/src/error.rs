//! Taxonomia de erros do monitor.

use std::path::PathBuf;

/// Falha transitória do sensor digital de clima.
///
/// Recuperada localmente: a amostra sai sem temperatura/umidade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorFault {
    #[error("Timeout aguardando resposta do sensor")]
    Timeout,

    #[error("Checksum inválido na leitura do sensor")]
    Checksum,

    #[error("Erro de I/O no sensor: {0}")]
    Io(String),
}

/// Erros de associação de rede.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("Rede não associada: {0}")]
    NotAssociated(String),

    #[error("Associação falhou após {attempts} tentativas")]
    AssociationFailed { attempts: u32 },
}

/// Erros de leitura/escrita da configuração.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Erro ao ler {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Erro ao parsear {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Erro ao serializar config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Erro ao gravar {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
