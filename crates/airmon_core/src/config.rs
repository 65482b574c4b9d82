//! Configuração unificada via TOML.
//!
//! Credenciais Wi-Fi padrão vêm de `WIFI_SSID`/`WIFI_PASS` em tempo de
//! compilação; o restante tem defaults equivalentes ao firmware.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Associação de rede e política de retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub ssid: String,
    pub password: String,
    /// Tentativas antes de desistir
    pub max_attempts: u32,
    /// Espera inicial entre tentativas (ms), dobrada a cada falha
    pub initial_backoff_ms: u64,
    /// Teto da espera entre tentativas (ms)
    pub max_backoff_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ssid: option_env!("WIFI_SSID").unwrap_or_default().into(),
            password: option_env!("WIFI_PASS").unwrap_or_default().into(),
            max_attempts: 10,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
        }
    }
}

impl NetworkConfig {
    /// Espera antes da tentativa `attempt` (1-based), com backoff exponencial.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u64
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

/// Maior timeout de I/O aceito na validação (segundos).
pub const MAX_IO_TIMEOUT_SECS: f64 = 3600.0;

/// Servidor HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// IP local para bind
    pub bind_ip: String,
    /// Porta TCP
    pub port: u16,
    /// Timeout de leitura/escrita por conexão (segundos, 0 = sem timeout)
    pub io_timeout_secs: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_ip: "0.0.0.0".into(),
            port: 80,
            io_timeout_secs: 5.0,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_ip, self.port)
    }

    /// `None` para 0 ou valores fora do que cabe em [`Duration`].
    pub fn io_timeout(&self) -> Option<Duration> {
        if self.io_timeout_secs > 0.0 {
            Duration::try_from_secs_f64(self.io_timeout_secs).ok()
        } else {
            None
        }
    }
}

/// Configuração raiz.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Lê e parseia um arquivo TOML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Carrega configuração; qualquer erro cai nos valores padrão.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match Self::from_file(path) {
                Ok(config) => {
                    info!("Configuração carregada de {}", path.display());
                    return config;
                }
                Err(e) => warn!("{e}"),
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("Porta do servidor não pode ser 0".into());
        }
        if !(0.0..=MAX_IO_TIMEOUT_SECS).contains(&self.server.io_timeout_secs) {
            errors.push(format!(
                "Timeout de I/O inválido: {} (0–{MAX_IO_TIMEOUT_SECS})",
                self.server.io_timeout_secs
            ));
        }
        if self.network.max_attempts == 0 {
            errors.push("max_attempts deve ser ao menos 1".into());
        }
        if self.network.initial_backoff_ms > self.network.max_backoff_ms {
            errors.push(format!(
                "Backoff inicial ({} ms) maior que o teto ({} ms)",
                self.network.initial_backoff_ms, self.network.max_backoff_ms
            ));
        }

        errors
    }
}
