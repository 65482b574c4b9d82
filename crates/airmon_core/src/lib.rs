//! # Airmon Core
//!
//! Lógica do monitor ambiental independente de hardware: leitura dos
//! sensores de gás e clima, política de alerta, histórico rolante e
//! renderização da página de telemetria.
//!
//! ## Módulos
//! - [`types`] – Amostra gás/temperatura/umidade
//! - [`sensors`] – Traits dos drivers e normalização das leituras
//! - [`alerts`] – Threshold de gás e indicadores mutuamente exclusivos
//! - [`history`] – Janela das últimas 50 amostras
//! - [`page`] – HTML dos gráficos e resposta HTTP
//! - [`config`] – Configuração unificada via TOML
//! - [`error`] – Erros de sensor, rede e configuração

pub mod types;
pub mod sensors;
pub mod alerts;
pub mod history;
pub mod page;
pub mod config;
pub mod error;

// Re-exports convenientes
pub use types::{Climate, Sample};
pub use sensors::{ClimateSensor, GasAdc, SensorReader};
pub use alerts::{AlertController, AlertLevel, Indicator, Indicators};
pub use history::{HistoryBuffer, HistorySnapshot, HISTORY_CAPACITY};
pub use config::AppConfig;
pub use error::{ConfigError, NetworkError, SensorFault};
