//! Sistema de alertas – threshold de gás e indicadores.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Concentração de gás (%) a partir da qual o alerta liga (inclusivo).
pub const GAS_ALERT_THRESHOLD: u8 = 70;

/// Nível de alerta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Normal,
    Alert,
}

/// Saída binária controlada pelo [`AlertController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// LED vermelho
    Alert,
    /// LED verde
    Normal,
}

/// Par de saídas digitais dos indicadores.
pub trait Indicators {
    fn set_output(&mut self, channel: Indicator, on: bool);
}

/// Retorna o [`AlertLevel`] para uma leitura de gás.
pub fn level_for_gas(gas: u8) -> AlertLevel {
    if gas >= GAS_ALERT_THRESHOLD {
        AlertLevel::Alert
    } else {
        AlertLevel::Normal
    }
}

/// Aciona exatamente um dos dois indicadores conforme a última leitura.
///
/// Sem histerese: cada chamada é avaliada isoladamente.
pub struct AlertController<I> {
    outputs: I,
    level: AlertLevel,
}

impl<I: Indicators> AlertController<I> {
    pub fn new(outputs: I) -> Self {
        Self {
            outputs,
            level: AlertLevel::Normal,
        }
    }

    pub fn update(&mut self, gas: u8) -> AlertLevel {
        let level = level_for_gas(gas);

        // Desliga antes de ligar: nunca os dois acesos
        match level {
            AlertLevel::Alert => {
                self.outputs.set_output(Indicator::Normal, false);
                self.outputs.set_output(Indicator::Alert, true);
            }
            AlertLevel::Normal => {
                self.outputs.set_output(Indicator::Alert, false);
                self.outputs.set_output(Indicator::Normal, true);
            }
        }

        if level != self.level {
            match level {
                AlertLevel::Alert => warn!("ALERTA: gás em {gas}% (limite {GAS_ALERT_THRESHOLD}%)"),
                AlertLevel::Normal => info!("Gás normalizado em {gas}%"),
            }
        }
        self.level = level;
        level
    }

    pub fn level(&self) -> AlertLevel {
        self.level
    }

    pub fn outputs(&self) -> &I {
        &self.outputs
    }
}
