//! Aquisição dos sensores – gás (analógico) e clima (digital).
//!
//! Os drivers ficam atrás de traits; o [`SensorReader`] normaliza as
//! leituras e isola falhas transitórias do sensor de clima.

use crate::error::SensorFault;
use crate::types::{Climate, Sample};
use tracing::{debug, warn};

/// Entrada analógica do sensor de gás.
pub trait GasAdc {
    /// Leitura crua na faixa nativa do conversor.
    fn read_raw(&mut self) -> u16;

    /// Valor cru que corresponde a 100%.
    fn full_scale(&self) -> u16 {
        u16::MAX
    }
}

/// Sensor digital de temperatura/umidade.
pub trait ClimateSensor {
    /// Dispara uma medição e devolve o resultado.
    fn measure(&mut self) -> Result<Climate, SensorFault>;
}

/// Converte uma leitura crua para 0–100%, truncando.
///
/// Leituras acima do fundo de escala são saturadas em 100.
pub fn scale_to_percent(raw: u16, full_scale: u16) -> u8 {
    if full_scale == 0 {
        return 0;
    }
    let raw = u32::from(raw.min(full_scale));
    (raw * 100 / u32::from(full_scale)) as u8
}

/// Leitor unificado dos dois sensores.
pub struct SensorReader<G, C> {
    gas: G,
    climate: C,
}

impl<G: GasAdc, C: ClimateSensor> SensorReader<G, C> {
    pub fn new(gas: G, climate: C) -> Self {
        Self { gas, climate }
    }

    /// Concentração de gás em 0–100%.
    pub fn poll_gas(&mut self) -> u8 {
        let raw = self.gas.read_raw();
        let percent = scale_to_percent(raw, self.gas.full_scale());
        debug!("Gás: raw={raw} → {percent}%");
        percent
    }

    /// Temperatura/umidade, ou `None` se a medição falhou.
    ///
    /// Sem retry: uma falha gera exatamente uma amostra nula.
    pub fn poll_climate(&mut self) -> Option<Climate> {
        match self.climate.measure() {
            Ok(climate) => Some(climate),
            Err(e) => {
                warn!("Erro ao ler o sensor de clima: {e}");
                None
            }
        }
    }

    /// Lê os dois sensores e monta uma [`Sample`].
    pub fn poll(&mut self) -> Sample {
        let gas = self.poll_gas();
        let climate = self.poll_climate();
        Sample::new(gas, climate)
    }
}
