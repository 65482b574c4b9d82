//! Drivers simulados para rodar o monitor no host.
//!
//! Substituem o ADC do sensor de gás, o sensor de clima e os LEDs.

use airmon_core::alerts::{Indicator, Indicators};
use airmon_core::error::SensorFault;
use airmon_core::sensors::{ClimateSensor, GasAdc};
use airmon_core::types::Climate;
use tracing::debug;

/// Incremento do ADC por leitura (onda triangular em ~40 leituras).
const GAS_STEP: u16 = 3_300;

/// O sensor de clima simulado falha a cada N medições.
const CLIMATE_FAULT_EVERY: u32 = 13;

/// ADC de 16 bits varrendo toda a faixa em onda triangular.
#[derive(Debug)]
pub struct SimulatedGasAdc {
    raw: u16,
    rising: bool,
}

impl SimulatedGasAdc {
    pub fn new() -> Self {
        Self {
            raw: 0,
            rising: true,
        }
    }
}

impl GasAdc for SimulatedGasAdc {
    fn read_raw(&mut self) -> u16 {
        let current = self.raw;
        if self.rising {
            match self.raw.checked_add(GAS_STEP) {
                Some(next) => self.raw = next,
                None => {
                    self.raw = u16::MAX;
                    self.rising = false;
                }
            }
        } else {
            match self.raw.checked_sub(GAS_STEP) {
                Some(next) => self.raw = next,
                None => {
                    self.raw = 0;
                    self.rising = true;
                }
            }
        }
        current
    }
}

/// Sensor de clima com deriva lenta e falhas periódicas.
#[derive(Debug, Default)]
pub struct SimulatedClimate {
    reads: u32,
}

impl SimulatedClimate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClimateSensor for SimulatedClimate {
    fn measure(&mut self) -> Result<Climate, SensorFault> {
        self.reads = self.reads.wrapping_add(1);
        if self.reads % CLIMATE_FAULT_EVERY == 0 {
            return Err(SensorFault::Timeout);
        }
        let phase = (self.reads % 20) as i16;
        Ok(Climate {
            temperature: 20 + (phase - 10).abs() / 2,
            humidity: 45 + (self.reads % 10) as u8,
        })
    }
}

/// LEDs de status, apenas registrados no log.
#[derive(Debug, Default)]
pub struct LogIndicators {
    alert: bool,
    normal: bool,
}

impl Indicators for LogIndicators {
    fn set_output(&mut self, channel: Indicator, on: bool) {
        let slot = match channel {
            Indicator::Alert => &mut self.alert,
            Indicator::Normal => &mut self.normal,
        };
        if *slot != on {
            debug!("LED {channel:?} → {}", if on { "ON" } else { "OFF" });
            *slot = on;
        }
    }
}
