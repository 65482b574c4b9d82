//! Tipos de amostra do monitor ambiental.
//!
//! Uma [`Sample`] é criada a cada requisição aceita e nunca é mutada depois.
//! Temperatura e umidade vêm juntas em [`Climate`]: numa falha do sensor
//! digital as duas ficam ausentes ao mesmo tempo.

// ──────────────────────────────────────────────
// Clima
// ──────────────────────────────────────────────

/// Leitura do sensor de temperatura/umidade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Climate {
    /// Temperatura (°C)
    pub temperature: i16,
    /// Umidade relativa (0–100%)
    pub humidity: u8,
}

// ──────────────────────────────────────────────
// Amostra
// ──────────────────────────────────────────────

/// Uma observação gás/temperatura/umidade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Concentração de gás (0–100%)
    pub gas: u8,
    /// `None` quando o sensor de clima falhou nesta leitura
    pub climate: Option<Climate>,
}

impl Sample {
    pub fn new(gas: u8, climate: Option<Climate>) -> Self {
        Self { gas, climate }
    }

    pub fn temperature(&self) -> Option<i16> {
        self.climate.map(|c| c.temperature)
    }

    pub fn humidity(&self) -> Option<u8> {
        self.climate.map(|c| c.humidity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_sample_has_no_climate() {
        let s = Sample::new(42, None);
        assert_eq!(s.gas, 42);
        assert_eq!(s.temperature(), None);
        assert_eq!(s.humidity(), None);
    }

    #[test]
    fn climate_accessors() {
        let s = Sample::new(
            5,
            Some(Climate {
                temperature: -3,
                humidity: 61,
            }),
        );
        assert_eq!(s.temperature(), Some(-3));
        assert_eq!(s.humidity(), Some(61));
    }
}
