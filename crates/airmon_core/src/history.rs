//! Histórico rolante das últimas amostras para os gráficos.

use crate::types::Sample;
use serde::Serialize;
use std::collections::VecDeque;

/// Quantidade de amostras mantidas por métrica.
pub const HISTORY_CAPACITY: usize = 50;

/// Três séries paralelas (gás, temperatura, umidade) com descarte FIFO.
///
/// As séries têm sempre o mesmo tamanho; o índice `i` das três se refere
/// à mesma amostra.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    gas: VecDeque<u8>,
    temperature: VecDeque<Option<i16>>,
    humidity: VecDeque<Option<u8>>,
}

/// Visão ordenada (mais antiga → mais recente) do histórico.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistorySnapshot {
    pub gas: Vec<u8>,
    pub temperature: Vec<Option<i16>>,
    pub humidity: Vec<Option<u8>>,
    /// Rótulos do eixo X: `0..len`
    pub labels: Vec<usize>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self {
            gas: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
            temperature: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
            humidity: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    pub fn append(&mut self, sample: Sample) {
        self.gas.push_back(sample.gas);
        self.temperature.push_back(sample.temperature());
        self.humidity.push_back(sample.humidity());

        if self.gas.len() > HISTORY_CAPACITY {
            self.evict_oldest();
        }
    }

    fn evict_oldest(&mut self) {
        self.gas.pop_front();
        self.temperature.pop_front();
        self.humidity.pop_front();
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            gas: self.gas.iter().copied().collect(),
            temperature: self.temperature.iter().copied().collect(),
            humidity: self.humidity.iter().copied().collect(),
            labels: (0..self.gas.len()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.gas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gas.is_empty()
    }

    pub fn capacity(&self) -> usize {
        HISTORY_CAPACITY
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}
