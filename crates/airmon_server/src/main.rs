//! # Airmon Server
//!
//! Monitor ambiental: lê o sensor de gás e o de temperatura/umidade a cada
//! requisição, aciona os LEDs de status e serve uma página com gráficos
//! que se atualiza sozinha.
//!
//! ## Uso
//! ```bash
//! RUST_LOG=debug airmon_server   # config.toml ao lado do executável
//! ```

mod hardware;
mod network;
mod server;

use airmon_core::alerts::AlertController;
use airmon_core::config::AppConfig;
use airmon_core::sensors::SensorReader;
use airmon_core::HISTORY_CAPACITY;
use hardware::{LogIndicators, SimulatedClimate, SimulatedGasAdc};
use network::HostNetwork;
use server::TelemetryServer;
use tracing::{error, warn};

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Carregar config ──
    let config_path = AppConfig::default_path();
    let mut config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            warn!("Config inválida: {e}");
        }
        warn!("Usando configuração padrão");
        config = AppConfig::default();
    }

    // ── Rede ──
    let ip = match network::connect_network(&mut HostNetwork, &config.network) {
        Ok(ip) => ip,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let bind_addr = config.server.bind_addr();

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   🌫  MONITOR AMBIENTAL – ATIVO");
    println!("══════════════════════════════════════════════");
    println!("  Endereço:  http://{ip}:{}/", config.server.port);
    println!("  Escuta:    {bind_addr}");
    println!("  Histórico: {HISTORY_CAPACITY} amostras");
    println!("══════════════════════════════════════════════");
    println!();

    // ── Loop principal ──
    let sensors = SensorReader::new(SimulatedGasAdc::new(), SimulatedClimate::new());
    let alerts = AlertController::new(LogIndicators::default());
    let mut server = TelemetryServer::new(sensors, alerts, config.server.io_timeout());

    server.run_forever(&bind_addr)
}
