//! Associação de rede com retry e backoff exponencial.

use airmon_core::config::NetworkConfig;
use airmon_core::error::NetworkError;
use std::net::{IpAddr, UdpSocket};
use tracing::{debug, info, warn};

/// Interface de rede capaz de se associar e obter um endereço.
pub trait NetworkLink {
    /// Uma tentativa de associação; não bloqueia indefinidamente.
    fn associate(&mut self, ssid: &str, password: &str) -> Result<IpAddr, NetworkError>;
}

/// Pilha IP do host: a associação já foi feita pelo SO, só descobre o IP local.
#[derive(Debug, Default)]
pub struct HostNetwork;

impl NetworkLink for HostNetwork {
    fn associate(&mut self, ssid: &str, _password: &str) -> Result<IpAddr, NetworkError> {
        debug!("Host: SSID '{ssid}' ignorado, usando a rede do sistema");

        let not_associated = |e: std::io::Error| NetworkError::NotAssociated(e.to_string());
        // connect() em UDP só escolhe a rota, nenhum pacote é enviado
        let sock = UdpSocket::bind("0.0.0.0:0").map_err(not_associated)?;
        sock.connect("8.8.8.8:80").map_err(not_associated)?;
        let ip = sock.local_addr().map_err(not_associated)?.ip();

        if ip.is_unspecified() {
            return Err(NetworkError::NotAssociated("sem endereço local".into()));
        }
        Ok(ip)
    }
}

/// Associa à rede, tentando até `max_attempts` vezes.
///
/// Entre tentativas espera [`NetworkConfig::backoff_for`]. Esgotadas as
/// tentativas retorna [`NetworkError::AssociationFailed`].
pub fn connect_network<L: NetworkLink>(
    link: &mut L,
    config: &NetworkConfig,
) -> Result<IpAddr, NetworkError> {
    for attempt in 1..=config.max_attempts {
        match link.associate(&config.ssid, &config.password) {
            Ok(ip) => {
                info!("Conectado à rede '{}': {ip}", config.ssid);
                return Ok(ip);
            }
            Err(e) => {
                warn!("Tentativa {attempt}/{} falhou: {e}", config.max_attempts);
                if attempt < config.max_attempts {
                    std::thread::sleep(config.backoff_for(attempt));
                }
            }
        }
    }

    Err(NetworkError::AssociationFailed {
        attempts: config.max_attempts,
    })
}
