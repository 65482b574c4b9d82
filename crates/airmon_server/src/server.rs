//! Servidor HTTP de telemetria – uma conexão por vez.
//!
//! Cada conexão aceita dispara um ciclo completo: leitura dos sensores,
//! atualização dos LEDs, histórico, página e fechamento. O próprio
//! auto-refresh do navegador define o ritmo de amostragem.

use airmon_core::alerts::{AlertController, AlertLevel, Indicators};
use airmon_core::history::HistoryBuffer;
use airmon_core::page;
use airmon_core::sensors::{ClimateSensor, GasAdc, SensorReader};
use airmon_core::types::Sample;
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Bytes lidos da requisição (o conteúdo não é roteado).
/// O excedente é descartado no fechamento; fora do loopback o cliente pode ver um reset.
pub const REQUEST_BUDGET: usize = 1024;

/// Falhas seguidas de accept antes de recriar o socket de escuta.
pub const MAX_ACCEPT_FAILURES: u32 = 5;

const REBIND_DELAY: Duration = Duration::from_secs(2);

/// Estado do servidor: sensores, alertas e histórico.
pub struct TelemetryServer<G, C, I> {
    sensors: SensorReader<G, C>,
    alerts: AlertController<I>,
    history: HistoryBuffer,
    io_timeout: Option<Duration>,
    served: u64,
}

impl<G, C, I> TelemetryServer<G, C, I>
where
    G: GasAdc,
    C: ClimateSensor,
    I: Indicators,
{
    pub fn new(
        sensors: SensorReader<G, C>,
        alerts: AlertController<I>,
        io_timeout: Option<Duration>,
    ) -> Self {
        Self {
            sensors,
            alerts,
            history: HistoryBuffer::new(),
            io_timeout,
            served: 0,
        }
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    #[cfg(test)]
    pub fn alerts(&self) -> &AlertController<I> {
        &self.alerts
    }

    pub fn alert_level(&self) -> AlertLevel {
        self.alerts.level()
    }

    /// Lê os sensores, atualiza os LEDs e registra a amostra.
    fn sample(&mut self) -> Sample {
        let gas = self.sensors.poll_gas();
        let climate = self.sensors.poll_climate();
        self.alerts.update(gas);

        let sample = Sample::new(gas, climate);
        self.history.append(sample);
        sample
    }

    /// Ciclo de uma requisição sobre qualquer stream.
    ///
    /// Erros de I/O do cliente são apenas registrados; a amostra é feita
    /// mesmo que a leitura falhe.
    pub fn handle_connection<S: Read + Write>(&mut self, stream: &mut S) -> Sample {
        let mut buf = [0u8; REQUEST_BUDGET];
        match stream.read(&mut buf) {
            Ok(n) => {
                let request = String::from_utf8_lossy(&buf[..n]);
                debug!(
                    "Request ({n} bytes): {}",
                    request.lines().next().unwrap_or_default()
                );
            }
            Err(e) => warn!("Erro ao ler requisição: {e}"),
        }

        let sample = self.sample();

        match page::render_page(&sample, &self.history.snapshot()) {
            Ok(body) => {
                if let Err(e) = page::write_response(stream, &body) {
                    warn!("Erro ao enviar resposta: {e}");
                }
            }
            Err(e) => error!("Erro ao renderizar página: {e}"),
        }

        sample
    }

    /// Atende um cliente TCP e fecha a conexão incondicionalmente.
    pub fn handle_client(&mut self, mut stream: TcpStream, peer: SocketAddr) -> Sample {
        self.served += 1;
        info!("Cliente #{} conectado desde {peer}", self.served);

        if let Err(e) = stream
            .set_read_timeout(self.io_timeout)
            .and_then(|_| stream.set_write_timeout(self.io_timeout))
        {
            warn!("Falha ao configurar timeout para {peer}: {e}");
        }

        let sample = self.handle_connection(&mut stream);

        if let Err(e) = stream.shutdown(Shutdown::Both) {
            if e.kind() != io::ErrorKind::NotConnected {
                debug!("Erro ao fechar conexão com {peer}: {e}");
            }
        }

        info!(
            "← Gás {}% | Temp {:?} | Umid {:?} | {:?} | histórico {}/{}",
            sample.gas,
            sample.temperature(),
            sample.humidity(),
            self.alert_level(),
            self.history().len(),
            self.history().capacity()
        );
        sample
    }

    /// Aceita e atende exatamente uma conexão.
    pub fn accept_one(&mut self, listener: &TcpListener) -> io::Result<Sample> {
        let (stream, peer) = listener.accept()?;
        Ok(self.handle_client(stream, peer))
    }

    /// Loop de accept até `MAX_ACCEPT_FAILURES` falhas consecutivas.
    pub fn serve(&mut self, listener: &TcpListener) {
        let mut failures = 0;
        while failures < MAX_ACCEPT_FAILURES {
            match self.accept_one(listener) {
                Ok(_) => failures = 0,
                Err(e) => {
                    failures += 1;
                    warn!("Erro no accept ({failures}/{MAX_ACCEPT_FAILURES}): {e}");
                }
            }
        }
    }

    /// Escuta em `addr` para sempre, recriando o socket quando necessário.
    pub fn run_forever(&mut self, addr: &str) -> ! {
        loop {
            match TcpListener::bind(addr) {
                Ok(listener) => {
                    info!("Escutando em {addr}");
                    self.serve(&listener);
                    error!("Accept falhando repetidamente, recriando socket em {addr}");
                }
                Err(e) => {
                    error!("Falha ao bind {addr}: {e}. Tentando novamente em 2s...");
                }
            }
            std::thread::sleep(REBIND_DELAY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airmon_core::alerts::Indicator;
    use airmon_core::error::SensorFault;
    use airmon_core::types::Climate;
    use airmon_core::HISTORY_CAPACITY;
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::thread;

    /// ADC já em porcentagem (fundo de escala 100).
    struct ScriptedGas(VecDeque<u16>);

    impl GasAdc for ScriptedGas {
        fn read_raw(&mut self) -> u16 {
            self.0.pop_front().unwrap_or(0)
        }

        fn full_scale(&self) -> u16 {
            100
        }
    }

    struct ScriptedClimate(VecDeque<Result<Climate, SensorFault>>);

    impl ClimateSensor for ScriptedClimate {
        fn measure(&mut self) -> Result<Climate, SensorFault> {
            self.0.pop_front().unwrap_or(Ok(Climate {
                temperature: 23,
                humidity: 48,
            }))
        }
    }

    #[derive(Default)]
    struct Leds {
        alert: bool,
        normal: bool,
    }

    impl Indicators for Leds {
        fn set_output(&mut self, channel: Indicator, on: bool) {
            match channel {
                Indicator::Alert => self.alert = on,
                Indicator::Normal => self.normal = on,
            }
        }
    }

    type TestServer = TelemetryServer<ScriptedGas, ScriptedClimate, Leds>;

    fn server(gas: &[u16], climate: Vec<Result<Climate, SensorFault>>) -> TestServer {
        TelemetryServer::new(
            SensorReader::new(
                ScriptedGas(gas.iter().copied().collect()),
                ScriptedClimate(climate.into()),
            ),
            AlertController::new(Leds::default()),
            Some(Duration::from_millis(500)),
        )
    }

    /// Stream em memória: requisição na entrada, resposta na saída.
    struct MemStream {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl Read for MemStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MemStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Stream cuja leitura e escrita sempre falham.
    struct BrokenStream;

    impl Read for BrokenStream {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    impl Write for BrokenStream {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn fetch(addr: SocketAddr) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: airmon\r\n\r\n")
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    /// Sobe um listener local e dispara `requests` clientes em sequência.
    fn run_clients(server: &mut TestServer, requests: usize) -> Vec<String> {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let clients = thread::spawn(move || (0..requests).map(|_| fetch(addr)).collect::<Vec<_>>());

        for _ in 0..requests {
            server.accept_one(&listener).unwrap();
        }
        clients.join().unwrap()
    }

    #[test]
    fn any_request_gets_the_page() {
        let mut s = server(&[12], vec![]);
        let mut stream = MemStream {
            input: Cursor::new(b"POST /whatever HTTP/1.1\r\n\r\n".to_vec()),
            output: Vec::new(),
        };
        let sample = s.handle_connection(&mut stream);
        assert_eq!(sample.gas, 12);

        let text = String::from_utf8(stream.output).unwrap();
        assert!(text.starts_with(page::RESPONSE_HEAD));
        assert!(text.contains("Gás: 12 %"));
    }

    #[test]
    fn oversized_request_still_gets_the_page() {
        let mut s = server(&[33], vec![]);
        let mut request = b"GET / HTTP/1.1\r\nCookie: ".to_vec();
        request.extend(std::iter::repeat_n(b'a', 4 * REQUEST_BUDGET));
        request.extend_from_slice(b"\r\n\r\n");
        let mut stream = MemStream {
            input: Cursor::new(request),
            output: Vec::new(),
        };
        s.handle_connection(&mut stream);

        // Só o orçamento foi consumido
        assert_eq!(stream.input.position(), REQUEST_BUDGET as u64);
        let text = String::from_utf8(stream.output).unwrap();
        assert!(text.starts_with(page::RESPONSE_HEAD));
        assert!(text.contains("Gás: 33 %"));
    }

    #[test]
    fn client_io_failure_still_samples() {
        let mut s = server(&[75], vec![]);
        let sample = s.handle_connection(&mut BrokenStream);
        assert_eq!(sample.gas, 75);
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.alert_level(), AlertLevel::Alert);
    }

    #[test]
    fn three_requests_end_to_end() {
        let mut s = server(&[10, 80, 40], vec![]);
        let responses = run_clients(&mut s, 3);

        let snap = s.history().snapshot();
        assert_eq!(snap.gas, vec![10, 80, 40]);
        assert_eq!(snap.labels, vec![0, 1, 2]);
        assert_eq!(s.alert_level(), AlertLevel::Normal);
        assert!(!s.alerts().outputs().alert);
        assert!(s.alerts().outputs().normal);

        let last = responses.last().unwrap();
        assert!(last.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(last.contains("Connection: close\r\n"));
        assert!(last.contains("data: [10,80,40]"));
        assert!(last.contains("labels: [0,1,2]"));
    }

    #[test]
    fn sixty_requests_keep_last_fifty() {
        let gas: Vec<u16> = (0..60).map(|i| (i * 7 % 101) as u16).collect();
        let mut s = server(&gas, vec![]);
        run_clients(&mut s, 60);

        let snap = s.history().snapshot();
        assert_eq!(snap.gas.len(), HISTORY_CAPACITY);
        let expected: Vec<u8> = gas[10..].iter().map(|&g| g as u8).collect();
        assert_eq!(snap.gas, expected);
        assert_eq!(snap.temperature.len(), HISTORY_CAPACITY);
        assert_eq!(snap.humidity.len(), HISTORY_CAPACITY);
    }

    #[test]
    fn climate_fault_does_not_stop_serving() {
        let mut s = server(
            &[30, 31],
            vec![
                Err(SensorFault::Io("bus".into())),
                Ok(Climate {
                    temperature: 19,
                    humidity: 60,
                }),
            ],
        );
        let responses = run_clients(&mut s, 2);

        assert!(responses[0].contains("Temperatura: None °C"));
        assert!(responses[0].contains("Umidade: None %"));
        assert!(responses[1].contains("Temperatura: 19 °C"));

        let snap = s.history().snapshot();
        assert_eq!(snap.gas, vec![30, 31]);
        assert_eq!(snap.temperature, vec![None, Some(19)]);
        assert_eq!(snap.humidity, vec![None, Some(60)]);
    }

    #[test]
    fn stalled_client_is_bounded_by_timeout() {
        let mut s = server(&[50], vec![]);
        s.io_timeout = Some(Duration::from_millis(100));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        // Conecta e não envia nada; só lê a resposta
        let client = thread::spawn(move || {
            let mut stream = TcpStream::connect(addr).unwrap();
            let mut response = String::new();
            stream.read_to_string(&mut response).unwrap();
            response
        });

        let sample = s.accept_one(&listener).unwrap();
        assert_eq!(sample.gas, 50);
        assert!(client.join().unwrap().contains("Gás: 50 %"));
    }
}
