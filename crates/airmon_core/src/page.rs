//! Página HTML de telemetria e framing da resposta HTTP.
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Connection: close\r\n
//! \r\n
//! <html>…</html>
//! ```
//!
//! As séries vão embutidas como arrays JSON (`null` para falhas de clima),
//! prontas para o Chart.js no navegador.

use crate::history::HistorySnapshot;
use crate::types::Sample;
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};

/// Período de auto-refresh da página (segundos).
pub const REFRESH_SECS: u32 = 2;

/// Cabeçalho fixo de toda resposta.
pub const RESPONSE_HEAD: &str =
    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n";

const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js";

/// Formata um valor opcional; ausência vira o literal `None`.
fn or_none<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

fn chart_script<T: Serialize>(
    canvas: &str,
    label: &str,
    color: &str,
    labels: &str,
    data: &[T],
) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string(data)?;
    Ok(format!(
        r#"<script>
new Chart(document.getElementById('{canvas}').getContext('2d'), {{
    type: 'line',
    data: {{
        labels: {labels},
        datasets: [{{
            label: '{label}',
            data: {data},
            borderColor: '{color}',
            tension: 0.1
        }}]
    }}
}});
</script>"#
    ))
}

/// Renderiza a página com as últimas leituras e o histórico.
pub fn render_page(
    latest: &Sample,
    history: &HistorySnapshot,
) -> Result<String, serde_json::Error> {
    let labels = serde_json::to_string(&history.labels)?;
    let gas_chart = chart_script(
        "chartGas",
        "Concentração de gás",
        "rgb(75, 192, 192)",
        &labels,
        &history.gas,
    )?;
    let temp_chart = chart_script(
        "chartTemp",
        "Temperatura (°C)",
        "rgb(255, 99, 132)",
        &labels,
        &history.temperature,
    )?;
    let hum_chart = chart_script(
        "chartHum",
        "Umidade (%)",
        "rgb(153, 102, 255)",
        &labels,
        &history.humidity,
    )?;

    let gas = latest.gas;
    let temperature = or_none(latest.temperature());
    let humidity = or_none(latest.humidity());

    Ok(format!(
        r#"<html>
<head>
    <meta charset="utf-8">
    <title>Monitor de qualidade ambiental</title>
    <script src="{CHART_JS_URL}"></script>
    <meta http-equiv="refresh" content="{REFRESH_SECS}">
</head>
<body>
    <h1>Leitura de gases perigosos</h1>
    <p>Últimas leituras</p>
    <p>Gás: {gas} %</p>
    <p>Temperatura: {temperature} °C</p>
    <p>Umidade: {humidity} %</p>
    <canvas id="chartGas" width="200" height="100"></canvas>
    <canvas id="chartTemp" width="200" height="100"></canvas>
    <canvas id="chartHum" width="200" height="100"></canvas>
{gas_chart}
{temp_chart}
{hum_chart}
</body>
</html>
"#
    ))
}

/// Escreve status, headers e corpo.
pub fn write_response<W: Write>(out: &mut W, body: &str) -> io::Result<()> {
    out.write_all(RESPONSE_HEAD.as_bytes())?;
    out.write_all(body.as_bytes())?;
    out.flush()
}
