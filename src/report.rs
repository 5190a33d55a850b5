use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{info, warn};
use reqwest::header::CONTENT_TYPE;

use crate::config::ReportConfig;
use crate::messages::Reading;

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// One POST to the collector per call. Implemented by the real HTTP
/// client and by test fakes.
pub trait Transport {
    async fn post_json(&self, body: String) -> anyhow::Result<TransportResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(config: &ReportConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.unwrap_or(10)))
            .build()?;

        let url = format!(
            "http://{}:{}{}",
            config.host,
            config.port.unwrap_or(1880),
            config
                .path
                .clone()
                .unwrap_or("/microcontrollerRssi".to_string()),
        );

        Ok(HttpTransport { client, url })
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, body: String) -> anyhow::Result<TransportResponse> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok(TransportResponse { status, body })
    }
}

pub struct Reporter<T> {
    transport: T,
    device_id: String,
}

impl<T: Transport> Reporter<T> {
    pub fn new(transport: T, device_id: String) -> Self {
        Reporter {
            transport,
            device_id,
        }
    }

    /// Build, serialize, and submit one reading. Delivery is best-effort:
    /// the outcome is logged and the reading is dropped either way.
    pub async fn report(&self, rssi: i16) {
        let reading = Reading::new(&self.device_id, rssi, unix_now());
        let payload = match serde_json::to_string(&reading) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("Error serializing reading: {:?}", err);
                return;
            }
        };
        info!("Payload: {}", payload);

        match self.transport.post_json(payload).await {
            Ok(response) => {
                info!("HTTP response: {} {}", response.status, response.body);
            }
            Err(err) => {
                warn!("Error delivering reading: {:#}", err);
            }
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs() as i64)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    struct FakeTransport {
        status: u16,
        sent: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for FakeTransport {
        async fn post_json(&self, body: String) -> anyhow::Result<TransportResponse> {
            self.sent.lock().unwrap().push(body);
            Ok(TransportResponse {
                status: self.status,
                body: "ok".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_report_submits_one_request() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let transport = FakeTransport {
            status: 200,
            sent: sent.clone(),
        };
        let reporter = Reporter::new(transport, "photon2-bench".to_string());

        reporter.report(-55).await;

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(value["deviceID"], "photon2-bench");
        assert_eq!(value["rssi"], -55);
        assert!(value["ts"].is_i64());
    }

    #[tokio::test]
    async fn test_report_accepts_error_status_without_retry() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let transport = FakeTransport {
            status: 500,
            sent: sent.clone(),
        };
        let reporter = Reporter::new(transport, "photon2-bench".to_string());

        reporter.report(-70).await;

        assert_eq!(sent.lock().unwrap().len(), 1);
    }
}
