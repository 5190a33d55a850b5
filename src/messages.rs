use serde_derive::Serialize;

/// One scan result: the advertised local name (empty if the peripheral
/// did not advertise one) and its signal strength in dBm.
#[derive(Clone, Debug, PartialEq)]
pub struct Advertisement {
    pub name: String,
    pub rssi: i16,
}

/// Wire payload posted to the collector. Field order matters to the
/// Node-RED flow on the other end, so keep deviceID, rssi, ts.
#[derive(Debug, Serialize)]
pub struct Reading {
    #[serde(rename = "deviceID")]
    pub device_id: String,
    pub rssi: i16,
    pub ts: i64,
}

impl Reading {
    pub fn new(device_id: &str, rssi: i16, ts: i64) -> Self {
        Reading {
            device_id: device_id.to_string(),
            rssi,
            ts,
        }
    }
}
