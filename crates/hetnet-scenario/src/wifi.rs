use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiSettings {
    pub ssid: String,
    pub remote_station_manager: String,
    pub channel: String,
    pub phy: String,
    pub station_active_probing: bool,
}

impl Default for WifiSettings {
    fn default() -> Self {
        Self {
            ssid: "ns-3-ssid".to_string(),
            remote_station_manager: "AarfWifiManager".to_string(),
            channel: "yans-default".to_string(),
            phy: "yans-default".to_string(),
            station_active_probing: false,
        }
    }
}
