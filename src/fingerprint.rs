//! Device fingerprinting for visit analytics and customer device metadata.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
    Bot,
    Unknown,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
            DeviceType::Bot => "bot",
            DeviceType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeviceInfo {
    pub device_type: DeviceType,
    pub browser: String,
    pub os: String,
}

/// Coarse user-agent classification. Order of checks matters: Edge and
/// Opera embed "Chrome", Chrome embeds "Safari".
pub fn parse_user_agent(user_agent: &str) -> DeviceInfo {
    let ua = user_agent.to_ascii_lowercase();

    let device_type = if ua.trim().is_empty() {
        DeviceType::Unknown
    } else if ["bot", "crawler", "spider", "slurp"]
        .iter()
        .any(|needle| ua.contains(needle))
    {
        DeviceType::Bot
    } else if ua.contains("ipad") || ua.contains("tablet") || (ua.contains("android") && !ua.contains("mobile")) {
        DeviceType::Tablet
    } else if ua.contains("mobi") || ua.contains("iphone") || ua.contains("ipod") {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    };

    let browser = if ua.contains("edg/") || ua.contains("edge/") {
        "Edge"
    } else if ua.contains("opr/") || ua.contains("opera") {
        "Opera"
    } else if ua.contains("firefox/") || ua.contains("fxios/") {
        "Firefox"
    } else if ua.contains("chrome/") || ua.contains("crios/") {
        "Chrome"
    } else if ua.contains("safari/") {
        "Safari"
    } else {
        "Other"
    };

    let os = if ua.contains("windows") {
        "Windows"
    } else if ua.contains("android") {
        "Android"
    } else if ua.contains("iphone") || ua.contains("ipad") || ua.contains("ipod") {
        "iOS"
    } else if ua.contains("mac os") || ua.contains("macintosh") {
        "macOS"
    } else if ua.contains("linux") {
        "Linux"
    } else {
        "Other"
    };

    DeviceInfo {
        device_type,
        browser: browser.to_string(),
        os: os.to_string(),
    }
}

/// Stable, non-reversible device identifier: 16 bytes of SHA-256, hex encoded.
pub fn fingerprint(user_agent: &str, accept_language: &str, ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_agent.as_bytes());
    hasher.update(b"|");
    hasher.update(accept_language.as_bytes());
    hasher.update(b"|");
    hasher.update(ip.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

pub fn hash_ip(ip: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(ip.as_bytes());
    hex::encode(hasher.finalize())
}

/// Client IP: first `X-Forwarded-For` hop, then `X-Real-IP`, then the peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse::<IpAddr>().ok());
    if forwarded.is_some() {
        return forwarded;
    }

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<IpAddr>().ok());
    real_ip.or_else(|| peer.map(|addr| addr.ip()))
}

/// Everything the analytics and customer tables record about a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDevice {
    pub info: DeviceInfo,
    pub fingerprint: String,
    pub ip_hash: String,
}

impl ClientDevice {
    pub fn from_headers(headers: &HeaderMap, peer: Option<SocketAddr>, salt: &str) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        let user_agent = header("user-agent");
        let accept_language = header("accept-language");
        let ip = client_ip(headers, peer)
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            info: parse_user_agent(&user_agent),
            fingerprint: fingerprint(&user_agent, &accept_language, &ip),
            ip_hash: hash_ip(&ip, salt),
        }
    }
}
