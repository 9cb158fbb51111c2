use std::net::{IpAddr, SocketAddr};

use axum::http::{HeaderMap, HeaderValue};
use shop_ordering_api::fingerprint::{
    ClientDevice, DeviceType, client_ip, fingerprint, hash_ip, parse_user_agent,
};

const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";
const ANDROID_PHONE: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
const WINDOWS_EDGE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0";
const MAC_FIREFOX: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.1; rv:121.0) Gecko/20100101 Firefox/121.0";
const GOOGLEBOT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

#[test]
fn classifies_common_user_agents() {
    let iphone = parse_user_agent(IPHONE);
    assert_eq!(iphone.device_type, DeviceType::Mobile);
    assert_eq!(iphone.browser, "Safari");
    assert_eq!(iphone.os, "iOS");

    let ipad = parse_user_agent(IPAD);
    assert_eq!(ipad.device_type, DeviceType::Tablet);
    assert_eq!(ipad.os, "iOS");

    let android = parse_user_agent(ANDROID_PHONE);
    assert_eq!(android.device_type, DeviceType::Mobile);
    assert_eq!(android.browser, "Chrome");
    assert_eq!(android.os, "Android");

    let edge = parse_user_agent(WINDOWS_EDGE);
    assert_eq!(edge.device_type, DeviceType::Desktop);
    assert_eq!(edge.browser, "Edge");
    assert_eq!(edge.os, "Windows");

    let firefox = parse_user_agent(MAC_FIREFOX);
    assert_eq!(firefox.browser, "Firefox");
    assert_eq!(firefox.os, "macOS");

    assert_eq!(parse_user_agent(GOOGLEBOT).device_type, DeviceType::Bot);
    assert_eq!(parse_user_agent("").device_type, DeviceType::Unknown);
}

#[test]
fn fingerprint_is_stable_and_input_sensitive() {
    let a = fingerprint(IPHONE, "en-US", "10.0.0.1");
    assert_eq!(a.len(), 32);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(a, fingerprint(IPHONE, "en-US", "10.0.0.1"));
    assert_ne!(a, fingerprint(IPHONE, "en-US", "10.0.0.2"));
    assert_ne!(a, fingerprint(IPHONE, "fr-FR", "10.0.0.1"));
}

#[test]
fn ip_hash_depends_on_salt() {
    let a = hash_ip("10.0.0.1", "one");
    assert_eq!(a.len(), 64);
    assert_ne!(a, hash_ip("10.0.0.1", "two"));
    assert!(!a.contains("10.0.0.1"));
}

#[test]
fn client_ip_prefers_proxy_headers() {
    let peer: SocketAddr = "192.168.1.5:4000".parse().unwrap();
    let mut headers = HeaderMap::new();
    assert_eq!(client_ip(&headers, Some(peer)), Some(peer.ip()));
    assert_eq!(client_ip(&headers, None), None);

    headers.insert("x-real-ip", HeaderValue::from_static("203.0.113.9"));
    assert_eq!(
        client_ip(&headers, Some(peer)),
        Some("203.0.113.9".parse::<IpAddr>().unwrap())
    );

    headers.insert(
        "x-forwarded-for",
        HeaderValue::from_static("198.51.100.7, 10.0.0.1"),
    );
    assert_eq!(
        client_ip(&headers, Some(peer)),
        Some("198.51.100.7".parse::<IpAddr>().unwrap())
    );

    headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
    assert_eq!(
        client_ip(&headers, Some(peer)),
        Some("203.0.113.9".parse::<IpAddr>().unwrap())
    );
}

#[test]
fn client_device_combines_headers() {
    let mut headers = HeaderMap::new();
    headers.insert("user-agent", HeaderValue::from_static(ANDROID_PHONE));
    headers.insert("accept-language", HeaderValue::from_static("hi-IN"));

    let device = ClientDevice::from_headers(&headers, None, "salt");
    assert_eq!(device.info.device_type, DeviceType::Mobile);
    assert_eq!(device.fingerprint, fingerprint(ANDROID_PHONE, "hi-IN", "unknown"));
    assert_eq!(device.ip_hash, hash_ip("unknown", "salt"));
}
