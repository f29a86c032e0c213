//! 调用方地址提取
//!
//! 访问记录里的 `caller_address` 来自这里：
//! - 连接对端是可信代理（单 IP 或 CIDR）→ 取 X-Forwarded-For / X-Real-IP
//! - 未配置可信代理且对端是私有地址 → 视为反向代理
//! - 其余情况一律用对端地址，防止伪造

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::dev::ConnectionInfo;
use actix_web::http::header::HeaderMap;
use tracing::debug;

/// 记录不到对端地址时写入的占位值
pub const UNKNOWN_ADDRESS: &str = "unknown";

/// 可信代理列表，启动时从 `server.trusted_proxies` 注入
#[derive(Debug, Clone, Default)]
pub struct TrustedProxies(pub Vec<String>);

impl TrustedProxies {
    pub fn new(proxies: Vec<String>) -> Self {
        Self(proxies)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 检查 IP 是否为私有地址或 localhost
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10
        }
    }
}

fn parse_peer(ip: &str) -> Option<IpAddr> {
    ip.parse::<SocketAddr>()
        .map(|s| s.ip())
        .or_else(|_| ip.parse::<IpAddr>())
        .ok()
}

/// 检查 IP 是否在可信代理列表中
pub fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    let Some(ip_addr) = parse_peer(ip) else {
        return false;
    };

    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(&ip_addr, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|p| p == ip_addr)
        }
    })
}

/// CIDR 检查
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };
    let Ok(prefix_len) = prefix_len.parse::<u32>() else {
        return false;
    };
    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) if prefix_len <= 32 => {
            let mask = u32::MAX.checked_shl(32 - prefix_len).unwrap_or(0);
            (u32::from(*ip) & mask) == (u32::from(net) & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) if prefix_len <= 128 => {
            let mask = u128::MAX.checked_shl(128 - prefix_len).unwrap_or(0);
            (u128::from(*ip) & mask) == (u128::from(net) & mask)
        }
        _ => false,
    }
}

/// 根据对端地址和可信代理配置决定调用方地址
///
/// `get_forwarded_ip` 只在对端可信时才会被调用。
pub fn resolve_caller_address<F>(
    peer_addr: Option<&str>,
    trusted_proxies: &TrustedProxies,
    get_forwarded_ip: F,
) -> String
where
    F: FnOnce() -> Option<String>,
{
    let Some(peer) = peer_addr else {
        return get_forwarded_ip().unwrap_or_else(|| UNKNOWN_ADDRESS.to_string());
    };

    if !trusted_proxies.is_empty() {
        if is_trusted_proxy(peer, &trusted_proxies.0) {
            let real_ip = get_forwarded_ip().unwrap_or_else(|| peer.to_string());
            debug!("Trusted proxy {} -> {}", peer, real_ip);
            return real_ip;
        }
        return peer.to_string();
    }

    if let Some(ip_addr) = parse_peer(peer)
        && is_private_or_local(&ip_addr)
        && let Some(real_ip) = get_forwarded_ip()
    {
        debug!("Private peer {} treated as proxy: {}", peer, real_ip);
        return real_ip;
    }

    peer.to_string()
}

pub fn extract_caller_address_from_conn_info<F>(
    conn_info: &ConnectionInfo,
    trusted_proxies: &TrustedProxies,
    get_forwarded_ip: F,
) -> String
where
    F: FnOnce() -> Option<String>,
{
    resolve_caller_address(conn_info.peer_addr(), trusted_proxies, get_forwarded_ip)
}

/// 从 HttpRequest 提取调用方地址
pub fn extract_caller_address(req: &HttpRequest, trusted_proxies: &TrustedProxies) -> String {
    extract_caller_address_from_conn_info(&req.connection_info(), trusted_proxies, || {
        extract_forwarded_ip_from_headers(req.headers())
    })
}

/// 从 HeaderMap 提取转发的 IP（X-Forwarded-For 第一个值优先，其次 X-Real-IP）
///
/// 只接受能解析为 IP 的值，其余一律丢弃，调用方随后回落到对端地址。
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    let header_ip = |name: &str, first_only: bool| {
        let value = headers.get(name)?.to_str().ok()?;
        let value = if first_only {
            value.split(',').next()?
        } else {
            value
        };
        let ip = value.trim().parse::<IpAddr>().ok();
        if ip.is_none() {
            debug!("Ignoring unparsable {} value", name);
        }
        ip
    };

    header_ip("x-forwarded-for", true)
        .or_else(|| header_ip("x-real-ip", false))
        .map(|ip| ip.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn forwarded(ip: &str) -> impl FnOnce() -> Option<String> {
        let ip = ip.to_string();
        move || Some(ip)
    }

    #[test]
    fn test_is_private_or_local() {
        assert!(is_private_or_local(&"10.0.0.1".parse().unwrap()));
        assert!(is_private_or_local(&"192.168.1.1".parse().unwrap()));
        assert!(is_private_or_local(&"127.0.0.1".parse().unwrap()));
        assert!(is_private_or_local(&"::1".parse().unwrap()));
        assert!(is_private_or_local(&"fd00::1".parse().unwrap()));
        assert!(is_private_or_local(&"fe80::1".parse().unwrap()));
        assert!(!is_private_or_local(&"8.8.8.8".parse().unwrap()));
        assert!(!is_private_or_local(
            &"2001:4860:4860::8888".parse().unwrap()
        ));
    }

    #[test]
    fn test_ip_in_cidr() {
        let ip: IpAddr = "192.168.1.100".parse().unwrap();
        assert!(ip_in_cidr(&ip, "192.168.1.0/24"));
        assert!(ip_in_cidr(&ip, "0.0.0.0/0"));
        assert!(!ip_in_cidr(&ip, "192.168.2.0/24"));
        assert!(!ip_in_cidr(&ip, "192.168.1.0/33"));
        assert!(!ip_in_cidr(&ip, "2001:db8::/32"));

        let ip6: IpAddr = "2001:db8::1".parse().unwrap();
        assert!(ip_in_cidr(&ip6, "2001:db8::/32"));
        assert!(!ip_in_cidr(&ip6, "2001:db9::/32"));
    }

    #[test]
    fn test_is_trusted_proxy() {
        let proxies = vec!["127.0.0.1".to_string(), "192.168.1.0/24".to_string()];
        assert!(is_trusted_proxy("127.0.0.1", &proxies));
        assert!(is_trusted_proxy("127.0.0.1:8080", &proxies));
        assert!(is_trusted_proxy("192.168.1.50", &proxies));
        assert!(!is_trusted_proxy("8.8.8.8", &proxies));
        assert!(!is_trusted_proxy("garbage", &proxies));
    }

    #[test]
    fn test_public_peer_ignores_forwarded_header() {
        let none = TrustedProxies::default();
        assert_eq!(
            resolve_caller_address(Some("203.0.113.9"), &none, forwarded("1.2.3.4")),
            "203.0.113.9"
        );
    }

    #[test]
    fn test_private_peer_uses_forwarded_without_config() {
        let none = TrustedProxies::default();
        assert_eq!(
            resolve_caller_address(Some("10.0.0.2"), &none, forwarded("1.2.3.4")),
            "1.2.3.4"
        );
        assert_eq!(
            resolve_caller_address(Some("10.0.0.2"), &none, || None),
            "10.0.0.2"
        );
    }

    #[test]
    fn test_explicit_trusted_proxies() {
        let proxies = TrustedProxies::new(vec!["203.0.113.0/24".to_string()]);
        assert_eq!(
            resolve_caller_address(Some("203.0.113.5"), &proxies, forwarded("1.2.3.4")),
            "1.2.3.4"
        );
        // 显式配置后，私有地址不再自动信任
        assert_eq!(
            resolve_caller_address(Some("10.0.0.2"), &proxies, forwarded("1.2.3.4")),
            "10.0.0.2"
        );
    }

    #[test]
    fn test_missing_peer() {
        let none = TrustedProxies::default();
        assert_eq!(resolve_caller_address(None, &none, || None), UNKNOWN_ADDRESS);
    }

    #[test]
    fn test_extract_forwarded_ip_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_forwarded_ip_from_headers(&headers), None);

        headers.insert(
            HeaderName::from_static("x-real-ip"),
            HeaderValue::from_static("9.9.9.9"),
        );
        assert_eq!(
            extract_forwarded_ip_from_headers(&headers).as_deref(),
            Some("9.9.9.9")
        );

        headers.insert(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static("1.1.1.1, 10.0.0.1"),
        );
        assert_eq!(
            extract_forwarded_ip_from_headers(&headers).as_deref(),
            Some("1.1.1.1")
        );
    }

    #[test]
    fn test_forwarded_values_must_be_ip_addresses() {
        let mut headers = HeaderMap::new();
        let junk = "x".repeat(300);
        headers.insert(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_str(&junk).unwrap(),
        );
        assert_eq!(extract_forwarded_ip_from_headers(&headers), None);

        // 无效的 XFF 不挡住合法的 X-Real-IP
        headers.insert(
            HeaderName::from_static("x-real-ip"),
            HeaderValue::from_static(" 2001:db8::7 "),
        );
        assert_eq!(
            extract_forwarded_ip_from_headers(&headers).as_deref(),
            Some("2001:db8::7")
        );

        headers.insert(
            HeaderName::from_static("x-real-ip"),
            HeaderValue::from_static("<script>"),
        );
        assert_eq!(extract_forwarded_ip_from_headers(&headers), None);

        let none = TrustedProxies::default();
        assert_eq!(
            resolve_caller_address(Some("10.0.0.2"), &none, || {
                extract_forwarded_ip_from_headers(&headers)
            }),
            "10.0.0.2"
        );
    }
}
