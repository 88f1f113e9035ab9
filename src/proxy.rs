use log::error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    Http,
    Https,
    Socks4,
    Socks5,
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyKind::Http => write!(f, "HTTP"),
            ProxyKind::Https => write!(f, "HTTPS"),
            ProxyKind::Socks4 => write!(f, "SOCKS4"),
            ProxyKind::Socks5 => write!(f, "SOCKS5"),
        }
    }
}

/// A resolved outbound proxy, ready to hang on a client builder.
#[derive(Debug, Clone)]
pub struct ProxyAgent {
    pub url: String,
    pub kind: ProxyKind,
    proxy: reqwest::Proxy,
}

impl ProxyAgent {
    pub fn into_proxy(self) -> reqwest::Proxy {
        self.proxy
    }
}

impl fmt::Display for ProxyAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.kind)
    }
}

/// Schemeless addresses are taken as HTTP proxies. Returns `None` for a
/// blank address.
pub fn normalize_proxy_url(addr: &str) -> Option<(String, ProxyKind)> {
    let addr = addr.trim();
    if addr.is_empty() {
        return None;
    }

    let normalized = if addr.starts_with("socks4://") {
        (addr.to_string(), ProxyKind::Socks4)
    } else if addr.starts_with("socks5://") {
        (addr.to_string(), ProxyKind::Socks5)
    } else if addr.starts_with("https://") {
        (addr.to_string(), ProxyKind::Https)
    } else if addr.starts_with("http://") {
        (addr.to_string(), ProxyKind::Http)
    } else {
        (format!("http://{}", addr), ProxyKind::Http)
    };
    Some(normalized)
}

/// Fail-open: a proxy that cannot be built is logged and the account falls
/// back to a direct connection instead of being skipped.
pub fn resolve_proxy(addr: Option<&str>) -> Option<ProxyAgent> {
    let (url, kind) = normalize_proxy_url(addr?)?;

    // Proxy::all covers both http and https traffic.
    match reqwest::Proxy::all(&url) {
        Ok(proxy) => Some(ProxyAgent { url, kind, proxy }),
        Err(e) => {
            error!("Error creating proxy agent for {}: {}", url, e);
            None
        }
    }
}
