// src/integrations/jellyfin/address_candidates.rs
//
// Expands free-form user input into the server URLs worth probing.
//
// RULES:
// - Never fails: malformed input yields an empty list
// - Secure variants come before plain HTTP variants
// - Candidates are unique and keep their insertion order

use url::Url;

/// Port the server listens on for plain HTTP by default
pub const DEFAULT_HTTP_PORT: u16 = 8096;

/// Port the server listens on for HTTPS by default
pub const DEFAULT_HTTPS_PORT: u16 = 8920;

/// Turns an entered address into candidate base URLs
#[cfg_attr(test, mockall::automock)]
pub trait AddressCandidateExpander: Send + Sync {
    fn candidates(&self, input: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AddressCandidateHelper;

impl AddressCandidateHelper {
    pub fn new() -> Self {
        Self
    }

    fn default_port(scheme: &str) -> u16 {
        if scheme == "https" {
            DEFAULT_HTTPS_PORT
        } else {
            DEFAULT_HTTP_PORT
        }
    }

    /// Port written in the authority of the raw input, if any
    fn typed_port(input: &str) -> Option<u16> {
        let rest = input.split_once("://").map_or(input, |(_, rest)| rest);
        let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
        let host_port = authority.rsplit_once('@').map_or(authority, |(_, host_port)| host_port);
        let after_host = match host_port.rfind(']') {
            Some(end) => &host_port[end + 1..],
            None => host_port,
        };
        let (_, port) = after_host.rsplit_once(':')?;
        port.parse().ok()
    }

    fn format_candidate(scheme: &str, host: &str, port: Option<u16>, path: &str) -> String {
        match port {
            Some(port) => format!("{}://{}:{}{}", scheme, host, port, path),
            None => format!("{}://{}{}", scheme, host, path),
        }
    }
}

impl AddressCandidateExpander for AddressCandidateHelper {
    fn candidates(&self, input: &str) -> Vec<String> {
        let input = input.trim();
        if input.is_empty() {
            return Vec::new();
        }

        // Without "://" the url crate would read "host:port" as a scheme
        let has_scheme = input.contains("://");
        let parsed = if has_scheme {
            Url::parse(input)
        } else {
            Url::parse(&format!("http://{}", input))
        };

        let url = match parsed {
            Ok(url) => url,
            Err(e) => {
                log::debug!("Cannot parse '{}' as an address: {}", input, e);
                return Vec::new();
            }
        };

        if !matches!(url.scheme(), "http" | "https") {
            log::debug!("Unsupported scheme '{}' in '{}'", url.scheme(), input);
            return Vec::new();
        }

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => return Vec::new(),
        };
        let path = url.path().trim_end_matches('/');
        // url hides scheme-default ports, "https://host:443" included
        let port = url.port().or_else(|| Self::typed_port(input));

        let entered_scheme = [url.scheme()];
        let schemes: &[&str] = if has_scheme {
            &entered_scheme
        } else {
            &["https", "http"]
        };

        let mut candidates: Vec<String> = schemes
            .iter()
            .map(|scheme| Self::format_candidate(scheme, host, port, path))
            .collect();

        if port.is_none() {
            candidates.extend(schemes.iter().map(|scheme| {
                Self::format_candidate(scheme, host, Some(Self::default_port(scheme)), path)
            }));
        }

        let mut unique = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !unique.contains(&candidate) {
                unique.push(candidate);
            }
        }
        unique
    }
}
