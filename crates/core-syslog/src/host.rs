//! Origin host element.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// The host field of a log record: a parsed address when the text is one,
/// the raw name otherwise. IPv6 is tried before IPv4 before falling back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogHost {
    V6(Ipv6Addr),
    V4(Ipv4Addr),
    Name(String),
}

impl From<&str> for LogHost {
    fn from(text: &str) -> Self {
        if let Ok(v6) = text.parse::<Ipv6Addr>() {
            LogHost::V6(v6)
        } else if let Ok(v4) = text.parse::<Ipv4Addr>() {
            LogHost::V4(v4)
        } else {
            LogHost::Name(text.to_string())
        }
    }
}

impl FromStr for LogHost {
    type Err = std::convert::Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(LogHost::from(text))
    }
}

impl fmt::Display for LogHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogHost::V6(addr) => addr.fmt(f),
            LogHost::V4(addr) => addr.fmt(f),
            LogHost::Name(name) => f.write_str(name),
        }
    }
}
