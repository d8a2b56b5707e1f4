use std::net::IpAddr;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("error resolving DNS for {service}: {source}")]
    Lookup {
        service: String,
        #[source]
        source: std::io::Error,
    },
    #[error("error resolving DNS for {service}: no addresses found")]
    NoAddresses { service: String },
}

/// Name resolution used by the pipeline.
#[async_trait]
pub trait Resolve {
    /// Returns the addresses of `service` in resolver order, without duplicates.
    async fn resolve(&self, service: &str) -> Result<Vec<IpAddr>, ResolveError>;
}

/// Resolves through the platform resolver (getaddrinfo), so `/etc/hosts`
/// and the system DNS configuration apply. No extra timeout or retry.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemResolver;

#[async_trait]
impl Resolve for SystemResolver {
    async fn resolve(&self, service: &str) -> Result<Vec<IpAddr>, ResolveError> {
        let addrs = tokio::net::lookup_host((service, 0))
            .await
            .map_err(|source| ResolveError::Lookup {
                service: service.to_string(),
                source,
            })?;

        let ips = dedup_in_order(addrs.map(|addr| addr.ip()));
        if ips.is_empty() {
            return Err(ResolveError::NoAddresses {
                service: service.to_string(),
            });
        }
        Ok(ips)
    }
}

fn dedup_in_order(ips: impl Iterator<Item = IpAddr>) -> Vec<IpAddr> {
    let mut unique: Vec<IpAddr> = Vec::new();
    for ip in ips {
        if !unique.contains(&ip) {
            unique.push(ip);
        }
    }
    unique
}
