//! # Pipeline
//!
//! One pass of the templater: load the service file, resolve every service
//! in order, render the template. Nothing is kept between passes.

use dns2ip_common::config::Config;
use dns2ip_common::{error, warn};
use thiserror::Error;

use crate::config::{ConfigError, ServiceConfig};
use crate::context::RenderContext;
use crate::render::{self, RenderError};
use crate::resolver::{Resolve, ResolveError};

/// Failures that end an iteration early.
/// Resolution failures are not among them; see [`IterationReport::failures`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug)]
pub struct IterationReport {
    /// Values the template was rendered with.
    pub context: RenderContext,
    /// Services left out of the context because their lookup failed.
    pub failures: Vec<ResolveError>,
    pub bytes_written: usize,
}

pub struct Pipeline<R> {
    cfg: Config,
    resolver: R,
}

impl<R: Resolve> Pipeline<R> {
    pub fn new(cfg: Config, resolver: R) -> Self {
        Self { cfg, resolver }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub async fn run_once(&self) -> Result<IterationReport, PipelineError> {
        let services = ServiceConfig::load(&self.cfg.conf).await?;
        let (context, failures) = build_context(&self.resolver, services).await;
        let bytes_written =
            render::render_to_file(&self.cfg.template, &self.cfg.output, &context).await?;

        Ok(IterationReport {
            context,
            failures,
            bytes_written,
        })
    }
}

/// Resolves the services one at a time, in file order.
/// A failed lookup is logged, recorded and skipped.
pub async fn build_context<R>(
    resolver: &R,
    services: ServiceConfig,
) -> (RenderContext, Vec<ResolveError>)
where
    R: Resolve + ?Sized,
{
    let mut context = RenderContext::new(services.ranges);
    let mut failures: Vec<ResolveError> = Vec::new();

    for service in services.services {
        match resolver.resolve(&service).await {
            Ok(ips) => {
                if context.is_shadowed(&service) {
                    warn!("service {service} is hidden by the ranges in the template context");
                }
                let addresses = ips.iter().map(ToString::to_string).collect();
                context.insert_service(service, addresses);
            }
            Err(e) => {
                error!("Error: {e}");
                failures.push(e);
            }
        }
    }

    (context, failures)
}
