#![cfg(test)]
use std::cell::RefCell;
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use dns2ip_common::config::Config;
use dns2ip_core::pipeline::{Pipeline, PipelineError};
use dns2ip_core::render::RenderError;
use dns2ip_core::resolver::{Resolve, ResolveError, SystemResolver};
use dns2ip_core::scheduler::Scheduler;
use tempfile::TempDir;

/// Resolver backed by a fixed table, standing in for a stable hosts file.
#[derive(Default)]
struct HostsResolver {
    hosts: HashMap<String, Vec<IpAddr>>,
}

impl HostsResolver {
    fn with(mut self, name: &str, ips: &[&str]) -> Self {
        let ips = ips.iter().map(|ip| ip.parse().unwrap()).collect();
        self.hosts.insert(name.to_string(), ips);
        self
    }
}

#[async_trait]
impl Resolve for HostsResolver {
    async fn resolve(&self, service: &str) -> Result<Vec<IpAddr>, ResolveError> {
        self.hosts
            .get(service)
            .cloned()
            .ok_or_else(|| ResolveError::NoAddresses {
                service: service.to_string(),
            })
    }
}

fn workspace(conf: &str, template: &str) -> anyhow::Result<(TempDir, Config)> {
    let dir = tempfile::tempdir()?;
    let cfg = Config {
        conf: dir.path().join("config.yml"),
        template: dir.path().join("template.tmpl"),
        output: dir.path().join("output.txt"),
        ..Config::default()
    };
    std::fs::write(&cfg.conf, conf)?;
    std::fs::write(&cfg.template, template)?;
    Ok((dir, cfg))
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

/// Localhost and a private range rendered through a Go-style template.
#[tokio::test]
async fn renders_services_and_ranges() -> anyhow::Result<()> {
    let (_dir, cfg) = workspace(
        "services:\n  - localhost\nranges:\n  - 10.0.0.0/8\n",
        "{{.localhost}} {{.Ranges}}",
    )?;
    let pipeline = Pipeline::new(cfg, HostsResolver::default().with("localhost", &["127.0.0.1"]));

    let report = pipeline.run_once().await?;

    assert_eq!(read(&pipeline.config().output), "[127.0.0.1] [10.0.0.0/8]");
    assert_eq!(report.context.len(), 2);
    Ok(())
}

#[tokio::test]
async fn failed_service_is_left_out() -> anyhow::Result<()> {
    let (_dir, cfg) = workspace(
        "services: [first, missing, last]\n",
        "first={{.first}}\nmissing={{.missing}}\nlast={{.last}}\n{{.}}\n",
    )?;
    let resolver = HostsResolver::default()
        .with("first", &["192.0.2.1"])
        .with("last", &["192.0.2.9", "2001:db8::9"]);
    let pipeline = Pipeline::new(cfg, resolver);

    let report = pipeline.run_once().await?;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        read(&pipeline.config().output),
        "first=[192.0.2.1]\nmissing=<no value>\nlast=[192.0.2.9 2001:db8::9]\n\
         map[first:[192.0.2.1] last:[192.0.2.9 2001:db8::9]]\n"
    );
    Ok(())
}

#[tokio::test]
async fn empty_configuration_renders_template_unchanged() -> anyhow::Result<()> {
    let (_dir, cfg) = workspace("", "# generated allowlist\ndeny all;\n")?;
    let pipeline = Pipeline::new(cfg, HostsResolver::default());

    let report = pipeline.run_once().await?;

    assert!(report.context.is_empty());
    assert_eq!(read(&pipeline.config().output), "# generated allowlist\ndeny all;\n");
    Ok(())
}

#[tokio::test]
async fn identical_inputs_give_identical_output() -> anyhow::Result<()> {
    let (_dir, cfg) = workspace(
        "services: [b.example, a.example]\nranges: [172.16.0.0/12, 10.0.0.0/8]\n",
        "{{- /* firewall */ -}}\nallow {{index . \"a.example\"}};\nallow {{index . \"b.example\"}};\n{{.Ranges}}\n",
    )?;
    let resolver = HostsResolver::default()
        .with("a.example", &["198.51.100.1"])
        .with("b.example", &["198.51.100.2"]);
    let pipeline = Pipeline::new(cfg, resolver);

    pipeline.run_once().await?;
    let first = std::fs::read(&pipeline.config().output)?;
    pipeline.run_once().await?;
    let second = std::fs::read(&pipeline.config().output)?;

    assert_eq!(first, second);
    assert_eq!(
        String::from_utf8(first)?,
        "allow [198.51.100.1];\nallow [198.51.100.2];\n[172.16.0.0/12 10.0.0.0/8]\n"
    );
    Ok(())
}

#[tokio::test]
async fn broken_template_keeps_previous_output() -> anyhow::Result<()> {
    let (_dir, cfg) = workspace("ranges: [10.0.0.0/8]\n", "{{.Ranges}}")?;
    let template = cfg.template.clone();
    let pipeline = Pipeline::new(cfg, HostsResolver::default());

    pipeline.run_once().await?;
    std::fs::write(&template, "{{range .Ranges}}{{.}}{{end}}")?;
    let err = pipeline.run_once().await.unwrap_err();

    assert!(matches!(err, PipelineError::Render(RenderError::Template(_))));
    assert_eq!(read(&pipeline.config().output), "[10.0.0.0/8]");
    Ok(())
}

#[tokio::test]
async fn system_resolver_handles_ip_literals() -> anyhow::Result<()> {
    let (_dir, cfg) = workspace(
        "services: [\"127.0.0.1\", \"::1\", no-such-host.invalid]\n",
        "{{index . \"127.0.0.1\"}} {{index . \"::1\"}} {{index . \"no-such-host.invalid\"}}",
    )?;
    let pipeline = Pipeline::new(cfg, SystemResolver);

    let report = pipeline.run_once().await?;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(read(&pipeline.config().output), "[127.0.0.1] [::1] []");
    Ok(())
}

#[tokio::test]
async fn system_resolver_finds_localhost() -> anyhow::Result<()> {
    let (_dir, cfg) = workspace("services: [localhost]\n", "{{.localhost}}")?;
    let pipeline = Pipeline::new(cfg, SystemResolver);

    pipeline.run_once().await?;

    let output = read(&pipeline.config().output);
    assert!(
        output.contains("127.0.0.1") || output.contains("::1"),
        "unexpected output {output}"
    );
    Ok(())
}

/// Every iteration rereads the configuration.
#[tokio::test]
async fn interval_mode_picks_up_config_changes() -> anyhow::Result<()> {
    let (_dir, cfg) = workspace("services: [web]\n", "{{.web}} {{.Ranges}}")?;
    let conf = cfg.conf.clone();
    let pipeline = Pipeline::new(cfg, HostsResolver::default().with("web", &["10.1.1.1"]));
    let outputs: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    let pipeline = &pipeline;
    let recorder = outputs.clone();
    let conf = &conf;
    let _ = tokio::time::timeout(
        Duration::from_millis(400),
        Scheduler::new(Duration::from_millis(100)).run(move |n| {
            let recorder = recorder.clone();
            async move {
                pipeline.run_once().await.unwrap();
                recorder.borrow_mut().push(read(&pipeline.config().output));
                if n == 1 {
                    std::fs::write(conf, "services: [web]\nranges: [10.0.0.0/8]\n").unwrap();
                }
            }
        }),
    )
    .await;

    let outputs = outputs.borrow();
    assert!(outputs.len() >= 2, "only {} iterations ran", outputs.len());
    assert_eq!(outputs[0], "[10.1.1.1] <no value>");
    assert_eq!(outputs[1], "[10.1.1.1] [10.0.0.0/8]");
    Ok(())
}
