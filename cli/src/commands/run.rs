use std::time::Instant;

use colored::*;
use dns2ip_common::config::Config;
use dns2ip_common::{error, info, success};
use dns2ip_core::context::{RANGES_KEY, RenderContext};
use dns2ip_core::pipeline::{IterationReport, Pipeline};
use dns2ip_core::resolver::{Resolve, SystemResolver};
use dns2ip_core::scheduler::Scheduler;

use crate::terminal::{colors, print};

pub async fn run(cfg: Config) {
    let scheduler = Scheduler::new(cfg.interval);
    if !scheduler.is_one_shot() {
        info!("Running every {:?}", cfg.interval);
    }

    let pipeline = Pipeline::new(cfg, SystemResolver);
    let pipeline = &pipeline;
    let one_shot = scheduler.is_one_shot();

    scheduler
        .run(move |n| iteration(pipeline, n, one_shot))
        .await;
}

async fn iteration<R: Resolve>(pipeline: &Pipeline<R>, n: u64, one_shot: bool) {
    let q_level = pipeline.config().quiet;
    if !one_shot {
        info!(
            "Executing new iteration of dns2ip-templater... {}",
            format!("#{n}").color(colors::ACCENT)
        );
    }

    let start_time = Instant::now();
    match pipeline.run_once().await {
        Ok(report) => summarize(&report, pipeline.config(), start_time, q_level),
        Err(e) => error!("Error: {e}"),
    }

    if !one_shot {
        success!("Done.");
    }
}

fn summarize(report: &IterationReport, cfg: &Config, start_time: Instant, q_level: u8) {
    if q_level == 0 {
        print_context(&report.context);
    }

    let resolved = report.context.services().len();
    let failed = report.failures.len();
    let elapsed = format!("{:.2}s", start_time.elapsed().as_secs_f64());
    success!(
        "Rendered {} ({} bytes): {} resolved, {} failed, {} ranges in {}",
        cfg.output.display().to_string().bold(),
        report.bytes_written,
        resolved.to_string().green().bold(),
        failed.to_string().red().bold(),
        report.context.ranges().len(),
        elapsed.yellow().bold()
    );
}

fn print_context(ctx: &RenderContext) {
    let key_width = ctx
        .services()
        .keys()
        .map(|name| name.chars().count())
        .chain(std::iter::once(RANGES_KEY.len()))
        .max()
        .unwrap_or(0);

    print::header("template context", 0);
    for (service, addresses) in ctx.services() {
        if ctx.is_shadowed(service) {
            continue;
        }
        print::aligned_list(service, addresses, key_width, print::address_color);
    }
    if !ctx.ranges().is_empty() {
        print::aligned_list(RANGES_KEY, ctx.ranges(), key_width, print::range_color);
    }
}
