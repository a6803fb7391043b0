//! `robodepot-dashboard`: renders the warehouse dashboard from seed data.

mod config;
mod demo;
mod render;

use anyhow::Context;

use robodepot_events::ProjectionRunner;
use robodepot_store::{ActivityFeed, DomainStore, PageRequest, RobotQuery, Seed};

use crate::config::{DashboardConfig, OutputMode};
use crate::render::DashboardView;

fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::from_env().context("invalid dashboard configuration")?;
    robodepot_observability::tracing::init(config.log_format);

    let seed = match &config.seed_path {
        Some(path) => Seed::from_path(path).context("failed to load seed file")?,
        None => {
            tracing::info!("no seed path configured; using bundled mock warehouse");
            Seed::builtin().context("bundled seed is malformed")?
        }
    };

    let mut store = DomainStore::new(seed).context("seed data rejected")?;
    let subscription = store.subscribe();
    let mut activity = ProjectionRunner::new(ActivityFeed::new(config.activity_capacity));

    if config.demo {
        let writes = demo::run_shift(&mut store).context("demo shift failed")?;
        tracing::info!(writes, "demo shift complete");
    }

    for envelope in subscription.drain() {
        activity
            .apply(&envelope)
            .context("activity feed out of sequence")?;
    }

    let robot_query = RobotQuery {
        status: config.robot_status,
        search: config.search.clone(),
    };
    let page = PageRequest::first(config.page_size)?;
    let view = DashboardView::build(&store, activity.projection(), &robot_query, page);

    match config.output {
        OutputMode::Text => print!("{}", view.to_text()),
        OutputMode::Json => println!("{}", view.to_json().context("failed to encode dashboard")?),
    }

    let (_final_state, _bus) = store.into_parts();
    Ok(())
}
