pub mod chart;
pub mod cli;
pub mod controller;
pub mod core;
pub mod providers;

use crate::chart::SvgChartRenderer;
use crate::controller::{ConverterController, FlagAssets};
use crate::core::config::AppConfig;
use crate::core::page::{self, MemoryPage};
use crate::core::Currency;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Currencies,
    Convert {
        from: Option<Currency>,
        to: Option<Currency>,
        amount: String,
    },
    Chart {
        from: Option<Currency>,
        to: Option<Currency>,
        output_dir: Option<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxc starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let flags = FlagAssets::new(&config.flags_dir);
    let provider = Arc::new(providers::FrankfurterProvider::new(
        config.frankfurter_base_url(),
    ));

    let output_dir = match &command {
        AppCommand::Chart {
            output_dir: Some(dir),
            ..
        } => dir.clone(),
        _ => config.chart.output_dir.clone(),
    };
    let renderer = SvgChartRenderer::new(output_dir, (config.chart.width, config.chart.height));
    let chart_path = renderer.path_for(page::RATE_CHART);

    let mut controller =
        ConverterController::new(provider, Box::new(renderer), config.defaults, flags.clone());
    let mut page = MemoryPage::standard();
    controller.initialize(&mut page)?;

    match command {
        AppCommand::Currencies => {
            cli::currencies::run(&flags);
            Ok(())
        }
        AppCommand::Convert { from, to, amount } => {
            cli::convert::run(&mut controller, &mut page, from, to, &amount).await
        }
        AppCommand::Chart { from, to, .. } => {
            cli::chart::run(&mut controller, &mut page, from, to, &chart_path).await
        }
    }
}
