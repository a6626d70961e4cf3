use super::ui;
use crate::controller::{ConverterController, RateHistory};
use crate::controller::chart::tooltip_label;
use crate::core::Currency;
use crate::core::page::{self, MemoryPage};
use anyhow::Result;
use comfy_table::Cell;
use std::path::Path;

pub async fn run(
    controller: &mut ConverterController,
    page: &mut MemoryPage,
    from: Option<Currency>,
    to: Option<Currency>,
    chart_path: &Path,
) -> Result<()> {
    super::select_currencies(page, (page::FROM_CHART, page::TO_CHART), from, to)?;

    let spinner = ui::new_spinner("Fetching rate history");
    let history = controller.load_chart(page).await;
    spinner.finish_and_clear();

    let Some(history) = history else {
        return Err(super::alert_error(page));
    };

    println!(
        "\n{} {}",
        ui::style_text(
            &format!("{} to {}", history.from, history.to),
            ui::StyleType::Title
        ),
        ui::style_text(
            &format!("({})", history.range.to_path_segment()),
            ui::StyleType::Subtle
        )
    );
    println!("{}", summary_table(&history));
    println!(
        "Chart written to {}",
        ui::style_text(&chart_path.display().to_string(), ui::StyleType::Result)
    );
    Ok(())
}

/// First, lowest, highest and latest points of the history.
pub fn summary_table(history: &RateHistory) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Date"),
        ui::header_cell("Rate"),
        ui::header_cell("Tooltip"),
    ]);

    let last = history.rates.len().saturating_sub(1);
    let position = |pick: fn(f64, f64) -> bool| {
        history
            .rates
            .iter()
            .enumerate()
            .fold(0, |best, (i, rate)| {
                if pick(*rate, history.rates[best]) { i } else { best }
            })
    };
    let rows = [
        ("First", 0),
        ("Low", position(|a, b| a < b)),
        ("High", position(|a, b| a > b)),
        ("Latest", last),
    ];

    for (name, index) in rows {
        let (Some(label), Some(rate)) = (history.labels.get(index), history.rates.get(index))
        else {
            continue;
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(label),
            ui::rate_cell(*rate),
            Cell::new(tooltip_label(label, *rate)),
        ]);
    }
    table.to_string()
}
