use super::ui;
use crate::controller::FlagAssets;
use crate::core::Currency;
use comfy_table::Cell;

pub fn currencies_table(flags: &FlagAssets) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Region"),
        ui::header_cell("Flag"),
    ]);

    for currency in Currency::ALL {
        table.add_row(vec![
            Cell::new(currency.code()),
            Cell::new(currency.display_name()),
            Cell::new(currency.region()),
            Cell::new(flags.path_for(currency.code()).unwrap_or_default()),
        ]);
    }
    table.to_string()
}

pub fn run(flags: &FlagAssets) {
    println!(
        "{}\n{}",
        ui::style_text("Supported currencies", ui::StyleType::Title),
        currencies_table(flags)
    );
}
