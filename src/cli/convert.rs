use super::ui;
use crate::controller::ConverterController;
use crate::core::Currency;
use crate::core::page::{self, MemoryPage, Page};
use anyhow::Result;

pub async fn run(
    controller: &mut ConverterController,
    page: &mut MemoryPage,
    from: Option<Currency>,
    to: Option<Currency>,
    amount: &str,
) -> Result<()> {
    super::select_currencies(page, (page::FROM, page::TO), from, to)?;
    page.set_value(page::AMOUNT, amount)?;

    let spinner = ui::new_spinner("Fetching exchange rate");
    let conversion = controller.convert(page).await;
    spinner.finish_and_clear();

    if conversion.is_none() {
        return Err(super::alert_error(page));
    }

    println!(
        "{}",
        ui::style_text(&page.text(page::RESULT)?, ui::StyleType::Result)
    );
    let flags = [page::FROM_FLAG, page::TO_FLAG]
        .iter()
        .filter_map(|id| page.image_source(id).ok().flatten())
        .collect::<Vec<_>>()
        .join(" -> ");
    println!("{}", ui::style_text(&flags, ui::StyleType::Subtle));
    Ok(())
}
