use super::ui;
use crate::core::currency::{currency_codes, currency_name};
use comfy_table::{Cell, Table};

pub fn currency_table() -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Currency")]);
    for code in currency_codes() {
        table.add_row(vec![Cell::new(code), Cell::new(currency_name(code))]);
    }
    table
}

pub fn run() {
    println!("{}", ui::style_text("Supported currencies", ui::StyleType::Title));
    println!("{}", currency_table());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_currency() {
        let rendered = currency_table().to_string();
        for code in currency_codes() {
            assert!(rendered.contains(code), "{code} missing");
        }
        assert!(rendered.contains("Brazilian Real"));
    }
}
