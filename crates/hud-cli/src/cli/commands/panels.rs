//! Lists the panels a runtime built from the current config would register.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use hud_core::config::Config;
use hud_ui::AppState;

pub fn list(config: Config) {
    let state = AppState::new(config);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["Panel", "Exclusive", "Opens on", "Closes on"]
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

    for panel in state.panels.list_panels() {
        let opens_on = if panel.trigger_actions.is_empty() {
            "-".to_string()
        } else {
            panel.trigger_actions.join(", ")
        };
        table.add_row(vec![
            panel.name,
            if panel.exclusive { "yes" } else { "no" }.to_string(),
            opens_on,
            panel.close_action,
        ]);
    }

    println!("{table}");
}
