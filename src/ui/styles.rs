use crate::ui::table::grid::CellAlign;

pub fn root_container_style() -> &'static str {
    "height: 100vh; display: flex; flex-direction: column; overflow: hidden; padding: 12px; box-sizing: border-box; font-family: system-ui, sans-serif; background: #f6f7f9;"
}

pub fn table_container_style() -> &'static str {
    "flex: 1; min-height: 0; overflow: auto; border: 1px solid #ddd; border-radius: 8px; background: #fff;"
}

/// Header cells stick to the top of the scrolling container.
pub fn table_header_cell_style() -> &'static str {
    "position: sticky; top: 0; z-index: 2; background: #f0f2f5; border: 1px solid #bbb; padding: 6px 8px; text-align: left; white-space: nowrap;"
}

pub fn table_cell_style(align: CellAlign) -> String {
    format!(
        "border: 1px solid #ddd; padding: 4px 8px; text-align: {};",
        align.as_css()
    )
}

pub fn button_style(primary: bool) -> &'static str {
    if primary {
        "border: 1px solid #2b6cb0; background: #2b6cb0; color: #fff; padding: 4px 12px; border-radius: 6px; cursor: pointer;"
    } else {
        "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;"
    }
}

pub fn modal_backdrop_style() -> &'static str {
    "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; align-items: center; justify-content: center; z-index: 1100;"
}

pub fn modal_panel_style() -> &'static str {
    "background: #fff; border-radius: 10px; padding: 16px 20px; min-width: 420px; max-width: 640px; max-height: 85vh; overflow-y: auto; box-shadow: 0 10px 24px rgba(0,0,0,0.2);"
}

pub fn popover_style(left: f64, top: f64) -> String {
    format!(
        "position: fixed; left: {left}px; top: {top}px; min-width: 220px; max-height: 320px; overflow-y: auto; background: #fff; border: 1px solid #bbb; border-radius: 8px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); z-index: 1200; padding: 6px;"
    )
}
