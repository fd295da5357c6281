use chrono::{DateTime, Local};
use equipcore::math::StatsHelper;
use equipcore::present::{history_line, summary_cards, NO_SUMMARY};
use equipcore::table::{row_cells, PageView, SortKey, SortedPager};
use equipcore::telemetry::MetricsSnapshot;
use equipcore::DatasetSelectionController;
use std::fmt::{self, Write};

pub fn dataset_list(
    controller: &DatasetSelectionController,
    now: DateTime<Local>,
) -> Result<String, fmt::Error> {
    if controller.datasets().is_empty() {
        return Ok("No datasets uploaded yet.".to_string());
    }
    let mut out = String::new();
    for dataset in controller.datasets() {
        let marker = if controller.selected() == Some(dataset.id) {
            '*'
        } else {
            ' '
        };
        writeln!(out, "{marker} [{}] {}", dataset.id, history_line(dataset, now))?;
    }
    Ok(out)
}

pub fn details(controller: &DatasetSelectionController) -> Result<String, fmt::Error> {
    let mut out = String::new();
    if let Some(dataset) = controller.selected_dataset() {
        writeln!(out, "Dataset {} ({})", dataset.id, dataset.filename)?;
    }

    match controller.summary() {
        Some(summary) => {
            for card in summary_cards(summary) {
                writeln!(out, "  {:<16} {}", card.title, card.display_value())?;
            }
        }
        None => {
            writeln!(out, "  {NO_SUMMARY}")?;
        }
    }

    if let Some(chart) = controller.chart() {
        writeln!(out, "\nAverages by type (flowrate / pressure)")?;
        for bar in &chart.bars {
            writeln!(
                out,
                "  {:<14} {:>10.2} {:>8.2}",
                bar.label, bar.flowrate, bar.pressure
            )?;
        }
    }

    let derived = controller.derived_charts();
    match derived.distribution {
        Some(distribution) => {
            writeln!(out, "\nType distribution")?;
            for slice in distribution.slices() {
                writeln!(out, "  {}", slice.caption())?;
            }
        }
        None => {
            writeln!(out, "\nNo equipment data to chart.")?;
        }
    }
    if let Some(scatter) = derived.scatter {
        writeln!(
            out,
            "\nPressure vs temperature: {} points, pressure {:.2}..{:.2}, temperature {:.2}..{:.2}",
            scatter.len(),
            scatter.x_bounds.min,
            scatter.x_bounds.max,
            scatter.y_bounds.min,
            scatter.y_bounds.max
        )?;
    }
    Ok(out)
}

pub fn table(view: &PageView<'_>, pager: &SortedPager) -> Result<String, fmt::Error> {
    let mut out = String::new();
    if view.total == 0 {
        return Ok("No equipment rows.".to_string());
    }

    let headers = SortKey::ALL.map(|key| {
        format!("{} {}", key.header(), pager.direction_for(key).indicator())
    });
    let rows: Vec<[String; 5]> = view.rows.iter().map(|item| row_cells(item)).collect();
    let mut widths = headers.clone().map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String; 5]| {
        cells
            .iter()
            .zip(widths)
            .zip(SortKey::ALL)
            .map(|((cell, width), key)| {
                if key.is_numeric() {
                    format!("{cell:>width$}")
                } else {
                    format!("{cell:<width$}")
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };
    writeln!(out, "{}", line(&headers))?;
    writeln!(
        out,
        "{}",
        widths.map(|width| "-".repeat(width)).join("-+-")
    )?;
    for row in &rows {
        writeln!(out, "{}", line(row))?;
    }

    writeln!(out, "\n{}", view.range_caption())?;
    if view.show_controls {
        writeln!(out, "{}", view.page_caption())?;
    }

    let flowrates: Vec<f64> = view.rows.iter().map(|item| item.flowrate).collect();
    if let Some(mean) = StatsHelper::mean(&flowrates) {
        writeln!(out, "Mean flowrate on this page: {mean:.2}")?;
    }
    Ok(out)
}

pub fn metrics(snapshot: MetricsSnapshot) -> String {
    format!(
        "fetches issued {}, applied {}, stale {}, failed {}",
        snapshot.issued, snapshot.applied, snapshot.stale, snapshot.failed
    )
}
