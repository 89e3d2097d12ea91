//! Chart construction. Each fixed query gets exactly one renderer; the
//! mapping from query name to renderer lives in the `queries` catalog.
//!
//! Charts are plotly figures written as self-contained HTML files. A fresh
//! `Plot` is built per chart, so nothing leaks from one chart to the next.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use plotly::common::{Anchor, Font, Mode, Orientation, Visible};
use plotly::layout::update_menu::{Button, ButtonMethod, UpdateMenu};
use plotly::layout::{Annotation, Axis, BarMode, Layout};
use plotly::{Bar, Histogram, Pie, Plot, Scatter};

use crate::table::ResultTable;

/// The static chart types produced by the visual queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    BarH,
    Pie,
    Histogram,
    Scatter,
}

/// Render one static chart for a result table.
pub fn render(kind: ChartKind, table: &ResultTable) -> Result<Plot> {
    match kind {
        ChartKind::Line => orders_per_month(table),
        ChartKind::Bar => revenue_by_category(table),
        ChartKind::BarH => freight_by_seller_state(table),
        ChartKind::Pie => payment_distribution(table),
        ChartKind::Histogram => review_score_distribution(table),
        ChartKind::Scatter => price_vs_freight(table),
    }
}

/// Scale a value to millions with one decimal, e.g. `300000.0` -> `"0.3M"`.
pub fn format_millions(value: f64) -> String {
    format!("{:.1}M", value / 1.0e6)
}

/// Write a chart into `dir` as `<name>.html`, creating `dir` if needed.
pub fn save_chart(plot: &Plot, dir: &Path, name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create chart directory {}", dir.display()))?;
    let path = dir.join(format!("{}.html", name));
    plot.write_html(&path);
    Ok(path)
}

/// Line chart of order volume per month.
fn orders_per_month(table: &ResultTable) -> Result<Plot> {
    let mut table = table.clone();
    table.normalize_months();
    let months = table.text_values("month")?;
    let orders = table.f64_values("num_orders")?;

    let mut plot = Plot::new();
    plot.add_trace(Scatter::new(months, orders).mode(Mode::Lines).name("Orders"));
    plot.set_layout(
        Layout::new()
            .title("Number of Orders Per Month")
            .x_axis(Axis::new().title("Month"))
            .y_axis(Axis::new().title("Number of Orders")),
    );
    Ok(plot)
}

/// Bar chart of the top product categories by revenue. The query already
/// sorts descending; bars keep the table's order. Each bar is annotated with
/// its revenue scaled to millions.
fn revenue_by_category(table: &ResultTable) -> Result<Plot> {
    let categories = table.text_values("category")?;
    let revenues = table.f64_values("total_revenue")?;

    let annotations = categories
        .iter()
        .zip(&revenues)
        .map(|(category, &revenue)| {
            Annotation::new()
                .text(format_millions(revenue))
                .x(category.clone())
                .y(revenue * 1.01)
                .y_anchor(Anchor::Bottom)
                .show_arrow(false)
                .font(Font::new().size(8))
        })
        .collect();

    let mut plot = Plot::new();
    plot.add_trace(Bar::new(categories, revenues).name("Revenue"));
    plot.set_layout(
        Layout::new()
            .title("Top 10 Product Categories by Revenue")
            .x_axis(Axis::new().title("Category"))
            .y_axis(Axis::new().title("Total Revenue (in millions)").tick_format(".1s"))
            .annotations(annotations),
    );
    Ok(plot)
}

/// Horizontal bar chart of average freight cost by seller state.
fn freight_by_seller_state(table: &ResultTable) -> Result<Plot> {
    let states = table.text_values("seller_state")?;
    let freight = table.f64_values("avg_freight")?;

    let mut plot = Plot::new();
    plot.add_trace(
        Bar::new(freight, states)
            .orientation(Orientation::Horizontal)
            .name("Average freight"),
    );
    plot.set_layout(
        Layout::new()
            .title("Average Freight Cost by Seller State")
            .x_axis(Axis::new().title("Average Freight Cost"))
            .y_axis(Axis::new().title("Seller State")),
    );
    Ok(plot)
}

/// Pie chart of payment method counts. Plotly shows percentage labels per
/// slice by default.
fn payment_distribution(table: &ResultTable) -> Result<Plot> {
    let payment_types = table.text_values("payment_type")?;
    let counts = table.f64_values("count")?;

    let mut plot = Plot::new();
    plot.add_trace(Pie::new(counts).labels(payment_types));
    plot.set_layout(Layout::new().title("Payment Method Distribution"));
    Ok(plot)
}

/// Histogram of review scores over five bins.
fn review_score_distribution(table: &ResultTable) -> Result<Plot> {
    let scores = table.f64_values("review_score")?;

    let mut plot = Plot::new();
    plot.add_trace(Histogram::new(scores).n_bins_x(5).name("Reviews"));
    plot.set_layout(
        Layout::new()
            .title("Distribution of Review Scores")
            .x_axis(Axis::new().title("Review Score"))
            .y_axis(Axis::new().title("Count")),
    );
    Ok(plot)
}

/// Scatter plot of item price against freight cost.
fn price_vs_freight(table: &ResultTable) -> Result<Plot> {
    let prices = table.f64_values("price")?;
    let freight = table.f64_values("freight_value")?;

    let mut plot = Plot::new();
    plot.add_trace(Scatter::new(prices, freight).mode(Mode::Markers).name("Items"));
    plot.set_layout(
        Layout::new()
            .title("Product Price vs Freight Cost")
            .x_axis(Axis::new().title("Product Price"))
            .y_axis(Axis::new().title("Freight Cost")),
    );
    Ok(plot)
}

/// Interactive grouped-bar chart of orders by seller state, stepped through
/// calendar months.
///
/// plotly.rs has no `animation_frame`, so each month becomes its own bar
/// trace and an update menu restyles trace visibility: one button per month,
/// the first month visible initially.
pub fn animated_orders_by_state(table: &ResultTable) -> Result<Plot> {
    let mut table = table.clone();
    table.normalize_months();
    let months = table.text_values("month")?;
    let states = table.text_values("seller_state")?;
    let orders = table.f64_values("num_orders")?;

    // Rows arrive sorted by month, so distinct months stay in order.
    let mut frames: Vec<(String, Vec<String>, Vec<f64>)> = Vec::new();
    for ((month, state), count) in months.into_iter().zip(states).zip(orders) {
        match frames.last_mut() {
            Some((current, frame_states, frame_orders)) if *current == month => {
                frame_states.push(state);
                frame_orders.push(count);
            }
            _ => frames.push((month, vec![state], vec![count])),
        }
    }
    if frames.is_empty() {
        bail!("Animated chart query returned no rows");
    }

    let n_frames = frames.len();
    let mut plot = Plot::new();
    let mut buttons = Vec::with_capacity(n_frames);

    for (i, (month, frame_states, frame_orders)) in frames.into_iter().enumerate() {
        let visible = if i == 0 { Visible::True } else { Visible::False };
        plot.add_trace(
            Bar::new(frame_states, frame_orders)
                .name(month.as_str())
                .visible(visible),
        );

        let mask: Vec<bool> = (0..n_frames).map(|j| j == i).collect();
        buttons.push(
            Button::new()
                .label(month.as_str())
                .method(ButtonMethod::Restyle)
                .args(serde_json::json!([{ "visible": mask }])),
        );
    }

    plot.set_layout(
        Layout::new()
            .title("Orders by Seller State Over Time")
            .x_axis(Axis::new().title("Seller State"))
            .y_axis(Axis::new().title("Number of Orders"))
            .bar_mode(BarMode::Group)
            .update_menus(vec![UpdateMenu::new().buttons(buttons)]),
    );
    Ok(plot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millions_formatting() {
        assert_eq!(format_millions(300_000.0), "0.3M");
        assert_eq!(format_millions(1_250_000.0), "1.2M");
        assert_eq!(format_millions(0.0), "0.0M");
    }
}
