//! Figure-model builders for the dashboard's plots.
//!
//! Output is pure data (`Figure`/`Trace`); a frontend decides how to draw
//! it. Trace colors cycle through the default 10-color palette in
//! first-appearance order of the attribute being colored.

use crate::core::aggregate;
use crate::domain::model::{
    AxisTitles, CountBucket, Figure, GroupField, PlotFilter, PolygonPoint, PositionRecord,
    SurveyRow, Trace,
};

/// Default qualitative palette, cycled when an attribute has more than ten
/// distinct values.
pub const TRACE_COLORS: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

pub const MARKER_SIZE: u32 = 2;
const OVERLAY_COLOR: &str = "black";

/// Rows that actually land on a 3D plot, paired with their z value.
///
/// Rows without a LAS reading or without the selected attribute are skipped;
/// `TOO_OREZONE_DRILL` additionally keeps only strictly positive values. The
/// z sign is flipped so depths read downward on a to-scale axis.
fn plot_rows(rows: &[SurveyRow], filter: PlotFilter) -> Vec<(&SurveyRow, f64)> {
    rows.iter()
        .filter(|row| row.has_reading())
        .filter_map(|row| row.plot_value(filter).map(|value| (row, value)))
        .filter(|(_, value)| filter != PlotFilter::TooOrezoneDrill || *value > 0.0)
        .map(|(row, value)| (row, -value))
        .collect()
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.iter().any(|v: &String| v == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

fn axis_titles(filter: PlotFilter) -> AxisTitles {
    AxisTitles {
        x: "EAST".to_string(),
        y: "NORTH".to_string(),
        z: filter.to_string(),
    }
}

/// The 3D scatter colored by survey status.
pub fn survey_status_figure(rows: &[SurveyRow], filter: PlotFilter) -> Figure {
    let plotted = plot_rows(rows, filter);
    let statuses = unique_in_order(plotted.iter().map(|(row, _)| row.survey_status.as_str()));

    let traces = statuses
        .iter()
        .enumerate()
        .map(|(i, status)| {
            let points: Vec<&(&SurveyRow, f64)> = plotted
                .iter()
                .filter(|(row, _)| &row.survey_status == status)
                .collect();
            Trace::Scatter3d {
                name: status.clone(),
                legend_group: status.clone(),
                show_legend: true,
                mode: "markers".to_string(),
                color: TRACE_COLORS[i % TRACE_COLORS.len()].to_string(),
                marker_size: MARKER_SIZE,
                x: points.iter().map(|(row, _)| row.east).collect(),
                y: points.iter().map(|(row, _)| row.north).collect(),
                z: points.iter().map(|(_, z)| *z).collect(),
            }
        })
        .collect();

    Figure {
        title: format!("{} - Survey Status", filter),
        axes: Some(axis_titles(filter)),
        traces,
    }
}

/// The 3D scatter colored by region, with the boundary polygons overlaid at
/// surface level.
pub fn region_figure(rows: &[SurveyRow], points: &[PolygonPoint], filter: PlotFilter) -> Figure {
    let plotted = plot_rows(rows, filter);
    let regions = unique_in_order(plotted.iter().map(|(row, _)| row.region.as_str()));

    let mut traces: Vec<Trace> = regions
        .iter()
        .enumerate()
        .map(|(i, region)| {
            let region_points: Vec<&(&SurveyRow, f64)> = plotted
                .iter()
                .filter(|(row, _)| &row.region == region)
                .collect();
            Trace::Scatter3d {
                name: format!("{} ({} points)", region, region_points.len()),
                legend_group: region.clone(),
                show_legend: true,
                mode: "markers".to_string(),
                color: TRACE_COLORS[i % TRACE_COLORS.len()].to_string(),
                marker_size: MARKER_SIZE,
                x: region_points.iter().map(|(row, _)| row.east).collect(),
                y: region_points.iter().map(|(row, _)| row.north).collect(),
                z: region_points.iter().map(|(_, z)| *z).collect(),
            }
        })
        .collect();

    traces.extend(boundary_traces(points, &regions));

    Figure {
        title: format!("{} - Coloured by Region", filter),
        axes: Some(axis_titles(filter)),
        traces,
    }
}

/// One `markers+lines` trace per boundary polygon, drawn at z = 0 and
/// attached to the legend group of the region sharing the boundary's first
/// character, so hiding a region hides its boundary too.
fn boundary_traces(points: &[PolygonPoint], regions: &[String]) -> Vec<Trace> {
    let mut sorted: Vec<&PolygonPoint> = points.iter().collect();
    sorted.sort_by(|a, b| {
        a.region_name
            .cmp(&b.region_name)
            .then_with(|| a.point_order.cmp(&b.point_order))
    });

    let mut traces = Vec::new();
    let mut run: Vec<&PolygonPoint> = Vec::new();

    for point in sorted {
        if let Some(previous) = run.last() {
            if previous.region_name != point.region_name {
                traces.push(polygon_trace(&run, regions));
                run.clear();
            }
        }
        run.push(point);
    }
    if !run.is_empty() {
        traces.push(polygon_trace(&run, regions));
    }

    traces
}

fn polygon_trace(run: &[&PolygonPoint], regions: &[String]) -> Trace {
    let name = run[0].region_name.clone();
    let legend_group = regions
        .iter()
        .find(|region| region.chars().next() == name.chars().next())
        .cloned()
        .unwrap_or_else(|| name.clone());

    Trace::Scatter3d {
        name,
        legend_group,
        show_legend: false,
        mode: "markers+lines".to_string(),
        color: OVERLAY_COLOR.to_string(),
        marker_size: MARKER_SIZE,
        x: run.iter().map(|p| p.x).collect(),
        y: run.iter().map(|p| p.y).collect(),
        z: vec![0.0; run.len()],
    }
}

/// The survey-status bar chart for one group attribute: x = group value,
/// y = run count, one bar trace per status.
pub fn bar_figure(buckets: &[CountBucket], group: GroupField) -> Figure {
    let categories = unique_in_order(buckets.iter().map(|b| b.category.as_str()));

    let traces = categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let series: Vec<&CountBucket> = buckets
                .iter()
                .filter(|b| &b.category == category)
                .collect();
            Trace::Bar {
                name: category.clone(),
                color: TRACE_COLORS[i % TRACE_COLORS.len()].to_string(),
                x: series.iter().map(|b| b.group.clone()).collect(),
                y: series.iter().map(|b| b.count as u64).collect(),
            }
        })
        .collect();

    Figure {
        title: format!("SURVEY_STATUS VALUES BY {}", group),
        axes: None,
        traces,
    }
}

/// Convenience for the dashboard's bar panel: counts plus figure in one step.
pub fn stopped_position_figure(records: &[PositionRecord], group: GroupField) -> Figure {
    let buckets = aggregate::stopped_position_counts(records, group);
    bar_figure(&buckets, group)
}
