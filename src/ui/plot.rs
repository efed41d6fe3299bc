use std::ops::RangeInclusive;

use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridInput, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points,
    Polygon, Text,
};
use serde_json::Value as JsonValue;

use crate::color;
use crate::data::geo::GeoBoundaries;
use crate::view::chart::{ChartKind, ChartSpec, SeriesColor, SeriesSpec, DONUT_HOLE};

// ---------------------------------------------------------------------------
// Chart rendering (central panel)
// ---------------------------------------------------------------------------

const CHART_HEIGHT: f32 = 320.0;
const PIE_HEIGHT: f32 = 340.0;
const MAP_HEIGHT: f32 = 420.0;
/// Fraction of a category slot covered by its bar group.
const GROUP_WIDTH: f64 = 0.8;

/// Render one chart spec. `boundaries` is only consulted for the map.
pub fn chart(ui: &mut Ui, spec: &ChartSpec, boundaries: &GeoBoundaries, id_salt: &str) {
    if let Some(title) = &spec.title {
        ui.strong(title);
        ui.add_space(2.0);
    }
    match spec.kind {
        ChartKind::Pie => pie(ui, spec, id_salt),
        ChartKind::Bar | ChartKind::GroupedBar => vertical_bars(ui, spec, id_salt),
        ChartKind::HorizontalBar | ChartKind::HorizontalGroupedBar => {
            horizontal_bars(ui, spec, id_salt)
        }
        ChartKind::Line => line_chart(ui, spec, id_salt),
        ChartKind::Choropleth => choropleth(ui, spec, boundaries, id_salt),
    }
}

/// Fill color of one bar, honouring the series' color policy.
fn fill_for(series: &SeriesSpec, palette: &[Color32], category_idx: usize) -> Color32 {
    match &series.color {
        SeriesColor::Fixed(color) => *color,
        _ => palette
            .get(category_idx % palette.len().max(1))
            .copied()
            .unwrap_or(Color32::LIGHT_BLUE),
    }
}

fn format_value(value: f64) -> String {
    format!("{value}")
}

// ---- Category axes -------------------------------------------------------

/// Axis formatter that maps integer positions to category labels and
/// leaves everything else blank.
fn category_labels(
    categories: &[String],
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    let categories = categories.to_vec();
    move |mark, _range| {
        let nearest = mark.value.round();
        if (mark.value - nearest).abs() > 0.05 || nearest < 0.0 {
            return String::new();
        }
        categories.get(nearest as usize).cloned().unwrap_or_default()
    }
}

/// One grid mark per integer, so each category gets exactly one label.
fn integer_marks(input: GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    let span = max - min;
    if !span.is_finite() || span <= 0.0 || span > 500.0 {
        return Vec::new();
    }
    let mut marks = Vec::new();
    let mut value = min.floor();
    while value <= max.ceil() {
        marks.push(GridMark {
            value,
            step_size: 1.0,
        });
        value += 1.0;
    }
    marks
}

// ---- Bars ----------------------------------------------------------------

fn vertical_bars(ui: &mut Ui, spec: &ChartSpec, id_salt: &str) {
    let palette = color::generate_palette(spec.categories.len().max(1));
    let n_series = spec.series.len().max(1);
    let bar_width = GROUP_WIDTH / n_series as f64;

    let mut charts = Vec::with_capacity(spec.series.len());
    for (series_idx, series) in spec.series.iter().enumerate() {
        let offset = (series_idx as f64 - (n_series as f64 - 1.0) / 2.0) * bar_width;
        let bars: Vec<Bar> = series
            .values
            .iter()
            .enumerate()
            .map(|(category_idx, &value)| {
                Bar::new(category_idx as f64 + offset, value)
                    .width(bar_width * 0.92)
                    .fill(fill_for(series, &palette, category_idx))
                    .name(
                        spec.categories
                            .get(category_idx)
                            .map(String::as_str)
                            .unwrap_or(""),
                    )
            })
            .collect();
        charts.push(BarChart::new(bars).name(&series.name));
    }

    let max_value = spec
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0_f64, f64::max);

    Plot::new(id_salt)
        .legend(Legend::default())
        .x_axis_label(&spec.category_label)
        .y_axis_label(&spec.value_label)
        .x_axis_formatter(category_labels(&spec.categories))
        .x_grid_spacer(integer_marks)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .height(CHART_HEIGHT)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
            if spec.show_values {
                if let Some(series) = spec.series.first() {
                    let pad = max_value * 0.03;
                    for (category_idx, &value) in series.values.iter().enumerate() {
                        plot_ui.text(
                            Text::new(
                                PlotPoint::new(category_idx as f64, value + pad),
                                RichText::new(format_value(value)).strong(),
                            )
                            .anchor(Align2::CENTER_BOTTOM),
                        );
                    }
                }
            }
        });
}

fn horizontal_bars(ui: &mut Ui, spec: &ChartSpec, id_salt: &str) {
    let palette = color::generate_palette(spec.categories.len().max(1));
    let n_series = spec.series.len().max(1);
    let bar_width = GROUP_WIDTH / n_series as f64;

    let mut charts = Vec::with_capacity(spec.series.len());
    for (series_idx, series) in spec.series.iter().enumerate() {
        let offset = (series_idx as f64 - (n_series as f64 - 1.0) / 2.0) * bar_width;
        let bars: Vec<Bar> = series
            .values
            .iter()
            .enumerate()
            .map(|(category_idx, &value)| {
                Bar::new(category_idx as f64 + offset, value)
                    .width(bar_width * 0.92)
                    .fill(fill_for(series, &palette, category_idx))
                    .name(
                        spec.categories
                            .get(category_idx)
                            .map(String::as_str)
                            .unwrap_or(""),
                    )
            })
            .collect();
        charts.push(BarChart::new(bars).horizontal().name(&series.name));
    }

    // Grow with the number of motives so labels stay readable.
    let height = (spec.categories.len() as f32 * 34.0 + 60.0).clamp(200.0, 480.0);

    Plot::new(id_salt)
        .legend(Legend::default())
        .x_axis_label(&spec.value_label)
        .y_axis_label(&spec.category_label)
        .y_axis_formatter(category_labels(&spec.categories))
        .y_grid_spacer(integer_marks)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .height(height)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---- Lines ---------------------------------------------------------------

fn line_chart(ui: &mut Ui, spec: &ChartSpec, id_salt: &str) {
    let palette = color::generate_palette(spec.series.len().max(1));

    Plot::new(id_salt)
        .legend(Legend::default())
        .x_axis_label(&spec.category_label)
        .y_axis_label(&spec.value_label)
        .x_axis_formatter(category_labels(&spec.categories))
        .x_grid_spacer(integer_marks)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .height(CHART_HEIGHT)
        .show(ui, |plot_ui| {
            for (series_idx, series) in spec.series.iter().enumerate() {
                let color = match &series.color {
                    SeriesColor::Fixed(color) => *color,
                    _ => palette[series_idx % palette.len()],
                };
                let points: Vec<[f64; 2]> = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| [i as f64, v])
                    .collect();
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(&series.name)
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .color(color)
                        .radius(4.0)
                        .filled(true),
                );
            }
        });
}

// ---- Donut pie -----------------------------------------------------------

fn pie(ui: &mut Ui, spec: &ChartSpec, id_salt: &str) {
    let Some(series) = spec.series.first() else {
        return;
    };
    let total: f64 = series
        .values
        .iter()
        .filter(|v| v.is_finite() && **v > 0.0)
        .sum();
    if total <= 0.0 {
        ui.label("Aucune valeur à afficher.");
        return;
    }
    let palette = color::generate_palette(series.values.len().max(1));

    Plot::new(id_salt)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .height(PIE_HEIGHT)
        .show(ui, |plot_ui| {
            // Clockwise from 12 o'clock, like the usual survey charts.
            let mut start = std::f64::consts::FRAC_PI_2;
            for (idx, (&value, name)) in series.values.iter().zip(&spec.categories).enumerate() {
                if !(value.is_finite() && value > 0.0) {
                    continue;
                }
                let end = start - value / total * std::f64::consts::TAU;
                let fill = fill_for(series, &palette, idx);
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(donut_sector(start, end)))
                        .fill_color(fill)
                        .name(name),
                );
                let mid = (start + end) / 2.0;
                let r = (1.0 + DONUT_HOLE) / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(r * mid.cos(), r * mid.sin()),
                    RichText::new(format!("{:.1} %", value / total * 100.0)).strong(),
                ));
                start = end;
            }
        });
}

/// Ring sector between two angles: outer arc out, inner arc back.
fn donut_sector(start: f64, end: f64) -> Vec<[f64; 2]> {
    let sweep = end - start;
    let steps = ((sweep.abs() / 0.04).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(2 * steps + 2);
    for i in 0..=steps {
        let angle = start + sweep * i as f64 / steps as f64;
        points.push([angle.cos(), angle.sin()]);
    }
    for i in (0..=steps).rev() {
        let angle = start + sweep * i as f64 / steps as f64;
        points.push([DONUT_HOLE * angle.cos(), DONUT_HOLE * angle.sin()]);
    }
    points
}

// ---- Choropleth ----------------------------------------------------------

fn choropleth(ui: &mut Ui, spec: &ChartSpec, boundaries: &GeoBoundaries, id_salt: &str) {
    let Some(geo) = &spec.geo else {
        return;
    };
    let Some(series) = spec.series.first() else {
        return;
    };

    if boundaries.is_empty() {
        ui.colored_label(
            Color32::ORANGE,
            "Fond de carte non chargé (Fichier → Ouvrir un fond de carte…).",
        );
        return;
    }

    let max = series.values.iter().copied().fold(0.0_f64, f64::max);

    Plot::new(id_salt)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .height(MAP_HEIGHT)
        .show(ui, |plot_ui| {
            for (key, &value) in geo.keys.iter().zip(&series.values) {
                let Some(feature) = boundaries.get(key) else {
                    continue;
                };
                let t = if max > 0.0 { value / max } else { 0.0 };
                let fill = color::sequential_scale(t);
                for ring in polygon_rings(&feature.geometry) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(ring))
                            .fill_color(fill)
                            .stroke(Stroke::new(1.0, Color32::from_gray(110))),
                    );
                }
            }
        });

    if max > 0.0 {
        ui.small(format!("Plage des valeurs : 0 – {}", format_value(max)));
    }
    if !geo.unmatched.is_empty() {
        ui.colored_label(
            Color32::ORANGE,
            format!(
                "⚠️ {} gouvernorat(s) sans géométrie : {}",
                geo.unmatched.len(),
                geo.unmatched.join(", ")
            ),
        );
    }
}

/// Drawable rings of a GeoJSON geometry. Only the outer ring of each
/// polygon is kept; filled plot polygons cannot express holes.
fn polygon_rings(geometry: &JsonValue) -> Vec<Vec<[f64; 2]>> {
    let mut rings = Vec::new();
    let Some(kind) = geometry.get("type").and_then(JsonValue::as_str) else {
        return rings;
    };
    let Some(coordinates) = geometry.get("coordinates") else {
        return rings;
    };
    match kind {
        "Polygon" => collect_outer_ring(coordinates, &mut rings),
        "MultiPolygon" => {
            if let Some(polygons) = coordinates.as_array() {
                for polygon in polygons {
                    collect_outer_ring(polygon, &mut rings);
                }
            }
        }
        _ => {}
    }
    rings
}

fn collect_outer_ring(polygon: &JsonValue, rings: &mut Vec<Vec<[f64; 2]>>) {
    let Some(outer) = polygon.as_array().and_then(|rings| rings.first()) else {
        return;
    };
    let Some(points) = outer.as_array() else {
        return;
    };
    let ring: Vec<[f64; 2]> = points
        .iter()
        .filter_map(|point| {
            let pair = point.as_array()?;
            let x = pair.first()?.as_f64()?;
            let y = pair.get(1)?.as_f64()?;
            Some([x, y])
        })
        .collect();
    if ring.len() >= 3 {
        rings.push(ring);
    }
}
