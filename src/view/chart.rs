use anyhow::{Context, Result};
use eframe::egui::Color32;

use crate::color;
use crate::data::model::{columns, Table};

// ---------------------------------------------------------------------------
// Chart description
// ---------------------------------------------------------------------------

/// Donut hole ratio of the origin pie.
pub const DONUT_HOLE: f64 = 0.3;

/// Column names of the long-form education table fed to the line chart.
pub const SEX_COLUMN: &str = "Sexe";
pub const PROPORTION_COLUMN: &str = "Proportion";

/// Kind of renderable chart, one variant per chart family of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Donut pie ([`DONUT_HOLE`] ratio).
    Pie,
    /// Vertical bars, one per category.
    Bar,
    /// Vertical bars, one cluster per category.
    GroupedBar,
    /// Horizontal bars, one per category.
    HorizontalBar,
    /// Horizontal bars, one cluster per category.
    HorizontalGroupedBar,
    /// Lines with markers, one per series.
    Line,
    /// Region polygons coloured by value, bounds fitted to what is drawn.
    Choropleth,
}

/// How a series gets its colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesColor {
    /// One palette color per category (pie slices, age bars).
    PerCategory,
    /// A single fixed color for the whole series.
    Fixed(Color32),
    /// Values mapped onto the sequential scale (choropleth).
    Sequential,
}

/// One value series over the shared category axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub name: String,
    pub values: Vec<f64>,
    pub color: SeriesColor,
}

/// Geometry join block of a choropleth spec.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethSpec {
    /// Normalized join key per drawn category, aligned with `categories`.
    pub keys: Vec<String>,
    /// Display names of rows excluded for lack of matching geometry.
    pub unmatched: Vec<String>,
}

/// Abstract, renderer-independent description of one chart.
///
/// Built fresh on every render and discarded afterwards. No randomness:
/// the same inputs always produce the same spec, byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub category_label: String,
    pub value_label: String,
    /// Category axis labels, in the source table's row order.
    pub categories: Vec<String>,
    pub series: Vec<SeriesSpec>,
    /// Render numeric labels next to the bars (age profile).
    pub show_values: bool,
    pub geo: Option<ChoroplethSpec>,
}

/// Fixed color of a sex column's series.
fn sex_color(column: &str) -> Color32 {
    if column == columns::HOMMES {
        color::MALE
    } else {
        color::FEMALE
    }
}

// ---------------------------------------------------------------------------
// Builders – one per chart family
// ---------------------------------------------------------------------------

/// Origin sheet → donut pie of immigrants by region of origin.
pub fn origin_pie(table: &Table) -> Result<ChartSpec> {
    Ok(ChartSpec {
        kind: ChartKind::Pie,
        title: None,
        category_label: columns::REGION_ORIGINE.to_string(),
        value_label: columns::NOMBRE_IMMIGRES.to_string(),
        categories: table.text_column(columns::REGION_ORIGINE)?,
        series: vec![SeriesSpec {
            name: columns::NOMBRE_IMMIGRES.to_string(),
            values: table.numeric_column(columns::NOMBRE_IMMIGRES)?,
            color: SeriesColor::PerCategory,
        }],
        show_values: false,
        geo: None,
    })
}

/// Age structure sheet → bar chart with one color and a value label per group.
pub fn age_bar(table: &Table) -> Result<ChartSpec> {
    Ok(ChartSpec {
        kind: ChartKind::Bar,
        title: None,
        category_label: columns::GROUPE_AGE.to_string(),
        value_label: columns::NOMBRE_IMMIGRES.to_string(),
        categories: table.text_column(columns::GROUPE_AGE)?,
        series: vec![SeriesSpec {
            name: columns::NOMBRE_IMMIGRES.to_string(),
            values: table.numeric_column(columns::NOMBRE_IMMIGRES)?,
            color: SeriesColor::PerCategory,
        }],
        show_values: true,
        geo: None,
    })
}

/// Motives sheet → horizontal bars; grouped comparison when no sex is
/// selected, a single fixed-color series otherwise. Motive order is the
/// sheet's row order – it encodes a domain ordering and is never re-sorted.
pub fn motives_bar(table: &Table, sex_column: Option<&'static str>) -> Result<ChartSpec> {
    let categories = table.text_column(columns::MOTIF)?;
    match sex_column {
        None => Ok(ChartSpec {
            kind: ChartKind::HorizontalGroupedBar,
            title: Some("Motifs d'immigration selon le sexe".to_string()),
            category_label: columns::MOTIF.to_string(),
            value_label: "Valeur".to_string(),
            categories,
            series: vec![
                SeriesSpec {
                    name: columns::HOMMES.to_string(),
                    values: table.numeric_column(columns::HOMMES)?,
                    color: SeriesColor::Fixed(color::MALE),
                },
                SeriesSpec {
                    name: columns::FEMMES.to_string(),
                    values: table.numeric_column(columns::FEMMES)?,
                    color: SeriesColor::Fixed(color::FEMALE),
                },
            ],
            show_values: false,
            geo: None,
        }),
        Some(column) => Ok(ChartSpec {
            kind: ChartKind::HorizontalBar,
            title: Some(format!("Motifs d'immigration – {column}")),
            category_label: columns::MOTIF.to_string(),
            value_label: column.to_string(),
            categories,
            series: vec![SeriesSpec {
                name: column.to_string(),
                values: table.numeric_column(column)?,
                color: SeriesColor::Fixed(sex_color(column)),
            }],
            show_values: false,
            geo: None,
        }),
    }
}

/// Long-form education table → line with markers per sex.
///
/// Input is the melted (and possibly sex-filtered) table with columns
/// `[Niveau d'instruction, Sexe, Proportion]`; series appear in the long
/// table's block order, categories in first-appearance order.
pub fn education_line(long: &Table) -> Result<ChartSpec> {
    let levels = long.text_column(columns::NIVEAU_INSTRUCTION)?;
    let sexes = long.text_column(SEX_COLUMN)?;
    let values = long.numeric_column(PROPORTION_COLUMN)?;

    let mut categories: Vec<String> = Vec::new();
    for level in &levels {
        if !categories.contains(level) {
            categories.push(level.clone());
        }
    }
    let mut sex_names: Vec<String> = Vec::new();
    for sex in &sexes {
        if !sex_names.contains(sex) {
            sex_names.push(sex.clone());
        }
    }

    let mut series = Vec::with_capacity(sex_names.len());
    for sex in &sex_names {
        let mut by_level = Vec::with_capacity(categories.len());
        for target in &categories {
            let mut found = None;
            for i in 0..long.len() {
                if &levels[i] == target && &sexes[i] == sex {
                    found = Some(values[i]);
                    break;
                }
            }
            let value = found
                .with_context(|| format!("no `{sex}` proportion for level `{target}`"))?;
            by_level.push(value);
        }
        series.push(SeriesSpec {
            name: sex.clone(),
            values: by_level,
            color: SeriesColor::Fixed(sex_color(sex)),
        });
    }

    Ok(ChartSpec {
        kind: ChartKind::Line,
        title: Some("Évolution du niveau d'instruction selon le sexe".to_string()),
        category_label: columns::NIVEAU_INSTRUCTION.to_string(),
        value_label: PROPORTION_COLUMN.to_string(),
        categories,
        series,
        show_values: false,
        geo: None,
    })
}

/// Activity sheet → grouped bars for both sexes, or one fixed-color series.
pub fn activity_bar(table: &Table, sex_column: Option<&'static str>) -> Result<ChartSpec> {
    let categories = table.text_column(columns::TYPE_ACTIVITE)?;
    match sex_column {
        None => Ok(ChartSpec {
            kind: ChartKind::GroupedBar,
            title: None,
            category_label: columns::TYPE_ACTIVITE.to_string(),
            value_label: "Valeur".to_string(),
            categories,
            series: vec![
                SeriesSpec {
                    name: columns::HOMMES.to_string(),
                    values: table.numeric_column(columns::HOMMES)?,
                    color: SeriesColor::Fixed(color::MALE),
                },
                SeriesSpec {
                    name: columns::FEMMES.to_string(),
                    values: table.numeric_column(columns::FEMMES)?,
                    color: SeriesColor::Fixed(color::FEMALE),
                },
            ],
            show_values: false,
            geo: None,
        }),
        Some(column) => Ok(ChartSpec {
            kind: ChartKind::Bar,
            title: None,
            category_label: columns::TYPE_ACTIVITE.to_string(),
            value_label: column.to_string(),
            categories,
            series: vec![SeriesSpec {
                name: column.to_string(),
                values: table.numeric_column(column)?,
                color: SeriesColor::Fixed(sex_color(column)),
            }],
            show_values: false,
            geo: None,
        }),
    }
}

/// Geo join output → choropleth over the matched regions.
///
/// `categories`, `keys` and `values` are aligned and carry the matched rows
/// only; `unmatched` makes the dropped rows observable to the host.
pub fn geo_choropleth(
    categories: Vec<String>,
    keys: Vec<String>,
    values: Vec<f64>,
    unmatched: Vec<String>,
) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Choropleth,
        title: Some("Carte des immigrés par gouvernorat".to_string()),
        category_label: columns::GOUVERNORAT.to_string(),
        value_label: columns::NOMBRE_IMMIGRES_GEO.to_string(),
        categories,
        series: vec![SeriesSpec {
            name: columns::NOMBRE_IMMIGRES_GEO.to_string(),
            values,
            color: SeriesColor::Sequential,
        }],
        show_values: false,
        geo: Some(ChoroplethSpec { keys, unmatched }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;
    use crate::data::reshape::melt;

    fn motives_table() -> Table {
        // Deliberately not alphabetical: row order is domain-significant.
        let motives = ["Travail", "Études", "Regroupement familial", "Asile"];
        Table::new(
            "Motifs (genre)",
            vec![
                columns::MOTIF.to_string(),
                columns::HOMMES.to_string(),
                columns::FEMMES.to_string(),
            ],
            motives
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    vec![
                        Value::String(m.to_string()),
                        Value::Integer(1000 + i as i64),
                        Value::Integer(500 + i as i64),
                    ]
                })
                .collect(),
        )
        .unwrap()
    }

    fn education_table() -> Table {
        Table::new(
            "Instruction",
            vec![
                columns::NIVEAU_INSTRUCTION.to_string(),
                columns::HOMMES.to_string(),
                columns::FEMMES.to_string(),
            ],
            vec![
                vec![
                    Value::String("Aucun niveau".into()),
                    Value::Float(12.0),
                    Value::Float(18.5),
                ],
                vec![
                    Value::String("Primaire".into()),
                    Value::Float(28.0),
                    Value::Float(25.5),
                ],
                vec![
                    Value::String("Supérieur".into()),
                    Value::Float(60.0),
                    Value::Float(56.0),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn donut_hole_matches_the_dashboard() {
        assert_eq!(DONUT_HOLE, 0.3);
    }

    #[test]
    fn motives_grouped_keeps_row_order_and_fixed_colors() {
        let spec = motives_bar(&motives_table(), None).unwrap();
        assert_eq!(spec.kind, ChartKind::HorizontalGroupedBar);
        assert_eq!(
            spec.categories,
            vec!["Travail", "Études", "Regroupement familial", "Asile"]
        );
        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.series[0].name, "Hommes");
        assert_eq!(spec.series[0].color, SeriesColor::Fixed(crate::color::MALE));
        assert_eq!(spec.series[1].color, SeriesColor::Fixed(crate::color::FEMALE));
    }

    #[test]
    fn motives_single_sex_is_a_fixed_color_horizontal_bar() {
        let spec = motives_bar(&motives_table(), Some(columns::FEMMES)).unwrap();
        assert_eq!(spec.kind, ChartKind::HorizontalBar);
        assert_eq!(spec.title.as_deref(), Some("Motifs d'immigration – Femmes"));
        assert_eq!(spec.series.len(), 1);
        assert_eq!(spec.series[0].color, SeriesColor::Fixed(crate::color::FEMALE));
        // Same category order as the grouped variant.
        let grouped = motives_bar(&motives_table(), None).unwrap();
        assert_eq!(spec.categories, grouped.categories);
    }

    #[test]
    fn education_line_has_one_series_per_sex() {
        let long = melt(
            &education_table(),
            columns::NIVEAU_INSTRUCTION,
            SEX_COLUMN,
            PROPORTION_COLUMN,
        )
        .unwrap();
        let spec = education_line(&long).unwrap();
        assert_eq!(spec.kind, ChartKind::Line);
        assert_eq!(spec.categories, vec!["Aucun niveau", "Primaire", "Supérieur"]);
        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.series[0].name, "Hommes");
        assert_eq!(spec.series[0].values, vec![12.0, 28.0, 60.0]);
        assert_eq!(spec.series[1].name, "Femmes");
        assert_eq!(spec.series[1].values, vec![18.5, 25.5, 56.0]);
    }

    #[test]
    fn builders_are_deterministic() {
        let table = motives_table();
        assert_eq!(
            motives_bar(&table, None).unwrap(),
            motives_bar(&table, None).unwrap()
        );
        let long = melt(
            &education_table(),
            columns::NIVEAU_INSTRUCTION,
            SEX_COLUMN,
            PROPORTION_COLUMN,
        )
        .unwrap();
        assert_eq!(
            education_line(&long).unwrap(),
            education_line(&long).unwrap()
        );
    }

    #[test]
    fn choropleth_carries_keys_and_unmatched_names() {
        let spec = geo_choropleth(
            vec!["Tunis".into(), "Médenine".into()],
            vec!["tunis".into(), "medenine".into()],
            vec![4200.0, 1800.0],
            vec!["Atlantide".into()],
        );
        assert_eq!(spec.kind, ChartKind::Choropleth);
        assert_eq!(spec.series[0].color, SeriesColor::Sequential);
        let geo = spec.geo.unwrap();
        assert_eq!(geo.keys, vec!["tunis", "medenine"]);
        assert_eq!(geo.unmatched, vec!["Atlantide"]);
    }
}
