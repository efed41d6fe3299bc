use anyhow::{Context, Result};

use crate::data::geo::GeoBoundaries;
use crate::data::model::{columns, SheetName, Table};
use crate::data::normalize::normalize_name;
use crate::data::reshape::melt;
use crate::data::store::DatasetStore;

use super::chart::{self, ChartSpec, PROPORTION_COLUMN, SEX_COLUMN};

// ---------------------------------------------------------------------------
// View selection
// ---------------------------------------------------------------------------

/// The six dashboard pages.
///
/// Navigation state is nothing more than this value plus the gender
/// filters – no page keeps state of its own, so switching back and forth
/// always lands on the same output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewSelector {
    #[default]
    Home,
    Origin,
    AgeProfile,
    Motives,
    EducationActivity,
    GeoDistribution,
}

impl ViewSelector {
    pub const ALL: [ViewSelector; 6] = [
        ViewSelector::Home,
        ViewSelector::Origin,
        ViewSelector::AgeProfile,
        ViewSelector::Motives,
        ViewSelector::EducationActivity,
        ViewSelector::GeoDistribution,
    ];

    /// Menu label shown in the sidebar.
    pub fn label(self) -> &'static str {
        match self {
            ViewSelector::Home => "Accueil",
            ViewSelector::Origin => "Répartition par origine",
            ViewSelector::AgeProfile => "Profil général",
            ViewSelector::Motives => "Motifs d'immigration",
            ViewSelector::EducationActivity => "Éducation & emploi",
            ViewSelector::GeoDistribution => "Répartition géographique",
        }
    }
}

// ---------------------------------------------------------------------------
// Gender filter
// ---------------------------------------------------------------------------

/// Sex sub-filter of the motives and education/activity pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenderFilter {
    #[default]
    All,
    Male,
    Female,
}

impl GenderFilter {
    pub const CHOICES: [GenderFilter; 3] =
        [GenderFilter::All, GenderFilter::Male, GenderFilter::Female];

    /// Selector label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            GenderFilter::All => "Tous",
            GenderFilter::Male => "Hommes",
            GenderFilter::Female => "Femmes",
        }
    }

    /// The sheet column this filter selects, if any.
    pub fn column(self) -> Option<&'static str> {
        match self {
            GenderFilter::All => None,
            GenderFilter::Male => Some(columns::HOMMES),
            GenderFilter::Female => Some(columns::FEMMES),
        }
    }

    /// Parse a selector label. Anything unrecognized falls back to the
    /// safe default rather than failing.
    pub fn from_label(label: &str) -> GenderFilter {
        match label {
            "Hommes" => GenderFilter::Male,
            "Femmes" => GenderFilter::Female,
            _ => GenderFilter::All,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved output
// ---------------------------------------------------------------------------

/// One renderable panel: heading, the table exactly as displayed (and
/// exported), its chart, and the fixed download filename.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub heading: &'static str,
    pub table: Table,
    pub chart: ChartSpec,
    pub export_file_name: &'static str,
}

/// What a `(view, filter)` pair resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedView {
    /// Informational landing page, no data involved.
    Home,
    /// One or two data panels, top to bottom.
    Panels(Vec<Panel>),
}

// Landing page copy.
pub const HOME_TITLE: &str = "👋 Bienvenue";
pub const HOME_INTRO: &str = "Ce tableau de bord interactif présente les résultats de l'enquête \
                              Tunisia-HIMS sur la migration internationale en Tunisie (2020-2021).";
pub const HOME_OBJECTIVES_TITLE: &str = "Utilisez le menu à gauche pour explorer :";
pub const HOME_OBJECTIVES: [&str; 5] = [
    "la répartition des immigrés par région d'origine,",
    "le profil général de la population immigrée,",
    "les motifs d'immigration selon le sexe,",
    "le niveau d'instruction et l'activité économique,",
    "la répartition géographique par gouvernorat.",
];
pub const HOME_NOTE: &str = "Les données affichées sont celles des tableaux sources ; les filtres \
                             n'agissent que sur les graphiques.";

// Download filenames, one per exportable table.
const EXPORT_ORIGIN: &str = "DonnéesrepartitionParregion.csv";
const EXPORT_AGE: &str = "Donnéesprofil_general.csv";
const EXPORT_MOTIVES: &str = "Donnéesmotifs_immigration.csv";
const EXPORT_EDUCATION: &str = "Donnéesinstruction.csv";
const EXPORT_ACTIVITY: &str = "Donnéesactivite_economique.csv";
const EXPORT_GEO: &str = "Donnéesrepartition_geographique.csv";

/// Resolve a `(view, filter)` pair into renderable panels.
///
/// Pure with respect to its inputs: resolving the same pair against the
/// same store twice yields identical panels. The displayed table is always
/// the full source sheet – the gender filter shapes the chart only, so the
/// download button never exports a filtered subset.
pub fn resolve(
    view: ViewSelector,
    filter: GenderFilter,
    store: &DatasetStore,
    boundaries: &GeoBoundaries,
) -> Result<ResolvedView> {
    match view {
        ViewSelector::Home => Ok(ResolvedView::Home),
        ViewSelector::Origin => {
            let table = store.get(SheetName::Origin.sheet())?;
            Ok(ResolvedView::Panels(vec![Panel {
                heading: "🌍 Répartition par origine géographique",
                table: table.clone(),
                chart: chart::origin_pie(table)?,
                export_file_name: EXPORT_ORIGIN,
            }]))
        }
        ViewSelector::AgeProfile => {
            let table = store.get(SheetName::AgeStructure.sheet())?;
            Ok(ResolvedView::Panels(vec![Panel {
                heading: "👤 Structure par âge",
                table: table.clone(),
                chart: chart::age_bar(table)?,
                export_file_name: EXPORT_AGE,
            }]))
        }
        ViewSelector::Motives => {
            let table = store.get(SheetName::MotivesByGender.sheet())?;
            Ok(ResolvedView::Panels(vec![Panel {
                heading: "📌 Motifs d'immigration (Hommes vs Femmes)",
                table: table.clone(),
                chart: chart::motives_bar(table, filter.column())?,
                export_file_name: EXPORT_MOTIVES,
            }]))
        }
        ViewSelector::EducationActivity => {
            let education = store.get(SheetName::Education.sheet())?;
            let long = melt(
                education,
                columns::NIVEAU_INSTRUCTION,
                SEX_COLUMN,
                PROPORTION_COLUMN,
            )?;
            let long = filter_long_by_sex(&long, filter)?;
            let activity = store.get(SheetName::Activity.sheet())?;
            Ok(ResolvedView::Panels(vec![
                Panel {
                    heading: "🎓 Niveau d'instruction",
                    table: education.clone(),
                    chart: chart::education_line(&long)?,
                    export_file_name: EXPORT_EDUCATION,
                },
                Panel {
                    heading: "💼 Activité économique",
                    table: activity.clone(),
                    chart: chart::activity_bar(activity, filter.column())?,
                    export_file_name: EXPORT_ACTIVITY,
                },
            ]))
        }
        ViewSelector::GeoDistribution => {
            let table = store.get(SheetName::GeoDistribution.sheet())?;
            let chart = join_governorates(table, boundaries)?;
            Ok(ResolvedView::Panels(vec![Panel {
                heading: "🗺️ Carte des immigrés par gouvernorat",
                table: table.clone(),
                chart,
                export_file_name: EXPORT_GEO,
            }]))
        }
    }
}

/// Keep only the rows of one sex in the long-form education table.
/// `All` passes the table through untouched.
fn filter_long_by_sex(long: &Table, filter: GenderFilter) -> Result<Table> {
    let Some(sex) = filter.column() else {
        return Ok(long.clone());
    };
    let sex_idx = long
        .column_index(SEX_COLUMN)
        .with_context(|| format!("long table is missing the `{SEX_COLUMN}` column"))?;
    let rows = long
        .rows
        .iter()
        .filter(|row| row[sex_idx].as_str() == Some(sex))
        .cloned()
        .collect();
    Table::new(long.name.clone(), long.columns.clone(), rows)
}

/// Join the geo sheet against the boundary file by normalized name.
///
/// Rows without matching geometry are left out of the chart but stay in
/// the displayed table; their names are carried on the spec so the UI can
/// surface them. No logging here: this runs on every repaint.
fn join_governorates(table: &Table, boundaries: &GeoBoundaries) -> Result<ChartSpec> {
    let names = table.text_column(columns::GOUVERNORAT)?;
    let counts = table.numeric_column(columns::NOMBRE_IMMIGRES_GEO)?;

    let mut categories = Vec::with_capacity(names.len());
    let mut keys = Vec::with_capacity(names.len());
    let mut values = Vec::with_capacity(names.len());
    let mut unmatched = Vec::new();
    for (name, count) in names.into_iter().zip(counts) {
        let key = normalize_name(&name);
        if boundaries.get(&key).is_some() {
            categories.push(name);
            keys.push(key);
            values.push(count);
        } else {
            unmatched.push(name);
        }
    }
    Ok(chart::geo_choropleth(categories, keys, values, unmatched))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;
    use crate::view::chart::ChartKind;

    fn text_row(cells: &[&str]) -> Vec<Value> {
        cells.iter().map(|c| Value::String(c.to_string())).collect()
    }

    fn sheet(name: SheetName, rows: Vec<Vec<Value>>) -> Table {
        let columns = name.contract_columns().iter().map(|c| c.to_string()).collect();
        Table::new(name.sheet(), columns, rows).unwrap()
    }

    fn fixture_store() -> DatasetStore {
        DatasetStore::from_tables([
            sheet(
                SheetName::Origin,
                vec![
                    vec![Value::String("Libye".into()), Value::Integer(21000)],
                    vec![Value::String("Côte d'Ivoire".into()), Value::Integer(9500)],
                    vec![Value::String("Syrie".into()), Value::Integer(4200)],
                ],
            ),
            sheet(
                SheetName::AgeStructure,
                vec![
                    vec![Value::String("0-14".into()), Value::Integer(5200)],
                    vec![Value::String("15-59".into()), Value::Integer(38700)],
                    vec![Value::String("60+".into()), Value::Integer(2100)],
                ],
            ),
            sheet(
                SheetName::MotivesByGender,
                vec![
                    vec![
                        Value::String("Travail".into()),
                        Value::Integer(15400),
                        Value::Integer(6100),
                    ],
                    vec![
                        Value::String("Études".into()),
                        Value::Integer(4800),
                        Value::Integer(5300),
                    ],
                    vec![
                        Value::String("Regroupement familial".into()),
                        Value::Integer(2100),
                        Value::Integer(7800),
                    ],
                ],
            ),
            sheet(
                SheetName::Education,
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
                        Value::String("Secondaire".into()),
                        Value::Float(35.0),
                        Value::Float(31.0),
                    ],
                    vec![
                        Value::String("Supérieur".into()),
                        Value::Float(25.0),
                        Value::Float(25.0),
                    ],
                ],
            ),
            sheet(
                SheetName::Activity,
                vec![
                    vec![
                        Value::String("Occupé".into()),
                        Value::Integer(14100),
                        Value::Integer(7400),
                    ],
                    vec![
                        Value::String("Chômeur".into()),
                        Value::Integer(3200),
                        Value::Integer(2900),
                    ],
                ],
            ),
            sheet(
                SheetName::GeoDistribution,
                vec![
                    vec![Value::String("Tunis".into()), Value::Integer(8900)],
                    vec![Value::String("Médenine".into()), Value::Integer(5600)],
                    vec![Value::String("Atlantide".into()), Value::Integer(123)],
                ],
            ),
        ])
    }

    fn fixture_boundaries() -> GeoBoundaries {
        GeoBoundaries::parse(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "properties": { "gouv_fr": "Tunis" },
                        "geometry": { "type": "Polygon", "coordinates": [[[10.0, 36.0], [10.5, 36.0], [10.5, 36.5], [10.0, 36.0]]] }
                    },
                    {
                        "type": "Feature",
                        "properties": { "gouv_fr": "Médenine" },
                        "geometry": { "type": "Polygon", "coordinates": [[[10.3, 33.0], [10.8, 33.0], [10.8, 33.5], [10.3, 33.0]]] }
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn home_resolves_without_touching_data() {
        let resolved = resolve(
            ViewSelector::Home,
            GenderFilter::All,
            &DatasetStore::from_tables(Vec::new()),
            &GeoBoundaries::default(),
        )
        .unwrap();
        assert_eq!(resolved, ResolvedView::Home);
    }

    #[test]
    fn resolving_twice_yields_identical_panels() {
        let store = fixture_store();
        let boundaries = fixture_boundaries();
        for view in ViewSelector::ALL {
            let first = resolve(view, GenderFilter::All, &store, &boundaries).unwrap();
            let second = resolve(view, GenderFilter::All, &store, &boundaries).unwrap();
            assert_eq!(first, second, "view {view:?} is not deterministic");
        }
    }

    #[test]
    fn displayed_table_is_the_full_sheet_even_when_filtered() {
        let store = fixture_store();
        let boundaries = fixture_boundaries();
        let resolved = resolve(
            ViewSelector::Motives,
            GenderFilter::Male,
            &store,
            &boundaries,
        )
        .unwrap();
        let ResolvedView::Panels(panels) = resolved else {
            panic!("expected panels");
        };
        assert_eq!(&panels[0].table, store.get("Motifs (genre)").unwrap());
        assert_eq!(panels[0].export_file_name, "Donnéesmotifs_immigration.csv");
    }

    #[test]
    fn motive_order_follows_the_sheet() {
        let store = fixture_store();
        let resolved = resolve(
            ViewSelector::Motives,
            GenderFilter::All,
            &store,
            &fixture_boundaries(),
        )
        .unwrap();
        let ResolvedView::Panels(panels) = resolved else {
            panic!("expected panels");
        };
        assert_eq!(
            panels[0].chart.categories,
            vec!["Travail", "Études", "Regroupement familial"]
        );
    }

    #[test]
    fn education_filter_keeps_one_sex_and_every_level() {
        let store = fixture_store();
        let resolved = resolve(
            ViewSelector::EducationActivity,
            GenderFilter::Female,
            &store,
            &fixture_boundaries(),
        )
        .unwrap();
        let ResolvedView::Panels(panels) = resolved else {
            panic!("expected panels");
        };
        let education = &panels[0].chart;
        assert_eq!(education.series.len(), 1);
        assert_eq!(education.series[0].name, "Femmes");
        assert_eq!(education.series[0].values, vec![18.5, 25.5, 31.0, 25.0]);
        assert_eq!(
            education.categories,
            vec!["Aucun niveau", "Primaire", "Secondaire", "Supérieur"]
        );
        // The wide sheet stays on display regardless of the filter.
        assert_eq!(&panels[0].table, store.get("Instruction").unwrap());

        let activity = &panels[1].chart;
        assert_eq!(activity.kind, ChartKind::Bar);
        assert_eq!(activity.series[0].values, vec![7400.0, 2900.0]);
    }

    #[test]
    fn education_unfiltered_keeps_both_sexes() {
        let resolved = resolve(
            ViewSelector::EducationActivity,
            GenderFilter::All,
            &fixture_store(),
            &fixture_boundaries(),
        )
        .unwrap();
        let ResolvedView::Panels(panels) = resolved else {
            panic!("expected panels");
        };
        let names: Vec<&str> = panels[0].chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Hommes", "Femmes"]);
        assert_eq!(panels[1].chart.kind, ChartKind::GroupedBar);
    }

    #[test]
    fn geo_join_drops_unmatched_rows_from_the_chart_only() {
        let store = fixture_store();
        let resolved = resolve(
            ViewSelector::GeoDistribution,
            GenderFilter::All,
            &store,
            &fixture_boundaries(),
        )
        .unwrap();
        let ResolvedView::Panels(panels) = resolved else {
            panic!("expected panels");
        };
        let chart = &panels[0].chart;
        assert_eq!(chart.categories, vec!["Tunis", "Médenine"]);
        assert_eq!(chart.series[0].values, vec![8900.0, 5600.0]);
        let geo = chart.geo.as_ref().unwrap();
        assert_eq!(geo.keys, vec!["tunis", "medenine"]);
        assert_eq!(geo.unmatched, vec!["Atlantide"]);
        // The full sheet, Atlantide included, is what gets displayed and exported.
        assert_eq!(panels[0].table.len(), 3);
    }

    #[test]
    fn gender_filter_labels_round_trip_and_unknowns_are_safe() {
        for filter in GenderFilter::CHOICES {
            assert_eq!(GenderFilter::from_label(filter.label()), filter);
        }
        assert_eq!(GenderFilter::from_label("n'importe quoi"), GenderFilter::All);
    }
}
