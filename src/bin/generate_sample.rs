use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// Sample survey data
// ---------------------------------------------------------------------------

const ORIGIN: &[(&str, i64)] = &[
    ("Afrique subsaharienne", 21964),
    ("Pays du Maghreb", 15497),
    ("Autres pays arabes", 8204),
    ("Europe", 7019),
    ("Asie", 3746),
    ("Autres", 2570),
];

const AGE_GROUPS: &[(&str, i64)] = &[
    ("0-14 ans", 6195),
    ("15-29 ans", 19470),
    ("30-44 ans", 18290),
    ("45-59 ans", 9440),
    ("60 ans et plus", 5605),
];

const MOTIVES: &[(&str, i64, i64)] = &[
    ("Travail", 14820, 5110),
    ("Études", 7940, 8630),
    ("Regroupement familial", 4080, 9370),
    ("Asile et protection", 3150, 1980),
    ("Santé", 1210, 640),
    ("Autres", 1800, 270),
];

const EDUCATION: &[(&str, f64, f64)] = &[
    ("Aucun niveau", 7.8, 10.2),
    ("Primaire", 23.6, 21.4),
    ("Secondaire", 38.1, 36.3),
    ("Supérieur", 30.5, 32.1),
];

const ACTIVITY: &[(&str, i64, i64)] = &[
    ("Occupé", 19840, 9110),
    ("Chômeur", 4760, 3940),
    ("Étudiant", 6230, 7450),
    ("Inactif", 1480, 4190),
];

/// Governorate, immigrant count, centroid (lat, lon) and the hexagon
/// radius in degrees used for its stand-in boundary.
const GOVERNORATES: &[(&str, i64, f64, f64, f64)] = &[
    ("Tunis", 9735, 36.80, 10.18, 0.09),
    ("Ariana", 5120, 36.86, 10.19, 0.09),
    ("Ben Arous", 4230, 36.75, 10.22, 0.09),
    ("Manouba", 2140, 36.81, 10.09, 0.09),
    ("Nabeul", 2670, 36.45, 10.73, 0.18),
    ("Zaghouan", 610, 36.40, 10.14, 0.18),
    ("Bizerte", 1450, 37.27, 9.87, 0.22),
    ("Béja", 520, 36.73, 9.18, 0.22),
    ("Jendouba", 690, 36.50, 8.78, 0.22),
    ("Le Kef", 480, 36.17, 8.70, 0.22),
    ("Siliana", 370, 36.08, 9.37, 0.22),
    ("Sousse", 4890, 35.82, 10.63, 0.18),
    ("Monastir", 3115, 35.77, 10.83, 0.12),
    ("Mahdia", 980, 35.50, 11.06, 0.15),
    ("Sfax", 5470, 34.74, 10.76, 0.28),
    ("Kairouan", 1130, 35.67, 10.10, 0.25),
    ("Kasserine", 760, 35.17, 8.83, 0.28),
    ("Sidi Bouzid", 640, 35.04, 9.48, 0.28),
    ("Gabès", 1840, 33.88, 10.10, 0.28),
    ("Médenine", 6230, 33.35, 10.50, 0.30),
    ("Tataouine", 1270, 32.93, 10.45, 0.35),
    ("Gafsa", 1030, 34.42, 8.78, 0.28),
    ("Tozeur", 720, 33.92, 8.13, 0.28),
    ("Kébili", 910, 33.70, 8.97, 0.32),
];

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn sheet(columns: &[&str], data: Vec<Value>) -> Value {
    json!({ "columns": columns, "data": data })
}

fn workbook() -> Value {
    let mut sheets = Map::new();
    sheets.insert(
        "Origine".to_string(),
        sheet(
            &["Région d'origine", "Nombre d'immigrés"],
            ORIGIN.iter().map(|&(r, n)| json!([r, n])).collect(),
        ),
    );
    sheets.insert(
        "Structure par âge".to_string(),
        sheet(
            &["Groupe d'âge", "Nombre d'immigrés"],
            AGE_GROUPS.iter().map(|&(g, n)| json!([g, n])).collect(),
        ),
    );
    sheets.insert(
        "Motifs (genre)".to_string(),
        sheet(
            &["Motif d'immigration", "Hommes", "Femmes"],
            MOTIVES.iter().map(|&(m, h, f)| json!([m, h, f])).collect(),
        ),
    );
    sheets.insert(
        "Instruction".to_string(),
        sheet(
            &["Niveau d'instruction", "Hommes", "Femmes"],
            EDUCATION.iter().map(|&(l, h, f)| json!([l, h, f])).collect(),
        ),
    );
    sheets.insert(
        "Activité".to_string(),
        sheet(
            &["Type d'activité", "Hommes", "Femmes"],
            ACTIVITY.iter().map(|&(t, h, f)| json!([t, h, f])).collect(),
        ),
    );
    sheets.insert(
        "Répartition géographique".to_string(),
        sheet(
            &["Gouvernorat", "Nombre D'immigrés"],
            GOVERNORATES
                .iter()
                .map(|&(g, n, _, _, _)| json!([g, n]))
                .collect(),
        ),
    );
    Value::Object(sheets)
}

/// Closed hexagonal ring around a centroid, GeoJSON order (lon, lat).
fn hexagon(lat: f64, lon: f64, radius: f64) -> Value {
    let mut ring: Vec<Value> = (0..6)
        .map(|k| {
            let angle = k as f64 * std::f64::consts::TAU / 6.0;
            json!([lon + radius * angle.cos(), lat + radius * angle.sin()])
        })
        .collect();
    ring.push(ring[0].clone());
    json!([ring])
}

fn boundaries() -> Value {
    let features: Vec<Value> = GOVERNORATES
        .iter()
        .map(|&(name, _, lat, lon, radius)| {
            json!({
                "type": "Feature",
                "properties": { "gouv_fr": name },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": hexagon(lat, lon, radius)
                }
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

fn main() {
    let workbook_path = "immigration_tunisie_nettoye.json";
    let text = serde_json::to_string_pretty(&workbook()).expect("Failed to encode workbook");
    std::fs::write(workbook_path, text).expect("Failed to write workbook");

    let boundaries_path = "TN-gouvernorats.geojson";
    let text = serde_json::to_string_pretty(&boundaries()).expect("Failed to encode boundaries");
    std::fs::write(boundaries_path, text).expect("Failed to write boundaries");

    println!(
        "Wrote 6 sheets to {workbook_path} and {} governorates to {boundaries_path}",
        GOVERNORATES.len()
    );
}
