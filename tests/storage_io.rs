use gdp_dash::models::Observation;
use gdp_dash::storage;
use std::fs;

fn sample(n: usize) -> Vec<Observation> {
    (0..n)
        .map(|i| Observation {
            country_code: "DEU".into(),
            country_name: Some("Germany".into()),
            region: Some("Europe".into()),
            year: 2000 + i as i32,
            value: Some(100.0 + i as f64),
        })
        .collect()
}

#[test]
fn save_csv_and_json() {
    let rows = sample(3);
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("gdp.csv");
    storage::save_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("Country Code,Country Name,Region,Year,Value"));
    assert_eq!(csv_txt.lines().count(), 1 + rows.len());
    assert!(csv_txt.contains("DEU,Germany,Europe,2000,100"));

    let json_path = dir.path().join("gdp.json");
    storage::save_json(&rows, &json_path).unwrap();
    let json_txt = fs::read_to_string(&json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json_txt).unwrap();
    assert_eq!(v.as_array().unwrap().len(), rows.len());
}

#[test]
fn missing_values_export_as_empty_cells() {
    let rows = vec![Observation::new("FRA", 2010, None)];
    let bytes = storage::export_csv_bytes(&rows).unwrap();
    let txt = String::from_utf8(bytes).unwrap();
    assert_eq!(txt.lines().nth(1), Some("FRA,,,2010,"));
}

//spreadsheet apps evaluate cells starting with =, +, - or @ as formulas;
//exported text cells get a leading single quote instead
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let rows = vec![Observation {
        country_code: "=HYPERLINK(\"http://evil\")".into(),
        country_name: Some("+SUM(A1:A9)".into()),
        region: Some("@foo".into()),
        year: 2020,
        value: Some(-1.5),
    }];
    let bytes = storage::export_csv_bytes(&rows).unwrap();

    let mut rdr = csv::Reader::from_reader(bytes.as_slice());
    let headers = rdr.headers().unwrap().clone();
    let row = rdr.records().next().expect("one data row expected").unwrap();
    let cell = |name: &str| {
        let idx = headers.iter().position(|h| h == name).expect("header present");
        row.get(idx).unwrap().to_string()
    };

    assert!(cell("Country Code").starts_with("'="));
    assert!(cell("Country Name").starts_with("'+SUM"));
    assert!(cell("Region").starts_with("'@"));
    // numbers are written as numbers
    assert_eq!(cell("Value"), "-1.5");
}

#[test]
fn load_wide_csv_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.csv");
    fs::write(
        &path,
        "Country Name,Country Code,1960,1961\nGermany,DEU,1.0,2.0\nFrance,FRA,,3.5\n",
    )
    .unwrap();
    let raw = storage::load_wide_csv(&path).unwrap();
    assert_eq!(raw.headers.len(), 4);
    assert_eq!(raw.records.len(), 2);
    assert_eq!(raw.records[1].values["1960"], None);
    assert_eq!(raw.records[1].values["1961"], Some(3.5));
}
