use log::{debug, info, warn};

use rayon::prelude::*;
use reqwest::blocking::Client;
use snafu::{prelude::*, Snafu};
use village_profile::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::report::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_gsheet;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Error reading file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the report"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Cannot find worksheet {name} in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Source {name} has no filePath"))]
    MissingFilePath { name: String },
    #[snafu(display("Invalid sheet URL {url}"))]
    InvalidUrl {
        source: url::ParseError,
        url: String,
    },
    #[snafu(display("Cannot create the HTTP client"))]
    HttpClient { source: reqwest::Error },
    #[snafu(display("Failed to fetch {name}"))]
    Fetching {
        source: reqwest::Error,
        name: String,
    },
    #[snafu(display("Failed to fetch {name}: {status}"))]
    FetchStatus {
        name: String,
        status: reqwest::StatusCode,
    },
    #[snafu(display("Failed to read source {name}"))]
    SourceFailed {
        name: String,
        source: Box<ReportError>,
    },
    #[snafu(display("Cannot load the sources"))]
    Registry { source: RegistryError },
    #[snafu(display("Tab {index} does not exist ({count} sources)"))]
    SelectionOutOfRange { index: usize, count: usize },
    #[snafu(display("Source {name} was not loaded"))]
    NotLoaded { name: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync>, Some)))]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

fn profile_to_json(name: &str, profile: &VillageProfile) -> JSValue {
    let items: Vec<JSValue> = profile
        .profile_items
        .iter()
        .map(|item| json!({"title": item.title, "body": item.body}))
        .collect();
    let categories: Vec<JSValue> = profile
        .categories
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "issues": c.issues,
                "potentials": c.potentials,
                "projects": c.projects
            })
        })
        .collect();
    json!({
        "name": name,
        "description": profile.description,
        "profileItems": items,
        "school": {"name": profile.school.name, "address": profile.school.address},
        "categories": categories
    })
}

fn build_selected_js(registry: &DatasetRegistry, index: usize) -> ReportResult<JSValue> {
    let names = registry.names();
    let name = names.get(index).context(SelectionOutOfRangeSnafu {
        index,
        count: registry.len(),
    })?;
    let profile = registry
        .select(index)
        .context(NotLoadedSnafu { name: *name })?;
    let profile_js = profile_to_json(name, profile);
    Ok(json!({
        "sources": names,
        "selected": index,
        "profile": profile_js
    }))
}

fn build_all_js(registry: &DatasetRegistry) -> JSValue {
    let profiles: Vec<JSValue> = registry
        .names()
        .iter()
        .enumerate()
        .map(|(idx, name)| match registry.select(idx) {
            Some(p) => profile_to_json(name, p),
            None => JSValue::Null,
        })
        .collect();
    json!({"sources": registry.names(), "profiles": profiles})
}

fn log_profile(name: &str, profile: &VillageProfile) {
    info!(
        "{}: {} profile items, school: {:?}",
        name,
        profile.profile_items.len(),
        profile.school.name
    );
    for c in profile.categories.iter() {
        info!(
            "{}: {:>8} {} issues, {} potentials, {} projects",
            name,
            c.name,
            c.issues.len(),
            c.potentials.len(),
            c.projects.len()
        );
    }
}

fn read_source(
    config: &ReportConfig,
    root: &Path,
    client: &Client,
    src: &SheetSource,
) -> ReportResult<Grid> {
    match src.provider() {
        "gsheet" => {
            let text = io_gsheet::fetch_text(client, config.sheet_base_url(), src)?;
            Ok(tokenize(&text))
        }
        "csv" => io_csv::read_csv_grid(&source_path(root, src)?),
        "xlsx" => io_excel::read_excel_grid(
            &source_path(root, src)?,
            src.excel_worksheet_name.as_deref(),
        ),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn source_path(root: &Path, src: &SheetSource) -> ReportResult<String> {
    let file_path = src
        .file_path
        .as_deref()
        .context(MissingFilePathSnafu { name: &src.name })?;
    Ok(io_common::resolve_path(root, file_path))
}

/// Reads all the sources in parallel and loads the ones that could be read.
fn load_registry(
    config: &ReportConfig,
    root: &Path,
    policy: AggregationPolicy,
) -> ReportResult<DatasetRegistry> {
    let client = io_gsheet::build_client(config.timeout())?;

    let results: Vec<(SourceDescriptor, ReportResult<Grid>)> = config
        .sources
        .par_iter()
        .map(|src| (src.descriptor(), read_source(config, root, &client, src)))
        .collect();

    let aggregated = match aggregate(results, policy) {
        Ok(x) => x,
        Err(failure) => {
            return Err(ReportError::SourceFailed {
                name: failure.source.name,
                source: Box::new(failure.error),
            });
        }
    };
    for f in aggregated.failures.iter() {
        warn!("Skipping source {}: {}", f.source.name, f.error);
    }

    DatasetRegistry::populate(&config.descriptors(), aggregated.loaded).context(RegistrySnafu {})
}

fn load_config(args: &Args) -> ReportResult<(ReportConfig, PathBuf)> {
    if let Some(input) = args.input.clone() {
        let name = args
            .name
            .clone()
            .unwrap_or_else(|| io_common::simplify_file_name(&input));
        let src = SheetSource {
            name,
            provider: Some(args.input_type.clone().unwrap_or_else(|| "csv".to_string())),
            gid: None,
            file_path: Some(input),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
        };
        let config = ReportConfig {
            sources: vec![src],
            ..ReportConfig::default()
        };
        return Ok((config, PathBuf::new()));
    }

    match args.config.as_deref() {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            Ok((config, root))
        }
        None => Ok((ReportConfig::default(), PathBuf::new())),
    }
}

fn write_output(out: Option<&str>, contents: &str) -> ReportResult<()> {
    match out {
        None | Some("") | Some("stdout") => {
            println!("{}", contents);
            Ok(())
        }
        Some(path) => {
            info!("Writing report to {:?}", path);
            fs::write(path, contents).context(WritingFileSnafu { path })
        }
    }
}

fn check_reference(reference_path: &str, pretty_js: &str) -> ReportResult<()> {
    let contents =
        fs::read_to_string(reference_path).context(OpeningFileSnafu {
            path: reference_path,
        })?;
    let reference: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {
        path: reference_path,
    })?;
    let pretty_ref = serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
    if pretty_ref != pretty_js {
        warn!("Found differences with the reference report");
        print_diff(pretty_ref.as_str(), pretty_js, "\n");
        whatever!(
            "Difference detected between the report and the reference {}",
            reference_path
        )
    }
    Ok(())
}

pub fn run_report(args: &Args) -> ReportResult<()> {
    let (config, root) = load_config(args)?;
    info!("config: {:?}", config);

    let policy = if args.partial {
        AggregationPolicy::PartialTolerant
    } else {
        config.aggregation_policy()?
    };

    let registry = load_registry(&config, &root, policy)?;
    for (idx, name) in registry.names().iter().enumerate() {
        if let Some(p) = registry.select(idx) {
            log_profile(name, p);
        }
    }

    let report_js = if args.all {
        build_all_js(&registry)
    } else {
        build_selected_js(&registry, args.tab.unwrap_or(0))?
    };
    debug!("report: {:?}", report_js);

    let pretty_js = serde_json::to_string_pretty(&report_js).context(SerializingJsonSnafu {})?;
    write_output(args.out.as_deref(), &pretty_js)?;

    if let Some(reference_path) = args.reference.as_deref() {
        check_reference(reference_path, &pretty_js)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn testdata(name: &str) -> String {
        format!("{}/testdata/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn args() -> Args {
        Args {
            config: Some(testdata("local_config.json")),
            input: None,
            input_type: None,
            name: None,
            excel_worksheet_name: None,
            tab: None,
            all: false,
            partial: false,
            out: None,
            reference: None,
            verbose: false,
        }
    }

    fn local_registry(policy: AggregationPolicy) -> ReportResult<DatasetRegistry> {
        let (config, root) = load_config(&args())?;
        load_registry(&config, &root, policy)
    }

    #[test]
    fn local_sources_are_decoded() {
        let registry = local_registry(AggregationPolicy::AllOrNothing).unwrap();
        assert_eq!(registry.names(), vec!["Kampangar", "Kuntang"]);

        let kampangar = registry.select(0).unwrap();
        assert_eq!(
            kampangar.description,
            "Kampangar adalah desa pesisir di Kecamatan Balantak, Banggai."
        );
        let titles: Vec<&str> = kampangar
            .profile_items
            .iter()
            .map(|i| i.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["Luas Wilayah", "Jumlah Penduduk", "Mata Pencaharian"]
        );
        assert_eq!(
            kampangar.profile_items[2].body,
            "Nelayan dan petani \"kelapa\""
        );
        assert_eq!(kampangar.school.address, "Jl. Trans Sulawesi, Kampangar");
        let agro = kampangar.category(CategorySlot::Agro);
        assert_eq!(
            agro.potentials,
            vec!["Lahan kelapa luas".to_string(), "Rumput laut, ikan".to_string()]
        );
        assert_eq!(agro.projects.len(), 2);
        assert_eq!(
            kampangar.category(CategorySlot::Saintek).projects,
            vec!["Instalasi pipa air".to_string()]
        );

        let kuntang = registry.select(1).unwrap();
        assert_eq!(kuntang.school.name, "");
        assert!(kuntang.categories.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn missing_source_fails_the_batch() {
        let config = ReportConfig {
            sources: vec![
                SheetSource {
                    name: "Kampangar".to_string(),
                    provider: Some("csv".to_string()),
                    gid: None,
                    file_path: Some(testdata("kampangar.csv")),
                    excel_worksheet_name: None,
                },
                SheetSource {
                    name: "Pulo Dua".to_string(),
                    provider: Some("csv".to_string()),
                    gid: None,
                    file_path: Some(testdata("missing.csv")),
                    excel_worksheet_name: None,
                },
            ],
            ..ReportConfig::default()
        };
        let root = PathBuf::new();

        let err = load_registry(&config, &root, AggregationPolicy::AllOrNothing).unwrap_err();
        match err {
            ReportError::SourceFailed { name, source } => {
                assert_eq!(name, "Pulo Dua");
                assert!(matches!(*source, ReportError::OpeningFile { .. }));
            }
            e => panic!("unexpected error {:?}", e),
        }

        let registry = load_registry(&config, &root, AggregationPolicy::PartialTolerant).unwrap();
        assert_eq!(registry.names(), vec!["Kampangar", "Pulo Dua"]);
        assert!(registry.select(0).is_some());
        assert!(registry.select(1).is_none());
        assert!(matches!(
            build_selected_js(&registry, 1),
            Err(ReportError::NotLoaded { .. })
        ));
        assert_eq!(build_all_js(&registry)["profiles"][1], JSValue::Null);
    }

    #[test]
    fn unknown_provider() {
        let src = SheetSource {
            name: "Kuntang".to_string(),
            provider: Some("ods".to_string()),
            gid: None,
            file_path: Some("kuntang.ods".to_string()),
            excel_worksheet_name: None,
        };
        let config = ReportConfig {
            sources: vec![src.clone()],
            ..ReportConfig::default()
        };
        let client = io_gsheet::build_client(config.timeout()).unwrap();
        assert!(read_source(&config, Path::new(""), &client, &src).is_err());
    }

    #[test]
    fn tab_out_of_range() {
        let registry = local_registry(AggregationPolicy::AllOrNothing).unwrap();
        assert!(matches!(
            build_selected_js(&registry, 2),
            Err(ReportError::SelectionOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn json_shape() {
        let grid = tokenize("h\nDesa,,,Luas,8 km2,,SDN 2,Jl. Kebun\n");
        let js = profile_to_json("Kuntang", &decode(&grid));
        assert_eq!(js["name"], "Kuntang");
        assert_eq!(js["profileItems"][0]["body"], "8 km2");
        assert_eq!(js["school"]["address"], "Jl. Kebun");
        assert_eq!(js["categories"].as_array().unwrap().len(), 4);
        assert_eq!(js["categories"][3]["name"], "SOSHUM");
        assert_eq!(js["categories"][0]["issues"], json!([]));
    }

    #[test]
    fn single_input_file() {
        let a = Args {
            config: None,
            input: Some(testdata("kuntang.csv")),
            ..args()
        };
        let (config, root) = load_config(&a).unwrap();
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].name, "kuntang");
        assert_eq!(config.sources[0].provider(), "csv");
        let registry = load_registry(&config, &root, AggregationPolicy::AllOrNothing).unwrap();
        assert_eq!(
            registry.select(0).unwrap().description,
            "Kuntang berada di dataran tinggi."
        );
    }

    #[test]
    fn report_matches_reference() {
        let out = std::env::temp_dir().join("profildesa_report_matches_reference.json");
        let a = Args {
            out: Some(out.display().to_string()),
            reference: Some(testdata("kampangar_expected.json")),
            ..args()
        };
        run_report(&a).unwrap();
        let written = fs::read_to_string(&out).unwrap();
        let js: JSValue = serde_json::from_str(&written).unwrap();
        assert_eq!(js["selected"], 0);
        assert_eq!(js["profile"]["name"], "Kampangar");
    }

    #[test]
    fn report_differs_from_reference() {
        let out = std::env::temp_dir().join("profildesa_report_differs_from_reference.json");
        let a = Args {
            tab: Some(1),
            out: Some(out.display().to_string()),
            reference: Some(testdata("kampangar_expected.json")),
            ..args()
        };
        assert!(run_report(&a).is_err());
    }
}
