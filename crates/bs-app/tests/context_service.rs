use bs_app::*;
use bs_context::{AnalysisArtifact, ArtifactFormat, ArtifactKind, ContextUpdate};
use chrono::{TimeZone, Utc};

fn settings(name: &str) -> Settings {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    Settings {
        context_dir: dir,
        ..Settings::default()
    }
}

fn map_artifact(id: &str) -> AnalysisArtifact {
    AnalysisArtifact {
        id: id.to_string(),
        name: format!("{id}.html"),
        display_name: id.to_string(),
        kind: ArtifactKind::Map,
        format: ArtifactFormat::Html,
        url: format!("/results/{id}.html"),
        api_url: None,
        created: String::new(),
        metadata: serde_json::Map::new(),
        size: None,
        favorite: None,
    }
}

#[test]
fn create_update_favourite_list() {
    let settings = settings("bs_app_context_flow");
    let store = open_store(&settings).unwrap();
    let now = Utc.with_ymd_and_hms(2025, 4, 10, 9, 0, 0).unwrap();

    let ctx = create_context(&store, &settings, "city_D30", None, now).unwrap();
    assert_eq!(ctx.config.parameters.delta, 30);
    assert!(matches!(
        create_context(&store, &settings, "city_D30", None, now),
        Err(AppError::ContextExists(_))
    ));

    let add = ContextUpdate::AddArtifact(map_artifact("dens"));
    update_context(&store, "city_D30", add, now).unwrap();
    assert!(toggle_favorite(&store, "city_D30", "dens", now).unwrap());
    assert!(!toggle_favorite(&store, "city_D30", "dens", now).unwrap());
    assert!(toggle_favorite(&store, "city_D30", "dens", now).unwrap());
    assert!(matches!(
        toggle_favorite(&store, "city_D30", "missing", now),
        Err(AppError::InvalidInput(_))
    ));

    let summaries = list_contexts(&store).unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].artifact_count, 1);
    assert_eq!(summaries[0].favorite_count, 1);
    assert_eq!(summaries[0].delta, 30);
}

#[test]
fn export_import_roundtrip() {
    let settings = settings("bs_app_context_export");
    let store = open_store(&settings).unwrap();
    let now = Utc.with_ymd_and_hms(2025, 4, 10, 9, 0, 0).unwrap();
    create_context(&store, &settings, "exported", Some(60), now).unwrap();

    let file = settings.context_dir.join("exported.yaml");
    export_context(&store, "exported", &file).unwrap();

    assert!(matches!(
        import_context(&store, &file, false),
        Err(AppError::ContextExists(_))
    ));
    delete_context(&store, "exported").unwrap();
    assert!(matches!(
        show_context(&store, "exported"),
        Err(AppError::ContextNotFound(_))
    ));

    assert_eq!(import_context(&store, &file, false).unwrap(), "exported");
    assert_eq!(show_context(&store, "exported").unwrap().config.parameters.delta, 60);

    assert!(matches!(
        export_context(&store, "exported", &settings.context_dir.join("x.txt")),
        Err(AppError::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        import_context(&store, &settings.context_dir.join("nope.json"), false),
        Err(AppError::FileRead { .. })
    ));
}

#[test]
fn missing_context_reports_not_found() {
    let settings = settings("bs_app_context_missing");
    let store = open_store(&settings).unwrap();
    assert!(matches!(
        delete_context(&store, "ghost"),
        Err(AppError::ContextNotFound(_))
    ));
}

#[test]
fn listing_registers_artifacts() {
    let settings = settings("bs_app_context_listing");
    let store = open_store(&settings).unwrap();
    let now = Utc.with_ymd_and_hms(2025, 4, 10, 9, 0, 0).unwrap();
    create_context(&store, &settings, "listed_D15", None, now).unwrap();

    let path = settings.context_dir.join("listing.json");
    let listing = serde_json::json!([
        {
            "name": "20250410_090000_Mapa_Densidad.html",
            "kind": "map",
            "format": "html",
            "url": "/results/listed_D15/density.html"
        },
        {
            "id": "bars",
            "name": "bars.json",
            "kind": "graph",
            "format": "json",
            "url": "/results/listed_D15/bars.json"
        }
    ]);
    std::fs::write(&path, listing.to_string()).unwrap();

    let items = read_listing(&path).unwrap();
    assert_eq!(register_artifacts(&store, "listed_D15", items, now).unwrap(), 2);

    let ctx = show_context(&store, "listed_D15").unwrap();
    assert_eq!(ctx.artifacts.maps.len(), 1);
    assert_eq!(ctx.find_artifact("bars").unwrap().kind, ArtifactKind::Graph);
    let map = ctx.find_artifact("20250410_090000_Mapa_Densidad.html").unwrap();
    assert_eq!(map.display_name, "Mapa Densidad");

    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(read_listing(&path), Err(AppError::InvalidInput(_))));
}
