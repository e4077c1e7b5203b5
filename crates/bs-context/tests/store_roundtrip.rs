use bs_context::*;
use chrono::{Duration, TimeZone, Utc};

fn fresh_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn graph(id: &str) -> AnalysisArtifact {
    AnalysisArtifact {
        id: id.to_string(),
        name: format!("20250301_120000_{id}.json"),
        display_name: pretty_artifact_name(&format!("20250301_120000_{id}.json")),
        kind: ArtifactKind::Graph,
        format: ArtifactFormat::Json,
        url: format!("/results/{id}.json"),
        api_url: None,
        created: "2025-03-01T12:00:00Z".to_string(),
        metadata: serde_json::Map::new(),
        size: Some(2048),
        favorite: None,
    }
}

#[test]
fn save_load_and_delete() {
    let store = ContextStore::new(fresh_dir("bs_context_store_roundtrip")).unwrap();
    let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

    let mut ctx = SimulationContext::for_run("sim_D15", t0);
    ctx = apply(ctx, ContextUpdate::AddArtifact(graph("barras_est")), t0);
    ctx = apply(
        ctx,
        ContextUpdate::Merge(ContextPatch {
            results: Some(ResultsPatch {
                summary: Some(SimulationSummary::parse_csv_line(
                    "15,20,1,2,3,4,5,6,7,8,9,10,11,12",
                )),
                ..Default::default()
            }),
            ..Default::default()
        }),
        t0,
    );

    assert!(!store.has("sim_D15"));
    store.save(&ctx).unwrap();
    assert!(store.has("sim_D15"));

    let loaded = store.load("sim_D15").unwrap();
    assert_eq!(loaded, ctx);
    assert_eq!(loaded.artifacts.graphs.get("barras_est").unwrap().display_name, "barras est");
    assert_eq!(loaded.results.summary.unwrap().input_delta(), Some(15));

    store.delete("sim_D15").unwrap();
    assert!(!store.has("sim_D15"));
    assert!(matches!(store.load("sim_D15"), Err(ContextError::NotFound { .. })));
    store.delete("sim_D15").unwrap();
}

#[test]
fn list_orders_by_last_modified() {
    let dir = fresh_dir("bs_context_store_list");
    let store = ContextStore::new(dir.clone()).unwrap();
    let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

    store.save(&SimulationContext::for_run("old", t0)).unwrap();
    store
        .save(&SimulationContext::for_run("new", t0 + Duration::hours(1)))
        .unwrap();
    std::fs::create_dir_all(dir.join("broken")).unwrap();
    std::fs::write(dir.join("broken").join("context.json"), "{ not json").unwrap();
    std::fs::create_dir_all(dir.join("empty_dir")).unwrap();

    let ids: Vec<String> = store
        .list()
        .unwrap()
        .into_iter()
        .map(|c| c.meta.run_id)
        .collect();
    assert_eq!(ids, ["new", "old"]);
}

#[test]
fn refuses_invalid_contexts() {
    let store = ContextStore::new(fresh_dir("bs_context_store_invalid")).unwrap();
    let now = Utc::now();

    let unnamed = SimulationContext::empty(now);
    assert!(matches!(store.save(&unnamed), Err(ContextError::InvalidRunId { .. })));

    let mut bad = SimulationContext::for_run("bad", now);
    bad.config.parameters.walk_cost = -1.0;
    assert!(matches!(store.save(&bad), Err(ContextError::Validation(_))));
    assert!(!store.has("bad"));
}

#[test]
fn json_and_yaml_files_roundtrip() {
    let dir = fresh_dir("bs_context_files");
    std::fs::create_dir_all(&dir).unwrap();
    let t0 = Utc.with_ymd_and_hms(2025, 6, 2, 8, 30, 0).unwrap();

    let mut ctx = SimulationContext::for_run("export_me", t0);
    ctx = apply(ctx, ContextUpdate::AddArtifact(graph("g")), t0);
    ctx = apply(
        ctx,
        ContextUpdate::ToggleFavorite {
            kind: ArtifactKind::Graph,
            id: "g".into(),
        },
        t0,
    );

    let json_path = dir.join("ctx.json");
    save_json(&json_path, &ctx).unwrap();
    assert_eq!(load_json(&json_path).unwrap(), ctx);

    let yaml_path = dir.join("ctx.yaml");
    save_yaml(&yaml_path, &ctx).unwrap();
    assert_eq!(load_yaml(&yaml_path).unwrap(), ctx);
}
