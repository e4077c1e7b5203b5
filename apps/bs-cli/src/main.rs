use std::path::{Path, PathBuf};

use bs_app::{
    AnalysisTarget, AppError, AppResult, RequestOptions, Settings, build_analysis_request,
    build_simulation_request, context_service,
};
use bs_context::{ContextStore, ContextUpdate, MetaPatch, SimulationContext};
use bs_core::{
    DaysSpec, InstantBuilder, TimeSlotGrid, parse_instant_set, parse_station_set, snap_minute,
};
use bs_params::{
    Absent, AggregationMode, DisplacementMap, FilterConfig, FilterKind, FilterOperator,
    GraphKind, GraphParams, MapKind, MapSpec, Movement, SnapshotMap, SubtractionRequest, TripKind,
    UnifiedFilterState, build_filter, build_graph_arg, quick_graph_arg,
};
use chrono::{NaiveDateTime, Timelike, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bikesim")]
#[command(about = "BikeSim CLI - instants, analysis parameters and simulation contexts", long_about = None)]
struct Cli {
    /// Slot length in minutes (defaults to BIKESIM_DELTA, then 15)
    #[arg(long, global = true)]
    delta: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the instant for a day offset and a time of day
    Instant {
        /// Day offset from the selection's first day
        #[arg(allow_negative_numbers = true)]
        day: i64,
        /// Time of day as HH:MM
        time: String,
    },
    /// Slot duration between two date-times, minutes snapped to the grid
    Duration {
        /// Start as "YYYY-MM-DD HH:MM"
        from: String,
        /// End as "YYYY-MM-DD HH:MM"
        to: String,
    },
    /// Snap a minute to the slot grid
    Snap { minute: u32 },
    /// Normalise an instant list ("3, 1,,2" -> "1;2;3")
    Instants {
        #[arg(required = true)]
        raw: Vec<String>,
    },
    /// Normalise a station list, optionally scoped to days
    Stations {
        raw: String,
        /// "all" or a day list such as "1;2"
        #[arg(long)]
        days: Option<String>,
    },
    /// Compile a filter string
    Filter(FilterArgs),
    /// Build a graph argument
    Graph(GraphArgs),
    /// Build the analysis request payload for a stored run
    Request(RequestArgs),
    /// Build the payload that launches a simulation for a run
    Simulate(SimulateArgs),
    /// Build the payload that subtracts one result folder from another
    Compare {
        /// Result folder to subtract from
        folder1: String,
        /// Result folder to subtract
        folder2: String,
        /// Name of the resulting run
        #[arg(long)]
        name: Option<String>,
    },
    /// Manage stored simulation contexts
    #[command(subcommand)]
    Context(ContextCommands),
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterKindArg {
    EstValor,
    EstValorDias,
    Horas,
    Porcentaje,
}

impl From<FilterKindArg> for FilterKind {
    fn from(arg: FilterKindArg) -> Self {
        match arg {
            FilterKindArg::EstValor => FilterKind::EstValor,
            FilterKindArg::EstValorDias => FilterKind::EstValorDias,
            FilterKindArg::Horas => FilterKind::Horas,
            FilterKindArg::Porcentaje => FilterKind::Porcentaje,
        }
    }
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long, value_enum)]
    kind: FilterKindArg,
    /// One of >=, <=, >, <
    #[arg(long = "op", default_value = ">=")]
    operator: String,
    #[arg(long, default_value = "65")]
    value: String,
    #[arg(long, default_value = "0")]
    day_pct: String,
    #[arg(long, default_value = "all")]
    days: String,
    #[arg(long, default_value = "5")]
    fail_days: String,
    #[arg(long, default_value = "0")]
    stations_pct: String,
    #[arg(long, default_value = "")]
    stations_list: String,
}

impl FilterArgs {
    fn config(&self) -> AppResult<FilterConfig> {
        Ok(FilterConfig {
            kind: self.kind.into(),
            state: UnifiedFilterState {
                operator: self.operator.parse::<FilterOperator>()?,
                value: self.value.clone(),
                day_pct: self.day_pct.clone(),
                days: self.days.clone(),
                allowed_fail_days: self.fail_days.clone(),
                stations_pct: self.stations_pct.clone(),
                stations_list: self.stations_list.clone(),
            },
        })
    }
}

#[derive(Args)]
struct GraphArgs {
    /// Chart key, e.g. graf_barras_est_med
    kind: String,
    /// Stations ("87;212"); first set for matrix comparison
    #[arg(long, default_value = "")]
    stations: String,
    /// Second station set for matrix comparison
    #[arg(long, default_value = "")]
    stations2: String,
    /// Days: "all", "1;2", or "#"-separated per-station patterns
    #[arg(long, default_value = "")]
    days: String,
    /// Aggregation mode, M (mean) or A (accumulated)
    #[arg(long, default_value = "M")]
    mode: String,
    /// Omit the frequency series on the day histogram
    #[arg(long)]
    no_freq: bool,
    /// Matrix delta for matrix comparison
    #[arg(long, default_value = "")]
    mats_delta: String,
    /// Every day for the given stations, ignoring other options
    #[arg(long)]
    quick: bool,
}

impl GraphArgs {
    fn params(&self) -> AppResult<GraphParams> {
        graph_params(
            &self.stations,
            &self.stations2,
            &self.days,
            &self.mode,
            self.no_freq,
            &self.mats_delta,
        )
    }
}

/// One set of chart options feeds every chart kind.
fn graph_params(
    stations: &str,
    stations2: &str,
    days: &str,
    mode: &str,
    no_freq: bool,
    mats_delta: &str,
) -> AppResult<GraphParams> {
    let mode = mode.parse::<AggregationMode>()?;
    Ok(GraphParams {
        bar_stations: stations.to_string(),
        bar_days: days.to_string(),
        day_days: days.to_string(),
        day_mode: mode,
        day_frequency: !no_freq,
        line_stations: stations.to_string(),
        line_days: days.to_string(),
        mats_delta: mats_delta.to_string(),
        mats_stations_1: stations.to_string(),
        mats_stations_2: stations2.to_string(),
        mats_mode: mode,
    })
}

#[derive(Args)]
struct RequestArgs {
    run_id: String,
    /// Aggregation matrix id (-1 for an external matrix)
    #[arg(long, allow_negative_numbers = true)]
    matrix: Option<i32>,
    /// Density map instants
    #[arg(long)]
    density: Option<String>,
    /// Voronoi map instants
    #[arg(long)]
    voronoi: Option<String>,
    /// Circle map instants
    #[arg(long)]
    circle: Option<String>,
    /// Stations shown on snapshot maps
    #[arg(long, default_value = "")]
    map_stations: String,
    /// Station labels on the circle map
    #[arg(long)]
    labels: bool,
    /// Displacement map as "instants;origin;destination;movement;type"
    #[arg(long)]
    displacement: Option<String>,
    /// Chart keys to include, configured with the --graph-* options
    #[arg(long = "graph")]
    graphs: Vec<String>,
    #[command(flatten)]
    graph: GraphOptions,
    /// Print one payload per chart, plus one for the maps
    #[arg(long)]
    split: bool,
    /// Apply --filter-* to maps
    #[arg(long)]
    filter_maps: bool,
    /// Apply --filter-* to graphs
    #[arg(long)]
    filter_graphs: bool,
    #[arg(long, value_enum)]
    filter_kind: Option<FilterKindArg>,
    #[arg(long, default_value = "65")]
    filter_value: String,
    #[arg(long, default_value = "0")]
    filter_day_pct: String,
    #[arg(long, default_value = "5")]
    filter_fail_days: String,
}

#[derive(Args)]
struct GraphOptions {
    /// Chart stations ("87;212"); first set for matrix comparison
    #[arg(long = "graph-stations", default_value = "")]
    stations: String,
    /// Second station set for matrix comparison
    #[arg(long = "graph-stations2", default_value = "")]
    stations2: String,
    /// Chart days: "all", "1;2", or "#"-separated per-station patterns
    #[arg(long = "graph-days", default_value = "")]
    days: String,
    /// Aggregation mode, M (mean) or A (accumulated)
    #[arg(long = "graph-mode", default_value = "M")]
    mode: String,
    /// Omit the frequency series on the day histogram
    #[arg(long = "graph-no-freq")]
    no_freq: bool,
    /// Matrix delta for matrix comparison
    #[arg(long = "graph-mats-delta", default_value = "")]
    mats_delta: String,
}

impl GraphOptions {
    fn params(&self) -> AppResult<GraphParams> {
        graph_params(
            &self.stations,
            &self.stations2,
            &self.days,
            &self.mode,
            self.no_freq,
            &self.mats_delta,
        )
    }
}

#[derive(Args)]
struct SimulateArgs {
    run_id: String,
    /// Folder holding the uploaded input CSVs
    #[arg(long)]
    input: Option<String>,
    /// Simulation name (defaults to the context's name)
    #[arg(long)]
    name: Option<String>,
    /// Stress percentage, 0 to 100
    #[arg(long)]
    stress: Option<f64>,
    /// Walking cost percentage, 0 to 100
    #[arg(long)]
    walk_cost: Option<f64>,
    /// Stress type, 0 to 3
    #[arg(long)]
    stress_type: Option<u8>,
    /// Day list to simulate (every day when unset)
    #[arg(long)]
    days: Option<String>,
}

#[derive(Subcommand)]
enum ContextCommands {
    /// Create an empty context for a run
    New {
        run_id: String,
        /// Display name (defaults to the run id)
        #[arg(long)]
        name: Option<String>,
    },
    /// List stored contexts
    List,
    /// Print a context as JSON
    Show { run_id: String },
    /// Toggle the favourite flag of a map or graph
    Favorite {
        run_id: String,
        artifact_id: String,
    },
    /// Write a context to a .json or .yaml file
    Export { run_id: String, path: PathBuf },
    /// Read a context from a .json or .yaml file
    Import {
        path: PathBuf,
        /// Replace an existing context with the same run id
        #[arg(long)]
        replace: bool,
    },
    /// Add the entries of a backend results listing (JSON array) to a context
    Register { run_id: String, listing: PathBuf },
    /// Delete a stored context
    Delete { run_id: String },
}

fn main() -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();
    let delta = cli.delta.unwrap_or(settings.default_delta);

    match cli.command {
        Commands::Instant { day, time } => cmd_instant(delta, day, &time),
        Commands::Duration { from, to } => cmd_duration(delta, &from, &to),
        Commands::Snap { minute } => {
            println!("{}", snap_minute(minute, delta));
            Ok(())
        }
        Commands::Instants { raw } => {
            let instants = parse_instant_set(&raw.join(" "));
            println!("{}", Absent::INSTANTS.render(instants.to_canonical()).unwrap_or_default());
            Ok(())
        }
        Commands::Stations { raw, days } => cmd_stations(&raw, days.as_deref()),
        Commands::Filter(args) => cmd_filter(&args),
        Commands::Graph(args) => cmd_graph(&args),
        Commands::Request(args) => cmd_request(&settings, &args),
        Commands::Simulate(args) => cmd_simulate(&settings, cli.delta, &args),
        Commands::Compare {
            folder1,
            folder2,
            name,
        } => cmd_compare(&settings, folder1, folder2, name.as_deref()),
        Commands::Context(cmd) => {
            let store = context_service::open_store(&settings)?;
            match cmd {
                ContextCommands::New { run_id, name } => {
                    cmd_context_new(&store, &settings, cli.delta, &run_id, name)
                }
                ContextCommands::List => cmd_context_list(&store),
                ContextCommands::Show { run_id } => cmd_context_show(&store, &run_id),
                ContextCommands::Favorite {
                    run_id,
                    artifact_id,
                } => cmd_context_favorite(&store, &run_id, &artifact_id),
                ContextCommands::Export { run_id, path } => {
                    context_service::export_context(&store, &run_id, &path)?;
                    println!("✓ Exported {} to {}", run_id, path.display());
                    Ok(())
                }
                ContextCommands::Import { path, replace } => {
                    cmd_context_import(&store, &path, replace)
                }
                ContextCommands::Register { run_id, listing } => {
                    cmd_context_register(&store, &run_id, &listing)
                }
                ContextCommands::Delete { run_id } => {
                    context_service::delete_context(&store, &run_id)?;
                    println!("✓ Deleted {}", run_id);
                    Ok(())
                }
            }
        }
    }
}

fn parse_time(text: &str) -> AppResult<(u32, u32)> {
    let invalid = || AppError::InvalidInput(format!("expected HH:MM, got {text:?}"));
    let (h, m) = text.trim().split_once(':').ok_or_else(invalid)?;
    let hour = h.trim().parse().map_err(|_| invalid())?;
    let minute = m.trim().parse().map_err(|_| invalid())?;
    Ok((hour, minute))
}

fn parse_datetime(text: &str) -> AppResult<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .map_err(|_| AppError::InvalidInput(format!("expected \"YYYY-MM-DD HH:MM\", got {text:?}")))
}

fn cmd_instant(delta: u32, day: i64, time: &str) -> AppResult<()> {
    let grid = TimeSlotGrid::new(delta)?;
    let (hour, minute) = parse_time(time)?;
    let instant = grid.compute_instant(day, hour, minute)?;
    println!("{}", instant);
    Ok(())
}

fn cmd_duration(delta: u32, from: &str, to: &str) -> AppResult<()> {
    let from = parse_datetime(from)?;
    let to = parse_datetime(to)?;

    let mut builder = InstantBuilder::new(TimeSlotGrid::new(delta)?);
    builder.set_range(from.date(), to.date())?;
    builder.pick_hour(from.hour())?;
    builder.pick_minute(from.minute())?;
    builder.pick_hour(to.hour())?;
    let duration = builder
        .pick_minute(to.minute())?
        .ok_or_else(|| AppError::InvalidInput("selection did not complete".to_string()))?;

    println!("{}", duration);
    Ok(())
}

fn cmd_stations(raw: &str, days: Option<&str>) -> AppResult<()> {
    let stations = parse_station_set(raw);
    let Some(days) = days else {
        println!("{}", stations);
        return Ok(());
    };
    let days = DaysSpec::parse(days)
        .ok_or_else(|| AppError::InvalidInput(format!("invalid day list: {days:?}")))?;
    let scoped = days
        .scope_stations(&stations)
        .ok_or_else(|| AppError::InvalidInput("no stations given".to_string()))?;
    println!("{}", scoped);
    Ok(())
}

fn cmd_filter(args: &FilterArgs) -> AppResult<()> {
    let config = args.config()?;
    let compiled = build_filter(config.kind, &config.state);
    if compiled.is_none() {
        tracing::warn!(kind = %config.kind, "required filter fields are blank");
    }
    println!("{}", Absent::FILTER.render(compiled).unwrap_or_default());
    Ok(())
}

fn cmd_graph(args: &GraphArgs) -> AppResult<()> {
    let kind = args.kind.parse::<GraphKind>()?;
    let arg = if args.quick {
        quick_graph_arg(kind, &parse_station_set(&args.stations).to_vec())
    } else {
        build_graph_arg(kind, &args.params()?)
    };
    let value = match arg {
        Some(arg) => arg.to_value()?,
        None => Absent::ARGUMENT.encode(None::<String>),
    };
    println!("{}", value);
    Ok(())
}

fn parse_displacement(text: &str) -> AppResult<DisplacementMap> {
    let parts: Vec<&str> = text.split(';').map(str::trim).collect();
    let [instants @ .., origin, destination, movement, kind] = parts.as_slice() else {
        return Err(AppError::InvalidInput(format!(
            "displacement needs instants;origin;destination;movement;type, got {text:?}"
        )));
    };
    let movement = match *movement {
        "1" => Some(Movement::Entries),
        "-1" => Some(Movement::Exits),
        _ => None,
    };
    let trip_kind = match *kind {
        "1" => Some(TripKind::Real),
        "0" => Some(TripKind::Fictional),
        _ => None,
    };
    Ok(DisplacementMap {
        instants: instants.join(";"),
        delta_origin: origin.to_string(),
        delta_destination: destination.to_string(),
        movement,
        trip_kind,
    })
}

fn load_or_fresh(store: &ContextStore, run_id: &str) -> AppResult<Option<SimulationContext>> {
    match context_service::show_context(store, run_id) {
        Ok(context) => Ok(Some(context)),
        Err(AppError::ContextNotFound(_)) => {
            tracing::warn!(%run_id, "no stored context, using defaults");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn request_targets(args: &RequestArgs) -> AppResult<Vec<AnalysisTarget>> {
    let mut targets = Vec::new();
    for (kind, instants) in [
        (MapKind::Density, &args.density),
        (MapKind::Voronoi, &args.voronoi),
        (MapKind::Circle, &args.circle),
    ] {
        if let Some(instants) = instants {
            let instants = parse_instant_set(instants).to_canonical();
            let spec = SnapshotMap {
                instants: Absent::INSTANTS.render(instants).unwrap_or_default(),
                stations: parse_station_set(&args.map_stations).to_string(),
                labels: args.labels,
            };
            targets.push(AnalysisTarget::Map(kind, MapSpec::Snapshot(spec)));
        }
    }
    if let Some(text) = &args.displacement {
        let spec = MapSpec::Displacement(parse_displacement(text)?);
        targets.push(AnalysisTarget::Map(MapKind::Displacement, spec));
    }

    let params = args.graph.params()?;
    for key in &args.graphs {
        targets.push(AnalysisTarget::Graph(key.parse()?, params.clone()));
    }
    Ok(targets)
}

fn request_options(args: &RequestArgs) -> RequestOptions {
    let filter = args.filter_kind.map(|kind| FilterConfig {
        kind: kind.into(),
        state: UnifiedFilterState {
            value: args.filter_value.clone(),
            day_pct: args.filter_day_pct.clone(),
            allowed_fail_days: args.filter_fail_days.clone(),
            ..UnifiedFilterState::default()
        },
    });
    RequestOptions {
        matrix: args.matrix,
        filter,
        filter_maps: args.filter_maps,
        filter_graphs: args.filter_graphs,
    }
}

/// Payloads to print: the whole request, or with `split` one per chart
/// preceded by a maps-only request when maps were asked for.
fn request_payloads(context: &SimulationContext, args: &RequestArgs) -> AppResult<Vec<Value>> {
    let targets = request_targets(args)?;
    let request = build_analysis_request(context, &request_options(args), &targets)?;
    if !args.split || request.graphs.is_empty() {
        return Ok(vec![request.to_payload()?]);
    }

    let mut payloads = Vec::new();
    if !request.maps.is_empty() {
        let mut maps_only = request.clone();
        maps_only.graphs.clear();
        payloads.push(maps_only.to_payload()?);
    }
    for part in request.split_per_graph() {
        payloads.push(part.to_payload()?);
    }
    Ok(payloads)
}

fn cmd_request(settings: &Settings, args: &RequestArgs) -> AppResult<()> {
    let store = context_service::open_store(settings)?;
    let context = load_or_fresh(&store, &args.run_id)?
        .unwrap_or_else(|| SimulationContext::for_run(&args.run_id, Utc::now()));

    let payloads = request_payloads(&context, args)?;
    eprintln!("POST {} ({} payloads)", settings.analysis_url(), payloads.len());
    for payload in payloads {
        println!("{:#}", payload);
    }
    Ok(())
}

/// Apply command line overrides on top of the context's parameters.
fn apply_simulation_overrides(
    context: &mut SimulationContext,
    args: &SimulateArgs,
    delta: Option<u32>,
) {
    let params = &mut context.config.parameters;
    if let Some(delta) = delta {
        params.delta = delta;
    }
    if let Some(stress) = args.stress {
        params.stress = stress;
    }
    if let Some(walk_cost) = args.walk_cost {
        params.walk_cost = walk_cost;
    }
    if let Some(stress_type) = args.stress_type {
        params.stress_type = stress_type;
    }
    if let Some(days) = &args.days {
        params.dias = Some(days.clone());
    }
    if let Some(name) = &args.name {
        context.meta.sim_name = name.clone();
    }
    if let Some(input) = &args.input {
        let advanced = context.config.advanced.get_or_insert_with(Default::default);
        advanced.custom_input_folder = Some(input.clone());
    }
}

fn cmd_simulate(settings: &Settings, delta: Option<u32>, args: &SimulateArgs) -> AppResult<()> {
    let store = context_service::open_store(settings)?;
    let mut context = match load_or_fresh(&store, &args.run_id)? {
        Some(context) => context,
        None => {
            let mut context = SimulationContext::for_run(&args.run_id, Utc::now());
            context.config.parameters.delta =
                context_service::resolve_delta(&args.run_id, delta, settings)?;
            context
        }
    };
    apply_simulation_overrides(&mut context, args, delta);

    let payload = build_simulation_request(&context)?.to_payload()?;
    eprintln!("POST {}", settings.simulation_url());
    println!("{:#}", payload);
    Ok(())
}

fn cmd_compare(
    settings: &Settings,
    folder1: String,
    folder2: String,
    name: Option<&str>,
) -> AppResult<()> {
    let request = SubtractionRequest::new(folder1, folder2).with_name(name.unwrap_or_default());
    let payload = request.to_payload()?;
    eprintln!("POST {}", settings.subtraction_url());
    println!("{:#}", payload);
    Ok(())
}

fn cmd_context_new(
    store: &ContextStore,
    settings: &Settings,
    delta: Option<u32>,
    run_id: &str,
    name: Option<String>,
) -> AppResult<()> {
    let now = Utc::now();
    let mut context = context_service::create_context(store, settings, run_id, delta, now)?;
    if let Some(name) = name {
        let patch = bs_context::ContextPatch {
            meta: Some(MetaPatch {
                sim_name: Some(name),
                version: None,
            }),
            ..Default::default()
        };
        let update = ContextUpdate::Merge(patch);
        context = context_service::update_context(store, run_id, update, now)?;
    }
    println!(
        "✓ Created context {} (delta {} min)",
        context.meta.run_id, context.config.parameters.delta
    );
    Ok(())
}

fn cmd_context_list(store: &ContextStore) -> AppResult<()> {
    let summaries = context_service::list_contexts(store)?;
    if summaries.is_empty() {
        println!("No contexts found in {}", store.root_dir().display());
        return Ok(());
    }
    println!("Contexts:");
    for s in summaries {
        println!(
            "  {} - {} [{}] delta {} min, {} artifacts ({} favourites), modified {}",
            s.run_id,
            s.sim_name,
            if s.city.is_empty() { "-" } else { &s.city },
            s.delta,
            s.artifact_count,
            s.favorite_count,
            s.last_modified.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

/// JSON for stdout and a note for stderr, so the output pipes into JSON tools.
fn show_report(context: &SimulationContext) -> AppResult<(String, String)> {
    let json = serde_json::to_value(context).map_err(|e| AppError::Context(e.to_string()))?;
    let note = format!("Output delta: {} min", context_service::output_delta(context));
    Ok((format!("{:#}", json), note))
}

fn cmd_context_show(store: &ContextStore, run_id: &str) -> AppResult<()> {
    let context = context_service::show_context(store, run_id)?;
    let (json, note) = show_report(&context)?;
    println!("{}", json);
    eprintln!("{}", note);
    Ok(())
}

fn cmd_context_favorite(store: &ContextStore, run_id: &str, artifact_id: &str) -> AppResult<()> {
    let favorite = context_service::toggle_favorite(store, run_id, artifact_id, Utc::now())?;
    if favorite {
        println!("★ {} marked as favourite", artifact_id);
    } else {
        println!("☆ {} removed from favourites", artifact_id);
    }
    Ok(())
}

fn cmd_context_import(store: &ContextStore, path: &Path, replace: bool) -> AppResult<()> {
    let run_id = context_service::import_context(store, path, replace)?;
    println!("✓ Imported {} from {}", run_id, path.display());
    Ok(())
}

fn cmd_context_register(store: &ContextStore, run_id: &str, listing: &Path) -> AppResult<()> {
    let items = context_service::read_listing(listing)?;
    let count = context_service::register_artifacts(store, run_id, items, Utc::now())?;
    println!("✓ Registered {} artifacts in {}", count, run_id);
    Ok(())
}
