use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use sv_app::{AppError, AppResult, GroupView, SelectionSession, SelectorConfig, load_batch, snapshot};
use sv_core::SortDirection;
use sv_grouping::{Dimension, GroupOrder, SelectionEvent};
use sv_state::{DatasetSelection, JsonFileStorage, KeyValueStorage, MemoryStorage, StateKeys};
use tracing::info;

#[derive(Parser)]
#[command(name = "sv-cli")]
#[command(about = "SensorView CLI - group and select sensor timeseries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group a batch of timeseries records and print the groups
    Group {
        #[command(flatten)]
        input: InputArgs,
        /// Print groups as JSON
        #[arg(long)]
        json: bool,
        /// Expand these groups in the listing (repeatable)
        #[arg(long = "expand", value_name = "LABEL")]
        expand: Vec<String>,
    },
    /// Toggle the selection of individual records
    Toggle {
        #[command(flatten)]
        input: InputArgs,
        /// Record ids to toggle, in order
        #[arg(required = true)]
        record_ids: Vec<String>,
    },
    /// Toggle every record of one group
    ToggleGroup {
        #[command(flatten)]
        input: InputArgs,
        /// Group label
        label: String,
    },
    /// Inspect or reset the persisted selection
    #[command(subcommand)]
    Selection(SelectionCommands),
}

#[derive(Args)]
struct InputArgs {
    /// Record batch JSON file (array of records, or {records, failed})
    batch_path: PathBuf,
    /// Selector config YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Keep groups sorted by label value
    #[arg(long)]
    ordered: bool,
    /// Sort groups ascending
    #[arg(long, conflicts_with = "descending")]
    ascending: bool,
    /// Sort groups descending
    #[arg(long)]
    descending: bool,
    /// Dimension to group by
    #[arg(long, value_enum)]
    by: Option<DimensionArg>,
    /// Directory holding the persisted selection (in-memory when omitted)
    #[arg(long)]
    state_dir: Option<PathBuf>,
    /// Which selection the records belong to
    #[arg(long, value_enum, default_value_t = KindArg::Timeseries)]
    kind: KindArg,
}

#[derive(Subcommand)]
enum SelectionCommands {
    /// List selected dataset ids
    List {
        #[arg(long)]
        state_dir: PathBuf,
        #[arg(long, value_enum, default_value_t = KindArg::Timeseries)]
        kind: KindArg,
    },
    /// Deselect everything
    Clear {
        #[arg(long)]
        state_dir: PathBuf,
        #[arg(long, value_enum, default_value_t = KindArg::Timeseries)]
        kind: KindArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DimensionArg {
    Category,
    Phenomenon,
}

impl From<DimensionArg> for Dimension {
    fn from(arg: DimensionArg) -> Self {
        match arg {
            DimensionArg::Category => Dimension::Category,
            DimensionArg::Phenomenon => Dimension::Phenomenon,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Timeseries,
    Trajectory,
    Profile,
}

impl KindArg {
    fn keys(self) -> StateKeys {
        match self {
            KindArg::Timeseries => StateKeys::TIMESERIES,
            KindArg::Trajectory => StateKeys::TRAJECTORIES,
            KindArg::Profile => StateKeys::PROFILES,
        }
    }
}

type Session = SelectionSession<Box<dyn KeyValueStorage>>;

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Group {
            input,
            json,
            expand,
        } => cmd_group(&input, json, &expand),
        Commands::Toggle { input, record_ids } => cmd_toggle(&input, &record_ids),
        Commands::ToggleGroup { input, label } => cmd_toggle_group(&input, &label),
        Commands::Selection(sel_cmd) => match sel_cmd {
            SelectionCommands::List { state_dir, kind } => cmd_selection_list(&state_dir, kind),
            SelectionCommands::Clear { state_dir, kind } => cmd_selection_clear(&state_dir, kind),
        },
    }
}

fn resolve_config(input: &InputArgs) -> AppResult<SelectorConfig> {
    let mut config = match &input.config {
        Some(path) => SelectorConfig::load(path)?,
        None => SelectorConfig::default(),
    };
    if input.ordered {
        config.order_groups = true;
    }
    if input.ascending {
        config.sort_ascending = true;
    }
    if input.descending {
        config.sort_ascending = false;
    }
    Ok(config)
}

fn open_storage(state_dir: Option<&Path>) -> AppResult<Box<dyn KeyValueStorage>> {
    let storage: Box<dyn KeyValueStorage> = match state_dir {
        Some(dir) => Box::new(JsonFileStorage::new(dir.to_path_buf())?),
        None => Box::new(MemoryStorage::new()),
    };
    Ok(storage)
}

/// Build a session and feed it the batch, printing any restored selections.
fn open_session(input: &InputArgs) -> AppResult<Session> {
    let config = resolve_config(input)?;
    let storage = open_storage(input.state_dir.as_deref())?;
    let selection = DatasetSelection::load(storage, input.kind.keys())?;
    let batch = load_batch(&input.batch_path)?;

    let mut session = SelectionSession::new(config, selection);
    if let Some(by) = input.by {
        session.set_filter_dimension(by.into());
    }
    session.on_group_set_changed(|engine| {
        info!(
            records = engine.len(),
            categories = engine.groups(Dimension::Category).len(),
            phenomena = engine.groups(Dimension::Phenomenon).len(),
            "group set changed"
        );
    });
    session.ingest(batch, &mut print_event)?;
    Ok(session)
}

fn print_event(event: SelectionEvent) {
    match event {
        SelectionEvent::Selected(id) => println!("+ {}", id),
        SelectionEvent::Deselected(id) => println!("- {}", id),
    }
}

fn cmd_group(input: &InputArgs, json: bool, expand: &[String]) -> AppResult<()> {
    let mut session = open_session(input)?;
    for label in expand {
        session.toggle_collapsed(label)?;
    }
    let dimension = session.config().filter_dimension;
    let groups = snapshot(session.engine(), dimension)?;

    if json {
        let out = serde_json::to_string_pretty(&groups)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    print_groups(dimension, session.engine().order(), &groups);
    Ok(())
}

fn cmd_toggle(input: &InputArgs, record_ids: &[String]) -> AppResult<()> {
    let mut session = open_session(input)?;
    for id in record_ids {
        let key = session.find(id)?;
        session.toggle(key, &mut print_event)?;
    }
    print_selected(&session);
    Ok(())
}

fn cmd_toggle_group(input: &InputArgs, label: &str) -> AppResult<()> {
    let mut session = open_session(input)?;
    let dimension = session.config().filter_dimension;
    session.toggle_all(dimension, label, &mut print_event)?;
    print_selected(&session);
    Ok(())
}

fn cmd_selection_list(state_dir: &Path, kind: KindArg) -> AppResult<()> {
    let storage = JsonFileStorage::new(state_dir.to_path_buf())?;
    let selection = DatasetSelection::load(storage, kind.keys())?;

    if !selection.has_datasets() {
        println!("No datasets selected");
        return Ok(());
    }

    println!("Selected datasets:");
    for id in selection.dataset_ids() {
        match selection.options(id) {
            Some(options) => println!(
                "  {} (visible: {}, saved {})",
                id, options.visible, options.saved_at
            ),
            None => println!("  {}", id),
        }
    }
    Ok(())
}

fn cmd_selection_clear(state_dir: &Path, kind: KindArg) -> AppResult<()> {
    let storage = JsonFileStorage::new(state_dir.to_path_buf())?;
    let mut selection = DatasetSelection::load(storage, kind.keys())?;
    let count = selection.dataset_ids().len();
    selection.remove_all()?;
    println!("✓ Cleared {} selected datasets", count);
    Ok(())
}

fn print_groups(dimension: Dimension, order: GroupOrder, groups: &[GroupView]) {
    let order_label = match order {
        GroupOrder::FirstSeen => "first seen",
        GroupOrder::Sorted(SortDirection::Ascending) => "ascending",
        GroupOrder::Sorted(SortDirection::Descending) => "descending",
    };

    if groups.is_empty() {
        println!("No records");
        return;
    }

    println!("Groups by {} ({}):", dimension, order_label);
    for group in groups {
        let mark = if group.all_selected {
            "[x]"
        } else if group.has_selected_items {
            "[~]"
        } else {
            "[ ]"
        };
        println!("{} {} ({} members)", mark, group.label, group.members.len());
        if group.collapsed {
            continue;
        }
        for member in &group.members {
            let secondary = match dimension {
                Dimension::Category => &member.phenomenon,
                Dimension::Phenomenon => &member.category,
            };
            let mark = if member.selected { "x" } else { " " };
            println!("    [{}] {}  {}", mark, member.id, secondary);
        }
    }
}

fn print_selected(session: &Session) {
    let ids = session.engine().selected_ids();
    if ids.is_empty() {
        println!("No records selected");
    } else {
        println!("Selected: {}", ids.join(", "));
    }
}
