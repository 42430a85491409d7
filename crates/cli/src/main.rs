use anyhow::Context;
use bbweb_core::config::option_check_from_env_value;
use bbweb_core::constants::OPTION_CHECK_ENV_VAR;
use bbweb_core::{
    AnnotationFactory, AnnotationType, CoreConfig, DataSetOptions, ShipmentState, SpecimenGroup,
    SpecimenGroupData, SpecimenGroupDataSet,
};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bbweb")]
#[command(about = "Check biobank server objects against the bbweb domain rules")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an annotation type object
    CheckAnnotationType {
        /// JSON or YAML file holding the annotation type
        file: PathBuf,
    },
    /// Validate an annotation against its annotation type
    CheckAnnotation {
        /// JSON or YAML file holding the annotation type
        annotation_type_file: PathBuf,
        /// JSON or YAML file holding the annotation
        annotation_file: PathBuf,
    },
    /// Summarise a collection event type's specimen group data
    DataSetSummary {
        /// JSON or YAML file holding a list of study specimen groups
        specimen_groups_file: PathBuf,
        /// JSON or YAML file holding a list of specimen group data items
        items_file: PathBuf,
    },
    /// Check whether a shipment may move between two states
    ShipmentTransition {
        /// Current state (e.g. packed)
        from: String,
        /// Requested state (e.g. sent)
        to: String,
    },
}

/// Reads a server object from disk. `.yaml`/`.yml` files are parsed as YAML, anything else as
/// JSON.
fn read_object(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    let value: Value = if is_yaml {
        serde_yaml::from_str(&text).with_context(|| format!("invalid YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))?
    };
    Ok(value)
}

fn read_list(path: &Path) -> anyhow::Result<Vec<Value>> {
    match read_object(path)? {
        Value::Array(items) => Ok(items),
        _ => anyhow::bail!("{} must contain a list", path.display()),
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bbweb=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let option_check = option_check_from_env_value(std::env::var(OPTION_CHECK_ENV_VAR).ok())?;
    tracing::debug!(?option_check, "configuration resolved");
    let config = CoreConfig::new(option_check);

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::CheckAnnotationType { file }) => {
            let annotation_type = AnnotationType::create(&read_object(&file)?)?;
            println!(
                "Annotation type '{}' ({}) is valid",
                annotation_type.name, annotation_type.value_type
            );
            if !annotation_type.is_max_value_count_valid() {
                println!(
                    "Warning: max value count {:?} does not suit value type {}",
                    annotation_type.max_value_count, annotation_type.value_type
                );
            }
        }
        Some(Commands::CheckAnnotation {
            annotation_type_file,
            annotation_file,
        }) => {
            let annotation_type = AnnotationType::create(&read_object(&annotation_type_file)?)?;
            let annotation = AnnotationFactory::create(
                &read_object(&annotation_file)?,
                Some(&annotation_type),
                None,
            )?;

            println!(
                "{}: {}",
                annotation_type.name,
                annotation.display_value()
            );
            if !annotation.is_value_valid() {
                println!("Value is required but missing");
            }
            if !annotation.validate_selections(&annotation_type, &config)? {
                println!("Selections are not among the annotation type's options");
            }
        }
        Some(Commands::DataSetSummary {
            specimen_groups_file,
            items_file,
        }) => {
            let groups = read_list(&specimen_groups_file)?
                .iter()
                .map(SpecimenGroup::create)
                .collect::<Result<Vec<_>, _>>()?;
            let items = read_list(&items_file)?
                .iter()
                .map(SpecimenGroupData::create)
                .collect::<Result<Vec<_>, _>>()?;

            let data_set = SpecimenGroupDataSet::new(items, DataSetOptions::with_entities(groups))?;
            println!("{}", data_set.get_as_string());
        }
        Some(Commands::ShipmentTransition { from, to }) => {
            let from: ShipmentState = from.parse()?;
            let to: ShipmentState = to.parse()?;
            let state = from.transition(to)?;
            println!("{from} -> {state} is allowed");
        }
        None => {
            println!("Use 'bbweb --help' for commands");
        }
    }

    Ok(())
}
