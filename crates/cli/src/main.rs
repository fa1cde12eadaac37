use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use repertory_core::config::{REMEDY_SEARCH_LIMIT, SYMPTOM_SEARCH_LIMIT};
use repertory_core::{AnalysisService, EngineConfig, ReferenceStore};
use repertory_store::JsonStore;

#[derive(Parser)]
#[command(name = "repertory")]
#[command(about = "Repertory symptom-to-remedy analysis CLI")]
struct Cli {
    /// Directory holding the JSON reference data
    #[arg(long, env = "REPERTORY_DATA_DIR", default_value = "/repertory_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all repertory sections
    Sections,
    /// List the symptoms of one section
    Symptoms {
        /// Section identifier
        section_id: String,
    },
    /// Search symptoms by rubric text
    SearchSymptoms {
        /// Substring to look for (case-insensitive)
        query: String,
    },
    /// Search remedies by name or common name
    SearchRemedies {
        /// Substring to look for (case-insensitive)
        query: String,
    },
    /// Rank remedies against a symptom selection
    Analyze {
        /// Selected symptom identifiers
        symptom_ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let store = Arc::new(JsonStore::load(&cli.data_dir)?);
    let cfg = Arc::new(EngineConfig::default());

    match cli.command {
        Some(Commands::Sections) => {
            for section in store.list_sections().await? {
                println!("{}: {}", section.id, section.name);
            }
        }
        Some(Commands::Symptoms { section_id }) => {
            let symptoms = store.symptoms_in_section(&section_id).await?;
            if symptoms.is_empty() {
                println!("No symptoms found.");
            } else {
                for symptom in symptoms {
                    println!("{}: {}", symptom.id, symptom.symptom);
                }
            }
        }
        Some(Commands::SearchSymptoms { query }) => {
            for symptom in store.search_symptoms(&query, SYMPTOM_SEARCH_LIMIT).await? {
                println!("{}: {}", symptom.id, symptom.symptom);
            }
        }
        Some(Commands::SearchRemedies { query }) => {
            for remedy in store.search_remedies(&query, REMEDY_SEARCH_LIMIT).await? {
                match remedy.common_name {
                    Some(common) => println!("{}: {} ({})", remedy.id, remedy.name, common),
                    None => println!("{}: {}", remedy.id, remedy.name),
                }
            }
        }
        Some(Commands::Analyze { symptom_ids }) => {
            let service = AnalysisService::new(cfg, store);
            let analysis = service.analyze(&symptom_ids).await?;

            println!(
                "Symptoms: {}, remedies matched: {}",
                analysis.total_symptoms, analysis.total_remedies
            );
            for (rank, candidate) in analysis.results.iter().enumerate() {
                println!(
                    "{:>2}. {} - score {}, {}/{} symptoms, coverage {:.1}%",
                    rank + 1,
                    candidate.remedy.name,
                    candidate.total_score,
                    candidate.symptom_count,
                    analysis.total_symptoms,
                    candidate.coverage
                );
            }
        }
        None => {
            println!("Use 'repertory --help' for commands");
        }
    }

    Ok(())
}
