//! Datasets command - dataset management.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use console::Style;
use moderately_client::{CreateDatasetRequest, ListDatasetsQuery};

use super::{Context, PageArgs, print_header, print_json, print_page_footer, print_success, truncate};

/// Arguments for the datasets command.
#[derive(Args, Debug)]
pub struct DatasetsArgs {
    #[command(subcommand)]
    pub command: DatasetsCommand,
}

#[derive(Subcommand, Debug)]
pub enum DatasetsCommand {
    /// List datasets
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show a dataset
    Show {
        /// Dataset ID
        id: String,
    },

    /// Create a dataset
    Create {
        /// Dataset name
        name: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a dataset
    Delete {
        /// Dataset ID
        id: String,
    },
}

/// Run the datasets command.
pub async fn run(args: DatasetsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let datasets = client.datasets();
    let dim = Style::new().dim();

    match args.command {
        DatasetsCommand::List { paging } => {
            let page = datasets
                .list(ListDatasetsQuery {
                    page: Some(paging.page),
                    page_size: Some(paging.page_size),
                    ..Default::default()
                })
                .await
                .context("Failed to list datasets")?;

            if ctx.json_output {
                return print_json(&page);
            }

            print_header("Datasets");
            if page.is_empty() {
                println!("{}", dim.apply_to("No datasets found"));
                return Ok(());
            }
            for dataset in &page.items {
                println!(
                    "{}  {:<40} {:>8} rows  {}",
                    dim.apply_to(&dataset.dataset_id),
                    truncate(&dataset.name, 40),
                    dataset.record_count.unwrap_or(0),
                    dataset.processing_status.as_deref().unwrap_or("-"),
                );
            }
            print_page_footer(&page.pagination);
        }

        DatasetsCommand::Show { id } => {
            let dataset = datasets
                .retrieve(&id)
                .await
                .with_context(|| format!("Failed to get dataset {}", id))?;
            if ctx.json_output {
                return print_json(&dataset);
            }

            print_header(&dataset.name);
            println!("ID:          {}", dataset.dataset_id);
            if let Some(description) = &dataset.description {
                println!("Description: {}", description);
            }
            println!(
                "Records:     {}",
                dataset
                    .record_count
                    .map_or_else(|| "-".to_string(), |n| n.to_string())
            );
            println!(
                "Status:      {}",
                dataset.processing_status.as_deref().unwrap_or("-")
            );
            if let Some(version) = &dataset.current_data_version_id {
                println!("Data:        {}", version);
            }
            if let Some(version) = &dataset.current_schema_version_id {
                println!("Schema:      {}", version);
            }
            if dataset.has_error() {
                let red = Style::new().red();
                println!("{}", red.apply_to("Processing failed"));
            }
        }

        DatasetsCommand::Create { name, description } => {
            let dataset = datasets
                .create(CreateDatasetRequest { name, description })
                .await
                .context("Failed to create dataset")?;
            if ctx.json_output {
                return print_json(&dataset);
            }
            print_success(&format!(
                "Dataset created: {}",
                dim.apply_to(&dataset.dataset_id)
            ));
        }

        DatasetsCommand::Delete { id } => {
            datasets
                .delete(&id)
                .await
                .with_context(|| format!("Failed to delete dataset {}", id))?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "deleted": id }));
            }
            print_success(&format!("Deleted dataset {}", dim.apply_to(&id)));
        }
    }

    Ok(())
}
