//! Pipelines command - pipeline management.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use console::Style;
use moderately_client::ListPipelinesQuery;

use super::{Context, PageArgs, print_header, print_json, print_page_footer, print_success, truncate};

/// Arguments for the pipelines command.
#[derive(Args, Debug)]
pub struct PipelinesArgs {
    #[command(subcommand)]
    pub command: PipelinesCommand,
}

#[derive(Subcommand, Debug)]
pub enum PipelinesCommand {
    /// List pipelines
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show a pipeline
    Show {
        /// Pipeline ID
        id: String,
    },

    /// Delete a pipeline
    Delete {
        /// Pipeline ID
        id: String,
    },
}

/// Run the pipelines command.
pub async fn run(args: PipelinesArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let pipelines = client.pipelines();
    let dim = Style::new().dim();

    match args.command {
        PipelinesCommand::List { paging } => {
            let page = pipelines
                .list(ListPipelinesQuery {
                    page: Some(paging.page),
                    page_size: Some(paging.page_size),
                    ..Default::default()
                })
                .await
                .context("Failed to list pipelines")?;

            if ctx.json_output {
                return print_json(&page);
            }

            print_header("Pipelines");
            if page.is_empty() {
                println!("{}", dim.apply_to("No pipelines found"));
                return Ok(());
            }
            for pipeline in &page.items {
                println!(
                    "{}  {:<30} {}",
                    dim.apply_to(&pipeline.pipeline_id),
                    truncate(&pipeline.name, 30),
                    dim.apply_to(truncate(pipeline.description.as_deref().unwrap_or(""), 40)),
                );
            }
            print_page_footer(&page.pagination);
        }

        PipelinesCommand::Show { id } => {
            let pipeline = pipelines
                .retrieve(&id)
                .await
                .with_context(|| format!("Failed to get pipeline {}", id))?;
            if ctx.json_output {
                return print_json(&pipeline);
            }

            print_header(&pipeline.name);
            println!("ID:          {}", pipeline.pipeline_id);
            if let Some(description) = &pipeline.description {
                println!("Description: {}", description);
            }
            if let Some(created) = &pipeline.created_at {
                println!("Created:     {}", created);
            }
        }

        PipelinesCommand::Delete { id } => {
            pipelines
                .delete(&id)
                .await
                .with_context(|| format!("Failed to delete pipeline {}", id))?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "deleted": id }));
            }
            print_success(&format!("Deleted pipeline {}", dim.apply_to(&id)));
        }
    }

    Ok(())
}
