//! Teams command.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use console::Style;
use moderately_client::ListTeamsQuery;

use super::{Context, PageArgs, print_header, print_json, print_page_footer};

/// Arguments for the teams command.
#[derive(Args, Debug)]
pub struct TeamsArgs {
    #[command(subcommand)]
    pub command: TeamsCommand,
}

#[derive(Subcommand, Debug)]
pub enum TeamsCommand {
    /// List teams
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
}

/// Run the teams command.
pub async fn run(args: TeamsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let dim = Style::new().dim();
    let green = Style::new().green();

    match args.command {
        TeamsCommand::List { paging } => {
            let page = client
                .teams()
                .list(ListTeamsQuery {
                    page: Some(paging.page),
                    page_size: Some(paging.page_size),
                    ..Default::default()
                })
                .await
                .context("Failed to list teams")?;

            if ctx.json_output {
                return print_json(&page);
            }

            print_header("Teams");
            if page.is_empty() {
                println!("{}", dim.apply_to("No teams found"));
                return Ok(());
            }
            for team in &page.items {
                let current = if team.team_id == client.team_id() {
                    green.apply_to(" *").to_string()
                } else {
                    String::new()
                };
                println!(
                    "{}  {}{}",
                    dim.apply_to(&team.team_id),
                    team.name.as_deref().unwrap_or("(unnamed)"),
                    current,
                );
            }
            print_page_footer(&page.pagination);
        }
    }

    Ok(())
}
