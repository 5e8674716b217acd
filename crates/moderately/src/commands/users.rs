//! Users command.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use console::Style;
use moderately_client::ListUsersQuery;

use super::{Context, PageArgs, print_header, print_json, print_page_footer};

/// Arguments for the users command.
#[derive(Args, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List users in the team
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
}

/// Run the users command.
pub async fn run(args: UsersArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let dim = Style::new().dim();

    match args.command {
        UsersCommand::List { paging } => {
            let page = client
                .users()
                .list(ListUsersQuery {
                    page: Some(paging.page),
                    page_size: Some(paging.page_size),
                    ..Default::default()
                })
                .await
                .context("Failed to list users")?;

            if ctx.json_output {
                return print_json(&page);
            }

            print_header("Users");
            if page.is_empty() {
                println!("{}", dim.apply_to("No users found"));
                return Ok(());
            }
            for user in &page.items {
                let marker = if user.is_recent() { " (new)" } else { "" };
                println!(
                    "{}  {}{}  {}",
                    dim.apply_to(&user.user_id),
                    user.display_name(),
                    marker,
                    dim.apply_to(user.email.as_deref().unwrap_or("")),
                );
            }
            print_page_footer(&page.pagination);
        }
    }

    Ok(())
}
