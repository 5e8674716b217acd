//! Executions command - inspect and wait on pipeline executions.

use std::time::Duration;

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use moderately_client::{PipelineExecution, WaitOptions};

use super::{Context, print_header, print_json};

/// Arguments for the executions command.
#[derive(Args, Debug)]
pub struct ExecutionsArgs {
    #[command(subcommand)]
    pub command: ExecutionsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ExecutionsCommand {
    /// Show an execution
    Show {
        /// Execution ID
        id: String,

        /// Also fetch the output
        #[arg(long)]
        output: bool,
    },

    /// Wait for an execution to finish
    Wait {
        /// Execution ID
        id: String,

        /// Give up after this many seconds
        #[arg(long, default_value = "300")]
        timeout: u64,

        /// Seconds between status checks
        #[arg(long, default_value = "2")]
        interval: u64,
    },
}

/// Run the executions command.
pub async fn run(args: ExecutionsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let executions = client.pipeline_executions();

    match args.command {
        ExecutionsCommand::Show { id, output } => {
            let execution = executions
                .retrieve(&id)
                .await
                .with_context(|| format!("Failed to get execution {}", id))?;
            let result = if output && execution.is_completed() {
                Some(
                    executions
                        .output(&id)
                        .await
                        .with_context(|| format!("Failed to get output of {}", id))?,
                )
            } else {
                None
            };

            if ctx.json_output {
                return print_json(&serde_json::json!({
                    "execution": execution,
                    "output": result,
                }));
            }
            print_execution(&execution);
            if let Some(result) = result {
                println!();
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }

        ExecutionsCommand::Wait {
            id,
            timeout,
            interval,
        } => {
            let spinner = if ctx.json_output {
                ProgressBar::hidden()
            } else {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                spinner.set_message(format!("Waiting for {}", id));
                spinner.enable_steady_tick(Duration::from_millis(120));
                spinner
            };

            let result = executions
                .wait(
                    &id,
                    WaitOptions {
                        timeout: Duration::from_secs(timeout),
                        poll_interval: Duration::from_secs(interval.max(1)),
                    },
                )
                .await;
            spinner.finish_and_clear();
            let execution = result.with_context(|| format!("Failed waiting for {}", id))?;

            if ctx.json_output {
                print_json(&execution)?;
            } else {
                print_execution(&execution);
            }
            if !execution.is_completed() {
                bail!(
                    "Execution {} finished with status {}",
                    id,
                    execution.status.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    Ok(())
}

fn print_execution(execution: &PipelineExecution) {
    let status = execution.status.as_deref().unwrap_or("unknown");
    let styled = if execution.is_completed() {
        Style::new().green().apply_to(status)
    } else if execution.is_failed() || execution.is_cancelled() {
        Style::new().red().apply_to(status)
    } else {
        Style::new().yellow().apply_to(status)
    };

    print_header(&format!("Execution {}", execution.execution_id));
    println!("Status:   {}", styled);
    if let Some(progress) = execution.progress_percentage {
        println!("Progress: {:.0}%", progress);
    }
    if let Some(version) = &execution.configuration_version_id {
        println!("Config:   {}", version);
    }
    if let Some(started) = &execution.started_at {
        println!("Started:  {}", started);
    }
    if let Some(completed) = &execution.completed_at {
        println!("Finished: {}", completed);
    }
    if let Some(error) = &execution.error_message {
        println!("Error:    {}", Style::new().red().apply_to(error));
    }
}
