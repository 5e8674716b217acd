//! Files command - upload, download and manage files.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use console::Style;
use moderately_client::{ListFilesQuery, UploadFile};

use super::{
    Context, PageArgs, format_size, print_header, print_json, print_page_footer, print_success,
    truncate,
};

/// Arguments for the files command.
#[derive(Args, Debug)]
pub struct FilesArgs {
    #[command(subcommand)]
    pub command: FilesCommand,
}

#[derive(Subcommand, Debug)]
pub enum FilesCommand {
    /// List files
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// Upload a local file
    Upload {
        /// Path of the file to upload
        path: PathBuf,

        /// Display name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,

        /// MIME type (guessed from the extension if omitted)
        #[arg(long)]
        mime_type: Option<String>,
    },

    /// Download a file
    Download {
        /// File ID
        id: String,

        /// Where to write the file (defaults to the file's own name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a file
    Delete {
        /// File ID
        id: String,
    },
}

/// Run the files command.
pub async fn run(args: FilesArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let files = client.files();
    let dim = Style::new().dim();

    match args.command {
        FilesCommand::List { paging } => {
            let page = files
                .list(ListFilesQuery {
                    page: Some(paging.page),
                    page_size: Some(paging.page_size),
                    ..Default::default()
                })
                .await
                .context("Failed to list files")?;

            if ctx.json_output {
                return print_json(&page);
            }

            print_header("Files");
            if page.is_empty() {
                println!("{}", dim.apply_to("No files found"));
                return Ok(());
            }
            for file in &page.items {
                let name = file
                    .name
                    .as_deref()
                    .or(file.original_file_name.as_deref())
                    .unwrap_or("(unnamed)");
                println!(
                    "{}  {:<40} {:>10}  {}",
                    dim.apply_to(&file.file_id),
                    truncate(name, 40),
                    file.file_size.map(format_size).unwrap_or_default(),
                    file.status.as_deref().unwrap_or("-"),
                );
            }
            print_page_footer(&page.pagination);
        }

        FilesCommand::Upload {
            path,
            name,
            mime_type,
        } => {
            let mut upload = UploadFile::from_path(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if let Some(name) = name {
                upload = upload.name(name);
            }
            if let Some(mime_type) = mime_type {
                upload = upload.mime_type(mime_type);
            }
            if ctx.verbose {
                println!(
                    "{}",
                    dim.apply_to(format!(
                        "Uploading {} ({}, {})",
                        upload.file_name(),
                        format_size(upload.size()),
                        upload.resolved_mime_type()
                    ))
                );
            }

            let file = files.upload(upload).await.context("Upload failed")?;
            if ctx.json_output {
                return print_json(&file);
            }
            print_success(&format!("Uploaded {}", dim.apply_to(&file.file_id)));
        }

        FilesCommand::Download { id, output } => {
            let output = match output {
                Some(path) => path,
                None => {
                    let file = files
                        .retrieve(&id)
                        .await
                        .with_context(|| format!("Failed to look up file {}", id))?;
                    PathBuf::from(
                        file.original_file_name
                            .or(file.name)
                            .unwrap_or_else(|| id.clone()),
                    )
                }
            };

            let written = files
                .download_to(&id, &output)
                .await
                .with_context(|| format!("Failed to download file {}", id))?;
            if ctx.json_output {
                return print_json(&serde_json::json!({
                    "fileId": id,
                    "path": output,
                    "bytes": written,
                }));
            }
            print_success(&format!(
                "Saved {} to {}",
                format_size(written),
                output.display()
            ));
        }

        FilesCommand::Delete { id } => {
            files
                .delete(&id)
                .await
                .with_context(|| format!("Failed to delete file {}", id))?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "deleted": id }));
            }
            print_success(&format!("Deleted file {}", dim.apply_to(&id)));
        }
    }

    Ok(())
}
