//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use notetree_core::error::AppError;
use notetree_core::types::FolderId;
use notetree_entity::folder::{Folder, FolderNode};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List every folder, level by level
    List,
    /// Show the folder tree
    Tree,
    /// Create a new folder
    Create {
        /// Folder name
        name: String,
        /// Parent folder ID (omit for root)
        #[arg(short, long)]
        parent: Option<FolderId>,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: FolderId,
        /// New name
        name: String,
    },
    /// Move a folder under a new parent
    Move {
        /// Folder ID
        id: FolderId,
        /// New parent folder ID (omit to move to root)
        #[arg(short, long)]
        parent: Option<FolderId>,
    },
    /// Delete a folder with its subfolders and notes
    Delete {
        /// Folder ID
        id: FolderId,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Recompute cached folder levels from the hierarchy
    Repair,
    /// Show the path from the root to a folder
    Breadcrumbs {
        /// Folder ID
        id: FolderId,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Parent ID
    parent_id: String,
    /// Level
    level: u32,
    /// Created at
    created_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            parent_id: f.parent_id.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
            level: f.level,
            created_at: f.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let service = super::folder_service(&config).await?;

    match &args.command {
        FolderCommand::List => {
            let folders = service.list_folders().await?;
            let rows: Vec<FolderRow> = folders.iter().map(FolderRow::from).collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Tree => {
            let tree = service.fetch_all_folders().await?;
            match format {
                OutputFormat::Json => output::print_item(&tree, format),
                OutputFormat::Table => {
                    if tree.is_empty() {
                        println!("No folders.");
                    }
                    for line in render_tree(&tree) {
                        println!("{line}");
                    }
                }
            }
        }
        FolderCommand::Create { name, parent } => {
            let folder = service.create_folder(name, *parent).await?;
            output::print_success(&format!(
                "Folder '{}' created (id: {}, level: {})",
                folder.name, folder.id, folder.level
            ));
        }
        FolderCommand::Rename { id, name } => {
            service.rename_folder(*id, name).await?;
            output::print_success(&format!("Folder {id} renamed to '{}'", name.trim()));
        }
        FolderCommand::Move { id, parent } => {
            service.move_folder(*id, *parent).await?;
            match parent {
                Some(parent) => output::print_success(&format!("Folder {id} moved under {parent}")),
                None => output::print_success(&format!("Folder {id} moved to root")),
            }
        }
        FolderCommand::Delete { id, force } => {
            let folder = service.get_folder(*id).await?;
            let preview = service.preview_delete(*id).await?;

            if !force {
                let prompt = format!(
                    "Delete '{}' with {} subfolder(s) and {} note(s)?",
                    folder.name,
                    preview.folder_ids.len() - 1,
                    preview.note_count
                );
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(prompt)
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            service.delete_folder(*id).await?;
            output::print_success(&format!(
                "Deleted {} folder(s) and {} note(s)",
                preview.folder_ids.len(),
                preview.note_count
            ));
        }
        FolderCommand::Repair => {
            let repaired = service.repair_levels().await?;
            if repaired == 0 {
                output::print_success("All folder levels are consistent");
            } else {
                output::print_warning(&format!("Repaired {repaired} folder level(s)"));
            }
        }
        FolderCommand::Breadcrumbs { id } => {
            let crumbs = service.get_breadcrumbs(*id).await?;
            match format {
                OutputFormat::Json => {
                    let rows: Vec<FolderRow> = crumbs.iter().map(FolderRow::from).collect();
                    output::print_list(&rows, format);
                }
                OutputFormat::Table => {
                    let names: Vec<&str> = crumbs.iter().map(|f| f.name.as_str()).collect();
                    println!("{}", names.join(" / "));
                }
            }
        }
    }

    Ok(())
}

/// Render the forest as indented tree lines.
fn render_tree(roots: &[FolderNode]) -> Vec<String> {
    let mut lines = Vec::new();
    for root in roots {
        lines.push(format!("{}/", root.name()));

        let mut stack = Vec::new();
        push_children(&mut stack, &root.children, "");
        while let Some((node, prefix, last)) = stack.pop() {
            let branch = if last { "└── " } else { "├── " };
            lines.push(format!("{prefix}{branch}{}/", node.name()));

            let next = format!("{prefix}{}", if last { "    " } else { "│   " });
            push_children(&mut stack, &node.children, &next);
        }
    }
    lines
}

/// Queue children so the first one is popped first.
fn push_children<'a>(
    stack: &mut Vec<(&'a FolderNode, String, bool)>,
    children: &'a [FolderNode],
    prefix: &str,
) {
    for (i, node) in children.iter().enumerate().rev() {
        stack.push((node, prefix.to_string(), i + 1 == children.len()));
    }
}
