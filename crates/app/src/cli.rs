//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tally_domain::{PageRequest, SearchRequest};

/// Tally entity client.
#[derive(Debug, Parser)]
#[command(name = "tally", version, about = "Browse and edit project billing records")]
pub struct Cli {
    /// Configuration file (defaults to ./tally.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Server root URL, overriding the configuration.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Entity collection to operate on.
    #[command(subcommand)]
    pub entity: EntityCommand,
}

/// Entity collections.
#[derive(Debug, Subcommand)]
pub enum EntityCommand {
    /// Line items of bills.
    BillPositions {
        /// Operation.
        #[command(subcommand)]
        command: Command,
    },
    /// Bills of a project.
    Bills {
        /// Operation.
        #[command(subcommand)]
        command: Command,
    },
    /// Per-project settings.
    ProjectSettings {
        /// Operation.
        #[command(subcommand)]
        command: Command,
    },
}

/// Store operations.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List one page of the collection.
    List(PageArgs),
    /// Full-text search.
    Search {
        /// Query in the server's search syntax.
        query: String,
        /// Paging.
        #[command(flatten)]
        page: PageArgs,
    },
    /// Fetch one record.
    Get {
        /// Record id.
        id: String,
    },
    /// Create a record from JSON.
    Create {
        /// Record as JSON.
        json: String,
    },
    /// Replace a record from JSON (must contain the id).
    Update {
        /// Record as JSON.
        json: String,
    },
    /// Update the given fields of a record (must contain the id).
    Patch {
        /// Partial record as JSON.
        json: String,
    },
    /// Delete a record.
    Delete {
        /// Record id.
        id: String,
    },
}

/// Paging options.
#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// Zero-based page.
    #[arg(long, default_value_t = 0)]
    pub page: u32,
    /// Page size (defaults to the configured page size).
    #[arg(long)]
    pub size: Option<u32>,
    /// Sort expression such as `id,asc`.
    #[arg(long)]
    pub sort: Option<String>,
}

impl PageArgs {
    /// Builds the page request.
    #[must_use]
    pub fn page_request(&self, default_size: u32) -> PageRequest {
        PageRequest {
            page: self.page,
            size: self.size.unwrap_or(default_size),
            sort: self.sort.clone(),
        }
    }

    /// Builds a search request for `query`.
    #[must_use]
    pub fn search_request(&self, query: &str, default_size: u32) -> SearchRequest {
        SearchRequest::new(query).with_page(self.page_request(default_size))
    }
}
