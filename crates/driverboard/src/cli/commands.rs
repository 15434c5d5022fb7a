//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::driver::{DriverId, Field};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Add command arguments. Values are sent as typed.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Driver name
    #[arg(long)]
    pub name: String,

    /// Number of races won
    #[arg(long)]
    pub races_won: String,

    /// Favorite track
    #[arg(long)]
    pub fav_track: String,

    /// Racing team
    #[arg(long)]
    pub team_name: String,

    /// URL of the driver's photo
    #[arg(long)]
    pub photo_url: String,

    /// Output format for the refreshed list
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

impl AddCommand {
    /// Form inputs in field order.
    #[must_use]
    pub fn inputs(&self) -> [(Field, &str); 5] {
        [
            (Field::Name, self.name.as_str()),
            (Field::RacesWon, self.races_won.as_str()),
            (Field::FavTrack, self.fav_track.as_str()),
            (Field::TeamName, self.team_name.as_str()),
            (Field::PhotoUrl, self.photo_url.as_str()),
        ]
    }
}

/// Edit command arguments. Fields not given keep their current value.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the driver to edit
    pub id: DriverId,

    /// New driver name
    #[arg(long)]
    pub name: Option<String>,

    /// New number of races won
    #[arg(long)]
    pub races_won: Option<String>,

    /// New favorite track
    #[arg(long)]
    pub fav_track: Option<String>,

    /// New racing team
    #[arg(long)]
    pub team_name: Option<String>,

    /// New photo URL
    #[arg(long)]
    pub photo_url: Option<String>,

    /// Output format for the refreshed list
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

impl EditCommand {
    /// The inputs to overwrite, in field order.
    #[must_use]
    pub fn changes(&self) -> Vec<(Field, &str)> {
        [
            (Field::Name, &self.name),
            (Field::RacesWon, &self.races_won),
            (Field::FavTrack, &self.fav_track),
            (Field::TeamName, &self.team_name),
            (Field::PhotoUrl, &self.photo_url),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the driver to delete
    pub id: DriverId,

    /// Output format for the refreshed list
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Render command arguments.
#[derive(Debug, Args)]
pub struct RenderCommand {
    /// Write the page to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON array of drivers
    Json,
    /// Markup of the list container
    Html,
}
