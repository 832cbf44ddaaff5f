//! Command-line definitions

use std::path::PathBuf;

use application::{DestinationList, ToolCall};
use clap::{Parser, Subcommand};
use domain::{CostMetric, TravelMode, VisitPolicy};

/// Routewise CLI
#[derive(Debug, Parser)]
#[command(name = "routewise-cli")]
#[command(author, version, about = "Route planning on top of AMap", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ./routewise.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print structured JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a place name to coordinates
    Geocode {
        /// Place name, e.g. "大雁塔"
        name: String,
    },

    /// Estimate a trip between two places
    Estimate {
        origin: String,
        destination: String,

        /// driving, walking, transit or bicycling
        #[arg(short, long, default_value = "driving")]
        mode: TravelMode,

        /// City for transit routing
        #[arg(long)]
        city: Option<String>,
    },

    /// Find the cheapest order to visit destinations
    ///
    /// Example: routewise-cli optimize 钟楼 大雁塔 回民街 --policy closed_loop
    Optimize {
        /// Starting point
        origin: String,

        /// Places to visit; comma-separated lists are split
        #[arg(required = true)]
        destinations: Vec<String>,

        /// driving or walking (default from configuration)
        #[arg(short, long)]
        mode: Option<TravelMode>,

        /// distance or duration (default from configuration)
        #[arg(long)]
        metric: Option<CostMetric>,

        /// open_path or closed_loop (default from configuration)
        #[arg(short, long)]
        policy: Option<VisitPolicy>,
    },

    /// Search for places by keyword
    Search {
        keywords: String,

        #[arg(long)]
        city: Option<String>,
    },

    /// Run a raw tool call given as JSON and print the reply as JSON
    ///
    /// Example: routewise-cli tool '{"tool": "resolve_coordinates", "name": "钟楼"}'
    Tool {
        /// Tool call JSON
        call: String,
    },
}

impl Commands {
    /// Translate into a tool call
    ///
    /// # Errors
    ///
    /// Returns the JSON error for a malformed `tool` argument.
    pub fn into_tool_call(self) -> Result<ToolCall, serde_json::Error> {
        Ok(match self {
            Self::Geocode { name } => ToolCall::ResolveCoordinates { name },
            Self::Estimate {
                origin,
                destination,
                mode,
                city,
            } => ToolCall::EstimateTravel {
                origin,
                destination,
                mode,
                city,
            },
            Self::Optimize {
                origin,
                destinations,
                mode,
                metric,
                policy,
            } => ToolCall::OptimizeRoute {
                origin,
                destinations: DestinationList::Text(destinations.join(",")),
                mode,
                metric,
                policy,
            },
            Self::Search { keywords, city } => ToolCall::SearchPlaces { keywords, city },
            Self::Tool { call } => serde_json::from_str(&call)?,
        })
    }

    /// Raw tool calls always answer in JSON
    pub const fn is_raw_tool(&self) -> bool {
        matches!(self, Self::Tool { .. })
    }
}

/// Log filter for the verbosity count; `None` keeps the configured one
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
