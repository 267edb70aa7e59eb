use clap::{Parser, Subcommand};

use crate::domain::{AthleteId, TeamId};

#[derive(Parser, Debug)]
#[command(author, version, about = "seat-race ranking backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema if missing
    Init,
    /// Drop every table and recreate the schema
    Reset,
    /// Recompute and publish a team's rankings
    Recalculate {
        team_id: TeamId,
    },
    /// Print a team's latest rankings
    Rankings {
        team_id: TeamId,
    },
    /// Generate a swap rotation for a roster
    Schedule {
        /// Athlete ids, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        athletes: Vec<AthleteId>,
        /// Number of boats
        #[arg(short, long, default_value_t = 2)]
        boats: usize,
        /// Seats per boat
        #[arg(short, long)]
        seats: usize,
        /// Number of pieces, including the baseline
        #[arg(short, long)]
        pieces: usize,
        /// Manual swap pair as OUT:IN, repeatable; used for rosters too small for a Latin rotation
        #[arg(long = "swap", value_parser = parse_swap_pair)]
        swaps: Vec<(AthleteId, AthleteId)>,
    },
}

fn parse_swap_pair(value: &str) -> Result<(AthleteId, AthleteId), String> {
    let (a, b) = value
        .split_once(':')
        .ok_or_else(|| format!("expected OUT:IN, got '{}'", value))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<AthleteId>()
            .map_err(|e| format!("invalid athlete id '{}': {}", s, e))
    };
    Ok((parse(a)?, parse(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_arguments() {
        let cli = Cli::parse_from([
            "seat_race_ranking",
            "schedule",
            "--athletes",
            "1,2,3,4",
            "--seats",
            "2",
            "--pieces",
            "5",
            "--swap",
            "1:3",
        ]);
        assert_eq!(
            cli.command,
            Command::Schedule {
                athletes: vec![1, 2, 3, 4],
                boats: 2,
                seats: 2,
                pieces: 5,
                swaps: vec![(1, 3)],
            }
        );
    }

    #[test]
    fn test_serve_default_port() {
        let cli = Cli::parse_from(["seat_race_ranking", "serve"]);
        assert_eq!(cli.command, Command::Serve { port: 3000 });
    }

    #[test]
    fn test_bad_swap_pair() {
        assert!(parse_swap_pair("1-3").is_err());
        assert!(parse_swap_pair("x:3").is_err());
    }
}
