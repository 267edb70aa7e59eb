use anyhow::Result;

use seat_race_ranking::cli::Command;
use seat_race_ranking::{
    handle_init, handle_rankings, handle_recalculate, handle_reset, handle_schedule,
    handle_serve, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Init => handle_init(),
        Command::Reset => handle_reset(),
        Command::Recalculate { team_id } => handle_recalculate(*team_id),
        Command::Rankings { team_id } => handle_rankings(*team_id),
        Command::Schedule {
            athletes,
            boats,
            seats,
            pieces,
            swaps,
        } => handle_schedule(athletes, *boats, *seats, *pieces, swaps),
    }
}
