mod args;
mod mj;

use clap::Parser;
use log::{debug, warn};
use snafu::ErrorCompat;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    debug!("args: {:?}", args);

    let overrides = mj::SourceOverrides {
        input: args.input.clone(),
        input_type: args.input_type.clone(),
        grade_scale: args.grade_scale.clone(),
        voting_system: args.voting_system.clone(),
        excel_worksheet_name: args.excel_worksheet_name.clone(),
    };

    let res = mj::run_contest(
        args.config.clone(),
        args.reference.clone(),
        args.out.clone(),
        &overrides,
    );
    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
