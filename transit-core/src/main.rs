use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use transit_core::snapshot::{TransitSnapshot, load_definition};

fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    init_logger();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: transit-core <network.json>");
        return ExitCode::from(2);
    };

    let definition = match load_definition(&path) {
        Ok(definition) => definition,
        Err(e) => {
            error!(error = %e, "failed to load network definition");
            return ExitCode::FAILURE;
        }
    };

    let snapshot = match TransitSnapshot::build(&definition, &definition.config) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(error = %e, "failed to build snapshot");
            return ExitCode::FAILURE;
        }
    };

    let window = snapshot.window();
    info!(
        anchor = %window.anchor(),
        last = %window.last_date(),
        time_zone = %window.time_zone(),
        stops = snapshot.stops().len(),
        patterns = snapshot.num_patterns(),
        merged_trips = snapshot.num_merged_trips(),
        constrained_transfers = snapshot.transfer_service().len(),
        flex_trips = snapshot.num_flex_trips(),
        import_issues = snapshot.issues().len(),
        "snapshot built"
    );
    for issue in snapshot.issues() {
        warn!(%issue, "import issue");
    }

    ExitCode::SUCCESS
}
