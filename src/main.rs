//! v2g-fleet entry point: CLI wiring and config-driven scenario run.

mod cli;

use std::path::Path;
use std::process;

use tracing_subscriber::EnvFilter;
use v2g_fleet::config::ScenarioConfig;
use v2g_fleet::runner::run_scenario;

fn init_tracing() {
    // RUST_LOG overrides the default level (e.g., RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    // Load config: --scenario takes priority, then --preset (defaults to oxford)
    let loaded = if let Some(ref path) = cli.scenario {
        ScenarioConfig::from_toml_file(Path::new(path))
    } else {
        ScenarioConfig::from_preset(cli.preset.as_deref().unwrap_or("oxford"))
    };
    let mut scenario = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if let Some(seed) = cli.seed {
        scenario.fleet.seed = seed;
    }
    if let Some(delta) = cli.delta_kwh {
        scenario.allocation.delta_kwh = delta;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let output = match run_scenario(&scenario) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if cli.show_fleet {
        for v in &output.fleet {
            println!("{v}");
        }
        println!();
    }

    for r in &output.allocation.results {
        println!("{r}");
    }

    println!("\n{}", output.report);
    println!("Settlement value:      {:.4}", output.value);

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(v2g_fleet::api::AppState {
            scenario,
            fleet: output.fleet,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                eprintln!("error: failed to create tokio runtime: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = rt.block_on(v2g_fleet::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
