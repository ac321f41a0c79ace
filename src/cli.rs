use std::env;
use std::path::PathBuf;

pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub delta_kwh: Option<f64>,
    pub show_fleet: bool,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: u16,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut seed = None;
    let mut delta_kwh = None;
    let mut show_fleet = false;
    #[cfg(feature = "api")]
    let mut serve = false;
    #[cfg(feature = "api")]
    let mut port = 3000u16;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --scenario (expected a TOML file path)")?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let value = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                seed = Some(value);
            }
            "--delta" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --delta (expected kWh)")?;
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| format!("--delta value \"{raw}\" is not a finite number"))?;
                delta_kwh = Some(value);
            }
            "--show-fleet" => show_fleet = true,
            #[cfg(feature = "api")]
            "--serve" => serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if scenario.is_none() && preset.is_none() {
        preset = Some("oxford".to_string());
    }

    Ok(CliOptions {
        scenario,
        preset,
        seed,
        delta_kwh,
        show_fleet,
        #[cfg(feature = "api")]
        serve,
        #[cfg(feature = "api")]
        port,
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("v2g-fleet: synthetic EV fleet and vehicle-to-grid energy allocation");
    eprintln!();
    eprintln!("Usage: v2g-fleet [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Load scenario from TOML config file");
    eprintln!("  --preset <name>     Use a built-in preset (oxford, dense_urban, midday_surplus)");
    eprintln!("  --seed <u64>        Override the fleet seed");
    eprintln!("  --delta <kWh>       Override the energy delta (negative = shortfall)");
    eprintln!("  --show-fleet        Print every generated vehicle");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve             Start REST API server after the run");
        eprintln!("  --port <u16>        API server port (default: 3000)");
    }
    eprintln!("  --help              Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the oxford preset is used.");
}

#[cfg(test)]
mod tests {
    use super::parse_options;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn supports_scenario_cli() {
        let opts = parse_options(&args(&["--scenario", "scenario.toml"]))
            .expect("parse should succeed");
        assert_eq!(
            opts.scenario.as_deref().and_then(|p| p.to_str()),
            Some("scenario.toml")
        );
        assert!(opts.preset.is_none());
    }

    #[test]
    fn defaults_to_oxford_preset() {
        let opts = parse_options(&[]).expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("oxford"));
        assert!(opts.delta_kwh.is_none());
    }

    #[test]
    fn parses_negative_delta_and_seed() {
        let opts = parse_options(&args(&["--delta", "-42.5", "--seed", "7"]))
            .expect("parse should succeed");
        assert_eq!(opts.delta_kwh, Some(-42.5));
        assert_eq!(opts.seed, Some(7));
    }

    #[test]
    fn rejects_non_finite_delta() {
        assert!(parse_options(&args(&["--delta", "NaN"])).is_err());
        assert!(parse_options(&args(&["--delta", "lots"])).is_err());
    }

    #[test]
    fn rejects_scenario_and_preset_together() {
        let err = parse_options(&args(&["--scenario", "a.toml", "--preset", "oxford"]));
        assert!(err.is_err());
    }

    #[test]
    fn rejects_unknown_argument() {
        assert!(parse_options(&args(&["--bogus"])).is_err());
    }
}
