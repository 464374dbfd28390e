use clap::{Args, Parser, Subcommand};
use log::{error, info};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use weathercast::{
    read_document, select_forecast, series_from_str, ChartOutput, ChartSink, DisplaySink,
    FetchOutcome, FetcherConfig, ForecastFetcher, ImageFileSink, RenderConfig, RenderError,
    Renderer, Weathercast, WeathercastError, API_URL_VAR, CACHE_DIR_VAR, DEFAULT_CACHE_DIR,
    DEFAULT_LOCATION, DEFAULT_OUTPUT_DIR, DEFAULT_TIMEOUT, LOCATION_VAR, OUTPUT_DIR_VAR,
    TIMEOUT_SECS_VAR, USER_AGENT_VAR,
};

/// Fetch today's weather forecast once, cache it by date and plot it
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    fetch: FetchArgs,

    /// Directory with one cached forecast document per day
    #[arg(long, env = CACHE_DIR_VAR, default_value = DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    /// Directory the chart image is written to
    #[arg(long, env = OUTPUT_DIR_VAR, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Place name shown on the chart
    #[arg(long, env = LOCATION_VAR, default_value = DEFAULT_LOCATION)]
    location: String,
}

#[derive(Args)]
struct FetchArgs {
    /// Forecast API endpoint
    #[arg(long, env = API_URL_VAR)]
    api_url: Option<String>,

    /// User-Agent sent to the forecast API
    #[arg(long, env = USER_AGENT_VAR)]
    user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long,
        env = TIMEOUT_SECS_VAR,
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch today's forecast if needed and plot it (default)
    Run {
        /// Open the chart in the image viewer instead of writing it to the output dir
        #[arg(long)]
        display: bool,
    },
    /// Fetch today's forecast if needed, without plotting
    Fetch,
    /// Plot a cached forecast document
    Show {
        /// Path to the forecast document
        path: PathBuf,
        #[arg(long, conflicts_with = "table")]
        display: bool,
        /// Print the extracted series as a table instead of plotting
        #[arg(long)]
        table: bool,
    },
    /// Choose a cached forecast interactively and plot it
    Pick {
        #[arg(long)]
        display: bool,
    },
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let cli = Cli::parse();
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", error_chain(&e));
            ExitCode::from(e.exit_code())
        }
    }
}

fn execute(cli: Cli) -> Result<(), WeathercastError> {
    let Cli {
        command,
        fetch,
        cache_dir,
        output_dir,
        location,
    } = cli;
    let renderer = Renderer::new(RenderConfig::builder().location(location).build());

    match command.unwrap_or(Command::Run { display: false }) {
        Command::Run { display } => {
            let fetcher = ForecastFetcher::new(fetcher_config(fetch, cache_dir)?)?;
            let weathercast = Weathercast::with_parts(fetcher, renderer);
            let output = weathercast.run(sink(display, &output_dir).as_ref())?;
            print_output(&output);
        }
        Command::Fetch => {
            let fetcher = ForecastFetcher::new(fetcher_config(fetch, cache_dir)?)?;
            match fetcher.fetch_or_load()? {
                FetchOutcome::Cached(path) => {
                    println!("File already exists: {}", path.display())
                }
                FetchOutcome::Downloaded(path) => {
                    println!("JSON file saved successfully: {}", path.display())
                }
            }
        }
        Command::Show {
            path,
            display,
            table,
        } => {
            if table {
                print_table(&path)?;
            } else {
                let output = renderer.render_file(&path, sink(display, &output_dir).as_ref())?;
                print_output(&output);
            }
        }
        Command::Pick { display } => {
            let stdin = io::stdin();
            match select_forecast(&cache_dir, stdin.lock(), io::stdout())? {
                Some(path) => {
                    let output =
                        renderer.render_file(&path, sink(display, &output_dir).as_ref())?;
                    print_output(&output);
                }
                None => info!("No forecast selected"),
            }
        }
    }

    Ok(())
}

fn fetcher_config(args: FetchArgs, cache_dir: PathBuf) -> Result<FetcherConfig, WeathercastError> {
    Ok(FetcherConfig::builder()
        .maybe_api_url(args.api_url)
        .maybe_user_agent(args.user_agent)
        .cache_dir(cache_dir)
        .request_timeout(Duration::from_secs(args.timeout_secs))
        .build()?)
}

fn sink(display: bool, output_dir: &Path) -> Box<dyn ChartSink> {
    if display {
        Box::new(DisplaySink)
    } else {
        Box::new(ImageFileSink::new(output_dir))
    }
}

fn print_output(output: &ChartOutput) {
    match output {
        ChartOutput::Written(path) => println!("Plot saved as '{}'.", path.display()),
        ChartOutput::Displayed(path) => println!("Plot opened from '{}'.", path.display()),
    }
}

fn print_table(path: &Path) -> Result<(), WeathercastError> {
    let series = series_from_str(&read_document(path)?)?;
    let frame = series.to_frame().map_err(RenderError::Table)?;
    // Show every row of the forecast.
    env::set_var("POLARS_FMT_MAX_ROWS", "-1");
    println!("{}", frame);
    Ok(())
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
