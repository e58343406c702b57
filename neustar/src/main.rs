//! Neustar Web Performance CLI: monitors, samples, alert policies and instant tests from the terminal.

mod output;

use clap::{Parser, Subcommand, ValueEnum};
use neustar_lib::alerting::NewAlertPolicyParameters;
use neustar_lib::helpers::sample_window;
use neustar_lib::instant_testing::InstantTestParameters;
use neustar_lib::monitoring::{
    AggregateSampleParameters, CreateMonitorParameters, SampleRequestParameters,
};
use neustar_lib::{resolve_credentials, Client, Error, Outcome, Page};
use output::OutputFormat;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "neustar")]
#[command(about = "Neustar Web Performance CLI - monitors, samples, alert policies, and instant tests", long_about = None)]
struct Cli {
    /// Output format: plain (human-readable), json (structured).
    #[arg(short, long, default_value = "plain", value_enum, global = true)]
    output: OutputFormatArg,

    /// JSON config file: {"api": {"key": "...", "secret": "..."}}. Falls back to NEUSTAR_KEY / NEUSTAR_SECRET.
    #[arg(short, long, env = "NEUSTAR_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log requests to stderr (same as RUST_LOG=debug).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List monitors
    Monitors,
    /// Show one monitor
    Monitor { id: String },
    /// Create a monitor
    CreateMonitor {
        #[arg(long)]
        name: String,
        /// Minutes between runs: 1, 2, 3, 4, 5, 10, 15, 20, 30 or 60
        #[arg(long)]
        interval: u32,
        /// Comma-separated locations, e.g. washingtondc,london
        #[arg(long)]
        locations: String,
        /// Id of the test script to run
        #[arg(long)]
        script: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        alert_policy: Option<String>,
        /// FF, CHROME or IE
        #[arg(long)]
        browser: Option<String>,
        /// Network monitor type: RealBrowserUser, VirtualUser or dns
        #[arg(long = "type")]
        monitor_type: Option<String>,
        /// Create the monitor switched off
        #[arg(long)]
        inactive: bool,
    },
    /// Delete a monitor and all of its data
    DeleteMonitor { id: String },
    /// Uptime, load time and sample counts for a monitor
    Summary { id: String },
    /// List samples for a monitor (max 2000 per call)
    Samples {
        id: String,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Window ending at --to (or now), e.g. 30min, 6hours, 7days
        #[arg(long, conflicts_with = "from")]
        range: Option<String>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Raw HTTP Archive data for one sample
    Sample { id: String, sample_id: String },
    /// Samples aggregated per hour or day
    Aggregate {
        id: String,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long, conflicts_with = "from")]
        range: Option<String>,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long, value_parser = ["day", "hour"])]
        frequency: Option<String>,
        #[arg(long, value_parser = ["location", "step"])]
        group_by: Option<String>,
    },
    /// List monitoring locations
    Locations,
    /// List alert policies
    Policies,
    /// Create an alert policy
    CreatePolicy {
        #[arg(long)]
        name: String,
        /// Recipient; repeat for several
        #[arg(long = "email", required = true)]
        emails: Vec<String>,
        /// Failed runs before alerting: 1, 2 or 3
        #[arg(long, default_value = "1")]
        strikes: u32,
        #[arg(long)]
        description: Option<String>,
    },
    /// List test scripts
    Scripts,
    /// Start an instant test
    InstantTest {
        url: String,
        #[arg(long)]
        locations: Option<String>,
        /// URL the service POSTs job status to
        #[arg(long)]
        callback: Option<String>,
    },
    /// Show an instant test job, optionally at one location
    InstantTestJob {
        job_id: String,
        #[arg(long)]
        location: Option<String>,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if matches!(cli.command, Commands::Version) {
        println!("neustar {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let client = match build_client(cli.config.as_deref(), cli.timeout) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let format = match cli.output {
        OutputFormatArg::Plain => OutputFormat::Plain,
        OutputFormatArg::Json => OutputFormat::Json,
    };

    match run(&client, cli.command, format).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("neustar=debug,neustar_lib=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(config: Option<&std::path::Path>, timeout: Option<u64>) -> Result<Client, Error> {
    let (credentials, config, source) = resolve_credentials(config)?;
    tracing::debug!(?source, "credentials resolved");
    let mut builder = Client::builder(credentials);
    if let Some(base_url) = config.and_then(|c| c.api.base_url) {
        builder = builder.base_url(base_url);
    }
    if let Some(secs) = timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

async fn run(client: &Client, cmd: Commands, format: OutputFormat) -> Result<(), Error> {
    let monitoring = client.monitoring();
    match cmd {
        Commands::Monitors => {
            let monitors = monitoring.list().await?.into_result()?;
            print(&monitors, format, output::MONITOR_COLUMNS)?;
        }
        Commands::Monitor { id } => {
            let monitors = monitoring.get(&id).await?.into_result()?;
            match monitors.first() {
                Some(m) => print(m, format, &[])?,
                None => return Err(Error::Other(format!("Monitor {} not found", id))),
            }
        }
        Commands::CreateMonitor {
            name,
            interval,
            locations,
            script,
            description,
            alert_policy,
            browser,
            monitor_type,
            inactive,
        } => {
            let params = CreateMonitorParameters {
                description,
                test_script: script,
                alert_policy,
                browser,
                monitor_type,
                active: inactive.then_some(false),
                ..CreateMonitorParameters::new(name, interval, locations)
            };
            let created = monitoring.create(&params).await?.into_result()?;
            print(&created, format, &[])?;
        }
        Commands::DeleteMonitor { id } => match monitoring.delete(&id).await? {
            Outcome::Success { .. } => println!("Deleted monitor {}", id),
            Outcome::Rejected(e) => {
                return Err(Error::Other(format!(
                    "Monitor {} not deleted (status {}): {}",
                    id, e.status_code, e.message
                )))
            }
        },
        Commands::Summary { id } => {
            let summaries = monitoring.summary(&id).await?.into_result()?;
            match summaries.as_slice() {
                [one] => print(one, format, &[])?,
                many => print(&many, format, &[])?,
            }
        }
        Commands::Samples {
            id,
            from,
            to,
            range,
            offset,
        } => {
            let (start_date, end_date) = date_window(from, to, range.as_deref())?;
            let params = SampleRequestParameters {
                start_date,
                end_date,
                offset,
            };
            let page = monitoring.samples(&id, &params).await?.into_result()?;
            print_page(&page, format, output::SAMPLE_COLUMNS)?;
        }
        Commands::Sample { id, sample_id } => {
            let har = monitoring.raw_sample_data(&id, &sample_id).await?.into_result()?;
            // HAR documents are only useful as JSON.
            println!("{}", serde_json::to_string_pretty(&har)?);
        }
        Commands::Aggregate {
            id,
            from,
            to,
            range,
            offset,
            frequency,
            group_by,
        } => {
            let (start_date, end_date) = date_window(from, to, range.as_deref())?;
            let params = AggregateSampleParameters {
                start_date,
                end_date,
                offset,
                frequency,
                group_by,
            };
            let page = monitoring.aggregate(&id, &params).await?.into_result()?;
            print_page(&page, format, output::AGGREGATE_COLUMNS)?;
        }
        Commands::Locations => {
            let locations = monitoring.locations().await?.into_result()?;
            print(&locations, format, &[])?;
        }
        Commands::Policies => {
            let policies = client.alerting().list_policies().await?.into_result()?;
            print(&policies, format, output::POLICY_COLUMNS)?;
        }
        Commands::CreatePolicy {
            name,
            emails,
            strikes,
            description,
        } => {
            let params = NewAlertPolicyParameters {
                name,
                email_addresses: emails,
                strikes,
                description,
            };
            let policy = client
                .alerting()
                .create_policy(&params)
                .await?
                .into_result()?;
            print(&policy, format, &[])?;
        }
        Commands::Scripts => {
            let scripts = client.scripting().list().await?.into_result()?;
            print(&scripts, format, output::SCRIPT_COLUMNS)?;
        }
        Commands::InstantTest {
            url,
            locations,
            callback,
        } => {
            let params = InstantTestParameters {
                url,
                callback,
                locations,
            };
            let job = client
                .instant_testing()
                .create(&params)
                .await?
                .into_result()?;
            print(&job, format, &[])?;
        }
        Commands::InstantTestJob { job_id, location } => {
            let testing = client.instant_testing();
            match location {
                Some(location) => {
                    let runs = testing
                        .get_job_by_location(&job_id, &location)
                        .await?
                        .into_result()?;
                    print(&runs, format, &[])?;
                }
                None => {
                    let jobs = testing.get_job(&job_id).await?.into_result()?;
                    print(&jobs, format, &["id", "url", "status"])?;
                }
            }
        }
        Commands::Version => {}
    }
    Ok(())
}

/// `--range` wins over `--from`; `--to` bounds either.
fn date_window(
    from: Option<String>,
    to: Option<String>,
    range: Option<&str>,
) -> Result<(Option<String>, Option<String>), Error> {
    match range {
        Some(r) => {
            let (start, end) = sample_window(r, to.as_deref()).map_err(Error::Other)?;
            Ok((Some(start), Some(end)))
        }
        None => Ok((from, to)),
    }
}

fn print<T: Serialize + ?Sized>(value: &T, format: OutputFormat, columns: &[&str]) -> Result<(), Error> {
    print!("{}", output::render(value, format, columns)?);
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

fn print_page<T: Serialize>(page: &Page<T>, format: OutputFormat, columns: &[&str]) -> Result<(), Error> {
    match format {
        OutputFormat::Json => print(page, format, columns),
        OutputFormat::Plain => {
            print(&page.items, format, columns)?;
            println!("{}", output::page_footer(page.items.len(), page.offset, page.more));
            Ok(())
        }
    }
}
