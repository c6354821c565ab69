use clap::Parser;

/// app-errors CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "app-errors",
    version,
    about = "Application error catalog and HTTP error translation service"
)]
pub struct Cli {
    /// Deployment environment (production, development or test)
    #[arg(long)]
    pub environment: Option<String>,

    /// HTTP listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Webhook URL that receives error reports in production
    #[arg(long)]
    pub tracker_url: Option<String>,

    /// Print the error catalog and exit
    #[arg(long)]
    pub list_codes: bool,
}
