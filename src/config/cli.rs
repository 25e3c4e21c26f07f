use clap::{ArgGroup, Parser};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "scan-order")]
#[command(about = "Turn a label scan or manual form into an ERP sales order and submit it")]
#[command(group(ArgGroup::new("input").args(["scan", "stdin", "manual"])))]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "scan-order.toml")]
    pub config: String,

    /// Raw scan text, e.g. "<B12345><PR1001><Q5><PN55-22>"
    #[arg(long)]
    pub scan: Option<String>,

    /// Read the raw scan from standard input
    #[arg(long)]
    pub stdin: bool,

    /// Manual-entry form file (TOML)
    #[arg(long)]
    pub manual: Option<String>,

    /// ERP username; prompted for when omitted
    #[arg(short, long, env = "SCAN_ORDER_USERNAME")]
    pub username: Option<String>,

    /// Print the order document instead of submitting it
    #[arg(long)]
    pub preview: bool,

    /// Only report whether the ERP server is reachable
    #[arg(long)]
    pub check_connection: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn has_input(&self) -> bool {
        self.scan.is_some() || self.stdin || self.manual.is_some()
    }
}
