use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "backup-monitor")]
#[command(about = "Checks that scheduled backups are fresh", long_about = None)]
pub struct Cli {
    /// Configuration file name (TOML or JSON, extension optional)
    #[arg(long, global = true, default_value = "Config")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check every configured service for a base date
    Check {
        /// Base date as YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Override the configured report mode
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },
    /// Report the days of a range without enough backups
    Period {
        /// Name of a top-level service
        #[arg(long)]
        service: String,
        /// First day, YYYY-MM-DD
        #[arg(long)]
        from: String,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        to: String,
    },
    /// Check all services at the configured send times
    Watch {
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
    },
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    FailOnly,
    OkOnly,
    Full,
}

impl From<ModeArg> for backup_monitor::ReportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::FailOnly => backup_monitor::ReportMode::FailOnly,
            ModeArg::OkOnly => backup_monitor::ReportMode::OkOnly,
            ModeArg::Full => backup_monitor::ReportMode::Full,
        }
    }
}
