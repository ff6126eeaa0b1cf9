use clap::{Parser, ValueEnum};
use link_audit::Variant;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "link-audit")]
#[command(about = "Status code report for crawler link exports, with optional AI remediation plan")]
#[command(version)]
pub struct Args {
    /// Semicolon-separated crawl export (Fuente;Destino;Ancla;Código de estado). Demo data when omitted
    pub input: Option<PathBuf>,

    /// Count every link, or each destination URL once
    #[arg(short, long, value_enum, default_value_t = VariantArg::Links)]
    pub variant: VariantArg,

    /// Output format for the report
    #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Request the AI analysis (needs the API key environment variable)
    #[arg(short, long)]
    pub analyze: bool,

    /// Where to save a generated analysis
    #[arg(short, long, default_value = link_audit::analysis::ANALYSIS_FILE_NAME)]
    pub output_analysis: PathBuf,

    /// Only report links found on pages whose URL matches this regex (repeatable)
    #[arg(long)]
    pub include: Vec<String>,

    /// Skip links found on pages whose URL matches this regex (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Only report links found on pages of this host
    #[arg(long)]
    pub domain: Option<String>,

    /// Override the model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Override the output token budget
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Links,
    Destinations,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

/// Convert from CLI argument variant to the library variant
pub fn convert_variant(arg: VariantArg) -> Variant {
    match arg {
        VariantArg::Links => Variant::Links,
        VariantArg::Destinations => Variant::Destinations,
    }
}
