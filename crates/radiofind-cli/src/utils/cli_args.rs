use clap::Args;
use is_terminal::IsTerminal;

use crate::output::OutputFormat;

/// Shared clap argument for commands that accept an output format.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatArg {
    /// Output format (`text` on a terminal, `json` when piped)
    #[arg(short = 'f', long = "format", value_enum, env = "RADIOFIND_OUTPUT_FORMAT")]
    pub format: Option<OutputFormat>,
}

impl FormatArg {
    /// Returns the effective output format. If output is piped and no format is
    /// specified, defaults to JSON.
    #[must_use]
    pub fn resolve(&self) -> OutputFormat {
        if let Some(format) = self.format {
            return format;
        }

        if std::io::stdout().is_terminal() {
            OutputFormat::Text
        } else {
            OutputFormat::Json
        }
    }

    /// True when the effective output is machine-readable.
    #[must_use]
    pub fn is_machine_readable(&self) -> bool {
        matches!(self.resolve(), OutputFormat::Json)
    }
}
