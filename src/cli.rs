use std::time::Duration;

use clap::Parser;

use crate::archive::ArchiveFormat;
use crate::io::ClientConfig;

#[derive(Parser, Debug)]
#[command(name = "rangeread")]
#[command(version)]
#[command(about = "List archives over HTTP using Range requests, without downloading them", long_about = None)]
#[command(after_help = "Examples:\n  \
  rangeread https://example.com/archive.zip        list files of a remote ZIP\n  \
  rangeread -f tar-gz https://example.com/download list a remote TAR.GZ\n  \
  rangeread -vv backup.tar                         list a local TAR verbosely")]
pub struct Cli {
    /// Archive path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Archive format (default: guess from name, then from content)
    #[arg(short = 'f', long, value_enum, value_name = "FORMAT")]
    pub format: Option<ArchiveFormat>,

    /// List verbosely (-vv => also log range requests)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode, no transfer summary
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Request timeout in seconds, 0 to disable
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Ignore proxy settings from the environment
    #[arg(long)]
    pub no_proxy: bool,

    /// Read-ahead buffer in front of the reader
    #[arg(long, value_name = "BYTES", default_value_t = 1 << 20)]
    pub buffer_size: usize,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig {
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            use_system_proxy: !self.no_proxy,
            ..ClientConfig::default()
        };
        if let Some(ua) = &self.user_agent {
            config.user_agent = ua.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_into_client_config() {
        let cli = Cli::parse_from([
            "rangeread",
            "-f",
            "tar-gz",
            "--timeout",
            "0",
            "--user-agent",
            "probe/1",
            "--no-proxy",
            "https://example.com/dl",
        ]);
        assert!(cli.is_http_url());
        assert_eq!(cli.format, Some(ArchiveFormat::TarGz));

        let config = cli.client_config();
        assert_eq!(config.timeout, None);
        assert_eq!(config.user_agent, "probe/1");
        assert!(!config.use_system_proxy);
    }

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["rangeread", "-vv", "archive.zip"]);
        assert!(!cli.is_http_url());
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.buffer_size, 1 << 20);
        assert_eq!(cli.client_config().timeout, Some(Duration::from_secs(30)));
    }
}
