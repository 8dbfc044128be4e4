use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "remzip")]
#[command(version)]
#[command(about = "Extract single members from remote ZIP archives without downloading them", long_about = None)]
#[command(after_help = "Examples:\n  \
  remzip -l https://example.com/archive.zip      list members of a remote ZIP\n  \
  remzip https://example.com/archive.zip a.txt   fetch just a.txt from it\n  \
  remzip -p data.zip report.csv | head           pipe one member to stdout\n  \
  remzip data.zip -x '*.log'                     extract all except logs")]
pub struct Cli {
    /// ZIP file path or HTTP(S) URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Members to extract (default: all)
    #[arg(value_name = "MEMBERS")]
    pub members: Vec<String>,

    /// List members (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract members to stdout, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract members into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Exclude members that follow
    #[arg(short = 'x', value_name = "MEMBER", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Junk paths (do not make directories)
    #[arg(short = 'j')]
    pub junk_paths: bool,

    /// Quiet mode
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }
}
