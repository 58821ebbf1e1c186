use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "scholar", bin_name = "scholar", version = get_version())]
#[command(about = "Personal bibliography manager", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Library to operate on (defaults to the configured default library)
    #[arg(short, long, global = true, value_name = "NAME", help_heading = "Options")]
    pub library: Option<String>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Entry(EntryCommands),

    #[command(flatten)]
    Data(DataCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum CoreCommands {
    /// Add an entry from fields, a DOI or a Crossref search
    #[command(alias = "a", display_order = 1)]
    Add {
        /// Words to search Crossref for, or a file to attach and search by name
        #[arg(value_name = "QUERY")]
        query: Vec<String>,

        /// Entry type (e.g. article, book)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        entry_type: Option<String>,

        /// Fetch fields from Crossref
        #[arg(short, long)]
        doi: Option<String>,

        /// Field value, repeatable (e.g. -f "title=Quantum Foo")
        #[arg(short = 'f', long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,

        /// File to attach to the new entry
        #[arg(short, long, value_name = "FILE")]
        attach: Option<PathBuf>,
    },

    /// List entries
    #[command(alias = "ls", display_order = 2)]
    List,

    /// Print an entry as bibtex
    #[command(alias = "s", display_order = 3)]
    Show { key: String },
}

#[derive(Subcommand, Debug)]
pub enum EntryCommands {
    /// Edit an entry in the editor
    #[command(alias = "e", display_order = 10)]
    Edit { key: String },

    /// Open the entry's attached file
    #[command(alias = "o", display_order = 11)]
    Open { key: String },

    /// Attach a file to an entry
    #[command(display_order = 12)]
    Attach {
        key: String,

        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Remove one or more entries and their files
    #[command(alias = "rm", display_order = 13)]
    Remove {
        #[arg(required = true, num_args = 1..)]
        keys: Vec<String>,
    },

    /// Print the directory of an entry
    #[command(display_order = 14)]
    Path { key: String },
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Import entries from bibtex files ("-" reads stdin)
    #[command(display_order = 20)]
    Import {
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,

        /// Abort without writing anything if any entry is invalid
        #[arg(long)]
        strict: bool,
    },

    /// Export entries as bibtex (all entries if no keys are given)
    #[command(display_order = 21)]
    Export {
        #[arg(num_args = 0..)]
        keys: Vec<String>,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// List known entry types
    #[command(display_order = 30)]
    Types {
        /// Show required and optional fields
        #[arg(long)]
        fields: bool,
    },

    /// Get or set configuration
    #[command(display_order = 31)]
    Config {
        /// Configuration key (e.g. mailto, library.work)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Create the library directory and default config
    #[command(display_order = 32)]
    Init,
}
