use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cpak",
    about = "Unified C/C++ package manager front-end",
    long_about = "One CLI over conan, vcpkg and cpm: install, query and resolve \
                  dependencies without caring which manager this host actually has",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Use a specific manager instead of priority-based selection
    #[arg(short = 'm', long, global = true, value_name = "MANAGER")]
    pub manager: Option<String>,

    /// Override selection priority (comma-separated, e.g. "vcpkg,conan,cpm")
    #[arg(long, global = true, value_name = "LIST")]
    pub priority: Option<String>,

    /// Settings file (default: ~/.config/cpak/cpak.kdl)
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Timeout for package manager operations, in seconds (max 300)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Extra arguments passed through to the underlying manager
    #[arg(long, global = true, value_name = "ARGS")]
    pub extra_args: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Probe which package managers are usable on this host
    Detect {
        /// Re-probe instead of reporting memoized results
        #[arg(long)]
        refresh: bool,

        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },

    /// Install packages (name or name@version)
    Install {
        /// Packages to install
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Remove packages (removing an absent package is not an error)
    Remove {
        /// Packages to remove
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Update one package, or everything when no package is given
    Update {
        /// Package to update
        package: Option<String>,
    },

    /// Search the selected manager's repository
    Search {
        query: String,

        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },

    /// Show details for one package
    Info {
        package: String,

        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },

    /// List installed packages
    List {
        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },

    /// Resolve the direct dependencies of the given packages into one
    /// deduplicated list (first occurrence of a name wins)
    Deps {
        /// Packages to resolve
        #[arg(required = true)]
        packages: Vec<String>,

        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },

    /// Export packages to a file (format is manager-specific)
    Export {
        /// Packages to export
        #[arg(required = true)]
        packages: Vec<String>,

        /// Destination file
        #[arg(short = 'o', long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Import packages from a previously exported file
    Import {
        /// Source file
        source: PathBuf,
    },

    /// Validate every available manager's setup
    Doctor,

    /// Generate shell completions
    Completions {
        /// Shell to generate for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn install_requires_at_least_one_package() {
        assert!(Cli::try_parse_from(["cpak", "install"]).is_err());
        assert!(Cli::try_parse_from(["cpak", "install", "fmt"]).is_ok());
    }

    #[test]
    fn global_flags_parse_anywhere() {
        let cli = Cli::try_parse_from(["cpak", "list", "--manager", "vcpkg", "-v"]).unwrap();
        assert_eq!(cli.global.manager.as_deref(), Some("vcpkg"));
        assert!(cli.global.verbose);
    }

    #[test]
    fn update_package_is_optional() {
        let cli = Cli::try_parse_from(["cpak", "update"]).unwrap();
        match cli.command {
            Command::Update { package } => assert!(package.is_none()),
            _ => panic!("expected update"),
        }
    }
}
