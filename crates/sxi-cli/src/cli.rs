//! Command line definition

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use sxi_model::DEFAULT_LIST_PATH;

/// Build the `searx-instances` command
#[must_use]
pub fn build() -> Command {
    Command::new("searx-instances")
        .version(sxi_update::VERSION)
        .about("Maintain the list of searx instances")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("list")
                .long("list")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help(format!(
                    "Instance list file, relative to the repository root [default: {DEFAULT_LIST_PATH}]"
                )),
        )
        .arg(
            Arg::new("repo")
                .long("repo")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Git repository root [default: .]"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v info, -vv debug)"),
        )
        .subcommand(
            Command::new("check").about("Check that the list file is in its canonical form"),
        )
        .subcommand(
            Command::new("update")
                .about("Apply add / delete / edit requests, one commit each")
                .arg(
                    Arg::new("github-issues")
                        .long("github-issues")
                        .num_args(0..)
                        .value_parser(value_parser!(u64))
                        .value_name("ISSUE")
                        .help("Apply requests from open issues, optionally only these numbers"),
                )
                .arg(
                    Arg::new("add")
                        .long("add")
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .value_name("URL")
                        .help("Add instances"),
                )
                .arg(
                    Arg::new("delete")
                        .long("delete")
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .value_name("URL")
                        .help("Delete instances"),
                )
                .arg(
                    Arg::new("edit")
                        .long("edit")
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .value_name("URL")
                        .help("Edit instances"),
                ),
        )
        .subcommand(
            Command::new("export-json")
                .about("Write the list as JSON")
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Output file [default: stdout]"),
                ),
        )
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// `--list`
    pub list: Option<PathBuf>,
    /// `--repo`
    pub repo: Option<PathBuf>,
    /// `--config`
    pub config: Option<PathBuf>,
    /// Number of `-v`
    pub verbose: u8,
}

impl GlobalArgs {
    /// Read from parsed matches
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            list: matches.get_one::<PathBuf>("list").cloned(),
            repo: matches.get_one::<PathBuf>("repo").cloned(),
            config: matches.get_one::<PathBuf>("config").cloned(),
            verbose: matches.get_count("verbose"),
        }
    }
}

/// Requests asked for on the `update` command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateArgs {
    /// `None` without `--github-issues`, empty for all open issues
    pub github_issues: Option<Vec<u64>>,
    /// `--add`
    pub add: Vec<String>,
    /// `--delete`
    pub delete: Vec<String>,
    /// `--edit`
    pub edit: Vec<String>,
}

impl UpdateArgs {
    /// Read from the `update` subcommand matches
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let strings = |id: &str| -> Vec<String> {
            matches
                .get_many::<String>(id)
                .map(|values| values.cloned().collect())
                .unwrap_or_default()
        };
        let github_issues = matches.contains_id("github-issues").then(|| {
            matches
                .get_many::<u64>("github-issues")
                .map(|values| values.copied().collect())
                .unwrap_or_default()
        });

        Self {
            github_issues,
            add: strings("add"),
            delete: strings("delete"),
            edit: strings("edit"),
        }
    }

    /// Whether no request source was given
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.github_issues.is_none()
            && self.add.is_empty()
            && self.delete.is_empty()
            && self.edit.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        build().debug_assert();
    }

    #[test]
    fn update_sources() {
        let matches = build()
            .try_get_matches_from([
                "searx-instances",
                "update",
                "--github-issues",
                "12",
                "15",
                "--add",
                "https://a.example.org",
                "--add",
                "b.example.org",
                "--edit",
                "https://searx.me",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let args = UpdateArgs::from_matches(sub);

        assert_eq!(args.github_issues, Some(vec![12, 15]));
        assert_eq!(args.add, vec!["https://a.example.org", "b.example.org"]);
        assert!(args.delete.is_empty());
        assert_eq!(args.edit, vec!["https://searx.me"]);
    }

    #[test]
    fn bare_github_issues_means_all() {
        let matches = build()
            .try_get_matches_from(["searx-instances", "update", "--github-issues"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(UpdateArgs::from_matches(sub).github_issues, Some(Vec::new()));
    }

    #[test]
    fn globals_after_subcommand() {
        let matches = build()
            .try_get_matches_from(["searx-instances", "check", "--list", "other.yml", "-vv"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let globals = GlobalArgs::from_matches(sub);
        assert_eq!(globals.list, Some(PathBuf::from("other.yml")));
        assert_eq!(globals.verbose, 2);
    }

    #[test]
    fn subcommand_required() {
        assert!(build().try_get_matches_from(["searx-instances"]).is_err());
    }
}
