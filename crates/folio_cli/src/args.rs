//! Command-line surface definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use folio_core::{NamedLink, Section};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Edit portfolio site content")]
pub struct Cli {
    /// SQLite file holding site content.
    #[arg(long, env = "FOLIO_DB", default_value = "folio.sqlite3")]
    pub db: PathBuf,

    /// Use a throwaway in-memory store instead of `--db`.
    #[arg(long)]
    pub memory: bool,

    /// Directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "FOLIO_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "FOLIO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Seed every content type that has no stored value yet.
    Init,
    /// Project cards.
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Degrees and positions.
    Academia {
        #[command(subcommand)]
        action: AcademiaAction,
    },
    /// Social profile links.
    Social {
        #[command(subcommand)]
        action: SocialAction,
    },
    /// Section visibility switches.
    Sections {
        #[command(subcommand)]
        action: SectionAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProjectAction {
    List,
    Show { id: String },
    Add(ProjectAdd),
    Update {
        id: String,
        #[command(flatten)]
        patch: ProjectPatch,
    },
    Delete { id: String },
    /// Flip a per-record flag.
    Toggle { id: String, flag: Flag },
    /// Replace all projects with the seed list.
    Reset,
}

#[derive(Debug, Args)]
pub struct ProjectAdd {
    /// Explicit id; a UUID is generated when omitted.
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub image_url: Option<String>,
    /// Repeat for each technology tag.
    #[arg(long = "tech")]
    pub technologies: Vec<String>,
    #[arg(long)]
    pub github: Option<String>,
    #[arg(long)]
    pub demo: Option<String>,
    /// Extra link as `LABEL=URL`; repeatable.
    #[arg(long = "link", value_parser = parse_named_link)]
    pub links: Vec<NamedLink>,
    /// Keep the card off the public page.
    #[arg(long)]
    pub hidden: bool,
    /// Show the card in the initial view.
    #[arg(long)]
    pub newest: bool,
}

#[derive(Debug, Args)]
pub struct ProjectPatch {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "clear_image")]
    pub image_url: Option<String>,
    #[arg(long)]
    pub clear_image: bool,
    /// Replaces the whole tag list when given.
    #[arg(long = "tech")]
    pub technologies: Vec<String>,
    /// Drop every technology tag.
    #[arg(long, conflicts_with = "technologies")]
    pub clear_tech: bool,
    #[arg(long)]
    pub github: Option<String>,
    #[arg(long)]
    pub demo: Option<String>,
    /// Replaces the extra links when given; `LABEL=URL`, repeatable.
    #[arg(long = "link", value_parser = parse_named_link)]
    pub links: Vec<NamedLink>,
    /// Drop github, demo and extra links. Applied before the link flags.
    #[arg(long)]
    pub clear_links: bool,
}

#[derive(Debug, Subcommand)]
pub enum AcademiaAction {
    List,
    Show { id: String },
    Add(AcademiaAdd),
    Update {
        id: String,
        #[command(flatten)]
        patch: AcademiaPatch,
    },
    Delete { id: String },
    /// Flip a per-record flag.
    Toggle { id: String, flag: Flag },
    /// Replace all academia entries with the seed list.
    Reset,
}

#[derive(Debug, Args)]
pub struct AcademiaAdd {
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub institution: String,
    #[arg(long, default_value = "")]
    pub year: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub link: Option<String>,
    #[arg(long)]
    pub hidden: bool,
    #[arg(long)]
    pub newest: bool,
}

#[derive(Debug, Args)]
pub struct AcademiaPatch {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub institution: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "clear_link")]
    pub link: Option<String>,
    #[arg(long)]
    pub clear_link: bool,
}

#[derive(Debug, Subcommand)]
pub enum SocialAction {
    List,
    Show { id: String },
    Add(SocialAdd),
    Update {
        id: String,
        #[command(flatten)]
        patch: SocialPatch,
    },
    Delete { id: String },
    /// Flip a per-record flag. Social links only support `visible` (active).
    Toggle { id: String, flag: Flag },
    /// Replace all social links with the seed list.
    Reset,
}

#[derive(Debug, Args)]
pub struct SocialAdd {
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub platform: String,
    #[arg(long, default_value = "")]
    pub url: String,
    /// Store the link without showing it on the site.
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Debug, Args)]
pub struct SocialPatch {
    #[arg(long)]
    pub platform: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Debug, Subcommand)]
pub enum SectionAction {
    Show,
    Set { section: Section, state: Switch },
    Toggle { section: Section },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn is_on(self) -> bool {
        self == Switch::On
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Flag {
    /// Rendered on the public page.
    Visible,
    /// Shown in the initial view.
    Newest,
}

impl Flag {
    pub fn as_str(self) -> &'static str {
        match self {
            Flag::Visible => "visible",
            Flag::Newest => "newest",
        }
    }
}

fn parse_named_link(raw: &str) -> Result<NamedLink, String> {
    let (label, url) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=URL, got `{raw}`"))?;
    if label.trim().is_empty() {
        return Err(format!("missing label in `{raw}`"));
    }
    Ok(NamedLink::new(label.trim(), url.trim()))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, Flag, ProjectAction, SectionAction, Switch};
    use clap::{CommandFactory, Parser};
    use folio_core::Section;

    #[test]
    fn definitions_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_project_add_with_repeated_tags() {
        let cli = Cli::try_parse_from([
            "folio", "--memory", "projects", "add", "--title", "Grid", "--tech", "Rust", "--tech",
            "SQL",
        ])
        .unwrap();
        assert!(cli.memory);
        match cli.command {
            Command::Projects {
                action: ProjectAction::Add(add),
            } => {
                assert_eq!(add.title, "Grid");
                assert_eq!(add.technologies, vec!["Rust", "SQL"]);
                assert_eq!(add.id, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_section_switch() {
        let cli = Cli::try_parse_from(["folio", "sections", "set", "Contact", "off", "--json"])
            .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Sections {
                action: SectionAction::Set { section, state },
            } => {
                assert_eq!(section, Section::Contact);
                assert_eq!(state, Switch::Off);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_section() {
        assert!(Cli::try_parse_from(["folio", "sections", "toggle", "footer"]).is_err());
    }

    #[test]
    fn image_url_conflicts_with_clear_image() {
        let result = Cli::try_parse_from([
            "folio",
            "projects",
            "update",
            "1",
            "--image-url",
            "/a.png",
            "--clear-image",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn clear_tech_conflicts_with_tech() {
        let result = Cli::try_parse_from([
            "folio", "projects", "update", "1", "--tech", "Rust", "--clear-tech",
        ]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["folio", "projects", "update", "1", "--clear-tech"]).unwrap();
        match cli.command {
            Command::Projects {
                action: ProjectAction::Update { patch, .. },
            } => {
                assert!(patch.clear_tech);
                assert!(patch.technologies.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_labelled_links() {
        let cli = Cli::try_parse_from([
            "folio",
            "projects",
            "add",
            "--title",
            "Grid",
            "--link",
            "Paper = https://doi.org/10.1/x",
            "--newest",
        ])
        .unwrap();
        match cli.command {
            Command::Projects {
                action: ProjectAction::Add(add),
            } => {
                assert_eq!(add.links.len(), 1);
                assert_eq!(add.links[0].label, "Paper");
                assert_eq!(add.links[0].url, "https://doi.org/10.1/x");
                assert!(add.newest);
                assert!(!add.hidden);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_link_without_label() {
        assert!(Cli::try_parse_from([
            "folio", "projects", "add", "--title", "T", "--link", "https://x.io"
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "folio", "projects", "add", "--title", "T", "--link", "=https://x.io"
        ])
        .is_err());
    }

    #[test]
    fn parses_toggle_flag() {
        let cli = Cli::try_parse_from(["folio", "academia", "toggle", "2", "newest"]).unwrap();
        match cli.command {
            Command::Academia {
                action: super::AcademiaAction::Toggle { id, flag },
            } => {
                assert_eq!(id, "2");
                assert_eq!(flag, Flag::Newest);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
