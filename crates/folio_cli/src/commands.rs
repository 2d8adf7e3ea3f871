//! Command execution against an injected store.
//!
//! # Invariants
//! - Every command either writes one response to `out` or returns an error.
//! - Update commands patch the current record through
//!   `ContentManager::modify`, so validation sees the whole record.
//! - `reset` never loads the stored list first, so it also recovers a
//!   corrupt one.

use crate::args::{
    AcademiaAction, AcademiaAdd, AcademiaPatch, Command, Flag, ProjectAction, ProjectAdd,
    ProjectPatch, SectionAction, SocialAction, SocialAdd, SocialPatch,
};
use anyhow::{bail, Context, Result};
use folio_core::{
    AcademiaEntry, ContentError, ContentManager, Project, ProjectLinks, Record, RecordId, Section,
    SectionSettings, SocialLink, Store,
};
use serde::Serialize;
use std::io::Write;

/// JSON envelope for mutating commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    pub fn success(message: impl Into<String>, id: Option<&RecordId>) -> Self {
        Self {
            ok: true,
            id: id.map(ToString::to_string),
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// One-line human summary of a record.
trait Summary {
    fn summary(&self) -> String;
}

impl Summary for Project {
    fn summary(&self) -> String {
        let line = if self.technologies.is_empty() {
            self.title.clone()
        } else {
            format!("{} [{}]", self.title, self.technologies.join(", "))
        };
        with_hidden_marker(line, self.is_visible)
    }
}

impl Summary for AcademiaEntry {
    fn summary(&self) -> String {
        let line = match self.year.as_str() {
            "" => format!("{}, {}", self.title, self.institution),
            year => format!("{}, {} ({year})", self.title, self.institution),
        };
        with_hidden_marker(line, self.is_visible)
    }
}

fn with_hidden_marker(line: String, visible: bool) -> String {
    if visible {
        line
    } else {
        format!("{line} (hidden)")
    }
}

impl Summary for SocialLink {
    fn summary(&self) -> String {
        let state = if self.is_active { "active" } else { "inactive" };
        format!("{} {} ({state})", self.platform, self.url)
    }
}

/// In-place edit built from `update` flags.
trait Patch<T> {
    fn apply(self, record: &mut T);
}

impl Patch<Project> for ProjectPatch {
    fn apply(self, record: &mut Project) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if self.clear_image {
            record.image_url = None;
        } else if let Some(image_url) = self.image_url {
            record.image_url = Some(image_url);
        }
        if self.clear_tech {
            record.technologies.clear();
        } else if !self.technologies.is_empty() {
            record.technologies = self.technologies;
        }
        if self.clear_links {
            record.links = ProjectLinks::default();
        }
        if let Some(github) = self.github {
            record.links.github = Some(github);
        }
        if let Some(demo) = self.demo {
            record.links.demo = Some(demo);
        }
        if !self.links.is_empty() {
            record.links.other = self.links;
        }
    }
}

impl Patch<AcademiaEntry> for AcademiaPatch {
    fn apply(self, record: &mut AcademiaEntry) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(institution) = self.institution {
            record.institution = institution;
        }
        if let Some(year) = self.year {
            record.year = year;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if self.clear_link {
            record.link = None;
        } else if let Some(link) = self.link {
            record.link = Some(link);
        }
    }
}

impl Patch<SocialLink> for SocialPatch {
    fn apply(self, record: &mut SocialLink) {
        if let Some(platform) = self.platform {
            record.platform = platform;
        }
        if let Some(url) = self.url {
            record.url = url;
        }
        if let Some(active) = self.active {
            record.is_active = active;
        }
    }
}

/// Flips a per-record flag and returns its new state.
trait Toggle: Record + Sized {
    fn toggle<S: Store>(
        manager: &mut ContentManager<Self, S>,
        id: &RecordId,
        flag: Flag,
    ) -> Result<bool>;
}

impl Toggle for Project {
    fn toggle<S: Store>(
        manager: &mut ContentManager<Self, S>,
        id: &RecordId,
        flag: Flag,
    ) -> Result<bool> {
        Ok(match flag {
            Flag::Visible => manager.toggle_visible(id)?,
            Flag::Newest => manager.toggle_newest(id)?,
        })
    }
}

impl Toggle for AcademiaEntry {
    fn toggle<S: Store>(
        manager: &mut ContentManager<Self, S>,
        id: &RecordId,
        flag: Flag,
    ) -> Result<bool> {
        Ok(match flag {
            Flag::Visible => manager.toggle_visible(id)?,
            Flag::Newest => manager.toggle_newest(id)?,
        })
    }
}

/// A social link's visibility is its `isActive` switch.
impl Toggle for SocialLink {
    fn toggle<S: Store>(
        manager: &mut ContentManager<Self, S>,
        id: &RecordId,
        flag: Flag,
    ) -> Result<bool> {
        if flag == Flag::Newest {
            bail!("social links have no `newest` flag");
        }
        let active = manager.modify(id, |link| {
            link.is_active = !link.is_active;
            link.is_active
        })?;
        Ok(active)
    }
}

/// Record operation with CLI parsing already resolved.
enum RecordOp<T, P> {
    List,
    Show(RecordId),
    Add { record: T, generate_id: bool },
    Update(RecordId, P),
    Delete(RecordId),
    Toggle(RecordId, Flag),
    Reset,
}

impl From<ProjectAction> for RecordOp<Project, ProjectPatch> {
    fn from(action: ProjectAction) -> Self {
        match action {
            ProjectAction::List => Self::List,
            ProjectAction::Show { id } => Self::Show(id.into()),
            ProjectAction::Add(add) => project_from_add(add),
            ProjectAction::Update { id, patch } => Self::Update(id.into(), patch),
            ProjectAction::Delete { id } => Self::Delete(id.into()),
            ProjectAction::Toggle { id, flag } => Self::Toggle(id.into(), flag),
            ProjectAction::Reset => Self::Reset,
        }
    }
}

fn project_from_add(add: ProjectAdd) -> RecordOp<Project, ProjectPatch> {
    let generate_id = add.id.is_none();
    let mut record = Project::new(add.id.unwrap_or_default(), add.title)
        .with_description(add.description)
        .with_technologies(add.technologies);
    record.image_url = add.image_url;
    record.links.github = add.github;
    record.links.demo = add.demo;
    record.links.other = add.links;
    record.is_visible = !add.hidden;
    record.is_newest = add.newest;
    RecordOp::Add {
        record,
        generate_id,
    }
}

impl From<AcademiaAction> for RecordOp<AcademiaEntry, AcademiaPatch> {
    fn from(action: AcademiaAction) -> Self {
        match action {
            AcademiaAction::List => Self::List,
            AcademiaAction::Show { id } => Self::Show(id.into()),
            AcademiaAction::Add(add) => academia_from_add(add),
            AcademiaAction::Update { id, patch } => Self::Update(id.into(), patch),
            AcademiaAction::Delete { id } => Self::Delete(id.into()),
            AcademiaAction::Toggle { id, flag } => Self::Toggle(id.into(), flag),
            AcademiaAction::Reset => Self::Reset,
        }
    }
}

fn academia_from_add(add: AcademiaAdd) -> RecordOp<AcademiaEntry, AcademiaPatch> {
    let generate_id = add.id.is_none();
    let mut record = AcademiaEntry::new(
        add.id.unwrap_or_default(),
        add.title,
        add.institution,
        add.year,
    )
    .with_description(add.description);
    record.link = add.link;
    record.is_visible = !add.hidden;
    record.is_newest = add.newest;
    RecordOp::Add {
        record,
        generate_id,
    }
}

impl From<SocialAction> for RecordOp<SocialLink, SocialPatch> {
    fn from(action: SocialAction) -> Self {
        match action {
            SocialAction::List => Self::List,
            SocialAction::Show { id } => Self::Show(id.into()),
            SocialAction::Add(add) => social_from_add(add),
            SocialAction::Update { id, patch } => Self::Update(id.into(), patch),
            SocialAction::Delete { id } => Self::Delete(id.into()),
            SocialAction::Toggle { id, flag } => Self::Toggle(id.into(), flag),
            SocialAction::Reset => Self::Reset,
        }
    }
}

fn social_from_add(add: SocialAdd) -> RecordOp<SocialLink, SocialPatch> {
    let generate_id = add.id.is_none();
    let mut record = SocialLink::new(add.id.unwrap_or_default(), add.platform, add.url);
    record.is_active = !add.inactive;
    RecordOp::Add {
        record,
        generate_id,
    }
}

/// Executes one parsed command.
pub fn run<S, W>(store: &S, command: Command, json: bool, out: &mut W) -> Result<()>
where
    S: Store,
    W: Write,
{
    match command {
        Command::Init => run_init(store, json, out),
        Command::Projects { action } => {
            run_records(store, RecordOp::<Project, ProjectPatch>::from(action), json, out)
        }
        Command::Academia { action } => run_records(
            store,
            RecordOp::<AcademiaEntry, AcademiaPatch>::from(action),
            json,
            out,
        ),
        Command::Social { action } => {
            run_records(store, RecordOp::<SocialLink, SocialPatch>::from(action), json, out)
        }
        Command::Sections { action } => run_sections(store, action, json, out),
    }
}

fn run_init<S: Store, W: Write>(store: &S, json: bool, out: &mut W) -> Result<()> {
    let seeded = [
        (Project::KIND, ContentManager::<Project, _>::new(store).initialize()?),
        (
            AcademiaEntry::KIND,
            ContentManager::<AcademiaEntry, _>::new(store).initialize()?,
        ),
        (
            SocialLink::KIND,
            ContentManager::<SocialLink, _>::new(store).initialize()?,
        ),
    ];

    let fresh: Vec<&str> = seeded
        .iter()
        .filter(|(_, was_seeded)| *was_seeded)
        .map(|(kind, _)| *kind)
        .collect();
    let message = if fresh.is_empty() {
        "All content already initialized.".to_string()
    } else {
        format!("Seeded {}.", fresh.join(", "))
    };
    respond(out, json, &ActionResponse::success(message, None))
}

fn run_records<T, P, S, W>(store: &S, op: RecordOp<T, P>, json: bool, out: &mut W) -> Result<()>
where
    T: Record + Summary + Toggle,
    P: Patch<T>,
    S: Store,
    W: Write,
{
    match op {
        RecordOp::List => {
            let manager = load::<T, _>(store)?;
            if json {
                print_json(out, manager.items())
            } else {
                for item in manager.items() {
                    writeln!(out, "{}\t{}", item.id(), item.summary())?;
                }
                Ok(())
            }
        }
        RecordOp::Show(id) => {
            let manager = load::<T, _>(store)?;
            let record = manager
                .get(&id)
                .ok_or_else(|| ContentError::NotFound(id.clone()))?;
            print_json(out, record)
        }
        RecordOp::Add {
            record,
            generate_id,
        } => {
            let mut manager = load::<T, _>(store)?;
            let id = if generate_id {
                manager.create(record)?
            } else {
                manager.add(record)?
            };
            let message = format!("Added {}/{id}.", T::KIND);
            respond(out, json, &ActionResponse::success(message, Some(&id)))
        }
        RecordOp::Update(id, patch) => {
            let mut manager = load::<T, _>(store)?;
            manager.modify(&id, |record| patch.apply(record))?;
            let message = format!("Updated {}/{id}.", T::KIND);
            respond(out, json, &ActionResponse::success(message, Some(&id)))
        }
        RecordOp::Delete(id) => {
            load::<T, _>(store)?.delete(&id)?;
            let message = format!("Deleted {}/{id}.", T::KIND);
            respond(out, json, &ActionResponse::success(message, Some(&id)))
        }
        RecordOp::Toggle(id, flag) => {
            let mut manager = load::<T, _>(store)?;
            let state = T::toggle(&mut manager, &id, flag)?;
            let message = format!("Set {} on {}/{id} to {state}.", flag.as_str(), T::KIND);
            respond(out, json, &ActionResponse::success(message, Some(&id)))
        }
        RecordOp::Reset => {
            let mut manager = ContentManager::<T, _>::new(store);
            manager.reset()?;
            let message = format!("Reset {} to {} default record(s).", T::KIND, manager.len());
            respond(out, json, &ActionResponse::success(message, None))
        }
    }
}

fn load<T: Record, S: Store>(store: S) -> Result<ContentManager<T, S>> {
    ContentManager::open(store).with_context(|| format!("failed to load {}", T::KIND))
}

fn run_sections<S: Store, W: Write>(
    store: &S,
    action: SectionAction,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let mut settings = SectionSettings::open(store).context("failed to load section settings")?;

    let (section, visible) = match action {
        SectionAction::Show => {
            if json {
                return print_json(out, settings.visibility());
            }
            for section in Section::ALL {
                writeln!(out, "{section}\t{}", visibility_label(settings.is_visible(section)))?;
            }
            return Ok(());
        }
        SectionAction::Set { section, state } => {
            settings.set(section, state.is_on())?;
            (section, state.is_on())
        }
        SectionAction::Toggle { section } => (section, settings.toggle(section)?),
    };

    let message = format!("Section {section} is now {}.", visibility_label(visible));
    respond(out, json, &ActionResponse::success(message, None))
}

fn visibility_label(visible: bool) -> &'static str {
    if visible {
        "visible"
    } else {
        "hidden"
    }
}

fn respond<W: Write>(out: &mut W, json: bool, response: &ActionResponse) -> Result<()> {
    if json {
        print_json(out, response)
    } else {
        writeln!(out, "{}", response.message)?;
        Ok(())
    }
}

fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, ActionResponse};
    use crate::args::Cli;
    use clap::Parser;
    use folio_core::{read_list, ContentError, MemoryStore, Project, Record, Store};

    fn exec(store: &MemoryStore, argv: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("folio").chain(argv.iter().copied()))?;
        let mut out = Vec::new();
        run(store, cli.command, cli.json, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn init_reports_seeded_kinds_once() {
        let store = MemoryStore::new();
        assert_eq!(
            exec(&store, &["init"]).unwrap(),
            "Seeded projects, academia, social.\n"
        );
        assert_eq!(
            exec(&store, &["init"]).unwrap(),
            "All content already initialized.\n"
        );
    }

    #[test]
    fn project_list_prints_one_line_per_record() {
        let store = MemoryStore::new();
        let output = exec(&store, &["projects", "list"]).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "1\tEnergy Data Analysis Dashboard [React, D3.js, Python]"
        );
    }

    #[test]
    fn add_then_update_in_json_mode() {
        let store = MemoryStore::new();
        let added = exec(
            &store,
            &["projects", "add", "--id", "x", "--title", "T", "--json"],
        )
        .unwrap();
        let response: serde_json::Value = serde_json::from_str(&added).unwrap();
        assert_eq!(response["ok"], true);
        assert_eq!(response["id"], "x");

        exec(&store, &["projects", "update", "x", "--title", "T2"]).unwrap();
        let listed = exec(&store, &["projects", "list", "--json"]).unwrap();
        let items: serde_json::Value = serde_json::from_str(&listed).unwrap();
        assert_eq!(items.as_array().unwrap().len(), 3);
        assert_eq!(items[2]["title"], "T2");
    }

    #[test]
    fn add_without_id_generates_one() {
        let store = MemoryStore::new();
        let output = exec(
            &store,
            &[
                "academia",
                "add",
                "--title",
                "Postdoc",
                "--institution",
                "Grid Lab",
                "--year",
                "2023",
            ],
        )
        .unwrap();
        assert!(output.starts_with("Added academia/"));
        assert!(!output.contains("academia/.")); // id must not be empty
    }

    #[test]
    fn delete_unknown_id_surfaces_not_found() {
        let store = MemoryStore::new();
        let err = exec(&store, &["social", "delete", "99"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::NotFound(_))
        ));
    }

    #[test]
    fn social_update_can_activate_placeholder() {
        let store = MemoryStore::new();
        exec(
            &store,
            &[
                "social",
                "update",
                "4",
                "--url",
                "https://x.com/someone",
                "--active",
                "true",
            ],
        )
        .unwrap();
        let shown = exec(&store, &["social", "show", "4"]).unwrap();
        let link: serde_json::Value = serde_json::from_str(&shown).unwrap();
        assert_eq!(link["isActive"], true);
        assert_eq!(link["url"], "https://x.com/someone");
    }

    #[test]
    fn sections_toggle_and_show() {
        let store = MemoryStore::new();
        assert_eq!(
            exec(&store, &["sections", "toggle", "academia"]).unwrap(),
            "Section academia is now hidden.\n"
        );
        let shown = exec(&store, &["sections", "show"]).unwrap();
        assert!(shown.contains("academia\thidden"));
        assert!(shown.contains("hero\tvisible"));
        assert!(store.contains("website_section_visibility").unwrap());
    }

    #[test]
    fn corrupt_store_fails_to_load() {
        let store = MemoryStore::new();
        store.set("website_academia_data", "{{{").unwrap();
        let err = exec(&store, &["academia", "list"]).unwrap_err();
        assert!(err.to_string().contains("failed to load academia"));
    }

    #[test]
    fn failure_envelope_omits_id() {
        let json = serde_json::to_value(ActionResponse::failure("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"ok": false, "message": "boom"}));
    }

    #[test]
    fn reset_recovers_a_corrupt_list() {
        let store = MemoryStore::new();
        store.set("website_projects_data", "not json").unwrap();
        assert!(exec(&store, &["projects", "list"]).is_err());

        assert_eq!(
            exec(&store, &["projects", "reset"]).unwrap(),
            "Reset projects to 2 default record(s).\n"
        );
        let stored: Vec<Project> = read_list(&store, "website_projects_data");
        assert_eq!(stored, Project::defaults());
    }

    #[test]
    fn load_failure_chain_names_the_decoder_error_once() {
        let store = MemoryStore::new();
        store.set("website_projects_data", "not json").unwrap();
        let err = exec(&store, &["projects", "list"]).unwrap_err();

        let chain = format!("{err:#}");
        assert!(chain.starts_with("failed to load projects: "), "{chain}");
        assert_eq!(chain.matches("line 1 column").count(), 1, "{chain}");
    }

    #[test]
    fn clear_tech_empties_the_tag_list() {
        let store = MemoryStore::new();
        exec(&store, &["projects", "update", "1", "--clear-tech"]).unwrap();
        let shown = exec(&store, &["projects", "show", "1"]).unwrap();
        let project: serde_json::Value = serde_json::from_str(&shown).unwrap();
        assert!(project.get("technologies").is_none(), "{shown}");
        assert_eq!(project["title"], "Energy Data Analysis Dashboard");
    }

    #[test]
    fn project_links_can_be_added_and_cleared() {
        let store = MemoryStore::new();
        exec(
            &store,
            &[
                "projects",
                "update",
                "2",
                "--github",
                "https://github.com/me/forecast",
                "--link",
                "Paper=https://doi.org/10.1/x",
            ],
        )
        .unwrap();
        let shown = exec(&store, &["projects", "show", "2"]).unwrap();
        let project: serde_json::Value = serde_json::from_str(&shown).unwrap();
        assert_eq!(project["links"]["github"], "https://github.com/me/forecast");
        assert_eq!(project["links"]["other"][0]["label"], "Paper");

        exec(&store, &["projects", "update", "2", "--clear-links"]).unwrap();
        let shown = exec(&store, &["projects", "show", "2"]).unwrap();
        let project: serde_json::Value = serde_json::from_str(&shown).unwrap();
        assert!(project.get("links").is_none(), "{shown}");
    }

    #[test]
    fn invalid_link_is_rejected_without_writing() {
        let store = MemoryStore::new();
        exec(&store, &["init"]).unwrap();
        let before = store.get("website_projects_data").unwrap();

        let err = exec(&store, &["projects", "update", "1", "--demo", "not a url"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::Validation(_))
        ));
        assert_eq!(store.get("website_projects_data").unwrap(), before);
    }

    #[test]
    fn toggle_hides_a_project_in_the_listing() {
        let store = MemoryStore::new();
        assert_eq!(
            exec(&store, &["projects", "toggle", "2", "visible"]).unwrap(),
            "Set visible on projects/2 to false.\n"
        );
        let output = exec(&store, &["projects", "list"]).unwrap();
        assert!(output.lines().nth(1).unwrap().ends_with("(hidden)"), "{output}");
        assert!(!output.lines().next().unwrap().ends_with("(hidden)"));
    }

    #[test]
    fn academia_toggle_newest_persists() {
        let store = MemoryStore::new();
        exec(&store, &["academia", "toggle", "1", "newest"]).unwrap();
        let shown = exec(&store, &["academia", "show", "1"]).unwrap();
        let entry: serde_json::Value = serde_json::from_str(&shown).unwrap();
        assert_eq!(entry["isNewest"], true);
        assert_eq!(entry["isVisible"], true);
    }

    #[test]
    fn social_toggle_flips_active_and_has_no_newest_flag() {
        let store = MemoryStore::new();
        assert_eq!(
            exec(&store, &["social", "toggle", "1", "visible"]).unwrap(),
            "Set visible on social/1 to false.\n"
        );
        let err = exec(&store, &["social", "toggle", "1", "newest"]).unwrap_err();
        assert!(err.to_string().contains("no `newest` flag"));

        // The placeholder has no URL, so it cannot be switched on.
        let err = exec(&store, &["social", "toggle", "4", "visible"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::Validation(_))
        ));
    }
}
