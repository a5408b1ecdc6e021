//! Slash-command execution.
//!
//! Takes the raw argument string of a `/jira` invocation, runs it against
//! the connection registry and the Jira API, and produces the reply the chat
//! host shows to the user. Expected failures (unknown project, issue not
//! visible, nothing installed yet) are rendered as reply text; only store
//! and transport failures propagate as errors.

use thiserror::Error;

use crate::jira::types::Project;
use crate::jira::{JiraApi, JiraApiError, JiraErrorKind};
use crate::notify::{Notification, issue_card, project_card, url_origin};
use crate::registry::{ConnectionRegistry, RegistryError};
use crate::types::{ProjectKey, ProjectRef, RoomId};

use super::parser::{ParseCommandError, parse_command};
use super::types::Command;

/// Errors that escape command execution.
///
/// Everything a user can fix by typing something else is rendered into the
/// reply instead.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The connection registry could not be read or written.
    #[error("registry error: {0}")]
    Registry(RegistryError),

    /// The Jira API failed in a way the user cannot act on.
    #[error(transparent)]
    Jira(#[from] JiraApiError),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

const HELP_TEXT: &str = "These are the commands I can understand:
`/jira install` Instructions to install the app on a Jira instance
`/jira connect` Connects this room to a Jira project
`/jira disconnect` Disconnects this room from a Jira project
`/jira ISSUEKEY-123` Show information about a specific issue
`/jira help` Shows this message";

const NOT_INSTALLED_TEXT: &str =
    "No Jira instance is installed yet. Type `/jira install` for installation instructions";

/// Runs one `/jira` invocation for a room and returns the reply.
///
/// # Errors
///
/// Returns an error only for registry store failures and transient Jira
/// failures; every expected outcome becomes reply text.
pub async fn run_command<J: JiraApi>(
    registry: &ConnectionRegistry,
    jira: &J,
    room: &RoomId,
    args: &str,
    app_base_url: &str,
) -> Result<Notification> {
    let command = match parse_command(args) {
        Ok(command) => command,
        Err(ParseCommandError::InvalidIssueKey(word)) => {
            return Ok(Notification::text_only(format!(
                "Issue \"{}\" not found",
                word
            )));
        }
    };

    match command {
        Command::Help => Ok(Notification::text_only(HELP_TEXT)),
        Command::Install => Ok(install_instructions(app_base_url)),
        Command::Connect(None) => list_projects_to_connect(registry, jira, room).await,
        Command::Connect(Some(key)) => connect_project(registry, jira, room, &key).await,
        Command::Disconnect(None) => list_projects_to_disconnect(registry, room),
        Command::Disconnect(Some(key)) => disconnect_project(registry, room, &key),
        Command::IssueLookup(key) => issue_lookup(registry, jira, room, &key).await,
    }
}

fn install_instructions(app_base_url: &str) -> Notification {
    let manifest_url = format!(
        "{}/atlassian-connect.json",
        app_base_url.trim_end_matches('/')
    );

    Notification::text_only(format!(
        "These are the steps to install the Jira App in your Jira Cloud instance:

- Log in to your Jira, as an administrator
- Go to *Jira Settings* > *Apps* > *Manage apps*
- Click on *Settings* below the \"User-installed apps\" list
- Check the \"Enable development mode\" checkbox and click on *Save*
- Click on *Upload app*
- In the field \"From this URL\", paste the following URL: `{}`
- Click on *Upload*

Done!
Now this app will be installed on the instance
The next step is to connect to the available Jira projects so you start receiving notifications",
        manifest_url
    ))
}

/// A markdown list item linking one project's browse page.
fn project_list_item(project: &Project) -> String {
    let link = url_origin(&project.self_url)
        .map(|origin| format!("{}/browse/{}", origin, project.key))
        .unwrap_or_else(|| project.self_url.clone());

    match &project.description {
        Some(description) if !description.is_empty() => format!(
            "- [{} - {}]({}) {}",
            project.key, project.name, link, description
        ),
        _ => format!("- [{} - {}]({})", project.key, project.name, link),
    }
}

async fn list_projects_to_connect<J: JiraApi>(
    registry: &ConnectionRegistry,
    jira: &J,
    room: &RoomId,
) -> Result<Notification> {
    let page = match jira.list_projects().await {
        Ok(page) => page,
        Err(e) if e.kind == JiraErrorKind::NotInstalled => {
            return Ok(Notification::text_only(NOT_INSTALLED_TEXT));
        }
        Err(e) => return Err(e.into()),
    };

    let connected_keys: Vec<ProjectKey> = registry
        .get_connections(Some(room))
        .map_err(CommandError::Registry)?
        .into_iter()
        .flat_map(|record| record.connected_projects.into_keys())
        .collect();

    let mut connected = Vec::new();
    let mut available = Vec::new();
    for project in &page.values {
        let item = project_list_item(project);
        if connected_keys.contains(&project.key) {
            connected.push(item);
        } else {
            available.push(item);
        }
    }

    let mut sections = Vec::new();
    if !connected.is_empty() {
        sections.push(format!(
            "These are the projects already connected to this room:\n{}",
            connected.join("\n")
        ));
    }
    if available.is_empty() {
        sections.push("There are currently no available projects for you to connect :/".to_string());
    } else {
        sections.push(format!(
            "These are the currently available projects for you to connect to:\n{}\n\nYou can connect to Jira projects by typing `/jira connect PROJECT_KEY`",
            available.join("\n")
        ));
    }

    Ok(Notification::text_only(sections.join("\n\n")))
}

async fn connect_project<J: JiraApi>(
    registry: &ConnectionRegistry,
    jira: &J,
    room: &RoomId,
    key: &ProjectKey,
) -> Result<Notification> {
    let page = match jira.search_projects(key.as_str()).await {
        Ok(page) => page,
        Err(e) if e.kind == JiraErrorKind::NotInstalled => {
            return Ok(Notification::text_only(NOT_INSTALLED_TEXT));
        }
        Err(e) => return Err(e.into()),
    };

    // The search matches key and name fragments; only an exact key match
    // counts as the requested project.
    let Some(project) = page.values.iter().find(|p| &p.key == key) else {
        return Ok(Notification::text_only(format!(
            "Project with key \"{}\" not found",
            key
        )));
    };

    registry
        .connect(
            room,
            ProjectRef::new(
                project.id.clone(),
                project.self_url.clone(),
                project.key.clone(),
                project.name.clone(),
            ),
        )
        .map_err(CommandError::Registry)?;

    Ok(Notification::with_attachment(
        format!(
            "Jira project *{}* successfully connected! This room will now receive notifications about updates.",
            project.name
        ),
        project_card(project),
    ))
}

fn list_projects_to_disconnect(
    registry: &ConnectionRegistry,
    room: &RoomId,
) -> Result<Notification> {
    let projects: Vec<ProjectRef> = registry
        .get_connections(Some(room))
        .map_err(CommandError::Registry)?
        .into_iter()
        .flat_map(|record| record.connected_projects.into_values())
        .collect();

    if projects.is_empty() {
        return Ok(Notification::text_only(
            "There are no connected projects in this room",
        ));
    }

    let items: Vec<String> = projects
        .iter()
        .map(|project| {
            let link = url_origin(&project.self_url)
                .map(|origin| format!("{}/browse/{}", origin, project.key))
                .unwrap_or_else(|| project.self_url.clone());
            format!("[{} - {}]({})", project.key, project.name, link)
        })
        .collect();

    Ok(Notification::text_only(format!(
        "These are the currently connected projects in this room:\n{}\n\nYou can disconnect a Jira project by typing `/jira disconnect PROJECT_KEY`",
        items.join("\n")
    )))
}

fn disconnect_project(
    registry: &ConnectionRegistry,
    room: &RoomId,
    key: &ProjectKey,
) -> Result<Notification> {
    match registry.disconnect(room, key) {
        Ok(removed) => Ok(Notification::text_only(format!(
            "Jira project *{}* successfully disconnected! This room will no longer receive notifications.",
            removed.name
        ))),
        Err(RegistryError::NotConnected { .. }) => Ok(Notification::text_only(format!(
            "Project with key \"{}\" is not connected",
            key
        ))),
        Err(e) => Err(CommandError::Registry(e)),
    }
}

async fn issue_lookup<J: JiraApi>(
    registry: &ConnectionRegistry,
    jira: &J,
    room: &RoomId,
    key: &crate::types::IssueKey,
) -> Result<Notification> {
    let not_found = || Notification::text_only(format!("Issue \"{}\" not found", key));

    let issue = match jira.get_issue(key).await {
        Ok(issue) => issue,
        Err(e) if e.kind == JiraErrorKind::NotInstalled => {
            return Ok(Notification::text_only(NOT_INSTALLED_TEXT));
        }
        Err(e) if e.kind == JiraErrorKind::Permanent => return Ok(not_found()),
        Err(e) => return Err(e.into()),
    };

    // Issues in unconnected projects stay invisible to the room.
    let visible = match issue.key.project_key() {
        Some(project) => registry
            .is_project_connected(&project, Some(room))
            .map_err(CommandError::Registry)?,
        None => false,
    };
    if !visible {
        return Ok(not_found());
    }

    Ok(Notification::with_attachment(String::new(), issue_card(&issue)))
}
