// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `@` command surface and reply formatting.
//!
//! Commands always get a reply, independent of the conversation's reply
//! toggle. Attachment outcome replies go through [`outcome_reply`] and are
//! only sent when the toggle is on.

use attache_archive::{ArchiveBrowser, ConversationSettings};
use attache_core::{AttachmentCategory, ConversationKey, UploadOutcome};

/// Help text returned by `@help` and on malformed commands.
pub const HELP_TEXT: &str = "\
Commands:
@help - show this message
@replies on|off - toggle replies for archived attachments
@local on|off - toggle archiving to local storage
@cloud on|off - toggle uploading to cloud storage
@folder <id> - set the cloud parent folder for this chat
@list - list the files archived for this chat
@search <keyword> - find archived files by name
@delete <name> - delete one archived file by name";

/// A parsed `@` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Replies(bool),
    Local(bool),
    Cloud(bool),
    Folder(String),
    List,
    Search(String),
    Delete(String),
}

/// Everything a command needs to act on one conversation.
pub struct CommandContext<'a> {
    pub settings: &'a ConversationSettings,
    pub browser: &'a ArchiveBrowser,
    pub key: &'a ConversationKey,
    /// Display name of the conversation, used to locate its archive on disk.
    pub display_name: &'a str,
}

impl Command {
    /// Parses a text message as a command.
    ///
    /// Returns `None` when the text is not addressed to the bot (no leading
    /// `@`), and `Some(Err(usage))` when it is but the arguments are wrong.
    /// The verb is matched before the arguments so that a known command with
    /// the wrong arity reports its own usage instead of "unknown command".
    pub fn parse(text: &str) -> Option<Result<Command, String>> {
        let text = text.trim();
        if !text.starts_with('@') {
            return None;
        }
        let (head, rest) = match text.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (text, ""),
        };
        let arg = (!rest.is_empty()).then_some(rest);

        let parsed = match head {
            "@help" => match arg {
                None => Ok(Command::Help),
                Some(_) => Err("@help takes no arguments".to_string()),
            },
            "@replies" => toggle_arg(arg).map(Command::Replies),
            "@local" => toggle_arg(arg).map(Command::Local),
            "@cloud" => toggle_arg(arg).map(Command::Cloud),
            "@folder" => match arg {
                Some(id) if !id.contains(char::is_whitespace) => {
                    Ok(Command::Folder(id.to_string()))
                }
                Some(_) => Err("expected a single folder id".to_string()),
                None => Err("expected a folder id".to_string()),
            },
            "@list" => match arg {
                None => Ok(Command::List),
                Some(_) => Err("@list takes no arguments".to_string()),
            },
            "@search" => match arg {
                Some(keyword) => Ok(Command::Search(keyword.to_string())),
                None => Err("expected a keyword".to_string()),
            },
            "@delete" => match arg {
                Some(name) => Ok(Command::Delete(name.to_string())),
                None => Err("expected a file name".to_string()),
            },
            _ => Err("unknown command".to_string()),
        };
        Some(parsed.map_err(|reason| format!("{reason}\n\n{HELP_TEXT}")))
    }

    /// Applies the command to the conversation and returns the reply text.
    pub async fn apply(self, ctx: &CommandContext<'_>) -> String {
        match self {
            Command::Help => HELP_TEXT.to_string(),
            Command::Replies(enabled) => {
                ctx.settings.set_reply_enabled(ctx.key, enabled).await;
                format!("Replies are now {}.", on_off(enabled))
            }
            Command::Local(enabled) => {
                ctx.settings.set_local_enabled(ctx.key, enabled).await;
                format!("Local archiving is now {}.", on_off(enabled))
            }
            Command::Cloud(true) => match ctx.settings.enable_cloud(ctx.key).await {
                Ok(()) => "Cloud upload is now on.".to_string(),
                Err(e) => format!("Cannot enable cloud upload: {e}"),
            },
            Command::Cloud(false) => {
                ctx.settings.disable_cloud(ctx.key).await;
                "Cloud upload is now off.".to_string()
            }
            Command::Folder(id) => {
                ctx.settings.set_folder(ctx.key, id).await;
                "Cloud folder updated for this chat.".to_string()
            }
            Command::List => match ctx.browser.list(ctx.display_name).await {
                Ok(groups) if groups.is_empty() => {
                    "No archived files in this chat.".to_string()
                }
                Ok(groups) => render_groups(&groups),
                Err(e) => format!("Could not list archived files: {e}"),
            },
            Command::Search(keyword) => {
                match ctx.browser.search(ctx.display_name, &keyword).await {
                    Ok(groups) if groups.is_empty() => format!("No matches for {keyword}."),
                    Ok(groups) => render_groups(&groups),
                    Err(e) => format!("Could not search archived files: {e}"),
                }
            }
            Command::Delete(name) => {
                match ctx.browser.delete(ctx.display_name, &name).await {
                    Ok(Some(_)) => format!("Deleted {name}."),
                    Ok(None) => format!("No archived file named {name}."),
                    Err(e) => format!("Could not delete {name}: {e}"),
                }
            }
        }
    }
}

fn toggle_arg(arg: Option<&str>) -> Result<bool, String> {
    match arg {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        Some(other) => Err(format!("expected on or off, got '{other}'")),
        None => Err("expected on or off".to_string()),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn category_label(category: AttachmentCategory) -> &'static str {
    match category {
        AttachmentCategory::Image => "Image",
        AttachmentCategory::Document => "File",
        AttachmentCategory::Video => "Video",
    }
}

fn render_groups(groups: &[(AttachmentCategory, Vec<String>)]) -> String {
    let mut lines = Vec::new();
    for (category, names) in groups {
        lines.push(format!("{}:", category.subdir()));
        for name in names {
            lines.push(format!("  {name}"));
        }
    }
    lines.join("\n")
}

/// Formats the reply for a processed attachment.
pub fn outcome_reply(outcome: &UploadOutcome) -> String {
    if !outcome.local_enabled && !outcome.cloud_enabled {
        return "Local archiving and cloud upload are both disabled.".to_string();
    }

    let mut lines = vec![format!(
        "{} saved as {}.",
        category_label(outcome.category),
        outcome.name
    )];
    if outcome.local_path.is_some() {
        lines.push("Archived to local storage.".to_string());
    }
    if let Some(error) = &outcome.local_error {
        lines.push(format!("Local archiving failed: {error}"));
    }
    if let Some(link) = &outcome.cloud_link {
        lines.push(format!("Cloud link: {link}"));
    }
    if let Some(error) = &outcome.cloud_error {
        lines.push(format!("Cloud upload failed: {error}"));
    }
    lines.join("\n")
}
