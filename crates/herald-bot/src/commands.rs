//! Slash commands
//!
//! `/link <twitch>`, `/unlink` and `/statut`, registered on the managed guild
//! and answered ephemerally.

use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use tracing::{debug, error, info};

use herald_core::Snowflake;
use herald_service::dto::LinkRequest;
use herald_service::{LinkService, ServiceContext, ServiceError};

pub const LINK: &str = "link";
pub const UNLINK: &str = "unlink";
pub const STATUS: &str = "statut";
const TWITCH_OPTION: &str = "twitch";

/// Command definitions pushed to the guild on ready
pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(LINK)
            .description("Lier ton compte Twitch pour le rôle et le pseudo en live")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, TWITCH_OPTION, "Ton pseudo Twitch")
                    .required(true),
            ),
        CreateCommand::new(UNLINK).description("Délier ton compte Twitch"),
        CreateCommand::new(STATUS).description("Voir le statut de ton live Twitch"),
    ]
}

/// A recognised command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Link { twitch: String },
    Unlink,
    Status,
}

impl BotCommand {
    /// Recognise a command by name; `/link` without its option is rejected
    pub fn parse(name: &str, twitch: Option<&str>) -> Option<Self> {
        match name {
            LINK => twitch.map(|t| Self::Link {
                twitch: t.to_string(),
            }),
            UNLINK => Some(Self::Unlink),
            STATUS => Some(Self::Status),
            _ => None,
        }
    }

    pub fn from_interaction(command: &CommandInteraction) -> Option<Self> {
        let twitch = command
            .data
            .options
            .iter()
            .find(|option| option.name == TWITCH_OPTION)
            .and_then(|option| option.value.as_str());
        Self::parse(&command.data.name, twitch)
    }

    /// Run the command for `member_id` and render the reply text
    pub async fn execute(self, services: &ServiceContext, member_id: Snowflake) -> String {
        let service = LinkService::new(services);
        let result = match self {
            Self::Link { twitch } => service
                .link(LinkRequest::new(member_id, twitch))
                .await
                .map(|r| r.message()),
            Self::Unlink => service.unlink(member_id).await.map(|r| r.message()),
            Self::Status => service.status(member_id).await.map(|r| r.message()),
        };

        match result {
            Ok(text) => {
                info!(member_id = %member_id, "Command handled");
                text
            }
            Err(e) => error_reply(&e),
        }
    }
}

/// User-facing text for a failed command
pub fn error_reply(err: &ServiceError) -> String {
    if err.is_user_error() {
        debug!(code = err.error_code(), "Command rejected");
    } else {
        error!(error = %err, "Command failed");
    }

    match err.error_code() {
        "INVALID_HANDLE" | "VALIDATION_ERROR" => {
            "Pseudo Twitch invalide : lettres, chiffres et `_` uniquement (25 caractères max).".to_string()
        }
        "HANDLE_ALREADY_LINKED" => "Ce compte Twitch est déjà lié à un autre membre.".to_string(),
        "UNKNOWN_LINK" => "Aucun compte Twitch lié. Utilise `/link` d'abord.".to_string(),
        _ => "Une erreur est survenue, réessaie plus tard.".to_string(),
    }
}
