//! Gateway event handler
//!
//! Translates serenity events into service calls. Only events for the
//! managed guild are considered.

use serenity::all::{
    ActivityData, ActivityType, Context, EditInteractionResponse, EventHandler, Guild, GuildId,
    Interaction, Member, Presence, Ready, ResumedEvent, User,
};
use serenity::model::gateway::Activity;
use tracing::{debug, error, info, warn};

use herald_core::Snowflake;
use herald_service::{LinkService, MemberOutcome, ReconciliationService};

use crate::commands::{self, BotCommand};
use crate::platform::to_guild_id;
use crate::state::BotState;

/// Activity shown under the bot's name
const BOT_ACTIVITY: &str = "/link";

/// Serenity event handler
pub struct Handler {
    state: BotState,
}

impl Handler {
    pub fn new(state: BotState) -> Self {
        Self { state }
    }

    fn is_managed(&self, guild_id: Option<GuildId>) -> bool {
        guild_id == Some(to_guild_id(self.state.guild_id()))
    }
}

/// Names of the member's "Playing" activities
pub fn playing_names(activities: &[Activity]) -> impl Iterator<Item = &str> + Send {
    activities
        .iter()
        .filter(|activity| activity.kind == ActivityType::Playing)
        .map(|activity| activity.name.as_str())
}

#[serenity::async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "Connected to gateway");
        ctx.set_activity(Some(ActivityData::custom(BOT_ACTIVITY)));

        let guild_id = to_guild_id(self.state.guild_id());
        match guild_id.set_commands(&ctx, commands::definitions()).await {
            Ok(registered) => info!(count = registered.len(), "Registered guild commands"),
            Err(e) => error!(error = %e, "Failed to register guild commands"),
        }

        self.state.runtime().set_gateway_connected(true);
    }

    async fn resume(&self, _ctx: Context, _event: ResumedEvent) {
        debug!("Gateway session resumed");
        self.state.runtime().set_gateway_connected(true);
    }

    /// Seed the activity observer from the presences delivered with the guild
    async fn guild_create(&self, _ctx: Context, guild: Guild, _is_new: Option<bool>) {
        if !self.is_managed(Some(guild.id)) {
            return;
        }

        let observer = self.state.services().observer();
        for presence in guild.presences.values() {
            let member_id = Snowflake::from_u64(presence.user.id.get());
            observer.observe_activities(member_id, playing_names(&presence.activities));
        }
        info!(
            guild = %guild.name,
            presences = guild.presences.len(),
            "Guild available; activity observer seeded"
        );
    }

    async fn presence_update(&self, _ctx: Context, presence: Presence) {
        if !self.is_managed(presence.guild_id) {
            return;
        }

        let member_id = Snowflake::from_u64(presence.user.id.get());
        let result = ReconciliationService::new(self.state.services())
            .handle_presence(member_id, playing_names(&presence.activities))
            .await;

        match result {
            Ok(Some(MemberOutcome::Reconciled { report, .. })) => {
                debug!(member_id = %member_id, applied = report.applied(), "Presence change reconciled");
            }
            Ok(_) => {}
            Err(e) => warn!(member_id = %member_id, error = %e, "Presence reconciliation failed"),
        }
    }

    async fn guild_member_removal(
        &self,
        _ctx: Context,
        guild_id: GuildId,
        user: User,
        _member: Option<Member>,
    ) {
        if !self.is_managed(Some(guild_id)) {
            return;
        }

        let member_id = Snowflake::from_u64(user.id.get());
        if let Err(e) = LinkService::new(self.state.services()).member_left(member_id).await {
            warn!(member_id = %member_id, error = %e, "Failed to clear departed member");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        let Some(parsed) = BotCommand::from_interaction(&command) else {
            debug!(name = %command.data.name, "Ignoring unknown command");
            return;
        };

        // Link probes Twitch and edits the member; acknowledge first
        if let Err(e) = command.defer_ephemeral(&ctx).await {
            warn!(error = %e, "Failed to acknowledge command");
            return;
        }

        let reply = if self.is_managed(command.guild_id) {
            let member_id = Snowflake::from_u64(command.user.id.get());
            parsed.execute(self.state.services(), member_id).await
        } else {
            "Cette commande n'est disponible que sur le serveur.".to_string()
        };

        if let Err(e) = command
            .edit_response(&ctx, EditInteractionResponse::new().content(reply))
            .await
        {
            warn!(error = %e, "Failed to send command reply");
        }
    }
}
