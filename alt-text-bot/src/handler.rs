use anyhow::Result;
use rand::rngs::StdRng;
use serenity::all::{CreateEmbed, CreateMessage};
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{debug, error, info};

use crate::describer::OpenAiDescriber;
use crate::monitor::{AltTextMonitor, InboundMessage, Outcome, ReplySink};
use crate::presence;
use crate::stats::FileStats;

pub type Monitor = AltTextMonitor<OpenAiDescriber, FileStats, StdRng>;

pub struct Handler {
    monitor: Monitor,
}

impl Handler {
    pub fn new(monitor: Monitor) -> Self {
        Self { monitor }
    }
}

/// Replies to the triggering message with the reminder as a single embed.
struct MessageReply<'a> {
    ctx: &'a Context,
    msg: &'a Message,
}

fn reminder_message(msg: &Message, text: String) -> CreateMessage {
    CreateMessage::new()
        .embed(CreateEmbed::new().description(text))
        .reference_message(msg)
}

#[async_trait]
impl ReplySink for MessageReply<'_> {
    async fn send_reminder(&self, text: String) -> Result<()> {
        self.msg
            .channel_id
            .send_message(&self.ctx.http, reminder_message(self.msg, text))
            .await?;

        Ok(())
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        let current_user = ctx.cache.current_user().id;
        let inbound = InboundMessage::from_message(&msg, current_user);
        let reply = MessageReply {
            ctx: &ctx,
            msg: &msg,
        };

        // Failures stay scoped to this message; the user just sees no reminder
        match self.monitor.handle(&inbound, &reply).await {
            Ok(Outcome::Reminded { count }) => {
                info!("Reminded about message {} ({count} reminders total)", msg.id);
                presence::refresh(&ctx, self.monitor.stats(), ctx.cache.guild_count());
            }
            Ok(outcome) => debug!("No reminder for message {}: {outcome:?}", msg.id),
            Err(why) => error!("Error reminding about message {}: {why:?}", msg.id),
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            "{} is connected to {} servers!",
            ready.user.name,
            ready.guilds.len()
        );
        presence::refresh(&ctx, self.monitor.stats(), ready.guilds.len());
    }
}
