use serenity::all::{ActivityData, Context};
use tracing::warn;

use crate::stats::StatsStore;

pub fn status_line(reminders: u64, guilds: usize) -> String {
    format!("Reminded about alt text {reminders} times on {guilds} servers.")
}

/// Recomputes the "Playing" status from the stats store.
pub fn refresh(ctx: &Context, stats: &dyn StatsStore, guilds: usize) {
    let reminders = match stats.read() {
        Ok(reminders) => reminders,
        Err(why) => {
            warn!("Leaving presence unchanged, can't read stats: {why:?}");
            return;
        }
    };

    let status = status_line(reminders, guilds);
    ctx.set_activity(Some(ActivityData::playing(status)));
}
