use super::role::{RoleApi, RoleSnapshot, RoleUpdate};
use crate::data::palette::PaletteCursor;
use anyhow::Result;
use serenity::model::id::{GuildId, RoleId};
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Walks one role through the palette, one colour per interval.
pub(crate) struct ColorCycle<A> {
    api: A,
    guild_id: GuildId,
    role_id: RoleId,
    period: Duration,
    cursor: PaletteCursor,
}

impl<A: RoleApi> ColorCycle<A> {
    pub(crate) fn new(api: A, guild_id: GuildId, role_id: RoleId, period: Duration) -> Self {
        ColorCycle {
            api,
            guild_id,
            role_id,
            period,
            cursor: PaletteCursor::default(),
        }
    }

    /// Recolours the role once and returns the role as Discord saved it. The
    /// cursor moves even if the lookup or the edit fails; nothing is retried.
    pub(crate) async fn tick(&mut self) -> Result<RoleSnapshot> {
        let colour = self.cursor.advance();
        let role = self.api.role(self.guild_id, self.role_id).await?;
        debug!(
            "Role {} is {:06x}, switching to {:06x}",
            role.name, role.colour.0, colour.0
        );
        let update = RoleUpdate::recolour(&role, colour);
        self.api
            .edit_role(self.guild_id, self.role_id, &update)
            .await
    }

    /// Ticks every `period` until `shutdown` resolves. The first tick comes a
    /// full period after the call. A tick already in flight is finished
    /// before the shutdown is noticed.
    pub(crate) async fn run<S>(mut self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Stopping color cycle");
                    break;
                }
                _ = ticker.tick() => match self.tick().await {
                    Ok(saved) => {
                        info!("Updated role {} color to {:06x}", saved.name, saved.colour.0)
                    }
                    Err(why) => warn!("Error updating role color: {:#}", why),
                },
            }
        }
    }
}
