use anyhow::{anyhow, Context, Result};
use serenity::async_trait;
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::guild::Role;
use serenity::model::id::{GuildId, RoleId};
use serenity::model::Permissions;
use serenity::utils::Colour;
use std::sync::Arc;

/// The fields of a role that survive a recolour.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RoleSnapshot {
    pub(crate) name: String,
    pub(crate) colour: Colour,
    pub(crate) hoist: bool,
    pub(crate) permissions: Permissions,
    pub(crate) mentionable: bool,
}

impl From<&Role> for RoleSnapshot {
    fn from(role: &Role) -> Self {
        RoleSnapshot {
            name: role.name.clone(),
            colour: role.colour,
            hoist: role.hoist,
            permissions: role.permissions,
            mentionable: role.mentionable,
        }
    }
}

/// Full edit payload: the new colour plus everything else copied from the
/// role as it was just read.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RoleUpdate {
    pub(crate) name: String,
    pub(crate) colour: Colour,
    pub(crate) hoist: bool,
    pub(crate) permissions: Permissions,
    pub(crate) mentionable: bool,
}

impl RoleUpdate {
    pub(crate) fn recolour(role: &RoleSnapshot, colour: Colour) -> Self {
        RoleUpdate {
            name: role.name.clone(),
            colour,
            hoist: role.hoist,
            permissions: role.permissions,
            mentionable: role.mentionable,
        }
    }
}

#[async_trait]
pub(crate) trait RoleApi: Send + Sync {
    async fn role(&self, guild_id: GuildId, role_id: RoleId) -> Result<RoleSnapshot>;

    async fn edit_role(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
        update: &RoleUpdate,
    ) -> Result<RoleSnapshot>;
}

/// Roles as seen by a live serenity session.
#[derive(Clone)]
pub(crate) struct SerenityRoles {
    cache: Arc<Cache>,
    http: Arc<Http>,
}

impl SerenityRoles {
    pub(crate) fn new(cache: Arc<Cache>, http: Arc<Http>) -> Self {
        SerenityRoles { cache, http }
    }
}

#[async_trait]
impl RoleApi for SerenityRoles {
    async fn role(&self, guild_id: GuildId, role_id: RoleId) -> Result<RoleSnapshot> {
        if let Some(role) = self.cache.role(guild_id, role_id) {
            return Ok(RoleSnapshot::from(&role));
        }

        // Cache is empty until the guild create event arrives.
        let roles = guild_id
            .roles(&self.http)
            .await
            .with_context(|| format!("fetching roles of guild {}", guild_id))?;
        roles
            .get(&role_id)
            .map(RoleSnapshot::from)
            .ok_or_else(|| anyhow!("role {} not found in guild {}", role_id, guild_id))
    }

    async fn edit_role(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
        update: &RoleUpdate,
    ) -> Result<RoleSnapshot> {
        let role = guild_id
            .edit_role(&self.http, role_id, |r| {
                r.name(&update.name)
                    .colour(u64::from(update.colour.0))
                    .hoist(update.hoist)
                    .permissions(update.permissions)
                    .mentionable(update.mentionable)
            })
            .await
            .with_context(|| format!("editing role {} in guild {}", role_id, guild_id))?;
        Ok(RoleSnapshot::from(&role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recolour_keeps_everything_but_colour() {
        let role = RoleSnapshot {
            name: "Rainbow".to_string(),
            colour: Colour(0x123456),
            hoist: true,
            permissions: Permissions::from_bits_truncate(104320),
            mentionable: false,
        };
        let update = RoleUpdate::recolour(&role, Colour(0xff0000));
        assert_eq!(update.colour, Colour(0xff0000));
        assert_eq!(update.name, role.name);
        assert_eq!(update.hoist, role.hoist);
        assert_eq!(update.permissions, role.permissions);
        assert_eq!(update.mentionable, role.mentionable);
    }
}
