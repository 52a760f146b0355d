use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::anyhow;
use poise::serenity_prelude as serenity;

use super::api::{BanAction, BanDuration, BanPermission, GuildMembers, TargetMember};
use yogmod_core::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    AddRole {
        member: serenity::UserId,
        role: serenity::RoleId,
        reason: String,
    },
    RemoveRole {
        member: serenity::UserId,
        role: serenity::RoleId,
        reason: String,
    },
    Ban {
        member: serenity::UserId,
        reason: String,
        duration: BanDuration,
        issuer: String,
    },
}

/// In-memory guild that records every mutation it is asked to perform.
#[derive(Default)]
pub struct FakeGuild {
    members: Mutex<HashMap<serenity::UserId, TargetMember>>,
    calls: Mutex<Vec<Call>>,
    moderators: HashSet<serenity::UserId>,
    reject_role_changes: bool,
}

impl FakeGuild {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(self, id: u64, name: &str, roles: &[u64]) -> Self {
        let member = TargetMember {
            id: serenity::UserId::new(id),
            display_name: name.to_owned(),
            role_ids: roles.iter().copied().map(serenity::RoleId::new).collect(),
        };
        self.members.lock().unwrap().insert(member.id, member);
        self
    }

    pub fn with_moderator(mut self, id: u64) -> Self {
        self.moderators.insert(serenity::UserId::new(id));
        self
    }

    pub fn rejecting_role_changes(mut self) -> Self {
        self.reject_role_changes = true;
        self
    }

    pub fn member(&self, id: u64) -> TargetMember {
        self.members.lock().unwrap()[&serenity::UserId::new(id)].clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl GuildMembers for FakeGuild {
    async fn add_role(
        &self,
        member: serenity::UserId,
        role: serenity::RoleId,
        reason: &str,
    ) -> Result<(), Error> {
        if self.reject_role_changes {
            return Err(anyhow!("Missing Permissions"));
        }

        self.calls.lock().unwrap().push(Call::AddRole {
            member,
            role,
            reason: reason.to_owned(),
        });
        if let Some(target) = self.members.lock().unwrap().get_mut(&member) {
            target.role_ids.push(role);
        }
        Ok(())
    }

    async fn remove_role(
        &self,
        member: serenity::UserId,
        role: serenity::RoleId,
        reason: &str,
    ) -> Result<(), Error> {
        if self.reject_role_changes {
            return Err(anyhow!("Missing Permissions"));
        }

        self.calls.lock().unwrap().push(Call::RemoveRole {
            member,
            role,
            reason: reason.to_owned(),
        });
        if let Some(target) = self.members.lock().unwrap().get_mut(&member) {
            target.role_ids.retain(|held| *held != role);
        }
        Ok(())
    }

    async fn member_by_id(&self, user: serenity::UserId) -> Result<TargetMember, Error> {
        self.members
            .lock()
            .unwrap()
            .get(&user)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown Member"))
    }
}

impl BanPermission for FakeGuild {
    async fn can_ban(&self, user: serenity::UserId) -> Result<bool, Error> {
        Ok(self.moderators.contains(&user))
    }
}

impl BanAction for FakeGuild {
    async fn ban(
        &self,
        member: &TargetMember,
        reason: &str,
        duration: BanDuration,
        issuer: &str,
    ) -> Result<(), Error> {
        self.calls.lock().unwrap().push(Call::Ban {
            member: member.id,
            reason: reason.to_owned(),
            duration,
            issuer: issuer.to_owned(),
        });
        Ok(())
    }
}
