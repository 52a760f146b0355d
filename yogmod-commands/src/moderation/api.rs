use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use poise::serenity_prelude as serenity;

use yogmod_core::{Error, ExpiryTimers};
use yogmod_utils::embed::ban_notice_embed;
use yogmod_utils::parse::{minutes_label, truncate_chars};
use yogmod_utils::permissions::has_user_permission;
use yogmod_utils::time::{now_unix_secs, relative_timestamp};

/// Discord rejects audit log reasons longer than this.
const MAX_AUDIT_REASON_CHARS: usize = 512;
const SECONDS_PER_MINUTE: u64 = 60;

/// The parts of a guild member the moderation handlers look at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetMember {
    pub id: serenity::UserId,
    pub display_name: String,
    pub role_ids: Vec<serenity::RoleId>,
}

impl TargetMember {
    pub fn has_role(&self, role: serenity::RoleId) -> bool {
        self.role_ids.contains(&role)
    }
}

impl From<&serenity::Member> for TargetMember {
    fn from(member: &serenity::Member) -> Self {
        Self {
            id: member.user.id,
            display_name: member.display_name().to_owned(),
            role_ids: member.roles.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BanDuration {
    Permanent,
    Minutes(u64),
}

impl BanDuration {
    pub fn from_minutes(minutes: Option<u64>) -> Self {
        match minutes {
            Some(minutes) if minutes > 0 => BanDuration::Minutes(minutes),
            _ => BanDuration::Permanent,
        }
    }

    pub fn label(self) -> String {
        match self {
            BanDuration::Permanent => "Permanent".to_owned(),
            BanDuration::Minutes(minutes) => minutes_label(minutes),
        }
    }

    pub fn as_duration(self) -> Option<Duration> {
        match self {
            BanDuration::Permanent => None,
            BanDuration::Minutes(minutes) => Some(Duration::from_secs(
                minutes.saturating_mul(SECONDS_PER_MINUTE),
            )),
        }
    }
}

/// Member and role operations against one guild.
pub trait GuildMembers: Send + Sync {
    fn add_role(
        &self,
        member: serenity::UserId,
        role: serenity::RoleId,
        reason: &str,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    fn remove_role(
        &self,
        member: serenity::UserId,
        role: serenity::RoleId,
        reason: &str,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    fn member_by_id(
        &self,
        user: serenity::UserId,
    ) -> impl Future<Output = Result<TargetMember, Error>> + Send;
}

/// Whether a guild user may issue bans.
pub trait BanPermission: Send + Sync {
    fn can_ban(
        &self,
        user: serenity::UserId,
    ) -> impl Future<Output = Result<bool, Error>> + Send;
}

pub trait BanAction: Send + Sync {
    fn ban(
        &self,
        member: &TargetMember,
        reason: &str,
        duration: BanDuration,
        issuer: &str,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Serenity-backed implementation of [`GuildMembers`] and [`BanAction`].
#[derive(Clone)]
pub struct GuildApi {
    http: Arc<serenity::Http>,
    guild_id: serenity::GuildId,
    unban_timers: ExpiryTimers,
}

impl GuildApi {
    pub fn new(
        http: Arc<serenity::Http>,
        guild_id: serenity::GuildId,
        unban_timers: ExpiryTimers,
    ) -> Self {
        Self {
            http,
            guild_id,
            unban_timers,
        }
    }

    async fn notify_banned(&self, member: &TargetMember, reason: &str, duration: BanDuration) {
        let guild_name = match self.guild_id.to_partial_guild(&*self.http).await {
            Ok(guild) => guild.name,
            Err(_) => format!("Server {}", self.guild_id.get()),
        };

        let expires = duration
            .as_duration()
            .map(|after| relative_timestamp(now_unix_secs().saturating_add(after.as_secs())));
        let duration_label = match duration {
            BanDuration::Permanent => None,
            timed => Some(timed.label()),
        };

        let embed = ban_notice_embed(
            &guild_name,
            reason,
            duration_label.as_deref(),
            expires.as_deref(),
        );

        let sent = match member.id.create_dm_channel(&*self.http).await {
            Ok(channel) => channel
                .send_message(&*self.http, serenity::CreateMessage::new().embed(embed))
                .await
                .map(|_| ()),
            Err(source) => Err(source),
        };

        if let Err(source) = sent {
            warn!(?source, user_id = member.id.get(), "could not DM ban notice");
        }
    }
}

async fn lift_expired_ban(
    http: Arc<serenity::Http>,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) {
    match guild_id.unban(&http, user_id).await {
        Ok(()) => info!(
            guild_id = guild_id.get(),
            user_id = user_id.get(),
            "softban expired, ban lifted"
        ),
        Err(source) => warn!(
            ?source,
            guild_id = guild_id.get(),
            user_id = user_id.get(),
            "failed to lift expired softban"
        ),
    }
}

/// Point the member's pending expiry at the ban that was just issued.
///
/// A timed ban replaces whatever timer was pending; a permanent ban clears it,
/// so an earlier softban can never lift a later ban.
pub fn refresh_expiry<F, Fut>(
    timers: &ExpiryTimers,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    duration: BanDuration,
    lift: F,
) where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let key = (guild_id, user_id);
    match duration.as_duration() {
        Some(after) => timers.schedule(key, after, lift),
        None => {
            if timers.cancel(key) {
                info!(
                    guild_id = guild_id.get(),
                    user_id = user_id.get(),
                    "pending softban expiry cleared by permanent ban"
                );
            }
        }
    }
}

impl GuildMembers for GuildApi {
    async fn add_role(
        &self,
        member: serenity::UserId,
        role: serenity::RoleId,
        reason: &str,
    ) -> Result<(), Error> {
        self.http
            .add_member_role(self.guild_id, member, role, Some(reason))
            .await?;
        Ok(())
    }

    async fn remove_role(
        &self,
        member: serenity::UserId,
        role: serenity::RoleId,
        reason: &str,
    ) -> Result<(), Error> {
        self.http
            .remove_member_role(self.guild_id, member, role, Some(reason))
            .await?;
        Ok(())
    }

    async fn member_by_id(&self, user: serenity::UserId) -> Result<TargetMember, Error> {
        let member = self.guild_id.member(&*self.http, user).await?;
        Ok(TargetMember::from(&member))
    }
}

impl BanPermission for GuildApi {
    async fn can_ban(&self, user: serenity::UserId) -> Result<bool, Error> {
        has_user_permission(
            &self.http,
            self.guild_id,
            user,
            serenity::Permissions::BAN_MEMBERS,
        )
        .await
    }
}

impl BanAction for GuildApi {
    async fn ban(
        &self,
        member: &TargetMember,
        reason: &str,
        duration: BanDuration,
        issuer: &str,
    ) -> Result<(), Error> {
        self.notify_banned(member, reason, duration).await;

        let audit_reason = ban_audit_reason(reason, duration, issuer);
        self.guild_id
            .ban_with_reason(&self.http, member.id, 0, &audit_reason)
            .await?;

        info!(
            guild_id = self.guild_id.get(),
            user_id = member.id.get(),
            issuer,
            duration = %duration.label(),
            "ban issued"
        );

        let (http, guild_id, user_id) = (Arc::clone(&self.http), self.guild_id, member.id);
        refresh_expiry(&self.unban_timers, guild_id, user_id, duration, move || {
            lift_expired_ban(http, guild_id, user_id)
        });

        Ok(())
    }
}

pub fn ban_audit_reason(reason: &str, duration: BanDuration, issuer: &str) -> String {
    let full = format!("{reason} | Issued by {issuer} | {}", duration.label());
    truncate_chars(&full, MAX_AUDIT_REASON_CHARS).to_owned()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use std::sync::{Arc, Mutex};

    use poise::serenity_prelude as serenity;

    use super::{BanDuration, MAX_AUDIT_REASON_CHARS, ban_audit_reason, refresh_expiry};
    use yogmod_core::ExpiryTimers;

    const GUILD: serenity::GuildId = serenity::GuildId::new(1);
    const USER: serenity::UserId = serenity::UserId::new(42);
    const MINUTE: Duration = Duration::from_secs(60);

    /// Records which ban's expiry ran, by label.
    fn lifts() -> Arc<Mutex<Vec<&'static str>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn ban(
        timers: &ExpiryTimers,
        lifted: &Arc<Mutex<Vec<&'static str>>>,
        label: &'static str,
        duration: BanDuration,
    ) {
        let lifted = Arc::clone(lifted);
        refresh_expiry(timers, GUILD, USER, duration, move || async move {
            lifted.lock().unwrap().push(label);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn timed_softban_is_lifted_when_it_expires() {
        let timers = ExpiryTimers::new();
        let lifted = lifts();

        ban(&timers, &lifted, "spam", BanDuration::Minutes(1));
        tokio::time::sleep(MINUTE * 2).await;

        assert_eq!(*lifted.lock().unwrap(), vec!["spam"]);
        assert_eq!(timers.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_reban_is_not_lifted_by_earlier_softban() {
        let timers = ExpiryTimers::new();
        let lifted = lifts();

        ban(&timers, &lifted, "spam", BanDuration::Minutes(1));
        ban(&timers, &lifted, "ban evasion", BanDuration::Permanent);
        tokio::time::sleep(MINUTE * 2).await;

        assert!(lifted.lock().unwrap().is_empty());
        assert!(!timers.is_pending((GUILD, USER)));
    }

    #[tokio::test(start_paused = true)]
    async fn longer_reban_outlives_earlier_shorter_softban() {
        let timers = ExpiryTimers::new();
        let lifted = lifts();

        ban(&timers, &lifted, "spam", BanDuration::Minutes(1));
        ban(&timers, &lifted, "ban evasion", BanDuration::Minutes(30));

        tokio::time::sleep(MINUTE * 2).await;
        assert!(lifted.lock().unwrap().is_empty());

        tokio::time::sleep(MINUTE * 30).await;
        assert_eq!(*lifted.lock().unwrap(), vec!["ban evasion"]);
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn missing_or_non_positive_minutes_are_permanent() {
        assert_eq!(BanDuration::from_minutes(None), BanDuration::Permanent);
        assert_eq!(BanDuration::from_minutes(Some(0)), BanDuration::Permanent);
        assert_eq!(BanDuration::from_minutes(Some(30)), BanDuration::Minutes(30));
    }

    #[test]
    fn timed_bans_convert_to_wall_clock_durations() {
        assert_eq!(BanDuration::Permanent.as_duration(), None);
        assert_eq!(
            BanDuration::Minutes(30).as_duration(),
            Some(Duration::from_secs(1800))
        );
        assert!(BanDuration::Minutes(u64::MAX).as_duration().is_some());
    }

    #[test]
    fn audit_reason_names_issuer_and_duration() {
        assert_eq!(
            ban_audit_reason("spam", BanDuration::Minutes(30), "Mod"),
            "spam | Issued by Mod | 30 minutes"
        );
        assert_eq!(
            ban_audit_reason("raiding", BanDuration::Permanent, "Mod"),
            "raiding | Issued by Mod | Permanent"
        );
    }

    #[test]
    fn audit_reason_fits_discord_limit() {
        let reason = "x".repeat(1000);
        let audit = ban_audit_reason(&reason, BanDuration::Permanent, "Mod");
        assert_eq!(audit.chars().count(), MAX_AUDIT_REASON_CHARS);
    }
}
