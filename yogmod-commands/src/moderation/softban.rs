use thiserror::Error;
use tracing::{debug, warn};

use poise::serenity_prelude as serenity;

use crate::interactions::{
    CorrelationToken, FieldStyle, FormField, FormSpec, FormSubmission, ModalRoute,
};
use crate::moderation::api::{BanAction, BanDuration, BanPermission, GuildApi, GuildMembers};
use crate::moderation::messages::{
    SOFTBAN_BAD_DURATION, SOFTBAN_ISSUED, SOFTBAN_REASON_REQUIRED, guild_only_message,
};
use yogmod_core::{Context, Data, Error};
use yogmod_utils::acting_user_name;
use yogmod_utils::parse::{MinutesParseError, parse_minutes};
use yogmod_utils::permissions::{has_user_permission, permission_denied_message};
use yogmod_utils::reply::Reply;

pub const FORM_TITLE: &str = "Softban Menu";
pub const DURATION_FIELD: &str = "duration";
pub const REASON_FIELD: &str = "reason";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("no ban reason was given")]
    MissingReason,
    #[error(transparent)]
    InvalidDuration(#[from] MinutesParseError),
}

impl FormError {
    pub fn reply(&self) -> Reply {
        match self {
            FormError::MissingReason => Reply::ephemeral(SOFTBAN_REASON_REQUIRED),
            FormError::InvalidDuration(_) => Reply::ephemeral(SOFTBAN_BAD_DURATION),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoftbanRequest {
    pub reason: String,
    pub duration: BanDuration,
}

impl SoftbanRequest {
    pub fn from_form(form: &FormSubmission) -> Result<Self, FormError> {
        let duration = match form.value(DURATION_FIELD) {
            Some(raw) => BanDuration::from_minutes(parse_minutes(raw)?),
            None => BanDuration::Permanent,
        };

        let reason = form.value(REASON_FIELD).ok_or(FormError::MissingReason)?;

        Ok(Self {
            reason: reason.to_owned(),
            duration,
        })
    }
}

pub fn softban_form(target: serenity::UserId) -> FormSpec {
    FormSpec {
        custom_id: CorrelationToken::new(ModalRoute::Softban, target).encode(),
        title: FORM_TITLE,
        fields: vec![
            FormField {
                custom_id: DURATION_FIELD,
                label: "Ban Duration (Minutes)",
                style: FieldStyle::Short,
                required: false,
            },
            FormField {
                custom_id: REASON_FIELD,
                label: "Ban Reason",
                style: FieldStyle::Paragraph,
                required: true,
            },
        ],
    }
}

/// Resolve the target and ban them, replying only once the ban went through.
pub async fn issue_softban<M, B>(
    members: &M,
    bans: &B,
    target: serenity::UserId,
    request: &SoftbanRequest,
    issuer: &str,
) -> Result<Reply, Error>
where
    M: GuildMembers,
    B: BanAction,
{
    let member = members.member_by_id(target).await?;
    bans.ban(&member, &request.reason, request.duration, issuer)
        .await?;

    Ok(Reply::ephemeral(SOFTBAN_ISSUED))
}

/// Handle a submitted softban form on behalf of `invoker`.
///
/// Permission comes first so an unauthorised submitter only ever sees the
/// denial, whatever they typed into the form.
pub async fn submit_softban<G>(
    guild: &G,
    invoker: serenity::UserId,
    target: serenity::UserId,
    form: &FormSubmission,
    issuer: &str,
) -> Result<Reply, Error>
where
    G: BanPermission + GuildMembers + BanAction,
{
    if !guild.can_ban(invoker).await? {
        return Ok(Reply::ephemeral(permission_denied_message()));
    }

    let request = match SoftbanRequest::from_form(form) {
        Ok(request) => request,
        Err(rejection) => {
            warn!(%rejection, user_id = invoker.get(), "softban form rejected");
            return Ok(rejection.reply());
        }
    };

    issue_softban(guild, guild, target, &request, issuer).await
}

/// Open the softban form for the selected user.
#[poise::command(
    context_menu_command = "Softban",
    guild_only,
    default_member_permissions = "BAN_MEMBERS",
    category = "Moderation"
)]
pub async fn softban(ctx: Context<'_>, user: serenity::User) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::BAN_MEMBERS,
    )
    .await?
    {
        ctx.send(Reply::ephemeral(permission_denied_message()).into_create_reply())
            .await?;
        return Ok(());
    }

    let poise::Context::Application(app_ctx) = ctx else {
        return Ok(());
    };

    app_ctx
        .interaction
        .create_response(
            ctx.http(),
            serenity::CreateInteractionResponse::Modal(softban_form(user.id).into_modal()),
        )
        .await?;

    debug!(target_id = user.id.get(), "softban form presented");
    Ok(())
}

pub(crate) async fn handle_submission(
    ctx: &serenity::Context,
    data: &Data,
    modal: &serenity::ModalInteraction,
    target: serenity::UserId,
) -> Result<(), Error> {
    let Some(guild_id) = modal.guild_id else {
        modal
            .create_response(
                ctx,
                Reply::ephemeral(guild_only_message()).into_interaction_response(),
            )
            .await?;
        return Ok(());
    };

    // Permission lookup, DM and ban can outlast the initial response window.
    modal.defer_ephemeral(ctx).await?;

    let guild = GuildApi::new(ctx.http.clone(), guild_id, data.unban_timers.clone());
    let form = FormSubmission::from_modal(&modal.data);
    let issuer = acting_user_name(&modal.user);
    let reply = submit_softban(&guild, modal.user.id, target, &form, &issuer).await?;

    modal.edit_response(ctx, reply.into_edit_response()).await?;
    Ok(())
}
