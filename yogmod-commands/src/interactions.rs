//! Modal submissions arrive through the raw gateway event stream rather than
//! the command framework, so they are routed here by custom-id prefix.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

use poise::serenity_prelude as serenity;

use crate::moderation::messages::FORM_INVALID;
use crate::moderation::softban;
use yogmod_core::{Data, Error};
use yogmod_utils::reply::Reply;

/// Every modal this bot presents, keyed by its custom-id prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalRoute {
    Softban,
}

impl ModalRoute {
    pub const ALL: [ModalRoute; 1] = [ModalRoute::Softban];

    pub fn id_prefix(self) -> &'static str {
        match self {
            ModalRoute::Softban => "softban",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|route| route.id_prefix() == prefix)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("custom id `{0}` does not belong to a registered form")]
    UnknownRoute(String),
    #[error("custom id `{0}` carries no target user")]
    MissingTarget(String),
    #[error("custom id `{0}` carries an invalid target user")]
    InvalidTarget(String),
}

/// Links a form prompt to its submission: `<prefix>-<target user id>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorrelationToken {
    pub route: ModalRoute,
    pub target: serenity::UserId,
}

impl CorrelationToken {
    pub fn new(route: ModalRoute, target: serenity::UserId) -> Self {
        Self { route, target }
    }

    pub fn encode(&self) -> String {
        format!("{}-{}", self.route.id_prefix(), self.target.get())
    }

    pub fn decode(custom_id: &str) -> Result<Self, TokenError> {
        let (prefix, target) = match custom_id.split_once('-') {
            Some(parts) => parts,
            None if ModalRoute::from_prefix(custom_id).is_some() => {
                return Err(TokenError::MissingTarget(custom_id.to_owned()));
            }
            None => return Err(TokenError::UnknownRoute(custom_id.to_owned())),
        };

        let route = ModalRoute::from_prefix(prefix)
            .ok_or_else(|| TokenError::UnknownRoute(custom_id.to_owned()))?;

        if target.is_empty() {
            return Err(TokenError::MissingTarget(custom_id.to_owned()));
        }

        let target = target
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| TokenError::InvalidTarget(custom_id.to_owned()))?;

        Ok(Self::new(route, serenity::UserId::new(target)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldStyle {
    Short,
    Paragraph,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    pub custom_id: &'static str,
    pub label: &'static str,
    pub style: FieldStyle,
    pub required: bool,
}

/// A modal described independently of the builder that renders it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormSpec {
    pub custom_id: String,
    pub title: &'static str,
    pub fields: Vec<FormField>,
}

impl FormSpec {
    pub fn into_modal(self) -> serenity::CreateModal {
        let rows = self
            .fields
            .into_iter()
            .map(|field| {
                let style = match field.style {
                    FieldStyle::Short => serenity::InputTextStyle::Short,
                    FieldStyle::Paragraph => serenity::InputTextStyle::Paragraph,
                };
                serenity::CreateActionRow::InputText(
                    serenity::CreateInputText::new(style, field.label, field.custom_id)
                        .required(field.required),
                )
            })
            .collect();

        serenity::CreateModal::new(self.custom_id, self.title).components(rows)
    }
}

/// Submitted text inputs by custom id. Ids outside of text inputs are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormSubmission {
    fields: HashMap<String, Option<String>>,
}

impl FormSubmission {
    pub fn from_modal(data: &serenity::ModalInteractionData) -> Self {
        let fields = data
            .components
            .iter()
            .flat_map(|row| row.components.iter())
            .filter_map(|component| match component {
                serenity::ActionRowComponent::InputText(input) => {
                    Some((input.custom_id.clone(), input.value.clone()))
                }
                _ => None,
            })
            .collect();

        Self { fields }
    }

    /// The trimmed value of `custom_id`, treating blank input as absent.
    pub fn value(&self, custom_id: &str) -> Option<&str> {
        self.fields
            .get(custom_id)?
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for FormSubmission
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.map(Into::into)))
                .collect(),
        }
    }
}

pub async fn handle_modal_submit(
    ctx: &serenity::Context,
    data: &Data,
    modal: &serenity::ModalInteraction,
) -> Result<(), Error> {
    let token = match CorrelationToken::decode(&modal.data.custom_id) {
        Ok(token) => token,
        Err(TokenError::UnknownRoute(custom_id)) => {
            debug!(%custom_id, "ignoring modal submission for unregistered form");
            return Ok(());
        }
        Err(source) => {
            warn!(%source, user_id = modal.user.id.get(), "rejecting modal submission");
            modal
                .create_response(ctx, Reply::ephemeral(FORM_INVALID).into_interaction_response())
                .await?;
            return Ok(());
        }
    };

    match token.route {
        ModalRoute::Softban => softban::handle_submission(ctx, data, modal, token.target).await,
    }
}
