use poise::serenity_prelude as serenity;

/// A status message for the invoking user, built before it is known whether
/// it goes out as a message reply or an interaction response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub ephemeral: bool,
}

impl Reply {
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }

    pub fn into_create_reply(self) -> poise::CreateReply {
        poise::CreateReply::default()
            .content(self.content)
            .ephemeral(self.ephemeral)
    }

    pub fn into_interaction_response(self) -> serenity::CreateInteractionResponse {
        serenity::CreateInteractionResponse::Message(
            serenity::CreateInteractionResponseMessage::new()
                .content(self.content)
                .ephemeral(self.ephemeral),
        )
    }

    /// Fill in a deferred interaction response; visibility was fixed by the defer.
    pub fn into_edit_response(self) -> serenity::EditInteractionResponse {
        serenity::EditInteractionResponse::new().content(self.content)
    }
}
