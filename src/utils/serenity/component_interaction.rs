use poise::serenity_prelude::{
    self as serenity, CacheHttp, CreateInteractionResponse, CreateInteractionResponseFollowup,
    EditInteractionResponse,
};

pub trait ComponentInteractionExt {
    /// Defers the response without a visible "thinking" state.
    async fn acknowledge(&self, cache_http: impl CacheHttp) -> serenity::Result<()>;

    async fn followup_ephemeral(
        &self,
        cache_http: impl CacheHttp,
        content: impl Into<String>,
    ) -> serenity::Result<()>;

    /// Replaces the message the component was on, dropping its components.
    async fn replace_message(
        &self,
        cache_http: impl CacheHttp,
        content: impl Into<String>,
    ) -> serenity::Result<()>;

    fn custom_id(&self) -> &str;
}

impl ComponentInteractionExt for serenity::ComponentInteraction {
    async fn acknowledge(&self, cache_http: impl CacheHttp) -> serenity::Result<()> {
        let builder = CreateInteractionResponse::Acknowledge;
        self.create_response(cache_http, builder).await
    }

    async fn followup_ephemeral(
        &self,
        cache_http: impl CacheHttp,
        content: impl Into<String>,
    ) -> serenity::Result<()> {
        let builder = CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(true);
        self.create_followup(cache_http, builder).await?;
        Ok(())
    }

    async fn replace_message(
        &self,
        cache_http: impl CacheHttp,
        content: impl Into<String>,
    ) -> serenity::Result<()> {
        let builder = EditInteractionResponse::new()
            .content(content)
            .components(Vec::new());
        self.edit_response(cache_http, builder).await?;
        Ok(())
    }

    fn custom_id(&self) -> &str {
        &self.data.custom_id
    }
}
