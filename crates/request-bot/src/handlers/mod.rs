//! Serenity event handler implementation

use serenity::async_trait;
use serenity::builder::CreateInteractionResponse;
use serenity::model::application::Interaction;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{error, info};

use crate::convert;
use crate::dispatcher::{BotIdentity, RequestDispatcher};
use crate::errors::{log_error, PlatformError};
use crate::health::AppState;
use crate::interactions::{ClickAction, ComponentClick};
use crate::platform::SerenityPlatform;

pub type Dispatcher = RequestDispatcher<SerenityPlatform>;

pub struct Handler;

async fn get_dispatcher(ctx: &Context) -> Option<std::sync::Arc<Dispatcher>> {
    let data = ctx.data.read().await;
    let dispatcher = data.get::<Dispatcher>().cloned();
    if dispatcher.is_none() {
        error!("RequestDispatcher not found in context data");
    }
    dispatcher
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        let tag = ready.user.tag();
        info!("Discord bot connected as {}", tag);

        if let Some(dispatcher) = get_dispatcher(&ctx).await {
            dispatcher
                .set_identity(BotIdentity {
                    id: ready.user.id.get(),
                    tag: tag.clone(),
                })
                .await;
        }

        let health = ctx.data.read().await.get::<AppState>().cloned();
        if let Some(health) = health {
            health.set_bot_tag(tag).await;
        }
    }

    // Bot messages are not skipped here: the bot relays requests to itself
    async fn message(&self, ctx: Context, msg: Message) {
        let Some(dispatcher) = get_dispatcher(&ctx).await else {
            return;
        };
        dispatcher
            .on_message_created(&convert::inbound_message(&msg))
            .await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Component(comp) = interaction else {
            return;
        };
        if ClickAction::from_custom_id(&comp.data.custom_id) == ClickAction::Ignore {
            return;
        }
        let Some(dispatcher) = get_dispatcher(&ctx).await else {
            return;
        };

        if let Err(e) = comp
            .create_response(&ctx.http, CreateInteractionResponse::Acknowledge)
            .await
        {
            log_error(
                &format!("Failed to acknowledge click on {}", comp.message.id),
                &PlatformError::from(e),
            );
            return;
        }

        let click = ComponentClick {
            channel_id: comp.channel_id.get(),
            message_id: comp.message.id.get(),
            custom_id: comp.data.custom_id.clone(),
            user_tag: comp.user.tag(),
        };
        if let Err(e) = dispatcher.on_component_click(&click).await {
            log_error(
                &format!("Click {} on {} failed", click.custom_id, click.message_id),
                &e,
            );
        }
    }
}
