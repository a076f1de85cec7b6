//! Discord client lifecycle.

use crate::directory::SerenityChannelDirectory;
use crate::error::BotResult;
use poise::serenity_prelude::{self as serenity, GatewayIntents};
use std::future::Future;
use std::sync::Arc;
use ticketdesk_commands::convert::guild_key;
use ticketdesk_commands::{framework_options, Data, Error};
use ticketdesk_common::GuildId;
use ticketdesk_config::Config;
use ticketdesk_store::{reconcile_tickets, ChannelDirectory, Store};
use tracing::{error, info};

/// The ticket bot: configuration plus the store it serves from.
pub struct TicketDeskBot {
    config: Arc<Config>,
    store: Store,
}

impl TicketDeskBot {
    /// Creates a new bot instance.
    pub fn new(config: Config, store: Store) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Gateway intents the bot needs. Everything runs through interactions,
    /// so only guild events are subscribed.
    pub const fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
    }

    /// Connects to Discord and runs until the client stops or Ctrl-C is received.
    pub async fn start(self) -> BotResult<()> {
        let config = Arc::clone(&self.config);
        let store = self.store;

        let framework = poise::Framework::builder()
            .options(framework_options())
            .setup(move |ctx, ready, framework| Box::pin(setup(ctx, ready, framework, config, store)))
            .build();

        let mut client = serenity::ClientBuilder::new(&self.config.discord.token, Self::intents())
            .framework(framework)
            .await?;
        info!("Discord client created");

        let shard_manager = client.shard_manager.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
                return;
            }
            info!("Received shutdown signal, starting graceful shutdown");
            shard_manager.shutdown_all().await;
        });

        client.start().await?;
        info!("Discord client shut down");
        Ok(())
    }
}

/// Store keys of the guilds listed in a ready payload.
pub fn ready_guilds(ready: &serenity::Ready) -> Vec<GuildId> {
    ready.guilds.iter().map(|guild| guild_key(guild.id)).collect()
}

/// Startup work run once the gateway is ready: prunes tickets whose channel
/// is gone, then registers slash commands. A registration failure is logged
/// and the bot keeps serving. Returns how many ticket records were removed.
pub async fn prepare_guilds<R>(
    store: &Store,
    directory: &dyn ChannelDirectory,
    guilds: &[GuildId],
    register: R,
) -> usize
where
    R: Future<Output = Result<(), serenity::Error>> + Send,
{
    let removed = reconcile_tickets(&store.tickets, directory, guilds).await;

    match register.await {
        Ok(()) => info!("Slash commands registered globally"),
        Err(e) => error!(error = %e, "Failed to register slash commands"),
    }
    removed
}

async fn setup(
    ctx: &serenity::Context,
    ready: &serenity::Ready,
    framework: &poise::Framework<Data, Error>,
    config: Arc<Config>,
    store: Store,
) -> Result<Data, Error> {
    info!(user = %ready.user.name, id = %ready.user.id, guilds = ready.guilds.len(), "Bot connected");

    let directory = SerenityChannelDirectory::new(Arc::clone(&ctx.http));
    let register = poise::builtins::register_globally(ctx, &framework.options().commands);
    prepare_guilds(&store, &directory, &ready_guilds(ready), register).await;

    Data::new(config, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use std::collections::HashSet;
    use ticketdesk_common::{ChannelId, UserId};
    use ticketdesk_store::Ticket;

    mock! {
        Directory {}

        #[async_trait]
        impl ChannelDirectory for Directory {
            async fn channel_ids(&self, guild: GuildId) -> ticketdesk_common::Result<HashSet<ChannelId>>;
        }
    }

    fn store_with_tickets(guild: GuildId, channels: &[u64]) -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        for &channel in channels {
            store
                .tickets
                .create_ticket(guild, ChannelId(channel), Ticket::opened_by(UserId(1), "support"))
                .unwrap();
        }
        (dir, store)
    }

    #[tokio::test]
    async fn test_failed_registration_still_reconciles() {
        let guild = GuildId(7);
        let (_dir, store) = store_with_tickets(guild, &[10, 20]);

        let mut directory = MockDirectory::new();
        directory
            .expect_channel_ids()
            .times(1)
            .returning(|_| Ok([ChannelId(10)].into_iter().collect()));

        let removed = prepare_guilds(&store, &directory, &[guild], async {
            Err(serenity::Error::Other("registration rejected"))
        })
        .await;

        assert_eq!(removed, 1);
        assert!(store.tickets.get_ticket(guild, ChannelId(10)).is_some());
        assert!(store.tickets.get_ticket(guild, ChannelId(20)).is_none());
    }

    #[tokio::test]
    async fn test_reconciles_before_registering() {
        let guild = GuildId(8);
        let (_dir, store) = store_with_tickets(guild, &[30]);

        let mut directory = MockDirectory::new();
        directory
            .expect_channel_ids()
            .returning(|_| Ok(HashSet::new()));

        let removed = prepare_guilds(&store, &directory, &[guild], async {
            assert!(store.tickets.list_tickets(guild).is_empty());
            Ok(())
        })
        .await;

        assert_eq!(removed, 1);
    }
}
