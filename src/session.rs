use crate::rainbow::SerenityRoles;
use anyhow::{anyhow, Context as _, Result};
use serenity::async_trait;
use serenity::cache::Cache;
use serenity::client::bridge::gateway::ShardManager;
use serenity::http::Http;
use serenity::model::event::ResumedEvent;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Hands the first `ready` back to [`Session::open`].
struct Gateway {
    ready: Mutex<Option<oneshot::Sender<String>>>,
}

#[async_trait]
impl EventHandler for Gateway {
    async fn ready(&self, _: Context, ready: Ready) {
        match self.ready.lock().await.take() {
            Some(tx) => {
                let _ = tx.send(ready.user.name);
            }
            None => info!("Reconnected as {}", ready.user.name),
        }
    }

    async fn resume(&self, _: Context, _: ResumedEvent) {
        info!("Resumed");
    }
}

/// One live gateway connection plus the cache and HTTP client it feeds.
pub(crate) struct Session {
    cache: Arc<Cache>,
    http: Arc<Http>,
    shard_manager: Arc<Mutex<ShardManager>>,
    gateway: JoinHandle<serenity::Result<()>>,
}

impl Session {
    /// Connects and waits for the gateway to report ready. An invalid token
    /// or an unreachable gateway ends the client task, which is returned as
    /// the error.
    pub(crate) async fn open(token: &str) -> Result<Self> {
        let (ready_tx, ready_rx) = oneshot::channel();
        let mut client = Client::builder(token, GatewayIntents::GUILDS)
            .event_handler(Gateway {
                ready: Mutex::new(Some(ready_tx)),
            })
            .await
            .context("Error creating Discord session")?;

        let cache = client.cache_and_http.cache.clone();
        let http = client.cache_and_http.http.clone();
        let shard_manager = client.shard_manager.clone();
        let mut gateway = tokio::spawn(async move { client.start().await });

        tokio::select! {
            ready = ready_rx => {
                let name = ready.context("Discord session dropped before ready")?;
                info!("Connected as {}", name);
            }
            finished = &mut gateway => {
                let why = match finished {
                    Ok(Ok(())) => anyhow!("gateway closed before ready"),
                    Ok(Err(why)) => anyhow!(why),
                    Err(join) => anyhow!(join),
                };
                return Err(why.context("Error opening Discord session"));
            }
        }

        Ok(Session {
            cache,
            http,
            shard_manager,
            gateway,
        })
    }

    pub(crate) fn roles(&self) -> SerenityRoles {
        SerenityRoles::new(self.cache.clone(), self.http.clone())
    }

    pub(crate) async fn close(self) {
        self.shard_manager.lock().await.shutdown_all().await;
        match self.gateway.await {
            Ok(Ok(())) => info!("Discord session closed"),
            Ok(Err(why)) => warn!("Discord session ended with error: {}", why),
            Err(why) => warn!("Discord session task failed: {}", why),
        }
    }
}
