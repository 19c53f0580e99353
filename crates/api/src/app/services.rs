//! Persistence wiring behind one dispatch surface.

use std::sync::Arc;

use accounthub_accounts::{Command, CommandResult, PersistenceResult, Query};
use accounthub_infra::{
    CommandDispatcher, Dispatch, DispatchError, DispatchQuery, InMemoryDatabase, PgDatabase,
};

use crate::config::ApiConfig;

#[derive(Clone)]
pub enum AppServices {
    InMemory {
        dispatcher: Arc<CommandDispatcher<InMemoryDatabase>>,
    },
    Postgres {
        dispatcher: Arc<CommandDispatcher<PgDatabase>>,
    },
}

impl AppServices {
    pub fn in_memory(db: InMemoryDatabase) -> Self {
        AppServices::InMemory {
            dispatcher: Arc::new(CommandDispatcher::new(db)),
        }
    }

    pub fn postgres(db: PgDatabase) -> Self {
        AppServices::Postgres {
            dispatcher: Arc::new(CommandDispatcher::new(db)),
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            AppServices::InMemory { .. } => "in-memory",
            AppServices::Postgres { .. } => "postgres",
        }
    }

    pub async fn dispatch<C>(&self, command: C) -> Result<CommandResult<C::Output>, DispatchError>
    where
        C: Command,
        CommandDispatcher<InMemoryDatabase>: Dispatch<C>,
        CommandDispatcher<PgDatabase>: Dispatch<C>,
    {
        match self {
            AppServices::InMemory { dispatcher } => dispatcher.dispatch(command).await,
            AppServices::Postgres { dispatcher } => dispatcher.dispatch(command).await,
        }
    }

    pub async fn query<Q>(&self, query: Q) -> Result<CommandResult<Q::Output>, DispatchError>
    where
        Q: Query,
        CommandDispatcher<InMemoryDatabase>: DispatchQuery<Q>,
        CommandDispatcher<PgDatabase>: DispatchQuery<Q>,
    {
        match self {
            AppServices::InMemory { dispatcher } => dispatcher.query(query).await,
            AppServices::Postgres { dispatcher } => dispatcher.query(query).await,
        }
    }
}

/// Connect to Postgres when configured, otherwise fall back to the in-memory store.
pub async fn build_services(config: &ApiConfig) -> PersistenceResult<AppServices> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; using in-memory store");
        return Ok(AppServices::in_memory(InMemoryDatabase::new()));
    };

    let db = PgDatabase::connect(url, config.database_max_connections).await?;
    db.migrate().await?;
    Ok(AppServices::postgres(db))
}
