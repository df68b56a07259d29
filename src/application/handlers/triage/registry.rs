//! TriageRegistry - arena of conversation controllers keyed by id.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::foundation::ConversationId;
use crate::ports::StepProvider;

use super::controller::{TriageController, DEFAULT_STEP_TIMEOUT};
use super::errors::RegistryError;

/// Default upper bound on open conversations.
pub const DEFAULT_MAX_CONVERSATIONS: usize = 1000;

/// Default time a conversation may sit untouched before it can be evicted.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// Owns every open conversation. All controllers share one step provider.
pub struct TriageRegistry {
    provider: Arc<dyn StepProvider>,
    step_timeout: Duration,
    max_conversations: usize,
    idle_ttl: Duration,
    controllers: RwLock<HashMap<ConversationId, Arc<TriageController>>>,
}

impl TriageRegistry {
    pub fn new(provider: Arc<dyn StepProvider>) -> Self {
        Self {
            provider,
            step_timeout: DEFAULT_STEP_TIMEOUT,
            max_conversations: DEFAULT_MAX_CONVERSATIONS,
            idle_ttl: DEFAULT_IDLE_TTL,
            controllers: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    pub fn with_max_conversations(mut self, max: usize) -> Self {
        self.max_conversations = max;
        self
    }

    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = ttl;
        self
    }

    /// Opens a new, idle conversation.
    ///
    /// When the registry is full, conversations idle for longer than the
    /// idle TTL are evicted first.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded` if `max_conversations` are still open after eviction
    pub async fn create(&self) -> Result<Arc<TriageController>, RegistryError> {
        let mut controllers = self.controllers.write().await;
        if controllers.len() >= self.max_conversations {
            self.evict_idle(&mut controllers).await;
        }
        if controllers.len() >= self.max_conversations {
            tracing::warn!(max = self.max_conversations, "Conversation limit reached");
            return Err(RegistryError::CapacityExceeded {
                max: self.max_conversations,
            });
        }

        let controller = Arc::new(
            TriageController::new(self.provider.clone()).with_step_timeout(self.step_timeout),
        );
        controllers.insert(controller.conversation_id(), controller.clone());

        tracing::debug!(
            conversation_id = %controller.conversation_id(),
            open = controllers.len(),
            "Conversation created"
        );
        Ok(controller)
    }

    /// Looks up a conversation.
    pub async fn get(&self, id: ConversationId) -> Result<Arc<TriageController>, RegistryError> {
        self.controllers
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    /// Closes a conversation. Requests still in flight finish against the
    /// detached controller and are dropped with it.
    pub async fn remove(&self, id: ConversationId) -> Result<(), RegistryError> {
        let removed = self.controllers.write().await.remove(&id);
        match removed {
            Some(_) => {
                tracing::debug!(conversation_id = %id, "Conversation closed");
                Ok(())
            }
            None => Err(RegistryError::NotFound(id)),
        }
    }

    /// Evicts every conversation idle for longer than the idle TTL.
    /// Returns the number evicted.
    pub async fn sweep_idle(&self) -> usize {
        let mut controllers = self.controllers.write().await;
        self.evict_idle(&mut controllers).await
    }

    async fn evict_idle(&self, controllers: &mut HashMap<ConversationId, Arc<TriageController>>) -> usize {
        let mut stale = Vec::new();
        for (id, controller) in controllers.iter() {
            // Busy controllers report no idle time and are never evicted.
            if controller.idle_for().await.is_some_and(|idle| idle >= self.idle_ttl) {
                stale.push(*id);
            }
        }

        for id in &stale {
            controllers.remove(id);
            tracing::debug!(conversation_id = %id, "Idle conversation evicted");
        }
        if !stale.is_empty() {
            tracing::info!(evicted = stale.len(), open = controllers.len(), "Swept idle conversations");
        }
        stale.len()
    }

    pub async fn len(&self) -> usize {
        self.controllers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
