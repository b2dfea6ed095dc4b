use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use shared::domain::{PatternId, PatternRecord};
use tokio::sync::Mutex;

use crate::{
    completion::CompletionService,
    error::{CompletionFailed, StoreUnavailable},
    store::PatternStore,
};

pub fn socratic() -> PatternRecord {
    PatternRecord::new(PatternId(1), "socratic", "Be Socratic")
}

pub fn terse() -> PatternRecord {
    PatternRecord::new(PatternId(2), "terse", "Be terse")
}

pub fn sample_patterns() -> Vec<PatternRecord> {
    vec![socratic(), terse()]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCall {
    pub system_instruction: String,
    pub user_message: String,
}

/// Replays queued results in order and records every call.
#[derive(Clone, Default)]
pub struct ScriptedCompletion {
    replies: Arc<Mutex<VecDeque<Result<String, CompletionFailed>>>>,
    calls: Arc<Mutex<Vec<CompletionCall>>>,
}

impl ScriptedCompletion {
    pub fn replying(replies: &[&str]) -> Self {
        let scripted = Self::default();
        {
            let mut queue = scripted.replies.try_lock().expect("fresh queue");
            queue.extend(replies.iter().map(|reply| Ok(reply.to_string())));
        }
        scripted
    }

    pub async fn push(&self, result: Result<String, CompletionFailed>) {
        self.replies.lock().await.push_back(result);
    }

    pub async fn calls(&self) -> Vec<CompletionCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<String, CompletionFailed> {
        self.calls.lock().await.push(CompletionCall {
            system_instruction: system_instruction.to_string(),
            user_message: user_message.to_string(),
        });
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(CompletionFailed::transport("no scripted reply left")))
    }
}

/// Pattern store whose contents tests can swap between refreshes.
#[derive(Clone)]
pub struct SwappableStore {
    next: Arc<Mutex<Result<Vec<PatternRecord>, StoreUnavailable>>>,
}

impl SwappableStore {
    pub fn with(patterns: Vec<PatternRecord>) -> Self {
        Self {
            next: Arc::new(Mutex::new(Ok(patterns))),
        }
    }

    pub async fn set(&self, patterns: Vec<PatternRecord>) {
        *self.next.lock().await = Ok(patterns);
    }

    pub async fn fail(&self, reason: &str) {
        *self.next.lock().await = Err(StoreUnavailable::new(reason));
    }
}

#[async_trait]
impl PatternStore for SwappableStore {
    async fn list_patterns(&self) -> Result<Vec<PatternRecord>, StoreUnavailable> {
        self.next.lock().await.clone()
    }
}
