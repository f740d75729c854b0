use crate::application::process_manager::ProcessManager;
use crate::domain::{Account, AccountCommand, AccountError};
use crate::infrastructure::event_store::{EventStoreError, EventStoreTrait};
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Domain(#[from] AccountError),
    #[error(transparent)]
    Store(#[from] EventStoreError),
}

/// Orchestrates the read-replay-decide-append-cascade chain for one command
/// and every reaction command it transitively triggers.
#[derive(Clone)]
pub struct CommandHandler {
    store: Arc<dyn EventStoreTrait>,
    process_manager: Arc<dyn ProcessManager>,
}

impl CommandHandler {
    pub fn new(store: Arc<dyn EventStoreTrait>, process_manager: Arc<dyn ProcessManager>) -> Self {
        Self {
            store,
            process_manager,
        }
    }

    /// Handles a command and, on success, every reaction the process manager
    /// derives from the newly appended events, sequentially and fail-fast.
    ///
    /// The cascade runs on an explicit worklist rather than recursion, so a
    /// long reaction chain cannot grow the call stack. The first failure of
    /// any kind (validation, version conflict, store I/O) aborts the rest of
    /// the worklist; events appended by earlier iterations stay committed.
    /// There is no compensation and no automatic conflict retry here.
    pub async fn handle_command(
        &self,
        account_id: Uuid,
        command: AccountCommand,
    ) -> Result<(), CommandError> {
        let mut worklist: VecDeque<(Uuid, AccountCommand)> = VecDeque::new();
        worklist.push_back((account_id, command));

        while let Some((target_id, command)) = worklist.pop_front() {
            let stream_id = target_id.to_string();

            let history = self.store.read_from_stream(&stream_id).await?;
            let (state, version) = Account::replay(&history);

            let events = state.decide(&command).map_err(|e| {
                warn!(
                    account_id = %target_id,
                    command = command.command_type(),
                    error = %e,
                    "command rejected"
                );
                e
            })?;

            self.store
                .append_to_stream(&stream_id, version, events.clone())
                .await?;
            info!(
                account_id = %target_id,
                command = command.command_type(),
                appended = events.len(),
                expected_version = version,
                "command accepted"
            );

            for event in &events {
                for (reaction_target, reaction) in self.process_manager.react(event) {
                    debug!(
                        source_event = event.event_type(),
                        target = %reaction_target,
                        reaction = reaction.command_type(),
                        "reaction scheduled"
                    );
                    worklist.push_back((reaction_target, reaction));
                }
            }
        }

        Ok(())
    }

    /// Replays a stream and returns the current snapshot with its version.
    /// Read-only convenience for callers that want to inspect balances.
    pub async fn load_account(&self, account_id: Uuid) -> Result<(Account, i64), CommandError> {
        let history = self.store.read_from_stream(&account_id.to_string()).await?;
        Ok(Account::replay(&history))
    }
}
