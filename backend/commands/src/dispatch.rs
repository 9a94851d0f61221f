//! Command dispatch: resolve a message to a registered action and run it
//! on its own task.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info_span};
use uuid::Uuid;

use remocon_core::{IncomingMessage, Replier};
use remocon_logging::{CommandEvent, CommandEventLogger};

use crate::normalize::{action_name, command_rest};
use crate::registry::ActionRegistry;

pub const EMPTY_NAME_REPLY: &str = "Error: empty action name (space after slash?)";
pub const UNKNOWN_NAME_REPLY: &str = "Error: unknown action name";

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// Something that reacts to an inbound message selected by the router.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, bot: Arc<dyn Replier>, message: IncomingMessage) -> Result<()>;
}

// ---------------------------------------------------------------------------
// In-flight tracking
// ---------------------------------------------------------------------------

/// Counts spawned actions that have not finished yet.
///
/// Lets the process wait for running actions after the receive loop stops.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<InFlightState>);

#[derive(Debug, Default)]
struct InFlightState {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    pub fn count(&self) -> usize {
        self.0.count.load(Ordering::SeqCst)
    }

    /// Counts one running action until the guard is dropped.
    pub fn enter(&self) -> InFlightGuard {
        self.0.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard(self.clone())
    }

    /// Resolves once no action is running.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.0.idle.notified();
            if self.count() == 0 {
                return;
            }
            notified.await;
        }
    }
}

pub struct InFlightGuard(InFlight);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.0.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.0.idle.notify_waiters();
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// What the dispatcher did with a message.
#[derive(Debug)]
pub enum Dispatched {
    /// The name was empty; a diagnostic was sent.
    EmptyName,
    /// No such action; a diagnostic was sent.
    Unknown(String),
    /// The action was spawned; the handle resolves when it finishes.
    Scheduled { action: String, invocation_id: Uuid, task: JoinHandle<()> },
}

/// Stateless per message: normalize, look up, spawn.
pub struct CommandDispatcher {
    registry: Arc<ActionRegistry>,
    in_flight: InFlight,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self { registry, in_flight: InFlight::default() }
    }

    pub fn with_in_flight(mut self, in_flight: InFlight) -> Self {
        self.in_flight = in_flight;
        self
    }

    /// Resolve `message` and schedule its action without waiting for it.
    pub async fn dispatch(&self, bot: Arc<dyn Replier>, message: IncomingMessage) -> Result<Dispatched> {
        let name = action_name(message.text());
        if name.is_empty() {
            CommandEventLogger::log_event(message.chat_id, message.text(), CommandEvent::EmptyName);
            bot.reply_text(&message, EMPTY_NAME_REPLY).await?;
            return Ok(Dispatched::EmptyName);
        }

        let Some(unit) = self.registry.get(&name) else {
            CommandEventLogger::log_event(
                message.chat_id,
                message.text(),
                CommandEvent::UnknownAction { action: name.clone() },
            );
            bot.reply_text(&message, UNKNOWN_NAME_REPLY).await?;
            return Ok(Dispatched::Unknown(name));
        };

        let rest = command_rest(message.text(), true).to_string();
        let invocation_id = Uuid::new_v4();
        CommandEventLogger::log_event(
            message.chat_id,
            message.text(),
            CommandEvent::Dispatched { action: name.clone(), invocation_id: invocation_id.to_string() },
        );

        let span = info_span!("action", action = %name, invocation_id = %invocation_id);
        let guard = self.in_flight.enter();
        let task = tokio::spawn(
            async move {
                let _guard = guard;
                if let Err(e) = unit.invoke(bot.as_ref(), &message, &rest).await {
                    error!(error = %e, "Action returned an error past its isolation wrapper");
                }
            }
            .instrument(span),
        );

        Ok(Dispatched::Scheduled { action: name, invocation_id, task })
    }
}

#[async_trait]
impl MessageHandler for CommandDispatcher {
    async fn handle(&self, bot: Arc<dyn Replier>, message: IncomingMessage) -> Result<()> {
        self.dispatch(bot, message).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_registry;
    use anyhow::bail;
    use remocon_core::Action;
    use remocon_core::testing::RecordingReplier;
    use std::time::Duration;
    use tokio::sync::Notify;

    struct Echo;

    #[async_trait]
    impl Action for Echo {
        async fn invoke(&self, bot: &dyn Replier, msg: &IncomingMessage, rest: &str) -> Result<()> {
            bot.reply_text(msg, &format!("[{rest}]")).await?;
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl Action for Failing {
        async fn invoke(&self, _bot: &dyn Replier, _msg: &IncomingMessage, _rest: &str) -> Result<()> {
            bail!("nope")
        }
    }

    /// Blocks until released, to prove dispatch does not wait.
    struct Gate(Arc<Notify>);

    #[async_trait]
    impl Action for Gate {
        async fn invoke(&self, bot: &dyn Replier, msg: &IncomingMessage, _rest: &str) -> Result<()> {
            self.0.notified().await;
            bot.reply_text(msg, "released").await?;
            Ok(())
        }
    }

    fn entry(name: &str, action: impl Action + 'static) -> (String, Arc<dyn Action>) {
        (name.to_string(), Arc::new(action))
    }

    fn dispatcher(actions: Vec<(String, Arc<dyn Action>)>) -> CommandDispatcher {
        CommandDispatcher::new(Arc::new(build_registry(actions, vec![]).unwrap()))
    }

    #[tokio::test]
    async fn unknown_action_gets_one_diagnostic() {
        let d = dispatcher(vec![entry("echo", Echo)]);
        let bot = Arc::new(RecordingReplier::new());

        let outcome = d.dispatch(bot.clone(), IncomingMessage::new(1, 1, "/nope x")).await.unwrap();

        assert!(matches!(outcome, Dispatched::Unknown(ref n) if n == "nope"));
        assert_eq!(bot.reply_texts(), vec![UNKNOWN_NAME_REPLY]);
    }

    #[tokio::test]
    async fn empty_action_name_gets_one_diagnostic() {
        let d = dispatcher(vec![entry("echo", Echo)]);
        let bot = Arc::new(RecordingReplier::new());

        let outcome = d.dispatch(bot.clone(), IncomingMessage::new(1, 1, "/ echo")).await.unwrap();
        assert!(matches!(outcome, Dispatched::EmptyName));

        let no_text = IncomingMessage { chat_id: 1, message_id: 2, text: None };
        let outcome = d.dispatch(bot.clone(), no_text).await.unwrap();
        assert!(matches!(outcome, Dispatched::EmptyName));

        assert_eq!(bot.reply_texts(), vec![EMPTY_NAME_REPLY, EMPTY_NAME_REPLY]);
    }

    #[tokio::test]
    async fn known_action_runs_with_rest() {
        let d = dispatcher(vec![entry("echo", Echo)]);
        let bot = Arc::new(RecordingReplier::new());

        let outcome = d.dispatch(bot.clone(), IncomingMessage::new(1, 1, "  /ECHO  two  spaces")).await.unwrap();
        let Dispatched::Scheduled { action, task, .. } = outcome else {
            panic!("expected a scheduled action");
        };
        assert_eq!(action, "echo");
        task.await.unwrap();
        assert_eq!(bot.reply_texts(), vec!["[ two  spaces]"]);
    }

    #[tokio::test]
    async fn dispatch_does_not_wait_for_the_action() {
        let release = Arc::new(Notify::new());
        let d = dispatcher(vec![entry("slow", Gate(release.clone())), entry("echo", Echo)]);
        let bot = Arc::new(RecordingReplier::new());

        let slow = d.dispatch(bot.clone(), IncomingMessage::new(1, 1, "/slow")).await.unwrap();
        let fast = d.dispatch(bot.clone(), IncomingMessage::new(1, 2, "/echo hi")).await.unwrap();

        let Dispatched::Scheduled { task: fast_task, .. } = fast else { panic!("not scheduled") };
        fast_task.await.unwrap();
        assert_eq!(bot.reply_texts(), vec!["[hi]"]);

        release.notify_one();
        let Dispatched::Scheduled { task: slow_task, .. } = slow else { panic!("not scheduled") };
        tokio::time::timeout(Duration::from_secs(5), slow_task).await.unwrap().unwrap();
        assert_eq!(bot.reply_texts(), vec!["[hi]", "released"]);
    }

    #[tokio::test]
    async fn failing_action_leaves_dispatcher_usable() {
        let d = dispatcher(vec![entry("fail", Failing), entry("echo", Echo)]);
        let bot = Arc::new(RecordingReplier::new());

        let Dispatched::Scheduled { task, .. } =
            d.dispatch(bot.clone(), IncomingMessage::new(1, 1, "/fail")).await.unwrap()
        else {
            panic!("not scheduled")
        };
        task.await.unwrap();

        let Dispatched::Scheduled { task, .. } =
            d.dispatch(bot.clone(), IncomingMessage::new(1, 2, "/echo ok")).await.unwrap()
        else {
            panic!("not scheduled")
        };
        task.await.unwrap();

        let replies = bot.reply_texts();
        assert_eq!(replies.len(), 2);
        assert!(replies[0].contains("nope"));
        assert_eq!(replies[1], "[ok]");
    }

    #[tokio::test]
    async fn in_flight_tracks_running_actions() {
        let release = Arc::new(Notify::new());
        let in_flight = InFlight::default();
        let d = dispatcher(vec![entry("slow", Gate(release.clone()))]).with_in_flight(in_flight.clone());
        let bot = Arc::new(RecordingReplier::new());

        d.dispatch(bot.clone(), IncomingMessage::new(1, 1, "/slow")).await.unwrap();
        assert_eq!(in_flight.count(), 1);

        let waiter = tokio::spawn({
            let in_flight = in_flight.clone();
            async move { in_flight.wait_idle().await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        release.notify_one();
        tokio::time::timeout(Duration::from_secs(5), waiter).await.unwrap().unwrap();
        assert_eq!(in_flight.count(), 0);
        assert_eq!(bot.reply_texts(), vec!["released"]);
    }
}
