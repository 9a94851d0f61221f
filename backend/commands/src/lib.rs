pub mod alias;
pub mod dispatch;
pub mod gate;
pub mod handlers;
pub mod help;
pub mod isolation;
pub mod normalize;
pub mod registry;
pub mod router;
pub mod types;

pub use alias::StringAlias;
pub use dispatch::{CommandDispatcher, Dispatched, InFlight, InFlightGuard, MessageHandler};
pub use gate::{AdminGate, AdminSet};
pub use handlers::{HelpHandler, ShutdownHandler, ShutdownPolicy, StartHandler};
pub use help::build_help_text;
pub use isolation::FailureIsolated;
pub use normalize::{action_name, command_rest};
pub use registry::{ActionRegistry, RegistryError, build_registry, canonicalize_key};
pub use router::MessageRouter;
pub use types::{AliasDefinition, EntryKind};

use std::sync::Arc;

use remocon_core::{IncomingMessage, Keyboard, StopHandle};
use tracing::warn;

/// Everything the router needs besides the registry.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub admins: AdminSet,
    pub quick_access: Option<Keyboard>,
    pub shutdown_phrase: String,
    /// When false, only admins can trigger the shutdown phrase.
    pub shutdown_public: bool,
    pub shutdown_policy: ShutdownPolicy,
    /// Shared with the caller so it can wait for running actions on exit.
    pub in_flight: InFlight,
}

/// Build the message router.
///
/// Route order: `/start` (public), `/help` (gated), the shutdown phrase
/// (public or gated, matched on the whole trimmed text before any action
/// parsing), then every other message goes to the gated dispatcher.
pub fn build_router(
    registry: Arc<ActionRegistry>,
    settings: RouterSettings,
    stop: Arc<dyn StopHandle>,
) -> MessageRouter {
    for builtin in ["start", "help"] {
        if registry.contains(builtin) {
            warn!(action = builtin, "Configured action is shadowed by the built-in handler");
        }
    }

    let admins = settings.admins.clone();
    let help: Arc<dyn MessageHandler> = Arc::new(HelpHandler { text: build_help_text(&registry) });

    let shutdown: Arc<dyn MessageHandler> =
        Arc::new(ShutdownHandler { stop, policy: settings.shutdown_policy });
    let shutdown = if settings.shutdown_public {
        shutdown
    } else {
        AdminGate::wrap(admins.clone(), shutdown)
    };
    let phrase = settings.shutdown_phrase.trim().to_string();

    MessageRouter::new()
        .route(
            "start",
            |m: &IncomingMessage| action_name(m.text()) == "start",
            Arc::new(StartHandler { admins: admins.clone(), keyboard: settings.quick_access }),
        )
        .route(
            "help",
            |m: &IncomingMessage| action_name(m.text()) == "help",
            AdminGate::wrap(admins.clone(), help),
        )
        .route(
            "shutdown",
            move |m: &IncomingMessage| m.text.as_deref().is_some_and(|t| t.trim() == phrase),
            shutdown,
        )
        .route(
            "dispatch",
            |_: &IncomingMessage| true,
            AdminGate::wrap(
                admins,
                Arc::new(CommandDispatcher::new(registry).with_in_flight(settings.in_flight)),
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use remocon_core::testing::RecordingReplier;
    use remocon_core::{Action, Replier};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingStop(AtomicUsize);

    impl StopHandle for CountingStop {
        fn request_stop(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Counts invocations so tests can prove a side effect did or did not happen.
    struct Touch(Arc<AtomicUsize>);

    #[async_trait]
    impl Action for Touch {
        async fn invoke(&self, bot: &dyn Replier, msg: &IncomingMessage, rest: &str) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            bot.reply_text(msg, &format!("touched {rest}")).await?;
            Ok(())
        }
    }

    struct Fixture {
        router: MessageRouter,
        touches: Arc<AtomicUsize>,
        stop: Arc<CountingStop>,
    }

    fn fixture(shutdown_public: bool) -> Fixture {
        let touches = Arc::new(AtomicUsize::new(0));
        let registry = build_registry(
            vec![("touch".to_string(), Arc::new(Touch(touches.clone())) as Arc<dyn Action>)],
            vec![("t".to_string(), AliasDefinition::StringAlias("/touch it".into()))],
        )
        .unwrap();
        let stop = Arc::new(CountingStop::default());
        let router = build_router(
            Arc::new(registry),
            RouterSettings {
                admins: AdminSet::new([1]),
                quick_access: None,
                shutdown_phrase: " !SHUTDOWN ".into(),
                shutdown_public,
                shutdown_policy: ShutdownPolicy::Immediate,
                in_flight: InFlight::default(),
            },
            stop.clone(),
        );
        Fixture { router, touches, stop }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn admin_message_is_executed() {
        let f = fixture(false);
        let bot = Arc::new(RecordingReplier::new());

        let route = f.router.handle(bot.clone(), IncomingMessage::new(1, 1, "/t  x")).await;
        settle().await;

        assert_eq!(route, Some("dispatch"));
        assert_eq!(f.touches.load(Ordering::SeqCst), 1);
        assert_eq!(bot.reply_texts(), vec!["touched it  x"]);
    }

    #[tokio::test]
    async fn non_admin_identical_message_is_refused() {
        let f = fixture(false);
        let bot = Arc::new(RecordingReplier::new());

        f.router.handle(bot.clone(), IncomingMessage::new(2, 1, "/t  x")).await;
        settle().await;

        assert_eq!(f.touches.load(Ordering::SeqCst), 0);
        assert_eq!(bot.reply_texts(), vec![gate::NOT_ADMIN_REPLY]);
    }

    #[tokio::test]
    async fn start_is_public_and_help_is_gated() {
        let f = fixture(false);
        let bot = Arc::new(RecordingReplier::new());

        assert_eq!(f.router.handle(bot.clone(), IncomingMessage::new(2, 1, "/START")).await, Some("start"));
        assert_eq!(f.router.handle(bot.clone(), IncomingMessage::new(2, 2, "help")).await, Some("help"));
        assert_eq!(f.router.handle(bot.clone(), IncomingMessage::new(1, 3, "/help")).await, Some("help"));

        let replies = bot.reply_texts();
        assert_eq!(replies[0], handlers::HELLO_TEXT);
        assert_eq!(replies[1], gate::NOT_ADMIN_REPLY);
        assert!(replies[2].contains("/touch [no description]"));
        assert!(replies[2].contains("/t Alias for /touch it"));
    }

    #[tokio::test]
    async fn shutdown_phrase_is_matched_on_trimmed_text() {
        let f = fixture(true);
        let bot = Arc::new(RecordingReplier::new());

        let route = f.router.handle(bot.clone(), IncomingMessage::new(99, 1, "  !SHUTDOWN\n")).await;

        assert_eq!(route, Some("shutdown"));
        assert_eq!(f.stop.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gated_shutdown_refuses_strangers() {
        let f = fixture(false);
        let bot = Arc::new(RecordingReplier::new());

        f.router.handle(bot.clone(), IncomingMessage::new(99, 1, "!SHUTDOWN")).await;
        assert_eq!(f.stop.0.load(Ordering::SeqCst), 0);
        assert_eq!(bot.reply_texts(), vec![gate::NOT_ADMIN_REPLY]);

        f.router.handle(bot.clone(), IncomingMessage::new(1, 2, "!SHUTDOWN")).await;
        assert_eq!(f.stop.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_command_for_admin() {
        let f = fixture(false);
        let bot = Arc::new(RecordingReplier::new());
        f.router.handle(bot.clone(), IncomingMessage::new(1, 1, "/missing")).await;
        assert_eq!(bot.reply_texts(), vec![dispatch::UNKNOWN_NAME_REPLY]);
    }
}
