//! Continuation-sequenced execution of a fired rule's actions
//!
//! Action `i + 1` is only started once action `i` has resumed its
//! continuation. Completions travel through a single channel; the firing only
//! accepts the completion for the step it is waiting on, so a late or repeated
//! signal can never advance it twice.

use crate::{ActionContext, Bindings, Completion, Continuation, FiringId, Rule};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// The channel completions are delivered through
#[derive(Debug)]
pub(crate) struct CompletionChannel {
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
}

impl CompletionChannel {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    pub(crate) fn continuation(&self, completion: Completion) -> Continuation {
        Continuation::new(completion, self.sender.clone())
    }

    pub(crate) fn try_next(&self) -> Option<Completion> {
        self.receiver.try_recv().ok()
    }

    /// Discard every pending completion
    pub(crate) fn discard_pending(&self) -> usize {
        let mut count = 0;
        while let Some(completion) = self.try_next() {
            tracing::warn!(
                firing = %completion.firing,
                step = completion.step,
                "ignoring completion with no open firing"
            );
            count += 1;
        }
        count
    }
}

/// Where a firing stands after being driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Progress {
    /// Every action resumed its continuation
    Completed,
    /// An action is still waiting on an external signal
    Suspended,
}

/// An open firing: one rule's action chain in progress
#[derive(Debug)]
pub(crate) struct Firing {
    id: FiringId,
    rule: Arc<Rule>,
    bindings: Bindings,
    /// Index of the next action to start
    next: usize,
    /// Step whose continuation has not come back yet
    awaiting: Option<usize>,
}

impl Firing {
    pub(crate) fn new(id: FiringId, rule: Arc<Rule>, bindings: Bindings) -> Self {
        Self {
            id,
            rule,
            bindings,
            next: 0,
            awaiting: None,
        }
    }

    pub(crate) fn id(&self) -> FiringId {
        self.id
    }

    pub(crate) fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Run actions until one suspends or the list is exhausted
    pub(crate) fn run(&mut self, ctx: &mut ActionContext<'_>, channel: &CompletionChannel) -> Progress {
        loop {
            if self.awaiting.is_some() {
                if !self.absorb(channel) {
                    return Progress::Suspended;
                }
                continue;
            }

            let Some(action) = self.rule.actions.get(self.next) else {
                return Progress::Completed;
            };

            let step = self.next;
            self.awaiting = Some(step);
            tracing::trace!(firing = %self.id, step, action = %action, "performing action");

            let k = channel.continuation(Completion {
                firing: self.id,
                step,
            });
            action.perform(ctx, &self.bindings, k);
        }
    }

    /// Drain the channel until the awaited completion shows up
    fn absorb(&mut self, channel: &CompletionChannel) -> bool {
        while let Some(completion) = channel.try_next() {
            if self.accept(completion) {
                return true;
            }
        }
        false
    }

    fn accept(&mut self, completion: Completion) -> bool {
        match self.awaiting {
            Some(step) if completion.firing == self.id && completion.step == step => {
                self.awaiting = None;
                self.next = step + 1;
                true
            }
            _ => {
                tracing::warn!(
                    firing = %completion.firing,
                    step = completion.step,
                    open = %self.id,
                    "ignoring stale completion"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Devices, EngineConfig, Fact, FactKind, FactStore};
    use std::sync::Mutex;

    #[cfg(feature = "journal")]
    use crate::journal::Journal;

    type Parked = Arc<Mutex<Vec<Continuation>>>;
    type Log = Arc<Mutex<Vec<String>>>;

    fn recording(log: &Log, label: &'static str) -> Action {
        let log = log.clone();
        Action::custom(label, move |_, _, k| {
            log.lock().unwrap().push(label.to_string());
            k.resume();
        })
    }

    fn parking(log: &Log, parked: &Parked, label: &'static str) -> Action {
        let log = log.clone();
        let parked = parked.clone();
        Action::custom(label, move |_, _, k| {
            log.lock().unwrap().push(label.to_string());
            parked.lock().unwrap().push(k);
        })
    }

    struct Harness {
        store: FactStore,
        devices: Devices,
        config: EngineConfig,
        #[cfg(feature = "journal")]
        journal: Journal,
        channel: CompletionChannel,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                store: FactStore::new(),
                devices: Devices::default(),
                config: EngineConfig::default(),
                #[cfg(feature = "journal")]
                journal: Journal::new(),
                channel: CompletionChannel::new(),
            }
        }

        fn drive(&mut self, firing: &mut Firing) -> Progress {
            let mut ctx = ActionContext {
                firing: firing.id(),
                store: &mut self.store,
                devices: &mut self.devices,
                config: &self.config,
                #[cfg(feature = "journal")]
                journal: &mut self.journal,
            };
            firing.run(&mut ctx, &self.channel)
        }
    }

    fn firing_of(rule: Rule) -> Firing {
        Firing::new(FiringId::new(1), Arc::new(rule), Bindings::new())
    }

    #[test]
    fn test_synchronous_chain_completes() {
        let log = Log::default();
        let rule = Rule::new("sync")
            .when_present("go", FactKind::Boolean)
            .then(recording(&log, "a1"))
            .then(Action::add(Fact::int("section", 2)))
            .then(recording(&log, "a2"));

        let mut harness = Harness::new();
        let mut firing = firing_of(rule);
        assert_eq!(harness.drive(&mut firing), Progress::Completed);
        assert_eq!(*log.lock().unwrap(), vec!["a1", "a2"]);
        assert_eq!(harness.store.get("section"), Some(Fact::int("section", 2)));
    }

    #[test]
    fn test_async_action_blocks_next() {
        let log = Log::default();
        let parked = Parked::default();
        let rule = Rule::new("async")
            .when_present("go", FactKind::Boolean)
            .then(parking(&log, &parked, "a1"))
            .then(recording(&log, "a2"));

        let mut harness = Harness::new();
        let mut firing = firing_of(rule);

        assert_eq!(harness.drive(&mut firing), Progress::Suspended);
        assert_eq!(*log.lock().unwrap(), vec!["a1"]);

        // Driving again without a signal changes nothing
        assert_eq!(harness.drive(&mut firing), Progress::Suspended);
        assert_eq!(*log.lock().unwrap(), vec!["a1"]);

        let k = parked.lock().unwrap().pop().unwrap();
        k.resume();
        assert_eq!(harness.drive(&mut firing), Progress::Completed);
        assert_eq!(*log.lock().unwrap(), vec!["a1", "a2"]);
    }

    #[test]
    fn test_stale_completion_ignored() {
        let log = Log::default();
        let parked = Parked::default();
        let rule = Rule::new("async")
            .when_present("go", FactKind::Boolean)
            .then(parking(&log, &parked, "a1"))
            .then(recording(&log, "a2"));

        let mut harness = Harness::new();
        let mut firing = firing_of(rule);
        assert_eq!(harness.drive(&mut firing), Progress::Suspended);

        // A completion from another firing must not advance this one
        harness
            .channel
            .continuation(Completion {
                firing: FiringId::new(99),
                step: 0,
            })
            .resume();
        assert_eq!(harness.drive(&mut firing), Progress::Suspended);
        assert_eq!(*log.lock().unwrap(), vec!["a1"]);
    }

    #[test]
    fn test_empty_action_list_completes() {
        let rule = Rule::new("noop").when_present("go", FactKind::Boolean);
        let mut harness = Harness::new();
        let mut firing = firing_of(rule);
        assert_eq!(harness.drive(&mut firing), Progress::Completed);
    }

    #[test]
    fn test_discard_pending() {
        let channel = CompletionChannel::new();
        channel
            .continuation(Completion {
                firing: FiringId::new(1),
                step: 0,
            })
            .resume();
        assert_eq!(channel.discard_pending(), 1);
        assert_eq!(channel.discard_pending(), 0);
    }
}
