//! Named, multi-subscriber signals dispatched synchronously against a
//! [`Tokenizer`] receiver.
//!
//! Unlike the source this crate is grown from, handlers here take an
//! explicit `&mut Tokenizer` argument rather than reading/writing an
//! implicit receiver (`spec.md` §9's "implicit receiver binding" redesign
//! flag). Unsubscription never shifts other handlers' positions: a removed
//! slot is tombstoned with `None` rather than removed from the `Vec`, so a
//! [`SubscriptionId`] obtained before a later unsubscription remains valid
//! (`spec.md` §9's generation-tagged-handle suggestion, realized here by
//! simply never reusing a slot).

use crate::context::ContextRange;
use crate::token::ContextParams;
use crate::tokenizer::Tokenizer;

/// The fixed set of events a [`Tokenizer`] can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Start,
    End,
    Next,
    NewToken,
    ContextStart,
    ContextEnd,
    InsertToken,
    RemoveToken,
    RemoveRange,
    ReplaceToken,
    ReplaceRange,
    ComposeRud,
    UpdateContextsRanges,
}

impl EventKind {
    /// The six events that are auto-subscribed to `updateContextsRanges` per
    /// `spec.md` §4.1's bootstrapping contract.
    pub const MUTATING: [EventKind; 6] = [
        EventKind::InsertToken,
        EventKind::RemoveToken,
        EventKind::RemoveRange,
        EventKind::ReplaceToken,
        EventKind::ReplaceRange,
        EventKind::ComposeRud,
    ];

    /// Parse the public string name used by `Tokenizer::on`, returning
    /// `None` for any name that is not one of the core events (`spec.md`
    /// §7's "unknown event name" soft failure).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "start" => EventKind::Start,
            "end" => EventKind::End,
            "next" => EventKind::Next,
            "newToken" => EventKind::NewToken,
            "contextStart" => EventKind::ContextStart,
            "contextEnd" => EventKind::ContextEnd,
            "insertToken" => EventKind::InsertToken,
            "removeToken" => EventKind::RemoveToken,
            "removeRange" => EventKind::RemoveRange,
            "replaceToken" => EventKind::ReplaceToken,
            "replaceRange" => EventKind::ReplaceRange,
            "composeRUD" => EventKind::ComposeRud,
            "updateContextsRanges" => EventKind::UpdateContextsRanges,
            _ => return None,
        })
    }

    /// All core event names, in the fixed order `spec.md` §4.1 lists them.
    pub const ALL: [EventKind; 13] = [
        EventKind::Start,
        EventKind::End,
        EventKind::Next,
        EventKind::NewToken,
        EventKind::ContextStart,
        EventKind::ContextEnd,
        EventKind::InsertToken,
        EventKind::RemoveToken,
        EventKind::RemoveRange,
        EventKind::ReplaceToken,
        EventKind::ReplaceRange,
        EventKind::ComposeRud,
        EventKind::UpdateContextsRanges,
    ];
}

/// The payload carried by a dispatched event. Handlers that need the
/// current token vector read it off the `&mut Tokenizer` receiver rather
/// than from this payload, so indices (not references into `tokens`) are
/// what gets carried here.
pub enum Event<'a> {
    Start,
    End { token_count: usize },
    Next(ContextParams<'a>),
    NewToken { index: usize, params: ContextParams<'a> },
    ContextStart { name: &'static str, index: usize },
    ContextEnd { name: &'static str, range: ContextRange },
    InsertToken { at: usize, count: usize },
    RemoveToken { at: usize },
    RemoveRange { start: usize, end: usize },
    ReplaceToken { at: usize },
    ReplaceRange { start: usize, end: usize },
    ComposeRud { applied: usize },
    UpdateContextsRanges,
}

impl<'a> Event<'a> {
    /// The [`EventKind`] this payload was dispatched under.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Start => EventKind::Start,
            Event::End { .. } => EventKind::End,
            Event::Next(_) => EventKind::Next,
            Event::NewToken { .. } => EventKind::NewToken,
            Event::ContextStart { .. } => EventKind::ContextStart,
            Event::ContextEnd { .. } => EventKind::ContextEnd,
            Event::InsertToken { .. } => EventKind::InsertToken,
            Event::RemoveToken { .. } => EventKind::RemoveToken,
            Event::RemoveRange { .. } => EventKind::RemoveRange,
            Event::ReplaceToken { .. } => EventKind::ReplaceToken,
            Event::ReplaceRange { .. } => EventKind::ReplaceRange,
            Event::ComposeRud { .. } => EventKind::ComposeRud,
            Event::UpdateContextsRanges => EventKind::UpdateContextsRanges,
        }
    }
}

type Handler = Box<dyn FnMut(&mut Tokenizer, &Event)>;

/// A stable handle returned by [`EventBus::subscribe`], usable to
/// unsubscribe later regardless of what else has been subscribed or
/// removed since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId {
    kind: EventKind,
    slot: usize,
}

/// The tokenizer's fixed-event multi-subscriber registry.
#[derive(Default)]
pub struct EventBus {
    start: Vec<Option<Handler>>,
    end: Vec<Option<Handler>>,
    next: Vec<Option<Handler>>,
    new_token: Vec<Option<Handler>>,
    context_start: Vec<Option<Handler>>,
    context_end: Vec<Option<Handler>>,
    insert_token: Vec<Option<Handler>>,
    remove_token: Vec<Option<Handler>>,
    remove_range: Vec<Option<Handler>>,
    replace_token: Vec<Option<Handler>>,
    replace_range: Vec<Option<Handler>>,
    compose_rud: Vec<Option<Handler>>,
    update_contexts_ranges: Vec<Option<Handler>>,
}

impl EventBus {
    /// An empty bus with no subscribers on any event.
    pub fn new() -> Self {
        EventBus::default()
    }

    fn slots_mut(&mut self, kind: EventKind) -> &mut Vec<Option<Handler>> {
        match kind {
            EventKind::Start => &mut self.start,
            EventKind::End => &mut self.end,
            EventKind::Next => &mut self.next,
            EventKind::NewToken => &mut self.new_token,
            EventKind::ContextStart => &mut self.context_start,
            EventKind::ContextEnd => &mut self.context_end,
            EventKind::InsertToken => &mut self.insert_token,
            EventKind::RemoveToken => &mut self.remove_token,
            EventKind::RemoveRange => &mut self.remove_range,
            EventKind::ReplaceToken => &mut self.replace_token,
            EventKind::ReplaceRange => &mut self.replace_range,
            EventKind::ComposeRud => &mut self.compose_rud,
            EventKind::UpdateContextsRanges => &mut self.update_contexts_ranges,
        }
    }

    /// Subscribe `handler` to `kind`, appended after any existing
    /// subscriber so dispatch order matches subscription order.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&mut Tokenizer, &Event) + 'static,
    ) -> SubscriptionId {
        let slots = self.slots_mut(kind);
        let slot = slots.len();
        slots.push(Some(Box::new(handler)));
        SubscriptionId { kind, slot }
    }

    /// Remove a previously subscribed handler. Returns `true` if a handler
    /// was actually removed (idempotent: unsubscribing twice is safe and
    /// returns `false` the second time).
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let slots = self.slots_mut(id.kind);
        match slots.get_mut(id.slot) {
            Some(slot @ Some(_)) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Dispatch `event` to every live subscriber of `event.kind()`, in
    /// subscription order, synchronously. Each handler runs to completion
    /// before the next starts, as `spec.md` §5 requires.
    pub fn dispatch(&mut self, receiver: &mut Tokenizer, event: Event) {
        let kind = event.kind();
        // Subscribers are taken out for the duration of the call so a
        // handler can itself call `subscribe`/`unsubscribe` (on a *different*
        // event) without a borrow conflict; handlers mutating the same
        // event's subscriber list mid-dispatch is unsupported, per `spec.md`
        // §5's reentrancy note.
        let mut handlers = std::mem::take(self.slots_mut(kind));
        for handler in handlers.iter_mut().flatten() {
            handler(receiver, &event);
        }
        *self.slots_mut(kind) = handlers;
    }
}
