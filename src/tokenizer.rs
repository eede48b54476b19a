//! The [`Tokenizer`]: owns the mutable token vector and the context-checker
//! registry, drives the forward scan, and exposes the destructive edit
//! operations from `spec.md` §4.2.

use crate::context::{ContextChecker, ContextRange};
use crate::error::TokenizerError;
use crate::event::{Event, EventBus, EventKind, SubscriptionId};
use crate::token::{ContextParams, StateValue, Token};

/// A predicate writing a token's state conditionally, as registered via
/// [`Tokenizer::register_modifier`].
pub type ModifierCond = Box<dyn Fn(&Token, &ContextParams) -> bool>;
/// The function computing the value a modifier writes.
pub type ModifierFn = Box<dyn Fn(&Token, &ContextParams) -> StateValue>;

/// One operation batched into a [`Tokenizer::compose_rud`] call.
#[derive(Clone)]
pub enum RudOp {
    /// See [`Tokenizer::insert_token`].
    InsertToken { tokens: Vec<Token>, at: usize },
    /// See [`Tokenizer::remove_token`].
    RemoveToken { at: usize },
    /// See [`Tokenizer::remove_range`]. `end_offset = None` means "to end".
    RemoveRange {
        start: usize,
        end_offset: Option<usize>,
    },
    /// See [`Tokenizer::replace_token`].
    ReplaceToken { at: usize, token: Token },
    /// See [`Tokenizer::replace_range`]. `end_offset = None` means "to end".
    ReplaceRange {
        start: usize,
        end_offset: Option<usize>,
        tokens: Vec<Token>,
    },
}

/// The outcome of one successful operation inside a [`Tokenizer::compose_rud`]
/// call, carrying whatever the underlying single-op method would have
/// returned.
#[derive(Debug, Clone, PartialEq)]
pub enum RudSuccess {
    InsertedAt(usize),
    RemovedToken(Token),
    RemovedRange(Vec<Token>),
    ReplacedToken(Token),
    ReplacedRange(Vec<Token>),
}

/// Owns the token vector and the context-checker registry; drives one
/// forward scan per [`Tokenizer::tokenize`] call and exposes destructive
/// edits that keep context ranges consistent.
pub struct Tokenizer {
    tokens: Vec<Token>,
    checkers: Vec<ContextChecker>,
    events: EventBus,
    modifiers: Vec<&'static str>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer::new()
    }
}

impl Tokenizer {
    /// A fresh tokenizer with no tokens, no checkers, and the six mutating
    /// events already wired to `updateContextsRanges` per `spec.md` §4.1's
    /// bootstrapping contract.
    pub fn new() -> Self {
        let mut events = EventBus::new();
        for kind in EventKind::MUTATING {
            events.subscribe(kind, |tokenizer: &mut Tokenizer, _event| {
                tokenizer.update_contexts_ranges();
            });
        }
        Tokenizer {
            tokens: Vec::new(),
            checkers: Vec::new(),
            events,
            modifiers: Vec::new(),
        }
    }

    fn emit(&mut self, event: Event) {
        let mut events = std::mem::take(&mut self.events);
        events.dispatch(self, event);
        self.events = events;
    }

    // -- registration ----------------------------------------------------

    /// Register a named start/end predicate pair. Fails if `name` is
    /// already registered.
    pub fn register_context_checker(
        &mut self,
        name: &'static str,
        check_start: impl Fn(&ContextParams) -> bool + 'static,
        check_end: impl Fn(&ContextParams) -> bool + 'static,
    ) -> Result<(), TokenizerError> {
        if self.checkers.iter().any(|c| c.name == name) {
            return Err(TokenizerError::DuplicateContextChecker(name.to_string()));
        }
        self.checkers
            .push(ContextChecker::new(name, check_start, check_end));
        Ok(())
    }

    /// Subscribe a `newToken` handler that writes `token.state[id]` whenever
    /// `cond` holds (or unconditionally if `cond` is `None`), updating
    /// `active_state` to match. `id` is recorded in the registered-modifier
    /// list so later passes (e.g. the Arabic shaper) can check their
    /// prerequisites with [`Tokenizer::has_modifier`].
    pub fn register_modifier(
        &mut self,
        id: &'static str,
        cond: Option<ModifierCond>,
        modify: ModifierFn,
    ) {
        self.mark_modifier_registered(id);
        self.events.subscribe(EventKind::NewToken, move |tokenizer, event| {
            if let Event::NewToken { index, params } = event {
                let index = *index;
                let should_apply = match &cond {
                    Some(c) => c(&tokenizer.tokens[index], params),
                    None => true,
                };
                if should_apply {
                    let value = modify(&tokenizer.tokens[index], params);
                    tokenizer.tokens[index].set_state(id, value);
                }
            }
        });
    }

    /// Subscribe `handler` to the event named `name`. Returns `None` if
    /// `name` is not one of the core events.
    pub fn on(
        &mut self,
        name: &str,
        handler: impl FnMut(&mut Tokenizer, &Event) + 'static,
    ) -> Option<SubscriptionId> {
        let kind = EventKind::from_name(name)?;
        Some(self.events.subscribe(kind, handler))
    }

    /// Unsubscribe a handler previously returned by `on` or by an internal
    /// subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Record `id` as registered without subscribing a handler for it; used
    /// by passes (like glyph-index seeding) that write token state directly
    /// rather than through the generic modifier pipeline.
    pub(crate) fn mark_modifier_registered(&mut self, id: &'static str) {
        if !self.modifiers.contains(&id) {
            self.modifiers.push(id);
        }
    }

    /// Whether a modifier named `id` has been registered (directly or via
    /// [`Tokenizer::register_modifier`]).
    pub fn has_modifier(&self, id: &str) -> bool {
        self.modifiers.iter().any(|m| *m == id)
    }

    // -- tokenize ----------------------------------------------------------

    /// Rebuild the token vector from `text`, resetting every registered
    /// checker's ranges and running one forward scan: `start`, then per
    /// character `next` → `runContextCheck` → push → `newToken`, then
    /// `end`. Returns the freshly built tokens.
    pub fn tokenize(&mut self, text: &str) -> &[Token] {
        self.tokens.clear();
        for checker in &mut self.checkers {
            checker.reset();
        }

        let chars: Vec<char> = text.chars().collect();
        self.emit(Event::Start);

        for i in 0..chars.len() {
            let params = ContextParams::new(&chars, i);
            self.emit(Event::Next(params));
            self.run_context_check(&chars, i);
            self.tokens.push(Token::new(chars[i]));
            let params = ContextParams::new(&chars, i);
            self.emit(Event::NewToken { index: i, params });
        }

        self.emit(Event::End {
            token_count: self.tokens.len(),
        });

        &self.tokens
    }

    fn run_context_check(&mut self, chars: &[char], index: usize) {
        let params = ContextParams::new(chars, index);
        let mut checkers = std::mem::take(&mut self.checkers);
        let mut to_emit = Vec::new();
        for checker in checkers.iter_mut() {
            let (started, closed) = checker.run(&params);
            if let Some(start_index) = started {
                to_emit.push(Event::ContextStart {
                    name: checker.name,
                    index: start_index,
                });
            }
            if let Some(range) = closed {
                to_emit.push(Event::ContextEnd {
                    name: checker.name,
                    range,
                });
            }
        }
        self.checkers = checkers;
        for event in to_emit {
            self.emit(event);
        }
    }

    /// Reset every checker and re-scan `tokens.map(|t| t.char)` from
    /// scratch, then dispatch `updateContextsRanges`. This is the
    /// subscription target of every (non-silent) mutating operation.
    pub fn update_contexts_ranges(&mut self) {
        for checker in &mut self.checkers {
            checker.reset();
        }
        let chars: Vec<char> = self.tokens.iter().map(|t| t.char).collect();
        for i in 0..chars.len() {
            self.run_context_check(&chars, i);
        }
        self.emit(Event::UpdateContextsRanges);
    }

    // -- destructive edits --------------------------------------------------

    /// Splice-insert `tokens` at `i`. `i == len()` appends.
    pub fn insert_token(
        &mut self,
        tokens: Vec<Token>,
        i: usize,
        silent: bool,
    ) -> Result<(), TokenizerError> {
        let len = self.tokens.len();
        if i > len {
            return Err(TokenizerError::IndexOutOfBounds { index: i, len });
        }
        let count = tokens.len();
        for (k, token) in tokens.into_iter().enumerate() {
            self.tokens.insert(i + k, token);
        }
        if !silent {
            self.emit(Event::InsertToken { at: i, count });
        }
        Ok(())
    }

    /// Splice-remove the token at `i`, returning it.
    pub fn remove_token(&mut self, i: usize, silent: bool) -> Result<Token, TokenizerError> {
        let len = self.tokens.len();
        if i >= len {
            return Err(TokenizerError::IndexOutOfBounds { index: i, len });
        }
        let removed = self.tokens.remove(i);
        if !silent {
            self.emit(Event::RemoveToken { at: i });
        }
        Ok(removed)
    }

    /// Splice-remove `[start, start+end_offset)`, or `[start, len())` when
    /// `end_offset` is `None`.
    pub fn remove_range(
        &mut self,
        start: usize,
        end_offset: Option<usize>,
        silent: bool,
    ) -> Result<Vec<Token>, TokenizerError> {
        let len = self.tokens.len();
        let end = end_offset.map_or(len, |o| start + o);
        if start > end || end > len {
            return Err(TokenizerError::InvalidRange { start, end, len });
        }
        let removed: Vec<Token> = self.tokens.splice(start..end, std::iter::empty()).collect();
        if !silent {
            self.emit(Event::RemoveRange { start, end });
        }
        Ok(removed)
    }

    /// Replace the token at `i`, returning the one it displaced.
    pub fn replace_token(
        &mut self,
        i: usize,
        token: Token,
        silent: bool,
    ) -> Result<Token, TokenizerError> {
        let len = self.tokens.len();
        if i >= len {
            return Err(TokenizerError::IndexOutOfBounds { index: i, len });
        }
        let old = std::mem::replace(&mut self.tokens[i], token);
        if !silent {
            self.emit(Event::ReplaceToken { at: i });
        }
        Ok(old)
    }

    /// Replace `[start, start+end_offset)` (or `[start, len())` when
    /// `end_offset` is `None`) with `tokens`, returning the displaced
    /// tokens.
    pub fn replace_range(
        &mut self,
        start: usize,
        end_offset: Option<usize>,
        tokens: Vec<Token>,
        silent: bool,
    ) -> Result<Vec<Token>, TokenizerError> {
        let len = self.tokens.len();
        let end = end_offset.map_or(len, |o| start + o);
        if start > end || end > len {
            return Err(TokenizerError::InvalidRange { start, end, len });
        }
        let new_end = start + tokens.len();
        let old: Vec<Token> = self.tokens.splice(start..end, tokens).collect();
        if !silent {
            self.emit(Event::ReplaceRange {
                start,
                end: new_end,
            });
        }
        Ok(old)
    }

    /// Run every operation in `ops` in silent mode, then: if *all* failed,
    /// return [`TokenizerError::ComposeRudFailed`] carrying one error per
    /// input operation (aligned by index); otherwise dispatch one
    /// `composeRUD` event (which triggers the usual single
    /// `updateContextsRanges` recompute via the bootstrapped subscription)
    /// and return the successful results.
    pub fn compose_rud(&mut self, ops: &[RudOp]) -> Result<Vec<RudSuccess>, TokenizerError> {
        let mut oks = Vec::new();
        let mut errs = Vec::new();
        for op in ops {
            let result = match op.clone() {
                RudOp::InsertToken { tokens, at } => self
                    .insert_token(tokens, at, true)
                    .map(|_| RudSuccess::InsertedAt(at)),
                RudOp::RemoveToken { at } => {
                    self.remove_token(at, true).map(RudSuccess::RemovedToken)
                }
                RudOp::RemoveRange { start, end_offset } => self
                    .remove_range(start, end_offset, true)
                    .map(RudSuccess::RemovedRange),
                RudOp::ReplaceToken { at, token } => self
                    .replace_token(at, token, true)
                    .map(RudSuccess::ReplacedToken),
                RudOp::ReplaceRange {
                    start,
                    end_offset,
                    tokens,
                } => self
                    .replace_range(start, end_offset, tokens, true)
                    .map(RudSuccess::ReplacedRange),
            };
            match result {
                Ok(success) => oks.push(success),
                Err(err) => errs.push(err),
            }
        }

        if !ops.is_empty() && oks.is_empty() {
            return Err(TokenizerError::ComposeRudFailed(errs));
        }

        self.emit(Event::ComposeRud { applied: oks.len() });
        Ok(oks)
    }

    // -- glyph seeding -------------------------------------------------------

    /// Seed every token's `glyphIndex` state from `resolver`, and record
    /// `"glyphIndex"` as a registered modifier. Required before any Arabic
    /// shaping pass.
    pub fn seed_glyph_index(&mut self, resolver: &dyn crate::ot::GlyphIndexResolver) {
        for token in &mut self.tokens {
            let glyph = resolver.char_to_glyph_index(token.char);
            token.set_glyph_index(glyph);
        }
        self.mark_modifier_registered("glyphIndex");
    }

    // -- accessors -----------------------------------------------------------

    /// The named checker, if registered.
    pub fn get_context(&self, name: &str) -> Option<&ContextChecker> {
        self.checkers.iter().find(|c| c.name == name)
    }

    /// The completed ranges for the named context, if registered.
    pub fn get_context_ranges(&self, name: &str) -> Option<&[ContextRange]> {
        self.get_context(name).map(|c| c.ranges.as_slice())
    }

    /// The tokens covered by `range`.
    pub fn get_range_tokens(&self, range: &ContextRange) -> &[Token] {
        &self.tokens[range.as_range()]
    }

    /// The characters covered by `range`, concatenated.
    pub fn range_to_text(&self, range: &ContextRange) -> String {
        self.get_range_tokens(range).iter().map(|t| t.char).collect()
    }

    /// Every token's character, concatenated, in current order.
    pub fn get_text(&self) -> String {
        self.tokens.iter().map(|t| t.char).collect()
    }

    /// Borrow the current tokens.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Mutably borrow the current tokens; used internally by the complex
    /// shapers, which write substitution results directly rather than
    /// through the newToken modifier pipeline (positional forms and
    /// ligatures are only knowable once a whole word range has closed).
    pub(crate) fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tokenize_combines_surrogate_pairs_via_char() {
        let mut t = Tokenizer::new();
        let tokens = t.tokenize("a\u{1F600}b");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].char, '\u{1F600}');
    }

    #[test]
    fn identity_when_no_modifiers_registered() {
        let mut t = Tokenizer::new();
        let text = "hello world";
        t.tokenize(text);
        assert_eq!(t.get_text().chars().count(), text.chars().count());
        assert_eq!(t.get_text(), text);
    }

    #[test]
    fn insert_remove_replace_round_trip() {
        let mut t = Tokenizer::new();
        t.tokenize("abc");
        t.insert_token(vec![Token::new('X')], 1, false).unwrap();
        assert_eq!(t.get_text(), "aXbc");
        t.remove_token(1, false).unwrap();
        assert_eq!(t.get_text(), "abc");
        t.replace_token(0, Token::new('Z'), false).unwrap();
        assert_eq!(t.get_text(), "Zbc");
    }

    #[test]
    fn out_of_bounds_edits_are_soft_failures() {
        let mut t = Tokenizer::new();
        t.tokenize("ab");
        assert_eq!(
            t.remove_token(5, false),
            Err(TokenizerError::IndexOutOfBounds { index: 5, len: 2 })
        );
        // tokenizer keeps working afterwards
        assert_eq!(t.get_text(), "ab");
    }

    #[test]
    fn duplicate_context_checker_is_rejected() {
        let mut t = Tokenizer::new();
        t.register_context_checker("x", |_| false, |_| false).unwrap();
        let err = t.register_context_checker("x", |_| false, |_| false);
        assert_eq!(err, Err(TokenizerError::DuplicateContextChecker("x".into())));
    }

    #[test]
    fn unknown_event_name_returns_none() {
        let mut t = Tokenizer::new();
        assert!(t.on("bogus", |_, _| {}).is_none());
        assert!(t.on("newToken", |_, _| {}).is_some());
    }

    #[test]
    fn compose_rud_fails_only_if_every_op_fails() {
        let mut t = Tokenizer::new();
        t.tokenize("abc");
        let result = t.compose_rud(&[
            RudOp::RemoveToken { at: 50 },
            RudOp::RemoveToken { at: 0 },
        ]);
        assert!(result.is_ok());
        assert_eq!(t.get_text(), "bc");
    }

    #[test]
    fn compose_rud_fails_when_everything_fails() {
        let mut t = Tokenizer::new();
        t.tokenize("abc");
        let result = t.compose_rud(&[
            RudOp::RemoveToken { at: 50 },
            RudOp::RemoveToken { at: 99 },
        ]);
        match result.unwrap_err() {
            TokenizerError::ComposeRudFailed(errs) => assert_eq!(errs.len(), 2),
            other => panic!("expected ComposeRudFailed, got {other:?}"),
        }
        assert_eq!(t.get_text(), "abc");
    }

    #[test]
    fn compose_rud_dispatches_one_update_and_one_compose_event() {
        let mut t = Tokenizer::new();
        t.tokenize("abc");
        let update_count = std::rc::Rc::new(std::cell::RefCell::new(0));
        let compose_count = std::rc::Rc::new(std::cell::RefCell::new(0));
        let u = update_count.clone();
        let c = compose_count.clone();
        t.on("updateContextsRanges", move |_t, _e| *u.borrow_mut() += 1);
        t.on("composeRUD", move |_t, _e| *c.borrow_mut() += 1);

        t.compose_rud(&[
            RudOp::RemoveToken { at: 0 },
            RudOp::InsertToken {
                tokens: vec![Token::new('X')],
                at: 0,
            },
        ])
        .unwrap();

        assert_eq!(*update_count.borrow(), 1);
        assert_eq!(*compose_count.borrow(), 1);
        assert_eq!(t.get_text(), "Xbc");
    }

    #[test]
    fn silent_edits_do_not_dispatch_update() {
        let mut t = Tokenizer::new();
        t.tokenize("abc");
        let update_count = std::rc::Rc::new(std::cell::RefCell::new(0));
        let u = update_count.clone();
        t.on("updateContextsRanges", move |_t, _e| *u.borrow_mut() += 1);
        t.remove_token(0, true).unwrap();
        assert_eq!(*update_count.borrow(), 0);
        t.remove_token(0, false).unwrap();
        assert_eq!(*update_count.borrow(), 1);
    }

    #[test]
    fn round_trip_consistency_after_replace_range() {
        let mut t = Tokenizer::new();
        t.register_context_checker(
            "latinWord",
            crate::script_context::latin_word_start,
            crate::script_context::latin_word_end,
        )
        .unwrap();
        t.tokenize("ab cd");
        t.replace_range(0, Some(2), vec![Token::new('X'), Token::new('Y'), Token::new('Z')], false)
            .unwrap();
        assert_eq!(t.get_text(), "XYZ cd");

        let from_scratch = {
            let mut scratch = Tokenizer::new();
            scratch
                .register_context_checker(
                    "latinWord",
                    crate::script_context::latin_word_start,
                    crate::script_context::latin_word_end,
                )
                .unwrap();
            scratch.tokenize(&t.get_text());
            scratch.get_context_ranges("latinWord").unwrap().to_vec()
        };
        assert_eq!(t.get_context_ranges("latinWord").unwrap(), from_scratch.as_slice());
    }
}
