//! Choice selection.
//!
//! The session asks one [`ChoiceSelector`] for the concrete choice to act
//! on. [`ResolverSelector`] lets the resolver decide; [`AdapterSelector`]
//! asks a [`DecisionAdapter`] and holds its pick to the same rules the
//! resolver applies.

use gb_story::{Choice, ResolutionSource, resolve_choices, validate_pick};

use crate::adapter::{DecisionAdapter, DecisionContext};
use crate::error::{AgentError, AgentResult};

/// The choice a selector settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Concrete choice, occupation paths already resolved.
    pub choice: Choice,
    /// 1-based index on the page; none for the safe fallback.
    pub index: Option<usize>,
    /// Why it was chosen.
    pub rationale: String,
    /// Set when the resolver made the choice.
    pub resolution: Option<ResolutionSource>,
}

impl Selection {
    /// Whether this is the resolver's jump back to the start.
    pub fn is_safe_fallback(&self) -> bool {
        self.resolution == Some(ResolutionSource::SafeFallback)
    }
}

/// A way of choosing what to do on a page.
pub trait ChoiceSelector {
    /// Short name used in logs and the journal.
    fn name(&self) -> &str;

    /// Pick the concrete choice to execute.
    ///
    /// An error either interrupts the session or, for rule violations and
    /// bad input, counts towards the circuit breaker.
    fn select(&mut self, ctx: &DecisionContext<'_>) -> AgentResult<Selection>;
}

/// Lets the choice resolver decide.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverSelector;

impl ResolverSelector {
    fn resolve(ctx: &DecisionContext<'_>) -> Selection {
        let resolution = resolve_choices(&ctx.page.choices, ctx.character);
        Selection {
            rationale: format!("resolver: {}", resolution.source),
            choice: resolution.choice,
            index: resolution.index,
            resolution: Some(resolution.source),
        }
    }
}

impl ChoiceSelector for ResolverSelector {
    fn name(&self) -> &str {
        "auto"
    }

    fn select(&mut self, ctx: &DecisionContext<'_>) -> AgentResult<Selection> {
        Ok(Self::resolve(ctx))
    }
}

/// Asks an adapter and validates its pick.
#[derive(Debug)]
pub struct AdapterSelector<A> {
    adapter: A,
}

impl<A: DecisionAdapter> AdapterSelector<A> {
    /// Wrap an adapter.
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    /// The wrapped adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }
}

impl<A: DecisionAdapter> ChoiceSelector for AdapterSelector<A> {
    fn name(&self) -> &str {
        self.adapter.name()
    }

    fn select(&mut self, ctx: &DecisionContext<'_>) -> AgentResult<Selection> {
        let any_valid = ctx
            .page
            .choices
            .iter()
            .any(|c| validate_pick(c, ctx.character).is_ok());
        if !any_valid {
            tracing::info!(
                page = ctx.page_id,
                adapter = self.adapter.name(),
                "no choice passes the rules, deferring to the resolver"
            );
            return Ok(ResolverSelector::resolve(ctx));
        }

        let decision = self.adapter.decide(ctx)?;
        let choice = decision
            .index
            .checked_sub(1)
            .and_then(|i| ctx.page.choices.get(i))
            .ok_or(AgentError::OutOfRange {
                index: decision.index,
                available: ctx.choice_count(),
            })?;
        let concrete = validate_pick(choice, ctx.character)?;
        tracing::debug!(index = decision.index, rationale = %decision.rationale, "pick accepted");
        Ok(Selection {
            choice: concrete,
            index: Some(decision.index),
            rationale: decision.rationale,
            resolution: None,
        })
    }
}

impl<S: ChoiceSelector + ?Sized> ChoiceSelector for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn select(&mut self, ctx: &DecisionContext<'_>) -> AgentResult<Selection> {
        (**self).select(ctx)
    }
}
