//! Session selection state and its transitions.
//!
//! The state is owned by the event-dispatch layer and mutated only through
//! the pure transitions below: each takes the old state and an event and
//! returns a new state (or an error that leaves the old state in place).
//! There is no invalid state — bad inputs are rejected before any field
//! changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use geotick_core::{DurationDays, IndexRow, StatementPeriod, Symbol, ValidationError};

/// At most this many tickers may be compared side by side.
pub const MAX_COMPARED_TICKERS: usize = 2;

/// Rejected selection transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error(transparent)]
    InvalidSelection(#[from] ValidationError),
}

/// Current user choices driving every chart rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Ordered, deduplicated index identities. Order fixes legend order.
    pub selected_indices: Vec<Symbol>,
    /// Country whose tickers populate the stock dropdown. May be empty.
    pub selected_country: String,
    /// Ordered ticker identities, at most [`MAX_COMPARED_TICKERS`].
    pub selected_tickers: Vec<Symbol>,
    pub duration: DurationDays,
    pub statement_period: StatementPeriod,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            selected_indices: Vec::new(),
            selected_country: String::from("USA"),
            selected_tickers: Vec::new(),
            duration: DurationDays::default(),
            statement_period: StatementPeriod::default(),
        }
    }
}

impl SelectionState {
    /// Session-start state: the first snapshot row is pre-selected, as the
    /// dashboard opens with one index charted.
    pub fn default_for_snapshot(rows: &[IndexRow]) -> Self {
        let mut state = Self::default();
        if let Some(first) = rows.first() {
            state.selected_indices.push(first.symbol.clone());
        }
        state
    }

    /// Replace the index selection with a deduplicated, order-preserving
    /// copy of `ids`. Empty input is legal and yields an empty chart.
    pub fn select_indices(&self, ids: &[Symbol]) -> Self {
        let mut deduplicated: Vec<Symbol> = Vec::with_capacity(ids.len());
        for id in ids {
            if !deduplicated.contains(id) {
                deduplicated.push(id.clone());
            }
        }

        Self {
            selected_indices: deduplicated,
            ..self.clone()
        }
    }

    /// Resolve a map click to the first enriched row whose country code
    /// matches; that row becomes the sole index selection. No match is a
    /// no-op, not an error.
    pub fn click_map_point(&self, country_code: &str, rows: &[IndexRow]) -> Self {
        match rows.iter().find(|row| row.country_code == country_code) {
            Some(row) => Self {
                selected_indices: vec![row.symbol.clone()],
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    /// Change the country feeding the stock dropdown. Previously selected
    /// tickers may now be stale; the caller rebuilds the option set and
    /// nothing here panics on a stale identity.
    pub fn select_country(&self, country: &str) -> Self {
        Self {
            selected_country: country.to_owned(),
            ..self.clone()
        }
    }

    /// Replace the ticker selection, truncating to the first
    /// [`MAX_COMPARED_TICKERS`] in the given order.
    pub fn select_tickers(&self, ids: &[Symbol]) -> Self {
        let kept = ids.len().min(MAX_COMPARED_TICKERS);
        Self {
            selected_tickers: ids[..kept].to_vec(),
            ..self.clone()
        }
    }

    /// Change the comparison lookback. Out-of-set day counts are rejected
    /// and the prior state stays visible.
    pub fn select_duration(&self, days: u32) -> Result<Self, SelectionError> {
        let duration = DurationDays::from_days(days).map_err(SelectionError::from)?;
        Ok(Self {
            duration,
            ..self.clone()
        })
    }

    /// Change the statement granularity. Unknown values are rejected.
    pub fn select_statement_period(&self, period: &str) -> Result<Self, SelectionError> {
        let statement_period = period
            .parse::<StatementPeriod>()
            .map_err(SelectionError::from)?;
        Ok(Self {
            statement_period,
            ..self.clone()
        })
    }
}
