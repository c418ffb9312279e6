mod models;
mod symbol;
mod timestamp;

pub use models::{
    validate_country_code, validate_currency_code, DurationDays, IndexQuote, IndexRow,
    LineItemSeries, PriceHistory, PricePoint, StatementKind, StatementPeriod, StatementTable,
    StatementValue, TickerRow,
};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
