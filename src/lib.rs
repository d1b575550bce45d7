pub mod calc;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod money;
pub mod numbering;
pub mod render;
pub mod report;
pub mod settings;
pub mod validate;
pub mod wizard;

pub use calc::{QuotationSummary, summarize};
pub use error::{QuoteError, Result};
pub use model::{LineItem, Party, QuotationRecord};
pub use validate::{ValidationPolicy, validate, validate_with};
