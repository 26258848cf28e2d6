//! Holding storage: row model, repository, and the replay-and-replace used
//! by every ledger mutation.

mod model;
mod repository;

pub use model::HoldingRow;
pub use repository::{replace_holding, HoldingRepository};
