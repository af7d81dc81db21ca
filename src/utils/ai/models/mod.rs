mod table;
mod utils;


pub use table::ModelLimitTable;
pub use utils::ModelUtils;
