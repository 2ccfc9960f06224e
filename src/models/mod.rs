pub mod change_sets;
pub mod patch;

pub use change_sets::{SaleOrderLineValues, SaleOrderOptionValues, SaleOrderValues};
pub use patch::Patch;
