pub mod cabin;
pub mod cruise;
pub mod pricing;
pub mod amount;

pub use cabin::{CabinType, CabinPrices};
pub use cruise::{Cruise, RetailFigure};
pub use pricing::{OfferPriceHints, PerPersonPrice, PriceResolver, PriceSource};
pub use amount::{extract_currency_value, positive_amount};
