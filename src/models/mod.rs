pub mod card;
pub mod market;
pub mod portfolio;
pub mod price;

pub use card::*;
pub use market::*;
pub use portfolio::*;
pub use price::*;
