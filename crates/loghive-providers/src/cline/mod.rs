mod locator;
mod normalize;
mod schema;

pub use locator::ClineLocator;
pub use normalize::ClineNormalizer;

use crate::traits::ProviderAdapter;

pub fn adapter() -> ProviderAdapter {
    ProviderAdapter::new(Box::new(ClineLocator), Box::new(ClineNormalizer))
}
