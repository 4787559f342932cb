mod locator;
mod normalize;
mod schema;

pub use locator::AmpLocator;
pub use normalize::AmpNormalizer;

use crate::traits::ProviderAdapter;

pub fn adapter() -> ProviderAdapter {
    ProviderAdapter::new(Box::new(AmpLocator), Box::new(AmpNormalizer))
}
