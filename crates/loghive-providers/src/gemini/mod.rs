mod locator;
mod normalize;
mod schema;

pub use locator::GeminiLocator;
pub use normalize::GeminiNormalizer;

use crate::traits::ProviderAdapter;

pub fn adapter() -> ProviderAdapter {
    ProviderAdapter::new(Box::new(GeminiLocator), Box::new(GeminiNormalizer))
}
