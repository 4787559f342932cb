mod locator;
mod normalize;
mod schema;

pub use locator::OpencodeLocator;
pub use normalize::OpencodeNormalizer;

use crate::traits::ProviderAdapter;

pub fn adapter() -> ProviderAdapter {
    ProviderAdapter::new(Box::new(OpencodeLocator), Box::new(OpencodeNormalizer))
}
