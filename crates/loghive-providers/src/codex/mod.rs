mod locator;
mod normalize;
mod schema;

pub use locator::CodexLocator;
pub use normalize::CodexNormalizer;

use crate::traits::ProviderAdapter;

pub fn adapter() -> ProviderAdapter {
    ProviderAdapter::new(Box::new(CodexLocator), Box::new(CodexNormalizer))
}
