mod locator;
mod normalize;
mod schema;

pub use locator::ClaudeCodeLocator;
pub use normalize::ClaudeCodeNormalizer;

use crate::traits::ProviderAdapter;

pub fn adapter() -> ProviderAdapter {
    ProviderAdapter::new(Box::new(ClaudeCodeLocator), Box::new(ClaudeCodeNormalizer))
}
