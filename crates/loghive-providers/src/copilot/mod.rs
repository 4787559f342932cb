mod locator;
mod normalize;
mod schema;

pub use locator::CopilotLocator;
pub use normalize::CopilotNormalizer;

use crate::traits::ProviderAdapter;

pub fn adapter() -> ProviderAdapter {
    ProviderAdapter::new(Box::new(CopilotLocator), Box::new(CopilotNormalizer))
}
