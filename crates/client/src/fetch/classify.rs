//! Response classification against the site origin.
//!
//! Only `Basic` responses are admitted into the cache; cross-origin and
//! redirected responses are always passed through uncached.

use super::url::same_origin;

/// How a fetched response relates to the site origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// Same-origin response served directly, no redirects.
    Basic,
    /// The request or its final destination left the site origin.
    CrossOrigin,
    /// Same-origin, but at least one redirect was followed.
    Redirected,
}

impl ResponseClass {
    /// Classify a fetch by its request URL, post-redirect URL, and the
    /// configured site origin.
    pub fn of(request_url: &url::Url, final_url: &url::Url, origin: &url::Url) -> Self {
        if !same_origin(request_url, origin) || !same_origin(final_url, origin) {
            return ResponseClass::CrossOrigin;
        }
        if request_url != final_url {
            return ResponseClass::Redirected;
        }
        ResponseClass::Basic
    }

    pub fn is_basic(self) -> bool {
        self == ResponseClass::Basic
    }
}
