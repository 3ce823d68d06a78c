//! Site Config

use clap::Args;

use crate::review::site::SiteContext;

/// The site the checkout is for.
#[derive(Debug, Args)]
pub struct SiteConfig {
    /// Site display name
    #[arg(long, env = "CART_REVIEW_SITE_NAME")]
    pub site_name: Option<String>,

    /// Site URL
    #[arg(long, env = "CART_REVIEW_SITE_URL")]
    pub site_url: Option<String>,

    /// Site domain
    #[arg(long, env = "CART_REVIEW_SITE_DOMAIN")]
    pub site_domain: Option<String>,

    /// Whether the site domain is a mapped custom domain
    #[arg(long, env = "CART_REVIEW_SITE_MAPPED_DOMAIN")]
    pub mapped_domain: bool,
}

impl SiteConfig {
    /// Site context, or `None` when no site details were given.
    #[must_use]
    pub fn context(&self) -> Option<SiteContext> {
        if self.site_name.is_none() && self.site_url.is_none() && self.site_domain.is_none() {
            return None;
        }

        Some(SiteContext {
            name: self.site_name.clone(),
            url: self.site_url.clone(),
            domain: self.site_domain.clone(),
            is_mapped_domain: self.mapped_domain,
        })
    }
}
