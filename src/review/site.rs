//! Site summary shown above the order review.

use crate::{cart::Cart, classification::ProductClassifier};

/// Placeholder domain used before an account exists.
pub const NO_USER_DOMAIN: &str = "no-user";

/// The site the checkout is for, as known to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteContext {
    /// Site display name.
    pub name: Option<String>,

    /// Site URL.
    pub url: Option<String>,

    /// The site's own domain.
    pub domain: Option<String>,

    /// Whether `domain` is a mapped custom domain.
    pub is_mapped_domain: bool,
}

/// Heading line above the review list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSummary {
    /// "Site: example.com"
    Site {
        /// Domain or URL of the site being purchased for.
        domain: String,
    },

    /// "Upgrade: My Workspace" for P2+ purchases.
    Upgrade {
        /// Name of the site being upgraded.
        site_name: String,
    },
}

/// Work out which site heading to show, if any.
///
/// The domain is taken from the site's mapped domain, then the first domain
/// product in the cart, then the site URL. The first present source is used
/// even when it is empty, in which case no heading is shown.
pub fn site_summary(
    cart: &Cart,
    site: Option<&SiteContext>,
    classifier: &impl ProductClassifier,
) -> Option<SiteSummary> {
    if cart.has_product(|product| classifier.is_p2_plus_plan(product)) {
        return site
            .and_then(|site| site.name.clone())
            .filter(|name| !name.is_empty())
            .map(|site_name| SiteSummary::Upgrade { site_name });
    }

    let primary_domain = site
        .filter(|site| site.is_mapped_domain)
        .and_then(|site| site.domain.as_deref());

    let domain_product_meta = cart
        .products()
        .iter()
        .find(|product| classifier.is_domain_product(product))
        .and_then(|product| product.meta());

    let site_url = site.and_then(|site| site.url.as_deref());

    primary_domain
        .or(domain_product_meta)
        .or(site_url)
        .filter(|domain| !domain.is_empty() && *domain != NO_USER_DOMAIN)
        .map(|domain| SiteSummary::Site {
            domain: domain.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        cart::{CartError, CartTotals},
        classification::SlugClassifier,
        products::CartProduct,
    };

    use super::*;

    fn cart(products: Vec<CartProduct>) -> Result<Cart, CartError> {
        Cart::with_products(products, None, CartTotals::default(), USD)
    }

    fn product(uuid: &str, slug: &str) -> CartProduct {
        CartProduct::new(uuid, slug, slug, Money::from_minor(0, USD))
    }

    fn site() -> SiteContext {
        SiteContext {
            name: Some("My Site".to_string()),
            url: Some("mysite.wordpress.com".to_string()),
            domain: Some("mysite.com".to_string()),
            is_mapped_domain: true,
        }
    }

    #[test]
    fn mapped_domain_wins() -> TestResult {
        let cart = cart(vec![product("d", "domain_map").with_meta("other.com")])?;

        assert_eq!(
            site_summary(&cart, Some(&site()), &SlugClassifier::default()),
            Some(SiteSummary::Site {
                domain: "mysite.com".to_string()
            })
        );

        Ok(())
    }

    #[test]
    fn domain_product_meta_used_without_mapped_domain() -> TestResult {
        let cart = cart(vec![
            product("plan", "value_bundle"),
            product("d", "dotcom_domain")
                .with_domain_registration(true)
                .with_meta("newsite.com"),
        ])?;
        let site = SiteContext {
            is_mapped_domain: false,
            ..site()
        };

        assert_eq!(
            site_summary(&cart, Some(&site), &SlugClassifier::default()),
            Some(SiteSummary::Site {
                domain: "newsite.com".to_string()
            })
        );

        Ok(())
    }

    #[test]
    fn falls_back_to_site_url() -> TestResult {
        let cart = cart(vec![product("plan", "value_bundle")])?;
        let site = SiteContext {
            is_mapped_domain: false,
            ..site()
        };

        assert_eq!(
            site_summary(&cart, Some(&site), &SlugClassifier::default()),
            Some(SiteSummary::Site {
                domain: "mysite.wordpress.com".to_string()
            })
        );

        Ok(())
    }

    #[test]
    fn no_user_placeholder_is_hidden() -> TestResult {
        let cart = cart(vec![product("plan", "value_bundle")])?;
        let site = SiteContext {
            url: Some(NO_USER_DOMAIN.to_string()),
            ..SiteContext::default()
        };

        assert_eq!(site_summary(&cart, Some(&site), &SlugClassifier::default()), None);
        assert_eq!(site_summary(&cart, None, &SlugClassifier::default()), None);

        Ok(())
    }

    #[test]
    fn p2_plus_shows_upgrade_heading() -> TestResult {
        let cart = cart(vec![product("p2", "wp_p2_plus_monthly")])?;

        assert_eq!(
            site_summary(&cart, Some(&site()), &SlugClassifier::default()),
            Some(SiteSummary::Upgrade {
                site_name: "My Site".to_string()
            })
        );

        let unnamed = SiteContext {
            name: None,
            ..site()
        };

        assert_eq!(site_summary(&cart, Some(&unnamed), &SlugClassifier::default()), None);

        Ok(())
    }

    #[test]
    fn empty_names_and_domains_show_no_heading() -> TestResult {
        let plain = cart(vec![product("plan", "value_bundle")])?;
        let empty_url = SiteContext {
            url: Some(String::new()),
            ..SiteContext::default()
        };

        assert_eq!(site_summary(&plain, Some(&empty_url), &SlugClassifier::default()), None);

        let empty_mapped = SiteContext {
            domain: Some(String::new()),
            ..site()
        };

        assert_eq!(site_summary(&plain, Some(&empty_mapped), &SlugClassifier::default()), None);

        let p2 = cart(vec![product("p2", "wp_p2_plus_monthly")])?;
        let empty_name = SiteContext {
            name: Some(String::new()),
            ..site()
        };

        assert_eq!(site_summary(&p2, Some(&empty_name), &SlugClassifier::default()), None);

        Ok(())
    }
}
