//! WhatsApp order hand-off.
//!
//! There is no cart or payment flow: the product page links to a chat with a
//! pre-filled message naming the product and its price.

use crate::product::Product;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppCheckout {
    /// International number, digits only.
    number: String,
    currency: String,
}

impl WhatsAppCheckout {
    /// Non-digit characters (`+`, spaces, dashes) are stripped from `number`.
    #[must_use]
    pub fn new(number: &str, currency: impl Into<String>) -> Self {
        Self {
            number: number.chars().filter(char::is_ascii_digit).collect(),
            currency: currency.into(),
        }
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub fn message(&self, product: &Product) -> String {
        format!(
            "Hello Twinkle, I am interested in buying {} priced at {} {}.",
            product.title,
            product.price.plain(),
            self.currency
        )
    }

    #[must_use]
    pub fn order_url(&self, product: &Product) -> String {
        format!(
            "https://wa.me/{}?text={}",
            self.number,
            urlencoding::encode(&self.message(product))
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::product::fixtures::product;
    use crate::types::Category;

    #[test]
    fn builds_prefilled_link() {
        let mut p = product("p1", Category::Perfumes);
        p.title = "Rose & Oud".to_owned();
        p.price = "1250.00".parse().unwrap();

        let checkout = WhatsAppCheckout::new("+20 100-000-0000", "EGP");
        assert_eq!(
            checkout.message(&p),
            "Hello Twinkle, I am interested in buying Rose & Oud priced at 1250 EGP."
        );

        let url = checkout.order_url(&p);
        assert!(url.starts_with("https://wa.me/201000000000?text=Hello%20Twinkle"));
        assert!(url.contains("Rose%20%26%20Oud"));
    }
}
