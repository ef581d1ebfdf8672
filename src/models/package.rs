use serde::{Deserialize, Serialize};

// A purchasable streaming subscription. Either price tier may be missing
// when the provider does not sell the package that way; a package with no
// price at all still appears in coverage listings but never in cost ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamingPackage {
    pub id: u32,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_price_cents: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_price_yearly_subscription_in_cents: Option<u32>,
}

impl StreamingPackage {
    /// Price used for display-order tie breaks: the yearly-subscription
    /// monthly rate when available, otherwise the rolling monthly rate.
    pub fn effective_monthly_price_cents(&self) -> Option<u32> {
        self.monthly_price_yearly_subscription_in_cents
            .or(self.monthly_price_cents)
    }
}
