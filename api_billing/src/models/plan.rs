use serde::Serialize;

/// A subscription tier with fixed price and entitlement duration.
///
/// The catalog is static: amounts and durations are never computed from
/// user input, only looked up by identifier.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in whole currency units, as stored on subscription rows.
    pub amount: i64,
    pub currency: &'static str,
    /// Entitlement duration in days.
    pub duration_days: i64,
}

pub const PLANS: [Plan; 3] = [
    Plan {
        id: "monthly",
        name: "Monthly Premium",
        amount: 5,
        currency: "USD",
        duration_days: 30,
    },
    Plan {
        id: "quarterly",
        name: "Quarterly Premium",
        amount: 10,
        currency: "USD",
        duration_days: 90,
    },
    Plan {
        id: "yearly",
        name: "Yearly Premium",
        amount: 19,
        currency: "USD",
        duration_days: 365,
    },
];

impl Plan {
    /// Resolves a plan identifier. Unknown identifiers are an
    /// input-validation error on the caller's side, not a fault.
    pub fn lookup(plan_id: &str) -> Option<&'static Plan> {
        PLANS.iter().find(|plan| plan.id == plan_id)
    }

    /// Price in minor currency units, as the payment processor expects.
    pub fn amount_minor(&self) -> i64 {
        self.amount * 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_identifiers_resolve() {
        let yearly = Plan::lookup("yearly").unwrap();
        assert_eq!(yearly.amount, 19);
        assert_eq!(yearly.currency, "USD");
        assert_eq!(yearly.duration_days, 365);
        assert_eq!(yearly.amount_minor(), 1900);

        assert_eq!(Plan::lookup("monthly").unwrap().duration_days, 30);
        assert_eq!(Plan::lookup("quarterly").unwrap().duration_days, 90);
    }

    #[test]
    fn unknown_identifiers_do_not_resolve() {
        assert!(Plan::lookup("weekly").is_none());
        assert!(Plan::lookup("").is_none());
        assert!(Plan::lookup("YEARLY").is_none());
    }
}
