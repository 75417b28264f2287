//! Auto and transit cost functions.

use crate::domain::{CostBreakdown, CostComponent, TravelMode};

use super::params::{CostParams, TicketPrice};

/// Clamp a monetary amount to a non-negative number.
fn money(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Cost of driving: per-km compensation plus the value of the time spent.
///
/// ```
/// use compare_server::costs::{CostParams, auto_costs};
/// use compare_server::domain::CostComponent;
///
/// let params = CostParams::new(0.75, 30.0, 0.0, 0.0).unwrap();
/// let costs = auto_costs(100.0, 1.0, &params);
/// assert_eq!(costs.get(CostComponent::Compensation), Some(75.0));
/// assert_eq!(costs.total(), 105.0);
/// ```
pub fn auto_costs(distance_km: f64, duration_h: f64, params: &CostParams) -> CostBreakdown {
    CostBreakdown::new(TravelMode::Auto)
        .with(
            CostComponent::Compensation,
            money(distance_km * params.per_km_rate),
        )
        .with(
            CostComponent::WageOpportunityCost,
            money(duration_h * params.hourly_wage),
        )
}

/// Cost of transit: the ticket plus the value of the time spent.
pub fn transit_costs(
    distance_km: f64,
    duration_h: f64,
    params: &CostParams,
    ticket: TicketPrice,
) -> CostBreakdown {
    let ticket = match ticket {
        TicketPrice::Linear => params.base_fare + distance_km * params.per_km_fare,
        TicketPrice::Quoted(price) => price,
    };

    CostBreakdown::new(TravelMode::Transit)
        .with(CostComponent::Ticket, money(ticket))
        .with(
            CostComponent::WageOpportunityCost,
            money(duration_h * params.hourly_wage),
        )
}
