//! Cost model parameters.

/// Error returned when a cost parameter is negative or not a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid cost parameter {name}: must be a non-negative number")]
pub struct InvalidCostParams {
    pub name: &'static str,
}

/// Parameters of both cost models, in CHF.
///
/// Supplied by the caller on every invocation; the engine has no
/// defaults of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostParams {
    /// Car compensation per kilometre.
    pub per_km_rate: f64,

    /// Value of one hour of travel time.
    pub hourly_wage: f64,

    /// Transit flat fee per ticket.
    pub base_fare: f64,

    /// Transit fee per kilometre.
    pub per_km_fare: f64,
}

impl CostParams {
    /// Create parameters after checking every value is a non-negative number.
    pub fn new(
        per_km_rate: f64,
        hourly_wage: f64,
        base_fare: f64,
        per_km_fare: f64,
    ) -> Result<Self, InvalidCostParams> {
        let params = Self {
            per_km_rate,
            hourly_wage,
            base_fare,
            per_km_fare,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every value is a finite, non-negative number.
    pub fn validate(&self) -> Result<(), InvalidCostParams> {
        for (name, value) in [
            ("per_km_rate", self.per_km_rate),
            ("hourly_wage", self.hourly_wage),
            ("base_fare", self.base_fare),
            ("per_km_fare", self.per_km_fare),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidCostParams { name });
            }
        }
        Ok(())
    }
}

/// Where the transit ticket price comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TicketPrice {
    /// `base_fare + distance_km * per_km_fare`.
    Linear,
    /// A price from the fare lookup, used verbatim.
    Quoted(f64),
}
