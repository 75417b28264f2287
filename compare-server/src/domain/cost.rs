//! Cost breakdown types.

use super::TravelMode;

/// A named component of a trip's monetary cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostComponent {
    /// Per-km compensation for using a private car.
    Compensation,
    /// Travel time valued at the traveller's hourly wage.
    WageOpportunityCost,
    /// Transit ticket price.
    Ticket,
}

impl CostComponent {
    /// Stable machine-readable key.
    pub fn key(self) -> &'static str {
        match self {
            CostComponent::Compensation => "compensation",
            CostComponent::WageOpportunityCost => "wage_opportunity_cost",
            CostComponent::Ticket => "ticket",
        }
    }

    /// Label shown in reports.
    pub fn label(self) -> &'static str {
        match self {
            CostComponent::Compensation => "Kilometerentschädigung",
            CostComponent::WageOpportunityCost => "Lohnkosten",
            CostComponent::Ticket => "Billetpreis 2.Kl.",
        }
    }
}

/// Named decomposition of a trip's cost, in CHF.
///
/// The total is never stored; it is summed from the components on
/// every call so it can't drift after a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct CostBreakdown {
    mode: TravelMode,
    components: Vec<(CostComponent, f64)>,
}

impl CostBreakdown {
    /// Creates an empty breakdown for `mode`.
    pub fn new(mode: TravelMode) -> Self {
        Self {
            mode,
            components: Vec::new(),
        }
    }

    /// Sets `component` to `amount`, replacing any previous value.
    pub fn set(&mut self, component: CostComponent, amount: f64) {
        match self.components.iter_mut().find(|(c, _)| *c == component) {
            Some(entry) => entry.1 = amount,
            None => self.components.push((component, amount)),
        }
    }

    /// Builder form of [`CostBreakdown::set`].
    pub fn with(mut self, component: CostComponent, amount: f64) -> Self {
        self.set(component, amount);
        self
    }

    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    /// Amount of one component, if present.
    pub fn get(&self, component: CostComponent) -> Option<f64> {
        self.components
            .iter()
            .find(|(c, _)| *c == component)
            .map(|(_, amount)| *amount)
    }

    /// Components in insertion order.
    pub fn components(&self) -> &[(CostComponent, f64)] {
        &self.components
    }

    /// Sum of all components.
    pub fn total(&self) -> f64 {
        self.components.iter().map(|(_, amount)| amount).sum()
    }
}
