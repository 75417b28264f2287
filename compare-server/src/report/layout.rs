//! Assembles a comparison into a sequence of report blocks.
//!
//! Both the live page and the printable document are rendered from the
//! output of [`build_report`]. They differ only in the [`Pagination`]
//! passed in, so a layout decision made here holds for both.

use chrono::{NaiveDate, NaiveTime};

use crate::compare::{Comparison, FareQuote};
use crate::domain::{CostBreakdown, CostComponent, TransferEvent, TravelMode, Trip};

use super::block::{MapPanel, ReportBlock, TablePanel, TableRow, TextStyle};
use super::paginate::{Pagination, Paginator};
use super::wrap::wrap_text;

/// Character width itinerary lines are wrapped to.
pub const ITINERARY_WIDTH: usize = 90;

/// Characters per header metadata line.
pub const HEADER_WIDTH: usize = 80;

/// Characters per cost table line; each table fills half the page.
pub const TABLE_WIDTH: usize = 40;

pub const REPORT_TITLE: &str = "Reisevergleich: Auto vs Öffentlicher Verkehr";
const MAPS_HEADING: &str = "Routenübersicht";
const TABLES_HEADING: &str = "Vergleich Auto vs. ÖV";
const TRANSFERS_HEADING: &str = "Haltestellen & Umstiege";
const FOOTER_LINES: [&str; 2] = ["Quelle: Google Maps", "PDF automatisch erstellt"];

/// What the user asked for, shown in the header.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMeta {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl RequestMeta {
    fn lines(&self) -> Vec<String> {
        [
            format!("Von: {}", self.origin),
            format!("Nach: {}", self.destination),
            format!(
                "Datum: {} – Abfahrt: {}",
                self.date.format("%d.%m.%Y"),
                self.time.format("%H:%M")
            ),
        ]
        .iter()
        .flat_map(|line| wrap_text(line, HEADER_WIDTH))
        .collect()
    }
}

/// Where the transit ticket price in the report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketSource {
    /// Linear fare model.
    Estimated,
    /// Fare lookup service.
    LookedUp,
    /// Default price after a failed lookup.
    Default,
}

impl TicketSource {
    pub fn from_quote(quote: Option<&FareQuote>) -> Self {
        match quote {
            None => TicketSource::Estimated,
            Some(FareQuote::Quoted(_)) => TicketSource::LookedUp,
            Some(FareQuote::Defaulted { .. }) => TicketSource::Default,
        }
    }

    fn note(self) -> &'static str {
        match self {
            TicketSource::Estimated => "geschätzt",
            TicketSource::LookedUp => "Fahrplanabfrage",
            TicketSource::Default => "Standardpreis",
        }
    }
}

/// Everything one report is built from.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub meta: RequestMeta,
    pub auto: Option<&'a Trip>,
    pub transit: Option<&'a Trip>,
    pub transfers: &'a [TransferEvent],
    pub auto_costs: Option<&'a CostBreakdown>,
    pub transit_costs: Option<&'a CostBreakdown>,
    pub ticket_source: TicketSource,
    /// Whether a map can be shown for the auto trip.
    pub auto_map: bool,
    /// Whether a map can be shown for the transit trip.
    pub transit_map: bool,
}

impl<'a> ReportInput<'a> {
    /// Input for a comparison, with a map for every available trip.
    pub fn from_comparison(comparison: &'a Comparison) -> Self {
        let request = &comparison.request;
        let auto = comparison.auto.trip();
        let transit = comparison.transit.trip();
        Self {
            meta: RequestMeta {
                origin: request.origin.clone(),
                destination: request.destination.clone(),
                date: request.date,
                time: request.time,
            },
            auto,
            transit,
            transfers: &comparison.transfers,
            auto_costs: comparison.auto_costs.as_ref(),
            transit_costs: comparison.transit_costs.as_ref(),
            ticket_source: TicketSource::from_quote(comparison.fare_quote.as_ref()),
            auto_map: auto.is_some(),
            transit_map: transit.is_some(),
        }
    }

    /// Restrict maps to the images that can actually be shown.
    pub fn with_maps(mut self, auto: bool, transit: bool) -> Self {
        self.auto_map &= auto;
        self.transit_map &= transit;
        self
    }

    fn trip(&self, mode: TravelMode) -> Option<&'a Trip> {
        match mode {
            TravelMode::Auto => self.auto,
            TravelMode::Transit => self.transit,
        }
    }

    fn costs(&self, mode: TravelMode) -> Option<&'a CostBreakdown> {
        match mode {
            TravelMode::Auto => self.auto_costs,
            TravelMode::Transit => self.transit_costs,
        }
    }

    fn has_map(&self, mode: TravelMode) -> bool {
        match mode {
            TravelMode::Auto => self.auto_map,
            TravelMode::Transit => self.transit_map,
        }
    }
}

/// Build the block sequence of one report.
///
/// Order is fixed: header, maps, cost tables, auto itinerary, transit
/// itinerary, transfers, footer. Never returns an empty sequence; when
/// neither trip is available the tables and itineraries are replaced
/// by explicit notices.
pub fn build_report(input: &ReportInput<'_>, pagination: Pagination) -> Vec<ReportBlock> {
    let mut pages = Paginator::new(pagination);

    pages.push(ReportBlock::header(REPORT_TITLE, input.meta.lines()));

    let left = map_panel(input, TravelMode::Auto);
    let right = map_panel(input, TravelMode::Transit);
    if left.is_some() || right.is_some() {
        pages.push(ReportBlock::images(MAPS_HEADING, left, right));
    }

    if input.auto.is_none() && input.transit.is_none() {
        pages.push(ReportBlock::text_lines(
            Some(TABLES_HEADING.to_string()),
            vec![
                unavailable_message(TravelMode::Auto),
                unavailable_message(TravelMode::Transit),
            ],
            TextStyle::Notice,
        ));
    } else {
        pages.push(ReportBlock::tables(
            TABLES_HEADING,
            table_panel(input, TravelMode::Auto),
            table_panel(input, TravelMode::Transit),
        ));
    }

    for mode in [TravelMode::Auto, TravelMode::Transit] {
        for block in itinerary_blocks(input.trip(mode), mode) {
            pages.push(block);
        }
    }

    if !input.transfers.is_empty() {
        let lines = input.transfers.iter().map(ToString::to_string).collect();
        pages.push(ReportBlock::text_lines(
            Some(TRANSFERS_HEADING.to_string()),
            lines,
            TextStyle::Body,
        ));
    }

    pages.push(ReportBlock::footer(
        FOOTER_LINES.iter().map(|s| s.to_string()).collect(),
    ));

    pages.finish()
}

fn unavailable_message(mode: TravelMode) -> String {
    format!("Keine {}-Route verfügbar.", mode.label())
}

fn map_panel(input: &ReportInput<'_>, mode: TravelMode) -> Option<MapPanel> {
    if !input.has_map(mode) {
        return None;
    }
    let trip = input.trip(mode)?;
    Some(MapPanel {
        mode,
        label: format!("{}-Route", mode.label()),
        encoded_path: trip.encoded_path().to_string(),
    })
}

fn table_panel(input: &ReportInput<'_>, mode: TravelMode) -> TablePanel {
    let title = mode.label().to_string();
    let (Some(trip), Some(costs)) = (input.trip(mode), input.costs(mode)) else {
        return TablePanel::Unavailable {
            title,
            message: unavailable_message(mode),
        };
    };

    let mut rows = vec![
        TableRow::new("Distanz", format_km(trip.distance_km())),
        TableRow::new("Dauer", format!("{} Min", trip.duration_minutes())),
    ];
    for &(component, amount) in costs.components() {
        let label = match component {
            CostComponent::Ticket => {
                format!("{} ({})", component.label(), input.ticket_source.note())
            }
            _ => component.label().to_string(),
        };
        rows.push(TableRow::new(label, format_chf(amount)));
    }

    TablePanel::Costs {
        title,
        rows: rows.into_iter().map(|row| row.wrapped(TABLE_WIDTH)).collect(),
        total: TableRow::new("Total", format_chf(costs.total())).wrapped(TABLE_WIDTH),
    }
}

/// One block per step so a step is never split across pages; the first
/// carries the section heading.
fn itinerary_blocks(trip: Option<&Trip>, mode: TravelMode) -> Vec<ReportBlock> {
    let heading = format!("Wegbeschreibung – {}", mode.label());

    let Some(trip) = trip else {
        return vec![ReportBlock::text_lines(
            Some(heading),
            vec![unavailable_message(mode)],
            TextStyle::Notice,
        )];
    };

    let mut heading = Some(heading);
    trip.steps()
        .iter()
        .map(|step| {
            let lines = wrap_text(&format!("- {}", step.instruction), ITINERARY_WIDTH);
            ReportBlock::text_lines(heading.take(), lines, TextStyle::Body)
        })
        .collect()
}

/// Amount in Swiss francs, e.g. "CHF 93.98".
pub fn format_chf(amount: f64) -> String {
    format!("CHF {amount:.2}")
}

/// Distance with one decimal, e.g. "125.3 km".
pub fn format_km(distance_km: f64) -> String {
    format!("{distance_km:.1} km")
}
